//! Text → [`ConfigDocument`] for YAML and TOML task documents.
//!
//! Comments are discarded by the underlying parsers. Strings of the form
//! `${...}` become [`Reference`] values; numeric sequences become vectors.

use crate::document::errors::{DocumentError, ReferenceError};
use crate::document::reference::{Reference, is_interpolation};
use crate::document::types::{ConfigDocument, DEFAULTS_KEY, DefaultsEntry, SELF_MARKER};
use crate::document::value::{Mapping, Value};

/// Parse a YAML task document.
pub fn parse_yaml(text: &str) -> Result<ConfigDocument, DocumentError> {
    let raw: serde_yaml::Value = serde_yaml::from_str(text).map_err(|e| DocumentError::Yaml {
        message: e.to_string(),
    })?;
    let root = match raw {
        serde_yaml::Value::Mapping(m) => m,
        // an empty file is an empty document
        serde_yaml::Value::Null => serde_yaml::Mapping::new(),
        other => {
            return Err(DocumentError::RootNotMapping {
                found: yaml_kind(&other).to_string(),
            });
        }
    };
    let mut defaults = Vec::new();
    let mut rest = serde_yaml::Mapping::new();
    for (key, value) in root {
        if key.as_str() == Some(DEFAULTS_KEY) {
            defaults = yaml_defaults(value)?;
        } else {
            rest.insert(key, value);
        }
    }
    let body = yaml_mapping(rest, "")?;
    Ok(ConfigDocument::new(body).with_defaults(defaults))
}

/// Parse a TOML task document.
pub fn parse_toml(text: &str) -> Result<ConfigDocument, DocumentError> {
    let mut table: toml::Table = toml::from_str(text).map_err(|e| DocumentError::Toml {
        message: e.to_string(),
    })?;
    let defaults = match table.remove(DEFAULTS_KEY) {
        Some(list) => toml_defaults(list)?,
        None => Vec::new(),
    };
    let body = toml_table(table, "")?;
    Ok(ConfigDocument::new(body).with_defaults(defaults))
}

/// Parse one YAML value, as given on a command line (`[1, 2]`, `24`, `dls`).
pub fn parse_yaml_value(text: &str, path: &str) -> Result<Value, DocumentError> {
    let raw: serde_yaml::Value = serde_yaml::from_str(text).map_err(|e| DocumentError::Yaml {
        message: e.to_string(),
    })?;
    match raw {
        // `key=` sets the empty string
        serde_yaml::Value::Null => Ok(Value::Str(String::new())),
        other => yaml_value(other, path),
    }
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "bool",
        serde_yaml::Value::Number(_) => "number",
        serde_yaml::Value::String(_) => "string",
        serde_yaml::Value::Sequence(_) => "sequence",
        serde_yaml::Value::Mapping(_) => "mapping",
        serde_yaml::Value::Tagged(_) => "tagged value",
    }
}

fn yaml_mapping(mapping: serde_yaml::Mapping, path: &str) -> Result<Mapping, DocumentError> {
    let mut out = Mapping::new();
    for (key, value) in mapping {
        let key = match key {
            serde_yaml::Value::String(s) => s,
            other => {
                return Err(DocumentError::UnsupportedValue {
                    path: path.to_string(),
                    found: format!("{} key (keys must be strings)", yaml_kind(&other)),
                });
            }
        };
        let here = child_path(path, &key);
        out.insert(key, yaml_value(value, &here)?);
    }
    Ok(out)
}

fn yaml_value(value: serde_yaml::Value, path: &str) -> Result<Value, DocumentError> {
    match value {
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(b)),
        serde_yaml::Value::Number(n) => Ok(match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        }),
        serde_yaml::Value::String(s) => string_value(s, path),
        serde_yaml::Value::Sequence(items) => {
            let mut vector = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                match item {
                    serde_yaml::Value::Number(n) => vector.push(n.as_f64().unwrap_or(f64::NAN)),
                    other => {
                        return Err(DocumentError::UnsupportedValue {
                            path: format!("{}[{}]", path, i),
                            found: format!("{} in a vector (vectors are numeric)", yaml_kind(other)),
                        });
                    }
                }
            }
            Ok(Value::Vector(vector))
        }
        serde_yaml::Value::Mapping(m) => yaml_mapping(m, path).map(Value::Mapping),
        other => Err(DocumentError::UnsupportedValue {
            path: path.to_string(),
            found: yaml_kind(&other).to_string(),
        }),
    }
}

fn toml_kind(value: &toml::Value) -> &'static str {
    match value {
        toml::Value::String(_) => "string",
        toml::Value::Integer(_) => "integer",
        toml::Value::Float(_) => "float",
        toml::Value::Boolean(_) => "bool",
        toml::Value::Datetime(_) => "datetime",
        toml::Value::Array(_) => "array",
        toml::Value::Table(_) => "table",
    }
}

fn toml_table(table: toml::Table, path: &str) -> Result<Mapping, DocumentError> {
    let mut out = Mapping::new();
    for (key, value) in table {
        let here = child_path(path, &key);
        out.insert(key, toml_value(value, &here)?);
    }
    Ok(out)
}

fn toml_value(value: toml::Value, path: &str) -> Result<Value, DocumentError> {
    match value {
        toml::Value::String(s) => string_value(s, path),
        toml::Value::Integer(i) => Ok(Value::Int(i)),
        toml::Value::Float(f) => Ok(Value::Float(f)),
        toml::Value::Boolean(b) => Ok(Value::Bool(b)),
        toml::Value::Array(items) => {
            let mut vector = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                match item {
                    toml::Value::Integer(n) => vector.push(*n as f64),
                    toml::Value::Float(f) => vector.push(*f),
                    other => {
                        return Err(DocumentError::UnsupportedValue {
                            path: format!("{}[{}]", path, i),
                            found: format!("{} in a vector (vectors are numeric)", toml_kind(other)),
                        });
                    }
                }
            }
            Ok(Value::Vector(vector))
        }
        toml::Value::Table(t) => toml_table(t, path).map(Value::Mapping),
        other @ toml::Value::Datetime(_) => Err(DocumentError::UnsupportedValue {
            path: path.to_string(),
            found: toml_kind(&other).to_string(),
        }),
    }
}

fn string_value(s: String, path: &str) -> Result<Value, DocumentError> {
    if !is_interpolation(&s) {
        return Ok(Value::Str(s));
    }
    match s.parse::<Reference>() {
        Ok(reference) => Ok(Value::Reference(reference)),
        Err(ReferenceError::UnsupportedDirective { directive }) => {
            Err(DocumentError::UnsupportedDirective {
                path: path.to_string(),
                directive,
            })
        }
        Err(ReferenceError::Malformed { reason }) => Err(DocumentError::InvalidReference {
            path: path.to_string(),
            text: s,
            reason,
        }),
    }
}

fn defaults_list(names: Vec<String>) -> Result<Vec<DefaultsEntry>, DocumentError> {
    let mut defaults = Vec::with_capacity(names.len());
    for name in &names {
        let name = name.trim();
        let name = name.strip_prefix('/').unwrap_or(name);
        if name.is_empty() {
            return Err(DocumentError::InvalidDefaults {
                message: "empty document name".to_string(),
            });
        }
        if name == SELF_MARKER {
            if defaults.contains(&DefaultsEntry::SelfRef) {
                return Err(DocumentError::InvalidDefaults {
                    message: format!("{} listed more than once", SELF_MARKER),
                });
            }
            defaults.push(DefaultsEntry::SelfRef);
        } else {
            defaults.push(DefaultsEntry::Document(name.to_string()));
        }
    }
    Ok(defaults)
}

fn yaml_defaults(value: serde_yaml::Value) -> Result<Vec<DefaultsEntry>, DocumentError> {
    let serde_yaml::Value::Sequence(items) = value else {
        return Err(DocumentError::InvalidDefaults {
            message: format!("expected a list, found {}", yaml_kind(&value)),
        });
    };
    let mut names = Vec::with_capacity(items.len());
    for item in items {
        match item {
            serde_yaml::Value::String(s) => names.push(s),
            other => {
                return Err(DocumentError::InvalidDefaults {
                    message: format!(
                        "entries must be document names, found {}",
                        yaml_kind(&other)
                    ),
                });
            }
        }
    }
    defaults_list(names)
}

fn toml_defaults(value: toml::Value) -> Result<Vec<DefaultsEntry>, DocumentError> {
    let toml::Value::Array(items) = value else {
        return Err(DocumentError::InvalidDefaults {
            message: format!("expected a list, found {}", toml_kind(&value)),
        });
    };
    let mut names = Vec::with_capacity(items.len());
    for item in items {
        match item {
            toml::Value::String(s) => names.push(s),
            other => {
                return Err(DocumentError::InvalidDefaults {
                    message: format!(
                        "entries must be document names, found {}",
                        toml_kind(&other)
                    ),
                });
            }
        }
    }
    defaults_list(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::reference::{DefaultTarget, PathRef};

    const TASK: &str = r#"
# comments carry no meaning
defaults:
    - FactoryBase
    - _self_

name: FactoryTaskNutBoltPick
physics_engine: ${..physics_engine}

env:
    numEnvs: ${resolve_default:128,${...num_envs}}
    numActions: 24  # documented as 20, overridden here
    close_and_lift: True

rl:
    pos_action_scale: [0.1, 0.1, 0.1]
    clamp_rot_thresh: 1.0e-6
    max_episode_length: 100

ctrl:
    ctrl_type: joint_space_id
    all:
        gripper_prop_gains: [100, 100]
"#;

    #[test]
    fn test_parse_task_yaml() {
        let doc = parse_yaml(TASK).unwrap();
        assert_eq!(
            doc.defaults,
            vec![
                DefaultsEntry::Document("FactoryBase".to_string()),
                DefaultsEntry::SelfRef
            ]
        );
        assert!(!doc.body.contains_key("defaults"));
        assert_eq!(doc.name(), Some("FactoryTaskNutBoltPick"));
        assert_eq!(
            doc.body.get_path(&["env", "numActions"]),
            Some(&Value::Int(24))
        );
        assert_eq!(
            doc.body.get_path(&["env", "close_and_lift"]),
            Some(&Value::Bool(true))
        );
        assert_eq!(
            doc.body.get_path(&["rl", "pos_action_scale"]),
            Some(&Value::Vector(vec![0.1, 0.1, 0.1]))
        );
        assert_eq!(
            doc.body.get_path(&["rl", "clamp_rot_thresh"]),
            Some(&Value::Float(1.0e-6))
        );
        assert_eq!(
            doc.body.get_path(&["ctrl", "all", "gripper_prop_gains"]),
            Some(&Value::Vector(vec![100.0, 100.0]))
        );
    }

    #[test]
    fn test_parse_references() {
        let doc = parse_yaml(TASK).unwrap();
        assert_eq!(
            doc.body.get("physics_engine"),
            Some(&Value::Reference(Reference::Path(PathRef {
                up: 2,
                keys: vec!["physics_engine".to_string()]
            })))
        );
        match doc.body.get_path(&["env", "numEnvs"]) {
            Some(Value::Reference(Reference::ResolveDefault { default, target })) => {
                assert_eq!(**default, Value::Int(128));
                assert!(matches!(target, DefaultTarget::Path(p) if p.up == 3));
            }
            other => panic!("unexpected numEnvs value {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_non_numeric_vectors() {
        let err = parse_yaml("rl:\n  scales: [1, two]\n").unwrap_err();
        match err {
            DocumentError::UnsupportedValue { path, .. } => assert_eq!(path, "rl.scales[1]"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_null() {
        assert!(matches!(
            parse_yaml("env:\n  numEnvs: ~\n"),
            Err(DocumentError::UnsupportedValue { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_directive() {
        let err = parse_yaml("sim:\n  use_gpu_pipeline: ${eq:${...pipeline},\"gpu\"}\n").unwrap_err();
        match err {
            DocumentError::UnsupportedDirective { path, directive } => {
                assert_eq!(path, "sim.use_gpu_pipeline");
                assert_eq!(directive, "eq");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_embedded_interpolation() {
        assert!(matches!(
            parse_yaml("name: task_${..suffix}\n"),
            Err(DocumentError::InvalidReference { .. })
        ));
    }

    #[test]
    fn test_parse_root_must_be_mapping() {
        assert!(matches!(
            parse_yaml("- a\n- b\n"),
            Err(DocumentError::RootNotMapping { .. })
        ));
        assert_eq!(parse_yaml("").unwrap(), ConfigDocument::empty());
    }

    #[test]
    fn test_parse_defaults_errors() {
        assert!(matches!(
            parse_yaml("defaults: FactoryBase\n"),
            Err(DocumentError::InvalidDefaults { .. })
        ));
        assert!(matches!(
            parse_yaml("defaults:\n  - override: x\n"),
            Err(DocumentError::InvalidDefaults { .. })
        ));
        assert!(matches!(
            parse_yaml("defaults:\n  - _self_\n  - _self_\n"),
            Err(DocumentError::InvalidDefaults { .. })
        ));
    }

    #[test]
    fn test_parse_defaults_strips_leading_slash() {
        let doc = parse_yaml("defaults:\n  - /factory_schema_config_task\n").unwrap();
        assert_eq!(
            doc.defaults,
            vec![DefaultsEntry::Document(
                "factory_schema_config_task".to_string()
            )]
        );
    }

    #[test]
    fn test_parse_toml_document() {
        let doc = parse_toml(
            r#"
defaults = ["FactoryBase", "_self_"]
name = "FactoryTaskNutBoltPick"

[env]
numEnvs = "${resolve_default:128,${...num_envs}}"
numActions = 24

[rl]
pos_action_scale = [0.1, 0.1, 0.1]
"#,
        )
        .unwrap();
        assert_eq!(doc.defaults.len(), 2);
        assert_eq!(doc.name(), Some("FactoryTaskNutBoltPick"));
        assert!(matches!(
            doc.body.get_path(&["env", "numEnvs"]),
            Some(Value::Reference(_))
        ));
        assert_eq!(
            doc.body.get_path(&["rl", "pos_action_scale"]),
            Some(&Value::Vector(vec![0.1, 0.1, 0.1]))
        );
    }

    #[test]
    fn test_parse_yaml_value() {
        assert_eq!(
            parse_yaml_value("[40, 40]", "x").unwrap(),
            Value::Vector(vec![40.0, 40.0])
        );
        assert_eq!(parse_yaml_value("24", "x").unwrap(), Value::Int(24));
        assert_eq!(parse_yaml_value("", "x").unwrap(), Value::from(""));
    }

    #[test]
    fn test_yaml_serialization_round_trip() {
        let doc = parse_yaml(TASK).unwrap();
        let text = doc.to_yaml().unwrap();
        let again = parse_yaml(&text).unwrap();
        assert_eq!(doc, again);
    }

    #[test]
    fn test_non_ascii_reference_is_an_error() {
        let err = parse_yaml("name: \"${ü}\"\n").unwrap_err();
        assert!(
            matches!(err, DocumentError::InvalidReference { ref path, .. } if path == "name"),
            "got {err:?}"
        );

        let doc = parse_yaml("x: \"${resolve_default:é,${..a}}\"\n").unwrap();
        assert!(matches!(doc.body.get("x"), Some(Value::Reference(_))));
    }
}
