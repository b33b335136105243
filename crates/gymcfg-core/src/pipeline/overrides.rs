//! `key.path=value` overrides from the command line.

use crate::document::{ConfigDocument, Mapping, Value, parse_yaml_value};
use crate::pipeline::errors::LoadError;

/// Parse one `a.b.c=value` assignment into a single-key override document.
///
/// The value is read as a YAML scalar or flow sequence, so `24`, `true`,
/// `[1, 2, 3]` and `${..num_envs}` all mean what they would in a file.
pub fn parse_override(text: &str) -> Result<ConfigDocument, LoadError> {
    let mut body = Mapping::new();
    apply_assignment(&mut body, text)?;
    Ok(ConfigDocument::new(body))
}

/// Fold several assignments into one document, later ones winning.
pub fn overrides_document<S: AsRef<str>>(assignments: &[S]) -> Result<ConfigDocument, LoadError> {
    Ok(ConfigDocument::new(assignments_mapping(assignments)?))
}

/// Fold assignments into a plain mapping, e.g. for a parent scope.
pub fn assignments_mapping<S: AsRef<str>>(assignments: &[S]) -> Result<Mapping, LoadError> {
    let mut body = Mapping::new();
    for text in assignments {
        apply_assignment(&mut body, text.as_ref())?;
    }
    Ok(body)
}

fn apply_assignment(body: &mut Mapping, text: &str) -> Result<(), LoadError> {
    let invalid = |reason: &str| LoadError::InvalidOverride {
        text: text.to_string(),
        reason: reason.to_string(),
    };
    let (path, raw) = text.split_once('=').ok_or_else(|| invalid("expected KEY=VALUE"))?;
    let keys: Vec<&str> = path.trim().split('.').collect();
    if keys.iter().any(|k| k.is_empty()) {
        return Err(invalid("key path has an empty segment"));
    }
    let value = parse_yaml_value(raw.trim(), path.trim()).map_err(|e| invalid(&e.to_string()))?;
    if matches!(value, Value::Mapping(_)) {
        return Err(invalid("overrides set one value, not a mapping"));
    }
    body.insert_path(&keys, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_override_scalar() {
        let doc = parse_override("env.numActions=24").unwrap();
        assert_eq!(doc.body.get_path(&["env", "numActions"]), Some(&Value::Int(24)));
    }

    #[test]
    fn test_parse_override_vector_and_string() {
        let doc = overrides_document(&[
            "ctrl.joint_space_id.joint_prop_gains=[40, 40, 40, 40, 40, 40, 40]",
            "ctrl.ctrl_type=task_space_impedance",
        ])
        .unwrap();
        assert_eq!(
            doc.body.get_path(&["ctrl", "joint_space_id", "joint_prop_gains"]),
            Some(&Value::Vector(vec![40.0; 7]))
        );
        assert_eq!(
            doc.body.get_path(&["ctrl", "ctrl_type"]),
            Some(&Value::from("task_space_impedance"))
        );
    }

    #[test]
    fn test_later_assignment_wins() {
        let doc = overrides_document(&["sim.dt=0.01", "sim.dt=0.02"]).unwrap();
        assert_eq!(doc.body.get_path(&["sim", "dt"]), Some(&Value::Float(0.02)));
    }

    #[test]
    fn test_reference_override() {
        let doc = parse_override("physics_engine=${..physics_engine}").unwrap();
        assert!(matches!(doc.body.get("physics_engine"), Some(Value::Reference(_))));
    }

    #[test]
    fn test_invalid_overrides() {
        assert!(matches!(
            parse_override("env.numActions"),
            Err(LoadError::InvalidOverride { .. })
        ));
        assert!(matches!(
            parse_override("env..x=1"),
            Err(LoadError::InvalidOverride { .. })
        ));
        assert!(matches!(
            parse_override("env={a: 1}"),
            Err(LoadError::InvalidOverride { .. })
        ));
    }
}
