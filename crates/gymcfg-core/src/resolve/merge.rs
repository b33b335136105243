//! Deep merge of literal trees.
//!
//! Mapping over mapping recurses key by key. Anything else replaces the base
//! value outright: a vector override swaps the whole vector, a scalar over a
//! mapping drops the mapping, a reference over a literal is kept as the
//! reference for the substitution pass.

use crate::document::{Mapping, Value};

/// Merge `overlay` onto a copy of `base`.
pub fn merge(base: &Mapping, overlay: &Mapping) -> Mapping {
    let mut out = base.clone();
    merge_into(&mut out, overlay.clone());
    out
}

/// Merge `overlay` onto `target` in place.
pub fn merge_into(target: &mut Mapping, overlay: Mapping) {
    for (key, value) in overlay {
        let Value::Mapping(incoming) = value else {
            target.insert(key, value);
            continue;
        };
        if let Some(Value::Mapping(existing)) = target.get_mut(&key) {
            merge_into(existing, incoming);
            continue;
        }
        target.insert(key, Value::Mapping(incoming));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(entries: Vec<(&str, Value)>) -> Mapping {
        entries.into_iter().collect()
    }

    #[test]
    fn test_override_wins_and_base_is_inherited() {
        let base = mapping(vec![
            ("numActions", Value::Int(12)),
            ("env_spacing", Value::Float(0.5)),
        ]);
        let overlay = mapping(vec![("numActions", Value::Int(24))]);
        let merged = merge(&base, &overlay);
        assert_eq!(merged.get("numActions"), Some(&Value::Int(24)));
        assert_eq!(merged.get("env_spacing"), Some(&Value::Float(0.5)));
    }

    #[test]
    fn test_vectors_replace_whole() {
        let base = mapping(vec![("gains", Value::Vector(vec![40.0; 7]))]);
        let overlay = mapping(vec![("gains", Value::Vector(vec![1.0, 2.0]))]);
        let merged = merge(&base, &overlay);
        assert_eq!(merged.get("gains"), Some(&Value::Vector(vec![1.0, 2.0])));
    }

    #[test]
    fn test_nested_mappings_merge() {
        let base = mapping(vec![(
            "ctrl",
            Value::Mapping(mapping(vec![
                ("ctrl_type", Value::from("gym_default")),
                (
                    "all",
                    Value::Mapping(mapping(vec![("jacobian_type", Value::from("geometric"))])),
                ),
            ])),
        )]);
        let overlay = mapping(vec![(
            "ctrl",
            Value::Mapping(mapping(vec![("ctrl_type", Value::from("joint_space_id"))])),
        )]);
        let merged = merge(&base, &overlay);
        assert_eq!(
            merged.get_path(&["ctrl", "ctrl_type"]),
            Some(&Value::from("joint_space_id"))
        );
        assert_eq!(
            merged.get_path(&["ctrl", "all", "jacobian_type"]),
            Some(&Value::from("geometric"))
        );
    }

    #[test]
    fn test_scalar_replaces_mapping_and_back() {
        let base = mapping(vec![("physx", Value::Mapping(Mapping::new()))]);
        let overlay = mapping(vec![("physx", Value::Bool(false))]);
        assert_eq!(merge(&base, &overlay).get("physx"), Some(&Value::Bool(false)));

        let inner = mapping(vec![("num_threads", Value::Int(4))]);
        let overlay = mapping(vec![("physx", Value::Mapping(inner.clone()))]);
        let base = mapping(vec![("physx", Value::Bool(false))]);
        assert_eq!(
            merge(&base, &overlay).get("physx"),
            Some(&Value::Mapping(inner))
        );
    }

    #[test]
    fn test_merge_with_self_is_identity() {
        let base = mapping(vec![
            ("a", Value::Int(1)),
            ("b", Value::Mapping(mapping(vec![("c", Value::Bool(true))]))),
        ]);
        assert_eq!(merge(&base, &base), base);
    }
}
