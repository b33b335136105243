//! Property tests for layered resolution over literal documents.
//!
//! Covers folding layers pairwise, idempotence of re-applying a layer,
//! the empty layer as identity, and YAML round-trips of resolved output.

use gymcfg_core::document::{ConfigDocument, Mapping, Value, parse_yaml};
use gymcfg_core::resolve::{merge, resolve, resolve_layers};
use proptest::prelude::*;

fn key() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "c", "env", "ctrl"]).prop_map(str::to_string)
}

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i32>().prop_map(|i| Value::Int(i64::from(i))),
        (-1.0e6..1.0e6f64).prop_map(Value::Float),
        any::<bool>().prop_map(Value::Bool),
        "[a-z]{1,8}".prop_map(Value::Str),
        prop::collection::vec(-1.0e3..1.0e3f64, 1..5).prop_map(Value::Vector),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 32, 4, |inner| {
        prop::collection::vec((key(), inner), 0..4)
            .prop_map(|entries| Value::Mapping(entries.into_iter().collect()))
    })
}

fn document() -> impl Strategy<Value = ConfigDocument> {
    prop::collection::vec((key(), value()), 0..5)
        .prop_map(|entries| ConfigDocument::new(entries.into_iter().collect::<Mapping>()))
}

proptest! {
    #[test]
    fn pairwise_folding_matches_layering(a in document(), b in document(), c in document()) {
        let flat = resolve_layers(&[a.clone(), b.clone(), c.clone()]).unwrap();
        let left = resolve(&a, &b).unwrap().to_document();
        let nested = resolve_layers(&[left, c]).unwrap();
        prop_assert_eq!(flat, nested);
    }

    #[test]
    fn reapplying_a_layer_changes_nothing(a in document(), b in document()) {
        let once = resolve(&a, &b).unwrap();
        let twice = resolve_layers(&[a, b.clone(), b]).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn self_override_matches_empty_override(a in document()) {
        let doubled = resolve(&a, &a).unwrap();
        let single = resolve(&a, &ConfigDocument::empty()).unwrap();
        prop_assert_eq!(doubled, single);
    }

    #[test]
    fn empty_layer_is_identity(a in document()) {
        let alone = resolve_layers(std::slice::from_ref(&a)).unwrap();
        prop_assert_eq!(&resolve(&a, &ConfigDocument::empty()).unwrap(), &alone);
        prop_assert_eq!(&resolve(&ConfigDocument::empty(), &a).unwrap(), &alone);
        prop_assert_eq!(alone.tree(), &a.body);
    }

    #[test]
    fn override_values_win(a in document(), b in document()) {
        let merged = merge(&a.body, &b.body);
        for (k, v) in b.body.iter() {
            match v {
                Value::Mapping(_) => prop_assert!(matches!(merged.get(k), Some(Value::Mapping(_)))),
                literal => prop_assert_eq!(merged.get(k), Some(literal)),
            }
        }
        for k in a.body.keys() {
            prop_assert!(merged.contains_key(k));
        }
    }

    #[test]
    fn resolved_yaml_round_trips(a in document(), b in document()) {
        let resolved = resolve(&a, &b).unwrap();
        let yaml = resolved.to_yaml().unwrap();
        let reparsed = parse_yaml(&yaml).unwrap();
        prop_assert!(reparsed.defaults.is_empty());
        prop_assert_eq!(&reparsed.body, resolved.tree());
        prop_assert_eq!(resolve(&reparsed, &ConfigDocument::empty()).unwrap(), resolved);
    }
}
