//! # Empty-Value Pruning — Compact Dynamic Output
//!
//! Recursive removal of empty values (null, empty object, empty sequence)
//! from encoded output, for wire formats and documents where an absent
//! field and an empty field mean the same thing.
//!
//! An allow-list of key names can retain empty sequences under specific
//! object keys where `[]` is semantically meaningful (an explicitly
//! cleared list rather than an unset one). The allow-list applies to
//! object keys only; sequence elements have no key and are always
//! filtered when empty. The top-level value keeps its container form even
//! when everything inside it is pruned away.
//!
//! Falsy-but-present scalars (`""`, `false`, `0`) are not empty and are
//! always kept.

use serde_json::Value;

use crate::convert::{EncodeError, ToDynamic};

/// Whether a dynamic value counts as empty for pruning purposes.
///
/// Null, `[]`, and `{}` are empty; every other value, including `""`,
/// `false`, and `0`, is not.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(entries) => entries.is_empty(),
        _ => false,
    }
}

/// Whether a pruned object entry survives.
///
/// An allow-listed key keeps an exactly-empty sequence; everything else
/// survives only by being non-empty.
fn qualified(key: &str, pruned: &Value, keep_empty_keys: &[&str]) -> bool {
    let kept_empty_sequence = keep_empty_keys.contains(&key)
        && matches!(pruned, Value::Array(items) if items.is_empty());
    kept_empty_sequence || !is_empty_value(pruned)
}

/// Recursively remove empty values from `value`.
///
/// Sequences are pruned element-wise and then filtered of empties; object
/// entries are pruned value-wise and then filtered through the
/// `keep_empty_keys` allow-list. Scalars pass through unchanged. The
/// value itself is never discarded, so a fully-pruned container comes
/// back as an empty container of the same form.
pub fn drop_empty(value: &Value, keep_empty_keys: &[&str]) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| drop_empty(item, keep_empty_keys))
                .filter(|pruned| !is_empty_value(pruned))
                .collect(),
        ),
        Value::Object(entries) => Value::Object(
            entries
                .iter()
                .map(|(key, item)| (key.clone(), drop_empty(item, keep_empty_keys)))
                .filter(|(key, pruned)| qualified(key, pruned, keep_empty_keys))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Encode `value` and prune empty entries from the result.
pub fn to_dynamic_pruned<T: ToDynamic + ?Sized>(
    value: &T,
    keep_empty_keys: &[&str],
) -> Result<Value, EncodeError> {
    Ok(drop_empty(&value.to_dynamic()?, keep_empty_keys))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ── Emptiness classification ──

    #[test]
    fn test_empty_values_are_null_and_empty_containers() {
        assert!(is_empty_value(&Value::Null));
        assert!(is_empty_value(&json!([])));
        assert!(is_empty_value(&json!({})));
    }

    #[test]
    fn test_falsy_scalars_are_not_empty() {
        assert!(!is_empty_value(&json!("")));
        assert!(!is_empty_value(&json!(false)));
        assert!(!is_empty_value(&json!(0)));
    }

    // ── Object pruning ──

    #[test]
    fn test_empty_entries_are_dropped_from_objects() {
        let value = json!({
            "name": "svc",
            "note": null,
            "tags": [],
            "extra": {},
        });
        assert_eq!(drop_empty(&value, &[]), json!({"name": "svc"}));
    }

    #[test]
    fn test_pruning_cascades_through_nested_objects() {
        let value = json!({"outer": {"inner": {"leaf": null}}});
        assert_eq!(drop_empty(&value, &[]), json!({}));
    }

    #[test]
    fn test_falsy_scalars_survive_pruning() {
        let value = json!({"enabled": false, "count": 0, "label": ""});
        assert_eq!(drop_empty(&value, &[]), value);
    }

    // ── Sequence pruning ──

    #[test]
    fn test_empty_elements_are_filtered_from_sequences() {
        let value = json!([1, null, [], {}, "x"]);
        assert_eq!(drop_empty(&value, &[]), json!([1, "x"]));
    }

    #[test]
    fn test_elements_emptied_by_pruning_are_filtered() {
        let value = json!([{"a": null}, {"b": 1}]);
        assert_eq!(drop_empty(&value, &[]), json!([{"b": 1}]));
    }

    // ── Allow-list ──

    #[test]
    fn test_allow_list_retains_empty_sequences() {
        let value = json!({"tags": [], "notes": []});
        assert_eq!(drop_empty(&value, &["tags"]), json!({"tags": []}));
    }

    #[test]
    fn test_allow_list_does_not_retain_other_empties() {
        let value = json!({"tags": {}, "meta": null});
        assert_eq!(drop_empty(&value, &["tags", "meta"]), json!({}));
    }

    #[test]
    fn test_allow_list_retains_sequences_emptied_by_pruning() {
        let value = json!({"tags": [null, []]});
        assert_eq!(drop_empty(&value, &["tags"]), json!({"tags": []}));
    }

    #[test]
    fn test_allow_list_does_not_protect_sequence_elements() {
        // Elements have no key, so the allow-list cannot apply to them.
        let value = json!({"rows": [[], [1]]});
        assert_eq!(drop_empty(&value, &["rows"]), json!({"rows": [[1]]}));
    }

    // ── Top level ──

    #[test]
    fn test_top_level_container_form_is_preserved() {
        assert_eq!(drop_empty(&json!({"a": null}), &[]), json!({}));
        assert_eq!(drop_empty(&json!([null]), &[]), json!([]));
        assert_eq!(drop_empty(&Value::Null, &[]), Value::Null);
        assert_eq!(drop_empty(&json!(0), &[]), json!(0));
    }

    // ── Encode integration ──

    #[test]
    fn test_to_dynamic_pruned_encodes_then_prunes() {
        let mut entries = indexmap::IndexMap::new();
        entries.insert("kept".to_string(), json!("x"));
        entries.insert("dropped".to_string(), Value::Null);
        assert_eq!(
            to_dynamic_pruned(&entries, &[]).unwrap(),
            json!({"kept": "x"})
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn dynamic_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            "[a-z]{0,6}".prop_map(Value::String),
        ];
        leaf.prop_recursive(
            4,  // levels deep
            64, // total nodes
            8,  // items per collection
            |inner| {
                prop_oneof![
                    prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
                    prop::collection::btree_map("[a-z]{1,4}", inner, 0..8)
                        .prop_map(|entries| Value::Object(entries.into_iter().collect())),
                ]
            },
        )
    }

    /// Whether any object entry or sequence element below `value` is empty.
    fn has_nested_empty(value: &Value) -> bool {
        match value {
            Value::Array(items) => items
                .iter()
                .any(|item| is_empty_value(item) || has_nested_empty(item)),
            Value::Object(entries) => entries
                .values()
                .any(|item| is_empty_value(item) || has_nested_empty(item)),
            _ => false,
        }
    }

    proptest! {
        #[test]
        fn pruning_is_idempotent(value in dynamic_value()) {
            let once = drop_empty(&value, &[]);
            prop_assert_eq!(drop_empty(&once, &[]), once.clone());
        }

        #[test]
        fn pruned_output_contains_no_nested_empties(value in dynamic_value()) {
            let pruned = drop_empty(&value, &[]);
            prop_assert!(!has_nested_empty(&pruned));
        }

        #[test]
        fn pruning_preserves_top_level_form(value in dynamic_value()) {
            let pruned = drop_empty(&value, &[]);
            match value {
                Value::Array(_) => prop_assert!(pruned.is_array()),
                Value::Object(_) => prop_assert!(pruned.is_object()),
                other => prop_assert_eq!(pruned, other),
            }
        }
    }
}
