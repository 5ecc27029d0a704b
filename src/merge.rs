// Structural merge of JSON records. Objects merge key by key, everything else
// (arrays included) is replaced whole. Pending patches combine with
// `deep_merge`; a combined patch lands on a state with `overlay`.
use serde_json::{Map, Value};

pub fn deep_merge(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                let nested = value.is_object() && target.get(key).is_some_and(Value::is_object);
                if nested {
                    if let Some(existing) = target.get_mut(key) {
                        deep_merge(existing, value);
                    }
                } else {
                    target.insert(key.clone(), value.clone());
                }
            }
        }
        (target, patch) => *target = patch.clone(),
    }
}

/// Replaces each top-level field of `target` named in `patch`. Nested
/// values are not merged, so a patch carrying `{"skills": {"a": 3}}` leaves
/// only `a` in `skills`.
pub fn overlay(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                target.insert(key.clone(), value.clone());
            }
        }
        (target, patch) => *target = patch.clone(),
    }
}

pub fn empty_patch() -> Value {
    Value::Object(Map::new())
}

pub fn is_empty_patch(patch: &Value) -> bool {
    match patch {
        Value::Object(map) => map.is_empty(),
        Value::Null => true,
        _ => false,
    }
}
