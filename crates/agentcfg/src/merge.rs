//! Deep-merge of the secrets overlay into the base configuration document.

use serde_yaml::Value;

/// Merge `overlay` over `base`: mappings merge recursively per key, anything
/// else (scalars, sequences, explicit nulls) replaces the base value.
pub fn merge_yaml(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(mut base), Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(slot) => {
                        let existing = std::mem::replace(slot, Value::Null);
                        *slot = merge_yaml(existing, value);
                    }
                    None => {
                        base.insert(key, value);
                    }
                }
            }
            Value::Mapping(base)
        }
        (_, overlay) => overlay,
    }
}
