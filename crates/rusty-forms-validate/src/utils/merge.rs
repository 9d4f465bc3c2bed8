// File: rusty-forms-validate/src/utils/merge.rs
// Purpose: Deep merge of layered option trees

use crate::value::Value;

/// Fold `overlays` onto `base`, in order, returning a new tree.
///
/// Only object-onto-object recurses. Any other overlay value (array,
/// function, target, scalar) replaces the base value wholesale, and a `Null`
/// overlay value never overwrites. A non-object overlay is ignored.
pub fn merge<'a>(base: &Value, overlays: impl IntoIterator<Item = &'a Value>) -> Value {
    overlays
        .into_iter()
        .fold(base.clone(), |acc, overlay| merge_one(acc, overlay))
}

fn merge_one(base: Value, overlay: &Value) -> Value {
    let Value::Object(overlay) = overlay else {
        return base;
    };
    let mut target = match base {
        Value::Object(map) => map,
        // A non-object base is replaced by the overlay's shape
        _ => Default::default(),
    };

    for (key, value) in overlay {
        if value.is_null() {
            continue;
        }
        match target.get_mut(key) {
            Some(existing) if existing.as_object().is_some() && value.as_object().is_some() => {
                let current = std::mem::take(existing);
                *existing = merge_one(current, value);
            }
            Some(existing) => *existing = value.clone(),
            None => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
    Value::Object(target)
}
