// File: rusty-forms-validate/src/config/message.rs
// Purpose: Normalize the `m` option into per-reason message parameter lists

use indexmap::IndexMap;
use tracing::warn;

use crate::dom::ValidityKey;
use crate::value::Value;

/// Message parameters per native constraint reason, always list-valued
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageConfig(IndexMap<String, Vec<Value>>);

impl MessageConfig {
    pub fn get(&self, key: ValidityKey) -> Option<&[Value]> {
        self.0.get(key.as_str()).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Wrap every non-array message in a single-element list.
///
/// Keys that are not native constraint reasons are kept but can never match.
pub fn format_message_config(input: &Value) -> MessageConfig {
    let Some(map) = input.as_object() else {
        return MessageConfig::default();
    };
    MessageConfig(
        map.iter()
            .map(|(key, value)| {
                if ValidityKey::parse(key).is_none() {
                    warn!(key = %key, "message key is not a constraint validity reason");
                }
                (key.clone(), value.clone().into_list())
            })
            .collect(),
    )
}
