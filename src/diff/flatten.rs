//! Tree flattening for attribute diffing

use std::collections::BTreeMap;

use serde_json::Value;

/// Flatten a nested JSON value into an ordered map of dotted paths.
///
/// Object members become `prefix.member`, array elements `prefix[index]`.
/// Scalars keep their canonical textual form (booleans lowercase, numbers
/// without added precision). A JSON `null` maps to `None`, which keeps a
/// present-but-null key distinguishable from an absent key. Containers
/// never appear as leaf values.
pub fn flatten_tree(value: &Value) -> BTreeMap<String, Option<String>> {
    let mut result = BTreeMap::new();
    flatten_into(value, "", &mut result);
    result
}

fn flatten_into(value: &Value, prefix: &str, result: &mut BTreeMap<String, Option<String>>) {
    match value {
        Value::Object(members) => {
            for (name, member) in members {
                let key = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{prefix}.{name}")
                };
                flatten_into(member, &key, result);
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_into(item, &format!("{prefix}[{index}]"), result);
            }
        }
        Value::String(text) => {
            result.insert(prefix.to_string(), Some(text.clone()));
        }
        Value::Number(number) => {
            result.insert(prefix.to_string(), Some(number.to_string()));
        }
        Value::Bool(flag) => {
            result.insert(prefix.to_string(), Some(flag.to_string()));
        }
        Value::Null => {
            result.insert(prefix.to_string(), None);
        }
    }
}
