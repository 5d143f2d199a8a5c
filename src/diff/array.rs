//! Keyed array diffing
//!
//! Partitions two arrays of objects into added/removed/modified/unchanged
//! buckets using a caller-specified key field. Matching is purely
//! key-based; element equality is deep structural equality over the
//! original JSON values.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

use serde_json::Value;

/// Which input array an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArraySide {
    Before,
    After,
}

impl fmt::Display for ArraySide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArraySide::Before => write!(f, "before"),
            ArraySide::After => write!(f, "after"),
        }
    }
}

/// An array element lacks the key field required for matching.
///
/// Key-less matching would be ambiguous, so this is a hard error for the
/// diff call rather than a silently dropped element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingKeyError {
    pub side: ArraySide,
    pub index: usize,
    pub key_field: String,
}

impl fmt::Display for MissingKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "item at index {} in '{}' array is missing required key property '{}'",
            self.index, self.side, self.key_field
        )
    }
}

impl Error for MissingKeyError {}

/// A matched element whose content changed
#[derive(Debug, Clone, PartialEq)]
pub struct ModifiedPair {
    pub before: Value,
    pub after: Value,
}

/// Result of a keyed array diff
///
/// Every element of both input arrays lands in exactly one bucket:
/// after-only keys in `added`, before-only keys in `removed`, and matched
/// keys in either `modified` or `unchanged`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrayDiff {
    pub added: Vec<Value>,
    pub removed: Vec<Value>,
    pub modified: Vec<ModifiedPair>,
    pub unchanged: Vec<Value>,
}

/// Diff two arrays of objects by a key field.
///
/// `added` follows after-array order, `removed` and the matched buckets
/// follow before-array order. Non-object elements are skipped; an object
/// element without the key field fails the whole call.
pub fn diff_array(
    before: &Value,
    after: &Value,
    key_field: &str,
) -> Result<ArrayDiff, MissingKeyError> {
    let before_items = extract_array_items(before, key_field, ArraySide::Before)?;
    let after_items = extract_array_items(after, key_field, ArraySide::After)?;

    let before_map: BTreeMap<&str, &Value> = before_items
        .iter()
        .map(|(key, value)| (key.as_str(), *value))
        .collect();
    let after_map: BTreeMap<&str, &Value> = after_items
        .iter()
        .map(|(key, value)| (key.as_str(), *value))
        .collect();

    let mut result = ArrayDiff::default();

    for (key, item) in &after_items {
        if !before_map.contains_key(key.as_str()) {
            result.added.push((*item).clone());
        }
    }

    for (key, before_item) in &before_items {
        match after_map.get(key.as_str()).copied() {
            None => result.removed.push((*before_item).clone()),
            Some(after_item) => {
                if *before_item == after_item {
                    result.unchanged.push(after_item.clone());
                } else {
                    result.modified.push(ModifiedPair {
                        before: (*before_item).clone(),
                        after: after_item.clone(),
                    });
                }
            }
        }
    }

    Ok(result)
}

/// Extract keyed object elements in array order.
fn extract_array_items<'a>(
    array: &'a Value,
    key_field: &str,
    side: ArraySide,
) -> Result<Vec<(String, &'a Value)>, MissingKeyError> {
    let mut items = Vec::new();

    let Value::Array(elements) = array else {
        return Ok(items);
    };

    for (index, element) in elements.iter().enumerate() {
        let Value::Object(members) = element else {
            continue;
        };

        let key = match members.get(key_field) {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Number(number)) => number.to_string(),
            Some(Value::Bool(flag)) => flag.to_string(),
            Some(Value::Null) | None => {
                return Err(MissingKeyError {
                    side,
                    index,
                    key_field: key_field.to_string(),
                });
            }
            // Container keys have no natural scalar form; fall back to
            // their compact JSON text so matching stays deterministic.
            Some(other) => other.to_string(),
        };

        items.push((key, element));
    }

    Ok(items)
}
