//! Attribute-level diffing between before and after state trees

use serde::Serialize;
use serde_json::Value;

use crate::diff::flatten::flatten_tree;
use crate::options::RenderOptions;
use crate::render::value::{is_large_value, IdentifierPolicy};

/// Attribute whose value is a secret *flag* rather than a secret value.
///
/// Plans mark the flag itself sensitive, but masking it would hide the
/// one attribute a reviewer needs to see; it is forced back to
/// non-sensitive before masking runs.
const SECRET_FLAG_ATTRIBUTE: &str = "secret";

/// A single leaf-path difference between before and after state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeChange {
    /// Flattened attribute path (e.g., "tags.env", "rules[0].port")
    pub path: String,

    /// Display value before the change (None when absent or null)
    pub before: Option<String>,

    /// Display value after the change (None when absent or null)
    pub after: Option<String>,

    /// Whether the attribute is marked sensitive in either state
    pub is_sensitive: bool,

    /// Whether either display value needs large-value rendering
    pub is_large: bool,
}

/// Compute the ordered attribute changes for one resource.
///
/// The key set is the union of both flattened trees, in ordinal path
/// order. Unchanged attributes are dropped unless
/// `options.show_unchanged_values` is set; equality is evaluated on the
/// raw values before masking, so a sensitive value that really changed is
/// never hidden just because both sides display the same placeholder.
pub fn diff_attributes(
    before: Option<&Value>,
    after: Option<&Value>,
    before_sensitive: Option<&Value>,
    after_sensitive: Option<&Value>,
    provider_name: &str,
    policy: &IdentifierPolicy,
    options: &RenderOptions,
) -> Vec<AttributeChange> {
    let before_flat = before.map(flatten_tree).unwrap_or_default();
    let after_flat = after.map(flatten_tree).unwrap_or_default();
    let before_sensitive_flat = before_sensitive.map(flatten_tree).unwrap_or_default();
    let after_sensitive_flat = after_sensitive.map(flatten_tree).unwrap_or_default();

    let mut keys: Vec<&String> = before_flat.keys().collect();
    for key in after_flat.keys() {
        if !before_flat.contains_key(key) {
            keys.push(key);
        }
    }
    keys.sort_unstable();

    let mut changes = Vec::new();

    for key in keys {
        let before_value = before_flat.get(key).cloned().flatten();
        let after_value = after_flat.get(key).cloned().flatten();

        let marked_sensitive = is_sensitive_attribute(key, &before_sensitive_flat, &after_sensitive_flat);
        // The override inspects the raw attribute path, before masking,
        // so a masked placeholder can never shadow the real flag value.
        let is_sensitive = marked_sensitive && !is_secret_flag_path(key);

        if !options.show_unchanged_values && before_value == after_value {
            continue;
        }

        let mask = is_sensitive && !options.show_sensitive;
        let before_display = display_value(before_value, mask, options);
        let after_display = display_value(after_value, mask, options);

        let is_large = value_is_large(before_display.as_deref(), provider_name, policy)
            || value_is_large(after_display.as_deref(), provider_name, policy);

        changes.push(AttributeChange {
            path: key.clone(),
            before: before_display,
            after: after_display,
            is_sensitive,
            is_large,
        });
    }

    changes
}

fn display_value(raw: Option<String>, mask: bool, options: &RenderOptions) -> Option<String> {
    match raw {
        Some(_) if mask => Some(options.mask_placeholder.clone()),
        other => other,
    }
}

fn value_is_large(value: Option<&str>, provider_name: &str, policy: &IdentifierPolicy) -> bool {
    value.is_some_and(|v| is_large_value(v, provider_name, policy))
}

fn is_sensitive_attribute(
    key: &str,
    before_sensitive: &std::collections::BTreeMap<String, Option<String>>,
    after_sensitive: &std::collections::BTreeMap<String, Option<String>>,
) -> bool {
    let is_true = |map: &std::collections::BTreeMap<String, Option<String>>| {
        matches!(map.get(key), Some(Some(flag)) if flag == "true")
    };

    is_true(before_sensitive) || is_true(after_sensitive)
}

fn is_secret_flag_path(path: &str) -> bool {
    path.rsplit('.').next() == Some(SECRET_FLAG_ATTRIBUTE)
}
