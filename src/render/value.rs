//! Value classification and table formatting
//!
//! Holds the policy knobs for what counts as a "large" value and which
//! long values are exempt because they are readable identifiers rather
//! than bulky free text.

use regex::Regex;

use crate::render::markdown::escape_table_cell;

/// Values longer than this (without newlines) are treated as large.
pub const LARGE_VALUE_THRESHOLD: usize = 100;

/// Recognizes long-but-readable resource identifiers.
///
/// Cloud resource IDs are slash-delimited paths that routinely exceed the
/// large-value threshold yet belong in a table cell, not a code fence.
/// The policy only applies to providers it recognizes.
pub struct IdentifierPolicy {
    patterns: Vec<Regex>,
    provider_markers: Vec<&'static str>,
}

impl Default for IdentifierPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentifierPolicy {
    /// Create the default policy with compiled identifier patterns
    pub fn new() -> Self {
        Self {
            // Subscription, resource-group, and resource scopes, plus
            // management-group scopes
            patterns: vec![
                Regex::new(r"^/subscriptions/[^/]+(/resourceGroups/[^/]+(/providers/[^/]+(/[^/]+)+)?)?$")
                    .expect("Invalid subscription scope regex"),
                Regex::new(r"^/providers/[^/]+/managementGroups/[^/]+$")
                    .expect("Invalid management group scope regex"),
            ],
            provider_markers: vec!["azurerm"],
        }
    }

    /// Whether this policy has identifier patterns for the given provider
    pub fn applies_to(&self, provider_name: &str) -> bool {
        let lowered = provider_name.to_lowercase();
        self.provider_markers
            .iter()
            .any(|marker| lowered.contains(marker))
    }

    /// Whether a value matches one of the readable identifier patterns
    pub fn is_readable_identifier(&self, value: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(value))
    }
}

/// Determine whether a value needs dedicated large-value rendering.
///
/// A value is large when it contains a newline or exceeds
/// [`LARGE_VALUE_THRESHOLD`] characters, unless the identifier policy
/// recognizes it as a readable identifier for this provider.
pub fn is_large_value(value: &str, provider_name: &str, policy: &IdentifierPolicy) -> bool {
    if value.is_empty() {
        return false;
    }

    if value.contains('\n') || value.contains('\r') {
        return true;
    }

    if policy.applies_to(provider_name) && policy.is_readable_identifier(value) {
        return false;
    }

    value.chars().count() > LARGE_VALUE_THRESHOLD
}

/// Format a single value as inline code for a table cell.
pub fn format_value(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }

    format!("`{}`", escape_table_cell(value))
}
