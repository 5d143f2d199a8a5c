//! Rendering options shared by the diff and report layers.

use serde::{Deserialize, Serialize};

/// Output style for small and large value diffs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffFormat {
    /// Plain fenced-block diffs with `+`/`-` markers
    Compact,
    /// Inline HTML diffs with background-colored line and span highlights
    Styled,
}

/// Options controlling diff computation and rendering
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Show sensitive values instead of the mask placeholder
    pub show_sensitive: bool,

    /// Emit attributes whose value did not change
    pub show_unchanged_values: bool,

    /// Diff rendering style for changed values
    pub diff_format: DiffFormat,

    /// Placeholder substituted for masked sensitive values
    pub mask_placeholder: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_sensitive: false,
            show_unchanged_values: false,
            diff_format: DiffFormat::Compact,
            mask_placeholder: "(sensitive)".to_string(),
        }
    }
}
