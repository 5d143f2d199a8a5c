//! Markdown-safe rendering of values and diffs
//!
//! Everything here produces document *fragments*: escaped cell text,
//! inline diffs, fenced blocks. Assembling fragments into a report and
//! normalizing the final document happens in the report layer.

pub mod diff_format;
pub mod markdown;
pub mod value;

pub use diff_format::{render_large_diff, render_small_diff};
pub use markdown::{escape_heading, escape_table_cell, normalize_document};
pub use value::{format_value, is_large_value, IdentifierPolicy, LARGE_VALUE_THRESHOLD};
