//! Plan JSON model and parsing
//!
//! Deserializes the machine-readable plan output of
//! `terraform show -json` / `tofu show -json` into typed records. The
//! before/after state trees stay as opaque [`serde_json::Value`] trees;
//! the diff layer interprets them.

mod parser;
mod types;

pub use parser::{PlanParseError, PlanParser};
pub use types::{Change, ResourceChange, TerraformPlan};
