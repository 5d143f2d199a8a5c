//! Renderable report model
//!
//! Every type here derives `Serialize`, so the whole report converts
//! explicitly into the generic JSON value tree the template layer binds
//! against. No runtime reflection anywhere.

use serde::Serialize;

use crate::diff::{Action, AttributeChange};

/// A fully prepared view of one resource change
#[derive(Debug, Clone, Serialize)]
pub struct ResourceChangeModel {
    /// Full resource address
    pub address: String,

    /// Module address; empty string for the root module
    pub module_address: String,

    /// Resource type (e.g., "aws_instance")
    #[serde(rename = "type")]
    pub resource_type: String,

    /// Resource name within its type
    pub name: String,

    /// Provider that manages the resource
    pub provider_name: String,

    /// Classified change action
    pub action: Action,

    /// Display symbol for the action
    pub action_symbol: String,

    /// Human-readable action label
    pub action_label: String,

    /// Ordered attribute changes (lexicographic by path)
    pub attribute_changes: Vec<AttributeChange>,

    /// Flattened attribute paths that force replacement
    pub replace_paths: Vec<String>,

    /// Short list of changed attribute names for the summary line
    pub changed_attributes_summary: String,

    /// Summary of large attribute values ("Large values: ...")
    pub large_values_summary: String,
}

/// Resource changes grouped by module
#[derive(Debug, Clone, Serialize)]
pub struct ModuleChangeGroup {
    /// Module address; empty string represents the root module
    pub module_address: String,

    /// Changes within this module, in plan order
    pub changes: Vec<ResourceChangeModel>,
}

/// Count of resources of one type within an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceTypeBreakdown {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub count: usize,
}

/// Summary details for one action
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActionSummary {
    /// Number of resources with this action
    pub count: usize,

    /// Per-type counts, sorted by type name
    pub breakdown: Vec<ResourceTypeBreakdown>,
}

/// Aggregated change counts for the whole plan
#[derive(Debug, Clone, Default, Serialize)]
pub struct SummaryModel {
    pub to_add: ActionSummary,
    pub to_change: ActionSummary,
    pub to_destroy: ActionSummary,
    pub to_replace: ActionSummary,
    pub no_op: ActionSummary,

    /// Total changed resources, excluding no-op
    pub total: usize,
}

impl SummaryModel {
    /// Whether the plan contains any effective change
    pub fn has_changes(&self) -> bool {
        self.total > 0
    }
}

/// The complete renderable report
#[derive(Debug, Clone, Serialize)]
pub struct ReportModel {
    /// Plan JSON format version
    pub format_version: String,

    /// Version of the tool that produced the plan
    pub terraform_version: String,

    /// Plan creation timestamp, when the plan carries one
    pub timestamp: Option<String>,

    /// Report generation time (UTC)
    pub generated_at: String,

    /// Version of this tool
    pub tool_version: String,

    /// Custom report title, already heading-escaped
    pub report_title: Option<String>,

    /// Aggregated counts per action
    pub summary: SummaryModel,

    /// Displayable changes grouped by module (no-op resources excluded),
    /// root module first, then modules in first-appearance order
    pub module_changes: Vec<ModuleChangeGroup>,

    /// Whether unchanged attribute values were kept
    pub show_unchanged_values: bool,
}
