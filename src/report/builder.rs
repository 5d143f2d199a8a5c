//! Report model building
//!
//! Transforms a parsed plan into the renderable report model: one view
//! model per resource, module grouping, and action summaries. Resources
//! are independent of each other, so the per-resource work fans out on
//! rayon's pool; collecting an indexed parallel iterator restores plan
//! order deterministically.

use std::collections::{BTreeMap, HashSet};

use chrono::Utc;
use rayon::prelude::*;

use crate::diff::{diff_attributes, split_lines, Action, AttributeChange, LineTag};
use crate::options::RenderOptions;
use crate::plan::{ResourceChange, TerraformPlan};
use crate::render::markdown::escape_heading;
use crate::render::value::IdentifierPolicy;
use crate::report::model::{
    ActionSummary, ModuleChangeGroup, ReportModel, ResourceChangeModel, ResourceTypeBreakdown,
    SummaryModel,
};

/// Attribute names listed before the summary truncates to "+N more"
const MAX_SUMMARY_ATTRIBUTES: usize = 3;

/// Builds a [`ReportModel`] from a parsed plan
pub struct ReportModelBuilder {
    options: RenderOptions,
    title: Option<String>,
    identifier_policy: IdentifierPolicy,
}

impl ReportModelBuilder {
    /// Create a builder with the given render options
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            title: None,
            identifier_policy: IdentifierPolicy::new(),
        }
    }

    /// Set a custom report title
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Build the full report model
    pub fn build(&self, plan: &TerraformPlan) -> ReportModel {
        let all_models: Vec<ResourceChangeModel> = plan
            .resource_changes
            .par_iter()
            .map(|change| self.build_resource_model(change))
            .collect();

        let summary = build_summary(&all_models);

        // No-op resources count toward the summary but carry nothing
        // worth displaying
        let display_models: Vec<ResourceChangeModel> = all_models
            .into_iter()
            .filter(|model| model.action != Action::NoOp)
            .collect();

        let module_changes = group_by_module(display_models);

        ReportModel {
            format_version: plan.format_version.clone(),
            terraform_version: plan.terraform_version.clone(),
            timestamp: plan.timestamp.clone(),
            generated_at: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            report_title: self.title.as_deref().map(escape_heading),
            summary,
            module_changes,
            show_unchanged_values: self.options.show_unchanged_values,
        }
    }

    fn build_resource_model(&self, change: &ResourceChange) -> ResourceChangeModel {
        let action = Action::from_actions(&change.change.actions);
        let attribute_changes = diff_attributes(
            change.change.before.as_ref(),
            change.change.after.as_ref(),
            change.change.before_sensitive.as_ref(),
            change.change.after_sensitive.as_ref(),
            &change.provider_name,
            &self.identifier_policy,
            &self.options,
        );

        let changed_attributes_summary = changed_attributes_summary(&attribute_changes, action);
        let large_values_summary = large_values_summary(&attribute_changes);

        ResourceChangeModel {
            address: change.address.clone(),
            module_address: change.module_address.clone().unwrap_or_default(),
            resource_type: change.resource_type.clone(),
            name: change.name.clone(),
            provider_name: change.provider_name.clone(),
            action,
            action_symbol: action.symbol().to_string(),
            action_label: action.label().to_string(),
            attribute_changes,
            replace_paths: change.change.replace_path_strings(),
            changed_attributes_summary,
            large_values_summary,
        }
    }
}

/// Build a short "N changed: a, b, c, +2 more" line for update summaries.
fn changed_attributes_summary(changes: &[AttributeChange], action: Action) -> String {
    if changes.is_empty() || !matches!(action, Action::Update | Action::Replace) {
        return String::new();
    }

    let changed: Vec<&str> = changes
        .iter()
        .filter(|change| change.before != change.after)
        .map(|change| change.path.as_str())
        .collect();

    if changed.is_empty() {
        return String::new();
    }

    let shown = changed
        .iter()
        .take(MAX_SUMMARY_ATTRIBUTES)
        .copied()
        .collect::<Vec<_>>()
        .join(", ");

    if changed.len() > MAX_SUMMARY_ATTRIBUTES {
        format!(
            "{} changed: {}, +{} more",
            changed.len(),
            shown,
            changed.len() - MAX_SUMMARY_ATTRIBUTES
        )
    } else {
        format!("{} changed: {}", changed.len(), shown)
    }
}

/// Summarize large attribute values as "Large values: name (N lines, M changes)".
fn large_values_summary(changes: &[AttributeChange]) -> String {
    let parts: Vec<String> = changes
        .iter()
        .filter(|change| change.is_large)
        .map(|change| {
            let before = change.before.as_deref().unwrap_or("");
            let after = change.after.as_deref().unwrap_or("");
            let total = count_total_lines(before, after);
            let changed = count_changed_lines(before, after);

            let total_label = if total == 1 { "line" } else { "lines" };
            let changed_label = if changed == 1 { "change" } else { "changes" };
            format!("{} ({total} {total_label}, {changed} {changed_label})", change.path)
        })
        .collect();

    if parts.is_empty() {
        String::new()
    } else {
        format!("Large values: {}", parts.join(", "))
    }
}

/// Count distinct lines across both values.
fn count_total_lines(before: &str, after: &str) -> usize {
    let mut lines: HashSet<String> = split_lines(before).into_iter().collect();
    lines.extend(split_lines(after));
    lines.len()
}

/// Count lines the diff marks as added or removed.
fn count_changed_lines(before: &str, after: &str) -> usize {
    crate::diff::diff_lines(before, after)
        .iter()
        .filter(|entry| entry.tag != LineTag::Unchanged)
        .count()
}

/// Group display changes by module, root module first, then modules in
/// first-appearance order.
fn group_by_module(models: Vec<ResourceChangeModel>) -> Vec<ModuleChangeGroup> {
    let mut groups: Vec<ModuleChangeGroup> = Vec::new();

    for model in models {
        match groups
            .iter_mut()
            .find(|group| group.module_address == model.module_address)
        {
            Some(group) => group.changes.push(model),
            None => groups.push(ModuleChangeGroup {
                module_address: model.module_address.clone(),
                changes: vec![model],
            }),
        }
    }

    // Stable sort keeps appearance order within each partition
    groups.sort_by_key(|group| usize::from(!group.module_address.is_empty()));
    groups
}

fn build_summary(models: &[ResourceChangeModel]) -> SummaryModel {
    let to_add = action_summary(models, Action::Create);
    let to_change = action_summary(models, Action::Update);
    let to_destroy = action_summary(models, Action::Delete);
    let to_replace = action_summary(models, Action::Replace);
    let no_op = action_summary(models, Action::NoOp);

    let total = to_add.count + to_change.count + to_destroy.count + to_replace.count;

    SummaryModel {
        to_add,
        to_change,
        to_destroy,
        to_replace,
        no_op,
        total,
    }
}

fn action_summary(models: &[ResourceChangeModel], action: Action) -> ActionSummary {
    let mut count = 0;
    let mut by_type: BTreeMap<&str, usize> = BTreeMap::new();

    for model in models.iter().filter(|model| model.action == action) {
        count += 1;
        *by_type.entry(model.resource_type.as_str()).or_insert(0) += 1;
    }

    let breakdown = by_type
        .into_iter()
        .map(|(resource_type, count)| ResourceTypeBreakdown {
            resource_type: resource_type.to_string(),
            count,
        })
        .collect();

    ActionSummary { count, breakdown }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::PlanParser;
    use serde_json::json;

    fn plan_from(resource_changes: serde_json::Value) -> TerraformPlan {
        let plan = json!({
            "format_version": "1.2",
            "terraform_version": "1.9.0",
            "resource_changes": resource_changes
        });
        PlanParser::new().parse(&plan.to_string()).unwrap()
    }

    fn resource(address: &str, module: Option<&str>, actions: Vec<&str>) -> serde_json::Value {
        let resource_type = address
            .rsplit('.')
            .nth(1)
            .unwrap_or("unknown")
            .to_string();
        json!({
            "address": address,
            "module_address": module,
            "type": resource_type,
            "name": address.rsplit('.').next().unwrap(),
            "provider_name": "registry.terraform.io/hashicorp/aws",
            "change": {
                "actions": actions,
                "before": {"name": "old"},
                "after": {"name": "new"}
            }
        })
    }

    #[test]
    fn test_build_counts_actions() {
        let plan = plan_from(json!([
            resource("aws_instance.a", None, vec!["create"]),
            resource("aws_instance.b", None, vec!["update"]),
            resource("aws_instance.c", None, vec!["delete"]),
            resource("aws_instance.d", None, vec!["delete", "create"]),
            resource("aws_instance.e", None, vec!["no-op"]),
        ]));

        let model = ReportModelBuilder::new(RenderOptions::default()).build(&plan);

        assert_eq!(model.summary.to_add.count, 1);
        assert_eq!(model.summary.to_change.count, 1);
        assert_eq!(model.summary.to_destroy.count, 1);
        assert_eq!(model.summary.to_replace.count, 1);
        assert_eq!(model.summary.no_op.count, 1);
        assert_eq!(model.summary.total, 4);
    }

    #[test]
    fn test_no_op_resources_are_not_displayed() {
        let plan = plan_from(json!([
            resource("aws_instance.a", None, vec!["no-op"]),
            resource("aws_instance.b", None, vec!["update"]),
        ]));

        let model = ReportModelBuilder::new(RenderOptions::default()).build(&plan);
        let displayed: usize = model
            .module_changes
            .iter()
            .map(|group| group.changes.len())
            .sum();

        assert_eq!(displayed, 1);
        assert_eq!(model.summary.no_op.count, 1);
    }

    #[test]
    fn test_module_grouping_root_first_then_appearance_order() {
        let plan = plan_from(json!([
            resource("module.net.aws_subnet.a", Some("module.net"), vec!["update"]),
            resource("aws_instance.root", None, vec!["update"]),
            resource("module.app.aws_lb.b", Some("module.app"), vec!["update"]),
            resource("module.net.aws_subnet.c", Some("module.net"), vec!["update"]),
        ]));

        let model = ReportModelBuilder::new(RenderOptions::default()).build(&plan);
        let addresses: Vec<&str> = model
            .module_changes
            .iter()
            .map(|group| group.module_address.as_str())
            .collect();

        assert_eq!(addresses, vec!["", "module.net", "module.app"]);
        assert_eq!(model.module_changes[1].changes.len(), 2);
    }

    #[test]
    fn test_breakdown_sorted_by_type() {
        let plan = plan_from(json!([
            resource("aws_vpc.v", None, vec!["create"]),
            resource("aws_instance.i", None, vec!["create"]),
            resource("aws_instance.j", None, vec!["create"]),
        ]));

        let model = ReportModelBuilder::new(RenderOptions::default()).build(&plan);
        let breakdown = &model.summary.to_add.breakdown;

        assert_eq!(
            breakdown,
            &vec![
                ResourceTypeBreakdown {
                    resource_type: "aws_instance".to_string(),
                    count: 2
                },
                ResourceTypeBreakdown {
                    resource_type: "aws_vpc".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_title_is_heading_escaped() {
        let plan = plan_from(json!([]));
        let model = ReportModelBuilder::new(RenderOptions::default())
            .with_title("Release #42 [prod]")
            .build(&plan);

        assert_eq!(
            model.report_title.as_deref(),
            Some("Release \\#42 \\[prod\\]")
        );
    }

    #[test]
    fn test_changed_attributes_summary_truncates() {
        let changes: Vec<AttributeChange> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|path| AttributeChange {
                path: path.to_string(),
                before: Some("x".to_string()),
                after: Some("y".to_string()),
                is_sensitive: false,
                is_large: false,
            })
            .collect();

        let summary = changed_attributes_summary(&changes, Action::Update);

        assert_eq!(summary, "5 changed: a, b, c, +2 more");
    }

    #[test]
    fn test_changed_attributes_summary_empty_for_create() {
        let changes = vec![AttributeChange {
            path: "a".to_string(),
            before: None,
            after: Some("y".to_string()),
            is_sensitive: false,
            is_large: false,
        }];

        assert_eq!(changed_attributes_summary(&changes, Action::Create), "");
    }

    #[test]
    fn test_large_values_summary_counts() {
        let changes = vec![AttributeChange {
            path: "policy".to_string(),
            before: Some("a\nb\nc".to_string()),
            after: Some("a\nx\nc".to_string()),
            is_sensitive: false,
            is_large: true,
        }];

        let summary = large_values_summary(&changes);

        // Distinct lines: a, b, c, x; diff marks b removed and x added
        assert_eq!(summary, "Large values: policy (4 lines, 2 changes)");
    }

    #[test]
    fn test_large_values_summary_singular_labels() {
        let changes = vec![AttributeChange {
            path: "v".to_string(),
            before: Some("only".to_string()),
            after: Some("only".to_string()),
            is_sensitive: false,
            is_large: true,
        }];

        assert_eq!(large_values_summary(&changes), "Large values: v (1 line, 0 changes)");
    }
}
