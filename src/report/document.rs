//! Markdown document assembly
//!
//! Renders a [`ReportModel`] into the final report: summary table,
//! per-module sections, and one collapsible details block per resource.
//! A resource that fails to render degrades to an inline error marker so
//! the rest of the document still comes out. The assembled text goes
//! through [`normalize_document`] exactly once.

use serde_json::Value;

use crate::diff::{diff_array, Action, ArrayDiff, AttributeChange};
use crate::options::RenderOptions;
use crate::render::markdown::{escape_heading, escape_html, escape_table_cell, normalize_document};
use crate::render::value::format_value;
use crate::render::{render_large_diff, render_small_diff};
use crate::report::error::RenderError;
use crate::report::model::{ReportModel, ResourceChangeModel, SummaryModel};

/// Key field used to match array items in keyed collection attributes
const ARRAY_ITEM_KEY: &str = "name";

/// Renders a report model to Markdown
pub struct DocumentRenderer {
    options: RenderOptions,
}

impl DocumentRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render the complete document.
    pub fn render(&self, model: &ReportModel) -> String {
        let mut output = String::new();

        let title = model
            .report_title
            .as_deref()
            .unwrap_or("Infrastructure Change Report");
        output.push_str(&format!("# {title}\n\n"));

        self.render_summary(&mut output, &model.summary);

        let has_display_changes = model
            .module_changes
            .iter()
            .any(|group| !group.changes.is_empty());

        if has_display_changes {
            output.push_str("## Resource Changes\n\n");

            for group in &model.module_changes {
                if !group.module_address.is_empty() {
                    output.push_str(&format!("### {}\n\n", escape_heading(&group.module_address)));
                }

                for change in &group.changes {
                    match self.render_resource(change) {
                        Ok(fragment) => output.push_str(&fragment),
                        Err(error) => {
                            output.push_str(&format!(
                                "> **Render error** for `{}`: {}\n\n",
                                escape_table_cell(&change.address),
                                error
                            ));
                        }
                    }
                }
            }
        }

        output.push_str(&format!(
            "_Generated by plandoc {} at {}_\n",
            model.tool_version, model.generated_at
        ));

        normalize_document(&output)
    }

    fn render_summary(&self, output: &mut String, summary: &SummaryModel) {
        output.push_str("## Summary\n\n");

        if !summary.has_changes() {
            output.push_str("No changes.\n\n");
            return;
        }

        output.push_str("| Action | Count | Resource Types |\n");
        output.push_str("| --- | --- | --- |\n");

        let rows = [
            ("+ Add", &summary.to_add),
            ("~ Change", &summary.to_change),
            ("- Destroy", &summary.to_destroy),
            ("± Replace", &summary.to_replace),
        ];

        for (label, action_summary) in rows {
            if action_summary.count == 0 {
                continue;
            }

            let breakdown = action_summary
                .breakdown
                .iter()
                .map(|entry| format!("{} ({})", escape_table_cell(&entry.resource_type), entry.count))
                .collect::<Vec<_>>()
                .join(", ");

            output.push_str(&format!(
                "| {label} | {} | {breakdown} |\n",
                action_summary.count
            ));
        }

        output.push_str(&format!("| **Total** | **{}** | |\n\n", summary.total));
    }

    fn render_resource(&self, change: &ResourceChangeModel) -> Result<String, RenderError> {
        let mut output = String::new();

        output.push_str("<details>\n");
        output.push_str(&format!(
            "<summary><strong>{} {}</strong> {}</summary>\n\n",
            change.action_symbol,
            escape_html(&change.address),
            change.action_label
        ));

        if !change.changed_attributes_summary.is_empty() {
            output.push_str(&format!("{}\n\n", escape_table_cell(&change.changed_attributes_summary)));
        }

        if !change.large_values_summary.is_empty() {
            output.push_str(&format!("_{}_\n\n", escape_table_cell(&change.large_values_summary)));
        }

        if change.attribute_changes.is_empty() {
            output.push_str("No attribute-level changes.\n\n");
        } else {
            self.render_attribute_table(&mut output, change);
        }

        for attribute in change.attribute_changes.iter().filter(|a| a.is_large) {
            output.push_str(&self.render_large_attribute(attribute, change.action)?);
        }

        output.push_str("</details>\n\n");
        Ok(output)
    }

    fn render_attribute_table(&self, output: &mut String, change: &ResourceChangeModel) {
        let value_header = match change.action {
            Action::Create => "Value",
            Action::Delete => "Value",
            _ => "Change",
        };

        output.push_str(&format!("| Attribute | {value_header} |\n"));
        output.push_str("| --- | --- |\n");

        for attribute in &change.attribute_changes {
            let mut cell = if attribute.is_large {
                "(large value, see below)".to_string()
            } else {
                self.render_attribute_cell(attribute, change.action)
            };

            if change.replace_paths.contains(&attribute.path) {
                cell.push_str(" (forces replacement)");
            }

            output.push_str(&format!(
                "| `{}` | {cell} |\n",
                escape_table_cell(&attribute.path)
            ));
        }

        output.push('\n');
    }

    fn render_attribute_cell(&self, attribute: &AttributeChange, action: Action) -> String {
        match action {
            Action::Create => format_value(attribute.after.as_deref().unwrap_or("")),
            Action::Delete => format_value(attribute.before.as_deref().unwrap_or("")),
            _ => render_small_diff(
                attribute.before.as_deref(),
                attribute.after.as_deref(),
                self.options.diff_format,
            ),
        }
    }

    fn render_large_attribute(
        &self,
        attribute: &AttributeChange,
        action: Action,
    ) -> Result<String, RenderError> {
        let mut output = String::new();
        output.push_str(&format!("**{}**\n\n", escape_heading(&attribute.path)));

        let before = attribute.before.as_deref();
        let after = attribute.after.as_deref();

        let body = if matches!(action, Action::Update | Action::Replace) {
            match self.try_render_array_items(before, after)? {
                Some(items) => items,
                None => render_large_diff(before, after, self.options.diff_format),
            }
        } else {
            render_large_diff(before, after, self.options.diff_format)
        };

        output.push_str(&body);
        output.push_str("\n\n");
        Ok(output)
    }

    /// Render a keyed item breakdown when both sides are arrays of
    /// objects carrying the item key field.
    ///
    /// Returns `Ok(None)` when the values are not a keyed collection; a
    /// collection whose later elements lack the key is invalid input and
    /// fails the resource.
    fn try_render_array_items(
        &self,
        before: Option<&str>,
        after: Option<&str>,
    ) -> Result<Option<String>, RenderError> {
        let (Some(before_text), Some(after_text)) = (before, after) else {
            return Ok(None);
        };

        let Some(before_value) = parse_json_array(before_text) else {
            return Ok(None);
        };
        let Some(after_value) = parse_json_array(after_text) else {
            return Ok(None);
        };

        if !looks_keyed(&before_value) && !looks_keyed(&after_value) {
            return Ok(None);
        }

        let diff = diff_array(&before_value, &after_value, ARRAY_ITEM_KEY)?;
        Ok(Some(self.render_array_diff(&diff)))
    }

    fn render_array_diff(&self, diff: &ArrayDiff) -> String {
        let mut output = String::new();

        for item in &diff.added {
            output.push_str(&format!("- Added `{}`\n", item_key(item)));
        }

        for item in &diff.removed {
            output.push_str(&format!("- Removed `{}`\n", item_key(item)));
        }

        for pair in &diff.modified {
            output.push_str(&format!("- Changed `{}`:\n", item_key(&pair.after)));

            let before_flat = crate::diff::flatten_tree(&pair.before);
            let after_flat = crate::diff::flatten_tree(&pair.after);

            let mut fields: Vec<&String> = before_flat.keys().collect();
            for key in after_flat.keys() {
                if !before_flat.contains_key(key) {
                    fields.push(key);
                }
            }
            fields.sort_unstable();

            for field in fields {
                let field_before = before_flat.get(field).cloned().flatten();
                let field_after = after_flat.get(field).cloned().flatten();
                if field_before == field_after {
                    continue;
                }

                output.push_str(&format!(
                    "  - `{}`: {}\n",
                    escape_table_cell(field),
                    render_small_diff(
                        field_before.as_deref(),
                        field_after.as_deref(),
                        self.options.diff_format
                    )
                ));
            }
        }

        if !diff.unchanged.is_empty() {
            output.push_str(&format!("- {} unchanged\n", diff.unchanged.len()));
        }

        output
    }
}

fn parse_json_array(text: &str) -> Option<Value> {
    let parsed: Value = serde_json::from_str(text.trim()).ok()?;
    match &parsed {
        Value::Array(items) if !items.is_empty() => Some(parsed),
        _ => None,
    }
}

/// A collection is keyed when its first object element carries the key field.
fn looks_keyed(value: &Value) -> bool {
    let Value::Array(items) = value else {
        return false;
    };

    items
        .iter()
        .find_map(|item| item.as_object())
        .is_some_and(|members| members.contains_key(ARRAY_ITEM_KEY))
}

fn item_key(item: &Value) -> String {
    match item.get(ARRAY_ITEM_KEY) {
        Some(Value::String(text)) => escape_table_cell(text),
        Some(other) => escape_table_cell(&other.to_string()),
        None => String::new(),
    }
}
