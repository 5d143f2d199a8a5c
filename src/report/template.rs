//! Custom report templates
//!
//! Renders a user-supplied Handlebars template against the serialized
//! report model, as an alternative to the built-in document builder.
//! The Handlebars registry doubles as the template cache: built once per
//! invocation, passed by reference, never global.

use handlebars::{
    Context, Handlebars, Helper, HelperResult, Output, RenderContext, RenderErrorReason, Template,
};

use crate::options::DiffFormat;
use crate::render::markdown::{escape_heading, escape_table_cell, normalize_document};
use crate::render::{render_large_diff, render_small_diff};
use crate::report::error::RenderError;
use crate::report::model::ReportModel;

/// Renders custom report templates
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Create a renderer with the report helpers registered
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();

        handlebars.register_helper("escape", Box::new(escape_helper));
        handlebars.register_helper("escape_heading", Box::new(escape_heading_helper));
        handlebars.register_helper("format_diff", Box::new(format_diff_helper));
        handlebars.register_helper("format_large_value", Box::new(format_large_value_helper));

        Self { handlebars }
    }

    /// Render a template against the report model and normalize the
    /// resulting document.
    ///
    /// A template that fails to compile is malformed input; a failure
    /// after successful compilation is a rendering defect.
    pub fn render(&self, template: &str, model: &ReportModel) -> Result<String, RenderError> {
        Template::compile(template)
            .map_err(|error| RenderError::InvalidInput(format!("template parse error: {error}")))?;

        let rendered = self
            .handlebars
            .render_template(template, model)
            .map_err(|error| RenderError::Internal(format!("template render error: {error}")))?;

        Ok(normalize_document(&rendered))
    }
}

fn param_str<'a>(helper: &'a Helper, index: usize) -> Option<&'a str> {
    helper.param(index).and_then(|param| param.value().as_str())
}

fn parse_format(value: Option<&str>) -> Result<DiffFormat, RenderErrorReason> {
    match value.unwrap_or("compact") {
        "compact" => Ok(DiffFormat::Compact),
        "styled" => Ok(DiffFormat::Styled),
        other => Err(RenderErrorReason::Other(format!(
            "unsupported diff format '{other}', use 'compact' or 'styled'"
        ))),
    }
}

/// `{{escape value}}` — table-cell escaping
fn escape_helper(
    helper: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let value = param_str(helper, 0).unwrap_or("");
    out.write(&escape_table_cell(value))?;
    Ok(())
}

/// `{{escape_heading value}}` — heading escaping
fn escape_heading_helper(
    helper: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let value = param_str(helper, 0).unwrap_or("");
    out.write(&escape_heading(value))?;
    Ok(())
}

/// `{{format_diff before after "compact"}}` — small value diff
fn format_diff_helper(
    helper: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let before = param_str(helper, 0);
    let after = param_str(helper, 1);
    let format = parse_format(param_str(helper, 2))?;

    out.write(&render_small_diff(before, after, format))?;
    Ok(())
}

/// `{{format_large_value before after "compact"}}` — large value diff
fn format_large_value_helper(
    helper: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let before = param_str(helper, 0);
    let after = param_str(helper, 1);
    let format = parse_format(param_str(helper, 2))?;

    out.write(&render_large_diff(before, after, format))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::RenderOptions;
    use crate::plan::PlanParser;
    use crate::report::builder::ReportModelBuilder;
    use serde_json::json;

    fn sample_model() -> ReportModel {
        let plan = json!({
            "format_version": "1.2",
            "terraform_version": "1.9.0",
            "resource_changes": [{
                "address": "aws_instance.web",
                "type": "aws_instance",
                "name": "web",
                "provider_name": "registry.terraform.io/hashicorp/aws",
                "change": {
                    "actions": ["update"],
                    "before": {"instance_type": "t2.micro"},
                    "after": {"instance_type": "t3.micro"}
                }
            }]
        });
        let plan = PlanParser::new().parse(&plan.to_string()).unwrap();
        ReportModelBuilder::new(RenderOptions::default()).build(&plan)
    }

    #[test]
    fn test_render_custom_template() {
        let renderer = TemplateRenderer::new();
        let template = "# Plan for {{terraform_version}}\n\nTotal: {{summary.total}}\n";

        let rendered = renderer.render(template, &sample_model()).unwrap();

        assert!(rendered.contains("# Plan for 1.9.0"));
        assert!(rendered.contains("Total: 1"));
    }

    #[test]
    fn test_template_iterates_module_changes() {
        let renderer = TemplateRenderer::new();
        let template = "{{#each module_changes}}{{#each changes}}{{address}}: {{action}}\n{{/each}}{{/each}}";

        let rendered = renderer.render(template, &sample_model()).unwrap();

        assert!(rendered.contains("aws_instance.web: update"));
    }

    #[test]
    fn test_escape_helper() {
        let renderer = TemplateRenderer::new();
        let rendered = renderer
            .render("{{escape \"a|b\"}}", &sample_model())
            .unwrap();

        assert_eq!(rendered, "a\\|b\n");
    }

    #[test]
    fn test_format_diff_helper() {
        let renderer = TemplateRenderer::new();
        let rendered = renderer
            .render("{{format_diff \"TCP\" \"UDP\" \"compact\"}}", &sample_model())
            .unwrap();

        assert_eq!(rendered, "- TCP<br>+ UDP\n");
    }

    #[test]
    fn test_invalid_template_is_invalid_input() {
        let renderer = TemplateRenderer::new();
        let error = renderer
            .render("{{#each unclosed}}", &sample_model())
            .unwrap_err();

        assert!(matches!(error, RenderError::InvalidInput(_)));
    }

    #[test]
    fn test_helper_failure_is_internal_error() {
        let renderer = TemplateRenderer::new();
        let error = renderer
            .render("{{format_diff \"a\" \"b\" \"bogus\"}}", &sample_model())
            .unwrap_err();

        assert!(matches!(error, RenderError::Internal(_)));
        assert!(error.to_string().contains("unsupported diff format"));
    }
}
