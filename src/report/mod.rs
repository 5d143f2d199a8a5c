//! Report building and document rendering
//!
//! Takes a parsed plan through view-model construction to the final
//! Markdown document. The built-in [`DocumentRenderer`] produces the
//! standard report; [`TemplateRenderer`] renders user-supplied
//! Handlebars templates against the same model.

mod builder;
mod document;
mod error;
mod model;
mod template;

pub use builder::ReportModelBuilder;
pub use document::DocumentRenderer;
pub use error::RenderError;
pub use model::{
    ActionSummary, ModuleChangeGroup, ReportModel, ResourceChangeModel, ResourceTypeBreakdown,
    SummaryModel,
};
pub use template::TemplateRenderer;
