//! Render Terraform/OpenTofu plan JSON into diff-annotated Markdown.
//!
//! The pipeline runs in one direction: a parsed plan ([`plan`]) is turned
//! into flattened attribute and array diffs ([`diff`]), rendered as
//! table-safe Markdown fragments ([`render`]), and assembled into a full
//! report document ([`report`]).
//!
//! # Example
//!
//! ```ignore
//! use plandoc::plan::PlanParser;
//! use plandoc::report::{DocumentRenderer, ReportModelBuilder};
//! use plandoc::RenderOptions;
//!
//! let options = RenderOptions::default();
//! let plan = PlanParser::new().parse(&json)?;
//! let model = ReportModelBuilder::new(options.clone()).build(&plan);
//! let markdown = DocumentRenderer::new(options).render(&model);
//! ```

pub mod diff;
pub mod options;
pub mod output;
pub mod plan;
pub mod render;
pub mod report;

pub use options::{DiffFormat, RenderOptions};
