use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use plandoc::output;
use plandoc::plan::PlanParser;
use plandoc::report::{DocumentRenderer, ReportModelBuilder, TemplateRenderer};
use plandoc::{DiffFormat, RenderOptions};

#[derive(Parser)]
#[command(name = "plandoc")]
#[command(about = "Render Terraform/OpenTofu plan JSON into a Markdown report", long_about = None)]
#[command(version)]
struct Cli {
    /// Plan JSON file to read ("-" reads from stdin)
    #[arg(short, long, default_value = "-")]
    input: String,

    /// Output file for the Markdown report (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Show sensitive values instead of masking them
    #[arg(long)]
    show_sensitive: bool,

    /// Include attributes whose value did not change
    #[arg(long)]
    show_unchanged: bool,

    /// Diff rendering style
    #[arg(long, value_enum, default_value = "compact")]
    format: FormatArg,

    /// Custom report title
    #[arg(long)]
    title: Option<String>,

    /// Custom Handlebars template file instead of the built-in layout
    #[arg(long)]
    template: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Plain fenced-block diffs, suited to GitHub
    Compact,
    /// Inline HTML diffs with color highlighting
    Styled,
}

impl From<FormatArg> for DiffFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Compact => DiffFormat::Compact,
            FormatArg::Styled => DiffFormat::Styled,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let json = read_input(&cli.input)?;

    let plan = PlanParser::new()
        .parse(&json)
        .context("Input is not a valid plan JSON document")?;

    let options = RenderOptions {
        show_sensitive: cli.show_sensitive,
        show_unchanged_values: cli.show_unchanged,
        diff_format: cli.format.into(),
        ..Default::default()
    };

    let mut builder = ReportModelBuilder::new(options.clone());
    if let Some(title) = &cli.title {
        builder = builder.with_title(title);
    }
    let model = builder.build(&plan);

    let markdown = match &cli.template {
        Some(path) => {
            let template = fs::read_to_string(path)
                .with_context(|| format!("Failed to read template {}", path.display()))?;
            TemplateRenderer::new().render(&template, &model)?
        }
        None => DocumentRenderer::new(options).render(&model),
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, &markdown)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            output::success_with_details(
                "Report written",
                &format!("({} resources) {}", model.summary.total, path.display()),
            );
        }
        None => print!("{markdown}"),
    }

    Ok(())
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read plan JSON from stdin")?;
        Ok(buffer)
    } else {
        fs::read_to_string(input).with_context(|| format!("Failed to read {input}"))
    }
}
