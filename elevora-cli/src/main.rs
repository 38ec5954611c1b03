#![deny(missing_docs)]
//! Elevora command-line interface.
//!
//! Runs or loads website audits and prints the derived dashboard summary.

mod client;

use clap::{Args, Parser, Subcommand, ValueEnum};
use client::{AuditClient, FetchArgs, fetch_document_with};
use elevora_core::{
    AuditDocument, AuditError, AuditView, derive_view, render_json, render_view_markdown,
};
#[cfg(not(test))]
use elevora_core::{StdFileSystem, load_document};
use std::fmt::Write;
use std::path::PathBuf;

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

const NO_DATA_MESSAGE: &str = "No data to summarize.";

#[derive(Parser)]
#[command(name = "elevora", version, about = "Elevora website audit CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Debug, Default)]
struct SelectionArgs {
    /// Issue category to show in detail.
    #[arg(long)]
    category: Option<String>,
}

#[derive(Args, Clone)]
struct OutputArgs {
    /// Output format for report data.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write the report to a file instead of stdout.
    #[arg(long = "report-output")]
    report_output: Option<PathBuf>,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Json,
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a fresh audit through the audit producer.
    Fetch {
        #[command(flatten)]
        fetch: FetchArgs,
        #[command(flatten)]
        selection: SelectionArgs,
        #[command(flatten)]
        report: OutputArgs,
    },
    /// Summarize an audit document saved as JSON.
    View {
        /// Audit document to read.
        #[arg(short, long)]
        file: PathBuf,
        #[command(flatten)]
        selection: SelectionArgs,
        #[command(flatten)]
        report: OutputArgs,
    },
}

#[cfg(not(test))]
#[tokio::main]
async fn main() -> CliResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            fetch,
            selection,
            report,
        } => {
            let client = client::ReqwestAuditClient::new()?;
            run_fetch(&fetch, &selection, &report, &client).await?
        }
        Commands::View {
            file,
            selection,
            report,
        } => {
            let doc = load_document(&StdFileSystem::new(), &file)?;
            present_document(&doc, &selection, &report).await?
        }
    }

    Ok(())
}

#[cfg(test)]
fn main() {}

async fn run_fetch<C: AuditClient>(
    fetch: &FetchArgs,
    selection: &SelectionArgs,
    output: &OutputArgs,
    client: &C,
) -> CliResult<()> {
    let doc = fetch_document_with(fetch, client).await?;
    present_document(&doc, selection, output).await
}

async fn present_document(
    doc: &AuditDocument,
    selection: &SelectionArgs,
    output: &OutputArgs,
) -> CliResult<()> {
    match build_view(doc, selection) {
        Ok(view) => emit_view(&view, output).await,
        Err(AuditError::EmptyInput) => emit_output(output, render_no_data(output.format)?).await,
        Err(err) => Err(err.into()),
    }
}

fn build_view(doc: &AuditDocument, selection: &SelectionArgs) -> elevora_core::Result<AuditView> {
    let mut view = derive_view(doc)?;
    if let Some(category) = selection.category.as_deref() {
        if !view.select_category(category) {
            log::warn!(
                "unknown issue category `{category}`; showing `{}`",
                view.active_category().unwrap_or("none")
            );
        }
    }
    Ok(view)
}

async fn emit_view(view: &AuditView, output: &OutputArgs) -> CliResult<()> {
    let contents = match output.format {
        OutputFormat::Text => render_view_text(view),
        OutputFormat::Json => format!("{}\n", render_json(view)?),
        OutputFormat::Markdown => render_view_markdown(view),
    };
    emit_output(output, contents).await
}

fn render_no_data(format: OutputFormat) -> CliResult<String> {
    Ok(match format {
        OutputFormat::Json => format!(
            "{}\n",
            render_json(&serde_json::json!({
                "kind": "no_data",
                "message": NO_DATA_MESSAGE,
            }))?
        ),
        OutputFormat::Text | OutputFormat::Markdown => format!("{NO_DATA_MESSAGE}\n"),
    })
}

async fn emit_output(output: &OutputArgs, contents: String) -> CliResult<()> {
    if let Some(path) = &output.report_output {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, contents).await?;
    } else {
        print!("{contents}");
    }
    Ok(())
}

fn render_view_text(view: &AuditView) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "Overall score: {}% ({}, {})",
        view.overall_score,
        view.grade,
        view.grade.description()
    );
    let _ = writeln!(
        output,
        "Best category: {} ({}%)",
        view.best_category.category, view.best_category.percentage
    );
    let _ = writeln!(output, "Issues found: {}", view.total_issues);
    let _ = writeln!(output, "Pages audited: {}", view.pages_audited);
    if let Some(url) = &view.primary_url {
        let _ = writeln!(output, "Primary URL: {url}");
    }
    if !view.last_updated.is_empty() {
        let _ = writeln!(output, "Last updated: {}", view.last_updated);
    }

    let _ = writeln!(output, "\nCategories:");
    for slice in &view.pie_series {
        let _ = writeln!(output, "  {}: {}%", slice.label, slice.value);
    }

    if !view.bar_series.is_empty() {
        let _ = writeln!(output, "\nPages:");
        for bar in &view.bar_series {
            let label = if bar.label.is_empty() {
                "(untitled)"
            } else {
                bar.label.as_str()
            };
            let _ = writeln!(output, "  {label}: {}% ({})", bar.value, bar.grade);
        }
    }

    if let Some(trend) = &view.trend {
        let _ = writeln!(output, "\nTrend:");
        for point in &view.line_series {
            let _ = writeln!(output, "  {}: {}%", point.label, point.value);
        }
        let _ = writeln!(output, "  Change: {:+} points", trend.change);
    }

    if view.category_issue_counts.is_empty() {
        let _ = writeln!(output, "\nNo issues found.");
        return output;
    }
    let _ = writeln!(output, "\nIssues by category:");
    for count in &view.category_issue_counts {
        let marker = if view.active_category() == Some(count.category.as_str()) {
            " *"
        } else {
            ""
        };
        let _ = writeln!(output, "  {}: {}{marker}", count.category, count.total);
    }
    if let (Some(active), Some(elements)) = (view.active_category(), view.active_issues()) {
        let _ = writeln!(output, "\n{active}:");
        for element in elements {
            let _ = writeln!(output, "  {}", element.element);
            for item in element.recommendations {
                let _ = writeln!(output, "    - {}x {}", item.count, item.recommendation);
                let _ = writeln!(output, "      {}", item.explanation);
            }
        }
    }
    output
}
