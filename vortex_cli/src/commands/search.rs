use crate::cli::{Cli, OutputFormat};
use crate::commands::{build_engines, load_config, Result};
use crate::output::{format_output, OutputData};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tracing::debug;
use vortex_core::{SearchQuery, SourceProgress, SourceStatus};

/// Run an aggregated search and print the merged results.
pub async fn run(
    cli: &Cli,
    keyword: &str,
    category: Option<&str>,
    year: Option<&str>,
    limit: usize,
) -> Result<()> {
    let query = SearchQuery::new(keyword)?
        .with_type(category.map(str::to_string))
        .with_year(year.map(str::to_string));

    let config = load_config(cli)?;
    let (search, _) = build_engines(&config)?;

    let spinner = if cli.output == OutputFormat::Pretty {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(format!("Searching for '{}'...", query.keyword()));
        spinner.enable_steady_tick(std::time::Duration::from_millis(100));
        Some(spinner)
    } else {
        None
    };

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<SourceProgress>();
    let report = async {
        let mut settled = 0usize;
        while let Some(progress) = rx.recv().await {
            settled += 1;
            if let Some(spinner) = &spinner {
                spinner.set_message(progress_message(&progress, settled));
            }
        }
    };
    let (result, ()) = tokio::join!(
        search.search_all_with_progress(&query, cli.user.as_deref(), tx),
        report
    );

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let results = result?;
    debug!(
        total = results.total,
        completed = ?results.completed,
        partial = results.partial,
        "search finished"
    );

    if results.partial && cli.output == OutputFormat::Pretty {
        eprintln!(
            "{} some sources failed or timed out; showing results from {} of them",
            "Note:".yellow().bold(),
            results.completed.len()
        );
    }

    format_output(&OutputData::SearchResults { results, limit }, &cli.output)
}

fn progress_message(progress: &SourceProgress, settled: usize) -> String {
    let status = match progress.status {
        SourceStatus::Ok => format!("{} results", progress.count),
        SourceStatus::Failed => "failed".to_string(),
        SourceStatus::Timeout => "timed out".to_string(),
    };
    format!("{} settled, last: {} ({})", settled, progress.name, status)
}
