use clap::Parser;
use owo_colors::OwoColorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};
use commands::*;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Warnings only by default so that upstream failures do not drown output
    let default_filter = match cli.verbose {
        0 => "vortex_cli=warn,vortex_core=warn",
        1 => "vortex_cli=info,vortex_core=info",
        _ => "vortex_cli=debug,vortex_core=debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match &cli.command {
        Commands::Search {
            keyword,
            category,
            year,
            limit,
        } => search::run(&cli, keyword, category.as_deref(), year.as_deref(), *limit).await,
        Commands::Detail { id } => detail::run(&cli, id).await,
        Commands::Sources => sources::run(&cli).await,
        Commands::Config { action } => config::run(&cli, action.clone()).await,
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        process::exit(1);
    }
}
