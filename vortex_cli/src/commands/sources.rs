use crate::cli::Cli;
use crate::commands::{load_config, Result};
use crate::output::{format_output, OutputData};
use vortex_core::SourceRegistry;

/// List the sources the current identity may use.
pub async fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let registry = SourceRegistry::from_config(&config)?;
    let sources = registry
        .resolve_available_sources(cli.user.as_deref())
        .await?;

    format_output(&OutputData::Sources(sources), &cli.output)
}
