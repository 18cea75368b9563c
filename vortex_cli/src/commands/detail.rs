use crate::cli::Cli;
use crate::commands::{build_engines, load_config, CommandError, Result};
use crate::output::{format_output, OutputData};
use vortex_core::CatalogError;

pub async fn run(cli: &Cli, id: &str) -> Result<()> {
    let config = load_config(cli)?;
    let (_, resolver) = build_engines(&config)?;

    let detail = resolver
        .get_detail(id.trim(), cli.user.as_deref())
        .await
        .map_err(|e| match e {
            CatalogError::NotFound => CommandError::NotFound(id.to_string()),
            other => CommandError::Core(other),
        })?;

    format_output(&OutputData::Detail(detail), &cli.output)
}
