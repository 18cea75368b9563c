pub mod config;
pub mod detail;
pub mod search;
pub mod sources;

use crate::cli::Cli;
use thiserror::Error;
use vortex_core::{CatalogConfig, CatalogError, CatalogSearch, DetailResolver, SourceRegistry};

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Core library error: {0}")]
    Core(#[from] CatalogError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CommandError>;

/// Configuration for this invocation (`--config`, `$VORTEX_CONFIG`, default path).
pub fn load_config(cli: &Cli) -> Result<CatalogConfig> {
    Ok(CatalogConfig::discover(cli.config.as_deref())?)
}

/// Search and detail engines over the configured sources.
pub fn build_engines(config: &CatalogConfig) -> Result<(CatalogSearch, DetailResolver)> {
    let registry = SourceRegistry::from_config(config)?;
    Ok((
        CatalogSearch::with_settings(registry.clone(), &config.search),
        DetailResolver::with_settings(registry, &config.search),
    ))
}
