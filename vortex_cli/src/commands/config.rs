use crate::cli::{Cli, ConfigAction, OutputFormat};
use crate::commands::{load_config, CommandError, Result};
use crate::output::{format_output, OutputData};
use owo_colors::OwoColorize;
use serde_json::json;
use vortex_core::config::CONFIG_ENV_VAR;
use vortex_core::CatalogConfig;

pub async fn run(cli: &Cli, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => show_config(cli),
        ConfigAction::Path => show_path(cli),
        ConfigAction::Check => check_config(cli),
    }
}

fn show_config(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let value = serde_json::to_value(&config)?;
    format_output(&OutputData::ConfigInfo(value), &cli.output)
}

fn show_path(cli: &Cli) -> Result<()> {
    let default = CatalogConfig::default_path();
    let env = std::env::var(CONFIG_ENV_VAR).ok();

    match cli.output {
        OutputFormat::Pretty | OutputFormat::Text => {
            if let Some(path) = &cli.config {
                println!("{} {}", "Using:".bold(), path.display());
            } else if let Some(path) = &env {
                println!("{} {} (from ${})", "Using:".bold(), path, CONFIG_ENV_VAR);
            } else {
                let state = if default.exists() {
                    "exists".green().to_string()
                } else {
                    "missing, built-in defaults apply".yellow().to_string()
                };
                println!("{} {} ({})", "Using:".bold(), default.display(), state);
            }
            Ok(())
        }
        _ => format_output(
            &OutputData::ConfigInfo(json!({
                "explicit": cli.config.as_ref().map(|p| p.display().to_string()),
                "env": env,
                "default": default.display().to_string(),
                "default_exists": default.exists(),
            })),
            &cli.output,
        ),
    }
}

fn check_config(cli: &Cli) -> Result<()> {
    let path = cli
        .config
        .clone()
        .or_else(|| std::env::var(CONFIG_ENV_VAR).ok().map(Into::into))
        .unwrap_or_else(CatalogConfig::default_path);

    if !path.exists() {
        return Err(CommandError::InvalidInput(format!(
            "config file {} does not exist",
            path.display()
        )));
    }

    let config = CatalogConfig::load(&path)?;
    let enabled = config.sources.iter().filter(|s| s.enabled).count();
    println!(
        "{} {} ({} sources, {} enabled)",
        "OK".green().bold(),
        path.display(),
        config.sources.len(),
        enabled
    );
    Ok(())
}
