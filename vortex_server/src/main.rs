use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vortex_core::{CatalogConfig, VERSION};
use vortex_server::{run, AppState, ServerError};

#[derive(Parser, Debug)]
#[command(name = "vortex_server", version, about = "Aggregated catalog search over HTTP")]
struct Args {
    /// Config file (TOML or YAML)
    #[arg(long, short, env = "VORTEX_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overrides `server.bind_addr`
    #[arg(long, short, env = "VORTEX_BIND")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vortex_server=info,vortex_core=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    if let Err(e) = serve(args).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn serve(args: Args) -> Result<(), ServerError> {
    info!(version = VERSION, "starting vortex server");

    let config = CatalogConfig::discover(args.config.as_deref())?;
    if config.sources.is_empty() {
        warn!("no sources configured, every search will be empty");
    }
    info!(
        sources = config.sources.len(),
        families = ?vortex_core::connectors::enabled_families(),
        "catalog ready"
    );

    let bind = args
        .bind
        .unwrap_or_else(|| config.server.bind_addr.clone());
    let state = AppState::from_config(&config)?;
    run(state, &bind).await
}
