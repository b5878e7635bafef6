use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use stone_locations::config::AppConfig;
use stone_locations::{app, AppState};

#[derive(Parser)]
#[command(name = "stone-locations")]
#[command(about = "Records and lists stone geolocations in a libSQL store")]
#[command(version)]
struct Args {
    #[arg(long, help = "Listen address (overrides HOST)")]
    host: Option<String>,

    #[arg(long, help = "Listen port (overrides PORT)")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up TURSO_URL, TURSO_AUTH_TOKEN, etc.
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.environment.default_log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting in {:?} mode", config.environment);

    let store = config.store.open().await.context("failed to open store")?;
    tracing::info!("Using {}", store.summary());

    let bind_addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app(AppState::from(store)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::debug!("Shutdown requested: exiting");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}
