use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use warden_core::store::UserStore;
use warden_server::{config, routes, state::AppState};
use warden_storage::key_provider::{FixedKeyProvider, KeyringProvider};
use warden_storage::user_file_store::EncryptedUserStore;

/// Credential-management service with an encrypted-at-rest user store.
#[derive(Debug, Parser)]
#[command(name = "warden-server", version)]
struct Cli {
    /// Path to a config file (default: platform config dir).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Listen address, overrides the config file.
    #[arg(long)]
    bind: Option<String>,
    /// Encrypted user file path, overrides the config file.
    #[arg(long)]
    data_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => config::load_from_path(path)?,
        None => config::load()?,
    };

    let bind_addr = cli.bind.unwrap_or_else(|| config.bind_addr());
    let data_file = cli.data_file.unwrap_or_else(|| config.data_file());

    let store = build_store(&config, data_file)?;
    let state = AppState::new(store);
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("listening on {bind_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing() {
    // Respect user-provided filters, default to info to avoid noisy stdout.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// Pick the key source: an explicitly configured key (config file or
/// WARDEN_KEY) wins; otherwise a key is kept in the OS keyring,
/// generated on first run.
fn build_store(config: &config::Config, data_file: PathBuf) -> Result<Arc<dyn UserStore>> {
    info!(path = %data_file.display(), "opening encrypted user store");
    let store: Arc<dyn UserStore> = match config.key() {
        Some(encoded) => {
            let provider = FixedKeyProvider::from_base64("configured", &encoded)
                .map_err(|e| color_eyre::eyre::eyre!("invalid store key: {e}"))?;
            Arc::new(EncryptedUserStore::new(data_file, provider))
        }
        None => Arc::new(EncryptedUserStore::new(
            data_file,
            KeyringProvider::new("warden", "store-key"),
        )),
    };
    Ok(store)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
    }
}
