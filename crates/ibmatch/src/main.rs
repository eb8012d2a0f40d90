use std::sync::Arc;

use anyhow::Context;
use ibmatch::db::MatchDbManager;
use ibmatch::matching::ProgramCatalog;
use ibmatch::server::create_router;
use ibmatch::types::{AppState, Settings};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("ibmatch v{} starting", env!("CARGO_PKG_VERSION"));

    let settings = Settings::load().context("failed to load settings")?;

    let db = MatchDbManager::open(&settings.database_path).with_context(|| {
        format!("failed to open database {}", settings.database_path.display())
    })?;

    let catalog = ProgramCatalog::load_from_directory(&settings.catalog_dir)
        .context("failed to load program catalogue")?;
    db.seed_from_catalog(&catalog)
        .context("failed to seed programs")?;

    let bind_address = &settings.bind_address;
    let state = Arc::new(AppState::new(db, &settings));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;
    info!("Listening on {}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
        .context("server error")?;

    Ok(())
}
