use std::sync::Arc;

use anyhow::Context;
use gallery_common::storage::filesystem::FilesystemBlobStore;
use tokio::net::TcpListener;
use tracing::{Level, error, info};

use gallery_server::config::AppConfig;
use gallery_server::database::init_db;
use gallery_server::repository::SeaOrmPhotoRepository;
use gallery_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    let config = AppConfig::load().context("Failed to load config")?;

    let db = init_db(&config.database)
        .await
        .context("Failed to initialize database")?;

    let blob_store = FilesystemBlobStore::new(
        config.storage.media_root.clone(),
        config.storage.max_blob_size,
    )
    .await
    .context("Failed to initialize media storage")?;

    info!(
        media_root = %config.storage.media_root.display(),
        media_url = %config.storage.media_url,
        max_blob_size = config.storage.max_blob_size,
        "Media storage ready"
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        photos: Arc::new(SeaOrmPhotoRepository::new(db)),
        blob_store: Arc::new(blob_store),
        config,
    };

    let app = gallery_server::build_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutting down");
}
