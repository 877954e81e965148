mod blob;
mod candidates;
mod config;
mod db;
mod errors;
mod models;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::blob::{BlobStore, FsBlobStore, S3BlobStore};
use crate::candidates::service::CandidateService;
use crate::config::{BlobBackend, Config, RecordBackend};
use crate::db::{create_pool, ensure_schema};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{MemoryRecordStore, PgRecordStore, RecordStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Candidates API v{}", env!("CARGO_PKG_VERSION"));

    let records = open_record_store(&config).await?;
    let blobs = open_blob_store(&config).await?;
    info!(
        "Record store: {}, blob store: {}",
        records.backend(),
        blobs.backend()
    );

    let candidates = CandidateService::new(records, blobs);

    let state = AppState {
        candidates: candidates.clone(),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    candidates.close().await;
    info!("Shut down cleanly");

    Ok(())
}

async fn open_record_store(config: &Config) -> Result<Arc<dyn RecordStore>> {
    match config.record_store {
        RecordBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("postgres record store selected without a database URL")?;
            let pool = create_pool(url).await?;
            ensure_schema(&pool).await?;
            Ok(Arc::new(PgRecordStore::new(pool)))
        }
        RecordBackend::Memory => Ok(Arc::new(MemoryRecordStore::new())),
    }
}

async fn open_blob_store(config: &Config) -> Result<Arc<dyn BlobStore>> {
    match config.blob_store {
        BlobBackend::Fs => Ok(Arc::new(FsBlobStore::open(&config.upload_folder).await?)),
        BlobBackend::S3 => {
            let s3 = config
                .s3
                .as_ref()
                .context("s3 blob store selected without S3 settings")?;
            Ok(Arc::new(S3BlobStore::connect(s3).await))
        }
    }
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
