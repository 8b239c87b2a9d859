//! Wildlife Sightings Server
//!
//! HTTP API for recording and listing wildlife sightings, with a WebSocket
//! channel that pushes each new sighting to connected clients.
//!
//! Uses SQLite (embedded) as the document store.

mod config;
mod error;
mod handlers;
mod services;
mod storage;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use wildlife_core::ports::DocumentStore;

use config::{ServerConfig, StoreKind};
use handlers::ws::ConnectionManager;
use services::SightingService;
use storage::{MemoryDocumentStore, SqliteDocumentStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SightingService>,
    pub store: Arc<dyn DocumentStore>,
    pub conn_manager: Arc<ConnectionManager>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, collection: &str) -> Self {
        Self {
            service: Arc::new(SightingService::new(store.clone(), collection)),
            store,
            conn_manager: Arc::new(ConnectionManager::new()),
        }
    }
}

#[tokio::main]
async fn main() {
    // Set up panic hook to log crashes
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("wildlife_server=info,tower_http=info"));
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
    {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!(
        "Starting Wildlife Sightings Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    if let Err(e) = run_server().await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server() -> Result<()> {
    let config = ServerConfig::load().context("Failed to load configuration")?;
    info!(
        "Config loaded: bind={}, store={:?}, collection={}",
        config.bind_address, config.store, config.collection
    );

    let store: Arc<dyn DocumentStore> = match config.store {
        StoreKind::Sqlite => {
            tokio::fs::create_dir_all(&config.data_dir)
                .await
                .with_context(|| {
                    format!(
                        "Failed to create data directory {}",
                        config.data_dir.display()
                    )
                })?;
            let path = config.database_path();
            info!("Using SQLite document store at {}", path);
            Arc::new(SqliteDocumentStore::new(path, config.store_settings()))
        }
        StoreKind::Memory => {
            warn!("Using in-memory document store; data is lost on shutdown");
            Arc::new(MemoryDocumentStore::new())
        }
    };

    // Connect eagerly so problems show up in the startup log. Requests
    // reconnect on their own, so a failure here is not fatal.
    if let Err(e) = store.ping().await {
        warn!("Document store not reachable at startup: {}", e);
    }

    let state = AppState::new(store.clone(), &config.collection);
    let app = build_router(state, config.body_limit_bytes);

    let addr: SocketAddr = config
        .bind_address
        .parse()
        .context("Failed to parse bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    store.close().await;
    info!("Server shut down");
    Ok(())
}

pub fn build_router(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/ws", get(handlers::ws::handler))
        .route("/wildlife-sightings", post(handlers::sightings::dispatch))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
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
}
