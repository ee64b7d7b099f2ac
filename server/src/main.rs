use std::sync::Arc;

use axum::{
    http::StatusCode,
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod db;
mod error;
mod handlers;
mod memory;
mod models;
mod shortcode;
mod storage;
mod store;

use config::{AppConfig, StorageBackend};
use memory::MemoryStorage;
use storage::BlobStorage;
use store::RecordStore;

// ── Shared application state ───────────────────────────────────────────────

pub struct AppState {
    pub store: RecordStore,
}

// ── Router ─────────────────────────────────────────────────────────────────

pub fn app(state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/shorturl", post(handlers::api::shorten))
        .route("/shorturl/stats/:code", get(handlers::api::code_stats))
        .route("/shorturl/:code", get(handlers::api::lookup))
        .route("/urls", get(handlers::api::list))
        .route("/urls/:id", delete(handlers::api::delete))
        .route("/stats", get(handlers::api::stats));

    Router::new()
        .route("/health", get(|| async { StatusCode::OK }))
        .nest("/api", api_router)
        // Short-link redirect — must come LAST so /api/* takes priority
        .route("/:code", get(handlers::redirect::redirect))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

// ── Entry point ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (ignore error if file is absent — env vars may already be set)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tinylink=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!("Starting tinylink on {}:{}", config.host, config.port);
    tracing::info!("Base URL: {}", config.base_url);

    let storage: Arc<dyn BlobStorage> = match config.storage_backend {
        StorageBackend::Sqlite => {
            let pool = db::connect(&config.database_url).await?;
            Arc::new(db::SqliteStorage::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; records are lost on restart");
            Arc::new(MemoryStorage::new())
        }
    };

    let store = RecordStore::new(storage, config.storage_key.clone(), config.base_url.clone());

    // Fail fast on an unreadable collection rather than on the first request.
    let existing = store.list().await?;
    tracing::info!("Loaded {} record(s) from '{}'", existing.len(), config.storage_key);

    let state = Arc::new(AppState { store });

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
