mod careers;
mod chat;
mod config;
mod errors;
mod jobs;
mod llm_client;
mod models;
mod roadmap;
mod routes;
mod state;
mod store;
mod templates;
mod wizard;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::chat::ChatSessions;
use crate::config::Config;
use crate::jobs::StaticJobBoard;
use crate::llm_client::AnthropicClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{ProfileStore, RedisStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting PathFinder API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the profile store (Redis-backed)
    let redis = redis::Client::open(config.redis_url.clone())?;
    let store = ProfileStore::new(Arc::new(RedisStore::new(redis)));
    info!("Profile store initialized");

    // Initialize LLM client
    let llm = Arc::new(AnthropicClient::new(config.anthropic_api_key.clone()));
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Job-listing source — static mock table; swap for a real job-board
    // integration without touching the tool contract.
    let jobs = Arc::new(StaticJobBoard);

    // Build app state
    let state = AppState {
        store,
        llm,
        jobs,
        chats: ChatSessions::default(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
