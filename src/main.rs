//! Skywrapped - a Bluesky "year in review" generator.
//!
//! # API Endpoints
//!
//! - `POST /wrapped` - Compute (or return the cached) summary for an actor/year
//! - `GET /wrapped/{actor}/{year}` - Read back a stored summary
//! - `GET /health` - Health check

use std::env;
use std::net::SocketAddr;

use axum::{Router, routing::get, routing::post};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use skywrapped::api::{AppState, get_wrapped, health_check, post_wrapped};
use skywrapped::bluesky::BlueskyClient;
use skywrapped::storage::Storage;

/// Default port if not specified via environment variable.
const DEFAULT_PORT: u16 = 3000;

/// Default database path if not specified via environment variable.
const DEFAULT_DB_PATH: &str = "sqlite:skywrapped.db?mode=rwc";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing with environment filter
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("skywrapped=info".parse()?))
        .init();

    // Load configuration from environment
    let port: u16 = env::var("SKYWRAPPED_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let db_url =
        env::var("SKYWRAPPED_DATABASE_URL").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());

    // Optional: bookmarks are the one collection that needs authentication
    let access_token = env::var("SKYWRAPPED_ACCESS_TOKEN").ok();

    info!(port, db_url = %db_url, "Starting Skywrapped server");

    // Initialize storage
    let storage = Storage::new(&db_url).await?;
    info!("Database initialized");

    let bluesky = BlueskyClient::new(access_token);

    // Create application state
    let state = AppState { storage, bluesky };

    // Build router
    let app = Router::new()
        .route("/wrapped", post(post_wrapped))
        .route("/wrapped/:actor/:year", get(get_wrapped))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;

    info!(%addr, "Skywrapped is listening");

    axum::serve(listener, app).await?;

    Ok(())
}
