//! Integration tests for Skywrapped API endpoints.
//!
//! These tests verify the full request/response cycle through the HTTP API.
//! The Bluesky client points at an unreachable address, so every passing path
//! here is served from storage alone.

use axum::{Router, routing::get, routing::post};
use axum_test::TestServer;
use chrono::{Datelike, Utc};
use serde_json::json;

// Import from the skywrapped crate
use skywrapped::api::{AppState, get_wrapped, health_check, post_wrapped};
use skywrapped::bluesky::BlueskyClient;
use skywrapped::model::{
    BestTime, CurrentStats, EmojiStats, Engagement, Wrapped, YearActivity,
};
use skywrapped::storage::Storage;

async fn create_test_server() -> (TestServer, Storage) {
    let storage = Storage::new("sqlite::memory:").await.unwrap();
    let state = AppState {
        storage: storage.clone(),
        // Nothing is listening here; network paths must fail fast
        bluesky: BlueskyClient::with_base_url("http://localhost:1"),
    };

    let app = Router::new()
        .route("/wrapped", post(post_wrapped))
        .route("/wrapped/:actor/:year", get(get_wrapped))
        .route("/health", get(health_check))
        .with_state(state);

    (TestServer::new(app).unwrap(), storage)
}

fn sample_wrapped(did: &str, handle: &str, year: i32, computed_at: i64) -> Wrapped {
    Wrapped {
        created_at: computed_at,
        did: did.to_string(),
        handle: handle.to_string(),
        year,
        display_name: "Sample".to_string(),
        current: CurrentStats {
            posts: 42,
            following: 10,
            followers: 20,
            account_age: 1.5,
        },
        year_activity: YearActivity {
            posts: 30,
            replies: 8,
            reposts: 4,
            quotes: 2,
            likes: 100,
            bookmarks: 5,
        },
        best_time: BestTime {
            most_active_day: 3,
            peak_posting_hour: 21,
            average_posts_per_day: 0.1,
        },
        engagement: Engagement {
            replies: 12,
            reposts: 6,
            quotes: 2,
            likes: 250,
            bookmarks: 3,
        },
        top_post: None,
        languages: vec![],
        hashtags: vec![],
        emojis: EmojiStats {
            champions: vec![],
            total: 0,
        },
        connections: vec![],
    }
}

#[tokio::test]
async fn test_health_endpoint() {
    let (server, _storage) = create_test_server().await;

    let response = server.get("/health").await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_get_unknown_summary_is_not_found() {
    let (server, _storage) = create_test_server().await;

    let response = server.get("/wrapped/nobody.bsky.social/2025").await;

    response.assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_stored_summary_by_handle_and_did() {
    let (server, storage) = create_test_server().await;

    storage
        .upsert_wrapped(&sample_wrapped("did:plc:abc", "me.bsky.social", 2025, 1000))
        .await
        .unwrap();

    let response = server.get("/wrapped/me.bsky.social/2025").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["did"], "did:plc:abc");
    assert_eq!(body["yearActivity"]["posts"], 30);

    let response = server.get("/wrapped/did:plc:abc/2025").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["handle"], "me.bsky.social");
}

#[tokio::test]
async fn test_stored_summary_is_scoped_to_its_year() {
    let (server, storage) = create_test_server().await;

    storage
        .upsert_wrapped(&sample_wrapped("did:plc:abc", "me.bsky.social", 2024, 1000))
        .await
        .unwrap();

    let response = server.get("/wrapped/me.bsky.social/2025").await;

    response.assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_post_returns_fresh_cached_summary_without_network() {
    let (server, storage) = create_test_server().await;

    // Computed just now, well inside the freshness window
    let computed_at = Utc::now().timestamp_millis();
    storage
        .upsert_wrapped(&sample_wrapped(
            "did:plc:abc",
            "me.bsky.social",
            2025,
            computed_at,
        ))
        .await
        .unwrap();

    let response = server
        .post("/wrapped")
        .json(&json!({
            "actor": "me.bsky.social",
            "year": 2025
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["did"], "did:plc:abc");
    assert_eq!(body["createdAt"], computed_at);
}

#[tokio::test]
async fn test_post_recomputes_stale_summary() {
    let (server, storage) = create_test_server().await;

    // Two days old: outside the freshness window, so the handler goes back
    // to the (unreachable) API and reports the upstream failure
    let computed_at = Utc::now().timestamp_millis() - 2 * 24 * 60 * 60 * 1000;
    storage
        .upsert_wrapped(&sample_wrapped(
            "did:plc:abc",
            "me.bsky.social",
            2025,
            computed_at,
        ))
        .await
        .unwrap();

    let response = server
        .post("/wrapped")
        .json(&json!({
            "actor": "me.bsky.social",
            "year": 2025
        }))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_post_rejects_future_year() {
    let (server, _storage) = create_test_server().await;

    let response = server
        .post("/wrapped")
        .json(&json!({
            "actor": "me.bsky.social",
            "year": Utc::now().year() + 1
        }))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_post_rejects_empty_actor() {
    let (server, _storage) = create_test_server().await;

    let response = server
        .post("/wrapped")
        .json(&json!({
            "actor": "",
            "year": 2025
        }))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_post_with_unreachable_api_is_bad_gateway() {
    let (server, _storage) = create_test_server().await;

    let response = server
        .post("/wrapped")
        .json(&json!({
            "actor": "me.bsky.social",
            "year": 2025
        }))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_GATEWAY);
}
