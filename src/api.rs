//! HTTP API handlers.
//!
//! - **POST /wrapped**: compute (or return the cached) summary for an actor
//!   and year. Results are cached for 24 hours; within that window the
//!   stored record is returned without touching the Bluesky API.
//!
//! - **GET /wrapped/{actor}/{year}**: read back a stored summary by did or
//!   handle, for share pages.
//!
//! - **GET /health**: health check.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::bluesky::BlueskyClient;
use crate::model::Wrapped;
use crate::storage::Storage;
use crate::wrapped::{WrappedInput, calculate_wrapped};

/// How long a computed summary stays fresh, in milliseconds.
const FRESHNESS_WINDOW_MS: i64 = 24 * 60 * 60 * 1000;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub storage: Storage,
    pub bluesky: BlueskyClient,
}

/// Request body for POST /wrapped.
#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    /// Handle or did.
    pub actor: String,
    pub year: i32,
}

/// POST /wrapped - Compute or return the cached summary for an actor/year.
#[instrument(skip(state), fields(actor = %request.actor, year = request.year))]
pub async fn post_wrapped(
    State(state): State<AppState>,
    Json(request): Json<CalculateRequest>,
) -> Result<Json<Wrapped>, StatusCode> {
    let now = Utc::now();

    if request.actor.is_empty() || request.year > now.year() {
        return Err(StatusCode::BAD_REQUEST);
    }

    // Freshness policy lives here, not in the aggregation core: skip the
    // whole fetch-and-reduce when a recent record exists.
    match state
        .storage
        .get_computed_at(&request.actor, request.year)
        .await
    {
        Ok(Some(computed_at)) if now.timestamp_millis() - computed_at < FRESHNESS_WINDOW_MS => {
            if let Ok(Some(cached)) = state.storage.get_wrapped(&request.actor, request.year).await
            {
                info!(computed_at, "Returning cached wrapped summary");
                return Ok(Json(cached));
            }
        }
        Ok(_) => {}
        Err(e) => {
            warn!(error = %e, "Failed to check summary freshness");
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    let wrapped = fetch_and_calculate(&state.bluesky, &request.actor, request.year)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to compute wrapped summary");
            StatusCode::BAD_GATEWAY
        })?;

    if let Err(e) = state.storage.upsert_wrapped(&wrapped).await {
        warn!(error = %e, "Failed to store wrapped summary");
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    info!(
        did = %wrapped.did,
        posts = wrapped.current.posts,
        "Wrapped summary computed"
    );
    Ok(Json(wrapped))
}

/// GET /wrapped/{actor}/{year} - Read back a stored summary.
#[instrument(skip(state))]
pub async fn get_wrapped(
    State(state): State<AppState>,
    Path((actor, year)): Path<(String, i32)>,
) -> Result<Json<Wrapped>, StatusCode> {
    match state.storage.get_wrapped(&actor, year).await {
        Ok(Some(wrapped)) => {
            info!(did = %wrapped.did, "Wrapped summary read");
            Ok(Json(wrapped))
        }
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            warn!(error = %e, "Failed to read wrapped summary");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /health - Simple health check endpoint.
pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Page all collections for the target year and run the aggregation.
///
/// Bookmarks are the one authenticated collection; when the configured
/// client cannot fetch them the summary is computed without them.
async fn fetch_and_calculate(
    bluesky: &BlueskyClient,
    actor: &str,
    year: i32,
) -> anyhow::Result<Wrapped> {
    let profile = bluesky.get_profile(actor).await?;

    let followers = bluesky.get_followers(actor).await?;
    let follows = bluesky.get_follows(actor).await?;
    let feed = bluesky.get_feed_by_year(actor, year).await?;
    let likes = bluesky.get_likes_by_year(actor, year).await?;

    let bookmarks = match bluesky.get_bookmarks_by_year(year).await {
        Ok(bookmarks) => bookmarks,
        Err(e) => {
            warn!(error = %e, "Bookmarks unavailable, computing without them");
            Vec::new()
        }
    };

    info!(
        feed = feed.len(),
        likes = likes.len(),
        bookmarks = bookmarks.len(),
        followers = followers.len(),
        follows = follows.len(),
        "Collections fetched"
    );

    let input = WrappedInput {
        year,
        profile,
        followers,
        follows,
        feed,
        likes,
        bookmarks,
    };

    Ok(calculate_wrapped(&input, Utc::now())?)
}
