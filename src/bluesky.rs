//! Client for the Bluesky XRPC API.
//!
//! All list endpoints use cursor pagination: each page carries an opaque
//! token for the next. Author feeds and likes come back newest-first, so the
//! year-scoped fetchers stop paging as soon as an item from a previous year
//! shows up instead of walking the whole history.
//!
//! The client talks to the public AppView by default. Bookmarks require an
//! authenticated session, so that endpoint needs an access token.

use anyhow::bail;
use chrono::{DateTime, Datelike};
use serde::de::DeserializeOwned;

use crate::lexicon::{
    AuthorFeedResponse, BookmarkView, BookmarksResponse, FeedViewPost, FollowersResponse,
    FollowsResponse, ProfileView, ProfileViewDetailed,
};

/// Base URL for the public Bluesky AppView.
const BSKY_API_BASE: &str = "https://public.api.bsky.app/xrpc";

/// Page size for all list endpoints.
const PAGE_LIMIT: u32 = 100;

/// Client for the Bluesky XRPC endpoints this service consumes.
#[derive(Clone)]
pub struct BlueskyClient {
    client: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl BlueskyClient {
    /// Create a client against the public AppView. A token is only needed
    /// for the bookmark endpoint.
    pub fn new(access_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: BSKY_API_BASE.to_string(),
            access_token,
        }
    }

    /// Create a client with a custom base URL (for testing).
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.to_string(),
            access_token: None,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path_and_query: &str) -> anyhow::Result<T> {
        let url = format!("{}/{}", self.base_url, path_and_query);

        let mut request = self.client.get(&url);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?.error_for_status()?;
        Ok(response.json::<T>().await?)
    }

    /// Fetch the full profile for a handle or did.
    pub async fn get_profile(&self, actor: &str) -> anyhow::Result<ProfileViewDetailed> {
        self.get_json(&format!(
            "app.bsky.actor.getProfile?actor={}",
            urlencoding::encode(actor)
        ))
        .await
    }

    /// Fetch every follower of the actor.
    pub async fn get_followers(&self, actor: &str) -> anyhow::Result<Vec<ProfileView>> {
        let mut followers = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut query = format!(
                "app.bsky.graph.getFollowers?actor={}&limit={}",
                urlencoding::encode(actor),
                PAGE_LIMIT
            );
            if let Some(cursor) = &cursor {
                query.push_str(&format!("&cursor={}", urlencoding::encode(cursor)));
            }

            let page: FollowersResponse = self.get_json(&query).await?;
            followers.extend(page.followers);

            cursor = page.cursor;
            if cursor.is_none() {
                return Ok(followers);
            }
        }
    }

    /// Fetch every account the actor follows.
    pub async fn get_follows(&self, actor: &str) -> anyhow::Result<Vec<ProfileView>> {
        let mut follows = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut query = format!(
                "app.bsky.graph.getFollows?actor={}&limit={}",
                urlencoding::encode(actor),
                PAGE_LIMIT
            );
            if let Some(cursor) = &cursor {
                query.push_str(&format!("&cursor={}", urlencoding::encode(cursor)));
            }

            let page: FollowsResponse = self.get_json(&query).await?;
            follows.extend(page.follows);

            cursor = page.cursor;
            if cursor.is_none() {
                return Ok(follows);
            }
        }
    }

    /// Fetch the actor's feed items for one year, newest-first pagination
    /// with the previous-year cutoff.
    pub async fn get_feed_by_year(
        &self,
        actor: &str,
        year: i32,
    ) -> anyhow::Result<Vec<FeedViewPost>> {
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut query = format!(
                "app.bsky.feed.getAuthorFeed?actor={}&limit={}",
                urlencoding::encode(actor),
                PAGE_LIMIT
            );
            if let Some(cursor) = &cursor {
                query.push_str(&format!("&cursor={}", urlencoding::encode(cursor)));
            }

            let page: AuthorFeedResponse = self.get_json(&query).await?;
            if page.feed.is_empty() {
                return Ok(items);
            }

            let (kept, reached_previous_year) =
                take_year_items(page.feed, year, feed_item_year);
            items.extend(kept);

            if reached_previous_year {
                return Ok(items);
            }

            cursor = page.cursor;
            if cursor.is_none() {
                return Ok(items);
            }
        }
    }

    /// Fetch the actor's likes for one year, with the same cutoff as the feed.
    pub async fn get_likes_by_year(
        &self,
        actor: &str,
        year: i32,
    ) -> anyhow::Result<Vec<FeedViewPost>> {
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut query = format!(
                "app.bsky.feed.getActorLikes?actor={}&limit={}",
                urlencoding::encode(actor),
                PAGE_LIMIT
            );
            if let Some(cursor) = &cursor {
                query.push_str(&format!("&cursor={}", urlencoding::encode(cursor)));
            }

            let page: AuthorFeedResponse = self.get_json(&query).await?;
            if page.feed.is_empty() {
                return Ok(items);
            }

            let (kept, reached_previous_year) =
                take_year_items(page.feed, year, feed_item_year);
            items.extend(kept);

            if reached_previous_year {
                return Ok(items);
            }

            cursor = page.cursor;
            if cursor.is_none() {
                return Ok(items);
            }
        }
    }

    /// Fetch the session user's bookmarks for one year. The endpoint is
    /// scoped to the authenticated account, so it takes no actor parameter
    /// and fails without a token.
    pub async fn get_bookmarks_by_year(&self, year: i32) -> anyhow::Result<Vec<BookmarkView>> {
        if self.access_token.is_none() {
            bail!("bookmark endpoint requires an access token");
        }

        let mut items = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut query = format!("app.bsky.bookmark.getBookmarks?limit={}", PAGE_LIMIT);
            if let Some(cursor) = &cursor {
                query.push_str(&format!("&cursor={}", urlencoding::encode(cursor)));
            }

            let page: BookmarksResponse = self.get_json(&query).await?;
            if page.bookmarks.is_empty() {
                return Ok(items);
            }

            let (kept, reached_previous_year) =
                take_year_items(page.bookmarks, year, bookmark_year);
            items.extend(kept);

            if reached_previous_year {
                return Ok(items);
            }

            cursor = page.cursor;
            if cursor.is_none() {
                return Ok(items);
            }
        }
    }
}

/// Walk one newest-first page in order: keep target-year items, skip items
/// whose year is newer or unparsable, and stop the scan (and pagination) at
/// the first item from a previous year.
fn take_year_items<T>(
    page: Vec<T>,
    year: i32,
    item_year: impl Fn(&T) -> Option<i32>,
) -> (Vec<T>, bool) {
    let mut kept = Vec::new();

    for item in page {
        match item_year(&item) {
            Some(item_year) if item_year < year => return (kept, true),
            Some(item_year) if item_year == year => kept.push(item),
            _ => {}
        }
    }

    (kept, false)
}

fn feed_item_year(item: &FeedViewPost) -> Option<i32> {
    timestamp_year(item.post.indexed_at.as_deref()?)
}

fn bookmark_year(bookmark: &BookmarkView) -> Option<i32> {
    timestamp_year(bookmark.created_at.as_deref()?)
}

fn timestamp_year(value: &str) -> Option<i32> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|parsed| parsed.year())
}
