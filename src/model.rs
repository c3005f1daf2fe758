//! Data models for Skywrapped.
//!
//! Two families live here:
//!
//! - The **normalized internal model** ([`Post`], [`Actor`], [`Profile`]):
//!   what the reducers in [`crate::wrapped`] operate on. Every numeric field
//!   is concrete (absent-means-zero already applied) and every string field
//!   is non-optional where the upstream payload merely *tends* to omit it.
//!   The conversion from the raw lexicon shapes happens once, in
//!   [`crate::normalize`], so no reducer ever touches an `Option<u64>`.
//!
//! - The **output record** ([`Wrapped`] and its sections): the immutable
//!   summary produced by one aggregation call, serialized as camelCase JSON
//!   for storage and for the presentation layers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures the aggregation core can surface.
///
/// Extractors degrade to empty defaults on malformed optional data; the only
/// loud failure is a profile that cannot identify the account at all, since
/// the output record cannot be constructed without did and handle.
#[derive(Debug, Error)]
pub enum WrappedError {
    #[error("profile is missing a required identity field: {0}")]
    InvalidProfile(&'static str),
}

// ============================================================================
// Normalized internal model
// ============================================================================

/// A fully-defaulted account reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub did: String,
    pub handle: String,
    /// Falls back to the handle when the profile declares no display name.
    pub display_name: String,
    pub avatar: Option<String>,
}

/// The record body of a post, reduced to what the extractors need.
#[derive(Debug, Clone)]
pub enum RecordBody {
    /// A recognized `app.bsky.feed.post` record.
    Post {
        text: String,
        langs: Vec<String>,
        facets: Vec<FacetAnnotation>,
    },
    /// Any other record type. Carries nothing; extractors yield no data.
    Other,
}

/// One rich-text feature surviving normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacetAnnotation {
    /// A `#tag` feature with its literal tag string, casing preserved.
    Tag(String),
    /// Links, mentions, and anything unrecognized.
    Other,
}

/// The embed attached to a post, with placeholder quotes already collapsed.
#[derive(Debug, Clone)]
pub enum Embed {
    None,
    /// Direct image gallery.
    Images(Vec<EmbeddedImage>),
    /// Quote of another record. `Some(author)` only when the quoted record is
    /// a realized post view; not-found/blocked/detached placeholders are
    /// `None` and never classify as quotes.
    Record(Option<Actor>),
    /// Quote plus attached media.
    RecordWithMedia {
        quoted: Option<Actor>,
        media: Option<Vec<EmbeddedImage>>,
    },
    /// Unrecognized embed shape.
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub thumb: String,
    pub alt: String,
    pub aspect_ratio: Option<(u64, u64)>,
}

/// A feed/like/bookmark item after normalization.
#[derive(Debug, Clone)]
pub struct Post {
    pub uri: String,
    pub author: Actor,
    pub record: RecordBody,
    pub embed: Embed,
    /// The item carried a repost reason marker.
    pub is_repost: bool,
    /// The item carried reply context, whether or not the root resolved.
    pub has_reply: bool,
    /// Author of the reply root, when the root hydrated to a real post view.
    pub reply_root_author: Option<Actor>,
    pub reply_count: u64,
    pub repost_count: u64,
    pub quote_count: u64,
    pub like_count: u64,
    pub bookmark_count: u64,
    /// Raw timestamp strings; resolution to an instant is the job of
    /// [`crate::wrapped::timestamp`], which tolerates absence and garbage.
    pub created_at: Option<String>,
    pub indexed_at: Option<String>,
}

/// The acting user's profile after normalization and identity validation.
#[derive(Debug, Clone)]
pub struct Profile {
    pub did: String,
    pub handle: String,
    pub display_name: String,
    pub followers: u64,
    pub follows: u64,
    pub created_at: Option<String>,
    pub indexed_at: Option<String>,
}

// ============================================================================
// Output record
// ============================================================================

/// The year-in-review summary for one user and one year.
///
/// Constructed once per aggregation call and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wrapped {
    /// When this record was computed, as epoch milliseconds. Drives the
    /// 24-hour freshness policy in the API layer.
    pub created_at: i64,
    pub did: String,
    pub handle: String,
    pub year: i32,
    pub display_name: String,
    pub current: CurrentStats,
    pub year_activity: YearActivity,
    pub best_time: BestTime,
    pub engagement: Engagement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_post: Option<TopPost>,
    pub languages: Vec<LanguageStat>,
    pub hashtags: Vec<HashtagStat>,
    pub emojis: EmojiStats,
    pub connections: Vec<Connection>,
}

/// Live snapshot of the account at computation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentStats {
    /// Posts in the target year (the full feed, before classification).
    pub posts: u64,
    pub following: u64,
    pub followers: u64,
    /// Account age in years, one decimal, clamped to zero.
    pub account_age: f64,
}

/// Classified activity counts for the year.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearActivity {
    /// Original posts. Signed: a quote that is also a reply decrements this
    /// twice, so heavy quote-reply feeds can drive it negative.
    pub posts: i64,
    pub replies: u64,
    pub reposts: u64,
    pub quotes: u64,
    pub likes: u64,
    pub bookmarks: u64,
}

/// When the user posts most.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestTime {
    /// Weekday index, Sunday = 0.
    pub most_active_day: u32,
    /// Hour of day, 0-23, UTC.
    pub peak_posting_hour: u32,
    pub average_posts_per_day: f64,
}

/// How many of the user's posts drew at least one interaction of each kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Engagement {
    pub replies: u64,
    pub reposts: u64,
    pub quotes: u64,
    pub likes: u64,
    pub bookmarks: u64,
}

/// The highest-scoring original post of the year.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPost {
    /// Public bsky.app permalink.
    pub link: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<TopPostImage>,
    pub likes: u64,
    /// Reposts plus quotes.
    pub reposts: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPostImage {
    pub url: String,
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<ImageAspectRatio>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAspectRatio {
    pub width: u64,
    pub height: u64,
}

/// One declared language, as a share of posts that declared any language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageStat {
    pub code: String,
    pub name: String,
    /// Rounded independently; the column may sum to 100 ± a point or two.
    pub percentage: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashtagStat {
    pub hashtag: String,
    pub count: u64,
}

/// Most-used emojis across the year's original post text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmojiStats {
    pub champions: Vec<EmojiCount>,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmojiCount {
    pub emoji: String,
    pub count: u64,
}

/// A top interaction partner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub handle: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// The acting user follows this account.
    pub following: bool,
    /// This account follows the acting user.
    pub follows_you: bool,
}
