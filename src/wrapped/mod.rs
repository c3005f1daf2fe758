//! The year-in-review aggregation engine.
//!
//! Pure computation: one pass per input collection, no I/O, no shared state
//! across invocations. The caller hands over a year's worth of already
//! paginated feed/likes/bookmarks plus profile and graph data, and gets back
//! the assembled [`Wrapped`] record. Running aggregations for different
//! users concurrently is safe by construction; freshness policy and
//! lost-update protection on the stored result belong to the caller.
//!
//! # Modules
//!
//! - [`timestamp`]: sortAt resolution with clock-skew tolerance
//! - [`classify`]: repost / quote / reply / original classification
//! - [`extract`]: hashtag, language, and image extraction
//! - [`histogram`]: day-of-week / hour-of-day activity buckets
//! - [`top_post`]: best-post tournament
//! - [`rank`]: hashtag and language frequency ranking
//! - [`emoji`]: emoji champions
//! - [`connections`]: interaction partner aggregation

pub mod classify;
pub mod connections;
pub mod emoji;
pub mod extract;
pub mod histogram;
pub mod rank;
pub mod timestamp;
pub mod top_post;

use chrono::{DateTime, Utc};

use crate::lexicon;
use crate::model::{
    BestTime, CurrentStats, Engagement, Wrapped, WrappedError, YearActivity,
};
use crate::normalize;

/// Milliseconds per year, using 365.25 days to absorb leap years.
const MS_PER_YEAR: f64 = 365.25 * 24.0 * 60.0 * 60.0 * 1000.0;

/// Everything one aggregation call consumes. All collections are already
/// filtered to the target year by the pagination cutoff in the client.
#[derive(Debug, Clone)]
pub struct WrappedInput {
    pub year: i32,
    pub profile: lexicon::ProfileViewDetailed,
    pub followers: Vec<lexicon::ProfileView>,
    pub follows: Vec<lexicon::ProfileView>,
    pub feed: Vec<lexicon::FeedViewPost>,
    pub likes: Vec<lexicon::FeedViewPost>,
    pub bookmarks: Vec<lexicon::BookmarkView>,
}

/// Reduce one year of activity into the summary record.
///
/// Deterministic for a given input and `now`. The only failure is a profile
/// whose identity fields are unusable; every other malformed or missing
/// field degrades to an empty or zero default inside the extractors.
pub fn calculate_wrapped(
    input: &WrappedInput,
    now: DateTime<Utc>,
) -> Result<Wrapped, WrappedError> {
    let profile = normalize::profile(&input.profile)?;

    let feed: Vec<_> = input.feed.iter().map(normalize::feed_item).collect();
    let likes: Vec<_> = input.likes.iter().map(normalize::feed_item).collect();
    let bookmarks: Vec<_> = input.bookmarks.iter().filter_map(normalize::bookmark).collect();
    let follows: Vec<_> = input.follows.iter().map(normalize::actor).collect();
    let followers: Vec<_> = input.followers.iter().map(normalize::actor).collect();

    // Classification pass. Every repost, quote, or reply takes one away from
    // the running original-post count; a quote that is also a reply takes two.
    let mut original_posts = feed.len() as i64;
    let mut replies: u64 = 0;
    let mut reposts: u64 = 0;
    let mut quotes: u64 = 0;

    for post in &feed {
        let classification = classify::classify(post);
        if classification.repost {
            reposts += 1;
            original_posts -= 1;
            continue;
        }
        if classification.quote {
            quotes += 1;
            original_posts -= 1;
        }
        if classification.reply {
            replies += 1;
            original_posts -= 1;
        }
    }

    let mut engagement = Engagement {
        replies: 0,
        reposts: 0,
        quotes: 0,
        likes: 0,
        bookmarks: 0,
    };
    for post in &feed {
        engagement.replies += u64::from(post.reply_count > 0);
        engagement.reposts += u64::from(post.repost_count > 0);
        engagement.quotes += u64::from(post.quote_count > 0);
        engagement.likes += u64::from(post.like_count > 0);
        engagement.bookmarks += u64::from(post.bookmark_count > 0);
    }

    // Items whose timestamps never resolve are excluded from the histogram
    // rather than bucketed at some arbitrary instant.
    let instants: Vec<_> = feed
        .iter()
        .filter_map(|post| {
            timestamp::resolve_sort_at(post.created_at.as_deref(), post.indexed_at.as_deref(), now)
        })
        .collect();
    let activity = histogram::build(&instants);

    let best_time = BestTime {
        most_active_day: histogram::mode(&activity.day_counts) as u32,
        peak_posting_hour: histogram::mode(&activity.hour_counts) as u32,
        // Fixed 365-day denominator regardless of leap years or partial
        // years; changing it would silently alter all historical output.
        average_posts_per_day: ((feed.len() as f64 / 365.0) * 10.0).round() / 10.0,
    };

    let top_post = top_post::select(&feed).map(top_post::to_top_post);

    let connections = connections::top_connections(
        &profile.handle,
        &feed,
        &likes,
        &bookmarks,
        &follows,
        &followers,
    );

    Ok(Wrapped {
        created_at: now.timestamp_millis(),
        did: profile.did.clone(),
        handle: profile.handle.clone(),
        year: input.year,
        display_name: profile.display_name.clone(),
        current: CurrentStats {
            posts: feed.len() as u64,
            following: profile.follows,
            followers: profile.followers,
            account_age: account_age(&profile, now),
        },
        year_activity: YearActivity {
            posts: original_posts,
            replies,
            reposts,
            quotes,
            likes: likes.len() as u64,
            bookmarks: bookmarks.len() as u64,
        },
        best_time,
        engagement,
        top_post,
        languages: rank::languages(&feed),
        hashtags: rank::hashtags(&feed),
        emojis: emoji::champions(&feed),
        connections,
    })
}

/// Account age in years from the most trustworthy profile timestamp, one
/// decimal, clamped to zero. No usable timestamp means zero.
fn account_age(profile: &crate::model::Profile, now: DateTime<Utc>) -> f64 {
    let Some(created) = timestamp::resolve_sort_at(
        profile.created_at.as_deref(),
        profile.indexed_at.as_deref(),
        now,
    ) else {
        return 0.0;
    };

    let age_years = (now - created).num_milliseconds() as f64 / MS_PER_YEAR;
    ((age_years * 10.0).round() / 10.0).max(0.0)
}
