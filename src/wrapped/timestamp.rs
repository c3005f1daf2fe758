//! Timestamp resolution following the Bluesky "sortAt" guidelines.
//!
//! Records carry a client-declared `createdAt` and a server-assigned
//! `indexedAt`. Client clocks lie, so `createdAt` is only trusted when it is
//! not further in the future than a small skew window; otherwise the server
//! timestamp wins. See <https://docs.bsky.app/docs/advanced-guides/timestamps>.

use chrono::{DateTime, Duration, Utc};

/// Client clock skew tolerated before `createdAt` is considered untrustworthy.
const CLOCK_SKEW_WINDOW: Duration = Duration::minutes(2);

/// Pick the most trustworthy instant out of the two post timestamps.
///
/// `createdAt` wins when it parses and is not more than the skew window past
/// `now`; otherwise `indexedAt` is used. A string that does not parse as
/// RFC 3339 is treated exactly like an absent field, so garbage in one field
/// falls through to the other. Returns `None` when neither is usable.
pub fn resolve_sort_at(
    created_at: Option<&str>,
    indexed_at: Option<&str>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if let Some(created) = created_at.and_then(parse) {
        if created <= now + CLOCK_SKEW_WINDOW {
            return Some(created);
        }
    }

    indexed_at.and_then(parse)
}

fn parse(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}
