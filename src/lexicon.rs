//! Serde types for the slice of the AT Protocol lexicon this service consumes.
//!
//! The Bluesky API leans heavily on `$type`-discriminated unions (embeds,
//! reply references, feed reasons, rich-text facet features). Each union is
//! modeled as an internally tagged enum with an explicit `Unknown` fallback so
//! that an unrecognized variant degrades to "no data" instead of failing the
//! whole aggregation.
//!
//! All counters and secondary fields are optional with defaults: the upstream
//! payloads omit fields freely, and the normalization pass in
//! [`crate::normalize`] is the single place where absence is turned into
//! concrete defaults.

use serde::{Deserialize, Serialize};

/// One item of an author feed: the post plus optional reply context and an
/// optional reason (e.g. "this appears in the feed because it was reposted").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedViewPost {
    pub post: PostView,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<ReplyRefView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<FeedReason>,
}

/// Hydrated view of a single post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub cid: String,
    #[serde(default)]
    pub author: ProfileViewBasic,
    #[serde(default)]
    pub record: RecordValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed: Option<EmbedView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repost_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmark_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexed_at: Option<String>,
}

/// The record body of a post view. Only `app.bsky.feed.post` records carry
/// text, languages, and facets; anything else is opaque to this service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum RecordValue {
    #[serde(rename = "app.bsky.feed.post")]
    Post(PostRecord),
    #[serde(other)]
    #[default]
    Unknown,
}

/// An `app.bsky.feed.post` record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub langs: Vec<String>,
    #[serde(default)]
    pub facets: Vec<Facet>,
}

/// A rich-text annotation over a byte range of the post text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Facet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<ByteSlice>,
    #[serde(default)]
    pub features: Vec<FacetFeature>,
}

/// Byte range of a facet. Start inclusive, end exclusive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ByteSlice {
    pub byte_start: u64,
    pub byte_end: u64,
}

/// What a facet marks the annotated substring as.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum FacetFeature {
    #[serde(rename = "app.bsky.richtext.facet#tag")]
    Tag {
        #[serde(default)]
        tag: String,
    },
    #[serde(rename = "app.bsky.richtext.facet#link")]
    Link {
        #[serde(default)]
        uri: String,
    },
    #[serde(rename = "app.bsky.richtext.facet#mention")]
    Mention {
        #[serde(default)]
        did: String,
    },
    #[serde(other)]
    Unknown,
}

/// Why an item appears in a feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum FeedReason {
    #[serde(rename = "app.bsky.feed.defs#reasonRepost")]
    Repost(ReasonRepost),
    #[serde(other)]
    Unknown,
}

/// Repost attribution: who reposted, and when it was indexed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasonRepost {
    #[serde(default)]
    pub by: ProfileViewBasic,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexed_at: Option<String>,
}

/// Reply context of a feed item, hydrated to post views where possible.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRefView {
    pub root: ReplyRefUnion,
    pub parent: ReplyRefUnion,
}

/// A referenced post in a reply chain: realized, or a placeholder when the
/// post is gone or hidden from the viewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum ReplyRefUnion {
    #[serde(rename = "app.bsky.feed.defs#postView")]
    Post(PostView),
    #[serde(rename = "app.bsky.feed.defs#notFoundPost")]
    NotFound {
        #[serde(default)]
        uri: String,
    },
    #[serde(rename = "app.bsky.feed.defs#blockedPost")]
    Blocked {
        #[serde(default)]
        uri: String,
    },
    #[serde(other)]
    Unknown,
}

/// The embed attached to a post view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum EmbedView {
    #[serde(rename = "app.bsky.embed.images#view")]
    Images(ImagesView),
    #[serde(rename = "app.bsky.embed.record#view")]
    Record(RecordEmbedView),
    #[serde(rename = "app.bsky.embed.recordWithMedia#view")]
    RecordWithMedia(RecordWithMediaView),
    #[serde(other)]
    Unknown,
}

/// A direct image gallery embed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesView {
    #[serde(default)]
    pub images: Vec<ImageView>,
}

/// A single image of a gallery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageView {
    #[serde(default)]
    pub thumb: String,
    #[serde(default)]
    pub fullsize: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<AspectRatio>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: u64,
    pub height: u64,
}

/// A quote embed: wraps the union of what the quoted record resolved to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordEmbedView {
    pub record: EmbeddedRecord,
}

/// What a record embed points at. Only `#viewRecord` is a realized post;
/// the rest are placeholders and never count as quotes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum EmbeddedRecord {
    #[serde(rename = "app.bsky.embed.record#viewRecord")]
    ViewRecord(ViewRecord),
    #[serde(rename = "app.bsky.embed.record#viewNotFound")]
    NotFound {
        #[serde(default)]
        uri: String,
    },
    #[serde(rename = "app.bsky.embed.record#viewBlocked")]
    Blocked {
        #[serde(default)]
        uri: String,
    },
    #[serde(rename = "app.bsky.embed.record#viewDetached")]
    Detached {
        #[serde(default)]
        uri: String,
    },
    #[serde(other)]
    Unknown,
}

/// A realized quoted post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRecord {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub author: ProfileViewBasic,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexed_at: Option<String>,
}

/// The media half of a record-with-media embed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum MediaView {
    #[serde(rename = "app.bsky.embed.images#view")]
    Images(ImagesView),
    #[serde(other)]
    Unknown,
}

/// Quote plus attached media (images, external link card, video, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordWithMediaView {
    pub record: RecordEmbedView,
    pub media: MediaView,
}

/// Compact actor reference as it appears on posts and in reply chains.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileViewBasic {
    #[serde(default)]
    pub did: String,
    #[serde(default)]
    pub handle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Actor reference as returned by the graph endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    #[serde(default)]
    pub did: String,
    #[serde(default)]
    pub handle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Full profile as returned by `app.bsky.actor.getProfile`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileViewDetailed {
    #[serde(default)]
    pub did: String,
    #[serde(default)]
    pub handle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follows_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexed_at: Option<String>,
}

/// One saved bookmark from `app.bsky.bookmark.getBookmarks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkView {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    pub item: BookmarkItem,
}

/// The bookmarked item. Bookmarks on deleted/blocked posts hydrate to
/// placeholder shapes which this service skips.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum BookmarkItem {
    #[serde(rename = "app.bsky.feed.defs#postView")]
    Post(PostView),
    #[serde(other)]
    Unknown,
}

// ============================================================================
// Response envelopes
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorFeedResponse {
    #[serde(default)]
    pub feed: Vec<FeedViewPost>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowersResponse {
    #[serde(default)]
    pub followers: Vec<ProfileView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowsResponse {
    #[serde(default)]
    pub follows: Vec<ProfileView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmarksResponse {
    #[serde(default)]
    pub bookmarks: Vec<BookmarkView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn feed_item_with_repost_reason() {
        let item: FeedViewPost = serde_json::from_value(json!({
            "post": {
                "uri": "at://did:plc:abc/app.bsky.feed.post/3kxyz",
                "cid": "bafy...",
                "author": {"did": "did:plc:other", "handle": "other.bsky.social"},
                "record": {"$type": "app.bsky.feed.post", "text": "hello"},
                "likeCount": 3,
                "indexedAt": "2025-06-01T12:00:00.000Z"
            },
            "reason": {
                "$type": "app.bsky.feed.defs#reasonRepost",
                "by": {"did": "did:plc:me", "handle": "me.bsky.social"},
                "indexedAt": "2025-06-02T08:00:00.000Z"
            }
        }))
        .unwrap();

        assert!(matches!(item.reason, Some(FeedReason::Repost(_))));
        assert_eq!(item.post.like_count, Some(3));
        match item.post.record {
            RecordValue::Post(record) => assert_eq!(record.text, "hello"),
            RecordValue::Unknown => panic!("expected a post record"),
        }
    }

    #[test]
    fn unknown_record_type_degrades() {
        let item: PostView = serde_json::from_value(json!({
            "uri": "at://did:plc:abc/app.bsky.feed.generator/aaaa",
            "record": {"$type": "app.bsky.feed.generator", "displayName": "a feed"}
        }))
        .unwrap();

        assert!(matches!(item.record, RecordValue::Unknown));
    }

    #[test]
    fn image_embed_round_trips() {
        let embed: EmbedView = serde_json::from_value(json!({
            "$type": "app.bsky.embed.images#view",
            "images": [{
                "thumb": "https://cdn.example/thumb.jpg",
                "fullsize": "https://cdn.example/full.jpg",
                "alt": "a cat",
                "aspectRatio": {"width": 1600, "height": 900}
            }]
        }))
        .unwrap();

        match embed {
            EmbedView::Images(view) => {
                assert_eq!(view.images.len(), 1);
                assert_eq!(view.images[0].alt, "a cat");
                assert_eq!(
                    view.images[0].aspect_ratio,
                    Some(AspectRatio {
                        width: 1600,
                        height: 900
                    })
                );
            }
            _ => panic!("expected an images embed"),
        }
    }

    #[test]
    fn record_embed_placeholders_are_not_view_records() {
        let embed: EmbedView = serde_json::from_value(json!({
            "$type": "app.bsky.embed.record#view",
            "record": {
                "$type": "app.bsky.embed.record#viewNotFound",
                "uri": "at://did:plc:gone/app.bsky.feed.post/dead",
                "notFound": true
            }
        }))
        .unwrap();

        match embed {
            EmbedView::Record(view) => {
                assert!(matches!(view.record, EmbeddedRecord::NotFound { .. }))
            }
            _ => panic!("expected a record embed"),
        }
    }

    #[test]
    fn unrecognized_embed_maps_to_unknown() {
        let embed: EmbedView = serde_json::from_value(json!({
            "$type": "app.bsky.embed.external#view",
            "external": {"uri": "https://example.com", "title": "t", "description": "d"}
        }))
        .unwrap();

        assert!(matches!(embed, EmbedView::Unknown));
    }

    #[test]
    fn facet_tag_feature() {
        let facet: Facet = serde_json::from_value(json!({
            "index": {"byteStart": 0, "byteEnd": 5},
            "features": [{"$type": "app.bsky.richtext.facet#tag", "tag": "RustLang"}]
        }))
        .unwrap();

        match &facet.features[0] {
            FacetFeature::Tag { tag } => assert_eq!(tag, "RustLang"),
            _ => panic!("expected a tag feature"),
        }
    }

    #[test]
    fn bookmark_on_deleted_post_is_unknown() {
        let bookmark: BookmarkView = serde_json::from_value(json!({
            "createdAt": "2025-03-01T00:00:00.000Z",
            "item": {
                "$type": "app.bsky.feed.defs#notFoundPost",
                "uri": "at://did:plc:gone/app.bsky.feed.post/dead",
                "notFound": true
            }
        }))
        .unwrap();

        assert!(matches!(bookmark.item, BookmarkItem::Unknown));
    }
}
