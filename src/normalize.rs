//! Normalization of raw lexicon payloads into the internal model.
//!
//! The upstream API scatters optionality everywhere: counters that may be
//! absent, display names that may be missing, unions that may not resolve.
//! This module is the one place where all of that is flattened, so every
//! reducer in [`crate::wrapped`] can assume concrete numbers and strings.

use crate::lexicon;
use crate::model::{
    Actor, Embed, EmbeddedImage, FacetAnnotation, Post, Profile, RecordBody, WrappedError,
};

/// Validate and normalize the acting user's profile.
///
/// This is the aggregation core's only loud failure: without a did and a
/// handle the output record cannot be keyed or rendered, so an empty
/// identity field fails the whole call.
pub fn profile(view: &lexicon::ProfileViewDetailed) -> Result<Profile, WrappedError> {
    if view.did.is_empty() {
        return Err(WrappedError::InvalidProfile("did"));
    }
    if view.handle.is_empty() {
        return Err(WrappedError::InvalidProfile("handle"));
    }

    Ok(Profile {
        did: view.did.clone(),
        handle: view.handle.clone(),
        display_name: view
            .display_name
            .clone()
            .unwrap_or_else(|| view.handle.clone()),
        followers: view.followers_count.unwrap_or(0),
        follows: view.follows_count.unwrap_or(0),
        created_at: view.created_at.clone(),
        indexed_at: view.indexed_at.clone(),
    })
}

/// Normalize a compact actor reference from a post or reply chain.
pub fn actor_basic(view: &lexicon::ProfileViewBasic) -> Actor {
    Actor {
        did: view.did.clone(),
        handle: view.handle.clone(),
        display_name: view
            .display_name
            .clone()
            .unwrap_or_else(|| view.handle.clone()),
        avatar: view.avatar.clone(),
    }
}

/// Normalize an actor reference from the graph endpoints.
pub fn actor(view: &lexicon::ProfileView) -> Actor {
    Actor {
        did: view.did.clone(),
        handle: view.handle.clone(),
        display_name: view
            .display_name
            .clone()
            .unwrap_or_else(|| view.handle.clone()),
        avatar: view.avatar.clone(),
    }
}

/// Normalize one author-feed item, including its reply and repost context.
pub fn feed_item(item: &lexicon::FeedViewPost) -> Post {
    let mut post = post_view(&item.post);

    post.is_repost = matches!(item.reason, Some(lexicon::FeedReason::Repost(_)));
    if let Some(reply) = &item.reply {
        post.has_reply = true;
        post.reply_root_author = match &reply.root {
            lexicon::ReplyRefUnion::Post(root) => Some(actor_basic(&root.author)),
            _ => None,
        };
    }

    post
}

/// Normalize a bare post view, as returned for likes and bookmarks.
pub fn post_view(view: &lexicon::PostView) -> Post {
    let (record, created_at) = match &view.record {
        lexicon::RecordValue::Post(record) => (
            RecordBody::Post {
                text: record.text.clone(),
                langs: record.langs.clone(),
                facets: facet_annotations(&record.facets),
            },
            record.created_at.clone(),
        ),
        lexicon::RecordValue::Unknown => (RecordBody::Other, None),
    };

    Post {
        uri: view.uri.clone(),
        author: actor_basic(&view.author),
        record,
        embed: embed(view.embed.as_ref()),
        is_repost: false,
        has_reply: false,
        reply_root_author: None,
        reply_count: view.reply_count.unwrap_or(0),
        repost_count: view.repost_count.unwrap_or(0),
        quote_count: view.quote_count.unwrap_or(0),
        like_count: view.like_count.unwrap_or(0),
        bookmark_count: view.bookmark_count.unwrap_or(0),
        created_at,
        indexed_at: view.indexed_at.clone(),
    }
}

/// Normalize a bookmark. Bookmarks whose item did not hydrate to a post view
/// are dropped here, matching the upstream conversion to the common shape.
pub fn bookmark(view: &lexicon::BookmarkView) -> Option<Post> {
    match &view.item {
        lexicon::BookmarkItem::Post(post) => Some(post_view(post)),
        lexicon::BookmarkItem::Unknown => None,
    }
}

fn facet_annotations(facets: &[lexicon::Facet]) -> Vec<FacetAnnotation> {
    facets
        .iter()
        .flat_map(|facet| facet.features.iter())
        .map(|feature| match feature {
            lexicon::FacetFeature::Tag { tag } => FacetAnnotation::Tag(tag.clone()),
            _ => FacetAnnotation::Other,
        })
        .collect()
}

fn embed(view: Option<&lexicon::EmbedView>) -> Embed {
    match view {
        None => Embed::None,
        Some(lexicon::EmbedView::Images(gallery)) => Embed::Images(images(gallery)),
        Some(lexicon::EmbedView::Record(record)) => Embed::Record(quoted_author(&record.record)),
        Some(lexicon::EmbedView::RecordWithMedia(combo)) => Embed::RecordWithMedia {
            quoted: quoted_author(&combo.record.record),
            media: match &combo.media {
                lexicon::MediaView::Images(gallery) => Some(images(gallery)),
                lexicon::MediaView::Unknown => None,
            },
        },
        Some(lexicon::EmbedView::Unknown) => Embed::Other,
    }
}

fn quoted_author(record: &lexicon::EmbeddedRecord) -> Option<Actor> {
    match record {
        lexicon::EmbeddedRecord::ViewRecord(view) => Some(actor_basic(&view.author)),
        _ => None,
    }
}

fn images(gallery: &lexicon::ImagesView) -> Vec<EmbeddedImage> {
    gallery
        .images
        .iter()
        .map(|image| EmbeddedImage {
            thumb: image.thumb.clone(),
            alt: image.alt.clone(),
            aspect_ratio: image.aspect_ratio.map(|ratio| (ratio.width, ratio.height)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn profile_requires_did_and_handle() {
        let view = lexicon::ProfileViewDetailed {
            did: String::new(),
            handle: "me.bsky.social".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            profile(&view),
            Err(WrappedError::InvalidProfile("did"))
        ));

        let view = lexicon::ProfileViewDetailed {
            did: "did:plc:abc".to_string(),
            handle: String::new(),
            ..Default::default()
        };
        assert!(matches!(
            profile(&view),
            Err(WrappedError::InvalidProfile("handle"))
        ));
    }

    #[test]
    fn profile_defaults_counts_and_display_name() {
        let view = lexicon::ProfileViewDetailed {
            did: "did:plc:abc".to_string(),
            handle: "me.bsky.social".to_string(),
            ..Default::default()
        };

        let normalized = profile(&view).unwrap();
        assert_eq!(normalized.display_name, "me.bsky.social");
        assert_eq!(normalized.followers, 0);
        assert_eq!(normalized.follows, 0);
    }

    #[test]
    fn feed_item_marks_repost_and_reply() {
        let item: lexicon::FeedViewPost = serde_json::from_value(json!({
            "post": {
                "uri": "at://did:plc:a/app.bsky.feed.post/1",
                "author": {"did": "did:plc:a", "handle": "a.bsky.social"},
                "record": {"$type": "app.bsky.feed.post", "text": "hi", "createdAt": "2025-01-05T10:00:00.000Z"},
                "indexedAt": "2025-01-05T10:00:01.000Z"
            },
            "reply": {
                "root": {
                    "$type": "app.bsky.feed.defs#postView",
                    "uri": "at://did:plc:r/app.bsky.feed.post/root",
                    "author": {"did": "did:plc:r", "handle": "root.bsky.social"},
                    "record": {"$type": "app.bsky.feed.post", "text": "root"}
                },
                "parent": {
                    "$type": "app.bsky.feed.defs#notFoundPost",
                    "uri": "at://did:plc:p/app.bsky.feed.post/parent",
                    "notFound": true
                }
            },
            "reason": {
                "$type": "app.bsky.feed.defs#reasonRepost",
                "by": {"did": "did:plc:me", "handle": "me.bsky.social"}
            }
        }))
        .unwrap();

        let post = feed_item(&item);
        assert!(post.is_repost);
        assert!(post.has_reply);
        assert_eq!(
            post.reply_root_author.as_ref().map(|a| a.handle.as_str()),
            Some("root.bsky.social")
        );
        assert_eq!(post.created_at.as_deref(), Some("2025-01-05T10:00:00.000Z"));
    }

    #[test]
    fn unresolved_reply_root_keeps_reply_flag() {
        let item: lexicon::FeedViewPost = serde_json::from_value(json!({
            "post": {
                "uri": "at://did:plc:a/app.bsky.feed.post/1",
                "author": {"did": "did:plc:a", "handle": "a.bsky.social"},
                "record": {"$type": "app.bsky.feed.post", "text": "hi"}
            },
            "reply": {
                "root": {"$type": "app.bsky.feed.defs#blockedPost", "uri": "at://x", "blocked": true},
                "parent": {"$type": "app.bsky.feed.defs#blockedPost", "uri": "at://x", "blocked": true}
            }
        }))
        .unwrap();

        let post = feed_item(&item);
        assert!(post.has_reply);
        assert!(post.reply_root_author.is_none());
    }

    #[test]
    fn counters_default_to_zero() {
        let view: lexicon::PostView = serde_json::from_value(json!({
            "uri": "at://did:plc:a/app.bsky.feed.post/1",
            "author": {"did": "did:plc:a", "handle": "a.bsky.social"},
            "record": {"$type": "app.bsky.feed.post", "text": ""}
        }))
        .unwrap();

        let post = post_view(&view);
        assert_eq!(post.like_count, 0);
        assert_eq!(post.repost_count, 0);
        assert_eq!(post.quote_count, 0);
        assert_eq!(post.reply_count, 0);
        assert_eq!(post.bookmark_count, 0);
    }

    #[test]
    fn placeholder_quote_normalizes_to_unresolved_record() {
        let view: lexicon::PostView = serde_json::from_value(json!({
            "uri": "at://did:plc:a/app.bsky.feed.post/1",
            "author": {"did": "did:plc:a", "handle": "a.bsky.social"},
            "record": {"$type": "app.bsky.feed.post", "text": "q"},
            "embed": {
                "$type": "app.bsky.embed.record#view",
                "record": {"$type": "app.bsky.embed.record#viewBlocked", "uri": "at://x", "blocked": true}
            }
        }))
        .unwrap();

        let post = post_view(&view);
        assert!(matches!(post.embed, Embed::Record(None)));
    }

    #[test]
    fn bookmark_of_non_post_is_dropped() {
        let view: lexicon::BookmarkView = serde_json::from_value(json!({
            "createdAt": "2025-04-01T00:00:00.000Z",
            "item": {"$type": "app.bsky.feed.defs#notFoundPost", "uri": "at://x", "notFound": true}
        }))
        .unwrap();

        assert!(bookmark(&view).is_none());
    }
}
