//! Classification of feed items into repost / quote / reply / original.
//!
//! The order matters: a repost marker ends classification for the item, so a
//! repost is never also counted as a quote or a reply. Quote and reply are
//! independent of each other and can both apply to the same post.

use crate::model::{Embed, Post};

/// The (non-exclusive) classification of one feed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub repost: bool,
    pub quote: bool,
    pub reply: bool,
}

impl Classification {
    /// A post with no repost, quote, or reply marker.
    pub fn is_original(&self) -> bool {
        !self.repost && !self.quote && !self.reply
    }
}

/// Classify a normalized feed item.
///
/// A quote requires the embedded record to have hydrated to a realized post
/// view; placeholders for deleted, blocked, or detached records do not count.
pub fn classify(post: &Post) -> Classification {
    if post.is_repost {
        return Classification {
            repost: true,
            quote: false,
            reply: false,
        };
    }

    let quote = matches!(
        post.embed,
        Embed::Record(Some(_)) | Embed::RecordWithMedia { quoted: Some(_), .. }
    );

    Classification {
        repost: false,
        quote,
        reply: post.has_reply,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Actor, RecordBody};

    fn actor(handle: &str) -> Actor {
        Actor {
            did: format!("did:plc:{handle}"),
            handle: handle.to_string(),
            display_name: handle.to_string(),
            avatar: None,
        }
    }

    fn post() -> Post {
        Post {
            uri: "at://did:plc:me/app.bsky.feed.post/1".to_string(),
            author: actor("me"),
            record: RecordBody::Post {
                text: String::new(),
                langs: vec![],
                facets: vec![],
            },
            embed: Embed::None,
            is_repost: false,
            has_reply: false,
            reply_root_author: None,
            reply_count: 0,
            repost_count: 0,
            quote_count: 0,
            like_count: 0,
            bookmark_count: 0,
            created_at: None,
            indexed_at: None,
        }
    }

    #[test]
    fn plain_post_is_original() {
        let classification = classify(&post());
        assert!(classification.is_original());
    }

    #[test]
    fn repost_short_circuits_quote_and_reply() {
        let mut item = post();
        item.is_repost = true;
        item.has_reply = true;
        item.embed = Embed::Record(Some(actor("quoted")));

        let classification = classify(&item);
        assert!(classification.repost);
        assert!(!classification.quote);
        assert!(!classification.reply);
    }

    #[test]
    fn realized_record_embed_is_a_quote() {
        let mut item = post();
        item.embed = Embed::Record(Some(actor("quoted")));
        assert!(classify(&item).quote);

        let mut item = post();
        item.embed = Embed::RecordWithMedia {
            quoted: Some(actor("quoted")),
            media: None,
        };
        assert!(classify(&item).quote);
    }

    #[test]
    fn placeholder_record_embed_is_not_a_quote() {
        let mut item = post();
        item.embed = Embed::Record(None);
        assert!(!classify(&item).quote);

        let mut item = post();
        item.embed = Embed::RecordWithMedia {
            quoted: None,
            media: None,
        };
        assert!(!classify(&item).quote);
    }

    #[test]
    fn quote_and_reply_are_independent() {
        let mut item = post();
        item.embed = Embed::Record(Some(actor("quoted")));
        item.has_reply = true;

        let classification = classify(&item);
        assert!(classification.quote);
        assert!(classification.reply);
        assert!(!classification.is_original());
    }

    #[test]
    fn reply_without_resolved_root_still_classifies_as_reply() {
        let mut item = post();
        item.has_reply = true;
        item.reply_root_author = None;

        let classification = classify(&item);
        assert!(classification.reply);
        assert!(!classification.is_original());
    }
}
