//! Interaction partner aggregation.
//!
//! Every repost, quote, reply, like, and bookmark points at another account;
//! this module folds those into a multiset keyed by exact handle, attaches
//! graph membership flags, and keeps the top partners.

use crate::model::{Actor, Connection, Post};
use crate::wrapped::classify::classify;
use crate::wrapped::rank::TOP_N;

struct InteractionRecord {
    handle: String,
    display_name: String,
    avatar: Option<String>,
    count: u64,
}

/// Rank the accounts the user interacted with during the year.
///
/// Sources, per item: a repost credits the reposted post's author; a quote
/// credits the quoted author; a reply credits the root author when the root
/// resolved; each like and bookmark credits the item's author. The acting
/// user's own handle is excluded entirely. Graph flags come from a linear
/// membership scan over the follows/followers lists, which stay small enough
/// that no index is warranted.
pub fn top_connections(
    user_handle: &str,
    feed: &[Post],
    likes: &[Post],
    bookmarks: &[Post],
    follows: &[Actor],
    followers: &[Actor],
) -> Vec<Connection> {
    let mut records: Vec<InteractionRecord> = Vec::new();

    for post in feed {
        let classification = classify(post);

        if classification.repost {
            credit(&mut records, &post.author, user_handle);
            continue;
        }
        if classification.quote {
            if let Some(quoted) = quoted_author(post) {
                credit(&mut records, quoted, user_handle);
            }
        }
        if classification.reply {
            if let Some(root_author) = &post.reply_root_author {
                credit(&mut records, root_author, user_handle);
            }
        }
    }

    for post in likes.iter().chain(bookmarks) {
        credit(&mut records, &post.author, user_handle);
    }

    records.sort_by(|a, b| b.count.cmp(&a.count));
    records.truncate(TOP_N);

    records
        .into_iter()
        .map(|record| Connection {
            following: follows.iter().any(|actor| actor.handle == record.handle),
            follows_you: followers.iter().any(|actor| actor.handle == record.handle),
            handle: record.handle,
            display_name: record.display_name,
            avatar: record.avatar,
        })
        .collect()
}

fn quoted_author(post: &Post) -> Option<&Actor> {
    match &post.embed {
        crate::model::Embed::Record(Some(author)) => Some(author),
        crate::model::Embed::RecordWithMedia {
            quoted: Some(author),
            ..
        } => Some(author),
        _ => None,
    }
}

fn credit(records: &mut Vec<InteractionRecord>, actor: &Actor, user_handle: &str) {
    // Self-interactions and authors that never resolved carry no partner
    if actor.handle.is_empty() || actor.handle == user_handle {
        return;
    }

    match records
        .iter_mut()
        .find(|record| record.handle == actor.handle)
    {
        Some(record) => record.count += 1,
        None => records.push(InteractionRecord {
            handle: actor.handle.clone(),
            display_name: actor.display_name.clone(),
            avatar: actor.avatar.clone(),
            count: 1,
        }),
    }
}
