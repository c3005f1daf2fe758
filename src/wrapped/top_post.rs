//! Tournament selection of the year's best post.

use crate::model::{ImageAspectRatio, Post, TopPost, TopPostImage};
use crate::wrapped::{classify, extract};

/// Pick the highest-scoring eligible post.
///
/// Reposts and quote posts are skipped entirely; among the rest, the score
/// is likes + reposts + quotes, and replacement requires a strict increase,
/// so the first-encountered post wins ties.
pub fn select(feed: &[Post]) -> Option<&Post> {
    let mut best: Option<(&Post, u64)> = None;

    for post in feed {
        let classification = classify::classify(post);
        if classification.repost || classification.quote {
            continue;
        }

        let score = post.like_count + post.repost_count + post.quote_count;
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((post, score)),
        }
    }

    best.map(|(post, _)| post)
}

/// Render the selected post into the output shape, rewriting the at:// URI
/// into a public bsky.app permalink.
pub fn to_top_post(post: &Post) -> TopPost {
    TopPost {
        link: public_link(&post.uri, &post.author.handle),
        text: extract::text(post).to_string(),
        image: extract::image(post).map(|image| TopPostImage {
            url: image.thumb.clone(),
            alt: image.alt.clone(),
            aspect_ratio: image
                .aspect_ratio
                .map(|(width, height)| ImageAspectRatio { width, height }),
        }),
        likes: post.like_count,
        reposts: post.repost_count + post.quote_count,
    }
}

/// Rewrite `at://<authority>/app.bsky.feed.post/<rkey>` into
/// `https://bsky.app/profile/<handle>/post/<rkey>`. A URI that does not
/// match the expected shape is passed through untouched.
fn public_link(uri: &str, handle: &str) -> String {
    let Some(rest) = uri.strip_prefix("at://") else {
        return uri.to_string();
    };

    let mut segments = rest.splitn(3, '/');
    let _authority = segments.next();
    let collection = segments.next();
    let rkey = segments.next();

    match (collection, rkey) {
        (Some("app.bsky.feed.post"), Some(rkey)) if !rkey.is_empty() => {
            format!("https://bsky.app/profile/{handle}/post/{rkey}")
        }
        _ => uri.to_string(),
    }
}
