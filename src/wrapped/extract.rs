//! Content extraction from normalized post bodies and embeds.

use crate::model::{Embed, EmbeddedImage, FacetAnnotation, Post, RecordBody};

/// Collect the literal hashtag strings of a post.
///
/// Only posts whose record is a recognized post type carry facets. Casing is
/// preserved and duplicates are kept; merging happens later in the ranker.
pub fn hashtags(post: &Post) -> Vec<&str> {
    match &post.record {
        RecordBody::Post { facets, .. } => facets
            .iter()
            .filter_map(|annotation| match annotation {
                FacetAnnotation::Tag(tag) => Some(tag.as_str()),
                FacetAnnotation::Other => None,
            })
            .collect(),
        RecordBody::Other => Vec::new(),
    }
}

/// The declared language codes of a post, empty when the record declares
/// none or is not a post record.
pub fn languages(post: &Post) -> &[String] {
    match &post.record {
        RecordBody::Post { langs, .. } => langs,
        RecordBody::Other => &[],
    }
}

/// The text of a post record, empty for non-post records.
pub fn text(post: &Post) -> &str {
    match &post.record {
        RecordBody::Post { text, .. } => text,
        RecordBody::Other => "",
    }
}

/// Pick a representative image for a post.
///
/// A direct image gallery yields its first image; a record-with-media embed
/// whose media half is a gallery yields that gallery's first image. Every
/// other embed shape yields nothing.
pub fn image(post: &Post) -> Option<&EmbeddedImage> {
    match &post.embed {
        Embed::Images(images) => images.first(),
        Embed::RecordWithMedia {
            media: Some(images),
            ..
        } => images.first(),
        _ => None,
    }
}
