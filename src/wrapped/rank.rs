//! Frequency ranking of hashtags and declared languages.

use crate::model::{HashtagStat, LanguageStat, Post};
use crate::wrapped::extract;

/// How many hashtags and connections survive truncation.
pub const TOP_N: usize = 5;

/// Rank hashtags across a feed.
///
/// Matching is case-insensitive but the casing of the first occurrence is
/// what gets displayed. The sort is stable on counts, so ties keep insertion
/// order, and truncation to the top five drops a sixth tag even when its
/// count ties the fifth.
pub fn hashtags(feed: &[Post]) -> Vec<HashtagStat> {
    let mut entries: Vec<HashtagStat> = Vec::new();

    for post in feed {
        for tag in extract::hashtags(post) {
            let key = tag.to_lowercase();
            match entries
                .iter_mut()
                .find(|entry| entry.hashtag.to_lowercase() == key)
            {
                Some(entry) => entry.count += 1,
                None => entries.push(HashtagStat {
                    hashtag: tag.to_string(),
                    count: 1,
                }),
            }
        }
    }

    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries.truncate(TOP_N);
    entries
}

/// Rank declared languages as percentages of posts that declared any.
///
/// Two explicit accumulators: per-code counts, and the count of posts with at
/// least one declared language (the percentage denominator). Posts without a
/// declared language are excluded from the denominator and never appear in
/// the output. Percentages are rounded independently; the column may drift a
/// point or two off 100 and that is accepted.
pub fn languages(feed: &[Post]) -> Vec<LanguageStat> {
    let mut counts: Vec<(String, u64)> = Vec::new();
    let mut posts_with_language: u64 = 0;

    for post in feed {
        let langs = extract::languages(post);
        if langs.is_empty() {
            continue;
        }

        posts_with_language += 1;
        for code in langs {
            match counts.iter_mut().find(|(existing, _)| existing == code) {
                Some((_, count)) => *count += 1,
                None => counts.push((code.clone(), 1)),
            }
        }
    }

    if posts_with_language == 0 {
        return Vec::new();
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .map(|(code, count)| LanguageStat {
            name: display_name(&code),
            percentage: ((count as f64 / posts_with_language as f64) * 100.0).round() as u32,
            code,
        })
        .collect()
}

/// Human-readable name for a BCP 47 language code, falling back to the raw
/// code when the primary subtag is not in the table.
fn display_name(code: &str) -> String {
    let primary = code.split('-').next().unwrap_or(code).to_lowercase();

    let name = match primary.as_str() {
        "en" => "English",
        "es" => "Spanish",
        "pt" => "Portuguese",
        "ja" => "Japanese",
        "de" => "German",
        "fr" => "French",
        "it" => "Italian",
        "nl" => "Dutch",
        "ko" => "Korean",
        "zh" => "Chinese",
        "ru" => "Russian",
        "ar" => "Arabic",
        "hi" => "Hindi",
        "tr" => "Turkish",
        "pl" => "Polish",
        "sv" => "Swedish",
        "nb" | "no" => "Norwegian",
        "da" => "Danish",
        "fi" => "Finnish",
        "cs" => "Czech",
        "el" => "Greek",
        "he" => "Hebrew",
        "id" => "Indonesian",
        "th" => "Thai",
        "uk" => "Ukrainian",
        "vi" => "Vietnamese",
        "ca" => "Catalan",
        "gl" => "Galician",
        "eu" => "Basque",
        "fa" => "Persian",
        _ => return code.to_string(),
    };

    name.to_string()
}
