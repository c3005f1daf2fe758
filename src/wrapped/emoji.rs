//! Emoji usage counting over the year's post text.

use crate::model::{EmojiCount, EmojiStats, Post};
use crate::wrapped::rank::TOP_N;
use crate::wrapped::{classify, extract};

/// Count emoji usage across the user's own posts (reposts carry someone
/// else's text and are skipped). Champions are the five most used, sorted
/// descending with stable ties; `total` counts every emoji occurrence.
pub fn champions(feed: &[Post]) -> EmojiStats {
    let mut counts: Vec<EmojiCount> = Vec::new();
    let mut total: u64 = 0;

    for post in feed {
        if classify::classify(post).repost {
            continue;
        }

        for ch in extract::text(post).chars().filter(|ch| is_emoji(*ch)) {
            total += 1;
            let symbol = ch.to_string();
            match counts.iter_mut().find(|entry| entry.emoji == symbol) {
                Some(entry) => entry.count += 1,
                None => counts.push(EmojiCount {
                    emoji: symbol,
                    count: 1,
                }),
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(TOP_N);

    EmojiStats {
        champions: counts,
        total,
    }
}

/// Scalar-level emoji check over the main pictographic blocks. Skin-tone
/// modifiers and ZWJ sequences count as their base scalars.
fn is_emoji(ch: char) -> bool {
    matches!(ch,
        '\u{1F300}'..='\u{1F5FF}'   // symbols and pictographs
        | '\u{1F600}'..='\u{1F64F}' // emoticons
        | '\u{1F680}'..='\u{1F6FF}' // transport and map
        | '\u{1F900}'..='\u{1F9FF}' // supplemental symbols
        | '\u{1FA70}'..='\u{1FAFF}' // extended-A
        | '\u{2600}'..='\u{26FF}'   // miscellaneous symbols
        | '\u{2700}'..='\u{27BF}'   // dingbats
    )
}
