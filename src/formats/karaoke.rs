//! Even per-word timing for ASS `\k` karaoke tags.

use crate::model::{Cue, KaraokeWord};

/// Splits `text` into words and shares `[start_ms, end_ms)` between them.
///
/// The cue length in centiseconds (at least 1) is divided evenly; the leftover
/// centiseconds go one each to the earliest words. Every word gets at least one
/// centisecond, so the sum only exceeds the cue length when there are more words
/// than centiseconds.
pub fn segment_words(text: &str, start_ms: u64, end_ms: u64) -> Vec<KaraokeWord> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    let total_cs = total_centiseconds(start_ms, end_ms);
    let count = words.len() as u64;
    let base = (total_cs / count).max(1);
    let remainder = total_cs.saturating_sub(base * count);

    words
        .into_iter()
        .enumerate()
        .map(|(i, word)| KaraokeWord {
            word: word.to_string(),
            duration_cs: if (i as u64) < remainder { base + 1 } else { base },
        })
        .collect()
}

pub fn total_centiseconds(start_ms: u64, end_ms: u64) -> u64 {
    (end_ms.saturating_sub(start_ms) / 10).max(1)
}

/// `{\k50}one {\k50}two`
pub fn karaoke_text(cue: &Cue) -> String {
    segment_words(&cue.text, cue.start_ms, cue.end_ms)
        .iter()
        .map(|w| format!("{{\\k{}}}{}", w.duration_cs, w.word))
        .collect::<Vec<_>>()
        .join(" ")
}
