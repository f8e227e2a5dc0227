//! Lyric text segmentation.
//!
//! A song's text is stored as numbered verses, one per segment between blank
//! lines. Segments are kept verbatim (no trimming, empty segments included) so
//! joining them back yields the original text.

pub const VERSE_SEPARATOR: &str = "\n\n";

/// Splits `text` into verses. Empty or whitespace-only text has no verses.
pub fn split_verses(text: &str) -> Vec<&str> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    text.split(VERSE_SEPARATOR).collect()
}

pub fn join_verses<S: AsRef<str>>(verses: &[S]) -> String {
    verses
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(VERSE_SEPARATOR)
}
