//! Sentence span index over raw protocol text.
//!
//! Protocol documents are one sentence per line. Standoff annotations
//! reference the raw text by character offset, so the index keeps the
//! cumulative offsets of the *un-stripped* lines (terminator included)
//! while storing the stripped text for output.
//!
//! # Design Decisions
//!
//! - **Character offsets**: brat-style annotation offsets count Unicode
//!   characters, not bytes. All offset arithmetic here is in chars.
//! - **Line == sentence**: sentence index is line index; no re-splitting.
//! - **Exact containment rule**: sentence lookup uses
//!   `start >= sent.start && end < sent.end` against the un-stripped line
//!   length. Downstream corpora were built with this exact comparison,
//!   so it is kept as-is.

/// A single sentence span in a protocol document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    /// Character offset of the first character of the line
    pub start_offset: usize,
    /// Character offset one past the line, terminator included
    pub end_offset: usize,
    /// Line text with leading/trailing whitespace stripped
    pub text: String,
}

impl Sentence {
    /// True if the character range `[start, end)` falls inside this span
    /// under the containment rule used for entity assignment.
    pub fn contains(&self, start: usize, end: usize) -> bool {
        start >= self.start_offset && end < self.end_offset
    }
}

/// Build the ordered sentence index for a raw document.
///
/// Spans partition the document with no gaps or overlaps:
/// `spans[i].end_offset == spans[i + 1].start_offset` and the first span
/// starts at 0. An empty document yields an empty index.
pub fn sentence_spans(text: &str) -> Vec<Sentence> {
    let mut sentences = Vec::new();
    let mut curr_char = 0;

    for line in text.split_inclusive('\n') {
        let start_char = curr_char;
        let end_char = curr_char + line.chars().count();
        sentences.push(Sentence {
            start_offset: start_char,
            end_offset: end_char,
            text: line.trim().to_string(),
        });
        curr_char = end_char;
    }

    sentences
}

/// Find the index of the first sentence containing `[start, end)`.
pub fn find_sentence(sentences: &[Sentence], start: usize, end: usize) -> Option<usize> {
    sentences.iter().position(|s| s.contains(start, end))
}
