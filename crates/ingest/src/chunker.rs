//! Fixed-size word-window chunking.
//!
//! Splits the corpus on whitespace and groups words into consecutive,
//! non-overlapping windows of `chunk_size` words; the final window may be
//! shorter. No sentence or paragraph awareness — a window can split
//! mid-sentence.

/// A contiguous run of words from the corpus, the unit of retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 0-based position in the chunk sequence. Doubles as the vector index
    /// identifier — never persisted, only used as index-into-sequence.
    pub index: usize,
    /// The window's words rejoined with single spaces. Original spacing is
    /// not preserved — word-level reconstruction only.
    pub content: String,
}

/// Split `text` into word-count windows of `chunk_size`.
///
/// Empty or whitespace-only text yields no chunks. A `chunk_size` of zero is
/// treated as 1 so the function stays total.
pub fn chunk_text(text: &str, chunk_size: usize) -> Vec<Chunk> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(chunk_size.max(1))
        .enumerate()
        .map(|(index, window)| Chunk {
            index,
            content: window.join(" "),
        })
        .collect()
}
