//! Text chunking into fixed-size word windows.

/// Split text into consecutive, non-overlapping windows of `chunk_size`
/// words each; the final window keeps whatever remainder is left.
///
/// Words are whitespace-delimited, so a chunk never splits inside a word
/// and concatenating the chunks reproduces the input's word sequence
/// exactly. Word-count windows give roughly token-proportional units
/// without parsing sentence structure.
///
/// Empty (or all-whitespace) text yields an empty vec; the caller treats
/// that as a fatal ingestion condition. Text of at most `chunk_size` words
/// yields a single chunk. `chunk_size` is validated positive by the
/// configuration layer; a zero value yields an empty vec rather than
/// panicking.
pub fn chunk_words(text: &str, chunk_size: usize) -> Vec<String> {
    if chunk_size == 0 {
        return Vec::new();
    }

    let words: Vec<&str> = text.split_whitespace().collect();

    words
        .chunks(chunk_size)
        .map(|window| window.join(" "))
        .collect()
}
