// ✂️ Tokenizer - split template text into word-like tokens
//
// Used to scan action templates for entity references.
//
// Delimiters (consumed, never returned):
// - any whitespace
// - '.', ',', '!', '?'
//
// Example: "test1 test2.test3?test4" → ["test1", "test2", "test3", "test4"]

/// Punctuation that separates tokens
pub const PUNCTUATION_DELIMITERS: [char; 4] = ['.', ',', '!', '?'];

pub fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || PUNCTUATION_DELIMITERS.contains(&c)
}

/// Byte ranges `(start, end)` of every token in `text`, in order
pub fn token_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        match (is_delimiter(c), start) {
            (true, Some(s)) => {
                spans.push((s, i));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }

    if let Some(s) = start {
        spans.push((s, text.len()));
    }

    spans
}

/// Split text into tokens, dropping delimiters and empty tokens
pub fn split(text: &str) -> Vec<String> {
    token_spans(text)
        .into_iter()
        .map(|(start, end)| text[start..end].to_string())
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
