//! Token-containment scoring.
//!
//! A record's score is the number of distinct query tokens that occur
//! anywhere in its haystack: every field, lowercased, joined by single
//! spaces. Matching is plain substring containment, so a token can hit
//! inside a longer word.
//!
//! ```text
//! score = |{ t in tokens(query) : haystack(record) contains t }|
//! ```

use crate::types::Record;

/// Lowercase `query`, split on whitespace, and drop repeated tokens while
/// keeping first-seen order.
pub fn tokenize(query: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for token in query.to_lowercase().split_whitespace() {
        if !tokens.iter().any(|t| t == token) {
            tokens.push(token.to_string());
        }
    }
    tokens
}

/// All fields of `record`, lowercased and whitespace-collapsed.
pub fn haystack(record: &Record) -> String {
    record
        .fields()
        .iter()
        .flat_map(|field| field.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Number of `tokens` contained in `record`'s haystack.
pub fn score(record: &Record, tokens: &[String]) -> usize {
    let hay = haystack(record);
    tokens.iter().filter(|t| hay.contains(t.as_str())).count()
}
