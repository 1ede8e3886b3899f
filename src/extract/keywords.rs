//! Stopword-filtered keyword extraction

use super::entity::{is_date_like, is_time_like};
use std::collections::HashSet;

const STOPWORDS: &[&str] = &[
    "will", "win", "the", "on", "in", "at", "a", "an", "and", "or", "vs", "end", "draw", "over",
    "under", "score", "first", "last", "next", "this", "that", "be", "is", "are", "was", "fc",
    "afc", "utd", "united", "city", "town", "rovers", "wanderers", "athletic",
];

/// Lowercase keywords in question order, deduplicated and capped at `max_terms`
///
/// Dates, times, non-letters, stopwords and words of two letters or fewer
/// are dropped.
pub fn keywords(question: &str, max_terms: usize) -> Vec<String> {
    let lowered = question.to_lowercase();
    let mut seen = HashSet::new();
    let mut result = Vec::new();

    for raw in lowered.split_whitespace() {
        let trimmed = raw.trim_matches(|c: char| !c.is_alphanumeric());
        if is_date_like(trimmed) || is_time_like(trimmed) {
            continue;
        }

        let letters: String = raw
            .chars()
            .map(|c| if c.is_alphabetic() { c } else { ' ' })
            .collect();

        for word in letters.split_whitespace() {
            if result.len() >= max_terms {
                return result;
            }
            if word.chars().count() <= 2 || STOPWORDS.contains(&word) {
                continue;
            }
            if seen.insert(word.to_string()) {
                result.push(word.to_string());
            }
        }
    }

    result
}
