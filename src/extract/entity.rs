//! Question parsing: market-type suffixes, tokens and entity patterns

use super::AliasTable;

/// Market-type clauses that trail the entity part of a question
const MARKET_TYPE_SUFFIXES: &[&str] = &[
    "more markets",
    "exact score",
    "player props",
    "total corners",
    "halftime result",
    "first goal",
    "anytime score",
    "both teams to score",
    "asian handicap",
    "double chance",
    "draw no bet",
    "clean sheet",
    "match result",
    "spread",
    "moneyline",
    "over under",
    "over/under",
    "o/u",
];

const VERSUS: &[&str] = &["vs", "v", "versus"];
const OUTCOME_VERBS: &[&str] = &["win", "wins", "beat", "beats", "score", "scores"];

/// Longest span accepted by the "A to win" pattern
const MAX_TO_WIN_WORDS: usize = 4;

/// Cut the question at the first `-`, `–` or `:` that introduces a market-type clause
pub(crate) fn strip_market_suffix(question: &str) -> &str {
    for (idx, ch) in question.char_indices() {
        if !matches!(ch, '-' | '–' | ':') {
            continue;
        }
        let rest = question[idx + ch.len_utf8()..].trim_start();
        if introduces_market_type(rest) {
            return question[..idx].trim_end();
        }
    }
    question.trim()
}

fn introduces_market_type(rest: &str) -> bool {
    let lowered = rest.to_lowercase();
    let named = MARKET_TYPE_SUFFIXES.iter().any(|suffix| {
        lowered.starts_with(suffix)
            && lowered[suffix.len()..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_alphanumeric())
    });
    named || starts_with_decimal_line(&lowered)
}

/// `2.5`, `-1.5`, `10.25`
fn starts_with_decimal_line(text: &str) -> bool {
    let head: String = text
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    match head.split_once('.') {
        Some((whole, frac)) => {
            !whole.is_empty() && !frac.is_empty() && frac.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

/// `YYYY-MM-DD`
pub(crate) fn is_date_like(token: &str) -> bool {
    let parts: Vec<&str> = token.split('-').collect();
    parts.len() == 3
        && parts[0].len() == 4
        && parts[1].len() == 2
        && parts[2].len() == 2
        && parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit()))
}

/// `H:MM` or `HH:MM`
pub(crate) fn is_time_like(token: &str) -> bool {
    match token.split_once(':') {
        Some((h, m)) => {
            (1..=2).contains(&h.len())
                && m.len() == 2
                && h.chars().all(|c| c.is_ascii_digit())
                && m.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

/// Whitespace tokens with dates, times and edge punctuation removed
pub(crate) fn clean_tokens(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric() && c != '&'))
        .filter(|t| !t.is_empty() && !is_date_like(t) && !is_time_like(t))
        .map(str::to_string)
        .collect()
}

/// Raw entity spans captured by the first matching pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Capture {
    /// "A vs B"
    Pair(String, String),
    /// "Will A win", "A to win", or the whole cleaned question
    Single(String),
    /// Nothing left after cleaning
    Nothing,
}

pub(crate) fn capture(tokens: &[String]) -> Capture {
    let lower: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
    let span = |range: std::ops::Range<usize>| tokens[range].join(" ");

    if let Some(i) = lower.iter().position(|t| VERSUS.contains(&t.as_str())) {
        if i > 0 && i + 1 < tokens.len() {
            return Capture::Pair(span(0..i), span(i + 1..tokens.len()));
        }
    }

    if let Some(w) = lower.iter().position(|t| t == "will") {
        if let Some(offset) = lower[w + 1..]
            .iter()
            .skip(1)
            .position(|t| OUTCOME_VERBS.contains(&t.as_str()))
        {
            let verb = w + 2 + offset;
            return Capture::Single(span(w + 1..verb));
        }
    }

    if let Some(t) = lower
        .windows(2)
        .position(|pair| pair[0] == "to" && pair[1] == "win")
    {
        if t > 0 && t <= MAX_TO_WIN_WORDS {
            return Capture::Single(span(0..t));
        }
    }

    if tokens.is_empty() {
        Capture::Nothing
    } else {
        Capture::Single(span(0..tokens.len()))
    }
}

/// Full entity extraction against an alias table
pub(crate) fn extract_entities(question: &str, aliases: &AliasTable) -> Vec<String> {
    let tokens = clean_tokens(strip_market_suffix(question));

    match capture(&tokens) {
        Capture::Pair(a, b) => vec![resolve_non_empty(aliases, &a), resolve_non_empty(aliases, &b)],
        Capture::Single(name) => vec![resolve_non_empty(aliases, &name)],
        Capture::Nothing => Vec::new(),
    }
}

fn resolve_non_empty(aliases: &AliasTable, raw: &str) -> String {
    let resolved = aliases.resolve(raw);
    if resolved.is_empty() {
        raw.trim().to_string()
    } else {
        resolved
    }
}
