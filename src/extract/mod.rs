//! Search-term extraction
//!
//! Turns a free-text market question into the short names people actually
//! use when talking about it. An empty result means "no signal", never an
//! error.

mod aliases;
mod categories;
mod entity;
mod keywords;

pub use aliases::{strip_club_suffixes, AliasTable, EPL_ALIASES};
pub use categories::{category_for, CategoryRule, EPL_CATEGORIES};
pub use keywords::keywords;

use crate::config::ExtractorConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How search terms are derived from a question
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermStrategy {
    /// Alias-resolved entity names
    #[default]
    Entities,
    /// Stopword-filtered lowercase keywords
    Keywords,
}

/// Resolves market questions into canonical search terms
#[derive(Debug, Clone)]
pub struct EntityExtractor {
    aliases: AliasTable,
    max_terms: usize,
    context_terms: bool,
}

impl EntityExtractor {
    /// Create an extractor over the given alias table
    pub fn new(aliases: AliasTable, max_terms: usize) -> Self {
        Self {
            aliases,
            max_terms: max_terms.max(2),
            context_terms: false,
        }
    }

    /// Prepend the competition label ("Premier League", "Top 4") to entity terms
    pub fn with_context_terms(mut self, enabled: bool) -> Self {
        self.context_terms = enabled;
        self
    }

    /// Built-in alias table extended with configured aliases
    pub fn from_config(config: &ExtractorConfig) -> Self {
        let mut aliases = AliasTable::epl();
        for (alias, canonical) in &config.aliases {
            aliases.insert(alias, canonical);
        }
        Self::new(aliases, config.max_terms).with_context_terms(config.context_terms)
    }

    /// Alias table in use
    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Entity terms for a question
    ///
    /// "A vs B" yields exactly two terms in question order; the single-entity
    /// patterns and the catch-all yield one. Empty when nothing is left after
    /// cleaning.
    pub fn extract(&self, question: &str) -> Vec<String> {
        entity::extract_entities(question, &self.aliases)
    }

    /// Stopword-filtered keywords, capped at the configured term count
    pub fn keywords(&self, question: &str) -> Vec<String> {
        keywords(question, self.max_terms)
    }

    /// Competition label for season-long questions, if any
    pub fn category(&self, question: &str) -> Option<&'static str> {
        category_for(question, EPL_CATEGORIES)
    }

    /// Terms for the given strategy, deduplicated and length-bounded
    ///
    /// With context terms enabled, entity terms are preceded by the
    /// question's category label unless an entity already carries it.
    pub fn terms(&self, question: &str, strategy: TermStrategy) -> Vec<String> {
        match strategy {
            // Pairs keep both sides even when they resolve alike
            TermStrategy::Entities => {
                let entities = self.extract(question);
                match self.category(question).filter(|_| self.context_terms) {
                    Some(label) if !entities.iter().any(|t| t.eq_ignore_ascii_case(label)) => {
                        let mut terms = Vec::with_capacity(entities.len() + 1);
                        terms.push(label.to_string());
                        terms.extend(entities);
                        terms
                    }
                    _ => entities,
                }
            }
            TermStrategy::Keywords => dedupe(self.keywords(question), self.max_terms),
        }
    }
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::from_config(&ExtractorConfig::default())
    }
}

/// Entity terms using the built-in alias table
pub fn extract_terms(question: &str) -> Vec<String> {
    EntityExtractor::default().extract(question)
}

fn dedupe(terms: Vec<String>, max_terms: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    terms
        .into_iter()
        .filter(|t| !t.is_empty() && seen.insert(t.to_lowercase()))
        .take(max_terms)
        .collect()
}
