//! Source (subreddit) lists: curated defaults and subscriber-ranked discovery

use super::ProviderError;
use crate::http::HttpFetch;
use crate::json::{count_lenient, string_lenient};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Search results requested per seed query
const DISCOVERY_LIMIT: usize = 15;

/// Strip a leading `r/` or `/r/` from a source identifier
pub fn normalize_source(source: &str) -> String {
    let trimmed = source.trim();
    let stripped = trimmed
        .strip_prefix("/r/")
        .or_else(|| trimmed.strip_prefix("r/"))
        .unwrap_or(trimmed);
    stripped.trim_matches('/').to_string()
}

/// One community returned by subreddit search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubredditInfo {
    pub name: String,
    pub subscribers: u64,
    pub over18: bool,
}

impl SubredditInfo {
    fn from_value(value: &Value) -> Option<Self> {
        let data = value.get("data").unwrap_or(value);
        let name = data.get("display_name").and_then(string_lenient)?;
        Some(Self {
            name,
            subscribers: data.get("subscribers").map_or(0, count_lenient),
            over18: data.get("over18").and_then(Value::as_bool).unwrap_or(false),
        })
    }
}

/// Subreddit search client
pub struct SourceDirectory {
    http: Arc<dyn HttpFetch>,
    base_url: String,
}

impl SourceDirectory {
    /// Create a directory client over the given HTTP client
    pub fn new(http: Arc<dyn HttpFetch>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Communities matching `query`; entries without a name are dropped
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SubredditInfo>, ProviderError> {
        let url = format!(
            "{}/subreddits/search.json",
            self.base_url.trim_end_matches('/')
        );
        let response = self
            .http
            .get(&url, &[("q", query.to_string()), ("limit", limit.to_string())])
            .await?;

        if !response.is_success() {
            return Err(ProviderError::Status(response.status));
        }

        let payload = response.json().unwrap_or(Value::Null);
        let children = payload
            .get("data")
            .and_then(|d| d.get("children"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        Ok(children.iter().filter_map(SubredditInfo::from_value).collect())
    }

    /// Top `k` communities across the seed queries, by subscriber count
    ///
    /// NSFW communities are skipped. Duplicates keep their largest subscriber
    /// count. A failing seed query is logged and skipped.
    pub async fn discover(&self, seeds: &[String], k: usize) -> Vec<String> {
        let mut best: HashMap<String, u64> = HashMap::new();

        for seed in seeds {
            let found = match self.search(seed, DISCOVERY_LIMIT).await {
                Ok(found) => found,
                Err(e) => {
                    tracing::warn!(seed = %seed, error = %e, "Subreddit search failed, skipping seed");
                    continue;
                }
            };
            for info in found.into_iter().filter(|i| !i.over18) {
                let entry = best.entry(info.name).or_insert(0);
                *entry = (*entry).max(info.subscribers);
            }
        }

        let mut ranked: Vec<(String, u64)> = best.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.into_iter().take(k).map(|(name, _)| name).collect()
    }

    /// Curated sources first, topped up from discovery when fewer than `k`
    pub async fn pick(&self, curated: &[&str], seeds: &[String], k: usize) -> Vec<String> {
        let mut picked: Vec<String> = curated
            .iter()
            .map(|s| normalize_source(s))
            .take(k)
            .collect();
        if picked.len() >= k {
            return picked;
        }

        for name in self.discover(seeds, k + picked.len()).await {
            if picked.len() >= k {
                break;
            }
            if !picked.iter().any(|p| p.eq_ignore_ascii_case(&name)) {
                picked.push(name);
            }
        }
        picked
    }
}
