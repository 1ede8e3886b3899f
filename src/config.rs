//! Configuration types for poly-risk

use crate::extract::TermStrategy;
use crate::risk::Baseline;
use crate::telemetry::LogFormat;
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Arctic Shift Reddit archive
pub const ARCTIC_SHIFT_URL: &str = "https://arctic-shift.photon-reddit.com";

/// Reddit public JSON API, used for subreddit discovery
pub const REDDIT_URL: &str = "https://www.reddit.com";

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub mentions: MentionsConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub whale: WhaleConfig,
    #[serde(default)]
    pub risk: RiskConfig,
    /// Population averages; absent until the offline job has produced them
    #[serde(default)]
    pub baseline: Option<Baseline>,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Configuration errors, fatal at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid base URL for {field}: {url}")]
    BaseUrl { field: &'static str, url: String },
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// HTTP client configuration shared by all providers
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
}

fn default_user_agent() -> String {
    concat!("poly-risk/", env!("CARGO_PKG_VERSION")).to_string()
}
fn default_connect_timeout_ms() -> u64 {
    3_000
}
fn default_read_timeout_ms() -> u64 {
    8_000
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            connect_timeout_ms: default_connect_timeout_ms(),
            read_timeout_ms: default_read_timeout_ms(),
        }
    }
}

/// Mention aggregation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MentionsConfig {
    /// Sources (subreddits) queried in order
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,

    /// Wall-clock ceiling for one aggregation (seconds)
    #[serde(default = "default_time_budget_secs")]
    pub time_budget_secs: f64,

    /// How search terms are derived from the question
    #[serde(default)]
    pub term_strategy: TermStrategy,

    /// Base URL of the paginated post search
    #[serde(default = "default_archive_url")]
    pub search_base_url: String,

    /// Items requested per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Page-count ceiling per term
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Fixed sleep after a 429 before retrying the same page (milliseconds)
    #[serde(default = "default_rate_limit_backoff_ms")]
    pub rate_limit_backoff_ms: u64,

    /// 429 retries per page before the provider gives up
    #[serde(default = "default_max_rate_limit_retries")]
    pub max_rate_limit_retries: u32,

    /// Minimum spacing between consecutive search requests (milliseconds)
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,

    /// Base URL of the daily-bucket aggregate endpoint
    #[serde(default = "default_archive_url")]
    pub aggregate_base_url: String,

    /// Attempts per term for the aggregate endpoint
    #[serde(default = "default_aggregate_max_attempts")]
    pub aggregate_max_attempts: u32,

    /// First retry delay for the aggregate endpoint, doubled each attempt (milliseconds)
    #[serde(default = "default_aggregate_base_delay_ms")]
    pub aggregate_base_delay_ms: u64,

    /// Base URL for subreddit discovery
    #[serde(default = "default_discovery_url")]
    pub discovery_base_url: String,
}

fn default_sources() -> Vec<String> {
    crate::mentions::EPL_SOURCES
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_time_budget_secs() -> f64 {
    30.0
}
fn default_archive_url() -> String {
    ARCTIC_SHIFT_URL.to_string()
}
fn default_discovery_url() -> String {
    REDDIT_URL.to_string()
}
fn default_page_size() -> usize {
    100
}
fn default_max_pages() -> usize {
    10
}
fn default_rate_limit_backoff_ms() -> u64 {
    5_000
}
fn default_max_rate_limit_retries() -> u32 {
    3
}
fn default_min_request_interval_ms() -> u64 {
    crate::mentions::MIN_REQUEST_INTERVAL.as_millis() as u64
}
fn default_aggregate_max_attempts() -> u32 {
    2
}
fn default_aggregate_base_delay_ms() -> u64 {
    400
}

impl Default for MentionsConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            time_budget_secs: default_time_budget_secs(),
            term_strategy: TermStrategy::default(),
            search_base_url: default_archive_url(),
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            rate_limit_backoff_ms: default_rate_limit_backoff_ms(),
            max_rate_limit_retries: default_max_rate_limit_retries(),
            min_request_interval_ms: default_min_request_interval_ms(),
            aggregate_base_url: default_archive_url(),
            aggregate_max_attempts: default_aggregate_max_attempts(),
            aggregate_base_delay_ms: default_aggregate_base_delay_ms(),
            discovery_base_url: default_discovery_url(),
        }
    }
}

/// Search-term extraction configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractorConfig {
    /// Upper bound on the number of search terms
    #[serde(default = "default_max_terms")]
    pub max_terms: usize,

    /// Extra alias → canonical name entries, checked alongside the built-in table
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,

    /// Prefix entity terms with the competition label for season-long questions
    #[serde(default)]
    pub context_terms: bool,
}

fn default_max_terms() -> usize {
    4
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_terms: default_max_terms(),
            aliases: BTreeMap::new(),
            context_terms: false,
        }
    }
}

/// Wallet-concentration configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WhaleConfig {
    /// Distinct actors required before a ratio is reported
    #[serde(default = "default_min_actors")]
    pub min_actors: usize,

    /// Upper percentile compared against the median
    #[serde(default = "default_percentile")]
    pub percentile: f64,

    /// Trailing window of trades considered (days)
    #[serde(default = "default_window_days")]
    pub window_days: i64,
}

fn default_min_actors() -> usize {
    5
}
fn default_percentile() -> f64 {
    95.0
}
fn default_window_days() -> i64 {
    28
}

impl Default for WhaleConfig {
    fn default() -> Self {
        Self {
            min_actors: default_min_actors(),
            percentile: default_percentile(),
            window_days: default_window_days(),
        }
    }
}

/// Risk composition configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RiskConfig {
    /// Logistic steepness `k`
    #[serde(default = "default_steepness")]
    pub steepness: f64,
}

fn default_steepness() -> f64 {
    crate::risk::DEFAULT_STEEPNESS
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            steepness: default_steepness(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make scoring meaningless or unbounded
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, url) in [
            ("mentions.search_base_url", &self.mentions.search_base_url),
            (
                "mentions.aggregate_base_url",
                &self.mentions.aggregate_base_url,
            ),
            (
                "mentions.discovery_base_url",
                &self.mentions.discovery_base_url,
            ),
        ] {
            match reqwest::Url::parse(url) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
                _ => {
                    return Err(ConfigError::BaseUrl {
                        field,
                        url: url.clone(),
                    })
                }
            }
        }

        if self.mentions.page_size == 0 {
            return Err(invalid("mentions.page_size", "must be at least 1"));
        }
        if self.mentions.max_pages == 0 {
            return Err(invalid("mentions.max_pages", "must be at least 1"));
        }
        if !(1..=MAX_AGGREGATE_ATTEMPTS).contains(&self.mentions.aggregate_max_attempts) {
            return Err(invalid(
                "mentions.aggregate_max_attempts",
                "must be between 1 and 10",
            ));
        }
        if self.mentions.aggregate_base_delay_ms > MAX_BASE_DELAY_MS {
            return Err(invalid(
                "mentions.aggregate_base_delay_ms",
                "must be at most 60000",
            ));
        }
        if !self.mentions.time_budget_secs.is_finite() || self.mentions.time_budget_secs < 0.0 {
            return Err(invalid(
                "mentions.time_budget_secs",
                "must be a non-negative number",
            ));
        }
        if !(2..=6).contains(&self.extractor.max_terms) {
            return Err(invalid("extractor.max_terms", "must be between 2 and 6"));
        }
        if self.whale.min_actors == 0 {
            return Err(invalid("whale.min_actors", "must be at least 1"));
        }
        if !(0.0..=100.0).contains(&self.whale.percentile) {
            return Err(invalid("whale.percentile", "must be within 0..=100"));
        }
        if !(1..=MAX_WINDOW_DAYS).contains(&self.whale.window_days) {
            return Err(invalid("whale.window_days", "must be between 1 and 3650"));
        }
        if !self.risk.steepness.is_finite() || self.risk.steepness <= 0.0 {
            return Err(invalid("risk.steepness", "must be a positive number"));
        }
        Ok(())
    }
}

/// Longest trailing trade window, in days
pub const MAX_WINDOW_DAYS: i64 = 3650;

/// Most attempts per term against the aggregate endpoint
pub const MAX_AGGREGATE_ATTEMPTS: u32 = 10;

/// Largest first backoff delay for the aggregate endpoint
pub const MAX_BASE_DELAY_MS: u64 = 60_000;

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            [http]
            user_agent = "risk-test/0.1"
            connect_timeout_ms = 1000

            [mentions]
            sources = ["soccer", "r/PremierLeague"]
            time_budget_secs = 12.5
            term_strategy = "keywords"
            page_size = 50

            [extractor]
            max_terms = 3

            [extractor.aliases]
            "The Gunners" = "Arsenal"

            [whale]
            min_actors = 8

            [risk]
            steepness = 0.1

            [baseline]
            speculation_ratio = 120.0
            whale_ratio = 4.5

            [telemetry]
            log_level = "debug"
            log_format = "json"
        "#;

        let config = Config::parse(toml).unwrap();
        assert_eq!(config.http.user_agent, "risk-test/0.1");
        assert_eq!(config.http.read_timeout_ms, 8_000);
        assert_eq!(config.mentions.sources.len(), 2);
        assert_eq!(config.mentions.term_strategy, TermStrategy::Keywords);
        assert_eq!(config.mentions.page_size, 50);
        assert_eq!(config.mentions.max_pages, 10);
        assert_eq!(config.extractor.aliases["The Gunners"], "Arsenal");
        assert_eq!(config.whale.min_actors, 8);
        assert_eq!(config.whale.percentile, 95.0);
        assert_eq!(config.risk.steepness, 0.1);
        let baseline = config.baseline.unwrap();
        assert_eq!(baseline.whale_ratio, 4.5);
        assert_eq!(config.telemetry.log_format, LogFormat::Json);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.mentions.sources[0], "PremierLeague");
        assert_eq!(config.mentions.aggregate_max_attempts, 2);
        assert_eq!(config.whale.min_actors, 5);
        assert_eq!(config.risk.steepness, 1.0);
        assert!(config.baseline.is_none());
        assert_eq!(config.telemetry.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let toml = r#"
            [mentions]
            search_base_url = "not a url"
        "#;
        let err = Config::parse(toml).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::BaseUrl {
                field: "mentions.search_base_url",
                ..
            }
        ));
    }

    #[test]
    fn test_unbounded_windows_and_retries_rejected() {
        for (toml, expected) in [
            ("[whale]\nwindow_days = 9223372036854775807", "whale.window_days"),
            ("[whale]\nwindow_days = 0", "whale.window_days"),
            ("[mentions]\naggregate_max_attempts = 64", "mentions.aggregate_max_attempts"),
            ("[mentions]\naggregate_base_delay_ms = 3600000", "mentions.aggregate_base_delay_ms"),
        ] {
            match Config::parse(toml) {
                Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected),
                other => panic!("{toml}: unexpected {other:?}"),
            }
        }
        let config = Config::parse("[whale]\nwindow_days = 3650\n[mentions]\naggregate_max_attempts = 10").unwrap();
        assert_eq!(config.whale.window_days, MAX_WINDOW_DAYS);
    }

    #[test]
    fn test_non_positive_steepness_rejected() {
        let err = Config::parse("[risk]\nsteepness = 0.0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "risk.steepness",
                ..
            }
        ));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        assert!(Config::parse("[mentions]\npage_size = 0").is_err());
    }

    #[test]
    fn test_max_terms_bounds() {
        assert!(Config::parse("[extractor]\nmax_terms = 6").is_ok());
        assert!(Config::parse("[extractor]\nmax_terms = 7").is_err());
        assert!(Config::parse("[extractor]\nmax_terms = 1").is_err());
        assert!(Config::parse("[extractor]\nmax_terms = 0").is_err());
    }

    #[test]
    fn test_config_load_nonexistent() {
        let result = Config::load("/nonexistent/path/config.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_config_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[whale]\nwindow_days = 14\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.whale.window_days, 14);
    }

    #[test]
    fn test_example_config_parses() {
        let config = Config::parse(include_str!("../config.toml.example")).unwrap();
        assert_eq!(config.mentions.sources.len(), 5);
    }
}
