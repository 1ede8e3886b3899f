//! poly-risk: suspicious-activity risk scoring for Polymarket markets
//!
//! This library provides the core components for:
//! - Search-term extraction from market questions
//! - Social-mention counting with pagination, retries and fallback
//! - Mention aggregation across sources under a time budget
//! - Wallet-concentration ("whale") scoring
//! - Speculation ratios of trading activity to discussion
//! - Logistic risk composition against population baselines
//! - Batch scoring and deterministic ranking

pub mod cli;
pub mod config;
pub mod engine;
pub mod extract;
pub mod http;
pub mod json;
pub mod market;
pub mod mentions;
pub mod risk;
pub mod signal;
pub mod telemetry;

pub use engine::{MarketRiskReport, RiskEngine};
pub use mentions::aggregate_mentions;
pub use risk::compose_risk;
pub use signal::{speculation_ratio, whale_score};
