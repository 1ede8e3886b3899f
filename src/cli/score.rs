//! Score command implementation

use crate::config::Config;
use crate::engine::{derive_baseline, MarketInput, MarketRiskReport, RiskEngine};
use crate::http::ReqwestFetcher;
use crate::market::{parse_start_date, Market, Trade};
use anyhow::Context;
use chrono::Utc;
use clap::{Args, ValueEnum};
use serde_json::Value;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Longest question shown in the table
const QUESTION_WIDTH: usize = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// JSON file: an array of market listings, each with an optional `trades` array
    #[arg(long)]
    pub input: PathBuf,

    /// Average the batch's own ratios instead of using the configured baseline
    #[arg(long)]
    pub derive_baseline: bool,

    /// Use the supplied trades as the trailing trade count
    #[arg(long)]
    pub count_trades: bool,

    /// Score as of this instant (RFC 3339) instead of now
    #[arg(long)]
    pub as_of: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl ScoreArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let inputs = load_inputs(&self.input)?;
        let now = match &self.as_of {
            Some(raw) => parse_start_date(raw)
                .with_context(|| format!("invalid --as-of timestamp: {}", raw))?,
            None => Utc::now(),
        };

        let http = Arc::new(ReqwestFetcher::new(&config.http)?);
        let engine = RiskEngine::from_config(http, config).with_trade_counting(self.count_trades);

        let mut reports = engine.score_batch(&inputs, now).await;

        if self.derive_baseline {
            match derive_baseline(&reports) {
                Some(baseline) => {
                    tracing::info!(
                        speculation_ratio = baseline.speculation_ratio,
                        whale_ratio = baseline.whale_ratio,
                        "Derived baseline from batch"
                    );
                    engine.recompose(&mut reports, Some(&baseline));
                }
                None => tracing::warn!("Batch has no non-zero ratios, baseline not derived"),
            }
        } else if engine.baseline().is_none() {
            tracing::warn!("No [baseline] configured, risk scores are unavailable");
        }

        match self.format {
            OutputFormat::Table => print!("{}", render_table(&reports)),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        }
        Ok(())
    }
}

/// Read a batch file; entries that are not valid listings are logged and skipped
pub fn load_inputs(path: &Path) -> anyhow::Result<Vec<MarketInput>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let payload: Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    let entries = match &payload {
        Value::Array(entries) => entries.as_slice(),
        Value::Object(_) => payload
            .get("markets")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .context("expected an array of markets or an object with a `markets` array")?,
        _ => anyhow::bail!("expected an array of markets"),
    };

    let mut inputs = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let market = match Market::from_listing(entry) {
            Ok(market) => market,
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping listing");
                continue;
            }
        };
        let trades = entry
            .get("trades")
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(Trade::from_value).collect())
            .unwrap_or_default();
        inputs.push(MarketInput { market, trades });
    }
    Ok(inputs)
}

/// Fixed-width ranking table
pub fn render_table(reports: &[MarketRiskReport]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:<12} {:>6} {:>12} {:>8} {:>9}  {}",
        "rank", "market", "risk", "speculation", "whale", "mentions", "question"
    );
    for (i, report) in reports.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>4}  {:<12} {:>6} {:>12.2} {:>8.2} {:>9}  {}",
            i + 1,
            report.market_id,
            report.risk.to_string(),
            report.speculation.ratio,
            report.whale.ratio,
            report.mentions.total,
            truncate(&report.question, QUESTION_WIDTH)
        );
    }
    out
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}
