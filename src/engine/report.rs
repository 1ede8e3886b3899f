//! Per-market scoring output and ranking

use crate::mentions::MentionReport;
use crate::risk::RiskScore;
use crate::signal::{SpeculationScore, WhaleReport};
use serde::Serialize;
use std::cmp::Ordering;

/// Everything computed for one market in a scoring pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketRiskReport {
    pub market_id: String,
    pub question: String,
    pub terms: Vec<String>,
    pub mentions: MentionReport,
    pub speculation: SpeculationScore,
    pub whale: WhaleReport,
    pub risk: RiskScore,
}

/// Order reports riskiest first
///
/// Available scores ascending (low means risky), ties broken by market id;
/// unavailable scores last, also by market id. The result does not depend on
/// input order.
pub fn rank(reports: &mut [MarketRiskReport]) {
    reports.sort_by(compare);
}

fn compare(a: &MarketRiskReport, b: &MarketRiskReport) -> Ordering {
    match (a.risk.value(), b.risk.value()) {
        (Some(x), Some(y)) => x.total_cmp(&y).then_with(|| a.market_id.cmp(&b.market_id)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.market_id.cmp(&b.market_id),
    }
}
