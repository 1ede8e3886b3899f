//! End-to-end integration tests

use chrono::{Duration, TimeZone, Utc};
use poly_risk::config::Config;
use poly_risk::engine::{derive_baseline, MarketInput, RiskEngine};
use poly_risk::http::{HttpResponse, ScriptedFetcher};
use poly_risk::market::{Market, Trade};
use poly_risk::risk::{Baseline, RiskScore};
use poly_risk::{compose_risk, speculation_ratio, whale_score};
use serde_json::json;
use std::sync::Arc;

fn config() -> Config {
    Config::parse(
        r#"
        [mentions]
        sources = ["soccer"]
        search_base_url = "https://archive.test"
        aggregate_base_url = "https://archive.test"
        min_request_interval_ms = 0

        [risk]
        steepness = 0.1
        "#,
    )
    .unwrap()
}

fn listing(id: &str, question: &str, volume: f64, trades: serde_json::Value) -> MarketInput {
    let entry = json!({
        "id": id,
        "question": question,
        "volume": volume.to_string(),
        "startDate": "2026-01-05T15:00:00Z",
    });
    let trades = trades
        .as_array()
        .map(|list| list.iter().filter_map(Trade::from_value).collect())
        .unwrap_or_default();
    MarketInput {
        market: Market::from_listing(&entry).unwrap(),
        trades,
    }
}

#[test]
fn test_example_config_loads() {
    let config = Config::load("config.toml.example").unwrap();
    assert_eq!(config.mentions.sources[0], "PremierLeague");
    assert!(config.baseline.is_none());
}

#[test]
fn test_exposed_scoring_functions() {
    let now = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
    let sizes = [("w1", 10), ("w1", 10), ("w2", 1), ("w3", 1), ("w4", 1), ("w5", 1)];
    let trades: Vec<Trade> = sizes
        .iter()
        .map(|(actor, size)| Trade::new(Some(*actor), (*size).into(), now - Duration::hours(1)))
        .collect();

    assert_eq!(whale_score(&trades, now - Duration::days(28), now), 20.0);
    assert_eq!(speculation_ratio(100.0, 0), 100.0);
    assert_eq!(speculation_ratio(0.0, 0), 0.0);
    assert_eq!(
        compose_risk(Some(20.0), Some(100.0), Some(&Baseline::new(100.0, 20.0))),
        RiskScore::Available(0.5)
    );
}

#[tokio::test]
async fn test_batch_scoring_over_scripted_http() {
    let now = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
    let ts = (now - Duration::days(2)).timestamp();

    let posts = |n: usize| {
        let data: Vec<_> = (0..n)
            .map(|i| json!({"id": format!("p{i}"), "created_utc": ts - i as i64}))
            .collect();
        HttpResponse::ok(json!({ "data": data }).to_string())
    };
    let http = Arc::new(
        ScriptedFetcher::new()
            .on_param("/api/posts/search", "title", "Manchester City", posts(4))
            .on_param("/api/posts/search", "title", "Nottingham Forest", posts(5))
            .on_param("/api/posts/search", "title", "Liverpool", posts(99))
            .on("/api/comments/search/aggregate", HttpResponse::ok("[]")),
    );

    let whale_trades = json!([
        {"proxyWallet": "w1", "size": 10, "timestamp": ts},
        {"proxyWallet": "w1", "size": "10", "timestamp": ts},
        {"proxyWallet": "w2", "size": 1, "timestamp": ts},
        {"proxyWallet": "w3", "size": 1, "timestamp": ts},
        {"proxyWallet": "w4", "size": 1, "timestamp": ts},
        {"proxyWallet": "w5", "size": 1, "timestamp": ts},
        {"size": 500, "timestamp": ts}
    ]);
    let inputs = vec![
        listing("city-forest", "Manchester City vs Nottingham Forest", 1_000.0, whale_trades),
        listing("pool", "Will Liverpool win?", 1_000.0, json!([])),
        listing("none", "?? 2026-01-01", 50.0, json!([])),
    ];

    let engine = RiskEngine::from_config(http, &config());
    let mut reports = engine.score_batch(&inputs, now).await;

    let city = reports.iter().find(|r| r.market_id == "city-forest").unwrap();
    assert_eq!(city.terms, vec!["Manchester City", "Nottingham Forest"]);
    assert_eq!(city.mentions.total, 9);
    assert_eq!(city.speculation.ratio, 100.0);
    assert_eq!(city.whale.ratio, 20.0);
    assert_eq!(city.risk, RiskScore::Unavailable);

    let baseline = derive_baseline(&reports).unwrap();
    engine.recompose(&mut reports, Some(&baseline));

    // Heavy trading on little discussion with one dominant wallet ranks first
    assert_eq!(reports[0].market_id, "city-forest");
    assert!(reports[0].risk.value().unwrap() < 0.5);
    assert!(reports.iter().all(|r| r.risk.is_available()));
}
