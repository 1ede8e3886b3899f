//! Integration tests for mention aggregation over scripted HTTP

use chrono::{Duration, TimeZone, Utc};
use poly_risk::aggregate_mentions;
use poly_risk::config::Config;
use poly_risk::http::{HttpError, HttpResponse, ScriptedFetcher};
use poly_risk::mentions::{MentionAggregator, MentionWindow};
use serde_json::json;
use std::sync::Arc;

const SEARCH: &str = "/api/posts/search";
const AGGREGATE: &str = "/api/comments/search/aggregate";

fn config(extra: &str) -> Config {
    Config::parse(&format!(
        r#"
        [mentions]
        sources = ["r/PremierLeague", "soccer"]
        search_base_url = "https://archive.test"
        aggregate_base_url = "https://archive.test"
        min_request_interval_ms = 0
        rate_limit_backoff_ms = 1
        aggregate_base_delay_ms = 1
        {extra}
        "#
    ))
    .unwrap()
}

fn window() -> MentionWindow {
    let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    MentionWindow::new(start, start + Duration::days(28))
}

fn posts(n: usize) -> HttpResponse {
    let data: Vec<_> = (0..n)
        .map(|i| json!({"id": format!("p{i}"), "created_utc": 1_767_300_000 - i as i64}))
        .collect();
    HttpResponse::ok(json!({ "data": data }).to_string())
}

#[tokio::test]
async fn test_primary_then_fallback_per_source() {
    let http = Arc::new(
        ScriptedFetcher::new()
            .on_param(SEARCH, "subreddit", "PremierLeague", posts(2))
            .on_param(SEARCH, "subreddit", "soccer", HttpResponse::new(503, ""))
            .on(
                AGGREGATE,
                HttpResponse::ok(json!({"buckets": [{"doc_count": 1}, {"doc_count": 2}]}).to_string()),
            ),
    );

    let total = aggregate_mentions(http.clone(), &config(""), "Arsenal FC vs. Chelsea FC", &window()).await;

    // 2 posts per term in PremierLeague, 3 comments per term from the fallback in soccer
    assert_eq!(total, 10);
    let fallback_calls = http
        .requests()
        .iter()
        .filter(|r| r.url.ends_with(AGGREGATE))
        .count();
    assert_eq!(fallback_calls, 2);
    assert!(http
        .requests()
        .iter()
        .filter(|r| r.url.ends_with(AGGREGATE))
        .all(|r| r.param("subreddit") == Some("soccer")));
}

#[tokio::test]
async fn test_everything_failing_counts_zero() {
    let http = Arc::new(
        ScriptedFetcher::new()
            .fail(SEARCH, HttpError::Timeout)
            .on(AGGREGATE, HttpResponse::new(500, "")),
    );

    let total = aggregate_mentions(http, &config(""), "Will Arsenal win?", &window()).await;
    assert_eq!(total, 0);
}

#[tokio::test]
async fn test_zero_budget_makes_no_requests() {
    let http = Arc::new(ScriptedFetcher::new().on(SEARCH, posts(5)));

    let total = aggregate_mentions(
        http.clone(),
        &config("time_budget_secs = 0.0"),
        "Will Arsenal win?",
        &window(),
    )
    .await;

    assert_eq!(total, 0);
    assert_eq!(http.request_count(), 0);
}

#[tokio::test]
async fn test_detailed_report_names_providers() {
    let http = Arc::new(
        ScriptedFetcher::new()
            .on_param(SEARCH, "subreddit", "PremierLeague", posts(4))
            .on_param(SEARCH, "subreddit", "soccer", posts(0))
            .on(AGGREGATE, HttpResponse::ok("[]")),
    );
    let config = config("");
    let aggregator = MentionAggregator::from_config(http, &config);

    let report = aggregator
        .aggregate_detailed(
            "Will Liverpool win?",
            None,
            &config.mentions.sources,
            &window(),
            std::time::Duration::from_secs(30),
        )
        .await;

    assert_eq!(report.terms, vec!["Liverpool"]);
    assert_eq!(report.total, 4);
    assert_eq!(report.sources[0].provider.as_deref(), Some("search"));
    assert_eq!(report.sources[1].provider, None);
    assert_eq!(report.skipped, 0);
}
