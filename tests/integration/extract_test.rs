//! Integration tests for search-term extraction

use poly_risk::config::Config;
use poly_risk::extract::{extract_terms, EntityExtractor, TermStrategy};

#[test]
fn test_versus_yields_two_ordered_terms() {
    assert_eq!(
        extract_terms("Manchester City vs Nottingham Forest"),
        vec!["Manchester City", "Nottingham Forest"]
    );
    assert_eq!(
        extract_terms("Nottingham Forest FC vs. Manchester City FC - More Markets"),
        vec!["Nottingham Forest", "Manchester City"]
    );
}

#[test]
fn test_man_city_and_man_united_stay_distinct() {
    assert_eq!(
        extract_terms("Manchester United FC vs. Manchester City FC"),
        vec!["Manchester United", "Manchester City"]
    );
    assert_eq!(
        extract_terms("Man Utd vs Man City"),
        vec!["Manchester United", "Manchester City"]
    );
}

#[test]
fn test_suffixes_stripped() {
    assert_eq!(extract_terms("Will Arsenal FC win on 2026-02-28?"), vec!["Arsenal"]);
    assert_eq!(extract_terms("Will Celtic FC win?"), vec!["Celtic"]);
}

#[test]
fn test_configured_aliases_extend_builtin_table() {
    let config = Config::parse(
        r#"
        [extractor.aliases]
        "The Toffees" = "Everton"
        "#,
    )
    .unwrap();
    let extractor = EntityExtractor::from_config(&config.extractor);

    assert_eq!(extractor.extract("Will The Toffees win?"), vec!["Everton"]);
    assert_eq!(extractor.extract("Will Spurs win?"), vec!["Tottenham"]);
}

#[test]
fn test_keyword_strategy_is_bounded() {
    let extractor = EntityExtractor::from_config(&Config::default().extractor);
    let terms = extractor.terms(
        "Will Brentford, Fulham, Everton, Burnley or Sunderland finish bottom at 19:30?",
        TermStrategy::Keywords,
    );
    assert!(terms.len() <= 4);
    assert_eq!(terms[0], "brentford");
    assert!(terms.iter().all(|t| t.len() > 2));
}

#[test]
fn test_no_entity_is_empty() {
    assert!(extract_terms("").is_empty());
    assert!(extract_terms("2026-01-01 19:30 ??").is_empty());
}
