//! Integration tests over the shipped sample catalogs
//!
//! Uses the TF-IDF embedder so no model download is needed.

use handover_embeddings::EmbedderSource;
use handover_search::{
    CategoryQuery, PathwayQuery, Strategy, SuggestionEngine, LOW_CONF_THRESHOLD,
};
use std::path::Path;

async fn engine() -> SuggestionEngine {
    let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    SuggestionEngine::from_paths(
        &EmbedderSource::Tfidf,
        &data.join("categories.json"),
        &data.join("pathways.json"),
    )
    .await
    .unwrap()
}

fn any_prefix_match(ids: &[&str], prefixes: &[&str]) -> bool {
    ids.iter().any(|id| {
        prefixes
            .iter()
            .any(|p| *id == *p || id.starts_with(&format!("{}.", p)))
    })
}

#[tokio::test]
async fn test_sample_catalogs_load() {
    let engine = engine().await;
    assert_eq!(engine.categories().len(), 21);
    assert_eq!(engine.pathways().len(), 9);
    assert_eq!(engine.category_model(), "tfidf");
    assert_eq!(engine.pathway_model(), "tfidf");
}

#[tokio::test]
async fn test_category_semantics_top_ten() {
    let engine = engine().await;
    let cases: &[(&str, &[&str])] = &[
        (
            "SOB with wheeze, sats 88% on room air, increased work of breathing",
            &["Breathing Assessment", "Pulse Oximetry"],
        ),
        ("BP 90/60, hypotensive, cool peripheries", &["Blood Pressure"]),
        ("BGL 2.9, sweaty and shaky, low sugar", &["Blood Glucose"]),
        ("Temp 39, febrile, rigors noted", &["Body Temperature"]),
        ("GCS 12, eyes 3, verbal 4, motor 5", &["Glasgow Coma Scale"]),
        ("Airway obstructed with vomit, gurgling sounds", &["Airway Assessment"]),
        ("Pain 8/10 in chest, severe pain", &["Pain Assessment"]),
    ];

    for (text, prefixes) in cases {
        let mut scored = engine.score_categories(text).await.unwrap();
        scored.sort_by(|a, b| b.semantic_score.partial_cmp(&a.semantic_score).unwrap());
        let ids: Vec<&str> = scored.iter().take(10).map(|c| c.id.as_str()).collect();
        assert!(
            any_prefix_match(&ids, prefixes),
            "expected one of {:?} in top 10 for {:?}, got {:?}",
            prefixes,
            text,
            ids
        );
    }
}

#[tokio::test]
async fn test_breathing_narration_selects_breathing_fields() {
    let engine = engine().await;
    let response = engine
        .suggest_categories(&CategoryQuery::new(
            "SOB with wheeze, sats 88% on room air, increased work of breathing",
        ))
        .await
        .unwrap();
    let ids: Vec<&str> = response.suggestions.iter().map(|s| s.id.as_str()).collect();
    assert!(
        any_prefix_match(&ids, &["Breathing Assessment", "Pulse Oximetry"]),
        "meta: {:?}",
        response.meta
    );
}

#[tokio::test]
async fn test_pathway_confident_matches() {
    let engine = engine().await;
    let cases = [
        ("Wheezy, tight chest, sats 88%, uses inhaler at home", "asthma"),
        (
            "Facial droop, slurred speech, arm weakness started an hour ago",
            "stroke",
        ),
        (
            "Itchy rash, hives, lip swelling after peanuts, breathing difficulty",
            "anaphylaxis",
        ),
        (
            "Central chest pressure radiating to left arm, sweaty, nausea",
            "chest pain",
        ),
    ];

    for (text, expected) in cases {
        let response = engine.suggest_pathway(&PathwayQuery::new(text)).await.unwrap();
        let suggestion = response
            .suggestion
            .unwrap_or_else(|| panic!("no pathway for {:?}: {:?}", text, response.meta));
        assert!(
            suggestion.title.to_lowercase().contains(expected),
            "expected {:?} for {:?}, got {:?}",
            expected,
            text,
            suggestion.title
        );
        assert_eq!(suggestion.why.last().unwrap(), "selected_by_threshold");
    }
}

#[tokio::test]
async fn test_vague_pathway_returns_none() {
    let engine = engine().await;
    let text = "Feeling unwell today, tired, no specific complaints";

    let query = PathwayQuery {
        min_score: Some(0.9),
        ..PathwayQuery::new(text)
    };
    let response = engine.suggest_pathway(&query).await.unwrap();
    assert!(response.suggestion.is_none());
    assert!(response.meta.top_score < response.meta.threshold_score);

    let response = engine.suggest_pathway(&PathwayQuery::new(text)).await.unwrap();
    assert!(response.suggestion.is_none());
}

#[tokio::test]
async fn test_vague_narration_backfills_to_minimum() {
    let engine = engine().await;
    let response = engine
        .suggest_categories(&CategoryQuery::new("Feels unwell today"))
        .await
        .unwrap();

    assert_eq!(response.suggestions.len(), 3);
    assert!(response.meta.low_confidence_mode);
    assert_eq!(response.meta.topk_added_ids.len(), 3);
    assert!(response.meta.floor_added_ids.is_empty());
}

#[tokio::test]
async fn test_selection_invariants_hold() {
    let engine = engine().await;
    let texts = [
        "Chest pain radiating left arm, sweaty",
        "Feels unwell today",
        "SOB with wheeze, sats 88%, allergic reaction, hives",
        "BGL 2.9, sweaty and shaky, low sugar",
        "",
    ];
    let params = [(0.12, None, 3, 8), (0.0, Some(0.2), 1, 2), (0.5, Some(0.0), 5, 10)];

    for text in texts {
        for (delta, min_score, min_results, max_results) in params {
            let query = CategoryQuery {
                delta,
                min_score,
                min_results,
                max_results,
                ..CategoryQuery::new(text)
            };
            let response = engine.suggest_categories(&query).await.unwrap();
            let meta = &response.meta;
            let n = response.suggestions.len();

            assert!(n >= min_results && n <= max_results, "{} results for {:?}", n, text);
            assert!(response
                .suggestions
                .windows(2)
                .all(|w| w[0].semantic_score >= w[1].semantic_score));
            assert_eq!(meta.floor_score, min_score.unwrap_or(LOW_CONF_THRESHOLD));
            assert_eq!(meta.threshold_score, (meta.s_max - delta).max(meta.floor_score));
            assert_eq!(meta.low_confidence_mode, meta.s_max < LOW_CONF_THRESHOLD);
            if min_score.is_some() && meta.threshold_score == meta.floor_score {
                assert_eq!(meta.strategy_used, Strategy::Combined);
            }
            for s in &response.suggestions {
                assert_eq!(s.final_score, s.semantic_score);
                assert!(s.why[0].starts_with("semantic: "));
            }
        }
    }
}

#[tokio::test]
async fn test_responses_are_deterministic() {
    let engine = engine().await;
    let query = CategoryQuery::new("SOB with wheeze, sats 88%, allergic reaction, hives");

    let mut first = engine.suggest_categories(&query).await.unwrap();
    let mut second = engine.suggest_categories(&query).await.unwrap();
    first.meta.latency_ms = 0;
    second.meta.latency_ms = 0;
    assert_eq!(first, second);
}
