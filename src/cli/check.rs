//! Sanity check over sample narrations
//!
//! Prints what the engine selects for a clear, a vague and a multi-signal
//! narration so catalog or model changes can be eyeballed quickly.

use crate::server::config::AppConfig;
use handover_search::{CategoryQuery, CategoryResponse, PathwayQuery, PathwayResponse};

/// (label, narration)
pub const SAMPLES: &[(&str, &str)] = &[
    ("Clear input", "Chest pain radiating left arm, sweaty"),
    ("Vague input", "Feels unwell today"),
    (
        "Multi-signal",
        "SOB with wheeze, sats 88%, allergic reaction, hives",
    ),
];

pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let engine = crate::server::build_engine(config).await?;

    println!("🩺 Handover sanity check ({})\n", engine.category_model());

    for (label, text) in SAMPLES {
        let categories = engine.suggest_categories(&CategoryQuery::new(*text)).await?;
        let pathway = engine.suggest_pathway(&PathwayQuery::new(*text)).await?;
        println!("{}", render(label, text, &categories, &pathway));
    }

    Ok(())
}

fn render(
    label: &str,
    text: &str,
    categories: &CategoryResponse,
    pathway: &PathwayResponse,
) -> String {
    let meta = &categories.meta;
    let ids: Vec<&str> = categories
        .suggestions
        .iter()
        .map(|s| s.id.as_str())
        .collect();
    let pathway_line = match &pathway.suggestion {
        Some(p) => format!("{} ({:.2})", p.id, p.score),
        None => format!("none (top {:.2})", pathway.meta.top_score),
    };

    format!(
        "== {} ==\n  text: {}\n  selected: {}\n  strategy: {:?}  s_max: {:.2}  low_confidence: {}  threshold: {:.2}\n  floor_added: {:?}  topk_added: {:?}\n  pathway: {}\n",
        label,
        text,
        ids.join(", "),
        meta.strategy_used,
        meta.s_max,
        meta.low_confidence_mode,
        meta.threshold_score,
        meta.floor_added_ids,
        meta.topk_added_ids,
        pathway_line,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::test_engine;

    #[tokio::test]
    async fn test_render_lists_selection() {
        let engine = test_engine().await;
        let text = "sats 88% on air, wheeze";
        let categories = engine
            .suggest_categories(&CategoryQuery::new(text))
            .await
            .unwrap();
        let pathway = engine.suggest_pathway(&PathwayQuery::new(text)).await.unwrap();

        let out = render("Sample", text, &categories, &pathway);
        assert!(out.starts_with("== Sample =="));
        assert!(out.contains("Pulse Oximetry.spo2"));
        assert!(out.contains("pathway: "));
    }
}
