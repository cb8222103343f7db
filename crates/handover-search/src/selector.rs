//! Adaptive candidate selection
//!
//! Two pure functions turn scored candidates into a result:
//! - [`select_categories`]: bounded multi-result selection with a relative
//!   threshold, an absolute floor, backfill up to `min_results` and
//!   truncation to `max_results`
//! - [`select_pathway`]: at most one match above a fixed or overridden floor
//!
//! Neither touches embeddings or transport, so both are total over any
//! candidate list.

use crate::candidate::Candidate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use utoipa::ToSchema;

/// Confidence floor; below it a query is considered ambiguous
pub const LOW_CONF_THRESHOLD: f64 = 0.65;
/// Default floor for pathway matches
pub const PATHWAY_MIN_SCORE: f64 = 0.35;
/// Default relative margin below the best score
pub const DEFAULT_DELTA: f64 = 0.12;
/// Default minimum number of category suggestions
pub const DEFAULT_MIN_RESULTS: usize = 3;
/// Default maximum number of category suggestions
pub const DEFAULT_MAX_RESULTS: usize = 8;

/// Which rule produced the final category threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Explicit `min_score` became the threshold
    Combined,
    /// The floor dominated the relative threshold
    Floor,
    /// `s_max - delta` set the threshold
    Relative,
}

/// Which step admitted a category into the result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Admission {
    /// Met the threshold in the initial pass
    Threshold,
    /// Backfilled while still meeting the floor
    Floor,
    /// Backfilled below the floor to reach `min_results`
    TopK,
}

impl Admission {
    /// Explanation tag attached to the suggestion
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Threshold => "selected_by_threshold",
            Self::Floor => "selected_by_floor",
            Self::TopK => "selected_by_topk",
        }
    }
}

/// Category selection parameters
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryParams {
    /// Relative margin below `s_max`, in [0, 1]
    pub delta: f64,
    /// Explicit floor overriding [`LOW_CONF_THRESHOLD`]
    pub min_score: Option<f64>,
    /// Backfill target
    pub min_results: usize,
    /// Hard cap on returned suggestions
    pub max_results: usize,
}

impl Default for CategoryParams {
    fn default() -> Self {
        Self {
            delta: DEFAULT_DELTA,
            min_score: None,
            min_results: DEFAULT_MIN_RESULTS,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// How the category threshold was reached and which items were backfilled
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDiagnostics {
    /// Rule that set the threshold
    pub strategy_used: Strategy,
    /// Best score over all candidates (0.0 when none)
    pub s_max: f64,
    /// `s_max < LOW_CONF_THRESHOLD`
    pub low_confidence_mode: bool,
    /// The constant low-confidence threshold
    pub low_conf_threshold: f64,
    /// `max(s_max - delta, floor_score)`
    pub threshold_score: f64,
    /// Explicit `min_score` or the low-confidence threshold
    pub floor_score: f64,
    /// Backfilled ids that met the floor
    pub floor_added_ids: Vec<String>,
    /// Backfilled ids below the floor
    pub topk_added_ids: Vec<String>,
}

/// Outcome of category selection
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySelection {
    /// Selected candidates by descending score, each tagged with its admission reason
    pub selected: Vec<Candidate>,
    /// Diagnostics for response metadata
    pub diagnostics: CategoryDiagnostics,
}

/// Diagnostics reported for every pathway selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathwayDiagnostics {
    /// Explicit floor, if any
    pub min_score: Option<f64>,
    /// Floor actually applied
    pub threshold_score: f64,
    /// Best candidate score (0.0 when no candidates)
    pub top_score: f64,
}

/// Candidate indices by descending score; equal scores keep catalog order
fn ranked(candidates: &[Candidate]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|&a, &b| {
        candidates[b]
            .semantic_score
            .partial_cmp(&candidates[a].semantic_score)
            .unwrap_or(Ordering::Equal)
    });
    order
}

/// Select a bounded, ranked set of categories from scored `candidates`.
///
/// `candidates` must be in catalog order; ties are broken by that order.
pub fn select_categories(candidates: &[Candidate], params: &CategoryParams) -> CategorySelection {
    let s_max = candidates
        .iter()
        .map(|c| c.semantic_score)
        .fold(None, |best: Option<f64>, s| Some(best.map_or(s, |b| b.max(s))))
        .unwrap_or(0.0);
    let low_confidence_mode = s_max < LOW_CONF_THRESHOLD;
    let floor_score = params.min_score.unwrap_or(LOW_CONF_THRESHOLD);
    let relative_threshold = s_max - params.delta;
    let threshold_score = relative_threshold.max(floor_score);

    let strategy_used = if params.min_score == Some(threshold_score) {
        Strategy::Combined
    } else if threshold_score == floor_score && floor_score > relative_threshold {
        Strategy::Floor
    } else {
        Strategy::Relative
    };

    let mut admitted: Vec<Option<Admission>> = candidates
        .iter()
        .map(|c| (c.semantic_score >= threshold_score).then_some(Admission::Threshold))
        .collect();
    let mut count = admitted.iter().flatten().count();

    let order = ranked(candidates);
    let mut floor_added_ids = Vec::new();
    let mut topk_added_ids = Vec::new();

    if count < params.min_results {
        for &index in &order {
            if admitted[index].is_some() {
                continue;
            }
            let candidate = &candidates[index];
            if candidate.semantic_score >= floor_score {
                admitted[index] = Some(Admission::Floor);
                floor_added_ids.push(candidate.id.clone());
            } else {
                admitted[index] = Some(Admission::TopK);
                topk_added_ids.push(candidate.id.clone());
            }
            count += 1;
            if count >= params.min_results {
                break;
            }
        }
    }

    let selected: Vec<Candidate> = order
        .iter()
        .filter_map(|&index| admitted[index].map(|admission| (index, admission)))
        .take(params.max_results)
        .map(|(index, admission)| {
            let mut candidate = candidates[index].clone();
            candidate.tag(admission.reason());
            candidate
        })
        .collect();

    CategorySelection {
        selected,
        diagnostics: CategoryDiagnostics {
            strategy_used,
            s_max,
            low_confidence_mode,
            low_conf_threshold: LOW_CONF_THRESHOLD,
            threshold_score,
            floor_score,
            floor_added_ids,
            topk_added_ids,
        },
    }
}

/// Select at most one pathway: the best candidate if it meets the floor.
///
/// Ties for the best score go to the earliest candidate in catalog order.
pub fn select_pathway(
    candidates: &[Candidate],
    min_score: Option<f64>,
) -> (Option<Candidate>, PathwayDiagnostics) {
    let threshold_score = min_score.unwrap_or(PATHWAY_MIN_SCORE);

    let top = candidates.iter().fold(None, |best: Option<&Candidate>, c| match best {
        Some(b) if b.semantic_score >= c.semantic_score => Some(b),
        _ => Some(c),
    });

    let Some(top) = top else {
        return (
            None,
            PathwayDiagnostics {
                min_score,
                threshold_score,
                top_score: 0.0,
            },
        );
    };

    let diagnostics = PathwayDiagnostics {
        min_score,
        threshold_score,
        top_score: top.semantic_score,
    };

    if top.semantic_score >= threshold_score {
        let mut selected = top.clone();
        selected.tag(Admission::Threshold.reason());
        (Some(selected), diagnostics)
    } else {
        (None, diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::semantic_trace;

    fn candidates(scores: &[f64]) -> Vec<Candidate> {
        scores
            .iter()
            .enumerate()
            .map(|(i, &s)| Candidate {
                id: format!("c{}", i),
                title: format!("Category {}", i),
                semantic_score: s,
                why: vec![semantic_trace(s)],
            })
            .collect()
    }

    fn ids(selection: &[Candidate]) -> Vec<&str> {
        selection.iter().map(|c| c.id.as_str()).collect()
    }

    fn reason(candidate: &Candidate) -> &str {
        candidate.why.last().map(String::as_str).unwrap_or_default()
    }

    #[test]
    fn test_empty_query_backfills_topk() {
        // Scenario A: empty text scores every category 0.0
        let cands = candidates(&[0.0; 6]);
        let result = select_categories(&cands, &CategoryParams::default());
        let d = &result.diagnostics;

        assert!(d.low_confidence_mode);
        assert_eq!(d.s_max, 0.0);
        assert_eq!(d.floor_score, LOW_CONF_THRESHOLD);
        assert_eq!(d.threshold_score, LOW_CONF_THRESHOLD);
        assert_eq!(d.strategy_used, Strategy::Floor);
        assert_eq!(ids(&result.selected), vec!["c0", "c1", "c2"]);
        assert_eq!(d.topk_added_ids, vec!["c0", "c1", "c2"]);
        assert!(d.floor_added_ids.is_empty());
        for c in &result.selected {
            assert_eq!(c.semantic_score, 0.0);
            assert_eq!(c.why, vec!["semantic: 0.00", "selected_by_topk"]);
        }
    }

    #[test]
    fn test_single_confident_match_is_relative() {
        // Scenario B
        let cands = candidates(&[0.30, 0.90, 0.50, 0.45, 0.20]);
        let result = select_categories(&cands, &CategoryParams::default());
        let d = &result.diagnostics;

        assert!((d.threshold_score - 0.78).abs() < 1e-9);
        assert_eq!(d.strategy_used, Strategy::Relative);
        assert!(!d.low_confidence_mode);
        assert_eq!(ids(&result.selected), vec!["c1", "c2", "c3"]);
        assert_eq!(reason(&result.selected[0]), "selected_by_threshold");
        assert_eq!(reason(&result.selected[1]), "selected_by_topk");
        assert_eq!(reason(&result.selected[2]), "selected_by_topk");
        assert_eq!(d.topk_added_ids, vec!["c2", "c3"]);
    }

    #[test]
    fn test_explicit_floor_is_combined() {
        // Scenario C
        let cands = candidates(&[0.55, 0.52, 0.40, 0.10]);
        let params = CategoryParams {
            min_score: Some(0.5),
            ..CategoryParams::default()
        };
        let result = select_categories(&cands, &params);
        let d = &result.diagnostics;

        assert_eq!(d.floor_score, 0.5);
        assert_eq!(d.threshold_score, 0.5);
        assert_eq!(d.strategy_used, Strategy::Combined);
        assert!(d.low_confidence_mode);
        assert_eq!(ids(&result.selected), vec!["c0", "c1", "c2"]);
        assert_eq!(reason(&result.selected[0]), "selected_by_threshold");
        assert_eq!(reason(&result.selected[1]), "selected_by_threshold");
        assert_eq!(reason(&result.selected[2]), "selected_by_topk");
    }

    #[test]
    fn test_backfill_within_floor_is_floor_added() {
        // Relative threshold 0.83 excludes 0.80 and 0.70, which still clear the 0.65 floor
        let cands = candidates(&[0.95, 0.80, 0.70, 0.10]);
        let result = select_categories(&cands, &CategoryParams::default());
        let d = &result.diagnostics;

        assert_eq!(d.strategy_used, Strategy::Relative);
        assert_eq!(d.floor_added_ids, vec!["c1", "c2"]);
        assert!(d.topk_added_ids.is_empty());
        assert_eq!(reason(&result.selected[1]), "selected_by_floor");
        assert_eq!(reason(&result.selected[2]), "selected_by_floor");
    }

    #[test]
    fn test_truncates_to_max_results() {
        let cands = candidates(&[0.90, 0.89, 0.88, 0.87, 0.86, 0.85]);
        let params = CategoryParams {
            max_results: 4,
            ..CategoryParams::default()
        };
        let result = select_categories(&cands, &params);
        assert_eq!(ids(&result.selected), vec!["c0", "c1", "c2", "c3"]);
        assert!(result
            .selected
            .iter()
            .all(|c| reason(c) == "selected_by_threshold"));
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let cands = candidates(&[0.40, 0.70, 0.40, 0.70, 0.40]);
        let params = CategoryParams {
            min_results: 4,
            ..CategoryParams::default()
        };
        let result = select_categories(&cands, &params);
        assert_eq!(ids(&result.selected), vec!["c1", "c3", "c0", "c2"]);
        assert_eq!(result.diagnostics.topk_added_ids, vec!["c0", "c2"]);
    }

    #[test]
    fn test_empty_catalog() {
        let result = select_categories(&[], &CategoryParams::default());
        assert!(result.selected.is_empty());
        assert_eq!(result.diagnostics.s_max, 0.0);
        assert!(result.diagnostics.low_confidence_mode);
    }

    #[test]
    fn test_catalog_smaller_than_min_results() {
        let cands = candidates(&[0.2, 0.1]);
        let result = select_categories(&cands, &CategoryParams::default());
        assert_eq!(ids(&result.selected), vec!["c0", "c1"]);
    }

    #[test]
    fn test_threshold_and_confidence_properties() {
        let grids: [&[f64]; 4] = [
            &[0.1, 0.2, 0.3],
            &[0.99, 0.98, 0.5, 0.66, 0.64, 0.2, 0.91, 0.9, 0.88, 0.87],
            &[0.65, 0.65, 0.65, 0.65],
            &[0.7, 0.0, 1.0, 0.3, 0.6],
        ];
        let param_sets = [
            CategoryParams::default(),
            CategoryParams {
                delta: 0.0,
                min_score: Some(0.2),
                min_results: 1,
                max_results: 2,
            },
            CategoryParams {
                delta: 1.0,
                min_score: Some(0.0),
                min_results: 2,
                max_results: 50,
            },
        ];

        for scores in grids {
            let cands = candidates(scores);
            for params in &param_sets {
                let result = select_categories(&cands, params);
                let d = &result.diagnostics;
                let s_max = scores.iter().cloned().fold(0.0, f64::max);

                assert_eq!(d.s_max, s_max);
                assert_eq!(d.threshold_score, (s_max - params.delta).max(d.floor_score));
                assert_eq!(d.low_confidence_mode, s_max < LOW_CONF_THRESHOLD);

                let n = result.selected.len();
                if cands.len() >= params.min_results {
                    assert!(n >= params.min_results && n <= params.max_results);
                }
                assert!(result
                    .selected
                    .windows(2)
                    .all(|w| w[0].semantic_score >= w[1].semantic_score));
            }
        }
    }

    #[test]
    fn test_selection_is_deterministic() {
        let cands = candidates(&[0.5, 0.7, 0.7, 0.1, 0.69]);
        let params = CategoryParams::default();
        assert_eq!(
            select_categories(&cands, &params),
            select_categories(&cands, &params)
        );
    }

    #[test]
    fn test_pathway_default_floor() {
        // Scenario D
        let cands = candidates(&[0.20, 0.40, 0.31]);
        let (selected, d) = select_pathway(&cands, None);
        let selected = selected.unwrap();
        assert_eq!(selected.id, "c1");
        assert_eq!(selected.why, vec!["semantic: 0.40", "selected_by_threshold"]);
        assert_eq!(d.threshold_score, PATHWAY_MIN_SCORE);
        assert_eq!(d.top_score, 0.40);
        assert_eq!(d.min_score, None);

        let (selected, d) = select_pathway(&cands, Some(0.6));
        assert!(selected.is_none());
        assert_eq!(d.threshold_score, 0.6);
        assert_eq!(d.top_score, 0.40);
        assert_eq!(d.min_score, Some(0.6));
    }

    #[test]
    fn test_pathway_tie_goes_to_first() {
        let cands = candidates(&[0.5, 0.8, 0.8]);
        let (selected, _) = select_pathway(&cands, None);
        assert_eq!(selected.unwrap().id, "c1");
    }

    #[test]
    fn test_pathway_empty_candidates() {
        let (selected, d) = select_pathway(&[], Some(0.2));
        assert!(selected.is_none());
        assert_eq!(d.top_score, 0.0);
        assert_eq!(d.threshold_score, 0.2);
    }

    #[test]
    fn test_pathway_none_iff_below_threshold() {
        let cands = candidates(&[0.1, 0.45, 0.3]);
        for floor in [0.0, 0.3, 0.45, 0.46, 1.0] {
            let (selected, d) = select_pathway(&cands, Some(floor));
            assert_eq!(selected.is_none(), d.top_score < d.threshold_score);
        }
    }
}
