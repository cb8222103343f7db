//! Per-request scored candidates

use crate::catalog::CatalogEntry;
use std::collections::HashSet;

/// A catalog entry with its similarity score for one request
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Entry id
    pub id: String,
    /// Entry title
    pub title: String,
    /// Similarity score in [0, 1]
    pub semantic_score: f64,
    /// Explanation trace, starting with `semantic: <score>`
    pub why: Vec<String>,
}

impl Candidate {
    /// Candidate for `entry` scored at `semantic_score`
    pub fn new(entry: &CatalogEntry, semantic_score: f64) -> Self {
        Self {
            id: entry.id.clone(),
            title: entry.title.clone(),
            semantic_score,
            why: vec![semantic_trace(semantic_score)],
        }
    }

    /// Append an explanation tag, keeping the trace free of duplicates
    pub fn tag(&mut self, reason: &str) {
        self.why.push(reason.to_string());
        self.why = dedupe_preserve(std::mem::take(&mut self.why));
    }
}

/// `semantic: 0.73`
pub fn semantic_trace(score: f64) -> String {
    format!("semantic: {:.2}", score)
}

/// Drop repeated strings, keeping first occurrences in order
pub fn dedupe_preserve(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
