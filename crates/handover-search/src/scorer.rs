//! Similarity scoring of a query vector against a catalog matrix.

use crate::error::{Error, Result};
use handover_embeddings::ScoreRange;

/// Score every matrix row against `query`, mapped into [0, 1].
///
/// Rows and query are expected to be unit length (or zero), so the dot
/// product is already the cosine similarity. `SignedCosine` scores are
/// remapped with `(s + 1) / 2`; `Unit` scores pass through. Every score is
/// clamped to [0, 1] against floating-point drift.
pub fn similarity_scores(query: &[f32], matrix: &[Vec<f32>], range: ScoreRange) -> Result<Vec<f64>> {
    if let Some(row) = matrix.first() {
        if row.len() != query.len() {
            return Err(Error::DimensionMismatch {
                expected: row.len(),
                actual: query.len(),
            });
        }
    }

    Ok(matrix
        .iter()
        .map(|row| normalize_score(dot(query, row), range))
        .collect())
}

/// Map a raw dot product into [0, 1] for the given range.
pub fn normalize_score(raw: f64, range: ScoreRange) -> f64 {
    let score = match range {
        ScoreRange::SignedCosine => (raw + 1.0) / 2.0,
        ScoreRange::Unit => raw,
    };
    score.clamp(0.0, 1.0)
}

fn dot(a: &[f32], b: &[f32]) -> f64 {
    a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum()
}
