//! The similarity engine: candidate-vs-reference scoring and reduction.
//!
//! Cost is O(candidates x references x dimension) per space, so both paths
//! are batched: dense spaces reduce to one row-normalized matrix product,
//! binary spaces run word-popcount rows data-parallel across the batch.
//! Reduction per candidate keeps the full per-reference row for downstream
//! diagnostics.

use ndarray::Array2;
use rayon::prelude::*;

use crate::error::{Result, SimilarityError};
use crate::feature::{FeatureData, FeatureSpace, FeatureVector, Metric};
use crate::metric::tanimoto;
use crate::reference::ReferenceSet;

/// Per-candidate outcome of scoring one feature space.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityResult {
    /// Highest similarity across the reference set.
    pub best_score: f64,
    /// Identity of the best-matching reference. Ties resolve to the first
    /// occurrence in reference input order.
    pub best_reference: String,
    /// Arithmetic mean similarity across all references.
    pub mean_score: f64,
    /// Full similarity row, one entry per reference in input order.
    pub per_reference: Vec<f64>,
}

impl SimilarityResult {
    fn from_row(row: Vec<f64>, reference_ids: &[String]) -> Self {
        debug_assert_eq!(row.len(), reference_ids.len());
        let mut best_idx = 0;
        for (i, &score) in row.iter().enumerate() {
            // Strictly greater, so equal scores keep the earliest reference.
            if score > row[best_idx] {
                best_idx = i;
            }
        }
        let mean = row.iter().sum::<f64>() / row.len() as f64;
        SimilarityResult {
            best_score: row[best_idx],
            best_reference: reference_ids[best_idx].clone(),
            mean_score: mean,
            per_reference: row,
        }
    }
}

/// Score every candidate against the reference set in one feature space.
///
/// Returns one entry per candidate, in candidate order. Candidates whose
/// feature is the unavailable marker yield `None` - absence propagates, it
/// is never scored. An empty reference set yields `None` for every
/// candidate.
pub fn score_space(
    candidates: &[FeatureVector],
    set: &ReferenceSet,
    space: FeatureSpace,
) -> Result<Vec<Option<SimilarityResult>>> {
    let refs = set
        .features(space)
        .ok_or(SimilarityError::MissingSpace(space))?;

    for candidate in candidates {
        if candidate.space != space {
            return Err(SimilarityError::SpaceMismatch {
                expected: space,
                actual: candidate.space,
            });
        }
    }

    if refs.is_empty() {
        return Ok(vec![None; candidates.len()]);
    }

    let ref_dim = refs.vectors()[0].len();
    for candidate in candidates.iter().filter(|c| c.is_available()) {
        let dim = candidate.data.as_ref().map(FeatureData::len).unwrap_or(0);
        if dim != ref_dim {
            return Err(SimilarityError::DimensionMismatch {
                expected: ref_dim,
                actual: dim,
            });
        }
    }

    match space.metric() {
        Metric::Tanimoto => Ok(score_binary(candidates, refs.vectors(), set.ids())),
        Metric::Cosine => match refs.normalized_matrix() {
            Some(matrix) => Ok(score_dense(candidates, matrix, set.ids())),
            // Dense metric but no dense data: nothing can be scored.
            None => Ok(vec![None; candidates.len()]),
        },
    }
}

/// Binary path: one popcount row per candidate, data-parallel across the
/// batch. Row order follows candidate order regardless of scheduling.
fn score_binary(
    candidates: &[FeatureVector],
    references: &[FeatureData],
    reference_ids: &[String],
) -> Vec<Option<SimilarityResult>> {
    candidates
        .par_iter()
        .map(|candidate| {
            let FeatureData::Binary(fp) = candidate.data.as_ref()? else {
                return None;
            };
            let row: Vec<f64> = references
                .iter()
                .map(|r| match r {
                    FeatureData::Binary(rfp) => tanimoto(fp, rfp),
                    FeatureData::Dense(_) => 0.0,
                })
                .collect();
            Some(SimilarityResult::from_row(row, reference_ids))
        })
        .collect()
}

/// Dense path: stack the available candidates into a row-normalized matrix
/// and take one product against the normalized reference matrix. Cosine of
/// normalized rows is exactly the inner product.
fn score_dense(
    candidates: &[FeatureVector],
    reference_matrix: &Array2<f32>,
    reference_ids: &[String],
) -> Vec<Option<SimilarityResult>> {
    let dim = reference_matrix.ncols();

    let available: Vec<(usize, &Vec<f32>)> = candidates
        .iter()
        .enumerate()
        .filter_map(|(i, c)| match c.data.as_ref() {
            Some(FeatureData::Dense(v)) => Some((i, v)),
            _ => None,
        })
        .collect();

    let mut results: Vec<Option<SimilarityResult>> = vec![None; candidates.len()];
    if available.is_empty() {
        return results;
    }

    let mut query = Array2::<f32>::zeros((available.len(), dim));
    for (row, (_, v)) in available.iter().enumerate() {
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for (col, &x) in v.iter().enumerate() {
                query[(row, col)] = x / norm;
            }
        }
    }

    // (available x dim) . (dim x references) -> full similarity matrix.
    let scores = query.dot(&reference_matrix.t());

    for (row, &(candidate_idx, _)) in available.iter().enumerate() {
        let sims: Vec<f64> = scores
            .row(row)
            .iter()
            .map(|&s| (s as f64).clamp(-1.0, 1.0))
            .collect();
        results[candidate_idx] = Some(SimilarityResult::from_row(sims, reference_ids));
    }
    results
}
