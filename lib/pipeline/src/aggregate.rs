//! Per-candidate record assembly.
//!
//! The aggregator's contract: one [`CompoundRecord`] per input row, in
//! input order, with every stage failure isolated to the row it happened
//! on. The merge is pure bookkeeping; all scoring has already happened.

use serde::Serialize;

use molscreen_chem::PropertyProfile;
use molscreen_similarity::SimilarityResult;

use crate::normalize::ParsedInput;

/// The final per-row result.
#[derive(Debug, Clone, Serialize)]
pub struct CompoundRecord {
    /// The original input structure string.
    pub identity: String,
    pub name: Option<String>,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertyProfile>,
    /// Similarity against the reference set in the Morgan fingerprint space.
    #[serde(skip)]
    pub morgan: Option<SimilarityResult>,
    /// Similarity in the MACCS key space.
    #[serde(skip)]
    pub maccs: Option<SimilarityResult>,
    /// Similarity in the neural embedding space.
    #[serde(skip)]
    pub embedding: Option<SimilarityResult>,
    /// External DTI score, when a scorer ran and could score this row.
    pub dti_score: Option<f64>,
    /// First failure recorded for this row, if any stage failed.
    pub error: Option<String>,
}

/// Merge one batch worth of stage outputs into records.
///
/// All slices must be batch-length and batch-ordered; the output preserves
/// that order exactly. A `None` in any stage slot simply leaves that field
/// unavailable on the row.
pub fn merge_batch(
    parsed: Vec<ParsedInput>,
    profiles: Vec<Option<PropertyProfile>>,
    morgan: Vec<Option<SimilarityResult>>,
    maccs: Vec<Option<SimilarityResult>>,
    embedding: Vec<Option<SimilarityResult>>,
    stage_errors: Vec<Option<String>>,
) -> Vec<CompoundRecord> {
    debug_assert_eq!(parsed.len(), profiles.len());
    debug_assert_eq!(parsed.len(), morgan.len());
    debug_assert_eq!(parsed.len(), maccs.len());
    debug_assert_eq!(parsed.len(), embedding.len());
    debug_assert_eq!(parsed.len(), stage_errors.len());

    parsed
        .into_iter()
        .zip(profiles)
        .zip(morgan)
        .zip(maccs)
        .zip(embedding)
        .zip(stage_errors)
        .map(
            |(((((input, profile), morgan), maccs), embedding), stage_error)| {
                let valid = input.is_valid();
                let error = input.parse_error.or(stage_error);
                CompoundRecord {
                    identity: input.identity,
                    name: input.name,
                    valid,
                    properties: profile,
                    morgan,
                    maccs,
                    embedding,
                    dti_score: None,
                    error,
                }
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::InputRow;
    use crate::normalize::normalize_rows;

    fn rows(structures: &[&str]) -> Vec<ParsedInput> {
        let rows: Vec<InputRow> = structures
            .iter()
            .map(|s| InputRow {
                structure: s.to_string(),
                name: None,
            })
            .collect();
        normalize_rows(&rows)
    }

    #[test]
    fn order_and_count_preserved_with_failures() {
        let parsed = rows(&["CCO", "((bad", "c1ccccc1"]);
        let n = parsed.len();
        let records = merge_batch(
            parsed,
            vec![None; n],
            vec![None; n],
            vec![None; n],
            vec![None; n],
            vec![None; n],
        );
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].identity, "CCO");
        assert_eq!(records[1].identity, "((bad");
        assert_eq!(records[2].identity, "c1ccccc1");
        assert!(records[0].valid);
        assert!(!records[1].valid);
        assert!(records[1].error.is_some());
        assert!(records[2].valid);
    }

    #[test]
    fn parse_error_wins_over_stage_error() {
        let parsed = rows(&["((bad"]);
        let records = merge_batch(
            parsed,
            vec![None],
            vec![None],
            vec![None],
            vec![None],
            vec![Some("embedding failed".into())],
        );
        let error = records[0].error.as_deref().unwrap();
        assert!(!error.contains("embedding"), "parse error should win: {error}");
    }

    #[test]
    fn stage_error_recorded_for_valid_rows() {
        let parsed = rows(&["CCO"]);
        let records = merge_batch(
            parsed,
            vec![None],
            vec![None],
            vec![None],
            vec![None],
            vec![Some("embedding failed".into())],
        );
        assert!(records[0].valid);
        assert_eq!(records[0].error.as_deref(), Some("embedding failed"));
    }
}
