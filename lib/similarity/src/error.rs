use thiserror::Error;

use crate::feature::FeatureSpace;

pub type Result<T> = std::result::Result<T, SimilarityError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimilarityError {
    #[error("Feature space mismatch: expected {expected:?}, got {actual:?}")]
    SpaceMismatch {
        expected: FeatureSpace,
        actual: FeatureSpace,
    },

    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Reference set carries an unavailable feature; filter invalid references before building")]
    UnavailableReference,

    #[error("Reference id/vector count mismatch: {ids} ids, {vectors} vectors")]
    ReferenceCountMismatch { ids: usize, vectors: usize },

    #[error("Reference set has no features for space {0:?}")]
    MissingSpace(FeatureSpace),
}
