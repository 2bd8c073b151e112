//! The shared reference set.
//!
//! Built once per run from the valid reference molecules, then used
//! read-only by every candidate comparison. Dense spaces additionally
//! precompute a row-normalized matrix so candidate scoring is one matrix
//! product per batch.

use ndarray::Array2;

use crate::error::{Result, SimilarityError};
use crate::feature::{FeatureData, FeatureSpace, FeatureVector};

/// Precomputed reference features for a single space.
#[derive(Debug, Clone)]
pub struct ReferenceFeatures {
    space: FeatureSpace,
    vectors: Vec<FeatureData>,
    /// Row-normalized reference matrix, dense spaces only.
    normalized: Option<Array2<f32>>,
}

impl ReferenceFeatures {
    /// Build from per-reference features. Every vector must be available
    /// and share the space's dimensionality; references with failed
    /// encodings are expected to be filtered out before this point.
    pub fn new(space: FeatureSpace, features: Vec<FeatureVector>) -> Result<Self> {
        let mut vectors = Vec::with_capacity(features.len());
        for fv in features {
            if fv.space != space {
                return Err(SimilarityError::SpaceMismatch {
                    expected: space,
                    actual: fv.space,
                });
            }
            match fv.data {
                Some(data) => vectors.push(data),
                None => return Err(SimilarityError::UnavailableReference),
            }
        }
        if let Some(first) = vectors.first() {
            let dim = first.len();
            for v in &vectors {
                if v.len() != dim {
                    return Err(SimilarityError::DimensionMismatch {
                        expected: dim,
                        actual: v.len(),
                    });
                }
            }
        }

        let normalized = build_normalized_matrix(&vectors);
        Ok(ReferenceFeatures {
            space,
            vectors,
            normalized,
        })
    }

    #[inline]
    pub fn space(&self) -> FeatureSpace {
        self.space
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    #[inline]
    pub fn vectors(&self) -> &[FeatureData] {
        &self.vectors
    }

    /// Row-normalized dense matrix (references x dim), if this is a dense
    /// space with at least one reference.
    #[inline]
    pub fn normalized_matrix(&self) -> Option<&Array2<f32>> {
        self.normalized.as_ref()
    }
}

fn build_normalized_matrix(vectors: &[FeatureData]) -> Option<Array2<f32>> {
    let dim = match vectors.first() {
        Some(FeatureData::Dense(v)) => v.len(),
        _ => return None,
    };
    let mut matrix = Array2::<f32>::zeros((vectors.len(), dim));
    for (row, data) in vectors.iter().enumerate() {
        let FeatureData::Dense(v) = data else {
            return None;
        };
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for (col, &x) in v.iter().enumerate() {
                matrix[(row, col)] = x / norm;
            }
        }
    }
    Some(matrix)
}

/// The immutable reference collection every candidate is compared against.
#[derive(Debug, Clone)]
pub struct ReferenceSet {
    ids: Vec<String>,
    spaces: Vec<ReferenceFeatures>,
}

impl ReferenceSet {
    /// Assemble the set from reference identities and their per-space
    /// features. Each space must carry exactly one vector per reference.
    pub fn new(ids: Vec<String>, spaces: Vec<ReferenceFeatures>) -> Result<Self> {
        for features in &spaces {
            if features.len() != ids.len() {
                return Err(SimilarityError::ReferenceCountMismatch {
                    ids: ids.len(),
                    vectors: features.len(),
                });
            }
        }
        Ok(ReferenceSet { ids, spaces })
    }

    #[inline]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Features for one space, if that space was precomputed.
    pub fn features(&self, space: FeatureSpace) -> Option<&ReferenceFeatures> {
        self.spaces.iter().find(|f| f.space() == space)
    }

    pub fn spaces(&self) -> impl Iterator<Item = FeatureSpace> + '_ {
        self.spaces.iter().map(|f| f.space())
    }
}
