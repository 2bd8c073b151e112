//! Feature spaces and tagged feature vectors.
//!
//! Every encoder output is a [`FeatureVector`]: a space tag plus either the
//! computed data or an explicit absent marker. Absence is a first-class
//! variant, not a zero vector - a zeroed fingerprint would score spurious
//! similarity against other degenerate vectors, and a zeroed embedding
//! would silently shift cosine statistics.

use serde::{Deserialize, Serialize};

use molscreen_chem::Fingerprint;

/// The feature spaces a molecule can be encoded into. Each carries the
/// metric used to compare vectors within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureSpace {
    /// Circular (Morgan/ECFP) hashed fingerprint, 2048 bits.
    MorganFingerprint,
    /// Fixed-dictionary 166-key structural fingerprint.
    MaccsKeys,
    /// Physicochemical descriptor vector.
    Properties,
    /// Dense neural embedding from the sequence model.
    Embedding,
}

/// Similarity metric associated with a feature space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    /// Set-overlap coefficient on binary vectors, bounded in [0, 1].
    Tanimoto,
    /// Normalized inner product on dense vectors, bounded in [-1, 1].
    Cosine,
}

impl FeatureSpace {
    /// The metric used to compare vectors in this space.
    pub fn metric(self) -> Metric {
        match self {
            FeatureSpace::MorganFingerprint | FeatureSpace::MaccsKeys => Metric::Tanimoto,
            FeatureSpace::Properties | FeatureSpace::Embedding => Metric::Cosine,
        }
    }

    /// Short label used in output column names.
    pub fn label(self) -> &'static str {
        match self {
            FeatureSpace::MorganFingerprint => "Tanimoto",
            FeatureSpace::MaccsKeys => "Maccs",
            FeatureSpace::Properties => "Props",
            FeatureSpace::Embedding => "Cosine",
        }
    }
}

/// The payload of an available feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeatureData {
    Binary(Fingerprint),
    Dense(Vec<f32>),
}

impl FeatureData {
    /// Vector length: bit count for binary data, component count for dense.
    pub fn len(&self) -> usize {
        match self {
            FeatureData::Binary(fp) => fp.nbits(),
            FeatureData::Dense(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A feature in one space: the data, or the explicit unavailable marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub space: FeatureSpace,
    pub data: Option<FeatureData>,
}

impl FeatureVector {
    pub fn binary(space: FeatureSpace, fingerprint: Fingerprint) -> Self {
        FeatureVector {
            space,
            data: Some(FeatureData::Binary(fingerprint)),
        }
    }

    pub fn dense(space: FeatureSpace, components: Vec<f32>) -> Self {
        FeatureVector {
            space,
            data: Some(FeatureData::Dense(components)),
        }
    }

    /// The marker for a feature the producing stage could not compute.
    pub fn unavailable(space: FeatureSpace) -> Self {
        FeatureVector { space, data: None }
    }

    #[inline]
    pub fn is_available(&self) -> bool {
        self.data.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_map_to_metrics() {
        assert_eq!(FeatureSpace::MorganFingerprint.metric(), Metric::Tanimoto);
        assert_eq!(FeatureSpace::MaccsKeys.metric(), Metric::Tanimoto);
        assert_eq!(FeatureSpace::Embedding.metric(), Metric::Cosine);
        assert_eq!(FeatureSpace::Properties.metric(), Metric::Cosine);
    }

    #[test]
    fn unavailable_is_distinct_from_zero() {
        let absent = FeatureVector::unavailable(FeatureSpace::Embedding);
        let zeroed = FeatureVector::dense(FeatureSpace::Embedding, vec![0.0; 8]);
        assert!(!absent.is_available());
        assert!(zeroed.is_available());
        assert_ne!(absent, zeroed);
    }

    #[test]
    fn data_lengths() {
        let fp = Fingerprint::new(166);
        assert_eq!(FeatureData::Binary(fp).len(), 166);
        assert_eq!(FeatureData::Dense(vec![0.0; 32]).len(), 32);
    }
}
