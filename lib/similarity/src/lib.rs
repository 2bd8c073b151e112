//! # molscreen-similarity
//!
//! Feature spaces, similarity metrics, and the candidate-vs-reference
//! scoring engine.
//!
//! ## Architecture
//!
//! ```text
//! +--------------+      +----------------+      +-------------------+
//! |  Encoders    |----->| FeatureVector  |----->|  score_space()    |
//! | (chem/embed) |      | (space + data  |      |  batched scoring  |
//! +--------------+      |  or absent)    |      +---------+---------+
//!                       +----------------+                |
//!                                ^                        v
//!                       +--------+-------+      +-------------------+
//!                       |  ReferenceSet  |      | SimilarityResult  |
//!                       |  (precomputed, |      | best/mean/row     |
//!                       |   read-only)   |      +-------------------+
//!                       +----------------+
//! ```
//!
//! The engine never inspects which encoder produced a vector; it dispatches
//! on the space's metric tag. Absent features propagate as `None` results.
//!
//! ## Example
//!
//! ```rust
//! use molscreen_similarity::{
//!     score_space, FeatureSpace, FeatureVector, ReferenceFeatures, ReferenceSet,
//! };
//! use molscreen_chem::{morgan_fingerprint_default, parse_smiles};
//!
//! let fp = |s: &str| {
//!     FeatureVector::binary(
//!         FeatureSpace::MorganFingerprint,
//!         morgan_fingerprint_default(&parse_smiles(s).unwrap()),
//!     )
//! };
//!
//! let refs = ReferenceFeatures::new(
//!     FeatureSpace::MorganFingerprint,
//!     vec![fp("CCO"), fp("c1ccccc1")],
//! ).unwrap();
//! let set = ReferenceSet::new(vec!["ethanol".into(), "benzene".into()], vec![refs]).unwrap();
//!
//! let results = score_space(&[fp("CCO")], &set, FeatureSpace::MorganFingerprint).unwrap();
//! assert_eq!(results[0].as_ref().unwrap().best_reference, "ethanol");
//! ```

pub mod engine;
pub mod error;
pub mod feature;
pub mod metric;
pub mod reference;

pub use engine::{score_space, SimilarityResult};
pub use error::{Result, SimilarityError};
pub use feature::{FeatureData, FeatureSpace, FeatureVector, Metric};
pub use metric::{cosine, dice, euclidean, tanimoto, tversky};
pub use reference::{ReferenceFeatures, ReferenceSet};
