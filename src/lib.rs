//! # molscreen
//!
//! Batch compound screening: chemical-similarity and property profiles for
//! a candidate library against a set of reference molecules, combining
//! structural fingerprints, physicochemical descriptors, and neural
//! embeddings from a pretrained chemical language model.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! molscreen --compounds library.csv --controls references.csv \
//!     --model chemberta-base --device cpu --output results
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use molscreen::prelude::*;
//! use std::path::Path;
//!
//! let candidates = load_structures(Path::new("library.csv"))?;
//! let references = load_structures(Path::new("references.csv"))?;
//!
//! let bundle = resolve_model("chemberta-base", Path::new("models"))?;
//! let encoder = EmbeddingEncoder::<CpuBackend>::load(&bundle, CpuDevice::Cpu)?;
//!
//! let outcome = run_screen(
//!     &candidates,
//!     &references,
//!     &encoder,
//!     None,
//!     &PipelineConfig::default(),
//!     None,
//! )?;
//! write_table(Path::new("results.csv"), &outcome.records, &outcome.reference_names)?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Crate Structure
//!
//! molscreen is composed of several crates:
//!
//! - [`molscreen-chem`](https://docs.rs/molscreen-chem) - SMILES parsing, fingerprints, descriptors
//! - [`molscreen-similarity`](https://docs.rs/molscreen-similarity) - feature spaces and the scoring engine
//! - [`molscreen-embed`](https://docs.rs/molscreen-embed) - neural embedding inference and model bundles
//! - [`molscreen-pipeline`](https://docs.rs/molscreen-pipeline) - ingestion, run loop, aggregation, output

// Re-export chemistry core
pub use molscreen_chem::{
    maccs_fingerprint, morgan_fingerprint_default, parse_smiles, property_profile, qed,
    ChemError, Fingerprint, Molecule, PropertyProfile, RuleThresholds,
};

// Re-export similarity engine
pub use molscreen_similarity::{
    cosine, score_space, tanimoto, FeatureSpace, FeatureVector, ReferenceFeatures, ReferenceSet,
    SimilarityResult,
};

// Re-export embedding encoder
pub use molscreen_embed::{
    resolve_model, CpuBackend, CpuDevice, EmbeddingEncoder, ModelBundle, SmilesTransformerConfig,
};

// Re-export pipeline
pub use molscreen_pipeline::{
    load_structures, run_screen, write_table, BatchEncoder, CancelToken, CommandDtiScorer,
    CompoundRecord, DtiScorer, InputRow, PipelineConfig, PipelineError, ScreenOutcome,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        load_structures, parse_smiles, resolve_model, run_screen, write_table, BatchEncoder,
        CancelToken, CompoundRecord, CpuBackend, CpuDevice, EmbeddingEncoder, FeatureSpace,
        FeatureVector, InputRow, ModelBundle, Molecule, PipelineConfig, PropertyProfile,
        ReferenceSet, RuleThresholds, ScreenOutcome, SimilarityResult,
    };
}
