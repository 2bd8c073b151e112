//! # molscreen-pipeline
//!
//! Batch screening orchestration: CSV ingestion, row normalization, the
//! batched run loop with resource retry and cancellation, per-row
//! aggregation, and the stable output table.
//!
//! ## Data flow
//!
//! ```text
//! candidates.csv   references.csv
//!       |                |
//!   load_structures  load_structures
//!       |                |
//!       |         build reference set (normalize + all feature spaces,
//!       |          computed once, shared read-only)
//!       v                v
//!   per batch: normalize -> {fingerprints, properties, embeddings}
//!                 -> score_space x3 -> merge_batch
//!       |
//!       v
//!   CompoundRecord table (input order) -> write_table -> <prefix>.csv
//! ```
//!
//! Error taxonomy: configuration problems ([`PipelineError`]) abort before
//! any row is processed; per-molecule failures land in that row's error
//! field; device exhaustion is retried once at half batch size; external
//! DTI failure degrades the run without touching computed results.

pub mod aggregate;
pub mod dti;
pub mod error;
pub mod loader;
pub mod normalize;
pub mod output;
pub mod run;

pub use aggregate::{merge_batch, CompoundRecord};
pub use dti::{CommandDtiScorer, DtiError, DtiScorer};
pub use error::{PipelineError, Result};
pub use loader::{load_structures, InputRow};
pub use normalize::{normalize_row, normalize_rows, ParsedInput};
pub use output::write_table;
pub use run::{
    encode_with_retry, run_screen, BatchEncoder, CancelToken, PipelineConfig, ScreenOutcome,
};
