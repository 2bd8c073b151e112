use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Fatal errors: configuration problems caught before any row is processed,
/// and resource exhaustion that survived its retry. Per-molecule failures
/// never appear here; they live in each row's error field.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Missing required column '{column}' in {path:?} (case-insensitive match)")]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("Input file {0:?} contains no usable rows")]
    EmptyInput(PathBuf),

    #[error("CSV error in {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Model error: {0}")]
    Model(#[from] molscreen_embed::EmbedError),

    #[error("Similarity engine error: {0}")]
    Similarity(#[from] molscreen_similarity::SimilarityError),

    #[error("Device memory exhausted even after halving the batch size to {final_batch_size}")]
    DeviceExhaustedAfterRetry { final_batch_size: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
