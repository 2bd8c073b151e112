use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EmbedError>;

#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("Model not found: '{0}' is neither a known alias nor a readable bundle directory")]
    ModelNotFound(String),

    #[error("Model bundle at {dir:?} is missing {file}")]
    BundleIncomplete { dir: PathBuf, file: &'static str },

    #[error("Failed to read model config: {0}")]
    Config(String),

    #[error("Failed to load model weights: {0}")]
    Record(String),

    #[error("Vocabulary file is empty or unreadable: {0}")]
    Vocabulary(String),

    #[error("Device memory exhausted while embedding a batch of {batch_size}")]
    DeviceExhausted { batch_size: usize },

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
