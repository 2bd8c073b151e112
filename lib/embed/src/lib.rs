//! # molscreen-embed
//!
//! Neural embedding encoder: a pretrained (or fine-tuned) chemical
//! sequence model turning structures into fixed-length dense vectors.
//!
//! - [`ModelBundle`] - the on-disk artifact format shared by stock and
//!   fine-tuned models (`config.json` + `model.mpk` + `vocab.txt`)
//! - [`resolve_model`] - alias-or-path resolution against a models root
//! - [`EmbeddingEncoder`] - batched, device-bound inference with masked
//!   mean pooling
//!
//! The encoder is generic over the burn backend: the ndarray backend is
//! always compiled in, and the `gpu` feature adds wgpu.

pub mod artifact;
pub mod encoder;
pub mod error;
pub mod model;
pub mod tokenizer;

// Re-exported so downstream crates can name backend types without taking
// their own burn dependency.
pub use burn;

pub use artifact::{resolve_model, ModelBundle, MODELS_DIR_ENV, MODEL_ALIASES};
pub use encoder::{EmbeddingEncoder, DEFAULT_BATCH_SIZE};
pub use error::{EmbedError, Result};
pub use model::{SmilesTransformer, SmilesTransformerConfig};
pub use tokenizer::{default_smiles_vocab, SmilesTokenizer};

/// The CPU backend, always available.
pub type CpuBackend = burn::backend::ndarray::NdArray<f32>;
/// The CPU device.
pub type CpuDevice = burn::backend::ndarray::NdArrayDevice;

/// The GPU backend, behind the `gpu` feature.
#[cfg(feature = "gpu")]
pub type GpuBackend = burn::backend::wgpu::Wgpu<f32, i32>;
/// The GPU device.
#[cfg(feature = "gpu")]
pub type GpuDevice = burn::backend::wgpu::WgpuDevice;
