//! Batched embedding inference.
//!
//! The encoder owns a loaded model bound to one device for the whole run.
//! `encode_batch` amortizes padding and device transfer across a batch;
//! batch size trades memory for throughput and never changes a molecule's
//! vector, because padding is masked out of attention and pooling.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

use burn::tensor::backend::Backend;
use burn::tensor::{Bool, Int, Tensor, TensorData};

use crate::artifact::ModelBundle;
use crate::error::{EmbedError, Result};
use crate::model::SmilesTransformer;
use crate::tokenizer::{SmilesTokenizer, PAD_ID};

/// Default inference batch size.
pub const DEFAULT_BATCH_SIZE: usize = 32;

pub struct EmbeddingEncoder<B: Backend> {
    model: SmilesTransformer<B>,
    tokenizer: SmilesTokenizer,
    device: B::Device,
    max_seq_len: usize,
    dim: usize,
}

impl<B: Backend> EmbeddingEncoder<B> {
    /// Load a bundle onto `device`. The cold load happens here, once per
    /// run; the encoder is read-only afterwards.
    pub fn load(bundle_dir: &Path, device: B::Device) -> Result<Self> {
        let bundle = ModelBundle::open(bundle_dir)?;
        let model = bundle.load_model::<B>(&device)?;
        Ok(EmbeddingEncoder {
            model,
            tokenizer: bundle.tokenizer,
            device,
            max_seq_len: bundle.config.max_seq_len,
            dim: bundle.config.d_model,
        })
    }

    /// Build from already-loaded parts. Used by tests and by callers that
    /// construct fresh bundles in memory.
    pub fn from_parts(
        model: SmilesTransformer<B>,
        tokenizer: SmilesTokenizer,
        device: B::Device,
        max_seq_len: usize,
        dim: usize,
    ) -> Self {
        EmbeddingEncoder {
            model,
            tokenizer,
            device,
            max_seq_len,
            dim,
        }
    }

    /// Embedding dimensionality.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Embed a batch of structures, `batch_size` sequences per device call.
    ///
    /// Returns one vector per input, in input order. Device memory
    /// exhaustion surfaces as [`EmbedError::DeviceExhausted`] so the caller
    /// can retry with a smaller batch.
    pub fn encode_batch(&self, smiles: &[String], batch_size: usize) -> Result<Vec<Vec<f32>>> {
        let batch_size = batch_size.max(1);
        let mut out = Vec::with_capacity(smiles.len());
        for chunk in smiles.chunks(batch_size) {
            out.extend(self.encode_chunk(chunk)?);
        }
        Ok(out)
    }

    fn encode_chunk(&self, chunk: &[String]) -> Result<Vec<Vec<f32>>> {
        let encoded: Vec<Vec<usize>> = chunk
            .iter()
            .map(|s| self.tokenizer.encode(s, self.max_seq_len))
            .collect();
        let seq_len = encoded.iter().map(Vec::len).max().unwrap_or(1);
        let batch = encoded.len();

        let mut ids = Vec::with_capacity(batch * seq_len);
        let mut mask = Vec::with_capacity(batch * seq_len);
        for tokens in &encoded {
            for pos in 0..seq_len {
                match tokens.get(pos) {
                    Some(&id) => {
                        ids.push(id as i32);
                        mask.push(false);
                    }
                    None => {
                        ids.push(PAD_ID as i32);
                        mask.push(true);
                    }
                }
            }
        }

        // The GPU backend reports allocation failure by panicking inside
        // the kernel launch; translate that into a typed resource error at
        // this boundary so the pipeline can halve the batch and retry.
        let forward = catch_unwind(AssertUnwindSafe(|| {
            let tokens = Tensor::<B, 2, Int>::from_data(
                TensorData::new(ids, [batch, seq_len]),
                &self.device,
            );
            let pad_mask = Tensor::<B, 2, Bool>::from_data(
                TensorData::new(mask, [batch, seq_len]),
                &self.device,
            );
            self.model.forward(tokens, pad_mask).into_data()
        }));

        let data = match forward {
            Ok(data) => data,
            Err(payload) => {
                let message = panic_message(payload);
                let lowered = message.to_lowercase();
                if lowered.contains("memory") || lowered.contains("alloc") {
                    return Err(EmbedError::DeviceExhausted { batch_size: batch });
                }
                return Err(EmbedError::Inference(message));
            }
        };

        let flat = data
            .to_vec::<f32>()
            .map_err(|e| EmbedError::Inference(format!("{e:?}")))?;
        Ok(flat.chunks(self.dim).map(|c| c.to_vec()).collect())
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SmilesTransformerConfig;
    use crate::tokenizer::default_smiles_vocab;
    use burn::backend::ndarray::{NdArray, NdArrayDevice};

    type B = NdArray<f32>;

    fn encoder() -> EmbeddingEncoder<B> {
        let device = NdArrayDevice::Cpu;
        let tokenizer = SmilesTokenizer::from_tokens(default_smiles_vocab()).unwrap();
        let config = SmilesTransformerConfig::new(tokenizer.vocab_size())
            .with_max_seq_len(64)
            .with_d_model(16)
            .with_d_ff(32)
            .with_n_heads(2)
            .with_n_layers(1);
        let model = config.init::<B>(&device);
        EmbeddingEncoder::from_parts(model, tokenizer, device, 64, 16)
    }

    fn smiles(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn one_vector_per_input_in_order() {
        let enc = encoder();
        let inputs = smiles(&["CCO", "c1ccccc1", "CCN", "C"]);
        let vectors = enc.encode_batch(&inputs, 2).unwrap();
        assert_eq!(vectors.len(), 4);
        assert!(vectors.iter().all(|v| v.len() == enc.dim()));
    }

    #[test]
    fn encoding_is_deterministic() {
        let enc = encoder();
        let inputs = smiles(&["CC(=O)Oc1ccccc1C(=O)O"]);
        let a = enc.encode_batch(&inputs, 8).unwrap();
        let b = enc.encode_batch(&inputs, 8).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn batch_size_does_not_change_vectors() {
        let enc = encoder();
        let inputs = smiles(&["CCO", "c1ccccc1", "CC(=O)Oc1ccccc1C(=O)O", "CCN", "CCCC"]);
        let one = enc.encode_batch(&inputs, 1).unwrap();
        let many = enc.encode_batch(&inputs, 32).unwrap();
        for (a, b) in one.iter().zip(many.iter()) {
            for (x, y) in a.iter().zip(b.iter()) {
                assert!((x - y).abs() < 1e-5, "{x} vs {y}");
            }
        }
    }

    #[test]
    fn zero_batch_size_is_clamped() {
        let enc = encoder();
        let vectors = enc.encode_batch(&smiles(&["CCO"]), 0).unwrap();
        assert_eq!(vectors.len(), 1);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let enc = encoder();
        let vectors = enc.encode_batch(&[], 8).unwrap();
        assert!(vectors.is_empty());
    }
}
