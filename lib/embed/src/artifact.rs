//! Model artifact bundles and alias resolution.
//!
//! A bundle is a directory holding `config.json`, `model.mpk`, and
//! `vocab.txt`. Stock pretrained models and fine-tuned outputs share this
//! one format, so the encoder loads both through the same path. Aliases
//! resolve to subdirectories of a models root; anything else is treated as
//! a bundle path directly.

use std::path::{Path, PathBuf};

use burn::config::Config;
use burn::module::Module;
use burn::record::{FullPrecisionSettings, NamedMpkFileRecorder};
use burn::tensor::backend::Backend;

use crate::error::{EmbedError, Result};
use crate::model::{SmilesTransformer, SmilesTransformerConfig};
use crate::tokenizer::SmilesTokenizer;

pub const CONFIG_FILE: &str = "config.json";
pub const VOCAB_FILE: &str = "vocab.txt";
/// Weight file stem; the recorder appends `.mpk`.
pub const WEIGHTS_STEM: &str = "model";

/// Short aliases for the stock pretrained models, mapped to their bundle
/// directory names under the models root.
pub const MODEL_ALIASES: &[(&str, &str)] = &[
    ("chemberta-base", "chemberta-zinc-base-v1"),
    ("chemberta-77m", "chemberta-zinc-77m"),
    ("chemberta-mtr", "chemberta-77m-mtr"),
    ("chemberta-mlm", "chemberta-77m-mlm"),
];

/// Environment variable overriding the default models root.
pub const MODELS_DIR_ENV: &str = "MOLSCREEN_MODELS_DIR";

/// Resolve a model spec (alias or path) to a bundle directory.
pub fn resolve_model(spec: &str, models_dir: &Path) -> Result<PathBuf> {
    let lowered = spec.to_lowercase();
    if let Some((_, dir)) = MODEL_ALIASES.iter().find(|(alias, _)| *alias == lowered) {
        let path = models_dir.join(dir);
        if path.is_dir() {
            return Ok(path);
        }
        return Err(EmbedError::ModelNotFound(format!(
            "alias '{spec}' resolves to {} which does not exist",
            path.display()
        )));
    }
    let path = PathBuf::from(spec);
    if path.is_dir() {
        return Ok(path);
    }
    Err(EmbedError::ModelNotFound(spec.to_string()))
}

/// A loaded bundle: config and tokenizer, with the weights left on disk
/// until a backend is chosen.
#[derive(Debug)]
pub struct ModelBundle {
    dir: PathBuf,
    pub config: SmilesTransformerConfig,
    pub tokenizer: SmilesTokenizer,
}

impl ModelBundle {
    /// Open a bundle directory, validating that all three files exist.
    pub fn open(dir: &Path) -> Result<Self> {
        for file in [CONFIG_FILE, VOCAB_FILE] {
            if !dir.join(file).is_file() {
                return Err(EmbedError::BundleIncomplete {
                    dir: dir.to_path_buf(),
                    file,
                });
            }
        }
        if !dir.join(format!("{WEIGHTS_STEM}.mpk")).is_file() {
            return Err(EmbedError::BundleIncomplete {
                dir: dir.to_path_buf(),
                file: "model.mpk",
            });
        }

        let config = SmilesTransformerConfig::load(dir.join(CONFIG_FILE))
            .map_err(|e| EmbedError::Config(e.to_string()))?;
        let tokenizer = SmilesTokenizer::from_file(&dir.join(VOCAB_FILE))?;

        Ok(ModelBundle {
            dir: dir.to_path_buf(),
            config,
            tokenizer,
        })
    }

    /// Load the weights onto a device. This is the cold-load cost paid once
    /// per run; the returned module is read-only during inference.
    pub fn load_model<B: Backend>(&self, device: &B::Device) -> Result<SmilesTransformer<B>> {
        let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::default();
        self.config
            .init::<B>(device)
            .load_file(self.dir.join(WEIGHTS_STEM), &recorder, device)
            .map_err(|e| EmbedError::Record(e.to_string()))
    }

    /// Write a model, its config, and its vocabulary as a bundle.
    ///
    /// This is the artifact contract for fine-tuning producers: anything
    /// saved here loads back through [`ModelBundle::open`].
    pub fn save<B: Backend>(
        dir: &Path,
        config: &SmilesTransformerConfig,
        model: SmilesTransformer<B>,
        vocab: &[String],
    ) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        config
            .save(dir.join(CONFIG_FILE))
            .map_err(|e| EmbedError::Config(e.to_string()))?;
        std::fs::write(dir.join(VOCAB_FILE), vocab.join("\n"))?;
        let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::default();
        model
            .save_file(dir.join(WEIGHTS_STEM), &recorder)
            .map_err(|e| EmbedError::Record(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::default_smiles_vocab;
    use burn::backend::ndarray::{NdArray, NdArrayDevice};
    use tempfile::tempdir;

    type B = NdArray<f32>;

    fn small_config(vocab_size: usize) -> SmilesTransformerConfig {
        SmilesTransformerConfig::new(vocab_size)
            .with_max_seq_len(32)
            .with_d_model(16)
            .with_d_ff(32)
            .with_n_heads(2)
            .with_n_layers(1)
    }

    #[test]
    fn save_then_open_round_trip() {
        let dir = tempdir().unwrap();
        let device = NdArrayDevice::Cpu;
        let vocab = default_smiles_vocab();
        let tokenizer = SmilesTokenizer::from_tokens(vocab.clone()).unwrap();
        let config = small_config(tokenizer.vocab_size());
        let model = config.init::<B>(&device);

        ModelBundle::save(dir.path(), &config, model, &vocab).unwrap();

        let bundle = ModelBundle::open(dir.path()).unwrap();
        assert_eq!(bundle.config.d_model, 16);
        assert_eq!(bundle.tokenizer.vocab_size(), tokenizer.vocab_size());
        assert!(bundle.load_model::<B>(&device).is_ok());
    }

    #[test]
    fn missing_files_are_reported() {
        let dir = tempdir().unwrap();
        let err = ModelBundle::open(dir.path()).unwrap_err();
        assert!(matches!(err, EmbedError::BundleIncomplete { .. }));
    }

    #[test]
    fn unknown_alias_or_path_is_not_found() {
        let dir = tempdir().unwrap();
        let err = resolve_model("no-such-model", dir.path()).unwrap_err();
        assert!(matches!(err, EmbedError::ModelNotFound(_)));
    }

    #[test]
    fn alias_resolves_when_directory_exists() {
        let root = tempdir().unwrap();
        let target = root.path().join("chemberta-zinc-base-v1");
        std::fs::create_dir_all(&target).unwrap();
        let resolved = resolve_model("chemberta-base", root.path()).unwrap();
        assert_eq!(resolved, target);
        // Case-insensitive alias match.
        assert!(resolve_model("ChemBERTa-Base", root.path()).is_ok());
    }

    #[test]
    fn explicit_path_wins_over_aliases() {
        let dir = tempdir().unwrap();
        let resolved = resolve_model(dir.path().to_str().unwrap(), Path::new("/nonexistent"));
        assert!(resolved.is_ok());
    }
}
