//! The sequence model: token + position embeddings feeding a transformer
//! encoder, pooled to one dense vector per molecule.

use burn::config::Config;
use burn::module::Module;
use burn::nn::transformer::{TransformerEncoder, TransformerEncoderConfig, TransformerEncoderInput};
use burn::nn::{Embedding, EmbeddingConfig};
use burn::tensor::backend::Backend;
use burn::tensor::{Bool, Int, Tensor};

/// Model hyperparameters, persisted as `config.json` in the bundle.
#[derive(Config, Debug)]
pub struct SmilesTransformerConfig {
    pub vocab_size: usize,
    #[config(default = 256)]
    pub max_seq_len: usize,
    #[config(default = 256)]
    pub d_model: usize,
    #[config(default = 512)]
    pub d_ff: usize,
    #[config(default = 4)]
    pub n_heads: usize,
    #[config(default = 4)]
    pub n_layers: usize,
}

impl SmilesTransformerConfig {
    /// Initialize the module graph on a device.
    pub fn init<B: Backend>(&self, device: &B::Device) -> SmilesTransformer<B> {
        SmilesTransformer {
            token_embedding: EmbeddingConfig::new(self.vocab_size, self.d_model).init(device),
            position_embedding: EmbeddingConfig::new(self.max_seq_len, self.d_model).init(device),
            encoder: TransformerEncoderConfig::new(
                self.d_model,
                self.d_ff,
                self.n_heads,
                self.n_layers,
            )
            .init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct SmilesTransformer<B: Backend> {
    token_embedding: Embedding<B>,
    position_embedding: Embedding<B>,
    encoder: TransformerEncoder<B>,
}

impl<B: Backend> SmilesTransformer<B> {
    /// Encode a padded token batch to one vector per sequence.
    ///
    /// `tokens` is `[batch, seq]`; `pad_mask` is `[batch, seq]` with `true`
    /// at padded positions. Padding is masked out of both attention and the
    /// mean pooling, so a molecule's vector does not depend on how much
    /// padding its batch carries.
    pub fn forward(
        &self,
        tokens: Tensor<B, 2, Int>,
        pad_mask: Tensor<B, 2, Bool>,
    ) -> Tensor<B, 2> {
        let [batch, seq] = tokens.dims();
        let device = tokens.device();

        let positions = Tensor::<B, 1, Int>::arange(0..seq as i64, &device)
            .reshape([1, seq])
            .expand([batch, seq]);

        let embedded =
            self.token_embedding.forward(tokens) + self.position_embedding.forward(positions);

        let encoded = self.encoder.forward(
            TransformerEncoderInput::new(embedded).mask_pad(pad_mask.clone()),
        );

        // Mean over real tokens only.
        let keep = pad_mask.bool_not().float(); // [batch, seq], 1.0 at real tokens
        let counts = keep.clone().sum_dim(1); // [batch, 1]
        let weighted = encoded * keep.unsqueeze_dim::<3>(2); // zero out padding
        let summed = weighted.sum_dim(1).squeeze::<2>(1); // [batch, d_model]

        summed / counts
    }
}
