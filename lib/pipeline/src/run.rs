//! The run loop: reference preprocessing, batched candidate screening,
//! resource retry, and cancellation.
//!
//! One controlling thread drives batched, vectorized operations. The
//! reference set and the loaded model are built once at run start and are
//! read-only afterwards; concurrency inside a batch is data-parallel
//! (fingerprints across molecules, popcount rows across candidates), never
//! task-parallel across batches.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{info, warn};

use molscreen_chem::{
    maccs_fingerprint, morgan_fingerprint_default, property_profile, PropertyProfile,
    RuleThresholds,
};
use molscreen_embed::burn::tensor::backend::Backend;
use molscreen_embed::{EmbedError, EmbeddingEncoder};
use molscreen_similarity::{
    score_space, FeatureSpace, FeatureVector, ReferenceFeatures, ReferenceSet,
};

use crate::aggregate::{merge_batch, CompoundRecord};
use crate::dti::DtiScorer;
use crate::error::{PipelineError, Result};
use crate::loader::InputRow;
use crate::normalize::{normalize_rows, ParsedInput};

/// Capability interface over the neural encoder, so the run loop can be
/// driven by any structure-to-vector model (and by fakes in tests).
pub trait BatchEncoder {
    /// Embedding dimensionality.
    fn dim(&self) -> usize;

    /// Embed structures in device batches of `batch_size`, one vector per
    /// input, in input order.
    fn encode_batch(
        &self,
        smiles: &[String],
        batch_size: usize,
    ) -> molscreen_embed::Result<Vec<Vec<f32>>>;
}

impl<B: Backend> BatchEncoder for EmbeddingEncoder<B> {
    fn dim(&self) -> usize {
        EmbeddingEncoder::dim(self)
    }

    fn encode_batch(
        &self,
        smiles: &[String],
        batch_size: usize,
    ) -> molscreen_embed::Result<Vec<Vec<f32>>> {
        EmbeddingEncoder::encode_batch(self, smiles, batch_size)
    }
}

/// Cooperative cancellation flag, checked at batch boundaries.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Run-level knobs.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Molecules per device batch; trades memory for throughput without
    /// changing any vector.
    pub batch_size: usize,
    /// Thresholds for the compliance flag.
    pub rules: RuleThresholds,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            batch_size: molscreen_embed::DEFAULT_BATCH_SIZE,
            rules: RuleThresholds::default(),
        }
    }
}

/// The completed (or cancelled-partial) run.
#[derive(Debug)]
pub struct ScreenOutcome {
    /// One record per candidate row processed, in input order. On a
    /// cancelled run this holds every batch completed before the check.
    pub records: Vec<CompoundRecord>,
    /// Display names of the references, in reference input order; aligned
    /// with every `per_reference` row in the records.
    pub reference_names: Vec<String>,
    pub cancelled: bool,
}

/// Screen candidates against references.
///
/// Fatal errors are configuration or resource problems; per-row failures
/// are recorded in the rows themselves and never abort the run.
pub fn run_screen(
    candidates: &[InputRow],
    references: &[InputRow],
    encoder: &dyn BatchEncoder,
    dti: Option<(&dyn DtiScorer, &str)>,
    config: &PipelineConfig,
    cancel: Option<&CancelToken>,
) -> Result<ScreenOutcome> {
    let batch_size = config.batch_size.max(1);

    let (reference_set, reference_names) =
        build_reference_set(references, encoder, batch_size)?;
    info!(
        references = reference_set.len(),
        candidates = candidates.len(),
        embedding_dim = encoder.dim(),
        "reference set ready"
    );

    let n_batches = candidates.len().div_ceil(batch_size);
    let bar = ProgressBar::new(n_batches as u64);
    bar.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] [{wide_bar}] {pos}/{len} batches")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );

    let mut records = Vec::with_capacity(candidates.len());
    let mut cancelled = false;

    for batch_rows in candidates.chunks(batch_size) {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            cancelled = true;
            warn!(
                completed = records.len(),
                "run cancelled; returning completed rows"
            );
            break;
        }

        let batch = screen_batch(batch_rows, &reference_set, encoder, config)?;
        records.extend(batch);
        bar.inc(1);
    }
    bar.finish_and_clear();

    if let Some((scorer, target)) = dti {
        apply_dti_scores(&mut records, scorer, target);
    }

    Ok(ScreenOutcome {
        records,
        reference_names,
        cancelled,
    })
}

/// Normalize, encode, and precompute every feature space for the reference
/// rows. Invalid references are skipped with a warning, mirroring how
/// control lists are usually cleaned upstream; the survivors are shared
/// read-only across all candidate batches.
fn build_reference_set(
    references: &[InputRow],
    encoder: &dyn BatchEncoder,
    batch_size: usize,
) -> Result<(ReferenceSet, Vec<String>)> {
    let parsed = normalize_rows(references);
    let mut valid: Vec<(&ParsedInput, &molscreen_chem::Molecule)> =
        Vec::with_capacity(parsed.len());
    for input in &parsed {
        match &input.molecule {
            Some(mol) => valid.push((input, mol)),
            None => {
                let reason = input.parse_error.as_deref().unwrap_or("unparseable");
                warn!(structure = %input.identity, reason, "skipping invalid reference");
            }
        }
    }

    let ids: Vec<String> = valid.iter().map(|(p, _)| p.identity.clone()).collect();
    let names: Vec<String> = valid
        .iter()
        .enumerate()
        .map(|(i, (p, _))| p.name.clone().unwrap_or_else(|| format!("Ctrl_{}", i + 1)))
        .collect();

    let (morgan, maccs): (Vec<FeatureVector>, Vec<FeatureVector>) = valid
        .par_iter()
        .map(|(_, mol)| {
            (
                FeatureVector::binary(
                    FeatureSpace::MorganFingerprint,
                    morgan_fingerprint_default(mol),
                ),
                FeatureVector::binary(FeatureSpace::MaccsKeys, maccs_fingerprint(mol)),
            )
        })
        .unzip();

    // References must be complete in every space; an encoder failure here
    // is fatal, unlike the per-row degradation applied to candidates.
    let embeddings = encode_with_retry(encoder, &ids, batch_size)?;
    let embedding_features: Vec<FeatureVector> = embeddings
        .into_iter()
        .map(|v| FeatureVector::dense(FeatureSpace::Embedding, v))
        .collect();

    let set = ReferenceSet::new(
        ids,
        vec![
            ReferenceFeatures::new(FeatureSpace::MorganFingerprint, morgan)?,
            ReferenceFeatures::new(FeatureSpace::MaccsKeys, maccs)?,
            ReferenceFeatures::new(FeatureSpace::Embedding, embedding_features)?,
        ],
    )?;
    Ok((set, names))
}

/// Process one candidate batch end to end.
fn screen_batch(
    batch_rows: &[InputRow],
    reference_set: &ReferenceSet,
    encoder: &dyn BatchEncoder,
    config: &PipelineConfig,
) -> Result<Vec<CompoundRecord>> {
    let parsed = normalize_rows(batch_rows);
    let n = parsed.len();

    // Chemistry features: data-parallel across the batch, order kept by
    // the indexed collect.
    type ChemRow = (
        Option<PropertyProfile>,
        FeatureVector,
        FeatureVector,
    );
    let chem: Vec<ChemRow> = parsed
        .par_iter()
        .map(|input| match &input.molecule {
            Some(mol) => (
                Some(property_profile(mol, &config.rules)),
                FeatureVector::binary(
                    FeatureSpace::MorganFingerprint,
                    morgan_fingerprint_default(mol),
                ),
                FeatureVector::binary(FeatureSpace::MaccsKeys, maccs_fingerprint(mol)),
            ),
            None => (
                None,
                FeatureVector::unavailable(FeatureSpace::MorganFingerprint),
                FeatureVector::unavailable(FeatureSpace::MaccsKeys),
            ),
        })
        .collect();

    let mut profiles = Vec::with_capacity(n);
    let mut morgan_features = Vec::with_capacity(n);
    let mut maccs_features = Vec::with_capacity(n);
    for (profile, morgan, maccs) in chem {
        profiles.push(profile);
        morgan_features.push(morgan);
        maccs_features.push(maccs);
    }

    // Embeddings for the valid rows of this batch.
    let mut embedding_features = vec![FeatureVector::unavailable(FeatureSpace::Embedding); n];
    let mut stage_errors: Vec<Option<String>> = vec![None; n];

    let valid_indices: Vec<usize> = (0..n).filter(|&i| parsed[i].is_valid()).collect();
    let valid_smiles: Vec<String> = valid_indices
        .iter()
        .map(|&i| parsed[i].identity.clone())
        .collect();

    if !valid_smiles.is_empty() {
        match encode_with_retry(encoder, &valid_smiles, config.batch_size) {
            Ok(vectors) => {
                for (&slot, vector) in valid_indices.iter().zip(vectors) {
                    embedding_features[slot] =
                        FeatureVector::dense(FeatureSpace::Embedding, vector);
                }
            }
            Err(fatal @ PipelineError::DeviceExhaustedAfterRetry { .. }) => {
                return Err(fatal);
            }
            Err(e) => {
                // Non-resource inference failure: degrade these rows,
                // keep their fingerprints and properties.
                warn!(error = %e, rows = valid_indices.len(), "embedding stage failed for batch");
                let message = format!("embedding failed: {e}");
                for &slot in &valid_indices {
                    stage_errors[slot] = Some(message.clone());
                }
            }
        }
    }

    let morgan_results = score_space(
        &morgan_features,
        reference_set,
        FeatureSpace::MorganFingerprint,
    )?;
    let maccs_results = score_space(&maccs_features, reference_set, FeatureSpace::MaccsKeys)?;
    let embedding_results =
        score_space(&embedding_features, reference_set, FeatureSpace::Embedding)?;

    Ok(merge_batch(
        parsed,
        profiles,
        morgan_results,
        maccs_results,
        embedding_results,
        stage_errors,
    ))
}

/// Embed with one halved-batch retry on device memory exhaustion. A second
/// exhaustion is fatal: no further automatic mitigation is defined.
pub fn encode_with_retry(
    encoder: &dyn BatchEncoder,
    smiles: &[String],
    batch_size: usize,
) -> Result<Vec<Vec<f32>>> {
    match encoder.encode_batch(smiles, batch_size) {
        Ok(vectors) => Ok(vectors),
        Err(EmbedError::DeviceExhausted { .. }) => {
            let halved = (batch_size / 2).max(1);
            warn!(
                batch_size,
                halved, "device memory exhausted; retrying once with a smaller batch"
            );
            match encoder.encode_batch(smiles, halved) {
                Ok(vectors) => Ok(vectors),
                Err(EmbedError::DeviceExhausted { .. }) => {
                    Err(PipelineError::DeviceExhaustedAfterRetry {
                        final_batch_size: halved,
                    })
                }
                Err(e) => Err(e.into()),
            }
        }
        Err(e) => Err(e.into()),
    }
}

/// Merge external DTI scores into the records. Scorer failure degrades the
/// run - the column stays empty, everything already computed is kept.
fn apply_dti_scores(records: &mut [CompoundRecord], scorer: &dyn DtiScorer, target: &str) {
    let structures: Vec<String> = records
        .iter()
        .filter(|r| r.valid)
        .map(|r| r.identity.clone())
        .collect();
    if structures.is_empty() {
        return;
    }

    match scorer.score(target, &structures) {
        Ok(scores) => {
            let mut iter = scores.into_iter();
            for record in records.iter_mut().filter(|r| r.valid) {
                record.dti_score = iter.next().flatten();
            }
            info!(scorer = scorer.name(), "DTI scores merged");
        }
        Err(e) => {
            warn!(
                scorer = scorer.name(),
                error = %e,
                "DTI scorer unavailable; results delivered without DTI column"
            );
        }
    }
}
