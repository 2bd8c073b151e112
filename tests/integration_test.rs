// Integration tests for molscreen: end-to-end runs over temp CSVs with a
// small model bundle created on the fly.
use std::fs;
use std::path::Path;

use molscreen::prelude::*;
use molscreen_embed::{default_smiles_vocab, SmilesTokenizer, SmilesTransformerConfig};

fn write_csv(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

/// Build a small bundle on disk and load it the way a stock model would be
/// loaded. This is also the fine-tuning artifact contract: anything saved
/// through ModelBundle::save must load through the same path.
fn make_bundle(dir: &Path) {
    let vocab = default_smiles_vocab();
    let tokenizer = SmilesTokenizer::from_tokens(vocab.clone()).unwrap();
    let config = SmilesTransformerConfig::new(tokenizer.vocab_size())
        .with_max_seq_len(64)
        .with_d_model(16)
        .with_d_ff(32)
        .with_n_heads(2)
        .with_n_layers(1);
    let model = config.init::<CpuBackend>(&CpuDevice::Cpu);
    ModelBundle::save(dir, &config, model, &vocab).unwrap();
}

fn load_encoder(dir: &Path) -> EmbeddingEncoder<CpuBackend> {
    EmbeddingEncoder::<CpuBackend>::load(dir, CpuDevice::Cpu).unwrap()
}

#[test]
fn test_end_to_end_screen() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = dir.path().join("bundle");
    make_bundle(&bundle);

    let compounds = dir.path().join("compounds.csv");
    let controls = dir.path().join("controls.csv");
    write_csv(
        &compounds,
        "smiles,name\nCCO,ethanol\nthis_is_not_smiles((,broken\nCC(=O)Oc1ccccc1C(=O)O,aspirin\n",
    );
    write_csv(&controls, "smiles,name\nCCO,ctrl_ethanol\nc1ccccc1,ctrl_benzene\n");

    let candidates = load_structures(&compounds).unwrap();
    let references = load_structures(&controls).unwrap();
    let encoder = load_encoder(&bundle);

    let outcome = run_screen(
        &candidates,
        &references,
        &encoder,
        None,
        &PipelineConfig::default(),
        None,
    )
    .unwrap();

    // Row count and order preserved, failure isolated to row 2.
    assert_eq!(outcome.records.len(), 3);
    assert_eq!(outcome.records[0].identity, "CCO");
    assert_eq!(outcome.records[1].identity, "this_is_not_smiles((");
    assert_eq!(outcome.records[2].identity, "CC(=O)Oc1ccccc1C(=O)O");
    assert!(outcome.records[0].valid);
    assert!(!outcome.records[1].valid);
    assert!(outcome.records[1].error.is_some());
    assert!(outcome.records[2].valid);

    // The ethanol candidate matches the ethanol control perfectly in
    // fingerprint space.
    let morgan = outcome.records[0].morgan.as_ref().unwrap();
    assert!((morgan.best_score - 1.0).abs() < 1e-12);
    assert_eq!(morgan.best_reference, "CCO");

    // Embedding similarity is a bounded cosine and self-similarity is ~1
    // (the candidate string equals the reference string).
    let embedding = outcome.records[0].embedding.as_ref().unwrap();
    assert!((embedding.best_score - 1.0).abs() < 1e-5);
    assert!(embedding
        .per_reference
        .iter()
        .all(|&s| (-1.0..=1.0).contains(&s)));

    // Properties: ethanol satisfies every extended rule threshold.
    let profile = outcome.records[0].properties.as_ref().unwrap();
    assert!(profile.compliant);
    assert!((profile.molecular_weight - 46.07).abs() < 0.05);

    // Reference display names flow through for the output columns.
    assert_eq!(outcome.reference_names, vec!["ctrl_ethanol", "ctrl_benzene"]);

    // And the table writes with one row per record.
    let out_path = dir.path().join("results.csv");
    write_table(&out_path, &outcome.records, &outcome.reference_names).unwrap();
    let table = fs::read_to_string(&out_path).unwrap();
    assert_eq!(table.lines().count(), 4);
    assert!(table.lines().next().unwrap().contains("Tanimoto_ctrl_ethanol"));
}

#[test]
fn test_missing_structure_column_fails_before_running() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bad.csv");
    write_csv(&bad, "structure,name\nCCO,ethanol\n");
    let err = load_structures(&bad).unwrap_err();
    assert!(err.to_string().contains("smiles"));
}

#[test]
fn test_unknown_model_alias_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = resolve_model("definitely-not-a-model", dir.path()).unwrap_err();
    assert!(err.to_string().contains("definitely-not-a-model"));
}

#[test]
fn test_finetuned_artifact_loads_via_stock_path() {
    let dir = tempfile::tempdir().unwrap();

    // Simulate a fine-tuning producer writing its output bundle.
    let finetuned = dir.path().join("finetuned-run-42");
    make_bundle(&finetuned);

    // The encoder must accept it exactly like a stock bundle, resolved by
    // path rather than alias.
    let resolved = resolve_model(finetuned.to_str().unwrap(), Path::new("/nonexistent")).unwrap();
    let encoder = load_encoder(&resolved);

    let vectors = molscreen_pipeline::BatchEncoder::encode_batch(
        &encoder,
        &["CCO".to_string(), "c1ccccc1".to_string()],
        8,
    )
    .unwrap();
    assert_eq!(vectors.len(), 2);
    assert_eq!(vectors[0].len(), 16);
}

#[test]
fn test_batch_size_invariance_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = dir.path().join("bundle");
    make_bundle(&bundle);
    let encoder = load_encoder(&bundle);

    let compounds = dir.path().join("compounds.csv");
    let controls = dir.path().join("controls.csv");
    write_csv(&compounds, "smiles\nCCO\nCCN\nCCCC\nc1ccccc1\nCC(=O)O\n");
    write_csv(&controls, "smiles\nCCO\n");
    let candidates = load_structures(&compounds).unwrap();
    let references = load_structures(&controls).unwrap();

    let run = |batch_size: usize| {
        run_screen(
            &candidates,
            &references,
            &encoder,
            None,
            &PipelineConfig {
                batch_size,
                ..PipelineConfig::default()
            },
            None,
        )
        .unwrap()
    };

    let one = run(1);
    let many = run(32);
    for (a, b) in one.records.iter().zip(many.records.iter()) {
        let va = a.embedding.as_ref().unwrap();
        let vb = b.embedding.as_ref().unwrap();
        for (x, y) in va.per_reference.iter().zip(vb.per_reference.iter()) {
            assert!((x - y).abs() < 1e-5, "{x} vs {y}");
        }
    }
}
