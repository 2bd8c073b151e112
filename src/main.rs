use std::path::PathBuf;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use molscreen_embed::{resolve_model, CpuBackend, CpuDevice, EmbeddingEncoder, MODELS_DIR_ENV};
use molscreen_pipeline::{
    load_structures, run_screen, write_table, BatchEncoder, CommandDtiScorer, DtiScorer,
    PipelineConfig,
};

/// Batch compound screening against a reference set
#[derive(Parser, Debug)]
#[command(name = "molscreen")]
#[command(about = "Screen a compound library against reference molecules", long_about = None)]
struct Args {
    /// Path to the candidate compounds CSV (requires a 'smiles' column)
    #[arg(short, long)]
    compounds: PathBuf,

    /// Path to the reference/control molecules CSV
    #[arg(short = 'r', long)]
    controls: PathBuf,

    /// Model alias (chemberta-base, chemberta-77m, chemberta-mtr,
    /// chemberta-mlm) or path to a model bundle directory
    #[arg(short, long, default_value = "chemberta-base")]
    model: String,

    /// Root directory holding alias model bundles
    #[arg(long)]
    models_dir: Option<PathBuf>,

    /// Inference device
    #[arg(short, long, default_value = "cpu")]
    device: String,

    /// Output filename prefix; results land in <prefix>.csv
    #[arg(short, long, default_value = "results")]
    output: String,

    /// Molecules per inference batch
    #[arg(short, long, default_value_t = 32)]
    batch_size: usize,

    /// Target protein sequence for DTI scoring
    #[arg(long, requires = "dti_command")]
    dti_target: Option<String>,

    /// External DTI predictor executable
    #[arg(long, requires = "dti_target")]
    dti_command: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[cfg(feature = "gpu")]
fn load_gpu_encoder(bundle_dir: &std::path::Path) -> anyhow::Result<Box<dyn BatchEncoder>> {
    Ok(Box::new(
        EmbeddingEncoder::<molscreen_embed::GpuBackend>::load(
            bundle_dir,
            molscreen_embed::GpuDevice::default(),
        )?,
    ))
}

#[cfg(not(feature = "gpu"))]
fn load_gpu_encoder(_bundle_dir: &std::path::Path) -> anyhow::Result<Box<dyn BatchEncoder>> {
    anyhow::bail!("GPU device requested but this build has no GPU support; rebuild with --features gpu")
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting molscreen v{}", env!("CARGO_PKG_VERSION"));

    // Everything below, up to the run itself, is configuration: any failure
    // aborts with a non-zero exit before a single row is processed.
    let candidates = load_structures(&args.compounds)?;
    let references = load_structures(&args.controls)?;
    info!(
        candidates = candidates.len(),
        references = references.len(),
        "data loaded"
    );

    let models_dir = args
        .models_dir
        .clone()
        .or_else(|| std::env::var(MODELS_DIR_ENV).ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("models"));
    let bundle_dir = resolve_model(&args.model, &models_dir)?;
    info!(model = %args.model, bundle = %bundle_dir.display(), device = %args.device, "loading model");

    let config = PipelineConfig {
        batch_size: args.batch_size,
        ..PipelineConfig::default()
    };

    let dti_scorer = args
        .dti_command
        .as_ref()
        .map(|cmd| CommandDtiScorer::new(cmd.clone()));
    let dti = match (&dti_scorer, &args.dti_target) {
        (Some(scorer), Some(target)) => Some((scorer as &dyn DtiScorer, target.as_str())),
        _ => None,
    };

    let encoder: Box<dyn BatchEncoder> = match args.device.as_str() {
        "cpu" => Box::new(EmbeddingEncoder::<CpuBackend>::load(
            &bundle_dir,
            CpuDevice::Cpu,
        )?),
        "gpu" | "cuda" | "wgpu" => load_gpu_encoder(&bundle_dir)?,
        other => anyhow::bail!("unknown device '{other}' (expected cpu or gpu)"),
    };

    let outcome = run_screen(
        &candidates,
        &references,
        encoder.as_ref(),
        dti,
        &config,
        None,
    )?;

    let failed = outcome.records.iter().filter(|r| r.error.is_some()).count();
    info!(rows = outcome.records.len(), failed, "screening finished");

    let output_path = PathBuf::from(format!("{}.csv", args.output));
    write_table(&output_path, &outcome.records, &outcome.reference_names)?;
    info!(path = %output_path.display(), "results written");

    // Row-level failures are recorded in the table, not in the exit code;
    // only configuration and resource errors propagate as non-zero.
    Ok(())
}
