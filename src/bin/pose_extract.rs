//! pose_extract - batch pose-keypoint extraction
//!
//! Scans a directory tree for images, runs the selected pose backend on
//! each one and writes the `<stem>.json` / `<stem>.multi.json` artifact
//! pair next to the source image. Unprocessable images are moved into the
//! quarantine directory resolved from the marker folder.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use pose_extract::config::{
    split_csv, ExtractConfig, DEFAULT_MARKER, DEFAULT_MIN_CONFIDENCE, DEFAULT_PATTERNS,
};
use pose_extract::detect::{select_backend, BackendChoice, PoseBackend};
use pose_extract::pipeline::Pipeline;

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate pose keypoint JSONs (.json & .multi.json)")]
struct Args {
    /// Root folder to scan for images.
    #[arg(long, value_name = "DIR")]
    root: PathBuf,

    /// Recurse into subdirectories.
    #[arg(long)]
    recursive: bool,

    /// Overwrite existing JSONs and quarantined files.
    #[arg(long)]
    overwrite: bool,

    /// Minimum confidence to accept a person (0..1).
    #[arg(long, default_value_t = DEFAULT_MIN_CONFIDENCE, value_name = "THRESHOLD")]
    min_conf: f32,

    /// Pose backend.
    #[arg(long, value_enum, default_value_t = BackendChoice::Auto)]
    backend: BackendChoice,

    /// Comma-separated glob patterns for image file names.
    #[arg(long, default_value = DEFAULT_PATTERNS, value_name = "PATTERNS")]
    patterns: String,

    /// Marker directory name anchoring the quarantine location.
    #[arg(long, default_value = DEFAULT_MARKER, value_name = "NAME")]
    marker: String,

    /// Multi-person ONNX model path (backend-tract builds).
    #[arg(long, env = "POSE_MULTI_MODEL", default_value = "models/pose-multi.onnx", value_name = "FILE")]
    multi_model: PathBuf,

    /// Single-person ONNX model path (backend-tract builds).
    #[arg(long, env = "POSE_SINGLE_MODEL", default_value = "models/pose-single.onnx", value_name = "FILE")]
    single_model: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = ExtractConfig::new(args.root);
    config.recursive = args.recursive;
    config.overwrite = args.overwrite;
    config.min_confidence = args.min_conf;
    config.backend = args.backend;
    config.patterns = split_csv(&args.patterns);
    config.marker = args.marker;
    config.validate()?;

    let candidates = build_backends(&args);
    let backend = select_backend(config.backend, candidates)?;
    log::info!("backend: {}", backend.name());

    let mut pipeline = Pipeline::new(config, backend);
    let summary = pipeline.run()?;

    println!(
        "done. succeeded={} failed={}",
        summary.succeeded, summary.failed
    );
    Ok(())
}

/// Collect every backend whose model is actually present. Capability-based
/// selection decides among them; an empty set fails fast as
/// `BackendUnavailable`.
#[cfg(feature = "backend-tract")]
fn build_backends(args: &Args) -> Vec<Box<dyn PoseBackend>> {
    use pose_extract::detect::backends::{MultiPoseBackend, SinglePoseBackend};

    let mut candidates: Vec<Box<dyn PoseBackend>> = Vec::new();

    if args.multi_model.is_file() {
        match MultiPoseBackend::new(&args.multi_model) {
            Ok(backend) => candidates.push(Box::new(backend)),
            Err(err) => log::warn!("multi-person backend unavailable: {err:#}"),
        }
    } else {
        log::info!(
            "multi-person model not found at {}",
            args.multi_model.display()
        );
    }

    if args.single_model.is_file() {
        match SinglePoseBackend::new(&args.single_model) {
            Ok(backend) => candidates.push(Box::new(backend)),
            Err(err) => log::warn!("single-person backend unavailable: {err:#}"),
        }
    } else {
        log::info!(
            "single-person model not found at {}",
            args.single_model.display()
        );
    }

    candidates
}

#[cfg(not(feature = "backend-tract"))]
fn build_backends(_args: &Args) -> Vec<Box<dyn PoseBackend>> {
    log::warn!("built without the backend-tract feature; no detection capability compiled in");
    Vec::new()
}
