use std::path::PathBuf;

use thiserror::Error;

/// Per-stage failure taxonomy for the extraction pipeline.
///
/// `BackendUnavailable` is fatal at startup; every other variant is a
/// per-image condition that routes the image to quarantine without
/// aborting the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("unreadable image {path}: {source}")]
    ImageUnreadable {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("no person detected")]
    NoPersonDetected,

    #[error("{dropped} detection(s) below confidence threshold {min_confidence}")]
    LowConfidence { dropped: usize, min_confidence: f32 },

    #[error("no pose backend available for {requested}")]
    BackendUnavailable { requested: String },

    #[error("inference failed: {0}")]
    Inference(anyhow::Error),

    #[error("quarantine collision: {path} already exists")]
    QuarantineCollision { path: PathBuf },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
