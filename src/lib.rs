//! Pose-keypoint extraction pipeline.
//!
//! Turns photographs of people into the JSON pose records a pose-matching
//! game consumes. For every image under a scan root the pipeline runs
//! detect -> rank -> normalize -> persist, producing a single-person and a
//! multi-person document next to the source image; images that cannot be
//! processed are relocated into a `failed/` quarantine directory without
//! ever being deleted.
//!
//! # Module Structure
//!
//! - `detect`: backend capability interface, canonical landmarks, detector
//!   variants (multi-person, single-person, stub)
//! - `rank`: composite-key person ranking and left-to-right slot assignment
//! - `geometry`: pixel / normalized coordinate conversion
//! - `record`: artifact document model (schema `1.1`)
//! - `artifact`: idempotent dual-document writes
//! - `quarantine`: marker-anchored failure relocation
//! - `pipeline`: discovery and per-image orchestration

pub mod artifact;
pub mod config;
pub mod detect;
pub mod error;
pub mod geometry;
pub mod pipeline;
pub mod quarantine;
pub mod rank;
pub mod record;

pub use artifact::{artifact_paths, ArtifactPaths, ArtifactWriter, WriteReport};
pub use config::ExtractConfig;
pub use detect::{
    select_backend, BackendChoice, Detections, Keypoint, Landmark, PersonDetection, PoseBackend,
    PoseCapability,
};
pub use error::{PipelineError, PipelineResult};
pub use geometry::{NormBox, PixelBox};
pub use pipeline::{Pipeline, RunSummary};
pub use quarantine::{resolve_quarantine_dir, Quarantine, QuarantineReport};
pub use record::{MultiPersonRecord, PersonRecord, SinglePersonRecord, SCHEMA_VERSION};
