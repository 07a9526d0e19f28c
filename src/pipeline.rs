//! Run orchestration: discovery, per-image stage sequencing, counters.
//!
//! Processing is strictly sequential, one image at a time; the only shared
//! mutable state is the run's success/failure counters. Each image is
//! isolated: a failure routes that image to quarantine and the run moves
//! on.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use walkdir::WalkDir;

use crate::artifact::{ArtifactWriter, WriteReport};
use crate::config::ExtractConfig;
use crate::detect::backend::PoseBackend;
use crate::error::{PipelineError, PipelineResult};
use crate::quarantine::{resolve_quarantine_dir, Quarantine};
use crate::rank::rank_and_slot;
use crate::record::build_records;

/// Extensions accepted as image inputs, lowercase.
const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "webp"];

/// Terminating counters for one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: u64,
    pub failed: u64,
}

/// Sequences load -> infer -> rank -> record -> write per image, with
/// quarantine as the failure path at every stage.
pub struct Pipeline {
    config: ExtractConfig,
    backend: Box<dyn PoseBackend>,
    writer: ArtifactWriter,
    quarantine: Quarantine,
}

impl Pipeline {
    pub fn new(config: ExtractConfig, backend: Box<dyn PoseBackend>) -> Self {
        let quarantine_dir = resolve_quarantine_dir(&config.root, &config.marker);
        let writer = ArtifactWriter::new(config.overwrite);
        let quarantine = Quarantine::new(quarantine_dir, config.overwrite);
        Self {
            config,
            backend,
            writer,
            quarantine,
        }
    }

    pub fn quarantine_dir(&self) -> &Path {
        self.quarantine.dir()
    }

    /// Process every discovered image and return the final counters.
    pub fn run(&mut self) -> Result<RunSummary> {
        if !self.config.root.is_dir() {
            return Err(anyhow!("root not found: {}", self.config.root.display()));
        }

        log::info!("failed dir: {}", self.quarantine.dir().display());
        let images = self.discover_images()?;
        log::info!("images: {} file(s)", images.len());

        let mut summary = RunSummary::default();
        let total = images.len();
        for (index, image_path) in images.iter().enumerate() {
            log::info!("[{}/{}] {}", index + 1, total, image_path.display());
            match self.process_image(image_path) {
                Ok(report) => {
                    summary.succeeded += 1;
                    if report.skipped > 0 {
                        log::info!(
                            "{}: kept {} existing artifact(s)",
                            image_path.display(),
                            report.skipped
                        );
                    }
                }
                Err(err) => {
                    summary.failed += 1;
                    log::warn!("{}: {}", image_path.display(), err);
                    if let Err(qerr) = self.quarantine.quarantine(image_path) {
                        log::error!(
                            "failed to quarantine {}: {}",
                            image_path.display(),
                            qerr
                        );
                    }
                }
            }
        }

        log::info!(
            "done. succeeded={} failed={}",
            summary.succeeded,
            summary.failed
        );
        Ok(summary)
    }

    /// Discover candidate images under the root in deterministic order.
    ///
    /// Files must match one of the configured patterns and carry a
    /// supported image extension. Entries inside the quarantine directory
    /// are skipped so a recursive re-run never picks up already-failed
    /// images.
    pub fn discover_images(&self) -> Result<Vec<PathBuf>> {
        let max_depth = if self.config.recursive {
            usize::MAX
        } else {
            1
        };

        let mut images = Vec::new();
        for entry in WalkDir::new(&self.config.root).max_depth(max_depth) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.path().starts_with(self.quarantine.dir()) {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if !has_image_extension(name) {
                continue;
            }
            if !self
                .config
                .patterns
                .iter()
                .any(|pattern| matches_pattern(name, pattern))
            {
                continue;
            }
            images.push(entry.into_path());
        }
        images.sort();
        Ok(images)
    }

    fn process_image(&mut self, image_path: &Path) -> PipelineResult<WriteReport> {
        let image = image::open(image_path).map_err(|source| PipelineError::ImageUnreadable {
            path: image_path.to_path_buf(),
            source,
        })?;
        let rgb = image.to_rgb8();
        let (width, height) = (rgb.width(), rgb.height());

        let detections = self
            .backend
            .infer(&rgb, self.config.min_confidence)
            .map_err(PipelineError::Inference)?;

        if detections.is_empty() {
            if detections.below_threshold > 0 {
                return Err(PipelineError::LowConfidence {
                    dropped: detections.below_threshold,
                    min_confidence: self.config.min_confidence,
                });
            }
            return Err(PipelineError::NoPersonDetected);
        }

        let ranked = rank_and_slot(detections.people);
        if ranked.is_empty() {
            return Err(PipelineError::NoPersonDetected);
        }

        let (single, multi) = build_records(&ranked, width, height);
        self.writer.write_pair(image_path, &single, &multi)
    }
}

fn has_image_extension(name: &str) -> bool {
    let Some((_, ext)) = name.rsplit_once('.') else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

/// Glob-style match over file names: `*` matches any run of characters,
/// everything else compares case-insensitively.
fn matches_pattern(name: &str, pattern: &str) -> bool {
    let name: Vec<char> = name.to_lowercase().chars().collect();
    let pattern: Vec<char> = pattern.to_lowercase().chars().collect();
    match_chars(&name, &pattern)
}

fn match_chars(name: &[char], pattern: &[char]) -> bool {
    match pattern.split_first() {
        None => name.is_empty(),
        Some(('*', rest)) => {
            (0..=name.len()).any(|skip| match_chars(&name[skip..], rest))
        }
        Some((&ch, rest)) => match name.split_first() {
            Some((&first, name_rest)) => first == ch && match_chars(name_rest, rest),
            None => false,
        },
    }
}
