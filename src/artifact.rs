//! Idempotent persistence of artifact documents.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PipelineResult;
use crate::record::{MultiPersonRecord, SinglePersonRecord};

/// Artifact locations paired with one source image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub single: PathBuf,
    pub multi: PathBuf,
}

/// `<stem>.json` and `<stem>.multi.json` next to the image.
pub fn artifact_paths(image_path: &Path) -> ArtifactPaths {
    ArtifactPaths {
        single: image_path.with_extension("json"),
        multi: image_path.with_extension("multi.json"),
    }
}

/// Counts of performed and skipped writes for one artifact pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub written: usize,
    pub skipped: usize,
}

/// Writes the single/multi document pair for processed images.
///
/// With overwrite disabled an existing target is skipped with a logged
/// notice; otherwise the write is unconditional (last-writer-wins). The
/// full document is serialized in memory before any filesystem call, so a
/// partially-written document is never observable.
pub struct ArtifactWriter {
    overwrite: bool,
}

impl ArtifactWriter {
    pub fn new(overwrite: bool) -> Self {
        Self { overwrite }
    }

    pub fn write_pair(
        &self,
        image_path: &Path,
        single: &SinglePersonRecord,
        multi: &MultiPersonRecord,
    ) -> PipelineResult<WriteReport> {
        let paths = artifact_paths(image_path);
        let single_body = serde_json::to_string_pretty(single)?;
        let multi_body = serde_json::to_string_pretty(multi)?;

        let mut report = WriteReport::default();
        self.write_document(&paths.single, &single_body, &mut report)?;
        self.write_document(&paths.multi, &multi_body, &mut report)?;
        Ok(report)
    }

    fn write_document(
        &self,
        path: &Path,
        body: &str,
        report: &mut WriteReport,
    ) -> PipelineResult<()> {
        if !self.overwrite && path.exists() {
            log::info!("skip, exists: {}", path.display());
            report.skipped += 1;
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, body)?;
        log::info!("saved {}", path.display());
        report.written += 1;
        Ok(())
    }
}
