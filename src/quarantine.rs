//! Failure quarantine.
//!
//! Unprocessable images are relocated, never deleted: the image and any
//! paired artifact documents that already exist move into a segregated
//! `failed/` directory so a re-run cannot pick them up again and no partial
//! output is left next to good data.

use std::fs;
use std::path::{Path, PathBuf};

use crate::artifact::artifact_paths;
use crate::error::{PipelineError, PipelineResult};

/// Name of the quarantine directory under the resolved matching root.
pub const QUARANTINE_DIR_NAME: &str = "failed";

/// How many levels above the scan root the marker search may climb.
const MARKER_WALK_DEPTH: usize = 5;

/// What happened to the files of one quarantined image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuarantineReport {
    pub moved: usize,
    pub collisions: usize,
}

/// Resolve the quarantine directory for a scan root.
///
/// Walks upward from the root (bounded depth, the root itself included)
/// looking for a directory named like the marker, case-insensitively; the
/// `failed` subdirectory of the first match is the target. Without a match
/// the scan root's own `failed` subdirectory is used. The directory is not
/// created here; creation is lazy on first quarantine.
pub fn resolve_quarantine_dir(scan_root: &Path, marker: &str) -> PathBuf {
    let mut current = scan_root;
    for _ in 0..MARKER_WALK_DEPTH {
        if let Some(name) = current.file_name().and_then(|name| name.to_str()) {
            if name.eq_ignore_ascii_case(marker) {
                return current.join(QUARANTINE_DIR_NAME);
            }
        }
        match current.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => current = parent,
            _ => break,
        }
    }
    scan_root.join(QUARANTINE_DIR_NAME)
}

/// Relocates failed images and their paired documents.
pub struct Quarantine {
    dir: PathBuf,
    overwrite: bool,
}

impl Quarantine {
    pub fn new(dir: PathBuf, overwrite: bool) -> Self {
        Self { dir, overwrite }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Move the image and any existing paired artifacts into quarantine.
    ///
    /// A same-named file already present at the destination blocks that one
    /// move: the source stays in place and the collision is logged. Nothing
    /// is ever deleted or silently replaced.
    pub fn quarantine(&self, image_path: &Path) -> PipelineResult<QuarantineReport> {
        fs::create_dir_all(&self.dir)?;

        let mut report = QuarantineReport::default();
        self.relocate(image_path, &mut report)?;

        let paths = artifact_paths(image_path);
        for paired in [&paths.single, &paths.multi] {
            if paired.exists() {
                self.relocate(paired, &mut report)?;
            }
        }
        Ok(report)
    }

    fn relocate(&self, source: &Path, report: &mut QuarantineReport) -> PipelineResult<()> {
        let file_name = source
            .file_name()
            .ok_or_else(|| PipelineError::Io(std::io::Error::other("source has no file name")))?;
        let dest = self.dir.join(file_name);

        if !self.overwrite && dest.exists() {
            let collision = PipelineError::QuarantineCollision { path: dest };
            log::warn!("{collision}; leaving {} in place", source.display());
            report.collisions += 1;
            return Ok(());
        }

        move_file(source, &dest)?;
        log::info!("quarantined {} -> {}", source.display(), dest.display());
        report.moved += 1;
        Ok(())
    }
}

/// Rename, falling back to copy + remove when the quarantine directory sits
/// on a different filesystem than the scan root.
fn move_file(source: &Path, dest: &Path) -> std::io::Result<()> {
    match fs::rename(source, dest) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(source, dest)?;
            fs::remove_file(source)
        }
    }
}
