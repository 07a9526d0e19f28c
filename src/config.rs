use std::path::PathBuf;

use anyhow::{anyhow, Result};

use crate::detect::select::BackendChoice;

pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.3;
pub const DEFAULT_PATTERNS: &str = "*.jpg,*.jpeg,*.png,*.bmp,*.webp";
pub const DEFAULT_MARKER: &str = "matching";

/// Validated configuration for one extraction run.
#[derive(Clone, Debug)]
pub struct ExtractConfig {
    /// Root directory to scan for images.
    pub root: PathBuf,
    /// Recurse into subdirectories.
    pub recursive: bool,
    /// Replace existing artifacts and quarantined files.
    pub overwrite: bool,
    /// Minimum aggregate person confidence.
    pub min_confidence: f32,
    /// Requested backend.
    pub backend: BackendChoice,
    /// Glob-style file name patterns.
    pub patterns: Vec<String>,
    /// Directory name that anchors the quarantine location.
    pub marker: String,
}

impl ExtractConfig {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            recursive: false,
            overwrite: false,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            backend: BackendChoice::Auto,
            patterns: split_csv(DEFAULT_PATTERNS),
            marker: DEFAULT_MARKER.to_string(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.root.is_dir() {
            return Err(anyhow!("root not found: {}", self.root.display()));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(anyhow!(
                "min confidence must be within [0, 1], got {}",
                self.min_confidence
            ));
        }
        if self.patterns.is_empty() {
            return Err(anyhow!("at least one file pattern is required"));
        }
        if self.marker.trim().is_empty() {
            return Err(anyhow!("marker directory name must not be empty"));
        }
        Ok(())
    }
}

pub fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(|entry| entry.to_string())
        .collect()
}
