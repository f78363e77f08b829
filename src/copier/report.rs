use crate::manifest::TargetSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Summary of one shortlist run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortlistReport {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub extension: String,
    pub targets: Vec<String>,
    pub scanned_files: usize,
    /// Basenames written to the destination, in listing order. A name shows up
    /// twice when two source files collided.
    pub copied_files: Vec<String>,
    pub missing_targets: Vec<String>,
    pub manifest_duplicates: Vec<String>,
    pub elapsed: Duration,
    pub finished_at: DateTime<Utc>,
    pub dry_run: bool,
}

impl ShortlistReport {
    /// `outcomes` must be the copy result for `listing`, one entry per path.
    pub fn new(
        source: &Path,
        destination: &Path,
        targets: &TargetSet,
        listing: &[PathBuf],
        outcomes: &[bool],
        elapsed: Duration,
    ) -> Self {
        let copied_files: Vec<String> = listing
            .iter()
            .zip(outcomes)
            .filter(|(_, copied)| **copied)
            .filter_map(|(path, _)| path.file_name())
            .map(|name| name.to_string_lossy().to_string())
            .collect();

        let missing_targets = targets.missing(copied_files.iter().map(String::as_str));

        Self {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            extension: targets.extension().to_string(),
            targets: targets.names().to_vec(),
            scanned_files: listing.len(),
            copied_files,
            missing_targets,
            manifest_duplicates: Vec::new(),
            elapsed,
            finished_at: Utc::now(),
            dry_run: false,
        }
    }

    /// Report for a run that only matched, without copying.
    pub fn planned(
        source: &Path,
        destination: &Path,
        targets: &TargetSet,
        listing: &[PathBuf],
        elapsed: Duration,
    ) -> Self {
        let matches: Vec<bool> = listing
            .iter()
            .map(|path| {
                path.file_name()
                    .is_some_and(|name| targets.matches(&name.to_string_lossy()))
            })
            .collect();

        let mut report = Self::new(source, destination, targets, listing, &matches, elapsed);
        report.dry_run = true;
        report
    }

    pub fn with_manifest_duplicates(mut self, duplicates: Vec<String>) -> Self {
        self.manifest_duplicates = duplicates;
        self
    }

    pub fn copied_count(&self) -> usize {
        self.copied_files.len()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_targets.is_empty()
    }
}
