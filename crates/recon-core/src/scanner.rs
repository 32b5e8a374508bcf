//! Input folder scanner for discovering inventory CSV exports

use crate::config::InputLimits;
use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::parser::parse_csv;
use crate::report::REPORT_FILE_PREFIX;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// A candidate export file found in the input folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFile {
    /// Full path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

/// Result of scanning the input folder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// Folder that was scanned
    pub root: PathBuf,
    /// Candidate CSV files, sorted by path
    pub files: Vec<InputFile>,
    /// Previously generated reports that were skipped
    pub skipped_reports: Vec<PathBuf>,
}

impl ScanResult {
    /// Get the number of candidate files
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// Scan a folder for CSV exports, enforcing the given limits.
///
/// Only files directly inside `dir` are considered. Files named like a
/// generated report are skipped.
pub fn scan_directory<P: AsRef<Path>>(dir: P, limits: &InputLimits) -> Result<ScanResult> {
    let root = dir.as_ref();
    if !root.is_dir() {
        return Err(Error::NotADirectory(root.to_path_buf()));
    }

    let mut files = Vec::new();
    let mut skipped_reports = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_csv(entry.path()) {
            continue;
        }

        let path = entry.path().to_path_buf();
        if is_report_file(&path) {
            debug!(file = %path.display(), "skipping previously generated report");
            skipped_reports.push(path);
            continue;
        }

        let size = entry.metadata()?.len();
        if size > limits.max_file_bytes {
            return Err(Error::FileTooLarge {
                path,
                size,
                limit: limits.max_file_bytes,
            });
        }

        files.push(InputFile { path, size });
    }

    if files.is_empty() {
        return Err(Error::NoCsvFiles(root.to_path_buf()));
    }

    if files.len() > limits.max_files {
        return Err(Error::TooManyFiles {
            dir: root.to_path_buf(),
            found: files.len(),
            limit: limits.max_files,
        });
    }

    info!(dir = %root.display(), files = files.len(), "scanned input folder");

    Ok(ScanResult {
        root: root.to_path_buf(),
        files,
        skipped_reports,
    })
}

/// Parse every scanned file, in scan order
pub fn load_datasets(scan: &ScanResult) -> Result<Vec<Dataset>> {
    scan.files.iter().map(|f| parse_csv(&f.path)).collect()
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn is_report_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(REPORT_FILE_PREFIX))
}
