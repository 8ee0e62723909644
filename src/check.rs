//! @ai:module:intent Run the strict parse over TextGrid files and directories
//! @ai:module:layer application
//! @ai:module:public_api check_file, check_directory, is_textgrid_file, CheckReport, FileFailure
//! @ai:module:depends_on parser, config, error
//! @ai:module:stateless true

use crate::config::ParseOptions;
use crate::error::{Error, Position, Result};
use crate::parser::parse_file;
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// @ai:intent Why one file failed the check
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub message: String,
    pub position: Option<Position>,
}

/// @ai:intent Outcome of checking a file or directory
#[derive(Debug, Clone, Serialize, Default)]
pub struct CheckReport {
    pub files_checked: usize,
    pub tiers_checked: usize,
    pub failures: Vec<FileFailure>,
}

impl CheckReport {
    /// @ai:intent Check passed when no file failed
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn merge(&mut self, other: CheckReport) {
        self.files_checked += other.files_checked;
        self.tiers_checked += other.tiers_checked;
        self.failures.extend(other.failures);
    }
}

/// @ai:intent Whether a path looks like a TextGrid file (case-insensitive extension)
/// @ai:effects pure
pub fn is_textgrid_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("textgrid"))
        .unwrap_or(false)
}

/// @ai:intent Parse one file with consistency checking forced on
/// @ai:post parse and consistency failures are recorded, not returned
/// @ai:effects fs:read
pub fn check_file(path: &Path, options: &ParseOptions) -> Result<CheckReport> {
    let options = options.with_consistency_check(true);
    let mut report = CheckReport {
        files_checked: 1,
        ..Default::default()
    };

    match parse_file(path, &options) {
        Ok(grid) => {
            tracing::debug!(path = %path.display(), tiers = grid.len(), "check passed");
            report.tiers_checked = grid.len();
        }
        Err(e @ Error::FileRead { .. }) => return Err(e),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "check failed");
            report.failures.push(FileFailure {
                path: path.to_path_buf(),
                position: e.position(),
                message: e.to_string(),
            });
        }
    }
    Ok(report)
}

/// @ai:intent Check every TextGrid file under a directory
/// @ai:effects fs:read
pub fn check_directory(path: &Path, options: &ParseOptions) -> Result<CheckReport> {
    let mut report = CheckReport::default();

    for entry in WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let file_path = entry.path();

        if is_textgrid_file(file_path) {
            match check_file(file_path, options) {
                Ok(file_report) => report.merge(file_report),
                Err(e) => {
                    report.files_checked += 1;
                    report.failures.push(FileFailure {
                        path: file_path.to_path_buf(),
                        message: e.to_string(),
                        position: None,
                    });
                }
            }
        }
    }

    tracing::info!(
        files = report.files_checked,
        failures = report.failures.len(),
        "checked directory {}",
        path.display()
    );
    Ok(report)
}
