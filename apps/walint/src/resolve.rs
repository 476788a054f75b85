//! Workflow file discovery.
//!
//! An explicit file argument is always honored regardless of extension.
//! A directory argument (or the default `.github/workflows`) is scanned
//! non-recursively for `*.yml` and `*.yaml`, in lexicographic order.

use crate::error::WalintError;
use glob::glob;
use std::path::{Path, PathBuf};

/// Conventional scan root when no path argument is given.
pub const DEFAULT_WORKFLOWS_DIR: &str = ".github/workflows";

/// Resolve the ordered set of workflow files to check.
///
/// Fails with `NotFound` when the path does not exist and with `NoTargets`
/// when a directory scan matches nothing.
pub fn resolve(path_arg: Option<&Path>, default_dir: &Path) -> Result<Vec<PathBuf>, WalintError> {
    let target = path_arg.unwrap_or(default_dir);
    if target.is_file() {
        let abs = target
            .canonicalize()
            .unwrap_or_else(|_| target.to_path_buf());
        return Ok(vec![abs]);
    }
    if !target.is_dir() {
        return Err(WalintError::NotFound(target.to_path_buf()));
    }
    scan_dir(target)
}

/// Non-recursive scan of one directory for workflow files.
fn scan_dir(dir: &Path) -> Result<Vec<PathBuf>, WalintError> {
    let abs_dir = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
    let base = glob::Pattern::escape(&abs_dir.to_string_lossy());
    let mut files: Vec<PathBuf> = Vec::new();
    for ext in ["yml", "yaml"] {
        let pattern = format!("{}/*.{}", base, ext);
        let entries = glob(&pattern).expect("escaped glob pattern is valid");
        for entry in entries.flatten() {
            if entry.is_file() {
                files.push(entry);
            }
        }
    }
    files.sort();
    if files.is_empty() {
        return Err(WalintError::NoTargets(dir.to_path_buf()));
    }
    Ok(files)
}
