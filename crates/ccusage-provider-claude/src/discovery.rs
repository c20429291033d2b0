//! Recursive discovery of usage log files
//!
//! Walks a directory tree and collects every file whose name ends in
//! `.jsonl`. Directories that cannot be opened because of missing
//! permissions are skipped; any other failure aborts the walk.

use ccusage_core::error::{CcusageError, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};
use walkdir::WalkDir;

/// File name suffix of usage logs
pub const LOG_EXTENSION: &str = ".jsonl";

/// How discovered paths are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathStyle {
    /// Joined onto the walk root
    #[default]
    Rooted,
    /// Relative to the walk root
    Relative,
}

/// What the walker found at one step
#[derive(Debug)]
enum Visit {
    /// A usage log
    LogFile(PathBuf),
    /// A directory or non-log file; nothing to collect
    Other,
    /// A directory that could not be listed for lack of permission
    PermissionDenied(PathBuf),
    /// Any other failure
    Failed(CcusageError),
}

fn is_log_file(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_file() && entry.file_name().to_string_lossy().ends_with(LOG_EXTENSION)
}

/// Whether a walk error of this kind skips the entry instead of failing
fn is_skippable(kind: ErrorKind) -> bool {
    kind == ErrorKind::PermissionDenied
}

fn classify(item: walkdir::Result<walkdir::DirEntry>, root: &Path) -> Visit {
    match item {
        Ok(entry) if is_log_file(&entry) => Visit::LogFile(entry.into_path()),
        Ok(_) => Visit::Other,
        Err(err) => {
            let path = err.path().unwrap_or(root).to_path_buf();
            if err.io_error().is_some_and(|e| is_skippable(e.kind())) {
                Visit::PermissionDenied(path)
            } else {
                Visit::Failed(CcusageError::Walk {
                    path,
                    source: err.into(),
                })
            }
        }
    }
}

/// Collect log files under `root`, blocking the current thread
///
/// A missing root, or a root that is not a directory, yields an empty list.
pub fn find_log_files_blocking(root: &Path, style: PathStyle) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        debug!("Log root {} does not exist, nothing to load", root.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for item in WalkDir::new(root) {
        match classify(item, root) {
            Visit::LogFile(path) => {
                trace!("Found log file {}", path.display());
                let path = match style {
                    PathStyle::Rooted => path,
                    PathStyle::Relative => path
                        .strip_prefix(root)
                        .map(Path::to_path_buf)
                        .unwrap_or(path),
                };
                files.push(path);
            }
            Visit::Other => {}
            Visit::PermissionDenied(path) => {
                debug!("Skipping unreadable directory {}", path.display());
            }
            Visit::Failed(err) => return Err(err),
        }
    }

    Ok(files)
}

/// Collect log files under `root` on the blocking thread pool
pub async fn find_log_files(root: &Path, style: PathStyle) -> Result<Vec<PathBuf>> {
    let root_clone = root.to_path_buf();
    let files = tokio::task::spawn_blocking(move || find_log_files_blocking(&root_clone, style))
        .await
        .map_err(|e| CcusageError::Io(std::io::Error::other(e.to_string())))??;

    info!("Found {} JSONL files under {}", files.len(), root.display());
    Ok(files)
}
