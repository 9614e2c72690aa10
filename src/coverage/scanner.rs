use super::types::ScanError;
use ignore::WalkBuilder;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

const GIT_DIR: &str = ".git";

/// Enumerates every non-ignored file under `repo_root` on the blocking pool.
///
/// See [`scan_files_blocking`] for the listing rules.
pub async fn scan_files(repo_root: &Path) -> Result<Vec<String>, ScanError> {
    let root = repo_root.to_path_buf();
    tokio::task::spawn_blocking(move || scan_files_blocking(&root))
        .await
        .map_err(|err| ScanError::Join(err.to_string()))?
}

/// Enumerates every non-ignored file under `repo_root`.
///
/// Paths are relative to the root, use `/` separators and are sorted
/// lexicographically. Hidden files are included, `.git/` never is, and
/// `.gitignore` files inside the tree apply whether or not the tree is a
/// git checkout.
pub fn scan_files_blocking(repo_root: &Path) -> Result<Vec<String>, ScanError> {
    if !repo_root.exists() {
        return Err(ScanError::NotFound(repo_root.to_path_buf()));
    }
    if !repo_root.is_dir() {
        return Err(ScanError::NotADirectory(repo_root.to_path_buf()));
    }

    let start = Instant::now();
    info!(repo = %repo_root.display(), "Scanning repository files");

    let mut files = Vec::new();

    for result in WalkBuilder::new(repo_root)
        .hidden(false)
        .git_ignore(true)
        .require_git(false)
        .git_global(false)
        .git_exclude(false)
        .ignore(false)
        .parents(false)
        .filter_entry(|entry| entry.file_name() != GIT_DIR)
        .build()
    {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                if err.depth() == Some(0) {
                    return Err(ScanError::Walk {
                        path: repo_root.to_path_buf(),
                        message: err.to_string(),
                    });
                }
                warn!(error = %err, "Failed to read directory entry");
                continue;
            }
        };

        if !entry.file_type().map_or(false, |t| t.is_file()) {
            continue;
        }

        if entry.path().to_str().is_none() {
            warn!(path = %entry.path().display(), "Skipping file with a non-UTF-8 path");
            continue;
        }

        match relative_path(repo_root, entry.path()) {
            Some(rel) => files.push(rel),
            None => debug!(path = %entry.path().display(), "Skipping path outside repository root"),
        }
    }

    files.sort();

    info!(
        files = files.len(),
        scan_time_ms = start.elapsed().as_millis() as u64,
        "Repository scan completed"
    );

    Ok(files)
}

/// Converts an absolute walk path into a `/`-separated path relative to `root`.
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel: PathBuf = path.strip_prefix(root).ok()?.to_path_buf();
    let parts: Vec<String> = rel
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => part.to_str().map(str::to_string),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
