use std::fs;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{DevMindError, Result};

/// A regular text file found under the walk root.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// `/`-separated path relative to the walk root.
    pub relative_path: String,
    pub absolute_path: PathBuf,
    pub content: String,
}

/// Per-entry result of a walk. A skipped entry never aborts the walk.
#[derive(Debug, Clone)]
pub enum WalkOutcome {
    File(FileEntry),
    Skipped { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, Default)]
pub struct TreeWalker {
    follow_symlinks: bool,
}

impl TreeWalker {
    pub fn new(follow_symlinks: bool) -> Self {
        Self { follow_symlinks }
    }

    /// Lazily enumerate every regular file under `root`, without a depth limit.
    ///
    /// Fails only when `root` is not a directory. The iterator stops early
    /// once `cancel` is triggered; callers check the token afterwards to tell
    /// a finished walk from an interrupted one.
    pub fn walk(
        &self,
        root: &Path,
        cancel: CancellationToken,
    ) -> Result<impl Iterator<Item = WalkOutcome>> {
        if !root.is_dir() {
            return Err(DevMindError::NotADirectory(root.to_path_buf()));
        }

        let root = root.to_path_buf();
        let entries = WalkDir::new(&root)
            .follow_links(self.follow_symlinks)
            .sort_by_file_name()
            .into_iter();

        Ok(entries
            .take_while(move |_| !cancel.is_cancelled())
            .filter_map(move |entry| match entry {
                Ok(entry) if entry.file_type().is_file() => Some(read_entry(&root, entry.path())),
                Ok(_) => None,
                Err(err) => {
                    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
                    debug!("Skipping unreadable entry {:?}: {}", path, err);
                    Some(WalkOutcome::Skipped {
                        path,
                        reason: err.to_string(),
                    })
                }
            }))
    }
}

fn read_entry(root: &Path, path: &Path) -> WalkOutcome {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => return skipped(path, err.to_string()),
    };

    let content = match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(_) => return skipped(path, "not valid UTF-8 text".to_string()),
    };

    let relative_path = match relative_posix_path(root, path) {
        Some(relative) => relative,
        None => return skipped(path, "outside of walk root".to_string()),
    };

    WalkOutcome::File(FileEntry {
        relative_path,
        absolute_path: path.to_path_buf(),
        content,
    })
}

fn skipped(path: &Path, reason: String) -> WalkOutcome {
    debug!("Skipping {:?}: {}", path, reason);
    WalkOutcome::Skipped {
        path: path.to_path_buf(),
        reason,
    }
}

/// Relative path with `/` separators regardless of platform.
pub fn relative_posix_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Sorted names of the immediate child directories of `path`.
pub fn list_subdirectories(path: &Path) -> Result<Vec<String>> {
    if !path.is_dir() {
        return Err(DevMindError::NotADirectory(path.to_path_buf()));
    }

    let entries = fs::read_dir(path).map_err(|source| DevMindError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    Ok(names)
}
