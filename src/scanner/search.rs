use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{DevMindError, Result};

/// Depth limit for name searches. `Unlimited` corresponds to `-1` on the
/// tool surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxDepth {
    Unlimited,
    Limited(usize),
}

impl MaxDepth {
    /// Any negative value means unlimited.
    pub fn from_signed(depth: i64) -> Self {
        if depth < 0 {
            MaxDepth::Unlimited
        } else {
            MaxDepth::Limited(depth as usize)
        }
    }
}

/// Find files and folders whose base name equals `name`.
///
/// A directory's depth is the number of separators between `root` and it.
/// Directories at depth `max_depth` still have their entries matched but are
/// not descended into.
pub fn find_by_name(root: &Path, name: &str, max_depth: MaxDepth) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(DevMindError::NotADirectory(root.to_path_buf()));
    }

    let mut walker = WalkDir::new(root).min_depth(1).sort_by_file_name();
    if let MaxDepth::Limited(depth) = max_depth {
        // walkdir counts the root's children as depth 1
        walker = walker.max_depth(depth + 1);
    }

    Ok(walker
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy() == name)
        .map(|entry| entry.into_path())
        .collect())
}

/// Run [`find_by_name`] over several roots, skipping roots that do not exist.
pub fn find_in_roots(roots: &[PathBuf], name: &str, max_depth: MaxDepth) -> Vec<PathBuf> {
    roots
        .iter()
        .filter(|root| root.is_dir())
        .filter_map(|root| find_by_name(root, name, max_depth).ok())
        .flatten()
        .collect()
}
