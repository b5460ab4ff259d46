//! Project indexing: build a fresh [`ProjectIndex`] from a directory tree and
//! answer lookups against whichever index was last swapped in.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::analyzers::HeuristicExtractor;
use crate::config::{DevMindConfig, IndexingConfig};
use crate::error::{DevMindError, Result};
use crate::scanner::{self, FileEntry, TreeWalker, WalkOutcome};
use crate::storage::{IndexHandle, ProjectIndex};
use crate::types::{AnalyzeResult, IndexRecord, IndexStats};

/// Owns the single active project index of a process.
#[derive(Debug)]
pub struct ProjectIndexer {
    index: IndexHandle,
    walker: TreeWalker,
    extractor: HeuristicExtractor,
    preview_chars: usize,
    truncation_marker: String,
}

impl Default for ProjectIndexer {
    fn default() -> Self {
        Self::from_config(&DevMindConfig::default())
    }
}

impl ProjectIndexer {
    pub fn new(extractor: HeuristicExtractor, indexing: &IndexingConfig) -> Self {
        Self {
            index: IndexHandle::new(),
            walker: TreeWalker::new(indexing.follow_symlinks),
            extractor,
            preview_chars: indexing.preview_chars,
            truncation_marker: indexing.truncation_marker.clone(),
        }
    }

    pub fn from_config(config: &DevMindConfig) -> Self {
        Self::new(HeuristicExtractor::from_config(&config.extractor), &config.indexing)
    }

    /// Rebuild the index from `root`, replacing the current one.
    ///
    /// On failure the previously built index stays in place.
    pub fn analyze(&self, root: &Path) -> Result<AnalyzeResult> {
        self.analyze_with_cancel(root, CancellationToken::new())
    }

    pub fn analyze_with_cancel(&self, root: &Path, cancel: CancellationToken) -> Result<AnalyzeResult> {
        let start_time = Instant::now();
        let root = resolve_root(root)?;
        let outcomes = self.walker.walk(&root, cancel.clone())?;

        info!("Indexing project at {}", root.display());

        let mut fresh = ProjectIndex::with_root(root.clone());
        let mut skipped = 0;

        for outcome in outcomes {
            match outcome {
                WalkOutcome::File(entry) => {
                    let relative_path = entry.relative_path.clone();
                    fresh.insert(relative_path, self.build_record(entry));
                }
                WalkOutcome::Skipped { .. } => skipped += 1,
            }
        }

        if cancel.is_cancelled() {
            info!("Indexing of {} cancelled, keeping previous index", root.display());
            return Err(DevMindError::Cancelled);
        }

        let duration_ms = start_time.elapsed().as_millis() as u64;
        fresh.finish_build(skipped, duration_ms);
        let files = fresh.paths().to_vec();

        let previous = self.index.replace(fresh);
        info!(
            "Indexed {} files ({} skipped) in {}ms, replaced index of {} files",
            files.len(),
            skipped,
            duration_ms,
            previous.file_count()
        );

        Ok(AnalyzeResult {
            root,
            files,
            skipped,
            duration_ms,
        })
    }

    /// Metadata stored for `relative_path` in the current index.
    pub fn get_summary(&self, relative_path: &str) -> Result<IndexRecord> {
        self.index
            .snapshot()
            .get(relative_path)
            .cloned()
            .ok_or_else(|| DevMindError::NotIndexed(relative_path.to_string()))
    }

    /// Re-read the whole file behind an indexed path from disk.
    pub fn get_full_content(&self, relative_path: &str) -> Result<String> {
        let record = self.get_summary(relative_path)?;
        debug!("Reading full content of {}", record.absolute_path.display());
        fs::read_to_string(&record.absolute_path).map_err(|source| DevMindError::ReadError {
            path: record.absolute_path,
            source,
        })
    }

    /// Sorted immediate subdirectory names of `path`. Does not touch the index.
    pub fn list_subdirectories(&self, path: &Path) -> Result<Vec<String>> {
        scanner::list_subdirectories(path)
    }

    /// Relative paths of the current index in listing order.
    pub fn list_paths(&self) -> Vec<String> {
        self.index.snapshot().paths().to_vec()
    }

    pub fn is_indexed(&self) -> bool {
        self.index.snapshot().root().is_some()
    }

    pub fn root(&self) -> Option<PathBuf> {
        self.index.snapshot().root().map(Path::to_path_buf)
    }

    pub fn stats(&self) -> IndexStats {
        self.index.snapshot().stats().clone()
    }

    pub fn snapshot(&self) -> Arc<ProjectIndex> {
        self.index.snapshot()
    }

    fn build_record(&self, entry: FileEntry) -> IndexRecord {
        IndexRecord {
            summary: self.extractor.extract_summary(&entry.content),
            imports: self.extractor.extract_imports(&entry.content),
            content_preview: content_preview(&entry.content, self.preview_chars, &self.truncation_marker),
            absolute_path: entry.absolute_path,
        }
    }
}

/// Absolute form of `root`, so stored paths do not depend on the working
/// directory. Symlinks are left unresolved.
fn resolve_root(root: &Path) -> Result<PathBuf> {
    if !root.is_dir() {
        return Err(DevMindError::NotADirectory(root.to_path_buf()));
    }
    std::path::absolute(root).map_err(|source| DevMindError::ReadError {
        path: root.to_path_buf(),
        source,
    })
}

/// First `limit` characters of `content`, plus `marker` when anything was cut.
pub fn content_preview(content: &str, limit: usize, marker: &str) -> String {
    match content.char_indices().nth(limit) {
        Some((cut, _)) => {
            let mut preview = String::with_capacity(cut + marker.len());
            preview.push_str(&content[..cut]);
            preview.push_str(marker);
            preview
        }
        None => content.to_string(),
    }
}
