use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use crate::types::{IndexRecord, IndexStats};

/// In-memory map from relative path to [`IndexRecord`].
///
/// Insertion order is kept so listings are deterministic. Inserting an
/// existing path overwrites its record in place.
#[derive(Debug, Clone, Default)]
pub struct ProjectIndex {
    root: Option<PathBuf>,

    // Core data
    paths: Vec<String>,
    records: Vec<IndexRecord>,

    // Fast lookup
    file_index: HashMap<String, usize>, // relative_path -> position

    stats: IndexStats,
}

impl ProjectIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            ..Self::default()
        }
    }

    pub fn insert(&mut self, relative_path: String, record: IndexRecord) {
        self.stats.total_imports += record.imports.len();

        if let Some(&position) = self.file_index.get(&relative_path) {
            self.stats.total_imports -= self.records[position].imports.len();
            self.records[position] = record;
            return;
        }

        self.file_index.insert(relative_path.clone(), self.records.len());
        self.paths.push(relative_path);
        self.records.push(record);
        self.stats.total_files = self.records.len();
    }

    pub fn get(&self, relative_path: &str) -> Option<&IndexRecord> {
        self.file_index
            .get(relative_path)
            .and_then(|&position| self.records.get(position))
    }

    pub fn contains(&self, relative_path: &str) -> bool {
        self.file_index.contains_key(relative_path)
    }

    /// Indexed relative paths in insertion order.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexRecord)> {
        self.paths.iter().map(String::as_str).zip(self.records.iter())
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn file_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    /// Record build bookkeeping once the walk has finished.
    pub fn finish_build(&mut self, skipped_files: usize, build_duration_ms: u64) {
        self.stats.skipped_files = skipped_files;
        self.stats.build_duration_ms = build_duration_ms;
        self.stats.built_at = Some(SystemTime::now());
    }
}

/// Shared owner of the current [`ProjectIndex`].
///
/// Readers take a snapshot `Arc`; a rebuild swaps a fully built index in with
/// [`IndexHandle::replace`], so no reader sees a half-built map.
#[derive(Debug, Default)]
pub struct IndexHandle {
    current: RwLock<Arc<ProjectIndex>>,
}

impl IndexHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<ProjectIndex> {
        self.current.read().clone()
    }

    /// Swap in a new index and return the one it replaced.
    pub fn replace(&self, index: ProjectIndex) -> Arc<ProjectIndex> {
        let mut guard = self.current.write();
        std::mem::replace(&mut *guard, Arc::new(index))
    }
}
