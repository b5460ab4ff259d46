use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::ai_tools::{LocalFileTools, ToolResult, ToolSchema};
use crate::config::DevMindConfig;
use crate::error::{DevMindError, Result};
use crate::indexer::ProjectIndexer;
use crate::scanner::{self, MaxDepth};
use crate::types::{AnalyzeResult, IndexRecord, IndexStats};

/// Entry point: one project index plus the file tools around it.
pub struct DevMind {
    config: DevMindConfig,
    tools: LocalFileTools,
}

impl DevMind {
    pub fn builder() -> DevMindBuilder {
        DevMindBuilder::default()
    }

    pub fn get_tool_definitions() -> Vec<ToolSchema> {
        LocalFileTools::get_tool_schemas()
    }

    pub async fn execute_tool(&self, tool_name: &str, input: Value) -> Result<ToolResult> {
        self.tools
            .execute_tool(tool_name, input)
            .await
            .map_err(|e| DevMindError::InvalidInput(format!("{:#}", e)))
    }

    pub fn tools(&self) -> &LocalFileTools {
        &self.tools
    }

    pub fn config(&self) -> &DevMindConfig {
        &self.config
    }

    fn indexer(&self) -> &Arc<ProjectIndexer> {
        self.tools.indexer()
    }

    /// Rebuild the project index from `root`. The walk runs on the blocking pool.
    pub async fn analyze(&self, root: impl AsRef<Path>) -> Result<AnalyzeResult> {
        self.analyze_with_cancel(root, CancellationToken::new()).await
    }

    pub async fn analyze_with_cancel(
        &self,
        root: impl AsRef<Path>,
        cancel: CancellationToken,
    ) -> Result<AnalyzeResult> {
        let indexer = Arc::clone(self.indexer());
        let root = root.as_ref().to_path_buf();
        tokio::task::spawn_blocking(move || indexer.analyze_with_cancel(&root, cancel)).await?
    }

    pub fn get_summary(&self, relative_path: &str) -> Result<IndexRecord> {
        self.indexer().get_summary(relative_path)
    }

    pub fn get_full_content(&self, relative_path: &str) -> Result<String> {
        self.indexer().get_full_content(relative_path)
    }

    pub fn list_subdirectories(&self, path: impl AsRef<Path>) -> Result<Vec<String>> {
        self.indexer().list_subdirectories(path.as_ref())
    }

    pub fn list_paths(&self) -> Vec<String> {
        self.indexer().list_paths()
    }

    /// Name search under `root`, or under the configured search roots.
    pub fn find(&self, name: &str, root: Option<&Path>, max_depth: MaxDepth) -> Result<Vec<PathBuf>> {
        match root {
            Some(root) => scanner::find_by_name(root, name, max_depth),
            None => Ok(scanner::find_in_roots(&self.config.search.effective_roots(), name, max_depth)),
        }
    }

    pub fn is_indexed(&self) -> bool {
        self.indexer().is_indexed()
    }

    pub fn get_stats(&self) -> IndexStats {
        self.indexer().stats()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DevMindBuilder {
    config: DevMindConfig,
}

impl DevMindBuilder {
    pub fn with_config(mut self, config: DevMindConfig) -> Self {
        self.config = config;
        self
    }

    pub fn preview_chars(mut self, chars: usize) -> Self {
        self.config.indexing.preview_chars = chars;
        self
    }

    pub fn truncation_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.indexing.truncation_marker = marker.into();
        self
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.config.indexing.follow_symlinks = follow;
        self
    }

    pub fn declaration_keywords(mut self, keywords: Vec<String>) -> Self {
        self.config.extractor.declaration_keywords = keywords;
        self
    }

    pub fn search_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.config.search.roots = roots;
        self
    }

    pub fn build(self) -> Result<DevMind> {
        if self.config.extractor.declaration_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(DevMindError::Config(
                "declaration keywords must not be blank".to_string(),
            ));
        }

        let indexer = Arc::new(ProjectIndexer::from_config(&self.config));
        let tools = LocalFileTools::new(indexer, self.config.search.clone());
        Ok(DevMind {
            config: self.config,
            tools,
        })
    }
}
