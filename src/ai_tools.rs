use std::path::PathBuf;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use anyhow::{Result, Context};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::config::SearchConfig;
use crate::error::DevMindError;
use crate::file_ops;
use crate::indexer::ProjectIndexer;
use crate::scanner::{self, MaxDepth};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

pub struct LocalFileTools {
    indexer: Arc<ProjectIndexer>,
    search: SearchConfig,
}

impl LocalFileTools {
    pub fn new(indexer: Arc<ProjectIndexer>, search: SearchConfig) -> Self {
        Self { indexer, search }
    }

    pub fn indexer(&self) -> &Arc<ProjectIndexer> {
        &self.indexer
    }

    pub fn get_tool_schemas() -> Vec<ToolSchema> {
        vec![
            ToolSchema {
                name: "analyze_project".to_string(),
                description: "Walk a project directory and build the in-memory index of file summaries and imports. Replaces any previous index".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "path": {
                            "type": "string",
                            "description": "Path to the project root directory"
                        }
                    },
                    "required": ["path"]
                }),
            },
            ToolSchema {
                name: "get_file_summary".to_string(),
                description: "Get the indexed summary, imports and content preview of a file from the last analyzed project".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "relative_path": {
                            "type": "string",
                            "description": "Path relative to the analyzed root, as returned by analyze_project"
                        }
                    },
                    "required": ["relative_path"]
                }),
            },
            ToolSchema {
                name: "get_file_content".to_string(),
                description: "Read the full current content of an indexed file".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "relative_path": {
                            "type": "string",
                            "description": "Path relative to the analyzed root, as returned by analyze_project"
                        }
                    },
                    "required": ["relative_path"]
                }),
            },
            ToolSchema {
                name: "list_subdirectories".to_string(),
                description: "List the immediate subdirectories of a directory, sorted by name".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "path": {
                            "type": "string",
                            "description": "Directory to list"
                        }
                    },
                    "required": ["path"]
                }),
            },
            ToolSchema {
                name: "get_index_overview".to_string(),
                description: "Get the root, file count and build statistics of the current index".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "include_file_list": {
                            "type": "boolean",
                            "description": "Whether to include all indexed relative paths",
                            "default": false
                        }
                    }
                }),
            },
            ToolSchema {
                name: "find_file".to_string(),
                description: "Search for files or folders by exact name. Searches Desktop, Documents and Downloads unless a root is given".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "name": {
                            "type": "string",
                            "description": "Name of the file or folder to search for (e.g., notes.txt)"
                        },
                        "root": {
                            "type": "string",
                            "description": "Directory to search instead of the default locations"
                        },
                        "max_depth": {
                            "type": "integer",
                            "description": "Maximum directory depth to descend, -1 for unlimited",
                            "default": -1
                        }
                    },
                    "required": ["name"]
                }),
            },
            ToolSchema {
                name: "create_file".to_string(),
                description: "Create a file with the given path and content, creating parent directories as needed".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "path": {"type": "string", "description": "Full file path to create"},
                        "content": {"type": "string", "description": "Text content to write in the file"}
                    },
                    "required": ["path", "content"]
                }),
            },
            ToolSchema {
                name: "delete_file".to_string(),
                description: "Delete a single file".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "path": {"type": "string", "description": "File to delete"}
                    },
                    "required": ["path"]
                }),
            },
            ToolSchema {
                name: "move_file".to_string(),
                description: "Move a file to a new path or into an existing directory".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "source": {"type": "string", "description": "File to move"},
                        "destination": {"type": "string", "description": "Target path or directory"}
                    },
                    "required": ["source", "destination"]
                }),
            },
            ToolSchema {
                name: "rename_file".to_string(),
                description: "Rename a file inside its current directory".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "path": {"type": "string", "description": "File to rename"},
                        "new_name": {"type": "string", "description": "New file name without directories"}
                    },
                    "required": ["path", "new_name"]
                }),
            },
            ToolSchema {
                name: "append_to_file".to_string(),
                description: "Append text to the end of an existing file".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "path": {"type": "string", "description": "File to append to"},
                        "content": {"type": "string", "description": "Text to append"}
                    },
                    "required": ["path", "content"]
                }),
            },
            ToolSchema {
                name: "replace_in_file".to_string(),
                description: "Replace text in a file, the first occurrence or all of them".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "path": {"type": "string", "description": "File to edit"},
                        "old_text": {"type": "string", "description": "Exact text to find"},
                        "new_text": {"type": "string", "description": "Replacement text"},
                        "replace_all": {
                            "type": "boolean",
                            "description": "Replace every occurrence instead of only the first",
                            "default": false
                        }
                    },
                    "required": ["path", "old_text", "new_text"]
                }),
            },
            ToolSchema {
                name: "edit_line".to_string(),
                description: "Replace one line of a file, addressed by 1-based line number".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "path": {"type": "string", "description": "File to edit"},
                        "line_number": {"type": "integer", "description": "1-based line number"},
                        "new_line": {"type": "string", "description": "Replacement line without its line ending"}
                    },
                    "required": ["path", "line_number", "new_line"]
                }),
            },
        ]
    }

    pub async fn execute_tool(&self, tool_name: &str, input: Value) -> Result<ToolResult> {
        self.execute_tool_with_cancel(tool_name, input, CancellationToken::new()).await
    }

    /// Like [`execute_tool`](Self::execute_tool), but a long `analyze_project`
    /// walk stops early once `cancel` fires and keeps the previous index.
    pub async fn execute_tool_with_cancel(
        &self,
        tool_name: &str,
        input: Value,
        cancel: CancellationToken,
    ) -> Result<ToolResult> {
        let result = match tool_name {
            "analyze_project" => self.analyze_project(input, cancel).await,
            "get_file_summary" => self.get_file_summary(input).await,
            "get_file_content" => self.get_file_content(input).await,
            "list_subdirectories" => self.list_subdirectories(input).await,
            "get_index_overview" => self.get_index_overview(input).await,
            "find_file" => self.find_file(input).await,
            "create_file" => self.create_file(input).await,
            "delete_file" => self.delete_file(input).await,
            "move_file" => self.move_file(input).await,
            "rename_file" => self.rename_file(input).await,
            "append_to_file" => self.append_to_file(input).await,
            "replace_in_file" => self.replace_in_file(input).await,
            "edit_line" => self.edit_line(input).await,
            _ => return Ok(ToolResult::error(format!("Unknown tool: {}", tool_name))),
        }?;

        if !result.success {
            warn!("Tool {} failed: {}", tool_name, result.data["error"]);
        }
        Ok(result)
    }

    async fn analyze_project(&self, input: Value, cancel: CancellationToken) -> Result<ToolResult> {
        let analyze_input: PathInput = serde_json::from_value(input)
            .context("Invalid analyze_project input")?;

        let indexer = Arc::clone(&self.indexer);
        let root = PathBuf::from(&analyze_input.path);
        let outcome = tokio::task::spawn_blocking(move || indexer.analyze_with_cancel(&root, cancel))
            .await
            .context("Indexing task panicked")?;

        Ok(match outcome {
            Ok(analysis) => ToolResult::success(json!({
                "status": "success",
                "root": analysis.root,
                "files": analysis.files,
                "count": analysis.files.len(),
                "skipped": analysis.skipped,
                "duration_ms": analysis.duration_ms
            })),
            Err(e) => ToolResult::from_error(&e, json!({"path": analyze_input.path})),
        })
    }

    async fn get_file_summary(&self, input: Value) -> Result<ToolResult> {
        let summary_input: RelativePathInput = serde_json::from_value(input)
            .context("Invalid get_file_summary input")?;

        Ok(match self.indexer.get_summary(&summary_input.relative_path) {
            Ok(record) => ToolResult::success(json!({
                "status": "success",
                "relative_path": summary_input.relative_path,
                "absolute_path": record.absolute_path,
                "summary": record.summary,
                "imports": record.imports,
                "content_preview": record.content_preview
            })),
            Err(e) => ToolResult::from_error(&e, json!({"relative_path": summary_input.relative_path})),
        })
    }

    async fn get_file_content(&self, input: Value) -> Result<ToolResult> {
        let content_input: RelativePathInput = serde_json::from_value(input)
            .context("Invalid get_file_content input")?;

        let indexer = Arc::clone(&self.indexer);
        let relative_path = content_input.relative_path.clone();
        let outcome = tokio::task::spawn_blocking(move || indexer.get_full_content(&relative_path))
            .await
            .context("Read task panicked")?;

        Ok(match outcome {
            Ok(content) => ToolResult::success(json!({
                "status": "success",
                "relative_path": content_input.relative_path,
                "content": content
            })),
            Err(e) => ToolResult::from_error(&e, json!({"relative_path": content_input.relative_path})),
        })
    }

    async fn list_subdirectories(&self, input: Value) -> Result<ToolResult> {
        let list_input: PathInput = serde_json::from_value(input)
            .context("Invalid list_subdirectories input")?;

        Ok(match self.indexer.list_subdirectories(list_input.path.as_ref()) {
            Ok(directories) => ToolResult::success(json!({
                "status": "success",
                "path": list_input.path,
                "directories": directories
            })),
            Err(e) => ToolResult::from_error(&e, json!({"path": list_input.path})),
        })
    }

    async fn get_index_overview(&self, input: Value) -> Result<ToolResult> {
        let overview_input: GetIndexOverviewInput = serde_json::from_value(input).unwrap_or_default();

        let snapshot = self.indexer.snapshot();
        let mut result = json!({
            "status": "success",
            "indexed": snapshot.root().is_some(),
            "root": snapshot.root(),
            "total_files": snapshot.file_count(),
            "stats": snapshot.stats()
        });

        if overview_input.include_file_list.unwrap_or(false) {
            result["files"] = json!(snapshot.paths());
        }

        Ok(ToolResult::success(result))
    }

    async fn find_file(&self, input: Value) -> Result<ToolResult> {
        let find_input: FindFileInput = serde_json::from_value(input)
            .context("Invalid find_file input")?;

        let max_depth = MaxDepth::from_signed(find_input.max_depth.unwrap_or(self.search.default_max_depth));
        let roots = match &find_input.root {
            Some(root) => vec![PathBuf::from(root)],
            None => self.search.effective_roots(),
        };

        let name = find_input.name.clone();
        let explicit_root = find_input.root.is_some();
        let outcome = tokio::task::spawn_blocking(move || {
            if explicit_root {
                scanner::find_by_name(&roots[0], &name, max_depth)
            } else {
                Ok(scanner::find_in_roots(&roots, &name, max_depth))
            }
        })
        .await
        .context("Search task panicked")?;

        Ok(match outcome {
            Ok(matches) => ToolResult::success(json!({
                "status": "success",
                "name": find_input.name,
                "count": matches.len(),
                "matches": matches
            })),
            Err(e) => ToolResult::from_error(&e, json!({"name": find_input.name})),
        })
    }

    async fn create_file(&self, input: Value) -> Result<ToolResult> {
        let create_input: WriteInput = serde_json::from_value(input)
            .context("Invalid create_file input")?;

        Ok(match file_ops::create_file(create_input.path.as_ref(), &create_input.content) {
            Ok(bytes) => ToolResult::success(json!({
                "status": "success",
                "path": create_input.path,
                "bytes": bytes
            })),
            Err(e) => ToolResult::from_error(&e, json!({"path": create_input.path})),
        })
    }

    async fn delete_file(&self, input: Value) -> Result<ToolResult> {
        let delete_input: PathInput = serde_json::from_value(input)
            .context("Invalid delete_file input")?;

        Ok(match file_ops::delete_file(delete_input.path.as_ref()) {
            Ok(()) => ToolResult::success(json!({
                "status": "success",
                "path": delete_input.path
            })),
            Err(e) => ToolResult::from_error(&e, json!({"path": delete_input.path})),
        })
    }

    async fn move_file(&self, input: Value) -> Result<ToolResult> {
        let move_input: MoveFileInput = serde_json::from_value(input)
            .context("Invalid move_file input")?;

        Ok(match file_ops::move_file(move_input.source.as_ref(), move_input.destination.as_ref()) {
            Ok(target) => ToolResult::success(json!({
                "status": "success",
                "source": move_input.source,
                "destination": target
            })),
            Err(e) => ToolResult::from_error(&e, json!({"source": move_input.source})),
        })
    }

    async fn rename_file(&self, input: Value) -> Result<ToolResult> {
        let rename_input: RenameFileInput = serde_json::from_value(input)
            .context("Invalid rename_file input")?;

        Ok(match file_ops::rename_file(rename_input.path.as_ref(), &rename_input.new_name) {
            Ok(target) => ToolResult::success(json!({
                "status": "success",
                "source": rename_input.path,
                "destination": target
            })),
            Err(e) => ToolResult::from_error(&e, json!({"path": rename_input.path})),
        })
    }

    async fn append_to_file(&self, input: Value) -> Result<ToolResult> {
        let append_input: WriteInput = serde_json::from_value(input)
            .context("Invalid append_to_file input")?;

        Ok(match file_ops::append_to_file(append_input.path.as_ref(), &append_input.content) {
            Ok(bytes) => ToolResult::success(json!({
                "status": "success",
                "path": append_input.path,
                "bytes": bytes
            })),
            Err(e) => ToolResult::from_error(&e, json!({"path": append_input.path})),
        })
    }

    async fn replace_in_file(&self, input: Value) -> Result<ToolResult> {
        let replace_input: ReplaceInFileInput = serde_json::from_value(input)
            .context("Invalid replace_in_file input")?;

        let outcome = file_ops::replace_in_file(
            replace_input.path.as_ref(),
            &replace_input.old_text,
            &replace_input.new_text,
            replace_input.replace_all.unwrap_or(false),
        );

        Ok(match outcome {
            Ok(replacements) => ToolResult::success(json!({
                "status": "success",
                "path": replace_input.path,
                "replacements": replacements
            })),
            Err(e) => ToolResult::from_error(&e, json!({"path": replace_input.path})),
        })
    }

    async fn edit_line(&self, input: Value) -> Result<ToolResult> {
        let edit_input: EditLineInput = serde_json::from_value(input)
            .context("Invalid edit_line input")?;

        Ok(match file_ops::edit_line(edit_input.path.as_ref(), edit_input.line_number, &edit_input.new_line) {
            Ok(()) => ToolResult::success(json!({
                "status": "success",
                "path": edit_input.path,
                "line_number": edit_input.line_number
            })),
            Err(e) => ToolResult::from_error(&e, json!({"path": edit_input.path})),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    pub data: Value,
    pub error: Option<String>,
}

impl ToolResult {
    pub fn success(data: Value) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: json!({}),
            error: Some(message),
        }
    }

    pub fn error_with_data(data: Value) -> Self {
        Self {
            success: false,
            data,
            error: None,
        }
    }

    /// Structured failure: `context` fields plus `status`, `kind` and `error`.
    pub fn from_error(err: &DevMindError, context: Value) -> Self {
        let mut data = context;
        data["status"] = json!("error");
        data["kind"] = json!(err.kind());
        data["error"] = json!(err.to_string());
        Self::error_with_data(data)
    }
}

// Input types for tool functions
#[derive(Debug, Deserialize)]
struct PathInput {
    path: String,
}

#[derive(Debug, Deserialize)]
struct RelativePathInput {
    relative_path: String,
}

#[derive(Debug, Deserialize, Default)]
struct GetIndexOverviewInput {
    include_file_list: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct FindFileInput {
    name: String,
    root: Option<String>,
    max_depth: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct WriteInput {
    path: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MoveFileInput {
    source: String,
    destination: String,
}

#[derive(Debug, Deserialize)]
struct RenameFileInput {
    path: String,
    new_name: String,
}

#[derive(Debug, Deserialize)]
struct ReplaceInFileInput {
    path: String,
    old_text: String,
    new_text: String,
    replace_all: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct EditLineInput {
    path: String,
    line_number: usize,
    new_line: String,
}
