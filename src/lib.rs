//! Project indexing and file tools for LLM coding agents.
//!
//! [`DevMind`] walks a project tree, keeps a heuristic summary and the scraped
//! imports of every text file in an in-memory index, and answers lookups by
//! relative path. The same operations are exposed as JSON tools through
//! [`LocalFileTools`] and the line-delimited loop in [`server`].

pub mod types;
pub mod error;
pub mod analyzers;
pub mod scanner;
pub mod storage;
pub mod indexer;
pub mod file_ops;
pub mod config;
pub mod logging;
pub mod cli;
pub mod cli_types;
pub mod ai_tools;
pub mod server;
pub mod devmind;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-export commonly used types
pub use types::*;
pub use error::{DevMindError, Result};
pub use analyzers::HeuristicExtractor;
pub use scanner::{MaxDepth, TreeWalker, WalkOutcome};
pub use storage::memory::ProjectIndex;
pub use indexer::ProjectIndexer;
pub use config::DevMindConfig;
pub use cli::CliApp;
pub use ai_tools::{LocalFileTools, ToolResult, ToolSchema};
pub use devmind::{DevMind, DevMindBuilder};
