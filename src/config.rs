use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

const ENV_PREFIX: &str = "DEVMIND";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct DevMindConfig {
    pub indexing: IndexingConfig,
    pub extractor: ExtractorConfig,
    pub search: SearchConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IndexingConfig {
    /// Number of characters kept in each record's content preview.
    pub preview_chars: usize,
    pub truncation_marker: String,
    pub follow_symlinks: bool,
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            preview_chars: 1000,
            truncation_marker: "...".to_string(),
            follow_symlinks: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Line prefixes counted as function/type declarations.
    pub declaration_keywords: Vec<String>,
    /// How many matching lines are echoed in the summary.
    pub sample_size: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        let keywords = [
            "def", "async def", "class",
            "fn", "pub fn", "async fn", "pub async fn",
            "struct", "pub struct", "enum", "pub enum", "trait", "pub trait",
            "function", "interface", "func",
        ];
        Self {
            declaration_keywords: keywords.iter().map(|k| k.to_string()).collect(),
            sample_size: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    /// Roots searched by `find_file` when no explicit root is given.
    /// Empty means the user's Desktop, Documents and Downloads folders.
    pub roots: Vec<PathBuf>,
    /// -1 means unlimited.
    pub default_max_depth: i64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            default_max_depth: -1,
        }
    }
}

impl SearchConfig {
    pub fn effective_roots(&self) -> Vec<PathBuf> {
        if !self.roots.is_empty() {
            return self.roots.clone();
        }

        match directories::UserDirs::new() {
            Some(dirs) => [dirs.desktop_dir(), dirs.document_dir(), dirs.download_dir()]
                .into_iter()
                .flatten()
                .map(Path::to_path_buf)
                .collect(),
            None => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl DevMindConfig {
    /// Load configuration from an optional TOML file, then apply
    /// `DEVMIND_<SECTION>__<KEY>` environment overrides.
    ///
    /// Without an explicit path the platform config directory is tried;
    /// a missing file there is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = ::config::Config::builder();

        match path {
            Some(path) => {
                builder = builder.add_source(::config::File::from(path.to_path_buf()).required(true));
            }
            None => {
                if let Some(default_path) = Self::default_path() {
                    builder = builder.add_source(::config::File::from(default_path).required(false));
                }
            }
        }

        let settings = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "devmind", "devmind")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::DevMindError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = DevMindConfig::default();
        assert_eq!(config.indexing.preview_chars, 1000);
        assert_eq!(config.indexing.truncation_marker, "...");
        assert_eq!(config.extractor.sample_size, 2);
        assert!(config.extractor.declaration_keywords.contains(&"def".to_string()));
        assert!(config.extractor.declaration_keywords.contains(&"class".to_string()));
        assert_eq!(config.search.default_max_depth, -1);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("devmind.toml");
        fs::write(
            &path,
            r#"
[indexing]
preview_chars = 200

[extractor]
declaration_keywords = ["def", "class"]
"#,
        )
        .unwrap();

        let config = DevMindConfig::load(Some(&path)).unwrap();
        assert_eq!(config.indexing.preview_chars, 200);
        assert_eq!(config.indexing.truncation_marker, "...");
        assert_eq!(config.extractor.declaration_keywords, vec!["def", "class"]);
        assert_eq!(config.extractor.sample_size, 2);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = DevMindConfig::load(Some(&temp_dir.path().join("nope.toml")));
        assert!(matches!(result, Err(crate::DevMindError::Config(_))));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = DevMindConfig::default();
        let text = config.to_toml().unwrap();
        assert!(text.contains("preview_chars = 1000"));
        let parsed: DevMindConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_explicit_search_roots_win() {
        let search = SearchConfig {
            roots: vec![PathBuf::from("/srv/projects")],
            default_max_depth: 3,
        };
        assert_eq!(search.effective_roots(), vec![PathBuf::from("/srv/projects")]);
    }
}
