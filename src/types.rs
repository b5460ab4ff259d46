use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::SystemTime;

/// One scraped import reference. Exactly one side is populated:
/// `module_from` for `from X import ...`, `module_direct` for `import X`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportRef {
    pub module_from: Option<String>,
    pub module_direct: Option<String>,
}

impl ImportRef {
    pub fn from_module(module: impl Into<String>) -> Self {
        Self {
            module_from: Some(module.into()),
            module_direct: None,
        }
    }

    pub fn direct(module: impl Into<String>) -> Self {
        Self {
            module_from: None,
            module_direct: Some(module.into()),
        }
    }

    /// The referenced module path, whichever syntax produced it.
    pub fn module(&self) -> &str {
        self.module_from
            .as_deref()
            .or(self.module_direct.as_deref())
            .unwrap_or_default()
    }
}

/// Metadata kept for every indexed file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexRecord {
    pub absolute_path: PathBuf,
    pub summary: String,
    pub imports: Vec<ImportRef>,
    pub content_preview: String,
}

/// Result payload of a successful analyze call. Full metadata is fetched
/// afterwards through the accessors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResult {
    pub root: PathBuf,
    pub files: Vec<String>,
    pub skipped: usize,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IndexStats {
    pub total_files: usize,
    pub total_imports: usize,
    pub skipped_files: usize,
    pub build_duration_ms: u64,
    pub built_at: Option<SystemTime>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_import_ref_module() {
        assert_eq!(ImportRef::from_module("pkg.sub").module(), "pkg.sub");
        assert_eq!(ImportRef::direct("os").module(), "os");
    }

    #[test]
    fn test_import_ref_serializes_null_side() {
        let value = serde_json::to_value(ImportRef::direct("os")).unwrap();
        assert_eq!(value, json!({"module_from": null, "module_direct": "os"}));
    }
}
