//! Pattern-matching summary and import extraction.
//!
//! Nothing here parses source code. Declarations are recognised by a line
//! prefix and imports by one anchored regex, so multi-line imports, unusual
//! spacing, or declarations sharing a line with other tokens are missed.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ExtractorConfig;
use crate::types::ImportRef;

static IMPORT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:from\s+([\w.]+)\s+import\b|import\s+([\w.]+))")
        .expect("import pattern is valid")
});

#[derive(Debug, Clone)]
pub struct HeuristicExtractor {
    declaration_keywords: Vec<String>,
    sample_size: usize,
}

impl Default for HeuristicExtractor {
    fn default() -> Self {
        Self::from_config(&ExtractorConfig::default())
    }
}

impl HeuristicExtractor {
    pub fn new(declaration_keywords: Vec<String>, sample_size: usize) -> Self {
        Self {
            declaration_keywords,
            sample_size,
        }
    }

    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self::new(config.declaration_keywords.clone(), config.sample_size)
    }

    /// Count declaration-looking lines and echo the first few of them.
    pub fn extract_summary(&self, text: &str) -> String {
        let declarations: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| self.is_declaration(line))
            .collect();

        let sample: Vec<String> = declarations
            .iter()
            .take(self.sample_size)
            .map(|line| quote_sample(line))
            .collect();

        format!(
            "Detected {} functions/classes. First {}: [{}]",
            declarations.len(),
            self.sample_size,
            sample.join(", ")
        )
    }

    /// Scrape `from X import ...` and `import X` lines in source order.
    pub fn extract_imports(&self, text: &str) -> Vec<ImportRef> {
        text.lines()
            .filter_map(|line| IMPORT_PATTERN.captures(line))
            .filter_map(|caps| {
                if let Some(module) = caps.get(1) {
                    Some(ImportRef::from_module(module.as_str()))
                } else {
                    caps.get(2).map(|module| ImportRef::direct(module.as_str()))
                }
            })
            .collect()
    }

    fn is_declaration(&self, line: &str) -> bool {
        self.declaration_keywords.iter().any(|keyword| {
            line.strip_prefix(keyword.as_str())
                .map(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
                .unwrap_or(false)
        })
    }
}

/// Quote a sampled line like a Python string literal: single quotes unless
/// the line contains one and no double quote, escaping whatever clashes.
fn quote_sample(line: &str) -> String {
    let quote = if line.contains('\'') && !line.contains('"') { '"' } else { '\'' };
    let mut quoted = String::with_capacity(line.len() + 2);
    quoted.push(quote);
    for c in line.chars() {
        if c == '\\' || c == quote {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push(quote);
    quoted
}
