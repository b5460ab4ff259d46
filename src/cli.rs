use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{
    cli_types::{AnalyzeArgs, FindArgs, SubdirsArgs},
    config::DevMindConfig,
    devmind::DevMind,
    scanner::MaxDepth,
    server,
};

pub struct CliApp {
    config: DevMindConfig,
    devmind: DevMind,
    verbose: bool,
}

impl CliApp {
    pub fn new(config: DevMindConfig, verbose: bool, colors_enabled: bool) -> Result<Self> {
        info!("Initializing DevMind CLI");

        if !colors_enabled {
            colored::control::set_override(false);
        }

        let devmind = DevMind::builder()
            .with_config(config.clone())
            .build()
            .context("Failed to create DevMind")?;

        Ok(Self {
            config,
            devmind,
            verbose,
        })
    }

    pub async fn serve(&self) -> Result<()> {
        let shutdown = CancellationToken::new();
        let signal_token = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                signal_token.cancel();
            }
        });

        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        server::serve(self.devmind.tools(), stdin, stdout, shutdown).await
    }

    pub async fn analyze(&self, args: AnalyzeArgs) -> Result<()> {
        let start_time = Instant::now();

        if !args.json {
            self.print_header("Project Analysis");
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner.set_message(format!("Indexing {}", args.path.display()));

        let result = self.devmind.analyze(&args.path).await;
        spinner.finish_and_clear();
        let result = result.with_context(|| format!("Failed to analyze {}", args.path.display()))?;

        if args.json {
            let mut records = serde_json::Map::new();
            for path in &result.files {
                let record = self.devmind.get_summary(path)?;
                records.insert(path.clone(), serde_json::to_value(record)?);
            }
            let output = json!({
                "root": result.root,
                "files": records,
                "skipped": result.skipped,
                "duration_ms": result.duration_ms
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        for path in &result.files {
            let record = self.devmind.get_summary(path)?;
            println!("{}", path.bold());
            println!("  {}", record.summary);
            if self.verbose && !record.imports.is_empty() {
                let modules: Vec<&str> = record.imports.iter().map(|i| i.module()).collect();
                println!("  {} {}", "imports:".dimmed(), modules.join(", "));
            }
        }

        self.print_success(&format!(
            "Indexed {} files ({} skipped) in {:?}",
            result.files.len(),
            result.skipped,
            start_time.elapsed()
        ));
        Ok(())
    }

    pub fn subdirs(&self, args: SubdirsArgs) -> Result<()> {
        let directories = self
            .devmind
            .list_subdirectories(&args.path)
            .with_context(|| format!("Failed to list {}", args.path.display()))?;

        if directories.is_empty() {
            self.print_info("No subdirectories");
        }
        for name in directories {
            println!("{}/", name.blue());
        }
        Ok(())
    }

    pub fn find(&self, args: FindArgs) -> Result<()> {
        let max_depth = MaxDepth::from_signed(args.max_depth.unwrap_or(self.config.search.default_max_depth));
        let matches = self
            .devmind
            .find(&args.name, args.root.as_deref(), max_depth)
            .with_context(|| format!("Failed to search for {}", args.name))?;

        if matches.is_empty() {
            self.print_warning(&format!("'{}' not found", args.name));
            return Ok(());
        }
        for path in matches {
            self.print_success(&format!("Found: {}", path.display()));
        }
        Ok(())
    }

    pub fn show_config(&self) -> Result<()> {
        let text = self.config.to_toml()?;
        println!("{}", text);
        if self.verbose {
            match DevMindConfig::default_path() {
                Some(path) => self.print_info(&format!("Default config file: {}", path.display())),
                None => self.print_info("No default config directory on this platform"),
            }
        }
        Ok(())
    }

    fn print_header(&self, title: &str) {
        println!("{}", format!("== {} ==", title).bold().cyan());
    }

    fn print_success(&self, message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    fn print_info(&self, message: &str) {
        println!("{} {}", "•".blue(), message);
    }

    fn print_warning(&self, message: &str) {
        println!("{} {}", "!".yellow(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn create_test_app() -> CliApp {
        CliApp::new(DevMindConfig::default(), false, false).unwrap()
    }

    #[tokio::test]
    async fn test_analyze_directory() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("main.py"), "def main():\n    pass\n").unwrap();

        let app = create_test_app();
        let args = AnalyzeArgs {
            path: temp_dir.path().to_path_buf(),
            json: false,
        };
        assert!(app.analyze(args).await.is_ok());
        assert_eq!(app.devmind.list_paths(), vec!["main.py"]);
    }

    #[tokio::test]
    async fn test_analyze_json_output() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("lib.py"), "import os\n").unwrap();

        let app = create_test_app();
        let args = AnalyzeArgs {
            path: temp_dir.path().to_path_buf(),
            json: true,
        };
        assert!(app.analyze(args).await.is_ok());
    }

    #[tokio::test]
    async fn test_analyze_missing_directory_fails() {
        let app = create_test_app();
        let args = AnalyzeArgs {
            path: PathBuf::from("/definitely/not/here"),
            json: false,
        };
        let err = app.analyze(args).await.unwrap_err();
        assert!(format!("{:#}", err).contains("Not a directory"));
    }

    #[test]
    fn test_subdirs_and_find() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("src")).unwrap();
        fs::write(temp_dir.path().join("src/notes.txt"), "x").unwrap();

        let app = create_test_app();
        assert!(app
            .subdirs(SubdirsArgs {
                path: temp_dir.path().to_path_buf()
            })
            .is_ok());
        assert!(app
            .find(FindArgs {
                name: "notes.txt".to_string(),
                root: Some(temp_dir.path().to_path_buf()),
                max_depth: Some(-1),
            })
            .is_ok());
        assert!(app
            .subdirs(SubdirsArgs {
                path: temp_dir.path().join("src/notes.txt")
            })
            .is_err());
    }

    #[test]
    fn test_show_config() {
        let app = create_test_app();
        assert!(app.show_config().is_ok());
    }
}
