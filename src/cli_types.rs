use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "devmind", version, about = "Project indexing and file tools for coding agents")]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true, env = "DEVMIND_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Answer JSON tool requests on stdin, one per line
    Serve,
    /// Index a project and print its files with summaries
    Analyze(AnalyzeArgs),
    /// List the immediate subdirectories of a directory
    Subdirs(SubdirsArgs),
    /// Find files or folders by exact name
    Find(FindArgs),
    /// Print the effective configuration
    Config,
}

#[derive(Debug, Clone, Args)]
pub struct AnalyzeArgs {
    /// Project root directory
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Print the full index as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct SubdirsArgs {
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct FindArgs {
    /// File or folder name to look for
    pub name: String,

    /// Search here instead of the configured roots
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Maximum depth to descend, -1 for unlimited
    #[arg(short = 'd', long, allow_hyphen_values = true)]
    pub max_depth: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_find_with_negative_depth() {
        let cli = Cli::try_parse_from(["devmind", "find", "notes.txt", "--max-depth", "-1"]).unwrap();
        match cli.command {
            Commands::Find(args) => {
                assert_eq!(args.name, "notes.txt");
                assert_eq!(args.max_depth, Some(-1));
                assert!(args.root.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_analyze_defaults() {
        let cli = Cli::try_parse_from(["devmind", "-v", "analyze"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.path, PathBuf::from("."));
                assert!(!args.json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
