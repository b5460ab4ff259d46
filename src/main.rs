use anyhow::{Context, Result};
use clap::Parser;

use devmind::cli_types::{Cli, Commands};
use devmind::logging::init_tracing;
use devmind::{CliApp, DevMindConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = DevMindConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    init_tracing(&config.logging, cli.verbose);

    let app = CliApp::new(config, cli.verbose, !cli.no_color)?;

    match cli.command {
        Commands::Serve => app.serve().await,
        Commands::Analyze(args) => app.analyze(args).await,
        Commands::Subdirs(args) => app.subdirs(args),
        Commands::Find(args) => app.find(args),
        Commands::Config => app.show_config(),
    }
}
