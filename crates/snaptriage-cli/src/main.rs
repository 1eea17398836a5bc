mod commands;
mod progress;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snaptriage", about = "Batch image triage against a classification service")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reduce, analyze and optionally export a batch of images
    Run(commands::run::RunArgs),
    /// Shrink one image under the byte budget
    Reduce(commands::reduce::ReduceArgs),
    /// Check whether the classification service is reachable
    Health(commands::health::HealthArgs),
    /// Print or save the default configuration as TOML
    Config(commands::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Run(args) => commands::run::run(args).await,
        Commands::Reduce(args) => commands::reduce::run(args),
        Commands::Health(args) => commands::health::run(args).await,
        Commands::Config(args) => commands::config::run(args),
    }
}
