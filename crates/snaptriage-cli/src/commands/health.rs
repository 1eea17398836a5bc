use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use snaptriage_core::analyze::HttpAnalyzer;

use crate::summary::print_health;

#[derive(Args)]
pub struct HealthArgs {
    /// Config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Classification service URL
    #[arg(long)]
    pub api_url: Option<String>,
}

pub async fn run(args: &HealthArgs) -> Result<()> {
    let mut config = super::load_config(args.config.as_deref())?;
    if let Some(ref url) = args.api_url {
        config.api_url = url.clone();
    }

    let analyzer = HttpAnalyzer::new(&config.api_url, config.reduce.clone())?;
    let status = analyzer
        .health_reported(|status| print_health(&config.api_url, status))
        .await;

    if !status.is_ok() {
        bail!("{} is not reachable", config.api_url);
    }
    Ok(())
}
