use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use snaptriage_core::analyze::HttpAnalyzer;
use snaptriage_core::batch::TriageController;
use snaptriage_core::export::{export_archive, select_by_threshold};
use snaptriage_core::io::load_payloads;
use tracing::warn;

use crate::progress::TerminalObserver;
use crate::summary::{print_batch_results, print_export, print_health, print_run_header, print_threshold};

#[derive(Args)]
pub struct RunArgs {
    /// Image files to triage
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Classification service URL
    #[arg(long)]
    pub api_url: Option<String>,

    /// Maximum number of images to process
    #[arg(long)]
    pub limit: Option<usize>,

    /// Minimum "people" score in percent (default: recommended threshold)
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Directory to write people_threshold.zip into
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Skip the service health check
    #[arg(long)]
    pub no_health: bool,
}

pub async fn run(args: &RunArgs) -> Result<()> {
    let mut config = super::load_config(args.config.as_deref())?;
    if let Some(ref url) = args.api_url {
        config.api_url = url.clone();
    }
    if let Some(limit) = args.limit {
        config.max_files = limit.max(1);
    }
    let threshold = args
        .threshold
        .unwrap_or(config.recommended_threshold as f32)
        .clamp(0.0, 100.0);

    let mut payloads = Vec::with_capacity(args.files.len());
    for (path, loaded) in load_payloads(&args.files) {
        match loaded {
            Ok(payload) => payloads.push(payload),
            Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable file"),
        }
    }

    print_run_header(&config, payloads.len(), threshold);

    let analyzer = Arc::new(HttpAnalyzer::new(&config.api_url, config.reduce.clone())?);
    if !args.no_health {
        analyzer
            .health_reported(|status| print_health(&config.api_url, status))
            .await;
    }

    let observer = Arc::new(TerminalObserver::new()?);
    let controller = TriageController::from_config(&config, analyzer)?.with_observer(observer.clone());

    let (batch, _) = controller.process(payloads).await?;
    observer.finish();

    let batch = batch.lock().await;
    print_batch_results(&batch);

    let completed = batch.completed_snapshot();
    let selected = select_by_threshold(completed.iter().copied(), threshold);
    print_threshold(threshold, &selected, completed.len());

    if let Some(ref dir) = args.export {
        if selected.is_empty() {
            println!("\nNo images meet the threshold; nothing exported.");
        } else {
            let summary = export_archive(&selected, dir).context("Failed to create zip file")?;
            print_export(&summary);
        }
    }

    Ok(())
}
