use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::ProgressBar;
use snaptriage_core::io::{load_payload, reduced_output_path, save_payload};
use snaptriage_core::reduce::reduce;

use crate::summary::print_reduction;

#[derive(Args)]
pub struct ReduceArgs {
    /// Input image
    pub file: PathBuf,

    /// Config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Byte budget in KiB
    #[arg(long)]
    pub budget: Option<usize>,

    /// Scale of the first encode (0-1]
    #[arg(long)]
    pub scale: Option<f32>,

    /// Output file path (default: <name>.reduced.<ext> next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &ReduceArgs) -> Result<()> {
    let config = super::load_config(args.config.as_deref())?;
    let mut params = config.reduce;
    if let Some(kib) = args.budget {
        params.byte_budget = kib * 1024;
    }
    if let Some(scale) = args.scale {
        params.initial_scale = scale;
    }
    params.validate()?;

    let payload = load_payload(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("Reducing {}", payload.name()));
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    let reduction = reduce(&payload, &params);
    spinner.finish_and_clear();
    let reduction = reduction.with_context(|| format!("Failed to reduce {}", args.file.display()))?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| reduced_output_path(&args.file, reduction.image.media_type()));
    save_payload(&reduction.image, &output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    print_reduction(&payload, &reduction, &params, &output);
    Ok(())
}
