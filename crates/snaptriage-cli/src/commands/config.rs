use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use snaptriage_core::config::TriageConfig;

#[derive(Args)]
pub struct ConfigArgs {
    /// Write config to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the defaults with environment overrides applied
    #[arg(long)]
    pub effective: bool,
}

/// Print or save the default TriageConfig as TOML.
pub fn run(args: &ConfigArgs) -> Result<()> {
    let config = if args.effective {
        super::load_config(None)?
    } else {
        TriageConfig::default()
    };
    let toml_str = toml::to_string_pretty(&config)?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &toml_str)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        println!("Config saved to {}", path.display());
    } else {
        print!("{}", toml_str);
    }

    Ok(())
}
