//! Init command - write a default configuration file

use anyhow::{Context, Result};
use codeorigin::config::{CONFIG_FILENAME, DEFAULT_CONFIG_TOML};
use console::style;
use std::path::Path;

/// Run the init command
pub fn run(path: &Path) -> Result<()> {
    let dir = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    if !dir.is_dir() {
        anyhow::bail!("Path is not a directory: {}", dir.display());
    }

    let config_path = dir.join(CONFIG_FILENAME);
    if config_path.exists() {
        println!(
            "{} Already initialized at {}",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
        return Ok(());
    }

    std::fs::write(&config_path, DEFAULT_CONFIG_TOML)
        .with_context(|| format!("Failed to create {}", config_path.display()))?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );

    println!("\nNext steps:");
    println!(
        "  {} Build a baseline from labeled corpora",
        style("codeorigin calibrate --ai <DIR> --human <DIR>").cyan()
    );
    println!("  {} Classify files", style("codeorigin analyze .").cyan());

    Ok(())
}
