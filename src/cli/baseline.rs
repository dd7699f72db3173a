//! Baseline command - summarize the critical features of a statistics file

use crate::reporters::{self, BaselineReport, OutputFormat};
use anyhow::Result;
use codeorigin::config::CodeoriginConfig;
use std::path::Path;
use std::str::FromStr;

pub(super) fn run(config: &CodeoriginConfig, stats: Option<&Path>, format: &str) -> Result<()> {
    let format = OutputFormat::from_str(format)?;
    let (path, profile) = super::open_profile(config, stats);
    let report = BaselineReport::new(path.display().to_string(), &profile);
    print!("{}", reporters::baseline_with_format(&report, format)?);
    Ok(())
}
