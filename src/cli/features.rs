//! Features command - grouped feature listing for one file

use super::files::read_source;
use crate::reporters::{self, FeatureReport, OutputFormat};
use anyhow::Result;
use codeorigin::baseline::compare_to_ai;
use codeorigin::config::CodeoriginConfig;
use codeorigin::{FeatureAggregator, SourceUnit};
use std::path::Path;
use std::str::FromStr;

pub(super) fn run(
    config: &CodeoriginConfig,
    file: &Path,
    format: &str,
    stats: Option<&Path>,
) -> Result<()> {
    let format = OutputFormat::from_str(format)?;
    if !file.is_file() {
        anyhow::bail!("Not a file: {}", file.display());
    }

    let shown = file.display().to_string();
    let unit = SourceUnit::new(read_source(file)?, shown.clone());
    let features = FeatureAggregator::new(&config.analysis).extract(&unit);

    let (_, profile) = super::open_profile(config, stats);
    let comparison = compare_to_ai(&features, &profile);

    let report = FeatureReport::new(shown, unit.language, &features, comparison);
    print!("{}", reporters::features_with_format(&report, format)?);
    Ok(())
}
