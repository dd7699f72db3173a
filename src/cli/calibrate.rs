//! Calibrate command - build baseline statistics from labeled corpora

use super::files::{collect_source_files, read_source};
use anyhow::{Context, Result};
use codeorigin::baseline::{BaselineProfile, CorpusLabel, StatsAccumulator};
use codeorigin::config::CodeoriginConfig;
use codeorigin::{FeatureAggregator, SourceUnit};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::warn;

pub(super) fn run(config: &CodeoriginConfig, ai: &Path, human: &Path, output: &Path) -> Result<()> {
    for dir in [ai, human] {
        if !dir.is_dir() {
            anyhow::bail!("Corpus is not a directory: {}", dir.display());
        }
    }

    let mut labeled: Vec<(CorpusLabel, PathBuf)> = Vec::new();
    for (label, dir) in [(CorpusLabel::Ai, ai), (CorpusLabel::Human, human)] {
        let files = collect_source_files(dir)?;
        if files.is_empty() {
            anyhow::bail!("No C/C++ files found in {}", dir.display());
        }
        labeled.extend(files.into_iter().map(|f| (label, f)));
    }

    println!(
        "\n{} Calibrating from {} files\n",
        style("▶").cyan().bold(),
        labeled.len()
    );

    let bar = ProgressBar::new(labeled.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("valid template")
            .progress_chars("=>-"),
    );
    bar.set_message("Extracting features...");

    let aggregator = FeatureAggregator::new(&config.analysis);
    let stats = labeled
        .par_iter()
        .fold(StatsAccumulator::new, |mut acc, (label, file)| {
            match read_source(file) {
                Ok(text) => {
                    let unit = SourceUnit::new(text, file.display().to_string());
                    acc.add(*label, &aggregator.extract(&unit));
                }
                Err(e) => warn!("Skipping {}: {:#}", file.display(), e),
            }
            bar.inc(1);
            acc
        })
        .reduce(StatsAccumulator::new, StatsAccumulator::merge);
    bar.finish_and_clear();

    stats
        .write(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "  AI samples: {}  Human samples: {}",
        style(stats.samples(CorpusLabel::Ai)).bold(),
        style(stats.samples(CorpusLabel::Human)).bold()
    );

    let profile = BaselineProfile::from_stats(&stats.feature_stats(), config.baseline.top_k);
    let summary = profile.summary();
    if summary.top.is_empty() {
        println!(
            "  {} No feature separates the corpora; detection will use fixed rules.",
            style("⚠").yellow()
        );
    } else {
        println!("\n  Strongest features:");
        for feature in &summary.top {
            println!(
                "    {:<40} effect {:>6.3}  ({} higher)",
                feature.name,
                feature.effect_size,
                if feature.ai_higher { "AI" } else { "human" }
            );
        }
    }

    println!(
        "\n{} Saved to {}\n",
        style("✓").green(),
        style(output.display()).cyan()
    );
    Ok(())
}
