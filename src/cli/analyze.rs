//! Analyze command - classify every C/C++ file under a path

use super::files::{collect_source_files, display_path, read_source};
use crate::reporters::{self, AnalysisReport, FileReport, OutputFormat, SkippedFile};
use anyhow::{Context, Result};
use codeorigin::config::CodeoriginConfig;
use codeorigin::{DetectionEngine, FeatureAggregator, SourceUnit, Strategy};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;
use tracing::{debug, info};

/// Files below this count get no progress bar
const PROGRESS_MIN_FILES: usize = 8;

#[allow(clippy::too_many_arguments)]
pub(super) fn run(
    config: &CodeoriginConfig,
    path: &Path,
    format: &str,
    output: Option<&Path>,
    strategy: Option<&str>,
    stats: Option<&Path>,
    include_features: bool,
    fail_on_ai: bool,
) -> Result<()> {
    let start = Instant::now();
    let format = OutputFormat::from_str(format)?;
    let strategy = match strategy {
        Some(s) => Strategy::from_str(s).map_err(anyhow::Error::msg)?,
        None => config.detection.strategy,
    };

    let (stats_path, profile) = super::open_profile(config, stats);
    let engine = DetectionEngine::new(&config.detection).with_strategy(strategy);
    let aggregator = FeatureAggregator::new(&config.analysis);
    debug!(
        "Strategy {} with baseline {} ({} critical features)",
        strategy,
        stats_path.display(),
        profile.critical_features().len()
    );

    let files = collect_source_files(path)?;
    let root = if path.is_dir() { path } else { path.parent().unwrap_or(path) };
    info!("Analyzing {} files under {}", files.len(), path.display());

    let bar = if files.len() >= PROGRESS_MIN_FILES && format == OutputFormat::Text {
        let bar = ProgressBar::new(files.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("valid template")
                .progress_chars("=>-"),
        );
        bar.set_message("Analyzing files...");
        bar
    } else {
        ProgressBar::hidden()
    };

    let outcomes: Vec<Result<FileReport, SkippedFile>> = files
        .par_iter()
        .map(|file| {
            let shown = display_path(root, file);
            let outcome = match read_source(file) {
                Ok(text) => {
                    let unit = SourceUnit::new(text, shown.clone());
                    let features = aggregator.extract(&unit);
                    let result = engine.detect(&features, Some(profile.as_ref()));
                    Ok(FileReport {
                        path: shown,
                        language: unit.language,
                        result,
                        features: include_features.then_some(features),
                    })
                }
                Err(e) => Err(SkippedFile {
                    path: shown,
                    reason: format!("{:#}", e),
                }),
            };
            bar.inc(1);
            outcome
        })
        .collect();
    bar.finish_and_clear();

    let mut reports = Vec::with_capacity(outcomes.len());
    let mut skipped = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(report) => reports.push(report),
            Err(skip) => skipped.push(skip),
        }
    }

    let report = AnalysisReport::new(
        strategy.to_string(),
        profile.critical_features().len(),
        reports,
        skipped,
    );
    let rendered = reporters::report_with_format(&report, format)?;

    match output {
        Some(out_path) => {
            std::fs::write(out_path, &rendered)
                .with_context(|| format!("Failed to write {}", out_path.display()))?;
            info!("Report written to {}", out_path.display());
        }
        None => print!("{}", rendered),
    }

    debug!(
        "Analyzed {} files in {:.2}s",
        report.summary.total,
        start.elapsed().as_secs_f64()
    );

    if fail_on_ai && report.summary.ai_generated > 0 {
        eprintln!(
            "{} file(s) classified as AI-generated",
            report.summary.ai_generated
        );
        std::process::exit(1);
    }
    Ok(())
}
