//! Output reporters for detection results
//!
//! Supports three output formats:
//! - `text` - Terminal output with colors
//! - `json` - One pretty-printed JSON document
//! - `jsonl` - One compact JSON object per file

mod json;
mod text;

use anyhow::{anyhow, Result};
use codeorigin::baseline::{BaselineProfile, CriticalFeature, FeatureComparison, ProfileSummary};
use codeorigin::features::schema;
use codeorigin::models::Language;
use codeorigin::{DetectionResult, FeatureVector};
use serde::Serialize;
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Jsonl,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: text, json, jsonl",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Verdict for one analyzed file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: String,
    pub language: Language,
    pub result: DetectionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<FeatureVector>,
}

/// A file that was found but could not be analyzed.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub ai_generated: usize,
    pub human_written: usize,
    pub uncertain: usize,
}

impl Summary {
    pub fn tally<'a>(results: impl IntoIterator<Item = &'a DetectionResult>) -> Self {
        let mut summary = Summary::default();
        for result in results {
            summary.total += 1;
            if result.is_ai() {
                summary.ai_generated += 1;
            } else if result.is_human() {
                summary.human_written += 1;
            } else {
                summary.uncertain += 1;
            }
        }
        summary
    }
}

/// Everything the `analyze` command produces.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub version: &'static str,
    pub strategy: String,
    /// Critical features in the baseline used, 0 without one
    pub critical_features: usize,
    pub summary: Summary,
    pub files: Vec<FileReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedFile>,
}

impl AnalysisReport {
    pub fn new(
        strategy: impl Into<String>,
        critical_features: usize,
        files: Vec<FileReport>,
        skipped: Vec<SkippedFile>,
    ) -> Self {
        let summary = Summary::tally(files.iter().map(|f| &f.result));
        Self {
            version: env!("CARGO_PKG_VERSION"),
            strategy: strategy.into(),
            critical_features,
            summary,
            files,
            skipped,
        }
    }
}

/// One namespace of a feature listing.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureGroup {
    pub namespace: String,
    pub features: Vec<(String, f64)>,
}

/// Output of the `features` command: grouped values plus, when a baseline
/// is loaded, the comparison against AI means.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureReport {
    pub path: String,
    pub language: Language,
    pub groups: Vec<FeatureGroup>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comparison: Vec<FeatureComparison>,
}

impl FeatureReport {
    pub fn new(
        path: impl Into<String>,
        language: Language,
        features: &FeatureVector,
        comparison: Vec<FeatureComparison>,
    ) -> Self {
        let groups = schema::NAMESPACES
            .iter()
            .map(|ns| FeatureGroup {
                namespace: ns.to_string(),
                features: features
                    .namespace(ns)
                    .map(|(name, value)| (name.to_string(), value))
                    .collect(),
            })
            .filter(|g| !g.features.is_empty())
            .collect();
        Self {
            path: path.into(),
            language,
            groups,
            comparison,
        }
    }
}

/// Output of the `baseline` command.
#[derive(Debug, Clone, Serialize)]
pub struct BaselineReport {
    /// Statistics file the profile was loaded from
    pub source: String,
    pub summary: ProfileSummary,
    pub critical: Vec<CriticalFeature>,
}

impl BaselineReport {
    pub fn new(source: impl Into<String>, profile: &BaselineProfile) -> Self {
        Self {
            source: source.into(),
            summary: profile.summary(),
            critical: profile.critical_features().to_vec(),
        }
    }
}

/// Render an analysis report using an OutputFormat enum
pub fn report_with_format(report: &AnalysisReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(report),
        OutputFormat::Json => json::render(report),
        OutputFormat::Jsonl => json::render_lines(report),
    }
}

pub fn features_with_format(report: &FeatureReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render_features(report),
        OutputFormat::Json => json::render(report),
        OutputFormat::Jsonl => json::render_compact(report),
    }
}

pub fn baseline_with_format(report: &BaselineReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render_baseline(report),
        OutputFormat::Json => json::render(report),
        OutputFormat::Jsonl => json::render_compact(report),
    }
}
