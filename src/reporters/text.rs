//! Text (terminal) reporter with colors and formatting

use super::{AnalysisReport, BaselineReport, FeatureReport};
use codeorigin::baseline::Interpretation;
use codeorigin::Prediction;
use anyhow::Result;

/// Prediction colors (ANSI escape codes)
fn prediction_color(prediction: Prediction) -> &'static str {
    match prediction {
        Prediction::AiGenerated => "\x1b[31m",  // Red
        Prediction::HumanWritten => "\x1b[32m", // Green
        Prediction::Uncertain => "\x1b[33m",    // Yellow
    }
}

fn prediction_tag(prediction: Prediction) -> &'static str {
    match prediction {
        Prediction::AiGenerated => "[AI]",
        Prediction::HumanWritten => "[HU]",
        Prediction::Uncertain => "[??]",
    }
}

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Reasons shown under each file
const REASONS_SHOWN: usize = 3;

/// Render report as formatted terminal output
pub fn render(report: &AnalysisReport) -> Result<String> {
    let mut out = String::new();

    out.push_str(&format!("\n{BOLD}Code Origin Analysis{RESET}\n"));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Strategy: {BOLD}{}{RESET}  Critical features: {}\n\n",
        report.strategy, report.critical_features
    ));

    if report.files.is_empty() {
        out.push_str(&format!("{DIM}No C/C++ files found.{RESET}\n"));
    }

    for file in &report.files {
        let color = prediction_color(file.result.prediction);
        out.push_str(&format!(
            "  {color}{}{RESET}  {:<40}  {BOLD}{}{RESET} {DIM}(confidence {:.2}, score {:.3}){RESET}\n",
            prediction_tag(file.result.prediction),
            shorten(&file.path, 40),
            file.result.prediction,
            file.result.confidence,
            file.result.score
        ));
        for reason in file.result.reasoning.iter().take(REASONS_SHOWN) {
            out.push_str(&format!("        {DIM}- {}{RESET}\n", reason));
        }
    }

    if !report.skipped.is_empty() {
        out.push_str(&format!("\n{BOLD}SKIPPED{RESET}\n"));
        for skipped in &report.skipped {
            out.push_str(&format!(
                "  {DIM}{}: {}{RESET}\n",
                skipped.path, skipped.reason
            ));
        }
    }

    let s = &report.summary;
    out.push_str(&format!(
        "\n{BOLD}SUMMARY{RESET}  {} files: {}{} AI-generated{RESET} | {}{} human-written{RESET} | {}{} uncertain{RESET}\n",
        s.total,
        prediction_color(Prediction::AiGenerated),
        s.ai_generated,
        prediction_color(Prediction::HumanWritten),
        s.human_written,
        prediction_color(Prediction::Uncertain),
        s.uncertain
    ));

    Ok(out)
}

/// Render the grouped feature listing
pub fn render_features(report: &FeatureReport) -> Result<String> {
    let mut out = String::new();
    out.push_str(&format!(
        "\n{BOLD}Features{RESET} {} {DIM}({}){RESET}\n",
        report.path, report.language
    ));

    for group in &report.groups {
        out.push_str(&format!("\n{BOLD}{}{RESET}\n", group.namespace.to_uppercase()));
        for (name, value) in &group.features {
            out.push_str(&format!("  {:<36} {:>12.4}\n", name, value));
        }
    }

    if !report.comparison.is_empty() {
        out.push_str(&format!("\n{BOLD}COMPARISON WITH AI BASELINE{RESET}\n"));
        out.push_str(&format!(
            "{DIM}  FEATURE                                     VALUE    AI MEAN     DIFF%{RESET}\n"
        ));
        for row in &report.comparison {
            let color = match row.interpretation {
                Interpretation::SimilarToAi => "\x1b[31m",
                Interpretation::HigherThanAi | Interpretation::LowerThanAi => "\x1b[32m",
            };
            out.push_str(&format!(
                "  {:<40} {:>9.4} {:>10.4} {:>+9.1}  {color}{}{RESET}\n",
                row.feature, row.value, row.ai_mean, row.difference_percent, row.interpretation
            ));
        }
    }

    Ok(out)
}

/// Render a baseline profile summary
pub fn render_baseline(report: &BaselineReport) -> Result<String> {
    let mut out = String::new();
    out.push_str(&format!("\n{BOLD}Baseline{RESET} {DIM}{}{RESET}\n", report.source));
    out.push_str(&format!(
        "AI features: {}  Human features: {}  Critical: {}\n",
        report.summary.ai_features, report.summary.human_features, report.summary.critical_count
    ));

    if report.critical.is_empty() {
        out.push_str(&format!(
            "\n{DIM}No critical features; detection falls back to fixed rules.{RESET}\n"
        ));
        return Ok(out);
    }

    out.push_str(&format!(
        "\n{DIM}  #   FEATURE                                    AI MEAN  HUMAN MEAN   EFFECT  WEIGHT{RESET}\n"
    ));
    for (i, feature) in report.critical.iter().enumerate() {
        out.push_str(&format!(
            "  {DIM}{:>2}{RESET}  {:<40} {:>9.4} {:>11.4} {:>8.3} {:>7.2}\n",
            i + 1,
            feature.name,
            feature.ai_mean,
            feature.human_mean,
            feature.effect_size,
            feature.weight
        ));
    }
    Ok(out)
}

/// Keep the tail of long paths; counts chars to stay on UTF-8 boundaries.
fn shorten(path: &str, max: usize) -> String {
    let count = path.chars().count();
    if count <= max {
        return path.to_string();
    }
    let skip = count - (max - 3);
    format!("...{}", path.chars().skip(skip).collect::<String>())
}
