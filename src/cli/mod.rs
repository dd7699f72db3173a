//! CLI command definitions and handlers

mod analyze;
mod baseline;
mod calibrate;
mod features;
mod files;
mod init;

use anyhow::Result;
use clap::{Parser, Subcommand};
use codeorigin::config::{load_config, CodeoriginConfig};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// codeorigin - tell AI-generated C/C++ from human-written code
#[derive(Parser, Debug)]
#[command(name = "codeorigin")]
#[command(
    version,
    about = "Estimate whether C/C++ source files were AI-generated or human-written",
    long_about = "codeorigin extracts stylistic, structural, naming and complexity features \
from C and C++ source files and scores them, either with fixed rules or against \
AI/human baseline statistics built by `codeorigin calibrate`.\n\n\
Everything runs locally. No source leaves your machine.",
    after_help = "\
Examples:
  codeorigin analyze src/                      Analyze every C/C++ file under src/
  codeorigin analyze . --format json           JSON output for scripting
  codeorigin features main.c                   Show all extracted features
  codeorigin calibrate --ai gen/ --human hand/ Build feature_stats.json
  codeorigin baseline                          Show the critical features"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Config file (default: ./codeorigin.toml, then the user config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of parallel workers (1-64, default: all cores)
    #[arg(long, global = true, value_parser = parse_workers)]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a codeorigin.toml with the default settings
    Init {
        /// Directory to initialize
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Classify files as AI-generated, human-written or uncertain
    #[command(after_help = "\
Examples:
  codeorigin analyze .                             Analyze current directory
  codeorigin analyze main.c --strategy heuristic   Ignore any baseline
  codeorigin analyze . --stats corpus.json         Use a specific baseline
  codeorigin analyze . --format jsonl --features   One JSON line per file, with features
  codeorigin analyze . --fail-on-ai                Exit code 1 if any file looks AI-generated")]
    Analyze {
        /// File or directory to analyze
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format: text, json, jsonl
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json", "jsonl"])]
        format: String,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Detection strategy (default: from config, else auto)
        #[arg(long, value_parser = ["auto", "heuristic", "baseline"])]
        strategy: Option<String>,

        /// Baseline statistics file
        #[arg(long)]
        stats: Option<PathBuf>,

        /// Include the feature vector of every file
        #[arg(long)]
        features: bool,

        /// Exit with code 1 if any file is classified AI-generated
        #[arg(long)]
        fail_on_ai: bool,
    },

    /// Show every extracted feature of one file
    Features {
        /// Source file
        file: PathBuf,

        /// Output format: text, json, jsonl
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json", "jsonl"])]
        format: String,

        /// Baseline statistics file to compare against
        #[arg(long)]
        stats: Option<PathBuf>,
    },

    /// Build baseline statistics from labeled AI and human corpora
    #[command(after_help = "\
Examples:
  codeorigin calibrate --ai corpus/ai --human corpus/human
  codeorigin calibrate --ai gen/ --human hand/ -o stats/feature_stats.json")]
    Calibrate {
        /// Directory of AI-generated files
        #[arg(long)]
        ai: PathBuf,

        /// Directory of human-written files
        #[arg(long)]
        human: PathBuf,

        /// Where to write the statistics
        #[arg(long, short = 'o', default_value = codeorigin::baseline::DEFAULT_STATS_FILENAME)]
        output: PathBuf,
    },

    /// Show the critical features of a baseline
    Baseline {
        /// Baseline statistics file
        #[arg(long)]
        stats: Option<PathBuf>,

        /// Output format: text, json, jsonl
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json", "jsonl"])]
        format: String,
    },
}

/// Run the CLI
pub fn run(cli: Cli) -> Result<()> {
    if let Some(workers) = cli.workers {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build_global()
        {
            warn!("Could not size worker pool: {}", e);
        }
    }

    let config = load_config(Path::new("."), cli.config.as_deref());

    match cli.command {
        Commands::Init { path } => init::run(&path),

        Commands::Analyze {
            path,
            format,
            output,
            strategy,
            stats,
            features,
            fail_on_ai,
        } => analyze::run(
            &config,
            &path,
            &format,
            output.as_deref(),
            strategy.as_deref(),
            stats.as_deref(),
            features,
            fail_on_ai,
        ),

        Commands::Features {
            file,
            format,
            stats,
        } => features::run(&config, &file, &format, stats.as_deref()),

        Commands::Calibrate { ai, human, output } => calibrate::run(&config, &ai, &human, &output),

        Commands::Baseline { stats, format } => baseline::run(&config, stats.as_deref(), &format),
    }
}

/// Load the baseline profile the config and an optional `--stats` point at.
fn open_profile(
    config: &CodeoriginConfig,
    stats: Option<&Path>,
) -> (PathBuf, std::sync::Arc<codeorigin::BaselineProfile>) {
    let path = config.stats_path(stats);
    let store = codeorigin::BaselineProfileStore::open(
        &path,
        config.baseline.top_k,
        config.baseline.fallback,
    );
    (path, store.snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_workers_bounds() {
        assert_eq!(parse_workers("1"), Ok(1));
        assert_eq!(parse_workers("64"), Ok(64));
        assert!(parse_workers("0").is_err());
        assert!(parse_workers("65").is_err());
        assert!(parse_workers("four").is_err());
    }

    #[test]
    fn test_cli_parses_analyze() {
        let cli = Cli::try_parse_from([
            "codeorigin",
            "analyze",
            "src",
            "--format",
            "json",
            "--strategy",
            "heuristic",
            "--workers",
            "2",
        ])
        .unwrap();
        assert_eq!(cli.workers, Some(2));
        match cli.command {
            Commands::Analyze {
                path,
                format,
                strategy,
                ..
            } => {
                assert_eq!(path, PathBuf::from("src"));
                assert_eq!(format, "json");
                assert_eq!(strategy.as_deref(), Some("heuristic"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["codeorigin", "analyze", "--format", "sarif"]).is_err());
    }

    #[test]
    fn test_cli_calibrate_requires_both_corpora() {
        assert!(Cli::try_parse_from(["codeorigin", "calibrate", "--ai", "a"]).is_err());
        assert!(Cli::try_parse_from(["codeorigin", "calibrate", "--ai", "a", "--human", "h"]).is_ok());
    }
}
