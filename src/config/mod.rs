//! Configuration for codeorigin
//!
//! Settings live in `codeorigin.toml`:
//! - `[analysis]` which analyzers run and the copy-paste scan guard
//! - `[detection]` strategy choice, thresholds and blend weights
//! - `[baseline]` where the statistics file lives and how it is ranked
//! - `[human_style]` sub-score weights for the overall human score
//!
//! Every field has a default, so a partial file (or none at all) is valid.

use crate::analyzers::{AnalyzerKind, HumanStyleWeights};
use crate::baseline::DEFAULT_TOP_K;
use crate::detection::Strategy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const CONFIG_FILENAME: &str = "codeorigin.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeoriginConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub detection: DetectionConfig,

    #[serde(default)]
    pub baseline: BaselineConfig,

    #[serde(default)]
    pub human_style: HumanStyleWeights,
}

/// Feature extraction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Above this many code lines the copy-paste scan switches to the
    /// linear repeated-window estimate
    #[serde(default = "default_max_copy_paste_lines")]
    pub max_copy_paste_lines: usize,

    /// Analyzers to leave out of the feature vector
    #[serde(default)]
    pub disabled_analyzers: Vec<AnalyzerKind>,

    /// Run analyzers of a single file concurrently
    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Copied from the top-level `[human_style]` table on load
    #[serde(skip)]
    pub human_style: HumanStyleWeights,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_copy_paste_lines: default_max_copy_paste_lines(),
            disabled_analyzers: Vec::new(),
            parallel: true,
            human_style: HumanStyleWeights::default(),
        }
    }
}

fn default_max_copy_paste_lines() -> usize {
    crate::analyzers::DEFAULT_MAX_SCAN_LINES
}

fn default_true() -> bool {
    true
}

/// Detection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// auto, heuristic or baseline
    #[serde(default)]
    pub strategy: Strategy,

    /// Reasoning lines per result (clamped into 5..=8)
    #[serde(default = "default_max_reasons")]
    pub max_reasons: usize,

    #[serde(default = "Thresholds::heuristic")]
    pub heuristic: Thresholds,

    #[serde(default)]
    pub baseline: BaselineDetectionConfig,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            max_reasons: default_max_reasons(),
            heuristic: Thresholds::heuristic(),
            baseline: BaselineDetectionConfig::default(),
        }
    }
}

pub const MIN_REASONS: usize = 5;
pub const MAX_REASONS: usize = 8;

fn default_max_reasons() -> usize {
    6
}

impl DetectionConfig {
    pub fn effective_max_reasons(&self) -> usize {
        self.max_reasons.clamp(MIN_REASONS, MAX_REASONS)
    }
}

/// Decision thresholds. A score strictly above `ai` is AI-generated,
/// strictly below `human` is human-written.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub ai: f64,
    pub human: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::heuristic()
    }
}

impl Thresholds {
    pub fn heuristic() -> Self {
        Self { ai: 0.60, human: 0.40 }
    }

    pub fn baseline_aware() -> Self {
        Self { ai: 0.65, human: 0.35 }
    }

    /// Falls back to `default` when the pair is unusable.
    fn sanitized(self, default: Self) -> Self {
        let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if in_unit(self.ai) && in_unit(self.human) && self.human <= self.ai {
            self
        } else {
            warn!(
                "Invalid thresholds ai={} human={}, using ai={} human={}",
                self.ai, self.human, default.ai, default.human
            );
            default
        }
    }
}

/// Baseline-aware strategy settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineDetectionConfig {
    #[serde(default = "default_baseline_ai")]
    pub ai: f64,

    #[serde(default = "default_baseline_human")]
    pub human: f64,

    #[serde(default)]
    pub blend: BlendWeights,
}

impl Default for BaselineDetectionConfig {
    fn default() -> Self {
        let t = Thresholds::baseline_aware();
        Self {
            ai: t.ai,
            human: t.human,
            blend: BlendWeights::default(),
        }
    }
}

fn default_baseline_ai() -> f64 {
    Thresholds::baseline_aware().ai
}
fn default_baseline_human() -> f64 {
    Thresholds::baseline_aware().human
}

impl BaselineDetectionConfig {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            ai: self.ai,
            human: self.human,
        }
    }
}

/// How the baseline-aware score mixes its four signals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendWeights {
    /// Weight for critical-feature similarity (default: 0.6)
    #[serde(default = "default_blend_baseline")]
    pub baseline: f64,

    /// Weight for polished formatting (default: 0.2)
    #[serde(default = "default_blend_perfection")]
    pub perfection: f64,

    /// Weight for low complexity (default: 0.1)
    #[serde(default = "default_blend_simplicity")]
    pub simplicity: f64,

    /// Weight for inverted human chaos (default: 0.1)
    #[serde(default = "default_blend_chaos")]
    pub chaos: f64,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            baseline: default_blend_baseline(),
            perfection: default_blend_perfection(),
            simplicity: default_blend_simplicity(),
            chaos: default_blend_chaos(),
        }
    }
}

fn default_blend_baseline() -> f64 {
    0.6
}
fn default_blend_perfection() -> f64 {
    0.2
}
fn default_blend_simplicity() -> f64 {
    0.1
}
fn default_blend_chaos() -> f64 {
    0.1
}

impl BlendWeights {
    fn sum(&self) -> f64 {
        self.baseline + self.perfection + self.simplicity + self.chaos
    }

    /// Validate that weights sum to 1.0 (with tolerance)
    pub fn is_valid(&self) -> bool {
        let parts = [self.baseline, self.perfection, self.simplicity, self.chaos];
        parts.iter().all(|w| *w >= 0.0) && (self.sum() - 1.0).abs() < 0.001
    }

    /// Normalize weights to sum to 1.0. Negative or non-finite weights
    /// reset the whole set to defaults.
    pub fn normalize(&mut self) {
        let parts = [self.baseline, self.perfection, self.simplicity, self.chaos];
        if parts.iter().any(|w| !w.is_finite() || *w < 0.0) || self.sum() <= 0.0 {
            warn!("Invalid blend weights {:?}, using defaults", self);
            *self = Self::default();
            return;
        }
        let sum = self.sum();
        self.baseline /= sum;
        self.perfection /= sum;
        self.simplicity /= sum;
        self.chaos /= sum;
    }
}

/// What to use when no statistics file is available
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineFallback {
    /// No critical features; auto strategy falls back to heuristics
    #[default]
    Empty,
    /// The built-in reference profile
    Reference,
}

/// Baseline statistics settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineConfig {
    /// Flat statistics JSON (`<feature>_ai_mean` / `<feature>_human_mean`)
    #[serde(default)]
    pub stats_path: Option<PathBuf>,

    /// Number of critical features kept after ranking
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    #[serde(default)]
    pub fallback: BaselineFallback,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            stats_path: None,
            top_k: DEFAULT_TOP_K,
            fallback: BaselineFallback::default(),
        }
    }
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

impl CodeoriginConfig {
    /// Parse a TOML document and apply normalization.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: CodeoriginConfig = toml::from_str(content)?;
        Ok(config.finalize())
    }

    /// Normalize weights, repair thresholds and share the human-style
    /// weights with the analysis section.
    fn finalize(mut self) -> Self {
        self.analysis.human_style = self.human_style;
        self.detection.heuristic = self.detection.heuristic.sanitized(Thresholds::heuristic());
        let baseline = self
            .detection
            .baseline
            .thresholds()
            .sanitized(Thresholds::baseline_aware());
        self.detection.baseline.ai = baseline.ai;
        self.detection.baseline.human = baseline.human;
        if !self.detection.baseline.blend.is_valid() {
            self.detection.baseline.blend.normalize();
        }
        if self.baseline.top_k == 0 {
            warn!("baseline.top_k must be at least 1, using {}", DEFAULT_TOP_K);
            self.baseline.top_k = DEFAULT_TOP_K;
        }
        self
    }

    /// Statistics file to load: explicit override, then config, then the
    /// `CODEORIGIN_BASELINE` environment variable, then `feature_stats.json`.
    pub fn stats_path(&self, explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.baseline.stats_path.clone())
            .unwrap_or_else(crate::baseline::default_stats_path)
    }
}

/// Path of the per-user config file, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("codeorigin").join("config.toml"))
}

/// Load configuration.
///
/// Searches in this order:
/// 1. the explicit path, if given
/// 2. `codeorigin.toml` in `dir`
/// 3. the per-user config file
///
/// A file that cannot be read or parsed is logged and skipped. Returns the
/// default configuration if nothing loads.
pub fn load_config(dir: &Path, explicit: Option<&Path>) -> CodeoriginConfig {
    let mut candidates: Vec<PathBuf> = Vec::new();
    match explicit {
        Some(path) => candidates.push(path.to_path_buf()),
        None => {
            candidates.push(dir.join(CONFIG_FILENAME));
            if let Some(user) = user_config_path() {
                candidates.push(user);
            }
        }
    }

    for path in &candidates {
        if !path.exists() {
            if explicit.is_some() {
                warn!("Config file {} does not exist, using defaults", path.display());
            }
            continue;
        }
        match load_toml_config(path) {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", path.display(), e);
            }
        }
    }

    debug!("No config found, using defaults");
    CodeoriginConfig::default().finalize()
}

fn load_toml_config(path: &Path) -> anyhow::Result<CodeoriginConfig> {
    let content = std::fs::read_to_string(path)?;
    CodeoriginConfig::from_toml_str(&content)
}

/// Commented default file written by `codeorigin init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# codeorigin configuration

[analysis]
# Code lines above which the copy-paste scan uses the linear estimate
max_copy_paste_lines = 5000

# Analyzers to skip: structural, redundancy, naming, complexity, ai_pattern, human_style
disabled_analyzers = []

# Run the analyzers of one file concurrently
parallel = true

[detection]
# auto (baseline-aware when statistics are available), heuristic, baseline
strategy = "auto"

# Reasoning lines per result (5-8)
max_reasons = 6

[detection.heuristic]
ai = 0.60
human = 0.40

[detection.baseline]
ai = 0.65
human = 0.35

[detection.baseline.blend]
baseline = 0.6
perfection = 0.2
simplicity = 0.1
chaos = 0.1

[baseline]
# stats_path = "feature_stats.json"
top_k = 15

# Used when the statistics file is missing: empty or reference
fallback = "empty"

[human_style]
spacing = 0.30
indentation = 0.30
naming = 0.25
formatting = 0.15
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CodeoriginConfig::default();
        assert_eq!(config.analysis.max_copy_paste_lines, 5000);
        assert!(config.analysis.parallel);
        assert_eq!(config.detection.strategy, Strategy::Auto);
        assert_eq!(config.detection.effective_max_reasons(), 6);
        assert_eq!(config.detection.heuristic, Thresholds::heuristic());
        assert!(config.detection.baseline.blend.is_valid());
        assert_eq!(config.baseline.top_k, 15);
        assert_eq!(config.baseline.fallback, BaselineFallback::Empty);
    }

    #[test]
    fn test_default_file_parses_to_defaults() {
        let config = CodeoriginConfig::from_toml_str(DEFAULT_CONFIG_TOML).unwrap();
        assert_eq!(config, CodeoriginConfig::default().finalize());
    }

    #[test]
    fn test_partial_config() {
        let config = CodeoriginConfig::from_toml_str(
            r#"
[analysis]
disabled_analyzers = ["human_style"]

[detection]
strategy = "heuristic"
max_reasons = 20

[baseline]
fallback = "reference"

[human_style]
spacing = 0.5
"#,
        )
        .unwrap();
        assert_eq!(config.analysis.disabled_analyzers, vec![AnalyzerKind::HumanStyle]);
        assert_eq!(config.detection.strategy, Strategy::Heuristic);
        assert_eq!(config.detection.effective_max_reasons(), 8);
        assert_eq!(config.baseline.fallback, BaselineFallback::Reference);
        assert_eq!(config.analysis.human_style.spacing, 0.5);
        assert_eq!(config.analysis.human_style.indentation, 0.30);
    }

    #[test]
    fn test_blend_weights_are_normalized() {
        let config = CodeoriginConfig::from_toml_str(
            "[detection.baseline.blend]\nbaseline = 2.0\nperfection = 1.0\nsimplicity = 0.5\nchaos = 0.5\n",
        )
        .unwrap();
        let blend = config.detection.baseline.blend;
        assert!(blend.is_valid());
        assert!((blend.baseline - 0.5).abs() < 1e-12);
        assert!((blend.perfection - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_negative_blend_resets() {
        let mut blend = BlendWeights {
            baseline: -1.0,
            ..Default::default()
        };
        blend.normalize();
        assert_eq!(blend, BlendWeights::default());
    }

    #[test]
    fn test_inverted_thresholds_reset() {
        let config =
            CodeoriginConfig::from_toml_str("[detection.heuristic]\nai = 0.3\nhuman = 0.7\n").unwrap();
        assert_eq!(config.detection.heuristic, Thresholds::heuristic());
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join(CONFIG_FILENAME)).unwrap();
        writeln!(file, "[baseline]\ntop_k = 7").unwrap();
        let config = load_config(dir.path(), None);
        assert_eq!(config.baseline.top_k, 7);
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[analysis\nparallel = ").unwrap();
        let config = load_config(dir.path(), Some(&path));
        assert_eq!(config, CodeoriginConfig::default().finalize());
    }

    #[test]
    fn test_stats_path_precedence() {
        let mut config = CodeoriginConfig::default();
        config.baseline.stats_path = Some(PathBuf::from("from_config.json"));
        assert_eq!(
            config.stats_path(Some(Path::new("explicit.json"))),
            PathBuf::from("explicit.json")
        );
        assert_eq!(config.stats_path(None), PathBuf::from("from_config.json"));
    }
}
