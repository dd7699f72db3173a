//! AI vs human decision
//!
//! Two strategies share one contract, [`Detector::detect`]:
//!
//! | Strategy | Needs a profile | Thresholds (ai / human) |
//! |----------|-----------------|-------------------------|
//! | [`HeuristicDetector`] | no | 0.60 / 0.40 |
//! | [`BaselineAwareDetector`] | yes | 0.65 / 0.35 |
//!
//! Both report signed contributions around a 0.5 baseline, so
//! `0.5 + sum(contributions)` is the score before clamping. The decision,
//! confidence and reasoning are derived from that in one place.

mod baseline_aware;
mod heuristic;

pub use baseline_aware::{BaselineAwareDetector, Indicator, SubScores};
pub use heuristic::{Direction, HeuristicDetector, Rule, AI_RULES, HUMAN_RULES};

use crate::baseline::BaselineProfile;
use crate::config::{DetectionConfig, Thresholds};
use crate::features::FeatureVector;
use crate::models::{DetectionMethod, DetectionResult, Prediction};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Confidence reported for an Uncertain verdict with usable input
const UNCERTAIN_CONFIDENCE: f64 = 0.5;

pub const INSUFFICIENT_SIGNAL: &str = "Insufficient signal: no lines of code to analyze";

/// A detection strategy.
pub trait Detector: Send + Sync {
    fn method(&self) -> DetectionMethod;

    /// Never panics; every well-formed vector yields a result.
    fn detect(&self, features: &FeatureVector, profile: Option<&BaselineProfile>)
        -> DetectionResult;
}

/// Which strategy to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Baseline-aware when a non-empty profile is available
    #[default]
    Auto,
    Heuristic,
    Baseline,
}

impl Strategy {
    pub fn resolve(self, profile: Option<&BaselineProfile>) -> DetectionMethod {
        match self {
            Strategy::Heuristic => DetectionMethod::HeuristicWeighted,
            Strategy::Baseline => DetectionMethod::BaselineAware,
            Strategy::Auto => match profile {
                Some(p) if !p.is_empty() => DetectionMethod::BaselineAware,
                _ => DetectionMethod::HeuristicWeighted,
            },
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Strategy::Auto),
            "heuristic" => Ok(Strategy::Heuristic),
            "baseline" | "baseline-aware" => Ok(Strategy::Baseline),
            _ => Err(format!(
                "Unknown strategy '{}'. Valid strategies: auto, heuristic, baseline",
                s
            )),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Auto => write!(f, "auto"),
            Strategy::Heuristic => write!(f, "heuristic"),
            Strategy::Baseline => write!(f, "baseline"),
        }
    }
}

/// Both strategies plus the rule for choosing between them.
#[derive(Debug, Clone)]
pub struct DetectionEngine {
    strategy: Strategy,
    heuristic: HeuristicDetector,
    baseline: BaselineAwareDetector,
}

impl Default for DetectionEngine {
    fn default() -> Self {
        Self::new(&DetectionConfig::default())
    }
}

impl DetectionEngine {
    pub fn new(config: &DetectionConfig) -> Self {
        let max_reasons = config.effective_max_reasons();
        Self {
            strategy: config.strategy,
            heuristic: HeuristicDetector::new(config.heuristic, max_reasons),
            baseline: BaselineAwareDetector::new(
                config.baseline.thresholds(),
                config.baseline.blend,
                max_reasons,
            ),
        }
    }

    /// Force a strategy regardless of configuration.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn detect(
        &self,
        features: &FeatureVector,
        profile: Option<&BaselineProfile>,
    ) -> DetectionResult {
        match self.strategy.resolve(profile) {
            DetectionMethod::HeuristicWeighted => self.heuristic.detect(features, profile),
            DetectionMethod::BaselineAware => self.baseline.detect(features, profile),
        }
    }
}

/// One signed term of a score, with its human-readable label.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Contribution {
    pub key: String,
    pub description: String,
    pub value: f64,
}

/// The result for input with nothing to measure: an empty vector or zero LOC.
pub(crate) fn insufficient_signal(
    features: &FeatureVector,
    method: DetectionMethod,
) -> Option<DetectionResult> {
    let no_code = features.get("basic.loc").is_some_and(|loc| loc <= 0.0);
    if !features.is_empty() && !no_code {
        return None;
    }
    Some(DetectionResult {
        prediction: Prediction::Uncertain,
        confidence: 0.0,
        score: 0.5,
        reasoning: vec![INSUFFICIENT_SIGNAL.to_string()],
        contributions: BTreeMap::new(),
        method,
    })
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Strict comparison against both thresholds.
pub fn decide(score: f64, thresholds: Thresholds) -> (Prediction, f64) {
    if score > thresholds.ai {
        (Prediction::AiGenerated, round3(score))
    } else if score < thresholds.human {
        (Prediction::HumanWritten, round3(1.0 - score))
    } else {
        (Prediction::Uncertain, UNCERTAIN_CONFIDENCE)
    }
}

/// Turn contributions into a result: sum onto 0.5, clamp, decide, and
/// list the strongest terms first.
pub(crate) fn assemble(
    contributions: Vec<Contribution>,
    thresholds: Thresholds,
    max_reasons: usize,
    method: DetectionMethod,
) -> DetectionResult {
    let raw: f64 = 0.5 + contributions.iter().map(|c| c.value).sum::<f64>();
    let score = if raw.is_finite() { raw.clamp(0.0, 1.0) } else { 0.5 };
    let (prediction, confidence) = decide(score, thresholds);

    let mut ranked: Vec<&Contribution> = contributions.iter().filter(|c| c.value != 0.0).collect();
    ranked.sort_by(|a, b| {
        b.value
            .abs()
            .partial_cmp(&a.value.abs())
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.key.cmp(&b.key))
    });
    let reasoning = ranked
        .iter()
        .take(max_reasons)
        .map(|c| format!("{} ({:+.3})", c.description, c.value))
        .collect();

    DetectionResult {
        prediction,
        confidence,
        score,
        reasoning,
        contributions: contributions.into_iter().map(|c| (c.key, c.value)).collect(),
        method,
    }
}
