//! Scoring against measured AI and human means
//!
//! Each critical feature votes by which mean the observed value is closer
//! to, weighted by its rank. Three secondary signals are blended in:
//! perfection (polished formatting), simplicity (low complexity) and human
//! chaos (sloppy naming and spacing), the last one inverted.

use super::{assemble, insufficient_signal, Contribution, Detector};
use crate::baseline::{BaselineProfile, CriticalFeature};
use crate::config::{BlendWeights, Thresholds};
use crate::features::{schema, FeatureVector};
use crate::models::{DetectionMethod, DetectionResult};

/// Score given to a signal with nothing to measure
const NEUTRAL: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Cmp {
    AtLeast,
    AtMost,
}

/// A tiered check on one feature: the first tier whose bound is met gives
/// the score, otherwise 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Indicator {
    pub feature: &'static str,
    cmp: Cmp,
    tiers: [(f64, f64); 2],
    /// Only counted when this feature is present and positive
    requires: Option<&'static str>,
}

const fn at_least(feature: &'static str, tiers: [(f64, f64); 2]) -> Indicator {
    Indicator {
        feature,
        cmp: Cmp::AtLeast,
        tiers,
        requires: None,
    }
}

const fn at_most(feature: &'static str, tiers: [(f64, f64); 2]) -> Indicator {
    Indicator {
        feature,
        cmp: Cmp::AtMost,
        tiers,
        requires: None,
    }
}

const PERFECTION: &[Indicator] = &[
    at_least("ast.indentation_consistency", [(0.99, 1.0), (0.95, 0.7)]),
    at_most("human_style.spacing_issues_ratio", [(0.1, 1.0), (0.5, 0.6)]),
    at_most("human_style.naming_inconsistency_ratio", [(0.2, 1.0), (0.8, 0.6)]),
    at_least("ast.variable_uniqueness_ratio", [(0.95, 1.0), (0.8, 0.6)]),
];

const SIMPLICITY: &[Indicator] = &[
    at_most("basic.cyclomatic_complexity", [(2.0, 1.0), (4.0, 0.6)]),
    at_most("ast.if_statements_per_loc", [(0.02, 1.0), (0.04, 0.6)]),
    at_most("ast.for_loops_per_loc", [(0.02, 1.0), (0.04, 0.6)]),
    at_least("complexity.maintainability_index", [(100.0, 1.0), (80.0, 0.6)]),
];

const CHAOS: &[Indicator] = &[
    at_least("naming.generic_var_ratio", [(0.4, 1.0), (0.2, 0.6)]),
    Indicator {
        feature: "ast.avg_variable_name_length",
        cmp: Cmp::AtMost,
        tiers: [(2.5, 1.0), (3.5, 0.6)],
        requires: Some("ast.variable_count"),
    },
    at_least("human_style.spacing_issues_ratio", [(1.0, 1.0), (0.5, 0.6)]),
    at_least("ast.single_char_vars_ratio", [(0.3, 1.0), (0.15, 0.6)]),
];

impl Indicator {
    pub fn score(&self, features: &FeatureVector) -> Option<f64> {
        if let Some(required) = self.requires {
            if features.get(required).unwrap_or(0.0) <= 0.0 {
                return None;
            }
        }
        let value = features.get(self.feature)?;
        let met = |bound: f64| match self.cmp {
            Cmp::AtLeast => value >= bound,
            Cmp::AtMost => value <= bound,
        };
        Some(
            self.tiers
                .iter()
                .find(|(bound, _)| met(*bound))
                .map(|(_, score)| *score)
                .unwrap_or(0.0),
        )
    }
}

/// Mean of the available indicators, neutral when none apply.
fn mean_score(indicators: &[Indicator], features: &FeatureVector) -> f64 {
    let scores: Vec<f64> = indicators.iter().filter_map(|i| i.score(features)).collect();
    if scores.is_empty() {
        NEUTRAL
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

/// The three secondary signals, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScores {
    pub perfection: f64,
    pub simplicity: f64,
    pub chaos: f64,
}

impl SubScores {
    pub fn measure(features: &FeatureVector) -> Self {
        Self {
            perfection: mean_score(PERFECTION, features),
            simplicity: mean_score(SIMPLICITY, features),
            chaos: mean_score(CHAOS, features),
        }
    }
}

/// AI-likeness of one value against one critical feature.
///
/// Distances to both means are measured in units of the gap between them.
/// Closer to the AI mean scores `0.5 + 0.5 * similarity`, closer to the
/// human mean `0.5 - 0.5 * similarity`, equidistant 0.5.
pub fn feature_score(critical: &CriticalFeature, value: f64) -> f64 {
    let spread = critical.spread();
    if spread <= 0.0 {
        return NEUTRAL;
    }
    let to_ai = (value - critical.ai_mean).abs() / spread;
    let to_human = (value - critical.human_mean).abs() / spread;
    if to_ai < to_human {
        NEUTRAL + 0.5 * (1.0 - to_ai).clamp(0.0, 1.0)
    } else if to_human < to_ai {
        NEUTRAL - 0.5 * (1.0 - to_human).clamp(0.0, 1.0)
    } else {
        NEUTRAL
    }
}

#[derive(Debug, Clone)]
pub struct BaselineAwareDetector {
    thresholds: Thresholds,
    blend: BlendWeights,
    max_reasons: usize,
}

impl Default for BaselineAwareDetector {
    fn default() -> Self {
        Self::new(Thresholds::baseline_aware(), BlendWeights::default(), 6)
    }
}

impl BaselineAwareDetector {
    pub fn new(thresholds: Thresholds, mut blend: BlendWeights, max_reasons: usize) -> Self {
        if !blend.is_valid() {
            blend.normalize();
        }
        Self {
            thresholds,
            blend,
            max_reasons,
        }
    }

    fn critical_contributions(
        &self,
        features: &FeatureVector,
        profile: &BaselineProfile,
    ) -> Vec<Contribution> {
        let present: Vec<(&CriticalFeature, f64)> = profile
            .critical_features()
            .iter()
            .filter_map(|c| features.get(c.name).map(|v| (c, v)))
            .collect();
        let total_weight: f64 = present.iter().map(|(c, _)| c.weight).sum();
        if total_weight <= 0.0 {
            return Vec::new();
        }

        present
            .into_iter()
            .map(|(critical, value)| {
                let score = feature_score(critical, value);
                let leaning = if score >= NEUTRAL { "AI" } else { "human" };
                let label = schema::lookup(critical.name)
                    .map(|s| s.description)
                    .unwrap_or(critical.name);
                Contribution {
                    key: critical.name.to_string(),
                    description: format!("{label} near {leaning} baseline"),
                    value: self.blend.baseline * critical.weight / total_weight * (score - NEUTRAL),
                }
            })
            .collect()
    }
}

impl Detector for BaselineAwareDetector {
    fn method(&self) -> DetectionMethod {
        DetectionMethod::BaselineAware
    }

    /// Without a profile (or with an empty one) only the secondary signals
    /// move the score.
    fn detect(&self, features: &FeatureVector, profile: Option<&BaselineProfile>) -> DetectionResult {
        if let Some(result) = insufficient_signal(features, self.method()) {
            return result;
        }

        let mut contributions = profile
            .map(|p| self.critical_contributions(features, p))
            .unwrap_or_default();

        let sub = SubScores::measure(features);
        contributions.extend([
            Contribution {
                key: "perfection".into(),
                description: "Polished formatting and naming".into(),
                value: self.blend.perfection * (sub.perfection - NEUTRAL),
            },
            Contribution {
                key: "simplicity".into(),
                description: "Simple control flow".into(),
                value: self.blend.simplicity * (sub.simplicity - NEUTRAL),
            },
            Contribution {
                key: "chaos".into(),
                description: "Absence of human irregularity".into(),
                value: self.blend.chaos * ((1.0 - sub.chaos) - NEUTRAL),
            },
        ]);

        assemble(contributions, self.thresholds, self.max_reasons, self.method())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Prediction;

    fn vector(pairs: &[(&str, f64)]) -> FeatureVector {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    /// Every critical feature at its AI mean, plus `extra`.
    fn at_ai_means(profile: &BaselineProfile, extra: &[(&str, f64)]) -> FeatureVector {
        let mut fv: FeatureVector = profile
            .critical_features()
            .iter()
            .map(|c| (c.name, c.ai_mean))
            .collect();
        fv.insert("basic.loc", 30.0);
        for (k, v) in extra {
            fv.insert(*k, *v);
        }
        fv
    }

    #[test]
    fn test_feature_score_sides() {
        let profile = BaselineProfile::from_means(&[("basic.comment_ratio", 0.2, 0.0)], 15);
        let c = &profile.critical_features()[0];
        assert_eq!(feature_score(c, 0.2), 1.0);
        assert_eq!(feature_score(c, 0.0), 0.0);
        assert_eq!(feature_score(c, 0.1), 0.5);
        // a quarter of the gap from the AI mean
        assert!((feature_score(c, 0.15) - 0.875).abs() < 1e-9);
        // far beyond the AI mean still leans AI, with no similarity left
        assert_eq!(feature_score(c, 5.0), 0.5);
    }

    #[test]
    fn test_indicator_tiers() {
        let fv = vector(&[("ast.indentation_consistency", 0.96)]);
        assert_eq!(PERFECTION[0].score(&fv), Some(0.7));
        assert_eq!(PERFECTION[1].score(&fv), None);
        let fv = vector(&[("basic.cyclomatic_complexity", 9.0)]);
        assert_eq!(SIMPLICITY[0].score(&fv), Some(0.0));
    }

    #[test]
    fn test_variable_length_needs_variables() {
        let without = vector(&[("ast.avg_variable_name_length", 0.0)]);
        assert_eq!(CHAOS[1].score(&without), None);
        let with = vector(&[("ast.avg_variable_name_length", 2.0), ("ast.variable_count", 4.0)]);
        assert_eq!(CHAOS[1].score(&with), Some(1.0));
    }

    #[test]
    fn test_empty_sub_scores_are_neutral() {
        let sub = SubScores::measure(&vector(&[("basic.loc", 5.0)]));
        assert_eq!(sub, SubScores { perfection: 0.5, simplicity: 0.5, chaos: 0.5 });
    }

    #[test]
    fn test_ai_means_score_at_least_half() {
        let profile = BaselineProfile::reference();
        // worst case secondary signals
        let fv = at_ai_means(
            &profile,
            &[
                ("human_style.spacing_issues_ratio", 5.0),
                ("human_style.naming_inconsistency_ratio", 5.0),
                ("ast.variable_uniqueness_ratio", 0.0),
                ("ast.for_loops_per_loc", 1.0),
                ("complexity.maintainability_index", 0.0),
                ("ast.single_char_vars_ratio", 1.0),
            ],
        );
        let result = BaselineAwareDetector::default().detect(&fv, Some(&profile));
        assert!(result.score >= 0.5, "score {}", result.score);
    }

    #[test]
    fn test_maximized_signals_reach_one() {
        let profile = BaselineProfile::reference();
        let fv = at_ai_means(
            &profile,
            &[
                ("human_style.spacing_issues_ratio", 0.0),
                ("human_style.naming_inconsistency_ratio", 0.0),
                ("ast.variable_uniqueness_ratio", 1.0),
                ("ast.for_loops_per_loc", 0.0),
                ("complexity.maintainability_index", 120.0),
                ("ast.single_char_vars_ratio", 0.0),
                ("ast.avg_variable_name_length", 9.0),
                ("ast.variable_count", 5.0),
            ],
        );
        let result = BaselineAwareDetector::default().detect(&fv, Some(&profile));
        assert!((result.score - 1.0).abs() < 1e-9, "score {}", result.score);
        assert_eq!(result.prediction, Prediction::AiGenerated);
        assert_eq!(result.method, DetectionMethod::BaselineAware);
    }

    #[test]
    fn test_human_means_lean_human() {
        let profile = BaselineProfile::reference();
        let mut fv: FeatureVector = profile
            .critical_features()
            .iter()
            .map(|c| (c.name, c.human_mean))
            .collect();
        fv.insert("basic.loc", 30.0);
        fv.insert("ast.single_char_vars_ratio", 0.5);
        fv.insert("human_style.spacing_issues_ratio", 1.5);
        let result = BaselineAwareDetector::default().detect(&fv, Some(&profile));
        assert_eq!(result.prediction, Prediction::HumanWritten);
        assert!(result.reasoning.iter().any(|r| r.contains("human baseline")));
    }

    #[test]
    fn test_contributions_sum_to_score() {
        let profile = BaselineProfile::reference();
        let fv = vector(&[
            ("basic.loc", 25.0),
            ("basic.comment_ratio", 0.03),
            ("naming.generic_var_ratio", 0.3),
        ]);
        let result = BaselineAwareDetector::default().detect(&fv, Some(&profile));
        let sum: f64 = result.contributions.values().sum();
        assert!((0.5 + sum - result.score).abs() < 1e-12);
    }
}
