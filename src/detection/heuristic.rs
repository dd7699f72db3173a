//! Fixed-rule scoring that needs no baseline statistics
//!
//! Each rule maps one feature linearly into [0, 1] between a `low` and a
//! `high` reference, optionally gated by a threshold on that normalized
//! value, and contributes `weight * normalized`. AI-leaning rules carry
//! positive weights, human-leaning rules negative ones.

use super::{assemble, insufficient_signal, Contribution, Detector};
use crate::baseline::BaselineProfile;
use crate::config::Thresholds;
use crate::features::FeatureVector;
use crate::models::{DetectionMethod, DetectionResult};

/// Which end of the reference range is the strong end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    HigherIsStronger,
    LowerIsStronger,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub id: &'static str,
    pub feature: &'static str,
    pub low: f64,
    pub high: f64,
    pub direction: Direction,
    /// Fire only when the normalized value exceeds this
    pub threshold: Option<f64>,
    pub weight: f64,
    pub description: &'static str,
}

use Direction::{HigherIsStronger as Higher, LowerIsStronger as Lower};

const fn rule(
    id: &'static str,
    feature: &'static str,
    low: f64,
    high: f64,
    direction: Direction,
    threshold: Option<f64>,
    weight: f64,
    description: &'static str,
) -> Rule {
    Rule {
        id,
        feature,
        low,
        high,
        direction,
        threshold,
        weight,
        description,
    }
}

#[rustfmt::skip]
pub const AI_RULES: &[Rule] = &[
    rule("comment_ratio", "basic.comment_ratio", 0.02, 0.25, Higher, Some(0.3), 0.12,
        "Consistent commenting"),
    rule("descriptive_names", "naming.descriptive_var_ratio", 0.3, 0.9, Higher, Some(0.4), 0.15,
        "Descriptive variable names"),
    rule("indentation_consistency", "ast.indentation_consistency", 0.8, 1.0, Higher, Some(0.5), 0.06,
        "Uniform indentation"),
    rule("template_usage", "ai_pattern.template_usage_score", 0.0, 0.15, Higher, Some(0.2), 0.10,
        "Textbook template idioms"),
    rule("error_handling", "ai_pattern.error_handling_score", 0.0, 0.1, Higher, Some(0.3), 0.06,
        "Systematic error handling"),
    rule("boilerplate", "ai_pattern.boilerplate_ratio", 0.05, 0.35, Higher, Some(0.3), 0.06,
        "Boilerplate structure"),
    rule("verb_functions", "naming.verb_function_ratio", 0.0, 0.6, Higher, Some(0.3), 0.08,
        "Verb-prefixed function names"),
    rule("meaningful_names", "naming.meaningful_names_score", 0.4, 0.85, Higher, Some(0.4), 0.06,
        "Word-like identifiers"),
    rule("blank_lines", "basic.blank_ratio", 0.03, 0.2, Higher, None, 0.05,
        "Regular blank-line spacing"),
    rule("variable_name_length", "ast.avg_variable_name_length", 3.0, 10.0, Higher, None, 0.06,
        "Long variable names"),
];

#[rustfmt::skip]
pub const HUMAN_RULES: &[Rule] = &[
    rule("generic_names", "naming.generic_var_ratio", 0.2, 0.7, Higher, Some(0.3), -0.15,
        "Generic variable names"),
    rule("single_char_vars", "ast.single_char_vars_ratio", 0.1, 0.5, Higher, None, -0.08,
        "Single-character variables"),
    rule("human_style", "human_style.overall_human_score", 0.2, 0.7, Higher, None, -0.15,
        "Irregular human formatting"),
    rule("short_code", "basic.loc", 10.0, 40.0, Lower, Some(0.3), -0.10,
        "Short code"),
    rule("minimal_comments", "basic.comment_ratio", 0.0, 0.05, Lower, Some(0.5), -0.08,
        "Few or no comments"),
    rule("duplicate_lines", "redundancy.duplicate_line_ratio", 0.05, 0.3, Higher, None, -0.06,
        "Repeated lines"),
    rule("cognitive_density", "complexity.cognitive_per_loc", 0.1, 0.5, Higher, None, -0.06,
        "Dense nested logic"),
    rule("nested_control", "ast.nested_control_depth", 2.0, 5.0, Higher, None, -0.05,
        "Deeply nested control flow"),
];

impl Rule {
    /// Linear clamp of `value` into [0, 1], flipped for lower-is-stronger.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.high - self.low;
        let t = if span > 0.0 {
            ((value - self.low) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        match self.direction {
            Direction::HigherIsStronger => t,
            Direction::LowerIsStronger => 1.0 - t,
        }
    }

    /// Contribution for this rule, 0 when the feature is absent or the
    /// gate is not passed.
    pub fn evaluate(&self, features: &FeatureVector) -> f64 {
        let Some(value) = features.get(self.feature) else {
            return 0.0;
        };
        let normalized = self.normalize(value);
        match self.threshold {
            Some(gate) if normalized <= gate => 0.0,
            _ => self.weight * normalized,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HeuristicDetector {
    thresholds: Thresholds,
    max_reasons: usize,
}

impl Default for HeuristicDetector {
    fn default() -> Self {
        Self::new(Thresholds::heuristic(), 6)
    }
}

impl HeuristicDetector {
    pub fn new(thresholds: Thresholds, max_reasons: usize) -> Self {
        Self {
            thresholds,
            max_reasons,
        }
    }
}

impl Detector for HeuristicDetector {
    fn method(&self) -> DetectionMethod {
        DetectionMethod::HeuristicWeighted
    }

    fn detect(&self, features: &FeatureVector, _profile: Option<&BaselineProfile>) -> DetectionResult {
        if let Some(result) = insufficient_signal(features, self.method()) {
            return result;
        }
        let contributions = AI_RULES
            .iter()
            .chain(HUMAN_RULES)
            .map(|rule| Contribution {
                key: rule.id.to_string(),
                description: rule.description.to_string(),
                value: rule.evaluate(features),
            })
            .collect();
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

    #[test]
    fn test_rule_ids_are_unique_and_features_known() {
        let mut ids = std::collections::HashSet::new();
        for rule in AI_RULES.iter().chain(HUMAN_RULES) {
            assert!(ids.insert(rule.id), "duplicate rule {}", rule.id);
            assert!(crate::features::schema::is_known(rule.feature), "{}", rule.feature);
            assert!(rule.high > rule.low);
        }
        assert!(AI_RULES.iter().all(|r| r.weight > 0.0));
        assert!(HUMAN_RULES.iter().all(|r| r.weight < 0.0));
    }

    #[test]
    fn test_normalize_directions() {
        let short = HUMAN_RULES.iter().find(|r| r.id == "short_code").unwrap();
        assert_eq!(short.normalize(1.0), 1.0);
        assert_eq!(short.normalize(25.0), 0.5);
        assert_eq!(short.normalize(400.0), 0.0);

        let generic = HUMAN_RULES.iter().find(|r| r.id == "generic_names").unwrap();
        assert_eq!(generic.normalize(0.0), 0.0);
        assert_eq!(generic.normalize(1.5), 1.0);
    }

    #[test]
    fn test_threshold_gates_contribution() {
        let generic = HUMAN_RULES.iter().find(|r| r.id == "generic_names").unwrap();
        // normalized 0.2, under the 0.3 gate
        assert_eq!(generic.evaluate(&vector(&[("naming.generic_var_ratio", 0.3)])), 0.0);
        assert_eq!(generic.evaluate(&vector(&[("naming.generic_var_ratio", 0.9)])), -0.15);
        assert_eq!(generic.evaluate(&FeatureVector::new()), 0.0);
    }

    #[test]
    fn test_ai_leaning_vector() {
        let features = vector(&[
            ("basic.loc", 60.0),
            ("basic.comment_ratio", 0.2),
            ("naming.descriptive_var_ratio", 0.95),
            ("ast.indentation_consistency", 1.0),
            ("ai_pattern.template_usage_score", 0.1),
            ("naming.verb_function_ratio", 0.8),
            ("naming.meaningful_names_score", 0.9),
            ("ast.avg_variable_name_length", 9.0),
        ]);
        let result = HeuristicDetector::default().detect(&features, None);
        assert_eq!(result.prediction, Prediction::AiGenerated);
        assert_eq!(result.method, DetectionMethod::HeuristicWeighted);
        assert!(result.reasoning[0].starts_with("Descriptive variable names"));
    }

    #[test]
    fn test_human_leaning_vector() {
        let features = vector(&[
            ("basic.loc", 12.0),
            ("basic.comment_ratio", 0.0),
            ("naming.generic_var_ratio", 0.9),
            ("ast.single_char_vars_ratio", 0.6),
            ("human_style.overall_human_score", 0.8),
        ]);
        let result = HeuristicDetector::default().detect(&features, None);
        assert_eq!(result.prediction, Prediction::HumanWritten);
        assert!(result.confidence > 0.6);
    }

    #[test]
    fn test_contributions_sum_to_score() {
        let features = vector(&[
            ("basic.loc", 30.0),
            ("basic.comment_ratio", 0.1),
            ("naming.generic_var_ratio", 0.5),
        ]);
        let result = HeuristicDetector::default().detect(&features, None);
        let sum: f64 = result.contributions.values().sum();
        assert!((0.5 + sum - result.score).abs() < 1e-12);
    }
}
