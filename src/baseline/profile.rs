//! Critical-feature ranking

use super::{FeatureStats, DEFAULT_TOP_K};
use crate::config::BaselineFallback;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Features shown in a profile summary
const SUMMARY_TOP: usize = 5;

const TOP_WEIGHT: f64 = 0.20;
const WEIGHT_DECAY: f64 = 0.01;
const MIN_WEIGHT: f64 = 0.05;

/// Reference means measured on the original AI and human corpora.
const REFERENCE_MEANS: &[(&str, f64, f64)] = &[
    ("basic.comment_ratio", 0.066, 0.006),
    ("ast.indentation_consistency", 1.0, 0.952),
    ("naming.generic_var_ratio", 0.139, 0.526),
    ("ast.if_statements_per_loc", 0.007, 0.052),
    ("basic.cyclomatic_complexity", 1.073, 3.493),
    ("human_style.overall_human_score", 0.212, 0.697),
];

/// `|ai - human| / avg(|ai|, |human|)`, or the raw difference when the
/// average is 0.
pub fn effect_size(ai_mean: f64, human_mean: f64) -> f64 {
    let diff = (ai_mean - human_mean).abs();
    let avg = (ai_mean.abs() + human_mean.abs()) / 2.0;
    if avg == 0.0 {
        diff
    } else {
        diff / avg
    }
}

/// Weight for the feature at `rank` (0-based): 0.20 decaying by 0.01 per
/// rank, never below 0.05.
pub fn rank_weight(rank: usize) -> f64 {
    (TOP_WEIGHT - WEIGHT_DECAY * rank as f64).max(MIN_WEIGHT)
}

/// A feature that separates the two corpora well enough to score on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalFeature {
    pub name: &'static str,
    pub ai_mean: f64,
    pub human_mean: f64,
    pub effect_size: f64,
    pub weight: f64,
    /// The AI corpus has the larger mean
    pub ai_higher: bool,
}

impl CriticalFeature {
    /// Distance between the two means, always positive for a ranked feature.
    pub fn spread(&self) -> f64 {
        (self.ai_mean - self.human_mean).abs()
    }
}

/// Immutable AI/human means plus the derived critical features.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaselineProfile {
    ai_means: BTreeMap<&'static str, f64>,
    human_means: BTreeMap<&'static str, f64>,
    critical: Vec<CriticalFeature>,
}

/// Counts and the strongest features of a profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSummary {
    pub ai_features: usize,
    pub human_features: usize,
    pub critical_count: usize,
    pub top: Vec<CriticalFeature>,
}

impl BaselineProfile {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Rank the features present on both sides and keep the top `top_k`.
    ///
    /// Features whose means coincide carry no signal and are never critical.
    /// Ties in effect size break by name so the ranking is deterministic.
    pub fn from_stats(stats: &FeatureStats, top_k: usize) -> Self {
        let mut ranked: Vec<(&'static str, f64, f64, f64)> = stats
            .paired()
            .map(|(name, ai, human)| (name, ai, human, effect_size(ai, human)))
            .filter(|(_, ai, human, _)| ai != human)
            .collect();
        ranked.sort_by(|a, b| {
            b.3.partial_cmp(&a.3)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });

        let critical = ranked
            .into_iter()
            .take(top_k)
            .enumerate()
            .map(|(rank, (name, ai_mean, human_mean, effect))| CriticalFeature {
                name,
                ai_mean,
                human_mean,
                effect_size: effect,
                weight: rank_weight(rank),
                ai_higher: ai_mean > human_mean,
            })
            .collect();

        Self {
            ai_means: stats.ai_means.clone(),
            human_means: stats.human_means.clone(),
            critical,
        }
    }

    /// Build from `(feature, ai_mean, human_mean)` triples. Names outside the
    /// schema are dropped.
    pub fn from_means(means: &[(&str, f64, f64)], top_k: usize) -> Self {
        let mut stats = FeatureStats::default();
        for (raw, ai, human) in means {
            let Some(name) = crate::features::schema::canonical_name(raw) else {
                continue;
            };
            if ai.is_finite() && human.is_finite() {
                stats.ai_means.insert(name, *ai);
                stats.human_means.insert(name, *human);
            }
        }
        Self::from_stats(&stats, top_k)
    }

    /// Built-in profile of six well-separated features.
    pub fn reference() -> Self {
        Self::from_means(REFERENCE_MEANS, DEFAULT_TOP_K)
    }

    pub fn fallback(kind: BaselineFallback) -> Self {
        match kind {
            BaselineFallback::Empty => Self::empty(),
            BaselineFallback::Reference => Self::reference(),
        }
    }

    /// No critical features, so baseline-aware scoring has nothing to use.
    pub fn is_empty(&self) -> bool {
        self.critical.is_empty()
    }

    pub fn critical_features(&self) -> &[CriticalFeature] {
        &self.critical
    }

    pub fn ai_mean(&self, name: &str) -> Option<f64> {
        self.ai_means.get(name).copied()
    }

    pub fn human_mean(&self, name: &str) -> Option<f64> {
        self.human_means.get(name).copied()
    }

    pub fn summary(&self) -> ProfileSummary {
        ProfileSummary {
            ai_features: self.ai_means.len(),
            human_features: self.human_means.len(),
            critical_count: self.critical.len(),
            top: self.critical.iter().take(SUMMARY_TOP).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_size() {
        assert!((effect_size(0.066, 0.006) - 0.06 / 0.036).abs() < 1e-9);
        assert_eq!(effect_size(0.0, 0.0), 0.0);
        // sign does not matter
        assert_eq!(effect_size(-2.0, 2.0), 2.0);
    }

    #[test]
    fn test_rank_weight_decays_to_floor() {
        assert_eq!(rank_weight(0), 0.20);
        assert!((rank_weight(5) - 0.15).abs() < 1e-12);
        assert!((rank_weight(15) - 0.05).abs() < 1e-12);
        assert_eq!(rank_weight(100), 0.05);
    }

    #[test]
    fn test_reference_ranking() {
        let profile = BaselineProfile::reference();
        let names: Vec<&str> = profile.critical_features().iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec![
                "basic.comment_ratio",
                "ast.if_statements_per_loc",
                "naming.generic_var_ratio",
                "human_style.overall_human_score",
                "basic.cyclomatic_complexity",
                "ast.indentation_consistency",
            ]
        );
        let first = &profile.critical_features()[0];
        assert!(first.ai_higher);
        assert_eq!(first.weight, 0.20);
        assert!(!profile.critical_features()[1].ai_higher);
    }

    #[test]
    fn test_top_k_and_ties() {
        let profile = BaselineProfile::from_means(
            &[
                ("ast.for_loops_per_loc", 1.0, 3.0),
                ("ast.while_loops_per_loc", 1.0, 3.0),
                ("basic.comment_ratio", 0.1, 0.9),
            ],
            2,
        );
        let names: Vec<&str> = profile.critical_features().iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["basic.comment_ratio", "ast.for_loops_per_loc"]);
    }

    #[test]
    fn test_one_sided_and_equal_features_are_not_critical() {
        let mut stats = FeatureStats::default();
        stats.ai_means.insert("basic.loc", 10.0);
        stats.ai_means.insert("basic.blank_ratio", 0.1);
        stats.human_means.insert("basic.blank_ratio", 0.1);
        let profile = BaselineProfile::from_stats(&stats, 15);
        assert!(profile.is_empty());
        assert_eq!(profile.ai_mean("basic.loc"), Some(10.0));
        assert_eq!(profile.human_mean("basic.loc"), None);
    }

    #[test]
    fn test_summary() {
        let summary = BaselineProfile::reference().summary();
        assert_eq!(summary.ai_features, 6);
        assert_eq!(summary.human_features, 6);
        assert_eq!(summary.critical_count, 6);
        assert_eq!(summary.top.len(), 5);
    }
}
