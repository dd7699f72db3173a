//! Per-feature comparison of one file against the AI means

use super::BaselineProfile;
use crate::features::{schema, FeatureVector};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Relative differences under this percentage count as similar.
const SIMILAR_PERCENT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpretation {
    SimilarToAi,
    HigherThanAi,
    LowerThanAi,
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interpretation::SimilarToAi => write!(f, "Similar to AI"),
            Interpretation::HigherThanAi => write!(f, "Higher than AI"),
            Interpretation::LowerThanAi => write!(f, "Lower than AI"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureComparison {
    pub feature: String,
    pub category: String,
    pub value: f64,
    pub ai_mean: f64,
    pub difference: f64,
    /// `difference / ai_mean * 100`, 0 when the AI mean is 0
    pub difference_percent: f64,
    pub interpretation: Interpretation,
}

/// Compare every feature that has an AI mean, largest relative difference
/// first.
pub fn compare_to_ai(features: &FeatureVector, profile: &BaselineProfile) -> Vec<FeatureComparison> {
    let mut rows: Vec<FeatureComparison> = features
        .iter()
        .filter_map(|(name, value)| {
            let ai_mean = profile.ai_mean(name)?;
            let difference = value - ai_mean;
            let difference_percent = if ai_mean != 0.0 {
                difference / ai_mean * 100.0
            } else {
                0.0
            };
            let interpretation = if difference_percent.abs() < SIMILAR_PERCENT {
                Interpretation::SimilarToAi
            } else if difference > 0.0 {
                Interpretation::HigherThanAi
            } else {
                Interpretation::LowerThanAi
            };
            Some(FeatureComparison {
                feature: name.to_string(),
                category: schema::namespace_of(name).to_string(),
                value,
                ai_mean,
                difference,
                difference_percent,
                interpretation,
            })
        })
        .collect();
    rows.sort_by(|a, b| {
        b.difference_percent
            .abs()
            .partial_cmp(&a.difference_percent.abs())
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.feature.cmp(&b.feature))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpretations_and_order() {
        let profile = BaselineProfile::from_means(
            &[
                ("basic.comment_ratio", 0.1, 0.0),
                ("naming.generic_var_ratio", 0.2, 0.6),
                ("ast.indentation_consistency", 1.0, 0.9),
            ],
            15,
        );
        let features: FeatureVector = [
            ("basic.comment_ratio", 0.0),
            ("naming.generic_var_ratio", 0.5),
            ("ast.indentation_consistency", 0.98),
            ("basic.loc", 12.0),
        ]
        .into_iter()
        .collect();

        let rows = compare_to_ai(&features, &profile);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].feature, "naming.generic_var_ratio");
        assert_eq!(rows[0].interpretation, Interpretation::HigherThanAi);
        assert_eq!(rows[0].category, "naming");
        assert_eq!(rows[1].feature, "basic.comment_ratio");
        assert_eq!(rows[1].interpretation, Interpretation::LowerThanAi);
        assert_eq!(rows[2].interpretation, Interpretation::SimilarToAi);
    }

    #[test]
    fn test_zero_ai_mean_has_no_percentage() {
        let profile = BaselineProfile::from_means(&[("ast.for_loops_per_loc", 0.0, 0.1)], 15);
        let features: FeatureVector = [("ast.for_loops_per_loc", 0.3)].into_iter().collect();
        let rows = compare_to_ai(&features, &profile);
        assert_eq!(rows[0].difference_percent, 0.0);
        assert_eq!(rows[0].interpretation, Interpretation::SimilarToAi);
    }
}
