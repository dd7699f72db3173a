//! Flat statistics file format
//!
//! ```json
//! {
//!   "ast.if_statements_per_loc_ai_mean": 0.007,
//!   "ast.if_statements_per_loc_human_mean": 0.052,
//!   "ast.if_statements_per_loc_ai_std": 0.01,
//!   "ai_samples": 412,
//!   "generated_at": "2026-01-01T00:00:00Z"
//! }
//! ```
//!
//! Only the `_ai_mean` / `_human_mean` keys are read back. Everything else is
//! informational.

use super::{BaselineError, BaselineResult};
use crate::features::{schema, FeatureVector};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

pub const MEAN_SUFFIX_AI: &str = "_ai_mean";
pub const MEAN_SUFFIX_HUMAN: &str = "_human_mean";
const STD_SUFFIX_AI: &str = "_ai_std";
const STD_SUFFIX_HUMAN: &str = "_human_std";

/// Per-feature means read from a statistics file, keyed by schema name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureStats {
    pub ai_means: BTreeMap<&'static str, f64>,
    pub human_means: BTreeMap<&'static str, f64>,
}

impl FeatureStats {
    pub fn parse(content: &str) -> BaselineResult<Self> {
        let value: Value = serde_json::from_str(content)?;
        let object = value.as_object().ok_or(BaselineError::NotAnObject)?;
        Ok(Self::from_map(object))
    }

    /// Pick the mean keys out of a flat object. Non-numeric values and
    /// names outside the schema are skipped. When a legacy name and its
    /// canonical form are both present the canonical one wins.
    pub fn from_map(object: &Map<String, Value>) -> Self {
        let mut stats = FeatureStats::default();
        for (key, value) in object {
            let (raw, target) = if let Some(raw) = key.strip_suffix(MEAN_SUFFIX_AI) {
                (raw, &mut stats.ai_means)
            } else if let Some(raw) = key.strip_suffix(MEAN_SUFFIX_HUMAN) {
                (raw, &mut stats.human_means)
            } else {
                continue;
            };
            let Some(mean) = value.as_f64().filter(|v| v.is_finite()) else {
                debug!("Ignoring non-numeric baseline value for {}", key);
                continue;
            };
            let Some(name) = schema::canonical_name(raw) else {
                debug!("Ignoring unknown baseline feature {}", raw);
                continue;
            };
            if raw == name {
                target.insert(name, mean);
            } else {
                target.entry(name).or_insert(mean);
            }
        }
        stats
    }

    /// Features with a mean on both sides.
    pub fn paired(&self) -> impl Iterator<Item = (&'static str, f64, f64)> + '_ {
        self.ai_means
            .iter()
            .filter_map(|(name, ai)| self.human_means.get(name).map(|human| (*name, *ai, *human)))
    }
}

/// Which labeled corpus a sample came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpusLabel {
    Ai,
    Human,
}

/// Collects feature vectors from the two labeled corpora and produces the
/// statistics file. Accumulators merge, so corpora can be folded in parallel.
#[derive(Debug, Clone, Default)]
pub struct StatsAccumulator {
    ai: BTreeMap<String, Vec<f64>>,
    human: BTreeMap<String, Vec<f64>>,
    ai_samples: usize,
    human_samples: usize,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, label: CorpusLabel, features: &FeatureVector) {
        let (target, samples) = match label {
            CorpusLabel::Ai => (&mut self.ai, &mut self.ai_samples),
            CorpusLabel::Human => (&mut self.human, &mut self.human_samples),
        };
        *samples += 1;
        for (name, value) in features.iter() {
            target.entry(name.to_string()).or_default().push(value);
        }
    }

    pub fn merge(mut self, other: StatsAccumulator) -> StatsAccumulator {
        for (name, values) in other.ai {
            self.ai.entry(name).or_default().extend(values);
        }
        for (name, values) in other.human {
            self.human.entry(name).or_default().extend(values);
        }
        self.ai_samples += other.ai_samples;
        self.human_samples += other.human_samples;
        self
    }

    pub fn samples(&self, label: CorpusLabel) -> usize {
        match label {
            CorpusLabel::Ai => self.ai_samples,
            CorpusLabel::Human => self.human_samples,
        }
    }

    /// The flat statistics object.
    pub fn to_json(&self, generated_at: DateTime<Utc>) -> Value {
        let mut object = Map::new();
        for (name, values) in &self.ai {
            let (mean, std) = mean_std(values);
            object.insert(format!("{name}{MEAN_SUFFIX_AI}"), Value::from(mean));
            object.insert(format!("{name}{STD_SUFFIX_AI}"), Value::from(std));
        }
        for (name, values) in &self.human {
            let (mean, std) = mean_std(values);
            object.insert(format!("{name}{MEAN_SUFFIX_HUMAN}"), Value::from(mean));
            object.insert(format!("{name}{STD_SUFFIX_HUMAN}"), Value::from(std));
        }
        object.insert("ai_samples".into(), Value::from(self.ai_samples));
        object.insert("human_samples".into(), Value::from(self.human_samples));
        object.insert("generated_at".into(), Value::from(generated_at.to_rfc3339()));
        Value::Object(object)
    }

    /// Means as they would be read back from the written file.
    pub fn feature_stats(&self) -> FeatureStats {
        match self.to_json(Utc::now()) {
            Value::Object(object) => FeatureStats::from_map(&object),
            _ => FeatureStats::default(),
        }
    }

    pub fn write(&self, path: &Path) -> BaselineResult<()> {
        let json = serde_json::to_string_pretty(&self.to_json(Utc::now()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| BaselineError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, json).map_err(|source| BaselineError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Population mean and standard deviation; `(0, 0)` for no values.
fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fv(pairs: &[(&str, f64)]) -> FeatureVector {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn test_parse_reads_only_means() {
        let stats = FeatureStats::parse(
            r#"{
                "basic.comment_ratio_ai_mean": 0.066,
                "basic.comment_ratio_human_mean": 0.006,
                "basic.comment_ratio_ai_std": 0.02,
                "ai_samples": 10,
                "generated_at": "2026-01-01T00:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(stats.ai_means.len(), 1);
        assert_eq!(stats.ai_means["basic.comment_ratio"], 0.066);
        assert_eq!(stats.human_means["basic.comment_ratio"], 0.006);
    }

    #[test]
    fn test_parse_skips_bad_values_and_unknown_features() {
        let stats = FeatureStats::parse(
            r#"{
                "basic.comment_ratio_ai_mean": "high",
                "basic.comment_ratio_human_mean": null,
                "made.up_feature_ai_mean": 1.0,
                "naming.generic_var_ratio_ai_mean": 0.139
            }"#,
        )
        .unwrap();
        assert_eq!(stats.ai_means.len(), 1);
        assert!(stats.human_means.is_empty());
        assert_eq!(stats.paired().count(), 0);
    }

    #[test]
    fn test_legacy_names_are_canonicalized() {
        let stats = FeatureStats::parse(
            r#"{
                "ast_if_statements_per_loc_ai_mean": 0.007,
                "ast_if_statements_per_loc_human_mean": 0.052,
                "spacing_spacing_issues_ratio_ai_mean": 0.1,
                "human_style_overall_score_human_mean": 0.697,
                "comment_ratio_ai_mean": 0.5
            }"#,
        )
        .unwrap();
        assert_eq!(stats.ai_means["ast.if_statements_per_loc"], 0.007);
        assert_eq!(stats.human_means["ast.if_statements_per_loc"], 0.052);
        assert_eq!(stats.ai_means["human_style.spacing_issues_ratio"], 0.1);
        assert_eq!(stats.human_means["human_style.overall_human_score"], 0.697);
        assert_eq!(stats.ai_means["basic.comment_ratio"], 0.5);
    }

    #[test]
    fn test_canonical_name_beats_legacy() {
        let stats = FeatureStats::parse(
            r#"{"comment_ratio_ai_mean": 0.5, "basic.comment_ratio_ai_mean": 0.1}"#,
        )
        .unwrap();
        assert_eq!(stats.ai_means["basic.comment_ratio"], 0.1);
    }

    #[test]
    fn test_accumulator_means_and_merge() {
        let mut ai = StatsAccumulator::new();
        ai.add(CorpusLabel::Ai, &fv(&[("basic.loc", 10.0)]));
        ai.add(CorpusLabel::Ai, &fv(&[("basic.loc", 20.0)]));
        let mut human = StatsAccumulator::new();
        human.add(CorpusLabel::Human, &fv(&[("basic.loc", 40.0)]));

        let merged = ai.merge(human);
        assert_eq!(merged.samples(CorpusLabel::Ai), 2);
        assert_eq!(merged.samples(CorpusLabel::Human), 1);

        let json = merged.to_json(Utc::now());
        assert_eq!(json["basic.loc_ai_mean"], 15.0);
        assert_eq!(json["basic.loc_ai_std"], 5.0);
        assert_eq!(json["basic.loc_human_mean"], 40.0);
        assert_eq!(json["ai_samples"], 2);
        assert!(json["generated_at"].is_string());

        let stats = merged.feature_stats();
        assert_eq!(stats.paired().collect::<Vec<_>>(), vec![("basic.loc", 15.0, 40.0)]);
    }

    #[test]
    fn test_write_then_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("stats.json");
        let mut acc = StatsAccumulator::new();
        acc.add(CorpusLabel::Ai, &fv(&[("naming.generic_var_ratio", 0.1)]));
        acc.add(CorpusLabel::Human, &fv(&[("naming.generic_var_ratio", 0.6)]));
        acc.write(&path).unwrap();

        let stats = FeatureStats::parse(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(stats.ai_means["naming.generic_var_ratio"], 0.1);
        assert_eq!(stats.human_means["naming.generic_var_ratio"], 0.6);
    }
}
