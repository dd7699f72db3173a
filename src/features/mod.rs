//! Feature vectors and the extraction pipeline
//!
//! A [`FeatureVector`] is a flat, namespaced map (`ast.if_statements_per_loc`,
//! `naming.generic_var_ratio`, ...) validated against the fixed [`schema`].
//! Values are sanitized on insert, so every value read back is finite and
//! inside its documented bound.

mod aggregator;
mod prepare;
pub mod schema;

pub use aggregator::FeatureAggregator;
pub use prepare::PreparedSource;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered mapping from namespaced feature name to a finite value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector {
    values: BTreeMap<String, f64>,
}

/// A schema problem found by [`FeatureVector::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    Unknown(String),
    Missing(&'static str),
}

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, coercing it into the feature's documented bound.
    /// Names outside the schema only have non-finite values replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        let value = match schema::lookup(&name) {
            Some(spec) => spec.bound.sanitize(value),
            None if value.is_finite() => value,
            None if value.is_nan() => 0.0,
            None => value.signum() * schema::COUNT_CEILING,
        };
        self.values.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Features in one namespace, keyed by the unprefixed name.
    pub fn namespace<'a>(&'a self, ns: &'a str) -> impl Iterator<Item = (&'a str, f64)> + 'a {
        self.iter().filter_map(move |(name, value)| {
            let rest = name.strip_prefix(ns)?.strip_prefix('.')?;
            Some((rest, value))
        })
    }

    /// Merge another vector's entries into this one.
    pub fn extend(&mut self, other: FeatureVector) {
        for (name, value) in other.values {
            self.insert(name, value);
        }
    }

    /// Compare keys against the schema. An extracted vector has no violations;
    /// hand-built vectors may.
    pub fn validate(&self) -> Vec<SchemaViolation> {
        let mut violations: Vec<SchemaViolation> = self
            .values
            .keys()
            .filter(|k| !schema::is_known(k))
            .map(|k| SchemaViolation::Unknown(k.clone()))
            .collect();
        violations.extend(
            schema::FEATURES
                .iter()
                .filter(|f| !self.values.contains_key(f.name))
                .map(|f| SchemaViolation::Missing(f.name)),
        );
        violations
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for FeatureVector {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut fv = FeatureVector::new();
        for (name, value) in iter {
            fv.insert(name, value);
        }
        fv
    }
}

/// `count / max(1, denominator)`, the normalization used for every
/// `_per_loc` and `_ratio` feature.
pub(crate) fn per(count: f64, denominator: f64) -> f64 {
    count / denominator.max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_sanitizes_known_features() {
        let mut fv = FeatureVector::new();
        fv.insert("naming.generic_var_ratio", 1.7);
        fv.insert("basic.loc", f64::NAN);
        fv.insert("complexity.code_to_comment_ratio", f64::INFINITY);
        assert_eq!(fv.get("naming.generic_var_ratio"), Some(1.0));
        assert_eq!(fv.get("basic.loc"), Some(0.0));
        assert_eq!(fv.get("complexity.code_to_comment_ratio"), Some(999.0));
    }

    #[test]
    fn test_unknown_features_stay_finite() {
        let fv: FeatureVector = [("custom.signal", f64::NEG_INFINITY), ("custom.other", 2.5)]
            .into_iter()
            .collect();
        assert_eq!(fv.get("custom.signal"), Some(-schema::COUNT_CEILING));
        assert_eq!(fv.get("custom.other"), Some(2.5));
        assert!(fv
            .validate()
            .contains(&SchemaViolation::Unknown("custom.signal".to_string())));
    }

    #[test]
    fn test_namespace_view() {
        let fv: FeatureVector = [
            ("ast.if_statements", 3.0),
            ("ast.for_loops", 1.0),
            ("naming.generic_var_ratio", 0.5),
        ]
        .into_iter()
        .collect();
        let ast: Vec<_> = fv.namespace("ast").collect();
        assert_eq!(ast, vec![("for_loops", 1.0), ("if_statements", 3.0)]);
    }

    #[test]
    fn test_per_guards_zero() {
        assert_eq!(per(4.0, 0.0), 4.0);
        assert_eq!(per(4.0, 8.0), 0.5);
        assert_eq!(per(0.0, 0.0), 0.0);
    }
}
