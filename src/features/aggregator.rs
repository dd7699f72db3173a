//! Composes the analyzers into one namespaced feature vector

use super::{FeatureVector, PreparedSource};
use crate::analyzers::{
    AiPatternAnalyzer, Analyzer, AnalyzerKind, BasicAnalyzer, ComplexityAnalyzer,
    HumanStyleAnalyzer, NamingPatternAnalyzer, RedundancyAnalyzer, StructuralAnalyzer,
};
use crate::config::AnalysisConfig;
use crate::models::SourceUnit;
use rayon::prelude::*;
use tracing::debug;

/// Runs the configured analyzers over a source unit.
///
/// The analyzer set is fixed at construction. Analyzers share nothing
/// mutable, so they fan out across the rayon pool and their results are
/// merged back in construction order.
pub struct FeatureAggregator {
    analyzers: Vec<Box<dyn Analyzer>>,
    parallel: bool,
}

impl Default for FeatureAggregator {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

impl FeatureAggregator {
    pub fn new(config: &AnalysisConfig) -> Self {
        let mut analyzers: Vec<Box<dyn Analyzer>> = vec![Box::new(BasicAnalyzer)];
        for kind in AnalyzerKind::all() {
            if config.disabled_analyzers.contains(kind) {
                debug!("Analyzer {} disabled by configuration", kind);
                continue;
            }
            let analyzer: Box<dyn Analyzer> = match kind {
                AnalyzerKind::Structural => Box::new(StructuralAnalyzer),
                AnalyzerKind::Redundancy => {
                    Box::new(RedundancyAnalyzer::new(config.max_copy_paste_lines))
                }
                AnalyzerKind::Naming => Box::new(NamingPatternAnalyzer),
                AnalyzerKind::Complexity => Box::new(ComplexityAnalyzer),
                AnalyzerKind::AiPattern => Box::new(AiPatternAnalyzer),
                AnalyzerKind::HumanStyle => Box::new(HumanStyleAnalyzer::new(config.human_style)),
            };
            analyzers.push(analyzer);
        }
        Self {
            analyzers,
            parallel: config.parallel,
        }
    }

    /// Namespaces this aggregator will emit, in merge order.
    pub fn namespaces(&self) -> Vec<&'static str> {
        self.analyzers.iter().map(|a| a.namespace()).collect()
    }

    pub fn extract(&self, unit: &SourceUnit) -> FeatureVector {
        let prepared = PreparedSource::new(unit);

        let results: Vec<Vec<(&'static str, f64)>> = if self.parallel {
            self.analyzers
                .par_iter()
                .map(|a| a.analyze(&prepared))
                .collect()
        } else {
            self.analyzers.iter().map(|a| a.analyze(&prepared)).collect()
        };

        let mut features = FeatureVector::new();
        for (analyzer, values) in self.analyzers.iter().zip(results) {
            let ns = analyzer.namespace();
            for (name, value) in values {
                features.insert(format!("{ns}.{name}"), value);
            }
        }

        debug!(
            "Extracted {} features from {} ({} LOC)",
            features.len(),
            unit.filename,
            prepared.loc()
        );
        features
    }
}
