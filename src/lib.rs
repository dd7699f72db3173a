//! codeorigin - AI-generated vs human-written C/C++ detection
//!
//! Source text goes through six independent analyzers into one namespaced
//! [`FeatureVector`]; a detection strategy then scores that vector, either
//! with fixed rules or against measured AI/human baselines, and returns a
//! [`DetectionResult`] with confidence and reasoning.
//!
//! ```no_run
//! let features = codeorigin::extract_features("int main(){return 0;}", "main.c");
//! let result = codeorigin::detect(&features, None);
//! println!("{} ({:.2})", result.prediction, result.confidence);
//! ```

pub mod analyzers;
pub mod baseline;
pub mod config;
pub mod detection;
pub mod features;
pub mod models;

pub use baseline::{BaselineProfile, BaselineProfileStore};
pub use detection::{DetectionEngine, Strategy};
pub use features::{FeatureAggregator, FeatureVector};
pub use models::{DetectionMethod, DetectionResult, Prediction, SourceUnit};

use std::sync::OnceLock;

static AGGREGATOR: OnceLock<FeatureAggregator> = OnceLock::new();
static ENGINE: OnceLock<DetectionEngine> = OnceLock::new();

/// Extract the full feature vector with default settings.
///
/// Deterministic and total: any text, including an empty string, yields a
/// vector of finite values.
pub fn extract_features(source_text: &str, filename: &str) -> FeatureVector {
    AGGREGATOR
        .get_or_init(FeatureAggregator::default)
        .extract(&SourceUnit::new(source_text, filename))
}

/// Score a feature vector with default settings. Uses the baseline-aware
/// strategy when `profile` has critical features, the heuristic one
/// otherwise.
pub fn detect(features: &FeatureVector, profile: Option<&BaselineProfile>) -> DetectionResult {
    ENGINE
        .get_or_init(DetectionEngine::default)
        .detect(features, profile)
}
