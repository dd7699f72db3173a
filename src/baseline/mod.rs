//! Baseline statistics and the critical-feature profile
//!
//! A statistics file records, per feature, the mean value observed on a
//! labeled AI corpus and on a labeled human corpus. [`BaselineProfile`]
//! ranks the features present on both sides by effect size and keeps the
//! top few as [`CriticalFeature`]s for baseline-aware detection.
//!
//! Loading never fails the caller: a missing or malformed file is logged
//! and replaced by the configured fallback profile. [`BaselineProfileStore`]
//! holds the current profile as an immutable snapshot that can be swapped
//! atomically while readers keep using the one they already hold.

mod compare;
mod profile;
mod stats;
mod store;

pub use compare::{compare_to_ai, FeatureComparison, Interpretation};
pub use profile::{effect_size, rank_weight, BaselineProfile, CriticalFeature, ProfileSummary};
pub use stats::{CorpusLabel, FeatureStats, StatsAccumulator, MEAN_SUFFIX_AI, MEAN_SUFFIX_HUMAN};
pub use store::BaselineProfileStore;

use crate::config::BaselineFallback;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Critical features kept after ranking
pub const DEFAULT_TOP_K: usize = 15;

/// Environment variable naming the statistics file
pub const BASELINE_ENV: &str = "CODEORIGIN_BASELINE";

pub const DEFAULT_STATS_FILENAME: &str = "feature_stats.json";

#[derive(Error, Debug)]
pub enum BaselineError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid statistics JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Statistics file must be a JSON object")]
    NotAnObject,
}

pub type BaselineResult<T> = std::result::Result<T, BaselineError>;

/// `$CODEORIGIN_BASELINE` if set, else `feature_stats.json`.
pub fn default_stats_path() -> PathBuf {
    std::env::var_os(BASELINE_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATS_FILENAME))
}

/// Read and rank a statistics file.
pub fn try_load_profile(path: &Path, top_k: usize) -> BaselineResult<BaselineProfile> {
    let content = std::fs::read_to_string(path).map_err(|source| BaselineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let stats = FeatureStats::parse(&content)?;
    Ok(BaselineProfile::from_stats(&stats, top_k))
}

/// Read and rank a statistics file, degrading to `fallback` on any error.
pub fn load_profile(path: &Path, top_k: usize, fallback: BaselineFallback) -> BaselineProfile {
    match try_load_profile(path, top_k) {
        Ok(profile) => {
            debug!(
                "Loaded baseline from {} ({} critical features)",
                path.display(),
                profile.critical_features().len()
            );
            profile
        }
        Err(e) => {
            warn!("Baseline unavailable, using {:?} profile: {}", fallback, e);
            BaselineProfile::fallback(fallback)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_degrades_to_empty() {
        let profile = load_profile(
            Path::new("/definitely/not/here.json"),
            DEFAULT_TOP_K,
            BaselineFallback::Empty,
        );
        assert!(profile.is_empty());
    }

    #[test]
    fn test_missing_file_can_fall_back_to_reference() {
        let profile = load_profile(
            Path::new("/definitely/not/here.json"),
            DEFAULT_TOP_K,
            BaselineFallback::Reference,
        );
        assert_eq!(profile, BaselineProfile::reference());
    }

    #[test]
    fn test_error_kinds() {
        let dir = tempfile::tempdir().unwrap();
        let missing = try_load_profile(&dir.path().join("none.json"), 5);
        assert!(matches!(missing, Err(BaselineError::Io { .. })));

        let garbage = dir.path().join("garbage.json");
        std::fs::write(&garbage, "{not json").unwrap();
        assert!(matches!(
            try_load_profile(&garbage, 5),
            Err(BaselineError::Parse(_))
        ));

        let array = dir.path().join("array.json");
        std::fs::write(&array, "[1, 2, 3]").unwrap();
        assert!(matches!(
            try_load_profile(&array, 5),
            Err(BaselineError::NotAnObject)
        ));
    }
}
