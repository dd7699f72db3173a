//! Swappable profile snapshots

use super::{default_stats_path, try_load_profile, BaselineProfile, BaselineResult, DEFAULT_TOP_K};
use crate::config::BaselineFallback;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock, RwLock};
use tracing::{info, warn};

static GLOBAL: OnceLock<BaselineProfileStore> = OnceLock::new();

/// Holds the current [`BaselineProfile`] behind an `Arc`.
///
/// Readers take a snapshot and keep it for as long as they like; a reload
/// builds a complete new profile first and only then replaces the pointer,
/// so no reader ever sees a partly loaded profile.
#[derive(Debug)]
pub struct BaselineProfileStore {
    current: RwLock<Arc<BaselineProfile>>,
    top_k: usize,
}

impl Default for BaselineProfileStore {
    fn default() -> Self {
        Self::new(BaselineProfile::empty(), DEFAULT_TOP_K)
    }
}

impl BaselineProfileStore {
    pub fn new(profile: BaselineProfile, top_k: usize) -> Self {
        Self {
            current: RwLock::new(Arc::new(profile)),
            top_k,
        }
    }

    /// Load from `path`, starting from `fallback` if that fails.
    pub fn open(path: &Path, top_k: usize, fallback: BaselineFallback) -> Self {
        Self::new(super::load_profile(path, top_k, fallback), top_k)
    }

    /// Process-wide store, loaded on first use from `$CODEORIGIN_BASELINE`
    /// or `feature_stats.json`.
    pub fn global() -> &'static BaselineProfileStore {
        GLOBAL.get_or_init(|| {
            let path: PathBuf = default_stats_path();
            Self::open(&path, DEFAULT_TOP_K, BaselineFallback::Empty)
        })
    }

    /// The profile current at the time of the call.
    pub fn snapshot(&self) -> Arc<BaselineProfile> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Replace the current profile.
    pub fn swap(&self, profile: BaselineProfile) -> Arc<BaselineProfile> {
        let next = Arc::new(profile);
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        std::mem::replace(&mut *guard, next)
    }

    /// Re-read a statistics file. On failure the current profile stays in
    /// place and the error is returned.
    pub fn reload(&self, path: &Path) -> BaselineResult<Arc<BaselineProfile>> {
        match try_load_profile(path, self.top_k) {
            Ok(profile) => {
                info!(
                    "Reloaded baseline from {} ({} critical features)",
                    path.display(),
                    profile.critical_features().len()
                );
                let next = Arc::new(profile);
                let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
                *guard = Arc::clone(&next);
                Ok(next)
            }
            Err(e) => {
                warn!("Baseline reload from {} failed, keeping current profile: {}", path.display(), e);
                Err(e)
            }
        }
    }
}
