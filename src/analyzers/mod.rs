//! Feature analyzers
//!
//! Each analyzer turns a [`PreparedSource`] into a flat list of named values
//! under its own namespace. Analyzers hold only immutable configuration, so
//! the aggregator can run them concurrently.
//!
//! | Analyzer | Namespace |
//! |----------|-----------|
//! | [`BasicAnalyzer`] | `basic` |
//! | [`StructuralAnalyzer`] | `ast` |
//! | [`RedundancyAnalyzer`] | `redundancy` |
//! | [`NamingPatternAnalyzer`] | `naming` |
//! | [`ComplexityAnalyzer`] | `complexity` |
//! | [`AiPatternAnalyzer`] | `ai_pattern` |
//! | [`HumanStyleAnalyzer`] | `human_style` |

mod ai_pattern;
mod basic;
mod complexity;
mod human_style;
pub mod lexicon;
mod naming;
mod redundancy;
mod structural;

pub use ai_pattern::AiPatternAnalyzer;
pub use basic::BasicAnalyzer;
pub use complexity::ComplexityAnalyzer;
pub use human_style::{HumanStyleAnalyzer, HumanStyleWeights};
pub use naming::NamingPatternAnalyzer;
pub use redundancy::{RedundancyAnalyzer, DEFAULT_MAX_SCAN_LINES};
pub use structural::StructuralAnalyzer;

use crate::features::PreparedSource;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single feature family.
pub trait Analyzer: Send + Sync {
    /// Namespace prefixed to every feature name this analyzer emits
    fn namespace(&self) -> &'static str;

    /// Compute features. Must not panic on any input, including empty text.
    fn analyze(&self, source: &PreparedSource) -> Vec<(&'static str, f64)>;
}

/// Optional analyzers that configuration can switch off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyzerKind {
    Structural,
    Redundancy,
    Naming,
    Complexity,
    AiPattern,
    HumanStyle,
}

impl AnalyzerKind {
    pub fn all() -> &'static [AnalyzerKind] {
        &[
            AnalyzerKind::Structural,
            AnalyzerKind::Redundancy,
            AnalyzerKind::Naming,
            AnalyzerKind::Complexity,
            AnalyzerKind::AiPattern,
            AnalyzerKind::HumanStyle,
        ]
    }
}

impl fmt::Display for AnalyzerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnalyzerKind::Structural => "structural",
            AnalyzerKind::Redundancy => "redundancy",
            AnalyzerKind::Naming => "naming",
            AnalyzerKind::Complexity => "complexity",
            AnalyzerKind::AiPattern => "ai_pattern",
            AnalyzerKind::HumanStyle => "human_style",
        };
        write!(f, "{name}")
    }
}
