//! Core data models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Source language inferred from the file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    C,
    Cpp,
    #[default]
    Unknown,
}

impl Language {
    pub fn from_filename(filename: &str) -> Self {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("c") | Some("h") => Language::C,
            Some("cpp") | Some("cc") | Some("cxx") | Some("c++") | Some("hpp") | Some("hh")
            | Some("hxx") => Language::Cpp,
            _ => Language::Unknown,
        }
    }

    /// File extensions picked up by directory walks.
    pub fn extensions() -> &'static [&'static str] {
        &["c", "h", "cpp", "cc", "cxx", "c++", "hpp", "hh", "hxx"]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::C => write!(f, "C"),
            Language::Cpp => write!(f, "C++"),
            Language::Unknown => write!(f, "unknown"),
        }
    }
}

/// One file to analyze. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub text: String,
    pub filename: String,
    pub language: Language,
}

impl SourceUnit {
    pub fn new(text: impl Into<String>, filename: impl Into<String>) -> Self {
        let filename = filename.into();
        Self {
            text: text.into(),
            language: Language::from_filename(&filename),
            filename,
        }
    }
}

/// Verdict of a detection run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prediction {
    AiGenerated,
    HumanWritten,
    Uncertain,
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prediction::AiGenerated => write!(f, "AI-generated"),
            Prediction::HumanWritten => write!(f, "Human-written"),
            Prediction::Uncertain => write!(f, "Uncertain"),
        }
    }
}

/// Which strategy produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetectionMethod {
    #[serde(rename = "heuristic-weighted")]
    HeuristicWeighted,
    #[serde(rename = "baseline-aware")]
    BaselineAware,
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionMethod::HeuristicWeighted => write!(f, "heuristic-weighted"),
            DetectionMethod::BaselineAware => write!(f, "baseline-aware"),
        }
    }
}

/// Outcome of `detect`. Built fresh per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub prediction: Prediction,
    /// Confidence in `prediction`, in [0, 1]
    pub confidence: f64,
    /// Final blended score; above 0.5 leans AI
    pub score: f64,
    /// Most significant first
    pub reasoning: Vec<String>,
    /// Signed contribution of each rule or feature relative to 0.5
    pub contributions: BTreeMap<String, f64>,
    pub method: DetectionMethod,
}

impl DetectionResult {
    pub fn is_ai(&self) -> bool {
        self.prediction == Prediction::AiGenerated
    }

    pub fn is_human(&self) -> bool {
        self.prediction == Prediction::HumanWritten
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_filename() {
        assert_eq!(Language::from_filename("main.c"), Language::C);
        assert_eq!(Language::from_filename("util.H"), Language::C);
        assert_eq!(Language::from_filename("src/app.cpp"), Language::Cpp);
        assert_eq!(Language::from_filename("lib.hpp"), Language::Cpp);
        assert_eq!(Language::from_filename("README"), Language::Unknown);
        assert_eq!(Language::from_filename("script.py"), Language::Unknown);
    }

    #[test]
    fn test_result_prediction_helpers() {
        let mut result = DetectionResult {
            prediction: Prediction::AiGenerated,
            score: 0.8,
            confidence: 0.6,
            reasoning: Vec::new(),
            contributions: BTreeMap::new(),
            method: DetectionMethod::HeuristicWeighted,
        };
        assert!(result.is_ai() && !result.is_human());
        result.prediction = Prediction::HumanWritten;
        assert!(result.is_human() && !result.is_ai());
        result.prediction = Prediction::Uncertain;
        assert!(!result.is_ai() && !result.is_human());
    }

    #[test]
    fn test_prediction_serializes_snake_case() {
        let json = serde_json::to_string(&Prediction::AiGenerated).unwrap();
        assert_eq!(json, "\"ai_generated\"");
        let json = serde_json::to_string(&DetectionMethod::BaselineAware).unwrap();
        assert_eq!(json, "\"baseline-aware\"");
    }
}
