//! Line counts, comment density, tokens and an approximate cyclomatic
//! complexity.

use super::{lexicon, Analyzer};
use crate::features::{per, PreparedSource};
use regex::Regex;
use std::sync::OnceLock;

static TOKEN: OnceLock<Regex> = OnceLock::new();
static DECISION: OnceLock<Regex> = OnceLock::new();

fn token_re() -> &'static Regex {
    TOKEN.get_or_init(|| {
        Regex::new(r#"[A-Za-z_]\w*|\d[\w.]*|"[^"]*"|'[^']*'|==|!=|<=|>=|&&|\|\||\+\+|--|->|::|<<|>>|[^\s\w]"#)
            .expect("valid regex")
    })
}

fn decision_re() -> &'static Regex {
    DECISION.get_or_init(|| {
        Regex::new(r"\b(?:if|for|while|case|catch)\b|&&|\|\||\?").expect("valid regex")
    })
}

pub struct BasicAnalyzer;

impl Analyzer for BasicAnalyzer {
    fn namespace(&self) -> &'static str {
        "basic"
    }

    fn analyze(&self, source: &PreparedSource) -> Vec<(&'static str, f64)> {
        let loc = source.loc() as f64;
        let total = source.total_lines as f64;
        let tokens: usize = source
            .code_lines
            .iter()
            .map(|line| token_re().find_iter(line).count())
            .sum();

        vec![
            ("loc", loc),
            ("total_lines", total),
            ("comment_lines", source.comment_lines as f64),
            ("blank_lines", source.blank_lines as f64),
            ("comment_ratio", per(source.comment_lines as f64, total)),
            ("blank_ratio", per(source.blank_lines as f64, total)),
            ("token_count", tokens as f64),
            ("tokens_per_loc", per(tokens as f64, loc)),
            ("cyclomatic_complexity", cyclomatic(source)),
        ]
    }
}

/// Average cyclomatic complexity per function: `1 + decisions / functions`.
/// Files without function definitions are treated as one function.
fn cyclomatic(source: &PreparedSource) -> f64 {
    if source.is_empty() {
        return 0.0;
    }
    let decisions: usize = source
        .masked_lines
        .iter()
        .filter(|line| !lexicon::is_preprocessor(line))
        .map(|line| decision_re().find_iter(line).count())
        .sum();
    let functions = source.functions.len().max(1);
    1.0 + decisions as f64 / functions as f64
}
