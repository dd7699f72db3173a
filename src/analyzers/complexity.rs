//! Halstead-like volume, cognitive complexity and maintainability index

use super::{lexicon, Analyzer};
use crate::features::schema::NO_COMMENT_SENTINEL;
use crate::features::{per, PreparedSource};
use regex::Regex;
use rustc_hash::FxHashSet;
use std::sync::OnceLock;

static OPERATOR: OnceLock<Regex> = OnceLock::new();
static OPERAND: OnceLock<Regex> = OnceLock::new();

fn operator_re() -> &'static Regex {
    OPERATOR.get_or_init(|| Regex::new(r"[+\-*/%=<>!&|^~]+").expect("valid regex"))
}

fn operand_re() -> &'static Regex {
    OPERAND.get_or_init(|| Regex::new(r"\b[A-Za-z_]\w*\b|\b\d+(?:\.\d+)?\b").expect("valid regex"))
}

pub struct ComplexityAnalyzer;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Halstead {
    pub distinct_operators: usize,
    pub distinct_operands: usize,
    pub total_operators: usize,
    pub total_operands: usize,
}

impl Halstead {
    pub fn measure(masked_lines: &[String]) -> Self {
        let mut operators = FxHashSet::default();
        let mut operands = FxHashSet::default();
        let mut h = Halstead::default();
        for line in masked_lines.iter().filter(|l| !lexicon::is_include(l)) {
            for m in operator_re().find_iter(line) {
                operators.insert(m.as_str());
                h.total_operators += 1;
            }
            for m in operand_re().find_iter(line) {
                operands.insert(m.as_str());
                h.total_operands += 1;
            }
        }
        h.distinct_operators = operators.len();
        h.distinct_operands = operands.len();
        h
    }

    /// `length * log2(vocabulary)`, 0 unless both operators and operands occur.
    pub fn volume(&self) -> f64 {
        if self.distinct_operators == 0 || self.distinct_operands == 0 {
            return 0.0;
        }
        let vocabulary = (self.distinct_operators + self.distinct_operands) as f64;
        let length = (self.total_operators + self.total_operands) as f64;
        length * vocabulary.log2()
    }
}

/// Each control keyword adds the nesting depth it opens; `}` closes a level.
pub fn cognitive_complexity(masked_lines: &[String]) -> usize {
    let mut total = 0;
    lexicon::walk_nesting(masked_lines, |depth| total += depth);
    total
}

/// `max(0, 171 - 5.2 ln(volume) - 0.23 - 16.2 ln(loc))`, 0 when either input is 0.
pub fn maintainability_index(volume: f64, loc: usize) -> f64 {
    if volume <= 0.0 || loc == 0 {
        return 0.0;
    }
    (171.0 - 5.2 * volume.ln() - 0.23 - 16.2 * (loc as f64).ln()).max(0.0)
}

impl Analyzer for ComplexityAnalyzer {
    fn namespace(&self) -> &'static str {
        "complexity"
    }

    fn analyze(&self, source: &PreparedSource) -> Vec<(&'static str, f64)> {
        let loc = source.loc();
        let volume = Halstead::measure(&source.masked_lines).volume();
        let cognitive = cognitive_complexity(&source.masked_lines) as f64;
        let code_to_comment = match (loc, source.comment_lines) {
            (0, _) => 0.0,
            (_, 0) => NO_COMMENT_SENTINEL,
            (code, comments) => code as f64 / comments as f64,
        };

        vec![
            ("halstead_complexity", volume),
            ("halstead_per_loc", per(volume, loc as f64)),
            ("cognitive_complexity", cognitive),
            ("cognitive_per_loc", per(cognitive, loc as f64)),
            ("maintainability_index", maintainability_index(volume, loc)),
            ("code_to_comment_ratio", code_to_comment),
        ]
    }
}
