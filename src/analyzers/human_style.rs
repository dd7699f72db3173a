//! Fine-grained formatting irregularities typical of hand-written code
//!
//! Four issue families are counted and divided by a relevant denominator:
//!
//! - spacing: per non-blank line
//! - indentation: per indented line
//! - naming: per unique identifier
//! - formatting: per line of code
//!
//! The weighted sum, clamped to `[0, 1]`, is `overall_human_score`.
//! Higher means more irregular, i.e. more human-looking.

use super::{lexicon, Analyzer};
use crate::features::{per, PreparedSource};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Lines longer than this are a formatting issue.
const LONG_LINE: usize = 120;
/// Indentation increase (in columns) treated as an abrupt jump.
const MAX_INDENT_STEP: usize = 8;

const POOR_NAME_PATTERNS: &[&str] = &[
    r"^[a-z]+\d+$",
    r"^(?i:temp|tmp|foo|bar|baz|dummy|stuff|thing|var)\w*$",
    r"^[a-z]{1,2}$",
];

static OPERATOR: OnceLock<Regex> = OnceLock::new();
static COMMA_AFTER: OnceLock<Regex> = OnceLock::new();
static BEFORE_PUNCT: OnceLock<Regex> = OnceLock::new();
static SEMI_AFTER: OnceLock<Regex> = OnceLock::new();
static PAREN_PADDING: OnceLock<Regex> = OnceLock::new();
static CONTROL_PAREN: OnceLock<Regex> = OnceLock::new();
static POOR_NAMES: OnceLock<Vec<Regex>> = OnceLock::new();
static MAGIC: OnceLock<Regex> = OnceLock::new();

fn operator_re() -> &'static Regex {
    OPERATOR.get_or_init(|| {
        Regex::new(r"[\w)\]](\s*)(\+=|-=|\*=|/=|==|!=|<=|>=|&&|\|\||[-+*/%=<>&|])(\s*)[\w(]")
            .expect("valid regex")
    })
}

fn comma_after_re() -> &'static Regex {
    COMMA_AFTER.get_or_init(|| Regex::new(r",[^\s]").expect("valid regex"))
}

fn before_punct_re() -> &'static Regex {
    BEFORE_PUNCT.get_or_init(|| Regex::new(r"\S[ \t]+[,;]").expect("valid regex"))
}

fn semi_after_re() -> &'static Regex {
    SEMI_AFTER.get_or_init(|| Regex::new(r";[^\s;)]").expect("valid regex"))
}

fn paren_padding_re() -> &'static Regex {
    PAREN_PADDING.get_or_init(|| Regex::new(r"\([ \t]+\S|\S[ \t]+\)").expect("valid regex"))
}

fn control_paren_re() -> &'static Regex {
    CONTROL_PAREN.get_or_init(|| Regex::new(r"\b(?:if|for|while|switch)\(").expect("valid regex"))
}

fn poor_name_res() -> &'static [Regex] {
    POOR_NAMES.get_or_init(|| {
        POOR_NAME_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("valid regex"))
            .collect()
    })
}

fn magic_re() -> &'static Regex {
    MAGIC.get_or_init(|| {
        Regex::new(r"\b(?:[1-9]\d{2,}|[2-9]\d)\b|\b0[xX][0-9a-fA-F]{3,}\b").expect("valid regex")
    })
}

/// Blend weights for the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HumanStyleWeights {
    pub spacing: f64,
    pub indentation: f64,
    pub naming: f64,
    pub formatting: f64,
}

impl Default for HumanStyleWeights {
    fn default() -> Self {
        Self {
            spacing: 0.30,
            indentation: 0.30,
            naming: 0.25,
            formatting: 0.15,
        }
    }
}

/// Issue counts with their denominators.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleIssues {
    pub spacing: usize,
    pub trailing_whitespace: usize,
    pub nonblank_lines: usize,
    pub indentation: usize,
    pub mixed_indentation: usize,
    pub indented_lines: usize,
    pub naming: usize,
    pub unique_identifiers: usize,
    pub formatting: usize,
    pub long_lines: usize,
    pub code_lines: usize,
}

impl StyleIssues {
    pub fn spacing_ratio(&self) -> f64 {
        per(self.spacing as f64, self.nonblank_lines as f64)
    }

    pub fn indentation_ratio(&self) -> f64 {
        per(self.indentation as f64, self.indented_lines as f64)
    }

    pub fn naming_ratio(&self) -> f64 {
        per(self.naming as f64, self.unique_identifiers as f64)
    }

    pub fn formatting_ratio(&self) -> f64 {
        per(self.formatting as f64, self.code_lines as f64)
    }
}

#[derive(Default)]
pub struct HumanStyleAnalyzer {
    weights: HumanStyleWeights,
}

impl HumanStyleAnalyzer {
    pub fn new(weights: HumanStyleWeights) -> Self {
        Self { weights }
    }

    pub fn measure(&self, source: &PreparedSource) -> StyleIssues {
        let mut issues = StyleIssues {
            code_lines: source.loc(),
            ..Default::default()
        };
        self.count_spacing(source, &mut issues);
        self.count_indentation(source, &mut issues);
        self.count_naming(source, &mut issues);
        self.count_formatting(source, &mut issues);
        issues
    }

    pub fn overall(&self, issues: &StyleIssues) -> f64 {
        let w = &self.weights;
        let score = w.spacing * issues.spacing_ratio()
            + w.indentation * issues.indentation_ratio()
            + w.naming * issues.naming_ratio()
            + w.formatting * issues.formatting_ratio();
        score.clamp(0.0, 1.0)
    }

    fn count_spacing(&self, source: &PreparedSource, issues: &mut StyleIssues) {
        for line in source.raw_lines() {
            if line.trim().is_empty() {
                // Whitespace-only blank line
                if !line.is_empty() {
                    issues.spacing += 1;
                }
                continue;
            }
            issues.nonblank_lines += 1;
            if line.ends_with(' ') || line.ends_with('\t') {
                issues.trailing_whitespace += 1;
                issues.spacing += 1;
            }
        }

        for line in source.masked_lines.iter().filter(|l| !lexicon::is_preprocessor(l)) {
            let code = line.trim_start();
            for caps in operator_re().captures_iter(code) {
                let before = caps.get(1).map_or(0, |g| g.len());
                let after = caps.get(3).map_or(0, |g| g.len());
                // missing or doubled space on either side
                issues.spacing += usize::from(before == 0) + usize::from(after == 0);
                issues.spacing += usize::from(before > 1) + usize::from(after > 1);
            }
            issues.spacing += comma_after_re().find_iter(code).count();
            issues.spacing += before_punct_re().find_iter(code).count();
            issues.spacing += semi_after_re().find_iter(code).count();
            issues.spacing += paren_padding_re().find_iter(code).count();
            issues.spacing += control_paren_re().find_iter(code).count();
        }
    }

    fn count_indentation(&self, source: &PreparedSource, issues: &mut StyleIssues) {
        let (mut tab_lines, mut space_lines) = (0usize, 0usize);
        let mut levels = vec![0usize];
        let mut prev = 0usize;

        for line in source.raw_lines().filter(|l| !l.trim().is_empty()) {
            let lead: String = line.chars().take_while(|c| *c == ' ' || *c == '\t').collect();
            let col = lexicon::indent_columns(line);

            if !lead.is_empty() {
                issues.indented_lines += 1;
                if lead.starts_with('\t') {
                    tab_lines += 1;
                } else {
                    space_lines += 1;
                }
                if lead.contains(' ') && lead.contains('\t') {
                    issues.mixed_indentation += 1;
                    issues.indentation += 1;
                } else if !lead.contains('\t') && lead.len() % 2 != 0 {
                    // not a multiple of 2, 4 or 8
                    issues.indentation += 1;
                }
            }

            if col > prev + MAX_INDENT_STEP {
                issues.indentation += 1;
            }
            if col > prev {
                levels.push(col);
            } else if col < prev {
                while levels.last().is_some_and(|top| *top > col) {
                    levels.pop();
                }
                if levels.last() != Some(&col) {
                    // dedent to a level never opened
                    issues.indentation += 1;
                    levels.push(col);
                }
            }
            prev = col;
        }

        if tab_lines > 0 && space_lines > 0 {
            issues.indentation += tab_lines.min(space_lines);
        }
    }

    fn count_naming(&self, source: &PreparedSource, issues: &mut StyleIssues) {
        let occurrences = lexicon::identifiers(&source.masked_lines);
        let unique: BTreeSet<&str> = occurrences.iter().copied().collect();
        issues.unique_identifiers = unique.len();

        let camel = unique.iter().filter(|id| lexicon::is_camel_case(id)).count();
        let snake = unique.iter().filter(|id| lexicon::is_snake_case(id)).count();
        if camel > 0 && snake > 0 {
            issues.naming += camel.min(snake);
        }

        let shapes: BTreeSet<NameShape> = lexicon::declarations(&source.masked)
            .iter()
            .map(|d| NameShape::of(&d.name))
            .collect();
        issues.naming += shapes.len().saturating_sub(2);

        issues.naming += occurrences
            .iter()
            .filter(|id| poor_name_res().iter().any(|re| re.is_match(id)))
            .count();

        issues.naming += source
            .masked_lines
            .iter()
            .filter(|l| !lexicon::is_preprocessor(l))
            .map(|l| magic_re().find_iter(l).count())
            .sum::<usize>();
    }

    fn count_formatting(&self, source: &PreparedSource, issues: &mut StyleIssues) {
        let (mut own_line, mut same_line) = (0usize, 0usize);
        for line in &source.masked_lines {
            let t = line.trim_start();
            if t.starts_with('{') {
                own_line += 1;
            } else if t.contains('{') && !t.contains("= {") && !t.contains("={") {
                same_line += 1;
            }
        }
        issues.formatting += own_line.min(same_line);

        issues.long_lines = source
            .raw_lines()
            .filter(|l| l.chars().count() > LONG_LINE)
            .count();
        issues.formatting += issues.long_lines;

        let (mut tight, mut spaced) = (0usize, 0usize);
        for comment in source.line_comments.iter().filter(|c| !c.trim().is_empty()) {
            if comment.starts_with('/') {
                continue;
            }
            if comment.starts_with(char::is_whitespace) {
                spaced += 1;
            } else {
                tight += 1;
            }
        }
        issues.formatting += tight.min(spaced);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum NameShape {
    Camel,
    Snake,
    Pascal,
    Upper,
    Lower,
    Other,
}

impl NameShape {
    fn of(name: &str) -> Self {
        if lexicon::is_camel_case(name) {
            NameShape::Camel
        } else if lexicon::is_snake_case(name) {
            NameShape::Snake
        } else if name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()) {
            NameShape::Lower
        } else if name.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_') {
            NameShape::Upper
        } else if name.starts_with(|c: char| c.is_ascii_uppercase()) {
            NameShape::Pascal
        } else {
            NameShape::Other
        }
    }
}

impl Analyzer for HumanStyleAnalyzer {
    fn namespace(&self) -> &'static str {
        "human_style"
    }

    fn analyze(&self, source: &PreparedSource) -> Vec<(&'static str, f64)> {
        let issues = self.measure(source);
        vec![
            ("spacing_issues_ratio", issues.spacing_ratio()),
            ("indentation_issues_ratio", issues.indentation_ratio()),
            ("naming_inconsistency_ratio", issues.naming_ratio()),
            ("formatting_issues_ratio", issues.formatting_ratio()),
            (
                "trailing_whitespace_ratio",
                per(issues.trailing_whitespace as f64, issues.nonblank_lines as f64),
            ),
            (
                "mixed_indentation_ratio",
                per(issues.mixed_indentation as f64, issues.indented_lines as f64),
            ),
            (
                "long_line_ratio",
                per(issues.long_lines as f64, issues.nonblank_lines as f64),
            ),
            ("overall_human_score", self.overall(&issues)),
        ]
    }
}
