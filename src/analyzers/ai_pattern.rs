//! Template, boilerplate and defensive-programming idiom density
//!
//! Generated C tends to reach for the same textbook skeleton: canonical
//! includes, `int main()`, `return 0;`, explicit NULL checks around every
//! allocation. Each idiom family is a regex table so the list can grow
//! without touching the scoring.

use super::{lexicon, Analyzer};
use crate::features::{per, PreparedSource};
use regex::Regex;
use std::sync::OnceLock;

/// Files shorter than this with several functions look over-engineered.
const SHORT_FILE_LOC: usize = 50;

const TEMPLATE_PATTERNS: &[&str] = &[
    r"#\s*include\s*<stdio\.h>",
    r"#\s*include\s*<stdlib\.h>",
    r"#\s*include\s*<string\.h>",
    r"#\s*include\s*<iostream>",
    r"\bint\s+main\s*\(\s*(?:void)?\s*\)",
    r"\breturn\s+0\s*;",
    r"\busing\s+namespace\s+std\s*;",
    r"\bif\s*\(\s*\w+\s*==\s*NULL\s*\)",
    r"\bif\s*\(\s*\w+\s*==\s*nullptr\s*\)",
    r"\bmalloc\s*\([^;]*sizeof\s*\(",
    r"\bfree\s*\(\s*\w+\s*\)\s*;",
];

const ERROR_HANDLING_PATTERNS: &[&str] = &[
    r"[!=]=\s*NULL\b",
    r"\bNULL\s*[!=]=",
    r"[!=]=\s*nullptr\b",
    r"\bif\s*\(\s*!\s*\w+",
    r"\berrno\b",
    r"\bperror\s*\(",
    r"\bfprintf\s*\(\s*stderr",
    r"\bstd::cerr\b",
    r"\bexit\s*\(\s*(?:1|EXIT_FAILURE)\s*\)",
    r"\breturn\s+-1\s*;",
    r"\btry\s*\{",
    r"\bcatch\s*\(",
    r"\bthrow\b",
];

const DEFENSIVE_PATTERNS: &[&str] = &[
    r"(?i)\bassert\w*\s*\(",
    r"(?i)\b\w*(?:check|validate|verify|bounds)\w*\b",
];

static TEMPLATE: OnceLock<Vec<Regex>> = OnceLock::new();
static ERROR_HANDLING: OnceLock<Vec<Regex>> = OnceLock::new();
static DEFENSIVE: OnceLock<Vec<Regex>> = OnceLock::new();
static FORMAL_COMMENT: OnceLock<Regex> = OnceLock::new();

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect()
}

fn template_res() -> &'static [Regex] {
    TEMPLATE.get_or_init(|| compile(TEMPLATE_PATTERNS))
}

fn error_handling_res() -> &'static [Regex] {
    ERROR_HANDLING.get_or_init(|| compile(ERROR_HANDLING_PATTERNS))
}

fn defensive_res() -> &'static [Regex] {
    DEFENSIVE.get_or_init(|| compile(DEFENSIVE_PATTERNS))
}

fn formal_comment_re() -> &'static Regex {
    FORMAL_COMMENT.get_or_init(|| Regex::new(r"^\s*[A-Z][a-z]+(?:\s+\S+){2,}").expect("valid regex"))
}

fn count_matches(res: &[Regex], lines: &[String]) -> usize {
    lines
        .iter()
        .map(|line| res.iter().map(|re| re.find_iter(line).count()).sum::<usize>())
        .sum()
}

/// Lines that carry structure but no logic.
fn is_boilerplate(line: &str) -> bool {
    let t = line.trim();
    lexicon::is_include(t)
        || t.starts_with("using namespace")
        || matches!(t, "{" | "}" | "};" | "return 0;")
}

pub struct AiPatternAnalyzer;

impl Analyzer for AiPatternAnalyzer {
    fn namespace(&self) -> &'static str {
        "ai_pattern"
    }

    fn analyze(&self, source: &PreparedSource) -> Vec<(&'static str, f64)> {
        let loc = source.loc();
        let loc_f = loc as f64;

        let templates = count_matches(template_res(), &source.masked_lines);
        let errors = count_matches(error_handling_res(), &source.masked_lines);
        let defensive = count_matches(defensive_res(), &source.masked_lines);
        let boilerplate = source.code_lines.iter().filter(|l| is_boilerplate(l)).count();

        let functions = source.functions.len();
        let over_engineering = if loc > 0 && loc < SHORT_FILE_LOC && functions > 1 {
            functions as f64 / loc_f
        } else {
            0.0
        };

        let formal = source
            .line_comments
            .iter()
            .filter(|c| formal_comment_re().is_match(c))
            .count();

        vec![
            ("template_usage_score", per(templates as f64, loc_f)),
            ("boilerplate_ratio", per(boilerplate as f64, loc_f)),
            ("error_handling_score", per(errors as f64, loc_f)),
            ("defensive_programming_score", per(defensive as f64, loc_f)),
            ("over_engineering_score", over_engineering),
            (
                "formal_comment_ratio",
                per(formal as f64, source.line_comments.len() as f64),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceUnit;
    use rustc_hash::FxHashMap;

    fn run(text: &str) -> FxHashMap<&'static str, f64> {
        AiPatternAnalyzer
            .analyze(&PreparedSource::new(&SourceUnit::new(text, "t.c")))
            .into_iter()
            .collect()
    }

    #[test]
    fn test_template_density() {
        let f = run("#include <stdio.h>\nint main() {\n    return 0;\n}\n");
        // include, main, return 0 over 4 lines
        assert_eq!(f["template_usage_score"], 0.75);
        // include, return 0, closing brace
        assert_eq!(f["boilerplate_ratio"], 0.75);
    }

    #[test]
    fn test_error_handling_and_defensive() {
        let src = "int *p = malloc(n * sizeof(int));\nif (p == NULL) {\n    perror(\"malloc\");\n    return -1;\n}\nassert(n > 0);\nvalidateInput(p);\n";
        let f = run(src);
        // == NULL, perror, return -1
        assert_eq!(f["error_handling_score"], 3.0 / 7.0);
        // assert(, validateInput
        assert_eq!(f["defensive_programming_score"], 2.0 / 7.0);
        assert!(f["template_usage_score"] > 0.0);
    }

    #[test]
    fn test_over_engineering_only_for_short_files() {
        let small = "int a() {\n return 1;\n}\nint b() {\n return 2;\n}\n";
        assert_eq!(run(small)["over_engineering_score"], 2.0 / 6.0);

        let single = "int a() {\n return 1;\n}\n";
        assert_eq!(run(single)["over_engineering_score"], 0.0);
    }

    #[test]
    fn test_formal_comments() {
        let f = run("// Compute the running total here\nint x; // tmp\n");
        assert_eq!(f["formal_comment_ratio"], 0.5);
    }

    #[test]
    fn test_strings_do_not_trigger_patterns() {
        let f = run("puts(\"return 0; using namespace std;\");\n");
        assert_eq!(f["template_usage_score"], 0.0);
    }

    #[test]
    fn test_empty_input() {
        let f = run("");
        assert!(f.values().all(|v| *v == 0.0));
    }
}
