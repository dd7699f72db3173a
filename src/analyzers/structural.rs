//! Pseudo-AST structural metrics
//!
//! Works on comment-stripped, literal-masked lines. Nothing here parses C:
//! depth comes from indentation, control flow from `keyword (` matches,
//! functions from typed headers plus brace balancing. Raw counts are emitted
//! alongside their `_per_loc` / `_ratio` normalizations.

use super::lexicon::{self, Declaration};
use super::Analyzer;
use crate::features::{per, PreparedSource};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Columns per indentation level.
const INDENT_WIDTH: usize = 4;

static IF_RE: OnceLock<Regex> = OnceLock::new();
static FOR_RE: OnceLock<Regex> = OnceLock::new();
static WHILE_RE: OnceLock<Regex> = OnceLock::new();
static SWITCH_RE: OnceLock<Regex> = OnceLock::new();
static MAGIC_RE: OnceLock<Regex> = OnceLock::new();
static STRING_RE: OnceLock<Regex> = OnceLock::new();
static DEFINE_RE: OnceLock<Regex> = OnceLock::new();
static OPERATOR_RE: OnceLock<Regex> = OnceLock::new();

fn if_re() -> &'static Regex {
    IF_RE.get_or_init(|| Regex::new(r"\bif\s*\(").expect("valid regex"))
}

fn for_re() -> &'static Regex {
    FOR_RE.get_or_init(|| Regex::new(r"\bfor\s*\(").expect("valid regex"))
}

fn while_re() -> &'static Regex {
    WHILE_RE.get_or_init(|| Regex::new(r"\bwhile\s*\(").expect("valid regex"))
}

fn switch_re() -> &'static Regex {
    SWITCH_RE.get_or_init(|| Regex::new(r"\bswitch\s*\(").expect("valid regex"))
}

fn magic_re() -> &'static Regex {
    MAGIC_RE.get_or_init(|| Regex::new(r"\b\d{2,}\b").expect("valid regex"))
}

fn string_re() -> &'static Regex {
    STRING_RE.get_or_init(|| Regex::new(r#""(?:\\.|[^"\\])*""#).expect("valid regex"))
}

fn define_re() -> &'static Regex {
    DEFINE_RE.get_or_init(|| Regex::new(r"^\s*#\s*define\s+\w+").expect("valid regex"))
}

fn operator_re() -> &'static Regex {
    OPERATOR_RE.get_or_init(|| {
        Regex::new(r"\b\w+(\s*)(==|!=|<=|>=|&&|\|\||[-+*/%<>=])(\s*)\w+").expect("valid regex")
    })
}

pub struct StructuralAnalyzer;

/// Raw structural measurements before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuralMetrics {
    pub loc: usize,
    pub total_nodes: usize,
    pub max_depth: usize,
    pub avg_depth: f64,
    pub branching_factor: f64,
    pub if_statements: usize,
    pub for_loops: usize,
    pub while_loops: usize,
    pub switch_statements: usize,
    pub nested_control_depth: usize,
    pub function_count: usize,
    pub avg_function_length: f64,
    pub max_function_length: usize,
    pub recursive_functions: usize,
    pub variable_count: usize,
    pub unique_variable_names: usize,
    pub avg_variable_name_length: f64,
    pub camel_case_vars: usize,
    pub snake_case_vars: usize,
    pub single_char_vars: usize,
    pub hungarian_notation: usize,
    pub magic_numbers: usize,
    pub string_literals: usize,
    pub include_count: usize,
    pub macro_count: usize,
    pub indentation_consistency: f64,
    pub brace_style_consistency: f64,
    pub operator_spacing_consistency: f64,
}

impl StructuralAnalyzer {
    pub fn measure(&self, source: &PreparedSource) -> StructuralMetrics {
        let mut m = StructuralMetrics {
            loc: source.loc(),
            ..Default::default()
        };
        if source.is_empty() {
            return m;
        }
        self.measure_depth(source, &mut m);
        self.measure_control_flow(source, &mut m);
        self.measure_functions(source, &mut m);
        self.measure_variables(&lexicon::declarations(&source.masked), &mut m);
        self.measure_literals(source, &mut m);
        self.measure_style(source, &mut m);

        let statements: usize = source.masked_lines.iter().map(|l| l.matches(';').count()).sum();
        let blocks: usize = source.masked_lines.iter().map(|l| l.matches('{').count()).sum();
        m.total_nodes = statements
            + blocks
            + m.if_statements
            + m.for_loops
            + m.while_loops
            + m.switch_statements
            + m.function_count;
        m
    }

    fn measure_depth(&self, source: &PreparedSource, m: &mut StructuralMetrics) {
        let depths: Vec<usize> = source
            .code_lines
            .iter()
            .map(|l| lexicon::indent_columns(l) / INDENT_WIDTH)
            .collect();
        m.max_depth = depths.iter().copied().max().unwrap_or(0);
        m.avg_depth = per(depths.iter().sum::<usize>() as f64, depths.len() as f64);
        let open_braces: usize = source.masked_lines.iter().map(|l| l.matches('{').count()).sum();
        m.branching_factor = per(open_braces as f64, source.loc() as f64);
    }

    fn measure_control_flow(&self, source: &PreparedSource, m: &mut StructuralMetrics) {
        for line in &source.masked_lines {
            m.if_statements += if_re().find_iter(line).count();
            m.for_loops += for_re().find_iter(line).count();
            m.while_loops += while_re().find_iter(line).count();
            m.switch_statements += switch_re().find_iter(line).count();
        }
        let mut deepest = 0;
        lexicon::walk_nesting(&source.masked_lines, |depth| deepest = deepest.max(depth));
        m.nested_control_depth = deepest;
    }

    fn measure_functions(&self, source: &PreparedSource, m: &mut StructuralMetrics) {
        let defs = &source.functions;
        m.function_count = defs.len();
        m.max_function_length = defs.iter().map(|d| d.length).max().unwrap_or(0);
        m.avg_function_length = per(
            defs.iter().map(|d| d.length).sum::<usize>() as f64,
            defs.len() as f64,
        );
        m.recursive_functions = defs.iter().filter(|d| d.is_recursive(&source.masked)).count();
    }

    fn measure_variables(&self, decls: &[Declaration], m: &mut StructuralMetrics) {
        m.variable_count = decls.len();
        let unique: HashSet<&str> = decls.iter().map(|d| d.name.as_str()).collect();
        m.unique_variable_names = unique.len();
        m.avg_variable_name_length = per(
            decls.iter().map(|d| d.name.chars().count()).sum::<usize>() as f64,
            decls.len() as f64,
        );
        for d in decls {
            let name = d.name.as_str();
            if lexicon::is_camel_case(name) {
                m.camel_case_vars += 1;
            }
            if lexicon::is_snake_case(name) {
                m.snake_case_vars += 1;
            }
            if name.chars().count() == 1 && !d.in_for_header {
                m.single_char_vars += 1;
            }
            if lexicon::is_hungarian(name) {
                m.hungarian_notation += 1;
            }
        }
    }

    fn measure_literals(&self, source: &PreparedSource, m: &mut StructuralMetrics) {
        for (code, masked) in source.code_lines.iter().zip(&source.masked_lines) {
            if lexicon::is_include(code) {
                m.include_count += 1;
                continue;
            }
            if define_re().is_match(code) {
                m.macro_count += 1;
                continue;
            }
            m.magic_numbers += magic_re().find_iter(masked).count();
            m.string_literals += string_re().find_iter(code).count();
        }
    }

    fn measure_style(&self, source: &PreparedSource, m: &mut StructuralMetrics) {
        let (mut spaces, mut tabs) = (0usize, 0usize);
        for line in &source.code_lines {
            match line.chars().next() {
                Some(' ') => spaces += 1,
                Some('\t') => tabs += 1,
                _ => {}
            }
        }
        m.indentation_consistency = dominance(spaces, tabs);

        let (mut own_line, mut same_line) = (0usize, 0usize);
        for line in &source.masked_lines {
            let trimmed = line.trim_start();
            if trimmed.starts_with('{') {
                own_line += 1;
            } else if trimmed.contains('{') && !trimmed.contains("= {") && !trimmed.contains("={") {
                same_line += 1;
            }
        }
        m.brace_style_consistency = dominance(own_line, same_line);

        let (mut spaced, mut total) = (0usize, 0usize);
        for line in source.masked_lines.iter().filter(|l| !lexicon::is_preprocessor(l)) {
            for caps in operator_re().captures_iter(line) {
                total += 1;
                let before = caps.get(1).map_or(0, |g| g.len());
                let after = caps.get(3).map_or(0, |g| g.len());
                if before > 0 && after > 0 {
                    spaced += 1;
                }
            }
        }
        m.operator_spacing_consistency = if total == 0 {
            0.0
        } else {
            spaced as f64 / total as f64
        };
    }
}

/// `max(a, b) / (a + b)`, or 0 when neither occurs.
fn dominance(a: usize, b: usize) -> f64 {
    if a + b == 0 {
        0.0
    } else {
        a.max(b) as f64 / (a + b) as f64
    }
}

impl StructuralMetrics {
    /// Raw values followed by the normalization pass.
    pub fn features(&self) -> Vec<(&'static str, f64)> {
        let loc = self.loc as f64;
        let vars = self.variable_count as f64;
        vec![
            ("total_nodes", self.total_nodes as f64),
            ("max_depth", self.max_depth as f64),
            ("avg_depth", self.avg_depth),
            ("branching_factor", self.branching_factor),
            ("if_statements", self.if_statements as f64),
            ("for_loops", self.for_loops as f64),
            ("while_loops", self.while_loops as f64),
            ("switch_statements", self.switch_statements as f64),
            ("nested_control_depth", self.nested_control_depth as f64),
            ("function_count", self.function_count as f64),
            ("avg_function_length", self.avg_function_length),
            ("max_function_length", self.max_function_length as f64),
            ("recursive_functions", self.recursive_functions as f64),
            ("variable_count", vars),
            ("unique_variable_names", self.unique_variable_names as f64),
            ("avg_variable_name_length", self.avg_variable_name_length),
            ("camel_case_vars", self.camel_case_vars as f64),
            ("snake_case_vars", self.snake_case_vars as f64),
            ("single_char_vars", self.single_char_vars as f64),
            ("hungarian_notation", self.hungarian_notation as f64),
            ("magic_numbers", self.magic_numbers as f64),
            ("string_literals", self.string_literals as f64),
            ("include_count", self.include_count as f64),
            ("macro_count", self.macro_count as f64),
            ("indentation_consistency", self.indentation_consistency),
            ("brace_style_consistency", self.brace_style_consistency),
            ("operator_spacing_consistency", self.operator_spacing_consistency),
            ("nodes_per_loc", per(self.total_nodes as f64, loc)),
            ("if_statements_per_loc", per(self.if_statements as f64, loc)),
            ("for_loops_per_loc", per(self.for_loops as f64, loc)),
            ("while_loops_per_loc", per(self.while_loops as f64, loc)),
            ("switch_statements_per_loc", per(self.switch_statements as f64, loc)),
            ("functions_per_loc", per(self.function_count as f64, loc)),
            ("variables_per_loc", per(vars, loc)),
            ("magic_numbers_per_loc", per(self.magic_numbers as f64, loc)),
            ("string_literals_per_loc", per(self.string_literals as f64, loc)),
            ("includes_per_loc", per(self.include_count as f64, loc)),
            ("macros_per_loc", per(self.macro_count as f64, loc)),
            ("camel_case_ratio", per(self.camel_case_vars as f64, vars)),
            ("snake_case_ratio", per(self.snake_case_vars as f64, vars)),
            ("single_char_vars_ratio", per(self.single_char_vars as f64, vars)),
            ("hungarian_ratio", per(self.hungarian_notation as f64, vars)),
            ("variable_uniqueness_ratio", per(self.unique_variable_names as f64, vars)),
            (
                "recursive_function_ratio",
                per(self.recursive_functions as f64, self.function_count as f64),
            ),
        ]
    }
}

impl Analyzer for StructuralAnalyzer {
    fn namespace(&self) -> &'static str {
        "ast"
    }

    fn analyze(&self, source: &PreparedSource) -> Vec<(&'static str, f64)> {
        self.measure(source).features()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceUnit;

    fn measure(text: &str) -> StructuralMetrics {
        StructuralAnalyzer.measure(&PreparedSource::new(&SourceUnit::new(text, "t.c")))
    }

    const SAMPLE: &str = r#"#include <stdio.h>
#define LIMIT 100

int sumValues(int count) {
    int total_sum = 0;
    for (int i = 0; i < count; i++) {
        if (i % 2 == 0) {
            total_sum += i;
        }
    }
    return total_sum;
}

int main() {
    int x = sumValues(42);
    printf("%d\n", x);
    return 0;
}
"#;

    #[test]
    fn test_control_flow_counts() {
        let m = measure(SAMPLE);
        assert_eq!(m.if_statements, 1);
        assert_eq!(m.for_loops, 1);
        assert_eq!(m.while_loops, 0);
        assert_eq!(m.nested_control_depth, 2);
    }

    #[test]
    fn test_functions_and_variables() {
        let m = measure(SAMPLE);
        assert_eq!(m.function_count, 2);
        assert_eq!(m.max_function_length, 9);
        assert_eq!(m.recursive_functions, 0);
        // count, total_sum, i, x
        assert_eq!(m.variable_count, 4);
        assert_eq!(m.snake_case_vars, 1);
        // `i` is a loop variable, only `x` counts
        assert_eq!(m.single_char_vars, 1);
    }

    #[test]
    fn test_literals_and_directives() {
        let m = measure(SAMPLE);
        assert_eq!(m.include_count, 1);
        assert_eq!(m.macro_count, 1);
        assert_eq!(m.magic_numbers, 1);
        assert_eq!(m.string_literals, 1);
    }

    #[test]
    fn test_style_consistency() {
        let m = measure(SAMPLE);
        assert_eq!(m.indentation_consistency, 1.0);
        assert_eq!(m.brace_style_consistency, 1.0);
        assert!(m.operator_spacing_consistency > 0.9);

        let mixed = measure("int f() {\n\tint a;\n    int b;\n\tint c;\n}\nint g()\n{\n}\n");
        assert!((mixed.indentation_consistency - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(mixed.brace_style_consistency, 0.5);
    }

    #[test]
    fn test_normalized_features_divide_by_loc() {
        let m = measure(SAMPLE);
        let features = m.features();
        let get = |n: &str| features.iter().find(|(k, _)| *k == n).unwrap().1;
        assert_eq!(get("if_statements_per_loc"), 1.0 / m.loc as f64);
        assert_eq!(get("single_char_vars_ratio"), 0.25);
        assert_eq!(get("variable_uniqueness_ratio"), 1.0);
    }

    #[test]
    fn test_recursion_detected() {
        let m = measure("int fact(int n) {\n    return n <= 1 ? 1 : n * fact(n - 1);\n}\n");
        assert_eq!(m.recursive_functions, 1);
    }

    #[test]
    fn test_empty_source() {
        let m = measure("");
        assert_eq!(m, StructuralMetrics::default());
        assert!(m.features().iter().all(|(_, v)| v.is_finite() && *v == 0.0));
    }
}
