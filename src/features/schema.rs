//! Fixed feature schema
//!
//! Every feature the analyzers can emit is listed here with its documented
//! bound. [`FeatureVector`](super::FeatureVector) consults this table on
//! insert so that no value outside its bound (or non-finite) ever leaves the
//! extraction stage.

use rustc_hash::FxHashMap;
use std::sync::OnceLock;

/// Ceiling applied to unbounded counts so downstream arithmetic stays finite.
pub const COUNT_CEILING: f64 = 1.0e12;

/// Sentinel used for code-to-comment ratio when a file has code but no comments.
pub const NO_COMMENT_SENTINEL: f64 = 999.0;

/// Upper bound for per-denominator issue rates in the human style analyzer.
pub const ISSUE_RATE_CEILING: f64 = 100.0;

/// Documented value range of a feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// Fraction in `[0, 1]`
    Unit,
    /// Inclusive range
    Range(f64, f64),
    /// Non-negative count or density, capped at [`COUNT_CEILING`]
    Count,
}

impl Bound {
    pub fn lower(&self) -> f64 {
        match self {
            Bound::Unit | Bound::Count => 0.0,
            Bound::Range(lo, _) => *lo,
        }
    }

    pub fn upper(&self) -> f64 {
        match self {
            Bound::Unit => 1.0,
            Bound::Range(_, hi) => *hi,
            Bound::Count => COUNT_CEILING,
        }
    }

    /// Coerce a raw value into this bound. NaN maps to 0, infinities to the
    /// nearest edge.
    pub fn sanitize(&self, value: f64) -> f64 {
        let (lo, hi) = (self.lower(), self.upper());
        if value.is_nan() {
            return 0.0_f64.clamp(lo, hi);
        }
        if value.is_infinite() {
            return if value > 0.0 { hi } else { lo };
        }
        value.clamp(lo, hi)
    }
}

/// One schema entry.
#[derive(Debug, Clone, Copy)]
pub struct FeatureSpec {
    pub name: &'static str,
    pub bound: Bound,
    pub description: &'static str,
}

const fn spec(name: &'static str, bound: Bound, description: &'static str) -> FeatureSpec {
    FeatureSpec {
        name,
        bound,
        description,
    }
}

use Bound::{Count, Unit};

const MI_RANGE: Bound = Bound::Range(0.0, 171.0);
const CODE_COMMENT_RANGE: Bound = Bound::Range(0.0, NO_COMMENT_SENTINEL);
const ISSUE_RANGE: Bound = Bound::Range(0.0, ISSUE_RATE_CEILING);

/// All known features, grouped by namespace.
pub const FEATURES: &[FeatureSpec] = &[
    // basic
    spec("basic.loc", Count, "Non-blank, non-comment-only lines"),
    spec("basic.total_lines", Count, "Physical lines"),
    spec("basic.comment_lines", Count, "Lines carrying a comment"),
    spec("basic.blank_lines", Count, "Whitespace-only lines"),
    spec("basic.comment_ratio", Unit, "Comment lines per physical line"),
    spec("basic.blank_ratio", Unit, "Blank lines per physical line"),
    spec("basic.token_count", Count, "Lexical tokens"),
    spec("basic.tokens_per_loc", Count, "Tokens per line of code"),
    spec("basic.cyclomatic_complexity", Count, "Average cyclomatic complexity per function"),
    // ast
    spec("ast.total_nodes", Count, "Estimated statement and block nodes"),
    spec("ast.max_depth", Count, "Deepest indentation level"),
    spec("ast.avg_depth", Count, "Average indentation level"),
    spec("ast.branching_factor", Count, "Opening braces per line"),
    spec("ast.if_statements", Count, "if statements"),
    spec("ast.for_loops", Count, "for loops"),
    spec("ast.while_loops", Count, "while loops"),
    spec("ast.switch_statements", Count, "switch statements"),
    spec("ast.nested_control_depth", Count, "Deepest control-flow nesting"),
    spec("ast.function_count", Count, "Function definitions"),
    spec("ast.avg_function_length", Count, "Average function length in lines"),
    spec("ast.max_function_length", Count, "Longest function in lines"),
    spec("ast.recursive_functions", Count, "Functions that call themselves"),
    spec("ast.variable_count", Count, "Declared variables"),
    spec("ast.unique_variable_names", Count, "Distinct declared variable names"),
    spec("ast.avg_variable_name_length", Count, "Average declared variable name length"),
    spec("ast.camel_case_vars", Count, "camelCase variables"),
    spec("ast.snake_case_vars", Count, "snake_case variables"),
    spec("ast.single_char_vars", Count, "Single-character variables outside loop headers"),
    spec("ast.hungarian_notation", Count, "Hungarian-style variables"),
    spec("ast.magic_numbers", Count, "Numeric literals with two or more digits"),
    spec("ast.string_literals", Count, "String literals"),
    spec("ast.include_count", Count, "#include directives"),
    spec("ast.macro_count", Count, "#define directives"),
    spec("ast.indentation_consistency", Unit, "Dominance of one indentation character"),
    spec("ast.brace_style_consistency", Unit, "Dominance of one brace placement"),
    spec("ast.operator_spacing_consistency", Unit, "Binary operators spaced on both sides"),
    spec("ast.nodes_per_loc", Count, "Nodes per line of code"),
    spec("ast.if_statements_per_loc", Count, "if statements per line of code"),
    spec("ast.for_loops_per_loc", Count, "for loops per line of code"),
    spec("ast.while_loops_per_loc", Count, "while loops per line of code"),
    spec("ast.switch_statements_per_loc", Count, "switch statements per line of code"),
    spec("ast.functions_per_loc", Count, "Functions per line of code"),
    spec("ast.variables_per_loc", Count, "Declared variables per line of code"),
    spec("ast.magic_numbers_per_loc", Count, "Magic numbers per line of code"),
    spec("ast.string_literals_per_loc", Count, "String literals per line of code"),
    spec("ast.includes_per_loc", Count, "#include directives per line of code"),
    spec("ast.macros_per_loc", Count, "#define directives per line of code"),
    spec("ast.camel_case_ratio", Unit, "camelCase share of declared variables"),
    spec("ast.snake_case_ratio", Unit, "snake_case share of declared variables"),
    spec("ast.single_char_vars_ratio", Unit, "Single-character share of declared variables"),
    spec("ast.hungarian_ratio", Unit, "Hungarian-style share of declared variables"),
    spec("ast.variable_uniqueness_ratio", Unit, "Distinct names per declared variable"),
    spec("ast.recursive_function_ratio", Unit, "Recursive share of functions"),
    // redundancy
    spec("redundancy.duplicate_lines", Count, "Extra occurrences of repeated lines"),
    spec("redundancy.duplicate_line_ratio", Unit, "Repeated lines per line of code"),
    spec("redundancy.repeated_patterns", Count, "Repeated three-line windows"),
    spec("redundancy.repeated_patterns_per_loc", Count, "Repeated windows per line of code"),
    spec("redundancy.copy_paste_score", Unit, "Coverage of the longest copied block"),
    spec("redundancy.similar_function_ratio", Unit, "Functions with a structurally identical twin"),
    // naming
    spec("naming.descriptive_var_ratio", Unit, "Descriptive share of declared variables"),
    spec("naming.generic_var_ratio", Unit, "Generic share of declared variables"),
    spec("naming.verb_function_ratio", Unit, "Verb-prefixed function names"),
    spec("naming.descriptive_function_ratio", Unit, "Long function names"),
    spec("naming.meaningful_names_score", Unit, "Word-like share of identifiers"),
    spec("naming.naming_consistency_score", Unit, "Dominance of camelCase or snake_case"),
    spec("naming.abbreviation_ratio", Unit, "Vowel-less short variable names"),
    // complexity
    spec("complexity.halstead_complexity", Count, "Halstead length times log2 vocabulary"),
    spec("complexity.halstead_per_loc", Count, "Halstead complexity per line of code"),
    spec("complexity.cognitive_complexity", Count, "Nesting-weighted control flow"),
    spec("complexity.cognitive_per_loc", Count, "Cognitive complexity per line of code"),
    spec("complexity.maintainability_index", MI_RANGE, "Maintainability index"),
    spec("complexity.code_to_comment_ratio", CODE_COMMENT_RANGE, "Code lines per comment line"),
    // ai_pattern
    spec("ai_pattern.template_usage_score", Count, "Template idioms per line of code"),
    spec("ai_pattern.boilerplate_ratio", Unit, "Purely structural lines"),
    spec("ai_pattern.error_handling_score", Count, "Error-handling idioms per line of code"),
    spec("ai_pattern.defensive_programming_score", Count, "Validation idioms per line of code"),
    spec("ai_pattern.over_engineering_score", Unit, "Functions per line in short files"),
    spec("ai_pattern.formal_comment_ratio", Unit, "Sentence-style line comments"),
    // human_style
    spec("human_style.spacing_issues_ratio", ISSUE_RANGE, "Spacing issues per non-blank line"),
    spec("human_style.indentation_issues_ratio", ISSUE_RANGE, "Indentation issues per indented line"),
    spec("human_style.naming_inconsistency_ratio", ISSUE_RANGE, "Naming issues per unique identifier"),
    spec("human_style.formatting_issues_ratio", ISSUE_RANGE, "Formatting issues per non-blank line"),
    spec("human_style.trailing_whitespace_ratio", Unit, "Lines ending in whitespace"),
    spec("human_style.mixed_indentation_ratio", Unit, "Indented lines mixing tabs and spaces"),
    spec("human_style.long_line_ratio", Unit, "Lines over 120 characters"),
    spec("human_style.overall_human_score", Unit, "Weighted human irregularity"),
];

/// Namespaces in display order.
pub const NAMESPACES: &[&str] = &[
    "basic",
    "ast",
    "redundancy",
    "naming",
    "complexity",
    "ai_pattern",
    "human_style",
];

static INDEX: OnceLock<FxHashMap<&'static str, &'static FeatureSpec>> = OnceLock::new();

fn index() -> &'static FxHashMap<&'static str, &'static FeatureSpec> {
    INDEX.get_or_init(|| FEATURES.iter().map(|f| (f.name, f)).collect())
}

/// Look up a feature by its namespaced name.
pub fn lookup(name: &str) -> Option<&'static FeatureSpec> {
    index().get(name).copied()
}

pub fn is_known(name: &str) -> bool {
    index().contains_key(name)
}

/// Legacy flat names used by older statistics files.
const LEGACY_ALIASES: &[(&str, &str)] = &[
    ("loc", "basic.loc"),
    ("comment_ratio", "basic.comment_ratio"),
    ("blank_ratio", "basic.blank_ratio"),
    ("cyclomatic_complexity", "basic.cyclomatic_complexity"),
    ("spacing_spacing_issues_ratio", "human_style.spacing_issues_ratio"),
    ("indentation_indentation_issues_ratio", "human_style.indentation_issues_ratio"),
    (
        "naming_inconsistency_naming_inconsistency_ratio",
        "human_style.naming_inconsistency_ratio",
    ),
    ("formatting_formatting_issues_ratio", "human_style.formatting_issues_ratio"),
    ("human_style_overall_score", "human_style.overall_human_score"),
    ("naming_abbreviation_usage", "naming.abbreviation_ratio"),
    ("ast_macro_usage", "ast.macro_count"),
];

/// Map a raw statistics key onto a schema name.
///
/// Accepts namespaced names as-is, the legacy alias table, and the
/// `<namespace>_<feature>` flat form.
pub fn canonical_name(raw: &str) -> Option<&'static str> {
    if let Some(spec) = lookup(raw) {
        return Some(spec.name);
    }
    if let Some((_, canonical)) = LEGACY_ALIASES.iter().find(|(alias, _)| *alias == raw) {
        return lookup(canonical).map(|s| s.name);
    }
    NAMESPACES.iter().find_map(|ns| {
        let rest = raw.strip_prefix(ns)?.strip_prefix('_')?;
        lookup(&format!("{ns}.{rest}")).map(|s| s.name)
    })
}

/// Namespace portion of a feature name (`ast.if_statements` -> `ast`).
pub fn namespace_of(name: &str) -> &str {
    name.split_once('.').map(|(ns, _)| ns).unwrap_or(name)
}
