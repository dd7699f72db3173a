//! Shared pattern tables and lightweight C/C++ lexing helpers
//!
//! The analyzers are deliberately heuristic: no grammar, just the regex
//! tables below plus a few brace-balancing scans. Keeping the tables here
//! lets thresholds and word lists be tuned without touching control flow.

use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};
use std::ops::Range;
use std::sync::OnceLock;

/// C and C++ keywords plus builtin type names; never counted as identifiers.
pub const RESERVED_WORDS: &[&str] = &[
    "alignas", "alignof", "and", "asm", "auto", "bool", "break", "case", "catch", "char",
    "class", "const", "constexpr", "const_cast", "continue", "decltype", "default", "define",
    "delete", "do", "double", "dynamic_cast", "else", "endif", "enum", "explicit", "export",
    "extern", "false", "float", "for", "friend", "goto", "if", "ifdef", "ifndef", "include",
    "inline", "int", "long", "mutable", "namespace", "new", "noexcept", "not", "nullptr",
    "operator", "or", "override", "pragma", "private", "protected", "public", "register",
    "reinterpret_cast", "restrict", "return", "short", "signed", "sizeof", "static",
    "static_assert", "static_cast", "struct", "switch", "template", "this", "throw", "true",
    "try", "typedef", "typeid", "typename", "union", "unsigned", "using", "virtual", "void",
    "volatile", "while", "size_t", "string", "std", "NULL",
];

/// Standard library names that say nothing about the author's naming.
pub const LIBRARY_NAMES: &[&str] = &[
    "printf", "scanf", "fprintf", "sprintf", "snprintf", "puts", "gets", "fgets", "getchar",
    "putchar", "malloc", "calloc", "realloc", "free", "memset", "memcpy", "strlen", "strcpy",
    "strcmp", "strcat", "cout", "cin", "cerr", "endl", "vector", "map", "set", "pair",
    "stdin", "stdout", "stderr", "exit", "main", "FILE", "fopen", "fclose", "abs", "sqrt",
    "pow", "max", "min", "sort", "swap", "push_back", "size", "begin", "end",
];

/// Variable names treated as generic regardless of length.
pub const GENERIC_NAMES: &[&str] = &[
    "i", "j", "k", "n", "m", "x", "y", "z", "a", "b", "c", "temp", "tmp", "val", "value",
    "data", "item", "var",
];

/// Verb prefixes that mark a function name as descriptive. Baseline
/// statistics for `naming.verb_function_ratio` are built on this exact set.
pub const FUNCTION_VERBS: &[&str] = &[
    "get", "set", "calculate", "compute", "process", "handle", "create", "delete", "update",
];

/// Longest initializer or array dimension scanned after a declarator.
/// Unclosed brackets otherwise make every declaration scan to end of file.
const MAX_DECLARATOR_SPAN: usize = 4096;

/// Control keywords that open a nesting level.
pub const CONTROL_KEYWORDS: &[&str] = &["if", "for", "while", "switch", "do"];

const TYPE_QUALIFIERS: &str = r"(?:(?:const|static|unsigned|signed|long|short|register|volatile|extern|inline|constexpr)\s+)*";
const VARIABLE_TYPES: &str = r"(?:int|float|double|char|bool|long|short|size_t|auto|unsigned|signed|std::string|string)";
const RETURN_TYPES: &str = r"(?:int|void|float|double|char|bool|long|short|size_t|auto|unsigned|string|std::\w+(?:<[^;{}()]*>)?|struct\s+\w+)";

static DECL_TYPE: OnceLock<Regex> = OnceLock::new();
static FUNC_HEADER: OnceLock<Regex> = OnceLock::new();
static FUNC_NAME: OnceLock<Regex> = OnceLock::new();
static IDENT: OnceLock<Regex> = OnceLock::new();
static CAMEL: OnceLock<Regex> = OnceLock::new();
static SNAKE: OnceLock<Regex> = OnceLock::new();
static HUNGARIAN: OnceLock<Regex> = OnceLock::new();
static CONTROL_OR_CLOSE: OnceLock<Regex> = OnceLock::new();

fn decl_type_re() -> &'static Regex {
    DECL_TYPE.get_or_init(|| {
        Regex::new(&format!(r"\b{TYPE_QUALIFIERS}{VARIABLE_TYPES}\b")).expect("valid regex")
    })
}

fn func_header_re() -> &'static Regex {
    FUNC_HEADER.get_or_init(|| {
        Regex::new(&format!(
            r"\b{TYPE_QUALIFIERS}{RETURN_TYPES}\s*[*&]*\s*([A-Za-z_]\w*(?:::~?[A-Za-z_]\w*)?)\s*\([^;{{}}]*?\)\s*(?:const\s*)?(?:noexcept\s*)?\{{"
        ))
        .expect("valid regex")
    })
}

fn func_name_re() -> &'static Regex {
    FUNC_NAME.get_or_init(|| {
        Regex::new(&format!(
            r"\b{RETURN_TYPES}\s*[*&]*\s*([A-Za-z_]\w*)\s*\("
        ))
        .expect("valid regex")
    })
}

fn ident_re() -> &'static Regex {
    IDENT.get_or_init(|| Regex::new(r"\b[A-Za-z_]\w*\b").expect("valid regex"))
}

fn camel_re() -> &'static Regex {
    CAMEL.get_or_init(|| Regex::new(r"^[a-z][a-z0-9]*[A-Z][A-Za-z0-9]*$").expect("valid regex"))
}

fn snake_re() -> &'static Regex {
    SNAKE.get_or_init(|| Regex::new(r"^[a-z][a-z0-9]*(?:_[a-z0-9]+)+$").expect("valid regex"))
}

fn hungarian_re() -> &'static Regex {
    HUNGARIAN.get_or_init(|| {
        Regex::new(r"^(?:(?:str|sz|psz|lp|dw|ch|pp|n|i|u|b|f|d|c|p|w|h)[A-Z]|[mgs]_)\w*$")
            .expect("valid regex")
    })
}

fn control_or_close_re() -> &'static Regex {
    CONTROL_OR_CLOSE.get_or_init(|| {
        Regex::new(&format!(r"\b(?:{})\b|\}}", CONTROL_KEYWORDS.join("|"))).expect("valid regex")
    })
}

pub fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS.contains(&word) || LIBRARY_NAMES.contains(&word)
}

pub fn is_generic(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    GENERIC_NAMES.contains(&lower.as_str()) || name.chars().count() <= 2
}

pub fn is_camel_case(name: &str) -> bool {
    camel_re().is_match(name)
}

pub fn is_snake_case(name: &str) -> bool {
    snake_re().is_match(name)
}

pub fn is_hungarian(name: &str) -> bool {
    hungarian_re().is_match(name)
}

/// Fraction of ASCII vowels among the name's letters.
pub fn vowel_fraction(name: &str) -> f64 {
    let letters = name.chars().filter(|c| c.is_ascii_alphabetic()).count();
    if letters == 0 {
        return 0.0;
    }
    let vowels = name
        .chars()
        .filter(|c| matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u'))
        .count();
    vowels as f64 / letters as f64
}

pub fn is_preprocessor(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

pub fn is_include(line: &str) -> bool {
    line.trim_start()
        .strip_prefix('#')
        .is_some_and(|rest| rest.trim_start().starts_with("include"))
}

/// A declared variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    /// Declared inside a `for (` header, i.e. a loop induction variable
    pub in_for_header: bool,
}

/// Variables declared with a builtin type, including parameters and
/// comma-separated declarator lists.
pub fn declarations(masked: &str) -> Vec<Declaration> {
    let mut out = Vec::new();
    for m in decl_type_re().find_iter(masked) {
        let in_for_header = follows_for_paren(&masked[..m.start()]);
        let bytes = masked.as_bytes();
        let mut pos = m.end();
        let mut first = true;
        loop {
            pos = skip_while(bytes, pos, |b| b.is_ascii_whitespace() || b == b'*' || b == b'&');
            let Some((name, end)) = read_ident(masked, pos) else {
                break;
            };
            if is_reserved(name) {
                break;
            }
            pos = skip_while(bytes, end, |b| b.is_ascii_whitespace());
            // Array dimensions
            while bytes.get(pos) == Some(&b'[') {
                pos = skip_balanced(bytes, pos);
                pos = skip_while(bytes, pos, |b| b.is_ascii_whitespace());
            }
            match bytes.get(pos) {
                // Function header or prototype, not a variable
                Some(b'(') if first => break,
                Some(b'=') => {
                    out.push(Declaration {
                        name: name.to_string(),
                        in_for_header,
                    });
                    pos = skip_initializer(bytes, pos + 1);
                }
                _ => out.push(Declaration {
                    name: name.to_string(),
                    in_for_header,
                }),
            }
            if bytes.get(pos) == Some(&b',') {
                pos += 1;
                first = false;
                continue;
            }
            break;
        }
    }
    out
}

/// A function definition (header followed by a body).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef {
    pub name: String,
    /// Byte range of the body in the masked text, braces excluded
    pub span: Range<usize>,
    /// Lines from the opening brace to the end of the body
    pub length: usize,
}

impl FunctionDef {
    pub fn body<'a>(&self, masked: &'a str) -> &'a str {
        masked.get(self.span.clone()).unwrap_or_default()
    }

    /// Whether the function's own name appears inside its body.
    pub fn is_recursive(&self, masked: &str) -> bool {
        let short = self.name.rsplit("::").next().unwrap_or(&self.name);
        ident_re()
            .find_iter(self.body(masked))
            .any(|m| m.as_str() == short)
    }
}

/// Function definitions with a builtin or `struct` return type.
///
/// A body ends at its matching `}`. Bodies never contain another header:
/// when the closer is missing or lies past the next header, the body stops
/// where that header starts. Every byte belongs to at most one body.
pub fn function_definitions(masked: &str) -> Vec<FunctionDef> {
    let headers: Vec<(usize, usize, &str)> = func_header_re()
        .captures_iter(masked)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?.as_str();
            let short = name.rsplit("::").next().unwrap_or(name);
            if is_reserved(short) && short != "main" {
                return None;
            }
            Some((whole.start(), whole.end() - 1, name))
        })
        .collect();
    if headers.is_empty() {
        return Vec::new();
    }

    let closers = brace_pairs(masked.as_bytes());
    headers
        .iter()
        .enumerate()
        .map(|(i, &(_, open, name))| {
            let limit = headers.get(i + 1).map_or(masked.len(), |next| next.0);
            let (close, text) = match closers.get(&open).copied() {
                Some(close) if close <= limit => (close, &masked[open..close]),
                _ => (limit, masked[open..limit].trim_end()),
            };
            let length = text.matches('\n').count() + 1;
            FunctionDef {
                name: name.to_string(),
                span: open + 1..close,
                length,
            }
        })
        .collect()
}

/// Names of declared or defined functions, first occurrence order, no
/// repeats. `main` and library names are left out.
pub fn function_names(masked: &str) -> Vec<String> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut names: Vec<String> = Vec::new();
    for caps in func_name_re().captures_iter(masked) {
        let Some(name) = caps.get(1).map(|m| m.as_str()) else {
            continue;
        };
        if is_reserved(name) || !seen.insert(name) {
            continue;
        }
        names.push(name.to_string());
    }
    names
}

/// Identifier occurrences outside `#include` lines, reserved words skipped.
pub fn identifiers<'a>(masked_lines: &'a [String]) -> Vec<&'a str> {
    masked_lines
        .iter()
        .filter(|line| !is_include(line))
        .flat_map(|line| ident_re().find_iter(line).map(|m| m.as_str()))
        .filter(|w| !is_reserved(w))
        .collect()
}

/// Walk control keywords and closing braces in order. Each keyword calls
/// `on_open(depth_after_increment)`; each `}` decrements, floored at 0.
pub fn walk_nesting(masked_lines: &[String], mut on_open: impl FnMut(usize)) {
    let mut depth = 0usize;
    for line in masked_lines {
        for m in control_or_close_re().find_iter(line) {
            if m.as_str() == "}" {
                depth = depth.saturating_sub(1);
            } else {
                depth += 1;
                on_open(depth);
            }
        }
    }
}

/// Expand leading whitespace to columns, counting a tab as four.
pub fn indent_columns(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

fn follows_for_paren(before: &str) -> bool {
    let trimmed = before.trim_end();
    let Some(rest) = trimmed.strip_suffix('(') else {
        return false;
    };
    let rest = rest.trim_end();
    rest.ends_with("for")
        && !rest[..rest.len() - 3]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
}

fn skip_while(bytes: &[u8], mut pos: usize, pred: impl Fn(u8) -> bool) -> usize {
    while pos < bytes.len() && pred(bytes[pos]) {
        pos += 1;
    }
    pos
}

fn read_ident(text: &str, pos: usize) -> Option<(&str, usize)> {
    let bytes = text.as_bytes();
    let first = *bytes.get(pos)?;
    if !(first.is_ascii_alphabetic() || first == b'_') {
        return None;
    }
    let end = skip_while(bytes, pos, |b| b.is_ascii_alphanumeric() || b == b'_');
    Some((&text[pos..end], end))
}

/// Skip a bracketed group starting at `pos`; returns the index after it.
fn skip_balanced(bytes: &[u8], pos: usize) -> usize {
    let mut depth = 0i32;
    let mut i = pos;
    let end = bytes.len().min(pos.saturating_add(MAX_DECLARATOR_SPAN));
    while i < end {
        match bytes[i] {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => {
                depth -= 1;
                if depth <= 0 {
                    return i + 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    end
}

/// Skip an initializer expression up to the next top-level `,` `;` or
/// unmatched closer.
fn skip_initializer(bytes: &[u8], pos: usize) -> usize {
    let mut depth = 0i32;
    let mut i = pos;
    let end = bytes.len().min(pos.saturating_add(MAX_DECLARATOR_SPAN));
    while i < end {
        match bytes[i] {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => {
                if depth == 0 {
                    return i;
                }
                depth -= 1;
            }
            b',' | b';' if depth == 0 => return i,
            _ => {}
        }
        i += 1;
    }
    end
}

/// Opening brace index to closing brace index, one stack pass. Unmatched
/// braces on either side are left out.
fn brace_pairs(bytes: &[u8]) -> FxHashMap<usize, usize> {
    let mut pairs = FxHashMap::default();
    let mut stack = Vec::new();
    for (i, b) in bytes.iter().enumerate() {
        match b {
            b'{' => stack.push(i),
            b'}' => {
                if let Some(open) = stack.pop() {
                    pairs.insert(open, i);
                }
            }
            _ => {}
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(decls: &[Declaration]) -> Vec<&str> {
        decls.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn test_declarations_with_lists_and_initializers() {
        let decls = declarations("int a, b = f(1, 2), c[10];\nunsigned int count = 0;");
        assert_eq!(names(&decls), vec!["a", "b", "c", "count"]);
    }

    #[test]
    fn test_declarations_skip_functions_but_keep_parameters() {
        let decls = declarations("int calculateSum(int firstNumber, int secondNumber) {");
        assert_eq!(names(&decls), vec!["firstNumber", "secondNumber"]);
    }

    #[test]
    fn test_for_header_variables_are_flagged() {
        let decls = declarations("for (int i = 0; i < n; i++) { int total = i; }");
        assert_eq!(decls.len(), 2);
        assert!(decls[0].in_for_header);
        assert_eq!(decls[0].name, "i");
        assert!(!decls[1].in_for_header);
    }

    #[test]
    fn test_casts_are_not_declarations() {
        assert!(declarations("x = (int)y; n = sizeof(int);").is_empty());
    }

    #[test]
    fn test_pointer_declarations() {
        let decls = declarations("char *name = NULL; int* values;");
        assert_eq!(names(&decls), vec!["name", "values"]);
    }

    #[test]
    fn test_function_definitions() {
        let src = "int factorial(int n) {\n    if (n <= 1) {\n        return 1;\n    }\n    return n * factorial(n - 1);\n}\nvoid show(void);\nvoid run()\n{\n    show();\n}";
        let defs = function_definitions(src);
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].name, "factorial");
        assert_eq!(defs[0].length, 6);
        assert!(defs[0].is_recursive(src));
        assert!(defs[0].body(src).contains("factorial(n - 1)"));
        assert_eq!(defs[1].name, "run");
        assert!(!defs[1].is_recursive(src));
        assert_eq!(defs[1].body(src).trim(), "show();");
    }

    #[test]
    fn test_unclosed_bodies_stop_at_next_header() {
        let src = "int f(){\nint g(){\nint h(){\n";
        let defs = function_definitions(src);
        assert_eq!(defs.len(), 3);
        assert_eq!(defs[0].span, 8..9);
        assert_eq!(defs[0].length, 1);
        assert_eq!(defs[1].span.start, 17);
        assert_eq!(defs[2].span.end, src.len());
        let covered: usize = defs.iter().map(|d| d.span.len()).sum();
        assert!(covered <= src.len());
    }

    #[test]
    fn test_closer_past_next_header_is_clamped() {
        // `outer` never closes before `inner` starts
        let src = "int outer() {\n  if (x) {\nint inner() { return 1; }\n}\n";
        let defs = function_definitions(src);
        assert_eq!(defs.len(), 2);
        assert!(defs[0].span.end <= src.find("int inner").unwrap());
        assert_eq!(defs[1].body(src).trim(), "return 1;");
    }

    #[test]
    fn test_brace_pairs_skip_unmatched() {
        let pairs = brace_pairs(b"{ { } } } {");
        assert_eq!(pairs.get(&0), Some(&6));
        assert_eq!(pairs.get(&2), Some(&4));
        assert_eq!(pairs.get(&10), None);
    }

    #[test]
    fn test_unclosed_initializer_scan_is_bounded() {
        let src = "int a[\n".repeat(10_000);
        let decls = declarations(&src);
        assert_eq!(decls.len(), 10_000);
    }

    #[test]
    fn test_function_names_include_prototypes_and_skip_main() {
        let names = function_names("void show(void);\nint main() { show(); return 0; }\nint area(int w);");
        assert_eq!(names, vec!["show", "area"]);
    }

    #[test]
    fn test_identifiers_skip_reserved_and_includes() {
        let lines = vec!["#include <stdio.h>".to_string(), "int total = count + 1;".to_string()];
        assert_eq!(identifiers(&lines), vec!["total", "count"]);
    }

    #[test]
    fn test_name_shapes() {
        assert!(is_camel_case("totalCount"));
        assert!(!is_camel_case("total"));
        assert!(is_snake_case("total_count"));
        assert!(!is_snake_case("total"));
        assert!(is_hungarian("strName"));
        assert!(is_hungarian("m_value"));
        assert!(!is_hungarian("isValid"));
        assert!(is_generic("tmp"));
        assert!(is_generic("ab"));
        assert!(!is_generic("total"));
    }

    #[test]
    fn test_walk_nesting() {
        let lines: Vec<String> = ["if (a) {", "for (;;) {", "}", "}", "while (b) {", "}"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut depths = Vec::new();
        walk_nesting(&lines, |d| depths.push(d));
        assert_eq!(depths, vec![1, 2, 1]);
    }

    #[test]
    fn test_indent_columns() {
        assert_eq!(indent_columns("\tx"), 4);
        assert_eq!(indent_columns("  \tx"), 6);
        assert_eq!(indent_columns("x"), 0);
    }
}
