//! Identifier descriptiveness and naming-convention consistency

use super::{lexicon, Analyzer};
use crate::features::{per, PreparedSource};
use std::collections::BTreeSet;

/// Function names at least this long count as descriptive.
const LONG_FUNCTION_NAME: usize = 6;
/// Variable names at least this long count as descriptive.
const DESCRIPTIVE_VAR_LEN: usize = 4;
/// Minimum vowel share for an identifier to look like a word.
const MIN_VOWEL_FRACTION: f64 = 0.2;

pub struct NamingPatternAnalyzer;

impl Analyzer for NamingPatternAnalyzer {
    fn namespace(&self) -> &'static str {
        "naming"
    }

    fn analyze(&self, source: &PreparedSource) -> Vec<(&'static str, f64)> {
        let masked = source.masked.as_str();
        let vars: Vec<String> = lexicon::declarations(masked)
            .into_iter()
            .map(|d| d.name)
            .collect();
        let functions = lexicon::function_names(masked);
        let identifiers: BTreeSet<&str> = lexicon::identifiers(&source.masked_lines)
            .into_iter()
            .collect();

        let total_vars = vars.len() as f64;
        let generic = vars.iter().filter(|v| lexicon::is_generic(v)).count();
        let descriptive = vars
            .iter()
            .filter(|v| !lexicon::is_generic(v))
            .filter(|v| {
                v.chars().count() >= DESCRIPTIVE_VAR_LEN
                    || lexicon::is_camel_case(v)
                    || lexicon::is_snake_case(v)
            })
            .count();
        let abbreviated = vars.iter().filter(|v| is_abbreviation(v)).count();

        let total_functions = functions.len() as f64;
        let verb_prefixed = functions.iter().filter(|f| has_verb_prefix(f)).count();
        let long_names = functions
            .iter()
            .filter(|f| f.chars().count() >= LONG_FUNCTION_NAME)
            .count();

        let meaningful = identifiers.iter().filter(|id| is_meaningful(id)).count();
        let camel = identifiers.iter().filter(|id| lexicon::is_camel_case(id)).count();
        let snake = identifiers.iter().filter(|id| lexicon::is_snake_case(id)).count();
        let consistency = if camel + snake == 0 {
            0.0
        } else {
            camel.max(snake) as f64 / (camel + snake) as f64
        };

        vec![
            ("descriptive_var_ratio", per(descriptive as f64, total_vars)),
            ("generic_var_ratio", per(generic as f64, total_vars)),
            ("verb_function_ratio", per(verb_prefixed as f64, total_functions)),
            ("descriptive_function_ratio", per(long_names as f64, total_functions)),
            ("meaningful_names_score", per(meaningful as f64, identifiers.len() as f64)),
            ("naming_consistency_score", consistency),
            ("abbreviation_ratio", per(abbreviated as f64, total_vars)),
        ]
    }
}

fn has_verb_prefix(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lexicon::FUNCTION_VERBS.iter().any(|verb| lower.starts_with(verb))
}

/// Looks like an English word: long enough, not generic, has vowels.
fn is_meaningful(name: &str) -> bool {
    name.chars().count() >= 3
        && !lexicon::GENERIC_NAMES.contains(&name.to_ascii_lowercase().as_str())
        && lexicon::vowel_fraction(name) > MIN_VOWEL_FRACTION
}

/// Short, vowel-less names such as `cnt`, `ptr`, `msg`.
fn is_abbreviation(name: &str) -> bool {
    let len = name.chars().count();
    (2..=4).contains(&len) && !lexicon::is_generic(name) && lexicon::vowel_fraction(name) == 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceUnit;
    use rustc_hash::FxHashMap;

    fn run(text: &str) -> FxHashMap<&'static str, f64> {
        NamingPatternAnalyzer
            .analyze(&PreparedSource::new(&SourceUnit::new(text, "t.c")))
            .into_iter()
            .collect()
    }

    #[test]
    fn test_descriptive_names() {
        let f = run("int calculateTotal(int itemCount, int unitPrice) {\n    int totalPrice = itemCount * unitPrice;\n    return totalPrice;\n}\n");
        assert_eq!(f["descriptive_var_ratio"], 1.0);
        assert_eq!(f["generic_var_ratio"], 0.0);
        assert_eq!(f["verb_function_ratio"], 1.0);
        assert_eq!(f["descriptive_function_ratio"], 1.0);
        assert_eq!(f["naming_consistency_score"], 1.0);
    }

    #[test]
    fn test_generic_names() {
        let f = run("int main() {\n    int i, j, tmp;\n    int cnt = 0;\n    return 0;\n}\n");
        assert_eq!(f["generic_var_ratio"], 0.75);
        assert_eq!(f["abbreviation_ratio"], 0.25);
        // `main` is not judged
        assert_eq!(f["verb_function_ratio"], 0.0);
    }

    #[test]
    fn test_verb_ratio_uses_fixed_verb_set() {
        let f = run("void printTable(int rows) {\n    puts(\"-\");\n}\nint isPrime(int value) {\n    return value > 1;\n}\nint main() {\n    printTable(3);\n    return isPrime(7);\n}\n");
        assert_eq!(f["verb_function_ratio"], 0.0);
        assert_eq!(f["descriptive_function_ratio"], 1.0);

        let f = run("int getCount(void);\nvoid printTable(int rows);\n");
        assert_eq!(f["verb_function_ratio"], 0.5);
    }

    #[test]
    fn test_mixed_conventions() {
        let f = run("int firstValue = 1;\nint second_value = 2;\nint thirdValue = 3;\n");
        assert!((f["naming_consistency_score"] - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_meaningful_names() {
        assert!(is_meaningful("total"));
        assert!(!is_meaningful("tmp"));
        assert!(!is_meaningful("xyz"));
        assert!(!is_meaningful("ab"));
    }

    #[test]
    fn test_empty_input() {
        let f = run("");
        assert!(f.values().all(|v| *v == 0.0));
    }
}
