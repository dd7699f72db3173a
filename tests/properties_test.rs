//! Property tests for extraction and detection
//!
//! Arbitrary text must always produce a complete, bounded, reproducible
//! feature vector and a well-formed result.

use codeorigin::features::schema;
use codeorigin::models::Prediction;
use codeorigin::{detect, extract_features, BaselineProfile};
use proptest::prelude::*;

/// Raw counts and their per-line-of-code forms.
const PER_LOC_PAIRS: &[(&str, &str)] = &[
    ("ast.if_statements", "ast.if_statements_per_loc"),
    ("ast.for_loops", "ast.for_loops_per_loc"),
    ("ast.function_count", "ast.functions_per_loc"),
    ("ast.variable_count", "ast.variables_per_loc"),
    ("complexity.cognitive_complexity", "complexity.cognitive_per_loc"),
    ("redundancy.repeated_patterns", "redundancy.repeated_patterns_per_loc"),
];

/// C-like text without comment or literal delimiters, so a file and its
/// copy preprocess identically.
fn c_like() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-z_]{1,8}( ?[=+*<>;,(){}]){0,4}[ a-z0-9]{0,10}", 0..40)
        .prop_map(|lines| lines.join("\n"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_extraction_is_total_and_bounded(text in any::<String>()) {
        let features = extract_features(&text, "fuzz.c");
        prop_assert!(features.validate().is_empty());
        for (name, value) in features.iter() {
            prop_assert!(value.is_finite(), "{} = {}", name, value);
            let spec = schema::lookup(name).expect("schema feature");
            prop_assert!(value >= spec.bound.lower(), "{} = {}", name, value);
            prop_assert!(value <= spec.bound.upper(), "{} = {}", name, value);
            if name.ends_with("_ratio") || name.ends_with("_per_loc") {
                prop_assert!(value >= 0.0, "{} = {}", name, value);
            }
        }
    }

    #[test]
    fn prop_per_loc_features_divide_by_loc(text in c_like()) {
        let features = extract_features(&text, "norm.c");
        let loc = features.get("basic.loc").expect("basic.loc").max(1.0);
        for (raw, normalized) in PER_LOC_PAIRS {
            let count = features.get(raw).expect("raw count");
            let per_loc = features.get(normalized).expect("per-loc value");
            prop_assert!(
                (per_loc - count / loc).abs() <= 1e-9 * (1.0 + per_loc.abs()),
                "{} = {}, {} = {}, loc = {}", normalized, per_loc, raw, count, loc
            );
        }
    }

    #[test]
    fn prop_pipeline_is_deterministic(text in "\\PC{0,400}") {
        let first = extract_features(&text, "a.cpp");
        let second = extract_features(&text, "a.cpp");
        prop_assert_eq!(&first, &second);

        let profile = BaselineProfile::reference();
        prop_assert_eq!(detect(&first, None), detect(&second, None));
        prop_assert_eq!(detect(&first, Some(&profile)), detect(&second, Some(&profile)));
    }

    #[test]
    fn prop_detection_is_well_formed(text in c_like()) {
        let features = extract_features(&text, "gen.c");
        for profile in [None, Some(BaselineProfile::reference())] {
            let result = detect(&features, profile.as_ref());
            prop_assert!((0.0..=1.0).contains(&result.score));
            prop_assert!((0.0..=1.0).contains(&result.confidence));
            prop_assert!(result.reasoning.len() <= 8);
            if result.prediction == Prediction::AiGenerated {
                prop_assert!(result.score > 0.5);
            }
            if result.prediction == Prediction::HumanWritten {
                prop_assert!(result.score < 0.5);
            }
        }
    }

    #[test]
    fn prop_self_concatenation_does_not_reduce_redundancy(text in c_like()) {
        let once = extract_features(&text, "one.c");
        let twice = extract_features(&format!("{text}\n{text}"), "two.c");
        for name in ["redundancy.duplicate_line_ratio", "redundancy.copy_paste_score"] {
            let before = once.get(name).unwrap_or(0.0);
            let after = twice.get(name).unwrap_or(0.0);
            prop_assert!(after + 1e-12 >= before, "{}: {} -> {}", name, before, after);
        }
    }
}
