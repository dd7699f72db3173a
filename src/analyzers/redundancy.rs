//! Duplicate lines, repeated windows and copy-paste blocks

use super::{lexicon, Analyzer};
use crate::features::{per, PreparedSource};
use regex::{Captures, Regex};
use rustc_hash::FxHashMap;
use std::sync::OnceLock;
use xxhash_rust::xxh3::xxh3_64;

/// Lines scanned pairwise for copy-paste blocks before falling back to the
/// linear window estimate.
pub const DEFAULT_MAX_SCAN_LINES: usize = 5_000;

const WINDOW: usize = 3;

static TOKEN: OnceLock<Regex> = OnceLock::new();

fn token_re() -> &'static Regex {
    TOKEN.get_or_init(|| Regex::new(r"\b[A-Za-z_]\w*\b|\b\d[\w.]*|\s+").expect("valid regex"))
}

pub struct RedundancyAnalyzer {
    max_scan_lines: usize,
}

impl Default for RedundancyAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SCAN_LINES)
    }
}

impl RedundancyAnalyzer {
    pub fn new(max_scan_lines: usize) -> Self {
        Self { max_scan_lines }
    }
}

impl Analyzer for RedundancyAnalyzer {
    fn namespace(&self) -> &'static str {
        "redundancy"
    }

    fn analyze(&self, source: &PreparedSource) -> Vec<(&'static str, f64)> {
        let lines: Vec<&str> = source.code_lines.iter().map(|l| l.trim()).collect();
        let ids = intern(&lines);
        let loc = lines.len() as f64;

        let duplicates = duplicate_lines(&ids);
        let repeated = repeated_windows(&ids);
        let copy_paste = if lines.len() > self.max_scan_lines {
            tracing::debug!(
                "{}: {} lines exceeds copy-paste scan limit, using window estimate",
                source.filename,
                lines.len()
            );
            window_coverage(&ids)
        } else {
            longest_block_coverage(&ids)
        };

        vec![
            ("duplicate_lines", duplicates as f64),
            ("duplicate_line_ratio", per(duplicates as f64, loc)),
            ("repeated_patterns", repeated as f64),
            ("repeated_patterns_per_loc", per(repeated as f64, loc)),
            ("copy_paste_score", per(copy_paste as f64, loc)),
            ("similar_function_ratio", similar_function_ratio(source)),
        ]
    }
}

/// Map each line to a small integer id so comparisons are cheap.
fn intern(lines: &[&str]) -> Vec<u32> {
    let mut table: FxHashMap<&str, u32> = FxHashMap::default();
    lines
        .iter()
        .map(|line| {
            let next = table.len() as u32;
            *table.entry(line).or_insert(next)
        })
        .collect()
}

/// `Σ(count - 1)` over lines that occur more than once.
fn duplicate_lines(ids: &[u32]) -> usize {
    let mut counts: FxHashMap<u32, usize> = FxHashMap::default();
    for id in ids {
        *counts.entry(*id).or_default() += 1;
    }
    counts.values().filter(|c| **c > 1).map(|c| c - 1).sum()
}

fn window_counts(ids: &[u32]) -> FxHashMap<&[u32], usize> {
    let mut counts: FxHashMap<&[u32], usize> = FxHashMap::default();
    for window in ids.windows(WINDOW) {
        *counts.entry(window).or_default() += 1;
    }
    counts
}

/// Extra occurrences of contiguous three-line windows.
fn repeated_windows(ids: &[u32]) -> usize {
    window_counts(ids)
        .values()
        .filter(|c| **c > 1)
        .map(|c| c - 1)
        .sum()
}

/// Lines covered by the longest matching run and its copy.
///
/// Walks every diagonal `d = j - i` once, so O(n²) time and O(1) extra
/// space. For a run of length `L` at distance `d` the two copies cover
/// `L + min(L, d)` distinct lines.
fn longest_block_coverage(ids: &[u32]) -> usize {
    let n = ids.len();
    let mut best = 0;
    for d in 1..n {
        let mut run = 0;
        for i in 0..n - d {
            if ids[i] == ids[i + d] {
                run += 1;
                best = best.max(run + run.min(d));
            } else {
                run = 0;
            }
        }
    }
    best
}

/// Linear estimate for oversized inputs: lines inside any repeated window.
fn window_coverage(ids: &[u32]) -> usize {
    let counts = window_counts(ids);
    let mut covered = vec![false; ids.len()];
    for (start, window) in ids.windows(WINDOW).enumerate() {
        if counts.get(window).is_some_and(|c| *c > 1) {
            covered[start..start + WINDOW].iter_mut().for_each(|c| *c = true);
        }
    }
    covered.iter().filter(|c| **c).count()
}

/// Share of function bodies that are structurally identical to another
/// body once names and numbers are abstracted away.
fn similar_function_ratio(source: &PreparedSource) -> f64 {
    let defs = &source.functions;
    if defs.len() < 2 {
        return 0.0;
    }
    let hashes: Vec<Option<u64>> = defs
        .iter()
        .map(|def| {
            let shape = normalize_body(def.body(&source.masked));
            (!shape.is_empty()).then(|| xxh3_64(shape.as_bytes()))
        })
        .collect();
    let mut counts: FxHashMap<u64, usize> = FxHashMap::default();
    for h in hashes.iter().flatten() {
        *counts.entry(*h).or_default() += 1;
    }
    let similar = hashes
        .iter()
        .flatten()
        .filter(|h| counts.get(*h).is_some_and(|c| *c > 1))
        .count();
    per(similar as f64, defs.len() as f64)
}

fn normalize_body(body: &str) -> String {
    token_re()
        .replace_all(body, |caps: &Captures| {
            let tok = &caps[0];
            if tok.trim().is_empty() {
                String::new()
            } else if tok.starts_with(|c: char| c.is_ascii_digit()) {
                "N".to_string()
            } else if lexicon::is_reserved(tok) {
                tok.to_string()
            } else {
                "ID".to_string()
            }
        })
        .into_owned()
}
