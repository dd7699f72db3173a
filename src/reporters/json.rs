//! JSON reporter
//!
//! `json` prints the whole report as one pretty document. `jsonl` prints
//! one compact line per analyzed file, which streams well into `jq -c`.

use super::AnalysisReport;
use anyhow::Result;
use serde::Serialize;

/// Render any report as pretty JSON
pub fn render<T: Serialize>(report: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Render as compact JSON (single line)
pub fn render_compact<T: Serialize>(report: &T) -> Result<String> {
    Ok(serde_json::to_string(report)?)
}

/// One line per file
pub fn render_lines(report: &AnalysisReport) -> Result<String> {
    let mut out = String::new();
    for file in &report.files {
        out.push_str(&serde_json::to_string(file)?);
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_json_render_valid() {
        let report = test_report();
        let json_str = render(&report).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(parsed["summary"]["total"], 3);
        assert_eq!(parsed["files"][0]["result"]["prediction"], "ai_generated");
        assert_eq!(parsed["files"][0]["result"]["method"], "heuristic-weighted");
        assert_eq!(parsed["skipped"][0]["path"], "src/blob.c");
        assert!(parsed["files"][0].get("features").is_none());
    }

    #[test]
    fn test_jsonl_one_object_per_file() {
        let report = test_report();
        let out = render_lines(&report).expect("render JSONL");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        for line in lines {
            let parsed: serde_json::Value = serde_json::from_str(line).expect("parse line");
            assert!(parsed["path"].is_string());
        }
    }

    #[test]
    fn test_json_render_compact() {
        let report = test_report();
        let json_str = render_compact(&report).expect("render compact JSON");
        assert!(!json_str.contains('\n'));
        let _: serde_json::Value = serde_json::from_str(&json_str).expect("parse compact JSON");
    }
}
