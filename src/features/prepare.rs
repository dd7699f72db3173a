//! Source preprocessing shared by every analyzer
//!
//! A single character-level pass removes comments while respecting string
//! and character literals. Two views come out of it: `code` (comments gone,
//! blank lines collapsed) and `masked` (same lines, literal contents blanked
//! so keyword heuristics never match inside strings).

use crate::analyzers::lexicon::{self, FunctionDef};
use crate::models::{Language, SourceUnit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Code,
    LineComment,
    BlockComment,
    Str,
    Char,
}

/// A source unit after comment stripping and line classification.
#[derive(Debug, Clone)]
pub struct PreparedSource {
    pub filename: String,
    pub language: Language,
    /// Original text, untouched
    pub raw: String,
    /// Non-blank lines with comments removed
    pub code_lines: Vec<String>,
    /// `code_lines` with string/char literal contents replaced by spaces
    pub masked_lines: Vec<String>,
    /// `masked_lines` joined with `\n`
    pub masked: String,
    /// Function definitions found in `masked`, computed once per file
    pub functions: Vec<FunctionDef>,
    /// Text following `//` for every line comment
    pub line_comments: Vec<String>,
    pub total_lines: usize,
    pub blank_lines: usize,
    pub comment_lines: usize,
}

impl PreparedSource {
    pub fn new(unit: &SourceUnit) -> Self {
        let raw = unit.text.clone();
        let normalized = raw.replace("\r\n", "\n");
        let scan = scan(&normalized);

        let mut code_lines = Vec::new();
        let mut masked_lines = Vec::new();
        for (code, masked) in scan.code.split('\n').zip(scan.masked.split('\n')) {
            if code.trim().is_empty() {
                continue;
            }
            code_lines.push(code.trim_end().to_string());
            masked_lines.push(masked.trim_end().to_string());
        }

        let total_lines = raw.lines().count();
        let blank_lines = raw.lines().filter(|l| l.trim().is_empty()).count();
        let comment_lines = scan.comment_flags.iter().filter(|f| **f).count();
        let masked = masked_lines.join("\n");
        let functions = lexicon::function_definitions(&masked);

        Self {
            filename: unit.filename.clone(),
            language: unit.language,
            raw,
            code_lines,
            masked_lines,
            masked,
            functions,
            line_comments: scan.line_comments,
            total_lines,
            blank_lines,
            comment_lines: comment_lines.min(total_lines),
        }
    }

    /// Lines of code: non-blank, non-comment-only.
    pub fn loc(&self) -> usize {
        self.code_lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code_lines.is_empty()
    }


    pub fn raw_lines(&self) -> impl Iterator<Item = &str> {
        self.raw.lines()
    }
}

struct ScanOutput {
    code: String,
    masked: String,
    comment_flags: Vec<bool>,
    line_comments: Vec<String>,
}

fn scan(text: &str) -> ScanOutput {
    let chars: Vec<char> = text.chars().collect();
    let mut code = String::with_capacity(text.len());
    let mut masked = String::with_capacity(text.len());
    let mut comment_flags = vec![false];
    let mut line_comments = Vec::new();
    let mut current_comment = String::new();
    let mut state = ScanState::Code;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        let line = comment_flags.len() - 1;

        if c == '\n' {
            if state == ScanState::LineComment {
                line_comments.push(std::mem::take(&mut current_comment));
                state = ScanState::Code;
            }
            // Unterminated literals end at the line break.
            if matches!(state, ScanState::Str | ScanState::Char) {
                state = ScanState::Code;
            }
            code.push('\n');
            masked.push('\n');
            comment_flags.push(state == ScanState::BlockComment);
            i += 1;
            continue;
        }

        match state {
            ScanState::Code => match (c, next) {
                ('/', Some('/')) => {
                    comment_flags[line] = true;
                    state = ScanState::LineComment;
                    i += 2;
                    continue;
                }
                ('/', Some('*')) => {
                    comment_flags[line] = true;
                    state = ScanState::BlockComment;
                    i += 2;
                    continue;
                }
                ('"', _) => {
                    state = ScanState::Str;
                    code.push(c);
                    masked.push(c);
                }
                ('\'', _) => {
                    state = ScanState::Char;
                    code.push(c);
                    masked.push(c);
                }
                _ => {
                    code.push(c);
                    masked.push(c);
                }
            },
            ScanState::LineComment => current_comment.push(c),
            ScanState::BlockComment => {
                if c == '*' && next == Some('/') {
                    state = ScanState::Code;
                    code.push(' ');
                    masked.push(' ');
                    i += 2;
                    continue;
                }
            }
            ScanState::Str | ScanState::Char => {
                let quote = if state == ScanState::Str { '"' } else { '\'' };
                if c == '\\' && next.is_some_and(|n| n != '\n') {
                    code.push(c);
                    code.extend(next);
                    masked.push_str("  ");
                    i += 2;
                    continue;
                }
                if c == quote {
                    state = ScanState::Code;
                    code.push(c);
                    masked.push(c);
                } else {
                    code.push(c);
                    masked.push(' ');
                }
            }
        }
        i += 1;
    }

    if state == ScanState::LineComment {
        line_comments.push(current_comment);
    }

    ScanOutput {
        code,
        masked,
        comment_flags,
        line_comments,
    }
}
