//! Line-addressed document snapshot and the edit model the engine emits.
//!
//! All line indices are 0-based. Edits are planned against one immutable
//! snapshot and applied in a single bottom-up pass, so earlier edits never
//! shift the positions of later ones.

use crate::utils::debug_log;

/// An atomic text substitution or insertion, line-aligned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Insert `text` as new line(s) immediately above `line`.
    InsertBefore { line: usize, text: String },
    /// Insert `text` as new line(s) immediately after `line`.
    InsertAfter { line: usize, text: String },
    /// Replace lines `start..=end` (inclusive) with `text`.
    ReplaceLines {
        start: usize,
        end: usize,
        text: String,
    },
}

impl Edit {
    pub fn replace_line(line: usize, text: String) -> Edit {
        Edit::ReplaceLines {
            start: line,
            end: line,
            text,
        }
    }

    /// The inclusive line range this edit rewrites. Insertions are points
    /// between lines and cover nothing.
    pub fn covered_lines(&self) -> Option<(usize, usize)> {
        match self {
            Edit::ReplaceLines { start, end, .. } => Some((*start, *end)),
            _ => None,
        }
    }

    /// Sort key: position in the document, with ties broken so that a
    /// reverse-order application is safe (insert-after at a line lands below
    /// a replacement of that same line).
    fn sort_key(&self) -> (usize, u8) {
        match self {
            Edit::InsertBefore { line, .. } => (*line, 0),
            Edit::ReplaceLines { start, .. } => (*start, 1),
            Edit::InsertAfter { line, .. } => (*line, 2),
        }
    }
}

/// True if any two replacement edits rewrite intersecting line ranges.
pub fn edits_overlap(edits: &[Edit]) -> bool {
    for (i, a) in edits.iter().enumerate() {
        let Some((a_start, a_end)) = a.covered_lines() else {
            continue;
        };
        for b in &edits[i + 1..] {
            let Some((b_start, b_end)) = b.covered_lines() else {
                continue;
            };
            if a_start <= b_end && a_end >= b_start {
                return true;
            }
        }
    }
    false
}

/// Immutable snapshot of the buffer being saved.
pub struct Document {
    lines: Vec<String>,
    trailing_newline: bool,
}

impl Document {
    pub fn new(text: &str) -> Document {
        let trailing_newline = text.ends_with('\n');
        let mut lines: Vec<String> = text
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
            .collect();
        if trailing_newline {
            lines.pop();
        }
        Document {
            lines,
            trailing_newline,
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, index: usize) -> &str {
        &self.lines[index]
    }

    pub fn is_blank(&self, index: usize) -> bool {
        self.lines[index].trim().is_empty()
    }

    /// Apply all edits as one all-or-nothing change and render the result.
    ///
    /// Edits whose target range falls beyond the current line count are
    /// skipped individually; the rest of the set still applies.
    pub fn apply_edits(&self, edits: &[Edit]) -> String {
        let mut sorted: Vec<&Edit> = edits.iter().collect();
        sorted.sort_by_key(|e| e.sort_key());

        let mut lines = self.lines.clone();
        for edit in sorted.iter().rev() {
            match edit {
                Edit::InsertBefore { line, text } => {
                    if *line > lines.len() {
                        debug_log(&format!("skipping insert at {} beyond document", line));
                        continue;
                    }
                    for (offset, new_line) in text.split('\n').enumerate() {
                        lines.insert(line + offset, new_line.to_string());
                    }
                }
                Edit::InsertAfter { line, text } => {
                    if *line >= lines.len() {
                        debug_log(&format!("skipping insert after {} beyond document", line));
                        continue;
                    }
                    for (offset, new_line) in text.split('\n').enumerate() {
                        lines.insert(line + 1 + offset, new_line.to_string());
                    }
                }
                Edit::ReplaceLines { start, end, text } => {
                    if *end >= lines.len() || start > end {
                        debug_log(&format!(
                            "skipping replacement {}..={} beyond document",
                            start, end
                        ));
                        continue;
                    }
                    let replacement: Vec<String> =
                        text.split('\n').map(|l| l.to_string()).collect();
                    lines.splice(*start..=*end, replacement);
                }
            }
        }

        let mut out = lines.join("\n");
        if self.trailing_newline {
            out.push('\n');
        }
        out
    }
}
