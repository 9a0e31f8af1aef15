//! Line-level diff interface for the stamping pipeline.
//!
//! Wraps the `similar` crate into an ordered segment stream: `Insert`
//! segments consume lines from the new text only, `Delete` from the old text
//! only, `Equal` from both in lockstep.

use similar::{ChangeTag, TextDiff};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffTag {
    Equal,
    Delete,
    Insert,
}

#[derive(Debug, Clone)]
pub struct DiffSegment {
    pub tag: DiffTag,
    pub lines: Vec<String>,
}

impl DiffSegment {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// Diff two texts line by line, grouping consecutive changes of the same
/// kind into segments.
pub fn diff_lines(old: &str, new: &str) -> Vec<DiffSegment> {
    let diff = TextDiff::from_lines(old, new);

    let mut segments: Vec<DiffSegment> = Vec::new();
    for change in diff.iter_all_changes() {
        let tag = match change.tag() {
            ChangeTag::Equal => DiffTag::Equal,
            ChangeTag::Delete => DiffTag::Delete,
            ChangeTag::Insert => DiffTag::Insert,
        };
        let mut text = change.value().to_string();
        if text.ends_with('\n') {
            text.pop();
            if text.ends_with('\r') {
                text.pop();
            }
        }

        match segments.last_mut() {
            Some(seg) if seg.tag == tag => seg.lines.push(text),
            _ => segments.push(DiffSegment {
                tag,
                lines: vec![text],
            }),
        }
    }
    segments
}
