//! Changed-range extraction and clustering.
//!
//! Pass 1 walks the last-saved → buffer diff and collects the buffer line
//! spans of inserted segments, skipping spans already neutralized by revert
//! detection. Pass 2 merges spans separated only by blank lines so one
//! logical edit gets one annotation.

use std::collections::HashSet;

use crate::stamp::diff_utils::{DiffSegment, DiffTag};
use crate::stamp::document::Document;

/// Inclusive 0-indexed span of buffer lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    pub fn height(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Candidate ranges of new or modified lines in the buffer, in strictly
/// increasing order, never overlapping. `handled` lines (attributed to a
/// revert) suppress the whole span they fall in.
pub fn extract_changed_ranges(
    segments: &[DiffSegment],
    handled: &HashSet<usize>,
) -> Vec<LineRange> {
    let mut ranges = Vec::new();
    let mut cursor = 0usize;

    for segment in segments {
        let count = segment.line_count();
        match segment.tag {
            DiffTag::Insert => {
                let span = LineRange {
                    start: cursor,
                    end: cursor + count - 1,
                };
                let any_handled = (span.start..=span.end).any(|line| handled.contains(&line));
                if !any_handled {
                    ranges.push(span);
                }
                cursor += count;
            }
            DiffTag::Equal => cursor += count,
            // Deleted segments exist only in the old text.
            DiffTag::Delete => {}
        }
    }

    ranges
}

/// Merge adjacent ranges whose gap contains only blank or whitespace-only
/// lines into single logical change regions.
pub fn cluster_ranges(raw: Vec<LineRange>, doc: &Document) -> Vec<LineRange> {
    let mut merged = Vec::new();
    let mut iter = raw.into_iter();
    let Some(mut active) = iter.next() else {
        return merged;
    };

    for next in iter {
        let gap_start = active.end + 1;
        let gap_end = next.start.saturating_sub(1);

        let mut gap_trivial = true;
        if gap_start <= gap_end {
            for line in gap_start..=gap_end {
                if line >= doc.line_count() {
                    break;
                }
                if !doc.is_blank(line) {
                    gap_trivial = false;
                    break;
                }
            }
        }

        if gap_trivial {
            active.end = next.end;
        } else {
            merged.push(active);
            active = next;
        }
    }
    merged.push(active);
    merged
}
