//! Stamp placement for one merged change region.
//!
//! Decides, per region, between updating an enclosing same-day block in
//! place, refreshing or inserting a single-line stamp, merging a dense run
//! of single-line stamps into a block, or bracketing a multi-line region
//! with Start/End tags.

use crate::stamp::Timestamp;
use crate::stamp::comment_style::CommentStyle;
use crate::stamp::document::{Document, Edit};
use crate::stamp::ranges::LineRange;
use crate::stamp::tags::{ParsedTag, TagMatcher};
use crate::utils::{debug_log, leading_whitespace};

/// A contiguous run of same-author inline stamps longer than this collapses
/// into one Start/End block.
const INLINE_MERGE_THRESHOLD: usize = 3;

/// An existing Start/End pair bracketing a changed region. Transient; found
/// by scanning outward from the region.
struct EnclosingBlock {
    start_line: usize,
    end_line: usize,
    author: String,
    start_date: String,
    end_date: String,
}

pub struct StampPlanner<'a> {
    doc: &'a Document,
    style: &'a CommentStyle,
    matcher: &'a TagMatcher,
    author: &'a str,
    timestamp: &'a Timestamp,
}

impl<'a> StampPlanner<'a> {
    pub fn new(
        doc: &'a Document,
        style: &'a CommentStyle,
        matcher: &'a TagMatcher,
        author: &'a str,
        timestamp: &'a Timestamp,
    ) -> StampPlanner<'a> {
        StampPlanner {
            doc,
            style,
            matcher,
            author,
            timestamp,
        }
    }

    /// Plan the edits for one merged region, appending to `edits`.
    pub fn plan_range(&self, range: LineRange, edits: &mut Vec<Edit>) {
        if range.start >= self.doc.line_count() {
            // Buffer shrank under us; skip the region, not the save.
            debug_log(&format!(
                "range {}..={} beyond {} lines, skipping",
                range.start,
                range.end,
                self.doc.line_count()
            ));
            return;
        }
        let range = LineRange {
            start: range.start,
            end: range.end.min(self.doc.line_count() - 1),
        };

        if self.update_enclosing_block(range, edits) {
            return;
        }

        if range.height() == 1 {
            self.plan_single_line(range.start, edits);
        } else {
            self.plan_block(range, edits);
        }
    }

    /// Inline trailing stamp text, e.g. `// Eve | 2025-01-01, 10:00:00`.
    fn stamp_text(&self) -> String {
        format!(
            "{} {} | {}{}",
            self.style.prefix,
            self.author,
            self.timestamp.text(),
            self.style.suffix
        )
    }

    fn start_comment(&self) -> String {
        format!(
            "{} Start {} | {}{}",
            self.style.prefix,
            self.author,
            self.timestamp.text(),
            self.style.suffix
        )
    }

    fn end_comment(&self) -> String {
        format!(
            "{} End {} | {}{}",
            self.style.prefix,
            self.author,
            self.timestamp.text(),
            self.style.suffix
        )
    }

    /// If the region sits inside an existing block by the same author whose
    /// recorded date is today, refresh both tags in place and clean interior
    /// stubs. Returns true when the region is fully handled.
    fn update_enclosing_block(&self, range: LineRange, edits: &mut Vec<Edit>) -> bool {
        let Some(block) = self.find_enclosing_block(range) else {
            return false;
        };
        if block.author != self.author {
            return false;
        }

        let current_date = self.timestamp.date_part();
        let existing_date_part = block
            .start_date
            .split(',')
            .next()
            .unwrap_or(&block.start_date)
            .trim()
            .to_string();
        // Tolerate tags whose date text begins with today's date; a block
        // from another day falls through to fresh insertion instead.
        if existing_date_part != current_date && !block.start_date.starts_with(&current_date) {
            return false;
        }

        let start_text = self
            .doc
            .line(block.start_line)
            .replacen(&block.start_date, self.timestamp.text(), 1);
        edits.push(Edit::replace_line(block.start_line, start_text));

        let end_text = self
            .doc
            .line(block.end_line)
            .replacen(&block.end_date, self.timestamp.text(), 1);
        edits.push(Edit::replace_line(block.end_line, end_text));

        // Inline stubs inside the block are residue from earlier single-line
        // stamping; the block tags subsume them.
        for line in block.start_line + 1..block.end_line {
            if let Some(clean) = self.matcher.strip_inline_stub(self.doc.line(line), self.author) {
                edits.push(Edit::replace_line(line, clean));
            }
        }
        true
    }

    /// Scan upward from the region start for the nearest Start tag, then
    /// downward from the region end for a matching-author End tag. The scan
    /// stops at the first coarse match in each direction; a coarse match
    /// that fails structural parsing counts as not found.
    fn find_enclosing_block(&self, range: LineRange) -> Option<EnclosingBlock> {
        let mut found: Option<(usize, String, String)> = None;
        for i in (0..=range.start).rev() {
            let line = self.doc.line(i);
            if self.matcher.looks_like_start(line) {
                if let Some(ParsedTag::Start { author, date_text }) = self.matcher.parse(line) {
                    found = Some((i, author, date_text));
                }
                break;
            }
        }
        let (start_line, author, start_date) = found?;

        for i in range.end..self.doc.line_count() {
            let line = self.doc.line(i);
            if self.matcher.looks_like_end(line) {
                if let Some(ParsedTag::End {
                    author: end_author,
                    date_text: end_date,
                }) = self.matcher.parse(line)
                {
                    if end_author == author {
                        return Some(EnclosingBlock {
                            start_line,
                            end_line: i,
                            author,
                            start_date,
                            end_date,
                        });
                    }
                }
                break;
            }
        }
        None
    }

    fn plan_single_line(&self, line: usize, edits: &mut Vec<Edit>) {
        if self.doc.is_blank(line) {
            return;
        }
        let text = self.doc.line(line);

        if !self.style.force_above && self.merge_inline_run(line, edits) {
            return;
        }

        if self.style.force_above {
            let indent = leading_whitespace(text);
            let comment = format!("{}{}", indent, self.stamp_text());
            // Refresh an existing above-line stamp instead of stacking a new one.
            if line > 0
                && self
                    .matcher
                    .looks_like_author_line(self.doc.line(line - 1), self.author)
            {
                edits.push(Edit::replace_line(line - 1, comment));
            } else {
                edits.push(Edit::InsertBefore {
                    line,
                    text: comment,
                });
            }
        } else {
            let stripped = self
                .matcher
                .strip_inline_stub(text, self.author)
                .unwrap_or_else(|| text.to_string());
            if stripped.trim().is_empty() {
                // The line was nothing but a previous stamp.
                return;
            }
            edits.push(Edit::replace_line(
                line,
                format!("{} {}", stripped, self.stamp_text()),
            ));
        }
    }

    /// When the changed line sits inside a contiguous run of same-author
    /// inline stamps longer than the threshold, convert the whole run into
    /// one Start/End block. Returns true when the merge was applied.
    fn merge_inline_run(&self, line: usize, edits: &mut Vec<Edit>) -> bool {
        let mut run_start = line;
        while run_start > 0
            && self
                .matcher
                .has_inline_stamp(self.doc.line(run_start - 1), self.author)
        {
            run_start -= 1;
        }
        let mut run_end = line;
        while run_end + 1 < self.doc.line_count()
            && self
                .matcher
                .has_inline_stamp(self.doc.line(run_end + 1), self.author)
        {
            run_end += 1;
        }

        if run_end - run_start + 1 <= INLINE_MERGE_THRESHOLD {
            return false;
        }

        let indent = leading_whitespace(self.doc.line(run_start));
        edits.push(Edit::InsertBefore {
            line: run_start,
            text: format!("{}{}", indent, self.start_comment()),
        });
        edits.push(Edit::InsertAfter {
            line: run_end,
            text: format!("{}{}", indent, self.end_comment()),
        });
        for k in run_start..=run_end {
            if let Some(clean) = self.matcher.strip_inline_stub(self.doc.line(k), self.author) {
                edits.push(Edit::replace_line(k, clean));
            }
        }
        true
    }

    /// Multi-line regions always use block tags, whatever the placement
    /// rule. A tag already sitting directly above (or below) the region is
    /// overwritten in place so repeated saves never stack tags.
    fn plan_block(&self, range: LineRange, edits: &mut Vec<Edit>) {
        let indent = leading_whitespace(self.doc.line(range.start)).to_string();
        let start_comment = format!("{}{}", indent, self.start_comment());
        let end_comment = format!("{}{}", indent, self.end_comment());

        if range.start > 0 && self.matcher.looks_like_start(self.doc.line(range.start - 1)) {
            edits.push(Edit::replace_line(range.start - 1, start_comment));
        } else {
            edits.push(Edit::InsertBefore {
                line: range.start,
                text: start_comment,
            });
        }

        if range.end + 1 < self.doc.line_count()
            && self.matcher.looks_like_end(self.doc.line(range.end + 1))
        {
            edits.push(Edit::replace_line(range.end + 1, end_comment));
        } else {
            edits.push(Edit::InsertAfter {
                line: range.end,
                text: end_comment,
            });
        }

        for k in range.start..=range.end {
            if let Some(clean) = self.matcher.strip_inline_stub(self.doc.line(k), self.author) {
                edits.push(Edit::replace_line(k, clean));
            }
        }
    }
}
