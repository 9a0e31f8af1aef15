//! Detection of edits that merely restore the last-committed content.
//!
//! When the buffer differs from HEAD only by this tool's own annotations
//! (stale inline stamps, leftover Start/End tags), nothing semantically
//! changed: the differing region is rewritten back to the literal committed
//! text and its lines are excluded from fresh stamping.

use std::collections::HashSet;

use crate::stamp::diff_utils::{DiffTag, diff_lines};
use crate::stamp::document::Edit;
use crate::stamp::tags::TagMatcher;

pub struct RevertOutcome {
    pub edits: Vec<Edit>,
    pub handled: HashSet<usize>,
}

/// Diff the committed content against the buffer and neutralize stamp-only
/// differences.
///
/// Deleted/inserted segment pairs are compared in normalized form: per line,
/// a whole-line Start/End tag owned by `author` contributes nothing, a
/// trailing inline stub by `author` is stripped, and the comparison itself
/// ignores all whitespace so reformatting cannot produce false negatives.
pub fn detect_reverts(
    committed: &str,
    buffer: &str,
    matcher: &TagMatcher,
    author: &str,
) -> RevertOutcome {
    let segments = diff_lines(committed, buffer);

    let mut edits = Vec::new();
    let mut handled = HashSet::new();
    let mut buf_line = 0usize;

    for (i, segment) in segments.iter().enumerate() {
        match segment.tag {
            DiffTag::Equal => buf_line += segment.line_count(),
            DiffTag::Insert => buf_line += segment.line_count(),
            DiffTag::Delete => {
                // Committed content missing from the buffer; a directly
                // following insert is the buffer's replacement for it.
                let Some(inserted) = segments.get(i + 1).filter(|s| s.tag == DiffTag::Insert)
                else {
                    continue;
                };

                let committed_form = normalize(&segment.lines, matcher, author);
                let buffer_form = normalize(&inserted.lines, matcher, author);
                if committed_form != buffer_form {
                    continue;
                }

                let start = buf_line;
                let end = buf_line + inserted.line_count() - 1;
                edits.push(Edit::ReplaceLines {
                    start,
                    end,
                    text: segment.lines.join("\n"),
                });
                handled.extend(start..=end);
            }
        }
    }

    RevertOutcome { edits, handled }
}

/// Annotation-free, whitespace-free form of a block of lines.
fn normalize(lines: &[String], matcher: &TagMatcher, author: &str) -> String {
    let mut out = String::new();
    for line in lines {
        if matcher.parse_owned_by(line, author).is_some() {
            continue;
        }
        let code = matcher
            .strip_inline_stub(line, author)
            .unwrap_or_else(|| line.clone());
        out.extend(code.chars().filter(|c| !c.is_whitespace()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stamp::comment_style::CommentStyle;

    fn matcher() -> TagMatcher {
        TagMatcher::new(&CommentStyle::new("//", "", false))
    }

    #[test]
    fn stale_inline_stamp_reverts_to_committed_line() {
        let committed = "x=1\n";
        let buffer = "x=1 // Eve | 2025-01-01, 09:00:00\n";
        let outcome = detect_reverts(committed, buffer, &matcher(), "Eve");

        assert_eq!(
            outcome.edits,
            vec![Edit::ReplaceLines {
                start: 0,
                end: 0,
                text: "x=1".to_string(),
            }]
        );
        assert!(outcome.handled.contains(&0));
    }

    #[test]
    fn real_content_change_is_not_a_revert() {
        let committed = "x=1\n";
        let buffer = "x=2\n";
        let outcome = detect_reverts(committed, buffer, &matcher(), "Eve");
        assert!(outcome.edits.is_empty());
        assert!(outcome.handled.is_empty());
    }

    #[test]
    fn leftover_block_tags_around_reformatted_code_revert_too() {
        // No buffer line matches the committed line verbatim, so the diff
        // pairs one deleted line against three inserted ones.
        let committed = "value = compute(1, 2)\n";
        let buffer = "// Start Eve | 2025-01-01, 09:00:00\nvalue=compute(1,2)\n// End Eve | 2025-01-01, 09:00:00\n";
        let outcome = detect_reverts(committed, buffer, &matcher(), "Eve");

        assert_eq!(
            outcome.edits,
            vec![Edit::ReplaceLines {
                start: 0,
                end: 2,
                text: "value = compute(1, 2)".to_string(),
            }]
        );
        assert_eq!(outcome.handled.len(), 3);
    }

    #[test]
    fn whitespace_differences_do_not_defeat_detection() {
        let committed = "let y = compute( a, b );\n";
        let buffer = "let y = compute(a,b);   // Eve | 2025-01-01, 09:00:00\n";
        let outcome = detect_reverts(committed, buffer, &matcher(), "Eve");
        assert_eq!(outcome.edits.len(), 1);
    }

    #[test]
    fn another_authors_stamp_is_a_real_difference() {
        let committed = "x=1\n";
        let buffer = "x=1 // Mallory | 2025-01-01, 09:00:00\n";
        let outcome = detect_reverts(committed, buffer, &matcher(), "Eve");
        assert!(outcome.edits.is_empty());
    }

    #[test]
    fn handled_lines_use_buffer_coordinates() {
        let committed = "a\nb\nx=1\n";
        let buffer = "a\nNEW LINE\nb\nx=1 // Eve | 2025-01-01, 09:00:00\n";
        let outcome = detect_reverts(committed, buffer, &matcher(), "Eve");

        // the unrelated insertion above shifts the reverted line to index 3
        assert_eq!(outcome.handled, [3].into_iter().collect());
        assert_eq!(
            outcome.edits,
            vec![Edit::ReplaceLines {
                start: 3,
                end: 3,
                text: "x=1".to_string(),
            }]
        );
    }
}
