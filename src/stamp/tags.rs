//! Recognition of existing stamp annotations.
//!
//! A stamp tag line has the shape `<prefix> (Start|End) <author> | <date>
//! <suffix>`. Candidate lines are classified in one regex pass into a tagged
//! variant instead of ad-hoc substring slicing, so a line that merely looks
//! like a tag but fails structural parsing is cleanly "not a tag".

use regex::Regex;

use crate::stamp::comment_style::CommentStyle;

/// A structurally parsed stamp tag line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedTag {
    Start { author: String, date_text: String },
    End { author: String, date_text: String },
}

impl ParsedTag {
    pub fn author(&self) -> &str {
        match self {
            ParsedTag::Start { author, .. } | ParsedTag::End { author, .. } => author,
        }
    }

    #[cfg(test)]
    pub fn date_text(&self) -> &str {
        match self {
            ParsedTag::Start { date_text, .. } | ParsedTag::End { date_text, .. } => date_text,
        }
    }
}

/// Style-bound tag recognizer, built once per save.
pub struct TagMatcher {
    prefix: String,
    trimmed_prefix: String,
    tag_re: Regex,
}

impl TagMatcher {
    pub fn new(style: &CommentStyle) -> TagMatcher {
        let prefix = regex::escape(style.prefix.trim());
        let pattern = if style.suffix.trim().is_empty() {
            format!(r"^\s*{}\s+(Start|End)\s+(.+?)\s*\|\s*(.+?)\s*$", prefix)
        } else {
            let suffix = regex::escape(style.suffix.trim());
            format!(
                r"^\s*{}\s+(Start|End)\s+(.+?)\s*\|\s*(.+?)(?:\s*{})?\s*$",
                prefix, suffix
            )
        };
        TagMatcher {
            prefix: style.prefix.clone(),
            trimmed_prefix: style.prefix.trim().to_string(),
            // The pattern is assembled from escaped literals only.
            tag_re: Regex::new(&pattern).expect("tag pattern must compile"),
        }
    }

    /// Coarse test: could this line be a Start tag? Used to decide where a
    /// scan stops; a coarse match that fails `parse` is treated as not found.
    pub fn looks_like_start(&self, line: &str) -> bool {
        let t = line.trim();
        t.starts_with(&self.trimmed_prefix) && t.contains("Start") && t.contains('|')
    }

    /// Coarse test for an End tag line.
    pub fn looks_like_end(&self, line: &str) -> bool {
        let t = line.trim();
        t.starts_with(&self.trimmed_prefix) && t.contains("End") && t.contains('|')
    }

    /// Structural parse of a candidate tag line.
    pub fn parse(&self, line: &str) -> Option<ParsedTag> {
        let caps = self.tag_re.captures(line)?;
        let author = caps.get(2)?.as_str().to_string();
        let date_text = caps.get(3)?.as_str().to_string();
        match caps.get(1)?.as_str() {
            "Start" => Some(ParsedTag::Start { author, date_text }),
            "End" => Some(ParsedTag::End { author, date_text }),
            _ => None,
        }
    }

    /// Whole-line tag owned by `author`, any placement.
    pub fn parse_owned_by(&self, line: &str, author: &str) -> Option<ParsedTag> {
        self.parse(line).filter(|tag| tag.author() == author)
    }

    /// The inline stamp stub marking a trailing annotation by `author`,
    /// e.g. `// Eve |`.
    pub fn inline_stub(&self, author: &str) -> String {
        format!("{} {} |", self.prefix, author)
    }

    /// Loose test used by the single-line merge scan: does this line carry
    /// an inline stamp from `author`?
    pub fn has_inline_stamp(&self, line: &str, author: &str) -> bool {
        let t = line.trim();
        t.contains(&self.trimmed_prefix) && t.contains(&format!("{} |", author))
    }

    /// Loose test for a dedicated above-line stamp by `author` (force-above
    /// styles place these).
    pub fn looks_like_author_line(&self, line: &str, author: &str) -> bool {
        let t = line.trim();
        t.starts_with(&self.trimmed_prefix) && t.contains(author) && t.contains('|')
    }

    /// Remove a trailing inline stamp by `author` from a line, returning the
    /// code part with trailing whitespace stripped. `None` if the line has
    /// no such stub.
    pub fn strip_inline_stub(&self, line: &str, author: &str) -> Option<String> {
        let stub = self.inline_stub(author);
        let idx = line.find(&stub)?;
        Some(line[..idx].trim_end().to_string())
    }
}
