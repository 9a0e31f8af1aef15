//! The change-annotation engine.
//!
//! One save event flows through here: revert detection against the
//! committed content, changed-range extraction against the last-saved
//! content, blank-gap clustering, then stamp planning per region. The
//! output is a list of non-overlapping line-aligned edits the caller
//! applies atomically before persisting.

pub mod comment_style;
pub mod diff_utils;
pub mod document;
pub mod planner;
pub mod ranges;
pub mod revert;
pub mod tags;

use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::stamp::comment_style::CommentStyle;
use crate::stamp::document::{Document, Edit};
use crate::stamp::planner::StampPlanner;
use crate::stamp::tags::TagMatcher;
use crate::utils::debug_log;

/// Save-time timestamp, carried structured from the moment it is generated
/// so same-day checks never parse formatted text back apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    date: NaiveDate,
    text: String,
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d, %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

impl Timestamp {
    pub fn now() -> Timestamp {
        Timestamp::from_datetime(Local::now().naive_local())
    }

    pub fn from_datetime(dt: NaiveDateTime) -> Timestamp {
        Timestamp {
            date: dt.date(),
            text: dt.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// Parse a `YYYY-MM-DD, HH:MM:SS` string (the tool's own format).
    pub fn parse(s: &str) -> Option<Timestamp> {
        let dt = NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT).ok()?;
        Some(Timestamp::from_datetime(dt))
    }

    /// Full formatted date and time as written into stamps.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The calendar-date part, used for same-day continuation checks.
    pub fn date_part(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

/// Everything one save event needs. No state outlives the call.
pub struct SaveInput<'a> {
    /// Buffer content being saved.
    pub buffer: &'a str,
    /// Content of the previous save (what is on disk).
    pub last_saved: &'a str,
    /// Content at the last committed revision; `None` skips revert
    /// detection entirely (fail-open).
    pub committed: Option<&'a str>,
    pub style: CommentStyle,
    pub author: &'a str,
    pub timestamp: Timestamp,
}

/// Plan the full edit set for one save.
pub fn plan_save_edits(input: &SaveInput) -> Vec<Edit> {
    let doc = Document::new(input.buffer);
    let matcher = TagMatcher::new(&input.style);

    let mut edits: Vec<Edit> = Vec::new();
    let mut handled = std::collections::HashSet::new();

    if let Some(committed) = input.committed {
        let outcome = revert::detect_reverts(committed, input.buffer, &matcher, input.author);
        if !outcome.edits.is_empty() {
            debug_log(&format!(
                "revert detection neutralized {} region(s)",
                outcome.edits.len()
            ));
        }
        edits.extend(outcome.edits);
        handled = outcome.handled;
    }

    let segments = diff_utils::diff_lines(input.last_saved, input.buffer);
    let raw = ranges::extract_changed_ranges(&segments, &handled);
    let merged = ranges::cluster_ranges(raw, &doc);

    let planner = StampPlanner::new(&doc, &input.style, &matcher, input.author, &input.timestamp);
    for range in merged {
        let mut planned = Vec::new();
        planner.plan_range(range, &mut planned);

        // A planned replacement that collides with an already-emitted one
        // (revert edits included) is dropped; the earlier edit wins.
        for edit in planned {
            let collides = edit.covered_lines().is_some_and(|(start, end)| {
                edits.iter().any(|existing| {
                    existing
                        .covered_lines()
                        .is_some_and(|(s, e)| start <= e && end >= s)
                })
            });
            if collides {
                debug_log(&format!("dropping colliding edit {:?}", edit));
            } else {
                edits.push(edit);
            }
        }
    }

    edits
}
