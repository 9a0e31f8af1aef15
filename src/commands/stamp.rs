//! The on-save entry point.
//!
//! The editor pipes the buffer being saved on stdin; the previously saved
//! content is read from disk and the last-committed content from git. The
//! annotated buffer goes to stdout, or back into the file with `--write`.
//! Whatever goes wrong internally, the save never fails: degraded runs pass
//! the buffer through untouched.

use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::CodestampError;
use crate::git::Repository;
use crate::stamp::comment_style::{self, CommentStyle};
use crate::stamp::document::{self, Document};
use crate::stamp::{SaveInput, Timestamp, plan_save_edits};
use crate::utils::debug_log;

pub struct StampOptions {
    pub file: PathBuf,
    pub language: Option<String>,
    pub author: Option<String>,
    pub timestamp: Option<String>,
    pub no_revert_detection: bool,
    pub write: bool,
}

pub fn handle_stamp(opts: &StampOptions) -> Result<(), CodestampError> {
    // Explicit CLI arguments are validated up front; everything past this
    // point degrades instead of failing.
    let timestamp = match &opts.timestamp {
        Some(raw) => Timestamp::parse(raw).ok_or_else(|| {
            CodestampError::Generic(format!(
                "invalid --timestamp {:?}, expected YYYY-MM-DD, HH:MM:SS",
                raw
            ))
        })?,
        None => Timestamp::now(),
    };

    let buffer = read_buffer(&opts.file)?;

    let output = match annotate(opts, &buffer, timestamp) {
        Ok(text) => text,
        Err(e) => {
            debug_log(&format!("stamping skipped: {}", e));
            buffer.clone()
        }
    };

    if opts.write {
        fs::write(&opts.file, output)?;
    } else {
        io::stdout().write_all(output.as_bytes())?;
    }
    Ok(())
}

fn annotate(
    opts: &StampOptions,
    buffer: &str,
    timestamp: Timestamp,
) -> Result<String, CodestampError> {
    let file_name = opts.file.to_string_lossy().to_string();
    let language = opts
        .language
        .clone()
        .unwrap_or_else(|| comment_style::language_from_path(&opts.file));

    if comment_style::is_unstampable(&language, &file_name) {
        debug_log(&format!("{} is not stampable, passing through", file_name));
        return Ok(buffer.to_string());
    }

    // Disk content is the previous save; a file that exists but cannot be
    // read aborts stamping for this save, a missing file just means
    // everything is new.
    let last_saved = if opts.file.exists() {
        fs::read_to_string(&opts.file)?
    } else {
        String::new()
    };

    let revert_detection = !opts.no_revert_detection && Config::get().revert_detection();
    let committed = if revert_detection {
        committed_content(&opts.file)
    } else {
        None
    };

    let author = opts
        .author
        .clone()
        .unwrap_or_else(|| Config::get().author_name().to_string());

    let input = SaveInput {
        buffer,
        last_saved: &last_saved,
        committed: committed.as_deref(),
        style: CommentStyle::for_document(&language, &file_name),
        author: &author,
        timestamp,
    };

    let edits = plan_save_edits(&input);
    debug_log(&format!("planned {} edit(s) for {}", edits.len(), file_name));
    if document::edits_overlap(&edits) {
        return Err(CodestampError::Generic(format!(
            "planned edits for {} overlap",
            file_name
        )));
    }
    Ok(Document::new(buffer).apply_edits(&edits))
}

/// Last-committed content of the file, or `None` when there is no
/// repository, no committed version, or git fails; revert detection is
/// simply skipped then.
fn committed_content(file: &Path) -> Option<String> {
    let repo = match Repository::discover(file) {
        Ok(repo) => repo,
        Err(e) => {
            debug_log(&format!("no repository for {:?}: {}", file, e));
            return None;
        }
    };
    let relative = match repo.relative_path(file) {
        Ok(rel) => rel,
        Err(e) => {
            debug_log(&format!("cannot relativize {:?}: {}", file, e));
            return None;
        }
    };
    match repo.file_content_at_head(&relative) {
        Ok(content) => Some(content),
        Err(e) => {
            debug_log(&format!("no committed version of {}: {}", relative, e));
            None
        }
    }
}

fn read_buffer(file: &Path) -> Result<String, CodestampError> {
    if io::stdin().is_terminal() {
        // No piped buffer; treat the on-disk content as the buffer.
        Ok(fs::read_to_string(file).unwrap_or_default())
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    }
}
