//! Text edits on CODEOWNERS files.
//!
//! [`append_entries`] works on a parsed [`SourceFile`] and returns the new
//! text, leaving it to the caller to write it back. [`append_to_file`] and
//! [`ensure_codeowners_file`] are the filesystem counterparts used by the CLI.

use crate::parse::{SourceFile, parse, parse_bytes};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The conventional file name.
pub const CODEOWNERS_FILE_NAME: &str = "CODEOWNERS";

/// Options for [`append_entries`].
#[derive(Debug, Clone, Default)]
pub struct AppendOptions {
    /// Drop rule lines that already appear anywhere in the file.
    pub ignore_duplicates: bool,
    /// Drop blank and comment lines from the appended content.
    pub ignore_comments: bool,
    /// Insert at the start of this 1-based line instead of at the end.
    pub insert_at_line: Option<usize>,
}

impl AppendOptions {
    /// Creates options that append everything at the end of the file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether rule lines already present in the file are dropped.
    pub fn with_ignore_duplicates(mut self, value: bool) -> Self {
        self.ignore_duplicates = value;
        self
    }

    /// Sets whether blank and comment lines are dropped.
    pub fn with_ignore_comments(mut self, value: bool) -> Self {
        self.ignore_comments = value;
        self
    }

    /// Inserts at the start of the given 1-based line.
    pub fn with_insert_at_line(mut self, line: usize) -> Self {
        self.insert_at_line = Some(line);
        self
    }
}

/// The result of [`append_entries`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppendOutcome {
    /// The full file text after the edit.
    pub text: String,
    /// The blocks that were inserted, as inserted.
    pub appended: Vec<String>,
    /// Blocks skipped because an identical entry already exists.
    pub skipped: Vec<String>,
}

impl AppendOutcome {
    /// Returns true if the text differs from the input.
    pub fn changed(&self) -> bool {
        !self.appended.is_empty()
    }
}

/// Returns the first line terminator used in `source`, `\n` if there is none.
fn line_ending(source: &str) -> &'static str {
    match source.find(['\r', '\n']) {
        Some(i) if source[i..].starts_with("\r\n") => "\r\n",
        Some(i) if source[i..].starts_with('\r') => "\r",
        _ => "\n",
    }
}

fn is_rule_line(line: &str) -> bool {
    !line.is_empty() && !line.starts_with('#')
}

/// Returns the byte offset where the given 1-based line starts.
fn line_start_offset(source: &str, line: usize) -> Option<usize> {
    if line <= 1 {
        return Some(0);
    }
    let bytes = source.as_bytes();
    let mut current = 1;
    let mut i = 0;
    while i < bytes.len() {
        let next = match bytes[i] {
            b'\r' if bytes.get(i + 1) == Some(&b'\n') => i + 2,
            b'\r' | b'\n' => i + 1,
            _ => {
                i += 1;
                continue;
            }
        };
        current += 1;
        if current == line {
            return Some(next);
        }
        i = next;
    }
    None
}

/// Appends rule blocks to a parsed file and returns the edited text.
///
/// Each item of `content` is a block of one or more lines. A block equal to
/// the text of an existing entry is skipped. Every non-empty block ends with
/// a newline once inserted, and when appending to a file without a trailing
/// newline one is inserted first. Inserted lines use the file's own line
/// terminator.
pub fn append_entries<S: AsRef<str>>(
    file: &SourceFile,
    content: &[S],
    options: &AppendOptions,
) -> AppendOutcome {
    let existing: HashSet<&str> = file.entries().map(|e| e.text()).collect();
    let mut text = file.source().to_string();
    let eol = line_ending(&text);
    let mut outcome = AppendOutcome::default();

    let mut offset = match options.insert_at_line {
        Some(line) => line_start_offset(&text, line).unwrap_or_else(|| {
            debug!("Line {} is past the end of the file, appending instead", line);
            text.len()
        }),
        None => text.len(),
    };
    for block in content {
        let block = block.as_ref();
        if existing.contains(block) {
            warn!("Entry '{}' already exists", block);
            outcome.skipped.push(block.to_string());
            continue;
        }

        let mut lines: Vec<&str> = block.split('\n').collect();
        if options.ignore_duplicates {
            let mut current: HashSet<&str> = text
                .lines()
                .map(str::trim)
                .filter(|line| is_rule_line(line))
                .collect();
            lines.retain(|line| {
                let line = line.trim();
                !is_rule_line(line) || current.insert(line)
            });
        }
        if options.ignore_comments {
            lines.retain(|line| is_rule_line(line.trim()));
        }

        let joined = lines.join("\n").replace('\r', "");
        if joined.is_empty() {
            continue;
        }
        let mut entry = joined.replace('\n', eol);
        entry.push_str(eol);
        if offset == text.len() && !text.is_empty() && !text.ends_with(['\n', '\r']) {
            entry.insert_str(0, eol);
        }

        text.insert_str(offset, &entry);
        offset += entry.len();
        outcome.appended.push(entry);
    }

    info!(
        "Appended {} blocks, skipped {} existing entries",
        outcome.appended.len(),
        outcome.skipped.len()
    );
    outcome.text = text;
    outcome
}

/// Reads, edits and rewrites the file at `path`.
///
/// The file is only written when something was appended.
pub fn append_to_file<S: AsRef<str>>(
    path: &Path,
    content: &[S],
    options: &AppendOptions,
) -> io::Result<AppendOutcome> {
    let source = fs::read(path)?;
    let file = parse_bytes(&source);
    let outcome = append_entries(&file, content, options);
    if outcome.changed() {
        fs::write(path, &outcome.text)?;
        debug!("Wrote {} bytes to {}", outcome.text.len(), path.display());
    }
    Ok(outcome)
}

/// Returns the `CODEOWNERS` file in `dir`, creating an empty one if needed.
pub fn ensure_codeowners_file(dir: &Path) -> io::Result<PathBuf> {
    let path = dir.join(CODEOWNERS_FILE_NAME);
    if path.is_file() {
        debug!("Using existing {}", path.display());
        return Ok(path);
    }
    fs::create_dir_all(dir)?;
    fs::write(&path, "")?;
    info!("Created {}", path.display());
    Ok(path)
}

/// Parses the file at `path`.
pub fn read_codeowners_file(path: &Path) -> io::Result<SourceFile> {
    let source = fs::read(path)?;
    Ok(match String::from_utf8(source) {
        Ok(text) => parse(&text),
        Err(err) => {
            warn!("{} is not valid UTF-8, decoding lossily", path.display());
            parse_bytes(err.as_bytes())
        }
    })
}
