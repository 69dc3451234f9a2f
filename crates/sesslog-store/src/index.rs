//! `INDEX.md`: a markdown table of stored summaries, newest row first.

use crate::{short_id, write_atomic};
use anyhow::Context;
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

pub const INDEX_FILE: &str = "INDEX.md";

const TABLE_HEADER: &str = "| Date | Topic | Status | File | Session |";
const TABLE_SEPARATOR: &str = "| --- | --- | --- | --- | --- |";
const DEFAULT_STATUS: &str = "unknown";

static STATUS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"##\s*Status:\s*(.+)").unwrap());

/// One row of the index table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub topic: String,
    pub status: String,
    pub file_name: String,
    /// Path relative to the project directory.
    pub link: String,
    pub session: String,
}

impl IndexEntry {
    /// Build the row for a freshly saved summary. `time` is the `HH-MM` form
    /// used in file names; `topic` is the hyphenated slug.
    pub fn new(
        date: &str,
        time: &str,
        topic: &str,
        file_name: &str,
        summary: &str,
        session_id: &str,
    ) -> Self {
        Self {
            date: date.to_string(),
            time: time.replace('-', ":"),
            topic: topic.replace('-', " "),
            status: extract_status(summary),
            file_name: file_name.to_string(),
            link: format!("{date}/{file_name}"),
            session: short_id(session_id),
        }
    }

    pub fn to_row(&self) -> String {
        format!(
            "| {} {} | {} | {} | [{}]({}) | `{}` |",
            self.date,
            self.time,
            escape_cell(&self.topic),
            escape_cell(&self.status),
            self.file_name,
            self.link,
            self.session,
        )
    }

    /// Parse a row written by [`IndexEntry::to_row`]. Header, separator and
    /// foreign lines yield `None`.
    pub fn parse_row(line: &str) -> Option<Self> {
        let inner = line.trim().strip_prefix("| ")?.strip_suffix(" |")?;
        let cells: Vec<&str> = inner.split(" | ").collect();
        let [when, topic, status, file, session] = cells.as_slice() else {
            return None;
        };
        let (date, time) = when.split_once(' ')?;
        let (file_name, link) = file.strip_prefix('[')?.strip_suffix(')')?.split_once("](")?;
        let session = session.strip_prefix('`')?.strip_suffix('`')?;
        Some(Self {
            date: date.to_string(),
            time: time.to_string(),
            topic: unescape_cell(topic),
            status: unescape_cell(status),
            file_name: file_name.to_string(),
            link: link.to_string(),
            session: session.to_string(),
        })
    }
}

/// Text after `## Status:` in a summary, or `unknown`.
pub(crate) fn extract_status(summary: &str) -> String {
    STATUS_RE
        .captures(summary)
        .map(|caps| caps[1].trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_STATUS.to_string())
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|")
}

fn unescape_cell(s: &str) -> String {
    s.replace("\\|", "|")
}

fn new_document(project: &str, row: &str) -> String {
    format!("# Session Log — {project}\n\n{TABLE_HEADER}\n{TABLE_SEPARATOR}\n{row}\n")
}

/// Insert `row` right after the table separator so the newest entry is on top.
/// A document without a table gets one appended; other content is kept as is.
fn insert_row(existing: &str, row: &str) -> String {
    let mut out = String::with_capacity(existing.len() + row.len() + 1);
    let mut inserted = false;
    for line in existing.split_inclusive('\n') {
        out.push_str(line);
        if !inserted && line.trim_start().starts_with("| ---") {
            if !line.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(row);
            out.push('\n');
            inserted = true;
        }
    }
    if !inserted {
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(TABLE_HEADER);
        out.push('\n');
        out.push_str(TABLE_SEPARATOR);
        out.push('\n');
        out.push_str(row);
        out.push('\n');
    }
    out
}

/// Add `entry` to `<project_dir>/INDEX.md`, creating the document if needed.
pub fn append_entry(project_dir: &Path, project: &str, entry: &IndexEntry) -> anyhow::Result<()> {
    let path = project_dir.join(INDEX_FILE);
    let row = entry.to_row();
    let content = match fs::read_to_string(&path) {
        Ok(existing) => insert_row(&existing, &row),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => new_document(project, &row),
        Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
    };
    write_atomic(&path, content.as_bytes())?;
    tracing::debug!(path = %path.display(), "index updated");
    Ok(())
}

/// Rows of `<project_dir>/INDEX.md` in document order (newest first).
/// A missing index is an empty list.
pub fn list_entries(project_dir: &Path) -> anyhow::Result<Vec<IndexEntry>> {
    let path = project_dir.join(INDEX_FILE);
    let content = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
    };
    Ok(content.lines().filter_map(IndexEntry::parse_row).collect())
}

/// Title and table header lines of an index, for display.
pub fn header_lines(project: &str) -> [String; 3] {
    [
        format!("# Session Log — {project}"),
        TABLE_HEADER.to_string(),
        TABLE_SEPARATOR.to_string(),
    ]
}
