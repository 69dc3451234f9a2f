//! Durable storage under `<root>/<project>/`:
//!
//! - `<date>/<HH-MM>_<topic>[_<n>].md` summaries with a metadata header
//! - `INDEX.md` newest-first table of summaries
//! - `raw/<YYYY-MM-DD_HH-MM>_<session8>.jsonl` verbatim transcript snapshots

mod index;
mod snapshot;
mod summary;
mod timestamp;

pub use index::{append_entry, header_lines, list_entries, IndexEntry, INDEX_FILE};
pub use snapshot::save_snapshot;
pub use summary::{save_summary, SavedSummary, META_CLOSE, META_OPEN};

use anyhow::Context;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Directory name for raw snapshots inside a project directory.
pub const RAW_DIR: &str = "raw";

/// First eight characters of a session id, as used in names and the index.
pub(crate) fn short_id(session_id: &str) -> String {
    session_id.chars().take(8).collect()
}

/// Atomic write: write to temp file in same dir, then rename.
pub(crate) fn write_atomic(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("no parent dir for {}", path.display()))?;
    fs::create_dir_all(parent)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.persist(path)?;
    Ok(())
}

/// Create `<dir>/<stem>.<ext>`, or the first free `<stem>_<n>.<ext>` for n = 1, 2, ...
///
/// Uses create-new semantics, so an existing file is never opened for writing.
pub(crate) fn create_unique(dir: &Path, stem: &str, ext: &str) -> anyhow::Result<(PathBuf, fs::File)> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let mut counter = 0u32;
    loop {
        let name = if counter == 0 {
            format!("{stem}.{ext}")
        } else {
            format!("{stem}_{counter}.{ext}")
        };
        let path = dir.join(name);
        match fs::OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => counter += 1,
            Err(e) => {
                return Err(e).with_context(|| format!("creating {}", path.display()));
            }
        }
    }
}
