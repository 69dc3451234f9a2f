use crate::{create_unique, short_id, RAW_DIR};
use anyhow::Context;
use chrono::Local;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Copy a transcript byte-for-byte to
/// `<root>/<project>/raw/<YYYY-MM-DD_HH-MM>_<session8>.jsonl`.
pub fn save_snapshot(
    root: &Path,
    transcript: &Path,
    session_id: &str,
    project: &str,
) -> anyhow::Result<PathBuf> {
    let mut source =
        File::open(transcript).with_context(|| format!("opening {}", transcript.display()))?;
    let raw_dir = root.join(project).join(RAW_DIR);
    let stem = format!(
        "{}_{}",
        Local::now().format("%Y-%m-%d_%H-%M"),
        short_id(session_id)
    );
    let (path, mut dest) = create_unique(&raw_dir, &stem, "jsonl")?;
    io::copy(&mut source, &mut dest).with_context(|| format!("writing {}", path.display()))?;
    dest.flush()?;
    tracing::info!(path = %path.display(), "snapshot saved");
    Ok(path)
}
