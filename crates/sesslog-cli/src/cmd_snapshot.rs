use sesslog_core::{resolve_project_name, SessionLogConfig, SessionLogError};
use sesslog_store::save_snapshot;
use sesslog_transcript::try_parse_transcript;
use std::path::{Path, PathBuf};

/// Archive a transcript verbatim, returning the snapshot path.
pub fn run(
    config: &SessionLogConfig,
    transcript: &Path,
    session_id: Option<&str>,
    project: Option<&str>,
) -> anyhow::Result<PathBuf> {
    if !transcript.exists() {
        return Err(SessionLogError::TranscriptNotFound(transcript.to_path_buf()).into());
    }

    // Parsed only for project and session id; the snapshot itself is a raw copy
    let record = try_parse_transcript(transcript)?;
    let project = match project {
        Some(p) => p.to_string(),
        None => resolve_project_name(&record.cwd),
    };
    let session_id = session_id
        .or(record.session_id.as_deref())
        .unwrap_or("unknown");

    save_snapshot(&config.root, transcript, session_id, &project)
}

/// Execute `sesslog snapshot <transcript> [session-id] [--project P]`.
pub fn execute(
    config: &SessionLogConfig,
    transcript: &Path,
    session_id: Option<&str>,
    project: Option<&str>,
) -> anyhow::Result<()> {
    let path = run(config, transcript, session_id, project)?;
    println!("Snapshot saved: {}", path.display());
    Ok(())
}
