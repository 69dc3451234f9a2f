use sesslog_core::{resolve_project_name, SessionLogConfig, SessionLogError};
use sesslog_store::save_summary;
use sesslog_summarize::{SummaryGenerator, Tier};
use sesslog_transcript::{render_conversation, try_parse_transcript};
use std::path::{Path, PathBuf};

/// Sessions with fewer messages than this are not worth a summary.
const MIN_MESSAGES: usize = 2;

/// Session id recorded when neither the caller nor the transcript has one.
const UNKNOWN_SESSION: &str = "unknown";

#[derive(Debug)]
pub enum SummarizeOutcome {
    Saved {
        summary_path: PathBuf,
        project: String,
        tier: Tier,
    },
    Skipped {
        message_count: usize,
    },
}

/// Parse, render, summarize, store, index.
///
/// A missing or unreadable transcript is the only hard failure before
/// storage; a session that is too short is reported as
/// [`SummarizeOutcome::Skipped`].
pub fn run(
    config: &SessionLogConfig,
    transcript: &Path,
    session_id: Option<&str>,
    project: Option<&str>,
    generator: &SummaryGenerator,
) -> anyhow::Result<SummarizeOutcome> {
    if !transcript.exists() {
        return Err(SessionLogError::TranscriptNotFound(transcript.to_path_buf()).into());
    }

    let record = try_parse_transcript(transcript)?;
    let message_count = record.message_count();
    if message_count < MIN_MESSAGES {
        return Ok(SummarizeOutcome::Skipped { message_count });
    }

    let project = match project {
        Some(p) => p.to_string(),
        None => resolve_project_name(&record.cwd),
    };
    let session_id = session_id
        .or(record.session_id.as_deref())
        .unwrap_or(UNKNOWN_SESSION);

    let conversation = render_conversation(&project, &record);
    let summary = generator.summarize(&conversation);
    tracing::debug!(tier = ?summary.tier, chars = summary.text.len(), "summary ready");

    let saved = save_summary(&config.root, &project, session_id, &summary.text, &record)?;
    Ok(SummarizeOutcome::Saved {
        summary_path: saved.path,
        project,
        tier: summary.tier,
    })
}

/// Execute `sesslog summarize <transcript> [session-id] [--project P]`.
pub fn execute(
    config: &SessionLogConfig,
    transcript: &Path,
    session_id: Option<&str>,
    project: Option<&str>,
) -> anyhow::Result<()> {
    let generator = SummaryGenerator::from_config(&config.generator);
    match run(config, transcript, session_id, project, &generator)? {
        SummarizeOutcome::Saved { summary_path, .. } => {
            println!("Summary saved: {}", summary_path.display());
        }
        SummarizeOutcome::Skipped { .. } => {
            eprintln!("Session too short, skipping summarization.");
        }
    }
    Ok(())
}
