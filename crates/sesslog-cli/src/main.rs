mod cmd_list;
mod cmd_search;
mod cmd_snapshot;
mod cmd_summarize;
mod logging;

use clap::{Parser, Subcommand};
use sesslog_core::SessionLogConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sesslog", version, about = "Session logger for coding agents")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Summarize a session transcript and file it under its project
    Summarize {
        /// Path to the transcript JSONL file
        transcript_path: PathBuf,
        /// Session id (defaults to the id found in the transcript)
        session_id: Option<String>,
        /// Project name (defaults to the git toplevel of the session cwd)
        #[arg(long)]
        project: Option<String>,
    },
    /// Save a verbatim copy of a transcript under `<project>/raw/`
    Snapshot {
        /// Path to the transcript JSONL file
        transcript_path: PathBuf,
        /// Session id (defaults to the id found in the transcript)
        session_id: Option<String>,
        /// Project name (defaults to the git toplevel of the session cwd)
        #[arg(long)]
        project: Option<String>,
    },
    /// Search stored summaries by keyword
    Search {
        /// Whitespace-separated keywords
        query: String,
        /// Only search this project
        #[arg(long)]
        project: Option<String>,
        /// Maximum number of results
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// List recent sessions for a project, or all projects with counts
    List {
        /// Project to list
        #[arg(long)]
        project: Option<String>,
        /// Only show sessions from the last N days
        #[arg(long, default_value_t = 7)]
        days: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init("warn");
    let config = SessionLogConfig::from_env();
    tracing::debug!(root = %config.root.display(), "configuration resolved");

    match cli.cmd {
        Command::Summarize {
            transcript_path,
            session_id,
            project,
        } => cmd_summarize::execute(
            &config,
            &transcript_path,
            session_id.as_deref(),
            project.as_deref(),
        ),
        Command::Snapshot {
            transcript_path,
            session_id,
            project,
        } => cmd_snapshot::execute(
            &config,
            &transcript_path,
            session_id.as_deref(),
            project.as_deref(),
        ),
        Command::Search {
            query,
            project,
            limit,
        } => cmd_search::execute(&config, &query, project.as_deref(), limit),
        Command::List {
            project,
            days,
            json,
        } => cmd_list::execute(&config, project.as_deref(), days, json),
    }
}
