use crate::event::{ContentBlock, Event, UserContent};
use serde_json::Value;
use sesslog_core::{EventTime, Message, Role, SessionLogError, SessionRecord};
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Synthetic tool name registered when a shell command makes a git commit.
const COMMIT_MARKER: &str = "git_commit";

/// Parse a transcript JSONL file into a [`SessionRecord`].
///
/// Never fails: an unopenable file yields an empty record, and lines that do
/// not decode as JSON objects are skipped.
pub fn parse_transcript(path: &Path) -> SessionRecord {
    match std::fs::File::open(path) {
        Ok(file) => parse_reader(BufReader::new(file)),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot open transcript");
            SessionRecord::default()
        }
    }
}

/// Like [`parse_transcript`], but a file that cannot be opened or read is an
/// error instead of an empty record. Undecodable lines are still skipped.
pub fn try_parse_transcript(path: &Path) -> Result<SessionRecord, SessionLogError> {
    let file = std::fs::File::open(path).map_err(|e| SessionLogError::io(path, e))?;
    let mut record = SessionRecord::default();
    fold_lines(BufReader::new(file), &mut record).map_err(|e| SessionLogError::io(path, e))?;
    Ok(record)
}

/// Fold newline-delimited events from any reader into a [`SessionRecord`].
/// A read error ends the fold and keeps what was parsed so far.
fn parse_reader<R: BufRead>(reader: R) -> SessionRecord {
    let mut record = SessionRecord::default();
    if let Err(e) = fold_lines(reader, &mut record) {
        tracing::warn!(error = %e, "transcript read aborted");
    }
    record
}

fn fold_lines<R: BufRead>(reader: R, record: &mut SessionRecord) -> std::io::Result<()> {
    for (lineno, raw_line) in reader.split(b'\n').enumerate() {
        let raw_line = raw_line?;
        if raw_line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        let parsed: Value = match serde_json::from_slice(&raw_line) {
            Ok(v @ Value::Object(_)) => v,
            Ok(_) | Err(_) => {
                tracing::trace!(line = lineno + 1, "skipping undecodable line");
                continue;
            }
        };
        fold_event(record, &parsed);
    }
    Ok(())
}

fn fold_event(record: &mut SessionRecord, json: &Value) {
    fill_first(&mut record.session_id, json, "sessionId");
    if record.cwd.is_empty() {
        record.cwd = non_empty_str(json, "cwd").unwrap_or_default();
    }
    if record.git_branch.is_empty() {
        record.git_branch = non_empty_str(json, "gitBranch").unwrap_or_default();
    }
    if let Some(ts) = json.get("timestamp").and_then(EventTime::from_json) {
        if record.start_time.is_none() {
            record.start_time = Some(ts.clone());
        }
        record.end_time = Some(ts);
    }

    match Event::classify(json) {
        Event::User(content) => extract_user(record, &content),
        Event::Assistant(blocks) => extract_assistant(record, &blocks),
        Event::Other => {}
    }
}

fn fill_first(slot: &mut Option<String>, json: &Value, key: &str) {
    if slot.is_none() {
        *slot = non_empty_str(json, key);
    }
}

fn non_empty_str(json: &Value, key: &str) -> Option<String> {
    json.get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A plain-string prompt counts only when non-blank; from a block list the
/// first text block is taken as-is.
fn extract_user(record: &mut SessionRecord, content: &UserContent<'_>) {
    match content {
        UserContent::Plain(text) if !text.trim().is_empty() => {
            record.messages.push(Message::new(Role::User, text));
        }
        UserContent::Blocks(blocks) => {
            let first_text = blocks.iter().find_map(|b| match b {
                ContentBlock::Text(text) => Some(*text),
                _ => None,
            });
            if let Some(text) = first_text {
                record.messages.push(Message::new(Role::User, text));
            }
        }
        _ => {}
    }
}

/// Takes the first non-blank text block as the message and registers every
/// tool_use block of the event, including those after the message block.
fn extract_assistant(record: &mut SessionRecord, blocks: &[ContentBlock<'_>]) {
    let mut message: Option<Message> = None;
    for block in blocks {
        match block {
            ContentBlock::Text(text) if message.is_none() && !text.trim().is_empty() => {
                message = Some(Message::new(Role::Assistant, text));
            }
            ContentBlock::ToolUse { name, input } => register_tool_use(record, name, input),
            _ => {}
        }
    }
    if let Some(message) = message {
        record.messages.push(message);
    }
}

fn register_tool_use(record: &mut SessionRecord, name: &str, input: &Value) {
    if name.is_empty() {
        return;
    }
    record.tools_used.insert(name.to_string());

    let path_key = match name {
        "Write" | "Edit" | "MultiEdit" => Some("file_path"),
        "NotebookEdit" => Some("notebook_path"),
        _ => None,
    };
    if let Some(path) = path_key.and_then(|key| non_empty_str(input, key)) {
        record.files_changed.insert(path);
    }

    if name == "Bash" {
        let command = input.get("command").and_then(|c| c.as_str()).unwrap_or("");
        if command.contains("git commit") {
            record.tools_used.insert(COMMIT_MARKER.to_string());
        }
    }
}
