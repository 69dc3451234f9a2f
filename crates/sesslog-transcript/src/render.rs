use sesslog_core::SessionRecord;

/// Ceiling on rendered conversation length, in characters.
const MAX_RENDER_CHARS: usize = 30_000;

/// Appended when the conversation body was cut at [`MAX_RENDER_CHARS`].
const TRUNCATION_MARKER: &str = "\n\n[... truncated ...]";

const MAX_TOOLS: usize = 20;
const MAX_FILES: usize = 30;

/// Render a session record as plain text for a summarization prompt.
///
/// Header lines come first so a cut at the ceiling only ever drops the tail
/// of the conversation.
pub fn render_conversation(project: &str, record: &SessionRecord) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("Project: {project}"));
    if !record.git_branch.is_empty() {
        lines.push(format!("Branch: {}", record.git_branch));
    }
    if !record.tools_used.is_empty() {
        let tools: Vec<&str> = record
            .tools_used
            .iter()
            .take(MAX_TOOLS)
            .map(String::as_str)
            .collect();
        lines.push(format!("Tools used: {}", tools.join(", ")));
    }
    if !record.files_changed.is_empty() {
        let files: Vec<&str> = record
            .files_changed
            .iter()
            .take(MAX_FILES)
            .map(String::as_str)
            .collect();
        lines.push(format!("Files changed: {}", files.join(", ")));
    }
    lines.push(String::new());
    lines.push("=== Conversation ===".to_string());
    for msg in &record.messages {
        lines.push(format!("\n{}: {}", msg.role.label(), msg.text));
    }

    let text = lines.join("\n");
    match text.char_indices().nth(MAX_RENDER_CHARS) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &text[..cut]),
        None => text,
    }
}
