const USER_PREFIX: &str = "USER: ";
const TASK_CHARS: usize = 74;

/// Deterministic summary built from the rendered conversation alone.
pub(crate) fn basic_summary(conversation: &str) -> String {
    let user_lines: Vec<&str> = conversation
        .lines()
        .filter(|l| l.starts_with(USER_PREFIX))
        .collect();
    let task = match user_lines.first() {
        Some(line) => line[USER_PREFIX.len()..].chars().take(TASK_CHARS).collect(),
        None => "Unknown task".to_string(),
    };
    format!(
        "# Session summary\n## Task\n{task}\n## Messages\n{} user messages",
        user_lines.len()
    )
}
