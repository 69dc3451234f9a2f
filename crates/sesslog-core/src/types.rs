use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Maximum number of characters kept per extracted message.
pub const MAX_MESSAGE_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Label used when rendering a conversation for summarization.
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Assistant => "CLAUDE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    /// Build a message, trimming surrounding whitespace and capping the text
    /// at [`MAX_MESSAGE_CHARS`] characters.
    pub fn new(role: Role, text: &str) -> Self {
        let text = text.trim().chars().take(MAX_MESSAGE_CHARS).collect();
        Self { role, text }
    }
}

/// A timestamp exactly as it appeared in the transcript.
///
/// Claude Code writes RFC 3339 strings, older tooling writes epoch numbers
/// (seconds or milliseconds). Interpretation happens at save time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventTime {
    Text(String),
    Epoch(serde_json::Number),
}

impl EventTime {
    /// Returns `None` for absent, empty, zero, or non-scalar values.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) if !s.is_empty() => Some(Self::Text(s.clone())),
            serde_json::Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => {
                Some(Self::Epoch(n.clone()))
            }
            _ => None,
        }
    }
}

/// Normalized result of folding one transcript.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: Option<String>,
    pub cwd: String,
    pub git_branch: String,
    pub messages: Vec<Message>,
    pub tools_used: BTreeSet<String>,
    pub files_changed: BTreeSet<String>,
    pub start_time: Option<EventTime>,
    pub end_time: Option<EventTime>,
}

impl SessionRecord {
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_trimmed_and_capped() {
        let long = format!("  {}  ", "a".repeat(800));
        let msg = Message::new(Role::User, &long);
        assert_eq!(msg.text.chars().count(), MAX_MESSAGE_CHARS);
        assert!(msg.text.starts_with('a'));
    }

    #[test]
    fn message_cap_counts_chars_not_bytes() {
        let text = "後".repeat(600);
        let msg = Message::new(Role::Assistant, &text);
        assert_eq!(msg.text.chars().count(), MAX_MESSAGE_CHARS);
        assert_eq!(msg.text.len(), MAX_MESSAGE_CHARS * 3);
    }

    #[test]
    fn event_time_keeps_original_representation() {
        let text = EventTime::from_json(&serde_json::json!("2026-01-10T09:30:00Z"));
        assert_eq!(text, Some(EventTime::Text("2026-01-10T09:30:00Z".into())));

        let epoch = EventTime::from_json(&serde_json::json!(1700000000123u64)).unwrap();
        assert_eq!(serde_json::to_string(&epoch).unwrap(), "1700000000123");
    }

    #[test]
    fn event_time_rejects_falsy_values() {
        assert_eq!(EventTime::from_json(&serde_json::json!("")), None);
        assert_eq!(EventTime::from_json(&serde_json::json!(0)), None);
        assert_eq!(EventTime::from_json(&serde_json::Value::Null), None);
        assert_eq!(EventTime::from_json(&serde_json::json!({"a": 1})), None);
    }

    #[test]
    fn role_labels() {
        assert_eq!(Role::User.label(), "USER");
        assert_eq!(Role::Assistant.label(), "CLAUDE");
    }
}
