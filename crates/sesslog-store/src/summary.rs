use crate::index::{append_entry, IndexEntry};
use crate::timestamp::resolve_save_time;
use anyhow::Context;
use regex::Regex;
use sesslog_core::SessionRecord;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Opening delimiter of the metadata block at the top of a stored summary.
pub const META_OPEN: &str = "<!--";
/// Closing delimiter of the metadata block.
pub const META_CLOSE: &str = "-->";

const DEFAULT_TOPIC: &str = "session";
const MAX_TOPIC_CHARS: usize = 50;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\s*Session:.*?[—–]\s*(.+)").unwrap());
static NON_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s-]").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Where and under which name a summary was stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSummary {
    pub path: PathBuf,
    pub date: String,
    pub time: String,
    pub topic: String,
}

/// Derive a filename-safe topic from a `# Session: <date> — <title>` line.
pub(crate) fn extract_topic(summary: &str) -> String {
    let Some(caps) = TITLE_RE.captures(summary) else {
        return DEFAULT_TOPIC.to_string();
    };
    let cleaned = NON_WORD_RE.replace_all(&caps[1], "");
    let hyphenated = WHITESPACE_RE.replace_all(cleaned.trim(), "-");
    let topic: String = hyphenated
        .chars()
        .take(MAX_TOPIC_CHARS)
        .collect::<String>()
        .to_lowercase();
    if topic.is_empty() {
        DEFAULT_TOPIC.to_string()
    } else {
        topic
    }
}

/// Store a summary under `<root>/<project>/<date>/` and add it to the index.
///
/// The file is created fresh; an existing name gets a `_<n>` suffix instead
/// of being overwritten.
pub fn save_summary(
    root: &Path,
    project: &str,
    session_id: &str,
    summary: &str,
    record: &SessionRecord,
) -> anyhow::Result<SavedSummary> {
    let project_dir = root.join(project);
    let saved_at = resolve_save_time(record.start_time.as_ref());
    let date = saved_at.format("%Y-%m-%d").to_string();
    let time = saved_at.format("%H-%M").to_string();
    let topic = extract_topic(summary);

    let day_dir = project_dir.join(&date);
    let (path, mut file) = crate::create_unique(&day_dir, &format!("{time}_{topic}"), "md")?;

    let meta = format!(
        "{META_OPEN}\n\
         session_id: {session_id}\n\
         project: {project}\n\
         branch: {branch}\n\
         date: {iso}\n\
         files_changed: {files}\n\
         message_count: {messages}\n\
         {META_CLOSE}\n\n",
        branch = record.git_branch,
        iso = saved_at.to_rfc3339(),
        files = record.files_changed.len(),
        messages = record.message_count(),
    );
    file.write_all(meta.as_bytes())
        .and_then(|_| file.write_all(summary.as_bytes()))
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), "summary saved");

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let entry = IndexEntry::new(&date, &time, &topic, &file_name, summary, session_id);
    append_entry(&project_dir, project, &entry)?;

    Ok(SavedSummary {
        path,
        date,
        time,
        topic,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sesslog_core::{EventTime, Message, Role};
    use std::fs;

    fn record() -> SessionRecord {
        SessionRecord {
            session_id: Some("abcd1234-5678".into()),
            cwd: "/work/webapp".into(),
            git_branch: "main".into(),
            messages: vec![
                Message::new(Role::User, "fix login bug"),
                Message::new(Role::Assistant, "done"),
            ],
            files_changed: ["auth.py".to_string()].into_iter().collect(),
            start_time: Some(EventTime::Text("2026-01-10T09:30:00Z".into())),
            ..Default::default()
        }
    }

    const SUMMARY: &str =
        "# Session: 2026-01-10 — Fix login bug!\n## Status: completed\n## Summary\nFixed it.";

    #[test]
    fn topic_from_title_line() {
        assert_eq!(extract_topic(SUMMARY), "fix-login-bug");
        assert_eq!(
            extract_topic("# Session: 2026-01-10 – Add   OAuth (v2) support"),
            "add-oauth-v2-support"
        );
    }

    #[test]
    fn topic_defaults_without_title() {
        assert_eq!(extract_topic("# Session summary\n## Task\nx"), "session");
        assert_eq!(extract_topic("# Session: 2026-01-10 — !!!"), "session");
    }

    #[test]
    fn topic_is_capped_and_lowercased() {
        let title = format!("# Session: d — {}", "Word ".repeat(30));
        let topic = extract_topic(&title);
        assert_eq!(topic.chars().count(), MAX_TOPIC_CHARS);
        assert_eq!(topic, topic.to_lowercase());
    }

    #[test]
    fn topic_keeps_unicode_words() {
        assert_eq!(
            extract_topic("# Session: 2026-01-10 — Исправить вход"),
            "исправить-вход"
        );
    }

    #[test]
    fn save_writes_metadata_and_body() {
        let tmp = tempfile::tempdir().unwrap();
        let saved = save_summary(tmp.path(), "webapp", "abcd1234-5678", SUMMARY, &record()).unwrap();

        assert_eq!(
            saved.path,
            tmp.path()
                .join("webapp")
                .join("2026-01-10")
                .join("09-30_fix-login-bug.md")
        );
        let content = fs::read_to_string(&saved.path).unwrap();
        assert!(content.starts_with("<!--\nsession_id: abcd1234-5678\nproject: webapp\nbranch: main\n"));
        assert!(content.contains("date: 2026-01-10T09:30:00+00:00\n"));
        assert!(content.contains("files_changed: 1\n"));
        assert!(content.contains("message_count: 2\n-->\n\n# Session:"));
        assert!(content.ends_with("Fixed it."));
    }

    #[test]
    fn identical_saves_produce_distinct_files() {
        let tmp = tempfile::tempdir().unwrap();
        let a = save_summary(tmp.path(), "webapp", "s1", SUMMARY, &record()).unwrap();
        let b = save_summary(tmp.path(), "webapp", "s2", SUMMARY, &record()).unwrap();
        assert_ne!(a.path, b.path);
        assert!(b.path.ends_with("09-30_fix-login-bug_1.md"));
        assert!(fs::read_to_string(&a.path).unwrap().contains("session_id: s1"));
        assert!(fs::read_to_string(&b.path).unwrap().contains("session_id: s2"));
    }

    #[test]
    fn save_appends_index_row() {
        let tmp = tempfile::tempdir().unwrap();
        save_summary(tmp.path(), "webapp", "abcd1234-5678", SUMMARY, &record()).unwrap();
        let index = fs::read_to_string(tmp.path().join("webapp").join("INDEX.md")).unwrap();
        assert!(index.contains(
            "| 2026-01-10 09:30 | fix login bug | completed | [09-30_fix-login-bug.md](2026-01-10/09-30_fix-login-bug.md) | `abcd1234` |"
        ));
    }

    #[test]
    fn untitled_summaries_share_topic_and_get_counters() {
        let tmp = tempfile::tempdir().unwrap();
        let body = "# Session summary\n## Task\nx\n## Messages\n1 user messages";
        let first = save_summary(tmp.path(), "p", "s", body, &record()).unwrap();
        let second = save_summary(tmp.path(), "p", "s", body, &record()).unwrap();
        assert!(first.path.ends_with("09-30_session.md"));
        assert!(second.path.ends_with("09-30_session_1.md"));
    }
}
