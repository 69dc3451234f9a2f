use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_API_MODEL: &str = "claude-haiku-4-5-20251001";
pub const DEFAULT_API_MAX_TOKENS: u32 = 1500;
pub const DEFAULT_CLI_BIN: &str = "claude";
pub const DEFAULT_CLI_TIMEOUT_SECS: u64 = 120;
const DEFAULT_API_TIMEOUT_SECS: u64 = 60;

/// Environment markers that make the Claude CLI believe it is nested inside
/// a running session. Removed from the child environment.
pub const NESTED_SESSION_MARKERS: &[&str] = &[
    "CLAUDECODE",
    "CLAUDE_CODE",
    "CLAUDE_CODE_RUNNING",
    "CLAUDE_CODE_ENTRYPOINT",
];

/// Process-wide settings, resolved once at startup and passed to each component.
#[derive(Debug, Clone)]
pub struct SessionLogConfig {
    /// Root of the per-project hierarchy (`<root>/<project>/...`).
    pub root: PathBuf,
    pub generator: GeneratorConfig,
}

/// Settings for the summary generation tiers.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub api_model: String,
    pub api_max_tokens: u32,
    pub api_timeout: Duration,
    pub cli_bin: PathBuf,
    pub cli_args: Vec<String>,
    pub cli_timeout: Duration,
    pub strip_env: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            api_model: DEFAULT_API_MODEL.to_string(),
            api_max_tokens: DEFAULT_API_MAX_TOKENS,
            api_timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
            cli_bin: PathBuf::from(DEFAULT_CLI_BIN),
            cli_args: default_cli_args(),
            cli_timeout: Duration::from_secs(DEFAULT_CLI_TIMEOUT_SECS),
            strip_env: NESTED_SESSION_MARKERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

fn default_cli_args() -> Vec<String> {
    [
        "-p",
        "--model",
        "haiku",
        "--no-session-persistence",
        "--output-format",
        "text",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Optional overrides read from `<root>/config.json`. Every field may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    api_url: Option<String>,
    api_model: Option<String>,
    api_max_tokens: Option<u32>,
    cli_bin: Option<PathBuf>,
    cli_args: Option<Vec<String>>,
    cli_timeout_secs: Option<u64>,
}

/// Return the default store root: `~/.claude/sessions-log/`.
pub fn default_root() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(".claude").join("sessions-log"),
        None => PathBuf::from(".sessions-log"),
    }
}

impl SessionLogConfig {
    /// Defaults rooted at `root`, with no credential. Used directly by tests.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            generator: GeneratorConfig::default(),
        }
    }

    /// Resolve from defaults, `<root>/config.json`, then process environment.
    pub fn from_env() -> Self {
        Self::resolve(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable lookup.
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let root = lookup("SESSLOG_ROOT")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_root);
        let file_path = root.join("config.json");
        let mut config = Self::with_root(root);
        config.apply_file(&file_path);
        config.apply_env(lookup);
        config
    }

    fn apply_file(&mut self, path: &Path) {
        let Ok(content) = std::fs::read_to_string(path) else {
            return;
        };
        let file: FileConfig = match serde_json::from_str(&content) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config file");
                return;
            }
        };
        let generator = &mut self.generator;
        if let Some(v) = file.api_url {
            generator.api_url = v;
        }
        if let Some(v) = file.api_model {
            generator.api_model = v;
        }
        if let Some(v) = file.api_max_tokens {
            generator.api_max_tokens = v;
        }
        if let Some(v) = file.cli_bin {
            generator.cli_bin = v;
        }
        if let Some(v) = file.cli_args {
            generator.cli_args = v;
        }
        if let Some(v) = file.cli_timeout_secs {
            generator.cli_timeout = Duration::from_secs(v);
        }
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let generator = &mut self.generator;
        generator.api_key = lookup("ANTHROPIC_API_KEY").filter(|v| !v.trim().is_empty());
        if let Some(v) = lookup("SESSLOG_API_URL") {
            generator.api_url = v;
        }
        if let Some(v) = lookup("SESSLOG_API_MODEL") {
            generator.api_model = v;
        }
        if let Some(v) = lookup("SESSLOG_CLI_BIN") {
            generator.cli_bin = PathBuf::from(v);
        }
        if let Some(secs) = lookup("SESSLOG_CLI_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            generator.cli_timeout = Duration::from_secs(secs);
        }
    }

    /// Directory holding everything stored for one project.
    pub fn project_dir(&self, project: &str) -> PathBuf {
        self.root.join(project)
    }
}
