use crate::provider::{non_empty, GenerateError, SummaryProvider};
use sesslog_core::GeneratorConfig;
use std::io::{Read, Seek, Write};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// External CLI tier (`claude -p ...`): prompt on stdin, summary on stdout.
///
/// Stdin and stdout are backed by temp files so the wait loop never blocks
/// on a full pipe and the timeout is always honored.
#[derive(Debug, Clone)]
pub struct CommandProvider {
    bin: PathBuf,
    args: Vec<String>,
    timeout: Duration,
    strip_env: Vec<String>,
}

impl CommandProvider {
    pub fn new(bin: impl Into<PathBuf>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            bin: bin.into(),
            args,
            timeout,
            strip_env: Vec::new(),
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self {
            bin: config.cli_bin.clone(),
            args: config.cli_args.clone(),
            timeout: config.cli_timeout,
            strip_env: config.strip_env.clone(),
        }
    }

    fn wait(&self, child: &mut std::process::Child) -> Result<ExitStatus, GenerateError> {
        let start = Instant::now();
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }
            if start.elapsed() > self.timeout {
                let _ = child.kill();
                let _ = child.wait();
                return Err(GenerateError::Timeout(self.timeout));
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }
}

impl SummaryProvider for CommandProvider {
    fn name(&self) -> &'static str {
        "command"
    }

    fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let mut stdin_file = tempfile::tempfile()?;
        stdin_file.write_all(prompt.as_bytes())?;
        stdin_file.rewind()?;
        let mut stdout_file = tempfile::tempfile()?;

        let mut cmd = Command::new(&self.bin);
        cmd.args(&self.args)
            .stdin(Stdio::from(stdin_file))
            .stdout(Stdio::from(stdout_file.try_clone()?))
            .stderr(Stdio::null());
        // Allow nesting: the CLI refuses to run when it sees its own session markers
        for var in &self.strip_env {
            cmd.env_remove(var);
        }

        let mut child = cmd.spawn().map_err(GenerateError::Spawn)?;
        let status = self.wait(&mut child)?;
        if !status.success() {
            return Err(GenerateError::ExitStatus(status.code()));
        }

        stdout_file.rewind()?;
        let mut raw = Vec::new();
        stdout_file.read_to_end(&mut raw)?;
        non_empty(&String::from_utf8_lossy(&raw))
    }
}
