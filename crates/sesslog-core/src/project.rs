use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

const GIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Project name used when a transcript carries no working directory.
pub const UNKNOWN_PROJECT: &str = "unknown";

/// Resolve a project name for a working directory.
///
/// Prefers the directory name of the enclosing git toplevel, falls back to the
/// last component of `cwd` itself.
pub fn resolve_project_name(cwd: &str) -> String {
    if cwd.is_empty() {
        return UNKNOWN_PROJECT.to_string();
    }
    if let Some(name) = git_toplevel(cwd).as_deref().and_then(dir_name) {
        return name;
    }
    dir_name(cwd).unwrap_or_else(|| UNKNOWN_PROJECT.to_string())
}

fn dir_name(path: &str) -> Option<String> {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .filter(|n| !n.is_empty())
}

fn git_toplevel(cwd: &str) -> Option<String> {
    let mut child = Command::new("git")
        .args(["-C", cwd, "rev-parse", "--show-toplevel"])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .ok()?;

    let start = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if start.elapsed() > GIT_TIMEOUT => {
                let _ = child.kill();
                let _ = child.wait();
                tracing::debug!(cwd, "git rev-parse timed out");
                return None;
            }
            Ok(None) => std::thread::sleep(Duration::from_millis(10)),
            Err(_) => return None,
        }
    };
    if !status.success() {
        return None;
    }

    let mut out = String::new();
    child.stdout.take()?.read_to_string(&mut out).ok()?;
    let top = out.trim();
    (!top.is_empty()).then(|| top.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cwd_is_unknown() {
        assert_eq!(resolve_project_name(""), "unknown");
    }

    #[test]
    fn non_repo_dir_uses_basename() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("my-project");
        std::fs::create_dir_all(&dir).unwrap();
        // tempdirs are normally outside any repository
        let name = resolve_project_name(&dir.to_string_lossy());
        assert!(!name.is_empty());
        if git_toplevel(&dir.to_string_lossy()).is_none() {
            assert_eq!(name, "my-project");
        }
    }

    #[test]
    fn missing_dir_still_yields_basename() {
        assert_eq!(
            resolve_project_name("/definitely/not/here/webapp"),
            "webapp"
        );
    }
}
