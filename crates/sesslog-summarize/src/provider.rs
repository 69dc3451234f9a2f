use std::time::Duration;

/// Why a generation tier produced nothing. Always consumed by the chain.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("tier unavailable: {0}")]
    Unavailable(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("empty response")]
    EmptyResponse,

    #[error("failed to spawn: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("exited with status {0:?}")]
    ExitStatus(Option<i32>),
}

/// A capability that turns a summarization prompt into summary text.
pub trait SummaryProvider {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Generate summary text. `Ok` values are trimmed and non-empty.
    fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

/// Trim provider output, mapping blank text to [`GenerateError::EmptyResponse`].
pub(crate) fn non_empty(text: &str) -> Result<String, GenerateError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(GenerateError::EmptyResponse)
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_trims() {
        assert_eq!(non_empty("  hi \n").unwrap(), "hi");
        assert!(matches!(non_empty(" \n\t"), Err(GenerateError::EmptyResponse)));
    }

    #[test]
    fn timeout_message() {
        let err = GenerateError::Timeout(Duration::from_secs(120));
        assert_eq!(err.to_string(), "timed out after 120s");
    }
}
