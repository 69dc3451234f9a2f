use std::path::PathBuf;

/// Conditions that end a pipeline invocation instead of degrading it.
#[derive(Debug, thiserror::Error)]
pub enum SessionLogError {
    #[error("Transcript not found: {}", .0.display())]
    TranscriptNotFound(PathBuf),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SessionLogError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
