use std::path::PathBuf;

/// Setup-time audio failures. Gameplay calls log and no-op instead.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("audio backend error: {0}")]
    Backend(String),
    #[error("failed to load clip {path:?}: {reason}")]
    ClipLoad { path: PathBuf, reason: String },
    #[error("failed to read audio manifest {path:?}: {source}")]
    ManifestIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid audio manifest: {0}")]
    ManifestParse(#[from] ron::error::SpannedError),
}
