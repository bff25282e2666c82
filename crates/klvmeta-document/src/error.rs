use std::path::PathBuf;

/// Errors that abort a decode run.
///
/// Any of these discards the document being built.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The stream framing is corrupt or truncated.
    #[error("frame error: {0}")]
    Frame(#[from] klvmeta_frame::FrameError),

    /// The input stream could not be opened.
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An output artifact could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DocumentError>;
