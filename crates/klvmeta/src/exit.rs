use std::fmt;
use std::io;

use klvmeta_document::DocumentError;
use klvmeta_frame::FrameError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

pub fn document_error(context: &str, err: DocumentError) -> CliError {
    match err {
        DocumentError::Frame(err) => frame_error(context, err),
        DocumentError::Open { path, source } => {
            io_error(&format!("{context}: {}", path.display()), source)
        }
        DocumentError::Write { path, source } => {
            io_error(&format!("{context}: {}", path.display()), source)
        }
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_stream_is_data_invalid() {
        let err = document_error(
            "decode failed",
            DocumentError::Frame(FrameError::InvalidKey { found: [0; 16] }),
        );
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.starts_with("decode failed: invalid block key"));
    }

    #[test]
    fn missing_input_is_failure() {
        let err = document_error(
            "decode failed",
            DocumentError::Open {
                path: "missing.klv".into(),
                source: io::Error::from(io::ErrorKind::NotFound),
            },
        );
        assert_eq!(err.code, FAILURE);
        assert!(err.message.contains("missing.klv"));
    }

    #[test]
    fn stream_io_error_maps_by_kind() {
        let err = frame_error(
            "inspect failed",
            FrameError::Io(io::Error::from(io::ErrorKind::PermissionDenied)),
        );
        assert_eq!(err.code, PERMISSION_DENIED);
    }
}
