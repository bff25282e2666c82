use serde::Serialize;

use klvmeta_registry::FieldError;

/// A field that was left out of its frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Index of the frame the field belonged to.
    pub frame: usize,
    pub tag: u8,
    pub message: String,
}

impl Diagnostic {
    pub fn from_field_error(frame: usize, tag: u8, err: &FieldError) -> Self {
        Self {
            frame,
            tag,
            message: err.to_string(),
        }
    }
}
