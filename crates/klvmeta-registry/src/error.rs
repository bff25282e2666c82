/// Errors that can occur while decoding a single field value.
///
/// These never abort a block: the field is left out of its frame and the
/// error is reported as a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// No rule is registered for the tag.
    #[error("unknown tag {tag}")]
    UnknownTag { tag: u8 },

    /// An integer value longer than the widest supported integer.
    #[error("{name} (tag {tag}) accepts at most {max} bytes, got {actual}")]
    ValueTooLong {
        tag: u8,
        name: &'static str,
        max: usize,
        actual: usize,
    },

    /// A timestamp that cannot be represented as a calendar time.
    #[error("timestamp {micros} us is out of range")]
    TimestampOutOfRange { micros: i128 },
}

pub type Result<T> = std::result::Result<T, FieldError>;
