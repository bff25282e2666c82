/// Errors that can occur while framing a KLV metadata stream.
///
/// Every variant is fatal for the scan: there is no resynchronization.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The 16 bytes at a block boundary are not the UAS local set key.
    #[error("invalid block key {}", hex(.found))]
    InvalidKey { found: [u8; 16] },

    /// The stream ended inside a key, length or block payload.
    #[error("stream truncated in {context} (expected {expected} bytes, got {actual})")]
    Truncated {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A long-form BER length uses more octets than fit the native width.
    #[error("BER length with {octets} octets does not fit in usize")]
    LengthOverflow { octets: usize },

    /// The declared block length exceeds the configured maximum.
    #[error("block too large ({size} bytes, max {max})")]
    BlockTooLarge { size: usize, max: usize },

    /// A field record runs past the end of its block payload.
    #[error(
        "field {tag} at offset {offset} declares {declared} bytes but only {remaining} remain"
    )]
    FieldOverrun {
        tag: u8,
        offset: usize,
        declared: usize,
        remaining: usize,
    },

    /// An I/O error occurred while reading the stream.
    #[error("stream I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

pub type Result<T> = std::result::Result<T, FrameError>;
