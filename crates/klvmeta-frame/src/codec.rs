use bytes::{BufMut, Bytes, BytesMut};

use crate::ber::encode_ber_length;

/// Size of the universal key that opens every block.
pub const KEY_SIZE: usize = 16;

/// Universal key of the UAS datalink local set.
pub const UAS_LOCAL_SET_KEY: [u8; KEY_SIZE] = [
    0x06, 0x0E, 0x2B, 0x34, 0x02, 0x0B, 0x01, 0x01, 0x0E, 0x01, 0x03, 0x01, 0x01, 0x00, 0x00, 0x00,
];

/// Default maximum block payload size: 16 MiB.
pub const DEFAULT_MAX_BLOCK_SIZE: usize = 16 * 1024 * 1024;

/// One framed metadata block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Payload length declared by the BER length field.
    pub length: usize,
    /// The block payload (field records).
    pub payload: Bytes,
}

impl Block {
    /// Create a block from its payload.
    pub fn new(payload: impl Into<Bytes>) -> Self {
        let payload = payload.into();
        Self {
            length: payload.len(),
            payload,
        }
    }

    /// Iterate over the block's field records.
    pub fn fields(&self) -> crate::fields::FieldSplitter<'_> {
        crate::fields::FieldSplitter::new(&self.payload)
    }
}

/// Encode a block into the stream format.
///
/// Wire format:
/// ```text
/// ┌──────────────────┬──────────────┬────────────────────────────────┐
/// │ Key (16B)        │ BER length   │ Payload                        │
/// │ 06 0E 2B 34 ...  │ (1-9B)       │ tag(1B) len(1B) value(len B)…  │
/// └──────────────────┴──────────────┴────────────────────────────────┘
/// ```
pub fn encode_block(payload: &[u8], dst: &mut BytesMut) {
    dst.reserve(KEY_SIZE + 9 + payload.len());
    dst.put_slice(&UAS_LOCAL_SET_KEY);
    encode_ber_length(payload.len(), dst);
    dst.put_slice(payload);
}

/// Configuration for the block reader.
#[derive(Debug, Clone)]
pub struct BlockConfig {
    /// Maximum declared payload size in bytes. Default: 16 MiB.
    pub max_block_size: usize,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            max_block_size: DEFAULT_MAX_BLOCK_SIZE,
        }
    }
}
