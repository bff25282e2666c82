//! KLV block framing for UAS telemetry metadata streams.
//!
//! A metadata stream is a sequence of blocks. Every block is framed with:
//! - A 16-byte universal key identifying the UAS local data set
//! - A BER length (short or long form)
//! - A payload of 1-byte tag, 1-byte length, value field records
//!
//! This crate finds block boundaries and splits payloads into field records.
//! It knows nothing about what individual tags mean.

pub mod ber;
pub mod codec;
pub mod error;
pub mod fields;
pub mod reader;

pub use ber::{encode_ber_length, read_ber_length};
pub use codec::{
    encode_block, Block, BlockConfig, DEFAULT_MAX_BLOCK_SIZE, KEY_SIZE, UAS_LOCAL_SET_KEY,
};
pub use error::{FrameError, Result};
pub use fields::{FieldRecord, FieldSplitter};
pub use reader::BlockReader;
