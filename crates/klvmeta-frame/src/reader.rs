use std::io::{ErrorKind, Read};

use bytes::BytesMut;

use crate::ber::read_ber_length;
use crate::codec::{Block, BlockConfig, KEY_SIZE, UAS_LOCAL_SET_KEY};
use crate::error::{FrameError, Result};

/// Reads complete KLV blocks from any `Read` stream.
///
/// Handles partial reads internally, so callers always get complete blocks.
/// The reader makes one forward pass and never seeks.
pub struct BlockReader<T> {
    inner: T,
    config: BlockConfig,
    blocks_read: usize,
    done: bool,
}

impl<T: Read> BlockReader<T> {
    /// Create a new block reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, BlockConfig::default())
    }

    /// Create a new block reader with explicit configuration.
    pub fn with_config(inner: T, config: BlockConfig) -> Self {
        Self {
            inner,
            config,
            blocks_read: 0,
            done: false,
        }
    }

    /// Read the next complete block (blocking).
    ///
    /// Returns `Ok(None)` when the stream ends exactly at a block boundary.
    /// A stream ending anywhere else, or a key that is not the UAS local set
    /// key, is an error.
    pub fn read_block(&mut self) -> Result<Option<Block>> {
        let mut key = [0u8; KEY_SIZE];
        let read = fill(&mut self.inner, &mut key)?;
        if read == 0 {
            return Ok(None);
        }
        if read < KEY_SIZE {
            return Err(FrameError::Truncated {
                context: "block key",
                expected: KEY_SIZE,
                actual: read,
            });
        }
        if key != UAS_LOCAL_SET_KEY {
            return Err(FrameError::InvalidKey { found: key });
        }

        let length = read_ber_length(&mut self.inner)?;
        if length > self.config.max_block_size {
            return Err(FrameError::BlockTooLarge {
                size: length,
                max: self.config.max_block_size,
            });
        }

        let mut payload = BytesMut::zeroed(length);
        let read = fill(&mut self.inner, &mut payload)?;
        if read < length {
            return Err(FrameError::Truncated {
                context: "block payload",
                expected: length,
                actual: read,
            });
        }

        tracing::debug!(block = self.blocks_read, length, "read KLV block");
        self.blocks_read += 1;

        Ok(Some(Block {
            length,
            payload: payload.freeze(),
        }))
    }

    /// Number of blocks successfully read so far.
    pub fn blocks_read(&self) -> usize {
        self.blocks_read
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current block reader configuration.
    pub fn config(&self) -> &BlockConfig {
        &self.config
    }
}

impl<T: Read> Iterator for BlockReader<T> {
    type Item = Result<Block>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_block() {
            Ok(Some(block)) => Some(Ok(block)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<T: Read> std::iter::FusedIterator for BlockReader<T> {}

/// Read until `buf` is full or the stream ends. Returns the bytes read.
pub(crate) fn fill<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0usize;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
    }
    Ok(filled)
}
