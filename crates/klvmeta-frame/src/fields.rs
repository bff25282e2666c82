//! Field records inside a block payload.

use crate::error::{FrameError, Result};

/// One tag/length/value record borrowed from a block payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRecord<'a> {
    /// Local set tag.
    pub tag: u8,
    /// Raw value bytes.
    pub value: &'a [u8],
}

/// Walks a block payload and yields its field records in order.
///
/// Each record is a 1-byte tag, a 1-byte length `n` and `n` value bytes.
/// Splitting stops once the running offset reaches the payload length. A
/// record that runs past the payload yields `FrameError::FieldOverrun` and
/// ends the iteration.
#[derive(Debug, Clone)]
pub struct FieldSplitter<'a> {
    payload: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> FieldSplitter<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self {
            payload,
            offset: 0,
            failed: false,
        }
    }

    /// Current byte offset into the payload.
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn split_next(&mut self) -> Result<FieldRecord<'a>> {
        let start = self.offset;
        let tag = self.payload[start];
        let remaining = self.payload.len() - start - 1;
        let Some(&declared) = self.payload.get(start + 1) else {
            return Err(FrameError::FieldOverrun {
                tag,
                offset: start,
                declared: 1,
                remaining,
            });
        };

        let declared = declared as usize;
        let value_start = start + 2;
        let remaining = self.payload.len() - value_start;
        if declared > remaining {
            return Err(FrameError::FieldOverrun {
                tag,
                offset: start,
                declared,
                remaining,
            });
        }

        self.offset = value_start + declared;
        Ok(FieldRecord {
            tag,
            value: &self.payload[value_start..self.offset],
        })
    }
}

impl<'a> Iterator for FieldSplitter<'a> {
    type Item = Result<FieldRecord<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.payload.len() {
            return None;
        }
        let record = self.split_next();
        if record.is_err() {
            self.failed = true;
        }
        Some(record)
    }
}

impl std::iter::FusedIterator for FieldSplitter<'_> {}
