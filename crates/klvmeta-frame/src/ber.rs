//! BER length fields.
//!
//! Short form: a single byte with the top bit clear holds the length (0-127).
//! Long form: the top bit is set and the low 7 bits give the number of
//! following big-endian octets that hold the length.

use std::io::Read;

use bytes::{BufMut, BytesMut};

use crate::error::{FrameError, Result};
use crate::reader::fill;

const LONG_FORM: u8 = 0x80;
const MAX_LENGTH_OCTETS: usize = std::mem::size_of::<u64>();

/// Read one BER length from `reader`.
pub fn read_ber_length<R: Read>(reader: &mut R) -> Result<usize> {
    let mut first = [0u8; 1];
    let read = fill(reader, &mut first)?;
    if read == 0 {
        return Err(FrameError::Truncated {
            context: "BER length",
            expected: 1,
            actual: 0,
        });
    }

    if first[0] & LONG_FORM == 0 {
        return Ok(first[0] as usize);
    }

    let octets = (first[0] & !LONG_FORM) as usize;
    if octets > MAX_LENGTH_OCTETS {
        return Err(FrameError::LengthOverflow { octets });
    }

    let mut buf = [0u8; MAX_LENGTH_OCTETS];
    let read = fill(reader, &mut buf[..octets])?;
    if read < octets {
        return Err(FrameError::Truncated {
            context: "BER length",
            expected: octets,
            actual: read,
        });
    }

    let value = buf[..octets]
        .iter()
        .fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
    usize::try_from(value).map_err(|_| FrameError::LengthOverflow { octets })
}

/// Append the minimal BER encoding of `len` to `dst`.
pub fn encode_ber_length(len: usize, dst: &mut BytesMut) {
    if len < LONG_FORM as usize {
        dst.put_u8(len as u8);
        return;
    }

    let bytes = (len as u64).to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    let octets = &bytes[skip..];
    dst.put_u8(LONG_FORM | octets.len() as u8);
    dst.put_slice(octets);
}
