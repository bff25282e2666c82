//! Tag decode table for the UAS datalink local set.
//!
//! Each known tag maps to a [`FieldRule`]: the value width, how the bytes are
//! interpreted and the transform that turns them into display text. One
//! generic routine applies every rule.

pub mod error;
pub mod registry;
pub mod rule;

pub use error::{FieldError, Result};
pub use registry::{DecodedField, FieldRegistry};
pub use rule::{DecodeKind, FieldRule, Transform, MAX_INTEGER_LEN, STANDARD_RULES};
