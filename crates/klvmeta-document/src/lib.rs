//! Assemble decoded KLV blocks into per-frame metadata documents.
//!
//! This is the "just works" layer. Hand it a metadata stream and get back a
//! [`MetadataDocument`] with one [`DecodedFrame`] per block, in stream order,
//! plus the field-level diagnostics collected along the way.

pub mod decoder;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod frame;
pub mod kml;

pub use decoder::{DecodeOptions, DecodeReport, Decoder, FRAME_ID_LEN};
pub use diagnostics::Diagnostic;
pub use document::{MetadataDocument, PROCESSING_DATE_FORMAT};
pub use error::{DocumentError, Result};
pub use frame::{DecodedFrame, UID_FIELD};
