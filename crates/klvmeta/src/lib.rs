//! Decode UAS KLV telemetry streams into per-frame metadata documents.
//!
//! klvmeta takes the metadata track demuxed from an aerial video transport
//! stream and turns every KLV block into a frame of human-readable sensor and
//! platform fields.
//!
//! # Crate Structure
//!
//! - [`frame`] - Block framing: BER lengths, universal keys, field records
//! - [`registry`] - Tag decode table and value transforms
//! - [`document`] - Frame/document assembly, JSON and KML artifacts
//!
//! ```no_run
//! use klvmeta::document::Decoder;
//!
//! let report = Decoder::new().decode_file("flight_07.klv")?;
//! println!("{}", report.document.to_json_pretty()?);
//! # Ok::<(), klvmeta::document::DocumentError>(())
//! ```

/// Re-export frame types.
pub mod frame {
    pub use klvmeta_frame::*;
}

/// Re-export registry types.
pub mod registry {
    pub use klvmeta_registry::*;
}

/// Re-export document types.
pub mod document {
    pub use klvmeta_document::*;
}
