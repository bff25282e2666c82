use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::{DateTime, Utc};
use klvmeta_frame::{Block, BlockConfig, BlockReader};
use klvmeta_registry::FieldRegistry;
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::diagnostics::Diagnostic;
use crate::document::MetadataDocument;
use crate::error::{DocumentError, Result};
use crate::frame::{DecodedFrame, UID_FIELD};

/// Length of the per-frame random identifier.
pub const FRAME_ID_LEN: usize = 16;

/// Controls how a stream is assembled into a document.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Append a random `uid` field to every frame.
    pub frame_ids: bool,
    /// Block framing limits.
    pub block: BlockConfig,
    /// Fixed processing date. Default: the time decoding starts.
    pub processing_date: Option<DateTime<Utc>>,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            frame_ids: true,
            block: BlockConfig::default(),
            processing_date: None,
        }
    }
}

/// Result of a successful decode run.
#[derive(Debug, Clone)]
pub struct DecodeReport {
    pub document: MetadataDocument,
    /// Fields that were dropped, in stream order.
    pub diagnostics: Vec<Diagnostic>,
}

/// Turns a metadata stream into a [`MetadataDocument`].
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    registry: FieldRegistry,
    options: DecodeOptions,
}

impl Decoder {
    /// Decoder with the standard registry and default options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DecodeOptions) -> Self {
        Self::with_registry(FieldRegistry::standard(), options)
    }

    pub fn with_registry(registry: FieldRegistry, options: DecodeOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Open `path` and decode it. The path becomes the document source.
    pub fn decode_file(&self, path: impl AsRef<Path>) -> Result<DecodeReport> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DocumentError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        self.decode(BufReader::new(file), path.display().to_string())
    }

    /// Decode every block of `reader` in one forward pass.
    ///
    /// Any framing error aborts the run and no document is returned.
    pub fn decode<R: Read>(&self, reader: R, source: impl Into<String>) -> Result<DecodeReport> {
        let processing_date = self.options.processing_date.unwrap_or_else(Utc::now);
        let mut document = MetadataDocument::new(source, processing_date);
        let mut diagnostics = Vec::new();
        tracing::info!(source = %document.source, "decoding metadata stream");

        let blocks = BlockReader::with_config(reader, self.options.block.clone());
        for (index, block) in blocks.enumerate() {
            let block = block.inspect_err(|err| {
                tracing::error!(block = index, error = %err, "metadata stream is corrupt");
            })?;
            tracing::debug!(block = index, size = block.length, "processing metadata frame");
            let frame = self.decode_block(index, &block, &mut diagnostics)?;
            document.push(frame);
        }

        tracing::info!(
            frames = document.len(),
            diagnostics = diagnostics.len(),
            "decoded metadata stream"
        );
        Ok(DecodeReport {
            document,
            diagnostics,
        })
    }

    /// Decode one block into a frame, recording dropped fields.
    pub fn decode_block(
        &self,
        index: usize,
        block: &Block,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<DecodedFrame> {
        let mut frame = DecodedFrame::new(index);
        for record in block.fields() {
            let record = record?;
            match self.registry.decode(record.tag, record.value) {
                Ok(field) => frame.insert(field.name, field.value),
                Err(err) => {
                    tracing::warn!(
                        frame = index,
                        tag = record.tag,
                        value = ?record.value,
                        "{err}"
                    );
                    diagnostics.push(Diagnostic::from_field_error(index, record.tag, &err));
                }
            }
        }
        if self.options.frame_ids {
            frame.insert(UID_FIELD, generate_id(FRAME_ID_LEN));
        }
        Ok(frame)
    }
}

fn generate_id(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
