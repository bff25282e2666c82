use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::ser::PrettyFormatter;

use crate::error::{DocumentError, Result};
use crate::frame::DecodedFrame;

/// Rendering of the document-level processing date.
pub const PROCESSING_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f UTC";

const JSON_INDENT: &[u8] = b"    ";

/// All frames decoded from one metadata stream.
///
/// Serializes as a single JSON object: `source`, `processing_date`, then one
/// `frame_NNNNN` entry per frame in stream order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataDocument {
    /// Where the stream came from (usually the input path).
    pub source: String,
    /// Captured once when decoding started.
    pub processing_date: DateTime<Utc>,
    frames: Vec<DecodedFrame>,
}

impl MetadataDocument {
    pub fn new(source: impl Into<String>, processing_date: DateTime<Utc>) -> Self {
        Self {
            source: source.into(),
            processing_date,
            frames: Vec::new(),
        }
    }

    /// Append the next frame. Frames must arrive in stream order.
    pub fn push(&mut self, frame: DecodedFrame) {
        debug_assert_eq!(frame.index, self.frames.len());
        self.frames.push(frame);
    }

    pub fn frames(&self) -> &[DecodedFrame] {
        &self.frames
    }

    /// Look up a frame by its `frame_NNNNN` key.
    pub fn frame(&self, key: &str) -> Option<&DecodedFrame> {
        let index: usize = key.strip_prefix("frame_")?.parse().ok()?;
        self.frames.get(index)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn processing_date_text(&self) -> String {
        self.processing_date
            .format(PROCESSING_DATE_FORMAT)
            .to_string()
    }

    /// File stem used for artifacts derived from this document.
    pub fn artifact_stem(&self) -> String {
        Path::new(&self.source)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.is_empty())
            .unwrap_or_else(|| "metadata".to_string())
    }

    /// Pretty JSON with a 4-space indent.
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut out = Vec::new();
        let formatter = PrettyFormatter::with_indent(JSON_INDENT);
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)?;
        // serde_json only emits valid UTF-8.
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Write `<stem>.json` into `dir`, creating it if needed.
    pub fn write_json(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(format!("{}.json", self.artifact_stem()));
        write_artifact(&path, self.to_json_pretty()?.as_bytes())?;
        Ok(path)
    }

    /// Write `<stem>.kml` into `dir`, creating it if needed.
    pub fn write_kml(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(format!("{}.kml", self.artifact_stem()));
        write_artifact(&path, crate::kml::render(self).as_bytes())?;
        Ok(path)
    }
}

fn write_artifact(path: &Path, contents: &[u8]) -> Result<()> {
    let write_err = |source| DocumentError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, contents).map_err(write_err)?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote artifact");
    Ok(())
}

impl Serialize for MetadataDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.frames.len() + 2))?;
        map.serialize_entry("source", &self.source)?;
        map.serialize_entry("processing_date", &self.processing_date_text())?;
        for frame in &self.frames {
            map.serialize_entry(&frame.key(), frame)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn sample() -> MetadataDocument {
        let date = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let mut doc = MetadataDocument::new("incoming/flight_07.klv", date);
        for index in 0..2 {
            let mut frame = DecodedFrame::new(index);
            frame.insert("checksum", index.to_string());
            doc.push(frame);
        }
        doc
    }

    fn temp_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "klvmeta-document-{tag}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("time should be after epoch")
                .as_nanos()
        ))
    }

    #[test]
    fn json_layout() {
        let json = sample().to_json_pretty().unwrap();
        let expected = r#"{
    "source": "incoming/flight_07.klv",
    "processing_date": "2024-05-01T12:30:00.000000 UTC",
    "frame_00000": {
        "checksum": "0"
    },
    "frame_00001": {
        "checksum": "1"
    }
}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn frame_lookup_by_key() {
        let doc = sample();
        assert_eq!(doc.frame("frame_00001").unwrap().index, 1);
        assert!(doc.frame("frame_00002").is_none());
        assert!(doc.frame("source").is_none());
    }

    #[test]
    fn artifact_stem_from_source() {
        assert_eq!(sample().artifact_stem(), "flight_07");
        let doc = MetadataDocument::new("", Utc::now());
        assert_eq!(doc.artifact_stem(), "metadata");
    }

    #[test]
    fn write_json_creates_directory() {
        let dir = temp_dir("json");
        let path = sample().write_json(&dir.join("mission")).unwrap();

        assert_eq!(path.file_name().unwrap(), "flight_07.json");
        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["frame_00001"]["checksum"], "1");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn write_into_file_path_fails() {
        let dir = temp_dir("blocked");
        fs::create_dir_all(&dir).unwrap();
        let blocker = dir.join("not-a-dir");
        fs::write(&blocker, b"x").unwrap();

        let err = sample().write_json(&blocker).unwrap_err();
        assert!(matches!(err, DocumentError::Write { .. }));
        let _ = fs::remove_dir_all(&dir);
    }
}
