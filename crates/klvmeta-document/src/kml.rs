//! KML placemarks for frame-center positions.
//!
//! One `Placemark` per frame, named by its frame key, located at the frame
//! center longitude, latitude and elevation.

use std::fmt::Write;

use crate::document::MetadataDocument;
use crate::frame::DecodedFrame;

const FRAME_CENTER_LATITUDE: &str = "frame_center_latitude";
const FRAME_CENTER_LONGITUDE: &str = "frame_center_longitude";
const FRAME_CENTER_ELEVATION: &str = "frame_center_elevation";

/// Render a KML document. Frames without a frame-center position are skipped.
pub fn render(doc: &MetadataDocument) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<kml xmlns=\"http://www.opengis.net/kml/2.2\">\n");
    out.push_str("  <Document>\n");
    let _ = writeln!(out, "    <name>{}</name>", escape(&doc.source));

    let mut placed = 0usize;
    for frame in doc.frames() {
        let Some((lon, lat, alt)) = frame_center(frame) else {
            continue;
        };
        out.push_str("    <Placemark>\n");
        let _ = writeln!(out, "      <name>{}</name>", frame.key());
        let _ = writeln!(
            out,
            "      <Point><coordinates>{},{},{}</coordinates></Point>",
            escape(lon),
            escape(lat),
            escape(alt)
        );
        out.push_str("    </Placemark>\n");
        placed += 1;
    }

    out.push_str("  </Document>\n");
    out.push_str("</kml>\n");
    tracing::debug!(placed, frames = doc.len(), "rendered KML");
    out
}

fn frame_center(frame: &DecodedFrame) -> Option<(&str, &str, &str)> {
    let lon = frame.get(FRAME_CENTER_LONGITUDE)?;
    let lat = frame.get(FRAME_CENTER_LATITUDE)?;
    let alt = frame.get(FRAME_CENTER_ELEVATION).unwrap_or("0");
    Some((lon, lat, alt))
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
