use serde::ser::{Serialize, SerializeMap, Serializer};

/// Field name of the per-frame random identifier.
pub const UID_FIELD: &str = "uid";

/// Decoded fields of one metadata block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
    /// Position of the block in the stream, starting at 0.
    pub index: usize,
    fields: Vec<(&'static str, String)>,
}

impl DecodedFrame {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            fields: Vec::new(),
        }
    }

    /// Document key for this frame: `frame_NNNNN`.
    pub fn key(&self) -> String {
        format!("frame_{:05}", self.index)
    }

    /// Set a field. A repeated name keeps its first position and takes the
    /// latest value.
    pub fn insert(&mut self, name: &'static str, value: String) {
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(n, v)| (*n, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for DecodedFrame {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
