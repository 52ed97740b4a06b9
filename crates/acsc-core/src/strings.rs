//! Interned string table.
//!
//! Strings keep their assigned index for the whole compilation. Unused
//! strings still occupy their slot so indices embedded in code stay valid.
//!
//! Values are raw bytes in the source's 8-bit encoding, not UTF-8.

use serde::{Deserialize, Serialize};

/// One interned string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedString {
    /// String bytes without a terminator.
    #[serde(with = "text_or_bytes")]
    pub value: Vec<u8>,
    #[serde(default = "yes")]
    pub used: bool,
}

fn yes() -> bool {
    true
}

/// Strings in assigned-index order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StringTable {
    entries: Vec<IndexedString>,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning its index. Interning marks it used.
    pub fn intern(&mut self, value: impl AsRef<[u8]>) -> u32 {
        let value = value.as_ref();
        if let Some(pos) = self.entries.iter().position(|e| e.value == value) {
            self.entries[pos].used = true;
            return pos as u32;
        }
        self.push(value, true)
    }

    /// Append a string without deduplication.
    pub fn push(&mut self, value: impl AsRef<[u8]>, used: bool) -> u32 {
        let index = self.entries.len() as u32;
        self.entries.push(IndexedString {
            value: value.as_ref().to_vec(),
            used,
        });
        index
    }

    pub fn get(&self, index: u32) -> Option<&IndexedString> {
        self.entries.get(index as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexedString> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Slots written to the object file: last used index plus one.
    pub fn count(&self) -> usize {
        self.entries
            .iter()
            .rposition(|e| e.used)
            .map_or(0, |i| i + 1)
    }
}

/// JSON form of a string value: text when it is valid UTF-8, otherwise an
/// array of byte values. Both forms are accepted on input.
mod text_or_bytes {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Bytes(Vec<u8>),
    }

    pub fn serialize<S: Serializer>(value: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        match std::str::from_utf8(value) {
            Ok(text) => serializer.serialize_str(text),
            Err(_) => value.serialize(serializer),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        Ok(match Repr::deserialize(deserializer)? {
            Repr::Text(text) => text.into_bytes(),
            Repr::Bytes(bytes) => bytes,
        })
    }
}
