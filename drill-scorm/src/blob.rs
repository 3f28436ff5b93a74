//! Session blob
//!
//! The blob is the full auditable trail of the session: an append-only
//! sequence of `key -> value` facts, serialized as `key=value` pairs
//! joined with `|` for the SCORM suspend-data field. It only ever grows;
//! parsing the serialized form recovers the exact appended sequence.

use thiserror::Error;

const PAIR_SEPARATOR: char = '|';
const KEY_VALUE_SEPARATOR: char = '=';

/// Errors parsing a serialized blob
#[derive(Error, Debug)]
pub enum BlobError {
    #[error("Blob entry has no '=' separator: {entry}")]
    MissingSeparator { entry: String },
}

/// Append-only key/value audit trail
///
/// Keys may repeat; entries keep insertion order. Keys and values must not
/// contain `|` or `=` (appends strip them).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionBlob {
    entries: Vec<(String, String)>,
}

impl SessionBlob {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fact
    pub fn append(&mut self, key: &str, value: &str) {
        self.entries.push((sanitize(key), sanitize(value)));
    }

    /// Serialize as `key=value|key=value`
    pub fn serialize(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{k}{KEY_VALUE_SEPARATOR}{v}"))
            .collect::<Vec<_>>()
            .join(&PAIR_SEPARATOR.to_string())
    }

    /// Parse a serialized blob back into its entry sequence
    pub fn parse(data: &str) -> Result<Self, BlobError> {
        let mut blob = Self::new();
        if data.is_empty() {
            return Ok(blob);
        }
        for entry in data.split(PAIR_SEPARATOR) {
            let (key, value) =
                entry
                    .split_once(KEY_VALUE_SEPARATOR)
                    .ok_or_else(|| BlobError::MissingSeparator {
                        entry: entry.to_string(),
                    })?;
            blob.entries.push((key.to_string(), value.to_string()));
        }
        Ok(blob)
    }

    /// First value appended under a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether any entry was appended under a key
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }
}

fn sanitize(s: &str) -> String {
    s.chars()
        .filter(|c| *c != PAIR_SEPARATOR && *c != KEY_VALUE_SEPARATOR)
        .collect()
}
