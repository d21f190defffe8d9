//! Localized string storage for the cutscene engine.
//!
//! Text blocks are addressed by numeric id, matching the language tables the
//! game ships with. Tables are loaded once at startup and stay immutable for
//! the rest of the process, so lookups hand out borrowed slices.

use std::{collections::BTreeMap, fmt, fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Numeric identifier of a localized text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextId(pub u32);

impl fmt::Display for TextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("text id {0} is not present in the string table")]
    UnknownId(TextId),
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("string table is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("string table key {0:?} is not a numeric text id")]
    InvalidId(String),
}

/// Read-only access to localized text.
pub trait Localization {
    fn resolve(&self, id: TextId) -> Result<&str, LookupError>;
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WrappedTable {
    strings: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TableFile {
    Wrapped(WrappedTable),
    Flat(BTreeMap<String, String>),
}

/// In-memory string table keyed by [`TextId`].
#[derive(Debug, Default, Clone)]
pub struct StringTable {
    entries: BTreeMap<TextId, String>,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read string table: {}", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("failed to parse string table: {}", path.display()))
    }

    pub fn from_json_str(raw: &str) -> Result<Self, TableError> {
        let strings = match serde_json::from_str::<TableFile>(raw)? {
            TableFile::Wrapped(WrappedTable { strings }) => strings,
            TableFile::Flat(strings) => strings,
        };
        let mut table = StringTable::new();
        for (key, value) in strings {
            let id = key
                .trim()
                .parse::<u32>()
                .map_err(|_| TableError::InvalidId(key.clone()))?;
            table.insert(TextId(id), value);
        }
        Ok(table)
    }

    pub fn insert(&mut self, id: TextId, text: impl Into<String>) -> Option<String> {
        self.entries.insert(id, text.into())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Localization for StringTable {
    fn resolve(&self, id: TextId) -> Result<&str, LookupError> {
        self.entries
            .get(&id)
            .map(String::as_str)
            .ok_or(LookupError::UnknownId(id))
    }
}
