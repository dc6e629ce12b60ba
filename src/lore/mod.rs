//! Lore-book (world info) records.
//!
//! The host owns the entries; this module only reads its JSON export so the
//! selected range can be sent to the backend as full records. Fields this
//! crate does not interpret are kept in [`LoreEntry::extra`] and serialized
//! back unchanged.

pub mod summary;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::selection::{EntryId, HasEntryId};

/// One world-info entry as exported by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoreEntry {
    pub uid: EntryId,
    /// Keywords that trigger the entry in the host.
    #[serde(default)]
    pub key: Vec<String>,
    /// Entry title; the host calls it `comment`.
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl LoreEntry {
    pub fn new(uid: impl Into<EntryId>, comment: &str, content: &str) -> Self {
        Self {
            uid: uid.into(),
            key: Vec::new(),
            comment: Some(comment.to_string()),
            content: content.to_string(),
            extra: serde_json::Map::new(),
        }
    }

    /// Title shown to the user, `"Untitled"` when empty.
    pub fn title(&self) -> &str {
        match self.comment.as_deref() {
            Some(c) if !c.trim().is_empty() => c,
            _ => "Untitled",
        }
    }
}

impl HasEntryId for LoreEntry {
    fn entry_id(&self) -> EntryId {
        self.uid
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntries {
    Keyed(BTreeMap<String, LoreEntry>),
    List(Vec<LoreEntry>),
}

#[derive(Deserialize)]
struct RawBook {
    entries: RawEntries,
}

/// A named lore book with its entries ordered by uid.
#[derive(Debug, Clone, PartialEq)]
pub struct LoreBook {
    pub name: String,
    pub entries: Vec<LoreEntry>,
}

impl LoreBook {
    pub fn new(name: impl Into<String>, mut entries: Vec<LoreEntry>) -> Self {
        entries.sort_by_key(|e| e.uid);
        Self {
            name: name.into(),
            entries,
        }
    }

    /// Parse the host's export format: `{"entries": {"0": {...}, "1": {...}}}`.
    /// A plain array under `entries` is accepted too.
    pub fn from_json(name: impl Into<String>, json: &str) -> Result<Self> {
        let raw: RawBook = serde_json::from_str(json).context("failed to parse lore book JSON")?;
        let entries = match raw.entries {
            RawEntries::Keyed(map) => map.into_values().collect(),
            RawEntries::List(list) => list,
        };
        Ok(Self::new(name, entries))
    }

    /// Load a lore book file; its name is the file stem.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read lore book: {}", path.display()))?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let book = Self::from_json(name, &json)?;
        tracing::debug!(book = %book.name, entries = book.entries.len(), "lore book loaded");
        Ok(book)
    }

    pub fn find(&self, id: EntryId) -> Option<&LoreEntry> {
        self.entries.iter().find(|e| e.uid == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = EntryId> + '_ {
        self.entries.iter().map(|e| e.uid)
    }
}
