//! Durable storage for the entry collection.
//!
//! A [`Backend`] loads the whole collection once and saves the whole
//! collection after every mutation. [`JsonFile`] keeps it in a single JSON
//! document on disk; [`MemoryBackend`] keeps it in memory.

use std::{
    io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use super::record::EntryRecord;
use crate::domain::{Config, Entry};

/// Name of the journal file within a journal directory.
pub const JOURNAL_FILE: &str = "journal.json";

/// Loads and saves the full entry collection.
pub trait Backend {
    /// Load every stored entry, in any order.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the stored collection cannot be read.
    fn load(&self) -> Result<Vec<Entry>, StorageError>;

    /// Replace the stored collection with `entries`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the collection cannot be written. The
    /// previously stored collection must be left intact in that case.
    fn save(&mut self, entries: &[Entry]) -> Result<(), StorageError>;
}

/// Errors reading or writing durable state.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is not valid JSON, or not the expected document.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A stored entry could not be converted into an [`Entry`].
    #[error("invalid entry {id}: {reason}")]
    InvalidEntry {
        /// The stored id, or `?` if the record has none.
        id: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// The serialized versions of the journal file.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions<T> {
    #[serde(rename = "1")]
    V1 { entries: Vec<T> },
}

/// A journal stored as one JSON document.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
    allow_invalid_entries: bool,
}

impl JsonFile {
    /// A backend for the file at `path`. The file need not exist yet.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self {
            path,
            allow_invalid_entries: false,
        }
    }

    /// The journal file of the directory `root`, read as `config` directs.
    #[must_use]
    pub fn in_root(root: &Path, config: &Config) -> Self {
        Self::new(root.join(JOURNAL_FILE)).allow_invalid_entries(config.allow_invalid_entries)
    }

    /// Skip stored entries that cannot be read instead of failing the load.
    #[must_use]
    pub const fn allow_invalid_entries(mut self, allow: bool) -> Self {
        self.allow_invalid_entries = allow;
        self
    }

    /// The path of the journal file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn convert(&self, value: serde_json::Value) -> Result<Option<Entry>, StorageError> {
        let id = value
            .get("id")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("?")
            .to_string();

        let converted = serde_json::from_value::<EntryRecord>(value)
            .map_err(|e| e.to_string())
            .and_then(Entry::try_from);

        match converted {
            Ok(entry) => Ok(Some(entry)),
            Err(reason) if self.allow_invalid_entries => {
                tracing::warn!("Skipping invalid entry {id}: {reason}");
                Ok(None)
            }
            Err(reason) => Err(StorageError::InvalidEntry { id, reason }),
        }
    }
}

impl Backend for JsonFile {
    fn load(&self) -> Result<Vec<Entry>, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No journal at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let Versions::V1 { entries } = serde_json::from_str::<Versions<serde_json::Value>>(&content)?;

        let mut loaded = Vec::with_capacity(entries.len());
        for value in entries {
            if let Some(entry) = self.convert(value)? {
                loaded.push(entry);
            }
        }
        tracing::debug!("Loaded {} entries from {}", loaded.len(), self.path.display());
        Ok(loaded)
    }

    fn save(&mut self, entries: &[Entry]) -> Result<(), StorageError> {
        let document = Versions::V1 {
            entries: entries.iter().map(EntryRecord::from).collect(),
        };
        let content = serde_json::to_vec_pretty(&document)?;
        write_atomic(&self.path, &content)?;
        tracing::debug!("Saved {} entries to {}", entries.len(), self.path.display());
        Ok(())
    }
}

/// An in-memory backend, for embedding and for tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryBackend {
    entries: Vec<Entry>,
}

impl MemoryBackend {
    /// An empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that already holds `entries`.
    #[must_use]
    pub const fn with_entries(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    /// The entries as last saved.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }
}

impl Backend for MemoryBackend {
    fn load(&self) -> Result<Vec<Entry>, StorageError> {
        Ok(self.entries.clone())
    }

    fn save(&mut self, entries: &[Entry]) -> Result<(), StorageError> {
        self.entries = entries.to_vec();
        Ok(())
    }
}

/// Write `content` to a sibling temporary file, then rename it over `path`.
pub(crate) fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path).inspect_err(|_| {
        let _ = std::fs::remove_file(&tmp);
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::domain::entry::fixtures::entry_at;

    fn journal_file(content: &serde_json::Value) -> (TempDir, PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(JOURNAL_FILE);
        std::fs::write(&path, content.to_string()).unwrap();
        (tmp, path)
    }

    fn one_valid_one_invalid() -> serde_json::Value {
        json!({
            "_version": "1",
            "entries": [
                {
                    "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
                    "title": "Válida",
                    "created_at": "2026-03-05T10:00:00Z",
                    "mood": 6,
                    "messages": [
                        { "role": "user", "content": "texto" },
                        { "role": "model", "content": "{}" }
                    ]
                },
                {
                    "id": "a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8",
                    "title": "Inválida",
                    "created_at": "2026-03-06T10:00:00Z",
                    "mood": 12,
                    "messages": []
                }
            ]
        })
    }

    #[test]
    fn missing_file_loads_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let backend = JsonFile::new(tmp.path().join(JOURNAL_FILE));
        assert!(backend.load().unwrap().is_empty());
    }

    #[test]
    fn saved_entries_load_back() {
        let tmp = tempfile::tempdir().unwrap();
        let mut backend = JsonFile::new(tmp.path().join("nested").join(JOURNAL_FILE));

        let mut noted = entry_at("2026-03-05T10:00:00Z", 3, "Luta");
        noted.set_verse_note("força".to_string());
        let entries = vec![entry_at("2026-03-06T10:00:00Z", 9, "Gratidão"), noted];

        backend.save(&entries).unwrap();
        assert_eq!(backend.load().unwrap(), entries);
    }

    #[test]
    fn save_leaves_no_temporary_file() {
        let tmp = tempfile::tempdir().unwrap();
        let mut backend = JsonFile::new(tmp.path().join(JOURNAL_FILE));
        backend.save(&[entry_at("2026-03-06T10:00:00Z", 9, "a")]).unwrap();

        let names: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, [JOURNAL_FILE]);
    }

    #[test]
    fn file_is_versioned() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(JOURNAL_FILE);
        JsonFile::new(path.clone()).save(&[]).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value, json!({ "_version": "1", "entries": [] }));
    }

    #[test]
    fn invalid_entry_fails_the_load_by_default() {
        let (_tmp, path) = journal_file(&one_valid_one_invalid());
        let error = JsonFile::new(path).load().unwrap_err();
        assert!(matches!(
            error,
            StorageError::InvalidEntry { ref id, .. } if id == "a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8"
        ));
    }

    #[test]
    fn invalid_entry_is_skipped_when_allowed() {
        let (_tmp, path) = journal_file(&one_valid_one_invalid());
        let entries = JsonFile::new(path)
            .allow_invalid_entries(true)
            .load()
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title(), "Válida");
    }

    #[test]
    fn unknown_version_is_rejected() {
        let (_tmp, path) = journal_file(&json!({ "_version": "2", "entries": [] }));
        assert!(matches!(
            JsonFile::new(path).load(),
            Err(StorageError::Json(_))
        ));
    }

    #[test]
    fn memory_backend_keeps_last_save() {
        let mut backend = MemoryBackend::new();
        let entries = vec![entry_at("2026-03-06T10:00:00Z", 9, "a")];
        backend.save(&entries).unwrap();
        assert_eq!(backend.entries(), entries.as_slice());
        assert_eq!(backend.load().unwrap(), entries);
    }
}
