//! The entry store.
//!
//! A [`Journal`] owns the in-memory entry collection, keeps it newest
//! first, and writes it back through its [`Backend`] after every mutation.
//! A mutation whose save fails is undone before the error is returned, so
//! the collection in memory always matches the last successful save.

use uuid::Uuid;

use super::{Backend, StorageError};
use crate::{
    domain::{entry::sort_newest_first, Entry, Mood},
    guide::{self, Guide, GuideError},
};

/// Errors creating an entry.
#[derive(Debug, thiserror::Error)]
pub enum CreateError {
    /// The reflection could not be generated. No entry was created.
    #[error("could not generate a reflection: {0}")]
    Generation(#[from] GuideError),

    /// The new entry could not be saved. It was discarded.
    #[error("could not save the new entry: {0}")]
    Persist(#[from] StorageError),
}

/// Errors resolving an abbreviated entry id.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ResolveError {
    /// No entry id starts with the prefix.
    #[error("no entry matches '{0}'")]
    NotFound(String),

    /// More than one entry id starts with the prefix.
    #[error("'{prefix}' matches {count} entries")]
    Ambiguous {
        /// The prefix that was looked up.
        prefix: String,
        /// How many entries it matches.
        count: usize,
    },
}

/// The ordered collection of journal entries.
#[derive(Debug)]
pub struct Journal<B> {
    backend: B,
    entries: Vec<Entry>,
}

impl<B: Backend> Journal<B> {
    /// Load the collection from `backend`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    pub fn load(backend: B) -> Result<Self, StorageError> {
        let mut entries = backend.load()?;
        sort_newest_first(&mut entries);
        Ok(Self { backend, entries })
    }

    /// Create an entry from the user's text and mood.
    ///
    /// The reflection and title are generated concurrently. If the
    /// reflection fails the journal is left untouched; a failed title is
    /// replaced with `fallback_title`.
    ///
    /// # Errors
    ///
    /// Returns [`CreateError::Generation`] if the reflection cannot be
    /// generated, or [`CreateError::Persist`] if the new collection cannot be
    /// saved.
    pub async fn create(
        &mut self,
        text: String,
        mood: Mood,
        guide: &dyn Guide,
        fallback_title: &str,
    ) -> Result<Entry, CreateError> {
        let (reflection, title) = tokio::join!(
            guide.reflect(&text),
            guide::title_or_fallback(guide, &text, fallback_title),
        );
        let reflection = reflection?;

        let mut entry = Entry::new(title, mood, text, &reflection);
        while self.get(entry.id).is_some() {
            entry.id = Uuid::new_v4();
        }

        let index = self
            .entries
            .partition_point(|existing| existing.created > entry.created);
        self.entries.insert(index, entry);

        if let Err(e) = self.backend.save(&self.entries) {
            self.entries.remove(index);
            return Err(e.into());
        }

        let entry = &self.entries[index];
        tracing::info!(id = %entry.id, mood = %entry.mood, "created entry '{}'", entry.title);
        Ok(entry.clone())
    }

    /// Replace the verse note of the entry `id`.
    ///
    /// Returns `false`, without saving, if there is no such entry.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the collection cannot be saved. The
    /// previous note is restored.
    pub fn attach_note(&mut self, id: Uuid, note: String) -> Result<bool, StorageError> {
        let Some(index) = self.position(id) else {
            tracing::debug!(%id, "no entry to attach a note to");
            return Ok(false);
        };

        let previous = self.entries[index].set_verse_note(note);
        if let Err(e) = self.backend.save(&self.entries) {
            self.entries[index].verse_note = previous;
            return Err(e);
        }

        tracing::info!(%id, "attached verse note");
        Ok(true)
    }

    /// Delete the entry `id`.
    ///
    /// Returns `false`, without saving, if there is no such entry.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the collection cannot be saved. The
    /// entry is put back.
    pub fn delete(&mut self, id: Uuid) -> Result<bool, StorageError> {
        let Some(index) = self.position(id) else {
            tracing::debug!(%id, "no entry to delete");
            return Ok(false);
        };

        let removed = self.entries.remove(index);
        if let Err(e) = self.backend.save(&self.entries) {
            self.entries.insert(index, removed);
            return Err(e);
        }

        tracing::info!(%id, "deleted entry '{}'", removed.title);
        Ok(true)
    }
}

impl<B> Journal<B> {
    /// All entries, newest first.
    #[must_use]
    pub fn list(&self) -> &[Entry] {
        &self.entries
    }

    /// The most recent entry.
    #[must_use]
    pub fn latest(&self) -> Option<&Entry> {
        self.entries.first()
    }

    /// The entry with the given id.
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// The single entry whose id starts with `prefix`.
    ///
    /// The prefix is compared against the hyphenated form of the id,
    /// ignoring case.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] if no entry, or more than one, matches.
    pub fn resolve(&self, prefix: &str) -> Result<&Entry, ResolveError> {
        let needle = prefix.trim().to_lowercase();
        if needle.is_empty() {
            return Err(ResolveError::NotFound(prefix.to_string()));
        }

        let mut matches = self
            .entries
            .iter()
            .filter(|entry| entry.id.hyphenated().to_string().starts_with(&needle));

        match (matches.next(), matches.count()) {
            (None, _) => Err(ResolveError::NotFound(prefix.to_string())),
            (Some(entry), 0) => Ok(entry),
            (Some(_), others) => Err(ResolveError::Ambiguous {
                prefix: prefix.to_string(),
                count: others + 1,
            }),
        }
    }

    /// The backend the journal saves through.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::{
        domain::entry::fixtures::{entry_at, entry_on},
        guide::fake::FakeGuide,
        storage::{JsonFile, MemoryBackend},
    };

    /// A memory backend whose saves can be made to fail.
    #[derive(Debug, Default)]
    struct Flaky {
        inner: MemoryBackend,
        fail: bool,
        saves: usize,
    }

    impl Backend for Flaky {
        fn load(&self) -> Result<Vec<Entry>, StorageError> {
            self.inner.load()
        }

        fn save(&mut self, entries: &[Entry]) -> Result<(), StorageError> {
            self.saves += 1;
            if self.fail {
                return Err(std::io::Error::other("quota exceeded").into());
            }
            self.inner.save(entries)
        }
    }

    fn mood(value: u8) -> Mood {
        Mood::new(value).unwrap()
    }

    fn journal_with(entries: Vec<Entry>) -> Journal<Flaky> {
        Journal::load(Flaky {
            inner: MemoryBackend::with_entries(entries),
            ..Flaky::default()
        })
        .unwrap()
    }

    fn is_newest_first(entries: &[Entry]) -> bool {
        entries.windows(2).all(|w| w[0].created() >= w[1].created())
    }

    #[test]
    fn load_sorts_newest_first() {
        let journal = journal_with(vec![entry_on(3, 5), entry_on(9, 5), entry_on(1, 5)]);
        let titles: Vec<_> = journal.list().iter().map(Entry::title).collect();
        assert_eq!(titles, ["Dia 9", "Dia 3", "Dia 1"]);
    }

    #[tokio::test]
    async fn created_entry_is_listed_first_and_saved() {
        let mut journal = journal_with(vec![entry_on(3, 5), entry_on(1, 5)]);
        let guide = FakeGuide::working();

        let entry = journal
            .create("Gratidão pela família".to_string(), mood(8), &guide, "Reflexão do dia")
            .await
            .unwrap();

        assert_eq!(journal.list()[0], entry);
        assert_eq!(entry.title(), "Um dia de paz");
        assert_eq!(entry.user_text(), "Gratidão pela família");
        assert!(entry.reflection().is_ok());
        assert_eq!(journal.backend().inner.entries(), journal.list());
        assert!(is_newest_first(journal.list()));
    }

    #[tokio::test]
    async fn created_ids_are_unique() {
        let mut journal = journal_with(Vec::new());
        let guide = FakeGuide::working();
        for _ in 0..20 {
            journal
                .create("texto".to_string(), mood(5), &guide, "t")
                .await
                .unwrap();
        }
        let ids: HashSet<_> = journal.list().iter().map(Entry::id).collect();
        assert_eq!(ids.len(), 20);
        assert!(is_newest_first(journal.list()));
    }

    #[tokio::test]
    async fn generation_failure_leaves_nothing_behind() {
        let mut journal = journal_with(vec![entry_on(3, 5)]);
        let guide = FakeGuide::broken();

        let error = journal
            .create("texto".to_string(), mood(5), &guide, "t")
            .await
            .unwrap_err();

        assert!(matches!(error, CreateError::Generation(_)));
        assert_eq!(journal.list().len(), 1);
        assert_eq!(journal.backend().saves, 0);
    }

    #[tokio::test]
    async fn failed_title_uses_fallback() {
        let mut journal = journal_with(Vec::new());
        let guide = FakeGuide {
            fail_everything_else: true,
            ..FakeGuide::default()
        };

        let entry = journal
            .create("texto".to_string(), mood(5), &guide, "Reflexão do dia")
            .await
            .unwrap();
        assert_eq!(entry.title(), "Reflexão do dia");
        assert_eq!(guide.calls(), 2);
    }

    #[tokio::test]
    async fn failed_save_discards_new_entry() {
        let mut journal = journal_with(vec![entry_on(3, 5)]);
        journal.backend.fail = true;

        let error = journal
            .create("texto".to_string(), mood(5), &FakeGuide::working(), "t")
            .await
            .unwrap_err();

        assert!(matches!(error, CreateError::Persist(_)));
        assert_eq!(journal.list().len(), 1);
        assert_eq!(journal.list()[0].title(), "Dia 3");
    }

    #[test]
    fn latest_note_wins() {
        let mut journal = journal_with(vec![entry_on(3, 5)]);
        let id = journal.list()[0].id();

        assert!(journal.attach_note(id, "primeira".to_string()).unwrap());
        assert!(journal.attach_note(id, "x".to_string()).unwrap());

        assert_eq!(journal.get(id).unwrap().verse_note(), Some("x"));
        assert_eq!(journal.backend().inner.entries()[0].verse_note(), Some("x"));
    }

    #[test]
    fn note_on_unknown_id_is_a_no_op() {
        let mut journal = journal_with(vec![entry_on(3, 5)]);
        let before = journal.list().to_vec();

        assert!(!journal.attach_note(Uuid::new_v4(), "x".to_string()).unwrap());
        assert_eq!(journal.list(), before.as_slice());
        assert_eq!(journal.backend().saves, 0);
    }

    #[test]
    fn failed_save_restores_previous_note() {
        let mut journal = journal_with(vec![entry_on(3, 5)]);
        let id = journal.list()[0].id();
        journal.attach_note(id, "antes".to_string()).unwrap();
        journal.backend.fail = true;

        assert!(journal.attach_note(id, "depois".to_string()).is_err());
        assert_eq!(journal.get(id).unwrap().verse_note(), Some("antes"));
    }

    #[test]
    fn deleted_entry_is_gone() {
        let mut journal = journal_with(vec![entry_on(3, 5), entry_on(4, 6)]);
        let id = journal.list()[1].id();

        assert!(journal.delete(id).unwrap());
        assert!(journal.list().iter().all(|entry| entry.id() != id));
        assert_eq!(journal.backend().inner.entries().len(), 1);

        assert!(!journal.delete(id).unwrap());
        assert_eq!(journal.list().len(), 1);
        assert_eq!(journal.backend().saves, 1);
    }

    #[test]
    fn failed_save_restores_deleted_entry() {
        let mut journal = journal_with(vec![entry_on(3, 5), entry_on(4, 6), entry_on(5, 7)]);
        let before = journal.list().to_vec();
        journal.backend.fail = true;

        assert!(journal.delete(before[1].id()).is_err());
        assert_eq!(journal.list(), before.as_slice());
    }

    #[test]
    fn resolves_unique_prefix() {
        let journal = journal_with(vec![entry_on(3, 5), entry_on(4, 6)]);
        let entry = &journal.list()[0];
        let full = entry.id().to_string();

        assert_eq!(journal.resolve(&full).unwrap(), entry);
        assert_eq!(journal.resolve(&full.to_uppercase()).unwrap(), entry);
        assert_eq!(
            journal.resolve("").unwrap_err(),
            ResolveError::NotFound(String::new())
        );
        assert!(matches!(
            journal.resolve("zzz"),
            Err(ResolveError::NotFound(_))
        ));
    }

    #[test]
    fn ambiguous_prefix_is_reported() {
        let mut first = entry_at("2026-03-05T10:00:00Z", 5, "a");
        let mut second = entry_at("2026-03-06T10:00:00Z", 5, "b");
        first.id = Uuid::parse_str("abcd0000-0000-4000-8000-000000000001").unwrap();
        second.id = Uuid::parse_str("abcd0000-0000-4000-8000-000000000002").unwrap();
        let journal = journal_with(vec![first, second]);

        assert_eq!(
            journal.resolve("abcd").unwrap_err(),
            ResolveError::Ambiguous {
                prefix: "abcd".to_string(),
                count: 2
            }
        );
        assert_eq!(
            journal.resolve("abcd0000-0000-4000-8000-000000000002").unwrap().user_text(),
            "b"
        );
    }

    #[tokio::test]
    async fn reopening_reconstructs_identical_state() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("journal.json");
        let guide = FakeGuide::working();

        let mut journal = Journal::load(JsonFile::new(path.clone())).unwrap();
        let first = journal
            .create("primeira".to_string(), mood(4), &guide, "t")
            .await
            .unwrap();
        journal
            .create("segunda".to_string(), mood(9), &guide, "t")
            .await
            .unwrap();
        journal.attach_note(first.id(), "nota".to_string()).unwrap();

        let reopened = Journal::load(JsonFile::new(path)).unwrap();
        assert_eq!(reopened.list(), journal.list());
    }
}
