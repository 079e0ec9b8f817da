use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    mood::Mood,
    reflection::{PayloadError, ReflectionPayload},
};

/// A single journal submission.
///
/// Everything except the verse note is fixed at creation. Entries are
/// created through [`crate::Journal::create`], which commits an entry only
/// once its reflection has been generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub(crate) id: Uuid,
    pub(crate) created: DateTime<Utc>,
    pub(crate) title: String,
    pub(crate) mood: Mood,
    pub(crate) messages: Messages,
    pub(crate) verse_note: Option<String>,
}

/// The user's text and the reflection generated for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Messages {
    /// Free text written by the user.
    pub(crate) user_text: String,
    /// The serialised [`ReflectionPayload`], kept opaque until parsed.
    pub(crate) reflection: String,
}

impl Entry {
    /// Assemble a new entry stamped with the current time and a fresh id.
    #[must_use]
    pub fn new(title: String, mood: Mood, user_text: String, reflection: &ReflectionPayload) -> Self {
        Self::new_at(Utc::now(), title, mood, user_text, reflection.to_json())
    }

    /// Assemble an entry with an explicit creation time.
    #[doc(hidden)]
    #[must_use]
    pub fn new_at(
        created: DateTime<Utc>,
        title: String,
        mood: Mood,
        user_text: String,
        reflection: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created,
            title,
            mood,
            messages: Messages {
                user_text,
                reflection,
            },
            verse_note: None,
        }
    }

    /// The stable, unique identifier of this entry.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// When the entry was created. This is the ordering key.
    #[must_use]
    pub const fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Short label for the entry
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The mood recorded with the entry.
    #[must_use]
    pub const fn mood(&self) -> Mood {
        self.mood
    }

    /// The text the user wrote.
    #[must_use]
    pub fn user_text(&self) -> &str {
        &self.messages.user_text
    }

    /// Parse the stored reflection.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError`] if the stored text is not a well-formed
    /// payload. This only affects the one entry.
    pub fn reflection(&self) -> Result<ReflectionPayload, PayloadError> {
        ReflectionPayload::parse(&self.messages.reflection)
    }

    /// The note the user attached to the entry's verse, if ever set.
    #[must_use]
    pub fn verse_note(&self) -> Option<&str> {
        self.verse_note.as_deref()
    }

    pub(crate) const fn set_verse_note(&mut self, note: String) -> Option<String> {
        self.verse_note.replace(note)
    }
}

/// Sort entries newest first.
pub(crate) fn sort_newest_first<E: std::borrow::Borrow<Entry>>(entries: &mut [E]) {
    entries.sort_by(|a, b| b.borrow().created.cmp(&a.borrow().created));
}
