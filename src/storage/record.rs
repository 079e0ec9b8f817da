//! The on-disk shape of an entry.
//!
//! Records keep the positional message list of the stored format. Converting
//! a record into an [`Entry`] is where that list becomes the named
//! [`Messages`] structure, and where an out-of-range mood is rejected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{entry::Messages, Entry, Mood};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct EntryRecord {
    pub(super) id: Uuid,
    pub(super) title: String,
    pub(super) created_at: DateTime<Utc>,
    pub(super) mood: u8,
    pub(super) messages: Vec<MessageRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) verse_note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct MessageRecord {
    pub(super) role: Role,
    pub(super) content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(super) enum Role {
    User,
    Model,
}

impl From<&Entry> for EntryRecord {
    fn from(entry: &Entry) -> Self {
        Self {
            id: entry.id,
            title: entry.title.clone(),
            created_at: entry.created,
            mood: entry.mood.get(),
            messages: vec![
                MessageRecord {
                    role: Role::User,
                    content: entry.messages.user_text.clone(),
                },
                MessageRecord {
                    role: Role::Model,
                    content: entry.messages.reflection.clone(),
                },
            ],
            verse_note: entry.verse_note.clone(),
        }
    }
}

impl TryFrom<EntryRecord> for Entry {
    type Error = String;

    fn try_from(record: EntryRecord) -> Result<Self, Self::Error> {
        let mood = Mood::new(record.mood).map_err(|e| e.to_string())?;

        let mut user_text = None;
        let mut reflection = None;
        for message in record.messages {
            match message.role {
                Role::User if user_text.is_none() => user_text = Some(message.content),
                Role::Model if user_text.is_some() && reflection.is_none() => {
                    reflection = Some(message.content);
                }
                _ => {}
            }
        }
        let user_text = user_text.ok_or_else(|| "missing user message".to_string())?;

        Ok(Self {
            id: record.id,
            created: record.created_at,
            title: record.title,
            mood,
            messages: Messages {
                user_text,
                // A missing reflection reads as an unparseable payload.
                reflection: reflection.unwrap_or_default(),
            },
            verse_note: record.verse_note,
        })
    }
}
