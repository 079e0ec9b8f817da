//! The persisted challenge tracker.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{backend::write_atomic, StorageError};
use crate::{
    domain::{ChallengeTracker, Entry, FaithChallenge},
    guide::{self, Guide},
};

/// Name of the challenge file within a journal directory.
pub const CHALLENGE_FILE: &str = "challenges.json";

/// A [`ChallengeTracker`] saved to a JSON file after every change.
#[derive(Debug)]
pub struct ChallengeLog {
    path: PathBuf,
    tracker: ChallengeTracker,
}

impl ChallengeLog {
    /// Open the challenge file of the directory `root`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the file exists but cannot be read.
    pub fn in_root(root: &Path) -> Result<Self, StorageError> {
        Self::open(root.join(CHALLENGE_FILE))
    }

    /// Open the challenge file at `path`. A missing file is an empty
    /// tracker.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the file exists but cannot be read.
    pub fn open(path: PathBuf) -> Result<Self, StorageError> {
        let tracker = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str::<Versions>(&content)?.into(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => ChallengeTracker::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, tracker })
    }

    /// The current state.
    #[must_use]
    pub const fn tracker(&self) -> &ChallengeTracker {
        &self.tracker
    }

    /// Record a completion for `date` and save it.
    ///
    /// Returns `true` if this was the day's first completion.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the file cannot be written, in which
    /// case the completion is not recorded.
    pub fn complete_on(&mut self, date: NaiveDate, reflection: String) -> Result<bool, StorageError> {
        self.update(|tracker| tracker.complete_on(date, reflection))
    }

    /// Record a completion for the current local day and save it.
    ///
    /// # Errors
    ///
    /// See [`ChallengeLog::complete_on`].
    pub fn complete(&mut self, reflection: String) -> Result<bool, StorageError> {
        self.complete_on(crate::domain::challenge::today(), reflection)
    }

    /// The challenge for `date`.
    ///
    /// The first successful request on a day generates a challenge from
    /// the newest entry's text and caches it; later requests that day reuse
    /// it. A failed generation yields [`guide::FALLBACK_CHALLENGE`] without
    /// caching it, so the next request tries again. There is no challenge
    /// while the journal is empty.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if a newly generated challenge cannot be
    /// saved.
    pub async fn challenge_on(
        &mut self,
        date: NaiveDate,
        latest: Option<&Entry>,
        guide: &dyn Guide,
    ) -> Result<Option<FaithChallenge>, StorageError> {
        if let Some(cached) = self.tracker.challenge_for(date) {
            return Ok(Some(cached.clone()));
        }
        let Some(latest) = latest else {
            return Ok(None);
        };

        let Some(text) = guide::generated_challenge(guide, latest.user_text()).await else {
            return Ok(Some(FaithChallenge {
                text: guide::FALLBACK_CHALLENGE.to_string(),
                date,
            }));
        };
        let challenge = FaithChallenge { text, date };
        self.update(|tracker| tracker.set_challenge(challenge.clone()))?;
        tracing::debug!(%date, "cached the day's challenge");
        Ok(Some(challenge))
    }

    fn update<T>(&mut self, change: impl FnOnce(&mut ChallengeTracker) -> T) -> Result<T, StorageError> {
        let previous = self.tracker.clone();
        let result = change(&mut self.tracker);
        if let Err(e) = self.save() {
            self.tracker = previous;
            return Err(e);
        }
        Ok(result)
    }

    fn save(&self) -> Result<(), StorageError> {
        let content = serde_json::to_vec_pretty(&Versions::from(&self.tracker))?;
        write_atomic(&self.path, &content)?;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CompletionRecord {
    date: NaiveDate,
    reflection: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChallengeRecord {
    text: String,
    date: NaiveDate,
}

/// The serialized versions of the challenge file.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default)]
        points: u32,
        #[serde(default)]
        completions: Vec<CompletionRecord>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        challenge: Option<ChallengeRecord>,
    },
}

impl From<Versions> for ChallengeTracker {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                points,
                completions,
                challenge,
            } => Self {
                completions: completions
                    .into_iter()
                    .map(|c| (c.date, c.reflection))
                    .collect(),
                points,
                challenge: challenge.map(|c| FaithChallenge {
                    text: c.text,
                    date: c.date,
                }),
            },
        }
    }
}

impl From<&ChallengeTracker> for Versions {
    fn from(tracker: &ChallengeTracker) -> Self {
        Self::V1 {
            points: tracker.points,
            completions: tracker
                .completions
                .iter()
                .map(|(&date, reflection)| CompletionRecord {
                    date,
                    reflection: reflection.clone(),
                })
                .collect(),
            challenge: tracker.challenge.as_ref().map(|c| ChallengeRecord {
                text: c.text.clone(),
                date: c.date,
            }),
        }
    }
}
