//! External generative collaborators.
//!
//! A [`Guide`] produces the reflection and title for a new entry, and the
//! daily verse, faith challenge, and weekly insight. Each helper below
//! substitutes fixed copy when the service fails, except for the entry
//! reflection, whose failure aborts entry creation.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::domain::{ReflectionPayload, Verse};

mod gemini;
pub use gemini::GeminiClient;

mod prompts;

/// Verse shown when the verse of the day cannot be generated.
pub const FALLBACK_VERSE_REF: &str = "Salmos 119:105";
/// Text of [`FALLBACK_VERSE_REF`].
pub const FALLBACK_VERSE_TEXT: &str =
    "Lâmpada para os meus pés é a tua palavra e, luz para os meus caminhos.";
/// Challenge offered when one cannot be generated.
pub const FALLBACK_CHALLENGE: &str =
    "Hoje, reserve 10 minutos para agradecer a Deus por algo simples.";
/// Insight shown when the week has no entries.
pub const EMPTY_WEEK_INSIGHT: &str =
    "Faça mais registros durante a semana para receber um insight espiritual personalizado.";
/// Insight shown when one cannot be generated.
pub const FALLBACK_INSIGHT: &str = "Continue sua jornada de fé. Deus está com você a cada passo.";

/// A source of generated reflections and daily content.
#[async_trait]
pub trait Guide: Send + Sync {
    /// Generate the structured reflection for an entry's text.
    async fn reflect(&self, entry_text: &str) -> Result<ReflectionPayload, GuideError>;

    /// Generate a short title for an entry's text. The raw output is
    /// cleaned by [`clean_title`].
    async fn title(&self, entry_text: &str) -> Result<String, GuideError>;

    /// Pick a verse of the day.
    async fn verse_of_the_day(&self) -> Result<Verse, GuideError>;

    /// Propose a small challenge inspired by the latest entry.
    async fn faith_challenge(&self, last_entry_text: &str) -> Result<String, GuideError>;

    /// Summarise a week of entries.
    async fn weekly_insight(&self, digest: &str) -> Result<String, GuideError>;
}

/// Errors talking to a generative service.
#[derive(Debug, thiserror::Error)]
pub enum GuideError {
    /// No API key was configured.
    #[error("API key not set (expected in ${0})")]
    MissingApiKey(String),
    /// The request could not be sent or its body read.
    #[error("request to the generative service failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The service answered with a non-success status.
    #[error("generative service returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnosis.
        body: String,
    },
    /// The service answered without any text.
    #[error("the generative service returned an empty response")]
    EmptyResponse,
    /// The service answered with text that is not the requested structure.
    #[error("the generative service returned a malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s*").expect("this pattern is valid"));

/// Reduce raw model output to a single clean title.
///
/// Keeps the first line, drops list numbering such as `1. `, and removes
/// asterisks and double quotes. Returns `None` if nothing is left.
#[must_use]
pub fn clean_title(raw: &str) -> Option<String> {
    let first_line = raw.trim().lines().next().unwrap_or_default();
    let title: String = LEADING_NUMBER
        .replace(first_line, "")
        .chars()
        .filter(|c| !matches!(c, '*' | '"'))
        .collect();
    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}

/// Generate a title, or fall back to `fallback`.
pub async fn title_or_fallback(guide: &dyn Guide, entry_text: &str, fallback: &str) -> String {
    match guide.title(entry_text).await {
        Ok(raw) => clean_title(&raw).unwrap_or_else(|| fallback.to_string()),
        Err(e) => {
            tracing::warn!("Falling back to default title: {e}");
            fallback.to_string()
        }
    }
}

/// The verse of the day, or the fallback verse.
pub async fn verse_or_fallback(guide: &dyn Guide) -> Verse {
    match guide.verse_of_the_day().await {
        Ok(verse) if !verse.reference.trim().is_empty() && !verse.text.trim().is_empty() => verse,
        Ok(_) => {
            tracing::warn!("Verse of the day was incomplete, using fallback");
            fallback_verse()
        }
        Err(e) => {
            tracing::warn!("Falling back to default verse: {e}");
            fallback_verse()
        }
    }
}

/// A generated challenge with quotes and emphasis stripped.
///
/// Returns `None` if the request fails or the answer is blank; callers
/// then show [`FALLBACK_CHALLENGE`].
pub async fn generated_challenge(guide: &dyn Guide, last_entry_text: &str) -> Option<String> {
    match guide.faith_challenge(last_entry_text).await {
        Ok(text) => {
            let text: String = text.trim().chars().filter(|c| !matches!(c, '*' | '"')).collect();
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        Err(e) => {
            tracing::warn!("Challenge generation failed: {e}");
            None
        }
    }
}

/// The insight for a week's digest, with fixed copy for an empty week or a
/// failed request.
pub async fn insight_or_fallback(guide: &dyn Guide, digest: Option<&str>) -> String {
    let Some(digest) = digest.filter(|d| !d.trim().is_empty()) else {
        return EMPTY_WEEK_INSIGHT.to_string();
    };
    match guide.weekly_insight(digest).await {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => FALLBACK_INSIGHT.to_string(),
        Err(e) => {
            tracing::warn!("Falling back to default insight: {e}");
            FALLBACK_INSIGHT.to_string()
        }
    }
}

fn fallback_verse() -> Verse {
    Verse {
        reference: FALLBACK_VERSE_REF.to_string(),
        text: FALLBACK_VERSE_TEXT.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::{Guide, GuideError};
    use crate::domain::{reflection::sample_payload, ReflectionPayload, Verse};

    /// A guide that answers from fixed values and counts its calls.
    #[derive(Debug, Default)]
    pub(crate) struct FakeGuide {
        pub(crate) fail_reflection: bool,
        pub(crate) fail_everything_else: bool,
        pub(crate) title: String,
        pub(crate) calls: AtomicUsize,
    }

    impl FakeGuide {
        pub(crate) fn working() -> Self {
            Self {
                title: "1. **Um dia de paz**\nsegunda linha".to_string(),
                ..Self::default()
            }
        }

        pub(crate) fn broken() -> Self {
            Self {
                fail_reflection: true,
                fail_everything_else: true,
                ..Self::default()
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn answer<T>(&self, fail: bool, value: T) -> Result<T, GuideError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if fail {
                Err(GuideError::Status {
                    status: 503,
                    body: "unavailable".to_string(),
                })
            } else {
                Ok(value)
            }
        }
    }

    #[async_trait]
    impl Guide for FakeGuide {
        async fn reflect(&self, _entry_text: &str) -> Result<ReflectionPayload, GuideError> {
            self.answer(self.fail_reflection, sample_payload())
        }

        async fn title(&self, _entry_text: &str) -> Result<String, GuideError> {
            self.answer(self.fail_everything_else, self.title.clone())
        }

        async fn verse_of_the_day(&self) -> Result<Verse, GuideError> {
            self.answer(self.fail_everything_else, sample_payload().verse)
        }

        async fn faith_challenge(&self, last_entry_text: &str) -> Result<String, GuideError> {
            self.answer(
                self.fail_everything_else,
                format!("\"Agradeça por: {last_entry_text}\""),
            )
        }

        async fn weekly_insight(&self, digest: &str) -> Result<String, GuideError> {
            let entries = digest.split(crate::domain::insight::DIGEST_SEPARATOR).count();
            self.answer(
                self.fail_everything_else,
                format!("Semana com {entries} registros."),
            )
        }
    }
}
