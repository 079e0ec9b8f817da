//! Devotional journaling with mood analytics
//!
//! Entries are free-text journal submissions with a mood rating. Each one
//! is stored with a reflection generated for it, and the collection can be
//! filtered, grouped into a monthly calendar, and analysed for a mood trend.

pub mod domain;
pub use domain::{Config, Entry, Filter, Mood, MoodBand, ReflectionPayload, Trend};

/// External generative services.
pub mod guide;
pub use guide::{GeminiClient, Guide, GuideError};

/// Durable storage for entries and challenge completions.
pub mod storage;
pub use storage::{ChallengeLog, Journal, JsonFile};
