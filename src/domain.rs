//! Domain models for the journal.
//!
//! This module contains the entry type and the pure derivations computed
//! from a collection of entries: trend, calendar buckets, search results,
//! and the challenge tracker.

/// Journal entries.
pub mod entry;
pub use entry::Entry;

/// Mood ratings, icons, and bands.
pub mod mood;
pub use mood::{Mood, MoodBand, MoodError, Sentiment};

/// The structured reflection attached to each entry.
pub mod reflection;
pub use reflection::{PayloadError, ReflectionPayload, Verse};

/// Mood trend classification.
pub mod trend;
pub use trend::{Trend, TrendReport};

pub mod calendar;
pub use calendar::{DayBucket, MonthGrid};

pub mod search;
pub use search::Filter;

/// Daily faith challenges and points.
pub mod challenge;
pub use challenge::{ChallengeCompletion, ChallengeTracker, FaithChallenge};

pub mod insight;
pub mod locale;

mod config;
pub use config::Config;
