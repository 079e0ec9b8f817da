use std::fmt;

use serde::{Deserialize, Serialize};

/// A mood rating, always within `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Mood(u8);

impl Mood {
    /// The lowest possible rating.
    pub const MIN: Self = Self(1);
    /// The highest possible rating.
    pub const MAX: Self = Self(10);

    /// Construct a mood, rejecting values outside `1..=10`.
    ///
    /// # Errors
    ///
    /// Returns [`MoodError`] if `value` is out of range.
    pub const fn new(value: u8) -> Result<Self, MoodError> {
        if value >= Self::MIN.0 && value <= Self::MAX.0 {
            Ok(Self(value))
        } else {
            Err(MoodError(value))
        }
    }

    /// The raw rating.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// The icon shown next to an entry with this mood.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self.0 {
            1 | 2 => "😔",
            3 | 4 => "😕",
            5 | 6 => "😐",
            7 | 8 => "🙂",
            _ => "😄",
        }
    }

    /// The sentiment this mood is grouped under on the spiritual timeline.
    #[must_use]
    pub const fn sentiment(self) -> Sentiment {
        match self.0 {
            9.. => Sentiment::Gratitude,
            7 | 8 => Sentiment::Faith,
            5 | 6 => Sentiment::Hope,
            3 | 4 => Sentiment::Rest,
            _ => Sentiment::Struggle,
        }
    }
}

impl TryFrom<u8> for Mood {
    type Error = MoodError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Mood> for u8 {
    fn from(mood: Mood) -> Self {
        mood.0
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A mood rating outside `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("mood must be between 1 and 10, got {0}")]
pub struct MoodError(pub u8);

/// Timeline label derived from a mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    /// Moods 9 and 10.
    Gratitude,
    /// Moods 7 and 8.
    Faith,
    /// Moods 5 and 6.
    Hope,
    /// Moods 3 and 4.
    Rest,
    /// Moods 1 and 2.
    Struggle,
}

impl Sentiment {
    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gratitude => "Gratidão",
            Self::Faith => "Fé",
            Self::Hope => "Esperança",
            Self::Rest => "Descanso",
            Self::Struggle => "Luta",
        }
    }
}

/// A named group of moods used by the history filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoodBand {
    /// 9 and 10.
    Happy,
    /// 7 and 8.
    Good,
    /// 5 and 6.
    Neutral,
    /// 1 through 4.
    Challenging,
}

impl MoodBand {
    /// The mood values belonging to this band.
    #[must_use]
    pub const fn moods(self) -> &'static [u8] {
        match self {
            Self::Happy => &[9, 10],
            Self::Good => &[7, 8],
            Self::Neutral => &[5, 6],
            Self::Challenging => &[1, 2, 3, 4],
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Happy => "Feliz",
            Self::Good => "Bem",
            Self::Neutral => "Neutro",
            Self::Challenging => "Desafiador",
        }
    }

    /// Whether `mood` belongs to this band.
    #[must_use]
    pub fn contains(self, mood: Mood) -> bool {
        self.moods().contains(&mood.get())
    }
}
