use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};

/// A user's recorded fulfilment of a day's challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeCompletion {
    /// The calendar day. At most one completion exists per day.
    pub date: NaiveDate,
    /// What the user wrote about doing the challenge.
    pub reflection: String,
}

/// The challenge offered on a given day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaithChallenge {
    /// The challenge text.
    pub text: String,
    /// The day it was generated for.
    pub date: NaiveDate,
}

/// Daily challenge completions and the points they earned.
///
/// Points never decrease: each day earns at most one point, on its first
/// completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChallengeTracker {
    pub(crate) completions: BTreeMap<NaiveDate, String>,
    pub(crate) points: u32,
    pub(crate) challenge: Option<FaithChallenge>,
}

impl ChallengeTracker {
    /// An empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total points earned.
    #[must_use]
    pub const fn points(&self) -> u32 {
        self.points
    }

    /// Record a completion for `date`, replacing any earlier one that day.
    ///
    /// Returns `true` if this was the day's first completion (and so earned
    /// a point).
    pub fn complete_on(&mut self, date: NaiveDate, reflection: String) -> bool {
        let first = self.completions.insert(date, reflection).is_none();
        if first {
            self.points = self.points.saturating_add(1);
        }
        tracing::debug!(%date, first, points = self.points, "challenge completed");
        first
    }

    /// Record a completion for the current local day.
    pub fn complete(&mut self, reflection: String) -> bool {
        self.complete_on(today(), reflection)
    }

    /// The completion recorded for `date`.
    #[must_use]
    pub fn completion_on(&self, date: NaiveDate) -> Option<ChallengeCompletion> {
        self.completions
            .get(&date)
            .map(|reflection| ChallengeCompletion {
                date,
                reflection: reflection.clone(),
            })
    }

    /// The completion recorded for the current local day.
    #[must_use]
    pub fn today(&self) -> Option<ChallengeCompletion> {
        self.completion_on(today())
    }

    /// All completions, oldest first.
    pub fn completions(&self) -> impl Iterator<Item = ChallengeCompletion> + '_ {
        self.completions
            .iter()
            .map(|(&date, reflection)| ChallengeCompletion {
                date,
                reflection: reflection.clone(),
            })
    }

    /// The challenge cached for `date`, if one was generated that day.
    #[must_use]
    pub fn challenge_for(&self, date: NaiveDate) -> Option<&FaithChallenge> {
        self.challenge.as_ref().filter(|c| c.date == date)
    }

    /// Cache the day's challenge text.
    pub fn set_challenge(&mut self, challenge: FaithChallenge) {
        self.challenge = Some(challenge);
    }
}

/// The current calendar day in local time.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
