//! Free-text and mood-band filtering of the journal history.

use std::collections::BTreeSet;

use chrono::TimeZone;

use crate::domain::{
    calendar::local_day,
    entry::{sort_newest_first, Entry},
    locale,
    mood::{Mood, MoodBand},
};

/// Criteria for narrowing the history.
///
/// An entry passes only if it satisfies every active criterion. A filter
/// with no query and no moods lets everything through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    query: String,
    moods: BTreeSet<u8>,
}

impl Filter {
    /// A filter that matches every entry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Match `query` case-insensitively against the entry's text fields.
    ///
    /// Surrounding whitespace is ignored; a blank query is inactive.
    #[must_use]
    pub fn with_query(mut self, query: &str) -> Self {
        self.query = query.trim().to_lowercase();
        self
    }

    /// Also accept moods in `band`.
    #[must_use]
    pub fn with_band(self, band: MoodBand) -> Self {
        self.with_moods(band.moods().iter().copied())
    }

    /// Also accept the given mood values.
    #[must_use]
    pub fn with_moods(mut self, moods: impl IntoIterator<Item = u8>) -> Self {
        self.moods.extend(moods);
        self
    }

    /// Whether the filter narrows anything at all.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.query.is_empty() || !self.moods.is_empty()
    }

    /// Test a single entry. Dates are rendered in `tz`.
    pub fn matches<Tz: TimeZone>(&self, entry: &Entry, tz: &Tz) -> bool {
        self.matches_mood(entry.mood()) && self.matches_text(entry, tz)
    }

    fn matches_mood(&self, mood: Mood) -> bool {
        self.moods.is_empty() || self.moods.contains(&mood.get())
    }

    fn matches_text<Tz: TimeZone>(&self, entry: &Entry, tz: &Tz) -> bool {
        if self.query.is_empty() {
            return true;
        }
        let needle = self.query.as_str();
        let hit = |haystack: &str| haystack.to_lowercase().contains(needle);

        if hit(entry.title()) || hit(entry.user_text()) {
            return true;
        }
        if hit(&locale::day_month(local_day(entry.created(), tz))) {
            return true;
        }
        // An unreadable payload is simply not searched.
        entry
            .reflection()
            .is_ok_and(|payload| payload.texts().any(hit))
    }

    /// Apply the filter, returning matches newest first.
    pub fn apply<'a, Tz: TimeZone>(
        &self,
        entries: impl IntoIterator<Item = &'a Entry>,
        tz: &Tz,
    ) -> Vec<&'a Entry> {
        let mut matches: Vec<&Entry> = entries
            .into_iter()
            .filter(|entry| self.matches(entry, tz))
            .collect();
        sort_newest_first(&mut matches);
        matches
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use test_case::test_case;

    use super::*;
    use crate::domain::entry::fixtures::entry_at;

    #[test]
    fn empty_filter_keeps_everything_newest_first() {
        let entries = [
            entry_at("2026-03-01T10:00:00Z", 2, "a"),
            entry_at("2026-03-05T10:00:00Z", 9, "c"),
            entry_at("2026-03-03T10:00:00Z", 5, "b"),
        ];
        let result = Filter::new().apply(&entries, &Utc);
        let texts: Vec<_> = result.iter().map(|e| e.user_text()).collect();
        assert_eq!(texts, ["c", "b", "a"]);
    }

    #[test]
    fn query_is_case_insensitive() {
        let entry = entry_at("2026-03-01T10:00:00Z", 8, "Hoje senti muita Gratidão");
        assert!(Filter::new().with_query("gratidão").matches(&entry, &Utc));
        assert!(Filter::new().with_query("  GRATIDÃO ").matches(&entry, &Utc));
    }

    #[test]
    fn band_excludes_other_moods() {
        let entry = entry_at("2026-03-01T10:00:00Z", 7, "texto");
        assert!(!Filter::new().with_moods([1, 2, 3, 4]).matches(&entry, &Utc));
        assert!(!Filter::new().with_band(MoodBand::Challenging).matches(&entry, &Utc));
        assert!(Filter::new().with_band(MoodBand::Good).matches(&entry, &Utc));
    }

    #[test]
    fn bands_combine_as_union() {
        let entries = [
            entry_at("2026-03-01T10:00:00Z", 2, "a"),
            entry_at("2026-03-02T10:00:00Z", 6, "b"),
            entry_at("2026-03-03T10:00:00Z", 10, "c"),
        ];
        let filter = Filter::new()
            .with_band(MoodBand::Happy)
            .with_band(MoodBand::Challenging);
        let texts: Vec<_> = filter
            .apply(&entries, &Utc)
            .iter()
            .map(|e| e.user_text())
            .collect();
        assert_eq!(texts, ["c", "a"]);
    }

    #[test]
    fn query_and_band_must_both_pass() {
        let entry = entry_at("2026-03-01T10:00:00Z", 9, "paz");
        let filter = Filter::new().with_query("paz").with_band(MoodBand::Neutral);
        assert!(!filter.matches(&entry, &Utc));
    }

    #[test_case("entrada 3"; "title")]
    #[test_case("01 de março"; "formatted date")]
    #[test_case("março"; "month name")]
    #[test_case("refúgio"; "verse text")]
    #[test_case("salmos 46"; "verse reference")]
    #[test_case("obrigado"; "prayer")]
    fn query_searches_every_field(query: &str) {
        let entry = entry_at("2026-03-01T10:00:00Z", 3, "nada relacionado");
        assert!(Filter::new().with_query(query).matches(&entry, &Utc), "{query}");
    }

    #[test]
    fn broken_payload_is_skipped_not_fatal() {
        let mut broken = entry_at("2026-03-01T10:00:00Z", 3, "oração da manhã");
        broken.messages.reflection = "{not json".to_string();
        let filter = Filter::new().with_query("manhã");
        assert!(filter.matches(&broken, &Utc));
        assert!(!Filter::new().with_query("refúgio").matches(&broken, &Utc));
    }

    #[test]
    fn blank_query_is_inactive() {
        assert!(!Filter::new().with_query("   ").is_active());
        assert!(Filter::new().with_band(MoodBand::Happy).is_active());
    }
}
