//! Selection of the past week's entries for the weekly insight.

use chrono::{Days, NaiveDate, TimeZone};

use crate::domain::{calendar::local_day, entry::Entry};

/// Separator placed between entry texts in the weekly digest.
pub const DIGEST_SEPARATOR: &str = "\n---\n";

/// Entries written on or after the day seven days before `today`.
pub fn past_week<'a, Tz: TimeZone>(
    entries: impl IntoIterator<Item = &'a Entry>,
    today: NaiveDate,
    tz: &Tz,
) -> Vec<&'a Entry> {
    let start = today.checked_sub_days(Days::new(7)).unwrap_or(NaiveDate::MIN);
    entries
        .into_iter()
        .filter(|entry| local_day(entry.created(), tz) >= start)
        .collect()
}

/// The user texts of `entries`, joined for the insight request.
///
/// Returns `None` when there is nothing to summarise.
#[must_use]
pub fn digest(entries: &[&Entry]) -> Option<String> {
    let text = entries
        .iter()
        .map(|entry| entry.user_text())
        .collect::<Vec<_>>()
        .join(DIGEST_SEPARATOR);
    if text.trim().is_empty() { None } else { Some(text) }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::entry::fixtures::entry_at;

    #[test]
    fn window_starts_seven_days_back_at_midnight() {
        let entries = [
            entry_at("2026-03-10T09:00:00Z", 5, "hoje"),
            entry_at("2026-03-03T00:00:00Z", 5, "limite"),
            entry_at("2026-03-02T23:59:59Z", 5, "antes"),
        ];
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let week = past_week(&entries, today, &Utc);
        let texts: Vec<_> = week.iter().map(|e| e.user_text()).collect();
        assert_eq!(texts, ["hoje", "limite"]);
    }

    #[test]
    fn digest_joins_texts() {
        let a = entry_at("2026-03-10T09:00:00Z", 5, "um");
        let b = entry_at("2026-03-09T09:00:00Z", 5, "dois");
        assert_eq!(digest(&[&a, &b]).unwrap(), "um\n---\ndois");
    }

    #[test]
    fn empty_digest_is_none() {
        assert_eq!(digest(&[]), None);
        let blank = entry_at("2026-03-10T09:00:00Z", 5, "  ");
        assert_eq!(digest(&[&blank]), None);
    }
}
