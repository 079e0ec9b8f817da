//! Brazilian Portuguese date formatting.
//!
//! Dates are shown the way the journal has always shown them: `05 de março`
//! in lists and `março de 2026` above the calendar.

use chrono::{Datelike, NaiveDate, Weekday};

const MONTHS: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// Name of `month` (1-based). Out-of-range months yield an empty string.
#[must_use]
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTHS.get(i as usize))
        .copied()
        .unwrap_or_default()
}

/// `05 de março`
#[must_use]
pub fn day_month(date: NaiveDate) -> String {
    format!("{:02} de {}", date.day(), month_name(date.month()))
}

/// `05 de março de 2026`
#[must_use]
pub fn long_date(date: NaiveDate) -> String {
    format!("{} de {}", day_month(date), date.year())
}

/// `março de 2026`
#[must_use]
pub fn month_year(year: i32, month: u32) -> String {
    format!("{} de {year}", month_name(month))
}

/// `quinta-feira, 05 de março`
#[must_use]
pub fn weekday_day_month(date: NaiveDate) -> String {
    let weekday = match date.weekday() {
        Weekday::Sun => "domingo",
        Weekday::Mon => "segunda-feira",
        Weekday::Tue => "terça-feira",
        Weekday::Wed => "quarta-feira",
        Weekday::Thu => "quinta-feira",
        Weekday::Fri => "sexta-feira",
        Weekday::Sat => "sábado",
    };
    format!("{weekday}, {}", day_month(date))
}

/// Single-letter column headings for a Sunday-first week.
pub const WEEKDAY_INITIALS: [&str; 7] = ["D", "S", "T", "Q", "Q", "S", "S"];

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(2026, 3, 5, "05 de março")]
    #[test_case(2026, 12, 25, "25 de dezembro")]
    #[test_case(2025, 1, 1, "01 de janeiro")]
    fn formats_day_and_month(y: i32, m: u32, d: u32, expected: &str) {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        assert_eq!(day_month(date), expected);
    }

    #[test]
    fn formats_weekday() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        assert_eq!(weekday_day_month(date), "quinta-feira, 05 de março");
    }

    #[test]
    fn invalid_month_is_empty() {
        assert_eq!(month_name(0), "");
        assert_eq!(month_name(13), "");
    }
}
