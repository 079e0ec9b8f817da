//! Per-day mood aggregation and the monthly calendar grid.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use crate::domain::{entry::Entry, mood::Mood};

/// All entries written on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBucket {
    /// The calendar day.
    pub date: NaiveDate,
    /// Moods of that day's entries, in the order encountered.
    pub moods: Vec<Mood>,
    /// The first entry encountered for the day, used for navigation.
    pub representative: Uuid,
}

impl DayBucket {
    /// Mean mood of the day, rounded half up.
    #[must_use]
    pub fn average_mood(&self) -> Mood {
        let sum: u32 = self.moods.iter().map(|m| u32::from(m.get())).sum();
        let count = u32::try_from(self.moods.len()).unwrap_or(u32::MAX).max(1);
        // floor(sum / count + 1/2)
        let rounded = (2 * sum + count) / (2 * count);
        u8::try_from(rounded)
            .ok()
            .and_then(|v| Mood::new(v).ok())
            .unwrap_or(Mood::MIN)
    }

    /// Number of entries on the day.
    #[must_use]
    pub fn len(&self) -> usize {
        self.moods.len()
    }

    /// Always `false`; a bucket exists only for days with entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moods.is_empty()
    }
}

/// The calendar day of `timestamp` in `tz`.
pub fn local_day<Tz: TimeZone>(timestamp: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    timestamp.with_timezone(tz).date_naive()
}

/// Group every entry by the calendar day it was created on in `tz`.
///
/// Grouping is global, not limited to any displayed month.
pub fn bucket_by_day<'a, Tz: TimeZone>(
    entries: impl IntoIterator<Item = &'a Entry>,
    tz: &Tz,
) -> BTreeMap<NaiveDate, DayBucket> {
    let mut buckets: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();
    for entry in entries {
        let date = local_day(entry.created(), tz);
        buckets
            .entry(date)
            .or_insert_with(|| DayBucket {
                date,
                moods: Vec::new(),
                representative: entry.id(),
            })
            .moods
            .push(entry.mood());
    }
    buckets
}

/// One cell of the month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Padding before the first day of the month.
    Blank,
    /// A day of the month.
    Day(DayCell),
}

/// A day in the month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    /// Day of month, starting at 1.
    pub day: u32,
    /// Rounded average mood, if the day has entries.
    pub mood: Option<Mood>,
    /// Entry to open when the day is selected.
    pub representative: Option<Uuid>,
    /// Whether this is the current day.
    pub is_today: bool,
}

impl DayCell {
    /// Whether any entry was written on this day.
    #[must_use]
    pub const fn has_entries(&self) -> bool {
        self.representative.is_some()
    }
}

/// A rendered month: Sunday-first rows of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    /// Calendar year.
    pub year: i32,
    /// Month, 1-based.
    pub month: u32,
    /// Leading blanks followed by one cell per day.
    pub cells: Vec<Cell>,
}

impl MonthGrid {
    /// Build the grid for `year`/`month`, or `None` for an invalid month.
    #[must_use]
    pub fn new(
        year: i32,
        month: u32,
        buckets: &BTreeMap<NaiveDate, DayBucket>,
        today: NaiveDate,
    ) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let days = days_in_month(first)?;
        let leading = first.weekday().num_days_from_sunday() as usize;

        let mut cells = vec![Cell::Blank; leading];
        cells.extend((0..days).map(|offset| {
            let date = first + chrono::Days::new(u64::from(offset));
            let bucket = buckets.get(&date);
            Cell::Day(DayCell {
                day: date.day(),
                mood: bucket.map(DayBucket::average_mood),
                representative: bucket.map(|b| b.representative),
                is_today: date == today,
            })
        }));

        Some(Self { year, month, cells })
    }

    /// The previous month.
    #[must_use]
    pub const fn previous(year: i32, month: u32) -> (i32, u32) {
        if month <= 1 { (year - 1, 12) } else { (year, month - 1) }
    }

    /// The following month.
    #[must_use]
    pub const fn next(year: i32, month: u32) -> (i32, u32) {
        if month >= 12 { (year + 1, 1) } else { (year, month + 1) }
    }

    /// The grid split into weeks of seven cells (the last may be shorter).
    pub fn weeks(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(7)
    }
}

fn days_in_month(first: NaiveDate) -> Option<u32> {
    let (year, month) = MonthGrid::next(first.year(), first.month());
    let next_first = NaiveDate::from_ymd_opt(year, month, 1)?;
    u32::try_from(next_first.signed_duration_since(first).num_days()).ok()
}
