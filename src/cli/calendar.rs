use std::path::Path;

use chrono::{Datelike, Local, NaiveDate};
use clap::Parser;
use lumen::domain::{
    calendar::{bucket_by_day, Cell, DayCell},
    challenge::today,
    locale, MonthGrid,
};
use tracing::instrument;

use super::terminal::Colorize;

/// Width of one calendar cell: a two-digit day, a space, and an icon.
const CELL_WIDTH: usize = 6;

#[derive(Debug, Parser)]
#[command(about = "Show a month of entries as a calendar")]
pub struct Calendar {
    /// Year to show (default: this year)
    #[arg(long)]
    year: Option<i32>,

    /// Month to show, 1 to 12 (default: this month)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,

    /// Show the month before
    #[arg(long, conflicts_with = "next")]
    prev: bool,

    /// Show the month after
    #[arg(long)]
    next: bool,
}

impl Calendar {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let (_, journal) = super::open_journal(root)?;
        let today = today();
        let (year, month) = self.target(today);

        let buckets = bucket_by_day(journal.list(), &Local);
        let Some(grid) = MonthGrid::new(year, month, &buckets, today) else {
            anyhow::bail!("{year}-{month:02} não é um mês válido");
        };

        let mut lines = render(&grid).into_iter();
        if let Some(heading) = lines.next() {
            println!("{}", heading.info());
        }
        for line in lines {
            println!("{line}");
        }

        let days_with_entries = grid
            .cells
            .iter()
            .filter(|cell| matches!(cell, Cell::Day(day) if day.has_entries()))
            .count();
        println!(
            "\n{}",
            format!("{days_with_entries} dia(s) com registros. Abra um com 'lumen show ID'.").dim()
        );
        for cell in &grid.cells {
            if let Cell::Day(DayCell {
                day,
                representative: Some(id),
                ..
            }) = cell
            {
                let id: String = id.simple().to_string().chars().take(8).collect();
                println!("{}", format!("  {day:>2}: {id}").dim());
            }
        }
        Ok(())
    }

    /// The month to show: the chosen (or current) month, moved one back or
    /// forward by `--prev` / `--next`.
    fn target(&self, today: NaiveDate) -> (i32, u32) {
        let year = self.year.unwrap_or_else(|| today.year());
        let month = self.month.unwrap_or_else(|| today.month());
        if self.prev {
            MonthGrid::previous(year, month)
        } else if self.next {
            MonthGrid::next(year, month)
        } else {
            (year, month)
        }
    }
}

/// The grid as lines of text: a heading, weekday initials, then weeks.
fn render(grid: &MonthGrid) -> Vec<String> {
    let mut lines = vec![locale::month_year(grid.year, grid.month)];

    lines.push(
        locale::WEEKDAY_INITIALS
            .iter()
            .map(|initial| format!("{initial:<CELL_WIDTH$}"))
            .collect::<String>()
            .trim_end()
            .to_string(),
    );

    for week in grid.weeks() {
        let line: String = week.iter().map(render_cell).collect();
        lines.push(line.trim_end().to_string());
    }
    lines
}

fn render_cell(cell: &Cell) -> String {
    match cell {
        Cell::Blank => " ".repeat(CELL_WIDTH),
        Cell::Day(day) => {
            let number = format!("{:>2}", day.day);
            let number = if day.is_today { number.highlight() } else { number };
            let icon = day.mood.map_or("  ", |mood| mood.icon());
            // Icons are two columns wide.
            format!("{number} {icon} ")
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use test_case::test_case;

    use super::*;

    #[test_case(&[], (2026, 3); "current month")]
    #[test_case(&["--prev"], (2026, 2); "previous month")]
    #[test_case(&["--next"], (2026, 4); "next month")]
    #[test_case(&["--month", "1", "--prev"], (2025, 12); "back across the year")]
    #[test_case(&["--year", "2025", "--month", "12", "--next"], (2026, 1); "forward across the year")]
    fn navigation(args: &[&str], expected: (i32, u32)) {
        let calendar =
            Calendar::try_parse_from(std::iter::once("calendar").chain(args.iter().copied()))
                .unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 3, 18).unwrap();
        assert_eq!(calendar.target(today), expected);
    }

    #[test]
    fn prev_and_next_conflict() {
        assert!(Calendar::try_parse_from(["calendar", "--prev", "--next"]).is_err());
    }

    #[test]
    fn march_2026_starts_on_sunday() {
        let grid = MonthGrid::new(
            2026,
            3,
            &BTreeMap::new(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        )
        .unwrap();
        let lines = render(&grid);

        assert_eq!(lines[0], "março de 2026");
        assert_eq!(lines[1], "D     S     T     Q     Q     S     S");
        assert!(lines[2].starts_with(" 1    "));
        assert_eq!(lines.len(), 2 + 5);
    }

    #[test]
    fn days_with_entries_show_their_icon() {
        let cell = Cell::Day(DayCell {
            day: 5,
            mood: Some(lumen::Mood::new(9).unwrap()),
            representative: None,
            is_today: false,
        });
        assert_eq!(render_cell(&cell), " 5 😄 ");
        assert_eq!(render_cell(&Cell::Blank), "      ");
    }
}
