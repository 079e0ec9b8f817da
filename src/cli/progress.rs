use std::path::Path;

use chrono::Local;
use clap::Parser;
use lumen::{
    domain::{calendar::local_day, trend},
    Entry, Trend,
};
use tracing::instrument;

use super::terminal::Colorize;

/// Default number of recent entries charted.
const DEFAULT_CHART_LEN: usize = 14;

#[derive(Debug, Parser)]
#[command(about = "Show how your mood has been changing")]
pub struct Progress {
    /// Number of recent entries to chart (0 = all)
    #[arg(long, default_value_t = DEFAULT_CHART_LEN)]
    last: usize,
}

impl Progress {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let (_, journal) = super::open_journal(root)?;
        let entries = journal.list();
        let report = trend::analyze_entries(entries);

        println!("{}", "Humor".info());
        let shown = if self.last == 0 {
            entries
        } else {
            &entries[..entries.len().min(self.last)]
        };
        for line in chart(shown) {
            println!("{line}");
        }

        if let (Some(first), Some(second)) =
            (report.first_half_average, report.second_half_average)
        {
            println!();
            println!("{}", format!("Primeira metade: {first:.1}").dim());
            println!("{}", format!("Segunda metade:  {second:.1}").dim());
        }

        println!();
        let message = report.trend.message();
        match report.trend {
            Trend::Improving => println!("📈 {}", message.success()),
            Trend::Declining => println!("📉 {}", message.warning()),
            Trend::Stable | Trend::InsufficientData => println!("{message}"),
        }
        Ok(())
    }
}

/// One bar per entry, oldest first: `05/03 ██████░░░░ 6`.
fn chart(entries: &[Entry]) -> Vec<String> {
    entries
        .iter()
        .rev()
        .map(|entry| {
            let mood = entry.mood().get();
            let filled = usize::from(mood);
            let empty = usize::from(lumen::Mood::MAX.get()) - filled;
            format!(
                "{} {}{} {mood}",
                local_day(entry.created(), &Local).format("%d/%m"),
                "█".repeat(filled),
                "░".repeat(empty).dim()
            )
        })
        .collect()
}
