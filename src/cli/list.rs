use std::path::Path;

use chrono::{Local, TimeZone};
use clap::{Parser, ValueEnum};
use lumen::{
    domain::{calendar::local_day, locale},
    Entry, Filter, MoodBand,
};
use serde::Serialize;
use tracing::instrument;

use super::terminal::{is_narrow, Colorize};

/// Command arguments for `lumen list`.
#[derive(Debug, Parser, Default)]
#[command(about = "List entries, newest first, with search and mood filters")]
pub struct List {
    /// Case-insensitive text to search for in titles, dates, entries, and
    /// reflections.
    #[arg(long, short)]
    query: Option<String>,

    /// Only show entries in these mood bands (comma-separated).
    #[arg(long, value_enum, value_delimiter = ',', value_name = "BAND")]
    band: Vec<Band>,

    /// How to lay out each entry (default: list).
    #[arg(long, value_enum, default_value_t)]
    view: View,

    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,

    /// Limit number of rows returned.
    #[arg(long)]
    limit: Option<usize>,
}

/// Supported output formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Layout of the listing.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum View {
    /// Icon, title, and full date.
    #[default]
    List,
    /// Short date, title, and the feeling the mood stands for.
    Timeline,
}

/// The named mood bands, as written on the command line.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum Band {
    /// Moods 9 and 10.
    Feliz,
    /// Moods 7 and 8.
    Bem,
    /// Moods 5 and 6.
    Neutro,
    /// Moods 1 to 4.
    Desafiador,
}

impl From<Band> for MoodBand {
    fn from(band: Band) -> Self {
        match band {
            Band::Feliz => Self::Happy,
            Band::Bem => Self::Good,
            Band::Neutro => Self::Neutral,
            Band::Desafiador => Self::Challenging,
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonRow<'a> {
    id: String,
    title: &'a str,
    created: String,
    mood: u8,
    icon: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    verse_note: Option<&'a str>,
}

impl List {
    fn filter(&self) -> Filter {
        let filter = self
            .band
            .iter()
            .fold(Filter::new(), |filter, &band| filter.with_band(band.into()));
        match &self.query {
            Some(query) => filter.with_query(query),
            None => filter,
        }
    }

    #[instrument(level = "debug", skip_all)]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let (_, journal) = super::open_journal(root)?;
        let filter = self.filter();

        let mut entries = filter.apply(journal.list(), &Local);
        if let Some(limit) = self.limit.filter(|&limit| limit > 0) {
            entries.truncate(limit);
        }
        tracing::debug!("{} of {} entries shown", entries.len(), journal.list().len());

        match self.output {
            OutputFormat::Json => render_json(&entries)?,
            OutputFormat::Table if entries.is_empty() => {
                if filter.is_active() {
                    println!("Nenhum registro encontrado.");
                } else {
                    println!("Nenhum registro ainda. Escreva o primeiro com 'lumen write --mood N'.");
                }
            }
            OutputFormat::Table => {
                if let Some(summary) = band_summary(&self.band) {
                    println!("{}", summary.dim());
                }
                let lines = match self.view {
                    View::List => list_lines(&entries, &Local, is_narrow()),
                    View::Timeline => timeline_lines(&entries, &Local),
                };
                for line in lines {
                    println!("{line}");
                }
            }
        }
        Ok(())
    }
}

/// `Humor: Feliz, Bem`, naming the selected bands.
fn band_summary(bands: &[Band]) -> Option<String> {
    if bands.is_empty() {
        return None;
    }
    let labels: Vec<_> = bands
        .iter()
        .map(|&band| MoodBand::from(band).label())
        .collect();
    Some(format!("Humor: {}", labels.join(", ")))
}

fn render_json(entries: &[&Entry]) -> anyhow::Result<()> {
    let rows: Vec<_> = entries
        .iter()
        .map(|entry| JsonRow {
            id: entry.id().to_string(),
            title: entry.title(),
            created: entry.created().to_rfc3339(),
            mood: entry.mood().get(),
            icon: entry.mood().icon(),
            verse_note: entry.verse_note(),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

/// `😄  1a2b3c4d  Title  05 de março de 2026`, aligned by column.
fn list_lines<Tz: TimeZone>(entries: &[&Entry], tz: &Tz, narrow: bool) -> Vec<String> {
    let width = entries
        .iter()
        .map(|entry| entry.title().chars().count())
        .max()
        .unwrap_or(0);

    entries
        .iter()
        .map(|entry| {
            let id = super::short_id(entry).dim();
            let icon = entry.mood().icon();
            if narrow {
                format!("{icon} {id} {}", entry.title())
            } else {
                let date = locale::long_date(local_day(entry.created(), tz));
                let title = pad(entry.title(), width);
                format!("{icon}  {id}  {title}  {}", date.dim())
            }
        })
        .collect()
}

/// `05/03  Title  · Fé`
fn timeline_lines<Tz: TimeZone>(entries: &[&Entry], tz: &Tz) -> Vec<String> {
    let width = entries
        .iter()
        .map(|entry| entry.title().chars().count())
        .max()
        .unwrap_or(0);

    entries
        .iter()
        .map(|entry| {
            let date = local_day(entry.created(), tz).format("%d/%m").to_string();
            let sentiment = format!("· {}", entry.mood().sentiment().label());
            format!(
                "{}  {}  {}",
                date.info(),
                pad(entry.title(), width),
                sentiment.dim()
            )
        })
        .collect()
}

/// Left-align `text` to `width` characters.
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.chars().count());
    format!("{text}{}", " ".repeat(fill))
}
