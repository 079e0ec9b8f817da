use std::path::Path;

use chrono::Local;
use clap::Parser;
use lumen::{
    domain::{calendar::local_day, locale},
    Entry,
};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Display an entry and its reflection")]
pub struct Show {
    /// The entry id, or a unique prefix of it
    id: String,
}

impl Show {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let (_, journal) = super::open_journal(root)?;
        let entry = super::resolve(&journal, &self.id)?;
        print_entry(entry);
        Ok(())
    }
}

/// Print an entry with its parsed reflection.
pub fn print_entry(entry: &Entry) {
    let mood = entry.mood();
    let date = locale::weekday_day_month(local_day(entry.created(), &Local));

    println!("# {}", entry.title());
    println!(
        "{}",
        format!(
            "{date} · {} {mood}/10 · {}",
            mood.icon(),
            mood.sentiment().label()
        )
        .dim()
    );
    println!("{}", format!("id {}", entry.id()).dim());

    println!("\n{}", "Você escreveu".info());
    println!("{}", entry.user_text());

    match entry.reflection() {
        Ok(payload) => {
            println!("\n{}", payload.empathy);
            println!("\n{}", "Reflexão".info());
            println!("{}", payload.reflection);
            println!("\n{}", "Versículo".info());
            println!(
                "{}",
                format!("“{}” ({})", payload.verse.text, payload.verse.reference).verse()
            );
            println!("\n{}", "Sugestão".info());
            println!("{}", payload.suggestion);
            println!("\n{}", "Oração".info());
            println!("{}", payload.prayer);
        }
        Err(e) => {
            tracing::debug!(id = %entry.id(), "unreadable reflection: {e}");
            println!(
                "\n{}",
                "⚠️  A reflexão deste registro não está disponível".warning()
            );
        }
    }

    if let Some(note) = entry.verse_note() {
        println!("\n{}", "Sua anotação".info());
        println!("{note}");
    }
}
