use std::path::Path;

use chrono::Local;
use clap::Parser;
use lumen::{
    domain::{challenge::today, insight},
    guide,
};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Show the verse of the day")]
pub struct Verse {}

impl Verse {
    #[instrument(level = "debug", skip(self))]
    pub async fn run(self, root: &Path) -> anyhow::Result<()> {
        let config = super::load_config(root);
        let service = super::guide_or_offline(&config);
        let verse = guide::verse_or_fallback(service.as_ref()).await;

        println!("{}", "Versículo do dia".info());
        println!("{}", format!("“{}”", verse.text).verse());
        println!("{}", verse.reference.dim());
        Ok(())
    }
}

#[derive(Debug, Parser)]
#[command(about = "Summarise the past seven days of entries")]
pub struct Insight {}

impl Insight {
    #[instrument(level = "debug", skip(self))]
    pub async fn run(self, root: &Path) -> anyhow::Result<()> {
        let (config, journal) = super::open_journal(root)?;
        let week = insight::past_week(journal.list(), today(), &Local);
        let digest = insight::digest(&week);
        tracing::debug!("{} entries in the past week", week.len());

        // An empty week never reaches the service.
        let text = if digest.is_some() {
            let service = super::guide_or_offline(&config);
            guide::insight_or_fallback(service.as_ref(), digest.as_deref()).await
        } else {
            guide::EMPTY_WEEK_INSIGHT.to_string()
        };

        println!("{}", "Sua semana".info());
        println!("{text}");
        Ok(())
    }
}
