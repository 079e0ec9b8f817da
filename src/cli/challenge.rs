use std::path::Path;

use clap::{Parser, Subcommand};
use lumen::{
    domain::{challenge::today, locale, ChallengeTracker},
    ChallengeLog, Guide,
};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Show or complete today's faith challenge")]
pub struct Challenge {
    #[command(subcommand)]
    command: Option<ChallengeCommand>,
}

#[derive(Debug, Subcommand)]
enum ChallengeCommand {
    /// Mark today's challenge as done
    ///
    /// Completing again on the same day replaces the reflection without
    /// earning another point.
    Complete {
        /// How it went
        reflection: String,
    },

    /// List completed challenges, oldest first
    History,
}

impl Challenge {
    #[instrument(level = "debug", skip(self))]
    pub async fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut log = ChallengeLog::in_root(root)?;

        match self.command {
            Some(ChallengeCommand::Complete { reflection }) => {
                if log.complete(reflection)? {
                    println!("{}", "✅ Desafio concluído! +1 ponto".success());
                } else {
                    println!("{}", "✅ Reflexão de hoje atualizada".success());
                }
                println!("{}", points(log.tracker()).dim());
            }
            Some(ChallengeCommand::History) => {
                println!("{}", "Desafios concluídos".info());
                for line in history_lines(log.tracker()) {
                    println!("{line}");
                }
                println!("{}", points(log.tracker()).dim());
            }
            None => Self::show(root, &mut log).await?,
        }
        Ok(())
    }

    async fn show(root: &Path, log: &mut ChallengeLog) -> anyhow::Result<()> {
        let (config, journal) = super::open_journal(root)?;
        let today = today();

        // Only a request without a cached challenge and with entries present
        // reaches the service.
        let needs_service =
            log.tracker().challenge_for(today).is_none() && journal.latest().is_some();
        let guide: Box<dyn Guide> = if needs_service {
            super::guide_or_offline(&config)
        } else {
            Box::new(super::Offline::from(&config))
        };
        let challenge = log
            .challenge_on(today, journal.latest(), guide.as_ref())
            .await?;

        println!("{}", "Desafio de hoje".info());
        match challenge {
            Some(challenge) => println!("{}", challenge.text),
            None => println!("Escreva seu primeiro registro para receber um desafio."),
        }

        if let Some(done) = log.tracker().today() {
            println!("\n{}", "✅ Concluído hoje".success());
            println!("{}", done.reflection.dim());
        } else {
            println!(
                "\n{}",
                "Concluiu? Rode 'lumen challenge complete \"como foi\"'".dim()
            );
        }
        println!("{}", points(log.tracker()).dim());
        Ok(())
    }
}

fn points(tracker: &ChallengeTracker) -> String {
    format!("⭐ {} ponto(s)", tracker.points())
}

/// `05 de março  reflection`, one line per completed day.
fn history_lines(tracker: &ChallengeTracker) -> Vec<String> {
    let lines: Vec<_> = tracker
        .completions()
        .map(|done| format!("{}  {}", locale::day_month(done.date), done.reflection))
        .collect();
    if lines.is_empty() {
        vec!["Nenhum desafio concluído ainda.".to_string()]
    } else {
        lines
    }
}
