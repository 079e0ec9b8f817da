use std::path::{Path, PathBuf};

mod calendar;
mod challenge;
mod daily;
mod list;
mod progress;
mod show;
mod terminal;

use anyhow::Context;
use async_trait::async_trait;
use calendar::Calendar;
use challenge::Challenge;
use clap::ArgAction;
use daily::{Insight, Verse};
use list::List;
use lumen::{
    storage::ResolveError, Config, Entry, GeminiClient, Guide, GuideError, Journal, JsonFile, Mood,
    ReflectionPayload,
};
use progress::Progress;
use show::Show;
use tracing::instrument;

const CONFIG_FILE: &str = "config.toml";

/// Parse a mood rating from 1 to 10.
fn parse_mood(s: &str) -> Result<Mood, String> {
    let value: u8 = s.trim().parse().map_err(|e| format!("{e}"))?;
    Mood::new(value).map_err(|e| e.to_string())
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the journal directory
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::List(List::default()))
            .run(self.root)
            .await
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Create a journal directory with the default configuration
    Init(Init),

    /// Write a new entry and receive a reflection
    Write(Write),

    /// List entries, newest first (default)
    List(List),

    /// Show an entry and its reflection
    Show(Show),

    /// Attach a note to an entry's verse
    ///
    /// The note replaces any earlier note on the same entry.
    Note(Note),

    /// Delete an entry
    Delete(Delete),

    /// Show a month of entries as a calendar
    Calendar(Calendar),

    /// Show how your mood has been changing
    Progress(Progress),

    /// Summarise the past week
    Insight(Insight),

    /// Show the verse of the day
    Verse(Verse),

    /// Show or complete today's faith challenge
    Challenge(Challenge),
}

impl Command {
    async fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::Init(command) => command.run(&root)?,
            Self::Write(command) => command.run(root).await?,
            Self::List(command) => command.run(&root)?,
            Self::Show(command) => command.run(&root)?,
            Self::Note(command) => command.run(&root)?,
            Self::Delete(command) => command.run(&root)?,
            Self::Calendar(command) => command.run(&root)?,
            Self::Progress(command) => command.run(&root)?,
            Self::Insight(command) => command.run(&root).await?,
            Self::Verse(command) => command.run(&root).await?,
            Self::Challenge(command) => command.run(&root).await?,
        }
        Ok(())
    }
}

/// Load the configuration of the journal at `root`.
fn load_config(root: &Path) -> Config {
    Config::load_or_default(&root.join(CONFIG_FILE))
}

/// Open the journal at `root`.
fn open_journal(root: &Path) -> anyhow::Result<(Config, Journal<JsonFile>)> {
    let config = load_config(root);
    let backend = JsonFile::in_root(root, &config);
    let journal = Journal::load(backend)
        .with_context(|| format!("Não foi possível abrir o diário em {}", root.display()))?;
    Ok((config, journal))
}

/// Connect to the generative service named in `config`.
fn connect(config: &Config) -> anyhow::Result<GeminiClient> {
    GeminiClient::from_config(config)
        .with_context(|| format!("Defina {} para usar o serviço de reflexões", config.api_key_env()))
}

/// Connect to the generative service, or answer every request with the
/// fixed fallback copy when no API key is configured.
fn guide_or_offline(config: &Config) -> Box<dyn Guide> {
    match GeminiClient::from_config(config) {
        Ok(client) => Box::new(client),
        Err(e) => {
            tracing::warn!("{e}; showing default content");
            Box::new(Offline::from(config))
        }
    }
}

/// A guide that is never reachable.
#[derive(Debug)]
struct Offline {
    api_key_env: String,
}

impl From<&Config> for Offline {
    fn from(config: &Config) -> Self {
        Self {
            api_key_env: config.api_key_env().to_string(),
        }
    }
}

impl Offline {
    fn error(&self) -> GuideError {
        GuideError::MissingApiKey(self.api_key_env.clone())
    }
}

#[async_trait]
impl Guide for Offline {
    async fn reflect(&self, _entry_text: &str) -> Result<ReflectionPayload, GuideError> {
        Err(self.error())
    }

    async fn title(&self, _entry_text: &str) -> Result<String, GuideError> {
        Err(self.error())
    }

    async fn verse_of_the_day(&self) -> Result<lumen::domain::Verse, GuideError> {
        Err(self.error())
    }

    async fn faith_challenge(&self, _last_entry_text: &str) -> Result<String, GuideError> {
        Err(self.error())
    }

    async fn weekly_insight(&self, _digest: &str) -> Result<String, GuideError> {
        Err(self.error())
    }
}

/// Resolve an abbreviated entry id.
fn resolve<'a>(journal: &'a Journal<JsonFile>, id: &str) -> anyhow::Result<&'a Entry> {
    journal.resolve(id).map_err(|e| match e {
        ResolveError::NotFound(prefix) => anyhow::anyhow!("Nenhum registro corresponde a '{prefix}'"),
        ResolveError::Ambiguous { prefix, count } => {
            anyhow::anyhow!("'{prefix}' corresponde a {count} registros; use mais caracteres")
        }
    })
}

/// The short form of an entry id shown in listings.
fn short_id(entry: &Entry) -> String {
    entry.id().simple().to_string().chars().take(8).collect()
}

#[derive(Debug, clap::Parser)]
pub struct Init {
    /// Generative model to write into the configuration
    #[arg(long)]
    model: Option<String>,
}

impl Init {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        use terminal::Colorize;

        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            anyhow::bail!(
                "O diário já foi criado ({} existe)",
                config_path.display()
            );
        }

        let mut config = Config::default();
        if let Some(model) = self.model {
            config.set_model(model);
        }

        std::fs::create_dir_all(root)
            .with_context(|| format!("Não foi possível criar {}", root.display()))?;
        config
            .save(&config_path)
            .map_err(|e| anyhow::anyhow!("Não foi possível criar {CONFIG_FILE}: {e}"))?;

        println!(
            "{}",
            format!("✅ Diário criado em {}", root.display()).success()
        );
        println!();
        println!("Próximos passos:");
        println!("  export {}=<sua chave>", config.api_key_env());
        println!("  lumen write --mood 7 \"Hoje sou grato por...\"");
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Write {
    /// How you feel, from 1 (struggling) to 10 (grateful)
    #[arg(short, long, value_parser = parse_mood)]
    mood: Mood,

    /// What is on your heart. Opens $EDITOR when omitted.
    text: Option<String>,
}

impl Write {
    #[instrument(skip(self))]
    async fn run(self, root: PathBuf) -> anyhow::Result<()> {
        use terminal::Colorize;

        let text = match self.text {
            Some(text) => text,
            None => dialoguer::Editor::new()
                .edit("")
                .context("Não foi possível abrir o editor")?
                .unwrap_or_default(),
        };
        let text = text.trim().to_string();
        if text.is_empty() {
            anyhow::bail!("Nada para registrar: o texto está vazio");
        }

        let (config, mut journal) = open_journal(&root)?;
        let guide = connect(&config)?;

        println!("{}", "Preparando sua reflexão...".dim());
        let entry = journal
            .create(text, self.mood, &guide, config.fallback_title())
            .await
            .context("O registro não foi salvo")?;

        println!(
            "{}",
            format!("✅ {} {}", entry.mood().icon(), entry.title()).success()
        );
        println!();
        show::print_entry(&entry);
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Note {
    /// The entry id, or a unique prefix of it
    id: String,

    /// The note to attach
    note: String,
}

impl Note {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        use terminal::Colorize;

        let (_, mut journal) = open_journal(root)?;
        let id = resolve(&journal, &self.id)?.id();
        journal.attach_note(id, self.note)?;

        println!("{}", "✅ Anotação salva".success());
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Delete {
    /// The entry id, or a unique prefix of it
    id: String,

    /// Skip confirmation prompts
    #[arg(long, short)]
    yes: bool,
}

impl Delete {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        use terminal::Colorize;

        let (_, mut journal) = open_journal(root)?;
        let entry = resolve(&journal, &self.id)?;
        let (id, title) = (entry.id(), entry.title().to_string());

        if !self.yes {
            let proceed = dialoguer::Confirm::new()
                .with_prompt(format!("Excluir '{title}'? Isso não pode ser desfeito"))
                .default(false)
                .interact()?;
            if !proceed {
                println!("Cancelado");
                std::process::exit(130);
            }
        }

        journal.delete(id)?;
        println!("{}", format!("✅ '{title}' excluído").success());
        Ok(())
    }
}
