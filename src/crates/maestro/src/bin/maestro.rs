//! Maestro CLI - talk to your Mopidy server in plain words
//!
//! Main entry point for the maestro command-line tool.

use anyhow::Context;
use clap::{Parser, Subcommand};
use maestro::config::ConfigLoader;
use maestro::events::ConsoleSink;
use maestro::{ChatMessage, Maestro, MaestroConfig};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "maestro")]
#[command(about = "Maestro - conversational control for a Mopidy music server", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Extra config file layered over ~/.maestro and ./.maestro
    #[arg(long, global = true, env = "MAESTRO_CONFIG")]
    config: Option<PathBuf>,

    /// Suppress status events; print only messages
    #[arg(long, global = true)]
    no_ui: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve and carry out one request
    Ask {
        /// The request, e.g. "play kind of blue"
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Print the intent a request resolves to, without acting on it
    Resolve {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Read requests from stdin, one per line
    Repl,

    /// Print the effective configuration (secrets masked)
    Config,
}

async fn load_config(cli: &Cli) -> anyhow::Result<MaestroConfig> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_file(path.clone());
    }
    let mut config = loader.load().await.context("failed to load configuration")?;
    if cli.no_ui {
        config.ui.ui_mode = false;
    }
    Ok(config)
}

async fn repl(maestro: &Maestro) -> anyhow::Result<()> {
    let mut conversation: Vec<ChatMessage> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    eprintln!("maestro {} - type a request, or 'quit' to exit", maestro::version());

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "quit" | "exit") {
            break;
        }

        conversation.push(ChatMessage::human(line));
        let outcome = maestro.handle_turn(&conversation, &ConsoleSink).await?;
        conversation.push(ChatMessage::assistant(outcome.message));
    }

    let playlists = maestro.playlists().names();
    if !playlists.is_empty() {
        eprintln!("Session playlists (not saved): {}", playlists.join(", "));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tooling::logging::init_tracing("maestro=info,llm=warn")?;

    let cli = Cli::parse();
    let config = load_config(&cli).await?;

    match cli.command {
        Commands::Ask { text } => {
            let maestro = Maestro::from_config(&config)?;
            let outcome = maestro.handle_text(&text.join(" "), &ConsoleSink).await;
            if !outcome.success {
                std::process::exit(1);
            }
        }
        Commands::Resolve { text } => {
            let maestro = Maestro::from_config(&config)?;
            let intent = maestro.resolve(&text.join(" ")).await;
            println!("{}", serde_json::to_string_pretty(&intent)?);
        }
        Commands::Repl => {
            let maestro = Maestro::from_config(&config)?;
            repl(&maestro).await?;
        }
        Commands::Config => {
            println!("{}", toml::to_string_pretty(&config.redacted())?);
        }
    }

    Ok(())
}
