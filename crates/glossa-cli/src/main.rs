use anyhow::Result;
use clap::{Parser, Subcommand};
use glossa_core::safety::HarmBlockThreshold;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "glossa")]
#[command(about = "Glossa CLI - message translation and Gemini model catalog", long_about = None)]
struct Cli {
    /// Use this directory instead of ~/.config/glossa
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or change the translation settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Translate the text fragments of a message stored as JSON
    Translate {
        /// Path to the message JSON file
        message: PathBuf,
        /// Write the translated message back to the file instead of printing it
        #[arg(long)]
        write: bool,
    },
    /// List the Gemini models available to a key
    Models {
        /// API key (defaults to GEMINI_API_KEY)
        #[arg(long)]
        key: Option<String>,
        /// API host (defaults to the configured host)
        #[arg(long)]
        host: Option<String>,
        /// Safety threshold, e.g. BLOCK_ONLY_HIGH
        #[arg(long)]
        min_safety: Option<HarmBlockThreshold>,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the current settings (keys are not shown)
    Show,
    /// Update one or more fields
    Set {
        /// Comma-separated API keys
        #[arg(long)]
        api_key: Option<String>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        target: Option<String>,
        /// Template with {sourceLang}, {targetLang} and {text}
        #[arg(long)]
        prompt: Option<String>,
    },
}

fn init_tracing() {
    let default_level = "info";
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let paths = commands::resolve_paths(cli.config_dir)?;
    tracing::debug!(config_dir = %paths.config_dir().display(), "Resolved configuration directory");

    match cli.command {
        Commands::Settings { action } => match action {
            SettingsAction::Show => commands::settings::show(&paths)?,
            SettingsAction::Set {
                api_key,
                model,
                source,
                target,
                prompt,
            } => commands::settings::set(&paths, api_key, model, source, target, prompt)?,
        },
        Commands::Translate { message, write } => {
            commands::translate::run(&paths, &message, write).await?
        }
        Commands::Models {
            key,
            host,
            min_safety,
        } => commands::models::list(&paths, key, host, min_safety).await?,
    }

    Ok(())
}
