use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use roller_core::{AppConfig, EventKind};

mod commands;
mod script;

use commands::simulate::{SimulateOptions, DEFAULT_SETTLE_FRAMES};

#[derive(Parser)]
#[command(name = "roller")]
#[command(author, version, about = "Physics-driven scroll and paging engine playground")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ~/.config/roller/config.toml)
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a gesture script and print the emitted events
    Simulate {
        /// TOML gesture script
        script: PathBuf,
        /// Frame cap for `settle` steps
        #[arg(long, default_value_t = DEFAULT_SETTLE_FRAMES)]
        max_settle: usize,
        /// Pace frames in real time instead of running them back to back
        #[arg(long)]
        realtime: bool,
        /// Frame interval for --realtime (overrides the config)
        #[arg(long)]
        frame_ms: Option<u64>,
        /// Only print these events (e.g. update,change,enter:1)
        #[arg(short = 'e', long, value_delimiter = ',')]
        events: Vec<EventKind>,
        /// Print events as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration file path
    Path,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration; `config init` and `config path` must work without one
    let config = match (&cli.command, &cli.config) {
        (
            Commands::Config {
                action: ConfigAction::Init { .. } | ConfigAction::Path,
            },
            _,
        ) => AppConfig::default(),
        (_, Some(path)) => AppConfig::load_from(path)?,
        (_, None) => AppConfig::load()?,
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Simulate {
            script,
            max_settle,
            realtime,
            frame_ms,
            events,
            json,
        } => {
            let options = SimulateOptions {
                script,
                max_settle,
                realtime,
                frame_ms,
                events,
                json,
            };
            commands::simulate::run(&config, options).await
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&config),
            ConfigAction::Init { force } => commands::config::init(cli.config.as_deref(), force),
            ConfigAction::Path => {
                commands::config::path(cli.config.as_deref());
                Ok(())
            }
        },
    }
}
