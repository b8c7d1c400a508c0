use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{
    fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use swipefeed_core::AppConfig;
use swipefeed_tui::FeedKind;

mod commands;
mod demo;

#[derive(Parser)]
#[command(name = "swipefeed")]
#[command(author, version, about = "A terminal feed browser with pull-to-refresh and infinite scroll")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI
    Run {
        /// Feed shown first
        #[arg(short, long, value_enum, default_value_t = FeedArg::Social)]
        feed: FeedArg,
    },
    /// Replay a JSON-lines gesture script headlessly and print snapshots
    Replay {
        /// Path to the script
        path: std::path::PathBuf,
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
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FeedArg {
    Social,
    Shop,
}

impl From<FeedArg> for FeedKind {
    fn from(arg: FeedArg) -> Self {
        match arg {
            FeedArg::Social => FeedKind::Social,
            FeedArg::Shop => FeedKind::Shop,
        }
    }
}

/// Log to `<data_dir>/swipefeed.log` while the TUI owns the screen,
/// otherwise to stderr so stdout stays machine-readable
fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let writer = if to_file {
        let path = config.log_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        BoxMakeWriter::new(Mutex::new(file))
    } else {
        BoxMakeWriter::new(std::io::stderr)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(!to_file)
                .with_writer(writer),
        )
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Run {
        feed: FeedArg::Social,
    });

    // Writing defaults must work even when the current file does not parse
    if let Commands::Config {
        action: ConfigAction::Init { force },
    } = command
    {
        return commands::config::init(force);
    }

    // Load configuration
    let config = Arc::new(AppConfig::load()?);
    init_logging(&config, matches!(command, Commands::Run { .. }))?;

    // Handle commands
    match command {
        Commands::Run { feed } => commands::run::run(config, feed.into()).await,
        Commands::Replay { path } => commands::replay::run(&config, &path).await,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&config),
            ConfigAction::Init { force } => commands::config::init(force),
        },
    }
}
