//! CLI entry and dispatch.

use agentdock_core::config;
use anyhow::{Context, Result};
use clap::Parser;

mod commands;

#[derive(Parser)]
#[command(name = "agentdock")]
#[command(version)]
#[command(about = "Floating chat widget for a local AI agent backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    relay_args: RelayArgs,
}

/// Endpoint overrides shared by every command that talks to the backend.
#[derive(clap::Args, Debug, Clone, Default)]
pub(crate) struct RelayArgs {
    /// Agent backend base URL (overrides AGENTDOCK_BASE_URL and config)
    #[arg(long, value_name = "URL", global = true)]
    pub(crate) base_url: Option<String>,

    /// Client-side request timeout in seconds
    #[arg(long, value_name = "SECS", global = true)]
    pub(crate) timeout_secs: Option<u64>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Send one message and print the reply
    Send {
        /// The message to send
        #[arg(value_name = "MESSAGE")]
        message: String,
    },
    /// Reset the backend conversation history
    Reset,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Persist the agent backend base URL
    SetUrl {
        /// Base URL, e.g. http://127.0.0.1:8000
        #[arg(value_name = "URL")]
        url: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli {
        command,
        relay_args,
    } = cli;

    // Config commands must work even when the existing file is broken.
    if let Some(Commands::Config { command }) = command {
        return match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::SetUrl { url } => commands::config::set_url(&url),
        };
    }

    let config = config::Config::load().context("load config")?;

    // default to the interactive widget
    let Some(command) = command else {
        return commands::chat::run(&config, &relay_args).await;
    };

    match command {
        Commands::Send { message } => commands::send::run(&config, &relay_args, &message).await,
        Commands::Reset => commands::reset::run(&config, &relay_args).await,
        Commands::Config { .. } => Ok(()),
    }
}
