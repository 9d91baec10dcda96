//! Chat command handler (the default command).

use std::io::{IsTerminal, Read};

use agentdock_core::config::{Config, paths};
use agentdock_core::logging::{self, LogTarget};
use anyhow::{Context, Result};

use super::{build_relay, send};
use crate::cli::RelayArgs;

pub async fn run(config: &Config, args: &RelayArgs) -> Result<()> {
    // If stdin is piped, send it once instead
    if !std::io::stdin().is_terminal() {
        let mut message = String::new();
        std::io::stdin().lock().read_to_string(&mut message)?;
        let message = message.trim();
        if message.is_empty() {
            anyhow::bail!("No input provided via pipe");
        }
        return send::run(config, args, message).await;
    }

    let _guard = logging::init(LogTarget::File(paths::logs_dir()), &config.log)?;
    let relay = build_relay(config, args)?;

    agentdock_tui::run_interactive_chat(config.widget.clone(), relay)
        .await
        .context("interactive chat failed")
}
