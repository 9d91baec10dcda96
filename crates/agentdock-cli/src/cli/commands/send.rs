//! One-shot send through the console host.

use std::io::{Write, stdout};

use agentdock_core::config::Config;
use agentdock_core::logging::{self, LogTarget};
use agentdock_core::widget::ChatWidget;
use anyhow::{Context, Result};

use super::build_relay;
use crate::cli::RelayArgs;
use crate::modes::console::ConsoleHost;

/// Sends `message` once and prints the transcript to stdout.
///
/// Relay failures are printed as notices and still exit successfully; a
/// transcript that could not be written is an error.
pub async fn run(config: &Config, args: &RelayArgs, message: &str) -> Result<()> {
    let _guard = logging::init(LogTarget::Stderr, &config.log)?;
    let relay = build_relay(config, args)?;

    let mut widget = ChatWidget::new(ConsoleHost::muted(stdout()), config.widget.clone());
    widget.host_mut().unmute();

    if widget.send(&relay, message).await.is_none() {
        anyhow::bail!("Message is empty");
    }
    flush_errors(widget.host_mut())
}

pub(super) fn flush_errors<W: Write>(host: &mut ConsoleHost<W>) -> Result<()> {
    match host.take_error() {
        Some(err) => Err(err).context("write transcript"),
        None => Ok(()),
    }
}
