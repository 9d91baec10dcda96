//! Reset command handler.

use std::io::stdout;

use agentdock_core::config::Config;
use agentdock_core::logging::{self, LogTarget};
use agentdock_core::widget::ChatWidget;
use anyhow::Result;

use super::{build_relay, send};
use crate::cli::RelayArgs;
use crate::modes::console::ConsoleHost;

pub async fn run(config: &Config, args: &RelayArgs) -> Result<()> {
    let _guard = logging::init(LogTarget::Stderr, &config.log)?;
    let relay = build_relay(config, args)?;

    let mut widget = ChatWidget::new(ConsoleHost::muted(stdout()), config.widget.clone());
    widget.host_mut().unmute();
    widget.reset(&relay).await;
    send::flush_errors(widget.host_mut())
}
