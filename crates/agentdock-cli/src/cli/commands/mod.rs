//! CLI command handlers.

pub mod chat;
pub mod config;
pub mod reset;
pub mod send;

use std::sync::Arc;
use std::time::Duration;

use agentdock_core::config::Config;
use agentdock_core::relay::{ChatRelay, HttpTransport};
use anyhow::{Context, Result};
use tracing::debug;

use super::RelayArgs;

/// Builds the relay from config plus command-line overrides.
pub(crate) fn build_relay(config: &Config, args: &RelayArgs) -> Result<ChatRelay> {
    let base_url = config.resolve_base_url(args.base_url.as_deref())?;
    let timeout = match args.timeout_secs {
        Some(secs) if secs > 0 => Duration::from_secs(secs),
        _ => config.endpoint.timeout(),
    };

    let transport = HttpTransport::new(&base_url, &config.endpoint)
        .with_context(|| format!("create transport for {base_url}"))?;
    debug!(url = transport.chat_url(), timeout_secs = timeout.as_secs(), "relay ready");

    Ok(ChatRelay::new(Arc::new(transport), timeout))
}
