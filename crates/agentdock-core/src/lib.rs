//! Core agentdock library (relay, transcript, widget, config).

pub mod config;
pub mod host;
pub mod logging;
pub mod relay;
pub mod rich_text;
pub mod transcript;
pub mod widget;
