//! Non-TUI hosts.

pub mod console;
