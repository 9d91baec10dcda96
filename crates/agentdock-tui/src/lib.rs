//! Terminal host for the agentdock chat widget.

pub mod effects;
pub mod events;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, Write, stderr};

use agentdock_core::config::WidgetConfig;
use agentdock_core::relay::ChatRelay;
use anyhow::Result;
pub use runtime::TuiRuntime;

/// Runs the interactive widget until the user quits.
///
/// # Errors
/// Returns an error if stderr is not a terminal or terminal I/O fails.
pub async fn run_interactive_chat(settings: WidgetConfig, relay: ChatRelay) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!(
            "The chat widget requires a terminal.\n\
             Use `agentdock send '...'` or pipe a message on stdin instead."
        );
    }

    let mut runtime = TuiRuntime::new(settings, relay)?;
    runtime.run()?;
    drop(runtime);

    writeln!(stderr(), "Goodbye!")?;
    Ok(())
}
