//! Terminal lifecycle management.
//!
//! Terminal state is restored on normal exit (via the runtime's Drop) and on
//! a UI-thread panic (via the hook installed here).

use std::io::{self, Stdout};
use std::panic;
use std::thread;

use anyhow::{Context, Result};
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::error;

/// Enables raw mode, enters the alternate screen, and turns on bracketed
/// paste.
///
/// Call `install_panic_hook()` first.
///
/// # Errors
/// Returns an error if the terminal cannot be configured.
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)
        .context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).context("Failed to create terminal")
}

/// Restores terminal state. Idempotent.
///
/// # Errors
/// Returns an error if the terminal cannot be restored.
pub fn restore_terminal() -> Result<()> {
    // Must happen before leaving raw mode.
    let _ = execute!(io::stdout(), DisableBracketedPaste);

    execute!(io::stdout(), LeaveAlternateScreen).context("Failed to leave alternate screen")?;
    disable_raw_mode().context("Failed to disable raw mode")?;
    Ok(())
}

/// Installs a panic hook that restores the terminal before printing the panic.
///
/// Only panics on the calling (UI) thread restore the terminal. Panics on
/// worker threads are logged instead; the relay catches those and the UI
/// keeps running.
pub fn install_panic_hook() {
    install_panic_hook_with(|| {
        let _ = restore_terminal();
    });
}

/// Like [`install_panic_hook`], with a custom restore step.
pub fn install_panic_hook_with<F>(restore: F)
where
    F: Fn() + Send + Sync + 'static,
{
    let ui_thread = thread::current().id();
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        if thread::current().id() == ui_thread {
            restore();
            original_hook(panic_info);
        } else {
            error!(panic = %panic_info, "panic off the UI thread");
        }
    }));
}
