//! TUI runtime: owns the terminal, runs the event loop, executes effects.
//!
//! This is the only place side effects happen. The reducer stays pure and
//! returns effects; relay calls are spawned on tokio and report back through
//! the inbox channel, so the loop is the transcript's single writer.

use std::future::Future;
use std::io::Stdout;
use std::time::{Duration, Instant};

use agentdock_core::config::WidgetConfig;
use agentdock_core::relay::ChatRelay;
use anyhow::{Context, Result};
use crossterm::event;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{render, terminal, update};

/// Tick cadence while requests are outstanding (spinner animation).
pub const FRAME_DURATION: Duration = Duration::from_millis(80);

/// Poll duration when idle.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(250);

/// Full-screen TUI runtime.
pub struct TuiRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    relay: ChatRelay,
    inbox_tx: mpsc::UnboundedSender<UiEvent>,
    inbox_rx: mpsc::UnboundedReceiver<UiEvent>,
    /// Cancelled on exit; aborts outstanding relay tasks.
    shutdown: CancellationToken,
    last_tick: Instant,
}

impl TuiRuntime {
    /// Sets up the terminal and creates the widget.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be configured.
    pub fn new(settings: WidgetConfig, relay: ChatRelay) -> Result<Self> {
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Ok(Self {
            terminal,
            state: AppState::new(settings),
            relay,
            inbox_tx,
            inbox_rx,
            shutdown: CancellationToken::new(),
            last_tick: Instant::now(),
        })
    }

    /// Runs the event loop until the user quits.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// Returns an error on terminal I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let result = self.event_loop();
        self.shutdown.cancel();
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.state.should_quit {
            let events = self.collect_events()?;

            for event in events {
                dirty = true;
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if dirty {
                self.terminal.draw(|frame| {
                    render::render(&self.state, frame);
                })?;
                dirty = false;
            }
        }

        info!(in_flight = self.state.in_flight, "tui exiting");
        Ok(())
    }

    /// Collects events from the inbox and the terminal.
    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        let tick_interval = if self.state.is_busy() {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };
        let poll_duration = if events.is_empty() {
            tick_interval.saturating_sub(self.last_tick.elapsed())
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            if self.state.is_busy() {
                events.push(UiEvent::Tick);
            }
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }
            UiEffect::Dispatch(pending) => {
                debug!(placeholder = %pending.placeholder, "spawning relay call");
                let relay = self.relay.clone();
                self.spawn_effect(move || async move {
                    UiEvent::Settled(relay.dispatch(pending).await)
                });
            }
            UiEffect::Reset => {
                let relay = self.relay.clone();
                self.spawn_effect(move || async move { UiEvent::ResetDone(relay.reset().await) });
            }
        }
    }

    /// Spawns an async effect and sends its result event to the inbox.
    ///
    /// The task is dropped without reporting if the runtime shuts down first.
    fn spawn_effect<F, Fut>(&self, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = shutdown.cancelled() => {}
                event = f() => {
                    let _ = tx.send(event);
                }
            }
        });
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        self.shutdown.cancel();
        let _ = terminal::restore_terminal();
    }
}
