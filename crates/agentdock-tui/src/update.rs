//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use agentdock_core::host::HostEvent;
use agentdock_core::widget::WidgetAction;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;

/// The main reducer function.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.spinner_frame = app.spinner_frame.wrapping_add(1);
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::Settled(settled) => {
            app.in_flight = app.in_flight.saturating_sub(1);
            let report = app.widget.settle(settled);
            debug!(entry = %report.entry, failure = ?report.failure, "settled in tui");
            vec![]
        }
        UiEvent::ResetDone(outcome) => {
            app.resetting = false;
            app.widget.note_outcome(outcome);
            vec![]
        }
    }
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
        Event::Paste(text) => {
            if app.view().accepts_typing() {
                app.view_mut().insert_str(&text);
            }
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c') if ctrl => return vec![UiEffect::Quit],
        KeyCode::Char('o') if ctrl => return host_event(app, HostEvent::Toggle),
        _ => {}
    }

    if !app.widget.is_open() {
        return vec![];
    }

    match key.code {
        KeyCode::Esc => host_event(app, HostEvent::Close),
        KeyCode::Char('r') if ctrl => {
            if app.resetting {
                vec![]
            } else {
                host_event(app, HostEvent::Reset)
            }
        }
        KeyCode::Enter => {
            // Overlap guard: a disabled input ignores Enter.
            if app.view().accepts_typing() {
                host_event(app, HostEvent::Submit)
            } else {
                vec![]
            }
        }
        KeyCode::Backspace => {
            if app.view().accepts_typing() {
                app.view_mut().backspace();
            }
            vec![]
        }
        KeyCode::Char(c) if !ctrl => {
            if app.view().accepts_typing() {
                app.view_mut().input.push(c);
            }
            vec![]
        }
        _ => vec![],
    }
}

fn host_event(app: &mut AppState, event: HostEvent) -> Vec<UiEffect> {
    match app.widget.handle_event(event) {
        Some(WidgetAction::Dispatch(pending)) => {
            app.in_flight += 1;
            vec![UiEffect::Dispatch(pending)]
        }
        Some(WidgetAction::Reset) => {
            app.resetting = true;
            vec![UiEffect::Reset]
        }
        None => vec![],
    }
}
