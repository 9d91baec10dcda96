//! TUI state.
//!
//! `TerminalView` is the terminal's implementation of [`UiHost`]: it mirrors
//! the transcript for rendering and holds the input line. `AppState` owns the
//! widget (which owns the view) plus loop-level bookkeeping.

use agentdock_core::config::WidgetConfig;
use agentdock_core::host::UiHost;
use agentdock_core::transcript::{Entry, EntryId};
use agentdock_core::widget::ChatWidget;

/// Terminal-side mirror of the widget surface.
#[derive(Debug, Default)]
pub struct TerminalView {
    /// Input line contents.
    pub input: String,
    /// Whether the input accepts typing and Enter.
    pub input_enabled: bool,
    pub input_focused: bool,
    pub open: bool,
    /// Entries as announced by the widget, in display order.
    pub entries: Vec<Entry>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self {
            input_enabled: true,
            ..Self::default()
        }
    }

    /// Whether keystrokes should edit the input line.
    pub fn accepts_typing(&self) -> bool {
        self.open && self.input_enabled && self.input_focused
    }

    pub fn insert_str(&mut self, text: &str) {
        // Single-line input: pasted newlines become spaces.
        self.input
            .extend(text.chars().map(|c| if c == '\n' || c == '\r' { ' ' } else { c }));
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }
}

impl UiHost for TerminalView {
    fn read_input(&self) -> String {
        self.input.clone()
    }

    fn clear_input(&mut self) {
        self.input.clear();
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
    }

    fn focus_input(&mut self) {
        self.input_focused = true;
    }

    fn entry_appended(&mut self, entry: &Entry) {
        self.entries.push(entry.clone());
    }

    fn entry_removed(&mut self, id: EntryId) {
        self.entries.retain(|entry| entry.id != id);
    }

    fn visibility_changed(&mut self, open: bool) {
        self.open = open;
        if !open {
            self.input_focused = false;
        }
    }
}

/// Whole-application state for the terminal UI.
pub struct AppState {
    pub widget: ChatWidget<TerminalView>,
    /// Requests dispatched but not yet settled.
    pub in_flight: usize,
    /// Reset request outstanding.
    pub resetting: bool,
    pub spinner_frame: usize,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(settings: WidgetConfig) -> Self {
        Self {
            widget: ChatWidget::new(TerminalView::new(), settings),
            in_flight: 0,
            resetting: false,
            spinner_frame: 0,
            should_quit: false,
        }
    }

    pub fn view(&self) -> &TerminalView {
        self.widget.host()
    }

    pub fn view_mut(&mut self) -> &mut TerminalView {
        self.widget.host_mut()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight > 0 || self.resetting
    }
}
