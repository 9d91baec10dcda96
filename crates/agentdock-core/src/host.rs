//! UI host seam.
//!
//! A host is whatever actually draws the widget (a terminal panel, a plain
//! console). The widget drives it through [`UiHost`]; the host reports user
//! actions back as [`HostEvent`]s.

use crate::transcript::{Entry, EntryId};

/// User actions a host delivers to the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// Send button pressed or Enter in the input.
    Submit,
    /// Launcher clicked.
    Toggle,
    /// Close button.
    Close,
    /// Ask the backend to forget the conversation.
    Reset,
}

/// Surface the widget renders into.
pub trait UiHost {
    /// Current raw contents of the input control.
    fn read_input(&self) -> String;

    fn clear_input(&mut self);

    fn set_input_enabled(&mut self, enabled: bool);

    fn focus_input(&mut self);

    /// Called after `entry` was appended to the transcript.
    fn entry_appended(&mut self, entry: &Entry);

    /// Called after the placeholder `id` was removed from the transcript.
    fn entry_removed(&mut self, id: EntryId);

    fn visibility_changed(&mut self, open: bool);
}
