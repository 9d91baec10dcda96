//! Line-oriented host that prints the transcript to a writer.
//!
//! Used for one-shot sends and piped input. There is no input control to
//! speak of: the message is handed over up front and the enable/focus calls
//! only get logged.
//!
//! `UiHost` callbacks cannot fail, so the first write error is kept and
//! surfaced through [`ConsoleHost::take_error`].

use std::io::{self, Write};

use agentdock_core::host::UiHost;
use agentdock_core::rich_text::{Emphasis, RichText, Segment};
use agentdock_core::transcript::{Entry, EntryId, EntryKind};
use tracing::trace;

pub struct ConsoleHost<W: Write> {
    out: W,
    write_error: Option<io::Error>,
    /// While muted, appended entries are not printed (e.g. the greeting).
    muted: bool,
}

impl<W: Write> ConsoleHost<W> {
    /// Creates a host that stays silent until [`ConsoleHost::unmute`].
    pub fn muted(out: W) -> Self {
        Self {
            out,
            write_error: None,
            muted: true,
        }
    }

    pub fn unmute(&mut self) {
        self.muted = false;
    }

    /// Returns the first write error since the last call, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.write_error.take()
    }

    fn print(&mut self, text: &str) {
        if self.write_error.is_some() {
            return;
        }
        let result = writeln!(self.out, "{text}\n").and_then(|()| self.out.flush());
        if let Err(err) = result {
            self.write_error = Some(err);
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> UiHost for ConsoleHost<W> {
    fn read_input(&self) -> String {
        String::new()
    }

    fn clear_input(&mut self) {}

    fn set_input_enabled(&mut self, enabled: bool) {
        trace!(enabled, "console input toggled");
    }

    fn focus_input(&mut self) {}

    fn entry_appended(&mut self, entry: &Entry) {
        if self.muted {
            return;
        }
        let text = match &entry.kind {
            EntryKind::User(text) => format!("> {text}"),
            EntryKind::Agent(content) => render_plain(content),
            // Placeholders are only meaningful on a live surface.
            EntryKind::Thinking => return,
        };
        self.print(&text);
    }

    fn entry_removed(&mut self, id: EntryId) {
        trace!(%id, "placeholder removed");
    }

    fn visibility_changed(&mut self, _open: bool) {}
}

/// Flattens rich text for a plain terminal. Code runs keep backticks.
pub fn render_plain(content: &RichText) -> String {
    let mut out = String::new();
    for segment in content.segments() {
        match segment {
            Segment::Text {
                text,
                emphasis: Emphasis::Code,
            } => {
                out.push('`');
                out.push_str(text);
                out.push('`');
            }
            Segment::Text { text, .. } => out.push_str(text),
            Segment::LineBreak => out.push('\n'),
        }
    }
    out
}
