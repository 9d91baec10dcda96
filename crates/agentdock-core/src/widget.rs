//! Chat widget component.
//!
//! `ChatWidget` owns the transcript and the open/closed flag and drives a
//! [`UiHost`]. It is created once by the host runtime; nothing about it is
//! global.
//!
//! A send runs in three phases so an event loop can keep many requests in
//! flight without borrowing the widget across an await:
//!
//! 1. [`ChatWidget::begin_send`] records the user entry and placeholder.
//! 2. [`ChatRelay::dispatch`] performs the request (anywhere, any task).
//! 3. [`ChatWidget::settle`] swaps the placeholder for the result.
//!
//! [`ChatWidget::send`] runs all three in sequence.

use tracing::{debug, info};

use crate::config::WidgetConfig;
use crate::host::{HostEvent, UiHost};
use crate::relay::{ChatRelay, PendingSend, RelayErrorKind, RelayOutcome, Settled};
use crate::rich_text::{Emphasis, RichText};
use crate::transcript::{EntryId, Transcript};

/// Work the caller must perform after [`ChatWidget::handle_event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetAction {
    /// Dispatch this send through a [`ChatRelay`], then call `settle`.
    Dispatch(PendingSend),
    /// Call [`ChatRelay::reset`], then show the outcome with `note_outcome`.
    Reset,
}

/// Result of settling one send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendReport {
    /// Agent entry appended for the reply or notice.
    pub entry: EntryId,
    /// Failure category, if the send failed.
    pub failure: Option<RelayErrorKind>,
}

pub struct ChatWidget<H: UiHost> {
    host: H,
    transcript: Transcript,
    open: bool,
    settings: WidgetConfig,
}

impl<H: UiHost> ChatWidget<H> {
    /// Creates the widget and appends the greeting.
    pub fn new(host: H, settings: WidgetConfig) -> Self {
        let mut widget = Self {
            host,
            transcript: Transcript::new(),
            open: false,
            settings,
        };

        let greeting = widget.greeting();
        widget.append_agent(greeting);

        if widget.settings.start_open {
            widget.toggle();
        }
        widget
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn settings(&self) -> &WidgetConfig {
        &self.settings
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Flips open/closed. Opening focuses the input.
    pub fn toggle(&mut self) {
        self.open = !self.open;
        self.host.visibility_changed(self.open);
        if self.open {
            self.host.focus_input();
        }
    }

    pub fn close(&mut self) {
        if self.open {
            self.open = false;
            self.host.visibility_changed(false);
        }
    }

    /// Applies a host event. Returns the async work it requires, if any.
    pub fn handle_event(&mut self, event: HostEvent) -> Option<WidgetAction> {
        match event {
            HostEvent::Submit => {
                let raw = self.host.read_input();
                self.begin_send(&raw).map(WidgetAction::Dispatch)
            }
            HostEvent::Toggle => {
                self.toggle();
                None
            }
            HostEvent::Close => {
                self.close();
                None
            }
            HostEvent::Reset => Some(WidgetAction::Reset),
        }
    }

    /// Records a send: user entry, then placeholder. Clears and disables
    /// the input.
    ///
    /// Returns `None` without touching anything if `raw` is blank.
    pub fn begin_send(&mut self, raw: &str) -> Option<PendingSend> {
        let message = raw.trim();
        if message.is_empty() {
            return None;
        }

        let user = self.transcript.push_user(message);
        self.host.entry_appended(user);
        self.host.clear_input();
        self.host.set_input_enabled(false);

        let placeholder = self.transcript.push_placeholder();
        let placeholder_id = placeholder.id;
        self.host.entry_appended(placeholder);

        debug!(placeholder = %placeholder_id, chars = message.chars().count(), "send started");
        Some(PendingSend {
            placeholder: placeholder_id,
            message: message.to_string(),
        })
    }

    /// Replaces the placeholder with the outcome and restores the input.
    pub fn settle(&mut self, settled: Settled) -> SendReport {
        let Settled {
            placeholder,
            outcome,
            elapsed,
        } = settled;

        if self.transcript.remove_placeholder(placeholder) {
            self.host.entry_removed(placeholder);
        } else {
            debug!(%placeholder, "placeholder already gone");
        }

        let failure = outcome.error_kind();
        let entry = self.append_agent(outcome.into_content());

        self.host.set_input_enabled(true);
        self.host.focus_input();

        info!(
            %entry,
            elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            failed = failure.is_some(),
            "send settled"
        );
        SendReport { entry, failure }
    }

    /// Full send: record, dispatch, settle.
    ///
    /// Returns `None` if the input was blank (no request issued).
    pub async fn send(&mut self, relay: &ChatRelay, raw: &str) -> Option<SendReport> {
        let pending = self.begin_send(raw)?;
        let settled = relay.dispatch(pending).await;
        Some(self.settle(settled))
    }

    /// Resets the backend conversation and shows its answer.
    pub async fn reset(&mut self, relay: &ChatRelay) -> EntryId {
        let outcome = relay.reset().await;
        self.note_outcome(outcome)
    }

    /// Appends a reset (or other out-of-band) outcome as an agent entry.
    pub fn note_outcome(&mut self, outcome: RelayOutcome) -> EntryId {
        self.append_agent(outcome.into_content())
    }

    fn append_agent(&mut self, content: RichText) -> EntryId {
        let entry = self.transcript.push_agent(content);
        self.host.entry_appended(entry);
        entry.id
    }

    fn greeting(&self) -> RichText {
        let mut greeting = RichText::from_plain(&self.settings.greeting);
        let hint = self.settings.hint.trim();
        if !hint.is_empty() {
            greeting.line_break().line_break();
            greeting.push_plain(hint, Emphasis::Muted);
        }
        greeting
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use futures_util::FutureExt;
    use futures_util::future::{BoxFuture, pending};

    use super::*;
    use crate::relay::{
        ChatReply, ChatRequest, ChatTransport, RelayError, RelayResult, ResetReply,
    };
    use crate::transcript::{Entry, EntryKind};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Appended(EntryId, &'static str),
        Removed(EntryId),
        Cleared,
        Enabled(bool),
        Focused,
        Visible(bool),
    }

    #[derive(Default)]
    struct RecordingHost {
        input: String,
        enabled: bool,
        calls: Vec<Call>,
    }

    impl UiHost for RecordingHost {
        fn read_input(&self) -> String {
            self.input.clone()
        }

        fn clear_input(&mut self) {
            self.input.clear();
            self.calls.push(Call::Cleared);
        }

        fn set_input_enabled(&mut self, enabled: bool) {
            self.enabled = enabled;
            self.calls.push(Call::Enabled(enabled));
        }

        fn focus_input(&mut self) {
            self.calls.push(Call::Focused);
        }

        fn entry_appended(&mut self, entry: &Entry) {
            let kind = match entry.kind {
                EntryKind::User(_) => "user",
                EntryKind::Agent(_) => "agent",
                EntryKind::Thinking => "thinking",
            };
            self.calls.push(Call::Appended(entry.id, kind));
        }

        fn entry_removed(&mut self, id: EntryId) {
            self.calls.push(Call::Removed(id));
        }

        fn visibility_changed(&mut self, open: bool) {
            self.calls.push(Call::Visible(open));
        }
    }

    enum Answer {
        Text(&'static str),
        Fail(RelayError),
        Hang,
    }

    struct FixedTransport(Answer);

    impl ChatTransport for FixedTransport {
        fn chat<'a>(&'a self, _: &'a ChatRequest) -> BoxFuture<'a, RelayResult<ChatReply>> {
            async move {
                match &self.0 {
                    Answer::Text(text) => Ok(ChatReply {
                        response: (*text).to_string(),
                    }),
                    Answer::Fail(err) => Err(err.clone()),
                    Answer::Hang => pending().await,
                }
            }
            .boxed()
        }

        fn reset(&self) -> BoxFuture<'_, RelayResult<ResetReply>> {
            async move {
                Ok(ResetReply {
                    message: "Conversation history has been reset".to_string(),
                })
            }
            .boxed()
        }
    }

    fn relay(answer: Answer) -> ChatRelay {
        ChatRelay::new(Arc::new(FixedTransport(answer)), Duration::from_secs(60))
    }

    fn widget() -> ChatWidget<RecordingHost> {
        let mut widget = ChatWidget::new(RecordingHost::default(), WidgetConfig::default());
        widget.host_mut().calls.clear();
        widget
    }

    #[test]
    fn test_new_appends_greeting_with_hint() {
        let widget = ChatWidget::new(RecordingHost::default(), WidgetConfig::default());

        assert_eq!(widget.transcript().len(), 1);
        let EntryKind::Agent(greeting) = &widget.transcript().entries()[0].kind else {
            panic!("expected agent greeting");
        };
        assert!(greeting.to_plain().starts_with("Hello!"));
        assert!(
            greeting
                .segments()
                .iter()
                .any(|s| matches!(s, crate::rich_text::Segment::Text { emphasis: Emphasis::Muted, .. }))
        );
        assert!(!widget.is_open());
    }

    #[test]
    fn test_start_open_focuses_input() {
        let settings = WidgetConfig {
            start_open: true,
            hint: String::new(),
            ..WidgetConfig::default()
        };
        let widget = ChatWidget::new(RecordingHost::default(), settings);

        assert!(widget.is_open());
        assert_eq!(
            widget.host().calls[1..],
            [Call::Visible(true), Call::Focused]
        );
    }

    #[test]
    fn test_toggle_and_close() {
        let mut widget = widget();

        widget.handle_event(HostEvent::Toggle);
        assert!(widget.is_open());
        widget.handle_event(HostEvent::Close);
        assert!(!widget.is_open());
        widget.handle_event(HostEvent::Close);

        assert_eq!(
            widget.host().calls,
            vec![Call::Visible(true), Call::Focused, Call::Visible(false)]
        );
    }

    #[test]
    fn test_blank_submit_is_noop() {
        let mut widget = widget();
        widget.host_mut().input = "   \t\n ".to_string();

        let action = widget.handle_event(HostEvent::Submit);

        assert_eq!(action, None);
        assert_eq!(widget.transcript().len(), 1);
        assert!(widget.host().calls.is_empty());
        assert_eq!(widget.host().input, "   \t\n ");
    }

    #[test]
    fn test_submit_records_user_then_placeholder() {
        let mut widget = widget();
        widget.host_mut().input = "  list all orders  ".to_string();

        let Some(WidgetAction::Dispatch(pending)) = widget.handle_event(HostEvent::Submit) else {
            panic!("expected dispatch");
        };

        assert_eq!(pending.message, "list all orders");
        let entries = widget.transcript().entries();
        assert_eq!(entries[1].kind, EntryKind::User("list all orders".to_string()));
        assert_eq!(entries[2].id, pending.placeholder);
        assert!(entries[2].is_placeholder());
        assert!(widget.host().input.is_empty());
        assert!(!widget.host().enabled);
    }

    #[tokio::test]
    async fn test_send_reply_has_line_break() {
        let mut widget = widget();

        let report = widget
            .send(&relay(Answer::Text("line1\nline2")), "hi")
            .await
            .unwrap();

        assert_eq!(report.failure, None);
        let entry = widget.transcript().get(report.entry).unwrap();
        let EntryKind::Agent(content) = &entry.kind else {
            panic!("expected agent entry");
        };
        assert_eq!(
            content.lines(),
            vec![vec![("line1", Emphasis::Plain)], vec![("line2", Emphasis::Plain)]]
        );
        assert!(content.segments().iter().all(|s| match s {
            crate::rich_text::Segment::Text { text, .. } => !text.contains('\n'),
            crate::rich_text::Segment::LineBreak => true,
        }));
    }

    #[tokio::test]
    async fn test_placeholder_lifecycle_and_input_restored() {
        let mut widget = widget();

        let report = widget
            .send(&relay(Answer::Text("ok")), "hello")
            .await
            .unwrap();

        let user = EntryId(1);
        let placeholder = EntryId(2);
        assert_eq!(
            widget.host().calls,
            vec![
                Call::Appended(user, "user"),
                Call::Cleared,
                Call::Enabled(false),
                Call::Appended(placeholder, "thinking"),
                Call::Removed(placeholder),
                Call::Appended(report.entry, "agent"),
                Call::Enabled(true),
                Call::Focused,
            ]
        );
        assert_eq!(widget.transcript().pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_restores_input() {
        let mut widget = widget();

        let report = widget.send(&relay(Answer::Hang), "slow").await.unwrap();

        assert_eq!(report.failure, Some(RelayErrorKind::Timeout));
        assert!(widget.host().enabled);
        assert_eq!(widget.host().calls.last(), Some(&Call::Focused));
    }

    #[tokio::test]
    async fn test_failures_restore_input() {
        for (error, kind) in [
            (RelayError::connectivity("refused"), RelayErrorKind::Connectivity),
            (RelayError::http_status(500, ""), RelayErrorKind::HttpStatus),
            (RelayError::generic("bad body"), RelayErrorKind::Generic),
        ] {
            let mut widget = widget();

            let report = widget.send(&relay(Answer::Fail(error)), "x").await.unwrap();

            assert_eq!(report.failure, Some(kind));
            assert!(widget.host().enabled);
            assert_eq!(widget.host().calls.last(), Some(&Call::Focused));
            assert_eq!(widget.transcript().pending_count(), 0);
        }
    }

    #[test]
    fn test_settle_twice_removes_placeholder_once() {
        let mut widget = widget();
        let pending = widget.begin_send("hi").unwrap();
        let settled = Settled {
            placeholder: pending.placeholder,
            outcome: RelayOutcome::Reply(RichText::from_plain("a")),
            elapsed: Duration::ZERO,
        };

        widget.settle(settled.clone());
        widget.settle(settled);

        let removals = widget
            .host()
            .calls
            .iter()
            .filter(|c| matches!(c, Call::Removed(_)))
            .count();
        assert_eq!(removals, 1);
    }

    #[test]
    fn test_overlapping_sends_settle_independently() {
        let mut widget = widget();
        let first = widget.begin_send("one").unwrap();
        let second = widget.begin_send("two").unwrap();
        assert_eq!(widget.transcript().pending_count(), 2);

        widget.settle(Settled {
            placeholder: second.placeholder,
            outcome: RelayOutcome::Reply(RichText::from_plain("2")),
            elapsed: Duration::ZERO,
        });
        assert_eq!(widget.transcript().pending_count(), 1);
        assert!(widget.host().enabled);

        widget.settle(Settled {
            placeholder: first.placeholder,
            outcome: RelayOutcome::Reply(RichText::from_plain("1")),
            elapsed: Duration::ZERO,
        });
        assert_eq!(widget.transcript().pending_count(), 0);
        assert!(widget.transcript().get(first.placeholder).is_none());
    }

    #[tokio::test]
    async fn test_reset_appends_backend_message() {
        let mut widget = widget();

        assert_eq!(
            widget.handle_event(HostEvent::Reset),
            Some(WidgetAction::Reset)
        );
        let entry = widget.reset(&relay(Answer::Text("unused"))).await;

        let EntryKind::Agent(content) = &widget.transcript().get(entry).unwrap().kind else {
            panic!("expected agent entry");
        };
        assert_eq!(content.to_plain(), "Conversation history has been reset");
    }
}
