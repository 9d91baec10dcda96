//! Chat relay: one user message in, one request out, one transcript entry back.
//!
//! The relay never fails outward. Every path ends in a [`RelayOutcome`]:
//! either the formatted reply or a canned notice for the failure category.
//!
//! Structure:
//! - `error.rs`: failure taxonomy (`RelayError`, `RelayErrorKind`)
//! - `notice.rs`: canned rich-text notices per failure kind
//! - `transport.rs`: wire types and the `ChatTransport` seam
//! - `http.rs`: reqwest implementation of `ChatTransport`

mod error;
mod http;
mod notice;
mod transport;

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

pub use error::{RelayError, RelayErrorKind, RelayResult};
use futures_util::FutureExt;
pub use http::HttpTransport;
pub use notice::failure_notice;
use tokio::time::Instant;
use tracing::{debug, info, warn};
pub use transport::{ChatReply, ChatRequest, ChatTransport, ResetReply, USER_AGENT};

use crate::rich_text::RichText;
use crate::transcript::EntryId;

/// Default client-side timeout for one relay call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// A send that has been recorded in the transcript and is ready to dispatch.
///
/// Produced by `ChatWidget::begin_send`, consumed by [`ChatRelay::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    /// Placeholder shown while this request is outstanding.
    pub placeholder: EntryId,
    /// Trimmed, non-empty message text.
    pub message: String,
}

/// Final result of one relay call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Reply text with newlines turned into line breaks.
    Reply(RichText),
    /// Failure plus the notice to show for it.
    Failed { error: RelayError, notice: RichText },
}

impl RelayOutcome {
    /// Content to append as the agent entry.
    pub fn content(&self) -> &RichText {
        match self {
            RelayOutcome::Reply(content) => content,
            RelayOutcome::Failed { notice, .. } => notice,
        }
    }

    pub fn into_content(self) -> RichText {
        match self {
            RelayOutcome::Reply(content) => content,
            RelayOutcome::Failed { notice, .. } => notice,
        }
    }

    pub fn error_kind(&self) -> Option<RelayErrorKind> {
        match self {
            RelayOutcome::Reply(_) => None,
            RelayOutcome::Failed { error, .. } => Some(error.kind),
        }
    }
}

/// A dispatched send that has resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settled {
    pub placeholder: EntryId,
    pub outcome: RelayOutcome,
    pub elapsed: Duration,
}

/// Sends messages to the agent endpoint under a client-side timeout.
///
/// Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct ChatRelay {
    transport: Arc<dyn ChatTransport>,
    timeout: Duration,
}

impl ChatRelay {
    pub fn new(transport: Arc<dyn ChatTransport>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Issues exactly one chat request for `pending` and classifies the result.
    ///
    /// The request future is dropped if the timer fires first. Panics inside
    /// the transport are caught and reported as `Generic`.
    pub async fn dispatch(&self, pending: PendingSend) -> Settled {
        let started = Instant::now();
        debug!(placeholder = %pending.placeholder, "dispatching chat request");

        let request = ChatRequest {
            message: pending.message,
        };
        let result = self
            .guarded(self.transport.chat(&request))
            .await
            .map(|reply| RichText::from_plain(&reply.response));

        let elapsed = started.elapsed();
        let outcome = self.classify(result);
        match outcome.error_kind() {
            None => info!(
                placeholder = %pending.placeholder,
                elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                "chat request settled"
            ),
            Some(kind) => warn!(
                placeholder = %pending.placeholder,
                elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                %kind,
                "chat request failed"
            ),
        }

        Settled {
            placeholder: pending.placeholder,
            outcome,
            elapsed,
        }
    }

    /// Asks the backend to forget its conversation history.
    pub async fn reset(&self) -> RelayOutcome {
        let result = self
            .guarded(self.transport.reset())
            .await
            .map(|reply| RichText::from_plain(&reply.message));
        let outcome = self.classify(result);
        if let Some(kind) = outcome.error_kind() {
            warn!(%kind, "conversation reset failed");
        } else {
            info!("conversation reset");
        }
        outcome
    }

    async fn guarded<T, F>(&self, fut: F) -> RelayResult<T>
    where
        F: Future<Output = RelayResult<T>>,
    {
        match tokio::time::timeout(self.timeout, AssertUnwindSafe(fut).catch_unwind()).await {
            Ok(Ok(result)) => result,
            Ok(Err(panic)) => Err(RelayError::generic(panic_message(panic.as_ref()))),
            Err(_elapsed) => Err(RelayError::timeout(format!(
                "No response within {} ms",
                self.timeout.as_millis()
            ))),
        }
    }

    fn classify(&self, result: RelayResult<RichText>) -> RelayOutcome {
        match result {
            Ok(content) => RelayOutcome::Reply(content),
            Err(error) => {
                let notice = failure_notice(&error, self.timeout);
                RelayOutcome::Failed { error, notice }
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "relay task panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use futures_util::future::{BoxFuture, pending};

    use super::*;

    enum Script {
        Reply(&'static str),
        Fail(RelayError),
        Hang,
        Panic,
    }

    struct ScriptedTransport {
        script: Script,
        seen: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        fn relay(script: Script) -> (ChatRelay, Arc<ScriptedTransport>) {
            let transport = Arc::new(ScriptedTransport {
                script,
                seen: Mutex::new(Vec::new()),
            });
            let shared: Arc<ScriptedTransport> = Arc::clone(&transport);
            let relay = ChatRelay::new(shared, DEFAULT_TIMEOUT);
            (relay, transport)
        }
    }

    impl ChatTransport for ScriptedTransport {
        fn chat<'a>(
            &'a self,
            request: &'a ChatRequest,
        ) -> BoxFuture<'a, RelayResult<ChatReply>> {
            self.seen.lock().unwrap().push(request.message.clone());
            async move {
                match &self.script {
                    Script::Reply(text) => Ok(ChatReply {
                        response: (*text).to_string(),
                    }),
                    Script::Fail(err) => Err(err.clone()),
                    Script::Hang => pending().await,
                    Script::Panic => panic!("transport exploded"),
                }
            }
            .boxed()
        }

        fn reset(&self) -> BoxFuture<'_, RelayResult<ResetReply>> {
            async move {
                match &self.script {
                    Script::Reply(text) => Ok(ResetReply {
                        message: (*text).to_string(),
                    }),
                    Script::Fail(err) => Err(err.clone()),
                    Script::Hang => pending().await,
                    Script::Panic => panic!("transport exploded"),
                }
            }
            .boxed()
        }
    }

    fn pending_send(message: &str) -> PendingSend {
        PendingSend {
            placeholder: EntryId(1),
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn test_reply_newlines_become_line_breaks() {
        let (relay, transport) = ScriptedTransport::relay(Script::Reply("line1\nline2"));

        let settled = relay.dispatch(pending_send("hello")).await;

        assert_eq!(settled.placeholder, EntryId(1));
        assert_eq!(settled.outcome.error_kind(), None);
        assert_eq!(
            settled.outcome.content(),
            &RichText::from_plain("line1\nline2")
        );
        assert_eq!(*transport.seen.lock().unwrap(), vec!["hello".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_request_times_out() {
        let (relay, _) = ScriptedTransport::relay(Script::Hang);

        let settled = relay.dispatch(pending_send("slow")).await;

        assert_eq!(settled.outcome.error_kind(), Some(RelayErrorKind::Timeout));
        assert!(settled.elapsed >= DEFAULT_TIMEOUT);
    }

    #[tokio::test]
    async fn test_connectivity_failure_is_classified() {
        let (relay, _) =
            ScriptedTransport::relay(Script::Fail(RelayError::connectivity("refused")));

        let settled = relay.dispatch(pending_send("hi")).await;

        assert_eq!(
            settled.outcome.error_kind(),
            Some(RelayErrorKind::Connectivity)
        );
    }

    #[tokio::test]
    async fn test_transport_panic_becomes_generic() {
        let (relay, _) = ScriptedTransport::relay(Script::Panic);

        let settled = relay.dispatch(pending_send("hi")).await;

        assert_eq!(settled.outcome.error_kind(), Some(RelayErrorKind::Generic));
        assert!(
            settled
                .outcome
                .content()
                .to_plain()
                .contains("transport exploded")
        );
    }

    #[tokio::test]
    async fn test_reset_returns_backend_message() {
        let (relay, _) = ScriptedTransport::relay(Script::Reply("history cleared"));

        let outcome = relay.reset().await;

        assert_eq!(outcome, RelayOutcome::Reply(RichText::from_plain("history cleared")));
    }
}
