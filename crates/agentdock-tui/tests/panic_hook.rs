//! Panic hook behavior. Kept in its own test binary since the hook is global.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use agentdock_core::relay::{
    ChatRelay, ChatReply, ChatRequest, ChatTransport, PendingSend, RelayErrorKind, RelayResult,
    ResetReply,
};
use agentdock_core::transcript::EntryId;
use agentdock_tui::terminal::install_panic_hook_with;
use futures_util::FutureExt;
use futures_util::future::BoxFuture;

struct ExplodingTransport;

impl ChatTransport for ExplodingTransport {
    fn chat<'a>(&'a self, _request: &'a ChatRequest) -> BoxFuture<'a, RelayResult<ChatReply>> {
        async { panic!("transport exploded") }.boxed()
    }

    fn reset(&self) -> BoxFuture<'_, RelayResult<ResetReply>> {
        async { panic!("transport exploded") }.boxed()
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_only_ui_thread_panics_restore_terminal() {
    let restores = Arc::new(AtomicUsize::new(0));
    let counter: Arc<AtomicUsize> = Arc::clone(&restores);
    install_panic_hook_with(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    // Relay calls run on worker tasks, as in the interactive runtime.
    let relay = ChatRelay::new(Arc::new(ExplodingTransport), Duration::from_secs(5));
    let settled = tokio::spawn(async move {
        relay
            .dispatch(PendingSend {
                placeholder: EntryId(3),
                message: "hi".to_string(),
            })
            .await
    })
    .await
    .unwrap();

    assert_eq!(settled.outcome.error_kind(), Some(RelayErrorKind::Generic));
    assert_eq!(restores.load(Ordering::SeqCst), 0);

    let caught = std::panic::catch_unwind(|| panic!("ui thread panic"));
    assert!(caught.is_err());
    assert_eq!(restores.load(Ordering::SeqCst), 1);
}
