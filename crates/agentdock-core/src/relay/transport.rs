//! Wire types and the transport seam used by the relay.

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

use super::error::RelayResult;

/// Standard User-Agent header for agentdock requests.
pub const USER_AGENT: &str = concat!("agentdock/", env!("CARGO_PKG_VERSION"));

/// Outbound chat body: `{"message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Successful chat body: `{"response": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

/// Successful reset body: `{"message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetReply {
    pub message: String,
}

/// Performs the actual request/response exchange.
///
/// Implementations classify their own failures into [`RelayErrorKind`]
/// (connectivity vs. status vs. generic). The client-side timeout is applied
/// by the relay on top of the returned future, so implementations must not
/// impose a shorter one of their own.
///
/// [`RelayErrorKind`]: super::RelayErrorKind
pub trait ChatTransport: Send + Sync {
    fn chat<'a>(&'a self, request: &'a ChatRequest) -> BoxFuture<'a, RelayResult<ChatReply>>;

    fn reset(&self) -> BoxFuture<'_, RelayResult<ResetReply>>;
}
