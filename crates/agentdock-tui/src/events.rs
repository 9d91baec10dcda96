//! UI event types consumed by the reducer.

use agentdock_core::relay::{RelayOutcome, Settled};

/// Everything that can change TUI state.
#[derive(Debug)]
pub enum UiEvent {
    /// Animation/frame tick.
    Tick,
    /// Raw crossterm input.
    Terminal(crossterm::event::Event),
    /// A dispatched send resolved.
    Settled(Settled),
    /// The backend answered (or failed) a reset request.
    ResetDone(RelayOutcome),
}
