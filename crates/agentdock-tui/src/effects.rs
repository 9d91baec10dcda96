//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! The reducer never performs I/O or spawns tasks itself.

use agentdock_core::relay::PendingSend;

#[derive(Debug, PartialEq, Eq)]
pub enum UiEffect {
    /// Quit the application.
    Quit,
    /// Send a recorded message to the agent.
    Dispatch(PendingSend),
    /// Ask the backend to reset its conversation.
    Reset,
}
