//! Turn structure and match orchestration.

mod phase;
mod session;

pub use phase::TurnPhase;
pub use session::GameSession;
