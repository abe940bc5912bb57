//! The resolution chain.
//!
//! Played cards and abilities go on a stack and resolve in LIFO order,
//! with both players given the chance to respond before each resolution.
//!
//! ## Key Types
//!
//! - `ResolutionChain`: the state machine (add, respond, pass, resolve)
//! - `ChainState`: stack and priority, stored in `GameState`
//! - `StackEntry` / `Effect`: what waits on the stack
//! - `ChainObserver`: notifications for hosts
//!
//! ## Resolution Trigger
//!
//! When passes resolve the top entry is a match setting
//! (`MatchConfig::resolution_trigger`):
//!
//! - `BothPass`: both players pass in succession with no addition between
//! - `ResponderPass`: the player who did not add the top entry passes

mod chain;
mod entry;
mod observer;

pub use chain::{ChainPhase, ChainState, ResolutionChain, ResolutionStatus};
pub use entry::{Effect, StackEntry, StackEntryId};
pub use observer::{ChainEvent, ChainObserver, NoopObserver, RecordingObserver};
