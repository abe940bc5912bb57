//! Chain notifications for hosts (UI, transport).

use im::Vector;
use serde::{Deserialize, Serialize};

use super::entry::{StackEntry, StackEntryId};
use crate::core::PlayerId;

/// Callbacks fired by [`ResolutionChain`](super::ResolutionChain).
///
/// All methods default to no-ops.
pub trait ChainObserver {
    /// The stack changed after an addition.
    fn on_stack_update(&mut self, _stack: &Vector<StackEntry>) {}

    /// `player` holds priority and may respond to `top`.
    fn on_request_response(&mut self, _player: PlayerId, _top: &StackEntry) {}

    /// `entry` left the stack and its effect was applied.
    fn on_effect_resolution(&mut self, _entry: &StackEntry) {}

    /// The last entry resolved; the stack is empty.
    fn on_chain_complete(&mut self) {}
}

/// Observer that ignores every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl ChainObserver for NoopObserver {}

/// A notification, as recorded by [`RecordingObserver`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainEvent {
    StackUpdated { size: usize },
    ResponseRequested { player: PlayerId, top: StackEntryId },
    Resolved { entry: StackEntryId },
    Complete,
}

/// Observer that keeps every notification in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingObserver {
    pub events: Vec<ChainEvent>,
}

impl RecordingObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// IDs of resolved entries in resolution order.
    #[must_use]
    pub fn resolved(&self) -> Vec<StackEntryId> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ChainEvent::Resolved { entry } => Some(*entry),
                _ => None,
            })
            .collect()
    }
}

impl ChainObserver for RecordingObserver {
    fn on_stack_update(&mut self, stack: &Vector<StackEntry>) {
        self.events.push(ChainEvent::StackUpdated { size: stack.len() });
    }

    fn on_request_response(&mut self, player: PlayerId, top: &StackEntry) {
        self.events.push(ChainEvent::ResponseRequested { player, top: top.id });
    }

    fn on_effect_resolution(&mut self, entry: &StackEntry) {
        self.events.push(ChainEvent::Resolved { entry: entry.id });
    }

    fn on_chain_complete(&mut self) {
        self.events.push(ChainEvent::Complete);
    }
}
