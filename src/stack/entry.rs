//! Stack entries and the effects they carry.

use serde::{Deserialize, Serialize};

use crate::cards::CardInstance;
use crate::core::PlayerId;
use crate::keywords::PlayMethod;

/// Unique identifier for a stack entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StackEntryId(pub u32);

impl StackEntryId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for StackEntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StackEntry({})", self.0)
    }
}

/// What resolves when an entry leaves the stack.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// A card played from hand or a Burst from the revealed Life Cards.
    PlayCard {
        instance: CardInstance,
        method: PlayMethod,
    },

    /// Any other ability; resolving it only records the description.
    Ability { description: String },
}

impl Effect {
    #[must_use]
    pub fn ability(description: impl Into<String>) -> Self {
        Effect::Ability {
            description: description.into(),
        }
    }

    #[must_use]
    pub fn play_card(instance: CardInstance, method: PlayMethod) -> Self {
        Effect::PlayCard { instance, method }
    }
}

impl std::fmt::Display for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Effect::PlayCard { instance, method } => write!(f, "{} ({method})", instance.name()),
            Effect::Ability { description } => f.write_str(description),
        }
    }
}

/// An entry on the stack.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackEntry {
    pub id: StackEntryId,

    pub effect: Effect,

    /// Who added this entry.
    pub source_player: PlayerId,

    /// Position in the order of additions (monotonic per chain state).
    pub timestamp: u64,
}
