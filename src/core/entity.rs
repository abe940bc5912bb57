//! Card instance identity and zones.
//!
//! Two copies of the same card share a `CardId` but never an `InstanceId`.
//! Instance IDs are handed out by `GameState::alloc_instance` and stay
//! attached to a physical card as it moves between zones.

use serde::{Deserialize, Serialize};

/// Unique identifier for a physical card within one match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub u32);

impl InstanceId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a card instance currently lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Deck,
    Hand,
    Field,
    AzothRow,
    LifeCards,
    /// Life Cards revealed by damage, waiting to be Burst or claimed.
    Revealed,
    Discard,
    /// Removed from the game (Void).
    Removed,
    Stack,
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Zone::Deck => "deck",
            Zone::Hand => "hand",
            Zone::Field => "field",
            Zone::AzothRow => "Azoth Row",
            Zone::LifeCards => "Life Cards",
            Zone::Revealed => "revealed Life Cards",
            Zone::Discard => "discard pile",
            Zone::Removed => "removed zone",
            Zone::Stack => "stack",
        };
        f.write_str(name)
    }
}
