//! Turn phases.

use serde::{Deserialize, Serialize};

/// Phases of a turn, in order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Optional Azoth placement.
    #[default]
    Start,
    Main,
    Combat,
    PostCombat,
    /// Azoth refreshes and the turn ends.
    Refresh,
}

impl TurnPhase {
    /// The following phase; `Refresh` wraps to `Start` of the next turn.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            TurnPhase::Start => TurnPhase::Main,
            TurnPhase::Main => TurnPhase::Combat,
            TurnPhase::Combat => TurnPhase::PostCombat,
            TurnPhase::PostCombat => TurnPhase::Refresh,
            TurnPhase::Refresh => TurnPhase::Start,
        }
    }

    /// Whether the active player may summon Familiars.
    #[must_use]
    pub const fn is_main(self) -> bool {
        matches!(self, TurnPhase::Main | TurnPhase::PostCombat)
    }

    /// Whether the active player may place Azoth.
    #[must_use]
    pub const fn allows_azoth(self) -> bool {
        matches!(self, TurnPhase::Start | TurnPhase::Main | TurnPhase::PostCombat)
    }
}

impl std::fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TurnPhase::Start => "Start Phase",
            TurnPhase::Main => "Main Phase",
            TurnPhase::Combat => "Combat Phase",
            TurnPhase::PostCombat => "Post-Combat Main Phase",
            TurnPhase::Refresh => "Refresh Phase",
        };
        f.write_str(name)
    }
}
