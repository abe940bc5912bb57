//! The keyword handler interface.

use serde::{Deserialize, Serialize};

use super::choice::PendingChoice;
use crate::azoth::AzothSource;
use crate::cards::{Card, CardInstance, Element, ElementCounts, Keyword};
use crate::core::{GameState, InstanceId, PlayerId};
use crate::error::{Result, RulesError};

/// How a card is being played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayMethod {
    /// Familiar onto the field.
    Summon,
    /// Resolve once, then to the bottom of the deck.
    Spell,
    /// Face-up into the Azoth Row.
    Azoth,
    /// Free play of a revealed Life Card; keywords never trigger.
    Burst,
}

impl std::fmt::Display for PlayMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PlayMethod::Summon => "summon",
            PlayMethod::Spell => "spell",
            PlayMethod::Azoth => "azoth",
            PlayMethod::Burst => "burst",
        };
        f.write_str(name)
    }
}

/// The card whose keyword is resolving.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayContext {
    pub player: PlayerId,
    pub source: InstanceId,
    pub source_name: String,
    pub method: PlayMethod,
    /// Azoth spent on the source, by element paid as.
    pub spent: ElementCounts,
}

impl PlayContext {
    #[must_use]
    pub fn new(player: PlayerId, instance: &CardInstance, method: PlayMethod) -> Self {
        Self {
            player,
            source: instance.id,
            source_name: instance.name().to_string(),
            method,
            spent: instance.azoth_spent,
        }
    }

    /// Open a choice owned by this context's player.
    #[must_use]
    pub fn pending(&self, kind: super::ChoiceKind) -> PendingChoice {
        PendingChoice {
            player: self.player,
            source: self.source,
            source_name: self.source_name.clone(),
            spent: self.spent,
            kind,
        }
    }
}

/// One keyword's behavior.
///
/// Handlers are registered in [`KeywordResolver`](super::KeywordResolver)
/// by keyword. Only `keyword` and `on_play` are required.
pub trait KeywordHandler: Send + Sync {
    fn keyword(&self) -> Keyword;

    /// Reject a play before any cost is paid.
    fn check_play(&self, _card: &Card, _method: PlayMethod) -> Result<()> {
        Ok(())
    }

    /// Override the Azoth produced when the card is placed in the row.
    fn azoth_source(&self, _card: &Card, _requested: Element) -> Result<Option<AzothSource>> {
        Ok(None)
    }

    /// Apply the keyword when its card resolves.
    fn on_play(&self, state: &mut GameState, ctx: &PlayContext) -> Result<()>;

    /// Apply the chosen target of a pending choice this keyword opened.
    ///
    /// The target has been checked against the choice's candidates and
    /// is on the field.
    fn on_target(&self, _state: &mut GameState, choice: &PendingChoice, _target: InstanceId) -> Result<()> {
        Err(RulesError::InvalidChoice(format!(
            "{} does not take a target",
            choice.keyword()
        )))
    }

    /// Announce the synergy of `count` copies on `player`'s field.
    fn on_synergy(&self, state: &mut GameState, player: PlayerId, count: usize) {
        state
            .log
            .push(format!("{player}: {} synergy active ({count} cards)", self.keyword()));
    }
}
