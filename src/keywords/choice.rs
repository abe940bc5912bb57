//! Player choices opened by keyword abilities.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::{ElementCounts, Keyword};
use crate::core::{InstanceId, PlayerId};

/// What a pending choice asks for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChoiceKind {
    /// Pick one of `candidates` as the target of `keyword`.
    Target {
        keyword: Keyword,
        candidates: Vec<InstanceId>,
    },
    /// Pick a keyword for an Amalgam card.
    Keyword { options: SmallVec<[Keyword; 2]> },
}

/// A keyword ability waiting for its controller's input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingChoice {
    pub player: PlayerId,
    /// The card whose ability opened the choice.
    pub source: InstanceId,
    pub source_name: String,
    /// Azoth spent on the source, for strength limits.
    pub spent: ElementCounts,
    pub kind: ChoiceKind,
}

impl PendingChoice {
    /// The keyword this choice belongs to.
    #[must_use]
    pub fn keyword(&self) -> Keyword {
        match &self.kind {
            ChoiceKind::Target { keyword, .. } => *keyword,
            ChoiceKind::Keyword { .. } => Keyword::Amalgam,
        }
    }
}

/// A player's answer to a pending choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Choice {
    Target(InstanceId),
    Keyword(Keyword),
    /// Decline an optional ability.
    Decline,
}
