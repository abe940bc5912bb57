//! Card instances - runtime card state.
//!
//! `CardInstance` is one physical copy of a card during a match. It
//! carries the printed `Card` plus everything the rules attach to it
//! while it moves between zones.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::definition::{Card, CardType};
use super::element::{Element, ElementCounts};
use super::keyword::Keyword;
use crate::core::{InstanceId, PlayerId};

/// A card instance in a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInstance {
    pub id: InstanceId,
    pub card: Card,
    pub owner: PlayerId,

    /// +1 counters (from overpayment or Burst).
    pub counters: u32,

    /// Azoth spent to play this card, by the element each entry paid as.
    pub azoth_spent: ElementCounts,

    /// Extra damage added after this card deals damage (Inferno).
    pub inferno_bonus: u32,

    /// Damage this card may redirect to its own Strength (Steadfast).
    pub steadfast_redirect: u32,

    /// Damage absorbed into Strength.
    #[serde(default)]
    pub damage: u32,

    /// Keywords gained during play (Amalgam choice).
    pub granted_keywords: SmallVec<[Keyword; 1]>,

    /// Entered play via Burst; keyword abilities never triggered.
    pub burst_played: bool,
}

impl CardInstance {
    #[must_use]
    pub fn new(id: InstanceId, card: Card, owner: PlayerId) -> Self {
        Self {
            id,
            card,
            owner,
            counters: 0,
            azoth_spent: ElementCounts::new(),
            inferno_bonus: 0,
            steadfast_redirect: 0,
            damage: 0,
            granted_keywords: SmallVec::new(),
            burst_played: false,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.card.name
    }

    /// Printed power plus counters, less absorbed damage.
    #[must_use]
    pub fn strength(&self) -> u32 {
        self.card
            .power
            .saturating_add(self.counters)
            .saturating_sub(self.damage)
    }

    #[must_use]
    pub fn is_familiar(&self) -> bool {
        self.card.card_type == CardType::Familiar
    }

    #[must_use]
    pub fn is_spell(&self) -> bool {
        self.card.card_type == CardType::Spell
    }

    /// Printed keywords followed by granted ones.
    pub fn keywords(&self) -> impl Iterator<Item = Keyword> + '_ {
        self.card
            .keywords
            .iter()
            .chain(self.granted_keywords.iter())
            .copied()
    }

    #[must_use]
    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.keywords().any(|k| k == keyword)
    }

    #[must_use]
    pub fn has_element(&self, element: Element) -> bool {
        self.card.has_element(element)
    }

    /// Clear everything attached during play (card leaves the field).
    pub fn reset(&mut self) {
        self.counters = 0;
        self.azoth_spent = ElementCounts::new();
        self.inferno_bonus = 0;
        self.steadfast_redirect = 0;
        self.damage = 0;
        self.granted_keywords.clear();
        self.burst_played = false;
    }
}
