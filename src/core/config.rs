//! Match configuration.
//!
//! Hosts configure a match at startup with a `MatchConfig`. Every field
//! has a default matching the standard rules, so a JSON document only
//! needs the fields it overrides.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// When a pending stack entry resolves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionTrigger {
    /// Both participants pass in succession with no intervening addition.
    #[default]
    BothPass,
    /// The player who did not add the top entry passes.
    ResponderPass,
}

/// Complete match configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Cards drawn by each player at setup.
    pub opening_hand: usize,

    /// Cards set aside as Life Cards at setup.
    pub life_cards: usize,

    /// Draw a card after playing one from hand.
    pub draw_after_play: bool,

    /// Azoth placements per player per turn. `None` for unlimited.
    pub azoth_per_turn: Option<u32>,

    /// Pass pattern that resolves the top of the stack.
    pub resolution_trigger: ResolutionTrigger,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            opening_hand: 2,
            life_cards: 4,
            draw_after_play: true,
            azoth_per_turn: Some(1),
            resolution_trigger: ResolutionTrigger::BothPass,
        }
    }
}

impl MatchConfig {
    /// Create the standard configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn with_opening_hand(mut self, cards: usize) -> Self {
        self.opening_hand = cards;
        self
    }

    #[must_use]
    pub fn with_life_cards(mut self, cards: usize) -> Self {
        self.life_cards = cards;
        self
    }

    #[must_use]
    pub fn with_draw_after_play(mut self, draw: bool) -> Self {
        self.draw_after_play = draw;
        self
    }

    /// Limit Azoth placements per turn (`None` for unlimited).
    #[must_use]
    pub fn with_azoth_per_turn(mut self, limit: Option<u32>) -> Self {
        self.azoth_per_turn = limit;
        self
    }

    #[must_use]
    pub fn with_resolution_trigger(mut self, trigger: ResolutionTrigger) -> Self {
        self.resolution_trigger = trigger;
        self
    }
}
