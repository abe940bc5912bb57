//! Target legality for displacement keywords.

use crate::cards::{CardInstance, Element};
use crate::core::{GameState, InstanceId};

/// Restrictions a keyword places on its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetFilter {
    /// Maximum target strength; `None` for no limit.
    pub max_strength: Option<u32>,
    /// Cards of this element cannot be targeted.
    pub immune: Option<Element>,
}

impl TargetFilter {
    #[must_use]
    pub fn matches(&self, card: &CardInstance) -> bool {
        if !card.is_familiar() {
            return false;
        }
        if self.immune.is_some_and(|element| card.has_element(element)) {
            return false;
        }
        self.max_strength.map_or(true, |limit| card.strength() <= limit)
    }
}

/// Field cards on either side matching `filter`, excluding `source`.
///
/// Ordered by player, then field position.
#[must_use]
pub fn legal_targets(state: &GameState, source: InstanceId, filter: &TargetFilter) -> Vec<InstanceId> {
    state
        .players
        .iter()
        .flat_map(|(_, player)| player.field.iter())
        .filter(|card| card.id != source && filter.matches(card))
        .map(|card| card.id)
        .collect()
}
