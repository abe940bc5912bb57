//! Azoth payment.
//!
//! ## Payment
//!
//! `pay_card_cost` plans the whole allocation before touching state:
//!
//! 1. Each explicit element requirement takes matching entries first,
//!    then Quintessence for the shortfall.
//! 2. The generic requirement takes Generic entries, then any other
//!    element, then Quintessence last.
//!
//! Only a complete plan is committed; a failed payment leaves every
//! `rested` flag as it was.

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::combat;
use super::row::{AvailableAzoth, AzothEntry, AzothSource};
use crate::cards::{Element, ElementCounts};
use crate::core::{GameState, InstanceId, PlayerId, Zone};
use crate::error::{Result, RulesError};

/// A committed payment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AzothPayment {
    /// Entries rested by this payment, in selection order.
    pub rested: Vec<InstanceId>,
    /// Azoth spent, keyed by the element each entry paid as.
    pub spent: ElementCounts,
}

impl AzothPayment {
    #[must_use]
    pub fn total(&self) -> u32 {
        self.spent.total()
    }
}

/// Selected row indices and what they paid for.
struct PaymentPlan {
    indices: Vec<usize>,
    spent: ElementCounts,
}

/// The elemental resource ledger.
pub struct AzothLedger;

impl AzothLedger {
    /// Unrested Azoth in a row.
    #[must_use]
    pub fn available_azoth(row: &Vector<AzothEntry>) -> AvailableAzoth {
        AvailableAzoth::from_row(row)
    }

    /// Whether `available` can cover `cost` in a single allocation.
    ///
    /// Every specific shortfall (requirement minus dedicated entries) must
    /// come from the shared Quintessence pool, and the pool as a whole must
    /// cover the full cost.
    #[must_use]
    pub fn can_pay_cost(available: &AvailableAzoth, cost: &ElementCounts) -> bool {
        let shortfall: u32 = Element::SPECIFIC
            .iter()
            .map(|&e| cost[e].saturating_sub(available.dedicated(e)))
            .fold(0, u32::saturating_add);

        shortfall <= available.quintessence && available.total >= cost.total()
    }

    /// Pay `cost` from a player's Azoth Row, all or nothing.
    pub fn pay_card_cost(
        state: &mut GameState,
        player: PlayerId,
        cost: &ElementCounts,
    ) -> Result<AzothPayment> {
        let row = &state.player(player).azoth_row;
        let Some(plan) = Self::plan_payment(row, cost) else {
            let available = AvailableAzoth::from_row(row);
            debug!(%player, required = cost.total(), available = available.total, "payment rejected");
            return Err(RulesError::InsufficientResources {
                required: cost.total(),
                available: available.total,
            });
        };

        let row = &mut state.player_mut(player).azoth_row;
        let mut rested = Vec::with_capacity(plan.indices.len());
        for &index in &plan.indices {
            if let Some(entry) = row.get_mut(index) {
                entry.rested = true;
                rested.push(entry.id());
            }
        }

        let payment = AzothPayment {
            rested,
            spent: plan.spent,
        };
        debug!(%player, spent = %payment.spent, "azoth paid");
        state
            .log
            .push(format!("{player} paid {} Azoth ({})", payment.total(), payment.spent));
        Ok(payment)
    }

    /// Move a card from hand into the Azoth Row as an unrested entry.
    pub fn play_card_as_azoth(
        state: &mut GameState,
        player: PlayerId,
        card: InstanceId,
        source: impl Into<AzothSource>,
    ) -> Result<()> {
        let source = source.into();
        let instance = state.take_from_zone(player, Zone::Hand, card)?;

        state
            .log
            .push(format!("{player} placed {} as {source} Azoth", instance.name()));
        let player_state = state.player_mut(player);
        player_state.azoth_row.push_back(AzothEntry::new(instance, source));
        player_state.azoth_placed_this_turn += 1;
        Ok(())
    }

    /// Unrest every entry in a player's row.
    pub fn refresh_azoth(state: &mut GameState, player: PlayerId) {
        let mut refreshed = 0;
        for entry in state.player_mut(player).azoth_row.iter_mut() {
            if entry.rested {
                entry.rested = false;
                refreshed += 1;
            }
        }
        state.log.push(format!("{player} refreshed {refreshed} Azoth"));
    }

    /// Strength gained from overpayment: Azoth spent beyond the cost.
    #[must_use]
    pub fn calculate_strength(azoth_spent: u32, cost: &ElementCounts) -> u32 {
        azoth_spent.saturating_sub(cost.total())
    }

    #[must_use]
    pub fn calculate_elemental_damage(attacker: Element, defender: Element, base: u32) -> u32 {
        combat::elemental_damage(attacker, defender, base)
    }

    fn plan_payment(row: &Vector<AzothEntry>, cost: &ElementCounts) -> Option<PaymentPlan> {
        if cost.total() as usize > row.len() {
            return None;
        }
        let mut used: Vec<bool> = row.iter().map(|e| e.rested).collect();
        let mut indices = Vec::with_capacity(row.len());
        let mut spent = ElementCounts::new();

        for element in Element::SPECIFIC {
            let need = cost[element] as usize;
            if need == 0 {
                continue;
            }
            let mut picked = Self::select(row, &mut used, need, |e| {
                e.source == AzothSource::Element(element)
            });
            let shortfall = need - picked.len();
            picked.extend(Self::select(row, &mut used, shortfall, AzothEntry::is_quintessence));
            if picked.len() < need {
                return None;
            }
            spent[element] += cost[element];
            indices.extend(picked);
        }

        let need = cost.generic() as usize;
        let tiers: [fn(&AzothEntry) -> bool; 3] = [
            |e| e.source == AzothSource::Element(Element::Generic),
            |e| matches!(e.source, AzothSource::Element(_)),
            AzothEntry::is_quintessence,
        ];
        let mut picked = Vec::with_capacity(need.min(row.len()));
        for tier in tiers {
            let remaining = need - picked.len();
            picked.extend(Self::select(row, &mut used, remaining, tier));
        }
        if picked.len() < need {
            return None;
        }
        for &index in &picked {
            match row[index].source {
                AzothSource::Element(element) => spent.increment(element),
                AzothSource::Quintessence => spent.increment(Element::Generic),
            }
        }
        indices.extend(picked);

        Some(PaymentPlan { indices, spent })
    }

    /// Claim up to `count` unused entries matching `matches`.
    fn select(
        row: &Vector<AzothEntry>,
        used: &mut [bool],
        count: usize,
        matches: impl Fn(&AzothEntry) -> bool,
    ) -> Vec<usize> {
        let mut picked = Vec::with_capacity(count.min(row.len()));
        for (index, entry) in row.iter().enumerate() {
            if picked.len() == count {
                break;
            }
            if !used[index] && matches(entry) {
                used[index] = true;
                picked.push(index);
            }
        }
        picked
    }
}
