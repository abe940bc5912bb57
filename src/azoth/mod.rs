//! Azoth: the elemental resource system.
//!
//! Cards committed to a player's Azoth Row become resources. Each entry
//! produces one Azoth of its element (or any element, for Quintessence)
//! and is rested when spent until the player's next refresh.
//!
//! ## Example
//!
//! ```
//! use konivrer_rules::azoth::AzothLedger;
//! use konivrer_rules::cards::{Card, CardId, CardType, Element, ElementCounts};
//! use konivrer_rules::core::{GameState, PlayerId};
//!
//! let mut state = GameState::new();
//! let p1 = PlayerId::FIRST;
//! for id in 0..2 {
//!     let card = state.add_to_hand(p1, Card::new(CardId::new(id), "Ember", CardType::Familiar));
//!     AzothLedger::play_card_as_azoth(&mut state, p1, card, Element::Fire).unwrap();
//! }
//!
//! let cost = ElementCounts::new().with(Element::Fire, 1).with(Element::Generic, 1);
//! let payment = AzothLedger::pay_card_cost(&mut state, p1, &cost).unwrap();
//! assert_eq!(payment.total(), 2);
//! ```

pub mod combat;
mod ledger;
mod row;

pub use combat::{advantaged_against, elemental_damage, has_advantage};
pub use ledger::{AzothLedger, AzothPayment};
pub use row::{AvailableAzoth, AzothEntry, AzothSource};
