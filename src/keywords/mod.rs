//! Keyword abilities.
//!
//! `KeywordResolver` dispatches each keyword on a resolving card to its
//! [`KeywordHandler`]. Targeted keywords do not pick targets themselves:
//! they queue a [`PendingChoice`] on the game state, answered later with
//! [`KeywordResolver::resolve_choice`].
//!
//! ## Synergies
//!
//! A keyword printed (or granted) on two or more of a player's field cards
//! is an active synergy. `check_keyword_synergies` records an
//! `ActiveSynergy` marker per keyword, which the handlers and combat
//! consult:
//!
//! | Keyword | Synergy |
//! |---|---|
//! | Brilliance, Gust, Submerged | strength limit +1 per extra copy |
//! | Void | ignores Aether immunity |
//! | Inferno | +1 combat damage |
//! | Steadfast | prevents 1 damage per hit |

mod choice;
mod handler;
pub mod handlers;
mod resolver;
pub mod targeting;

pub use choice::{Choice, ChoiceKind, PendingChoice};
pub use handler::{KeywordHandler, PlayContext, PlayMethod};
pub use resolver::KeywordResolver;
