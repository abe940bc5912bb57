//! # konivrer-rules
//!
//! Rules engine for the KONIVRER trading card game.
//!
//! ## Design Principles
//!
//! 1. **Plain State**: `GameState` is a serializable value. Components
//!    operate on `&mut GameState` and hold no game data of their own.
//!
//! 2. **Atomic Actions**: A rejected action leaves the state untouched.
//!    Snapshots are O(1) thanks to `im-rs` persistent collections.
//!
//! 3. **Deterministic**: Shuffles use a seeded ChaCha RNG, so a seed and
//!    a sequence of actions replay the same match.
//!
//! ## Architecture
//!
//! - **Resolution Chain**: Last-in-first-out stack with alternating
//!   priority. Entries resolve when both players pass in a row.
//!
//! - **Azoth Ledger**: Cards placed in the Azoth Row are rested to pay
//!   elemental costs. Quintessence Azoth stands in for any element.
//!
//! - **Keyword Resolver**: One handler per keyword, registered in a
//!   table. Targeted keywords suspend on a `PendingChoice` until the
//!   player answers.
//!
//! ## Modules
//!
//! - `core`: Players, instance IDs, zones, state, RNG, configuration
//! - `cards`: Elements, keywords, card definitions and the catalog
//! - `azoth`: Azoth Row, payment and elemental combat math
//! - `keywords`: Keyword handlers, targeting and player choices
//! - `stack`: Resolution chain, stack entries and observers
//! - `game`: Turn phases and the `GameSession` match driver
//! - `error`: `RulesError` and the crate `Result` alias

pub mod azoth;
pub mod cards;
pub mod core;
pub mod error;
pub mod game;
pub mod keywords;
pub mod stack;

// Re-export commonly used types
pub use crate::core::{
    GameLog, GameRng, GameRngState, GameState, InstanceId, MatchConfig, PlayerId, PlayerMap,
    PlayerState, ResolutionTrigger, Zone,
};

pub use crate::cards::{
    AmalgamOptions, Card, CardCatalog, CardId, CardInstance, CardType, Element, ElementCounts,
    Keyword, KeywordInfo, Rarity,
};

pub use crate::azoth::{AvailableAzoth, AzothEntry, AzothLedger, AzothPayment, AzothSource};

pub use crate::keywords::{
    Choice, ChoiceKind, KeywordHandler, KeywordResolver, PendingChoice, PlayContext, PlayMethod,
};

pub use crate::stack::{
    ChainEvent, ChainObserver, ChainPhase, ChainState, Effect, NoopObserver, RecordingObserver,
    ResolutionChain, ResolutionStatus, StackEntry, StackEntryId,
};

pub use crate::game::{GameSession, TurnPhase};

pub use crate::error::{Result, RulesError};
