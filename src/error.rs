//! Error types for the rules engine.
//!
//! Rule violations are rejected without touching game state: every
//! operation validates first and mutates only once the whole action is
//! known to succeed.

use thiserror::Error;

use crate::core::{InstanceId, PlayerId, Zone};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    #[error("{player} acted without priority (held by {holder})")]
    PriorityViolation { player: PlayerId, holder: PlayerId },

    #[error("insufficient Azoth: {required} required, {available} available")]
    InsufficientResources { required: u32, available: u32 },

    #[error("card {card} not found in {zone} of {player}")]
    CardNotFound {
        player: PlayerId,
        card: InstanceId,
        zone: Zone,
    },

    #[error("the stack is already resolving")]
    ResolutionInProgress,

    #[error("nothing on the stack to respond to")]
    EmptyStack,

    #[error("{player} has no pending choice")]
    NoPendingChoice { player: PlayerId },

    #[error("invalid choice: {0}")]
    InvalidChoice(String),

    #[error("illegal play: {0}")]
    IllegalPlay(String),

    #[error("card catalog error: {0}")]
    Catalog(String),
}

impl From<serde_json::Error> for RulesError {
    fn from(err: serde_json::Error) -> Self {
        RulesError::Catalog(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RulesError>;
