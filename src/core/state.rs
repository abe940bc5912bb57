//! Game state for one match.
//!
//! ## GameState
//!
//! Everything the rules need, owned exclusively by one match session:
//! - Per-player zones (deck, hand, field, Azoth Row, Life Cards, ...)
//! - The resolution chain (stack, priority, resolving flag)
//! - Turn progression and pending keyword choices
//! - The game log shown to players
//!
//! All collections are `im` persistent structures, so cloning a state
//! (for previews, undo, or a failed-action rollback) is O(1).

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::entity::{InstanceId, Zone};
use super::player::{PlayerId, PlayerMap};
use crate::azoth::AzothEntry;
use crate::cards::{Card, CardInstance, Keyword};
use crate::error::RulesError;
use crate::game::TurnPhase;
use crate::keywords::PendingChoice;
use crate::stack::ChainState;

/// Append-only, human-readable record of what happened.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameLog {
    entries: Vector<String>,
}

impl GameLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: impl Into<String>) {
        self.entries.push_back(entry.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Entries appended after the first `from` entries.
    pub fn since(&self, from: usize) -> impl Iterator<Item = &str> {
        self.entries.iter().skip(from).map(String::as_str)
    }
}

/// A keyword appearing on two or more of a player's field cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSynergy {
    pub keyword: Keyword,
    pub count: usize,
}

/// One player's zones and per-turn counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Flag card defining the deck's elemental identity.
    pub flag: Option<CardInstance>,

    /// Top of deck = back.
    pub deck: Vector<CardInstance>,

    pub hand: Vector<CardInstance>,

    pub field: Vector<CardInstance>,

    pub azoth_row: Vector<AzothEntry>,

    /// Top = back; damage reveals from the top.
    pub life_cards: Vector<CardInstance>,

    pub revealed: Vector<CardInstance>,

    pub discard: Vector<CardInstance>,

    pub removed: Vector<CardInstance>,

    pub synergies: SmallVec<[ActiveSynergy; 2]>,

    pub azoth_placed_this_turn: u32,

    /// Familiars that attacked this turn.
    pub attacked_this_turn: SmallVec<[InstanceId; 4]>,
}

impl PlayerState {
    /// Card instances in a card zone. `None` for zones that hold no
    /// `CardInstance` list (Azoth Row, stack).
    #[must_use]
    pub fn zone(&self, zone: Zone) -> Option<&Vector<CardInstance>> {
        match zone {
            Zone::Deck => Some(&self.deck),
            Zone::Hand => Some(&self.hand),
            Zone::Field => Some(&self.field),
            Zone::LifeCards => Some(&self.life_cards),
            Zone::Revealed => Some(&self.revealed),
            Zone::Discard => Some(&self.discard),
            Zone::Removed => Some(&self.removed),
            Zone::AzothRow | Zone::Stack => None,
        }
    }

    pub fn zone_mut(&mut self, zone: Zone) -> Option<&mut Vector<CardInstance>> {
        match zone {
            Zone::Deck => Some(&mut self.deck),
            Zone::Hand => Some(&mut self.hand),
            Zone::Field => Some(&mut self.field),
            Zone::LifeCards => Some(&mut self.life_cards),
            Zone::Revealed => Some(&mut self.revealed),
            Zone::Discard => Some(&mut self.discard),
            Zone::Removed => Some(&mut self.removed),
            Zone::AzothRow | Zone::Stack => None,
        }
    }

    /// Find an instance in a card zone.
    #[must_use]
    pub fn find(&self, zone: Zone, id: InstanceId) -> Option<&CardInstance> {
        self.zone(zone)?.iter().find(|c| c.id == id)
    }

    /// Count of the synergy marker for a keyword, 0 if inactive.
    #[must_use]
    pub fn synergy(&self, keyword: Keyword) -> usize {
        self.synergies
            .iter()
            .find(|s| s.keyword == keyword)
            .map_or(0, |s| s.count)
    }
}

/// Full game state of one match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub players: PlayerMap<PlayerState>,

    /// Player whose turn it is.
    pub active_player: PlayerId,

    /// Stack and priority.
    pub chain: ChainState,

    /// Turn number (starts at 1).
    pub turn: u32,

    pub phase: TurnPhase,

    /// Keyword choices waiting for player input, oldest first.
    pub pending_choices: Vector<PendingChoice>,

    pub winner: Option<PlayerId>,

    pub log: GameLog,

    next_instance: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Create an empty two-player state with the first player active.
    #[must_use]
    pub fn new() -> Self {
        Self {
            players: PlayerMap::with_default(),
            active_player: PlayerId::FIRST,
            chain: ChainState::new(PlayerId::FIRST),
            turn: 1,
            phase: TurnPhase::default(),
            pending_choices: Vector::new(),
            winner: None,
            log: GameLog::new(),
            next_instance: 0,
        }
    }

    #[must_use]
    pub fn player(&self, player: PlayerId) -> &PlayerState {
        &self.players[player]
    }

    pub fn player_mut(&mut self, player: PlayerId) -> &mut PlayerState {
        &mut self.players[player]
    }

    /// The player currently holding priority.
    #[must_use]
    pub fn priority_player(&self) -> PlayerId {
        self.chain.priority_player()
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    // === Instances ===

    /// Allocate a fresh instance ID.
    pub fn alloc_instance(&mut self) -> InstanceId {
        let id = InstanceId::new(self.next_instance);
        self.next_instance += 1;
        id
    }

    /// Wrap a card in a new instance owned by `owner`.
    pub fn new_instance(&mut self, card: Card, owner: PlayerId) -> CardInstance {
        let id = self.alloc_instance();
        CardInstance::new(id, card, owner)
    }

    /// Put a new instance of `card` into a player's hand.
    pub fn add_to_hand(&mut self, player: PlayerId, card: Card) -> InstanceId {
        let instance = self.new_instance(card, player);
        let id = instance.id;
        self.players[player].hand.push_back(instance);
        id
    }

    /// Put a new instance of `card` on a player's field.
    pub fn add_to_field(&mut self, player: PlayerId, card: Card) -> InstanceId {
        let instance = self.new_instance(card, player);
        let id = instance.id;
        self.players[player].field.push_back(instance);
        id
    }

    // === Zone movement ===

    /// Remove an instance from a player's zone.
    ///
    /// A missing card is recorded in the game log and reported as
    /// `CardNotFound`; nothing else changes.
    pub fn take_from_zone(
        &mut self,
        player: PlayerId,
        zone: Zone,
        id: InstanceId,
    ) -> Result<CardInstance, RulesError> {
        let position = self.players[player]
            .zone(zone)
            .and_then(|cards| cards.iter().position(|c| c.id == id));

        match (position, self.players[player].zone_mut(zone)) {
            (Some(index), Some(cards)) => Ok(cards.remove(index)),
            _ => Err(self.card_not_found(player, id, zone)),
        }
    }

    /// Locate a field instance on either side of the board.
    #[must_use]
    pub fn find_on_field(&self, id: InstanceId) -> Option<(PlayerId, &CardInstance)> {
        self.players
            .iter()
            .find_map(|(player, state)| state.find(Zone::Field, id).map(|c| (player, c)))
    }

    /// Mutable access to a field instance on either side of the board.
    pub fn field_instance_mut(&mut self, id: InstanceId) -> Option<&mut CardInstance> {
        self.players
            .iter_mut()
            .find_map(|(_, state)| state.field.iter_mut().find(|c| c.id == id))
    }

    /// Draw up to `count` cards from the top of a player's deck.
    ///
    /// Returns how many cards were actually drawn.
    pub fn draw_cards(&mut self, player: PlayerId, count: usize) -> usize {
        let mut drawn = 0;
        for _ in 0..count {
            match self.players[player].deck.pop_back() {
                Some(card) => {
                    self.players[player].hand.push_back(card);
                    drawn += 1;
                }
                None => break,
            }
        }
        if drawn > 0 {
            let plural = if drawn == 1 { "" } else { "s" };
            self.log.push(format!("{player} drew {drawn} card{plural}"));
        }
        drawn
    }

    /// Record a missing card in the log and build the matching error.
    pub fn card_not_found(&mut self, player: PlayerId, card: InstanceId, zone: Zone) -> RulesError {
        let error = RulesError::CardNotFound { player, card, zone };
        tracing::warn!(%player, %card, %zone, "card not found");
        self.log.push(format!("Error: card {card} not found in {zone} of {player}"));
        error
    }
}
