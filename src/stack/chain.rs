//! The resolution chain: priority passing over a LIFO stack.
//!
//! Entries resolve in reverse order of addition. Adding an entry hands
//! priority to the other player; passing hands it over too, until the
//! configured trigger fires and the top entry resolves. After each
//! resolution the active player receives priority.

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::entry::{Effect, StackEntry, StackEntryId};
use super::observer::{ChainObserver, NoopObserver};
use crate::core::{GameState, PlayerId, ResolutionTrigger};
use crate::error::{Result, RulesError};
use crate::keywords::{KeywordResolver, PlayMethod};

/// Where the chain is in its cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainPhase {
    /// Nothing has been added since the chain started.
    #[default]
    Idle,
    /// The player may respond or pass.
    AwaitingResponse(PlayerId),
    /// The top entry is being applied.
    Resolving,
    /// The stack emptied through resolution.
    Complete,
}

/// Status returned by a pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionStatus {
    /// Nothing resolved; the player now holds priority.
    WaitingForPriority(PlayerId),

    /// The top entry resolved and more remain.
    Resolved {
        entry: StackEntryId,
        next_priority: PlayerId,
    },

    /// The stack is empty.
    Complete,
}

/// Stack and priority, stored in `GameState`.
///
/// Only [`ResolutionChain`] mutates it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainState {
    /// Index 0 = bottom, back = top.
    stack: Vector<StackEntry>,
    priority_player: PlayerId,
    phase: ChainPhase,
    /// Passes since the last addition or resolution.
    consecutive_passes: u32,
    is_resolving: bool,
    next_id: u32,
    next_timestamp: u64,
}

impl ChainState {
    #[must_use]
    pub fn new(priority_player: PlayerId) -> Self {
        Self {
            stack: Vector::new(),
            priority_player,
            phase: ChainPhase::Idle,
            consecutive_passes: 0,
            is_resolving: false,
            next_id: 0,
            next_timestamp: 0,
        }
    }

    #[must_use]
    pub fn stack(&self) -> &Vector<StackEntry> {
        &self.stack
    }

    #[must_use]
    pub fn top(&self) -> Option<&StackEntry> {
        self.stack.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    #[must_use]
    pub fn priority_player(&self) -> PlayerId {
        self.priority_player
    }

    #[must_use]
    pub fn phase(&self) -> ChainPhase {
        self.phase
    }

    #[must_use]
    pub fn consecutive_passes(&self) -> u32 {
        self.consecutive_passes
    }

    #[must_use]
    pub fn is_resolving(&self) -> bool {
        self.is_resolving
    }

    /// Empty the stack and give priority to `player`. ID counters carry over.
    fn reset(&mut self, player: PlayerId) {
        self.stack.clear();
        self.priority_player = player;
        self.phase = ChainPhase::Idle;
        self.consecutive_passes = 0;
        self.is_resolving = false;
    }
}

/// The priority/stack state machine.
///
/// ## Example
///
/// ```
/// use konivrer_rules::core::{GameState, PlayerId};
/// use konivrer_rules::stack::{Effect, ResolutionChain, ResolutionStatus};
///
/// let mut state = GameState::new();
/// let mut chain = ResolutionChain::new();
/// let (p1, p2) = (PlayerId::FIRST, PlayerId::SECOND);
///
/// chain.initialize(&mut state, p1);
/// chain.add_to_stack(&mut state, Effect::ability("Draw a card"), p1).unwrap();
/// chain.respond_to_stack(&mut state, Effect::ability("Counter it"), p2).unwrap();
///
/// // Both players pass: the response resolves first.
/// chain.pass_priority(&mut state, p1).unwrap();
/// let status = chain.pass_priority(&mut state, p2).unwrap();
/// assert!(matches!(status, ResolutionStatus::Resolved { .. }));
/// assert_eq!(state.chain.top().unwrap().effect, Effect::ability("Draw a card"));
/// ```
pub struct ResolutionChain<O = NoopObserver> {
    observer: O,
    keywords: KeywordResolver,
    trigger: ResolutionTrigger,
}

impl Default for ResolutionChain<NoopObserver> {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionChain<NoopObserver> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            observer: NoopObserver,
            keywords: KeywordResolver::new(),
            trigger: ResolutionTrigger::default(),
        }
    }
}

impl<O: ChainObserver> ResolutionChain<O> {
    /// Replace the observer.
    #[must_use]
    pub fn with_observer<P: ChainObserver>(self, observer: P) -> ResolutionChain<P> {
        ResolutionChain {
            observer,
            keywords: self.keywords,
            trigger: self.trigger,
        }
    }

    #[must_use]
    pub fn with_trigger(mut self, trigger: ResolutionTrigger) -> Self {
        self.trigger = trigger;
        self
    }

    #[must_use]
    pub fn with_keywords(mut self, keywords: KeywordResolver) -> Self {
        self.keywords = keywords;
        self
    }

    #[must_use]
    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    #[must_use]
    pub fn keywords(&self) -> &KeywordResolver {
        &self.keywords
    }

    #[must_use]
    pub fn trigger(&self) -> ResolutionTrigger {
        self.trigger
    }

    /// Reset to `Idle` with `active_player` active and holding priority.
    pub fn initialize(&mut self, state: &mut GameState, active_player: PlayerId) {
        state.active_player = active_player;
        state.chain.reset(active_player);
        debug!(%active_player, "chain initialized");
    }

    /// Push an entry. The other player receives priority.
    pub fn add_to_stack(
        &mut self,
        state: &mut GameState,
        effect: Effect,
        player: PlayerId,
    ) -> Result<StackEntryId> {
        self.ensure_priority(state, player)?;
        if let Effect::PlayCard {
            method: PlayMethod::Azoth,
            instance,
        } = &effect
        {
            return Err(RulesError::IllegalPlay(format!(
                "{} is placed as Azoth without using the stack",
                instance.name()
            )));
        }

        let chain = &mut state.chain;
        let id = StackEntryId::new(chain.next_id);
        chain.next_id += 1;
        let timestamp = chain.next_timestamp;
        chain.next_timestamp += 1;

        let responder = player.opponent();
        state.log.push(format!("{player} added {effect} to the stack"));
        debug!(%player, entry = %id, %effect, "stack push");

        let chain = &mut state.chain;
        chain.stack.push_back(StackEntry {
            id,
            effect,
            source_player: player,
            timestamp,
        });
        chain.priority_player = responder;
        chain.consecutive_passes = 0;
        chain.phase = ChainPhase::AwaitingResponse(responder);

        self.observer.on_stack_update(&chain.stack);
        if let Some(top) = chain.stack.last() {
            self.observer.on_request_response(responder, top);
        }
        Ok(id)
    }

    /// Respond to the current top entry.
    pub fn respond_to_stack(
        &mut self,
        state: &mut GameState,
        response: Effect,
        player: PlayerId,
    ) -> Result<StackEntryId> {
        self.ensure_priority(state, player)?;
        if state.chain.is_empty() {
            return Err(RulesError::EmptyStack);
        }
        self.add_to_stack(state, response, player)
    }

    /// Pass priority; resolve the top entry when the trigger fires.
    pub fn pass_priority(&mut self, state: &mut GameState, player: PlayerId) -> Result<ResolutionStatus> {
        self.ensure_priority(state, player)?;
        let snapshot = state.clone();

        state.chain.consecutive_passes += 1;
        state.log.push(format!("{player} passed priority"));

        let resolve = match state.chain.top() {
            None => false,
            Some(top) => match self.trigger {
                ResolutionTrigger::BothPass => state.chain.consecutive_passes >= 2,
                ResolutionTrigger::ResponderPass => top.source_player != player,
            },
        };

        if resolve {
            let entry = match self.resolve_top(state) {
                Ok(entry) => entry,
                Err(err) => {
                    *state = snapshot;
                    return Err(err);
                }
            };
            return Ok(if state.chain.is_empty() {
                ResolutionStatus::Complete
            } else {
                ResolutionStatus::Resolved {
                    entry: entry.id,
                    next_priority: state.chain.priority_player,
                }
            });
        }

        if state.chain.is_empty() && state.chain.consecutive_passes >= 2 {
            return Ok(ResolutionStatus::Complete);
        }

        let next = player.opponent();
        let chain = &mut state.chain;
        chain.priority_player = next;
        if let Some(top) = chain.stack.last() {
            chain.phase = ChainPhase::AwaitingResponse(next);
            self.observer.on_request_response(next, top);
        }
        Ok(ResolutionStatus::WaitingForPriority(next))
    }

    /// Discard the stack and start over with `active_player`.
    pub fn start_new_chain(&mut self, state: &mut GameState, active_player: PlayerId) {
        let discarded = state.chain.len();
        if discarded > 0 {
            warn!(discarded, "unresolved entries discarded");
        }
        state.active_player = active_player;
        state.chain.reset(active_player);
        state.log.push(format!("New chain: {active_player} has priority"));
    }

    /// Reject `player` unless they hold priority and nothing is resolving.
    pub fn ensure_priority(&self, state: &GameState, player: PlayerId) -> Result<()> {
        if state.chain.is_resolving {
            return Err(RulesError::ResolutionInProgress);
        }
        let holder = state.chain.priority_player;
        if player != holder {
            warn!(%player, %holder, "action without priority rejected");
            return Err(RulesError::PriorityViolation { player, holder });
        }
        Ok(())
    }

    /// Apply an effect at once, without a response window.
    ///
    /// Used for Burst. Fires `on_effect_resolution` but leaves the stack
    /// and priority untouched.
    pub fn resolve_immediately(
        &mut self,
        state: &mut GameState,
        effect: Effect,
        player: PlayerId,
    ) -> Result<StackEntryId> {
        if state.chain.is_resolving {
            return Err(RulesError::ResolutionInProgress);
        }
        let snapshot = state.clone();

        let chain = &mut state.chain;
        let entry = StackEntry {
            id: StackEntryId::new(chain.next_id),
            effect,
            source_player: player,
            timestamp: chain.next_timestamp,
        };
        chain.next_id += 1;
        chain.next_timestamp += 1;

        state.log.push(format!("{} resolves", entry.effect));
        if let Err(err) = self.apply_effect(state, &entry) {
            *state = snapshot;
            return Err(err);
        }
        debug!(entry = %entry.id, "resolved immediately");
        self.observer.on_effect_resolution(&entry);
        Ok(entry.id)
    }

    /// Pop and apply the top entry. On failure the state is restored.
    fn resolve_top(&mut self, state: &mut GameState) -> Result<StackEntry> {
        if state.chain.is_resolving {
            return Err(RulesError::ResolutionInProgress);
        }
        let snapshot = state.clone();

        state.chain.is_resolving = true;
        state.chain.phase = ChainPhase::Resolving;
        let Some(entry) = state.chain.stack.pop_back() else {
            *state = snapshot;
            return Err(RulesError::EmptyStack);
        };

        state.log.push(format!("{} resolves", entry.effect));
        if let Err(err) = self.apply_effect(state, &entry) {
            *state = snapshot;
            return Err(err);
        }
        debug!(entry = %entry.id, remaining = state.chain.len(), "stack resolved");

        let active = state.active_player;
        let chain = &mut state.chain;
        chain.is_resolving = false;
        chain.consecutive_passes = 0;
        chain.priority_player = active;

        self.observer.on_effect_resolution(&entry);
        match chain.stack.last() {
            Some(top) => {
                chain.phase = ChainPhase::AwaitingResponse(active);
                self.observer.on_request_response(active, top);
            }
            None => {
                chain.phase = ChainPhase::Complete;
                self.observer.on_chain_complete();
            }
        }
        Ok(entry)
    }

    fn apply_effect(&self, state: &mut GameState, entry: &StackEntry) -> Result<()> {
        let Effect::PlayCard { instance, method } = &entry.effect else {
            return Ok(());
        };
        let player = entry.source_player;
        let mut card = instance.clone();

        match method {
            PlayMethod::Summon => {
                state.player_mut(player).field.push_back(card.clone());
                state.log.push(format!("{} enters {player}'s field", card.name()));
                self.keywords.check_keyword_synergies(state, player);
                self.keywords
                    .apply_keyword_effects(state, player, &card, PlayMethod::Summon)?;
            }
            PlayMethod::Spell => {
                self.keywords
                    .apply_keyword_effects(state, player, &card, PlayMethod::Spell)?;
                card.reset();
                state.log.push(format!("{} goes to the bottom of {player}'s deck", card.name()));
                state.player_mut(player).deck.push_front(card);
            }
            PlayMethod::Burst => {
                card.burst_played = true;
                if card.is_familiar() {
                    state.log.push(format!("{} bursts onto {player}'s field", card.name()));
                    state.player_mut(player).field.push_back(card);
                    self.keywords.check_keyword_synergies(state, player);
                } else {
                    card.reset();
                    state.log.push(format!("{} goes to the bottom of {player}'s deck", card.name()));
                    state.player_mut(player).deck.push_front(card);
                }
            }
            PlayMethod::Azoth => {
                return Err(RulesError::IllegalPlay(format!(
                    "{} cannot resolve as Azoth",
                    card.name()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardId, CardInstance, CardType, Keyword};
    use crate::core::InstanceId;
    use crate::stack::RecordingObserver;

    const P1: PlayerId = PlayerId::FIRST;
    const P2: PlayerId = PlayerId::SECOND;

    fn setup() -> (GameState, ResolutionChain<RecordingObserver>) {
        let mut state = GameState::new();
        let mut chain = ResolutionChain::new().with_observer(RecordingObserver::new());
        chain.initialize(&mut state, P1);
        (state, chain)
    }

    #[test]
    fn test_initialize() {
        let (state, _) = setup();
        assert_eq!(state.chain.phase(), ChainPhase::Idle);
        assert_eq!(state.priority_player(), P1);
        assert!(state.chain.is_empty());
    }

    #[test]
    fn test_add_flips_priority() {
        let (mut state, mut chain) = setup();

        chain.add_to_stack(&mut state, Effect::ability("A"), P1).unwrap();

        assert_eq!(state.priority_player(), P2);
        assert_eq!(state.chain.phase(), ChainPhase::AwaitingResponse(P2));
        assert_eq!(state.chain.len(), 1);
        assert_eq!(state.log.last(), Some("Player 1 added A to the stack"));
    }

    #[test]
    fn test_add_without_priority_rejected() {
        let (mut state, mut chain) = setup();
        let before = state.clone();

        let err = chain.add_to_stack(&mut state, Effect::ability("A"), P2).unwrap_err();

        assert_eq!(err, RulesError::PriorityViolation { player: P2, holder: P1 });
        assert_eq!(state, before);
    }

    #[test]
    fn test_respond_requires_entry() {
        let (mut state, mut chain) = setup();
        let err = chain.respond_to_stack(&mut state, Effect::ability("R"), P1).unwrap_err();
        assert_eq!(err, RulesError::EmptyStack);
    }

    #[test]
    fn test_both_pass_resolves_lifo() {
        let (mut state, mut chain) = setup();
        let first = chain.add_to_stack(&mut state, Effect::ability("first"), P1).unwrap();
        let second = chain.respond_to_stack(&mut state, Effect::ability("second"), P2).unwrap();

        assert_eq!(
            chain.pass_priority(&mut state, P1).unwrap(),
            ResolutionStatus::WaitingForPriority(P2)
        );
        assert_eq!(
            chain.pass_priority(&mut state, P2).unwrap(),
            ResolutionStatus::Resolved {
                entry: second,
                next_priority: P1
            }
        );

        chain.pass_priority(&mut state, P1).unwrap();
        assert_eq!(chain.pass_priority(&mut state, P2).unwrap(), ResolutionStatus::Complete);

        assert_eq!(chain.observer().resolved(), vec![second, first]);
        assert_eq!(state.chain.phase(), ChainPhase::Complete);
        assert_eq!(chain.observer().events.last(), Some(&crate::stack::ChainEvent::Complete));
    }

    #[test]
    fn test_responder_pass_resolves_immediately() {
        let mut state = GameState::new();
        let mut chain = ResolutionChain::new()
            .with_trigger(ResolutionTrigger::ResponderPass)
            .with_observer(RecordingObserver::new());
        chain.initialize(&mut state, P1);

        let id = chain.add_to_stack(&mut state, Effect::ability("A"), P1).unwrap();
        let status = chain.pass_priority(&mut state, P2).unwrap();

        assert_eq!(status, ResolutionStatus::Complete);
        assert_eq!(chain.observer().resolved(), vec![id]);
        assert_eq!(state.priority_player(), P1);
    }

    #[test]
    fn test_responder_pass_source_player_pass_does_not_resolve() {
        let mut state = GameState::new();
        let mut chain = ResolutionChain::new().with_trigger(ResolutionTrigger::ResponderPass);
        chain.initialize(&mut state, P1);

        chain.add_to_stack(&mut state, Effect::ability("A"), P1).unwrap();
        chain.respond_to_stack(&mut state, Effect::ability("B"), P2).unwrap();

        // P1 did not add the top entry (P2 did), so P1's pass resolves it.
        assert!(matches!(
            chain.pass_priority(&mut state, P1).unwrap(),
            ResolutionStatus::Resolved { .. }
        ));
        // Priority returns to P1, who added the remaining entry.
        assert_eq!(
            chain.pass_priority(&mut state, P1).unwrap(),
            ResolutionStatus::WaitingForPriority(P2)
        );
        assert_eq!(chain.pass_priority(&mut state, P2).unwrap(), ResolutionStatus::Complete);
    }

    #[test]
    fn test_unauthorized_pass_is_noop() {
        let (mut state, mut chain) = setup();
        chain.add_to_stack(&mut state, Effect::ability("A"), P1).unwrap();
        let before = state.clone();

        let err = chain.pass_priority(&mut state, P1).unwrap_err();

        assert!(matches!(err, RulesError::PriorityViolation { .. }));
        assert_eq!(state, before);
    }

    #[test]
    fn test_addition_resets_passes() {
        let (mut state, mut chain) = setup();
        chain.add_to_stack(&mut state, Effect::ability("A"), P1).unwrap();
        chain.pass_priority(&mut state, P2).unwrap();
        assert_eq!(state.chain.consecutive_passes(), 1);

        chain.respond_to_stack(&mut state, Effect::ability("B"), P1).unwrap();
        assert_eq!(state.chain.consecutive_passes(), 0);
        assert_eq!(
            chain.pass_priority(&mut state, P2).unwrap(),
            ResolutionStatus::WaitingForPriority(P1)
        );
    }

    #[test]
    fn test_resolving_guard() {
        let (mut state, mut chain) = setup();
        state.chain.is_resolving = true;

        assert_eq!(
            chain.pass_priority(&mut state, P1).unwrap_err(),
            RulesError::ResolutionInProgress
        );
        assert_eq!(
            chain.add_to_stack(&mut state, Effect::ability("A"), P1).unwrap_err(),
            RulesError::ResolutionInProgress
        );
    }

    #[test]
    fn test_empty_stack_double_pass_completes() {
        let (mut state, mut chain) = setup();
        assert_eq!(
            chain.pass_priority(&mut state, P1).unwrap(),
            ResolutionStatus::WaitingForPriority(P2)
        );
        assert_eq!(chain.pass_priority(&mut state, P2).unwrap(), ResolutionStatus::Complete);
    }

    #[test]
    fn test_start_new_chain_discards_stack() {
        let (mut state, mut chain) = setup();
        chain.add_to_stack(&mut state, Effect::ability("A"), P1).unwrap();

        chain.start_new_chain(&mut state, P2);

        assert!(state.chain.is_empty());
        assert_eq!(state.active_player, P2);
        assert_eq!(state.priority_player(), P2);
        assert_eq!(state.chain.phase(), ChainPhase::Idle);
    }

    #[test]
    fn test_summon_resolves_onto_field() {
        let (mut state, mut chain) = setup();
        let card = Card::new(CardId::new(1), "Warden", CardType::Familiar)
            .with_keyword(Keyword::Steadfast);
        let instance = CardInstance::new(InstanceId::new(50), card, P1);

        chain
            .add_to_stack(&mut state, Effect::play_card(instance, PlayMethod::Summon), P1)
            .unwrap();
        chain.pass_priority(&mut state, P2).unwrap();
        chain.pass_priority(&mut state, P1).unwrap();

        assert_eq!(state.player(P1).field.len(), 1);
        assert!(state.log.iter().any(|line| line == "Warden enters Player 1's field"));
    }

    #[test]
    fn test_spell_goes_to_deck_bottom() {
        let (mut state, mut chain) = setup();
        let top = state.new_instance(Card::new(CardId::new(9), "Top", CardType::Familiar), P1);
        state.player_mut(P1).deck.push_back(top);
        let spell = CardInstance::new(
            InstanceId::new(60),
            Card::new(CardId::new(2), "Bolt", CardType::Spell),
            P1,
        );

        chain
            .add_to_stack(&mut state, Effect::play_card(spell, PlayMethod::Spell), P1)
            .unwrap();
        chain.pass_priority(&mut state, P2).unwrap();
        chain.pass_priority(&mut state, P1).unwrap();

        let deck = &state.player(P1).deck;
        assert_eq!(deck.len(), 2);
        assert_eq!(deck[0].id, InstanceId::new(60));
        assert!(state.player(P1).field.is_empty());
    }

    #[test]
    fn test_resolve_immediately_skips_stack() {
        let (mut state, mut chain) = setup();
        chain.add_to_stack(&mut state, Effect::ability("pending"), P1).unwrap();
        let card = Card::new(CardId::new(3), "Phoenix", CardType::Familiar)
            .with_keyword(Keyword::Gust);
        let instance = CardInstance::new(InstanceId::new(70), card, P2);

        let id = chain
            .resolve_immediately(&mut state, Effect::play_card(instance, PlayMethod::Burst), P2)
            .unwrap();

        assert_eq!(state.chain.len(), 1);
        assert_eq!(state.priority_player(), P2);
        assert!(state.player(P2).field[0].burst_played);
        assert!(state.pending_choices.is_empty());
        assert_eq!(chain.observer().resolved(), vec![id]);
    }

    #[test]
    fn test_azoth_method_not_stackable() {
        let (mut state, mut chain) = setup();
        let instance = CardInstance::new(
            InstanceId::new(1),
            Card::new(CardId::new(1), "Ember", CardType::Familiar),
            P1,
        );

        let err = chain
            .add_to_stack(&mut state, Effect::play_card(instance, PlayMethod::Azoth), P1)
            .unwrap_err();
        assert!(matches!(err, RulesError::IllegalPlay(_)));
        assert!(state.chain.is_empty());
    }
}
