//! Resolution chain integration tests.
//!
//! These tests drive the chain directly against a `GameState`, covering
//! LIFO ordering, priority handoff, both resolution triggers and Burst.

use konivrer_rules::cards::{Card, CardId, CardType, Element, Keyword};
use konivrer_rules::core::{GameState, PlayerId, ResolutionTrigger};
use konivrer_rules::error::{Result, RulesError};
use konivrer_rules::keywords::{KeywordHandler, KeywordResolver, PlayContext, PlayMethod};
use konivrer_rules::stack::{
    ChainEvent, ChainPhase, Effect, RecordingObserver, ResolutionChain, ResolutionStatus,
};

const P1: PlayerId = PlayerId::FIRST;
const P2: PlayerId = PlayerId::SECOND;

fn setup() -> (GameState, ResolutionChain<RecordingObserver>) {
    let mut state = GameState::new();
    let mut chain = ResolutionChain::new().with_observer(RecordingObserver::new());
    chain.initialize(&mut state, P1);
    (state, chain)
}

fn familiar(name: &str) -> Card {
    Card::new(CardId::new(1), name, CardType::Familiar)
        .with_element(Element::Earth)
        .with_power(1)
}

// =============================================================================
// Ordering
// =============================================================================

/// Three nested responses resolve newest first.
#[test]
fn test_lifo_resolution_order() {
    let (mut state, mut chain) = setup();

    let a = chain.add_to_stack(&mut state, Effect::ability("A"), P1).unwrap();
    let b = chain.respond_to_stack(&mut state, Effect::ability("B"), P2).unwrap();
    let c = chain.respond_to_stack(&mut state, Effect::ability("C"), P1).unwrap();

    let mut holder = state.priority_player();
    let mut last = ResolutionStatus::WaitingForPriority(holder);
    while last != ResolutionStatus::Complete {
        last = chain.pass_priority(&mut state, holder).unwrap();
        holder = state.priority_player();
    }

    assert_eq!(chain.observer().resolved(), vec![c, b, a]);
    assert!(state.chain.is_empty());
    assert_eq!(state.chain.phase(), ChainPhase::Complete);
    assert_eq!(chain.observer().events.last(), Some(&ChainEvent::Complete));
}

/// Resolving hands priority back to the active player.
#[test]
fn test_priority_returns_to_active_player() {
    let (mut state, mut chain) = setup();
    chain.add_to_stack(&mut state, Effect::ability("A"), P1).unwrap();
    chain.respond_to_stack(&mut state, Effect::ability("B"), P2).unwrap();

    assert_eq!(chain.pass_priority(&mut state, P1).unwrap(), ResolutionStatus::WaitingForPriority(P2));
    let status = chain.pass_priority(&mut state, P2).unwrap();

    assert!(matches!(status, ResolutionStatus::Resolved { next_priority, .. } if next_priority == P1));
    assert_eq!(state.chain.phase(), ChainPhase::AwaitingResponse(P1));
    assert_eq!(state.chain.consecutive_passes(), 0);
}

/// A response between passes resets the pass count.
#[test]
fn test_response_resets_passes() {
    let (mut state, mut chain) = setup();
    chain.add_to_stack(&mut state, Effect::ability("A"), P1).unwrap();

    chain.pass_priority(&mut state, P2).unwrap();
    chain.respond_to_stack(&mut state, Effect::ability("B"), P1).unwrap();

    assert_eq!(state.chain.consecutive_passes(), 0);
    assert_eq!(state.chain.len(), 2);
    let status = chain.pass_priority(&mut state, P2).unwrap();
    assert_eq!(status, ResolutionStatus::WaitingForPriority(P1));
}

// =============================================================================
// Priority enforcement
// =============================================================================

/// Passing out of turn is rejected and changes nothing.
#[test]
fn test_unauthorized_pass() {
    let (mut state, mut chain) = setup();
    chain.add_to_stack(&mut state, Effect::ability("A"), P1).unwrap();
    let before = state.clone();

    let err = chain.pass_priority(&mut state, P1).unwrap_err();

    assert_eq!(err, RulesError::PriorityViolation { player: P1, holder: P2 });
    assert_eq!(state, before);
}

/// Gust handler that always fails.
struct Jammed;

impl KeywordHandler for Jammed {
    fn keyword(&self) -> Keyword {
        Keyword::Gust
    }

    fn on_play(&self, _state: &mut GameState, _ctx: &PlayContext) -> Result<()> {
        Err(RulesError::IllegalPlay("jammed".to_string()))
    }
}

/// A resolution that fails leaves the pass uncounted and the log untouched.
#[test]
fn test_failed_resolution_restores_pass() {
    let mut state = GameState::new();
    let mut chain = ResolutionChain::new().with_keywords(KeywordResolver::new().with_handler(Jammed));
    chain.initialize(&mut state, P1);

    let instance = state.new_instance(familiar("Gale Hound").with_keyword(Keyword::Gust), P1);
    chain
        .add_to_stack(&mut state, Effect::play_card(instance, PlayMethod::Summon), P1)
        .unwrap();
    chain.pass_priority(&mut state, P2).unwrap();
    assert_eq!(state.chain.consecutive_passes(), 1);
    let before = state.clone();

    let err = chain.pass_priority(&mut state, P1).unwrap_err();

    assert_eq!(err, RulesError::IllegalPlay("jammed".to_string()));
    assert_eq!(state, before);
    assert_eq!(state.chain.consecutive_passes(), 1);
    assert_eq!(state.chain.len(), 1);
    assert_eq!(state.priority_player(), P1);
}

/// Passing on an empty stack twice completes the chain.
#[test]
fn test_empty_stack_passes() {
    let (mut state, mut chain) = setup();

    assert_eq!(chain.pass_priority(&mut state, P1).unwrap(), ResolutionStatus::WaitingForPriority(P2));
    assert_eq!(chain.pass_priority(&mut state, P2).unwrap(), ResolutionStatus::Complete);
}

// =============================================================================
// Triggers
// =============================================================================

/// Under `ResponderPass`, one pass by the responder resolves the top.
#[test]
fn test_responder_pass_trigger() {
    let mut state = GameState::new();
    let mut chain = ResolutionChain::new().with_trigger(ResolutionTrigger::ResponderPass);
    chain.initialize(&mut state, P1);

    chain.add_to_stack(&mut state, Effect::ability("A"), P1).unwrap();
    let status = chain.pass_priority(&mut state, P2).unwrap();

    assert_eq!(status, ResolutionStatus::Complete);
    assert_eq!(state.log.last(), Some("A resolves"));
}

/// Under `ResponderPass`, the controller passing its own entry does not
/// resolve it.
#[test]
fn test_responder_pass_ignores_controller() {
    let mut state = GameState::new();
    let mut chain = ResolutionChain::new().with_trigger(ResolutionTrigger::ResponderPass);
    chain.initialize(&mut state, P1);

    chain.add_to_stack(&mut state, Effect::ability("A"), P1).unwrap();
    chain.respond_to_stack(&mut state, Effect::ability("B"), P2).unwrap();
    let status = chain.pass_priority(&mut state, P1).unwrap();

    assert!(matches!(status, ResolutionStatus::Resolved { .. }));
    assert_eq!(state.chain.len(), 1);
    let status = chain.pass_priority(&mut state, P1).unwrap();
    assert_eq!(status, ResolutionStatus::WaitingForPriority(P2));
}

// =============================================================================
// Card effects
// =============================================================================

/// A summoned Familiar enters the field when its entry resolves.
#[test]
fn test_summon_resolves_to_field() {
    let (mut state, mut chain) = setup();
    let instance = state.new_instance(familiar("Stone Sentry"), P1);
    let id = instance.id;

    chain
        .add_to_stack(&mut state, Effect::play_card(instance, PlayMethod::Summon), P1)
        .unwrap();
    assert!(state.player(P1).field.is_empty());

    chain.pass_priority(&mut state, P2).unwrap();
    chain.pass_priority(&mut state, P1).unwrap();

    assert_eq!(state.player(P1).field[0].id, id);
    assert!(state.log.iter().any(|line| line == "Stone Sentry enters Player 1's field"));
}

/// Burst resolves at once: the stack and priority are untouched and the
/// card's keywords never fire.
#[test]
fn test_burst_bypasses_stack() {
    let (mut state, mut chain) = setup();
    state.add_to_field(P2, familiar("Target"));
    chain.add_to_stack(&mut state, Effect::ability("Pending"), P1).unwrap();
    let stack_before = state.chain.clone();

    let card = familiar("Gale Hound").with_keyword(Keyword::Gust);
    let mut instance = state.new_instance(card, P2);
    instance.counters = 3;

    chain
        .resolve_immediately(&mut state, Effect::play_card(instance, PlayMethod::Burst), P2)
        .unwrap();

    assert_eq!(state.chain.stack(), stack_before.stack());
    assert_eq!(state.priority_player(), P2);
    assert!(state.pending_choices.is_empty());

    let burst = state.player(P2).field.iter().find(|c| c.name() == "Gale Hound").unwrap();
    assert!(burst.burst_played);
    assert_eq!(burst.strength(), 4);
}

/// Starting a new chain discards leftovers and gives the new active
/// player priority.
#[test]
fn test_start_new_chain() {
    let (mut state, mut chain) = setup();
    chain.add_to_stack(&mut state, Effect::ability("A"), P1).unwrap();

    chain.start_new_chain(&mut state, P2);

    assert!(state.chain.is_empty());
    assert_eq!(state.active_player, P2);
    assert_eq!(state.priority_player(), P2);
    assert_eq!(state.chain.phase(), ChainPhase::Idle);
    assert_eq!(state.log.last(), Some("New chain: Player 2 has priority"));
}

/// Observer callbacks arrive in protocol order.
#[test]
fn test_observer_events() {
    let (mut state, mut chain) = setup();
    let a = chain.add_to_stack(&mut state, Effect::ability("A"), P1).unwrap();
    chain.pass_priority(&mut state, P2).unwrap();
    chain.pass_priority(&mut state, P1).unwrap();

    assert_eq!(
        chain.observer().events,
        vec![
            ChainEvent::StackUpdated { size: 1 },
            ChainEvent::ResponseRequested { player: P2, top: a },
            ChainEvent::ResponseRequested { player: P1, top: a },
            ChainEvent::Resolved { entry: a },
            ChainEvent::Complete,
        ]
    );
}
