//! A match between two players.
//!
//! `GameSession` owns the `GameState` and routes every player action
//! through the ledger, the keyword resolver and the resolution chain,
//! enforcing turn structure on top of them.
//!
//! ## Setup
//!
//! Each deck is shuffled from its own stream of the session's seeded RNG.
//! The first Flag card is set aside as the deck's identity, the bottom
//! cards become Life Cards, and both players draw their opening hand.
//!
//! ## Damage
//!
//! Damage to a player reveals that many Life Cards from the top. Each
//! revealed card may be played for free (`burst`) or put into hand
//! (`claim_revealed`); the rest are discarded when the turn ends. A player
//! whose last Life Card is revealed loses.

use tracing::{info, warn};

use super::phase::TurnPhase;
use crate::azoth::{AzothLedger, AzothPayment};
use crate::cards::{Card, CardCatalog, CardId, CardInstance, CardType, Element, ElementCounts, Keyword};
use crate::core::{
    GameRng, GameRngState, GameState, InstanceId, MatchConfig, PlayerId, PlayerMap, Zone,
};
use crate::error::{Result, RulesError};
use crate::keywords::{Choice, PlayMethod};
use crate::stack::{ChainObserver, Effect, NoopObserver, ResolutionChain, ResolutionStatus, StackEntryId};

/// One match: state, rules components and configuration.
///
/// ## Example
///
/// ```
/// use konivrer_rules::cards::{Card, CardId, CardType, Element};
/// use konivrer_rules::core::{MatchConfig, PlayerId, PlayerMap};
/// use konivrer_rules::game::{GameSession, TurnPhase};
///
/// let deck: Vec<Card> = (0..12)
///     .map(|i| Card::new(CardId::new(i), format!("Card {i}"), CardType::Familiar).with_element(Element::Fire))
///     .collect();
/// let session = GameSession::new(
///     MatchConfig::default(),
///     PlayerMap::from_pair(deck.clone(), deck),
///     7,
/// );
///
/// let state = session.state();
/// assert_eq!(state.phase, TurnPhase::Start);
/// assert_eq!(state.player(PlayerId::FIRST).hand.len(), 2);
/// assert_eq!(state.player(PlayerId::FIRST).life_cards.len(), 4);
/// ```
pub struct GameSession<O = NoopObserver> {
    config: MatchConfig,
    state: GameState,
    chain: ResolutionChain<O>,
    rng: GameRng,
}

impl GameSession<NoopObserver> {
    #[must_use]
    pub fn new(config: MatchConfig, decks: PlayerMap<Vec<Card>>, seed: u64) -> Self {
        Self::with_chain(config, decks, seed, ResolutionChain::new())
    }

    /// Build both decks from catalog IDs.
    pub fn from_catalog(
        config: MatchConfig,
        catalog: &CardCatalog,
        deck_lists: &PlayerMap<Vec<CardId>>,
        seed: u64,
    ) -> Result<Self> {
        let decks = PlayerMap::from_pair(
            catalog.deck(&deck_lists[PlayerId::FIRST])?,
            catalog.deck(&deck_lists[PlayerId::SECOND])?,
        );
        Ok(Self::new(config, decks, seed))
    }
}

impl<O: ChainObserver> GameSession<O> {
    /// Set up a match using `chain` (custom observer or keyword handlers).
    ///
    /// The chain's resolution trigger is taken from `config`.
    pub fn with_chain(
        config: MatchConfig,
        mut decks: PlayerMap<Vec<Card>>,
        seed: u64,
        chain: ResolutionChain<O>,
    ) -> Self {
        let mut session = Self {
            chain: chain.with_trigger(config.resolution_trigger),
            config,
            state: GameState::new(),
            rng: GameRng::new(seed),
        };

        session.state.log.push("Game started");
        for player in PlayerId::BOTH {
            let cards = std::mem::take(&mut decks[player]);
            session.setup_player(player, cards);
        }
        for player in PlayerId::BOTH {
            session.state.draw_cards(player, session.config.opening_hand);
        }

        session.chain.initialize(&mut session.state, PlayerId::FIRST);
        session.begin_turn(PlayerId::FIRST);
        info!(seed, "match started");
        session
    }

    fn setup_player(&mut self, player: PlayerId, mut cards: Vec<Card>) {
        self.rng
            .for_context(&format!("deck-{}", player.index()))
            .shuffle(&mut cards);

        let flag = cards
            .iter()
            .position(|card| card.card_type == CardType::Flag)
            .map(|index| cards.remove(index));
        let flag = flag.map(|card| self.state.new_instance(card, player));

        let mut instances: Vec<CardInstance> = cards
            .into_iter()
            .map(|card| self.state.new_instance(card, player))
            .collect();
        let life_count = self.config.life_cards.min(instances.len());
        let deck = instances.split_off(life_count);

        let zones = self.state.player_mut(player);
        zones.flag = flag;
        zones.life_cards = instances.into_iter().collect();
        zones.deck = deck.into_iter().collect();
    }

    // === Accessors ===

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub fn chain(&self) -> &ResolutionChain<O> {
        &self.chain
    }

    #[must_use]
    pub fn observer(&self) -> &O {
        self.chain.observer()
    }

    /// RNG state, for saving a match.
    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.state.winner
    }

    // === Playing cards ===

    /// Play a card from hand (or a revealed Life Card, for Burst).
    ///
    /// Azoth placement uses the card's primary element; `overpay` only
    /// applies to Summon and Spell. Returns the stack entry, if any.
    pub fn play_card(
        &mut self,
        player: PlayerId,
        card: InstanceId,
        method: PlayMethod,
        overpay: u32,
    ) -> Result<Option<StackEntryId>> {
        match method {
            PlayMethod::Summon => self.summon(player, card, overpay).map(Some),
            PlayMethod::Spell => self.cast_spell(player, card, overpay).map(Some),
            PlayMethod::Burst => self.burst(player, card).map(Some),
            PlayMethod::Azoth => {
                let element = self
                    .state
                    .player(player)
                    .find(Zone::Hand, card)
                    .map_or(Element::Generic, |c| c.card.primary_element());
                self.place_azoth(player, card, element).map(|()| None)
            }
        }
    }

    /// Summon a Familiar from hand, paying its cost plus `overpay`
    /// generic Azoth (each becomes a +1 counter).
    pub fn summon(&mut self, player: PlayerId, card: InstanceId, overpay: u32) -> Result<StackEntryId> {
        self.ensure_can_act()?;
        self.ensure_active(player, "summon")?;
        if !self.state.phase.is_main() {
            return Err(illegal(format!("cannot summon during the {}", self.state.phase)));
        }
        if !self.state.chain.is_empty() {
            return Err(illegal("cannot summon while the stack is not empty".to_string()));
        }
        self.play_from_hand(player, card, PlayMethod::Summon, overpay)
    }

    /// Cast a card from hand as a Spell. Allowed whenever `player` holds
    /// priority, including in response to the stack.
    pub fn cast_spell(&mut self, player: PlayerId, card: InstanceId, overpay: u32) -> Result<StackEntryId> {
        self.ensure_can_act()?;
        self.play_from_hand(player, card, PlayMethod::Spell, overpay)
    }

    /// Place a card from hand in the Azoth Row as `element`.
    pub fn place_azoth(&mut self, player: PlayerId, card: InstanceId, element: Element) -> Result<()> {
        self.ensure_can_act()?;
        self.ensure_active(player, "place Azoth")?;
        if !self.state.phase.allows_azoth() || !self.state.chain.is_empty() {
            return Err(illegal(format!("cannot place Azoth during the {}", self.state.phase)));
        }
        if let Some(limit) = self.config.azoth_per_turn {
            if self.state.player(player).azoth_placed_this_turn >= limit {
                return Err(illegal(format!("{player} already placed {limit} Azoth this turn")));
            }
        }

        let definition = self.hand_card(player, card)?;
        self.chain.keywords().validate_play(&definition, PlayMethod::Azoth)?;
        let source = self.chain.keywords().azoth_source(&definition, element)?;
        AzothLedger::play_card_as_azoth(&mut self.state, player, card, source)?;

        if self.config.draw_after_play {
            self.state.draw_cards(player, 1);
        }
        Ok(())
    }

    /// Play a revealed Life Card for free. It resolves at once with +1
    /// counters equal to the Life Cards remaining; its keywords never
    /// trigger.
    pub fn burst(&mut self, player: PlayerId, card: InstanceId) -> Result<StackEntryId> {
        self.ensure_can_act()?;
        let definition = match self.state.player(player).find(Zone::Revealed, card) {
            Some(instance) => instance.card.clone(),
            None => return Err(self.state.card_not_found(player, card, Zone::Revealed)),
        };
        self.chain.keywords().validate_play(&definition, PlayMethod::Burst)?;

        let snapshot = self.state.clone();
        let result = self.burst_from_revealed(player, card);
        if result.is_err() {
            self.state = snapshot;
        }
        result
    }

    fn burst_from_revealed(&mut self, player: PlayerId, card: InstanceId) -> Result<StackEntryId> {
        let mut instance = self.state.take_from_zone(player, Zone::Revealed, card)?;
        let remaining = self.state.player(player).life_cards.len() as u32;
        instance.counters = remaining;
        self.state.log.push(format!(
            "{player} played {} via Burst with {remaining} +1 counters",
            instance.name()
        ));
        self.chain
            .resolve_immediately(&mut self.state, Effect::play_card(instance, PlayMethod::Burst), player)
    }

    /// Put a revealed Life Card into its owner's hand.
    pub fn claim_revealed(&mut self, player: PlayerId, card: InstanceId) -> Result<()> {
        self.ensure_can_act()?;
        let instance = self.state.take_from_zone(player, Zone::Revealed, card)?;
        self.state
            .log
            .push(format!("{player} put {} in their hand", instance.name()));
        self.state.player_mut(player).hand.push_back(instance);
        Ok(())
    }

    fn play_from_hand(
        &mut self,
        player: PlayerId,
        card: InstanceId,
        method: PlayMethod,
        overpay: u32,
    ) -> Result<StackEntryId> {
        self.chain.ensure_priority(&self.state, player)?;
        let definition = self.hand_card(player, card)?;
        self.chain.keywords().validate_play(&definition, method)?;

        let base = definition.element_cost;
        let Some(generic) = base.generic().checked_add(overpay) else {
            return Err(illegal(format!("cannot overpay {} by {overpay}", definition.name)));
        };
        let cost = base.with(Element::Generic, generic);

        let snapshot = self.state.clone();
        let result = self.pay_and_stack(player, card, method, &cost);
        if result.is_err() {
            self.state = snapshot;
        }
        result
    }

    fn pay_and_stack(
        &mut self,
        player: PlayerId,
        card: InstanceId,
        method: PlayMethod,
        cost: &ElementCounts,
    ) -> Result<StackEntryId> {
        let payment = if cost.is_empty() {
            AzothPayment::default()
        } else {
            AzothLedger::pay_card_cost(&mut self.state, player, cost)?
        };
        let mut instance = self.state.take_from_zone(player, Zone::Hand, card)?;
        instance.counters = AzothLedger::calculate_strength(payment.total(), &instance.card.element_cost);
        instance.azoth_spent = payment.spent;

        let verb = if method == PlayMethod::Summon { "summoned" } else { "cast" };
        self.state.log.push(format!(
            "{player} {verb} {} with {} +1 counters",
            instance.name(),
            instance.counters
        ));

        let effect = Effect::play_card(instance, method);
        let entry = if self.state.chain.is_empty() {
            self.chain.add_to_stack(&mut self.state, effect, player)?
        } else {
            self.chain.respond_to_stack(&mut self.state, effect, player)?
        };

        if self.config.draw_after_play {
            self.state.draw_cards(player, 1);
        }
        Ok(entry)
    }

    // === Chain ===

    /// Put a non-card ability on the stack.
    pub fn add_ability(&mut self, player: PlayerId, description: impl Into<String>) -> Result<StackEntryId> {
        self.ensure_can_act()?;
        let effect = Effect::ability(description);
        if self.state.chain.is_empty() {
            self.chain.add_to_stack(&mut self.state, effect, player)
        } else {
            self.chain.respond_to_stack(&mut self.state, effect, player)
        }
    }

    pub fn pass_priority(&mut self, player: PlayerId) -> Result<ResolutionStatus> {
        self.ensure_can_act()?;
        self.chain.pass_priority(&mut self.state, player)
    }

    /// Answer a keyword choice.
    pub fn resolve_choice(&mut self, player: PlayerId, choice: Choice) -> Result<()> {
        if self.state.is_over() {
            return Err(illegal("the game is over".to_string()));
        }
        self.chain.keywords().resolve_choice(&mut self.state, player, choice)
    }

    // === Turn structure ===

    /// Move the active player to the next phase.
    ///
    /// Leaving Post-Combat runs the Refresh Phase and ends the turn; the
    /// returned phase is then the opponent's Start Phase.
    pub fn advance_phase(&mut self, player: PlayerId) -> Result<TurnPhase> {
        self.ensure_can_act()?;
        self.ensure_active(player, "change phase")?;
        if !self.state.chain.is_empty() {
            return Err(illegal("the stack must be empty to change phase".to_string()));
        }

        let next = self.state.phase.next();
        self.state.phase = next;
        self.state.log.push(format!("{player} enters {next}"));

        if next == TurnPhase::Refresh {
            self.end_turn();
        }
        Ok(self.state.phase)
    }

    fn end_turn(&mut self) {
        let active = self.state.active_player;
        AzothLedger::refresh_azoth(&mut self.state, active);

        for player in PlayerId::BOTH {
            let zones = self.state.player_mut(player);
            let revealed = std::mem::take(&mut zones.revealed);
            let count = revealed.len();
            zones.discard.append(revealed);
            zones.azoth_placed_this_turn = 0;
            zones.attacked_this_turn.clear();
            if count > 0 {
                self.state
                    .log
                    .push(format!("{player} discarded {count} revealed Life Cards"));
            }
        }

        let next = active.opponent();
        if next == PlayerId::FIRST {
            self.state.turn += 1;
        }
        self.chain.start_new_chain(&mut self.state, next);
        self.begin_turn(next);
    }

    fn begin_turn(&mut self, player: PlayerId) {
        let turn = self.state.turn;
        self.state.phase = TurnPhase::Start;
        self.state.log.push(format!("Turn {turn} begins"));
        self.state.log.push(format!("{player}'s turn"));
        self.state.log.push(format!("{player} enters {}", TurnPhase::Start));
        info!(turn, %player, "turn started");
    }

    // === Combat ===

    /// Attack the opponent with a Familiar. Returns the damage dealt.
    ///
    /// Damage is the attacker's strength adjusted for elemental advantage
    /// against the defender's Flag, plus Inferno bonuses.
    pub fn attack(&mut self, player: PlayerId, attacker: InstanceId) -> Result<u32> {
        self.ensure_can_act()?;
        self.ensure_active(player, "attack")?;
        if self.state.phase != TurnPhase::Combat {
            return Err(illegal(format!("cannot attack during the {}", self.state.phase)));
        }
        if !self.state.chain.is_empty() {
            return Err(illegal("cannot attack while the stack is not empty".to_string()));
        }
        let card = match self.state.player(player).find(Zone::Field, attacker) {
            Some(card) => card.clone(),
            None => return Err(self.state.card_not_found(player, attacker, Zone::Field)),
        };
        if self.state.player(player).attacked_this_turn.contains(&attacker) {
            return Err(illegal(format!("{} already attacked this turn", card.name())));
        }

        let defender = player.opponent();
        let defender_element = self
            .state
            .player(defender)
            .flag
            .as_ref()
            .map_or(Element::Generic, |flag| flag.card.primary_element());

        let mut damage = AzothLedger::calculate_elemental_damage(
            card.card.primary_element(),
            defender_element,
            card.strength(),
        );
        damage = damage.saturating_add(card.inferno_bonus);
        if self.state.player(player).synergy(Keyword::Inferno) >= 2 {
            damage = damage.saturating_add(1);
        }

        self.state.player_mut(player).attacked_this_turn.push(attacker);
        self.state
            .log
            .push(format!("{} attacks {defender} for {damage} damage", card.name()));
        self.damage_player(defender, damage, Some(player));
        Ok(damage)
    }

    /// Deal damage to a player, revealing Life Cards from the top.
    ///
    /// Steadfast prevention and redirection apply first. Returns the
    /// revealed cards.
    pub fn damage_player(
        &mut self,
        target: PlayerId,
        amount: u32,
        source: Option<PlayerId>,
    ) -> Vec<InstanceId> {
        if self.state.is_over() {
            return Vec::new();
        }

        let mut amount = amount;
        if amount > 0 && self.state.player(target).synergy(Keyword::Steadfast) >= 2 {
            amount -= 1;
            self.state
                .log
                .push(format!("Steadfast synergy prevents 1 damage to {target}"));
        }

        let mut redirected = Vec::new();
        let mut destroyed = Vec::new();
        for card in self.state.player_mut(target).field.iter_mut() {
            if amount == 0 {
                break;
            }
            let absorbed = amount.min(card.steadfast_redirect).min(card.strength());
            if absorbed > 0 {
                card.steadfast_redirect -= absorbed;
                card.damage += absorbed;
                amount -= absorbed;
                redirected.push(format!("{} redirects {absorbed} damage to its Strength", card.name()));
                if card.strength() == 0 {
                    destroyed.push(card.id);
                }
            }
        }
        for entry in redirected {
            self.state.log.push(entry);
        }
        let refresh_synergies = !destroyed.is_empty();
        for id in destroyed {
            if let Ok(mut card) = self.state.take_from_zone(target, Zone::Field, id) {
                self.state
                    .log
                    .push(format!("{} is put into {target}'s discard pile", card.name()));
                card.reset();
                self.state.player_mut(target).discard.push_back(card);
            }
        }
        if refresh_synergies {
            self.chain.keywords().check_keyword_synergies(&mut self.state, target);
        }

        if amount > 0 && self.state.player(target).life_cards.is_empty() {
            self.state
                .log
                .push(format!("{target} has no Life Cards remaining!"));
        }

        let mut revealed = Vec::new();
        for _ in 0..amount {
            let Some(card) = self.state.player_mut(target).life_cards.pop_back() else {
                break;
            };
            self.state
                .log
                .push(format!("{target} revealed {} as a Life Card", card.name()));
            revealed.push(card.id);
            self.state.player_mut(target).revealed.push_back(card);
        }

        if amount > 0 && self.state.player(target).life_cards.is_empty() {
            let winner = source.unwrap_or_else(|| target.opponent());
            self.state.winner = Some(winner);
            self.state.log.push(format!("{winner} wins the game!"));
            info!(%winner, "game over");
        }
        revealed
    }

    // === Checks ===

    fn ensure_can_act(&self) -> Result<()> {
        if let Some(winner) = self.state.winner {
            return Err(illegal(format!("the game is over; {winner} won")));
        }
        if let Some(choice) = self.state.pending_choices.front() {
            return Err(illegal(format!(
                "{} must answer {} from {} first",
                choice.player,
                choice.keyword(),
                choice.source_name
            )));
        }
        Ok(())
    }

    fn ensure_active(&self, player: PlayerId, action: &str) -> Result<()> {
        let active = self.state.active_player;
        if player != active {
            return Err(illegal(format!("{player} cannot {action} during {active}'s turn")));
        }
        Ok(())
    }

    /// The definition of a card in hand; a missing card is logged.
    fn hand_card(&mut self, player: PlayerId, card: InstanceId) -> Result<Card> {
        match self.state.player(player).find(Zone::Hand, card) {
            Some(instance) => Ok(instance.card.clone()),
            None => Err(self.state.card_not_found(player, card, Zone::Hand)),
        }
    }
}

fn illegal(reason: String) -> RulesError {
    warn!(%reason, "illegal play rejected");
    RulesError::IllegalPlay(reason)
}
