//! Built-in keyword handlers.
//!
//! ## Handlers
//!
//! - [`Displace`]: Brilliance, Gust, Submerged, Void (move a target card)
//! - [`Empower`]: Inferno, Steadfast (mark the played card)
//! - [`Amalgam`]: keyword choice on summon, element choice as Azoth
//! - [`Quintessence`]: wildcard Azoth, never summoned

use super::choice::{ChoiceKind, PendingChoice};
use super::handler::{KeywordHandler, PlayContext, PlayMethod};
use super::targeting::{legal_targets, TargetFilter};
use crate::azoth::AzothSource;
use crate::cards::{Card, CardInstance, CardType, Element, Keyword};
use crate::core::{GameState, InstanceId, PlayerId, Zone};
use crate::error::{Result, RulesError};

/// Where a displaced card ends up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Destination {
    /// Bottom of the owner's Life Cards.
    LifeCardsBottom,
    /// Owner's hand.
    Hand,
    /// Second from the top of the owner's deck.
    DeckSecond,
    /// Out of the game.
    Removed,
}

/// Moves a target card off the field.
///
/// With `paid_with` set, targets are limited to strength at most the
/// Azoth of that element spent on the source; a synergy raises the limit
/// by one per extra copy. Without it any strength is legal, and a synergy
/// lifts the immunity instead.
#[derive(Clone, Copy, Debug)]
pub struct Displace {
    keyword: Keyword,
    paid_with: Option<Element>,
    immune: Element,
    destination: Destination,
}

impl Displace {
    #[must_use]
    pub const fn brilliance() -> Self {
        Self {
            keyword: Keyword::Brilliance,
            paid_with: Some(Element::Aether),
            immune: Element::Nether,
            destination: Destination::LifeCardsBottom,
        }
    }

    #[must_use]
    pub const fn gust() -> Self {
        Self {
            keyword: Keyword::Gust,
            paid_with: Some(Element::Air),
            immune: Element::Water,
            destination: Destination::Hand,
        }
    }

    #[must_use]
    pub const fn submerged() -> Self {
        Self {
            keyword: Keyword::Submerged,
            paid_with: Some(Element::Water),
            immune: Element::Fire,
            destination: Destination::DeckSecond,
        }
    }

    #[must_use]
    pub const fn void() -> Self {
        Self {
            keyword: Keyword::Void,
            paid_with: None,
            immune: Element::Aether,
            destination: Destination::Removed,
        }
    }

    fn filter(&self, state: &GameState, player: PlayerId, ctx_spent: u32) -> TargetFilter {
        let synergy = state.player(player).synergy(self.keyword);
        match self.paid_with {
            Some(_) => TargetFilter {
                max_strength: Some(ctx_spent + synergy.saturating_sub(1) as u32),
                immune: Some(self.immune),
            },
            None => TargetFilter {
                max_strength: None,
                immune: (synergy < 2).then_some(self.immune),
            },
        }
    }

    fn place(&self, state: &mut GameState, owner: PlayerId, card: CardInstance) -> String {
        let name = card.name().to_string();
        let zones = state.player_mut(owner);
        match self.destination {
            Destination::LifeCardsBottom => {
                zones.life_cards.push_front(card);
                format!("{name} placed on the bottom of {owner}'s Life Cards")
            }
            Destination::Hand => {
                zones.hand.push_back(card);
                format!("{name} returned to {owner}'s hand")
            }
            Destination::DeckSecond => {
                let index = zones.deck.len().saturating_sub(1);
                zones.deck.insert(index, card);
                format!("{name} placed below the top of {owner}'s deck")
            }
            Destination::Removed => {
                zones.removed.push_back(card);
                format!("{name} removed from the game")
            }
        }
    }
}

impl KeywordHandler for Displace {
    fn keyword(&self) -> Keyword {
        self.keyword
    }

    fn on_play(&self, state: &mut GameState, ctx: &PlayContext) -> Result<()> {
        let spent = self.paid_with.map_or(0, |element| ctx.spent[element]);
        let filter = self.filter(state, ctx.player, spent);
        let candidates = legal_targets(state, ctx.source, &filter);

        if candidates.is_empty() {
            state.log.push(format!(
                "{} from {}: no valid targets",
                self.keyword, ctx.source_name
            ));
            return Ok(());
        }

        state.log.push(format!(
            "{} from {}: {} chooses a target",
            self.keyword, ctx.source_name, ctx.player
        ));
        state.pending_choices.push_back(ctx.pending(ChoiceKind::Target {
            keyword: self.keyword,
            candidates,
        }));
        Ok(())
    }

    fn on_target(&self, state: &mut GameState, choice: &PendingChoice, target: InstanceId) -> Result<()> {
        let owner = state.find_on_field(target).map(|(owner, _)| owner);
        let Some(owner) = owner else {
            return Err(state.card_not_found(choice.player, target, Zone::Field));
        };
        let mut card = state.take_from_zone(owner, Zone::Field, target)?;
        card.reset();

        let outcome = self.place(state, owner, card);
        state.log.push(format!("{}: {outcome}", self.keyword));
        Ok(())
    }

    fn on_synergy(&self, state: &mut GameState, player: PlayerId, count: usize) {
        let effect = match self.paid_with {
            Some(_) => format!("strength limit +{}", count - 1),
            None => format!("ignores {} immunity", self.immune),
        };
        state
            .log
            .push(format!("{player}: {} synergy x{count}, {effect}", self.keyword));
    }
}

/// Marks the played card with an amount equal to the Azoth of one
/// element spent on it.
#[derive(Clone, Copy)]
pub struct Empower {
    keyword: Keyword,
    element: Element,
    apply: fn(&mut CardInstance, u32),
    synergy: &'static str,
}

impl Empower {
    #[must_use]
    pub fn inferno() -> Self {
        Self {
            keyword: Keyword::Inferno,
            element: Element::Fire,
            apply: |card, amount| card.inferno_bonus = amount,
            synergy: "+1 combat damage",
        }
    }

    #[must_use]
    pub fn steadfast() -> Self {
        Self {
            keyword: Keyword::Steadfast,
            element: Element::Earth,
            apply: |card, amount| card.steadfast_redirect = amount,
            synergy: "prevents 1 damage per hit",
        }
    }
}

impl KeywordHandler for Empower {
    fn keyword(&self) -> Keyword {
        self.keyword
    }

    fn on_play(&self, state: &mut GameState, ctx: &PlayContext) -> Result<()> {
        let amount = ctx.spent[self.element];
        let entry = match state.field_instance_mut(ctx.source) {
            Some(card) => {
                (self.apply)(card, amount);
                format!("{}: {} empowered by {amount} {}", self.keyword, ctx.source_name, self.element)
            }
            None => format!("{} from {}: not on the field", self.keyword, ctx.source_name),
        };
        state.log.push(entry);
        Ok(())
    }

    fn on_synergy(&self, state: &mut GameState, player: PlayerId, count: usize) {
        state.log.push(format!(
            "{player}: {} synergy x{count}, {}",
            self.keyword, self.synergy
        ));
    }
}

/// Amalgam: a keyword choice when summoned, an element choice as Azoth.
#[derive(Clone, Copy, Debug, Default)]
pub struct Amalgam;

impl KeywordHandler for Amalgam {
    fn keyword(&self) -> Keyword {
        Keyword::Amalgam
    }

    fn azoth_source(&self, card: &Card, requested: Element) -> Result<Option<AzothSource>> {
        match &card.amalgam {
            Some(options) if !options.elements.contains(&requested) => Err(RulesError::InvalidChoice(
                format!("{} cannot be placed as {requested} Azoth", card.name),
            )),
            _ => Ok(Some(AzothSource::Element(requested))),
        }
    }

    fn on_play(&self, state: &mut GameState, ctx: &PlayContext) -> Result<()> {
        let options = state
            .find_on_field(ctx.source)
            .and_then(|(_, card)| card.card.amalgam.as_ref())
            .map(|amalgam| amalgam.keywords.clone())
            .unwrap_or_default();

        if options.is_empty() {
            state
                .log
                .push(format!("Amalgam from {}: no keyword to choose", ctx.source_name));
            return Ok(());
        }

        state.log.push(format!(
            "Amalgam from {}: {} chooses a keyword",
            ctx.source_name, ctx.player
        ));
        state
            .pending_choices
            .push_back(ctx.pending(ChoiceKind::Keyword { options }));
        Ok(())
    }
}

/// Quintessence: produces any element as Azoth, never enters the field.
#[derive(Clone, Copy, Debug, Default)]
pub struct Quintessence;

impl KeywordHandler for Quintessence {
    fn keyword(&self) -> Keyword {
        Keyword::Quintessence
    }

    fn check_play(&self, card: &Card, method: PlayMethod) -> Result<()> {
        let onto_field = method == PlayMethod::Summon
            || (method == PlayMethod::Burst && card.card_type == CardType::Familiar);
        if onto_field {
            return Err(RulesError::IllegalPlay(format!(
                "{} can't be played as a Familiar",
                card.name
            )));
        }
        Ok(())
    }

    fn azoth_source(&self, _card: &Card, _requested: Element) -> Result<Option<AzothSource>> {
        Ok(Some(AzothSource::Quintessence))
    }

    fn on_play(&self, state: &mut GameState, ctx: &PlayContext) -> Result<()> {
        state
            .log
            .push(format!("Quintessence: {} has no effect outside the Azoth Row", ctx.source_name));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{AmalgamOptions, CardId, ElementCounts};
    use smallvec::smallvec;

    fn familiar(name: &str, power: u32) -> Card {
        Card::new(CardId::new(1), name, CardType::Familiar).with_power(power)
    }

    fn context(state: &GameState, source: InstanceId, spent: ElementCounts) -> PlayContext {
        let (player, instance) = state.find_on_field(source).unwrap();
        let mut ctx = PlayContext::new(player, instance, PlayMethod::Summon);
        ctx.spent = spent;
        ctx
    }

    #[test]
    fn test_gust_returns_target_to_hand() {
        let mut state = GameState::new();
        let source = state.add_to_field(PlayerId::FIRST, familiar("Zephyr", 1));
        let target = state.add_to_field(PlayerId::SECOND, familiar("Grunt", 1));
        let ctx = context(&state, source, ElementCounts::new().with(Element::Air, 1));

        let gust = Displace::gust();
        gust.on_play(&mut state, &ctx).unwrap();
        let choice = state.pending_choices.pop_front().unwrap();
        assert_eq!(
            choice.kind,
            ChoiceKind::Target {
                keyword: Keyword::Gust,
                candidates: vec![target]
            }
        );

        gust.on_target(&mut state, &choice, target).unwrap();
        assert!(state.player(PlayerId::SECOND).field.is_empty());
        assert_eq!(state.player(PlayerId::SECOND).hand[0].id, target);
        assert_eq!(state.log.last(), Some("Gust: Grunt returned to Player 2's hand"));
    }

    #[test]
    fn test_submerged_places_second_from_top() {
        let mut state = GameState::new();
        for id in 0..2 {
            let card = state.new_instance(familiar("Deck", id), PlayerId::SECOND);
            state.player_mut(PlayerId::SECOND).deck.push_back(card);
        }
        let source = state.add_to_field(PlayerId::FIRST, familiar("Tide", 0));
        let target = state.add_to_field(PlayerId::SECOND, familiar("Grunt", 0));
        let ctx = context(&state, source, ElementCounts::new());

        let submerged = Displace::submerged();
        submerged.on_play(&mut state, &ctx).unwrap();
        let choice = state.pending_choices.pop_front().unwrap();
        submerged.on_target(&mut state, &choice, target).unwrap();

        let deck = &state.player(PlayerId::SECOND).deck;
        assert_eq!(deck.len(), 3);
        assert_eq!(deck[1].id, target);
    }

    #[test]
    fn test_no_targets_fizzles() {
        let mut state = GameState::new();
        let source = state.add_to_field(PlayerId::FIRST, familiar("Lantern", 0));
        state.add_to_field(
            PlayerId::SECOND,
            familiar("Shade", 0).with_element(Element::Nether),
        );
        let ctx = context(&state, source, ElementCounts::new().with(Element::Aether, 3));

        Displace::brilliance().on_play(&mut state, &ctx).unwrap();

        assert!(state.pending_choices.is_empty());
        assert_eq!(state.log.last(), Some("Brilliance from Lantern: no valid targets"));
    }

    #[test]
    fn test_void_synergy_ignores_immunity() {
        let mut state = GameState::new();
        let source = state.add_to_field(PlayerId::FIRST, familiar("Hollow", 0));
        let aether = state.add_to_field(
            PlayerId::SECOND,
            familiar("Seraph", 5).with_element(Element::Aether),
        );
        let ctx = context(&state, source, ElementCounts::new());

        Displace::void().on_play(&mut state, &ctx).unwrap();
        assert!(state.pending_choices.is_empty());

        state.player_mut(PlayerId::FIRST).synergies.push(crate::core::ActiveSynergy {
            keyword: Keyword::Void,
            count: 2,
        });
        Displace::void().on_play(&mut state, &ctx).unwrap();
        assert_eq!(state.pending_choices[0].kind, ChoiceKind::Target {
            keyword: Keyword::Void,
            candidates: vec![aether],
        });
    }

    #[test]
    fn test_inferno_marks_instance() {
        let mut state = GameState::new();
        let source = state.add_to_field(PlayerId::FIRST, familiar("Ember", 1));
        let ctx = context(&state, source, ElementCounts::new().with(Element::Fire, 2));

        Empower::inferno().on_play(&mut state, &ctx).unwrap();

        assert_eq!(state.find_on_field(source).unwrap().1.inferno_bonus, 2);
        assert_eq!(state.log.last(), Some("Inferno: Ember empowered by 2 fire"));
    }

    #[test]
    fn test_amalgam_options() {
        let card = familiar("Idol", 1).with_amalgam(AmalgamOptions {
            keywords: smallvec![Keyword::Gust, Keyword::Inferno],
            elements: smallvec![Element::Air, Element::Fire],
        });

        assert_eq!(
            Amalgam.azoth_source(&card, Element::Fire).unwrap(),
            Some(AzothSource::Element(Element::Fire))
        );
        assert!(Amalgam.azoth_source(&card, Element::Water).is_err());

        let mut state = GameState::new();
        let source = state.add_to_field(PlayerId::FIRST, card);
        let ctx = context(&state, source, ElementCounts::new());
        Amalgam.on_play(&mut state, &ctx).unwrap();

        assert_eq!(state.pending_choices[0].keyword(), Keyword::Amalgam);
    }

    #[test]
    fn test_quintessence_rules() {
        let card = familiar("Prism", 0).with_keyword(Keyword::Quintessence);

        assert!(Quintessence.check_play(&card, PlayMethod::Summon).is_err());
        assert!(Quintessence.check_play(&card, PlayMethod::Azoth).is_ok());
        assert_eq!(
            Quintessence.azoth_source(&card, Element::Fire).unwrap(),
            Some(AzothSource::Quintessence)
        );
    }
}
