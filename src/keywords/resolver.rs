//! Keyword dispatch and synergies.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::debug;

use super::choice::{Choice, ChoiceKind, PendingChoice};
use super::handler::{KeywordHandler, PlayContext, PlayMethod};
use super::handlers::{Amalgam, Displace, Empower, Quintessence};
use crate::azoth::AzothSource;
use crate::cards::{Card, CardInstance, Element, Keyword, KeywordInfo};
use crate::core::{ActiveSynergy, GameState, PlayerId};
use crate::error::{Result, RulesError};

/// Applies keyword abilities through a handler lookup table.
///
/// `KeywordResolver::new()` registers a handler for every keyword;
/// `with_handler` replaces one.
pub struct KeywordResolver {
    handlers: FxHashMap<Keyword, Box<dyn KeywordHandler>>,
}

impl Default for KeywordResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for KeywordResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keywords: Vec<_> = self.handlers.keys().collect();
        keywords.sort();
        f.debug_struct("KeywordResolver")
            .field("handlers", &keywords)
            .finish()
    }
}

impl KeywordResolver {
    /// Resolver with the built-in handler for every keyword.
    #[must_use]
    pub fn new() -> Self {
        Self::empty()
            .with_handler(Displace::brilliance())
            .with_handler(Displace::gust())
            .with_handler(Displace::submerged())
            .with_handler(Displace::void())
            .with_handler(Empower::inferno())
            .with_handler(Empower::steadfast())
            .with_handler(Amalgam)
            .with_handler(Quintessence)
    }

    /// Resolver with no handlers; every keyword is inert.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            handlers: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn with_handler(mut self, handler: impl KeywordHandler + 'static) -> Self {
        self.handlers.insert(handler.keyword(), Box::new(handler));
        self
    }

    #[must_use]
    pub fn handler(&self, keyword: Keyword) -> Option<&dyn KeywordHandler> {
        self.handlers.get(&keyword).map(|h| h.as_ref())
    }

    // === Accessors ===

    #[must_use]
    pub fn has_keyword(card: &CardInstance, keyword: Keyword) -> bool {
        card.has_keyword(keyword)
    }

    #[must_use]
    pub fn card_keywords(card: &CardInstance) -> Vec<Keyword> {
        card.keywords().collect()
    }

    /// Display metadata for a keyword name, case-insensitive.
    ///
    /// ```
    /// use konivrer_rules::keywords::KeywordResolver;
    ///
    /// assert_eq!(KeywordResolver::keyword_display_info("gust").symbol, "≋");
    /// assert_eq!(KeywordResolver::keyword_display_info("trample").symbol, "?");
    /// ```
    #[must_use]
    pub fn keyword_display_info(keyword: &str) -> KeywordInfo {
        match keyword.parse::<Keyword>() {
            Ok(keyword) => keyword.display_info(),
            Err(_) => KeywordInfo {
                name: keyword.to_uppercase(),
                symbol: "?",
                description: "Unknown keyword",
            },
        }
    }

    // === Play checks ===

    /// Ask each of the card's keywords whether `method` is allowed.
    pub fn validate_play(&self, card: &Card, method: PlayMethod) -> Result<()> {
        for keyword in &card.keywords {
            if let Some(handler) = self.handler(*keyword) {
                handler.check_play(card, method)?;
            }
        }
        Ok(())
    }

    /// The Azoth a card produces when placed as `requested`.
    pub fn azoth_source(&self, card: &Card, requested: Element) -> Result<AzothSource> {
        for keyword in &card.keywords {
            if let Some(handler) = self.handler(*keyword) {
                if let Some(source) = handler.azoth_source(card, requested)? {
                    return Ok(source);
                }
            }
        }
        Ok(AzothSource::Element(requested))
    }

    // === Resolution ===

    /// Run every keyword of a resolving card, in printed order.
    ///
    /// Burst plays skip keywords entirely and leave the state untouched.
    pub fn apply_keyword_effects(
        &self,
        state: &mut GameState,
        player: PlayerId,
        card: &CardInstance,
        method: PlayMethod,
    ) -> Result<()> {
        if method == PlayMethod::Burst {
            return Ok(());
        }

        let ctx = PlayContext::new(player, card, method);
        let keywords: SmallVec<[Keyword; 4]> = card.keywords().collect();
        for keyword in keywords {
            match self.handler(keyword) {
                Some(handler) => {
                    debug!(%player, %keyword, card = %card.id, "keyword resolving");
                    handler.on_play(state, &ctx)?;
                }
                None => debug!(%keyword, "no handler registered"),
            }
        }
        Ok(())
    }

    /// Recompute a player's synergy markers and announce each one.
    ///
    /// A keyword on two or more field cards is a synergy.
    pub fn check_keyword_synergies(&self, state: &mut GameState, player: PlayerId) {
        let synergies = Self::tally(state, player);
        state.player_mut(player).synergies = synergies.clone();

        for synergy in synergies {
            if let Some(handler) = self.handler(synergy.keyword) {
                handler.on_synergy(state, player, synergy.count);
            }
        }
    }

    /// Answer the oldest choice pending for `player`.
    ///
    /// Invalid answers are rejected without changing state.
    pub fn resolve_choice(&self, state: &mut GameState, player: PlayerId, choice: Choice) -> Result<()> {
        let Some(index) = state.pending_choices.iter().position(|c| c.player == player) else {
            return Err(RulesError::NoPendingChoice { player });
        };
        let pending = state.pending_choices[index].clone();

        match (&pending.kind, choice) {
            (_, Choice::Decline) => {
                state.pending_choices.remove(index);
                state
                    .log
                    .push(format!("{player} declined {} from {}", pending.keyword(), pending.source_name));
                Ok(())
            }

            (ChoiceKind::Target { keyword, candidates }, Choice::Target(target)) => {
                if !candidates.contains(&target) || state.find_on_field(target).is_none() {
                    return Err(RulesError::InvalidChoice(format!(
                        "{target} is not a legal {keyword} target"
                    )));
                }
                let handler = self.handler(*keyword).ok_or_else(|| {
                    RulesError::InvalidChoice(format!("no handler for {keyword}"))
                })?;

                state.pending_choices.remove(index);
                let owner = state.find_on_field(target).map(|(owner, _)| owner);
                handler.on_target(state, &pending, target)?;
                if let Some(owner) = owner {
                    state.player_mut(owner).synergies = Self::tally(state, owner);
                }
                Ok(())
            }

            (ChoiceKind::Keyword { options }, Choice::Keyword(keyword)) => {
                if !options.contains(&keyword) {
                    return Err(RulesError::InvalidChoice(format!(
                        "{keyword} is not an Amalgam option"
                    )));
                }

                state.pending_choices.remove(index);
                self.grant_keyword(state, &pending, keyword)
            }

            _ => Err(RulesError::InvalidChoice(format!(
                "answer does not fit the pending {} choice",
                pending.keyword()
            ))),
        }
    }

    fn grant_keyword(&self, state: &mut GameState, pending: &PendingChoice, keyword: Keyword) -> Result<()> {
        let Some(card) = state.field_instance_mut(pending.source) else {
            state
                .log
                .push(format!("Amalgam from {}: left the field", pending.source_name));
            return Ok(());
        };
        card.granted_keywords.push(keyword);
        let ctx = PlayContext::new(pending.player, card, PlayMethod::Summon);

        state
            .log
            .push(format!("{} gains {keyword}", pending.source_name));
        match self.handler(keyword) {
            Some(handler) => handler.on_play(state, &ctx),
            None => Ok(()),
        }
    }

    /// Keywords appearing on two or more of a player's field cards.
    fn tally(state: &GameState, player: PlayerId) -> SmallVec<[ActiveSynergy; 2]> {
        let field = &state.player(player).field;
        Keyword::ALL
            .into_iter()
            .map(|keyword| ActiveSynergy {
                keyword,
                count: field.iter().filter(|card| card.has_keyword(keyword)).count(),
            })
            .filter(|synergy| synergy.count >= 2)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardId, CardType, ElementCounts};
    use crate::core::InstanceId;

    fn familiar(name: &str, keyword: Keyword) -> Card {
        Card::new(CardId::new(1), name, CardType::Familiar)
            .with_power(1)
            .with_keyword(keyword)
    }

    #[test]
    fn test_burst_leaves_log_unchanged() {
        let resolver = KeywordResolver::new();
        let mut state = GameState::new();
        let id = state.add_to_field(PlayerId::FIRST, familiar("Gale", Keyword::Gust));
        state.add_to_field(PlayerId::SECOND, familiar("Target", Keyword::Void));
        let card = state.find_on_field(id).unwrap().1.clone();
        let before = state.clone();

        resolver
            .apply_keyword_effects(&mut state, PlayerId::FIRST, &card, PlayMethod::Burst)
            .unwrap();

        assert_eq!(state, before);
    }

    #[test]
    fn test_empty_resolver_is_inert() {
        let resolver = KeywordResolver::empty();
        let mut state = GameState::new();
        let id = state.add_to_field(PlayerId::FIRST, familiar("Gale", Keyword::Gust));
        let card = state.find_on_field(id).unwrap().1.clone();

        resolver
            .apply_keyword_effects(&mut state, PlayerId::FIRST, &card, PlayMethod::Summon)
            .unwrap();
        assert!(state.log.is_empty());
    }

    #[test]
    fn test_synergy_markers() {
        let resolver = KeywordResolver::new();
        let mut state = GameState::new();
        state.add_to_field(PlayerId::FIRST, familiar("A", Keyword::Steadfast));
        state.add_to_field(PlayerId::FIRST, familiar("B", Keyword::Steadfast));
        state.add_to_field(PlayerId::FIRST, familiar("C", Keyword::Inferno));

        resolver.check_keyword_synergies(&mut state, PlayerId::FIRST);

        let player = state.player(PlayerId::FIRST);
        assert_eq!(player.synergy(Keyword::Steadfast), 2);
        assert_eq!(player.synergy(Keyword::Inferno), 0);
        assert_eq!(
            state.log.last(),
            Some("Player 1: Steadfast synergy x2, prevents 1 damage per hit")
        );
    }

    #[test]
    fn test_resolve_target_choice() {
        let resolver = KeywordResolver::new();
        let mut state = GameState::new();
        let source = state.add_to_field(PlayerId::FIRST, familiar("Hollow", Keyword::Void));
        let target = state.add_to_field(PlayerId::SECOND, familiar("Grunt", Keyword::Gust));
        let card = state.find_on_field(source).unwrap().1.clone();

        resolver
            .apply_keyword_effects(&mut state, PlayerId::FIRST, &card, PlayMethod::Summon)
            .unwrap();
        assert_eq!(state.pending_choices.len(), 1);

        let err = resolver
            .resolve_choice(&mut state, PlayerId::SECOND, Choice::Target(target))
            .unwrap_err();
        assert_eq!(err, RulesError::NoPendingChoice { player: PlayerId::SECOND });

        let err = resolver
            .resolve_choice(&mut state, PlayerId::FIRST, Choice::Target(source))
            .unwrap_err();
        assert!(matches!(err, RulesError::InvalidChoice(_)));
        assert_eq!(state.pending_choices.len(), 1);

        resolver
            .resolve_choice(&mut state, PlayerId::FIRST, Choice::Target(target))
            .unwrap();
        assert!(state.pending_choices.is_empty());
        assert_eq!(state.player(PlayerId::SECOND).removed[0].id, target);
    }

    #[test]
    fn test_decline_choice() {
        let resolver = KeywordResolver::new();
        let mut state = GameState::new();
        let source = state.add_to_field(PlayerId::FIRST, familiar("Hollow", Keyword::Void));
        state.add_to_field(PlayerId::SECOND, familiar("Grunt", Keyword::Gust));
        let card = state.find_on_field(source).unwrap().1.clone();

        resolver
            .apply_keyword_effects(&mut state, PlayerId::FIRST, &card, PlayMethod::Summon)
            .unwrap();
        resolver
            .resolve_choice(&mut state, PlayerId::FIRST, Choice::Decline)
            .unwrap();

        assert!(state.pending_choices.is_empty());
        assert_eq!(state.player(PlayerId::SECOND).field.len(), 1);
        assert_eq!(state.log.last(), Some("Player 1 declined Void from Hollow"));
    }

    #[test]
    fn test_amalgam_grants_and_applies_keyword() {
        use crate::cards::AmalgamOptions;
        use smallvec::smallvec;

        let resolver = KeywordResolver::new();
        let mut state = GameState::new();
        let idol = Card::new(CardId::new(2), "Idol", CardType::Familiar)
            .with_keyword(Keyword::Amalgam)
            .with_amalgam(AmalgamOptions {
                keywords: smallvec![Keyword::Inferno, Keyword::Gust],
                elements: smallvec![Element::Fire, Element::Air],
            });
        let source = state.add_to_field(PlayerId::FIRST, idol);
        state.field_instance_mut(source).unwrap().azoth_spent =
            ElementCounts::new().with(Element::Fire, 2);
        let card = state.find_on_field(source).unwrap().1.clone();

        resolver
            .apply_keyword_effects(&mut state, PlayerId::FIRST, &card, PlayMethod::Summon)
            .unwrap();
        resolver
            .resolve_choice(&mut state, PlayerId::FIRST, Choice::Keyword(Keyword::Inferno))
            .unwrap();

        let card = state.find_on_field(source).unwrap().1;
        assert!(card.has_keyword(Keyword::Inferno));
        assert_eq!(card.inferno_bonus, 2);
    }

    #[test]
    fn test_mismatched_answer() {
        let resolver = KeywordResolver::new();
        let mut state = GameState::new();
        let source = state.add_to_field(PlayerId::FIRST, familiar("Hollow", Keyword::Void));
        state.add_to_field(PlayerId::SECOND, familiar("Grunt", Keyword::Gust));
        let card = state.find_on_field(source).unwrap().1.clone();
        resolver
            .apply_keyword_effects(&mut state, PlayerId::FIRST, &card, PlayMethod::Summon)
            .unwrap();

        let result = resolver.resolve_choice(&mut state, PlayerId::FIRST, Choice::Keyword(Keyword::Gust));
        assert!(matches!(result, Err(RulesError::InvalidChoice(_))));

        let result = resolver.resolve_choice(&mut state, PlayerId::FIRST, Choice::Target(InstanceId::new(77)));
        assert!(matches!(result, Err(RulesError::InvalidChoice(_))));
    }

    #[test]
    fn test_display_info_lookup() {
        let info = KeywordResolver::keyword_display_info("Brilliance");
        assert_eq!(info.name, "BRILLIANCE");
        assert_eq!(info.symbol, "✦");

        let unknown = KeywordResolver::keyword_display_info("flying");
        assert_eq!(unknown.name, "FLYING");
        assert_eq!(unknown.description, "Unknown keyword");
    }

    #[test]
    fn test_validate_and_azoth_source() {
        let resolver = KeywordResolver::new();
        let prism = Card::new(CardId::new(3), "Prism", CardType::Familiar)
            .with_keyword(Keyword::Quintessence);

        assert!(resolver.validate_play(&prism, PlayMethod::Summon).is_err());
        assert_eq!(
            resolver.azoth_source(&prism, Element::Water).unwrap(),
            AzothSource::Quintessence
        );

        let plain = Card::new(CardId::new(4), "Plain", CardType::Familiar);
        assert_eq!(
            resolver.azoth_source(&plain, Element::Water).unwrap(),
            AzothSource::Element(Element::Water)
        );
    }
}
