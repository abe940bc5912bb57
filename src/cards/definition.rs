//! Card definitions - static card data.
//!
//! `Card` holds the immutable properties printed on a card. Runtime data
//! (counters, Azoth spent, keyword markers) lives on `CardInstance`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::element::{Element, ElementCounts};
use super::keyword::Keyword;

/// Identifier of a card definition in the catalog.
///
/// Identifies the printed card, not a physical copy in a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    #[default]
    Familiar,
    Spell,
    /// Defines a deck's elemental identity; never played.
    Flag,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// The two options an Amalgam card offers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmalgamOptions {
    /// Keyword choices when summoned.
    pub keywords: SmallVec<[Keyword; 2]>,
    /// Element choices when placed as Azoth.
    pub elements: SmallVec<[Element; 2]>,
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use konivrer_rules::cards::{Card, CardId, CardType, Element, ElementCounts, Keyword};
///
/// let card = Card::new(CardId::new(1), "Ember Sprite", CardType::Familiar)
///     .with_element(Element::Fire)
///     .with_cost(ElementCounts::new().with(Element::Fire, 1).with(Element::Generic, 1))
///     .with_keyword(Keyword::Inferno)
///     .with_power(2);
///
/// assert!(card.has_keyword(Keyword::Inferno));
/// assert_eq!(card.element_cost.total(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub card_type: CardType,
    pub rarity: Rarity,

    /// Elemental affiliation, used for immunity and advantage checks.
    pub elements: SmallVec<[Element; 2]>,

    /// Azoth required to play the card.
    pub element_cost: ElementCounts,

    pub keywords: SmallVec<[Keyword; 2]>,

    /// Base strength before counters.
    pub power: u32,

    pub text: String,

    pub amalgam: Option<AmalgamOptions>,
}

impl Card {
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, card_type: CardType) -> Self {
        Self {
            id,
            name: name.into(),
            card_type,
            rarity: Rarity::default(),
            elements: SmallVec::new(),
            element_cost: ElementCounts::new(),
            keywords: SmallVec::new(),
            power: 0,
            text: String::new(),
            amalgam: None,
        }
    }

    #[must_use]
    pub fn with_element(mut self, element: Element) -> Self {
        if !self.elements.contains(&element) {
            self.elements.push(element);
        }
        self
    }

    #[must_use]
    pub fn with_cost(mut self, cost: ElementCounts) -> Self {
        self.element_cost = cost;
        self
    }

    #[must_use]
    pub fn with_keyword(mut self, keyword: Keyword) -> Self {
        if !self.keywords.contains(&keyword) {
            self.keywords.push(keyword);
        }
        self
    }

    #[must_use]
    pub fn with_power(mut self, power: u32) -> Self {
        self.power = power;
        self
    }

    #[must_use]
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn with_amalgam(mut self, options: AmalgamOptions) -> Self {
        self.amalgam = Some(options);
        self
    }

    #[must_use]
    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.keywords.contains(&keyword)
    }

    #[must_use]
    pub fn has_element(&self, element: Element) -> bool {
        self.elements.contains(&element)
    }

    /// The element a card contributes when used in combat: its first
    /// listed element, or `Generic` for element-less cards.
    #[must_use]
    pub fn primary_element(&self) -> Element {
        self.elements.first().copied().unwrap_or(Element::Generic)
    }
}
