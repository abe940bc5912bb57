//! Card catalog for definition lookup.
//!
//! The catalog is produced by the card-data ingestion pipeline as a JSON
//! array of records. `CardCatalog::from_json` turns those records into
//! `Card` definitions; the engine reads only elements, keywords and cost.

use rustc_hash::FxHashMap;
use serde::Deserialize;
use smallvec::SmallVec;

use super::definition::{AmalgamOptions, Card, CardId, CardType, Rarity};
use super::element::{Element, ElementCounts};
use super::keyword::Keyword;
use crate::error::{Result, RulesError};

/// One catalog record as exported by the ingestion pipeline.
#[derive(Clone, Debug, Deserialize)]
struct CatalogRecord {
    id: u32,
    name: String,
    #[serde(default)]
    elements: Vec<Element>,
    #[serde(default)]
    keywords: Vec<Keyword>,
    /// One element name per Azoth required.
    #[serde(default)]
    cost: Vec<Element>,
    #[serde(default)]
    power: u32,
    #[serde(default)]
    rarity: Rarity,
    #[serde(default)]
    text: String,
    #[serde(rename = "type", default)]
    card_type: CardType,
    #[serde(default)]
    amalgam: Option<AmalgamOptions>,
}

impl From<CatalogRecord> for Card {
    fn from(record: CatalogRecord) -> Self {
        Card {
            id: CardId::new(record.id),
            name: record.name,
            card_type: record.card_type,
            rarity: record.rarity,
            elements: record.elements.into_iter().collect::<SmallVec<_>>(),
            element_cost: record.cost.into_iter().collect::<ElementCounts>(),
            keywords: record.keywords.into_iter().collect::<SmallVec<_>>(),
            power: record.power,
            text: record.text,
            amalgam: record.amalgam,
        }
    }
}

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use konivrer_rules::cards::{CardCatalog, CardId, Element, Keyword};
///
/// let catalog = CardCatalog::from_json(r#"[
///     { "id": 1, "name": "Ember Sprite", "type": "Familiar",
///       "elements": ["fire"], "keywords": ["INFERNO"],
///       "cost": ["fire", "generic"], "power": 1 }
/// ]"#).unwrap();
///
/// let sprite = catalog.get(CardId::new(1)).unwrap();
/// assert_eq!(sprite.element_cost[Element::Fire], 1);
/// assert!(sprite.has_keyword(Keyword::Inferno));
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: FxHashMap<CardId, Card>,
}

impl CardCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON array of catalog records.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<CatalogRecord> = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for record in records {
            catalog.register(record.into())?;
        }
        Ok(catalog)
    }

    /// Register a card definition. Duplicate IDs are rejected.
    pub fn register(&mut self, card: Card) -> Result<()> {
        if self.cards.contains_key(&card.id) {
            return Err(RulesError::Catalog(format!(
                "{} already registered",
                card.id
            )));
        }
        self.cards.insert(card.id, card);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    /// Build a deck list from card IDs, failing on the first unknown ID.
    pub fn deck(&self, ids: &[CardId]) -> Result<Vec<Card>> {
        ids.iter()
            .map(|&id| {
                self.get(id)
                    .cloned()
                    .ok_or_else(|| RulesError::Catalog(format!("{id} not in catalog")))
            })
            .collect()
    }
}
