//! Elements and per-element tallies.
//!
//! KONIVRER has seven element types. `Generic` doubles as the "any element"
//! slot of a cost: a cost's generic requirement may be paid with Azoth of
//! any type.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use crate::error::RulesError;

/// One of the seven element types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Element {
    Fire,
    Water,
    Earth,
    Air,
    Aether,
    Nether,
    Generic,
}

impl Element {
    /// All elements in canonical order.
    pub const ALL: [Element; 7] = [
        Element::Fire,
        Element::Water,
        Element::Earth,
        Element::Air,
        Element::Aether,
        Element::Nether,
        Element::Generic,
    ];

    /// Elements that may appear as explicit (non-generic) cost requirements.
    pub const SPECIFIC: [Element; 6] = [
        Element::Fire,
        Element::Water,
        Element::Earth,
        Element::Air,
        Element::Aether,
        Element::Nether,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Element::Fire => "fire",
            Element::Water => "water",
            Element::Earth => "earth",
            Element::Air => "air",
            Element::Aether => "aether",
            Element::Nether => "nether",
            Element::Generic => "generic",
        }
    }

    /// Alchemical symbol used on cards.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Element::Fire => "🜂",
            Element::Water => "🜄",
            Element::Earth => "🜃",
            Element::Air => "🜁",
            Element::Aether => "○",
            Element::Nether => "□",
            Element::Generic => "✡",
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Element {
    type Err = RulesError;

    /// Parse an element name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Element::ALL
            .into_iter()
            .find(|e| e.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RulesError::Catalog(format!("unknown element '{s}'")))
    }
}

impl TryFrom<String> for Element {
    type Error = RulesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Element> for String {
    fn from(element: Element) -> Self {
        element.name().to_string()
    }
}

/// A count per element: costs, available Azoth, Azoth spent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementCounts([u32; 7]);

impl ElementCounts {
    #[must_use]
    pub const fn new() -> Self {
        Self([0; 7])
    }

    /// Builder-style setter.
    ///
    /// ```
    /// use konivrer_rules::cards::{Element, ElementCounts};
    ///
    /// let cost = ElementCounts::new()
    ///     .with(Element::Fire, 2)
    ///     .with(Element::Generic, 1);
    /// assert_eq!(cost.total(), 3);
    /// assert_eq!(cost.specific_total(), 2);
    /// ```
    #[must_use]
    pub fn with(mut self, element: Element, count: u32) -> Self {
        self[element] = count;
        self
    }

    /// Add one to an element's count.
    pub fn increment(&mut self, element: Element) {
        self[element] += 1;
    }

    #[must_use]
    pub fn get(&self, element: Element) -> u32 {
        self[element]
    }

    /// Sum of all counts, generic included. Saturates at `u32::MAX`.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.0.iter().fold(0u32, |sum, &n| sum.saturating_add(n))
    }

    /// Sum of the explicit (non-generic) counts. Saturates at `u32::MAX`.
    #[must_use]
    pub fn specific_total(&self) -> u32 {
        Element::SPECIFIC.iter().fold(0u32, |sum, &e| sum.saturating_add(self[e]))
    }

    /// The generic count.
    #[must_use]
    pub fn generic(&self) -> u32 {
        self[Element::Generic]
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Iterate over elements with a non-zero count.
    pub fn iter(&self) -> impl Iterator<Item = (Element, u32)> + '_ {
        Element::ALL
            .into_iter()
            .map(move |e| (e, self[e]))
            .filter(|&(_, n)| n > 0)
    }
}

impl Index<Element> for ElementCounts {
    type Output = u32;

    fn index(&self, element: Element) -> &Self::Output {
        &self.0[element.index()]
    }
}

impl IndexMut<Element> for ElementCounts {
    fn index_mut(&mut self, element: Element) -> &mut Self::Output {
        &mut self.0[element.index()]
    }
}

impl FromIterator<Element> for ElementCounts {
    /// Tally one unit per element occurrence.
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        let mut counts = ElementCounts::new();
        for element in iter {
            counts.increment(element);
        }
        counts
    }
}

impl std::fmt::Display for ElementCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return f.write_str("nothing");
        }
        let parts: Vec<String> = self.iter().map(|(e, n)| format!("{n} {e}")).collect();
        f.write_str(&parts.join(", "))
    }
}
