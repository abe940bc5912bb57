//! The Azoth Row: cards committed face-up as resources.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::{CardInstance, Element, ElementCounts};
use crate::core::InstanceId;

/// What an Azoth entry produces when spent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AzothSource {
    /// One Azoth of a single element.
    Element(Element),
    /// Wildcard: pays for any element.
    Quintessence,
}

impl From<Element> for AzothSource {
    fn from(element: Element) -> Self {
        AzothSource::Element(element)
    }
}

impl std::fmt::Display for AzothSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AzothSource::Element(element) => write!(f, "{element}"),
            AzothSource::Quintessence => f.write_str("quintessence"),
        }
    }
}

/// A card placed in a player's Azoth Row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AzothEntry {
    pub instance: CardInstance,
    pub source: AzothSource,
    /// Spent this turn; unusable until refreshed.
    pub rested: bool,
}

impl AzothEntry {
    #[must_use]
    pub fn new(instance: CardInstance, source: AzothSource) -> Self {
        Self {
            instance,
            source,
            rested: false,
        }
    }

    #[must_use]
    pub fn id(&self) -> InstanceId {
        self.instance.id
    }

    #[must_use]
    pub fn is_quintessence(&self) -> bool {
        self.source == AzothSource::Quintessence
    }

    /// Whether this unrested entry can pay for `element` directly.
    #[must_use]
    pub fn produces(&self, element: Element) -> bool {
        match self.source {
            AzothSource::Element(e) => e == element,
            AzothSource::Quintessence => true,
        }
    }
}

/// Unrested Azoth in a row.
///
/// A Quintessence entry counts once toward every element and once toward
/// `total`, so `by_element` never sums to `total` when wildcards are
/// present.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableAzoth {
    pub by_element: ElementCounts,
    pub total: u32,
    pub quintessence: u32,
}

impl AvailableAzoth {
    /// Tally the unrested entries of a row.
    #[must_use]
    pub fn from_row(row: &Vector<AzothEntry>) -> Self {
        let mut available = Self::default();
        for entry in row.iter().filter(|e| !e.rested) {
            available.total += 1;
            match entry.source {
                AzothSource::Element(element) => available.by_element.increment(element),
                AzothSource::Quintessence => {
                    available.quintessence += 1;
                    for element in Element::ALL {
                        available.by_element.increment(element);
                    }
                }
            }
        }
        available
    }

    /// Entries that produce exactly `element`, wildcards excluded.
    #[must_use]
    pub fn dedicated(&self, element: Element) -> u32 {
        self.by_element[element].saturating_sub(self.quintessence)
    }
}
