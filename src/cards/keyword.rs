//! Keyword ability tags.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::RulesError;

/// A named ability tag printed on a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Keyword {
    Amalgam,
    Brilliance,
    Gust,
    Inferno,
    Steadfast,
    Submerged,
    Quintessence,
    Void,
}

/// Presentation metadata for a keyword.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct KeywordInfo {
    pub name: String,
    pub symbol: &'static str,
    pub description: &'static str,
}

impl Keyword {
    /// All keywords in canonical order.
    pub const ALL: [Keyword; 8] = [
        Keyword::Amalgam,
        Keyword::Brilliance,
        Keyword::Gust,
        Keyword::Inferno,
        Keyword::Steadfast,
        Keyword::Submerged,
        Keyword::Quintessence,
        Keyword::Void,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Keyword::Amalgam => "amalgam",
            Keyword::Brilliance => "brilliance",
            Keyword::Gust => "gust",
            Keyword::Inferno => "inferno",
            Keyword::Steadfast => "steadfast",
            Keyword::Submerged => "submerged",
            Keyword::Quintessence => "quintessence",
            Keyword::Void => "void",
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Keyword::Amalgam => "⚯",
            Keyword::Brilliance => "✦",
            Keyword::Gust => "≋",
            Keyword::Inferno => "※",
            Keyword::Steadfast => "⬢",
            Keyword::Submerged => "≈",
            Keyword::Quintessence => "⬟",
            Keyword::Void => "◯",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Keyword::Amalgam => {
                "Choose keyword and element when played, or element when used as Azoth"
            }
            Keyword::Brilliance => {
                "Place target Familiar with +1 Counters or Spell with Strength ≤ ○ on bottom of life cards"
            }
            Keyword::Gust => {
                "Return target Familiar with +1 Counters or Spell with Strength ≤ 🜁 to owner's hand"
            }
            Keyword::Inferno => {
                "After damage is dealt to target card, add damage ≤ 🜂 used to pay for this card's Strength"
            }
            Keyword::Steadfast => {
                "Redirect damage ≤ 🜃 used to pay for this card's Strength to this card's Strength"
            }
            Keyword::Submerged => {
                "Place target Familiar with +1 Counters or Spell with Strength ≤ 🜄 below top of owner's deck"
            }
            Keyword::Quintessence => {
                "This card can't be played as a Familiar. While in Azoth row, produces any Azoth type"
            }
            Keyword::Void => "Remove target card from the game",
        }
    }

    /// Display name, symbol and rules text.
    ///
    /// ```
    /// use konivrer_rules::cards::Keyword;
    ///
    /// let info = Keyword::Void.display_info();
    /// assert_eq!(info.name, "VOID");
    /// assert_eq!(info.symbol, "◯");
    /// ```
    #[must_use]
    pub fn display_info(self) -> KeywordInfo {
        KeywordInfo {
            name: self.name().to_uppercase(),
            symbol: self.symbol(),
            description: self.description(),
        }
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = self.name();
        let mut chars = name.chars();
        if let Some(first) = chars.next() {
            write!(f, "{}{}", first.to_ascii_uppercase(), chars.as_str())?;
        }
        Ok(())
    }
}

impl FromStr for Keyword {
    type Err = RulesError;

    /// Parse a keyword name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Keyword::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RulesError::Catalog(format!("unknown keyword '{s}'")))
    }
}

impl TryFrom<String> for Keyword {
    type Error = RulesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Keyword> for String {
    fn from(keyword: Keyword) -> Self {
        keyword.name().to_string()
    }
}
