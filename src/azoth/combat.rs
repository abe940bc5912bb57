//! Elemental advantage.
//!
//! Each element is advantaged against exactly one other:
//!
//! ```text
//! Fire -> Earth -> Air -> Water -> Fire
//! Aether -> Nether -> Generic -> Air
//! ```
//!
//! Since the table is a function, at most one direction of any ordered
//! pair can be advantaged.

use crate::cards::Element;

/// The element `element` is advantaged against.
#[must_use]
pub const fn advantaged_against(element: Element) -> Element {
    match element {
        Element::Fire => Element::Earth,
        Element::Earth => Element::Air,
        Element::Air => Element::Water,
        Element::Water => Element::Fire,
        Element::Aether => Element::Nether,
        Element::Nether => Element::Generic,
        Element::Generic => Element::Air,
    }
}

#[must_use]
pub fn has_advantage(attacker: Element, defender: Element) -> bool {
    advantaged_against(attacker) == defender
}

/// Base damage adjusted by elemental advantage.
///
/// +1 when the attacker is advantaged, -1 (minimum 1) when the defender
/// is, unchanged otherwise.
#[must_use]
pub fn elemental_damage(attacker: Element, defender: Element, base: u32) -> u32 {
    if has_advantage(attacker, defender) {
        base.saturating_add(1)
    } else if has_advantage(defender, attacker) {
        base.saturating_sub(1).max(1)
    } else {
        base
    }
}
