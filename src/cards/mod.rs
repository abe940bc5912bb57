//! Card system: elements, keywords, definitions, instances, catalog.
//!
//! ## Key Types
//!
//! - `Element` / `ElementCounts`: element types and per-element tallies
//! - `Keyword`: ability tags and their display metadata
//! - `Card`: static card data owned by the catalog
//! - `CardInstance`: one physical copy of a card during a match
//! - `CardCatalog`: definition lookup and JSON ingestion

pub mod definition;
pub mod element;
pub mod instance;
pub mod keyword;
pub mod registry;

pub use definition::{AmalgamOptions, Card, CardId, CardType, Rarity};
pub use element::{Element, ElementCounts};
pub use instance::CardInstance;
pub use keyword::{Keyword, KeywordInfo};
pub use registry::CardCatalog;
