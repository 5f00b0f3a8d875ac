//! Card system: static definitions and the catalog.

pub mod card;
pub mod catalog;

pub use card::{CardDef, CardId};
pub use catalog::{standard_catalog, Catalog};
