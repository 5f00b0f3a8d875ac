//! Card catalog for definition lookup.
//!
//! The `Catalog` is the immutable mapping of every card archetype in play,
//! built once at startup. Units reference cards by `CardId` rather than
//! duplicating stats, so catalog data is the single source of truth.

use rustc_hash::FxHashMap;

use crate::core::ConfigError;

use super::card::{CardDef, CardId};

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use clashlane::cards::{Catalog, CardDef, CardId};
///
/// let mut catalog = Catalog::new();
/// catalog.register(CardDef::new(CardId::new(1), "Knight", 5, 10, 3));
///
/// let found = catalog.get(CardId::new(1)).unwrap();
/// assert_eq!(found.name, "Knight");
/// assert_eq!(catalog.by_name("Knight"), Some(CardId::new(1)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    cards: FxHashMap<CardId, CardDef>,
    by_name: FxHashMap<String, CardId>,
    next_id: u32,
}

impl Catalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card definition.
    ///
    /// Panics if a card with the same ID already exists.
    pub fn register(&mut self, card: CardDef) {
        if self.cards.contains_key(&card.id) {
            panic!("Card with ID {:?} already registered", card.id);
        }
        self.by_name.insert(card.name.clone(), card.id);
        self.cards.insert(card.id, card);
    }

    /// Register a card with an auto-assigned ID.
    ///
    /// Returns the assigned ID.
    pub fn register_auto(
        &mut self,
        name: impl Into<String>,
        attack: u32,
        hp: u32,
        cost: u32,
    ) -> CardId {
        let id = CardId::new(self.next_id);
        self.next_id += 1;

        self.register(CardDef::new(id, name, attack, hp, cost));
        id
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDef> {
        self.cards.get(&id)
    }

    /// Get a card definition by ID, panicking if not found.
    ///
    /// Use when you're certain the card exists.
    #[must_use]
    pub fn get_unchecked(&self, id: CardId) -> &CardDef {
        self.cards.get(&id).expect("Card not found in catalog")
    }

    /// Look up a card ID by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<CardId> {
        self.by_name.get(name).copied()
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions.
    pub fn iter(&self) -> impl Iterator<Item = &CardDef> {
        self.cards.values()
    }

    /// All card IDs in ascending order.
    ///
    /// Sorted so that deck dealing is deterministic under a fixed seed.
    #[must_use]
    pub fn card_ids(&self) -> Vec<CardId> {
        let mut ids: Vec<CardId> = self.cards.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Validate the catalog before a game starts.
    ///
    /// Fails on an empty catalog, malformed stats, or duplicate names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cards.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        let mut seen = FxHashMap::default();
        for card in self.cards.values() {
            card.validate()?;
            if seen.insert(card.name.as_str(), card.id).is_some() {
                return Err(ConfigError::DuplicateCardName {
                    name: card.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// The standard six-card catalog.
///
/// Stats match the original prototype roster; Archer and Wizard attack at
/// range 2, everyone else is melee.
#[must_use]
pub fn standard_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.register(CardDef::new(CardId::new(0), "Knight", 5, 10, 3));
    catalog.register(CardDef::new(CardId::new(1), "Archer", 4, 4, 2).with_range(2));
    catalog.register(CardDef::new(CardId::new(2), "Giant", 10, 20, 5));
    catalog.register(CardDef::new(CardId::new(3), "Goblin", 3, 3, 1));
    catalog.register(CardDef::new(CardId::new(4), "Wizard", 4, 5, 4).with_range(2));
    catalog.register(CardDef::new(CardId::new(5), "Skeleton", 2, 1, 1));
    catalog
}
