//! Card definitions - static unit archetype data.
//!
//! A `CardDef` holds the immutable stats of a unit archetype: "Knight" hits
//! for 5, has 10 HP, costs 3 elixir. Mutable combat state (remaining HP,
//! position) lives on the placed `Unit`, which only references its card.
//!
//! New archetypes are pure catalog data; the turn resolver needs no code
//! change to support them.

use serde::{Deserialize, Serialize};

use crate::core::ConfigError;

/// Unique identifier for a card definition.
///
/// Identifies the archetype ("Knight"), not a placed unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
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

/// Static card definition.
///
/// ## Example
///
/// ```
/// use clashlane::cards::{CardDef, CardId};
///
/// let archer = CardDef::new(CardId::new(1), "Archer", 4, 4, 2).with_range(2);
///
/// assert_eq!(archer.cost, 2);
/// assert_eq!(archer.range, 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDef {
    /// Unique identifier for this definition.
    pub id: CardId,

    /// Card name (unique within a catalog).
    pub name: String,

    /// Damage dealt per attack.
    pub attack: u32,

    /// Full HP when placed.
    pub hp: u32,

    /// Elixir cost to place.
    pub cost: u32,

    /// Attack range in grid cells. 1 = melee-adjacent.
    pub range: u32,
}

impl CardDef {
    /// Create a new melee card definition (range 1).
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, attack: u32, hp: u32, cost: u32) -> Self {
        Self {
            id,
            name: name.into(),
            attack,
            hp,
            cost,
            range: 1,
        }
    }

    /// Set the attack range (builder pattern).
    #[must_use]
    pub fn with_range(mut self, range: u32) -> Self {
        self.range = range;
        self
    }

    /// Validate the stats a playable card must have.
    ///
    /// Attack and cost may be zero; HP and range must be positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hp == 0 {
            return Err(ConfigError::BadCardStat {
                card: self.name.clone(),
                stat: "hp",
            });
        }
        if self.range == 0 {
            return Err(ConfigError::BadCardStat {
                card: self.name.clone(),
                stat: "range",
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for CardDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (ATK {}, HP {}, Cost {})",
            self.name, self.attack, self.hp, self.cost
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id() {
        let id = CardId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "Card(42)");
    }

    #[test]
    fn test_card_def_builder() {
        let card = CardDef::new(CardId::new(1), "Knight", 5, 10, 3);

        assert_eq!(card.name, "Knight");
        assert_eq!(card.attack, 5);
        assert_eq!(card.hp, 10);
        assert_eq!(card.cost, 3);
        assert_eq!(card.range, 1); // melee default

        let ranged = card.with_range(2);
        assert_eq!(ranged.range, 2);
    }

    #[test]
    fn test_card_def_display() {
        let card = CardDef::new(CardId::new(1), "Knight", 5, 10, 3);
        assert_eq!(format!("{card}"), "Knight (ATK 5, HP 10, Cost 3)");
    }

    #[test]
    fn test_validate_rejects_zero_hp() {
        let card = CardDef::new(CardId::new(1), "Ghost", 3, 0, 1);
        assert_eq!(
            card.validate(),
            Err(ConfigError::BadCardStat {
                card: "Ghost".to_string(),
                stat: "hp",
            })
        );
    }

    #[test]
    fn test_validate_rejects_zero_range() {
        let card = CardDef::new(CardId::new(1), "Statue", 3, 5, 1).with_range(0);
        assert!(card.validate().is_err());
    }

    #[test]
    fn test_validate_allows_zero_attack_and_cost() {
        let card = CardDef::new(CardId::new(1), "Wall", 0, 8, 0);
        assert!(card.validate().is_ok());
    }

    #[test]
    fn test_card_def_serialization() {
        let card = CardDef::new(CardId::new(1), "Archer", 4, 4, 2).with_range(2);

        let json = serde_json::to_string(&card).unwrap();
        let deserialized: CardDef = serde_json::from_str(&json).unwrap();

        assert_eq!(card, deserialized);
    }
}
