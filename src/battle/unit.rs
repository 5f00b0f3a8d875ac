//! Placed combat units.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::PlayerId;

/// Unique identifier for a placed unit within one battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl UnitId {
    /// Create a new unit ID.
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

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unit({})", self.0)
    }
}

/// A placed, mutable combat entity instantiated from a card.
///
/// Static stats (attack, range, full HP) stay on the catalog card; the unit
/// carries only the state that changes during a battle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Battle-unique identifier.
    pub id: UnitId,

    /// Owning player.
    pub owner: PlayerId,

    /// Source card in the catalog.
    pub card: CardId,

    /// Remaining HP. Always `0 ..= card.hp`.
    pub hp: u32,

    /// Grid cell. Always within the playable band between the towers.
    pub position: usize,

    /// Set when the unit advances this tick; a move consumes the turn,
    /// so a moved unit does not attack until the next tick.
    pub moved_this_turn: bool,

    /// Turn the unit was placed on. Freshly placed units sit out the
    /// remainder of the tick they land on.
    pub deployed_turn: u32,
}

impl Unit {
    /// Create a freshly placed unit at full HP.
    #[must_use]
    pub fn new(
        id: UnitId,
        owner: PlayerId,
        card: CardId,
        hp: u32,
        position: usize,
        deployed_turn: u32,
    ) -> Self {
        Self {
            id,
            owner,
            card,
            hp,
            position,
            moved_this_turn: false,
            deployed_turn,
        }
    }

    /// Check if the unit is still alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Apply damage, saturating at zero.
    pub fn take_damage(&mut self, damage: u32) {
        self.hp = self.hp.saturating_sub(damage);
    }
}
