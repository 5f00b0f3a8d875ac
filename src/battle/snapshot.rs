//! Immutable per-turn snapshots for the replay log.
//!
//! A snapshot carries everything an external recorder needs to reconstruct
//! the board without re-running the simulation: unit positions and HP,
//! elixir levels, and tower HP.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::{PlayerId, PlayerPair};

use super::state::BattleState;
use super::unit::{Unit, UnitId};

/// One unit's observable state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    /// Battle-unique unit ID.
    pub id: UnitId,
    /// Owning player.
    pub owner: PlayerId,
    /// Source card.
    pub card: CardId,
    /// Remaining HP.
    pub hp: u32,
    /// Grid cell.
    pub position: usize,
}

impl From<&Unit> for UnitSnapshot {
    fn from(unit: &Unit) -> Self {
        Self {
            id: unit.id,
            owner: unit.owner,
            card: unit.card,
            hp: unit.hp,
            position: unit.position,
        }
    }
}

/// The observable board at a point in time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Completed turn count when the snapshot was taken.
    pub turn: u32,
    /// Tower HP per player.
    pub tower_hp: PlayerPair<u32>,
    /// Elixir per player.
    pub elixir: PlayerPair<u32>,
    /// Live units in placement order.
    pub units: Vec<UnitSnapshot>,
}

impl StateSnapshot {
    /// Capture the current board.
    #[must_use]
    pub fn capture(state: &BattleState) -> Self {
        Self {
            turn: state.turn(),
            tower_hp: PlayerPair::from_fn(|p| state.tower(p).hp),
            elixir: PlayerPair::from_fn(|p| state.elixir(p)),
            units: state.units().iter().map(UnitSnapshot::from).collect(),
        }
    }
}
