//! Battle state: the lane, towers, elixir pools, and live units.
//!
//! `BattleState` owns every unit for the duration of the battle. All
//! mutation happens inside the turn resolver; from the outside a tick is
//! atomic and a partially applied phase is never visible.
//!
//! ## Lane geometry
//!
//! Cell 0 is player 0's tower, cell `grid_len - 1` is player 1's tower.
//! Units occupy the band in between; nothing ever moves into a tower cell -
//! tower damage is dealt at range from adjacent cells.

use serde::{Deserialize, Serialize};

use crate::cards::CardDef;
use crate::core::{ConfigError, PlayerId, PlayerPair};

use super::unit::{Unit, UnitId};

/// Battle configuration, validated at setup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleConfig {
    /// Total grid length including both tower cells.
    pub grid_len: usize,

    /// Starting (and maximum) tower HP.
    pub tower_hp: u32,

    /// Elixir pool ceiling.
    pub max_elixir: u32,

    /// Elixir each player starts with.
    pub starting_elixir: u32,

    /// Elixir gained by both players each turn.
    pub elixir_regen: u32,

    /// Maximum live units per player.
    pub unit_cap: usize,

    /// Turn limit; reaching it ends the game.
    pub max_turns: u32,

    /// At the turn limit, award the win to the player with the healthier
    /// tower instead of declaring a flat draw.
    pub hp_tiebreak: bool,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            grid_len: 10,
            tower_hp: 100,
            max_elixir: 10,
            starting_elixir: 5,
            elixir_regen: 1,
            unit_cap: 4,
            max_turns: 100,
            hp_tiebreak: false,
        }
    }
}

impl BattleConfig {
    /// Validate the configuration.
    ///
    /// The grid needs at least four cells: two towers plus a placement cell
    /// for each player (zones may overlap on short grids).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_len < 4 {
            return Err(ConfigError::GridTooShort { len: self.grid_len });
        }
        if self.tower_hp == 0 {
            return Err(ConfigError::ZeroTowerHp);
        }
        if self.max_elixir == 0 {
            return Err(ConfigError::ZeroMaxElixir);
        }
        if self.starting_elixir > self.max_elixir {
            return Err(ConfigError::StartingElixirOverMax {
                starting: self.starting_elixir,
                max: self.max_elixir,
            });
        }
        if self.max_turns == 0 {
            return Err(ConfigError::ZeroTurnLimit);
        }
        if self.unit_cap == 0 {
            return Err(ConfigError::ZeroUnitCap);
        }
        Ok(())
    }
}

/// A player's tower.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tower {
    /// Owning player.
    pub owner: PlayerId,

    /// Remaining HP, saturating at zero.
    pub hp: u32,

    /// HP at battle start.
    pub max_hp: u32,
}

impl Tower {
    /// Create a fresh tower.
    #[must_use]
    pub fn new(owner: PlayerId, hp: u32) -> Self {
        Self {
            owner,
            hp,
            max_hp: hp,
        }
    }

    /// Check if the tower has fallen.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.hp == 0
    }

    /// Apply damage, saturating at zero.
    pub fn take_damage(&mut self, damage: u32) {
        self.hp = self.hp.saturating_sub(damage);
    }
}

/// Terminal result of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// A tower fell; its owner's opponent wins.
    TowerDestroyed {
        /// The winning player.
        winner: PlayerId,
    },
    /// Both towers fell in the same simultaneous attack phase.
    BothTowersDestroyed,
    /// The turn limit was reached. `winner` is set only when the tower-HP
    /// tie-break is enabled and the towers differ.
    TurnLimit {
        /// The winning player, if any.
        winner: Option<PlayerId>,
    },
}

impl Outcome {
    /// The winning player, if the battle was not a draw.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        match self {
            Outcome::TowerDestroyed { winner } => Some(*winner),
            Outcome::BothTowersDestroyed => None,
            Outcome::TurnLimit { winner } => *winner,
        }
    }

    /// Check if the battle ended in a draw.
    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.winner().is_none()
    }
}

/// The full mutable state of one battle.
#[derive(Clone, Debug)]
pub struct BattleState {
    config: BattleConfig,
    towers: PlayerPair<Tower>,
    elixir: PlayerPair<u32>,
    units: Vec<Unit>,
    next_unit_id: u32,
    turn: u32,
    outcome: Option<Outcome>,
}

impl BattleState {
    /// Create a fresh battle from a validated configuration.
    pub fn new(config: BattleConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            towers: PlayerPair::from_fn(|p| Tower::new(p, config.tower_hp)),
            elixir: PlayerPair::with_value(config.starting_elixir),
            units: Vec::new(),
            next_unit_id: 0,
            turn: 0,
            outcome: None,
            config,
        })
    }

    /// The battle configuration.
    #[must_use]
    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Completed turn count. Starts at 0 and increments once per tick.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Terminal outcome, if the battle has ended.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Check if the battle has ended.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    // === Lane geometry ===

    /// The grid cell a player's tower occupies.
    #[must_use]
    pub fn tower_cell(&self, player: PlayerId) -> usize {
        match player.index() {
            0 => 0,
            _ => self.config.grid_len - 1,
        }
    }

    /// Direction of advance for a player's units: +1 or -1.
    #[must_use]
    pub fn advance_direction(&self, player: PlayerId) -> isize {
        match player.index() {
            0 => 1,
            _ => -1,
        }
    }

    /// Cells where a player may place new units: the 1-2 cell band next to
    /// their own tower. Zones may overlap on short grids.
    #[must_use]
    pub fn placement_zone(&self, player: PlayerId) -> std::ops::RangeInclusive<usize> {
        let last = self.config.grid_len - 1;
        match player.index() {
            0 => 1..=2.min(last - 1),
            _ => (last - 2).max(1)..=last - 1,
        }
    }

    /// Check a cell is inside the playable band and holds no unit.
    #[must_use]
    pub fn is_cell_free(&self, position: usize) -> bool {
        position > 0 && position < self.config.grid_len - 1 && self.unit_at(position).is_none()
    }

    // === Towers and elixir ===

    /// A player's tower.
    #[must_use]
    pub fn tower(&self, player: PlayerId) -> &Tower {
        &self.towers[player]
    }

    pub(crate) fn tower_mut(&mut self, player: PlayerId) -> &mut Tower {
        &mut self.towers[player]
    }

    /// A player's current elixir.
    #[must_use]
    pub fn elixir(&self, player: PlayerId) -> u32 {
        self.elixir[player]
    }

    pub(crate) fn spend_elixir(&mut self, player: PlayerId, cost: u32) {
        debug_assert!(self.elixir[player] >= cost);
        self.elixir[player] -= cost;
    }

    pub(crate) fn accrue_elixir(&mut self) {
        for player in PlayerId::both() {
            self.elixir[player] =
                (self.elixir[player] + self.config.elixir_regen).min(self.config.max_elixir);
        }
    }

    // === Units ===

    /// All live units, in placement order.
    #[must_use]
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// A player's live units.
    pub fn units_of(&self, player: PlayerId) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(move |u| u.owner == player)
    }

    /// Number of live units a player fields.
    #[must_use]
    pub fn unit_count(&self, player: PlayerId) -> usize {
        self.units_of(player).count()
    }

    /// Look up a unit by ID.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub(crate) fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    /// The unit occupying a cell, if any.
    #[must_use]
    pub fn unit_at(&self, position: usize) -> Option<&Unit> {
        self.units.iter().find(|u| u.position == position)
    }

    pub(crate) fn spawn_unit(&mut self, owner: PlayerId, card: &CardDef, position: usize) -> UnitId {
        let id = UnitId::new(self.next_unit_id);
        self.next_unit_id += 1;
        self.units
            .push(Unit::new(id, owner, card.id, card.hp, position, self.turn));
        id
    }

    /// Remove units at zero HP, returning them in placement order.
    pub(crate) fn remove_dead(&mut self) -> Vec<Unit> {
        let mut dead = Vec::new();
        self.units.retain(|u| {
            if u.is_alive() {
                true
            } else {
                dead.push(u.clone());
                false
            }
        });
        dead
    }

    pub(crate) fn reset_turn_flags(&mut self) {
        for unit in &mut self.units {
            unit.moved_this_turn = false;
        }
    }

    pub(crate) fn advance_turn(&mut self) {
        self.turn += 1;
    }

    pub(crate) fn set_outcome(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
    }

    /// Check the structural invariants that must hold between ticks.
    ///
    /// Used by tests and debug assertions; returns a description of the
    /// first violation found.
    pub fn check_invariants(&self, catalog: &crate::cards::Catalog) -> Result<(), String> {
        for unit in &self.units {
            let def = catalog
                .get(unit.card)
                .ok_or_else(|| format!("{} references unknown {}", unit.id, unit.card))?;
            if unit.hp == 0 || unit.hp > def.hp {
                return Err(format!("{} HP {} outside 1..={}", unit.id, unit.hp, def.hp));
            }
            if unit.position == 0 || unit.position >= self.config.grid_len - 1 {
                return Err(format!("{} at {} is in a tower cell", unit.id, unit.position));
            }
        }
        for (i, a) in self.units.iter().enumerate() {
            for b in &self.units[i + 1..] {
                if a.position == b.position {
                    return Err(format!("{} and {} co-located at {}", a.id, b.id, a.position));
                }
            }
        }
        for player in PlayerId::both() {
            if self.unit_count(player) > self.config.unit_cap {
                return Err(format!("{player} exceeds unit cap"));
            }
            if self.elixir[player] > self.config.max_elixir {
                return Err(format!("{player} elixir over max"));
            }
        }
        let any_tower_down = PlayerId::both()
            .iter()
            .any(|&p| self.towers[p].is_destroyed());
        let at_turn_cap = self.turn >= self.config.max_turns;
        if self.is_over() != (any_tower_down || at_turn_cap) {
            return Err("game-over flag disagrees with terminal conditions".to_string());
        }
        Ok(())
    }
}
