//! Player policies: where actions come from.
//!
//! The turn resolver consumes an [`Action`](crate::battle::Action) per
//! player per tick; policies produce them. The engine itself never cares
//! whether an action came from an AI, a script, or a connected client, so
//! the seam is a single trait.

pub mod ai;
pub mod scripted;

use crate::battle::{Action, BattleState};
use crate::cards::Catalog;
use crate::core::PlayerId;
use crate::deck::Deck;

pub use ai::AiPolicy;
pub use scripted::ScriptedPolicy;

/// A source of actions for one player.
///
/// `decide` sees the full observable state. Policies may submit actions the
/// resolver will reject; the rejection is recorded and treated as a pass,
/// so a buggy or adversarial policy cannot corrupt a battle.
pub trait PlayerPolicy {
    /// Pick this player's action for the upcoming turn.
    fn decide(
        &mut self,
        state: &BattleState,
        player: PlayerId,
        deck: &Deck,
        catalog: &Catalog,
    ) -> Action;
}
