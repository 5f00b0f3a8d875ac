//! Player actions submitted to the turn resolver.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::InvalidPlay;

/// One player's action for a turn: place a card, or pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Place `card` at grid cell `position`.
    Place {
        /// Card to play from the hand window.
        card: CardId,
        /// Target grid cell; must be inside the player's placement zone.
        position: usize,
    },
    /// Do nothing this turn.
    Pass,
}

impl Action {
    /// Check if this is a pass.
    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Action::Pass)
    }
}

/// How the resolver disposed of a submitted action.
///
/// A rejection never aborts the game; the action becomes an implicit pass
/// and the reason is kept for the replay log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionOutcome {
    /// The placement was applied.
    Accepted,
    /// The placement failed validation and was downgraded to a pass.
    Rejected(InvalidPlay),
    /// The player passed.
    Passed,
}

impl ActionOutcome {
    /// Check if the action was applied.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, ActionOutcome::Accepted)
    }
}
