//! A policy that replays a fixed action sequence.

use std::collections::VecDeque;

use crate::battle::{Action, BattleState};
use crate::cards::Catalog;
use crate::core::PlayerId;
use crate::deck::Deck;

use super::PlayerPolicy;

/// Plays a predetermined list of actions, then passes forever.
///
/// Used by tests and by replay verification: feeding a recorded action
/// sequence back through the engine must reproduce the recorded game.
#[derive(Clone, Debug, Default)]
pub struct ScriptedPolicy {
    actions: VecDeque<Action>,
}

impl ScriptedPolicy {
    /// Create a policy from a sequence of actions.
    #[must_use]
    pub fn new(actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
        }
    }

    /// Number of scripted actions remaining.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.actions.len()
    }
}

impl PlayerPolicy for ScriptedPolicy {
    fn decide(
        &mut self,
        _state: &BattleState,
        _player: PlayerId,
        _deck: &Deck,
        _catalog: &Catalog,
    ) -> Action {
        self.actions.pop_front().unwrap_or(Action::Pass)
    }
}
