//! Built-in AI opponents at three difficulty levels.

use crate::battle::{Action, BattleState};
use crate::cards::{CardId, Catalog};
use crate::core::{GameRng, PlayerId};
use crate::deck::Deck;

use super::PlayerPolicy;

/// Lowest supported difficulty.
pub const MIN_DIFFICULTY: u8 = 1;
/// Highest supported difficulty.
pub const MAX_DIFFICULTY: u8 = 3;

/// A scripted opponent.
///
/// Difficulty levels:
/// 1. random: a random playable card at a random free cell, sometimes
///    passing to bank elixir;
/// 2. rusher: the cheapest playable card, placed as far forward as the
///    zone allows;
/// 3. value: the highest attack-plus-HP card placed forward; when enemy
///    units cross into its half of the lane it switches to the highest-HP
///    card placed next to its own tower.
///
/// Candidate cards come from the deck's playable set and candidate cells
/// from the free cells of the placement zone, so deck and zone rejections
/// never happen. A chosen cell can still be occupied by the time placement
/// resolves - movement runs first within the tick - and such a rejection
/// simply becomes a pass.
#[derive(Clone, Debug)]
pub struct AiPolicy {
    difficulty: u8,
    rng: GameRng,
}

impl AiPolicy {
    /// Create an AI at the given difficulty.
    ///
    /// Panics if `difficulty` is outside `1..=3`.
    #[must_use]
    pub fn new(difficulty: u8, rng: GameRng) -> Self {
        assert!(
            (MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&difficulty),
            "difficulty {difficulty} outside {MIN_DIFFICULTY}..={MAX_DIFFICULTY}"
        );
        Self { difficulty, rng }
    }

    /// The configured difficulty.
    #[must_use]
    pub fn difficulty(&self) -> u8 {
        self.difficulty
    }

    fn decide_random(&mut self, cards: &[CardId], cells: &[usize]) -> Action {
        // Bank elixir now and then so level 1 is not pure card spam
        if self.rng.gen_bool(0.25) {
            return Action::Pass;
        }
        let card = *self.rng.choose(cards).expect("cards is non-empty");
        let position = *self.rng.choose(cells).expect("cells is non-empty");
        Action::Place { card, position }
    }

    fn decide_rush(catalog: &Catalog, cards: &[CardId], forward: usize) -> Action {
        let card = *cards
            .iter()
            .min_by_key(|&&c| catalog.get_unchecked(c).cost)
            .expect("cards is non-empty");
        Action::Place {
            card,
            position: forward,
        }
    }

    fn decide_value(
        catalog: &Catalog,
        state: &BattleState,
        player: PlayerId,
        cards: &[CardId],
        forward: usize,
        rear: usize,
    ) -> Action {
        let own_tower = state.tower_cell(player);
        let half = state.config().grid_len / 2;
        let under_pressure = state
            .units_of(player.opponent())
            .any(|u| u.position.abs_diff(own_tower) <= half);

        if under_pressure {
            let card = *cards
                .iter()
                .max_by_key(|&&c| catalog.get_unchecked(c).hp)
                .expect("cards is non-empty");
            Action::Place {
                card,
                position: rear,
            }
        } else {
            let card = *cards
                .iter()
                .max_by_key(|&&c| {
                    let def = catalog.get_unchecked(c);
                    def.attack + def.hp
                })
                .expect("cards is non-empty");
            Action::Place {
                card,
                position: forward,
            }
        }
    }
}

impl PlayerPolicy for AiPolicy {
    fn decide(
        &mut self,
        state: &BattleState,
        player: PlayerId,
        deck: &Deck,
        catalog: &Catalog,
    ) -> Action {
        if state.unit_count(player) >= state.config().unit_cap {
            return Action::Pass;
        }
        let cards = deck.playable(catalog, state.elixir(player));
        if cards.is_empty() {
            return Action::Pass;
        }
        let cells: Vec<usize> = state
            .placement_zone(player)
            .filter(|&cell| state.is_cell_free(cell))
            .collect();
        if cells.is_empty() {
            return Action::Pass;
        }

        // Cells ascend; "forward" means toward the enemy tower.
        let (forward, rear) = match player.index() {
            0 => (*cells.last().expect("cells is non-empty"), cells[0]),
            _ => (cells[0], *cells.last().expect("cells is non-empty")),
        };

        match self.difficulty {
            1 => self.decide_random(&cards, &cells),
            2 => Self::decide_rush(catalog, &cards, forward),
            _ => Self::decide_value(catalog, state, player, &cards, forward, rear),
        }
    }
}
