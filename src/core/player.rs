//! Player identification and two-sided data storage.
//!
//! ## PlayerId
//!
//! Type-safe identifier for the two players in a battle. Player 0 owns the
//! tower at the left end of the lane, player 1 the tower at the right end.
//!
//! ## PlayerPair
//!
//! Per-player data storage with O(1) access, indexable by `PlayerId`.
//! A battle always has exactly two sides, so this is a fixed pair rather
//! than a general map.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Player identifier. Only `PlayerId(0)` and `PlayerId(1)` are valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    ///
    /// Panics if `id` is not 0 or 1.
    #[must_use]
    pub fn new(id: u8) -> Self {
        assert!(id < 2, "PlayerId must be 0 or 1");
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Get the opposing player.
    #[must_use]
    pub const fn opponent(self) -> Self {
        Self(1 - self.0)
    }

    /// Both player IDs in resolution order (player 0 first).
    #[must_use]
    pub const fn both() -> [PlayerId; 2] {
        [PlayerId(0), PlayerId(1)]
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-player data storage for the two sides of a battle.
///
/// ## Example
///
/// ```
/// use clashlane::core::{PlayerId, PlayerPair};
///
/// let mut elixir = PlayerPair::with_value(5u32);
/// elixir[PlayerId::new(1)] += 3;
///
/// assert_eq!(elixir[PlayerId::new(0)], 5);
/// assert_eq!(elixir[PlayerId::new(1)], 8);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerPair<T> {
    data: [T; 2],
}

impl<T> PlayerPair<T> {
    /// Create a pair from player 0's and player 1's values.
    #[must_use]
    pub fn new(p0: T, p1: T) -> Self {
        Self { data: [p0, p1] }
    }

    /// Create a pair with both entries set to the same value.
    #[must_use]
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            data: [value.clone(), value],
        }
    }

    /// Create a pair with values from a factory function.
    #[must_use]
    pub fn from_fn(mut factory: impl FnMut(PlayerId) -> T) -> Self {
        Self {
            data: [factory(PlayerId(0)), factory(PlayerId(1))],
        }
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Map both entries through a function, preserving sides.
    #[must_use]
    pub fn map<U>(self, f: impl Fn(T) -> U) -> PlayerPair<U> {
        let [p0, p1] = self.data;
        PlayerPair::new(f(p0), f(p1))
    }
}

impl<T> Index<PlayerId> for PlayerPair<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerPair<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}
