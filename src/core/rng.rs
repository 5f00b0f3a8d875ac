//! Deterministic random number generation.
//!
//! All randomness in a game - deck shuffling, AI card choice - flows through
//! `GameRng`, which is seeded once per game. The turn resolver itself never
//! touches the RNG, so identical states and actions always resolve
//! identically; storing the seed in the replay is enough to reproduce a
//! whole game.
//!
//! ## Forking
//!
//! ```
//! use clashlane::core::GameRng;
//!
//! let mut master = GameRng::new(42);
//!
//! // Independent streams for each deck and each AI
//! let mut deck_rng = master.fork();
//! let mut ai_rng = master.fork();
//!
//! let a: Vec<usize> = (0..8).map(|_| deck_rng.gen_range_usize(0..1000)).collect();
//! let b: Vec<usize> = (0..8).map(|_| ai_rng.gen_range_usize(0..1000)).collect();
//! assert_ne!(a, b);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic RNG with forking for independent streams.
///
/// Uses ChaCha8 for speed while keeping high-quality randomness.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// The seed this RNG was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fork this RNG to create an independent stream.
    ///
    /// Each fork produces a different but deterministic sequence: the Nth
    /// fork of a given seed is always the same stream. Used to give each
    /// deck and each AI its own randomness without sharing state.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self
            .seed
            .wrapping_add(self.fork_counter.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        Self {
            inner: ChaCha8Rng::seed_from_u64(fork_seed),
            seed: fork_seed,
            fork_counter: 0,
        }
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Generate a random boolean with the given probability of `true`.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        self.inner.gen_bool(probability)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }
}
