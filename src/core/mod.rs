//! Core engine types: players, RNG, and the error taxonomy.

pub mod error;
pub mod player;
pub mod rng;

pub use error::{ConfigError, InvalidPlay, TerminalStateError};
pub use player::{PlayerId, PlayerPair};
pub use rng::GameRng;
