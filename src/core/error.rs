//! Error taxonomy for the battle engine.
//!
//! Three tiers, matching how each failure is handled:
//!
//! - [`InvalidPlay`]: a rejected placement. Always recoverable - the resolver
//!   downgrades the action to a pass and records the reason in the turn log.
//! - [`ConfigError`]: a malformed catalog or battle configuration. Fatal at
//!   setup time; the game never starts.
//! - [`TerminalStateError`]: actions submitted after game over. A driver bug,
//!   surfaced as an error rather than silently ignored.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cards::CardId;

/// Reason a placement action was rejected.
///
/// Never aborts a game: the resolver treats the action as an implicit pass
/// and the reason lands in the replay log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvalidPlay {
    /// The card costs more elixir than the player has.
    InsufficientElixir { cost: u32, available: u32 },
    /// The card matches the player's immediately preceding play.
    RepeatCard { card: CardId },
    /// The card is not in the player's current hand window.
    NotInHand { card: CardId },
    /// The card ID is not in the catalog.
    UnknownCard { card: CardId },
    /// The position is outside the player's placement zone.
    OutOfZone { position: usize },
    /// The position is already occupied by a unit or tower.
    Occupied { position: usize },
    /// The player already fields the maximum number of units.
    UnitCapReached { cap: usize },
    /// The deck is empty even after reshuffling the catalog back in.
    DeckExhausted,
}

impl fmt::Display for InvalidPlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidPlay::InsufficientElixir { cost, available } => {
                write!(f, "insufficient elixir: need {cost}, have {available}")
            }
            InvalidPlay::RepeatCard { card } => {
                write!(f, "{card} was the previous play and may not repeat")
            }
            InvalidPlay::NotInHand { card } => write!(f, "{card} is not in hand"),
            InvalidPlay::UnknownCard { card } => write!(f, "{card} is not in the catalog"),
            InvalidPlay::OutOfZone { position } => {
                write!(f, "cell {position} is outside the placement zone")
            }
            InvalidPlay::Occupied { position } => write!(f, "cell {position} is occupied"),
            InvalidPlay::UnitCapReached { cap } => {
                write!(f, "unit cap of {cap} already reached")
            }
            InvalidPlay::DeckExhausted => write!(f, "deck exhausted after reshuffle"),
        }
    }
}

impl std::error::Error for InvalidPlay {}

/// Setup-time configuration failure. The game cannot start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Grid too short to hold two towers and a placement zone each.
    GridTooShort { len: usize },
    /// Towers must start with positive HP.
    ZeroTowerHp,
    /// Elixir maximum must be positive.
    ZeroMaxElixir,
    /// Starting elixir exceeds the configured maximum.
    StartingElixirOverMax { starting: u32, max: u32 },
    /// Turn limit must be positive.
    ZeroTurnLimit,
    /// Per-player unit cap must be positive.
    ZeroUnitCap,
    /// A catalog entry has a non-positive stat that must be positive.
    BadCardStat { card: String, stat: &'static str },
    /// Two catalog entries share a name.
    DuplicateCardName { name: String },
    /// The catalog has no cards to deal from.
    EmptyCatalog,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::GridTooShort { len } => {
                write!(f, "grid length {len} is too short (minimum 4)")
            }
            ConfigError::ZeroTowerHp => write!(f, "tower HP must be positive"),
            ConfigError::ZeroMaxElixir => write!(f, "max elixir must be positive"),
            ConfigError::StartingElixirOverMax { starting, max } => {
                write!(f, "starting elixir {starting} exceeds max {max}")
            }
            ConfigError::ZeroTurnLimit => write!(f, "turn limit must be positive"),
            ConfigError::ZeroUnitCap => write!(f, "unit cap must be positive"),
            ConfigError::BadCardStat { card, stat } => {
                write!(f, "card {card:?}: {stat} must be positive")
            }
            ConfigError::DuplicateCardName { name } => {
                write!(f, "duplicate card name {name:?} in catalog")
            }
            ConfigError::EmptyCatalog => write!(f, "catalog has no cards"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Actions were submitted to a battle that is already over.
///
/// This is driver misuse, not a game event; the resolver refuses to advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TerminalStateError;

impl fmt::Display for TerminalStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "turn submitted after game over")
    }
}

impl std::error::Error for TerminalStateError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_play_display() {
        let err = InvalidPlay::InsufficientElixir {
            cost: 5,
            available: 2,
        };
        assert_eq!(format!("{err}"), "insufficient elixir: need 5, have 2");

        let err = InvalidPlay::UnitCapReached { cap: 4 };
        assert_eq!(format!("{err}"), "unit cap of 4 already reached");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::GridTooShort { len: 2 };
        assert_eq!(format!("{err}"), "grid length 2 is too short (minimum 4)");
    }

    #[test]
    fn test_terminal_state_error_display() {
        assert_eq!(
            format!("{TerminalStateError}"),
            "turn submitted after game over"
        );
    }

    #[test]
    fn test_invalid_play_round_trips_through_json() {
        let err = InvalidPlay::RepeatCard {
            card: CardId::new(3),
        };
        let json = serde_json::to_string(&err).unwrap();
        let back: InvalidPlay = serde_json::from_str(&json).unwrap();
        assert_eq!(err, back);
    }
}
