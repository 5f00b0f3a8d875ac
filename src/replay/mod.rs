//! Structured replay logs.
//!
//! A replay is the complete machine-readable record of one battle: the
//! setup needed to reproduce it (seed, config, decks) plus every resolved
//! turn with actions, dispositions, events, and board snapshots. Replays
//! serialize to JSON for offline analysis tooling.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::battle::{BattleConfig, Outcome, TurnRecord};
use crate::core::{PlayerId, PlayerPair};
use crate::deck::DeckList;

/// Bumped when the replay JSON layout changes incompatibly.
pub const REPLAY_FORMAT_VERSION: u32 = 1;

/// Replay I/O failure.
#[derive(Debug)]
pub enum ReplayError {
    /// Filesystem failure while reading or writing.
    Io(std::io::Error),
    /// The file is not a replay this version understands.
    Format(serde_json::Error),
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplayError::Io(err) => write!(f, "replay I/O error: {err}"),
            ReplayError::Format(err) => write!(f, "malformed replay: {err}"),
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReplayError::Io(err) => Some(err),
            ReplayError::Format(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ReplayError {
    fn from(err: std::io::Error) -> Self {
        ReplayError::Io(err)
    }
}

impl From<serde_json::Error> for ReplayError {
    fn from(err: serde_json::Error) -> Self {
        ReplayError::Format(err)
    }
}

/// Game-level metadata: everything needed to reproduce the battle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplayMeta {
    /// Replay layout version.
    pub version: u32,
    /// Master seed the battle ran under.
    pub seed: u64,
    /// Controller type per player, e.g. `"human"` or `"ai"`.
    pub player_types: PlayerPair<String>,
    /// AI difficulty in effect.
    pub difficulty: u8,
    /// Deck composition per player, in deal order.
    pub decks: PlayerPair<DeckList>,
    /// Battle configuration.
    pub config: BattleConfig,
    /// Turns resolved before the battle ended.
    pub turn_count: u32,
    /// Winning player, if the battle was not a draw.
    pub winner: Option<PlayerId>,
    /// Terminal outcome.
    pub outcome: Outcome,
    /// Index within a batch run, when part of one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_index: Option<usize>,
}

/// Aggregate statistics derived from a replay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplaySummary {
    /// Turns resolved.
    pub turn_count: u32,
    /// Winning player, if any.
    pub winner: Option<PlayerId>,
    /// Surviving tower HP at the end.
    pub final_tower_hp: PlayerPair<u32>,
    /// Peak simultaneous unit count per player.
    pub max_units: PlayerPair<usize>,
    /// Mean unit count per player across turn-end snapshots.
    pub avg_units: PlayerPair<f64>,
}

/// A complete recorded battle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Replay {
    /// Game-level metadata.
    pub meta: ReplayMeta,
    /// Every resolved turn, in order.
    pub turns: Vec<TurnRecord>,
}

impl Replay {
    /// Write the replay as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ReplayError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Load a replay from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let file = File::open(path)?;
        let replay: Replay = serde_json::from_reader(BufReader::new(file))?;
        Ok(replay)
    }

    /// Compute aggregate statistics over the recorded turns.
    #[must_use]
    pub fn summary(&self) -> ReplaySummary {
        let mut max_units = PlayerPair::with_value(0usize);
        let mut total_units = PlayerPair::with_value(0usize);

        for turn in &self.turns {
            for player in PlayerId::both() {
                let count = turn
                    .after
                    .units
                    .iter()
                    .filter(|u| u.owner == player)
                    .count();
                max_units[player] = max_units[player].max(count);
                total_units[player] += count;
            }
        }

        let turns = self.turns.len();
        let final_tower_hp = self
            .turns
            .last()
            .map_or(PlayerPair::with_value(self.meta.config.tower_hp), |t| {
                t.after.tower_hp
            });

        ReplaySummary {
            turn_count: self.meta.turn_count,
            winner: self.meta.winner,
            final_tower_hp,
            max_units,
            avg_units: PlayerPair::from_fn(|p| {
                if turns == 0 {
                    0.0
                } else {
                    total_units[p] as f64 / turns as f64
                }
            }),
        }
    }
}

/// Accumulates turn records during a live battle.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    turns: Vec<TurnRecord>,
}

impl Recorder {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one resolved turn.
    pub fn record(&mut self, turn: TurnRecord) {
        self.turns.push(turn);
    }

    /// Turns recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Check whether anything has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Finish recording and assemble the replay.
    #[must_use]
    pub fn finish(self, meta: ReplayMeta) -> Replay {
        Replay {
            meta,
            turns: self.turns,
        }
    }
}
