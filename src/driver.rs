//! Match orchestration: from a seed and a configuration to a finished
//! replay.
//!
//! The driver owns the glue the engine deliberately leaves out: dealing
//! decks, forking per-player RNG streams, pumping policies for actions,
//! and assembling the replay. Batch generation runs matches in parallel
//! with per-game seeds derived from a base seed, so a batch is as
//! reproducible as a single game.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::battle::{resolve_turn, BattleConfig, BattleState};
use crate::cards::Catalog;
use crate::core::{ConfigError, GameRng, PlayerId, PlayerPair};
use crate::deck::{Deck, DeckList, DEFAULT_HAND_SIZE};
use crate::policy::{AiPolicy, PlayerPolicy};
use crate::replay::{Recorder, Replay, ReplayMeta, REPLAY_FORMAT_VERSION};

/// Who controls a player slot.
///
/// The headless driver backs both kinds with the AI; the kind is recorded
/// in replay metadata so analysis tooling can tell training games from
/// games a person nominally played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    /// A person's slot.
    Human,
    /// A built-in AI.
    Ai,
}

impl PlayerKind {
    /// Metadata label for this kind.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PlayerKind::Human => "human",
            PlayerKind::Ai => "ai",
        }
    }
}

impl std::str::FromStr for PlayerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "human" => Ok(PlayerKind::Human),
            "ai" => Ok(PlayerKind::Ai),
            other => Err(format!("unknown player kind {other:?} (human or ai)")),
        }
    }
}

/// Everything needed to run one match.
#[derive(Clone, Debug)]
pub struct MatchSetup {
    /// Battle configuration.
    pub config: BattleConfig,
    /// Controller per player slot.
    pub players: PlayerPair<PlayerKind>,
    /// AI difficulty, `1..=3`.
    pub difficulty: u8,
    /// Master seed; decks and AI streams fork from it.
    pub seed: u64,
    /// Hand window size.
    pub hand_size: usize,
}

impl MatchSetup {
    /// A default setup under the given seed: two AI players at difficulty 2.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            config: BattleConfig::default(),
            players: PlayerPair::with_value(PlayerKind::Ai),
            difficulty: 2,
            seed,
            hand_size: DEFAULT_HAND_SIZE,
        }
    }
}

/// Run one match with the setup's built-in AI policies.
pub fn run_match(catalog: &Catalog, setup: &MatchSetup) -> Result<Replay, ConfigError> {
    let mut rng = GameRng::new(setup.seed);
    // Forks must happen in a fixed order or replays stop reproducing:
    // player 0's deck, player 1's deck, then each policy stream.
    let deck_rngs = PlayerPair::new(rng.fork(), rng.fork());
    let mut policies: PlayerPair<Box<dyn PlayerPolicy>> =
        PlayerPair::new(
            Box::new(AiPolicy::new(setup.difficulty, rng.fork())),
            Box::new(AiPolicy::new(setup.difficulty, rng.fork())),
        );
    run_match_with_policies(catalog, setup, deck_rngs, &mut policies)
}

/// Run one match with caller-supplied policies.
///
/// `deck_rngs` decides each player's shuffle; [`run_match`] forks them from
/// the master seed. Policies are pumped once per tick in player order.
pub fn run_match_with_policies(
    catalog: &Catalog,
    setup: &MatchSetup,
    deck_rngs: PlayerPair<GameRng>,
    policies: &mut PlayerPair<Box<dyn PlayerPolicy>>,
) -> Result<Replay, ConfigError> {
    catalog.validate()?;
    let mut state = BattleState::new(setup.config.clone())?;

    let mut decks = deck_rngs.map(|rng| Deck::deal(catalog, setup.hand_size, rng));
    let deck_lists = PlayerPair::from_fn(|p| DeckList::from_deck(&decks[p], catalog));

    log::info!(
        "match start: seed={} difficulty={} players={}/{}",
        setup.seed,
        setup.difficulty,
        setup.players[PlayerId::new(0)].label(),
        setup.players[PlayerId::new(1)].label(),
    );

    let mut recorder = Recorder::new();
    while !state.is_over() {
        let actions = PlayerPair::from_fn(|p| {
            policies[p].decide(&state, p, &decks[p], catalog)
        });
        let record = resolve_turn(&mut state, &mut decks, catalog, actions)
            .expect("loop checked the battle is not over");
        recorder.record(record);
    }

    let outcome = state.outcome().expect("loop exited on a terminal state");
    log::info!(
        "match end: turns={} outcome={outcome:?}",
        state.turn()
    );

    Ok(recorder.finish(ReplayMeta {
        version: REPLAY_FORMAT_VERSION,
        seed: setup.seed,
        player_types: PlayerPair::from_fn(|p| setup.players[p].label().to_string()),
        difficulty: setup.difficulty,
        decks: deck_lists,
        config: setup.config.clone(),
        turn_count: state.turn(),
        winner: outcome.winner(),
        outcome,
        batch_index: None,
    }))
}

/// Seed for the `index`th game of a batch based at `base_seed`.
///
/// Spreads seeds with the 64-bit golden-ratio constant so adjacent games
/// do not share deck shuffles.
#[must_use]
pub fn batch_game_seed(base_seed: u64, index: usize) -> u64 {
    base_seed.wrapping_add((index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Run `count` matches in parallel and return their replays in batch order.
///
/// Game `i` runs under [`batch_game_seed`]`(setup.seed, i)` and carries
/// `batch_index = i` in its metadata. Parallelism does not affect results;
/// each game's randomness comes only from its derived seed.
pub fn generate_batch(
    catalog: &Catalog,
    setup: &MatchSetup,
    count: usize,
) -> Result<Vec<Replay>, ConfigError> {
    log::info!("batch start: {count} games from base seed {}", setup.seed);

    (0..count)
        .into_par_iter()
        .map(|index| {
            let game_setup = MatchSetup {
                seed: batch_game_seed(setup.seed, index),
                ..setup.clone()
            };
            let mut replay = run_match(catalog, &game_setup)?;
            replay.meta.batch_index = Some(index);
            Ok(replay)
        })
        .collect()
}
