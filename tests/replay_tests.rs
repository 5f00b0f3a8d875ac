//! Replay persistence and reconstruction tests.

use clashlane::battle::{resolve_turn, Action, BattleState, TurnEvent};
use clashlane::cards::standard_catalog;
use clashlane::core::{GameRng, PlayerId, PlayerPair};
use clashlane::deck::Deck;
use clashlane::driver::{generate_batch, run_match, MatchSetup, PlayerKind};
use clashlane::replay::{Replay, ReplayError, REPLAY_FORMAT_VERSION};

#[test]
fn save_and_load_round_trip() {
    let catalog = standard_catalog();
    let replay = run_match(&catalog, &MatchSetup::new(42)).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game.json");
    replay.save(&path).unwrap();

    let loaded = Replay::load(&path).unwrap();
    assert_eq!(replay, loaded);
    assert_eq!(loaded.meta.version, REPLAY_FORMAT_VERSION);
}

#[test]
fn loading_garbage_is_a_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.json");
    std::fs::write(&path, "{ not json").unwrap();

    let result = Replay::load(&path);
    assert!(matches!(result, Err(ReplayError::Format(_))));
}

#[test]
fn loading_a_missing_file_is_an_io_error() {
    let result = Replay::load("/nonexistent/replay.json");
    assert!(matches!(result, Err(ReplayError::Io(_))));
}

#[test]
fn replay_metadata_describes_the_match() {
    let catalog = standard_catalog();
    let mut setup = MatchSetup::new(9);
    setup.players = PlayerPair::new(PlayerKind::Human, PlayerKind::Ai);
    setup.difficulty = 3;

    let replay = run_match(&catalog, &setup).unwrap();

    assert_eq!(replay.meta.seed, 9);
    assert_eq!(replay.meta.difficulty, 3);
    assert_eq!(replay.meta.player_types[PlayerId::new(0)], "human");
    assert_eq!(replay.meta.config.grid_len, 10);
    for player in PlayerId::both() {
        // Full catalog dealt into each deck
        assert_eq!(replay.meta.decks[player].cards.len(), catalog.len());
    }
    assert_eq!(replay.meta.winner, replay.meta.outcome.winner());
}

#[test]
fn turn_records_chain_snapshots() {
    let catalog = standard_catalog();
    let replay = run_match(&catalog, &MatchSetup::new(17)).unwrap();
    assert!(!replay.turns.is_empty());

    for (i, turn) in replay.turns.iter().enumerate() {
        assert_eq!(turn.turn as usize, i);
        assert_eq!(turn.before.turn as usize, i);
        assert_eq!(turn.after.turn as usize, i + 1);
    }
    // Each turn's before-state is the previous turn's after-state
    for pair in replay.turns.windows(2) {
        assert_eq!(pair[0].after, pair[1].before);
    }
    // The last turn carries the outcome
    assert_eq!(replay.turns.last().unwrap().outcome, Some(replay.meta.outcome));
    assert!(replay.turns[..replay.turns.len() - 1]
        .iter()
        .all(|t| t.outcome.is_none()));
}

#[test]
fn replaying_recorded_actions_reproduces_the_game() {
    let catalog = standard_catalog();
    let replay = run_match(&catalog, &MatchSetup::new(23)).unwrap();

    // Re-run the engine from the recorded seed and actions; every snapshot
    // must match the recording.
    let mut state = BattleState::new(replay.meta.config.clone()).unwrap();
    let mut rng = GameRng::new(replay.meta.seed);
    let mut decks = PlayerPair::new(rng.fork(), rng.fork())
        .map(|deck_rng| Deck::deal(&catalog, clashlane::deck::DEFAULT_HAND_SIZE, deck_rng));

    for recorded in &replay.turns {
        let record = resolve_turn(&mut state, &mut decks, &catalog, recorded.actions).unwrap();
        assert_eq!(&record, recorded);
    }
    assert_eq!(state.outcome(), Some(replay.meta.outcome));
}

#[test]
fn summary_counts_units_and_winner() {
    let catalog = standard_catalog();
    let replay = run_match(&catalog, &MatchSetup::new(31)).unwrap();
    let summary = replay.summary();

    assert_eq!(summary.turn_count, replay.meta.turn_count);
    assert_eq!(summary.winner, replay.meta.winner);
    for player in PlayerId::both() {
        let cap = replay.meta.config.unit_cap;
        assert!(summary.max_units[player] <= cap);
        assert!(summary.avg_units[player] <= cap as f64);
        assert!(summary.avg_units[player] >= 0.0);
    }
    // AI games at difficulty 2 always field units
    assert!(replay
        .turns
        .iter()
        .any(|t| t.events.iter().any(|e| matches!(e, TurnEvent::Placed { .. }))));
}

#[test]
fn batch_replays_save_into_distinct_files() {
    let catalog = standard_catalog();
    let replays = generate_batch(&catalog, &MatchSetup::new(5), 3).unwrap();

    let dir = tempfile::tempdir().unwrap();
    for replay in &replays {
        let index = replay.meta.batch_index.unwrap();
        replay.save(dir.path().join(format!("game_{index:05}.json"))).unwrap();
    }

    let mut names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, ["game_00000.json", "game_00001.json", "game_00002.json"]);

    // Loading any of them reproduces the in-memory replay
    let loaded = Replay::load(dir.path().join("game_00001.json")).unwrap();
    assert_eq!(&loaded, &replays[1]);
}

#[test]
fn pass_only_games_record_empty_event_lists() {
    let catalog = standard_catalog();
    let config = clashlane::battle::BattleConfig {
        max_turns: 3,
        ..Default::default()
    };
    let mut state = BattleState::new(config).unwrap();
    let mut rng = GameRng::new(1);
    let mut decks = PlayerPair::from_fn(|_| {
        Deck::deal(&catalog, clashlane::deck::DEFAULT_HAND_SIZE, rng.fork())
    });

    for turn in 0..3 {
        let record = resolve_turn(
            &mut state,
            &mut decks,
            &catalog,
            PlayerPair::with_value(Action::Pass),
        )
        .unwrap();
        if turn < 2 {
            assert!(record.events.is_empty());
        } else {
            // Final tick carries only the game-end event
            assert!(matches!(record.events[..], [TurnEvent::GameEnded { .. }]));
        }
    }
}
