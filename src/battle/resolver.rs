//! The turn resolver: one deterministic tick of battle.
//!
//! A tick runs four phases in a fixed order:
//!
//! 1. **Movement** - units advance one cell toward the enemy tower when the
//!    way is clear. A move consumes the unit's turn. One-cell gaps between
//!    opposing units are contested: the unit with strictly greater current
//!    HP takes the cell, equal HP freezes both.
//! 2. **Placement** - submitted actions are validated (elixir, no-repeat,
//!    zone, occupancy, unit cap) in player-0-then-player-1 order. A failed
//!    validation downgrades the action to a pass; it never aborts the game.
//!    Freshly placed units sit out the rest of the tick.
//! 3. **Attack** - every unit that did not move strikes the nearest enemy
//!    in range (lowest HP first on distance ties). Damage is simultaneous:
//!    targeting and tie-breaks read the pre-phase board, so a unit that
//!    dies this phase still deals its damage.
//! 4. **Cleanup** - dead units are removed, elixir accrues, turn flags
//!    reset, the turn counter advances, and terminal conditions are
//!    checked.
//!
//! The resolver holds no randomness: identical states and actions produce
//! identical results, bit for bit. All shuffling and AI choice happens
//! before actions are submitted.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::Catalog;
use crate::core::{InvalidPlay, PlayerId, PlayerPair, TerminalStateError};
use crate::deck::Deck;

use super::action::{Action, ActionOutcome};
use super::snapshot::StateSnapshot;
use super::state::{BattleState, Outcome};
use super::unit::UnitId;

/// What an attack landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackTarget {
    /// An enemy unit.
    Unit(UnitId),
    /// The tower owned by this player.
    Tower(PlayerId),
}

/// One thing that happened during a tick, in phase order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEvent {
    /// A unit advanced one cell.
    Moved {
        /// The unit that moved.
        unit: UnitId,
        /// Cell before the move.
        from: usize,
        /// Cell after the move.
        to: usize,
    },
    /// A placement was applied.
    Placed {
        /// The placing player.
        player: PlayerId,
        /// The card played.
        card: crate::cards::CardId,
        /// The spawned unit.
        unit: UnitId,
        /// Where it landed.
        position: usize,
    },
    /// A placement failed validation and became an implicit pass.
    PlacementRejected {
        /// The submitting player.
        player: PlayerId,
        /// The rejected action.
        action: Action,
        /// Why it was rejected.
        reason: InvalidPlay,
    },
    /// A unit dealt damage.
    Attacked {
        /// The attacking unit.
        attacker: UnitId,
        /// What it hit.
        target: AttackTarget,
        /// Damage dealt.
        damage: u32,
    },
    /// A unit died and left the board.
    UnitDestroyed {
        /// The destroyed unit.
        unit: UnitId,
        /// Its owner.
        owner: PlayerId,
    },
    /// The battle reached a terminal state.
    GameEnded {
        /// The final outcome.
        outcome: Outcome,
    },
}

/// Complete record of one resolved tick.
///
/// Sufficient for a recorder to reconstruct the tick without re-running it:
/// submitted actions and their dispositions, the phase-by-phase event list,
/// and full before/after snapshots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Index of the resolved turn (0-based).
    pub turn: u32,
    /// Actions as submitted.
    pub actions: PlayerPair<Action>,
    /// How each action was disposed of.
    pub action_outcomes: PlayerPair<ActionOutcome>,
    /// Board before the tick.
    pub before: StateSnapshot,
    /// Board after the tick.
    pub after: StateSnapshot,
    /// Everything that happened, in phase order.
    pub events: Vec<TurnEvent>,
    /// Terminal outcome, when this tick ended the battle.
    pub outcome: Option<Outcome>,
}

/// Resolve one tick.
///
/// Fails with [`TerminalStateError`] if the battle is already over - that
/// is driver misuse, not a game event.
pub fn resolve_turn(
    state: &mut BattleState,
    decks: &mut PlayerPair<Deck>,
    catalog: &Catalog,
    actions: PlayerPair<Action>,
) -> Result<TurnRecord, TerminalStateError> {
    if state.is_over() {
        return Err(TerminalStateError);
    }

    let turn = state.turn();
    let before = StateSnapshot::capture(state);
    let mut events = Vec::new();

    movement_phase(state, &mut events);
    let action_outcomes = placement_phase(state, decks, catalog, &actions, &mut events);
    attack_phase(state, catalog, &mut events);
    let outcome = cleanup_phase(state, &mut events);

    debug_assert_eq!(state.check_invariants(catalog), Ok(()));

    Ok(TurnRecord {
        turn,
        actions,
        action_outcomes,
        before,
        after: StateSnapshot::capture(state),
        events,
        outcome,
    })
}

/// Movement phase.
///
/// Per player, front-most units move first so a column advances together
/// instead of leaving gaps. Player 0's units are processed before player
/// 1's; gap races between opposing units are settled by the HP tie-break,
/// which does not depend on processing order.
fn movement_phase(state: &mut BattleState, events: &mut Vec<TurnEvent>) {
    for player in PlayerId::both() {
        let dir = state.advance_direction(player);
        let enemy_tower = state.tower_cell(player.opponent());

        let mut ids: Vec<(usize, UnitId)> = state
            .units_of(player)
            .map(|u| (u.position.abs_diff(enemy_tower), u.id))
            .collect();
        ids.sort();

        for (_, id) in ids {
            let unit = state.unit(id).expect("live unit collected this phase");
            if unit.moved_this_turn {
                continue;
            }
            let from = unit.position;
            let hp = unit.hp;

            let next = from.wrapping_add_signed(dir);
            if next == enemy_tower || state.unit_at(next).is_some() {
                // Tower reached or path blocked; the attack phase takes over.
                continue;
            }

            // Contested advance: an enemy one cell beyond the gap only
            // yields to strictly greater current HP.
            let beyond = next.wrapping_add_signed(dir);
            if beyond < state.config().grid_len {
                if let Some(other) = state.unit_at(beyond) {
                    if other.owner != player && hp <= other.hp {
                        continue;
                    }
                }
            }

            let unit = state.unit_mut(id).expect("live unit collected this phase");
            unit.position = next;
            unit.moved_this_turn = true;
            events.push(TurnEvent::Moved {
                unit: id,
                from,
                to: next,
            });
        }
    }
}

/// Placement phase, player 0 first.
fn placement_phase(
    state: &mut BattleState,
    decks: &mut PlayerPair<Deck>,
    catalog: &Catalog,
    actions: &PlayerPair<Action>,
    events: &mut Vec<TurnEvent>,
) -> PlayerPair<ActionOutcome> {
    PlayerPair::from_fn(|player| {
        let action = actions[player];
        let (card, position) = match action {
            Action::Pass => return ActionOutcome::Passed,
            Action::Place { card, position } => (card, position),
        };

        match try_place(state, &mut decks[player], catalog, player, card, position) {
            Ok(unit) => {
                events.push(TurnEvent::Placed {
                    player,
                    card,
                    unit,
                    position,
                });
                ActionOutcome::Accepted
            }
            Err(reason) => {
                log::debug!("{player} placement rejected: {reason}");
                events.push(TurnEvent::PlacementRejected {
                    player,
                    action,
                    reason: reason.clone(),
                });
                ActionOutcome::Rejected(reason)
            }
        }
    })
}

fn try_place(
    state: &mut BattleState,
    deck: &mut Deck,
    catalog: &Catalog,
    player: PlayerId,
    card: crate::cards::CardId,
    position: usize,
) -> Result<UnitId, InvalidPlay> {
    if state.unit_count(player) >= state.config().unit_cap {
        return Err(InvalidPlay::UnitCapReached {
            cap: state.config().unit_cap,
        });
    }
    if !state.placement_zone(player).contains(&position) {
        return Err(InvalidPlay::OutOfZone { position });
    }
    if !state.is_cell_free(position) {
        return Err(InvalidPlay::Occupied { position });
    }

    // The deck enforces elixir, no-repeat, and exhaustion; it mutates only
    // on success, so a rejection leaves everything untouched.
    let elixir = state.elixir(player);
    deck.play(catalog, card, elixir)?;

    let def = catalog.get(card).expect("deck verified catalog membership");
    state.spend_elixir(player, def.cost);
    Ok(state.spawn_unit(player, def, position))
}

/// Attack phase.
///
/// Targeting and damage both read the pre-phase board: every eligible unit
/// picks its target first, then all damage lands at once. A unit destroyed
/// this phase still deals its damage, and there is no overkill chaining
/// within the tick.
fn attack_phase(state: &mut BattleState, catalog: &Catalog, events: &mut Vec<TurnEvent>) {
    struct Pending {
        attacker: UnitId,
        target: AttackTarget,
        damage: u32,
    }

    let turn = state.turn();
    let mut pending = Vec::new();

    for unit in state.units() {
        if unit.moved_this_turn || unit.deployed_turn == turn {
            continue;
        }
        let def = catalog.get_unchecked(unit.card);
        let enemy = unit.owner.opponent();

        // (distance, target HP, tower-last, unit ID) - nearest first,
        // lowest HP on ties to favor finishing blows.
        let mut candidates: SmallVec<[(usize, u32, u8, u32, AttackTarget); 4]> = SmallVec::new();
        for other in state.units_of(enemy) {
            let dist = unit.position.abs_diff(other.position);
            if dist as u32 <= def.range {
                candidates.push((dist, other.hp, 0, other.id.raw(), AttackTarget::Unit(other.id)));
            }
        }
        let tower_dist = unit.position.abs_diff(state.tower_cell(enemy));
        if tower_dist as u32 <= def.range {
            candidates.push((
                tower_dist,
                state.tower(enemy).hp,
                1,
                0,
                AttackTarget::Tower(enemy),
            ));
        }

        let best = candidates
            .iter()
            .min_by_key(|&&(dist, hp, tower, id, _)| (dist, hp, tower, id));
        if let Some(&(_, _, _, _, target)) = best {
            pending.push(Pending {
                attacker: unit.id,
                target,
                damage: def.attack,
            });
        }
    }

    for attack in pending {
        match attack.target {
            AttackTarget::Unit(id) => {
                if let Some(target) = state.unit_mut(id) {
                    target.take_damage(attack.damage);
                }
            }
            AttackTarget::Tower(player) => {
                state.tower_mut(player).take_damage(attack.damage);
            }
        }
        events.push(TurnEvent::Attacked {
            attacker: attack.attacker,
            target: attack.target,
            damage: attack.damage,
        });
    }
}

/// Cleanup phase: deaths, elixir accrual, flag reset, terminal check.
fn cleanup_phase(state: &mut BattleState, events: &mut Vec<TurnEvent>) -> Option<Outcome> {
    for unit in state.remove_dead() {
        events.push(TurnEvent::UnitDestroyed {
            unit: unit.id,
            owner: unit.owner,
        });
    }

    state.accrue_elixir();
    state.reset_turn_flags();
    state.advance_turn();

    let downed: Vec<PlayerId> = PlayerId::both()
        .into_iter()
        .filter(|&p| state.tower(p).is_destroyed())
        .collect();

    let outcome = match downed.as_slice() {
        [] if state.turn() >= state.config().max_turns => Some(Outcome::TurnLimit {
            winner: turn_limit_winner(state),
        }),
        [] => None,
        [loser] => Some(Outcome::TowerDestroyed {
            winner: loser.opponent(),
        }),
        _ => Some(Outcome::BothTowersDestroyed),
    };

    if let Some(outcome) = outcome {
        state.set_outcome(outcome);
        events.push(TurnEvent::GameEnded { outcome });
        log::debug!("battle ended on turn {}: {outcome:?}", state.turn());
    }
    outcome
}

fn turn_limit_winner(state: &BattleState) -> Option<PlayerId> {
    if !state.config().hp_tiebreak {
        return None;
    }
    let p0 = state.tower(PlayerId::new(0)).hp;
    let p1 = state.tower(PlayerId::new(1)).hp;
    match p0.cmp(&p1) {
        std::cmp::Ordering::Greater => Some(PlayerId::new(0)),
        std::cmp::Ordering::Less => Some(PlayerId::new(1)),
        std::cmp::Ordering::Equal => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::state::BattleConfig;
    use crate::cards::{standard_catalog, CardDef, CardId, Catalog};
    use crate::core::GameRng;
    use crate::deck::{Deck, DEFAULT_HAND_SIZE};

    fn setup(config: BattleConfig) -> (Catalog, BattleState, PlayerPair<Deck>) {
        let catalog = standard_catalog();
        let state = BattleState::new(config).unwrap();
        let mut rng = GameRng::new(7);
        let decks = PlayerPair::from_fn(|_| Deck::deal(&catalog, DEFAULT_HAND_SIZE, rng.fork()));
        (catalog, state, decks)
    }

    fn pass_pair() -> PlayerPair<Action> {
        PlayerPair::with_value(Action::Pass)
    }

    #[test]
    fn test_double_pass_advances_turn() {
        let (catalog, mut state, mut decks) = setup(BattleConfig::default());

        let record = resolve_turn(&mut state, &mut decks, &catalog, pass_pair()).unwrap();

        assert_eq!(record.turn, 0);
        assert_eq!(state.turn(), 1);
        assert!(record.events.is_empty());
        assert!(record.action_outcomes[PlayerId::new(0)] == ActionOutcome::Passed);
    }

    #[test]
    fn test_elixir_accrues_on_pass() {
        let (catalog, mut state, mut decks) = setup(BattleConfig::default());

        resolve_turn(&mut state, &mut decks, &catalog, pass_pair()).unwrap();

        assert_eq!(state.elixir(PlayerId::new(0)), 6);
        assert_eq!(state.elixir(PlayerId::new(1)), 6);
    }

    #[test]
    fn test_placement_spawns_and_deducts() {
        let (catalog, mut state, mut decks) = setup(BattleConfig::default());
        let p0 = PlayerId::new(0);
        let card = decks[p0].playable(&catalog, state.elixir(p0))[0];
        let cost = catalog.get_unchecked(card).cost;

        let actions = PlayerPair::new(Action::Place { card, position: 1 }, Action::Pass);
        let record = resolve_turn(&mut state, &mut decks, &catalog, actions).unwrap();

        assert!(record.action_outcomes[p0].is_accepted());
        // Spent cost, then accrued one in cleanup
        assert_eq!(state.elixir(p0), 5 - cost + 1);
        assert_eq!(state.unit_count(p0), 1);
        let unit = state.unit_at(1).unwrap();
        assert_eq!(unit.hp, catalog.get_unchecked(card).hp);
    }

    #[test]
    fn test_rejected_placement_is_implicit_pass() {
        let (catalog, mut state, mut decks) = setup(BattleConfig::default());
        let p0 = PlayerId::new(0);
        let card = decks[p0].playable(&catalog, 10)[0];

        // Cell 5 is outside player 0's zone
        let actions = PlayerPair::new(Action::Place { card, position: 5 }, Action::Pass);
        let record = resolve_turn(&mut state, &mut decks, &catalog, actions).unwrap();

        assert_eq!(
            record.action_outcomes[p0],
            ActionOutcome::Rejected(InvalidPlay::OutOfZone { position: 5 })
        );
        assert_eq!(state.unit_count(p0), 0);
        assert_eq!(state.elixir(p0), 6); // untouched, then accrued
        assert!(record
            .events
            .iter()
            .any(|e| matches!(e, TurnEvent::PlacementRejected { .. })));
    }

    #[test]
    fn test_fresh_unit_neither_moves_nor_attacks() {
        let (catalog, mut state, mut decks) = setup(BattleConfig::default());
        let p0 = PlayerId::new(0);
        let card = decks[p0].playable(&catalog, 10)[0];

        let actions = PlayerPair::new(Action::Place { card, position: 2 }, Action::Pass);
        let record = resolve_turn(&mut state, &mut decks, &catalog, actions).unwrap();

        // Placed this tick: no move, no attack events beyond the placement
        assert!(record
            .events
            .iter()
            .all(|e| matches!(e, TurnEvent::Placed { .. })));
        assert_eq!(state.unit_at(2).unwrap().position, 2);

        // Next tick it advances
        let record = resolve_turn(&mut state, &mut decks, &catalog, pass_pair()).unwrap();
        assert!(record
            .events
            .iter()
            .any(|e| matches!(e, TurnEvent::Moved { from: 2, to: 3, .. })));
    }

    #[test]
    fn test_move_consumes_turn() {
        let catalog = standard_catalog();
        let mut state = BattleState::new(BattleConfig::default()).unwrap();
        let mut rng = GameRng::new(7);
        let mut decks =
            PlayerPair::from_fn(|_| Deck::deal(&catalog, DEFAULT_HAND_SIZE, rng.fork()));

        // Ranged unit two cells from an enemy: it moves instead of attacking,
        // and having moved, does not attack this tick.
        let archer = catalog.get_unchecked(catalog.by_name("Archer").unwrap()).clone();
        let knight = catalog.get_unchecked(catalog.by_name("Knight").unwrap()).clone();
        state.spawn_unit(PlayerId::new(0), &archer, 3);
        state.spawn_unit(PlayerId::new(1), &knight, 6);
        state.advance_turn(); // age the units so they may act
        state.reset_turn_flags();

        let record = resolve_turn(&mut state, &mut decks, &catalog, pass_pair()).unwrap();

        let moved: Vec<_> = record
            .events
            .iter()
            .filter(|e| matches!(e, TurnEvent::Moved { .. }))
            .collect();
        assert_eq!(moved.len(), 2); // both advance into the gap... 3->4, 6->5
        assert!(record
            .events
            .iter()
            .all(|e| !matches!(e, TurnEvent::Attacked { .. })));
    }

    #[test]
    fn test_contested_advance_higher_hp_wins() {
        let catalog = standard_catalog();
        let mut state = BattleState::new(BattleConfig::default()).unwrap();
        let mut rng = GameRng::new(7);
        let mut decks =
            PlayerPair::from_fn(|_| Deck::deal(&catalog, DEFAULT_HAND_SIZE, rng.fork()));

        let knight = catalog.get_unchecked(catalog.by_name("Knight").unwrap()).clone(); // HP 10
        let goblin = catalog.get_unchecked(catalog.by_name("Goblin").unwrap()).clone(); // HP 3
        let a = state.spawn_unit(PlayerId::new(0), &knight, 4);
        let b = state.spawn_unit(PlayerId::new(1), &goblin, 6);
        state.advance_turn();
        state.reset_turn_flags();

        resolve_turn(&mut state, &mut decks, &catalog, pass_pair()).unwrap();

        // Knight (HP 10) takes the gap at 5; Goblin holds at 6
        assert_eq!(state.unit(a).unwrap().position, 5);
        assert_eq!(state.unit(b).unwrap().position, 6);
    }

    #[test]
    fn test_contested_advance_equal_hp_freezes() {
        let catalog = standard_catalog();
        let mut state = BattleState::new(BattleConfig::default()).unwrap();
        let mut rng = GameRng::new(7);
        let mut decks =
            PlayerPair::from_fn(|_| Deck::deal(&catalog, DEFAULT_HAND_SIZE, rng.fork()));

        let knight = catalog.get_unchecked(catalog.by_name("Knight").unwrap()).clone();
        let a = state.spawn_unit(PlayerId::new(0), &knight, 4);
        let b = state.spawn_unit(PlayerId::new(1), &knight, 6);
        state.advance_turn();
        state.reset_turn_flags();

        let record = resolve_turn(&mut state, &mut decks, &catalog, pass_pair()).unwrap();

        assert_eq!(state.unit(a).unwrap().position, 4);
        assert_eq!(state.unit(b).unwrap().position, 6);
        assert!(record
            .events
            .iter()
            .all(|e| !matches!(e, TurnEvent::Moved { .. })));
    }

    #[test]
    fn test_simultaneous_damage_no_overkill_chaining() {
        let mut catalog = Catalog::new();
        catalog.register(CardDef::new(CardId::new(0), "Bruiser", 4, 10, 2));
        let mut state = BattleState::new(BattleConfig::default()).unwrap();
        let mut rng = GameRng::new(7);
        let mut decks =
            PlayerPair::from_fn(|_| Deck::deal(&catalog, DEFAULT_HAND_SIZE, rng.fork()));

        let bruiser = catalog.get_unchecked(CardId::new(0)).clone();
        let a = state.spawn_unit(PlayerId::new(0), &bruiser, 4);
        let b = state.spawn_unit(PlayerId::new(1), &bruiser, 5);
        state.advance_turn();
        state.reset_turn_flags();

        resolve_turn(&mut state, &mut decks, &catalog, pass_pair()).unwrap();

        // Both traded 4 damage in the same phase: 10 -> 6 each
        assert_eq!(state.unit(a).unwrap().hp, 6);
        assert_eq!(state.unit(b).unwrap().hp, 6);
    }

    #[test]
    fn test_tower_siege_ends_with_winner() {
        let mut catalog = Catalog::new();
        catalog.register(CardDef::new(CardId::new(0), "Ram", 10, 20, 2));
        let config = BattleConfig {
            tower_hp: 30,
            max_turns: 50,
            ..BattleConfig::default()
        };
        let mut state = BattleState::new(config).unwrap();
        let mut rng = GameRng::new(7);
        let mut decks =
            PlayerPair::from_fn(|_| Deck::deal(&catalog, DEFAULT_HAND_SIZE, rng.fork()));

        let ram = catalog.get_unchecked(CardId::new(0)).clone();
        state.spawn_unit(PlayerId::new(0), &ram, 8); // adjacent to tower at 9
        state.advance_turn();
        state.reset_turn_flags();

        let p1 = PlayerId::new(1);
        let mut turns = 0;
        while !state.is_over() {
            resolve_turn(&mut state, &mut decks, &catalog, pass_pair()).unwrap();
            turns += 1;
        }

        // 30 HP tower, 10 damage per tick: exactly three attack phases
        assert_eq!(turns, 3);
        assert_eq!(state.tower(p1).hp, 0);
        assert_eq!(
            state.outcome(),
            Some(Outcome::TowerDestroyed {
                winner: PlayerId::new(0)
            })
        );
    }

    #[test]
    fn test_nearest_then_lowest_hp_targeting() {
        let mut catalog = Catalog::new();
        catalog.register(CardDef::new(CardId::new(0), "Sniper", 3, 8, 2).with_range(3));
        catalog.register(CardDef::new(CardId::new(1), "Tank", 1, 20, 2));
        catalog.register(CardDef::new(CardId::new(2), "Scout", 1, 2, 1));
        let mut state = BattleState::new(BattleConfig::default()).unwrap();
        let mut rng = GameRng::new(7);
        let mut decks =
            PlayerPair::from_fn(|_| Deck::deal(&catalog, DEFAULT_HAND_SIZE, rng.fork()));

        let sniper = catalog.get_unchecked(CardId::new(0)).clone();
        let tank = catalog.get_unchecked(CardId::new(1)).clone();
        let scout = catalog.get_unchecked(CardId::new(2)).clone();

        // Sniper at 3 flanked at equal distance: enemy tank at 4 and enemy
        // scout at 2. A friendly tank at 1 pins the scout so nothing moves.
        let sniper_id = state.spawn_unit(PlayerId::new(0), &sniper, 3);
        state.spawn_unit(PlayerId::new(1), &tank, 4);
        let scout_id = state.spawn_unit(PlayerId::new(1), &scout, 2);
        state.spawn_unit(PlayerId::new(0), &tank, 1);
        state.advance_turn();
        state.reset_turn_flags();

        let record = resolve_turn(&mut state, &mut decks, &catalog, pass_pair()).unwrap();

        // Tank and scout are both at distance 1; the distance tie goes to
        // the scout's lower HP.
        let sniper_attack = record.events.iter().find_map(|e| match e {
            TurnEvent::Attacked {
                attacker, target, ..
            } if *attacker == sniper_id => Some(*target),
            _ => None,
        });
        assert_eq!(sniper_attack, Some(AttackTarget::Unit(scout_id)));
    }

    #[test]
    fn test_turn_limit_draw() {
        let (catalog, mut state, mut decks) = setup(BattleConfig {
            max_turns: 3,
            ..BattleConfig::default()
        });

        for _ in 0..3 {
            resolve_turn(&mut state, &mut decks, &catalog, pass_pair()).unwrap();
        }

        assert_eq!(state.outcome(), Some(Outcome::TurnLimit { winner: None }));
    }

    #[test]
    fn test_turn_limit_hp_tiebreak() {
        let (catalog, mut state, mut decks) = setup(BattleConfig {
            max_turns: 1,
            hp_tiebreak: true,
            ..BattleConfig::default()
        });
        state.tower_mut(PlayerId::new(1)).take_damage(10);

        resolve_turn(&mut state, &mut decks, &catalog, pass_pair()).unwrap();

        assert_eq!(
            state.outcome(),
            Some(Outcome::TurnLimit {
                winner: Some(PlayerId::new(0))
            })
        );
    }

    #[test]
    fn test_resolving_after_game_over_fails() {
        let (catalog, mut state, mut decks) = setup(BattleConfig {
            max_turns: 1,
            ..BattleConfig::default()
        });

        resolve_turn(&mut state, &mut decks, &catalog, pass_pair()).unwrap();
        let result = resolve_turn(&mut state, &mut decks, &catalog, pass_pair());

        assert_eq!(result, Err(TerminalStateError));
    }

    #[test]
    fn test_unit_cap_enforced() {
        let (catalog, mut state, mut decks) = setup(BattleConfig {
            unit_cap: 1,
            ..BattleConfig::default()
        });
        let p0 = PlayerId::new(0);

        let card = decks[p0].playable(&catalog, 10)[0];
        let actions = PlayerPair::new(Action::Place { card, position: 1 }, Action::Pass);
        resolve_turn(&mut state, &mut decks, &catalog, actions).unwrap();
        assert_eq!(state.unit_count(p0), 1);

        let card2 = decks[p0].playable(&catalog, 10)[0];
        let actions = PlayerPair::new(
            Action::Place {
                card: card2,
                position: 2,
            },
            Action::Pass,
        );
        let record = resolve_turn(&mut state, &mut decks, &catalog, actions).unwrap();

        assert_eq!(
            record.action_outcomes[p0],
            ActionOutcome::Rejected(InvalidPlay::UnitCapReached { cap: 1 })
        );
    }

    #[test]
    fn test_determinism_bit_identical_records() {
        let run = || {
            let (catalog, mut state, mut decks) = setup(BattleConfig::default());
            let p0 = PlayerId::new(0);
            let p1 = PlayerId::new(1);
            let mut records = Vec::new();
            for i in 0..20 {
                let a0 = decks[p0]
                    .playable(&catalog, state.elixir(p0))
                    .first()
                    .copied()
                    .map_or(Action::Pass, |card| Action::Place {
                        card,
                        position: 1 + (i % 2),
                    });
                let a1 = decks[p1]
                    .playable(&catalog, state.elixir(p1))
                    .first()
                    .copied()
                    .map_or(Action::Pass, |card| Action::Place {
                        card,
                        position: 8 - (i % 2),
                    });
                let record =
                    resolve_turn(&mut state, &mut decks, &catalog, PlayerPair::new(a0, a1))
                        .unwrap();
                records.push(record);
                if state.is_over() {
                    break;
                }
            }
            records
        };

        let first = run();
        let second = run();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
