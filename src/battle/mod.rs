//! The battle engine: state, actions, and the deterministic turn resolver.

pub mod action;
pub mod resolver;
pub mod snapshot;
pub mod state;
pub mod unit;

pub use action::{Action, ActionOutcome};
pub use resolver::{resolve_turn, AttackTarget, TurnEvent, TurnRecord};
pub use snapshot::{StateSnapshot, UnitSnapshot};
pub use state::{BattleConfig, BattleState, Outcome, Tower};
pub use unit::{Unit, UnitId};
