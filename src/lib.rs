//! Deterministic single-lane tower-defense battle simulator.
//!
//! Two players place units from a shuffled card cycle onto a one-lane
//! grid with a tower at each end. Units advance toward the enemy tower
//! and attack whatever comes in range; the first tower to fall loses.
//! Every battle is driven by a single seed and resolves identically on
//! every run, and the full course of a game is recorded as a structured
//! JSON replay for offline analysis.
//!
//! ## Quick start
//!
//! ```
//! use clashlane::cards::standard_catalog;
//! use clashlane::driver::{run_match, MatchSetup};
//!
//! let catalog = standard_catalog();
//! let replay = run_match(&catalog, &MatchSetup::new(42)).unwrap();
//!
//! assert_eq!(replay.meta.seed, 42);
//! assert_eq!(replay.turns.len(), replay.meta.turn_count as usize);
//! ```
//!
//! ## Structure
//!
//! - [`cards`]: card definitions and the catalog;
//! - [`deck`]: per-player shuffled card cycles with play restrictions;
//! - [`battle`]: board state and the three-phase turn resolver;
//! - [`policy`]: action sources, including the built-in AI;
//! - [`replay`]: structured JSON replay logs;
//! - [`driver`]: match orchestration and parallel batch generation.

pub mod battle;
pub mod cards;
pub mod core;
pub mod deck;
pub mod driver;
pub mod policy;
pub mod replay;
