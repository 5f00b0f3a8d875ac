//! Per-player deck: a shuffled, reusable cycle of catalog cards.
//!
//! Cards are never consumed. A played card leaves the front of the cycle and
//! re-enters at the back, so the deck rotates forever. The front
//! `hand_size` cards form the visible hand window.
//!
//! Two play restrictions are enforced here:
//! - elixir: a card costing more than the player's current elixir is not
//!   playable;
//! - no-repeat: a card may not match the player's immediately preceding
//!   play.
//!
//! If the cycle somehow empties (a deck dealt from a subset of the catalog,
//! then drained), a reshuffled copy of the full roster is cycled back in
//! before the play fails.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, Catalog};
use crate::core::{GameRng, InvalidPlay};

/// Default number of cards visible at the front of the cycle.
pub const DEFAULT_HAND_SIZE: usize = 4;

/// A player's shuffled card cycle.
#[derive(Clone, Debug)]
pub struct Deck {
    cycle: VecDeque<CardId>,
    hand_size: usize,
    last_played: Option<CardId>,
    /// Full roster for reshuffle-on-exhaustion.
    roster: Vec<CardId>,
    rng: GameRng,
    /// Cycle order at deal time, for replay metadata.
    initial_order: Vec<CardId>,
}

impl Deck {
    /// Deal a deck from the full catalog, shuffled with the given RNG.
    #[must_use]
    pub fn deal(catalog: &Catalog, hand_size: usize, mut rng: GameRng) -> Self {
        let roster = catalog.card_ids();
        let mut order = roster.clone();
        rng.shuffle(&mut order);

        Self {
            cycle: order.iter().copied().collect(),
            hand_size,
            last_played: None,
            roster,
            rng,
            initial_order: order,
        }
    }

    /// The card most recently played, if any.
    #[must_use]
    pub fn last_played(&self) -> Option<CardId> {
        self.last_played
    }

    /// The visible hand window: the front `hand_size` cards of the cycle.
    pub fn hand(&self) -> impl Iterator<Item = CardId> + '_ {
        self.cycle.iter().take(self.hand_size).copied()
    }

    /// Cycle order at deal time.
    #[must_use]
    pub fn initial_order(&self) -> &[CardId] {
        &self.initial_order
    }

    /// Number of cards currently in the cycle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cycle.len()
    }

    /// Check whether the cycle is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cycle.is_empty()
    }

    /// Cards in the hand window playable at the given elixir level.
    ///
    /// Filters out unaffordable cards and the no-repeat card. Order follows
    /// the hand window.
    #[must_use]
    pub fn playable(&self, catalog: &Catalog, elixir: u32) -> Vec<CardId> {
        self.hand()
            .filter(|&card| self.check_playable(catalog, card, elixir).is_ok())
            .collect()
    }

    /// Check whether a specific card could be played right now.
    pub fn check_playable(
        &self,
        catalog: &Catalog,
        card: CardId,
        elixir: u32,
    ) -> Result<(), InvalidPlay> {
        if self.cycle.is_empty() && self.roster.is_empty() {
            return Err(InvalidPlay::DeckExhausted);
        }
        let def = catalog
            .get(card)
            .ok_or(InvalidPlay::UnknownCard { card })?;
        if self.last_played == Some(card) {
            return Err(InvalidPlay::RepeatCard { card });
        }
        if !self.hand().any(|c| c == card) {
            return Err(InvalidPlay::NotInHand { card });
        }
        if def.cost > elixir {
            return Err(InvalidPlay::InsufficientElixir {
                cost: def.cost,
                available: elixir,
            });
        }
        Ok(())
    }

    /// Play a card: remove it from the hand window, record it as the last
    /// play, and re-enqueue it at the back of the cycle.
    ///
    /// Fails with [`InvalidPlay`] if the card is not eligible. An empty
    /// cycle is refilled with a reshuffled copy of the full roster before
    /// the eligibility check, so exhaustion only fails on an empty roster.
    pub fn play(
        &mut self,
        catalog: &Catalog,
        card: CardId,
        elixir: u32,
    ) -> Result<CardId, InvalidPlay> {
        if self.cycle.is_empty() {
            self.reshuffle();
        }
        self.check_playable(catalog, card, elixir)?;

        let pos = self
            .cycle
            .iter()
            .take(self.hand_size)
            .position(|&c| c == card)
            .expect("check_playable verified hand membership");
        self.cycle.remove(pos);
        self.cycle.push_back(card);
        self.last_played = Some(card);
        Ok(card)
    }

    /// Refill the cycle with a reshuffled copy of the full roster.
    fn reshuffle(&mut self) {
        let mut refill = self.roster.clone();
        self.rng.shuffle(&mut refill);
        self.cycle.extend(refill);
    }
}

/// Serializable deck composition for replay metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckList {
    /// Card names in initial cycle order.
    pub cards: Vec<String>,
}

impl DeckList {
    /// Capture a deck's initial composition as card names.
    #[must_use]
    pub fn from_deck(deck: &Deck, catalog: &Catalog) -> Self {
        Self {
            cards: deck
                .initial_order()
                .iter()
                .map(|&id| catalog.get_unchecked(id).name.clone())
                .collect(),
        }
    }
}
