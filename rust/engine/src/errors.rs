use thiserror::Error;

use crate::engine::{Phase, Trigger};
use crate::player::PlayerId;

/// Hard failures: caller misuse or an internal defect.
///
/// Mistakes a player can make at the table (acting out of turn, a wrong
/// blind or bet amount) are not errors here; they are reported as events.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Deck is empty")]
    DeckEmpty,
    #[error("Cannot start: {able} player(s) able to act, need at least 2")]
    NotReady { able: usize },
    #[error("Not in a betting phase")]
    NotBetting,
    #[error("Cannot advance while the betting round is ongoing")]
    RoundInProgress,
    #[error("No transition from {phase:?} on {trigger:?}")]
    InvalidTransition { phase: Phase, trigger: Trigger },
    #[error("Player {player} already holds two hole cards")]
    HoleCardsFull { player: PlayerId },
    #[error("Player {0} is already seated")]
    DuplicatePlayer(PlayerId),
    #[error("A hand is in progress")]
    HandInProgress,
    #[error("Unknown player {0}")]
    UnknownPlayer(PlayerId),
    #[error("Expected exactly {expected} cards, got {actual}")]
    InvalidHandSize { expected: usize, actual: usize },
    #[error("At least 5 cards are required, got {actual}")]
    NotEnoughCards { actual: usize },
    #[error("No player is able to act")]
    NoActivePlayers,
    #[error("Insufficient chips: stack {stack}, amount {amount}")]
    InsufficientChips { stack: u32, amount: u32 },
    #[error("Invalid card: '{0}'")]
    InvalidCard(String),
}
