use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cards::{format_cards, Card};
use crate::errors::EngineError;

/// Opaque player identity, unique per seat for the lifetime of the process.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(Uuid);

impl PlayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    /// Any voluntary chip commitment beyond a call: opening bet or raise.
    Bet,
}

/// A player's decision, with the chip amount it commits.
///
/// Fold and check carry no chips. A call carries the exact call price
/// (or the whole stack if shorter) and a bet carries its full size,
/// including the part that matches the outstanding bet.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PlayerAction {
    pub kind: ActionKind,
    pub amount: u32,
}

impl PlayerAction {
    pub const fn new(kind: ActionKind, amount: u32) -> Self {
        Self { kind, amount }
    }

    pub const fn fold() -> Self {
        Self::new(ActionKind::Fold, 0)
    }

    pub const fn check() -> Self {
        Self::new(ActionKind::Check, 0)
    }

    pub const fn call(amount: u32) -> Self {
        Self::new(ActionKind::Call, amount)
    }

    pub const fn bet(amount: u32) -> Self {
        Self::new(ActionKind::Bet, amount)
    }
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ActionKind::Fold => f.write_str("fold"),
            ActionKind::Check => f.write_str("check"),
            ActionKind::Call => write!(f, "call {}", self.amount),
            ActionKind::Bet => write!(f, "bet {}", self.amount),
        }
    }
}

/// Represents a seated player with their chip stack and hole cards.
#[derive(Debug, Clone)]
pub struct Player {
    id: PlayerId,
    name: String,
    /// Current chip stack
    stack: u32,
    /// False once folded, or when sitting out with an empty stack
    active: bool,
    /// Hole cards (up to 2 cards)
    hole: Vec<Card>,
}

impl Player {
    pub fn new(name: impl Into<String>, stack: u32) -> Self {
        Self {
            id: PlayerId::new(),
            name: name.into(),
            stack,
            active: true,
            hole: Vec::with_capacity(2),
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn stack(&self) -> u32 {
        self.stack
    }
    pub fn is_active(&self) -> bool {
        self.active
    }
    pub fn hole_cards(&self) -> &[Card] {
        &self.hole
    }

    pub fn can_act(&self) -> bool {
        self.active && self.stack > 0
    }

    pub(crate) fn fold(&mut self) {
        self.active = false;
    }

    /// Prepares the player for a new hand. Busted players sit out.
    pub fn reset(&mut self) {
        self.active = self.stack > 0;
        self.hole.clear();
    }

    pub fn take_card(&mut self, card: Card) -> Result<(), EngineError> {
        if self.hole.len() >= 2 {
            return Err(EngineError::HoleCardsFull { player: self.id });
        }
        self.hole.push(card);
        Ok(())
    }

    /// Removes `amount` chips from the stack and returns it.
    pub fn contribute(&mut self, amount: u32) -> Result<u32, EngineError> {
        if amount > self.stack {
            return Err(EngineError::InsufficientChips {
                stack: self.stack,
                amount,
            });
        }
        self.stack -= amount;
        Ok(amount)
    }

    pub fn add_chips(&mut self, amount: u32) {
        self.stack = self.stack.saturating_add(amount);
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (stack: {}, folded: {}, cards: {})",
            self.name,
            self.stack,
            !self.active,
            format_cards(&self.hole)
        )
    }
}
