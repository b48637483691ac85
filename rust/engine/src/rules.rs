use serde::{Deserialize, Serialize};

use crate::history::Street;
use crate::player::{ActionKind, PlayerAction};

/// Which betting structure governs raise sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StructureKind {
    #[default]
    FixedLimit,
    NoLimit,
}

/// What the player to act is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BettingContext {
    /// Chips needed to match the current bet
    pub to_call: u32,
    /// Smallest bet that counts as a full raise
    pub to_raise: u32,
    pub can_raise: bool,
}

/// Fixed-limit betting: every raise is exactly one increment, and the
/// number of raises per street is capped unless the table is heads-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedLimit {
    bet_size: u32,
    min_bet: u32,
    raises_left: u32,
}

impl FixedLimit {
    pub fn new(min_bet: u32, max_raises: u32) -> Self {
        Self {
            bet_size: 0,
            min_bet,
            raises_left: max_raises,
        }
    }

    pub fn raises_left(&self) -> u32 {
        self.raises_left
    }
}

/// No-limit betting: any raise at least as large as the last full raise
/// re-opens the action and becomes the new minimum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoLimit {
    bet_size: u32,
    last_raise: u32,
}

impl NoLimit {
    pub fn new(min_bet: u32) -> Self {
        Self {
            bet_size: 0,
            last_raise: min_bet,
        }
    }
}

/// Raise policy for one street, selected once when the betting phase starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BettingStructure {
    FixedLimit(FixedLimit),
    NoLimit(NoLimit),
}

/// The betting unit for a street: the small bet before the turn, doubled after.
pub fn street_min_bet(street: Street, small_bet: u32) -> u32 {
    if street >= Street::Turn {
        small_bet * 2
    } else {
        small_bet
    }
}

impl BettingStructure {
    pub fn for_street(kind: StructureKind, street: Street, small_bet: u32, max_raises: u32) -> Self {
        let min_bet = street_min_bet(street, small_bet);
        match kind {
            StructureKind::FixedLimit => Self::FixedLimit(FixedLimit::new(min_bet, max_raises)),
            StructureKind::NoLimit => Self::NoLimit(NoLimit::new(min_bet)),
        }
    }

    pub fn kind(&self) -> StructureKind {
        match self {
            Self::FixedLimit(_) => StructureKind::FixedLimit,
            Self::NoLimit(_) => StructureKind::NoLimit,
        }
    }

    /// The amount every player must have in front of them to stay in.
    pub fn bet_size(&self) -> u32 {
        match self {
            Self::FixedLimit(s) => s.bet_size,
            Self::NoLimit(s) => s.bet_size,
        }
    }

    pub fn set_size(&mut self, size: u32) {
        match self {
            Self::FixedLimit(s) => s.bet_size = size,
            Self::NoLimit(s) => s.bet_size = size,
        }
    }

    /// Size of a full raise on top of the call.
    pub fn to_raise(&self) -> u32 {
        match self {
            Self::FixedLimit(s) => s.min_bet,
            Self::NoLimit(s) => s.last_raise,
        }
    }

    pub fn can_raise(&self, heads_up: bool) -> bool {
        match self {
            Self::FixedLimit(s) => s.raises_left > 0 || heads_up,
            Self::NoLimit(_) => true,
        }
    }

    pub fn context(&self, to_call: u32, heads_up: bool) -> BettingContext {
        BettingContext {
            to_call,
            to_raise: to_call + self.to_raise(),
            can_raise: self.can_raise(heads_up),
        }
    }

    /// Records an accepted bet of `amount` against `to_call`.
    ///
    /// Returns true when the bet is a full raise, meaning everyone still able
    /// to act must act again. A short all-in above the call only raises the
    /// price for players yet to act; the raise count and minimum stay put.
    pub fn apply_raise(&mut self, to_call: u32, amount: u32) -> bool {
        let raise = amount.saturating_sub(to_call);
        match self {
            Self::FixedLimit(s) => {
                if raise != s.min_bet {
                    s.bet_size += raise;
                    return false;
                }
                let street_open = s.bet_size > 0;
                s.bet_size += s.min_bet;
                if street_open && s.raises_left > 0 {
                    s.raises_left -= 1;
                }
                true
            }
            Self::NoLimit(s) => {
                if raise == 0 || raise < s.last_raise {
                    s.bet_size += raise;
                    return false;
                }
                s.last_raise = raise;
                s.bet_size += raise;
                true
            }
        }
    }

    fn validate_raise(&self, amount: u32, stack: u32, expected: u32) -> bool {
        match self {
            Self::FixedLimit(_) => amount == expected,
            Self::NoLimit(_) => amount >= expected && amount <= stack,
        }
    }

    /// Checks an action against the current price.
    ///
    /// # Examples
    ///
    /// ```
    /// use holdem_engine::history::Street;
    /// use holdem_engine::player::PlayerAction;
    /// use holdem_engine::rules::{BettingStructure, StructureKind};
    ///
    /// let mut limit = BettingStructure::for_street(StructureKind::FixedLimit, Street::Flop, 4, 3);
    /// limit.set_size(4);
    /// // Facing a bet of 4: a raise must be exactly 8.
    /// assert!(limit.validate_action(4, 100, PlayerAction::bet(8), false));
    /// assert!(!limit.validate_action(4, 100, PlayerAction::bet(12), false));
    ///
    /// let no_limit = BettingStructure::for_street(StructureKind::NoLimit, Street::Flop, 4, 3);
    /// assert!(no_limit.validate_action(0, 100, PlayerAction::bet(37), false));
    /// assert!(!no_limit.validate_action(0, 100, PlayerAction::bet(3), false));
    /// ```
    pub fn validate_action(&self, to_call: u32, stack: u32, action: PlayerAction, heads_up: bool) -> bool {
        let amount = action.amount;
        match action.kind {
            ActionKind::Fold => amount == 0,
            ActionKind::Check => to_call == 0,
            ActionKind::Call => amount == stack.min(to_call),
            ActionKind::Bet => {
                let expected = stack.min(to_call + self.to_raise());
                self.can_raise(heads_up) && self.validate_raise(amount, stack, expected)
            }
        }
    }
}
