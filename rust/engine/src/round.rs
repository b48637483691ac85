use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::errors::EngineError;
use crate::events::EventKind;
use crate::history::Street;
use crate::player::{ActionKind, Player, PlayerAction, PlayerId};
use crate::pot::Pot;
use crate::rules::{BettingContext, BettingStructure};
use crate::table::Table;

/// Result of offering an action to a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The action was applied; these events describe it.
    Accepted(Vec<EventKind>),
    /// The action was refused and nothing changed.
    Rejected(EventKind),
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted(_))
    }
}

/// One street of betting.
///
/// Tracks who still owes a decision (`pending`), what each player has put
/// in on this street, and, preflop, the two forced blinds. The round is
/// complete once nobody is pending.
#[derive(Debug, Clone)]
pub struct BettingRound {
    street: Street,
    structure: BettingStructure,
    pot: Pot,
    pending: BTreeSet<PlayerId>,
    blinds_posted: u8,
    /// Next blind to post; doubles after each post
    blind: u32,
}

impl BettingRound {
    pub fn new(table: &Table, street: Street, structure: BettingStructure, small_bet: u32) -> Self {
        Self {
            street,
            structure,
            pot: Pot::new(),
            pending: table.all_able().map(Player::id).collect(),
            blinds_posted: if street == Street::Preflop { 0 } else { 2 },
            blind: small_bet / 2,
        }
    }

    pub fn street(&self) -> Street {
        self.street
    }

    /// Chips committed on this street only.
    pub fn pot(&self) -> &Pot {
        &self.pot
    }

    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_pending(&self, player_id: PlayerId) -> bool {
        self.pending.contains(&player_id)
    }

    pub fn awaiting_blind(&self) -> bool {
        self.blinds_posted < 2
    }

    pub fn to_call(&self, player_id: PlayerId) -> u32 {
        self.structure
            .bet_size()
            .saturating_sub(self.pot.contribution(player_id))
    }

    pub fn context(&self, player_id: PlayerId, heads_up: bool) -> BettingContext {
        self.structure.context(self.to_call(player_id), heads_up)
    }

    /// Forgets a player who left the hand without acting.
    pub(crate) fn drop_player(&mut self, player_id: PlayerId) {
        self.pending.remove(&player_id);
    }

    /// Applies `action` for `player_id`.
    ///
    /// Player mistakes come back as [`Outcome::Rejected`] with the round
    /// untouched. `Err` is reserved for a seat missing from the table or a
    /// stack that cannot cover an already validated amount.
    pub fn apply(
        &mut self,
        table: &mut Table,
        player_id: PlayerId,
        action: PlayerAction,
    ) -> Result<Outcome, EngineError> {
        if self.is_complete() {
            warn!(%player_id, street = ?self.street, "action after betting round completed");
            return Ok(Outcome::Rejected(EventKind::ActionAfterRoundCompleted {
                player_id,
            }));
        }

        let on_turn = table.current().map(Player::id) == Some(player_id);
        if !on_turn || !self.is_pending(player_id) {
            warn!(%player_id, street = ?self.street, "player acted out of turn");
            return Ok(Outcome::Rejected(EventKind::OutOfTurn { player_id }));
        }

        if self.awaiting_blind() {
            self.post_blind(table, player_id, action)
        } else {
            self.act(table, player_id, action)
        }
    }

    fn post_blind(
        &mut self,
        table: &mut Table,
        player_id: PlayerId,
        action: PlayerAction,
    ) -> Result<Outcome, EngineError> {
        let player = table
            .get_mut(player_id)
            .ok_or(EngineError::UnknownPlayer(player_id))?;
        let blind = player.stack().min(self.blind);
        if action.kind != ActionKind::Bet || action.amount != blind {
            warn!(%player_id, %action, blind, "invalid blind");
            return Ok(Outcome::Rejected(EventKind::InvalidBlind {
                player_id,
                action,
                blind,
            }));
        }

        let paid = player.contribute(blind)?;
        self.pot.add(player_id, paid);
        self.structure.set_size(self.blind);
        self.blinds_posted += 1;
        self.blind *= 2;
        self.pending.remove(&player_id);
        // The big blind opens the street: everyone else owes a decision.
        if !self.awaiting_blind() {
            self.reopen(table, player_id);
        }
        debug!(%player_id, amount = paid, "blind posted");
        Ok(Outcome::Accepted(vec![EventKind::BlindPosted {
            player_id,
            amount: paid,
        }]))
    }

    fn act(
        &mut self,
        table: &mut Table,
        player_id: PlayerId,
        action: PlayerAction,
    ) -> Result<Outcome, EngineError> {
        let heads_up = table.is_heads_up();
        let to_call = self.to_call(player_id);
        let player = table
            .get_mut(player_id)
            .ok_or(EngineError::UnknownPlayer(player_id))?;

        if !self
            .structure
            .validate_action(to_call, player.stack(), action, heads_up)
        {
            let context = self.structure.context(to_call, heads_up);
            warn!(%player_id, %action, ?context, "invalid action");
            return Ok(Outcome::Rejected(EventKind::InvalidAction {
                player_id,
                action,
                context,
            }));
        }

        let mut reopened = false;
        let event = match action.kind {
            ActionKind::Fold => {
                player.fold();
                EventKind::PlayerFolded { player_id }
            }
            ActionKind::Check => EventKind::PlayerChecked { player_id },
            ActionKind::Call => {
                let amount = player.contribute(action.amount)?;
                self.pot.add(player_id, amount);
                EventKind::PlayerCalled { player_id, amount }
            }
            ActionKind::Bet => {
                let amount = player.contribute(action.amount)?;
                self.pot.add(player_id, amount);
                reopened = self.structure.apply_raise(to_call, amount);
                EventKind::PlayerBet { player_id, amount }
            }
        };

        self.pending.remove(&player_id);
        if reopened {
            self.reopen(table, player_id);
        }
        debug!(%player_id, %action, reopened, pending = self.pending.len(), "action applied");
        Ok(Outcome::Accepted(vec![event]))
    }

    fn reopen(&mut self, table: &Table, raiser: PlayerId) {
        self.pending.extend(
            table
                .all_able()
                .map(Player::id)
                .filter(|&id| id != raiser),
        );
    }
}
