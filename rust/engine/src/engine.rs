use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cards::{format_cards, Card};
use crate::config::EngineConfig;
use crate::deck::Deck;
use crate::errors::EngineError;
use crate::events::{self, EventKind, EventSender, EventStream, TurnSnapshot};
use crate::hand::best_of;
use crate::history::{ActionRecord, Street};
use crate::player::{Player, PlayerAction, PlayerId};
use crate::pot::{Contestant, Pot};
use crate::round::{BettingRound, Outcome};
use crate::rules::{BettingStructure, StructureKind};
use crate::table::Table;

/// Where a hand currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    WaitingForPlayers,
    Deal(Street),
    Betting(Street),
    Showdown,
    Cleanup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    NextState,
    ToShowdown,
}

impl Trigger {
    /// How a finished betting round moves on: straight to showdown once at
    /// most one player can still make decisions.
    pub fn after_round(able_to_act: usize) -> Self {
        if able_to_act <= 1 {
            Trigger::ToShowdown
        } else {
            Trigger::NextState
        }
    }
}

const STREETS: [Street; 4] = [Street::Preflop, Street::Flop, Street::Turn, Street::River];

impl Phase {
    pub fn all() -> Vec<Phase> {
        let mut phases = vec![Phase::WaitingForPlayers];
        for street in STREETS {
            phases.push(Phase::Deal(street));
            phases.push(Phase::Betting(street));
        }
        phases.push(Phase::Showdown);
        phases.push(Phase::Cleanup);
        phases
    }

    pub fn transition(self, trigger: Trigger) -> Option<Phase> {
        match (self, trigger) {
            (Phase::WaitingForPlayers, Trigger::NextState) => Some(Phase::Deal(Street::Preflop)),
            (Phase::Deal(street), Trigger::NextState) => Some(Phase::Betting(street)),
            (Phase::Betting(street), Trigger::NextState) => {
                Some(street.next().map_or(Phase::Showdown, Phase::Deal))
            }
            (Phase::Betting(_), Trigger::ToShowdown) => Some(Phase::Showdown),
            (Phase::Showdown, Trigger::NextState) => Some(Phase::Cleanup),
            (Phase::Cleanup, Trigger::NextState) => Some(Phase::WaitingForPlayers),
            _ => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Deal(street) => write!(f, "Deal{:?}", street),
            Phase::Betting(street) => write!(f, "{:?}Betting", street),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Every permitted edge of the hand state graph.
pub fn transitions() -> Vec<(Phase, Trigger, Phase)> {
    let mut edges = Vec::new();
    for phase in Phase::all() {
        for trigger in [Trigger::NextState, Trigger::ToShowdown] {
            if let Some(next) = phase.transition(trigger) {
                edges.push((phase, trigger, next));
            }
        }
    }
    edges
}

/// Runs hands of Texas Hold'em on one table.
///
/// The engine is driven entirely by its caller: seat players, call
/// [`Engine::start`], then feed each player's decisions through
/// [`Engine::apply_action`]. Dealing, showdown and cleanup happen on their
/// own; everything that happens is reported, in order, on the
/// [`EventStream`] returned at construction.
///
/// # Examples
///
/// ```
/// use holdem_engine::engine::{Engine, Phase};
/// use holdem_engine::history::Street;
/// use holdem_engine::player::{Player, PlayerAction};
///
/// let (mut engine, mut events) = Engine::new(4, None);
/// let a = engine.add_player(Player::new("alice", 100)).unwrap();
/// let b = engine.add_player(Player::new("bob", 100)).unwrap();
/// engine.start().unwrap();
/// assert_eq!(engine.phase(), Phase::Betting(Street::Preflop));
///
/// // Heads-up the button posts the small blind.
/// engine.apply_action(a, PlayerAction::bet(2)).unwrap();
/// engine.apply_action(b, PlayerAction::bet(4)).unwrap();
/// engine.apply_action(a, PlayerAction::fold()).unwrap();
///
/// assert_eq!(engine.phase(), Phase::WaitingForPlayers);
/// assert_eq!(engine.table().get(b).unwrap().stack(), 102);
/// assert!(!events.drain().is_empty());
/// ```
#[derive(Debug)]
pub struct Engine {
    phase: Phase,
    street: Street,
    /// Community cards, up to 5
    board: Vec<Card>,
    /// Accepted actions of the current hand
    history: Vec<ActionRecord>,
    deck: Deck,
    table: Table,
    round: Option<BettingRound>,
    /// Chips from completed streets
    pot: Pot,
    small_bet: u32,
    structure: StructureKind,
    max_raises: u32,
    /// Seats to drop at the end of the hand
    leaving: Vec<PlayerId>,
    hands_played: u64,
    events: EventSender,
}

impl Engine {
    /// Creates an engine playing fixed-limit with `small_bet` as the betting
    /// unit. Without a deck a fresh one is shuffled from OS entropy.
    pub fn new(small_bet: u32, deck: Option<Deck>) -> (Self, EventStream) {
        let config = EngineConfig {
            small_bet,
            ..EngineConfig::default()
        };
        Self::with_deck(&config, deck.unwrap_or_default())
    }

    pub fn from_config(config: &EngineConfig) -> (Self, EventStream) {
        let deck = match config.seed {
            Some(seed) => Deck::new_with_seed(seed),
            None => Deck::new(),
        };
        Self::with_deck(config, deck)
    }

    pub fn with_deck(config: &EngineConfig, deck: Deck) -> (Self, EventStream) {
        let (events, stream) = events::channel();
        let engine = Self {
            phase: Phase::WaitingForPlayers,
            street: Street::Preflop,
            board: Vec::with_capacity(5),
            history: Vec::new(),
            deck,
            table: Table::new(),
            round: None,
            pot: Pot::new(),
            small_bet: config.small_bet,
            structure: config.structure,
            max_raises: config.max_raises,
            leaving: Vec::new(),
            hands_played: 0,
            events,
        };
        (engine, stream)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn street(&self) -> Street {
        self.street
    }
    pub fn board(&self) -> &[Card] {
        &self.board
    }
    pub fn history(&self) -> &[ActionRecord] {
        &self.history
    }
    pub fn table(&self) -> &Table {
        &self.table
    }
    pub fn hands_played(&self) -> u64 {
        self.hands_played
    }
    pub fn small_bet(&self) -> u32 {
        self.small_bet
    }
    pub fn structure(&self) -> StructureKind {
        self.structure
    }

    /// Chips in the middle, counting the street still being bet.
    pub fn pot_total(&self) -> u32 {
        self.pot.total() + self.round.as_ref().map_or(0, |r| r.pot().total())
    }

    pub fn current_player(&self) -> Option<PlayerId> {
        match self.round {
            Some(ref round) if !round.is_complete() => self.table.current().map(Player::id),
            _ => None,
        }
    }

    pub fn add_player(&mut self, player: Player) -> Result<PlayerId, EngineError> {
        if self.phase != Phase::WaitingForPlayers {
            return Err(EngineError::HandInProgress);
        }
        let id = player.id();
        info!(player_id = %id, name = player.name(), stack = player.stack(), "player seated");
        self.table.add(player)?;
        Ok(id)
    }

    /// Takes a player out of the game.
    ///
    /// Between hands the seat goes at once. During a hand the player folds
    /// on the spot, leaving their chips in the pot, and the seat goes at
    /// cleanup.
    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<(), EngineError> {
        if self.table.get(player_id).is_none() {
            return Err(EngineError::UnknownPlayer(player_id));
        }
        if self.phase == Phase::WaitingForPlayers {
            self.table.remove(player_id);
            info!(%player_id, "player removed");
            self.events.emit(EventKind::PlayerRemoved { player_id });
            return Ok(());
        }

        if !self.leaving.contains(&player_id) {
            self.leaving.push(player_id);
        }
        let was_current = self.current_player() == Some(player_id);
        let player = self
            .table
            .get_mut(player_id)
            .ok_or(EngineError::UnknownPlayer(player_id))?;
        if !player.is_active() {
            return Ok(());
        }
        player.fold();
        if let Some(round) = self.round.as_mut() {
            round.drop_player(player_id);
        }
        info!(%player_id, "player left mid-hand, folding");
        self.history.push(ActionRecord {
            street: self.street,
            player_id,
            action: PlayerAction::fold(),
        });
        self.events.emit(EventKind::PlayerFolded { player_id });

        let Phase::Betting(street) = self.phase else {
            return Ok(());
        };
        if was_current {
            self.table.move_next();
        }
        if self.round.as_ref().is_some_and(BettingRound::is_complete) {
            self.complete_round(street)
        } else {
            if was_current {
                self.signal_turn();
            }
            Ok(())
        }
    }

    /// Starts the next hand. Needs at least two players with chips.
    pub fn start(&mut self) -> Result<(), EngineError> {
        match self.phase {
            Phase::WaitingForPlayers => {}
            Phase::Betting(_) => return Err(EngineError::RoundInProgress),
            _ => return Err(EngineError::HandInProgress),
        }
        let able = self
            .table
            .players()
            .iter()
            .filter(|p| p.stack() > 0)
            .count();
        if able < 2 {
            return Err(EngineError::NotReady { able });
        }
        for player in self.table.players_mut() {
            player.reset();
        }
        self.table.ensure_button()?;
        info!(
            hand = self.hands_played + 1,
            players = able,
            button = ?self.table.button().map(Player::id),
            "hand started"
        );
        self.advance(Trigger::NextState)
    }

    /// Feeds one decision into the betting round in progress.
    ///
    /// Only calling outside a betting phase is an `Err`. A decision the
    /// rules refuse is reported as an error event and the same player is
    /// asked again.
    pub fn apply_action(&mut self, player_id: PlayerId, action: PlayerAction) -> Result<(), EngineError> {
        let Phase::Betting(street) = self.phase else {
            return Err(EngineError::NotBetting);
        };
        let round = self.round.as_mut().ok_or(EngineError::NotBetting)?;

        match round.apply(&mut self.table, player_id, action)? {
            Outcome::Rejected(event) => {
                self.events.emit(event);
                return Ok(());
            }
            Outcome::Accepted(events) => {
                for event in events {
                    self.events.emit(event);
                }
            }
        }
        self.history.push(ActionRecord {
            street,
            player_id,
            action,
        });
        self.table.move_next();

        if self.round.as_ref().is_some_and(BettingRound::is_complete) {
            self.complete_round(street)
        } else {
            self.signal_turn();
            Ok(())
        }
    }

    fn complete_round(&mut self, street: Street) -> Result<(), EngineError> {
        if let Some(round) = self.round.take() {
            self.pot += round.pot();
        }
        self.events.emit(EventKind::BettingRoundCompleted { street });
        self.advance(Trigger::after_round(self.table.able_to_act()))
    }

    /// Follows the state graph from the current phase, running each phase
    /// as it is entered, until a phase needs outside input.
    fn advance(&mut self, mut trigger: Trigger) -> Result<(), EngineError> {
        loop {
            let next = self
                .phase
                .transition(trigger)
                .ok_or(EngineError::InvalidTransition {
                    phase: self.phase,
                    trigger,
                })?;
            debug!(from = %self.phase, to = %next, ?trigger, "phase transition");
            self.phase = next;

            match next {
                Phase::WaitingForPlayers => return Ok(()),
                Phase::Deal(street) => {
                    self.street = street;
                    self.deal(street)?;
                    self.events.emit(EventKind::DealCardsCompleted { street });
                }
                Phase::Betting(street) => {
                    self.open_round(street);
                    return Ok(());
                }
                Phase::Showdown => self.showdown()?,
                Phase::Cleanup => self.cleanup(),
            }
            trigger = Trigger::NextState;
        }
    }

    fn deal(&mut self, street: Street) -> Result<(), EngineError> {
        match street {
            Street::Preflop => {
                let order = self.table.able_from_button();
                for _ in 0..2 {
                    for &player_id in &order {
                        let card = self.deck.draw()?;
                        self.table
                            .get_mut(player_id)
                            .ok_or(EngineError::UnknownPlayer(player_id))?
                            .take_card(card)?;
                        self.events.emit(EventKind::HoleCardsDealt { player_id, card });
                    }
                }
            }
            Street::Flop => self.deal_board(street, 3)?,
            Street::Turn | Street::River => self.deal_board(street, 1)?,
        }
        Ok(())
    }

    fn deal_board(&mut self, street: Street, count: usize) -> Result<(), EngineError> {
        self.deck.burn()?;
        for card in self.deck.draw_n(count) {
            self.board.push(card?);
        }
        debug!(?street, board = %format_cards(&self.board), "board dealt");
        self.events.emit(EventKind::BoardCardsDealt {
            street,
            cards: self.board.clone(),
        });
        Ok(())
    }

    fn open_round(&mut self, street: Street) {
        self.table.reset();
        // Heads-up the button posts the small blind and acts first preflop.
        if !(street == Street::Preflop && self.table.is_heads_up()) {
            self.table.move_next();
        }
        let structure =
            BettingStructure::for_street(self.structure, street, self.small_bet, self.max_raises);
        self.round = Some(BettingRound::new(&self.table, street, structure, self.small_bet));
        self.events.emit(EventKind::BettingRoundStarted { street });
        self.signal_turn();
    }

    fn signal_turn(&self) {
        let Some(round) = self.round.as_ref() else {
            return;
        };
        let Some(player) = self.table.current() else {
            return;
        };
        let player_id = player.id();
        let context = round.context(player_id, self.table.is_heads_up());
        let snapshot = TurnSnapshot {
            player_id,
            stack: player.stack(),
            small_blind: self.small_bet / 2,
            big_blind: self.small_bet,
            pot: self.pot_total(),
            to_call: context.to_call,
            to_raise: context.to_raise,
            can_raise: context.can_raise,
            street: round.street(),
            hole_cards: player.hole_cards().to_vec(),
            board: self.board.clone(),
            history: self.history.clone(),
        };
        debug!(%player_id, to_call = context.to_call, "player to act");
        self.events.emit(EventKind::PlayerTurnStarted {
            player_id,
            snapshot: Box::new(snapshot),
        });
    }

    fn showdown(&mut self) -> Result<(), EngineError> {
        self.events.emit(EventKind::ShowdownStarted);

        if self.board.len() < 5 {
            let missing = 5 - self.board.len();
            for card in self.deck.draw_n(missing) {
                self.board.push(card?);
            }
            self.events.emit(EventKind::BoardCardsDealt {
                street: Street::River,
                cards: self.board.clone(),
            });
        }

        let mut contestants = Vec::new();
        for player in self.table.all_active() {
            let cards: Vec<Card> = player
                .hole_cards()
                .iter()
                .chain(self.board.iter())
                .copied()
                .collect();
            let (best, ranking) = best_of(&cards)?;
            let mut hand = best.to_vec();
            hand.sort_by(|a, b| b.cmp(a));
            contestants.push(Contestant {
                player_id: player.id(),
                hand,
                ranking,
            });
        }

        if contestants.len() > 1 {
            for c in &contestants {
                self.events.emit(EventKind::HandShown {
                    player_id: c.player_id,
                    cards: c.hand.clone(),
                });
            }
        }

        for award in self.pot.award(&contestants) {
            self.table
                .get_mut(award.player_id)
                .ok_or(EngineError::UnknownPlayer(award.player_id))?
                .add_chips(award.amount);
            info!(player_id = %award.player_id, amount = award.amount, "pot awarded");
            self.events.emit(EventKind::PotAwarded {
                player_id: award.player_id,
                amount: award.amount,
            });
        }

        self.events.emit(EventKind::ShowdownCompleted);
        Ok(())
    }

    fn cleanup(&mut self) {
        let leaving = std::mem::take(&mut self.leaving);
        for player in self.table.players_mut() {
            player.reset();
            if leaving.contains(&player.id()) {
                player.fold();
            }
        }
        // Rotate while leavers still hold their seats so the button lands
        // on the next seat that stays.
        match self.table.move_button() {
            Ok(()) => info!(button = ?self.table.button().map(Player::id), "button moved"),
            Err(err) => debug!(%err, "button stays"),
        }
        for player_id in leaving {
            if self.table.remove(player_id).is_some() {
                info!(%player_id, "player removed");
                self.events.emit(EventKind::PlayerRemoved { player_id });
            }
        }
        self.deck.reset();
        self.deck.shuffle();
        self.board.clear();
        self.history.clear();
        self.pot = Pot::new();
        self.round = None;
        self.street = Street::Preflop;
        self.hands_played += 1;
    }
}
