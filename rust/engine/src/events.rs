use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::cards::Card;
use crate::history::{ActionRecord, Street};
use crate::player::{PlayerAction, PlayerId};
use crate::rules::BettingContext;

/// Everything the player to act needs to decide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSnapshot {
    pub player_id: PlayerId,
    pub stack: u32,
    pub small_blind: u32,
    pub big_blind: u32,
    /// Chips in the middle, including the street in progress
    pub pot: u32,
    pub to_call: u32,
    pub to_raise: u32,
    pub can_raise: bool,
    pub street: Street,
    pub hole_cards: Vec<Card>,
    pub board: Vec<Card>,
    pub history: Vec<ActionRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    HoleCardsDealt {
        player_id: PlayerId,
        card: Card,
    },
    BoardCardsDealt {
        street: Street,
        /// The whole board after the deal
        cards: Vec<Card>,
    },
    DealCardsCompleted {
        street: Street,
    },
    BettingRoundStarted {
        street: Street,
    },
    BlindPosted {
        player_id: PlayerId,
        amount: u32,
    },
    PlayerTurnStarted {
        player_id: PlayerId,
        snapshot: Box<TurnSnapshot>,
    },
    PlayerFolded {
        player_id: PlayerId,
    },
    PlayerChecked {
        player_id: PlayerId,
    },
    PlayerCalled {
        player_id: PlayerId,
        amount: u32,
    },
    PlayerBet {
        player_id: PlayerId,
        amount: u32,
    },
    BettingRoundCompleted {
        street: Street,
    },
    ShowdownStarted,
    HandShown {
        player_id: PlayerId,
        /// Best five cards, highest first
        cards: Vec<Card>,
    },
    PotAwarded {
        player_id: PlayerId,
        amount: u32,
    },
    ShowdownCompleted,
    PlayerRemoved {
        player_id: PlayerId,
    },
    ActionAfterRoundCompleted {
        player_id: PlayerId,
    },
    OutOfTurn {
        player_id: PlayerId,
    },
    InvalidBlind {
        player_id: PlayerId,
        action: PlayerAction,
        blind: u32,
    },
    InvalidAction {
        player_id: PlayerId,
        action: PlayerAction,
        context: BettingContext,
    },
}

impl EventKind {
    /// Rejected player input. The round is unchanged and the player may retry.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            EventKind::ActionAfterRoundCompleted { .. }
                | EventKind::OutOfTurn { .. }
                | EventKind::InvalidBlind { .. }
                | EventKind::InvalidAction { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokerEvent {
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl PokerEvent {
    pub fn now(kind: EventKind) -> Self {
        Self {
            at: Utc::now(),
            kind,
        }
    }
}

/// Producing half of the event stream, owned by the engine.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<PokerEvent>,
}

impl EventSender {
    /// Queues an event. Never blocks; a closed stream is logged and ignored.
    pub fn emit(&self, kind: EventKind) {
        tracing::trace!(event = ?kind, "emitting poker event");
        if self.tx.send(PokerEvent::now(kind)).is_err() {
            tracing::debug!("event stream closed, dropping event");
        }
    }
}

/// Consuming half of the event stream. Events arrive in exactly the order the
/// engine produced them.
#[derive(Debug)]
pub struct EventStream {
    rx: mpsc::UnboundedReceiver<PokerEvent>,
}

impl EventStream {
    /// Waits for the next event; `None` once the engine is dropped.
    pub async fn recv(&mut self) -> Option<PokerEvent> {
        self.rx.recv().await
    }

    /// Blocking variant of [`EventStream::recv`]. Must not be called from
    /// inside an async runtime.
    pub fn blocking_recv(&mut self) -> Option<PokerEvent> {
        self.rx.blocking_recv()
    }

    pub fn try_recv(&mut self) -> Option<PokerEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Takes every event queued so far.
    pub fn drain(&mut self) -> Vec<PokerEvent> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }

    pub fn into_stream(self) -> UnboundedReceiverStream<PokerEvent> {
        UnboundedReceiverStream::new(self.rx)
    }
}

pub fn channel() -> (EventSender, EventStream) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx }, EventStream { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_order() {
        let (tx, mut rx) = channel();
        tx.emit(EventKind::ShowdownStarted);
        tx.emit(EventKind::ShowdownCompleted);
        let kinds: Vec<EventKind> = rx.drain().into_iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::ShowdownStarted, EventKind::ShowdownCompleted]);
        assert!(rx.try_recv().is_none());
    }

    #[test]
    fn emitting_after_consumer_drop_is_harmless() {
        let (tx, rx) = channel();
        drop(rx);
        tx.emit(EventKind::ShowdownStarted);
    }
}
