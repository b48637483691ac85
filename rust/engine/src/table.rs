use crate::errors::EngineError;
use crate::player::{Player, PlayerId};

/// Ordered seating with a dealer button and a turn cursor.
///
/// Both the button and the cursor only ever land on players able to act
/// (active with chips), so the cursor names whose turn it is unless nobody
/// can act at all.
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// Seats in clockwise order
    players: Vec<Player>,
    /// Index of the button seat
    button: usize,
    /// Index of the seat whose turn it is
    cursor: usize,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_players(players: Vec<Player>) -> Self {
        Self {
            players,
            button: 0,
            cursor: 0,
        }
    }

    pub fn add(&mut self, player: Player) -> Result<(), EngineError> {
        if self.get(player.id()).is_some() {
            return Err(EngineError::DuplicatePlayer(player.id()));
        }
        self.players.push(player);
        Ok(())
    }

    /// Unseats a player, keeping the button and cursor on the same seats.
    pub fn remove(&mut self, id: PlayerId) -> Option<Player> {
        let idx = self.index_of(id)?;
        let player = self.players.remove(idx);
        if idx < self.button {
            self.button -= 1;
        }
        if idx < self.cursor {
            self.cursor -= 1;
        }
        if self.button >= self.players.len() {
            self.button = 0;
        }
        if self.cursor >= self.players.len() {
            self.cursor = 0;
        }
        Some(player)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }
    pub fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == id)
    }
    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id() == id)
    }

    fn index_of(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id() == id)
    }

    pub fn current(&self) -> Option<&Player> {
        self.players.get(self.cursor)
    }

    pub fn button(&self) -> Option<&Player> {
        self.players.get(self.button)
    }

    /// Players still in the hand, including those all-in.
    pub fn all_active(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_active())
    }

    /// Players who can still make decisions.
    pub fn all_able(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.can_act())
    }

    pub fn able_to_act(&self) -> usize {
        self.all_able().count()
    }

    pub fn is_heads_up(&self) -> bool {
        self.able_to_act() == 2
    }

    /// Ids of players able to act, clockwise starting left of the button.
    pub fn able_from_button(&self) -> Vec<PlayerId> {
        let n = self.players.len();
        (1..=n)
            .map(|i| &self.players[(self.button + i) % n])
            .filter(|p| p.can_act())
            .map(Player::id)
            .collect()
    }

    pub fn reset(&mut self) {
        self.cursor = self.button;
    }

    /// Advances the cursor to the next seat able to act. Leaves it untouched
    /// and returns false when nobody can act.
    pub fn move_next(&mut self) -> bool {
        match self.next_able(self.cursor) {
            Some(next) => {
                self.cursor = next;
                true
            }
            None => false,
        }
    }

    /// Rotates the button clockwise and brings the cursor with it.
    pub fn move_button(&mut self) -> Result<(), EngineError> {
        let next = self
            .next_able(self.button)
            .ok_or(EngineError::NoActivePlayers)?;
        self.button = next;
        self.cursor = next;
        Ok(())
    }

    /// Keeps the button where it is if that seat can act, otherwise rotates it.
    pub fn ensure_button(&mut self) -> Result<(), EngineError> {
        match self.players.get(self.button) {
            Some(p) if p.can_act() => {
                self.cursor = self.button;
                Ok(())
            }
            _ => self.move_button(),
        }
    }

    fn next_able(&self, start: usize) -> Option<usize> {
        let count = self.players.len();
        (1..=count)
            .map(|i| (start + i) % count)
            .find(|&idx| self.players[idx].can_act())
    }
}
