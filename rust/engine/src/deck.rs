use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};
use crate::errors::EngineError;

/// An ordered sequence of cards with a draw cursor.
///
/// Drawing never removes cards; [`Deck::reset`] rewinds the cursor so the
/// same order can be dealt again. A stacked deck has no RNG and its shuffle
/// is a no-op, which makes dealing fully deterministic.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    position: usize,
    rng: Option<ChaCha20Rng>,
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl Deck {
    /// A standard deck shuffled from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(ChaCha20Rng::from_os_rng())
    }

    pub fn new_with_seed(seed: u64) -> Self {
        Self::with_rng(ChaCha20Rng::seed_from_u64(seed))
    }

    fn with_rng(rng: ChaCha20Rng) -> Self {
        let mut deck = Self {
            cards: full_deck(),
            position: 0,
            rng: Some(rng),
        };
        deck.shuffle();
        deck
    }

    /// A deck dealt in exactly the given order, never shuffled.
    pub fn stacked(cards: Vec<Card>) -> Self {
        Self {
            cards,
            position: 0,
            rng: None,
        }
    }

    /// Permutes all cards in place; the cursor is left untouched.
    pub fn shuffle(&mut self) {
        if let Some(rng) = &mut self.rng {
            self.cards.shuffle(rng);
        }
    }

    pub fn draw(&mut self) -> Result<Card, EngineError> {
        let card = *self
            .cards
            .get(self.position)
            .ok_or(EngineError::DeckEmpty)?;
        self.position += 1;
        Ok(card)
    }

    /// Lazily draws `n` cards. Each card leaves the deck only when the
    /// iterator is advanced.
    pub fn draw_n(&mut self, n: usize) -> Draw<'_> {
        Draw {
            deck: self,
            left: n,
        }
    }

    pub fn burn(&mut self) -> Result<(), EngineError> {
        self.draw().map(|_| ())
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.position)
    }
}

/// Iterator returned by [`Deck::draw_n`].
#[derive(Debug)]
pub struct Draw<'a> {
    deck: &'a mut Deck,
    left: usize,
}

impl Iterator for Draw<'_> {
    type Item = Result<Card, EngineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.left == 0 {
            return None;
        }
        self.left -= 1;
        Some(self.deck.draw())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.left, Some(self.left))
    }
}
