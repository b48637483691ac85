use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};
use crate::errors::EngineError;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

/// Strength of a five-card hand.
///
/// Rankings compare by category first, then kicker by kicker in order of
/// significance. Two hands with equal category and kickers are equal, so
/// split pots fall out of plain `==`.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct HandRanking {
    pub category: Category,
    // kickers: ordered high -> low for tiebreaks
    pub kickers: Vec<Rank>,
}

impl fmt::Display for HandRanking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kickers = self
            .kickers
            .iter()
            .map(Rank::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{:?} [{}]", self.category, kickers)
    }
}

impl HandRanking {
    fn new(category: Category, kickers: Vec<Rank>) -> Self {
        Self { category, kickers }
    }

    /// Ranks exactly five cards.
    ///
    /// ```
    /// use holdem_engine::cards::parse_cards;
    /// use holdem_engine::hand::{Category, HandRanking};
    ///
    /// let wheel = parse_cards("As 2d 3c 4h 5s").unwrap();
    /// let ranking = HandRanking::from_hand(&wheel).unwrap();
    /// assert_eq!(ranking.category, Category::Straight);
    /// ```
    pub fn from_hand(hand: &[Card]) -> Result<Self, EngineError> {
        if hand.len() != 5 {
            return Err(EngineError::InvalidHandSize {
                expected: 5,
                actual: hand.len(),
            });
        }

        let mut rank_mask: u16 = 0;
        let mut rank_counts = [0u8; 15]; // 2..14 used
        let mut suit_counts = [0u8; 4];
        for c in hand {
            let r = c.rank.value();
            rank_mask |= 1 << r;
            rank_counts[r as usize] += 1;
            suit_counts[c.suit as usize] += 1;
        }

        let is_flush = suit_counts.iter().any(|&n| n == 5);
        let straight_high = straight_high_from_mask(rank_mask);

        if is_flush {
            if let Some(high) = straight_high {
                return Ok(if high == Rank::Ace {
                    Self::new(Category::RoyalFlush, vec![Rank::Ace])
                } else {
                    Self::new(Category::StraightFlush, vec![high])
                });
            }
        }

        let mut four = None;
        let mut three = None;
        let mut pairs = Vec::new();
        let mut singles = Vec::new();
        for r in (2..=14u8).rev() {
            let Some(rank) = Rank::from_u8(r) else {
                continue;
            };
            match rank_counts[r as usize] {
                4 => four = Some(rank),
                3 => three = Some(rank),
                2 => pairs.push(rank),
                1 => singles.push(rank),
                _ => {}
            }
        }

        let ranking = match (four, three, pairs.len()) {
            (Some(quad), _, _) => Self::new(Category::FourOfAKind, [vec![quad], singles].concat()),
            (None, Some(trips), 1) => Self::new(Category::FullHouse, vec![trips, pairs[0]]),
            _ if is_flush => Self::new(Category::Flush, singles),
            _ if straight_high.is_some() => {
                Self::new(Category::Straight, straight_high.into_iter().collect())
            }
            (None, Some(trips), _) => {
                Self::new(Category::ThreeOfAKind, [vec![trips], singles].concat())
            }
            (None, None, 2) => Self::new(Category::TwoPair, [pairs, singles].concat()),
            (None, None, 1) => Self::new(Category::OnePair, [pairs, singles].concat()),
            _ => Self::new(Category::HighCard, singles),
        };
        Ok(ranking)
    }
}

/// Highest straight in a rank bitmask; the wheel (A-2-3-4-5) counts as five-high.
fn straight_high_from_mask(mask: u16) -> Option<Rank> {
    for high in (6..=14u8).rev() {
        let window = 0b1_1111u16 << (high - 4);
        if mask & window == window {
            return Rank::from_u8(high);
        }
    }
    let wheel: u16 = (1 << 14) | (1 << 5) | (1 << 4) | (1 << 3) | (1 << 2);
    if mask & wheel == wheel {
        return Some(Rank::Five);
    }
    None
}

/// Picks the strongest five-card subset by trying every combination.
pub fn best_hand(cards: &[Card]) -> Result<[Card; 5], EngineError> {
    best_of(cards).map(|(hand, _)| hand)
}

pub fn best_ranking(cards: &[Card]) -> Result<HandRanking, EngineError> {
    best_of(cards).map(|(_, ranking)| ranking)
}

/// Best five cards together with their ranking.
pub fn best_of(cards: &[Card]) -> Result<([Card; 5], HandRanking), EngineError> {
    if cards.len() < 5 {
        return Err(EngineError::NotEnoughCards {
            actual: cards.len(),
        });
    }
    let mut best: Option<([Card; 5], HandRanking)> = None;
    for idx in FiveCardCombinations::new(cards.len()) {
        let hand = idx.map(|i| cards[i]);
        let ranking = HandRanking::from_hand(&hand)?;
        let better = match &best {
            Some((_, current)) => ranking > *current,
            None => true,
        };
        if better {
            best = Some((hand, ranking));
        }
    }
    best.ok_or(EngineError::NotEnoughCards {
        actual: cards.len(),
    })
}

/// Index combinations C(n, 5) in lexicographic order.
struct FiveCardCombinations {
    n: usize,
    indices: [usize; 5],
    done: bool,
}

impl FiveCardCombinations {
    fn new(n: usize) -> Self {
        Self {
            n,
            indices: [0, 1, 2, 3, 4],
            done: n < 5,
        }
    }
}

impl Iterator for FiveCardCombinations {
    type Item = [usize; 5];

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.indices;

        // Find the rightmost index that can still move right.
        let mut i = 5;
        loop {
            if i == 0 {
                self.done = true;
                break;
            }
            i -= 1;
            if self.indices[i] < self.n - 5 + i {
                self.indices[i] += 1;
                for j in (i + 1)..5 {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                break;
            }
        }

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seven_cards_yield_twenty_one_combinations() {
        assert_eq!(FiveCardCombinations::new(7).count(), 21);
        assert_eq!(FiveCardCombinations::new(5).count(), 1);
        assert_eq!(FiveCardCombinations::new(4).count(), 0);
    }

    #[test]
    fn wheel_mask_is_five_high() {
        let mask = (1 << 14) | (1 << 2) | (1 << 3) | (1 << 4) | (1 << 5);
        assert_eq!(straight_high_from_mask(mask), Some(Rank::Five));
        let six_high = (1 << 2) | (1 << 3) | (1 << 4) | (1 << 5) | (1 << 6);
        assert_eq!(straight_high_from_mask(six_high), Some(Rank::Six));
    }
}
