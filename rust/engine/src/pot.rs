use std::collections::BTreeMap;
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::hand::HandRanking;
use crate::player::PlayerId;

/// A player still holding cards at showdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contestant {
    pub player_id: PlayerId,
    /// Best five cards, used for display only
    pub hand: Vec<Card>,
    pub ranking: HandRanking,
}

/// One layer of the pot and the players who paid into all of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidePot {
    pub amount: u32,
    pub eligible: Vec<PlayerId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotAward {
    pub player_id: PlayerId,
    pub amount: u32,
}

/// Ledger of what each player has put in.
///
/// The pot never checks stacks: callers take chips from the player first
/// and record exactly what was taken, so `total` always equals the chips
/// that left the players' stacks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pot {
    contributions: BTreeMap<PlayerId, u32>,
}

impl Pot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, player_id: PlayerId, amount: u32) {
        *self.contributions.entry(player_id).or_insert(0) += amount;
    }

    pub fn contribution(&self, player_id: PlayerId) -> u32 {
        self.contributions.get(&player_id).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.contributions.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn contributions(&self) -> impl Iterator<Item = (PlayerId, u32)> + '_ {
        self.contributions.iter().map(|(id, amount)| (*id, *amount))
    }

    pub fn merge(&mut self, other: &Pot) {
        for (player_id, amount) in other.contributions() {
            self.add(player_id, amount);
        }
    }

    /// Splits the contributions into layers, smallest commitment first.
    ///
    /// Each layer is the lowest outstanding contribution times the number of
    /// players still owed a share of it, and is open only to those players.
    pub fn side_pots(&self) -> Vec<SidePot> {
        let mut remaining: Vec<(PlayerId, u32)> = self
            .contributions()
            .filter(|&(_, amount)| amount > 0)
            .collect();
        let mut layers = Vec::new();
        while let Some(level) = remaining.iter().map(|&(_, amount)| amount).min() {
            let eligible: Vec<PlayerId> = remaining.iter().map(|&(id, _)| id).collect();
            layers.push(SidePot {
                amount: level * eligible.len() as u32,
                eligible,
            });
            for (_, amount) in remaining.iter_mut() {
                *amount -= level;
            }
            remaining.retain(|&(_, amount)| amount > 0);
        }
        layers
    }

    /// Distributes the pot among the contestants.
    ///
    /// A lone contestant takes everything. Otherwise every layer goes to the
    /// best eligible hands; a split hands odd chips out one at a time to the
    /// winners in contestant order. A layer nobody contests (an uncalled
    /// excess from a player who later folded) is returned to its payers.
    /// The awarded amounts always add up to [`Pot::total`].
    pub fn award(&self, contestants: &[Contestant]) -> Vec<PotAward> {
        if let [only] = contestants {
            let total = self.total();
            if total == 0 {
                return Vec::new();
            }
            return vec![PotAward {
                player_id: only.player_id,
                amount: total,
            }];
        }

        let mut awards = Vec::new();
        for layer in self.side_pots() {
            let contenders: Vec<&Contestant> = contestants
                .iter()
                .filter(|c| layer.eligible.contains(&c.player_id))
                .collect();
            let winners: Vec<PlayerId> = match contenders.iter().map(|c| &c.ranking).max() {
                Some(best) => contenders
                    .iter()
                    .filter(|c| c.ranking == *best)
                    .map(|c| c.player_id)
                    .collect(),
                None => layer.eligible.clone(),
            };
            split(layer.amount, &winners, &mut awards);
        }
        awards
    }
}

fn split(amount: u32, winners: &[PlayerId], awards: &mut Vec<PotAward>) {
    let n = winners.len() as u32;
    if n == 0 {
        return;
    }
    let share = amount / n;
    let odd = amount % n;
    for (i, &player_id) in winners.iter().enumerate() {
        let amount = share + u32::from((i as u32) < odd);
        if amount > 0 {
            awards.push(PotAward { player_id, amount });
        }
    }
}

impl AddAssign<&Pot> for Pot {
    fn add_assign(&mut self, other: &Pot) {
        self.merge(other);
    }
}
