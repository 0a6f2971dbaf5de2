//! Bonus Round
//!
//! Prize-reveal bonus game entered when enough bonus symbols land. The player
//! opens one box; its prize is drawn uniformly from a fixed list of line bet
//! multiples captured when the round was triggered.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A pending bonus round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusRound {
    /// Line bet at trigger time
    pub bet: u64,
    /// Prize multipliers on offer
    pub prizes: Vec<u64>,
}

/// A revealed prize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusPrize {
    /// Index into the prize list
    pub index: usize,
    pub multiplier: u64,
    /// Credits won
    pub amount: u64,
}

impl BonusRound {
    pub fn new(bet: u64, prizes: &[u64]) -> Self {
        Self {
            bet,
            prizes: prizes.to_vec(),
        }
    }

    /// Reveal one prize. An empty prize list reveals nothing.
    pub fn reveal<R: Rng + ?Sized>(&self, rng: &mut R) -> BonusPrize {
        if self.prizes.is_empty() {
            return BonusPrize {
                index: 0,
                multiplier: 0,
                amount: 0,
            };
        }
        let index = rng.random_range(0..self.prizes.len());
        let multiplier = self.prizes[index];
        BonusPrize {
            index,
            multiplier,
            amount: self.bet.saturating_mul(multiplier),
        }
    }

    /// Largest prize on offer
    pub fn max_prize(&self) -> u64 {
        self.prizes
            .iter()
            .max()
            .map_or(0, |&m| m.saturating_mul(self.bet))
    }
}
