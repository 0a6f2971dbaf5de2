//! Spin outcome and win tier classification

use serde::{Deserialize, Serialize};

use crate::config::WinTierThresholds;
use crate::grid::Grid;
use crate::paytable::WinResult;

/// Win size relative to the line bet
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WinTier {
    None,
    Win,
    Big,
    Mega,
    Epic,
}

impl WinTier {
    /// Classify a win against the line bet
    pub fn classify(total_win: u64, bet: u64, thresholds: &WinTierThresholds) -> Self {
        if total_win == 0 {
            return WinTier::None;
        }
        if bet == 0 {
            return WinTier::Win;
        }
        let ratio = total_win as f64 / bet as f64;
        if ratio >= thresholds.epic_win {
            WinTier::Epic
        } else if ratio >= thresholds.mega_win {
            WinTier::Mega
        } else if ratio > thresholds.big_win {
            WinTier::Big
        } else {
            WinTier::Win
        }
    }

    /// Tiers that get a celebration screen
    pub fn is_big(self) -> bool {
        self >= WinTier::Big
    }

    pub fn label(self) -> &'static str {
        match self {
            WinTier::None => "",
            WinTier::Win => "WIN",
            WinTier::Big => "BIG WIN",
            WinTier::Mega => "MEGA WIN",
            WinTier::Epic => "EPIC WIN",
        }
    }
}

/// How a spin was paid for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpinFunding {
    /// Stake debited from balance
    Paid { stake: u64 },
    /// Consumed one free spin
    FreeSpin { remaining: u32 },
}

impl SpinFunding {
    /// Credits debited for this spin
    pub fn stake(self) -> u64 {
        match self {
            SpinFunding::Paid { stake } => stake,
            SpinFunding::FreeSpin { .. } => 0,
        }
    }

    pub fn is_free(self) -> bool {
        matches!(self, SpinFunding::FreeSpin { .. })
    }
}

/// Complete result of one settled spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinOutcome {
    /// Sequential spin number within the session
    pub spin_id: u64,
    /// Settled grid
    pub grid: Grid,
    /// Line bet the spin was evaluated at
    pub bet: u64,
    pub funding: SpinFunding,
    pub win: WinResult,
    pub tier: WinTier,
    /// Total win over total stake, rounded, for big-win display
    pub stake_multiple: u64,
    /// Balance after crediting the win
    pub balance: u64,
    /// Free spins left after this spin's award
    pub free_spins_remaining: u32,
}

impl SpinOutcome {
    pub fn is_win(&self) -> bool {
        self.win.is_win()
    }

    pub fn bonus_triggered(&self) -> bool {
        self.win.bonus_triggered()
    }
}
