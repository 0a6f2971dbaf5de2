//! Session state: balance, bet, free spins, autoplay and statistics

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::spin::WinTier;

/// Autoplay mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AutoSpin {
    #[default]
    Off,
    /// Spins left to play
    Count(u32),
    Infinite,
}

impl AutoSpin {
    pub fn is_active(self) -> bool {
        !matches!(self, AutoSpin::Off | AutoSpin::Count(0))
    }

    /// Mode after one autoplay spin is taken
    pub fn decremented(self) -> Self {
        match self {
            AutoSpin::Count(n) if n > 1 => AutoSpin::Count(n - 1),
            AutoSpin::Count(_) | AutoSpin::Off => AutoSpin::Off,
            AutoSpin::Infinite => AutoSpin::Infinite,
        }
    }
}

/// Session statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    pub paid_spins: u64,
    pub free_spins_played: u64,
    pub total_staked: u64,
    pub total_won: u64,
    pub wins: u64,
    pub big_wins: u64,
    pub free_spin_triggers: u64,
    pub bonus_triggers: u64,
    pub bonus_won: u64,
    pub max_win: u64,
}

impl SessionStats {
    /// Calculate RTP (%)
    pub fn rtp(&self) -> f64 {
        if self.total_staked > 0 {
            (self.total_won as f64 / self.total_staked as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Calculate hit rate (%)
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            (self.wins as f64 / self.total_spins as f64) * 100.0
        } else {
            0.0
        }
    }

    pub(crate) fn record_spin(&mut self, stake: u64, win: u64, tier: WinTier) {
        self.total_spins += 1;
        if stake > 0 {
            self.paid_spins += 1;
            self.total_staked += stake;
        } else {
            self.free_spins_played += 1;
        }
        self.total_won += win;
        if win > 0 {
            self.wins += 1;
        }
        if tier >= WinTier::Big {
            self.big_wins += 1;
        }
        self.max_win = self.max_win.max(win);
    }

    pub(crate) fn record_bonus(&mut self, amount: u64) {
        self.bonus_won += amount;
        self.total_won += amount;
        self.max_win = self.max_win.max(amount);
    }

    /// Fold another session's counters into this one
    pub fn merge(&mut self, other: &SessionStats) {
        self.total_spins += other.total_spins;
        self.paid_spins += other.paid_spins;
        self.free_spins_played += other.free_spins_played;
        self.total_staked += other.total_staked;
        self.total_won += other.total_won;
        self.wins += other.wins;
        self.big_wins += other.big_wins;
        self.free_spin_triggers += other.free_spin_triggers;
        self.bonus_triggers += other.bonus_triggers;
        self.bonus_won += other.bonus_won;
        self.max_win = self.max_win.max(other.max_win);
    }
}

/// Player-facing session state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub balance: u64,
    /// Line bet
    pub bet: u64,
    /// Paylines in play
    pub lines: u8,
    pub free_spins_remaining: u32,
    pub last_win: u64,
    pub auto_spin: AutoSpin,
    pub stats: SessionStats,
}

impl SessionState {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            balance: config.starting_balance,
            bet: config.bet.initial,
            lines: config.active_lines,
            free_spins_remaining: 0,
            last_win: 0,
            auto_spin: AutoSpin::Off,
            stats: SessionStats::default(),
        }
    }

    /// Stake for one paid spin: bet × lines
    pub fn total_stake(&self) -> u64 {
        self.bet.saturating_mul(self.lines as u64)
    }

    /// A spin can be funded from free spins or balance
    pub fn can_afford_spin(&self) -> bool {
        self.free_spins_remaining > 0 || self.balance >= self.total_stake()
    }
}
