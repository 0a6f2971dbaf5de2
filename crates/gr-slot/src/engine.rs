//! Slot machine controller
//!
//! Owns the session, the current grid and the RNG, and runs the spin state
//! machine:
//!
//! ```text
//!   Idle ──begin_spin──▶ Spinning ──complete_spin──▶ Idle
//!                                        │
//!                                        └─(bonus)──▶ AwaitingBonus ──collect_bonus──▶ Idle
//! ```
//!
//! Every guard failure is reported as a [`GameError`] and leaves state as it was.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bonus::{BonusPrize, BonusRound};
use crate::config::{ConfigLimits, GameConfig};
use crate::error::{ConfigError, GameError, GameResult};
use crate::grid::Grid;
use crate::paytable::PayTable;
use crate::session::{AutoSpin, SessionState, SessionStats};
use crate::spin::{SpinFunding, SpinOutcome, WinTier};
use crate::symbols::SymbolCatalog;
use crate::timing::TimingConfig;

/// Controller state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MachineState {
    Idle,
    /// Stake taken, grid not yet settled
    Spinning(SpinFunding),
    /// Bonus round triggered, waiting for the player to collect
    AwaitingBonus(BonusRound),
}

/// Slot machine
///
/// Construct one per session and hand it to whatever drives the UI.
pub struct SlotMachine<R = StdRng> {
    config: GameConfig,
    paytable: PayTable,
    timing: TimingConfig,
    rng: R,
    state: MachineState,
    session: SessionState,
    /// Grid on display; replaced wholesale by each spin
    grid: Grid,
    spin_count: u64,
}

impl SlotMachine<StdRng> {
    /// Create a machine seeded from the OS
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Create a machine with reproducible draws
    pub fn seeded(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SlotMachine<R> {
    /// Create a machine drawing from `rng`
    pub fn with_rng(config: GameConfig, mut rng: R) -> Result<Self, ConfigError> {
        config.validate(&ConfigLimits::default())?;
        let paytable = config.paytable()?;
        let grid = Grid::generate(config.grid, paytable.catalog(), &mut rng);
        let session = SessionState::new(&config);
        let timing = TimingConfig::from_profile(config.timing);

        info!(
            "Slot machine ready: '{}', {}×{} grid, {} lines, balance {}",
            config.name,
            config.grid.rows,
            config.grid.cols,
            session.lines,
            session.balance
        );

        Ok(Self {
            config,
            paytable,
            timing,
            rng,
            state: MachineState::Idle,
            session,
            grid,
            spin_count: 0,
        })
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN EXECUTION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Start and settle a spin in one step
    pub fn request_spin(&mut self) -> GameResult<SpinOutcome> {
        self.begin_spin()?;
        self.complete_spin()
    }

    /// Take the stake (or a free spin) and enter the spinning state
    pub fn begin_spin(&mut self) -> GameResult<SpinFunding> {
        match self.state {
            MachineState::Idle => {}
            MachineState::Spinning(_) => return Err(self.reject(GameError::SpinInProgress)),
            MachineState::AwaitingBonus(_) => return Err(self.reject(GameError::BonusPending)),
        }

        let funding = if self.session.free_spins_remaining > 0 {
            self.session.free_spins_remaining -= 1;
            SpinFunding::FreeSpin {
                remaining: self.session.free_spins_remaining,
            }
        } else {
            let stake = self.session.total_stake();
            if self.session.balance < stake {
                return Err(self.reject(GameError::InsufficientFunds {
                    balance: self.session.balance,
                    stake,
                }));
            }
            self.session.balance -= stake;
            SpinFunding::Paid { stake }
        };

        debug!("Spin started: {:?}, balance {}", funding, self.session.balance);
        self.state = MachineState::Spinning(funding);
        Ok(funding)
    }

    /// Draw the grid, evaluate it and credit the win
    pub fn complete_spin(&mut self) -> GameResult<SpinOutcome> {
        let funding = match self.state {
            MachineState::Spinning(funding) => funding,
            _ => return Err(self.reject(GameError::NoSpinInProgress)),
        };

        self.spin_count += 1;
        let bet = self.session.bet;
        let grid = Grid::generate(self.config.grid, self.paytable.catalog(), &mut self.rng);
        let win = self.paytable.evaluate(&grid, bet);

        self.session.balance = self.session.balance.saturating_add(win.total_win);
        if win.is_win() {
            self.session.last_win = win.total_win;
        }

        let awarded = win.free_spins_awarded();
        if awarded > 0 {
            self.session.free_spins_remaining += awarded;
            self.session.stats.free_spin_triggers += 1;
            info!(
                "{} free spins awarded, {} remaining",
                awarded, self.session.free_spins_remaining
            );
        }

        let tier = WinTier::classify(win.total_win, bet, &self.config.win_tiers);
        let stake_multiple = stake_multiple(win.total_win, self.session.total_stake());
        self.session
            .stats
            .record_spin(funding.stake(), win.total_win, tier);

        self.state = if win.bonus_triggered() {
            self.session.stats.bonus_triggers += 1;
            info!("Bonus round triggered at bet {}", bet);
            MachineState::AwaitingBonus(BonusRound::new(bet, &self.config.bonus_prizes))
        } else {
            MachineState::Idle
        };

        debug!(
            "Spin {} settled: win {} ({:?}), balance {}",
            self.spin_count, win.total_win, tier, self.session.balance
        );

        self.grid = grid.clone();
        Ok(SpinOutcome {
            spin_id: self.spin_count,
            grid,
            bet,
            funding,
            win,
            tier,
            stake_multiple,
            balance: self.session.balance,
            free_spins_remaining: self.session.free_spins_remaining,
        })
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // BONUS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Reveal the pending bonus prize and credit it
    pub fn collect_bonus(&mut self) -> GameResult<BonusPrize> {
        let round = match &self.state {
            MachineState::AwaitingBonus(round) => round,
            _ => return Err(self.reject(GameError::NoBonusPending)),
        };

        let prize = round.reveal(&mut self.rng);
        self.session.balance = self.session.balance.saturating_add(prize.amount);
        if prize.amount > 0 {
            self.session.last_win = prize.amount;
        }
        self.session.stats.record_bonus(prize.amount);
        self.state = MachineState::Idle;

        info!("Bonus collected: {}× for {}", prize.multiplier, prize.amount);
        Ok(prize)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // BET & AUTOPLAY
    // ═══════════════════════════════════════════════════════════════════════════

    /// Move the line bet by `delta`. Requests that leave `[min, max]` or the
    /// step grid are rejected and leave the bet unchanged.
    pub fn change_bet(&mut self, delta: i64) -> GameResult<u64> {
        if matches!(self.state, MachineState::Spinning(_)) {
            return Err(self.reject(GameError::SpinInProgress));
        }

        let limits = self.config.bet;
        let current = i64::try_from(self.session.bet).unwrap_or(i64::MAX);
        let requested = current.saturating_add(delta);
        let on_grid = u64::try_from(requested).is_ok_and(|bet| limits.is_valid_bet(bet));
        if !on_grid {
            return Err(self.reject(GameError::BetOutOfRange {
                requested,
                min: limits.min,
                max: limits.max,
            }));
        }

        self.session.bet = requested as u64;
        debug!(
            "Bet set to {}, stake {}",
            self.session.bet,
            self.session.total_stake()
        );
        Ok(self.session.bet)
    }

    /// Raise the bet by one step
    pub fn increase_bet(&mut self) -> GameResult<u64> {
        self.change_bet(self.config.bet.step as i64)
    }

    /// Lower the bet by one step
    pub fn decrease_bet(&mut self) -> GameResult<u64> {
        self.change_bet(-(self.config.bet.step as i64))
    }

    /// Jump to the maximum bet
    pub fn set_max_bet(&mut self) -> GameResult<u64> {
        if matches!(self.state, MachineState::Spinning(_)) {
            return Err(self.reject(GameError::SpinInProgress));
        }
        self.session.bet = self.config.bet.max;
        Ok(self.session.bet)
    }

    /// Stop autoplay if it is running, otherwise start it in `mode`
    pub fn toggle_auto_spin(&mut self, mode: AutoSpin) -> AutoSpin {
        self.session.auto_spin = if self.session.auto_spin.is_active() {
            AutoSpin::Off
        } else {
            mode
        };
        info!("Autoplay: {:?}", self.session.auto_spin);
        self.session.auto_spin
    }

    /// Decide whether autoplay starts another spin now. Consumes one autoplay
    /// spin when it does; switches autoplay off when the session can no longer
    /// pay for a spin.
    pub fn take_auto_spin(&mut self) -> bool {
        if !self.session.auto_spin.is_active() || self.state != MachineState::Idle {
            return false;
        }
        if !self.session.can_afford_spin() {
            info!("Autoplay stopped: insufficient funds");
            self.session.auto_spin = AutoSpin::Off;
            return false;
        }
        self.session.auto_spin = self.session.auto_spin.decremented();
        true
    }

    fn reject(&self, err: GameError) -> GameError {
        warn!("Action rejected: {}", err);
        err
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ACCESSORS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn balance(&self) -> u64 {
        self.session.balance
    }

    pub fn last_win(&self) -> u64 {
        self.session.last_win
    }

    /// Line bet
    pub fn bet(&self) -> u64 {
        self.session.bet
    }

    pub fn lines(&self) -> u8 {
        self.session.lines
    }

    pub fn total_stake(&self) -> u64 {
        self.session.total_stake()
    }

    pub fn free_spins_remaining(&self) -> u32 {
        self.session.free_spins_remaining
    }

    pub fn auto_spin(&self) -> AutoSpin {
        self.session.auto_spin
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.state, MachineState::Spinning(_))
    }

    pub fn bonus_pending(&self) -> Option<&BonusRound> {
        match &self.state {
            MachineState::AwaitingBonus(round) => Some(round),
            _ => None,
        }
    }

    /// Grid on display
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn stats(&self) -> &SessionStats {
        &self.session.stats
    }

    pub fn reset_stats(&mut self) {
        self.session.stats = SessionStats::default();
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn paytable(&self) -> &PayTable {
        &self.paytable
    }

    pub fn catalog(&self) -> &SymbolCatalog {
        self.paytable.catalog()
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    pub fn set_timing(&mut self, timing: TimingConfig) {
        self.timing = timing;
    }

    pub fn spin_count(&self) -> u64 {
        self.spin_count
    }
}

/// Win as a whole multiple of the stake, rounded half up
fn stake_multiple(win: u64, stake: u64) -> u64 {
    match stake {
        0 => 0,
        stake => win.saturating_add(stake / 2) / stake,
    }
}
