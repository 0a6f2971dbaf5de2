//! Batch spin simulator
//!
//! Plays a large number of spins through independent [`SlotMachine`]s, one per
//! worker, and merges their statistics. Each worker draws from its own ChaCha8
//! stream derived from the base seed, so a given (seed, workers, spins) triple
//! always produces the same report.

use log::{info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::engine::SlotMachine;
use crate::error::ConfigError;
use crate::session::SessionStats;
use crate::spin::WinTier;

/// Simulation options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimOptions {
    /// Paid or free spins to play in total
    pub spins: u64,
    pub seed: u64,
    /// Parallel workers (at least 1)
    pub workers: usize,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            spins: 100_000,
            seed: 0,
            workers: 1,
        }
    }
}

/// Counts per win tier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierHistogram {
    pub none: u64,
    pub win: u64,
    pub big: u64,
    pub mega: u64,
    pub epic: u64,
}

impl TierHistogram {
    fn record(&mut self, tier: WinTier) {
        match tier {
            WinTier::None => self.none += 1,
            WinTier::Win => self.win += 1,
            WinTier::Big => self.big += 1,
            WinTier::Mega => self.mega += 1,
            WinTier::Epic => self.epic += 1,
        }
    }

    fn merge(&mut self, other: &TierHistogram) {
        self.none += other.none;
        self.win += other.win;
        self.big += other.big;
        self.mega += other.mega;
        self.epic += other.epic;
    }

    pub fn total(&self) -> u64 {
        self.none + self.win + self.big + self.mega + self.epic
    }
}

/// Simulation report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimReport {
    pub stats: SessionStats,
    pub tiers: TierHistogram,
    /// Return to player (%)
    pub rtp: f64,
    /// Winning spins (%)
    pub hit_rate: f64,
}

impl SimReport {
    fn finish(mut self) -> Self {
        self.rtp = self.stats.rtp();
        self.hit_rate = self.stats.hit_rate();
        self
    }
}

/// Run a simulation. The session balance is topped up so funds never run out.
pub fn simulate(config: &GameConfig, options: &SimOptions) -> Result<SimReport, ConfigError> {
    let workers = options.workers.max(1) as u64;
    let per_worker = options.spins / workers;
    let remainder = options.spins % workers;

    // Catch config errors before fanning out
    config.paytable()?;

    let partials: Vec<Result<SimReport, ConfigError>> = (0..workers)
        .into_par_iter()
        .map(|worker| {
            let spins = per_worker + u64::from(worker < remainder);
            let rng = ChaCha8Rng::seed_from_u64(options.seed.wrapping_add(worker));
            run_worker(config, spins, rng)
        })
        .collect();

    let mut report = SimReport::default();
    for partial in partials {
        let partial = partial?;
        report.stats.merge(&partial.stats);
        report.tiers.merge(&partial.tiers);
    }
    let report = report.finish();

    info!(
        "Simulated {} spins: RTP {:.2}%, hit rate {:.2}%",
        report.stats.total_spins, report.rtp, report.hit_rate
    );
    Ok(report)
}

fn run_worker(config: &GameConfig, spins: u64, rng: ChaCha8Rng) -> Result<SimReport, ConfigError> {
    let mut config = config.clone();
    let max_stake = config.bet.max.saturating_mul(config.active_lines as u64);
    config.starting_balance = max_stake.saturating_mul(spins.saturating_add(1));

    let mut machine = SlotMachine::with_rng(config, rng)?;
    let mut tiers = TierHistogram::default();

    for played in 0..spins {
        let outcome = match machine.request_spin() {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!("Worker stopped after {} of {} spins: {}", played, spins, err);
                break;
            }
        };
        tiers.record(outcome.tier);
        if machine.bonus_pending().is_some() {
            if let Err(err) = machine.collect_bonus() {
                warn!("Bonus collection failed: {}", err);
            }
        }
    }

    Ok(SimReport {
        stats: machine.stats().clone(),
        tiers,
        ..SimReport::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spin_count_split() {
        let options = SimOptions {
            spins: 1_001,
            seed: 3,
            workers: 4,
        };
        let report = simulate(&GameConfig::classic(), &options).unwrap();
        assert_eq!(report.stats.total_spins, 1_001);
        assert_eq!(report.tiers.total(), 1_001);
    }

    #[test]
    fn test_reproducible() {
        let options = SimOptions {
            spins: 2_000,
            seed: 99,
            workers: 2,
        };
        let a = simulate(&GameConfig::rich(), &options).unwrap();
        let b = simulate(&GameConfig::rich(), &options).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_report_rates() {
        let options = SimOptions {
            spins: 5_000,
            seed: 1,
            workers: 1,
        };
        let report = simulate(&GameConfig::rich(), &options).unwrap();
        assert!(report.rtp > 0.0);
        assert!(report.hit_rate > 0.0 && report.hit_rate <= 100.0);
        assert_eq!(
            report.stats.paid_spins + report.stats.free_spins_played,
            report.stats.total_spins
        );
    }

    #[test]
    fn test_bonus_heavy_run_plays_every_spin() {
        let mut config = GameConfig::rich();
        for spec in &mut config.symbols {
            if spec.symbol == crate::symbols::Symbol::Bonus {
                spec.weight = 40;
            }
        }
        let options = SimOptions {
            spins: 500,
            seed: 4,
            workers: 2,
        };
        let report = simulate(&config, &options).unwrap();
        assert_eq!(report.stats.total_spins, 500);
        assert!(report.stats.bonus_triggers > 100);
        // Every trigger was collected at 5× bet or more
        assert!(report.stats.bonus_won >= report.stats.bonus_triggers * 5 * 50);
    }

    #[test]
    fn test_invalid_config() {
        let mut config = GameConfig::rich();
        config.symbols.pop();
        assert!(simulate(&config, &SimOptions::default()).is_err());
    }
}
