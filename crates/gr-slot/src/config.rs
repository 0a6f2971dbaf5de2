//! Game configuration: grid, symbols, paylines, bet limits and rules
//!
//! Configs are plain serde documents and can be loaded from JSON or YAML.
//! Every loaded config is validated against [`ConfigLimits`] before use.

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::grid::GridSpec;
use crate::paytable::{
    MIN_RUN, PayRules, PayTable, Payline, classic_8_paylines, standard_10_paylines,
};
use crate::symbols::{Symbol, SymbolCatalog, SymbolKind, SymbolSpec, default_symbol_specs};
use crate::timing::TimingProfile;

/// Bet limits. Bets move in `step` increments within `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetLimits {
    pub min: u64,
    pub max: u64,
    pub step: u64,
    /// Bet at session start
    pub initial: u64,
}

impl BetLimits {
    pub fn contains(&self, bet: u64) -> bool {
        bet >= self.min && bet <= self.max
    }

    /// In range and a whole number of steps above `min`
    pub fn is_valid_bet(&self, bet: u64) -> bool {
        self.contains(bet) && self.step > 0 && (bet - self.min) % self.step == 0
    }
}

/// Win tier thresholds as multiples of the line bet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WinTierThresholds {
    /// Minimum ratio for "big win"
    pub big_win: f64,
    /// Minimum ratio for "mega win"
    pub mega_win: f64,
    /// Minimum ratio for "epic win"
    pub epic_win: f64,
}

impl Default for WinTierThresholds {
    fn default() -> Self {
        Self {
            big_win: 10.0,
            mega_win: 25.0,
            epic_win: 50.0,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Variant name for display
    pub name: String,
    pub grid: GridSpec,
    /// One entry per symbol
    pub symbols: Vec<SymbolSpec>,
    /// Full payline table
    pub paylines: Vec<Payline>,
    /// Paylines in play; the first `active_lines` entries of `paylines`
    pub active_lines: u8,
    pub bet: BetLimits,
    pub starting_balance: u64,
    pub rules: PayRules,
    /// Bonus prizes as multiples of the line bet
    #[serde(default)]
    pub bonus_prizes: Vec<u64>,
    #[serde(default)]
    pub win_tiers: WinTierThresholds,
    #[serde(default)]
    pub timing: TimingProfile,
}

impl GameConfig {
    /// 4×5 grid, 10 lines, wild multiplier, free spins and bonus round
    pub fn rich() -> Self {
        let mut symbols = default_symbol_specs();
        if let Some(wild) = symbols.iter_mut().find(|s| s.symbol == Symbol::Wild) {
            wild.pays = vec![25, 60, 120];
        }

        Self {
            name: "GemReel Deluxe".into(),
            grid: GridSpec::standard_4x5(),
            symbols,
            paylines: standard_10_paylines(),
            active_lines: 10,
            bet: BetLimits {
                min: 10,
                max: 500,
                step: 10,
                initial: 50,
            },
            starting_balance: 10_000,
            rules: PayRules::default(),
            bonus_prizes: vec![5, 10, 20, 50, 100],
            win_tiers: WinTierThresholds::default(),
            timing: TimingProfile::Normal,
        }
    }

    /// Single-feature layout: 5 of 8 lines in play, plain wilds, no bonus round
    pub fn classic() -> Self {
        Self {
            name: "GemReel Classic".into(),
            grid: GridSpec::standard_4x5(),
            symbols: default_symbol_specs(),
            paylines: classic_8_paylines(),
            active_lines: 5,
            bet: BetLimits {
                min: 50,
                max: 1000,
                step: 50,
                initial: 100,
            },
            starting_balance: 10_000,
            rules: PayRules {
                wild_multiplier_base: 1,
                bonus_enabled: false,
                ..PayRules::default()
            },
            bonus_prizes: Vec::new(),
            win_tiers: WinTierThresholds::default(),
            timing: TimingProfile::Normal,
        }
    }

    /// Load a config file; the format follows the extension (.json, .yaml, .yml)
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text)?,
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ));
            }
        };
        info!("Loaded config '{}' from {}", config.name, path.display());
        Ok(config)
    }

    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate(&ConfigLimits::default())?;
        Ok(config)
    }

    /// Parse and validate a YAML config
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate(&ConfigLimits::default())?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Paylines in play
    pub fn active_paylines(&self) -> &[Payline] {
        let n = (self.active_lines as usize).min(self.paylines.len());
        &self.paylines[..n]
    }

    /// Build the paytable for the active lines
    pub fn paytable(&self) -> Result<PayTable, ConfigError> {
        let catalog = SymbolCatalog::from_specs(&self.symbols)?;
        Ok(PayTable::new(
            catalog,
            self.active_paylines().to_vec(),
            self.rules.clone(),
        ))
    }

    /// Validate against limits
    pub fn validate(&self, limits: &ConfigLimits) -> Result<(), ConfigError> {
        if self.name.len() > limits.max_name_length {
            return Err(ConfigError::Validation(format!(
                "Game name too long: {} > {}",
                self.name.len(),
                limits.max_name_length
            )));
        }

        if self.grid.rows == 0 || self.grid.rows > limits.max_rows {
            return Err(ConfigError::Validation(format!(
                "Row count {} outside 1..={}",
                self.grid.rows, limits.max_rows
            )));
        }

        if (self.grid.cols as usize) < MIN_RUN || self.grid.cols > limits.max_cols {
            return Err(ConfigError::Validation(format!(
                "Column count {} outside {}..={}",
                self.grid.cols, MIN_RUN, limits.max_cols
            )));
        }

        if self.paylines.len() > limits.max_paylines {
            return Err(ConfigError::Validation(format!(
                "Too many paylines: {} > {}",
                self.paylines.len(),
                limits.max_paylines
            )));
        }

        for line in &self.paylines {
            line.validate(&self.grid)?;
        }

        if self.active_lines == 0 || self.active_lines as usize > self.paylines.len() {
            return Err(ConfigError::Validation(format!(
                "Active lines {} outside 1..={}",
                self.active_lines,
                self.paylines.len()
            )));
        }

        // Catalog construction checks symbol coverage and weights
        SymbolCatalog::from_specs(&self.symbols)?;

        if let Some(spec) = self
            .symbols
            .iter()
            .find(|s| s.pays.iter().any(|&p| p > limits.max_pay_value))
        {
            return Err(ConfigError::Validation(format!(
                "Pay value for {:?} exceeds {}",
                spec.symbol, limits.max_pay_value
            )));
        }

        // Every run length the grid allows needs a pay entry. Wilds without
        // their own table never anchor a paying line.
        let runs = self.grid.cols as usize + 1 - MIN_RUN;
        if let Some(spec) = self.symbols.iter().find(|s| match s.symbol.kind() {
            SymbolKind::Standard => s.pays.len() < runs,
            SymbolKind::Wild => !s.pays.is_empty() && s.pays.len() < runs,
            SymbolKind::Scatter | SymbolKind::Bonus => false,
        }) {
            return Err(ConfigError::Validation(format!(
                "Pay table for {:?} covers {} run lengths, {} columns need {}",
                spec.symbol,
                spec.pays.len(),
                self.grid.cols,
                runs
            )));
        }

        let bet = &self.bet;
        if bet.min == 0
            || bet.step == 0
            || bet.min > bet.max
            || !bet.is_valid_bet(bet.initial)
            || !bet.is_valid_bet(bet.max)
        {
            return Err(ConfigError::Validation(format!(
                "Invalid bet limits: min {} max {} step {} initial {}",
                bet.min, bet.max, bet.step, bet.initial
            )));
        }

        if bet.max > limits.max_bet {
            return Err(ConfigError::Validation(format!(
                "Maximum bet {} exceeds {}",
                bet.max, limits.max_bet
            )));
        }

        if let Some(&prize) = self
            .bonus_prizes
            .iter()
            .find(|&&p| p > limits.max_bonus_prize)
        {
            return Err(ConfigError::Validation(format!(
                "Bonus prize {}× exceeds {}×",
                prize, limits.max_bonus_prize
            )));
        }

        if self.rules.wild_multiplier_base == 0 {
            return Err(ConfigError::Validation(
                "Wild multiplier base must be at least 1".into(),
            ));
        }

        if self.rules.bonus_enabled && self.bonus_prizes.is_empty() {
            return Err(ConfigError::Validation(
                "Bonus round enabled without prizes".into(),
            ));
        }

        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::rich()
    }
}

/// Validation limits for loaded configs
#[derive(Debug, Clone)]
pub struct ConfigLimits {
    pub max_name_length: usize,
    pub max_rows: u8,
    pub max_cols: u8,
    pub max_paylines: usize,
    pub max_pay_value: u64,
    /// Largest line bet
    pub max_bet: u64,
    /// Largest bonus prize multiplier
    pub max_bonus_prize: u64,
}

impl Default for ConfigLimits {
    fn default() -> Self {
        Self {
            max_name_length: 256,
            max_rows: 8,
            max_cols: 8,
            max_paylines: 100,
            max_pay_value: 100_000,
            max_bet: 1_000_000,
            max_bonus_prize: 10_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        GameConfig::rich().validate(&ConfigLimits::default()).unwrap();
        GameConfig::classic().validate(&ConfigLimits::default()).unwrap();
    }

    #[test]
    fn test_active_paylines() {
        let config = GameConfig::classic();
        assert_eq!(config.paylines.len(), 8);
        assert_eq!(config.active_paylines().len(), 5);
        assert_eq!(config.paytable().unwrap().paylines().len(), 5);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = GameConfig::rich();
        let json = config.to_json_pretty().unwrap();
        assert_eq!(GameConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_yaml_parse() {
        let yaml = serde_yml::to_string(&GameConfig::classic()).unwrap();
        let parsed = GameConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed.active_lines, 5);
        assert_eq!(parsed.bet.initial, 100);
    }

    #[test]
    fn test_rejects_bad_active_lines() {
        let mut config = GameConfig::rich();
        config.active_lines = 11;
        assert!(config.validate(&ConfigLimits::default()).is_err());
        config.active_lines = 0;
        assert!(config.validate(&ConfigLimits::default()).is_err());
    }

    #[test]
    fn test_rejects_bad_bet_limits() {
        let mut config = GameConfig::rich();
        config.bet.initial = 5;
        assert!(config.validate(&ConfigLimits::default()).is_err());

        let mut config = GameConfig::rich();
        config.bet.step = 0;
        assert!(config.validate(&ConfigLimits::default()).is_err());
    }

    #[test]
    fn test_rejects_bets_off_step() {
        let mut config = GameConfig::classic();
        config.bet.initial = 120;
        assert!(config.validate(&ConfigLimits::default()).is_err());

        let mut config = GameConfig::classic();
        config.bet.max = 1_020;
        assert!(config.validate(&ConfigLimits::default()).is_err());
    }

    #[test]
    fn test_bet_limits_step_grid() {
        let bet = GameConfig::classic().bet;
        assert!(bet.is_valid_bet(50));
        assert!(bet.is_valid_bet(1000));
        assert!(!bet.is_valid_bet(107));
        assert!(!bet.is_valid_bet(0));
        assert!(!bet.is_valid_bet(1050));
    }

    #[test]
    fn test_rejects_pay_table_shorter_than_grid() {
        let mut config = GameConfig::rich();
        config.grid = GridSpec { rows: 1, cols: 6 };
        config.paylines = vec![Payline::straight(0, 0, 6)];
        config.active_lines = 1;
        let err = config.validate(&ConfigLimits::default()).unwrap_err();
        assert!(err.to_string().contains("Diamond"));

        for spec in &mut config.symbols {
            if !spec.pays.is_empty() {
                let last = *spec.pays.last().unwrap();
                spec.pays.push(last * 2);
            }
        }
        config.validate(&ConfigLimits::default()).unwrap();
    }

    #[test]
    fn test_classic_wild_without_pays_is_valid() {
        let config = GameConfig::classic();
        let wild = config.symbols.iter().find(|s| s.symbol == Symbol::Wild).unwrap();
        assert!(wild.pays.is_empty());
        config.validate(&ConfigLimits::default()).unwrap();
    }

    #[test]
    fn test_rejects_oversized_bet_and_prize() {
        let mut config = GameConfig::rich();
        config.bet.max = 10_000_000;
        assert!(config.validate(&ConfigLimits::default()).is_err());

        let mut config = GameConfig::rich();
        config.bonus_prizes.push(u64::MAX);
        assert!(config.validate(&ConfigLimits::default()).is_err());
    }

    #[test]
    fn test_rejects_payline_outside_grid() {
        let mut config = GameConfig::rich();
        config.paylines[9].positions = vec![0, 1, 2, 3, 4];
        let err = config.validate(&ConfigLimits::default()).unwrap_err();
        assert!(err.to_string().contains("payline 9"));
    }

    #[test]
    fn test_rejects_bonus_without_prizes() {
        let mut config = GameConfig::rich();
        config.bonus_prizes.clear();
        assert!(config.validate(&ConfigLimits::default()).is_err());
    }

    #[test]
    fn test_rejects_oversized_pay() {
        let mut config = GameConfig::rich();
        config.symbols[0].pays = vec![20, 50, 1_000_000];
        assert!(config.validate(&ConfigLimits::default()).is_err());
    }

    #[test]
    fn test_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.toml");
        std::fs::write(&path, "name = 'x'").unwrap();
        assert!(matches!(
            GameConfig::load(&path),
            Err(ConfigError::UnsupportedFormat(ext)) if ext == "toml"
        ));
    }

    #[test]
    fn test_load_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.json");
        std::fs::write(&path, GameConfig::classic().to_json_pretty().unwrap()).unwrap();
        let loaded = GameConfig::load(&path).unwrap();
        assert_eq!(loaded.name, "GemReel Classic");
    }
}
