//! Paylines and win evaluation

use std::collections::BTreeSet;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::grid::{Grid, GridSpec, Position};
use crate::symbols::{Symbol, SymbolCatalog};

/// Shortest run that pays on a line
pub const MIN_RUN: usize = 3;

/// A payline definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payline {
    /// Payline index (0-based)
    pub index: u8,
    /// Row for each column (e.g., [0, 1, 2, 1, 0] for a "V" shape)
    pub positions: Vec<u8>,
}

impl Payline {
    pub fn new(index: u8, positions: &[u8]) -> Self {
        Self {
            index,
            positions: positions.to_vec(),
        }
    }

    /// Create a straight line (same row across all columns)
    pub fn straight(index: u8, row: u8, cols: u8) -> Self {
        Self {
            index,
            positions: vec![row; cols as usize],
        }
    }

    /// Coordinates covered by this line, left to right
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions
            .iter()
            .enumerate()
            .map(|(col, &row)| Position::new(row, col as u8))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Check this line fits the grid: one row per column, every row in range
    pub fn validate(&self, grid: &GridSpec) -> Result<(), ConfigError> {
        if self.positions.len() != grid.cols as usize {
            return Err(ConfigError::Validation(format!(
                "payline {} covers {} columns, grid has {}",
                self.index,
                self.positions.len(),
                grid.cols
            )));
        }
        if let Some(&row) = self.positions.iter().find(|&&r| r >= grid.rows) {
            return Err(ConfigError::Validation(format!(
                "payline {} uses row {}, grid has {} rows",
                self.index, row, grid.rows
            )));
        }
        Ok(())
    }
}

/// Payline patterns for a 4×5 grid: horizontals, diagonals, V/Λ, W/M zigzags
pub fn standard_10_paylines() -> Vec<Payline> {
    vec![
        // Horizontal
        Payline::straight(0, 0, 5),
        Payline::straight(1, 1, 5),
        Payline::straight(2, 2, 5),
        Payline::straight(3, 3, 5),
        // Diagonals
        Payline::new(4, &[0, 1, 2, 3, 3]),
        Payline::new(5, &[3, 2, 1, 0, 0]),
        // V and inverted V
        Payline::new(6, &[0, 1, 2, 1, 0]),
        Payline::new(7, &[3, 2, 1, 2, 3]),
        // Zigzags
        Payline::new(8, &[0, 1, 0, 1, 0]),
        Payline::new(9, &[3, 2, 3, 2, 3]),
    ]
}

/// The eight lines of the classic layout: horizontals, diagonals, V shapes
pub fn classic_8_paylines() -> Vec<Payline> {
    standard_10_paylines().into_iter().take(8).collect()
}

/// Free spins awarded for a scatter count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSpinTier {
    /// Minimum scatters on the grid
    pub scatters: u8,
    /// Spins awarded
    pub spins: u32,
}

/// Evaluation rules beyond the symbol pay table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayRules {
    /// Each wild in a standard-symbol run multiplies the line win by this base.
    /// 1 disables the amplifier.
    pub wild_multiplier_base: u64,
    /// Minimum scatters for a scatter win
    pub scatter_min: u8,
    /// Scatter win per scatter per bet unit
    pub scatter_pay: u64,
    /// Tiered free spin awards, any order
    pub free_spin_tiers: Vec<FreeSpinTier>,
    /// Bonus round enabled
    pub bonus_enabled: bool,
    /// Minimum bonus symbols to trigger the bonus round
    pub bonus_min: u8,
}

impl PayRules {
    /// Free spins for a scatter count: the highest tier the count reaches
    pub fn free_spins_for(&self, scatters: usize) -> u32 {
        self.free_spin_tiers
            .iter()
            .filter(|t| scatters >= t.scatters as usize)
            .max_by_key(|t| t.scatters)
            .map(|t| t.spins)
            .unwrap_or(0)
    }
}

impl Default for PayRules {
    fn default() -> Self {
        Self {
            wild_multiplier_base: 2,
            scatter_min: 3,
            scatter_pay: 5,
            free_spin_tiers: vec![
                FreeSpinTier {
                    scatters: 3,
                    spins: 10,
                },
                FreeSpinTier {
                    scatters: 4,
                    spins: 15,
                },
                FreeSpinTier {
                    scatters: 5,
                    spins: 20,
                },
            ],
            bonus_enabled: true,
            bonus_min: 3,
        }
    }
}

/// A win result on a single payline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineWin {
    /// Payline index
    pub line_index: u8,
    /// Symbol the run was anchored on
    pub symbol: Symbol,
    /// Number of cells in the run
    pub run_length: u8,
    /// Wilds participating in the run
    pub wild_count: u8,
    /// Win multiplier from wilds (1 when none)
    pub multiplier: u64,
    /// Win amount (bet × pay × multiplier)
    pub win_amount: u64,
    /// Positions covered by the run
    pub positions: Vec<Position>,
}

/// Scatter win result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScatterWin {
    /// Number of scatters
    pub count: u8,
    /// Win amount
    pub win_amount: u64,
    /// Free spins awarded
    pub free_spins: u32,
    /// Positions of scatters
    pub positions: Vec<Position>,
}

/// Bonus round trigger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusTrigger {
    pub count: u8,
    pub positions: Vec<Position>,
}

/// Result of evaluating a grid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinResult {
    /// Line wins in payline order
    pub line_wins: Vec<LineWin>,
    /// Scatter win (if any)
    pub scatter_win: Option<ScatterWin>,
    /// Bonus trigger (if any)
    pub bonus: Option<BonusTrigger>,
    /// Total win amount
    pub total_win: u64,
    /// Every position that contributed to a win
    pub winning_cells: BTreeSet<Position>,
}

impl WinResult {
    /// Check if this is a winning spin
    pub fn is_win(&self) -> bool {
        self.total_win > 0
    }

    pub fn free_spins_awarded(&self) -> u32 {
        self.scatter_win.as_ref().map_or(0, |s| s.free_spins)
    }

    pub fn bonus_triggered(&self) -> bool {
        self.bonus.is_some()
    }

    /// Get win count
    pub fn win_count(&self) -> usize {
        self.line_wins.len() + usize::from(self.scatter_win.is_some())
    }
}

/// Complete paytable: symbol pays, active paylines and evaluation rules
#[derive(Debug, Clone)]
pub struct PayTable {
    catalog: SymbolCatalog,
    paylines: Vec<Payline>,
    rules: PayRules,
}

impl PayTable {
    pub fn new(catalog: SymbolCatalog, paylines: Vec<Payline>, rules: PayRules) -> Self {
        Self {
            catalog,
            paylines,
            rules,
        }
    }

    pub fn catalog(&self) -> &SymbolCatalog {
        &self.catalog
    }

    pub fn paylines(&self) -> &[Payline] {
        &self.paylines
    }

    pub fn rules(&self) -> &PayRules {
        &self.rules
    }

    /// Evaluate wins on a grid. `bet` is the per-line bet.
    pub fn evaluate(&self, grid: &Grid, bet: u64) -> WinResult {
        let mut result = WinResult::default();

        for payline in &self.paylines {
            if let Some(win) = self.evaluate_line(grid, payline, bet) {
                result.winning_cells.extend(win.positions.iter().copied());
                result.total_win = result.total_win.saturating_add(win.win_amount);
                result.line_wins.push(win);
            }
        }

        if let Some(scatter) = self.evaluate_scatter(grid, bet) {
            result.winning_cells.extend(scatter.positions.iter().copied());
            result.total_win = result.total_win.saturating_add(scatter.win_amount);
            result.scatter_win = Some(scatter);
        }

        result.bonus = self.evaluate_bonus(grid);

        debug!(
            "Evaluated grid: {} line wins, scatter {:?}, bonus {}, total {}",
            result.line_wins.len(),
            result.scatter_win.as_ref().map(|s| s.count),
            result.bonus.is_some(),
            result.total_win
        );

        result
    }

    fn evaluate_line(&self, grid: &Grid, payline: &Payline, bet: u64) -> Option<LineWin> {
        let cells: Vec<(Position, Symbol)> = payline
            .cells()
            .map(|pos| grid.get(pos).map(|symbol| (pos, symbol)))
            .collect::<Option<_>>()?;

        // A leading wild run takes the first non-wild symbol as its anchor.
        // Only an all-wild line is anchored on the wild itself. Scatter and
        // bonus anchors carry no line pays, so such lines never win.
        let anchor = cells
            .iter()
            .map(|&(_, symbol)| symbol)
            .find(|symbol| !symbol.is_wild())
            .unwrap_or(Symbol::Wild);

        let run: Vec<(Position, Symbol)> = cells
            .iter()
            .copied()
            .take_while(|&(_, symbol)| symbol == anchor || symbol.is_wild())
            .collect();

        if run.len() < MIN_RUN {
            return None;
        }

        let pay = self.catalog.pay(anchor, run.len());
        if pay == 0 {
            return None;
        }

        let wild_count = run.iter().filter(|(_, symbol)| symbol.is_wild()).count();
        let multiplier = if anchor.is_standard() {
            self.rules
                .wild_multiplier_base
                .saturating_pow(wild_count as u32)
        } else {
            1
        };

        Some(LineWin {
            line_index: payline.index,
            symbol: anchor,
            run_length: run.len() as u8,
            wild_count: wild_count as u8,
            multiplier,
            win_amount: bet.saturating_mul(pay).saturating_mul(multiplier),
            positions: run.into_iter().map(|(pos, _)| pos).collect(),
        })
    }

    fn evaluate_scatter(&self, grid: &Grid, bet: u64) -> Option<ScatterWin> {
        let positions = grid.positions_of(Symbol::Scatter);
        let count = positions.len();
        if count < self.rules.scatter_min as usize {
            return None;
        }

        Some(ScatterWin {
            count: count as u8,
            win_amount: bet
                .saturating_mul(count as u64)
                .saturating_mul(self.rules.scatter_pay),
            free_spins: self.rules.free_spins_for(count),
            positions,
        })
    }

    fn evaluate_bonus(&self, grid: &Grid) -> Option<BonusTrigger> {
        if !self.rules.bonus_enabled {
            return None;
        }
        let positions = grid.positions_of(Symbol::Bonus);
        if positions.len() < self.rules.bonus_min as usize {
            return None;
        }
        Some(BonusTrigger {
            count: positions.len() as u8,
            positions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{SymbolSpec, default_symbol_specs};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use Symbol::*;

    fn specs_with_wild_pays() -> Vec<SymbolSpec> {
        let mut specs = default_symbol_specs();
        specs[Wild.index()].pays = vec![25, 60, 120];
        specs
    }

    fn paytable(wild_base: u64) -> PayTable {
        let catalog = SymbolCatalog::from_specs(&specs_with_wild_pays()).unwrap();
        let rules = PayRules {
            wild_multiplier_base: wild_base,
            ..PayRules::default()
        };
        PayTable::new(catalog, vec![Payline::straight(0, 0, 5)], rules)
    }

    fn row(symbols: [Symbol; 5]) -> Grid {
        Grid::from_rows(&[symbols.to_vec()]).unwrap()
    }

    #[test]
    fn test_payline_straight() {
        let line = Payline::straight(0, 1, 5);
        assert_eq!(line.positions, vec![1, 1, 1, 1, 1]);
        assert_eq!(line.cells().nth(3), Some(Position::new(1, 3)));
    }

    #[test]
    fn test_standard_paylines_fit_4x5() {
        let spec = GridSpec::standard_4x5();
        let lines = standard_10_paylines();
        assert_eq!(lines.len(), 10);
        for (i, line) in lines.iter().enumerate() {
            assert_eq!(line.index as usize, i);
            line.validate(&spec).unwrap();
        }
        assert_eq!(classic_8_paylines().len(), 8);
    }

    #[test]
    fn test_payline_validation() {
        let spec = GridSpec::standard_4x5();
        assert!(Payline::new(0, &[0, 1, 2]).validate(&spec).is_err());
        assert!(Payline::new(0, &[0, 1, 4, 1, 0]).validate(&spec).is_err());
    }

    #[test]
    fn test_three_of_a_kind() {
        let result = paytable(2).evaluate(&row([Diamond, Diamond, Diamond, Cherry, Cherry]), 100);
        assert_eq!(result.total_win, 2000);
        assert_eq!(result.line_wins.len(), 1);
        let win = &result.line_wins[0];
        assert_eq!(win.symbol, Diamond);
        assert_eq!(win.run_length, 3);
        assert_eq!(win.multiplier, 1);
        assert_eq!(result.winning_cells.len(), 3);
    }

    #[test]
    fn test_leading_wild_doubles() {
        let result = paytable(2).evaluate(&row([Wild, Diamond, Diamond, Cherry, Cherry]), 100);
        assert_eq!(result.total_win, 4000);
        let win = &result.line_wins[0];
        assert_eq!(win.symbol, Diamond);
        assert_eq!(win.run_length, 3);
        assert_eq!(win.wild_count, 1);
        assert_eq!(win.multiplier, 2);
    }

    #[test]
    fn test_wild_multiplier_disabled() {
        let result = paytable(1).evaluate(&row([Wild, Diamond, Diamond, Cherry, Cherry]), 100);
        assert_eq!(result.total_win, 2000);
    }

    #[test]
    fn test_two_wilds_quadruple() {
        let result = paytable(2).evaluate(&row([Cherry, Wild, Wild, Cherry, Lemon]), 10);
        // Cherry run of 4 pays 15, two wilds → ×4
        assert_eq!(result.total_win, 10 * 15 * 4);
        assert_eq!(result.line_wins[0].run_length, 4);
    }

    #[test]
    fn test_run_of_two_pays_nothing() {
        let result = paytable(2).evaluate(&row([Diamond, Diamond, Cherry, Diamond, Diamond]), 100);
        assert!(!result.is_win());
        assert!(result.winning_cells.is_empty());
    }

    #[test]
    fn test_all_wild_line_pays_wild_table() {
        let result = paytable(2).evaluate(&row([Wild; 5]), 10);
        let win = &result.line_wins[0];
        assert_eq!(win.symbol, Wild);
        assert_eq!(win.run_length, 5);
        assert_eq!(win.multiplier, 1);
        assert_eq!(result.total_win, 1200);
    }

    #[test]
    fn test_wild_run_anchored_on_scatter_pays_nothing() {
        let result = paytable(2).evaluate(&row([Wild, Wild, Wild, Scatter, Cherry]), 10);
        assert!(result.line_wins.is_empty());
        assert_eq!(result.total_win, 0);
        assert!(result.winning_cells.is_empty());
    }

    #[test]
    fn test_wild_run_anchored_on_bonus_pays_nothing() {
        let result = paytable(2).evaluate(&row([Wild, Wild, Bonus, Diamond, Diamond]), 10);
        assert!(result.line_wins.is_empty());
    }

    #[test]
    fn test_wild_run_without_wild_pays() {
        let catalog = SymbolCatalog::from_specs(&default_symbol_specs()).unwrap();
        let table = PayTable::new(catalog, vec![Payline::straight(0, 0, 5)], PayRules::default());
        let result = table.evaluate(&row([Wild, Wild, Wild, Bonus, Cherry]), 10);
        assert!(result.line_wins.is_empty());
    }

    #[test]
    fn test_scatter_anywhere() {
        let catalog = SymbolCatalog::from_specs(&default_symbol_specs()).unwrap();
        let table = PayTable::new(catalog, standard_10_paylines(), PayRules::default());
        let grid = Grid::from_rows(&[
            vec![Scatter, Cherry, Lemon, Crown, Seven],
            vec![Lemon, Crown, Scatter, Seven, Cherry],
            vec![Crown, Seven, Cherry, Lemon, Crown],
            vec![Seven, Lemon, Crown, Cherry, Scatter],
        ])
        .unwrap();
        let result = table.evaluate(&grid, 50);
        let scatter = result.scatter_win.as_ref().unwrap();
        assert_eq!(scatter.count, 3);
        assert_eq!(scatter.win_amount, 750);
        assert_eq!(scatter.free_spins, 10);
        assert_eq!(result.total_win, 750);
        assert!(result.winning_cells.contains(&Position::new(3, 4)));
    }

    #[test]
    fn test_free_spin_tiers() {
        let rules = PayRules::default();
        assert_eq!(rules.free_spins_for(2), 0);
        assert_eq!(rules.free_spins_for(3), 10);
        assert_eq!(rules.free_spins_for(4), 15);
        assert_eq!(rules.free_spins_for(5), 20);
        assert_eq!(rules.free_spins_for(8), 20);
    }

    #[test]
    fn test_bonus_trigger() {
        let table = paytable(2);
        let grid = row([Bonus, Cherry, Bonus, Lemon, Bonus]);
        let result = table.evaluate(&grid, 10);
        assert!(result.bonus_triggered());
        assert!(!result.is_win());

        let disabled = PayTable::new(
            table.catalog().clone(),
            table.paylines().to_vec(),
            PayRules {
                bonus_enabled: false,
                ..PayRules::default()
            },
        );
        assert!(!disabled.evaluate(&grid, 10).bonus_triggered());
    }

    #[test]
    fn test_evaluate_is_pure() {
        let catalog = SymbolCatalog::from_specs(&specs_with_wild_pays()).unwrap();
        let table = PayTable::new(catalog.clone(), standard_10_paylines(), PayRules::default());
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let grid = Grid::generate(GridSpec::standard_4x5(), &catalog, &mut rng);
            let first = table.evaluate(&grid, 25);
            assert_eq!(first, table.evaluate(&grid, 25));
            for win in &first.line_wins {
                assert!(win.run_length as usize >= MIN_RUN);
                assert!(win.win_amount > 0);
            }
            let sum: u64 = first.line_wins.iter().map(|w| w.win_amount).sum::<u64>()
                + first.scatter_win.as_ref().map_or(0, |s| s.win_amount);
            assert_eq!(sum, first.total_win);
        }
    }
}
