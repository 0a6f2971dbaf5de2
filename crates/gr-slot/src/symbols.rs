//! Symbol definitions and the weighted symbol catalog

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Symbol category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    /// Regular paying symbol
    Standard,
    /// Substitutes for standard symbols on a line
    Wild,
    /// Pays and awards free spins regardless of position
    Scatter,
    /// Triggers the prize-reveal bonus round
    Bonus,
}

/// A reel symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Symbol {
    Diamond = 0,
    MoneyBag = 1,
    Bitcoin = 2,
    Crown = 3,
    Seven = 4,
    Wild = 5,
    Scatter = 6,
    Bonus = 7,
    Cherry = 8,
    Lemon = 9,
}

impl Symbol {
    /// Number of symbols in the set
    pub const COUNT: usize = 10;

    /// All symbols in table order
    pub const ALL: [Symbol; Symbol::COUNT] = [
        Symbol::Diamond,
        Symbol::MoneyBag,
        Symbol::Bitcoin,
        Symbol::Crown,
        Symbol::Seven,
        Symbol::Wild,
        Symbol::Scatter,
        Symbol::Bonus,
        Symbol::Cherry,
        Symbol::Lemon,
    ];

    /// Index into per-symbol tables
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn kind(self) -> SymbolKind {
        match self {
            Symbol::Wild => SymbolKind::Wild,
            Symbol::Scatter => SymbolKind::Scatter,
            Symbol::Bonus => SymbolKind::Bonus,
            _ => SymbolKind::Standard,
        }
    }

    pub fn is_wild(self) -> bool {
        self.kind() == SymbolKind::Wild
    }

    pub fn is_standard(self) -> bool {
        self.kind() == SymbolKind::Standard
    }

    /// Display glyph
    pub fn glyph(self) -> &'static str {
        match self {
            Symbol::Diamond => "💎",
            Symbol::MoneyBag => "💰",
            Symbol::Bitcoin => "₿",
            Symbol::Crown => "👑",
            Symbol::Seven => "7️⃣",
            Symbol::Wild => "🎯",
            Symbol::Scatter => "✨",
            Symbol::Bonus => "🎁",
            Symbol::Cherry => "🍒",
            Symbol::Lemon => "🍋",
        }
    }

    /// Three-letter code for terminals without emoji support
    pub fn code(self) -> &'static str {
        match self {
            Symbol::Diamond => "DIA",
            Symbol::MoneyBag => "BAG",
            Symbol::Bitcoin => "BTC",
            Symbol::Crown => "CRN",
            Symbol::Seven => "SVN",
            Symbol::Wild => "WLD",
            Symbol::Scatter => "SCT",
            Symbol::Bonus => "BON",
            Symbol::Cherry => "CHR",
            Symbol::Lemon => "LEM",
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.glyph())
    }
}

/// Per-symbol configuration entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolSpec {
    pub symbol: Symbol,
    /// Relative draw weight
    pub weight: u32,
    /// Line pays per bet unit for runs of 3, 4, 5, ... (index 0 = 3 of a kind)
    #[serde(default)]
    pub pays: Vec<u64>,
}

impl SymbolSpec {
    pub fn new(symbol: Symbol, weight: u32, pays: &[u64]) -> Self {
        Self {
            symbol,
            weight,
            pays: pays.to_vec(),
        }
    }

    /// Get pay value for a run length
    pub fn pay(&self, run_length: usize) -> u64 {
        if run_length < 3 {
            return 0;
        }
        self.pays.get(run_length - 3).copied().unwrap_or(0)
    }
}

/// Weighted symbol catalog, indexed by [`Symbol`]
#[derive(Debug, Clone)]
pub struct SymbolCatalog {
    specs: [SymbolSpec; Symbol::COUNT],
    total_weight: u64,
}

impl SymbolCatalog {
    /// Build a catalog from config entries. Every symbol must appear exactly once.
    pub fn from_specs(specs: &[SymbolSpec]) -> Result<Self, ConfigError> {
        let mut slots: [Option<SymbolSpec>; Symbol::COUNT] = Default::default();

        for spec in specs {
            let slot = &mut slots[spec.symbol.index()];
            if slot.is_some() {
                return Err(ConfigError::Validation(format!(
                    "symbol {:?} listed more than once",
                    spec.symbol
                )));
            }
            if spec.weight == 0 {
                return Err(ConfigError::Validation(format!(
                    "symbol {:?} has zero weight",
                    spec.symbol
                )));
            }
            if !spec.pays.is_empty()
                && matches!(spec.symbol.kind(), SymbolKind::Scatter | SymbolKind::Bonus)
            {
                return Err(ConfigError::Validation(format!(
                    "symbol {:?} cannot carry line pays",
                    spec.symbol
                )));
            }
            *slot = Some(spec.clone());
        }

        let mut missing = Vec::new();
        for symbol in Symbol::ALL {
            if slots[symbol.index()].is_none() {
                missing.push(format!("{:?}", symbol));
            }
        }
        if !missing.is_empty() {
            return Err(ConfigError::Validation(format!(
                "missing symbols: {}",
                missing.join(", ")
            )));
        }

        let specs = slots.map(|s| s.unwrap_or_else(|| unreachable!("checked above")));
        let total_weight = specs.iter().map(|s| s.weight as u64).sum();
        debug!("Symbol catalog built, total weight {}", total_weight);

        Ok(Self {
            specs,
            total_weight,
        })
    }

    pub fn spec(&self, symbol: Symbol) -> &SymbolSpec {
        &self.specs[symbol.index()]
    }

    pub fn weight(&self, symbol: Symbol) -> u32 {
        self.spec(symbol).weight
    }

    /// Line pay per bet unit for a run of `run_length` on `symbol`
    pub fn pay(&self, symbol: Symbol, run_length: usize) -> u64 {
        self.spec(symbol).pay(run_length)
    }

    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    /// Probability of drawing `symbol`
    pub fn probability(&self, symbol: Symbol) -> f64 {
        self.weight(symbol) as f64 / self.total_weight as f64
    }

    /// Draw one symbol with probability proportional to its weight
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Symbol {
        let roll = rng.random_range(0..self.total_weight);
        self.symbol_at(roll)
    }

    /// Resolve a point in `[0, total_weight)` to a symbol by cumulative scan.
    /// Points at or past the end resolve to the last symbol.
    pub fn symbol_at(&self, point: u64) -> Symbol {
        let mut cumulative = 0u64;
        for spec in &self.specs {
            cumulative += spec.weight as u64;
            if point < cumulative {
                return spec.symbol;
            }
        }
        Symbol::ALL[Symbol::COUNT - 1]
    }
}

/// Stock weights and line pays
pub fn default_symbol_specs() -> Vec<SymbolSpec> {
    vec![
        SymbolSpec::new(Symbol::Diamond, 5, &[20, 50, 100]),
        SymbolSpec::new(Symbol::MoneyBag, 6, &[15, 40, 80]),
        SymbolSpec::new(Symbol::Bitcoin, 7, &[12, 30, 60]),
        SymbolSpec::new(Symbol::Crown, 8, &[10, 25, 50]),
        SymbolSpec::new(Symbol::Seven, 9, &[8, 20, 40]),
        SymbolSpec::new(Symbol::Wild, 4, &[]),
        SymbolSpec::new(Symbol::Scatter, 3, &[]),
        SymbolSpec::new(Symbol::Bonus, 2, &[]),
        SymbolSpec::new(Symbol::Cherry, 10, &[5, 15, 30]),
        SymbolSpec::new(Symbol::Lemon, 10, &[5, 15, 30]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn catalog() -> SymbolCatalog {
        SymbolCatalog::from_specs(&default_symbol_specs()).unwrap()
    }

    #[test]
    fn test_symbol_pay() {
        let spec = SymbolSpec::new(Symbol::Diamond, 5, &[20, 50, 100]);
        assert_eq!(spec.pay(2), 0);
        assert_eq!(spec.pay(3), 20);
        assert_eq!(spec.pay(4), 50);
        assert_eq!(spec.pay(5), 100);
        assert_eq!(spec.pay(6), 0);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(Symbol::Wild.kind(), SymbolKind::Wild);
        assert_eq!(Symbol::Scatter.kind(), SymbolKind::Scatter);
        assert_eq!(Symbol::Bonus.kind(), SymbolKind::Bonus);
        assert!(Symbol::Cherry.is_standard());
        for (i, symbol) in Symbol::ALL.iter().enumerate() {
            assert_eq!(symbol.index(), i);
        }
    }

    #[test]
    fn test_catalog_total_weight() {
        assert_eq!(catalog().total_weight(), 64);
    }

    #[test]
    fn test_symbol_at_boundaries() {
        let catalog = catalog();
        assert_eq!(catalog.symbol_at(0), Symbol::Diamond);
        assert_eq!(catalog.symbol_at(4), Symbol::Diamond);
        assert_eq!(catalog.symbol_at(5), Symbol::MoneyBag);
        assert_eq!(catalog.symbol_at(63), Symbol::Lemon);
        // Exactly at the cumulative sum resolves to the last symbol
        assert_eq!(catalog.symbol_at(64), Symbol::Lemon);
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        let mut specs = default_symbol_specs();
        specs.push(SymbolSpec::new(Symbol::Cherry, 1, &[1, 2, 3]));
        assert!(SymbolCatalog::from_specs(&specs).is_err());
    }

    #[test]
    fn test_missing_symbol_rejected() {
        let mut specs = default_symbol_specs();
        specs.retain(|s| s.symbol != Symbol::Lemon);
        let err = SymbolCatalog::from_specs(&specs).unwrap_err();
        assert!(err.to_string().contains("Lemon"));
    }

    #[test]
    fn test_zero_weight_rejected() {
        let mut specs = default_symbol_specs();
        specs[0].weight = 0;
        assert!(SymbolCatalog::from_specs(&specs).is_err());
    }

    #[test]
    fn test_scatter_pays_rejected() {
        let mut specs = default_symbol_specs();
        specs[6].pays = vec![1, 2, 3];
        assert!(SymbolCatalog::from_specs(&specs).is_err());
    }

    #[test]
    fn test_draw_converges_to_weights() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(7);
        let draws = 200_000;
        let mut counts = [0u32; Symbol::COUNT];
        for _ in 0..draws {
            counts[catalog.draw(&mut rng).index()] += 1;
        }
        for symbol in Symbol::ALL {
            let observed = counts[symbol.index()] as f64 / draws as f64;
            assert_abs_diff_eq!(observed, catalog.probability(symbol), epsilon = 0.01);
        }
    }

    #[test]
    fn test_draw_skewed_weights() {
        let mut specs = default_symbol_specs();
        for spec in &mut specs {
            spec.weight = if spec.symbol == Symbol::Wild { 90 } else { 1 };
        }
        let catalog = SymbolCatalog::from_specs(&specs).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let wilds = (0..50_000)
            .filter(|_| catalog.draw(&mut rng) == Symbol::Wild)
            .count();
        assert_abs_diff_eq!(wilds as f64 / 50_000.0, 90.0 / 99.0, epsilon = 0.01);
    }
}
