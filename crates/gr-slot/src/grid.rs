//! Symbol grid (rows × columns)

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::symbols::{Symbol, SymbolCatalog};

/// Grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

/// Grid dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    pub rows: u8,
    pub cols: u8,
}

impl GridSpec {
    /// 4 rows × 5 columns
    pub fn standard_4x5() -> Self {
        Self { rows: 4, cols: 5 }
    }

    /// Total grid positions
    pub fn total_positions(&self) -> usize {
        self.rows as usize * self.cols as usize
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::standard_4x5()
    }
}

/// A fully drawn grid. Immutable once generated; each spin replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    spec: GridSpec,
    /// Row-major cells
    cells: Vec<Symbol>,
}

impl Grid {
    /// Draw every cell independently from the catalog
    pub fn generate<R: Rng + ?Sized>(spec: GridSpec, catalog: &SymbolCatalog, rng: &mut R) -> Self {
        let cells = (0..spec.total_positions())
            .map(|_| catalog.draw(rng))
            .collect();
        Self { spec, cells }
    }

    /// Build a grid from explicit rows. Returns `None` for ragged or empty input.
    pub fn from_rows(rows: &[Vec<Symbol>]) -> Option<Self> {
        let cols = rows.first()?.len();
        if cols == 0 || rows.iter().any(|r| r.len() != cols) {
            return None;
        }
        let spec = GridSpec {
            rows: u8::try_from(rows.len()).ok()?,
            cols: u8::try_from(cols).ok()?,
        };
        Some(Self {
            spec,
            cells: rows.iter().flatten().copied().collect(),
        })
    }

    pub fn spec(&self) -> GridSpec {
        self.spec
    }

    pub fn rows(&self) -> u8 {
        self.spec.rows
    }

    pub fn cols(&self) -> u8 {
        self.spec.cols
    }

    /// Symbol at a position, `None` when out of bounds
    pub fn get(&self, pos: Position) -> Option<Symbol> {
        if pos.row >= self.spec.rows || pos.col >= self.spec.cols {
            return None;
        }
        self.cells
            .get(pos.row as usize * self.spec.cols as usize + pos.col as usize)
            .copied()
    }

    /// Iterate rows as slices
    pub fn row_slices(&self) -> impl Iterator<Item = &[Symbol]> {
        self.cells.chunks(self.spec.cols as usize)
    }

    /// Iterate all cells with their positions
    pub fn iter(&self) -> impl Iterator<Item = (Position, Symbol)> + '_ {
        let cols = self.spec.cols as usize;
        self.cells.iter().enumerate().map(move |(i, &symbol)| {
            (Position::new((i / cols) as u8, (i % cols) as u8), symbol)
        })
    }

    /// Positions holding `symbol`, in row-major order
    pub fn positions_of(&self, symbol: Symbol) -> Vec<Position> {
        self.iter()
            .filter(|&(_, s)| s == symbol)
            .map(|(pos, _)| pos)
            .collect()
    }

    pub fn count(&self, symbol: Symbol) -> usize {
        self.cells.iter().filter(|&&s| s == symbol).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::default_symbol_specs;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use Symbol::*;

    #[test]
    fn test_generate_fills_every_cell() {
        let catalog = SymbolCatalog::from_specs(&default_symbol_specs()).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let grid = Grid::generate(GridSpec::standard_4x5(), &catalog, &mut rng);
        assert_eq!(grid.iter().count(), 20);
        assert_eq!(grid.row_slices().count(), 4);
        assert!(grid.get(Position::new(3, 4)).is_some());
        assert!(grid.get(Position::new(4, 0)).is_none());
        assert!(grid.get(Position::new(0, 5)).is_none());
    }

    #[test]
    fn test_generate_is_seed_deterministic() {
        let catalog = SymbolCatalog::from_specs(&default_symbol_specs()).unwrap();
        let a = Grid::generate(GridSpec::default(), &catalog, &mut StdRng::seed_from_u64(9));
        let b = Grid::generate(GridSpec::default(), &catalog, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_rows() {
        let grid = Grid::from_rows(&[
            vec![Diamond, Cherry, Lemon],
            vec![Scatter, Wild, Scatter],
        ])
        .unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.get(Position::new(1, 1)), Some(Wild));
        assert_eq!(grid.count(Scatter), 2);
        assert_eq!(
            grid.positions_of(Scatter),
            vec![Position::new(1, 0), Position::new(1, 2)]
        );
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        assert!(Grid::from_rows(&[vec![Diamond, Cherry], vec![Lemon]]).is_none());
        assert!(Grid::from_rows(&[]).is_none());
    }
}
