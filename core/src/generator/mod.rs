use std::collections::BTreeSet;
use serde::{Deserialize, Serialize};

use crate::*;
pub use random::*;

mod random;

pub trait SequenceGenerator {
    fn generate(&mut self, length: CellCount, grid_size: GridSize) -> Result<Sequence>;
}

/// Ordered cells to memorize, first element is revealed first.
///
/// Cells are distinct and inside the grid the sequence was built for.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence(Vec<CellIndex>);

impl Sequence {
    /// Builds a sequence from explicit cells, checking range and uniqueness.
    pub fn from_cells(cells: Vec<CellIndex>, grid_size: GridSize) -> Result<Self> {
        let total = cell_count(grid_size);
        let mut seen = BTreeSet::new();
        for &cell in &cells {
            if cell >= total {
                return Err(GameError::InvalidCoords);
            }
            if !seen.insert(cell) {
                return Err(GameError::DuplicateCell(cell));
            }
        }
        Ok(Self(cells))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<CellIndex> {
        self.0.get(index).copied()
    }

    pub fn contains(&self, cell: CellIndex) -> bool {
        self.0.contains(&cell)
    }

    pub fn iter(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[CellIndex] {
        &self.0
    }
}
