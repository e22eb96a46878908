/// Side length of the square grid.
pub type GridSize = u8;

/// Count type used for tile counts and total-cell counts.
pub type CellCount = u16;

/// Row-major index of a single cell, always in `0..grid_size²`.
pub type CellIndex = u16;

/// Player level, starting at 1.
pub type Level = u32;

/// Generation tag of one level's reveal timeline.
pub type Epoch = u64;

pub const fn mult(a: GridSize, b: GridSize) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Total number of cells of a square grid.
pub const fn cell_count(size: GridSize) -> CellCount {
    mult(size, size)
}

/// Two-dimensional `(row, column)` position of a cell.
pub type RowCol = (GridSize, GridSize);

pub trait ToCellIndex {
    fn to_cell_index(self, size: GridSize) -> Option<CellIndex>;
}

impl ToCellIndex for RowCol {
    fn to_cell_index(self, size: GridSize) -> Option<CellIndex> {
        let (row, col) = self;
        if row >= size || col >= size {
            return None;
        }
        Some(mult(row, size) + CellIndex::from(col))
    }
}
