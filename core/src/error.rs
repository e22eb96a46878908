use thiserror::Error;

use crate::types::*;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Cannot pick {length} distinct tiles out of {cells} cells")]
    InvalidArgument { length: CellCount, cells: CellCount },
    #[error("Grid size must be at least 1")]
    InvalidGridSize,
    #[error("Max tiles must be between 1 and {cells}, got {max_tiles}")]
    InvalidTileCount { max_tiles: CellCount, cells: CellCount },
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Cell {0} appears more than once in the sequence")]
    DuplicateCell(CellIndex),
}

pub type Result<T> = core::result::Result<T, GameError>;
