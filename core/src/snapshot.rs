use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::*;

/// Read-only view of a session, handed to renderers after every transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub grid_size: GridSize,
    pub level: Level,
    pub step: Step,
    pub sequence: Sequence,
    pub reveal_cursor: Option<usize>,
    pub user_clicks: BTreeSet<CellIndex>,
    pub wrong_click: Option<CellIndex>,
    pub difficulty: Difficulty,
    pub theme: Theme,
}

impl Snapshot {
    /// Cell highlighted right now, only during the reveal.
    pub fn revealed_cell(&self) -> Option<CellIndex> {
        match self.step {
            Step::Revealing => self.sequence.get(self.reveal_cursor?),
            _ => None,
        }
    }

    pub fn cell_marks(&self, cell: CellIndex) -> TileMarks {
        let mut marks = TileMarks::empty();
        if self.revealed_cell() == Some(cell) {
            marks |= TileMarks::REVEALED;
        }
        if self.user_clicks.contains(&cell) {
            marks |= TileMarks::CORRECT;
        }
        if self.step == Step::Lost && self.wrong_click == Some(cell) {
            marks |= TileMarks::WRONG;
        }
        marks
    }

    pub fn cells(&self) -> impl Iterator<Item = CellIndex> + use<> {
        0..cell_count(self.grid_size)
    }

    pub fn glyph(&self, cell: CellIndex) -> String {
        self.theme.glyph(cell)
    }
}
