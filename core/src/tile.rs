use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Visual classes of a single cell, derived from a [`crate::Snapshot`].
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TileMarks: u8 {
        const REVEALED = 1;
        const CORRECT  = 1 << 1;
        const WRONG    = 1 << 2;
    }
}
