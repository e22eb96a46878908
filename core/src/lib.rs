use core::time::Duration;
use serde::{Deserialize, Serialize};

pub use clock::*;
pub use difficulty::*;
pub use error::*;
pub use generator::*;
pub use scheduler::*;
pub use session::*;
pub use snapshot::*;
pub use theme::*;
pub use tile::*;
pub use types::*;

mod clock;
mod difficulty;
mod error;
mod generator;
mod scheduler;
mod session;
mod snapshot;
mod theme;
mod tile;
mod types;

pub const DEFAULT_GRID_SIZE: GridSize = 5;
pub const DEFAULT_MAX_TILES: CellCount = 10;

#[derive(Deserialize)]
struct RawSessionConfig {
    grid_size: GridSize,
    max_tiles: CellCount,
    #[serde(default)]
    difficulty: Difficulty,
    #[serde(default)]
    theme: Theme,
    #[serde(default)]
    timings: RevealTimings,
    #[serde(default)]
    cap_level_at_max_tiles: bool,
}

/// Parameters fixed for the lifetime of a [`LevelSession`].
///
/// Invariant: `1 <= max_tiles <= grid_size²`, checked on construction and on deserialization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSessionConfig")]
pub struct SessionConfig {
    grid_size: GridSize,
    max_tiles: CellCount,
    difficulty: Difficulty,
    theme: Theme,
    timings: RevealTimings,
    cap_level_at_max_tiles: bool,
}

impl SessionConfig {
    const fn new_unchecked(grid_size: GridSize, max_tiles: CellCount) -> Self {
        Self {
            grid_size,
            max_tiles,
            difficulty: Difficulty::Easy,
            theme: Theme::Numbers,
            timings: RevealTimings {
                easy_ms: 1500,
                medium_ms: 1000,
                hard_ms: 250,
            },
            cap_level_at_max_tiles: false,
        }
    }

    pub fn new(grid_size: GridSize, max_tiles: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(grid_size, max_tiles);
        config.validate()?;
        Ok(config)
    }

    /// Checks the grid can hold the longest sequence.
    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 {
            return Err(GameError::InvalidGridSize);
        }
        let cells = self.cell_count();
        if self.max_tiles == 0 || self.max_tiles > cells {
            return Err(GameError::InvalidTileCount {
                max_tiles: self.max_tiles,
                cells,
            });
        }
        Ok(())
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_timings(mut self, timings: RevealTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Stops levels from growing past `max_tiles`.
    pub fn with_level_cap(mut self, cap: bool) -> Self {
        self.cap_level_at_max_tiles = cap;
        self
    }

    pub const fn grid_size(&self) -> GridSize {
        self.grid_size
    }

    pub const fn cell_count(&self) -> CellCount {
        cell_count(self.grid_size)
    }

    pub const fn max_tiles(&self) -> CellCount {
        self.max_tiles
    }

    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub const fn theme(&self) -> Theme {
        self.theme
    }

    pub const fn reveal_delay(&self) -> Duration {
        self.timings.delay(self.difficulty)
    }

    /// Length of the sequence played at `level`, never more than the grid holds.
    pub fn tiles_for_level(&self, level: Level) -> CellCount {
        let most = self.max_tiles.min(self.cell_count());
        CellCount::try_from(level).map_or(most, |tiles| tiles.min(most))
    }

    pub fn level_after(&self, level: Level) -> Level {
        let next = level.saturating_add(1);
        let cap = Level::from(self.max_tiles);
        if self.cap_level_at_max_tiles && next > cap {
            cap
        } else {
            next
        }
    }
}

impl TryFrom<RawSessionConfig> for SessionConfig {
    type Error = GameError;

    fn try_from(raw: RawSessionConfig) -> Result<Self> {
        let config = Self {
            grid_size: raw.grid_size,
            max_tiles: raw.max_tiles,
            difficulty: raw.difficulty,
            theme: raw.theme,
            timings: raw.timings,
            cap_level_at_max_tiles: raw.cap_level_at_max_tiles,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new_unchecked(DEFAULT_GRID_SIZE, DEFAULT_MAX_TILES)
    }
}
