use anyhow::Context;
use pathplay_core::{CellCount, GridSize, RevealTimings};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Optional settings file, command-line options take precedence over it.
///
/// ```toml
/// grid_size = 5
/// max_tiles = 10
/// cap_level_at_max_tiles = false
/// difficulty = "medium"
///
/// [timings]
/// easy_ms = 1500
/// medium_ms = 1000
/// hard_ms = 250
/// ```
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub grid_size: Option<GridSize>,
    pub max_tiles: Option<CellCount>,
    pub cap_level_at_max_tiles: Option<bool>,
    pub difficulty: Option<String>,
    pub theme: Option<String>,
    pub timings: RevealTimings,
}

impl Settings {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Could not read settings from {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid settings in {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }
}
