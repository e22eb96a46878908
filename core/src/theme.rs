use core::fmt;
use serde::{Deserialize, Serialize};

use crate::types::*;

const SHAPES: [&str; 4] = ["🔺", "🔴", "⬛️", "🔶"];
const ANIMALS: [&str; 10] = ["🐶", "🐱", "🐭", "🐹", "🐰", "🦊", "🐻", "🐼", "🐨", "🐯"];

/// Content drawn inside each cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Numbers,
    Shapes,
    Animals,
    /// Any unrecognized theme, cells stay empty.
    Plain,
}

impl Theme {
    pub const SELECTABLE: [Self; 3] = [Self::Numbers, Self::Shapes, Self::Animals];

    pub const fn name(self) -> &'static str {
        use Theme::*;
        match self {
            Numbers => "numbers",
            Shapes => "shapes",
            Animals => "animals",
            Plain => "plain",
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "numbers" => Self::Numbers,
            "shapes" => Self::Shapes,
            "animals" => Self::Animals,
            other => {
                log::debug!("theme {:?} has no content, cells stay empty", other);
                Self::Plain
            }
        }
    }

    pub fn glyph(self, cell: CellIndex) -> String {
        use Theme::*;
        let cell = usize::from(cell);
        match self {
            Numbers => (cell + 1).to_string(),
            Shapes => SHAPES[cell % SHAPES.len()].to_string(),
            Animals => ANIMALS[cell % ANIMALS.len()].to_string(),
            Plain => String::new(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::Numbers
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
