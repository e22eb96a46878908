use core::fmt;
use core::time::Duration;
use serde::{Deserialize, Serialize};

/// Pause between the last highlighted tile and the start of the input phase.
pub const REVEAL_TAIL: Duration = Duration::from_millis(200);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub const fn name(self) -> &'static str {
        use Difficulty::*;
        match self {
            Easy => "easy",
            Medium => "medium",
            Hard => "hard",
        }
    }

    /// Looks up a difficulty by name, unknown names fall back to [`Difficulty::Easy`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "easy" => Self::Easy,
            "medium" => Self::Medium,
            "hard" => Self::Hard,
            other => {
                log::warn!("Unknown difficulty {:?}, fallback to easy", other);
                Self::Easy
            }
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Easy
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Delay between two highlighted tiles, per difficulty.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealTimings {
    pub easy_ms: u64,
    pub medium_ms: u64,
    pub hard_ms: u64,
}

impl RevealTimings {
    pub const fn delay_ms(&self, difficulty: Difficulty) -> u64 {
        use Difficulty::*;
        match difficulty {
            Easy => self.easy_ms,
            Medium => self.medium_ms,
            Hard => self.hard_ms,
        }
    }

    pub const fn delay(&self, difficulty: Difficulty) -> Duration {
        Duration::from_millis(self.delay_ms(difficulty))
    }
}

impl Default for RevealTimings {
    fn default() -> Self {
        Self {
            easy_ms: 1500,
            medium_ms: 1000,
            hard_ms: 250,
        }
    }
}
