//! Difficulty levels and their immutable balance profiles

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Selectable difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Normal,
    Hard,
}

/// Per-difficulty balance, fixed for the duration of a round
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifficultyProfile {
    /// Base target speed (pixels/s)
    pub target_speed: f32,
    /// Scales randomized coin/hazard speeds
    pub speed_mult: f32,
    pub coin_count: usize,
    pub hazard_count: usize,
    /// Signed wind strength, 0 on Easy
    pub wind: f32,
    /// Seconds between shots
    pub fire_cooldown: f32,
    /// Score multiplier applied after critical doubling
    pub bonus: f32,
    /// Round length in seconds
    pub duration: f32,
}

const EASY: DifficultyProfile = DifficultyProfile {
    target_speed: 120.0,
    speed_mult: 1.0,
    coin_count: 3,
    hazard_count: 1,
    wind: 0.0,
    fire_cooldown: 0.21,
    bonus: 1.00,
    duration: 60.0,
};

const NORMAL: DifficultyProfile = DifficultyProfile {
    target_speed: 155.0,
    speed_mult: 1.25,
    coin_count: 4,
    hazard_count: 2,
    wind: 0.9,
    fire_cooldown: 0.26,
    bonus: 1.08,
    duration: 45.0,
};

const HARD: DifficultyProfile = DifficultyProfile {
    target_speed: 190.0,
    speed_mult: 1.5,
    coin_count: 5,
    hazard_count: 3,
    wind: 1.6,
    fire_cooldown: 0.31,
    bonus: 1.15,
    duration: 40.0,
};

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Normal => "NORMAL",
            Difficulty::Hard => "HARD",
        }
    }

    /// Parse a difficulty key, falling back to Easy when missing or malformed
    pub fn from_key(key: Option<&str>) -> Self {
        key.and_then(|k| k.parse().ok()).unwrap_or_default()
    }

    pub fn profile(&self) -> &'static DifficultyProfile {
        match self {
            Difficulty::Easy => &EASY,
            Difficulty::Normal => &NORMAL,
            Difficulty::Hard => &HARD,
        }
    }

    /// Short description for the difficulty picker
    pub fn hint(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY: steady targets, no wind",
            Difficulty::Normal => "NORMAL: faster targets, light wind",
            Difficulty::Hard => "HARD: very fast targets, strong wind",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" | "med" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {}", other)),
        }
    }
}
