//! Data-driven game balance
//!
//! Physics and layout constants live here so they can be tweaked from a JSON
//! file without touching the simulation. Difficulty-specific values are in
//! [`crate::sim::difficulty`].

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::Playfield;

/// Errors raised while loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("Tuning parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid tuning: {0}")]
    Invalid(String),
}

/// Which kind of reward target a round spawns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TargetLayout {
    /// Free-flying coins plus hazards
    #[default]
    Coins,
    /// Three horizontal sliding boards, no hazards
    Boards,
}

/// A coin archetype: point value and radii
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoinSpec {
    pub points: u32,
    pub radius: f32,
    /// Critical zone radius (must be smaller than the effective hit radius)
    pub core: f32,
}

/// Tunable constants for a game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub arena_width: f32,
    pub arena_height: f32,
    /// Region coins and hazards bounce around in
    pub playfield: Playfield,
    pub player_pos: Vec2,
    pub launch_offset: f32,
    pub launch_speed: f32,
    pub gravity: f32,
    pub wind_scale: f32,
    pub cull_margin: f32,
    pub max_frame_dt: f32,
    pub aim_key_rate: f32,
    pub hit_radius_scale: f32,
    pub layout: TargetLayout,
    /// Cycled through when spawning coins
    pub coins: Vec<CoinSpec>,
    pub hazard_radius: (f32, f32),
    /// Board size for [`TargetLayout::Boards`]
    pub board_size: Vec2,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            playfield: Playfield {
                left: 0.0,
                top: 40.0,
                right: ARENA_WIDTH,
                bottom: ARENA_HEIGHT - 260.0,
            },
            player_pos: Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT - PLAYER_BASELINE),
            launch_offset: LAUNCH_OFFSET,
            launch_speed: LAUNCH_SPEED,
            gravity: GRAVITY,
            wind_scale: WIND_SCALE,
            cull_margin: CULL_MARGIN,
            max_frame_dt: MAX_FRAME_DT,
            aim_key_rate: AIM_KEY_RATE,
            hit_radius_scale: HIT_RADIUS_SCALE,
            layout: TargetLayout::Coins,
            coins: vec![
                CoinSpec { points: 10, radius: 18.0, core: 11.0 },
                CoinSpec { points: 25, radius: 19.0, core: 12.0 },
                CoinSpec { points: 50, radius: 20.0, core: 13.0 },
            ],
            hazard_radius: (16.0, 22.0),
            board_size: Vec2::new(210.0, 52.0),
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document. Missing fields use defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Same as `from_json`, but logs and falls back to defaults on error
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(t) => t,
            Err(e) => {
                log::warn!("{}, using default tuning", e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if self.arena_width <= 0.0 || self.arena_height <= 0.0 {
            return Err(TuningError::Invalid("arena size must be positive".into()));
        }
        if self.playfield.width() <= 0.0 || self.playfield.height() <= 0.0 {
            return Err(TuningError::Invalid("playfield is empty".into()));
        }
        if self.launch_speed <= 0.0 {
            return Err(TuningError::Invalid("launch speed must be positive".into()));
        }
        if self.max_frame_dt <= 0.0 {
            return Err(TuningError::Invalid("max frame dt must be positive".into()));
        }
        if !(self.hit_radius_scale > 0.0 && self.hit_radius_scale <= 1.0) {
            return Err(TuningError::Invalid(format!(
                "hit radius scale {} outside (0, 1]",
                self.hit_radius_scale
            )));
        }
        if self.coins.is_empty() {
            return Err(TuningError::Invalid("at least one coin spec required".into()));
        }
        for coin in &self.coins {
            if coin.core <= 0.0 || coin.core >= coin.radius * self.hit_radius_scale {
                return Err(TuningError::Invalid(format!(
                    "coin core {} must be inside hit radius {}",
                    coin.core,
                    coin.radius * self.hit_radius_scale
                )));
            }
        }
        let (lo, hi) = self.hazard_radius;
        if lo <= 0.0 || hi < lo {
            return Err(TuningError::Invalid("bad hazard radius range".into()));
        }
        Ok(())
    }

    /// Where a freshly fired arrow starts
    pub fn launch_origin(&self) -> Vec2 {
        self.player_pos - Vec2::new(0.0, self.launch_offset)
    }
}
