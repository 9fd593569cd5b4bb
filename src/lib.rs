//! XGP Archery - A coin-shooting archery arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (aim, projectile physics, collisions, round state)
//! - `tuning`: Data-driven physics and layout constants
//! - `settings`: Player preferences persisted in LocalStorage
//! - `best`: Best-score store boundary
//! - `session`: Frame driver tying clock, input, simulation and effects together

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod best;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use best::{BestScore, BestScoreStore, MemoryStore};
pub use session::Session;
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Canvas dimensions
    pub const ARENA_WIDTH: f32 = 720.0;
    pub const ARENA_HEIGHT: f32 = 960.0;

    /// Player anchor sits this far above the bottom edge
    pub const PLAYER_BASELINE: f32 = 96.0;
    /// Arrows leave the bow this far above the anchor
    pub const LAUNCH_OFFSET: f32 = 18.0;

    /// Fixed launch power (no charge-up)
    pub const LAUNCH_SPEED: f32 = 1500.0;
    /// Downward acceleration on arrows (pixels/s²)
    pub const GRAVITY: f32 = 780.0;
    /// Wind strength is scaled by this before being applied as acceleration
    pub const WIND_SCALE: f32 = 35.0;
    /// Arrows are culled this far beyond any canvas edge
    pub const CULL_MARGIN: f32 = 80.0;

    /// Largest step the frame clock will hand out (seconds)
    pub const MAX_FRAME_DT: f32 = 0.034;

    /// Aim limits: upper half-plane minus near-horizontal shots
    pub const AIM_MIN: f32 = -std::f32::consts::PI + 0.25;
    pub const AIM_MAX: f32 = -0.25;
    /// Keyboard aim rate (radians per second)
    pub const AIM_KEY_RATE: f32 = 1.7;

    /// Collision radii are shrunk by this factor
    pub const HIT_RADIUS_SCALE: f32 = 0.95;
}

/// Clamp an aim angle into the legal firing arc
#[inline]
pub fn clamp_aim(angle: f32) -> f32 {
    if angle.is_nan() {
        return -std::f32::consts::FRAC_PI_2;
    }
    angle.clamp(consts::AIM_MIN, consts::AIM_MAX)
}

/// Unit direction for an angle (screen space, y down)
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
