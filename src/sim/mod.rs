//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (pool order)
//! - No rendering, audio or platform dependencies

pub mod aim;
pub mod autoplay;
pub mod clock;
pub mod collision;
pub mod difficulty;
pub mod events;
pub mod physics;
pub mod state;
pub mod tick;

pub use aim::Aim;
pub use clock::FrameClock;
pub use collision::{ArrowHit, find_hit, score_delta};
pub use difficulty::{Difficulty, DifficultyProfile};
pub use events::{EffectsSink, GameEvent, GameOverCause, LogSink};
pub use state::{
    BOARD_EDGE_PAD, GameState, Hazard, Playfield, Projectile, RoundPhase, Snapshot, Target,
    TargetKind,
};
pub use tick::{TickInput, fire, reset_round, start_round, tick};
