//! Gameplay events emitted for audio/particle consumers
//!
//! The simulation never waits on consumers; events are queued on the state
//! and drained into an [`EffectsSink`] after each tick.

use glam::Vec2;
use serde::Serialize;

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameOverCause {
    Time,
    Hazard,
}

/// Discrete event produced by a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GameEvent {
    /// Arrow fired
    Shoot { pos: Vec2 },
    /// Arrow struck a target
    Hit { pos: Vec2, critical: bool, points: u64 },
    /// Arrow struck a hazard
    Explosion { pos: Vec2 },
    /// Round clock ran out
    TimeUp,
    /// Best score improved
    NewBest { best: u64 },
    /// Round ended
    RoundOver { cause: GameOverCause, score: u64 },
}

/// Consumer of gameplay events (audio, particles, HUD flashes)
pub trait EffectsSink {
    fn emit(&mut self, event: GameEvent);
}

impl EffectsSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

/// Sink that only logs events
#[derive(Debug, Default)]
pub struct LogSink;

impl EffectsSink for LogSink {
    fn emit(&mut self, event: GameEvent) {
        match event {
            GameEvent::Hit { critical: true, points, .. } => log::debug!("Critical! +{}", points),
            GameEvent::Hit { points, .. } => log::debug!("Hit +{}", points),
            GameEvent::RoundOver { cause, score } => {
                log::info!("Round over ({:?}), score {}", cause, score)
            }
            other => log::trace!("{:?}", other),
        }
    }
}
