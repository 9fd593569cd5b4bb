//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in [`GameState`]; renderers get a
//! read-only [`Snapshot`].

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::aim::Aim;
use super::difficulty::{Difficulty, DifficultyProfile};
use super::events::{GameEvent, GameOverCause};
use crate::tuning::Tuning;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoundPhase {
    /// Waiting for a start command
    Idle,
    /// Active gameplay
    Running,
    /// Round ended; waiting for reset
    GameOver(GameOverCause),
}

/// Axis-aligned rectangle that coins and hazards bounce inside
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Playfield {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }
}

/// An arrow in flight
#[derive(Debug, Clone, Serialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing angle, follows velocity
    pub rot: f32,
    pub alive: bool,
}

impl Projectile {
    pub fn new(id: u32, pos: Vec2, angle: f32, speed: f32) -> Self {
        Self {
            id,
            pos,
            vel: crate::direction(angle) * speed,
            rot: angle,
            alive: true,
        }
    }
}

/// Reward target shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum TargetKind {
    /// Free-flying coin, respawned elsewhere when hit
    Coin,
    /// Sliding board with a coin painted in the middle
    Board { half_extents: Vec2 },
}

/// A reward target
#[derive(Debug, Clone, Serialize)]
pub struct Target {
    pub id: u32,
    pub kind: TargetKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Critical zone radius
    pub core: f32,
    pub points: u32,
    /// Cosmetic spin phase in [0, 1)
    pub spin: f32,
    /// Hit flash intensity, decays to 0
    pub flash: f32,
}

impl Target {
    /// Distance from the playfield edge at which this target bounces, per axis
    pub fn bounce_inset(&self) -> Vec2 {
        match self.kind {
            TargetKind::Coin => Vec2::splat(self.radius),
            TargetKind::Board { half_extents } => {
                Vec2::new(half_extents.x + BOARD_EDGE_PAD, half_extents.y)
            }
        }
    }
}

/// Extra gap kept between a board and the playfield edge
pub const BOARD_EDGE_PAD: f32 = 16.0;

/// An obstacle that ends the round when struck
#[derive(Debug, Clone, Serialize)]
pub struct Hazard {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Cosmetic blink phase in [0, 1)
    pub blink: f32,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Difficulty applied at the next round start
    pub difficulty: Difficulty,
    /// Profile of the current (or last) round
    pub profile: DifficultyProfile,
    pub phase: RoundPhase,
    /// Seconds since round start
    pub elapsed: f32,
    /// Seconds left in the round
    pub remaining: f32,
    pub score: u64,
    /// Best score seen across rounds
    pub best: u64,
    /// Seconds until the bow can fire again
    pub cooldown: f32,
    pub player_pos: Vec2,
    pub aim: Aim,
    pub projectiles: Vec<Projectile>,
    pub targets: Vec<Target>,
    pub hazards: Vec<Hazard>,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new idle game with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let difficulty = Difficulty::default();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player_pos: tuning.player_pos,
            tuning,
            difficulty,
            profile: *difficulty.profile(),
            phase: RoundPhase::Idle,
            elapsed: 0.0,
            remaining: 0.0,
            score: 0,
            best: 0,
            cooldown: 0.0,
            aim: Aim::default(),
            projectiles: Vec::new(),
            targets: Vec::new(),
            hazards: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    pub fn is_running(&self) -> bool {
        self.phase == RoundPhase::Running
    }

    /// Select the difficulty for the next round. A running round keeps its profile.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        if !self.is_running() {
            self.profile = *difficulty.profile();
        }
    }

    /// Raise the best score if the current score beats it
    pub fn update_best(&mut self) {
        if self.score > self.best {
            self.best = self.score;
            self.events.push(GameEvent::NewBest { best: self.best });
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            difficulty: self.difficulty,
            elapsed: self.elapsed,
            remaining: self.remaining,
            score: self.score,
            best: self.best,
            cooldown: self.cooldown,
            player_pos: self.player_pos,
            aim_angle: self.aim.angle,
            projectiles: &self.projectiles,
            targets: &self.targets,
            hazards: &self.hazards,
        }
    }
}

/// Read-only view handed to renderers
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub phase: RoundPhase,
    pub difficulty: Difficulty,
    pub elapsed: f32,
    pub remaining: f32,
    pub score: u64,
    pub best: u64,
    pub cooldown: f32,
    pub player_pos: Vec2,
    pub aim_angle: f32,
    pub projectiles: &'a [Projectile],
    pub targets: &'a [Target],
    pub hazards: &'a [Hazard],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle() {
        let state = GameState::new(1);
        assert_eq!(state.phase, RoundPhase::Idle);
        assert_eq!(state.score, 0);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_set_difficulty_while_idle_updates_profile() {
        let mut state = GameState::new(1);
        state.set_difficulty(Difficulty::Hard);
        assert_eq!(state.profile, *Difficulty::Hard.profile());
    }

    #[test]
    fn test_set_difficulty_while_running_is_deferred() {
        let mut state = GameState::new(1);
        state.phase = RoundPhase::Running;
        state.set_difficulty(Difficulty::Hard);
        assert_eq!(state.difficulty, Difficulty::Hard);
        assert_eq!(state.profile, *Difficulty::Easy.profile());
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(7);
        let json = serde_json::to_string(&state.snapshot()).unwrap();
        assert!(json.contains("\"phase\":\"Idle\""));
    }
}
