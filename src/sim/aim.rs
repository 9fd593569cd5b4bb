//! Bow aiming from pointer and keyboard
//!
//! Both sources write the same angle (last writer wins) and the result is
//! always clamped to the legal arc `[AIM_MIN, AIM_MAX]`.

use glam::Vec2;

use crate::clamp_aim;

/// Current aim direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aim {
    /// Radians from +x, negative is up (screen space)
    pub angle: f32,
}

impl Default for Aim {
    fn default() -> Self {
        Self {
            angle: -std::f32::consts::FRAC_PI_2,
        }
    }
}

impl Aim {
    /// Point at a pointer position. Ignored when the pointer is below the player.
    /// Returns whether the angle was updated.
    pub fn point_at(&mut self, player: Vec2, pointer: Vec2) -> bool {
        let d = pointer - player;
        if d.y > 0.0 {
            return false;
        }
        // -0.0 keeps a level pointer on the upper half-plane (atan2 gives -PI, not PI)
        self.angle = clamp_aim((-d.y.abs()).atan2(d.x));
        true
    }

    /// Apply held left/right keys for `dt` seconds at `rate` rad/s
    pub fn steer(&mut self, left: bool, right: bool, rate: f32, dt: f32) {
        if left {
            self.angle -= rate * dt;
        }
        if right {
            self.angle += rate * dt;
        }
        self.angle = clamp_aim(self.angle);
    }

    /// Set a raw angle (clamped)
    pub fn set(&mut self, angle: f32) {
        self.angle = clamp_aim(angle);
    }
}
