//! Motion integration
//!
//! Explicit Euler with the frame's (clamped) dt. No substepping.

use glam::Vec2;

use super::state::{Playfield, Projectile};

/// Advance an arrow under gravity and wind
#[inline]
pub fn integrate_projectile(p: &mut Projectile, gravity: f32, wind_accel: f32, dt: f32) {
    p.vel.y += gravity * dt;
    p.vel.x += wind_accel * dt;
    p.pos += p.vel * dt;
    p.rot = p.vel.y.atan2(p.vel.x);
}

/// True once `pos` is more than `margin` past any edge of a `width` x `height` canvas
#[inline]
pub fn out_of_bounds(pos: Vec2, width: f32, height: f32, margin: f32) -> bool {
    pos.x < -margin || pos.x > width + margin || pos.y < -margin || pos.y > height + margin
}

/// Move a body linearly and reflect it off the playfield edges.
///
/// `inset` is the per-axis distance from the edge at which the body turns
/// around (its radius, or half-width plus padding for boards).
pub fn advance_bouncing(pos: &mut Vec2, vel: &mut Vec2, inset: Vec2, field: &Playfield, dt: f32) {
    *pos += *vel * dt;

    let (min_x, max_x) = axis_bounds(field.left, field.right, inset.x);
    let (min_y, max_y) = axis_bounds(field.top, field.bottom, inset.y);

    if pos.x < min_x {
        pos.x = min_x;
        vel.x = -vel.x;
    } else if pos.x > max_x {
        pos.x = max_x;
        vel.x = -vel.x;
    }

    if pos.y < min_y {
        pos.y = min_y;
        vel.y = -vel.y;
    } else if pos.y > max_y {
        pos.y = max_y;
        vel.y = -vel.y;
    }
}

/// Inset bounds for one axis; collapses to the midpoint if the body is wider than the field
fn axis_bounds(lo: f32, hi: f32, inset: f32) -> (f32, f32) {
    let min = lo + inset;
    let max = hi - inset;
    if min > max {
        let mid = (lo + hi) * 0.5;
        (mid, mid)
    } else {
        (min, max)
    }
}

/// Advance a cosmetic phase in [0, 1)
#[inline]
pub fn advance_phase(phase: f32, rate: f32, dt: f32) -> f32 {
    (phase + rate * dt).rem_euclid(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const FIELD: Playfield = Playfield {
        left: 0.0,
        top: 0.0,
        right: 400.0,
        bottom: 300.0,
    };

    #[test]
    fn test_straight_up_matches_closed_form() {
        let y0 = 864.0;
        let mut p = Projectile::new(1, Vec2::new(360.0, y0), -PI / 2.0, 1500.0);
        // Small steps so Euler converges on the analytic answer
        let steps = 1_000;
        let dt = 1.0 / steps as f32;
        for _ in 0..steps {
            integrate_projectile(&mut p, 780.0, 0.0, dt);
        }
        assert!((p.vel.y - (-720.0)).abs() < 0.5);
        let displacement = p.pos.y - y0;
        assert!((displacement - (-1110.0)).abs() < 1.0, "got {}", displacement);
        assert!((p.pos.x - 360.0).abs() < 0.01);
    }

    #[test]
    fn test_single_step_euler() {
        let mut p = Projectile::new(1, Vec2::ZERO, -PI / 2.0, 1500.0);
        integrate_projectile(&mut p, 780.0, 0.0, 0.01);
        assert!((p.vel.y - (-1492.2)).abs() < 0.01);
        assert!((p.pos.y - (-14.922)).abs() < 0.001);
    }

    #[test]
    fn test_wind_pushes_sideways() {
        let mut p = Projectile::new(1, Vec2::ZERO, -PI / 2.0, 1500.0);
        integrate_projectile(&mut p, 780.0, 1.6 * 35.0, 0.02);
        assert!(p.vel.x > 0.0);
        assert!(p.pos.x > 0.0);
        // Orientation follows velocity
        assert!((p.rot - p.vel.y.atan2(p.vel.x)).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_bounds_margin() {
        assert!(!out_of_bounds(Vec2::new(-79.0, 10.0), 720.0, 960.0, 80.0));
        assert!(out_of_bounds(Vec2::new(-81.0, 10.0), 720.0, 960.0, 80.0));
        assert!(out_of_bounds(Vec2::new(10.0, 1041.0), 720.0, 960.0, 80.0));
        assert!(out_of_bounds(Vec2::new(10.0, -81.0), 720.0, 960.0, 80.0));
        assert!(out_of_bounds(Vec2::new(801.0, 10.0), 720.0, 960.0, 80.0));
    }

    #[test]
    fn test_bounce_off_left_edge() {
        let radius = 18.0;
        let mut pos = Vec2::new(20.0, 150.0);
        let mut vel = Vec2::new(-300.0, 0.0);
        advance_bouncing(&mut pos, &mut vel, Vec2::splat(radius), &FIELD, 0.02);
        assert_eq!(pos.x, FIELD.left + radius);
        assert!(vel.x > 0.0);
    }

    #[test]
    fn test_bounce_off_bottom_edge() {
        let mut pos = Vec2::new(200.0, 290.0);
        let mut vel = Vec2::new(0.0, 500.0);
        advance_bouncing(&mut pos, &mut vel, Vec2::splat(10.0), &FIELD, 0.02);
        assert_eq!(pos.y, 290.0);
        assert_eq!(vel.y, -500.0);
    }

    #[test]
    fn test_no_bounce_inside() {
        let mut pos = Vec2::new(200.0, 150.0);
        let mut vel = Vec2::new(100.0, -100.0);
        advance_bouncing(&mut pos, &mut vel, Vec2::splat(10.0), &FIELD, 0.1);
        assert_eq!(pos, Vec2::new(210.0, 140.0));
        assert_eq!(vel, Vec2::new(100.0, -100.0));
    }

    #[test]
    fn test_phase_wraps() {
        assert!((advance_phase(0.9, 0.7, 0.5) - 0.25).abs() < 1e-5);
        assert!(advance_phase(0.0, 0.7, 0.0) == 0.0);
    }
}
