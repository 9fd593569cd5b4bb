//! Idle/demo mode: the sim picks its own shots
//!
//! Leads moving coins by the arrow's rough flight time, compensates for
//! gravity drop, and refuses any line of fire that passes near a hazard.

use glam::Vec2;

use super::state::GameState;
use crate::consts::{AIM_MAX, AIM_MIN};

/// Extra clearance kept between the line of fire and a hazard's edge
const HAZARD_CLEARANCE: f32 = 14.0;

/// Pick an aim angle for the next shot, or `None` if nothing is worth shooting
/// (bow cooling down, or no safe target).
pub fn plan_shot(state: &GameState) -> Option<f32> {
    if state.cooldown > 0.0 {
        return None;
    }

    let origin = state.tuning.launch_origin();
    let speed = state.tuning.launch_speed;
    let gravity = state.tuning.gravity;
    let wind = state.profile.wind * state.tuning.wind_scale;

    state
        .targets
        .iter()
        .filter_map(|t| {
            let t_flight = origin.distance(t.pos) / speed;
            let lead = t.pos + t.vel * t_flight;
            // Aim high/upwind enough to cancel drift over the flight
            let drift = Vec2::new(wind, gravity) * (0.5 * t_flight * t_flight);
            let aim_point = lead - drift;
            let d = aim_point - origin;
            if d.y >= 0.0 {
                return None;
            }
            let angle = d.y.atan2(d.x);
            if !(AIM_MIN..=AIM_MAX).contains(&angle) {
                return None;
            }
            let blocked = state.hazards.iter().any(|h| {
                segment_distance(origin, lead, h.pos) <= h.radius + HAZARD_CLEARANCE
            });
            if blocked {
                return None;
            }
            Some((origin.distance_squared(lead), angle))
        })
        .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(_, angle)| angle)
}

/// Distance from `p` to the segment `a`-`b`
fn segment_distance(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-4 {
        return a.distance(p);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (a + ab * t).distance(p)
}
