//! Arrow hit detection and scoring
//!
//! Arrows are points. Coins and hazards are circles tested with a slightly
//! shrunk radius; boards are axis-aligned boxes. Critical hits land within a
//! target's inner core.

use glam::Vec2;

use super::state::{Hazard, Target, TargetKind};

/// Outcome of testing one arrow against the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArrowHit {
    /// Index into the hazard pool
    Hazard(usize),
    /// Index into the target pool
    Target { index: usize, critical: bool },
}

/// Point inside circle, radius scaled by `scale`
#[inline]
pub fn circle_contains(center: Vec2, radius: f32, scale: f32, point: Vec2) -> bool {
    let r = radius * scale;
    center.distance_squared(point) <= r * r
}

/// Point inside an axis-aligned box (edges inclusive)
#[inline]
pub fn aabb_contains(center: Vec2, half_extents: Vec2, point: Vec2) -> bool {
    let d = (point - center).abs();
    d.x <= half_extents.x && d.y <= half_extents.y
}

/// Whether a hit at `point` lands in the critical core
#[inline]
pub fn is_critical(center: Vec2, core: f32, point: Vec2) -> bool {
    center.distance(point) <= core
}

/// Points awarded for a hit: doubled on critical, then scaled by the difficulty bonus
pub fn score_delta(points: u32, critical: bool, bonus: f32) -> u64 {
    let base = if critical { points * 2 } else { points };
    let scaled = (base as f32 * bonus).round();
    if scaled.is_finite() && scaled > 0.0 {
        scaled as u64
    } else {
        0
    }
}

/// Whether an arrow at `point` strikes `target`
pub fn target_contains(target: &Target, scale: f32, point: Vec2) -> bool {
    match target.kind {
        TargetKind::Coin => circle_contains(target.pos, target.radius, scale, point),
        TargetKind::Board { half_extents } => aabb_contains(target.pos, half_extents, point),
    }
}

/// Find what an arrow at `point` hits, if anything.
///
/// Hazards are checked first across the whole pool; targets only if no hazard
/// matched. The first match wins.
pub fn find_hit(point: Vec2, hazards: &[Hazard], targets: &[Target], scale: f32) -> Option<ArrowHit> {
    if let Some(i) = hazards
        .iter()
        .position(|h| circle_contains(h.pos, h.radius, scale, point))
    {
        return Some(ArrowHit::Hazard(i));
    }

    targets
        .iter()
        .position(|t| target_contains(t, scale, point))
        .map(|index| ArrowHit::Target {
            index,
            critical: is_critical(targets[index].pos, targets[index].core, point),
        })
}
