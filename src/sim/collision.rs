//! Collision detection for circular entities
//!
//! Everything in Flashburst is a circle, so collisions reduce to center
//! distance checks. Overlap is boundary-exclusive: touching circles do not
//! collide.

use glam::Vec2;

/// Signed distance from `p` to a circle's edge (negative inside)
#[inline]
pub fn sd_circle(p: Vec2, center: Vec2, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Two circles overlap iff the distance between centers is less than the sum of radii
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    sd_circle(b, a, a_radius) < b_radius
}

/// True when `point` lies strictly within `radius` of `center`
#[inline]
pub fn within_radius(center: Vec2, point: Vec2, radius: f32) -> bool {
    sd_circle(point, center, radius) < 0.0
}

/// Clamp a position into the rectangle `[min, max]`
///
/// Handles degenerate rectangles (min > max) by pinning to `min`, matching a
/// max-then-min clamp rather than panicking like `f32::clamp` would.
#[inline]
pub fn clamp_to_rect(pos: Vec2, min: Vec2, max: Vec2) -> Vec2 {
    Vec2::new(
        pos.x.min(max.x).max(min.x),
        pos.y.min(max.y).max(min.y),
    )
}
