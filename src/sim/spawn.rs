//! Entity spawning and difficulty scaling
//!
//! Difficulty is a function of elapsed time only: shadows arrive more often
//! and move faster the longer a run lasts.

use glam::Vec2;
use rand::Rng;

use super::state::{GameState, Shadow, Spark};
use crate::consts::*;

/// Viewport edge a shadow enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnEdge {
    Top,
    Right,
    Bottom,
    Left,
}

impl SpawnEdge {
    fn from_index(index: u32) -> Self {
        match index % 4 {
            0 => SpawnEdge::Top,
            1 => SpawnEdge::Right,
            2 => SpawnEdge::Bottom,
            _ => SpawnEdge::Left,
        }
    }
}

/// Delay before the next spark
pub fn spark_interval(rng: &mut impl Rng) -> f32 {
    SPARK_MIN_INTERVAL + rng.random::<f32>() * SPARK_INTERVAL_RANGE
}

/// Deterministic part of the shadow spawn interval, floored
pub fn shadow_pace(elapsed: f32) -> f32 {
    (SHADOW_INTERVAL_START - elapsed * SHADOW_INTERVAL_DECAY).max(SHADOW_INTERVAL_FLOOR)
}

/// Delay before the next shadow
pub fn shadow_interval(elapsed: f32, rng: &mut impl Rng) -> f32 {
    shadow_pace(elapsed) + rng.random::<f32>() * SHADOW_INTERVAL_JITTER
}

/// Baseline shadow speed; the time-based part is capped
pub fn shadow_base_speed(elapsed: f32) -> f32 {
    SHADOW_BASE_SPEED + (elapsed * SHADOW_SPEED_GROWTH).min(SHADOW_SPEED_GROWTH_CAP)
}

/// Drop a spark somewhere inside the viewport, away from the edges
pub fn spawn_spark(state: &mut GameState) {
    let vp = state.viewport;
    let rng = &mut state.rng;
    let margin = SPARK_SPAWN_MARGIN;
    let x = margin + rng.random::<f32>() * (vp.width - margin * 2.0);
    let y = margin + rng.random::<f32>() * (vp.height - margin * 2.0);
    let radius = SPARK_MIN_RADIUS + rng.random::<f32>() * SPARK_RADIUS_RANGE;
    let phase = rng.random::<f32>() * std::f32::consts::TAU;

    state.sparks.push(Spark {
        pos: Vec2::new(x, y),
        radius,
        phase,
    });
}

/// Spawn a shadow just off one edge, aimed at the player's current position
pub fn spawn_shadow(state: &mut GameState) {
    let vp = state.viewport;
    let margin = SHADOW_SPAWN_MARGIN;
    let target = state.player.pos;
    let base = shadow_base_speed(state.elapsed);
    let rng = &mut state.rng;

    let edge = SpawnEdge::from_index(rng.random_range(0..4));
    let pos = match edge {
        SpawnEdge::Top => Vec2::new(rng.random::<f32>() * vp.width, -margin),
        SpawnEdge::Right => Vec2::new(vp.width + margin, rng.random::<f32>() * vp.height),
        SpawnEdge::Bottom => Vec2::new(rng.random::<f32>() * vp.width, vp.height + margin),
        SpawnEdge::Left => Vec2::new(-margin, rng.random::<f32>() * vp.height),
    };

    let speed = base + rng.random::<f32>() * SHADOW_SPEED_JITTER;
    let to_target = target - pos;
    let angle = to_target.y.atan2(to_target.x);
    let radius = SHADOW_MIN_RADIUS + rng.random::<f32>() * SHADOW_RADIUS_RANGE;
    let wobble = rng.random::<f32>() * std::f32::consts::TAU;

    state.shadows.push(Shadow {
        pos,
        vel: Vec2::from_angle(angle) * speed,
        radius,
        wobble,
    });
}
