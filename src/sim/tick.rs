//! Per-frame simulation step
//!
//! Applies this frame's commands, then advances timers, spawns, movement and
//! collisions in a fixed order so collisions are always checked against the
//! positions computed in the same frame.

use glam::Vec2;

use super::collision::{circles_overlap, clamp_to_rect, within_radius};
use super::spawn::{shadow_interval, spark_interval, spawn_shadow, spawn_spark};
use super::state::{FlashWave, GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input for a single tick, sampled at the frame boundary
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held movement axes, each component in {-1, 0, 1}
    pub movement: Vec2,
    /// Flash pulse (one-shot)
    pub flash: bool,
    /// Start from Idle, or restart after game over (one-shot)
    pub confirm: bool,
    /// Restart, honoured only after game over (one-shot)
    pub restart: bool,
}

/// Clamp a raw frame delta into `[0, MAX_FRAME_DT]`
#[inline]
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_nan() {
        return 0.0;
    }
    dt.clamp(0.0, MAX_FRAME_DT)
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let dt = clamp_dt(dt);
    state.clock += dt;

    apply_commands(state, input);

    if state.phase != GamePhase::Running {
        // Let the last flash finish animating
        if state.flash_alpha > 0.0 {
            state.flash_alpha = (state.flash_alpha - dt * FLASH_DECAY_STOPPED).max(0.0);
        }
        advance_flash_wave(state, dt);
        return;
    }

    state.elapsed += dt;
    decay_timers(state, dt);
    run_spawners(state, dt);
    move_player(state, input.movement, dt);
    move_shadows(state, dt);
    cull_shadows(state);
    collect_sparks(state, dt);
    resolve_shadow_hits(state);
    advance_flash_wave(state, dt);
}

/// Fire the flash pulse. Returns false (and changes nothing) outside a run,
/// without charge, or while the cooldown is active.
pub fn trigger_flash(state: &mut GameState) -> bool {
    if !state.is_running() || state.charge == 0 || state.flash_cooldown > 0.0 {
        return false;
    }

    let radius = FLASH_BASE_RADIUS + state.charge as f32 * FLASH_RADIUS_PER_CHARGE;
    state.charge -= 1;
    state.flash_alpha = 1.0;
    state.flash_rise = FLASH_RISE_SECS;
    state.flash_cooldown = FLASH_COOLDOWN_SECS;

    let origin = state.player.pos;
    state.flash_wave = Some(FlashWave::new(origin, radius));

    // Instant sweep at trigger time, not synced to the ring animation
    let before = state.shadows.len();
    state
        .shadows
        .retain(|shadow| !within_radius(origin, shadow.pos, radius));
    let destroyed = (before - state.shadows.len()) as u32;
    state.score += destroyed as u64 * SHADOW_BURST_SCORE;

    state.events.push(GameEvent::FlashTriggered { radius, destroyed });
    true
}

fn apply_commands(state: &mut GameState, input: &TickInput) {
    if input.confirm {
        match state.phase {
            GamePhase::Idle => {
                state.start();
            }
            GamePhase::Over => state.restart(),
            GamePhase::Running => {}
        }
    } else if input.restart && state.phase == GamePhase::Over {
        state.restart();
    }

    if input.flash {
        trigger_flash(state);
    }
}

fn decay_timers(state: &mut GameState, dt: f32) {
    state.flash_cooldown = (state.flash_cooldown - dt).max(0.0);
    state.invulnerable = (state.invulnerable - dt).max(0.0);

    if state.flash_rise > 0.0 {
        state.flash_rise = (state.flash_rise - dt).max(0.0);
        state.flash_alpha = (state.flash_alpha + dt * FLASH_RISE_RATE).min(1.0);
    }
    if state.flash_alpha > 0.0 {
        state.flash_alpha = (state.flash_alpha - dt * FLASH_DECAY_RUNNING).max(0.0);
    }
}

fn run_spawners(state: &mut GameState, dt: f32) {
    state.spark_timer -= dt;
    if state.spark_timer <= 0.0 {
        spawn_spark(state);
        state.spark_timer = spark_interval(&mut state.rng);
    }

    state.shadow_timer -= dt;
    if state.shadow_timer <= 0.0 {
        spawn_shadow(state);
        state.shadow_timer = shadow_interval(state.elapsed, &mut state.rng);
    }
}

/// Unit direction from held axes; zero input stays zero
fn movement_direction(axes: Vec2) -> Vec2 {
    let axes = axes.clamp(Vec2::NEG_ONE, Vec2::ONE);
    let len = axes.length();
    if len == 0.0 {
        return Vec2::ZERO;
    }
    axes / len
}

fn move_player(state: &mut GameState, axes: Vec2, dt: f32) {
    let player = &mut state.player;
    player.vel = movement_direction(axes) * player.speed;
    let (min, max) = state.viewport.inset_bounds(player.radius);
    player.pos = clamp_to_rect(player.pos + player.vel * dt, min, max);
}

fn move_shadows(state: &mut GameState, dt: f32) {
    for shadow in &mut state.shadows {
        shadow.wobble += dt * SHADOW_WOBBLE_RATE;
        let weave = Vec2::new(shadow.wobble.sin(), shadow.wobble.cos()) * SHADOW_WOBBLE_AMPLITUDE;
        shadow.pos += (shadow.vel + weave) * dt;
    }
}

fn cull_shadows(state: &mut GameState) {
    let viewport = state.viewport;
    let before = state.shadows.len();
    state
        .shadows
        .retain(|shadow| viewport.contains_with_margin(shadow.pos, SHADOW_CULL_MARGIN));
    let count = before - state.shadows.len();
    if count > 0 {
        state.events.push(GameEvent::ShadowsDespawned { count });
    }
}

fn collect_sparks(state: &mut GameState, dt: f32) {
    let player_pos = state.player.pos;
    let player_radius = state.player.radius;
    let mut collected = 0usize;

    state.sparks.retain_mut(|spark| {
        spark.phase += dt * SPARK_PULSE_RATE;
        let hit = circles_overlap(player_pos, player_radius, spark.pos, spark.radius);
        if hit {
            collected += 1;
        }
        !hit
    });

    for _ in 0..collected {
        state.score += SPARK_SCORE;
        state.charge = (state.charge + 1).min(state.max_charge);
        state.flash_alpha = state.flash_alpha.max(PICKUP_FLASH_FLOOR);
        state.events.push(GameEvent::SparkCollected {
            score: state.score,
            charge: state.charge,
        });
    }
}

fn resolve_shadow_hits(state: &mut GameState) {
    let player_pos = state.player.pos;
    let player_radius = state.player.radius;

    // Reverse order so removal never shifts an unvisited shadow
    for i in (0..state.shadows.len()).rev() {
        let shadow = &state.shadows[i];
        if !circles_overlap(player_pos, player_radius, shadow.pos, shadow.radius) {
            continue;
        }
        if state.invulnerable > 0.0 {
            continue;
        }

        state.shadows.remove(i);
        state.health = state.health.saturating_sub(1);
        state.invulnerable = INVULNERABILITY_SECS;
        state.flash_alpha = state.flash_alpha.max(HIT_FLASH_FLOOR);
        state.events.push(GameEvent::PlayerHit {
            health: state.health,
        });

        if state.health == 0 && state.phase == GamePhase::Running {
            state.game_over();
        }
    }
}

fn advance_flash_wave(state: &mut GameState, dt: f32) {
    if let Some(wave) = state.flash_wave.as_mut() {
        if !wave.advance(dt) {
            state.flash_wave = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Shadow, Spark, Viewport};

    fn running_state() -> GameState {
        let mut state = GameState::new(12345, Viewport::new(800.0, 600.0));
        state.start();
        // Keep spawners quiet unless a test wants them
        state.spark_timer = 100.0;
        state.shadow_timer = 100.0;
        state.drain_events();
        state
    }

    fn shadow_at(pos: Vec2) -> Shadow {
        Shadow {
            pos,
            vel: Vec2::ZERO,
            radius: 12.0,
            wobble: 0.0,
        }
    }

    #[test]
    fn test_tick_idle_to_running() {
        let mut state = GameState::new(12345, Viewport::new(800.0, 600.0));
        assert_eq!(state.phase, GamePhase::Idle);

        // Tick without confirm - should stay Idle and not advance run time
        tick(&mut state, &TickInput::default(), 0.016);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.elapsed, 0.0);
        assert!(state.clock > 0.0);

        let input = TickInput {
            confirm: true,
            ..Default::default()
        };
        tick(&mut state, &input, 0.016);
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.elapsed > 0.0);
    }

    #[test]
    fn test_restart_key_only_after_game_over() {
        let mut state = running_state();
        state.score = 40;
        let input = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &input, 0.016);
        assert_eq!(state.score, 40);

        // Idle ignores R as well
        let mut idle = GameState::new(1, Viewport::new(800.0, 600.0));
        tick(&mut idle, &input, 0.016);
        assert_eq!(idle.phase, GamePhase::Idle);
    }

    #[test]
    fn test_confirm_ignored_while_running() {
        let mut state = running_state();
        state.score = 30;
        state.sparks.push(Spark {
            pos: Vec2::new(10.0, 10.0),
            radius: 6.0,
            phase: 0.0,
        });
        let input = TickInput {
            confirm: true,
            ..Default::default()
        };
        tick(&mut state, &input, 0.016);
        assert_eq!(state.score, 30);
        assert_eq!(state.sparks.len(), 1);
    }

    #[test]
    fn test_restart_during_over_resets_everything() {
        let mut state = running_state();
        state.score = 90;
        state.charge = 2;
        state.elapsed = 12.0;
        state.sparks.push(Spark {
            pos: Vec2::new(30.0, 30.0),
            radius: 6.0,
            phase: 0.0,
        });
        state.shadows.push(shadow_at(Vec2::new(700.0, 50.0)));
        state.health = 0;
        state.game_over();
        state.drain_events();

        let input = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &input, 0.0);

        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.charge, 0);
        assert_eq!(state.health, MAX_HEALTH);
        assert_eq!(state.elapsed, 0.0);
        assert!(state.sparks.is_empty());
        assert!(state.shadows.is_empty());
        assert_eq!(state.drain_events(), vec![GameEvent::Restarted]);
    }

    #[test]
    fn test_flash_without_charge_is_noop() {
        let mut state = running_state();
        state.shadows.push(shadow_at(state.player.pos + Vec2::new(30.0, 0.0)));

        assert!(!trigger_flash(&mut state));
        assert_eq!(state.charge, 0);
        assert!(state.flash_wave.is_none());
        assert_eq!(state.score, 0);
        assert_eq!(state.shadows.len(), 1);
    }

    #[test]
    fn test_flash_during_cooldown_is_noop() {
        let mut state = running_state();
        state.charge = 2;
        state.flash_cooldown = 0.2;
        assert!(!trigger_flash(&mut state));
        assert_eq!(state.charge, 2);
        assert!(state.flash_wave.is_none());
    }

    #[test]
    fn test_flash_sweeps_shadows_inside_radius() {
        let mut state = running_state();
        state.charge = 2;
        let origin = state.player.pos;
        state.shadows.push(shadow_at(origin + Vec2::new(50.0, 0.0)));
        state.shadows.push(shadow_at(origin + Vec2::new(0.0, 200.0)));
        state.shadows.push(shadow_at(origin + Vec2::new(-300.0, 0.0)));

        assert!(trigger_flash(&mut state));

        // R = 150 + 20 * 2 = 190: only the shadow at 50 is inside
        let wave = state.flash_wave.as_ref().unwrap();
        assert_eq!(wave.radius, 190.0);
        assert_eq!(wave.origin, origin);
        assert_eq!(state.shadows.len(), 2);
        assert_eq!(state.score, SHADOW_BURST_SCORE);
        assert_eq!(state.charge, 1);
        assert_eq!(state.flash_cooldown, FLASH_COOLDOWN_SECS);
        assert_eq!(state.flash_alpha, 1.0);
    }

    #[test]
    fn test_flash_input_ignored_when_not_running() {
        let mut state = GameState::new(1, Viewport::new(800.0, 600.0));
        state.charge = 1;
        let input = TickInput {
            flash: true,
            ..Default::default()
        };
        tick(&mut state, &input, 0.016);
        assert_eq!(state.charge, 1);
        assert!(state.flash_wave.is_none());
    }

    #[test]
    fn test_spark_pickup() {
        let mut state = running_state();
        let pos = state.player.pos + Vec2::new(10.0, 0.0);
        state.sparks.push(Spark {
            pos,
            radius: 6.0,
            phase: 0.0,
        });

        tick(&mut state, &TickInput::default(), 0.016);
        assert!(state.sparks.is_empty());
        assert_eq!(state.score, SPARK_SCORE);
        assert_eq!(state.charge, 1);
        assert!(state.flash_alpha >= PICKUP_FLASH_FLOOR - FLASH_DECAY_RUNNING * 0.016);
    }

    #[test]
    fn test_charge_caps_at_max() {
        let mut state = running_state();
        state.charge = MAX_CHARGE;
        let pos = state.player.pos;
        for offset in [-5.0, 0.0, 5.0] {
            state.sparks.push(Spark {
                pos: pos + Vec2::new(offset, 0.0),
                radius: 6.0,
                phase: 0.0,
            });
        }
        tick(&mut state, &TickInput::default(), 0.016);
        assert_eq!(state.charge, MAX_CHARGE);
        assert_eq!(state.score, SPARK_SCORE * 3);
    }

    #[test]
    fn test_many_pickups_in_one_frame_all_count() {
        let mut state = running_state();
        let pos = state.player.pos;
        for _ in 0..300 {
            state.sparks.push(Spark {
                pos,
                radius: 6.0,
                phase: 0.0,
            });
        }
        tick(&mut state, &TickInput::default(), 0.016);
        assert!(state.sparks.is_empty());
        assert_eq!(state.score, SPARK_SCORE * 300);
        assert_eq!(state.charge, MAX_CHARGE);
    }

    #[test]
    fn test_shadow_weaves_around_its_heading() {
        let mut state = running_state();
        state.shadows.push(Shadow {
            pos: Vec2::new(200.0, 200.0),
            vel: Vec2::new(50.0, 0.0),
            radius: 12.0,
            wobble: 0.0,
        });

        tick(&mut state, &TickInput::default(), 0.016);

        // Phase advances 2 rad/s; the weave adds 10 px/s along (sin, cos)
        let shadow = &state.shadows[0];
        assert!((shadow.wobble - 0.032).abs() < 1e-6);
        let expected = Vec2::new(
            200.0 + (50.0 + 10.0 * 0.032f32.sin()) * 0.016,
            200.0 + 10.0 * 0.032f32.cos() * 0.016,
        );
        assert!((shadow.pos - expected).length() < 1e-4);
        assert!((shadow.pos.x - 200.805).abs() < 1e-3);
        assert!((shadow.pos.y - 200.160).abs() < 1e-3);
    }

    #[test]
    fn test_shadow_hit_costs_health_and_grants_invulnerability() {
        let mut state = running_state();
        let pos = state.player.pos;
        state.shadows.push(shadow_at(pos + Vec2::new(5.0, 0.0)));
        state.shadows.push(shadow_at(pos - Vec2::new(5.0, 0.0)));

        tick(&mut state, &TickInput::default(), 0.016);

        // Second overlapping shadow is ignored while invulnerable
        assert_eq!(state.health, MAX_HEALTH - 1);
        assert_eq!(state.shadows.len(), 1);
        assert_eq!(state.invulnerable, INVULNERABILITY_SECS);
        assert!(state.flash_alpha > 0.5);
    }

    #[test]
    fn test_fatal_hit_ends_run_in_same_tick() {
        let mut state = running_state();
        state.health = 1;
        let pos = state.player.pos;
        state.shadows.push(shadow_at(pos));
        state.sparks.push(Spark {
            pos: Vec2::new(40.0, 40.0),
            radius: 6.0,
            phase: 0.0,
        });

        tick(&mut state, &TickInput::default(), 0.016);
        assert_eq!(state.phase, GamePhase::Over);
        assert_eq!(state.health, 0);
        assert!(state
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::GameOver { .. })));

        // Nothing moves, spawns or collides after game over
        state.shadow_timer = 0.0;
        state.spark_timer = 0.0;
        let elapsed = state.elapsed;
        let player = state.player.clone();
        let input = TickInput {
            movement: Vec2::X,
            ..Default::default()
        };
        for _ in 0..30 {
            tick(&mut state, &input, 0.016);
        }
        assert_eq!(state.elapsed, elapsed);
        assert_eq!(state.player, player);
        assert!(state.shadows.is_empty());
        assert_eq!(state.sparks.len(), 1);
    }

    #[test]
    fn test_flash_wave_finishes_after_game_over() {
        let mut state = running_state();
        state.charge = 1;
        assert!(trigger_flash(&mut state));
        state.health = 0;
        state.game_over();

        tick(&mut state, &TickInput::default(), 0.016);
        assert!(state.flash_wave.is_some());
        let alpha = state.flash_alpha;
        assert!(alpha < 1.0);

        for _ in 0..20 {
            tick(&mut state, &TickInput::default(), 0.016);
        }
        assert!(state.flash_wave.is_none());
        assert!(state.flash_alpha < alpha);
    }

    #[test]
    fn test_large_stall_is_clamped() {
        let mut state = running_state();
        let start = state.player.pos;
        let input = TickInput {
            movement: Vec2::X,
            ..Default::default()
        };
        tick(&mut state, &input, 0.5);

        assert!((state.elapsed - MAX_FRAME_DT).abs() < 1e-6);
        let moved = state.player.pos.x - start.x;
        assert!((moved - PLAYER_SPEED * MAX_FRAME_DT).abs() < 1e-3);
    }

    #[test]
    fn test_diagonal_is_not_faster() {
        let mut state = running_state();
        let start = state.player.pos;
        let input = TickInput {
            movement: Vec2::new(1.0, 1.0),
            ..Default::default()
        };
        tick(&mut state, &input, 0.02);
        let moved = state.player.pos.distance(start);
        assert!((moved - PLAYER_SPEED * 0.02).abs() < 1e-3);
        assert!((state.player.vel.length() - PLAYER_SPEED).abs() < 1e-3);
    }

    #[test]
    fn test_zero_movement_stays_put() {
        let mut state = running_state();
        let start = state.player.pos;
        tick(&mut state, &TickInput::default(), 0.02);
        assert_eq!(state.player.pos, start);
        assert_eq!(state.player.vel, Vec2::ZERO);
        assert!(state.player.vel.is_finite());
    }

    #[test]
    fn test_player_clamped_to_playfield() {
        let mut state = running_state();
        state.player.pos = Vec2::new(21.0, 21.0);
        let input = TickInput {
            movement: Vec2::new(-1.0, -1.0),
            ..Default::default()
        };
        tick(&mut state, &input, 0.033);
        let inset = PLAYER_RADIUS + PLAYER_EDGE_MARGIN;
        assert_eq!(state.player.pos, Vec2::splat(inset));
    }

    #[test]
    fn test_offscreen_shadows_despawn_without_score() {
        let mut state = running_state();
        state.shadows.push(Shadow {
            pos: Vec2::new(-79.0, 300.0),
            vel: Vec2::new(-200.0, 0.0),
            radius: 12.0,
            wobble: 0.0,
        });
        tick(&mut state, &TickInput::default(), 0.033);
        assert!(state.shadows.is_empty());
        assert_eq!(state.score, 0);
        assert!(state
            .drain_events()
            .contains(&GameEvent::ShadowsDespawned { count: 1 }));
    }

    #[test]
    fn test_spawners_fire_on_expiry() {
        let mut state = running_state();
        state.spark_timer = 0.01;
        state.shadow_timer = 0.01;
        tick(&mut state, &TickInput::default(), 0.016);
        // A spark may land on the player and be collected in the same tick
        assert!(state.sparks.len() == 1 || state.score == SPARK_SCORE);
        assert_eq!(state.shadows.len(), 1);
        assert!(state.spark_timer >= SPARK_MIN_INTERVAL);
        assert!(state.shadow_timer >= SHADOW_INTERVAL_START - 0.01);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999, Viewport::new(800.0, 600.0));
        let mut state2 = GameState::new(99999, Viewport::new(800.0, 600.0));

        let inputs = [
            TickInput {
                confirm: true,
                ..Default::default()
            },
            TickInput {
                movement: Vec2::new(1.0, 0.0),
                ..Default::default()
            },
            TickInput {
                movement: Vec2::new(0.0, -1.0),
                flash: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..100 {
            for input in &inputs {
                tick(&mut state1, input, 0.016);
                tick(&mut state2, input, 0.016);
            }
        }

        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.sparks, state2.sparks);
        assert_eq!(state1.shadows, state2.shadows);
        assert_eq!(state1.player, state2.player);
    }
}
