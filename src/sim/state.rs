//! Game state and core simulation types
//!
//! Everything the simulation step reads or writes lives in [`GameState`],
//! owned by the frame driver and passed by reference into `tick` and the
//! renderer.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::clamp_to_rect;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// Waiting for the start key, world cleared
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Health ran out; only visual effects keep animating
    Over,
}

/// Logical (CSS pixel) size of the playfield
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Create a viewport, flooring each side at the minimum playable size
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.floor().max(MIN_VIEWPORT_WIDTH),
            height: height.floor().max(MIN_VIEWPORT_HEIGHT),
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Rectangle a circle of `radius` may occupy, inset by the edge margin
    pub fn inset_bounds(&self, radius: f32) -> (Vec2, Vec2) {
        let inset = radius + PLAYER_EDGE_MARGIN;
        (
            Vec2::splat(inset),
            Vec2::new(self.width - inset, self.height - inset),
        )
    }

    /// True while `pos` is inside the viewport grown by `margin` on all sides
    pub fn contains_with_margin(&self, pos: Vec2, margin: f32) -> bool {
        pos.x > -margin
            && pos.x < self.width + margin
            && pos.y > -margin
            && pos.y < self.height + margin
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(MIN_VIEWPORT_WIDTH, MIN_VIEWPORT_HEIGHT)
    }
}

/// The player-controlled orb
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    /// Derived from input each frame, never integrated on its own
    pub vel: Vec2,
    pub radius: f32,
    pub speed: f32,
}

impl Player {
    pub fn new(viewport: &Viewport) -> Self {
        let mut player = Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: PLAYER_RADIUS,
            speed: PLAYER_SPEED,
        };
        player.recenter(viewport);
        player
    }

    /// Move back to the start position and stop
    pub fn recenter(&mut self, viewport: &Viewport) {
        self.pos = viewport.size() * Vec2::new(PLAYER_START.0, PLAYER_START.1);
        self.vel = Vec2::ZERO;
    }
}

/// A collectible that grants score and charge
#[derive(Debug, Clone, PartialEq)]
pub struct Spark {
    pub pos: Vec2,
    pub radius: f32,
    /// Pulse phase offset (visual only)
    pub phase: f32,
}

/// A pursuing enemy
#[derive(Debug, Clone, PartialEq)]
pub struct Shadow {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Wobble phase, advances at a fixed rate
    pub wobble: f32,
}

/// Expanding ring left behind by a flash pulse
#[derive(Debug, Clone, PartialEq)]
pub struct FlashWave {
    pub origin: Vec2,
    pub radius: f32,
    pub age: f32,
    pub lifetime: f32,
}

impl FlashWave {
    pub fn new(origin: Vec2, radius: f32) -> Self {
        Self {
            origin,
            radius,
            age: 0.0,
            lifetime: FLASH_WAVE_LIFETIME,
        }
    }

    /// Animation progress in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.lifetime <= 0.0 {
            return 1.0;
        }
        (self.age / self.lifetime).clamp(0.0, 1.0)
    }

    /// Age the wave; returns false once it has expired
    pub fn advance(&mut self, dt: f32) -> bool {
        self.age += dt;
        self.age < self.lifetime
    }
}

/// Background star (position normalized to the viewport)
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub pos: Vec2,
    pub radius: f32,
    pub phase: f32,
}

/// Notable things that happened during a tick, drained by the frame driver
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// World cleared back to the start screen
    Reset,
    /// Idle -> Running
    Started,
    /// Full reset straight into Running
    Restarted,
    SparkCollected { score: u64, charge: u8 },
    PlayerHit { health: u8 },
    FlashTriggered { radius: f32, destroyed: u32 },
    ShadowsDespawned { count: usize },
    GameOver { score: u64, time: f32 },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    pub score: u64,
    pub charge: u8,
    pub max_charge: u8,
    pub health: u8,
    /// Seconds survived, advances only while running
    pub elapsed: f32,
    /// Seconds since the session began, advances in every phase (visuals)
    pub clock: f32,
    pub invulnerable: f32,
    pub flash_cooldown: f32,
    /// Full-screen white overlay, visual only
    pub flash_alpha: f32,
    /// Remaining time the overlay keeps brightening
    pub flash_rise: f32,
    pub flash_wave: Option<FlashWave>,
    /// Countdown to the next spark
    pub spark_timer: f32,
    /// Countdown to the next shadow
    pub shadow_timer: f32,
    pub viewport: Viewport,
    pub player: Player,
    pub sparks: Vec<Spark>,
    pub shadows: Vec<Shadow>,
    /// Ambient decoration, generated once per session
    pub stars: Vec<Star>,
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh session in the Idle phase
    pub fn new(seed: u64, viewport: Viewport) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let stars = (0..STAR_COUNT)
            .map(|_| Star {
                pos: Vec2::new(rng.random::<f32>(), rng.random::<f32>()),
                radius: 0.6 + rng.random::<f32>() * 1.8,
                phase: rng.random::<f32>() * std::f32::consts::TAU,
            })
            .collect();

        let mut state = Self {
            seed,
            rng,
            phase: GamePhase::Idle,
            score: 0,
            charge: 0,
            max_charge: MAX_CHARGE,
            health: MAX_HEALTH,
            elapsed: 0.0,
            clock: 0.0,
            invulnerable: 0.0,
            flash_cooldown: 0.0,
            flash_alpha: 0.0,
            flash_rise: 0.0,
            flash_wave: None,
            spark_timer: SPARK_FIRST_SPAWN,
            shadow_timer: SHADOW_FIRST_SPAWN,
            player: Player::new(&viewport),
            viewport,
            sparks: Vec::new(),
            shadows: Vec::new(),
            stars,
            events: Vec::new(),
        };
        state.reset();
        state
    }

    /// Clear the world and return to the start screen
    pub fn reset(&mut self) {
        self.reset_world();
        self.phase = GamePhase::Idle;
        self.events.push(GameEvent::Reset);
    }

    /// Idle -> Running. Ignored in any other phase.
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Idle {
            return false;
        }
        self.phase = GamePhase::Running;
        self.events.push(GameEvent::Started);
        true
    }

    /// Full reset, then straight into Running
    pub fn restart(&mut self) {
        self.reset_world();
        self.phase = GamePhase::Running;
        self.events.push(GameEvent::Restarted);
    }

    /// Running -> Over
    pub fn game_over(&mut self) {
        self.phase = GamePhase::Over;
        self.events.push(GameEvent::GameOver {
            score: self.score,
            time: self.elapsed,
        });
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Apply a new logical viewport size. The player always ends up inside
    /// the new playable rectangle.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
        if self.phase == GamePhase::Idle {
            self.player.recenter(&self.viewport);
        } else {
            let (min, max) = self.viewport.inset_bounds(self.player.radius);
            self.player.pos = clamp_to_rect(self.player.pos, min, max);
        }
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn reset_world(&mut self) {
        self.sparks.clear();
        self.shadows.clear();
        self.score = 0;
        self.charge = 0;
        self.health = MAX_HEALTH;
        self.elapsed = 0.0;
        self.invulnerable = 0.0;
        self.flash_cooldown = 0.0;
        self.flash_alpha = 0.0;
        self.flash_rise = 0.0;
        self.flash_wave = None;
        self.spark_timer = SPARK_FIRST_SPAWN;
        self.shadow_timer = SHADOW_FIRST_SPAWN;
        self.player.recenter(&self.viewport);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    #[test]
    fn test_new_state_is_idle_with_defaults() {
        let state = GameState::new(42, viewport());
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.score, 0);
        assert_eq!(state.charge, 0);
        assert_eq!(state.health, MAX_HEALTH);
        assert_eq!(state.stars.len(), STAR_COUNT);
        assert_eq!(state.player.pos, Vec2::new(400.0, 360.0));
        assert_eq!(state.events, vec![GameEvent::Reset]);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut state = GameState::new(7, viewport());
        state.score = 120;
        state.charge = 2;
        state.health = 1;
        state.elapsed = 33.0;
        state.sparks.push(Spark {
            pos: Vec2::new(10.0, 10.0),
            radius: 8.0,
            phase: 0.0,
        });
        state.flash_wave = Some(FlashWave::new(Vec2::ZERO, 170.0));

        state.reset();
        let first = state.clone();
        state.reset();

        assert_eq!(state.phase, first.phase);
        assert_eq!(state.score, first.score);
        assert_eq!(state.charge, first.charge);
        assert_eq!(state.health, first.health);
        assert_eq!(state.elapsed, first.elapsed);
        assert_eq!(state.player, first.player);
        assert_eq!(state.sparks, first.sparks);
        assert_eq!(state.shadows, first.shadows);
        assert_eq!(state.flash_wave, first.flash_wave);
        assert_eq!(state.spark_timer, first.spark_timer);
        assert_eq!(state.shadow_timer, first.shadow_timer);
        assert_eq!(state.stars, first.stars);
        assert_eq!(state.rng, first.rng);
    }

    #[test]
    fn test_start_only_from_idle() {
        let mut state = GameState::new(1, viewport());
        assert!(state.start());
        assert_eq!(state.phase, GamePhase::Running);
        assert!(!state.start());

        state.game_over();
        assert!(!state.start());
        assert_eq!(state.phase, GamePhase::Over);
    }

    #[test]
    fn test_restart_from_over() {
        let mut state = GameState::new(1, viewport());
        state.start();
        state.score = 50;
        state.health = 0;
        state.shadows.push(Shadow {
            pos: Vec2::new(5.0, 5.0),
            vel: Vec2::X,
            radius: 12.0,
            wobble: 0.0,
        });
        state.game_over();
        state.drain_events();

        state.restart();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.health, MAX_HEALTH);
        assert!(state.shadows.is_empty());
        assert_eq!(state.drain_events(), vec![GameEvent::Restarted]);
    }

    #[test]
    fn test_viewport_floors_small_sizes() {
        let vp = Viewport::new(100.5, 50.0);
        assert_eq!(vp.width, MIN_VIEWPORT_WIDTH);
        assert_eq!(vp.height, MIN_VIEWPORT_HEIGHT);

        let vp = Viewport::new(1024.7, 768.2);
        assert_eq!(vp.width, 1024.0);
        assert_eq!(vp.height, 768.0);
    }

    #[test]
    fn test_resize_recenters_only_when_idle() {
        let mut state = GameState::new(3, viewport());
        state.resize(1000.0, 500.0);
        assert_eq!(state.player.pos, Vec2::new(500.0, 300.0));

        state.start();
        state.player.pos = Vec2::new(50.0, 50.0);
        state.resize(1200.0, 900.0);
        assert_eq!(state.player.pos, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_shrinking_after_game_over_keeps_player_inside() {
        let mut state = GameState::new(3, Viewport::new(1200.0, 900.0));
        state.start();
        state.player.pos = Vec2::new(1100.0, 800.0);
        state.health = 0;
        state.game_over();

        state.resize(400.0, 300.0);
        let (min, max) = state.viewport.inset_bounds(state.player.radius);
        assert_eq!(state.player.pos, max);
        assert!(state.player.pos.cmpge(min).all());

        // Still inside after the frame loop keeps ticking in Over
        crate::sim::tick(&mut state, &crate::sim::TickInput::default(), 0.016);
        assert!(state.player.pos.cmple(max).all());
        assert_eq!(state.phase, GamePhase::Over);
    }

    #[test]
    fn test_flash_wave_expires() {
        let mut wave = FlashWave::new(Vec2::ZERO, 150.0);
        assert!(wave.advance(0.1));
        assert!((wave.progress() - 0.4).abs() < 1e-5);
        assert!(!wave.advance(0.2));
        assert_eq!(wave.progress(), 1.0);
    }
}
