//! Flashburst - A top-down survival arcade game
//!
//! Core modules:
//! - `sim`: Simulation (movement, spawning, collisions, game state)
//! - `input`: Keyboard state buffered between frames
//! - `game`: Frame clock and the per-frame driver
//! - `hud`: HUD/overlay bridge to the surrounding page
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Display preferences

pub mod game;
pub mod hud;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::{FrameClock, Game};
pub use hud::{HudBridge, HudSnapshot};
pub use input::{InputState, Key};
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Largest delta-time a single frame may advance (seconds)
    pub const MAX_FRAME_DT: f32 = 0.033;

    /// Smallest logical viewport the simulation will accept
    pub const MIN_VIEWPORT_WIDTH: f32 = 320.0;
    pub const MIN_VIEWPORT_HEIGHT: f32 = 240.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 14.0;
    pub const PLAYER_SPEED: f32 = 240.0;
    /// Extra gap kept between the player and the viewport edge
    pub const PLAYER_EDGE_MARGIN: f32 = 6.0;
    /// Start position as a fraction of the viewport
    pub const PLAYER_START: (f32, f32) = (0.5, 0.6);

    /// Health and charge
    pub const MAX_HEALTH: u8 = 3;
    pub const MAX_CHARGE: u8 = 3;
    pub const INVULNERABILITY_SECS: f32 = 1.1;

    /// Scoring
    pub const SPARK_SCORE: u64 = 10;
    pub const SHADOW_BURST_SCORE: u64 = 4;

    /// Sparks
    pub const SPARK_SPAWN_MARGIN: f32 = 30.0;
    pub const SPARK_MIN_RADIUS: f32 = 6.0;
    pub const SPARK_RADIUS_RANGE: f32 = 5.0;
    pub const SPARK_FIRST_SPAWN: f32 = 0.6;
    pub const SPARK_MIN_INTERVAL: f32 = 0.5;
    pub const SPARK_INTERVAL_RANGE: f32 = 0.9;
    /// Pulse phase advance (radians/sec)
    pub const SPARK_PULSE_RATE: f32 = 3.0;

    /// Shadows
    pub const SHADOW_SPAWN_MARGIN: f32 = 40.0;
    pub const SHADOW_CULL_MARGIN: f32 = 80.0;
    pub const SHADOW_MIN_RADIUS: f32 = 12.0;
    pub const SHADOW_RADIUS_RANGE: f32 = 10.0;
    pub const SHADOW_FIRST_SPAWN: f32 = 1.0;
    /// Spawn interval: max(floor, start - elapsed * decay) + random jitter
    pub const SHADOW_INTERVAL_START: f32 = 1.4;
    pub const SHADOW_INTERVAL_DECAY: f32 = 0.02;
    pub const SHADOW_INTERVAL_FLOOR: f32 = 0.5;
    pub const SHADOW_INTERVAL_JITTER: f32 = 0.4;
    /// Speed: base + min(cap, elapsed * growth) + random jitter
    pub const SHADOW_BASE_SPEED: f32 = 70.0;
    pub const SHADOW_SPEED_GROWTH: f32 = 3.0;
    pub const SHADOW_SPEED_GROWTH_CAP: f32 = 120.0;
    pub const SHADOW_SPEED_JITTER: f32 = 60.0;
    /// Wobble phase rate (radians/sec) and lateral amplitude (pixels/sec)
    pub const SHADOW_WOBBLE_RATE: f32 = 2.0;
    pub const SHADOW_WOBBLE_AMPLITUDE: f32 = 10.0;

    /// Flash pulse
    pub const FLASH_BASE_RADIUS: f32 = 150.0;
    pub const FLASH_RADIUS_PER_CHARGE: f32 = 20.0;
    pub const FLASH_COOLDOWN_SECS: f32 = 0.5;
    pub const FLASH_WAVE_LIFETIME: f32 = 0.25;
    /// How long the overlay keeps brightening after a flash
    pub const FLASH_RISE_SECS: f32 = 0.05;
    pub const FLASH_RISE_RATE: f32 = 3.0;
    /// Overlay fade per second while running / while idle or over
    pub const FLASH_DECAY_RUNNING: f32 = 1.5;
    pub const FLASH_DECAY_STOPPED: f32 = 2.0;
    /// Overlay floors applied on pickup and on taking a hit
    pub const PICKUP_FLASH_FLOOR: f32 = 0.35;
    pub const HIT_FLASH_FLOOR: f32 = 0.6;

    /// Background star field
    pub const STAR_COUNT: usize = 80;
}
