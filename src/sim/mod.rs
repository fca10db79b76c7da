//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering and
//! platform dependencies:
//! - Seeded RNG only
//! - Clamped, caller-supplied delta time
//! - Entity removal via retain or reverse iteration, never forward index removal

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{circles_overlap, clamp_to_rect, sd_circle, within_radius};
pub use spawn::{shadow_base_speed, shadow_interval, shadow_pace, spark_interval};
pub use state::{
    FlashWave, GameEvent, GamePhase, GameState, Player, Shadow, Spark, Star, Viewport,
};
pub use tick::{TickInput, clamp_dt, tick, trigger_flash};
