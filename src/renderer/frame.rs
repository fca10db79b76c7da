//! Per-frame scene data
//!
//! Packs the game state into the GPU-side structs the SDF shader reads. All
//! animation math (pulses, twinkles, ring growth) happens here on the CPU so
//! the draw is a pure function of the current state.

use bytemuck::{Pod, Zeroable};

use crate::settings::Settings;
use crate::sim::GameState;

/// Maximum number of stars supported
pub const MAX_STARS: usize = 128;
/// Maximum number of sparks supported
pub const MAX_SPARKS: usize = 128;
/// Maximum number of shadows supported
pub const MAX_SHADOWS: usize = 128;

/// Blur radius of the spark halo (pixels)
pub const SPARK_GLOW_BLUR: f32 = 18.0;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Globals {
    pub resolution: [f32; 2], // offset 0 - physical pixels
    pub viewport: [f32; 2],   // offset 8 - logical pixels
    pub clock: f32,           // offset 16
    pub dpr: f32,             // offset 20
    pub overlay_alpha: f32,   // offset 24
    pub star_count: u32,      // offset 28
    pub spark_count: u32,     // offset 32
    pub shadow_count: u32,    // offset 36
    pub spark_glow: f32,      // offset 40 - halo blur radius, 0 = off
    pub _pad0: u32,           // pad to 48 bytes
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct PlayerUniform {
    pub pos: [f32; 2],
    pub radius: f32,
    pub alpha: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct WaveUniform {
    pub center: [f32; 2],
    pub radius: f32,
    pub alpha: f32,
    pub width: f32,
    pub active: u32,
    pub _pad: [u32; 2],
}

/// A circle in logical pixels; used for stars, sparks and shadows
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct CircleData {
    pub pos: [f32; 2],
    pub radius: f32,
    pub alpha: f32,
}

/// Everything the shader needs for one frame
#[derive(Debug, Clone, Default)]
pub struct FrameData {
    pub globals: Globals,
    pub player: PlayerUniform,
    pub wave: WaveUniform,
    pub stars: Vec<CircleData>,
    pub sparks: Vec<CircleData>,
    pub shadows: Vec<CircleData>,
}

/// Star brightness: 0.15 + 0.35 * twinkle
pub fn star_alpha(clock: f32, phase: f32) -> f32 {
    let twinkle = 0.4 + 0.6 * (clock * 2.0 + phase).sin();
    0.15 + 0.35 * twinkle
}

/// Spark pulse in [0.2, 1.0]
pub fn spark_pulse(clock: f32, phase: f32) -> f32 {
    0.6 + 0.4 * (clock * 3.0 + phase).sin()
}

/// Drawn player radius (slow breathing)
pub fn player_display_radius(base: f32, clock: f32) -> f32 {
    let pulse = 0.7 + 0.3 * (clock * 6.0).sin();
    base + pulse * 1.5
}

/// Player opacity; flickers while invulnerable
pub fn player_alpha(invulnerable: f32, clock: f32, flicker: bool) -> f32 {
    if invulnerable > 0.0 && flicker {
        (0.6 + 0.4 * (clock * 20.0).sin()).clamp(0.0, 1.0)
    } else {
        1.0
    }
}

impl FrameData {
    /// Build frame data for a surface of `resolution` physical pixels
    pub fn from_state(state: &GameState, settings: &Settings, resolution: (u32, u32)) -> Self {
        let vp = state.viewport;
        let clock = state.clock;
        let dpr = if vp.width > 0.0 {
            (resolution.0 as f32 / vp.width).max(f32::EPSILON)
        } else {
            1.0
        };

        let star_limit = settings.quality.star_count().min(MAX_STARS);
        let stars: Vec<CircleData> = state
            .stars
            .iter()
            .take(star_limit)
            .map(|star| CircleData {
                pos: [star.pos.x * vp.width, star.pos.y * vp.height],
                radius: star.radius,
                alpha: star_alpha(clock, star.phase),
            })
            .collect();

        let sparks: Vec<CircleData> = state
            .sparks
            .iter()
            .take(MAX_SPARKS)
            .map(|spark| {
                let pulse = spark_pulse(clock, spark.phase);
                CircleData {
                    pos: spark.pos.to_array(),
                    radius: spark.radius * (0.8 + 0.4 * pulse),
                    alpha: 0.7 + 0.3 * pulse,
                }
            })
            .collect();

        let shadows: Vec<CircleData> = state
            .shadows
            .iter()
            .take(MAX_SHADOWS)
            .map(|shadow| CircleData {
                pos: shadow.pos.to_array(),
                radius: shadow.radius,
                alpha: 1.0,
            })
            .collect();

        let player = PlayerUniform {
            pos: state.player.pos.to_array(),
            radius: player_display_radius(state.player.radius, clock),
            alpha: player_alpha(
                state.invulnerable,
                clock,
                settings.effective_damage_flicker(),
            ),
        };

        let wave = match &state.flash_wave {
            Some(wave) => {
                let t = wave.progress();
                WaveUniform {
                    center: wave.origin.to_array(),
                    radius: wave.radius * (0.7 + t * 0.4),
                    alpha: 1.0 - t,
                    width: 4.0 + 12.0 * (1.0 - t),
                    active: 1,
                    _pad: [0; 2],
                }
            }
            None => WaveUniform::default(),
        };

        let overlay_alpha = if settings.effective_flash_overlay() {
            state.flash_alpha.clamp(0.0, 1.0)
        } else {
            0.0
        };

        let globals = Globals {
            resolution: [resolution.0 as f32, resolution.1 as f32],
            viewport: [vp.width, vp.height],
            clock,
            dpr,
            overlay_alpha,
            star_count: stars.len() as u32,
            spark_count: sparks.len() as u32,
            shadow_count: shadows.len() as u32,
            spark_glow: if settings.sparkle_glow { SPARK_GLOW_BLUR } else { 0.0 },
            _pad0: 0,
        };

        Self {
            globals,
            player,
            wave,
            stars,
            sparks,
            shadows,
        }
    }
}
