//! Frame driver
//!
//! Owns the game state and input, turns animation-frame timestamps into a
//! clamped delta time, and runs input -> update -> HUD dispatch once per frame.
//! Rendering is done by the caller afterwards from `game.state`.

use crate::consts::MAX_FRAME_DT;
use crate::hud::{self, HudBridge, HudSnapshot};
use crate::input::InputState;
use crate::sim::{GameEvent, GameState, Viewport, tick};

/// Converts absolute frame timestamps (ms) into per-frame deltas (s)
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta since the previous frame, clamped to `[0, MAX_FRAME_DT]`.
    /// The first frame yields 0.
    pub fn advance(&mut self, timestamp_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((timestamp_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(timestamp_ms);
        if dt.is_nan() {
            return 0.0;
        }
        dt.clamp(0.0, MAX_FRAME_DT)
    }

    /// Forget the previous timestamp (e.g. after the tab was hidden)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Game instance holding all state
pub struct Game {
    pub state: GameState,
    pub input: InputState,
    clock: FrameClock,
}

impl Game {
    pub fn new(seed: u64, width: f32, height: f32) -> Self {
        Self {
            state: GameState::new(seed, Viewport::new(width, height)),
            input: InputState::new(),
            clock: FrameClock::new(),
        }
    }

    /// Viewport changed (logical pixels)
    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.resize(width, height);
        log::info!(
            "Viewport resized to {}x{}",
            self.state.viewport.width,
            self.state.viewport.height
        );
    }

    /// Run one animation frame at `timestamp_ms`; returns the dt used
    pub fn frame(&mut self, timestamp_ms: f64, hud: &mut impl HudBridge) -> f32 {
        let dt = self.clock.advance(timestamp_ms);
        self.step(dt, hud);
        dt
    }

    /// Apply buffered input, advance the simulation by `dt`, then update the page
    pub fn step(&mut self, dt: f32, hud: &mut impl HudBridge) {
        let input = self.input.begin_frame();
        tick(&mut self.state, &input, dt);
        self.sync(hud);
    }

    /// Dispatch pending events and push HUD values without advancing time
    pub fn sync(&mut self, hud: &mut impl HudBridge) {
        for event in self.state.drain_events() {
            dispatch_event(&event, hud);
        }
        hud.update_hud(&HudSnapshot::from_state(&self.state));
    }

    /// Drop held keys and the frame clock's reference point
    pub fn suspend(&mut self) {
        self.input.clear();
        self.clock.reset();
    }
}

fn dispatch_event(event: &GameEvent, bridge: &mut impl HudBridge) {
    match event {
        GameEvent::Reset => bridge.set_overlay(hud::START_TITLE, hud::START_BODY),
        GameEvent::Started => {
            log::info!("Run started");
            bridge.hide_overlay();
        }
        GameEvent::Restarted => {
            log::info!("Run restarted");
            bridge.hide_overlay();
        }
        GameEvent::GameOver { score, time } => {
            log::info!("Game over: score {} after {:.1}s", score, time);
            bridge.set_overlay(hud::GAME_OVER_TITLE, &hud::game_over_body(*score, *time));
        }
        GameEvent::FlashTriggered { radius, destroyed } => {
            log::debug!("Flash radius {:.0} destroyed {} shadows", radius, destroyed);
        }
        GameEvent::PlayerHit { health } => log::debug!("Hit! health {}", health),
        GameEvent::SparkCollected { score, charge } => {
            log::trace!("Spark collected: score {} charge {}", score, charge);
        }
        GameEvent::ShadowsDespawned { count } => log::trace!("{} shadows left the field", count),
    }
}
