//! HUD and overlay bridge
//!
//! The page around the canvas shows four text values and a message panel.
//! The simulation never touches the page; the frame driver pushes values
//! through a [`HudBridge`] after every update.

use crate::sim::GameState;

pub const START_TITLE: &str = "FLASHBURST";
pub const START_BODY: &str =
    "Move with WASD or arrow keys. Press Space to flash. Press Enter to start.";
pub const GAME_OVER_TITLE: &str = "CORE SHATTERED";

/// Body text for the game-over panel
pub fn game_over_body(score: u64, time: f32) -> String {
    format!("Score {}. You lasted {:.1}s. Press R to restart.", score, time)
}

/// Output surface for HUD values and the message overlay
pub trait HudBridge {
    fn update_hud(&mut self, hud: &HudSnapshot);
    fn set_overlay(&mut self, title: &str, body: &str);
    fn hide_overlay(&mut self);
}

/// Values shown in the HUD
#[derive(Debug, Clone, PartialEq)]
pub struct HudSnapshot {
    pub score: u64,
    pub charge: u8,
    pub max_charge: u8,
    pub health: u8,
    pub time: f32,
}

impl HudSnapshot {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            score: state.score,
            charge: state.charge,
            max_charge: state.max_charge,
            health: state.health,
            time: state.elapsed,
        }
    }

    pub fn score_text(&self) -> String {
        self.score.to_string()
    }

    pub fn charge_text(&self) -> String {
        format!("{}/{}", self.charge, self.max_charge)
    }

    pub fn health_text(&self) -> String {
        self.health.to_string()
    }

    pub fn time_text(&self) -> String {
        format!("{:.1}", self.time)
    }
}

/// Bridge that discards everything (headless runs)
#[derive(Debug, Default)]
pub struct NullHud;

impl HudBridge for NullHud {
    fn update_hud(&mut self, _hud: &HudSnapshot) {}
    fn set_overlay(&mut self, _title: &str, _body: &str) {}
    fn hide_overlay(&mut self) {}
}
