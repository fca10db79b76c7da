//! Keyboard input state
//!
//! Key events arrive from the host between frames. They are buffered as
//! transitions and only applied at the frame boundary (`begin_frame`), so the
//! simulation never sees input change mid-step.

use std::collections::HashSet;

use glam::Vec2;

use crate::sim::TickInput;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Space,
    Enter,
    R,
}

impl Key {
    /// Parse a browser `KeyboardEvent.key` value. Unknown keys yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        if name == " " {
            return Some(Key::Space);
        }
        match name.to_lowercase().as_str() {
            "w" => Some(Key::W),
            "a" => Some(Key::A),
            "s" => Some(Key::S),
            "d" => Some(Key::D),
            "arrowup" | "up" => Some(Key::ArrowUp),
            "arrowdown" | "down" => Some(Key::ArrowDown),
            "arrowleft" | "left" => Some(Key::ArrowLeft),
            "arrowright" | "right" => Some(Key::ArrowRight),
            "space" | "spacebar" => Some(Key::Space),
            "enter" | "return" => Some(Key::Enter),
            "r" => Some(Key::R),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct KeyTransition {
    key: Key,
    down: bool,
}

/// Held keys plus transitions waiting for the next frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Key>,
    pending: Vec<KeyTransition>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a key press. Auto-repeat presses are dropped.
    pub fn key_down(&mut self, name: &str, repeat: bool) {
        if repeat {
            return;
        }
        if let Some(key) = Key::from_name(name) {
            self.pending.push(KeyTransition { key, down: true });
        }
    }

    /// Queue a key release
    pub fn key_up(&mut self, name: &str) {
        if let Some(key) = Key::from_name(name) {
            self.pending.push(KeyTransition { key, down: false });
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Apply buffered transitions and sample this frame's input
    pub fn begin_frame(&mut self) -> TickInput {
        let mut input = TickInput::default();

        for transition in self.pending.drain(..) {
            if !transition.down {
                self.held.remove(&transition.key);
                continue;
            }
            // A press for a key that is already down is a repeat the host
            // didn't flag; it must not re-fire one-shot actions
            if !self.held.insert(transition.key) {
                continue;
            }
            match transition.key {
                Key::Space => input.flash = true,
                Key::Enter => input.confirm = true,
                Key::R => input.restart = true,
                _ => {}
            }
        }

        input.movement = self.movement_axes();
        input
    }

    /// Release everything (e.g. when the page loses focus)
    pub fn clear(&mut self) {
        self.held.clear();
        self.pending.clear();
    }

    fn movement_axes(&self) -> Vec2 {
        let mut axes = Vec2::ZERO;
        if self.is_held(Key::A) || self.is_held(Key::ArrowLeft) {
            axes.x -= 1.0;
        }
        if self.is_held(Key::D) || self.is_held(Key::ArrowRight) {
            axes.x += 1.0;
        }
        if self.is_held(Key::W) || self.is_held(Key::ArrowUp) {
            axes.y -= 1.0;
        }
        if self.is_held(Key::S) || self.is_held(Key::ArrowDown) {
            axes.y += 1.0;
        }
        axes
    }
}
