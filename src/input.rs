//! Keyboard state with held and edge-triggered queries
//!
//! Lane changes and the serve tap need edges (one step per press, press and
//! release as separate events); walking left/right uses the held level. Edges
//! are cleared by `end_frame()` after a tick has consumed them.

use std::collections::HashSet;

use crate::sim::TickInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Serve,
}

impl Key {
    /// Map a DOM `KeyboardEvent.code`
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowUp" => Some(Key::Up),
            "ArrowDown" => Some(Key::Down),
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            "Space" => Some(Key::Serve),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key went down; auto-repeat while held is not a new press
    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.just_released.insert(key);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    /// Commands for the next tick
    pub fn snapshot(&self) -> TickInput {
        TickInput {
            lane_up: self.is_just_pressed(Key::Up),
            lane_down: self.is_just_pressed(Key::Down),
            move_left: self.is_held(Key::Left),
            move_right: self.is_held(Key::Right),
            serve_pressed: self.is_just_pressed(Key::Serve),
            serve_released: self.is_just_released(Key::Serve),
        }
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }

    /// Forget everything (screen change, lost focus)
    pub fn clear(&mut self) {
        self.held.clear();
        self.end_frame();
    }
}
