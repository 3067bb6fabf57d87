use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Keys the game reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Space,
}

impl Key {
    /// Map a DOM `KeyboardEvent.code` to a game key.
    pub fn from_code(code: &str) -> Option<Key> {
        match code {
            "ArrowLeft" | "KeyA" => Some(Key::Left),
            "ArrowRight" | "KeyD" => Some(Key::Right),
            "Space" => Some(Key::Space),
            _ => None,
        }
    }
}

/// Keyboard state, updated from key events and read once per tick.
///
/// A press and a release may both land in the same frame; both edges are
/// reported for that frame.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_down: HashSet<Key>,
    /// Keys pressed this frame (cleared each frame).
    keys_just_pressed: HashSet<Key>,
    /// Keys released this frame (cleared each frame).
    keys_just_released: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a key down event. Auto-repeat does not produce a new press edge.
    pub fn on_key_down(&mut self, key: Key) {
        if self.keys_down.insert(key) {
            self.keys_just_pressed.insert(key);
        }
    }

    /// Register a key release.
    pub fn on_key_up(&mut self, key: Key) {
        if self.keys_down.remove(&key) {
            self.keys_just_released.insert(key);
        }
    }

    /// Forget every held key, e.g. when the page loses focus.
    pub fn release_all(&mut self) {
        let held: Vec<Key> = self.keys_down.iter().copied().collect();
        for key in held {
            self.on_key_up(key);
        }
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn just_pressed(&self, key: Key) -> bool {
        self.keys_just_pressed.contains(&key)
    }

    pub fn just_released(&self, key: Key) -> bool {
        self.keys_just_released.contains(&key)
    }

    /// Clear per-frame edges. Call at the end of each frame.
    pub fn end_frame(&mut self) {
        self.keys_just_pressed.clear();
        self.keys_just_released.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_down_and_up() {
        let mut input = InputState::new();
        input.on_key_down(Key::Space);
        assert!(input.is_down(Key::Space));
        assert!(input.just_pressed(Key::Space));

        input.end_frame();
        assert!(input.is_down(Key::Space));
        assert!(!input.just_pressed(Key::Space));

        input.on_key_up(Key::Space);
        assert!(!input.is_down(Key::Space));
        assert!(input.just_released(Key::Space));

        input.end_frame();
        assert!(!input.just_released(Key::Space));
    }

    #[test]
    fn repeat_key_down_is_single_press() {
        let mut input = InputState::new();
        input.on_key_down(Key::Left);
        input.end_frame();
        input.on_key_down(Key::Left); // auto-repeat
        assert!(!input.just_pressed(Key::Left));
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut input = InputState::new();
        input.on_key_up(Key::Right);
        assert!(!input.just_released(Key::Right));
    }

    #[test]
    fn release_all_emits_release_edges() {
        let mut input = InputState::new();
        input.on_key_down(Key::Left);
        input.on_key_down(Key::Space);
        input.end_frame();
        input.release_all();
        assert!(input.just_released(Key::Left));
        assert!(input.just_released(Key::Space));
        assert!(!input.is_down(Key::Left));
    }

    #[test]
    fn dom_codes_map_to_keys() {
        assert_eq!(Key::from_code("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_code("KeyD"), Some(Key::Right));
        assert_eq!(Key::from_code("Space"), Some(Key::Space));
        assert_eq!(Key::from_code("KeyE"), None);
    }
}
