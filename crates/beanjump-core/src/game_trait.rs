use serde::{Deserialize, Serialize};

use crate::input::InputState;

/// Core trait the page shell drives once per animation frame.
///
/// The host owns the canvas, asset loading and keyboard listeners; the game
/// only handles game-specific logic.
pub trait SessionGame {
    /// Name and blurb shown by the page shell.
    fn metadata(&self) -> GameMetadata;

    /// Called each frame with the seconds since the previous frame.
    /// Returns the events that happened during the tick.
    fn update(&mut self, dt: f32, input: &InputState) -> Vec<GameEvent>;

    /// Compact snapshot of the observable state, for diagnostics and tests.
    fn serialize_state(&self) -> Vec<u8>;

    /// Whether the game can be frozen (e.g. when the tab loses focus).
    fn supports_pause(&self) -> bool {
        true
    }

    fn pause(&mut self);

    fn resume(&mut self);

    fn is_paused(&self) -> bool;
}

/// Game metadata for the page shell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
}

/// Events emitted by a game during update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreUpdate { score: u32 },
    Jumped { velocity: f32 },
    PlayerHit,
    TruckSpawned { x: f32, y: f32 },
    TruckDespawned { x: f32, y: f32 },
}
