pub mod arena;
pub mod camera;
pub mod error;
pub mod game_trait;
pub mod input;
pub mod physics;
pub mod sprite;
pub mod tilemap;
pub mod timer;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::game_trait::{GameEvent, SessionGame};
    use crate::input::{InputState, Key};

    /// Frame time used by helpers: one 60 Hz frame.
    pub const FRAME: f32 = 1.0 / 60.0;

    /// Run N game ticks with no keys held, returning all accumulated events.
    pub fn run_game_ticks(game: &mut dyn SessionGame, n: usize, dt: f32) -> Vec<GameEvent> {
        let mut input = InputState::new();
        run_ticks_with(game, &mut input, n, dt)
    }

    /// Run N ticks with the given keyboard state, clearing edges after each.
    pub fn run_ticks_with(
        game: &mut dyn SessionGame,
        input: &mut InputState,
        n: usize,
        dt: f32,
    ) -> Vec<GameEvent> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(game.update(dt, input));
            input.end_frame();
        }
        all_events
    }

    /// Press `key`, hold it for `ticks` frames (the press frame included),
    /// then release it on one more frame.
    pub fn hold_key(
        game: &mut dyn SessionGame,
        input: &mut InputState,
        key: Key,
        ticks: usize,
        dt: f32,
    ) -> Vec<GameEvent> {
        input.on_key_down(key);
        let mut events = run_ticks_with(game, input, ticks, dt);
        input.on_key_up(key);
        events.extend(run_ticks_with(game, input, 1, dt));
        events
    }

    /// Assert that the game's serialized state differs from `before`.
    pub fn assert_game_state_changed(game: &dyn SessionGame, before: &[u8]) {
        let after = game.serialize_state();
        assert_ne!(
            before,
            &after[..],
            "Game state should have changed after operation"
        );
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================
    // Generic checks every SessionGame implementation must pass. Game crates
    // call them from their own #[cfg(test)] modules.

    /// serialize_state() must return non-empty bytes.
    pub fn contract_state_not_empty(game: &dyn SessionGame) {
        assert!(
            !game.serialize_state().is_empty(),
            "serialize_state() must return non-empty bytes"
        );
    }

    /// update() with dt>0 must advance the game state (clock at least).
    pub fn contract_update_advances_time(game: &mut dyn SessionGame) {
        let before = game.serialize_state();
        run_game_ticks(game, 1, FRAME);
        assert_game_state_changed(game, &before);
    }

    /// pause() must freeze updates, resume() must unfreeze them.
    pub fn contract_pause_stops_updates(game: &mut dyn SessionGame) {
        game.pause();
        assert!(game.is_paused());
        let before = game.serialize_state();
        run_game_ticks(game, 5, FRAME);
        let during_pause = game.serialize_state();
        assert_eq!(before, during_pause, "State must not change while paused");

        game.resume();
        run_game_ticks(game, 1, FRAME);
        let after_resume = game.serialize_state();
        assert_ne!(during_pause, after_resume, "State must change after resume");
    }
}
