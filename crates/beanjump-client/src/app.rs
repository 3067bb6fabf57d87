use beanjump_core::game_trait::{GameEvent, SessionGame};
use beanjump_core::input::InputState;
use beanjump_platformer::GameSession;

use crate::diag::console_log;

/// Longest step fed to the session; slower frames are slowed down.
pub const MAX_FRAME_DT: f32 = 0.1;
/// Step used for the first frame, before there is a previous timestamp.
pub const FIRST_FRAME_DT: f32 = 1.0 / 60.0;

/// Seconds between two `requestAnimationFrame` timestamps (milliseconds).
pub fn frame_dt(prev: Option<f64>, now: f64) -> f32 {
    match prev {
        Some(prev) => (((now - prev) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT),
        None => FIRST_FRAME_DT,
    }
}

/// Console lines for the events a player would want to see while debugging.
pub fn report_events(events: &[GameEvent], viewport_height: f32) {
    for event in events {
        match event {
            GameEvent::PlayerHit => console_log!("Collided with truck!"),
            GameEvent::TruckDespawned { x, y } => console_log!("{x} {y} {viewport_height}"),
            GameEvent::ScoreUpdate { .. }
            | GameEvent::Jumped { .. }
            | GameEvent::TruckSpawned { .. } => {},
        }
    }
}

/// Per-mount state shared by the frame loop and the input listeners.
pub struct App {
    pub session: GameSession,
    pub input: InputState,
    prev_timestamp: Option<f64>,
}

impl App {
    pub fn new(session: GameSession) -> Self {
        Self {
            session,
            input: InputState::new(),
            prev_timestamp: None,
        }
    }

    /// Advance the session to `timestamp` and clear this frame's key edges.
    pub fn tick(&mut self, timestamp: f64) -> Vec<GameEvent> {
        let dt = frame_dt(self.prev_timestamp, timestamp);
        self.prev_timestamp = Some(timestamp);
        let events = self.session.update(dt, &self.input);
        self.input.end_frame();
        events
    }

    /// Page lost focus: drop held keys and freeze the session.
    pub fn suspend(&mut self) {
        self.input.release_all();
        self.session.pause();
        self.prev_timestamp = None;
    }

    pub fn resume(&mut self) {
        self.session.resume();
    }
}

#[cfg(target_family = "wasm")]
pub use web::start;

#[cfg(target_family = "wasm")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;
    use web_sys::{HtmlCanvasElement, Window};

    use beanjump_platformer::GameSession;

    use super::{App, report_events};
    use crate::render::{Painter, draw_list};
    use crate::{listeners, loader};

    /// Load assets, build the session and start the frame loop.
    pub async fn start(canvas: HtmlCanvasElement) -> Result<(), String> {
        let window = web_sys::window().ok_or("No window")?;
        let assets = loader::load_all(&window)
            .await
            .map_err(|e| e.to_string())?;
        let session =
            GameSession::new(crate::config(), &assets.library).map_err(|e| e.to_string())?;
        let painter = Painter::new(&canvas, assets.images)?;

        let app = Rc::new(RefCell::new(App::new(session)));
        listeners::attach_input_listeners(&window, &app);
        run_frame_loop(window, app, painter);
        Ok(())
    }

    /// Drive the app from `requestAnimationFrame` for the life of the page.
    fn run_frame_loop(window: Window, app: Rc<RefCell<App>>, painter: Painter) {
        let slot: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
        let next = Rc::clone(&slot);
        let win = window.clone();
        *slot.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
            {
                let mut app = app.borrow_mut();
                let events = app.tick(timestamp);
                report_events(&events, app.session.viewport().height);
                painter.paint(&draw_list(&app.session));
            }
            if let Some(cb) = next.borrow().as_ref() {
                let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
            }
        }));
        if let Some(cb) = slot.borrow().as_ref() {
            let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beanjump_core::input::Key;
    use beanjump_platformer::assets::fixtures::test_library;
    use beanjump_platformer::config::BeanJumpConfig;

    fn app() -> App {
        App::new(GameSession::new(BeanJumpConfig::default(), &test_library()).unwrap())
    }

    #[test]
    fn dt_from_timestamps() {
        assert_eq!(frame_dt(None, 1234.0), FIRST_FRAME_DT);
        assert!((frame_dt(Some(1000.0), 1016.0) - 0.016).abs() < 1e-6);
        assert_eq!(frame_dt(Some(0.0), 5000.0), MAX_FRAME_DT);
        assert_eq!(frame_dt(Some(10.0), 5.0), 0.0);
    }

    #[test]
    fn tick_clears_key_edges() {
        let mut app = app();
        app.input.on_key_down(Key::Space);
        app.tick(0.0);
        assert!(!app.input.just_pressed(Key::Space));
        assert!(app.input.is_down(Key::Space));
        assert_eq!(app.session.jump_velocity(), 510.0);
    }

    #[test]
    fn suspend_releases_keys_and_pauses() {
        let mut app = app();
        app.input.on_key_down(Key::Right);
        app.tick(0.0);
        app.suspend();
        assert!(!app.input.is_down(Key::Right));
        assert!(app.session.is_paused());
        let before = app.session.player_pos();
        app.tick(16.0);
        assert_eq!(app.session.player_pos(), before);
        app.resume();
        assert!(!app.session.is_paused());
    }

    #[test]
    fn blur_mid_charge_leaves_no_stale_charge() {
        let mut app = app();
        app.input.on_key_down(Key::Space);
        for i in 0..40 {
            app.tick(f64::from(i) * 16.0);
        }
        assert_eq!(app.session.jump_velocity(), 900.0);

        app.suspend();
        app.tick(700.0);
        app.resume();
        let mut events = app.tick(716.0);
        events.extend(app.tick(732.0));
        assert_eq!(app.session.jump_velocity(), 500.0);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Jumped { .. })));
    }
}
