use glam::Vec2;

use beanjump_core::input::{InputState, Key};
use beanjump_core::sprite::PlayOptions;

use crate::config::PlayerConfig;
use crate::entity::Entity;
use crate::jump::JumpCharge;

pub const FRAME_IDLE: usize = 0;
/// Crouch frame shown while charging.
pub const FRAME_CHARGING: usize = 1;
pub const WALK_ANIM: &str = "walk";

/// Run the keyboard handlers for one tick, in registration order: charge
/// held, charge pressed, charge released, left held, right held, right
/// released, left released.
///
/// Returns the launch velocity if the player jumped this tick.
pub fn handle_input(
    player: &mut Entity,
    charge: &mut JumpCharge,
    input: &InputState,
    cfg: &PlayerConfig,
    dt: f32,
) -> Option<f32> {
    if input.is_down(Key::Space) {
        if let Some(sprite) = player.sprite_mut() {
            sprite.stop();
        }
        charge.charge();
    }

    if input.just_pressed(Key::Space) && player.body.grounded {
        if input.is_down(Key::Left) {
            player.body.translate(Vec2::new(-cfg.charge_nudge, 0.0), dt);
        }
        if input.is_down(Key::Right) {
            player.body.translate(Vec2::new(cfg.charge_nudge, 0.0), dt);
        }
        set_frame(player, FRAME_CHARGING);
    }

    let mut jumped = None;
    if input.just_released(Key::Space) {
        set_frame(player, FRAME_IDLE);
        if let Some(velocity) = charge.release(player.body.grounded) {
            player.body.jump(velocity);
            jumped = Some(velocity);
        }
    }

    if input.is_down(Key::Left) {
        walk(player, input, -cfg.walk_speed, cfg, dt);
    }
    if input.is_down(Key::Right) {
        walk(player, input, cfg.walk_speed, cfg, dt);
    }
    if input.just_released(Key::Right) {
        stand(player);
    }
    if input.just_released(Key::Left) {
        stand(player);
    }
    jumped
}

fn set_frame(player: &mut Entity, frame: usize) {
    if let Some(sprite) = player.sprite_mut() {
        sprite.frame = frame;
    }
}

/// Translate horizontally, starting the walk cycle unless it is already
/// running or a charge is held.
fn walk(player: &mut Entity, input: &InputState, speed: f32, cfg: &PlayerConfig, dt: f32) {
    if let Some(sprite) = player.sprite_mut()
        && sprite.current_anim() != Some(WALK_ANIM)
        && !input.is_down(Key::Space)
    {
        // Sheets without a walk tag just slide.
        let _ = sprite.play(WALK_ANIM, PlayOptions {
            looping: true,
            speed: cfg.walk_anim_fps,
            ..Default::default()
        });
    }
    player.body.translate(Vec2::new(speed, 0.0), dt);
}

/// Abandon input in flight: drop any charge without jumping and show the
/// idle frame. Used when the session stops receiving key events.
pub fn cancel(player: &mut Entity, charge: &mut JumpCharge) {
    charge.release(false);
    stand(player);
}

fn stand(player: &mut Entity) {
    if let Some(sprite) = player.sprite_mut() {
        sprite.stop();
        sprite.frame = FRAME_IDLE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::fixtures::{library_without_walk, test_library};
    use crate::config::BeanJumpConfig;
    use crate::entity;

    const DT: f32 = 0.1;

    fn setup(grounded: bool) -> (Entity, JumpCharge, PlayerConfig) {
        let cfg = BeanJumpConfig::default();
        let mut player = entity::player(&test_library(), &cfg).unwrap();
        player.body.grounded = grounded;
        (player, JumpCharge::new(&cfg.player), cfg.player)
    }

    fn frame(player: &Entity) -> usize {
        player.sprite().map(|s| s.frame).unwrap()
    }

    #[test]
    fn held_space_charges_and_stops_animation() {
        let (mut player, mut charge, cfg) = setup(true);
        let mut input = InputState::new();
        input.on_key_down(Key::Right);
        handle_input(&mut player, &mut charge, &input, &cfg, DT);
        assert_eq!(player.sprite().unwrap().current_anim(), Some(WALK_ANIM));

        input.on_key_down(Key::Space);
        handle_input(&mut player, &mut charge, &input, &cfg, DT);
        assert_eq!(charge.velocity(), 510.0);
        // Walking does not restart the cycle while charging.
        assert_eq!(player.sprite().unwrap().current_anim(), None);
    }

    #[test]
    fn grounded_press_nudges_and_crouches() {
        let (mut player, mut charge, cfg) = setup(true);
        let start = player.body.pos.x;
        let mut input = InputState::new();
        input.on_key_down(Key::Left);
        input.end_frame();
        input.on_key_down(Key::Space);
        handle_input(&mut player, &mut charge, &input, &cfg, DT);
        // -100 nudge and -200 walk, both scaled by dt.
        assert!((player.body.pos.x - (start - 30.0)).abs() < 1e-3);
        assert_eq!(frame(&player), FRAME_CHARGING);
    }

    #[test]
    fn airborne_press_does_nothing() {
        let (mut player, mut charge, cfg) = setup(false);
        let start = player.body.pos;
        let mut input = InputState::new();
        input.on_key_down(Key::Space);
        handle_input(&mut player, &mut charge, &input, &cfg, DT);
        assert_eq!(player.body.pos, start);
        assert_eq!(frame(&player), FRAME_IDLE);
    }

    #[test]
    fn grounded_release_jumps_with_charge() {
        let (mut player, mut charge, cfg) = setup(true);
        let mut input = InputState::new();
        input.on_key_down(Key::Space);
        for _ in 0..50 {
            handle_input(&mut player, &mut charge, &input, &cfg, DT);
            input.end_frame();
        }
        input.on_key_up(Key::Space);
        let jumped = handle_input(&mut player, &mut charge, &input, &cfg, DT);
        assert_eq!(jumped, Some(1000.0));
        assert_eq!(player.body.vel.y, -1000.0);
        assert!(!player.body.grounded);
        assert_eq!(frame(&player), FRAME_IDLE);
        assert_eq!(charge.velocity(), 500.0);
    }

    #[test]
    fn airborne_release_resets_charge() {
        let (mut player, mut charge, cfg) = setup(false);
        let mut input = InputState::new();
        input.on_key_down(Key::Space);
        handle_input(&mut player, &mut charge, &input, &cfg, DT);
        input.end_frame();
        input.on_key_up(Key::Space);
        assert_eq!(handle_input(&mut player, &mut charge, &input, &cfg, DT), None);
        assert_eq!(player.body.vel.y, 0.0);
        assert_eq!(charge.velocity(), 500.0);
    }

    #[test]
    fn walking_moves_by_speed_times_dt() {
        let (mut player, mut charge, cfg) = setup(true);
        let start = player.body.pos.x;
        let mut input = InputState::new();
        input.on_key_down(Key::Right);
        handle_input(&mut player, &mut charge, &input, &cfg, DT);
        assert!((player.body.pos.x - (start + 20.0)).abs() < 1e-3);
    }

    #[test]
    fn release_direction_stops_walk() {
        let (mut player, mut charge, cfg) = setup(true);
        let mut input = InputState::new();
        input.on_key_down(Key::Left);
        handle_input(&mut player, &mut charge, &input, &cfg, DT);
        input.end_frame();
        input.on_key_up(Key::Left);
        handle_input(&mut player, &mut charge, &input, &cfg, DT);
        let sprite = player.sprite().unwrap();
        assert_eq!(sprite.current_anim(), None);
        assert_eq!(sprite.frame, FRAME_IDLE);
    }

    #[test]
    fn cancel_drops_charge_without_jumping() {
        let (mut player, mut charge, cfg) = setup(true);
        let mut input = InputState::new();
        input.on_key_down(Key::Space);
        for _ in 0..40 {
            handle_input(&mut player, &mut charge, &input, &cfg, DT);
            input.end_frame();
        }
        assert_eq!(charge.velocity(), 900.0);
        assert_eq!(frame(&player), FRAME_CHARGING);

        cancel(&mut player, &mut charge);
        assert_eq!(charge.velocity(), 500.0);
        assert_eq!(frame(&player), FRAME_IDLE);
        assert_eq!(player.body.vel.y, 0.0);
        assert!(player.body.grounded);
    }

    #[test]
    fn missing_walk_animation_is_swallowed() {
        let cfg = BeanJumpConfig::default();
        let mut player = entity::player(&library_without_walk(), &cfg).unwrap();
        let mut charge = JumpCharge::new(&cfg.player);
        let start = player.body.pos.x;
        let mut input = InputState::new();
        input.on_key_down(Key::Right);
        handle_input(&mut player, &mut charge, &input, &cfg.player, DT);
        assert_eq!(player.sprite().unwrap().current_anim(), None);
        assert!(player.body.pos.x > start);
    }
}
