use glam::Vec2;

use beanjump_core::camera::{Camera, Viewport};

use crate::config::CameraConfig;

/// Ease the camera toward the player.
///
/// x follows halfway once the player is past the follow line. While the
/// player is in the upper region the camera is held at the lock height;
/// below it, y stays where it is.
pub fn track(camera: &mut Camera, player: Vec2, viewport: &Viewport, cfg: &CameraConfig) {
    let mut next = camera.pos;

    if player.x > viewport.width * cfg.follow_x_fraction {
        next.x = (camera.pos.x + player.x) / 2.0;
    }

    if player.y < viewport.height * cfg.follow_y_fraction {
        next.y = cfg.y_lock;
    }

    camera.pos = next;
}
