use glam::Vec2;

use beanjump_core::camera::Viewport;
use beanjump_core::physics::Body;

use crate::config::TruckConfig;

/// Roll left at constant speed.
pub fn drive(body: &mut Body, cfg: &TruckConfig, dt: f32) {
    body.translate(Vec2::new(-cfg.speed, 0.0), dt);
}

/// Trucks that fell this far below the viewport are gone for good.
pub fn fell_off(body: &Body, viewport: &Viewport, cfg: &TruckConfig) -> bool {
    body.pos.y > viewport.height + cfg.despawn_margin
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drives_left_by_speed_times_dt() {
        let cfg = TruckConfig::default();
        let mut body = Body::new(Vec2::new(100.0, 0.0), Vec2::splat(30.0));
        drive(&mut body, &cfg, 0.5);
        assert_eq!(body.pos.x, 75.0);
    }

    #[test]
    fn threshold_is_strict() {
        let cfg = TruckConfig::default();
        let vp = Viewport::new(640.0, 320.0);
        let mut body = Body::new(Vec2::new(0.0, 520.0), Vec2::splat(30.0));
        assert!(!fell_off(&body, &vp, &cfg));
        body.pos.y = 520.5;
        assert!(fell_off(&body, &vp, &cfg));
    }
}
