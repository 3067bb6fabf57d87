use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Size of the visible play area in world pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// World position to viewport position for a camera centered on `camera`.
    pub fn to_screen(&self, world: Vec2, camera: &Camera) -> Vec2 {
        world - camera.pos + self.center()
    }
}

/// Camera position: the world point drawn at the viewport center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub pos: Vec2,
}

impl Camera {
    /// A camera looking at the viewport's own center, i.e. no scroll.
    pub fn new(viewport: &Viewport) -> Self {
        Self {
            pos: viewport.center(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_is_identity() {
        let vp = Viewport::new(640.0, 320.0);
        let cam = Camera::new(&vp);
        assert_eq!(vp.to_screen(Vec2::new(10.0, 20.0), &cam), Vec2::new(10.0, 20.0));
    }

    #[test]
    fn scrolled_camera_shifts_world() {
        let vp = Viewport::new(640.0, 320.0);
        let cam = Camera {
            pos: Vec2::new(1000.0, 160.0),
        };
        assert_eq!(vp.to_screen(Vec2::new(1000.0, 160.0), &cam), vp.center());
    }
}
