use serde::{Deserialize, Serialize};

use beanjump_core::camera::Viewport;
use beanjump_core::physics::GRAVITY;

/// Top-level game configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BeanJumpConfig {
    pub viewport: ViewportConfig,
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    pub camera: CameraConfig,
    pub trucks: TruckConfig,
    pub reactions: ReactionConfig,
    pub score: ScoreConfig,
    pub level: LevelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f32,
    pub height: f32,
    /// Page background, RGB.
    pub background: [u8; 3],
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 320.0,
            background: [245, 225, 255],
        }
    }
}

impl ViewportConfig {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration (pixels/s^2).
    pub gravity: f32,
    pub tile_width: f32,
    pub tile_height: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            tile_width: 32.0,
            tile_height: 32.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Spawn point (sprite center).
    pub spawn_x: f32,
    pub spawn_y: f32,
    pub size: f32,
    pub area_scale: f32,
    /// Horizontal speed while a direction key is held (pixels/s).
    pub walk_speed: f32,
    /// Walk animation rate (frames/s).
    pub walk_anim_fps: f32,
    /// Extra horizontal speed applied on the frame a grounded charge starts.
    pub charge_nudge: f32,
    /// Jump velocity with no charge, and the value charge resets to.
    pub base_jump_velocity: f32,
    /// Cap applied to the charged velocity at release.
    pub max_jump_velocity: f32,
    /// Velocity added per tick while the charge key is held.
    pub charge_rate: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            spawn_x: 2752.0,
            spawn_y: 168.0,
            size: 48.0,
            area_scale: 0.75,
            walk_speed: 200.0,
            walk_anim_fps: 3.0,
            charge_nudge: 100.0,
            base_jump_velocity: 500.0,
            max_jump_velocity: 1200.0,
            charge_rate: 10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Fraction of viewport width past which the camera follows x.
    pub follow_x_fraction: f32,
    /// Fraction of viewport height above which the vertical lock applies.
    pub follow_y_fraction: f32,
    /// Camera y while the player is in the upper region.
    pub y_lock: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            follow_x_fraction: 0.66,
            follow_y_fraction: 0.75,
            y_lock: 320.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TruckConfig {
    /// Leftward speed (pixels/s).
    pub speed: f32,
    /// Trucks are removed once y > viewport height + this margin.
    pub despawn_margin: f32,
    pub size: f32,
    pub area_scale: f32,
    pub anim_speed: f32,
    /// Seconds between trucks from one bucket.
    pub spawn_interval: f32,
    /// Horizontal offset of a spawned truck from its bucket.
    pub spawn_offset_x: f32,
    pub spawned_mass: f32,
}

impl Default for TruckConfig {
    fn default() -> Self {
        Self {
            speed: 50.0,
            despawn_margin: 200.0,
            size: 30.0,
            area_scale: 0.75,
            anim_speed: 2.0,
            spawn_interval: 3.0,
            spawn_offset_x: -2.0,
            spawned_mass: 10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactionConfig {
    /// Seconds the player ignores trucks after a hit.
    pub grace_period: f32,
    /// Seconds between a hit and the knockback.
    pub knockback_delay: f32,
    /// Knockback displacement rate (pixels/s, applied for one frame).
    pub knockback_x: f32,
    pub knockback_y: f32,
}

impl Default for ReactionConfig {
    fn default() -> Self {
        Self {
            grace_period: 1.0,
            knockback_delay: 0.1,
            knockback_x: -8000.0,
            knockback_y: -20000.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    /// Points per power-up.
    pub increment: u32,
    pub text_size: f32,
    pub emphasis_scale: f32,
    pub emphasis_color: [u8; 3],
    pub base_color: [u8; 3],
    /// Seconds before the emphasis reverts.
    pub decay: f32,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            increment: 100,
            text_size: 18.0,
            emphasis_scale: 1.3,
            emphasis_color: [200, 100, 100],
            base_color: [255, 255, 255],
            decay: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Seed for the backfill dirt shuffle.
    pub seed: u64,
    /// Shuffled dirt rows appended under the level.
    pub backfill_rows: usize,
    /// Replaces the built-in level when set.
    pub rows: Option<Vec<String>>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            backfill_rows: 0,
            rows: None,
        }
    }
}

impl BeanJumpConfig {
    /// Parse a TOML document. Missing keys keep their defaults; callers
    /// decide what to do with a malformed document.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
