use std::rc::Rc;

use glam::Vec2;

use beanjump_core::arena::EntityId;
use beanjump_core::physics::Body;
use beanjump_core::sprite::SpriteSheet;
use beanjump_core::timer::{Scheduler, TimerHandle};

use crate::config::TruckConfig;
use crate::entity::{self, Entity};
use crate::reactions::TimerAction;

/// Start the bucket's repeating truck timer unless it already has one.
/// Returns whether a timer was created.
pub fn ensure_timer(
    bucket: EntityId,
    spawner: &mut Option<TimerHandle>,
    timers: &mut Scheduler<TimerAction>,
    cfg: &TruckConfig,
) -> bool {
    if spawner.is_some() {
        return false;
    }
    let handle = timers.schedule_repeating(cfg.spawn_interval, TimerAction::SpawnTruck { bucket });
    tracing::debug!(?bucket, timer = handle.id(), "bucket spawner started");
    *spawner = Some(handle);
    true
}

/// A heavy truck dropped beside the bucket's current position.
pub fn spawn_truck(bucket: &Body, sheet: Rc<SpriteSheet>, cfg: &TruckConfig) -> Entity {
    let pos = bucket.pos + Vec2::new(cfg.spawn_offset_x, 0.0);
    entity::truck(sheet, pos, cfg, cfg.spawned_mass)
}

pub fn is_spawn_timer(action: &TimerAction) -> bool {
    matches!(action, TimerAction::SpawnTruck { .. })
}
