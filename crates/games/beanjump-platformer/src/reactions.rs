use glam::Vec2;

use beanjump_core::arena::EntityId;
use beanjump_core::timer::Scheduler;

use crate::config::ReactionConfig;
use crate::entity::{Entity, Kind};

/// Deferred work the session schedules on its timer queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Drop a truck next to this bucket, if it still exists.
    SpawnTruck { bucket: EntityId },
    /// End the player's post-hit grace period.
    RestoreTruckCollision,
    /// Shove the player back after a hit.
    Knockback,
    ResetScoreStyle,
}

/// Player ran into a truck: ignore trucks for the grace period and queue the
/// knockback. Both follow-ups are fire-and-forget.
pub fn truck_hit(player: &mut Entity, timers: &mut Scheduler<TimerAction>, cfg: &ReactionConfig) {
    tracing::debug!(x = player.body.pos.x, y = player.body.pos.y, "collided with truck");
    player.ignore = vec![Kind::Truck];
    timers.schedule_once(cfg.grace_period, TimerAction::RestoreTruckCollision);
    timers.schedule_once(cfg.knockback_delay, TimerAction::Knockback);
}

pub fn restore_truck_collision(player: &mut Entity) {
    player.ignore.clear();
}

/// One frame of knockback displacement.
pub fn knockback(player: &mut Entity, cfg: &ReactionConfig, dt: f32) {
    player
        .body
        .translate(Vec2::new(cfg.knockback_x, cfg.knockback_y), dt);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::fixtures::test_library;
    use crate::config::BeanJumpConfig;
    use crate::entity;
    use beanjump_core::physics::Collider;
    use beanjump_core::test_helpers::FRAME;

    #[test]
    fn hit_schedules_grace_and_knockback() {
        let cfg = BeanJumpConfig::default();
        let mut player = entity::player(&test_library(), &cfg).unwrap();
        let mut timers = Scheduler::new();
        truck_hit(&mut player, &mut timers, &cfg.reactions);
        assert!(player.ignores(Kind::Truck));

        let mut fired = Vec::new();
        for _ in 0..60 {
            fired.extend(timers.advance(FRAME));
        }
        assert_eq!(fired, vec![
            TimerAction::Knockback,
            TimerAction::RestoreTruckCollision
        ]);
        assert_eq!(timers.live_count(), 0);
    }

    #[test]
    fn knockback_scales_with_dt() {
        let cfg = BeanJumpConfig::default();
        let mut player = entity::player(&test_library(), &cfg).unwrap();
        let start = player.body.pos;
        knockback(&mut player, &cfg.reactions, 0.01);
        assert_eq!(player.body.pos - start, Vec2::new(-80.0, -200.0));
    }

    #[test]
    fn restore_clears_ignore_list() {
        let cfg = BeanJumpConfig::default();
        let mut player = entity::player(&test_library(), &cfg).unwrap();
        player.ignore = vec![Kind::Truck];
        restore_truck_collision(&mut player);
        assert!(!player.ignores(Kind::Truck));
    }
}
