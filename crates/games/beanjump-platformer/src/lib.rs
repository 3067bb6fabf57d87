pub mod assets;
pub mod config;
pub mod controls;
pub mod entity;
pub mod jump;
pub mod level;
pub mod reactions;
pub mod scoring;
pub mod spawner;
pub mod tracker;
pub mod trucks;

use std::rc::Rc;

use glam::Vec2;
use serde::Serialize;

use beanjump_core::arena::{Arena, EntityId};
use beanjump_core::camera::{Camera, Viewport};
use beanjump_core::error::LoadError;
use beanjump_core::game_trait::{GameEvent, GameMetadata, SessionGame};
use beanjump_core::input::{InputState, Key};
use beanjump_core::physics::PhysicsWorld;
use beanjump_core::sprite::{AssetLibrary, SpriteSheet};
use beanjump_core::timer::Scheduler;

use config::BeanJumpConfig;
use entity::{Entity, Kind, Role, TRUCK_SPRITE};
use jump::{JumpCharge, JumpPhase};
use reactions::TimerAction;
use scoring::{ScoreBoard, TextStyle};

/// Observable state, serialized for diagnostics and tests.
#[derive(Debug, Serialize)]
struct Snapshot {
    tick: u64,
    clock: f64,
    paused: bool,
    score: u32,
    score_style: TextStyle,
    jump_velocity: f32,
    phase: JumpPhase,
    camera: Vec2,
    player: Vec2,
    player_vel: Vec2,
    entities: Vec<(Kind, Vec2)>,
}

/// One mounted game: the scene, its timers and the player's progress.
pub struct GameSession {
    config: BeanJumpConfig,
    viewport: Viewport,
    entities: Arena<Entity>,
    player: EntityId,
    physics: PhysicsWorld,
    timers: Scheduler<TimerAction>,
    camera: Camera,
    charge: JumpCharge,
    score: ScoreBoard,
    /// Charge key held during the last tick.
    charge_held: bool,
    truck_sheet: Rc<SpriteSheet>,
    paused: bool,
    tick: u64,
}

impl GameSession {
    /// Build the level and player. Any missing sprite aborts construction.
    pub fn new(config: BeanJumpConfig, assets: &AssetLibrary) -> Result<Self, LoadError> {
        let truck_sheet = assets.require(TRUCK_SPRITE)?;
        let rows = level::level_rows(&config.level);
        let tiles = level::build_level(&rows, assets, &config)?;
        let player = entity::player(assets, &config)?;

        let mut entities = Arena::with_capacity(tiles.len() + 1);
        for tile in tiles {
            entities.insert(tile);
        }
        let player = entities.insert(player);

        let viewport = config.viewport.viewport();
        Ok(Self {
            viewport,
            entities,
            player,
            physics: PhysicsWorld::new(config.physics.gravity),
            timers: Scheduler::new(),
            camera: Camera::new(&viewport),
            charge: JumpCharge::new(&config.player),
            score: ScoreBoard::new(&config.score),
            charge_held: false,
            truck_sheet,
            paused: false,
            tick: 0,
            config,
        })
    }

    pub fn config(&self) -> &BeanJumpConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn entities(&self) -> &Arena<Entity> {
        &self.entities
    }

    pub fn player_id(&self) -> EntityId {
        self.player
    }

    pub fn player(&self) -> Option<&Entity> {
        self.entities.get(self.player)
    }

    pub fn player_pos(&self) -> Vec2 {
        self.player().map(|p| p.body.pos).unwrap_or_default()
    }

    pub fn score(&self) -> u32 {
        self.score.score()
    }

    pub fn scoreboard(&self) -> &ScoreBoard {
        &self.score
    }

    /// Velocity the next grounded release would launch with (before the cap).
    pub fn jump_velocity(&self) -> f32 {
        self.charge.velocity()
    }

    pub fn jump_phase(&self) -> JumpPhase {
        let grounded = self.player().is_some_and(|p| p.body.grounded);
        JumpPhase::of(grounded, self.charge_held)
    }

    pub fn count(&self, kind: Kind) -> usize {
        self.entities.iter().filter(|(_, e)| e.kind() == kind).count()
    }

    /// Bucket spawn timers that can still fire.
    pub fn live_spawn_timers(&self) -> usize {
        self.timers.live_count_where(spawner::is_spawn_timer)
    }

    /// Remove an entity from the scene. A bucket's spawn timer dies with it.
    /// The player cannot be removed.
    pub fn destroy(&mut self, id: EntityId) -> bool {
        if id == self.player {
            return false;
        }
        self.physics.forget(id);
        self.entities.remove(id).is_some()
    }

    fn with_player(&mut self, f: impl FnOnce(&mut Entity, &BeanJumpConfig)) {
        if let Some(player) = self.entities.get_mut(self.player) {
            f(player, &self.config);
        }
    }

    fn apply_timer(&mut self, action: TimerAction, dt: f32, events: &mut Vec<GameEvent>) {
        match action {
            TimerAction::SpawnTruck { bucket } => {
                let Some(bucket) = self.entities.get(bucket) else {
                    return;
                };
                let truck = spawner::spawn_truck(
                    &bucket.body,
                    Rc::clone(&self.truck_sheet),
                    &self.config.trucks,
                );
                let pos = truck.body.pos;
                self.entities.insert(truck);
                events.push(GameEvent::TruckSpawned { x: pos.x, y: pos.y });
            },
            TimerAction::RestoreTruckCollision => {
                self.with_player(|player, _| reactions::restore_truck_collision(player));
            },
            TimerAction::Knockback => {
                self.with_player(|player, cfg| reactions::knockback(player, &cfg.reactions, dt));
            },
            TimerAction::ResetScoreStyle => self.score.settle(),
        }
    }

    /// Per-kind behaviour for every entity, in one pass.
    fn update_entities(&mut self, dt: f32, events: &mut Vec<GameEvent>) {
        let mut fallen = Vec::new();
        for id in self.entities.ids() {
            let Some(entity) = self.entities.get_mut(id) else {
                continue;
            };
            match &mut entity.role {
                Role::Player => {
                    tracker::track(
                        &mut self.camera,
                        entity.body.pos,
                        &self.viewport,
                        &self.config.camera,
                    );
                },
                Role::Truck => {
                    trucks::drive(&mut entity.body, &self.config.trucks, dt);
                    if trucks::fell_off(&entity.body, &self.viewport, &self.config.trucks) {
                        fallen.push(id);
                    }
                },
                Role::Bucket { spawner: timer } => {
                    spawner::ensure_timer(id, timer, &mut self.timers, &self.config.trucks);
                },
                Role::PowerUp(_) | Role::Ground(_) => {},
            }
        }

        for id in fallen {
            let Some(truck) = self.entities.get(id) else {
                continue;
            };
            let pos = truck.body.pos;
            tracing::debug!(
                x = pos.x,
                y = pos.y,
                height = self.viewport.height,
                "truck fell off the level"
            );
            self.destroy(id);
            events.push(GameEvent::TruckDespawned { x: pos.x, y: pos.y });
        }
    }

    fn animate(&mut self, dt: f32) {
        for (_, entity) in self.entities.iter_mut() {
            if let Some(sprite) = entity.sprite_mut() {
                sprite.advance(dt);
            }
        }
    }

    /// React to something the player started touching this tick.
    fn player_touched(&mut self, other: EntityId, events: &mut Vec<GameEvent>) {
        let Some(kind) = self.entities.get(other).map(Entity::kind) else {
            return;
        };
        match kind {
            Kind::Truck => {
                let Some(player) = self.entities.get_mut(self.player) else {
                    return;
                };
                reactions::truck_hit(player, &mut self.timers, &self.config.reactions);
                events.push(GameEvent::PlayerHit);
            },
            Kind::PowerUp => {
                if self.destroy(other) {
                    let score = self.score.award(&mut self.timers);
                    events.push(GameEvent::ScoreUpdate { score });
                }
            },
            Kind::Player | Kind::Bucket | Kind::Ground | Kind::Grass => {},
        }
    }

    fn snapshot(&self) -> Snapshot {
        let (player, player_vel) = self
            .player()
            .map(|p| (p.body.pos, p.body.vel))
            .unwrap_or_default();
        Snapshot {
            tick: self.tick,
            clock: self.timers.now(),
            paused: self.paused,
            score: self.score.score(),
            score_style: self.score.style(),
            jump_velocity: self.charge.velocity(),
            phase: self.jump_phase(),
            camera: self.camera.pos,
            player,
            player_vel,
            entities: self
                .entities
                .iter()
                .map(|(_, e)| (e.kind(), e.body.pos))
                .collect(),
        }
    }
}

impl SessionGame for GameSession {
    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Bean Jump".to_string(),
            description: "Charge your jumps, dodge the trucks, grab the snacks.".to_string(),
        }
    }

    fn update(&mut self, dt: f32, input: &InputState) -> Vec<GameEvent> {
        if self.paused {
            return Vec::new();
        }
        let mut events = Vec::new();

        for action in self.timers.advance(dt) {
            self.apply_timer(action, dt, &mut events);
        }

        self.charge_held = input.is_down(Key::Space);
        if let Some(player) = self.entities.get_mut(self.player)
            && let Some(velocity) =
                controls::handle_input(player, &mut self.charge, input, &self.config.player, dt)
        {
            events.push(GameEvent::Jumped { velocity });
        }

        self.update_entities(dt, &mut events);
        self.animate(dt);

        let contacts = self.physics.step(&mut self.entities, dt);
        for contact in contacts {
            if let Some(other) = contact.other(self.player) {
                self.player_touched(other, &mut events);
            }
        }

        self.tick += 1;
        events
    }

    fn serialize_state(&self) -> Vec<u8> {
        rmp_serde::to_vec(&self.snapshot()).expect("snapshot serialization must succeed")
    }

    /// Freeze the session. A charge in progress is dropped, since its key
    /// release will not be seen.
    fn pause(&mut self) {
        self.paused = true;
        self.charge_held = false;
        match self.entities.get_mut(self.player) {
            Some(player) => controls::cancel(player, &mut self.charge),
            None => {
                self.charge.release(false);
            },
        }
    }

    fn resume(&mut self) {
        self.paused = false;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}
