use std::rc::Rc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use beanjump_core::error::LoadError;
use beanjump_core::physics::{Anchor, Body, Collider};
use beanjump_core::sprite::{AssetLibrary, PlayOptions, Sprite, SpriteSheet};
use beanjump_core::timer::TimerHandle;

use crate::config::{BeanJumpConfig, TruckConfig};

/// Player sprite.
pub const PLAYER_SPRITE: &str = "dino";
pub const TRUCK_SPRITE: &str = "truck";
/// Bucket fill color (yellow).
pub const BUCKET_COLOR: [u8; 3] = [255, 255, 0];
pub const BUCKET_SIZE: f32 = 60.0;

/// Collision tag. Ignore lists are expressed in these.
///
/// Grass is its own tag: buckets pass through ground but rest on grass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Player,
    Truck,
    PowerUp,
    Bucket,
    Ground,
    Grass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpSkin {
    Coffee,
    Pretzel,
}

impl PowerUpSkin {
    pub fn sprite(&self) -> &'static str {
        match self {
            PowerUpSkin::Coffee => "coffee",
            PowerUpSkin::Pretzel => "pretzle",
        }
    }

    /// Animation played while the power-up sits in the level.
    pub fn idle_anim(&self) -> &'static str {
        match self {
            PowerUpSkin::Coffee => "wiggle",
            PowerUpSkin::Pretzel => "sparkle",
        }
    }

    pub fn idle_options(&self) -> PlayOptions {
        match self {
            PowerUpSkin::Coffee => PlayOptions {
                looping: true,
                ..Default::default()
            },
            PowerUpSkin::Pretzel => PlayOptions {
                looping: true,
                pingpong: true,
                speed: 0.5,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroundSkin {
    Grass,
    Dirt,
    Stone,
}

impl GroundSkin {
    pub fn sprite(&self) -> &'static str {
        match self {
            GroundSkin::Grass => "grass",
            GroundSkin::Dirt => "dirt",
            GroundSkin::Stone => "stone1",
        }
    }
}

/// Behaviour of an entity. Per-tick logic matches on this exhaustively.
#[derive(Debug)]
pub enum Role {
    Player,
    Truck,
    PowerUp(PowerUpSkin),
    /// The spawn timer is owned here; dropping the bucket cancels it.
    Bucket { spawner: Option<TimerHandle> },
    Ground(GroundSkin),
}

impl Role {
    pub fn kind(&self) -> Kind {
        match self {
            Role::Player => Kind::Player,
            Role::Truck => Kind::Truck,
            Role::PowerUp(_) => Kind::PowerUp,
            Role::Bucket { .. } => Kind::Bucket,
            Role::Ground(GroundSkin::Grass) => Kind::Grass,
            Role::Ground(GroundSkin::Dirt | GroundSkin::Stone) => Kind::Ground,
        }
    }
}

/// How an entity is drawn.
#[derive(Debug, Clone)]
pub enum Look {
    Sprite(Sprite),
    Rect { color: [u8; 3] },
}

/// One scene object.
#[derive(Debug)]
pub struct Entity {
    pub body: Body,
    pub look: Look,
    /// Kinds this entity's collider does not react to.
    pub ignore: Vec<Kind>,
    pub role: Role,
}

impl Collider for Entity {
    type Kind = Kind;

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn kind(&self) -> Kind {
        self.role.kind()
    }

    fn ignores(&self, other: Kind) -> bool {
        self.ignore.contains(&other)
    }
}

impl Entity {
    pub fn kind(&self) -> Kind {
        self.role.kind()
    }

    pub fn sprite(&self) -> Option<&Sprite> {
        match &self.look {
            Look::Sprite(sprite) => Some(sprite),
            Look::Rect { .. } => None,
        }
    }

    pub fn sprite_mut(&mut self) -> Option<&mut Sprite> {
        match &mut self.look {
            Look::Sprite(sprite) => Some(sprite),
            Look::Rect { .. } => None,
        }
    }
}

/// Size of a sheet's first frame, or `fallback` for empty sheets.
fn natural_size(sheet: &SpriteSheet, fallback: Vec2) -> Vec2 {
    sheet
        .frames
        .first()
        .map(|f| Vec2::new(f.w, f.h))
        .unwrap_or(fallback)
}

/// Start an idle animation. Sheets without it just show frame 0.
fn play_idle(sprite: &mut Sprite, anim: &str, opts: PlayOptions) {
    if let Err(e) = sprite.play(anim, opts) {
        tracing::debug!("{e}; showing a still frame");
    }
}

pub fn player(assets: &AssetLibrary, cfg: &BeanJumpConfig) -> Result<Entity, LoadError> {
    let sheet = assets.require(PLAYER_SPRITE)?;
    let size = Vec2::splat(cfg.player.size);
    Ok(Entity {
        body: Body::new(Vec2::new(cfg.player.spawn_x, cfg.player.spawn_y), size)
            .with_anchor(Anchor::Center)
            .with_area_scale(cfg.player.area_scale),
        look: Look::Sprite(Sprite::new(sheet, size.x, size.y)),
        ignore: Vec::new(),
        role: Role::Player,
    })
}

pub fn ground(
    assets: &AssetLibrary,
    skin: GroundSkin,
    pos: Vec2,
    tile: Vec2,
) -> Result<Entity, LoadError> {
    let sheet = assets.require(skin.sprite())?;
    let (size, offset) = match skin {
        GroundSkin::Grass => (tile, Vec2::new(0.0, 8.0)),
        GroundSkin::Stone => (tile, Vec2::ZERO),
        GroundSkin::Dirt => (natural_size(&sheet, tile), Vec2::ZERO),
    };
    Ok(Entity {
        body: Body::new(pos, size).fixed().with_area_offset(offset),
        look: Look::Sprite(Sprite::new(sheet, size.x, size.y)),
        ignore: Vec::new(),
        role: Role::Ground(skin),
    })
}

pub fn power_up(
    assets: &AssetLibrary,
    skin: PowerUpSkin,
    pos: Vec2,
    tile: Vec2,
) -> Result<Entity, LoadError> {
    let sheet = assets.require(skin.sprite())?;
    let size = natural_size(&sheet, tile);
    let mut sprite = Sprite::new(sheet, size.x, size.y);
    play_idle(&mut sprite, skin.idle_anim(), skin.idle_options());
    Ok(Entity {
        body: Body::new(pos, size).sensor().with_area_scale(0.75),
        look: Look::Sprite(sprite),
        ignore: vec![Kind::Truck],
        role: Role::PowerUp(skin),
    })
}

/// A truck as placed in the level or dropped by a bucket.
pub fn truck(sheet: Rc<SpriteSheet>, pos: Vec2, cfg: &TruckConfig, mass: f32) -> Entity {
    let size = Vec2::splat(cfg.size);
    let mut sprite = Sprite::new(sheet, size.x, size.y).with_anim_speed(cfg.anim_speed);
    play_idle(&mut sprite, "left", PlayOptions {
        looping: true,
        ..Default::default()
    });
    Entity {
        body: Body::new(pos, size)
            .with_area_scale(cfg.area_scale)
            .with_mass(mass),
        look: Look::Sprite(sprite),
        ignore: vec![Kind::Bucket],
        role: Role::Truck,
    }
}

pub fn bucket(pos: Vec2) -> Entity {
    Entity {
        body: Body::new(pos, Vec2::splat(BUCKET_SIZE)),
        look: Look::Rect {
            color: BUCKET_COLOR,
        },
        ignore: vec![Kind::Truck, Kind::Ground],
        role: Role::Bucket { spawner: None },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::fixtures::test_library;

    #[test]
    fn grass_is_not_ground() {
        assert_eq!(Role::Ground(GroundSkin::Grass).kind(), Kind::Grass);
        assert_eq!(Role::Ground(GroundSkin::Stone).kind(), Kind::Ground);
        assert_eq!(Role::Ground(GroundSkin::Dirt).kind(), Kind::Ground);
    }

    #[test]
    fn bucket_ignores_trucks_and_ground_but_not_grass() {
        let b = bucket(Vec2::ZERO);
        assert!(b.ignores(Kind::Truck));
        assert!(b.ignores(Kind::Ground));
        assert!(!b.ignores(Kind::Grass));
    }

    #[test]
    fn player_is_centered_and_scaled() {
        let cfg = BeanJumpConfig::default();
        let p = player(&test_library(), &cfg).unwrap();
        assert_eq!(p.body.anchor, Anchor::Center);
        assert_eq!(p.body.pos, Vec2::new(2752.0, 168.0));
        let aabb = p.body.aabb();
        assert_eq!(aabb.max - aabb.min, Vec2::splat(36.0));
    }

    #[test]
    fn power_up_plays_idle_animation() {
        let lib = test_library();
        let p = power_up(&lib, PowerUpSkin::Pretzel, Vec2::ZERO, Vec2::splat(32.0)).unwrap();
        assert_eq!(p.sprite().and_then(|s| s.current_anim()), Some("sparkle"));
        assert!(p.body.is_static);
        assert!(p.ignores(Kind::Truck));
    }

    #[test]
    fn missing_sprite_is_reported() {
        let lib = AssetLibrary::new();
        let err = ground(&lib, GroundSkin::Grass, Vec2::ZERO, Vec2::splat(32.0)).unwrap_err();
        assert_eq!(err, LoadError::MissingAsset("grass".into()));
    }
}
