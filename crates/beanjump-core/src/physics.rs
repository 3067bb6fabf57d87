use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::arena::{Arena, EntityId};

/// Default gravity (pixels/s^2, screen space: +y is down).
pub const GRAVITY: f32 = 4000.0;
/// Slack used when deciding which side a body came from.
const SIDE_TOLERANCE: f32 = 0.01;

/// Axis-aligned bounding box in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Strict overlap: boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.max.y > other.min.y
            && self.min.y < other.max.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

/// Which point of the sprite box `Body::pos` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Anchor {
    #[default]
    TopLeft,
    Center,
}

/// Position, extent and rigid-body state of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    /// Size of the drawn sprite box.
    pub size: Vec2,
    pub anchor: Anchor,
    /// Collider size relative to the sprite box, centered in it.
    pub area_scale: f32,
    /// Collider displacement from the sprite box.
    pub area_offset: Vec2,
    pub vel: Vec2,
    pub is_static: bool,
    /// Reports contact but never pushes anything out.
    pub sensor: bool,
    pub mass: f32,
    /// Resting on a static body after the last physics step.
    pub grounded: bool,
    /// Position at the end of the previous step, used to find the side a
    /// penetration came from.
    prev_pos: Vec2,
}

impl Body {
    /// A dynamic body anchored at its top-left corner.
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            anchor: Anchor::TopLeft,
            area_scale: 1.0,
            area_offset: Vec2::ZERO,
            vel: Vec2::ZERO,
            is_static: false,
            sensor: false,
            mass: 1.0,
            grounded: false,
            prev_pos: pos,
        }
    }

    pub fn fixed(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// A static body that only detects overlap.
    pub fn sensor(mut self) -> Self {
        self.is_static = true;
        self.sensor = true;
        self
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_area_scale(mut self, scale: f32) -> Self {
        self.area_scale = scale;
        self
    }

    pub fn with_area_offset(mut self, offset: Vec2) -> Self {
        self.area_offset = offset;
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Top-left corner of the sprite box.
    pub fn top_left(&self) -> Vec2 {
        match self.anchor {
            Anchor::TopLeft => self.pos,
            Anchor::Center => self.pos - self.size * 0.5,
        }
    }

    /// Collider box at the current position.
    pub fn aabb(&self) -> Aabb {
        self.aabb_at(self.pos)
    }

    fn aabb_at(&self, pos: Vec2) -> Aabb {
        let top_left = match self.anchor {
            Anchor::TopLeft => pos,
            Anchor::Center => pos - self.size * 0.5,
        };
        let area = self.size * self.area_scale;
        let min = top_left + (self.size - area) * 0.5 + self.area_offset;
        Aabb::new(min, min + area)
    }

    /// Displace by `velocity * dt` without touching the body's own velocity.
    pub fn translate(&mut self, velocity: Vec2, dt: f32) {
        self.pos += velocity * dt;
    }

    /// Launch upward with `force` pixels/s.
    pub fn jump(&mut self, force: f32) {
        self.vel.y = -force;
        self.grounded = false;
    }
}

/// Anything the physics step can move and test for contact.
pub trait Collider {
    /// Tag used by collision-ignore lists.
    type Kind: Copy + Eq;

    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;
    fn kind(&self) -> Self::Kind;
    /// Whether this collider skips contact with entities of `other` kind.
    fn ignores(&self, other: Self::Kind) -> bool;
}

/// A pair of entities whose colliders started overlapping this step.
/// `a` is always the smaller id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Contact {
    pub a: EntityId,
    pub b: EntityId,
}

impl Contact {
    fn new(x: EntityId, y: EntityId) -> Self {
        if x <= y {
            Self { a: x, b: y }
        } else {
            Self { a: y, b: x }
        }
    }

    /// The other participant, if `id` is part of this contact.
    pub fn other(&self, id: EntityId) -> Option<EntityId> {
        if self.a == id {
            Some(self.b)
        } else if self.b == id {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Gravity integration, static resolution and contact tracking.
///
/// Dynamic bodies are pushed out of static ones; dynamic pairs and sensors
/// only report contact.
#[derive(Debug)]
pub struct PhysicsWorld {
    pub gravity: f32,
    active: HashSet<Contact>,
}

impl PhysicsWorld {
    pub fn new(gravity: f32) -> Self {
        Self {
            gravity,
            active: HashSet::new(),
        }
    }

    /// Advance every dynamic body by `dt` and return contacts that began.
    pub fn step<T: Collider>(&mut self, arena: &mut Arena<T>, dt: f32) -> Vec<Contact> {
        let ids = arena.ids();

        for &id in &ids {
            let Some(entity) = arena.get_mut(id) else {
                continue;
            };
            let body = entity.body_mut();
            if body.is_static {
                continue;
            }
            body.vel.y += self.gravity * dt;
            body.pos += body.vel * dt;
            body.grounded = false;
        }

        let mut touching = HashSet::new();
        for &a in &ids {
            let Some(entity_a) = arena.get(a) else {
                continue;
            };
            if entity_a.body().is_static {
                continue;
            }
            for &b in &ids {
                if a == b {
                    continue;
                }
                let Some(entity_b) = arena.get(b) else {
                    continue;
                };
                let Some(entity_a) = arena.get(a) else {
                    break;
                };
                if entity_a.ignores(entity_b.kind()) || entity_b.ignores(entity_a.kind()) {
                    continue;
                }
                let other = entity_b.body().aabb();
                let other_solid = entity_b.body().is_static && !entity_b.body().sensor;
                if !entity_a.body().aabb().overlaps(&other) {
                    continue;
                }
                touching.insert(Contact::new(a, b));
                if other_solid && let Some(entity_a) = arena.get_mut(a) {
                    resolve_against_static(entity_a.body_mut(), &other);
                }
            }
        }

        for &id in &ids {
            if let Some(entity) = arena.get_mut(id) {
                let body = entity.body_mut();
                body.prev_pos = body.pos;
            }
        }

        let mut began: Vec<Contact> = touching.difference(&self.active).copied().collect();
        began.sort_by_key(|c| (c.a, c.b));
        self.active = touching;
        began
    }

    /// Drop contact memory for an entity that left the scene.
    pub fn forget(&mut self, id: EntityId) {
        self.active.retain(|c| c.a != id && c.b != id);
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(GRAVITY)
    }
}

/// Push a dynamic body out of a static box along the side it entered from,
/// falling back to the axis of minimum penetration.
fn resolve_against_static(body: &mut Body, other: &Aabb) {
    let prev = body.aabb_at(body.prev_pos);
    let cur = body.aabb();

    let overlap_left = cur.max.x - other.min.x;
    let overlap_right = other.max.x - cur.min.x;
    let overlap_top = cur.max.y - other.min.y;
    let overlap_bottom = other.max.y - cur.min.y;

    if prev.max.y <= other.min.y + SIDE_TOLERANCE {
        land(body, overlap_top);
    } else if prev.min.y >= other.max.y - SIDE_TOLERANCE {
        bump_head(body, overlap_bottom);
    } else if prev.max.x <= other.min.x + SIDE_TOLERANCE {
        body.pos.x -= overlap_left;
        body.vel.x = 0.0;
    } else if prev.min.x >= other.max.x - SIDE_TOLERANCE {
        body.pos.x += overlap_right;
        body.vel.x = 0.0;
    } else {
        let min_overlap = overlap_left
            .min(overlap_right)
            .min(overlap_top)
            .min(overlap_bottom);
        if min_overlap == overlap_top {
            land(body, overlap_top);
        } else if min_overlap == overlap_bottom {
            bump_head(body, overlap_bottom);
        } else if min_overlap == overlap_left {
            body.pos.x -= overlap_left;
            body.vel.x = 0.0;
        } else {
            body.pos.x += overlap_right;
            body.vel.x = 0.0;
        }
    }
}

fn land(body: &mut Body, overlap: f32) {
    body.pos.y -= overlap;
    if body.vel.y > 0.0 {
        body.vel.y = 0.0;
    }
    body.grounded = true;
}

fn bump_head(body: &mut Body, overlap: f32) {
    body.pos.y += overlap;
    if body.vel.y < 0.0 {
        body.vel.y = 0.0;
    }
}
