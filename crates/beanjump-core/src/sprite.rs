use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::{AnimError, LoadError};

/// Default playback rate in frames per second.
pub const DEFAULT_ANIM_FPS: f32 = 10.0;

/// Source rectangle of one frame inside the sheet image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimDirection {
    #[default]
    Forward,
    Reverse,
    PingPong,
}

/// Named frame range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimDef {
    pub name: String,
    pub from: usize,
    pub to: usize,
    pub direction: AnimDirection,
}

/// A loaded sprite: which image to draw from, its frames and animations.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSheet {
    pub name: String,
    /// Key of the backing image (several sheets can slice one atlas).
    pub image: String,
    pub frames: Vec<FrameRect>,
    pub anims: Vec<AnimDef>,
}

#[derive(Deserialize)]
struct AsepriteFile {
    frames: AsepriteFrames,
    #[serde(default)]
    meta: AsepriteMeta,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AsepriteFrames {
    List(Vec<AsepriteFrame>),
    Map(serde_json::Map<String, serde_json::Value>),
}

#[derive(Deserialize)]
struct AsepriteFrame {
    frame: AsepriteRect,
}

#[derive(Deserialize)]
struct AsepriteRect {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

#[derive(Deserialize, Default)]
struct AsepriteMeta {
    #[serde(default, rename = "frameTags")]
    frame_tags: Vec<AsepriteTag>,
}

#[derive(Deserialize)]
struct AsepriteTag {
    name: String,
    from: usize,
    to: usize,
    #[serde(default)]
    direction: String,
}

impl SpriteSheet {
    /// A sheet with a single frame covering the whole image.
    pub fn single(name: &str, width: f32, height: f32) -> Self {
        Self::slice(name, name, FrameRect {
            x: 0.0,
            y: 0.0,
            w: width,
            h: height,
        })
    }

    /// A single-frame sheet cut from a region of a shared atlas image.
    pub fn slice(name: &str, image: &str, rect: FrameRect) -> Self {
        Self {
            name: name.to_string(),
            image: image.to_string(),
            frames: vec![rect],
            anims: Vec::new(),
        }
    }

    /// Parse Aseprite JSON export metadata (array or hash frame layout).
    pub fn from_aseprite_json(name: &str, json: &str) -> Result<Self, LoadError> {
        let bad = |reason: String| LoadError::Metadata {
            name: name.to_string(),
            reason,
        };
        let file: AsepriteFile = serde_json::from_str(json).map_err(|e| bad(e.to_string()))?;

        let frames: Vec<AsepriteFrame> = match file.frames {
            AsepriteFrames::List(frames) => frames,
            AsepriteFrames::Map(map) => map
                .into_iter()
                .map(|(_, v)| serde_json::from_value(v))
                .collect::<Result<_, _>>()
                .map_err(|e| bad(e.to_string()))?,
        };
        if frames.is_empty() {
            return Err(bad("no frames".to_string()));
        }
        let frames: Vec<FrameRect> = frames
            .into_iter()
            .map(|f| FrameRect {
                x: f.frame.x,
                y: f.frame.y,
                w: f.frame.w,
                h: f.frame.h,
            })
            .collect();

        let mut anims = Vec::with_capacity(file.meta.frame_tags.len());
        for tag in file.meta.frame_tags {
            if tag.from > tag.to || tag.to >= frames.len() {
                return Err(bad(format!(
                    "tag '{}' spans {}..={} but sheet has {} frames",
                    tag.name,
                    tag.from,
                    tag.to,
                    frames.len()
                )));
            }
            let direction = match tag.direction.as_str() {
                "reverse" => AnimDirection::Reverse,
                "pingpong" => AnimDirection::PingPong,
                _ => AnimDirection::Forward,
            };
            anims.push(AnimDef {
                name: tag.name,
                from: tag.from,
                to: tag.to,
                direction,
            });
        }

        Ok(Self {
            name: name.to_string(),
            image: name.to_string(),
            frames,
            anims,
        })
    }

    pub fn anim(&self, name: &str) -> Option<&AnimDef> {
        self.anims.iter().find(|a| a.name == name)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

/// Every sprite sheet available to a scene, keyed by sprite name.
#[derive(Debug, Clone, Default)]
pub struct AssetLibrary {
    sheets: HashMap<String, Rc<SpriteSheet>>,
}

impl AssetLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sheet: SpriteSheet) {
        let name = sheet.name.clone();
        if self.sheets.insert(name.clone(), Rc::new(sheet)).is_some() {
            tracing::warn!(sprite = %name, "sprite sheet loaded twice, keeping the latest");
        }
    }

    pub fn get(&self, name: &str) -> Option<Rc<SpriteSheet>> {
        self.sheets.get(name).map(Rc::clone)
    }

    /// Look up a sheet the scene cannot do without.
    pub fn require(&self, name: &str) -> Result<Rc<SpriteSheet>, LoadError> {
        self.get(name)
            .ok_or_else(|| LoadError::MissingAsset(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sheets.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

/// How to play an animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayOptions {
    pub looping: bool,
    pub pingpong: bool,
    /// Frames per second.
    pub speed: f32,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            looping: false,
            pingpong: false,
            speed: DEFAULT_ANIM_FPS,
        }
    }
}

#[derive(Debug, Clone)]
struct Playback {
    name: String,
    from: usize,
    to: usize,
    opts: PlayOptions,
    timer: f32,
    step: isize,
}

/// Drawable sprite state attached to an entity.
#[derive(Debug, Clone)]
pub struct Sprite {
    pub sheet: Rc<SpriteSheet>,
    pub frame: usize,
    pub width: f32,
    pub height: f32,
    /// Multiplier applied to every animation played on this sprite.
    pub anim_speed: f32,
    playback: Option<Playback>,
}

impl Sprite {
    pub fn new(sheet: Rc<SpriteSheet>, width: f32, height: f32) -> Self {
        Self {
            sheet,
            frame: 0,
            width,
            height,
            anim_speed: 1.0,
            playback: None,
        }
    }

    pub fn with_anim_speed(mut self, anim_speed: f32) -> Self {
        self.anim_speed = anim_speed;
        self
    }

    /// Start the named animation from its first frame.
    pub fn play(&mut self, name: &str, opts: PlayOptions) -> Result<(), AnimError> {
        let def = self.sheet.anim(name).ok_or_else(|| AnimError::Undefined {
            sheet: self.sheet.name.clone(),
            anim: name.to_string(),
        })?;
        let (start, step) = match def.direction {
            AnimDirection::Reverse => (def.to, -1),
            AnimDirection::Forward | AnimDirection::PingPong => (def.from, 1),
        };
        let pingpong = opts.pingpong || def.direction == AnimDirection::PingPong;
        self.frame = start;
        self.playback = Some(Playback {
            name: def.name.clone(),
            from: def.from,
            to: def.to,
            opts: PlayOptions { pingpong, ..opts },
            timer: 0.0,
            step,
        });
        Ok(())
    }

    /// Stop the current animation, leaving the frame where it is.
    pub fn stop(&mut self) {
        self.playback = None;
    }

    pub fn current_anim(&self) -> Option<&str> {
        self.playback.as_ref().map(|p| p.name.as_str())
    }

    /// Move the animation forward by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        let Some(pb) = self.playback.as_mut() else {
            return;
        };
        let fps = pb.opts.speed * self.anim_speed;
        if fps <= 0.0 || pb.from == pb.to {
            return;
        }
        let interval = 1.0 / fps;
        pb.timer += dt;
        while pb.timer >= interval {
            pb.timer -= interval;
            let next = self.frame as isize + pb.step;
            if next >= pb.from as isize && next <= pb.to as isize {
                self.frame = next as usize;
                continue;
            }
            if pb.opts.pingpong {
                pb.step = -pb.step;
                self.frame = (self.frame as isize + pb.step) as usize;
                if !pb.opts.looping && self.frame == pb.from {
                    self.playback = None;
                    return;
                }
            } else if pb.opts.looping {
                self.frame = if pb.step > 0 { pb.from } else { pb.to };
            } else {
                self.playback = None;
                return;
            }
        }
    }

    /// Source rectangle of the frame currently shown.
    pub fn frame_rect(&self) -> Option<FrameRect> {
        self.sheet.frames.get(self.frame).copied()
    }
}
