use glam::Vec2;

use beanjump_core::error::LoadError;
use beanjump_core::sprite::{FrameRect, SpriteSheet};

/// Where a sprite's pixels and frame data come from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpriteSource {
    /// Aseprite export: sheet image plus JSON frame/tag metadata.
    Aseprite {
        image: &'static str,
        json: &'static str,
    },
    /// A plain image drawn as one frame.
    Image { path: &'static str },
    /// A region of a shared atlas image.
    Atlas {
        image: &'static str,
        rect: FrameRect,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteAsset {
    pub name: &'static str,
    pub source: SpriteSource,
}

/// Every sprite the game loads, relative to the page's base URL.
pub const MANIFEST: &[SpriteAsset] = &[
    SpriteAsset {
        name: "coffee",
        source: SpriteSource::Aseprite {
            image: "coffee.png",
            json: "coffee.json",
        },
    },
    SpriteAsset {
        name: "dirt",
        source: SpriteSource::Aseprite {
            image: "dirt.png",
            json: "dirt.json",
        },
    },
    SpriteAsset {
        name: "grass",
        source: SpriteSource::Image { path: "grass.png" },
    },
    SpriteAsset {
        name: "mom",
        source: SpriteSource::Aseprite {
            image: "mom.png",
            json: "mom.json",
        },
    },
    SpriteAsset {
        name: "dino",
        source: SpriteSource::Aseprite {
            image: "dino-small.png",
            json: "dino-small.json",
        },
    },
    SpriteAsset {
        name: "pretzle",
        source: SpriteSource::Aseprite {
            image: "pretzle.png",
            json: "pretzle.json",
        },
    },
    SpriteAsset {
        name: "truck",
        source: SpriteSource::Aseprite {
            image: "monster-truck-template.png",
            json: "monster-truck-template.json",
        },
    },
    SpriteAsset {
        name: "stone1",
        source: SpriteSource::Atlas {
            image: "stone_packed.png",
            rect: FrameRect {
                x: 0.0,
                y: 0.0,
                w: 19.0,
                h: 19.0,
            },
        },
    },
];

impl SpriteAsset {
    pub fn image_path(&self) -> &'static str {
        match self.source {
            SpriteSource::Aseprite { image, .. } => image,
            SpriteSource::Image { path } => path,
            SpriteSource::Atlas { image, .. } => image,
        }
    }

    /// Key the renderer uses to find the backing image. Atlas slices share
    /// the atlas image.
    pub fn image_key(&self) -> &'static str {
        match self.source {
            SpriteSource::Atlas { image, .. } => image,
            SpriteSource::Aseprite { .. } | SpriteSource::Image { .. } => self.name,
        }
    }

    pub fn json_path(&self) -> Option<&'static str> {
        match self.source {
            SpriteSource::Aseprite { json, .. } => Some(json),
            SpriteSource::Image { .. } | SpriteSource::Atlas { .. } => None,
        }
    }

    /// Build the sheet once the image has decoded. `json` is the fetched
    /// metadata for Aseprite sprites and is ignored otherwise.
    pub fn build(&self, image_size: Vec2, json: Option<&str>) -> Result<SpriteSheet, LoadError> {
        match self.source {
            SpriteSource::Aseprite { json: path, .. } => {
                let json = json.ok_or_else(|| LoadError::Fetch {
                    path: path.to_string(),
                    reason: "metadata not loaded".to_string(),
                })?;
                SpriteSheet::from_aseprite_json(self.name, json)
            },
            SpriteSource::Image { .. } => {
                Ok(SpriteSheet::single(self.name, image_size.x, image_size.y))
            },
            SpriteSource::Atlas { image, rect } => Ok(SpriteSheet::slice(self.name, image, rect)),
        }
    }
}

pub fn find(name: &str) -> Option<&'static SpriteAsset> {
    MANIFEST.iter().find(|a| a.name == name)
}

#[cfg(any(test, feature = "test-helpers"))]
pub mod fixtures {
    use beanjump_core::sprite::{AnimDef, AnimDirection, AssetLibrary, FrameRect, SpriteSheet};

    fn strip(name: &str, frames: usize, size: f32, tags: &[(&str, usize, usize)]) -> SpriteSheet {
        SpriteSheet {
            name: name.to_string(),
            image: name.to_string(),
            frames: (0..frames)
                .map(|i| FrameRect {
                    x: i as f32 * size,
                    y: 0.0,
                    w: size,
                    h: size,
                })
                .collect(),
            anims: tags
                .iter()
                .map(|&(tag, from, to)| AnimDef {
                    name: tag.to_string(),
                    from,
                    to,
                    direction: AnimDirection::Forward,
                })
                .collect(),
        }
    }

    /// Metadata-only stand-ins for every manifest sprite.
    pub fn test_library() -> AssetLibrary {
        let mut lib = AssetLibrary::new();
        lib.insert(strip("dino", 4, 24.0, &[("walk", 1, 3)]));
        lib.insert(strip("coffee", 3, 16.0, &[("wiggle", 0, 2)]));
        lib.insert(strip("pretzle", 3, 16.0, &[("sparkle", 0, 2)]));
        lib.insert(strip("truck", 2, 30.0, &[("left", 0, 1)]));
        lib.insert(strip("mom", 1, 24.0, &[]));
        lib.insert(strip("dirt", 1, 32.0, &[]));
        lib.insert(SpriteSheet::single("grass", 32.0, 32.0));
        lib.insert(SpriteSheet::slice("stone1", "stone_packed.png", FrameRect {
            x: 0.0,
            y: 0.0,
            w: 19.0,
            h: 19.0,
        }));
        lib
    }

    /// Same as [`test_library`] but the player sheet has no `walk` tag.
    pub fn library_without_walk() -> AssetLibrary {
        let mut lib = test_library();
        lib.insert(strip("dino", 4, 24.0, &[]));
        lib
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_covers_every_level_sprite() {
        for name in ["coffee", "dirt", "grass", "dino", "pretzle", "truck", "stone1"] {
            assert!(find(name).is_some(), "{name} missing from manifest");
        }
    }

    #[test]
    fn stone_is_sliced_from_atlas() {
        let stone = find("stone1").unwrap();
        assert_eq!(stone.image_key(), "stone_packed.png");
        assert_eq!(stone.json_path(), None);
        let sheet = stone.build(Vec2::new(200.0, 200.0), None).unwrap();
        assert_eq!(sheet.frames[0].w, 19.0);
        assert_eq!(sheet.image, "stone_packed.png");
    }

    #[test]
    fn plain_image_uses_decoded_size() {
        let grass = find("grass").unwrap();
        let sheet = grass.build(Vec2::new(32.0, 40.0), None).unwrap();
        assert_eq!(sheet.frames[0].h, 40.0);
        assert_eq!(grass.image_key(), "grass");
    }

    #[test]
    fn aseprite_without_metadata_is_an_error() {
        let dino = find("dino").unwrap();
        assert_eq!(dino.json_path(), Some("dino-small.json"));
        let err = dino.build(Vec2::ZERO, None).unwrap_err();
        assert!(matches!(err, LoadError::Fetch { .. }));
    }
}
