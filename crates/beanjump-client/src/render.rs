use glam::Vec2;

use beanjump_core::sprite::FrameRect;
use beanjump_platformer::GameSession;
use beanjump_platformer::entity::Look;

/// Score readout position in screen space.
pub const SCORE_POS: Vec2 = Vec2::ZERO;

/// One drawing operation, in viewport pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear {
        color: [u8; 3],
    },
    Image {
        image: String,
        src: FrameRect,
        pos: Vec2,
        size: Vec2,
    },
    Rect {
        pos: Vec2,
        size: Vec2,
        color: [u8; 3],
    },
    Text {
        text: String,
        pos: Vec2,
        size: f32,
        color: [u8; 3],
    },
}

fn visible(pos: Vec2, size: Vec2, view: Vec2) -> bool {
    pos.x + size.x >= 0.0 && pos.y + size.y >= 0.0 && pos.x <= view.x && pos.y <= view.y
}

/// Everything to draw for the current frame, back to front. Off-screen
/// entities are culled.
pub fn draw_list(session: &GameSession) -> Vec<DrawCmd> {
    let viewport = session.viewport();
    let camera = session.camera();
    let view = Vec2::new(viewport.width, viewport.height);

    let mut cmds = vec![DrawCmd::Clear {
        color: session.config().viewport.background,
    }];

    for (_, entity) in session.entities().iter() {
        let pos = viewport.to_screen(entity.body.top_left(), camera);
        match &entity.look {
            Look::Sprite(sprite) => {
                let size = Vec2::new(sprite.width, sprite.height);
                if !visible(pos, size, view) {
                    continue;
                }
                let Some(src) = sprite.frame_rect() else {
                    continue;
                };
                cmds.push(DrawCmd::Image {
                    image: sprite.sheet.image.clone(),
                    src,
                    pos,
                    size,
                });
            },
            Look::Rect { color } => {
                let size = entity.body.size;
                if visible(pos, size, view) {
                    cmds.push(DrawCmd::Rect {
                        pos,
                        size,
                        color: *color,
                    });
                }
            },
        }
    }

    let board = session.scoreboard();
    let style = board.style();
    cmds.push(DrawCmd::Text {
        text: board.text(),
        pos: SCORE_POS,
        size: board.text_size() * style.scale,
        color: style.color,
    });
    cmds
}

pub fn css_color([r, g, b]: [u8; 3]) -> String {
    format!("rgb({r}, {g}, {b})")
}

#[cfg(target_family = "wasm")]
pub use canvas::Painter;

#[cfg(target_family = "wasm")]
mod canvas {
    use std::collections::HashMap;

    use wasm_bindgen::JsCast;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

    use super::{DrawCmd, css_color};

    /// Canvas2D backend for a draw list.
    pub struct Painter {
        ctx: CanvasRenderingContext2d,
        width: f64,
        height: f64,
        images: HashMap<String, HtmlImageElement>,
    }

    impl Painter {
        pub fn new(
            canvas: &HtmlCanvasElement,
            images: HashMap<String, HtmlImageElement>,
        ) -> Result<Self, String> {
            let ctx = canvas
                .get_context("2d")
                .map_err(|_| "2d context request failed")?
                .ok_or("No 2d context")?
                .dyn_into::<CanvasRenderingContext2d>()
                .map_err(|_| "Not a 2d context")?;
            ctx.set_image_smoothing_enabled(false);
            Ok(Self {
                ctx,
                width: f64::from(canvas.width()),
                height: f64::from(canvas.height()),
                images,
            })
        }

        pub fn paint(&self, cmds: &[DrawCmd]) {
            let ctx = &self.ctx;
            for cmd in cmds {
                match cmd {
                    DrawCmd::Clear { color } => {
                        ctx.set_fill_style_str(&css_color(*color));
                        ctx.fill_rect(0.0, 0.0, self.width, self.height);
                    },
                    DrawCmd::Image {
                        image,
                        src,
                        pos,
                        size,
                    } => {
                        let Some(img) = self.images.get(image) else {
                            continue;
                        };
                        let _ = ctx
                            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                                img,
                                f64::from(src.x),
                                f64::from(src.y),
                                f64::from(src.w),
                                f64::from(src.h),
                                f64::from(pos.x),
                                f64::from(pos.y),
                                f64::from(size.x),
                                f64::from(size.y),
                            );
                    },
                    DrawCmd::Rect { pos, size, color } => {
                        ctx.set_fill_style_str(&css_color(*color));
                        ctx.fill_rect(
                            f64::from(pos.x),
                            f64::from(pos.y),
                            f64::from(size.x),
                            f64::from(size.y),
                        );
                    },
                    DrawCmd::Text {
                        text,
                        pos,
                        size,
                        color,
                    } => {
                        ctx.set_fill_style_str(&css_color(*color));
                        ctx.set_font(&format!("{size}px monospace"));
                        ctx.set_text_baseline("top");
                        let _ = ctx.fill_text(text, f64::from(pos.x), f64::from(pos.y));
                    },
                }
            }
        }
    }
}
