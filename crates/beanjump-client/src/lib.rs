pub mod app;
mod diag;
#[cfg(target_family = "wasm")]
mod listeners;
#[cfg(target_family = "wasm")]
mod loader;
pub mod render;

use beanjump_platformer::config::BeanJumpConfig;

use diag::console_warn;

/// Tuning shipped with the page.
pub const EMBEDDED_CONFIG: &str = include_str!("../../../config/beanjump.toml");
/// Element id used when `mount` is called without a container.
pub const DEFAULT_CONTAINER_ID: &str = "game";
/// Directory the sprite files are served from, relative to the page.
pub const ASSET_BASE: &str = "./";
/// Canvas resolution; the page scales it with CSS.
pub const CANVAS_WIDTH: u32 = 640;
pub const CANVAS_HEIGHT: u32 = 320;

/// Parse the embedded tuning, falling back to defaults.
pub fn config() -> BeanJumpConfig {
    config_from(EMBEDDED_CONFIG)
}

fn config_from(content: &str) -> BeanJumpConfig {
    match BeanJumpConfig::from_toml_str(content) {
        Ok(cfg) => cfg,
        Err(e) => {
            console_warn!("Failed to parse embedded config: {e}, using defaults");
            BeanJumpConfig::default()
        },
    }
}

pub fn asset_url(path: &str) -> String {
    format!("{ASSET_BASE}{path}")
}

/// Only an empty container gets a game; anything already inside means a
/// previous mount got there first.
pub fn should_mount(child_count: u32) -> bool {
    child_count == 0
}

#[cfg(target_family = "wasm")]
pub use web::mount;

#[cfg(target_family = "wasm")]
mod web {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlElement};

    use super::{CANVAS_HEIGHT, CANVAS_WIDTH, DEFAULT_CONTAINER_ID, should_mount};
    use crate::diag::console_warn;

    fn default_container() -> Option<HtmlElement> {
        web_sys::window()?
            .document()?
            .get_element_by_id(DEFAULT_CONTAINER_ID)?
            .dyn_into::<HtmlElement>()
            .ok()
    }

    fn create_canvas(container: &HtmlElement) -> Result<HtmlCanvasElement, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("No document"))?;
        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()?;
        canvas.set_width(CANVAS_WIDTH);
        canvas.set_height(CANVAS_HEIGHT);
        let style = canvas.style();
        style.set_property("width", "100%")?;
        style.set_property("image-rendering", "pixelated")?;
        container.append_child(&canvas)?;
        Ok(canvas)
    }

    /// Start Bean Jump inside `container` (or `#game`). Calling it again on
    /// the same container does nothing.
    #[wasm_bindgen]
    pub fn mount(container: Option<HtmlElement>) {
        console_error_panic_hook::set_once();

        let Some(container) = container.or_else(default_container) else {
            console_warn!("No #{DEFAULT_CONTAINER_ID} element to mount into");
            return;
        };
        if !should_mount(container.child_element_count()) {
            return;
        }
        // The canvas goes in synchronously so a second mount sees it even
        // while assets are still loading.
        let canvas = match create_canvas(&container) {
            Ok(canvas) => canvas,
            Err(e) => {
                console_warn!("Failed to create canvas: {e:?}");
                return;
            },
        };
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = crate::app::start(canvas).await {
                console_warn!("Bean Jump failed to start: {e}");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_parses() {
        assert!(BeanJumpConfig::from_toml_str(EMBEDDED_CONFIG).is_ok());
        assert_eq!(config().viewport.width, CANVAS_WIDTH as f32);
        assert_eq!(config().viewport.height, CANVAS_HEIGHT as f32);
    }

    #[test]
    fn malformed_config_falls_back_to_defaults() {
        let cfg = config_from("player = 3");
        assert_eq!(cfg.player.walk_speed, 200.0);
        assert_eq!(cfg.viewport.width, 640.0);
    }

    #[test]
    fn mounts_only_into_empty_containers() {
        assert!(should_mount(0));
        assert!(!should_mount(1));
    }

    #[test]
    fn asset_urls_are_relative() {
        assert_eq!(asset_url("dino-small.png"), "./dino-small.png");
    }
}
