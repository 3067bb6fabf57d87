use std::collections::HashMap;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlImageElement, Response, Window};

use beanjump_core::error::LoadError;
use beanjump_core::sprite::AssetLibrary;
use beanjump_platformer::assets::MANIFEST;

use crate::asset_url;

/// Sprite metadata plus the decoded images the painter draws from.
pub struct LoadedAssets {
    pub library: AssetLibrary,
    pub images: HashMap<String, HtmlImageElement>,
}

fn fetch_err(path: &str, reason: impl std::fmt::Debug) -> LoadError {
    LoadError::Fetch {
        path: path.to_string(),
        reason: format!("{reason:?}"),
    }
}

async fn load_image(url: &str) -> Result<HtmlImageElement, LoadError> {
    let img = HtmlImageElement::new().map_err(|e| fetch_err(url, e))?;
    img.set_src(url);
    JsFuture::from(img.decode())
        .await
        .map_err(|e| fetch_err(url, e))?;
    Ok(img)
}

async fn fetch_text(window: &Window, url: &str) -> Result<String, LoadError> {
    let resp = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| fetch_err(url, e))?
        .dyn_into::<Response>()
        .map_err(|e| fetch_err(url, e))?;
    if !resp.ok() {
        return Err(fetch_err(url, format!("HTTP {}", resp.status())));
    }
    let text = resp.text().map_err(|e| fetch_err(url, e))?;
    JsFuture::from(text)
        .await
        .map_err(|e| fetch_err(url, e))?
        .as_string()
        .ok_or_else(|| fetch_err(url, "body is not text"))
}

/// Load every manifest sprite. The first failure aborts the whole load.
pub async fn load_all(window: &Window) -> Result<LoadedAssets, LoadError> {
    let mut library = AssetLibrary::new();
    let mut images: HashMap<String, HtmlImageElement> = HashMap::new();

    for asset in MANIFEST {
        let key = asset.image_key();
        if !images.contains_key(key) {
            let img = load_image(&asset_url(asset.image_path())).await?;
            images.insert(key.to_string(), img);
        }
        let size = images
            .get(key)
            .map(|img| Vec2::new(img.natural_width() as f32, img.natural_height() as f32))
            .unwrap_or_default();
        let json = match asset.json_path() {
            Some(path) => Some(fetch_text(window, &asset_url(path)).await?),
            None => None,
        };
        library.insert(asset.build(size, json.as_deref())?);
    }
    Ok(LoadedAssets { library, images })
}
