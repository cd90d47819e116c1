use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context as _;

use crate::document::info::{
    ColorDepth, ColorModel, DEFAULT_COLOR_PROFILE, DEFAULT_RESOLUTION_PPI, DocumentInfo,
};
use crate::document::layered::{Cel, Layer, LayeredDocument};
use crate::foundation::core::{FrameIndex, PixelSize};
use crate::foundation::error::{SheetError, SheetResult};
use crate::raster::buffer::PixelBuffer;

/// JSON description of a layered animation whose cels are image files.
///
/// Image paths are relative to the directory passed to [`DocumentManifest::load`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentManifest {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub color_model: ColorModel,
    #[serde(default)]
    pub color_depth: ColorDepth,
    #[serde(default = "default_color_profile")]
    pub color_profile: String,
    #[serde(default = "default_resolution")]
    pub resolution: f64,
    pub playback: PlaybackDef,
    /// Bottom to top.
    #[serde(default)]
    pub layers: Vec<LayerDef>,
}

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlaybackDef {
    pub start: u64,
    /// Inclusive.
    pub end: u64,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerDef {
    pub name: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    /// Present for groups only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<LayerDef>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keyframes: Vec<KeyframeDef>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyframeDef {
    pub frame: u64,
    pub image: String,
    #[serde(default)]
    pub x: i64,
    #[serde(default)]
    pub y: i64,
}

fn default_color_profile() -> String {
    DEFAULT_COLOR_PROFILE.to_string()
}

fn default_resolution() -> f64 {
    DEFAULT_RESOLUTION_PPI
}

fn default_true() -> bool {
    true
}

fn default_opacity() -> f32 {
    1.0
}

impl DocumentManifest {
    pub fn from_reader<R: std::io::Read>(r: R) -> SheetResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| SheetError::serde(format!("parse document manifest JSON: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> SheetResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SheetError::validation(format!("open document manifest '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn info(&self) -> DocumentInfo {
        DocumentInfo {
            width: self.width,
            height: self.height,
            color_model: self.color_model,
            color_depth: self.color_depth,
            color_profile: self.color_profile.clone(),
            resolution: self.resolution,
            playback_start: FrameIndex(self.playback.start),
            playback_end: FrameIndex(self.playback.end),
        }
    }

    /// Decode every referenced image and build the document.
    ///
    /// Each distinct image path is decoded once, however many keyframes use it.
    pub fn load(&self, base_dir: impl AsRef<Path>) -> SheetResult<LayeredDocument> {
        let mut images = ImageCache {
            base_dir: base_dir.as_ref(),
            decoded: BTreeMap::new(),
        };
        let layers = self
            .layers
            .iter()
            .map(|def| build_layer(def, &mut images))
            .collect::<SheetResult<Vec<_>>>()?;
        LayeredDocument::new(self.info(), layers)
    }
}

/// Load a manifest from disk, resolving images next to it.
pub fn load_document(path: impl AsRef<Path>) -> SheetResult<LayeredDocument> {
    let path = path.as_ref();
    let manifest = DocumentManifest::from_path(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    manifest.load(base_dir)
}

fn build_layer(def: &LayerDef, images: &mut ImageCache<'_>) -> SheetResult<Layer> {
    let layer = match &def.children {
        Some(children) => {
            if !def.keyframes.is_empty() {
                return Err(SheetError::validation(format!(
                    "layer '{}' has both children and keyframes",
                    def.name
                )));
            }
            let children = children
                .iter()
                .map(|c| build_layer(c, images))
                .collect::<SheetResult<Vec<_>>>()?;
            Layer::group(def.name.clone(), children)
        }
        None => {
            let mut layer = Layer::paint(def.name.clone());
            for key in &def.keyframes {
                let pixels = images.get(&key.image)?;
                layer = layer.with_keyframe(FrameIndex(key.frame), Cel::new(key.x, key.y, pixels)?);
            }
            layer
        }
    };
    Ok(layer.with_visible(def.visible).with_opacity(def.opacity))
}

struct ImageCache<'a> {
    base_dir: &'a Path,
    decoded: BTreeMap<String, PixelBuffer>,
}

impl ImageCache<'_> {
    fn get(&mut self, source: &str) -> SheetResult<PixelBuffer> {
        let key = normalize_rel_path(source)?;
        if let Some(pixels) = self.decoded.get(&key) {
            return Ok(pixels.clone());
        }

        let path = self.base_dir.join(&key);
        let bytes =
            std::fs::read(&path).with_context(|| format!("read image '{}'", path.display()))?;
        let pixels = decode_image_rgba8(&bytes)
            .map_err(|e| SheetError::validation(format!("image '{key}': {e}")))?;
        self.decoded.insert(key, pixels.clone());
        Ok(pixels)
    }
}

/// Decode an encoded image into straight RGBA8.
pub fn decode_image_rgba8(bytes: &[u8]) -> SheetResult<PixelBuffer> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    PixelBuffer::from_raw(PixelSize { width, height }, 4, rgba.into_raw())
}

pub fn normalize_rel_path(source: &str) -> SheetResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(SheetError::validation("image paths must be relative"));
    }
    if s.is_empty() {
        return Err(SheetError::validation("image path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(SheetError::validation("image paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(SheetError::validation("image path must contain a file name"));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/document/manifest.rs"]
mod tests;
