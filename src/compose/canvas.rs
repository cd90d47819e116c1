use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::document::info::{ColorDepth, ColorModel, DocumentInfo};
use crate::foundation::core::PixelSize;
use crate::foundation::error::{SheetError, SheetResult};
use crate::raster::blend::over_at;
use crate::raster::buffer::PixelBuffer;

/// Everything needed to allocate an output document.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CanvasDesc {
    pub width: u32,
    pub height: u32,
    pub name: String,
    pub color_model: ColorModel,
    pub color_depth: ColorDepth,
    pub color_profile: String,
    pub resolution: f64,
}

impl CanvasDesc {
    /// A canvas of `size` carrying `info`'s color model, depth, profile and resolution.
    pub fn matching(info: &DocumentInfo, size: PixelSize, name: impl Into<String>) -> Self {
        Self {
            width: size.width,
            height: size.height,
            name: name.into(),
            color_model: info.color_model,
            color_depth: info.color_depth,
            color_profile: info.color_profile.clone(),
            resolution: info.resolution,
        }
    }

    pub fn size(&self) -> PixelSize {
        PixelSize {
            width: self.width,
            height: self.height,
        }
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.color_model.channels() * self.color_depth.bytes()
    }
}

/// A document created by a [`CanvasHost`].
pub trait CanvasDocument {
    fn desc(&self) -> &CanvasDesc;

    /// Hide the default layer every new document starts with.
    fn hide_default_layer(&mut self) -> SheetResult<()>;

    /// Add a visible paint layer on top. `pixels` must match the document size and pixel format.
    fn add_paint_layer(&mut self, name: &str, pixels: PixelBuffer) -> SheetResult<()>;
}

/// Canvas-creation collaborator: allocates documents and takes finished ones.
pub trait CanvasHost {
    type Document: CanvasDocument;

    /// New document with one empty default layer.
    fn create_document(&mut self, desc: &CanvasDesc) -> SheetResult<Self::Document>;

    /// Hand a finished document over to the host.
    fn present(&mut self, doc: Self::Document) -> SheetResult<()>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct CanvasLayer {
    pub name: String,
    pub visible: bool,
    pub pixels: PixelBuffer,
}

pub const DEFAULT_LAYER_NAME: &str = "Background";

/// In-memory document: metadata plus a bottom-to-top layer stack.
#[derive(Clone, Debug, PartialEq)]
pub struct SheetDocument {
    desc: CanvasDesc,
    layers: Vec<CanvasLayer>,
}

impl SheetDocument {
    pub fn new(desc: CanvasDesc) -> SheetResult<Self> {
        if desc.width == 0 || desc.height == 0 {
            return Err(SheetError::validation(format!(
                "canvas must be non-empty, got {}x{}",
                desc.width, desc.height
            )));
        }
        let background = PixelBuffer::new(desc.size(), desc.bytes_per_pixel())?;
        Ok(Self {
            desc,
            layers: vec![CanvasLayer {
                name: DEFAULT_LAYER_NAME.to_string(),
                visible: true,
                pixels: background,
            }],
        })
    }

    /// Bottom to top.
    pub fn layers(&self) -> &[CanvasLayer] {
        &self.layers
    }

    pub fn layer(&self, name: &str) -> Option<&CanvasLayer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Composite the visible layers into one straight RGBA8 image.
    pub fn flatten_rgba8(&self) -> SheetResult<PixelBuffer> {
        if !(self.desc.color_model == ColorModel::Rgba && self.desc.color_depth == ColorDepth::U8) {
            return Err(SheetError::validation(format!(
                "only rgba/u8 canvases can be flattened, got {:?}/{:?}",
                self.desc.color_model, self.desc.color_depth
            )));
        }
        let mut out = PixelBuffer::new(self.desc.size(), 4)?;
        for layer in self.layers.iter().filter(|l| l.visible) {
            over_at(&mut out, &layer.pixels, 0, 0, 1.0)?;
        }
        Ok(out)
    }

    /// Write the flattened visible layers as a straight-alpha PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> SheetResult<()> {
        let path = path.as_ref();
        let data = self.flatten_rgba8()?.into_raw();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        image::save_buffer_with_format(
            path,
            &data,
            self.desc.width,
            self.desc.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

impl CanvasDocument for SheetDocument {
    fn desc(&self) -> &CanvasDesc {
        &self.desc
    }

    fn hide_default_layer(&mut self) -> SheetResult<()> {
        let layer = self
            .layers
            .first_mut()
            .ok_or_else(|| SheetError::validation("document has no default layer"))?;
        layer.visible = false;
        Ok(())
    }

    fn add_paint_layer(&mut self, name: &str, pixels: PixelBuffer) -> SheetResult<()> {
        if pixels.size() != self.desc.size() || pixels.bytes_per_pixel() != self.desc.bytes_per_pixel()
        {
            return Err(SheetError::validation(format!(
                "layer '{name}' is {}x{}x{}, document is {}x{}x{}",
                pixels.size().width,
                pixels.size().height,
                pixels.bytes_per_pixel(),
                self.desc.width,
                self.desc.height,
                self.desc.bytes_per_pixel()
            )));
        }
        self.layers.push(CanvasLayer {
            name: name.to_string(),
            visible: true,
            pixels,
        });
        Ok(())
    }
}

/// Host keeping presented documents in memory, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryCanvasHost {
    created: usize,
    presented: Vec<SheetDocument>,
}

impl MemoryCanvasHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents allocated so far, presented or not.
    pub fn created(&self) -> usize {
        self.created
    }

    pub fn presented(&self) -> &[SheetDocument] {
        &self.presented
    }

    pub fn into_presented(self) -> Vec<SheetDocument> {
        self.presented
    }
}

impl CanvasHost for MemoryCanvasHost {
    type Document = SheetDocument;

    fn create_document(&mut self, desc: &CanvasDesc) -> SheetResult<SheetDocument> {
        let doc = SheetDocument::new(desc.clone())?;
        self.created += 1;
        Ok(doc)
    }

    fn present(&mut self, doc: SheetDocument) -> SheetResult<()> {
        self.presented.push(doc);
        Ok(())
    }
}

/// Host writing each presented document to a PNG file.
#[derive(Debug)]
pub struct PngFileHost {
    out_path: PathBuf,
}

impl PngFileHost {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
        }
    }

    pub fn out_path(&self) -> &Path {
        &self.out_path
    }
}

impl CanvasHost for PngFileHost {
    type Document = SheetDocument;

    fn create_document(&mut self, desc: &CanvasDesc) -> SheetResult<SheetDocument> {
        SheetDocument::new(desc.clone())
    }

    fn present(&mut self, doc: SheetDocument) -> SheetResult<()> {
        doc.save_png(&self.out_path)?;
        tracing::info!(path = %self.out_path.display(), "wrote sheet");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/canvas.rs"]
mod tests;
