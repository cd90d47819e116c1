use std::collections::BTreeMap;

use crate::document::info::DocumentInfo;
use crate::document::source::{AnimationSource, KeyframeNode};
use crate::foundation::core::{FrameIndex, PixelRect, PixelSize};
use crate::foundation::error::{SheetError, SheetResult};
use crate::raster::blend::over_at;
use crate::raster::buffer::PixelBuffer;

/// Image drawn by a paint layer from its keyframe until the next one.
#[derive(Clone, Debug, PartialEq)]
pub struct Cel {
    /// Document-space position of the image's top-left pixel.
    pub x: i64,
    pub y: i64,
    /// Straight RGBA8.
    pixels: PixelBuffer,
}

impl Cel {
    pub fn new(x: i64, y: i64, pixels: PixelBuffer) -> SheetResult<Self> {
        if pixels.bytes_per_pixel() != 4 {
            return Err(SheetError::validation(format!(
                "cel pixels must be rgba8, got {} bytes per pixel",
                pixels.bytes_per_pixel()
            )));
        }
        Ok(Self { x, y, pixels })
    }

    /// A cel covered by one straight RGBA8 color.
    pub fn filled(x: i64, y: i64, size: PixelSize, rgba: [u8; 4]) -> SheetResult<Self> {
        let mut pixels = PixelBuffer::new(size, 4)?;
        for px in pixels.data_mut().chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
        Self::new(x, y, pixels)
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LayerContent {
    /// Children ordered bottom to top.
    Group(Vec<Layer>),
    Paint(BTreeMap<FrameIndex, Cel>),
}

/// One node of a [`LayeredDocument`]'s layer tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    name: String,
    visible: bool,
    opacity: f32,
    content: LayerContent,
}

impl Layer {
    pub fn paint(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            opacity: 1.0,
            content: LayerContent::Paint(BTreeMap::new()),
        }
    }

    pub fn group(name: impl Into<String>, children: Vec<Layer>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            opacity: 1.0,
            content: LayerContent::Group(children),
        }
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Add a keyframe. Ignored on groups.
    pub fn with_keyframe(mut self, frame: FrameIndex, cel: Cel) -> Self {
        if let LayerContent::Paint(keys) = &mut self.content {
            keys.insert(frame, cel);
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &LayerContent {
        &self.content
    }

    /// Cel shown at `frame`: the latest keyframe at or before it.
    pub fn active_cel(&self, frame: FrameIndex) -> Option<&Cel> {
        match &self.content {
            LayerContent::Paint(keys) => keys.range(..=frame).next_back().map(|(_, c)| c),
            LayerContent::Group(_) => None,
        }
    }
}

impl KeyframeNode for Layer {
    fn has_keyframe_at(&self, frame: FrameIndex) -> bool {
        match &self.content {
            LayerContent::Paint(keys) => keys.contains_key(&frame),
            LayerContent::Group(_) => false,
        }
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn children(&self) -> impl Iterator<Item = &Self> + '_ {
        let children: &[Layer] = match &self.content {
            LayerContent::Group(children) => children,
            LayerContent::Paint(_) => &[],
        };
        children.iter()
    }
}

/// In-memory layered animation with hold-keyframe paint layers.
///
/// The projection for the current time is rendered by [`AnimationSource::wait_for_done`]; any
/// bounds or pixel query made after [`AnimationSource::request_time`] but before the barrier is
/// rejected.
#[derive(Debug)]
pub struct LayeredDocument {
    info: DocumentInfo,
    root: Layer,
    time: FrameIndex,
    projection: PixelBuffer,
    settled: bool,
}

impl LayeredDocument {
    /// Build a document from its top-level layers (bottom to top) and render the playback start.
    pub fn new(info: DocumentInfo, layers: Vec<Layer>) -> SheetResult<Self> {
        info.validate()?;
        if !info.is_rgba8() {
            return Err(SheetError::validation(format!(
                "layered documents are rgba/u8 only, got {:?}/{:?}",
                info.color_model, info.color_depth
            )));
        }

        let projection = PixelBuffer::new(info.size(), 4)?;
        let time = info.playback_start;
        let mut doc = Self {
            info,
            root: Layer::group("root", layers),
            time,
            projection,
            settled: false,
        };
        doc.wait_for_done()?;
        Ok(doc)
    }

    /// Top-level layers, bottom to top.
    pub fn layers(&self) -> &[Layer] {
        match &self.root.content {
            LayerContent::Group(children) => children,
            LayerContent::Paint(_) => &[],
        }
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    fn ensure_settled(&self) -> SheetResult<()> {
        if self.settled {
            return Ok(());
        }
        Err(SheetError::source_unavailable(format!(
            "frame {} was read before its render settled",
            self.time.0
        )))
    }

    fn render(&mut self) -> SheetResult<()> {
        self.projection.clear();
        let LayerContent::Group(layers) = &self.root.content else {
            return Ok(());
        };
        composite_layers(&mut self.projection, layers, self.time, 1.0)
    }
}

fn composite_layers(
    dst: &mut PixelBuffer,
    layers: &[Layer],
    frame: FrameIndex,
    opacity: f32,
) -> SheetResult<()> {
    for layer in layers {
        if !layer.visible {
            continue;
        }
        let opacity = opacity * layer.opacity;
        match &layer.content {
            LayerContent::Group(children) => composite_layers(dst, children, frame, opacity)?,
            LayerContent::Paint(_) => {
                if let Some(cel) = layer.active_cel(frame) {
                    over_at(dst, &cel.pixels, cel.x, cel.y, opacity)?;
                }
            }
        }
    }
    Ok(())
}

impl AnimationSource for LayeredDocument {
    type Node = Layer;

    fn info(&self) -> &DocumentInfo {
        &self.info
    }

    fn current_time(&self) -> FrameIndex {
        self.time
    }

    fn request_time(&mut self, frame: FrameIndex) -> SheetResult<()> {
        if frame != self.time || !self.settled {
            self.time = frame;
            self.settled = false;
        }
        Ok(())
    }

    fn wait_for_done(&mut self) -> SheetResult<()> {
        if !self.settled {
            self.render()?;
            self.settled = true;
        }
        Ok(())
    }

    fn tight_bounds(&self) -> SheetResult<PixelRect> {
        self.ensure_settled()?;
        self.projection.alpha_bounds_rgba8()
    }

    fn read_pixels(&self, rect: PixelRect) -> SheetResult<Vec<u8>> {
        self.ensure_settled()?;
        Ok(self.projection.read_region(rect))
    }

    fn root_node(&self) -> &Layer {
        &self.root
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/layered.rs"]
mod tests;
