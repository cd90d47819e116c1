use crate::compose::canvas::{CanvasDesc, CanvasDocument, CanvasHost};
use crate::document::source::AnimationSource;
use crate::foundation::core::PixelRect;
use crate::foundation::error::{SheetError, SheetResult};
use crate::layout::grid::GridLayout;
use crate::raster::buffer::PixelBuffer;
use crate::select::frames::SelectedFrame;

/// Name of the output document.
pub const SHEET_DOCUMENT_NAME: &str = "Spritesheet";
/// Name of the layer holding the packed frames.
pub const SHEET_LAYER_NAME: &str = "Spritesheet";

/// Reads each selected frame's crop region and packs it into a new document.
///
/// Holds the source exclusively for its lifetime.
pub struct Compositor<'a, S: AnimationSource> {
    source: &'a mut S,
}

impl<'a, S: AnimationSource> Compositor<'a, S> {
    pub fn new(source: &'a mut S) -> Self {
        Self { source }
    }

    /// Pack `frames` into a document allocated from `host`.
    ///
    /// Frames are composited into an owned buffer first; the host document is only created once
    /// every frame has been read, so a failure never leaves a half-filled document behind.
    #[tracing::instrument(skip_all, fields(frames = frames.len()))]
    pub fn run<H: CanvasHost>(
        &mut self,
        frames: &[SelectedFrame],
        crop: PixelRect,
        grid: &GridLayout,
        host: &mut H,
    ) -> SheetResult<H::Document> {
        let cell = crop.size().ok_or_else(|| {
            SheetError::validation(format!("crop rectangle {crop:?} is empty"))
        })?;
        if cell != grid.cell_size() {
            return Err(SheetError::validation(format!(
                "crop is {}x{} but grid cells are {}x{}",
                cell.width,
                cell.height,
                grid.cell_size().width,
                grid.cell_size().height
            )));
        }
        if frames.len() != grid.frame_count() as usize {
            return Err(SheetError::validation(format!(
                "grid was laid out for {} frames, got {}",
                grid.frame_count(),
                frames.len()
            )));
        }

        let desc = CanvasDesc::matching(self.source.info(), grid.canvas_size(), SHEET_DOCUMENT_NAME);
        let bpp = desc.bytes_per_pixel();
        let expected_len = cell.area() as usize * bpp;
        let mut sheet = PixelBuffer::new(desc.size(), bpp)?;

        for selected in frames {
            self.source.seek(selected.frame)?;
            let pixels = self.source.read_pixels(crop)?;
            if pixels.len() != expected_len {
                return Err(SheetError::source_unavailable(format!(
                    "frame {} returned {} bytes for a {}x{} region, expected {expected_len}",
                    selected.frame.0,
                    pixels.len(),
                    cell.width,
                    cell.height
                )));
            }

            let ordinal = u32::try_from(selected.ordinal)
                .map_err(|_| SheetError::validation("frame ordinal overflow"))?;
            let (x, y) = grid.origin_of(ordinal);
            sheet.write_region(i64::from(x), i64::from(y), cell, &pixels)?;
            tracing::trace!(frame = selected.frame.0, x, y, "placed frame");
        }

        let mut doc = host.create_document(&desc)?;
        doc.add_paint_layer(SHEET_LAYER_NAME, sheet)?;
        doc.hide_default_layer()?;
        Ok(doc)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
