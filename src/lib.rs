//! Sprite-sheet export for layered, time-indexed raster documents.
//!
//! An export walks a frame range of an [`AnimationSource`], keeps the frames that pass the
//! selection filters, crops every frame to a common rectangle and packs the crops into a grid on
//! a fresh document handed to a [`CanvasHost`]:
//!
//! - Resolve an [`ExportConfig`] (from an [`ExportConfigDef`] or [`ExportConfig::for_document`])
//! - Load a source, e.g. a [`LayeredDocument`] via [`load_document`]
//! - Run [`export_spritesheet`] against a host such as [`PngFileHost`]
#![forbid(unsafe_code)]

mod foundation;
mod raster;

pub(crate) mod compose;
pub(crate) mod document;
pub(crate) mod export;
pub(crate) mod layout;
pub(crate) mod select;

pub use crate::foundation::core::{FrameIndex, FrameSpan, Margin, PixelRect, PixelSize};
pub use crate::foundation::error::{SheetError, SheetResult};
pub use crate::raster::buffer::PixelBuffer;

pub use crate::compose::canvas::{
    CanvasDesc, CanvasDocument, CanvasHost, CanvasLayer, DEFAULT_LAYER_NAME, MemoryCanvasHost,
    PngFileHost, SheetDocument,
};
pub use crate::compose::compositor::{Compositor, SHEET_DOCUMENT_NAME, SHEET_LAYER_NAME};
pub use crate::document::info::{
    ColorDepth, ColorModel, DEFAULT_COLOR_PROFILE, DEFAULT_RESOLUTION_PPI, DocumentInfo,
};
pub use crate::document::layered::{Cel, Layer, LayerContent, LayeredDocument};
pub use crate::document::manifest::{
    DocumentManifest, KeyframeDef, LayerDef, PlaybackDef, load_document,
};
pub use crate::document::source::{AnimationSource, KeyframeNode};
pub use crate::export::config::{ExportConfig, ExportConfigDef};
pub use crate::export::pipeline::{Placement, SheetReport, export_spritesheet};
pub use crate::layout::bounds::BoundsAggregator;
pub use crate::layout::grid::{GridCell, GridLayout, PackDirection};
pub use crate::select::frames::{FrameSelectionCriteria, FrameSelector, SelectedFrame};
pub use crate::select::keyframes::has_visible_keyframe_at;
