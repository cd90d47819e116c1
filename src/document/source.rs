use crate::document::info::DocumentInfo;
use crate::foundation::core::{FrameIndex, PixelRect};
use crate::foundation::error::SheetResult;

/// A node of a document's layer hierarchy, as seen by keyframe queries.
pub trait KeyframeNode {
    /// Whether this node itself holds a keyframe exactly at `frame`.
    fn has_keyframe_at(&self, frame: FrameIndex) -> bool;

    fn is_visible(&self) -> bool;

    fn children(&self) -> impl Iterator<Item = &Self> + '_;
}

/// A time-indexed raster document with a single mutable time cursor.
///
/// Every bounds query and pixel read is relative to whatever time the cursor holds. Moving the
/// cursor is a two-step operation: [`AnimationSource::request_time`] schedules the re-render and
/// [`AnimationSource::wait_for_done`] blocks until it has fully settled. Reads issued between the
/// two are invalid; implementations should fail them with
/// [`crate::SheetError::SourceUnavailable`] rather than serve stale pixels.
///
/// The engine only ever holds a source through `&mut`, so no two operations can drive the same
/// cursor at once.
pub trait AnimationSource {
    type Node: KeyframeNode;

    fn info(&self) -> &DocumentInfo;

    /// Time the cursor was last asked to move to.
    fn current_time(&self) -> FrameIndex;

    fn request_time(&mut self, frame: FrameIndex) -> SheetResult<()>;

    /// Render barrier: returns once the projection for the current time is complete.
    fn wait_for_done(&mut self) -> SheetResult<()>;

    /// Move the cursor and block until the re-render has settled.
    fn seek(&mut self, frame: FrameIndex) -> SheetResult<()> {
        self.request_time(frame)?;
        self.wait_for_done()
    }

    /// Tight bounds of all non-transparent pixels of the composed visible tree.
    ///
    /// Fully transparent frames yield an empty rectangle.
    fn tight_bounds(&self) -> SheetResult<PixelRect>;

    /// Packed pixels of `rect` at the current time, `bytes_per_pixel` per pixel, row-major.
    ///
    /// Pixels outside the document read as transparent. Empty rectangles yield no bytes.
    fn read_pixels(&self, rect: PixelRect) -> SheetResult<Vec<u8>>;

    fn root_node(&self) -> &Self::Node;
}
