use crate::foundation::error::{SheetError, SheetResult};

/// Integer time position on a document's timeline.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Stepped frame range, inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct FrameSpan {
    start: FrameIndex,
    end: FrameIndex, // inclusive
    step: u64,
}

impl FrameSpan {
    /// Validate and build a span. Rejects `start > end` and `step == 0`.
    pub fn new(start: FrameIndex, end: FrameIndex, step: u64) -> SheetResult<Self> {
        if start.0 > end.0 {
            return Err(SheetError::invalid_range(format!(
                "range start {} is after range end {}",
                start.0, end.0
            )));
        }
        if step == 0 {
            return Err(SheetError::invalid_range("range step must be >= 1"));
        }
        Ok(Self { start, end, step })
    }

    pub fn start(self) -> FrameIndex {
        self.start
    }

    pub fn end(self) -> FrameIndex {
        self.end
    }

    pub fn step(self) -> u64 {
        self.step
    }

    /// Number of stepped indices visited by [`FrameSpan::iter`].
    pub fn len_frames(self) -> u64 {
        ((self.end.0 - self.start.0) / self.step).saturating_add(1)
    }

    pub fn iter(self) -> impl Iterator<Item = FrameIndex> {
        let step = usize::try_from(self.step).unwrap_or(usize::MAX);
        (self.start.0..=self.end.0).step_by(step).map(FrameIndex)
    }
}

/// Width and height in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub fn area(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Integer rectangle with inclusive edges.
///
/// `right` and `bottom` name the last covered column/row, so `width = right - left + 1`.
/// Inverted rectangles (`right < left` or `bottom < top`) are empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelRect {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl Default for PixelRect {
    fn default() -> Self {
        Self::NULL
    }
}

impl PixelRect {
    /// The null rectangle: origin at zero, zero width and height.
    pub const NULL: Self = Self {
        left: 0,
        top: 0,
        right: -1,
        bottom: -1,
    };

    pub fn from_ltrb(left: i64, top: i64, right: i64, bottom: i64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_xywh(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            left: x,
            top: y,
            right: x + width - 1,
            bottom: y + height - 1,
        }
    }

    pub fn width(self) -> i64 {
        self.right - self.left + 1
    }

    pub fn height(self) -> i64 {
        self.bottom - self.top + 1
    }

    pub fn is_empty(self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Pixel size of a non-empty rectangle; `None` when empty or wider than `u32`.
    pub fn size(self) -> Option<PixelSize> {
        if self.is_empty() {
            return None;
        }
        Some(PixelSize {
            width: u32::try_from(self.width()).ok()?,
            height: u32::try_from(self.height()).ok()?,
        })
    }

    /// Component-wise expansion: min of the leading edges, max of the trailing edges.
    ///
    /// No emptiness check is made on either side, so an inverted seed is absorbed by the first
    /// real rectangle.
    pub fn expanded_to(self, other: Self) -> Self {
        Self {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Apply a margin. Positive values grow the rectangle on every side: `left`/`top` move the
    /// origin up-left, `right`/`bottom` move the trailing edges down-right.
    pub fn with_margin(self, margin: Margin) -> Self {
        Self {
            left: self.left - i64::from(margin.left),
            top: self.top - i64::from(margin.top),
            right: self.right + i64::from(margin.right),
            bottom: self.bottom + i64::from(margin.bottom),
        }
    }
}

/// Per-side crop margin, each value in `[-MAX_ABS, MAX_ABS]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Margin {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Margin {
    pub const MAX_ABS: i32 = 999;

    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> SheetResult<Self> {
        let m = Self {
            left,
            top,
            right,
            bottom,
        };
        m.validate()?;
        Ok(m)
    }

    pub fn validate(&self) -> SheetResult<()> {
        for (side, v) in [
            ("left", self.left),
            ("top", self.top),
            ("right", self.right),
            ("bottom", self.bottom),
        ] {
            if v.abs() > Self::MAX_ABS {
                return Err(SheetError::validation(format!(
                    "margin {side} must be within [-{max}, {max}], got {v}",
                    max = Self::MAX_ABS
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
