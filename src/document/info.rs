use crate::foundation::core::{FrameIndex, PixelRect, PixelSize};
use crate::foundation::error::{SheetError, SheetResult};

/// Channel layout of a document's pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorModel {
    #[default]
    Rgba,
    Graya,
    Cmyka,
    Laba,
    Xyza,
    Ycbcra,
}

impl ColorModel {
    pub fn channels(self) -> usize {
        match self {
            Self::Graya => 2,
            Self::Cmyka => 5,
            Self::Rgba | Self::Laba | Self::Xyza | Self::Ycbcra => 4,
        }
    }
}

/// Storage type of a single channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorDepth {
    #[default]
    U8,
    U16,
    F16,
    F32,
}

impl ColorDepth {
    pub fn bytes(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 | Self::F16 => 2,
            Self::F32 => 4,
        }
    }
}

pub const DEFAULT_COLOR_PROFILE: &str = "sRGB-elle-V2-srgbtrc.icc";
pub const DEFAULT_RESOLUTION_PPI: f64 = 72.0;

/// Static properties of an animated document.
///
/// Everything a sheet needs to be colorimetrically equivalent to its source travels through
/// here: model, depth, profile and resolution are copied verbatim onto the output canvas.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct DocumentInfo {
    pub width: u32,
    pub height: u32,
    pub color_model: ColorModel,
    pub color_depth: ColorDepth,
    pub color_profile: String,
    /// Pixels per inch.
    pub resolution: f64,
    pub playback_start: FrameIndex,
    /// Inclusive.
    pub playback_end: FrameIndex,
}

impl DocumentInfo {
    pub fn new(width: u32, height: u32, playback_start: FrameIndex, playback_end: FrameIndex) -> Self {
        Self {
            width,
            height,
            color_model: ColorModel::default(),
            color_depth: ColorDepth::default(),
            color_profile: DEFAULT_COLOR_PROFILE.to_string(),
            resolution: DEFAULT_RESOLUTION_PPI,
            playback_start,
            playback_end,
        }
    }

    pub fn validate(&self) -> SheetResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SheetError::validation(format!(
                "document size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.playback_start > self.playback_end {
            return Err(SheetError::validation(format!(
                "playback start {} is after playback end {}",
                self.playback_start.0, self.playback_end.0
            )));
        }
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(SheetError::validation(format!(
                "resolution must be a positive number, got {}",
                self.resolution
            )));
        }
        Ok(())
    }

    pub fn size(&self) -> PixelSize {
        PixelSize {
            width: self.width,
            height: self.height,
        }
    }

    /// Full document rectangle, origin at zero.
    pub fn bounds(&self) -> PixelRect {
        PixelRect::from_xywh(0, 0, i64::from(self.width), i64::from(self.height))
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.color_model.channels() * self.color_depth.bytes()
    }

    /// Number of frames in the playback range.
    pub fn animation_length(&self) -> u64 {
        self.playback_end
            .0
            .saturating_sub(self.playback_start.0)
            .saturating_add(1)
    }

    pub fn is_rgba8(&self) -> bool {
        self.color_model == ColorModel::Rgba && self.color_depth == ColorDepth::U8
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/info.rs"]
mod tests;
