use crate::document::source::AnimationSource;
use crate::foundation::core::{FrameIndex, FrameSpan};
use crate::foundation::error::SheetResult;
use crate::select::duplicates::DuplicateIndex;
use crate::select::keyframes::has_visible_keyframe_at;

/// Which frames of a span make it into the sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameSelectionCriteria {
    pub span: FrameSpan,
    /// Drop frames whose composed image is fully transparent.
    pub skip_blank: bool,
    /// Keep only frames where some visible layer has a keyframe.
    pub only_keyframes: bool,
    /// Drop frames whose trimmed pixels match an already retained frame, wherever it sits.
    pub skip_duplicate: bool,
}

impl FrameSelectionCriteria {
    /// Criteria with every filter disabled.
    pub fn all(span: FrameSpan) -> Self {
        Self {
            span,
            skip_blank: false,
            only_keyframes: false,
            skip_duplicate: false,
        }
    }

    fn any_filter(&self) -> bool {
        self.skip_blank || self.only_keyframes || self.skip_duplicate
    }
}

/// A retained frame: its position in packing order and its source time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SelectedFrame {
    pub ordinal: usize,
    pub frame: FrameIndex,
}

pub struct FrameSelector;

impl FrameSelector {
    /// Walk `criteria.span` and keep the frames passing every enabled filter, in ascending order.
    ///
    /// An empty result is valid here; callers decide whether zero frames is an error.
    #[tracing::instrument(skip(source))]
    pub fn select<S: AnimationSource>(
        source: &mut S,
        criteria: &FrameSelectionCriteria,
    ) -> SheetResult<Vec<SelectedFrame>> {
        let mut out = Vec::with_capacity(criteria.span.len_frames().min(4096) as usize);
        if !criteria.any_filter() {
            out.extend(criteria.span.iter().enumerate().map(|(ordinal, frame)| {
                SelectedFrame { ordinal, frame }
            }));
            return Ok(out);
        }

        let mut seen = DuplicateIndex::new();
        for frame in criteria.span.iter() {
            source.seek(frame)?;

            if criteria.skip_blank && source.tight_bounds()?.is_empty() {
                tracing::debug!(frame = frame.0, "skip blank frame");
                continue;
            }

            if criteria.only_keyframes && !has_visible_keyframe_at(source.root_node(), frame) {
                tracing::debug!(frame = frame.0, "skip frame without keyframe");
                continue;
            }

            if criteria.skip_duplicate {
                let pixels = source.read_pixels(source.tight_bounds()?)?;
                if !seen.insert(pixels) {
                    tracing::debug!(frame = frame.0, "skip duplicate frame");
                    continue;
                }
            }

            out.push(SelectedFrame {
                ordinal: out.len(),
                frame,
            });
        }

        tracing::debug!(retained = out.len(), snapshots = seen.len(), "frame selection done");
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/select/frames.rs"]
mod tests;
