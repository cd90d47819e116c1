use crate::document::source::AnimationSource;
use crate::foundation::core::{FrameSpan, PixelRect};
use crate::foundation::error::{SheetError, SheetResult};

pub struct BoundsAggregator;

impl BoundsAggregator {
    /// Union of the non-empty tight bounds of every stepped frame in `span`.
    ///
    /// Selection filters do not apply here: every stepped index is visited. Fails with
    /// [`SheetError::DegenerateTrim`] when all of them are empty.
    #[tracing::instrument(skip(source))]
    pub fn trimmed_bounds<S: AnimationSource>(
        source: &mut S,
        span: FrameSpan,
    ) -> SheetResult<PixelRect> {
        let info = source.info();
        let mut bounds = PixelRect::from_ltrb(i64::from(info.width), i64::from(info.height), 0, 0);
        let mut any = false;

        for frame in span.iter() {
            source.seek(frame)?;
            let frame_bounds = source.tight_bounds()?;
            if frame_bounds.is_empty() {
                continue;
            }
            bounds = bounds.expanded_to(frame_bounds);
            any = true;
        }

        if !any {
            return Err(SheetError::degenerate_trim(format!(
                "frames {}..={} step {} are all empty",
                span.start().0,
                span.end().0,
                span.step()
            )));
        }
        tracing::debug!(?bounds, "trimmed bounds");
        Ok(bounds)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/bounds.rs"]
mod tests;
