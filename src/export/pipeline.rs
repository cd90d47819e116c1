use std::path::Path;

use anyhow::Context as _;

use crate::compose::canvas::CanvasHost;
use crate::compose::compositor::Compositor;
use crate::document::source::AnimationSource;
use crate::export::config::ExportConfig;
use crate::foundation::core::{FrameIndex, PixelRect, PixelSize};
use crate::foundation::error::{SheetError, SheetResult};
use crate::layout::bounds::BoundsAggregator;
use crate::layout::grid::{GridLayout, PackDirection};
use crate::select::frames::{FrameSelector, SelectedFrame};

/// Where one frame ended up on the sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Placement {
    pub ordinal: usize,
    pub frame: FrameIndex,
    pub x: u32,
    pub y: u32,
}

/// Summary of a finished export, suitable for writing next to the sheet.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SheetReport {
    pub width: u32,
    pub height: u32,
    pub cell: PixelSize,
    /// Source rectangle every frame was read from, margins applied.
    pub crop: PixelRect,
    pub direction: PackDirection,
    pub columns: u32,
    pub rows: u32,
    pub placements: Vec<Placement>,
}

impl SheetReport {
    fn new(crop: PixelRect, grid: &GridLayout, frames: &[SelectedFrame]) -> SheetResult<Self> {
        let canvas = grid.canvas_size();
        let mut placements = Vec::with_capacity(frames.len());
        for f in frames {
            let ordinal = u32::try_from(f.ordinal)
                .map_err(|_| SheetError::validation("frame ordinal overflow"))?;
            let (x, y) = grid.origin_of(ordinal);
            placements.push(Placement {
                ordinal: f.ordinal,
                frame: f.frame,
                x,
                y,
            });
        }
        Ok(Self {
            width: canvas.width,
            height: canvas.height,
            cell: grid.cell_size(),
            crop,
            direction: grid.direction(),
            columns: grid.columns(),
            rows: grid.rows(),
            placements,
        })
    }

    pub fn frames(&self) -> impl Iterator<Item = FrameIndex> + '_ {
        self.placements.iter().map(|p| p.frame)
    }

    pub fn to_json(&self) -> SheetResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SheetError::serde(format!("serialize sheet report: {e}")))
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> SheetResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create report dir '{}'", parent.display()))?;
        }
        let mut json = self.to_json()?;
        json.push('\n');
        std::fs::write(path, json).with_context(|| format!("write report '{}'", path.display()))?;
        Ok(())
    }
}

/// Export `source` as a sprite sheet and present the result to `host`.
///
/// Configuration is validated before the source is queried. The source's time cursor is moved
/// back to where it was once the export finishes, whether it succeeded or not.
#[tracing::instrument(skip(source, host))]
pub fn export_spritesheet<S: AnimationSource, H: CanvasHost>(
    source: &mut S,
    host: &mut H,
    cfg: &ExportConfig,
) -> SheetResult<SheetReport> {
    cfg.validate()?;

    let initial = source.current_time();
    let result = run_export(source, host, cfg);
    if let Err(e) = source.seek(initial) {
        tracing::warn!(frame = initial.0, error = %e, "failed to restore time cursor");
    }

    let report = result?;
    tracing::info!(
        frames = report.placements.len(),
        width = report.width,
        height = report.height,
        columns = report.columns,
        rows = report.rows,
        "exported sprite sheet"
    );
    Ok(report)
}

fn run_export<S: AnimationSource, H: CanvasHost>(
    source: &mut S,
    host: &mut H,
    cfg: &ExportConfig,
) -> SheetResult<SheetReport> {
    let span = cfg.span()?;

    let base = if cfg.trim {
        BoundsAggregator::trimmed_bounds(source, span)?
    } else {
        source.info().bounds()
    };
    let crop = base.with_margin(cfg.margin);
    let cell = crop.size().ok_or_else(|| {
        SheetError::validation(format!(
            "margin {:?} collapses the crop rectangle {base:?} to nothing",
            cfg.margin
        ))
    })?;

    let frames = FrameSelector::select(source, &cfg.selection()?)?;
    if frames.is_empty() {
        return Err(SheetError::empty_selection(format!(
            "no frame in {}..={} step {} passed the filters",
            span.start().0,
            span.end().0,
            span.step()
        )));
    }

    let grid = GridLayout::new(cfg.direction, cfg.grid_count(), frames.len(), cell)?;
    let doc = Compositor::new(source).run(&frames, crop, &grid, host)?;
    let report = SheetReport::new(crop, &grid, &frames)?;
    host.present(doc)?;
    Ok(report)
}

#[cfg(test)]
#[path = "../../tests/unit/export/pipeline.rs"]
mod tests;
