use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::document::info::DocumentInfo;
use crate::foundation::core::{FrameIndex, FrameSpan, Margin};
use crate::foundation::error::{SheetError, SheetResult};
use crate::layout::grid::PackDirection;
use crate::select::frames::FrameSelectionCriteria;

/// Export options as written in a JSON file. Every field is optional; missing ones are filled
/// in from the document by [`ExportConfigDef::resolve`].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfigDef {
    pub direction: Option<PackDirection>,
    pub rows: Option<u32>,
    pub columns: Option<u32>,
    pub range_start: Option<u64>,
    pub range_end: Option<u64>,
    pub range_step: Option<u64>,
    pub trim: Option<bool>,
    pub skip_blank: Option<bool>,
    pub only_keyframes: Option<bool>,
    pub skip_duplicate: Option<bool>,
    pub margin: Option<Margin>,
}

impl ExportConfigDef {
    pub fn from_reader<R: std::io::Read>(r: R) -> SheetResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| SheetError::serde(format!("parse export config JSON: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> SheetResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SheetError::validation(format!("open export config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Fields set in `over` replace the ones set here.
    pub fn overlaid(self, over: ExportConfigDef) -> Self {
        Self {
            direction: over.direction.or(self.direction),
            rows: over.rows.or(self.rows),
            columns: over.columns.or(self.columns),
            range_start: over.range_start.or(self.range_start),
            range_end: over.range_end.or(self.range_end),
            range_step: over.range_step.or(self.range_step),
            trim: over.trim.or(self.trim),
            skip_blank: over.skip_blank.or(self.skip_blank),
            only_keyframes: over.only_keyframes.or(self.only_keyframes),
            skip_duplicate: over.skip_duplicate.or(self.skip_duplicate),
            margin: over.margin.or(self.margin),
        }
    }

    /// Fill unset fields from `info`'s defaults. The result is not validated yet.
    pub fn resolve(&self, info: &DocumentInfo) -> ExportConfig {
        let d = ExportConfig::for_document(info);
        ExportConfig {
            direction: self.direction.unwrap_or(d.direction),
            rows: self.rows.unwrap_or(d.rows),
            columns: self.columns.unwrap_or(d.columns),
            range_start: self.range_start.map(FrameIndex).unwrap_or(d.range_start),
            range_end: self.range_end.map(FrameIndex).unwrap_or(d.range_end),
            range_step: self.range_step.unwrap_or(d.range_step),
            trim: self.trim.unwrap_or(d.trim),
            skip_blank: self.skip_blank.unwrap_or(d.skip_blank),
            only_keyframes: self.only_keyframes.unwrap_or(d.only_keyframes),
            skip_duplicate: self.skip_duplicate.unwrap_or(d.skip_duplicate),
            margin: self.margin.unwrap_or(d.margin),
        }
    }
}

/// Fully specified export options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ExportConfig {
    pub direction: PackDirection,
    /// Used under [`PackDirection::ColumnMajor`].
    pub rows: u32,
    /// Used under [`PackDirection::RowMajor`].
    pub columns: u32,
    pub range_start: FrameIndex,
    /// Inclusive.
    pub range_end: FrameIndex,
    pub range_step: u64,
    /// Crop every frame to the union of the range's tight bounds instead of the full document.
    pub trim: bool,
    pub skip_blank: bool,
    pub only_keyframes: bool,
    pub skip_duplicate: bool,
    pub margin: Margin,
}

impl ExportConfig {
    /// Whole playback range, step 1, a single row (or column) as long as the animation, no
    /// filters, no trim, zero margin.
    pub fn for_document(info: &DocumentInfo) -> Self {
        let len = u32::try_from(info.animation_length()).unwrap_or(u32::MAX);
        Self {
            direction: PackDirection::default(),
            rows: len,
            columns: len,
            range_start: info.playback_start,
            range_end: info.playback_end,
            range_step: 1,
            trim: false,
            skip_blank: false,
            only_keyframes: false,
            skip_duplicate: false,
            margin: Margin::default(),
        }
    }

    /// The stepped frame range. Fails with [`SheetError::InvalidRange`].
    pub fn span(&self) -> SheetResult<FrameSpan> {
        FrameSpan::new(self.range_start, self.range_end, self.range_step)
    }

    /// Range first, then grid and margin.
    pub fn validate(&self) -> SheetResult<()> {
        self.span()?;
        if self.rows == 0 {
            return Err(SheetError::validation("rows must be >= 1"));
        }
        if self.columns == 0 {
            return Err(SheetError::validation("columns must be >= 1"));
        }
        self.margin.validate()
    }

    /// Columns under row-major packing, rows under column-major packing.
    pub fn grid_count(&self) -> u32 {
        match self.direction {
            PackDirection::RowMajor => self.columns,
            PackDirection::ColumnMajor => self.rows,
        }
    }

    pub fn selection(&self) -> SheetResult<FrameSelectionCriteria> {
        Ok(FrameSelectionCriteria {
            span: self.span()?,
            skip_blank: self.skip_blank,
            only_keyframes: self.only_keyframes,
            skip_duplicate: self.skip_duplicate,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/config.rs"]
mod tests;
