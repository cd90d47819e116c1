use crate::foundation::core::PixelSize;
use crate::foundation::error::{SheetError, SheetResult};

/// Packing order of frames on the sheet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackDirection {
    /// Fill a row left to right, then wrap. The declared count is the number of columns.
    #[default]
    #[serde(alias = "horizontal")]
    RowMajor,
    /// Fill a column top to bottom, then wrap. The declared count is the number of rows.
    #[serde(alias = "vertical")]
    ColumnMajor,
}

/// Column/row of a frame on the sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct GridCell {
    pub col: u32,
    pub row: u32,
}

/// Grid geometry for `frame_count` equally sized cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct GridLayout {
    direction: PackDirection,
    columns: u32,
    rows: u32,
    cell: PixelSize,
    frame_count: u32,
}

impl GridLayout {
    /// `count` is columns under [`PackDirection::RowMajor`] and rows under
    /// [`PackDirection::ColumnMajor`]; the other dimension is derived from `frame_count`.
    pub fn new(
        direction: PackDirection,
        count: u32,
        frame_count: usize,
        cell: PixelSize,
    ) -> SheetResult<Self> {
        if count == 0 {
            return Err(SheetError::validation("grid rows/columns must be >= 1"));
        }
        if frame_count == 0 {
            return Err(SheetError::empty_selection("no frames to lay out"));
        }
        if cell.width == 0 || cell.height == 0 {
            return Err(SheetError::validation(format!(
                "grid cell must be non-empty, got {}x{}",
                cell.width, cell.height
            )));
        }
        let frame_count = u32::try_from(frame_count)
            .map_err(|_| SheetError::validation("too many frames for one sheet"))?;

        let wrapped = frame_count.div_ceil(count);
        let filled = count.min(frame_count);
        let (columns, rows) = match direction {
            PackDirection::RowMajor => (filled, wrapped),
            PackDirection::ColumnMajor => (wrapped, filled),
        };

        let layout = Self {
            direction,
            columns,
            rows,
            cell,
            frame_count,
        };
        layout.checked_canvas_size()?;
        Ok(layout)
    }

    pub fn direction(&self) -> PackDirection {
        self.direction
    }

    /// Columns actually used by the packed grid.
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Rows actually used by the packed grid.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cell_size(&self) -> PixelSize {
        self.cell
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    fn checked_canvas_size(&self) -> SheetResult<PixelSize> {
        let width = self.columns.checked_mul(self.cell.width);
        let height = self.rows.checked_mul(self.cell.height);
        match (width, height) {
            (Some(width), Some(height)) => Ok(PixelSize { width, height }),
            _ => Err(SheetError::validation(format!(
                "sheet of {}x{} cells of {}x{} overflows",
                self.columns, self.rows, self.cell.width, self.cell.height
            ))),
        }
    }

    /// Sheet size, tight to the packed grid.
    pub fn canvas_size(&self) -> PixelSize {
        // Checked in `new`.
        PixelSize {
            width: self.columns * self.cell.width,
            height: self.rows * self.cell.height,
        }
    }

    pub fn cell_of(&self, ordinal: u32) -> GridCell {
        match self.direction {
            PackDirection::RowMajor => GridCell {
                col: ordinal % self.columns,
                row: ordinal / self.columns,
            },
            PackDirection::ColumnMajor => GridCell {
                col: ordinal / self.rows,
                row: ordinal % self.rows,
            },
        }
    }

    /// Pixel origin of the cell holding `ordinal`.
    pub fn origin_of(&self, ordinal: u32) -> (u32, u32) {
        let cell = self.cell_of(ordinal);
        (cell.col * self.cell.width, cell.row * self.cell.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/grid.rs"]
mod tests;
