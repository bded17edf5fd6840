use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::cell::CellValue;
use crate::error::SinkError;
use crate::format::{Border, CellStyle};
use crate::page::PageSetup;
use crate::range::{CellCoord, CellRange};
use crate::rich_text::RichText;

/// Handle to a row created by a sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowHandle {
    /// Row index on the sheet
    pub index: u32,
}

impl RowHandle {
    /// Coordinate of the cell at `col` in this row
    pub fn cell(&self, col: u32) -> CellCoord {
        CellCoord::new(self.index, col)
    }
}

/// Destination of a laid-out report sheet.
///
/// The layout engine only ever talks to this trait. Implementations decide
/// when bytes hit the output; `write_to` is the last call of an export.
pub trait SpreadsheetSink {
    /// Create the row at `row`, or return the existing one untouched
    fn ensure_row(&mut self, row: u32) -> Result<RowHandle, SinkError>;

    /// Explicit height of a row in points, if one was set
    fn row_height(&self, row: RowHandle) -> Option<f64>;

    fn set_row_height(&mut self, row: RowHandle, height: f64) -> Result<(), SinkError>;

    /// Set a cell's scalar value, creating the cell if needed
    fn write_value(&mut self, coord: CellCoord, value: &CellValue) -> Result<(), SinkError>;

    /// Set a cell's value as rich text
    fn write_rich_text(&mut self, coord: CellCoord, text: &RichText) -> Result<(), SinkError>;

    fn apply_style(&mut self, coord: CellCoord, style: CellStyle) -> Result<(), SinkError>;

    fn merge(&mut self, range: CellRange) -> Result<(), SinkError>;

    /// Draw `border` on the outer edges of a merged range
    fn set_region_border(&mut self, range: CellRange, border: Border) -> Result<(), SinkError>;

    /// Column width in character units
    fn set_column_width(&mut self, col: u32, width: u32) -> Result<(), SinkError>;

    fn set_page_setup(&mut self, page: &PageSetup) -> Result<(), SinkError>;

    /// Serialize the finished sheet
    fn write_to(&mut self, out: &mut dyn Write) -> Result<(), SinkError>;
}
