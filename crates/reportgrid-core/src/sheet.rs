use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;

use crate::cell::CellValue;
use crate::error::SinkError;
use crate::format::{Border, CellStyle};
use crate::page::PageSetup;
use crate::range::{CellCoord, CellRange};
use crate::rich_text::RichText;
use crate::sink::{RowHandle, SpreadsheetSink};

/// What a sheet cell holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum SheetCellContent {
    Value(CellValue),
    Rich(RichText),
}

impl Default for SheetCellContent {
    fn default() -> Self {
        SheetCellContent::Value(CellValue::Empty)
    }
}

impl SheetCellContent {
    /// Get the display value as a string
    pub fn display_value(&self) -> String {
        match self {
            SheetCellContent::Value(value) => value.as_text(),
            SheetCellContent::Rich(text) => text.to_plain_string(),
        }
    }
}

/// A cell written to a [`MemorySheet`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetCell {
    pub content: SheetCellContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<CellStyle>,
}

/// A row written to a [`MemorySheet`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Cells keyed by column index
    #[serde(default)]
    pub cells: BTreeMap<u32, SheetCell>,
}

/// In-memory sheet sink.
///
/// Keeps every operation it receives and serializes the result as JSON. Used
/// for previews and for inspecting layouts in tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemorySheet {
    /// Rows keyed by row index
    #[serde(default)]
    rows: BTreeMap<u32, SheetRow>,
    #[serde(default)]
    merges: Vec<CellRange>,
    #[serde(default)]
    borders: Vec<(CellRange, Border)>,
    /// Column widths in character units
    #[serde(default)]
    column_widths: BTreeMap<u32, u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    page_setup: Option<PageSetup>,
}

impl MemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(&self, row: u32) -> Option<&SheetRow> {
        self.rows.get(&row)
    }

    /// Indices of all created rows, in order
    pub fn row_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.rows.keys().copied()
    }

    /// All created rows with their indices, in order
    pub fn rows(&self) -> impl Iterator<Item = (u32, &SheetRow)> + '_ {
        self.rows.iter().map(|(&index, row)| (index, row))
    }

    pub fn cell(&self, coord: CellCoord) -> Option<&SheetCell> {
        self.rows.get(&coord.row)?.cells.get(&coord.col)
    }

    /// Display text of a cell, if the cell exists
    pub fn text(&self, coord: CellCoord) -> Option<String> {
        self.cell(coord).map(|c| c.content.display_value())
    }

    pub fn merges(&self) -> &[CellRange] {
        &self.merges
    }

    pub fn borders(&self) -> &[(CellRange, Border)] {
        &self.borders
    }

    pub fn column_widths(&self) -> &BTreeMap<u32, u32> {
        &self.column_widths
    }

    pub fn page_setup(&self) -> Option<&PageSetup> {
        self.page_setup.as_ref()
    }

    /// Get the number of written cells
    pub fn cell_count(&self) -> usize {
        self.rows.values().map(|r| r.cells.len()).sum()
    }

    fn handle(&mut self, row: u32) -> RowHandle {
        self.rows.entry(row).or_default();
        RowHandle { index: row }
    }

    fn cell_mut(&mut self, coord: CellCoord) -> &mut SheetCell {
        self.handle(coord.row);
        self.rows
            .entry(coord.row)
            .or_default()
            .cells
            .entry(coord.col)
            .or_default()
    }
}

impl SpreadsheetSink for MemorySheet {
    fn ensure_row(&mut self, row: u32) -> Result<RowHandle, SinkError> {
        Ok(self.handle(row))
    }

    fn row_height(&self, row: RowHandle) -> Option<f64> {
        self.rows.get(&row.index).and_then(|r| r.height)
    }

    fn set_row_height(&mut self, row: RowHandle, height: f64) -> Result<(), SinkError> {
        self.handle(row.index);
        if let Some(sheet_row) = self.rows.get_mut(&row.index) {
            sheet_row.height = Some(height);
        }
        Ok(())
    }

    fn write_value(&mut self, coord: CellCoord, value: &CellValue) -> Result<(), SinkError> {
        self.cell_mut(coord).content = SheetCellContent::Value(value.clone());
        Ok(())
    }

    fn write_rich_text(&mut self, coord: CellCoord, text: &RichText) -> Result<(), SinkError> {
        self.cell_mut(coord).content = SheetCellContent::Rich(text.clone());
        Ok(())
    }

    fn apply_style(&mut self, coord: CellCoord, style: CellStyle) -> Result<(), SinkError> {
        self.cell_mut(coord).style = Some(style);
        Ok(())
    }

    fn merge(&mut self, range: CellRange) -> Result<(), SinkError> {
        self.merges.push(range);
        Ok(())
    }

    fn set_region_border(&mut self, range: CellRange, border: Border) -> Result<(), SinkError> {
        self.borders.push((range, border));
        Ok(())
    }

    fn set_column_width(&mut self, col: u32, width: u32) -> Result<(), SinkError> {
        self.column_widths.insert(col, width);
        Ok(())
    }

    fn set_page_setup(&mut self, page: &PageSetup) -> Result<(), SinkError> {
        self.page_setup = Some(page.clone());
        Ok(())
    }

    fn write_to(&mut self, out: &mut dyn Write) -> Result<(), SinkError> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        out.flush()?;
        Ok(())
    }
}
