use std::collections::BTreeMap;

use reportgrid_core::{
    CellCoord, CellRange, CellStyle, CellValue, LogicalCell, LogicalRow, RichText, SinkError,
    SpreadsheetSink,
};
use serde::Serialize;

use crate::merge::{merge_region, span_range};
use crate::position::PositionMap;

/// Where a cell ended up on the sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    /// Every coordinate the cell covers; `range.start` is the anchor
    pub range: CellRange,
    pub text: String,
}

impl Placement {
    pub fn anchor(&self) -> CellCoord {
        self.range.start
    }
}

/// Grid state shared by every section of one export
#[derive(Debug, Clone, Default)]
pub struct GridState {
    pub positions: PositionMap,
    /// Column widths in character units, last writer wins
    pub column_widths: BTreeMap<u32, u32>,
    pub placements: Vec<Placement>,
}

impl GridState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State seeded with widths forced by the caller
    pub fn with_column_widths(widths: &BTreeMap<u32, u32>) -> Self {
        GridState {
            column_widths: widths.clone(),
            ..Self::default()
        }
    }

    /// Record a cell that covers `range` without going through the engine
    pub fn claim(&mut self, range: CellRange, text: impl Into<String>) {
        self.positions.mark_range(range);
        self.placements.push(Placement {
            range,
            text: text.into(),
        });
    }
}

/// Lay out `rows` starting at sheet row `start_row`.
///
/// Every cell goes to the first free column of its row, so columns reserved
/// by vertical spans from earlier rows are skipped. A spanned cell claims its
/// whole rectangle and is merged on the sink. Returns the number of rows
/// consumed; moving the row cursor is up to the caller.
pub fn lay_out_rows(
    rows: &[LogicalRow],
    start_row: u32,
    grid: &mut GridState,
    sink: &mut dyn SpreadsheetSink,
) -> Result<u32, SinkError> {
    let mut row_index = start_row;

    for row in rows {
        let handle = sink.ensure_row(row_index)?;
        if let Some(height) = row.height.filter(|h| *h > 0.0) {
            sink.set_row_height(handle, height)?;
        }

        let mut col = grid.positions.first_free(row_index);
        for cell in &row.cells {
            place_cell(cell, handle.cell(col), grid, sink)?;
            col = grid.positions.first_free(row_index);
        }

        row_index += 1;
    }

    Ok(row_index - start_row)
}

fn place_cell(
    cell: &LogicalCell,
    anchor: CellCoord,
    grid: &mut GridState,
    sink: &mut dyn SpreadsheetSink,
) -> Result<(), SinkError> {
    let text = cell.value.as_text();
    if cell.underline.is_empty() {
        sink.write_value(anchor, &cell.value)?;
    } else {
        let underlined = RichText::underline(&text, &cell.underline);
        for missing in &underlined.missing {
            tracing::warn!("Underline text {:?} not found in cell {}", missing, anchor);
        }
        sink.write_rich_text(anchor, &underlined.text)?;
    }

    if cell.is_spanned() {
        merge_region(sink, anchor, cell.rowspan(), cell.colspan(), cell.border)?;
    }
    sink.apply_style(anchor, cell.style())?;

    let range = span_range(anchor, cell.rowspan(), cell.colspan());
    grid.claim(range, text);

    if let Some(width) = cell.width.filter(|w| *w > 0) {
        let cols = cell.col_extent();
        let per_column = width / cols;
        for col in anchor.col..anchor.col + cols {
            grid.column_widths.insert(col, per_column);
        }
    }

    Ok(())
}

/// Write one unspanned scalar cell and claim its coordinate
pub fn place_scalar(
    coord: CellCoord,
    value: &CellValue,
    style: Option<CellStyle>,
    grid: &mut GridState,
    sink: &mut dyn SpreadsheetSink,
) -> Result<(), SinkError> {
    sink.write_value(coord, value)?;
    if let Some(style) = style {
        sink.apply_style(coord, style)?;
    }
    grid.claim(CellRange::new(coord, coord), value.as_text());
    Ok(())
}
