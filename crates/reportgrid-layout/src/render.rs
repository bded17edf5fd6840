//! Simple and complex section renderers.
//!
//! Renderers place cells starting at a given row and report how many rows
//! they covered. Moving the shared row cursor is left to the composer.

use reportgrid_core::{CellStyle, CellValue, LogicalRow, SinkError, SpreadsheetSink};

use crate::binder::{FieldBinder, Formatters, Record};
use crate::engine::{lay_out_rows, place_scalar, GridState};

/// One row of labels, one per column from column 0
pub fn render_flat_row(
    labels: &[String],
    row: u32,
    grid: &mut GridState,
    sink: &mut dyn SpreadsheetSink,
) -> Result<u32, SinkError> {
    let handle = sink.ensure_row(row)?;
    for (col, label) in labels.iter().enumerate() {
        place_scalar(
            handle.cell(col as u32),
            &CellValue::Text(label.clone()),
            Some(CellStyle::CenterBordered),
            grid,
            sink,
        )?;
    }
    Ok(1)
}

/// Labels stacked down column 0, one per row
pub fn render_flat_column(
    labels: &[String],
    start_row: u32,
    grid: &mut GridState,
    sink: &mut dyn SpreadsheetSink,
) -> Result<u32, SinkError> {
    for (offset, label) in labels.iter().enumerate() {
        let handle = sink.ensure_row(start_row + offset as u32)?;
        place_scalar(
            handle.cell(0),
            &CellValue::Text(label.clone()),
            Some(CellStyle::CenterBordered),
            grid,
            sink,
        )?;
    }
    Ok(labels.len() as u32)
}

/// Caller-defined rows through the grid layout engine
pub fn render_complex(
    rows: &[LogicalRow],
    start_row: u32,
    grid: &mut GridState,
    sink: &mut dyn SpreadsheetSink,
) -> Result<u32, SinkError> {
    lay_out_rows(rows, start_row, grid, sink)
}

/// How bound content rows are written
#[derive(Debug, Clone, Copy)]
pub struct ContentOptions<'a> {
    /// Height for rows that have none yet
    pub row_height: Option<f64>,
    /// Skip the cell style entirely
    pub no_format: bool,
    pub formatters: &'a Formatters,
}

/// One row per record, one column per property.
///
/// Each row starts at its first free column, after any column headers.
pub fn render_records<R: Record>(
    properties: &[String],
    records: &[R],
    start_row: u32,
    options: ContentOptions<'_>,
    grid: &mut GridState,
    sink: &mut dyn SpreadsheetSink,
) -> Result<u32, SinkError> {
    let mut binder = FieldBinder::new();
    let style = (!options.no_format).then_some(CellStyle::CenterBordered);

    for (index, record) in records.iter().enumerate() {
        let row = start_row + index as u32;
        let handle = sink.ensure_row(row)?;
        if let Some(height) = options.row_height {
            if sink.row_height(handle).is_none() {
                sink.set_row_height(handle, height)?;
            }
        }

        for property in properties {
            let col = grid.positions.first_free(row);
            let text = binder.display(record, property, index, options.formatters);
            place_scalar(handle.cell(col), &CellValue::Text(text), style, grid, sink)?;
        }
    }

    Ok(records.len() as u32)
}
