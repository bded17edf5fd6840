use reportgrid_core::{Border, CellCoord, CellRange, SinkError, SpreadsheetSink};

/// Inclusive range covered by a cell anchored at `anchor`.
/// Spans of 0 count as 1.
pub fn span_range(anchor: CellCoord, rowspan: u32, colspan: u32) -> CellRange {
    CellRange::from_extent(anchor, rowspan, colspan)
}

/// Ask the sink to merge the span anchored at `anchor`.
///
/// With `border` set, a thin border is drawn around the merged rectangle as a
/// whole. Single-cell ranges are not merged and yield `None`.
pub fn merge_region(
    sink: &mut dyn SpreadsheetSink,
    anchor: CellCoord,
    rowspan: u32,
    colspan: u32,
    border: bool,
) -> Result<Option<CellRange>, SinkError> {
    let range = span_range(anchor, rowspan, colspan);
    if range.is_single_cell() {
        return Ok(None);
    }

    sink.merge(range)?;
    if border {
        sink.set_region_border(range, Border::THIN)?;
    }

    Ok(Some(range))
}
