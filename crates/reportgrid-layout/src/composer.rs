use std::io::Write;

use reportgrid_core::{
    CellCoord, CellRange, CellStyle, CellValue, SinkError, SpreadsheetSink,
};
use serde::Serialize;

use crate::binder::Record;
use crate::bounds::{bounding_column, full_width};
use crate::config::{Content, ReportConfig, Section};
use crate::engine::{place_scalar, GridState, Placement};
use crate::error::ExportError;
use crate::merge::merge_region;
use crate::render::{
    render_complex, render_flat_column, render_flat_row, render_records, ContentOptions,
};

/// Columns merged for the file mark and the subtitle
pub const BANNER_COLUMNS: u32 = 4;
/// Title row height in points
pub const TITLE_ROW_HEIGHT: f64 = 45.0;
/// Comment row height in points
pub const COMMENT_ROW_HEIGHT: f64 = 15.0;

/// State of one export pass, threaded through every section
#[derive(Debug, Clone, Default)]
pub struct LayoutState {
    pub grid: GridState,
    /// Next unused row; never moves backwards
    pub cursor: u32,
    /// Highest column the sheet is known to use
    pub max_column: u32,
    /// Row of a title whose merge waits for the final sheet width
    pub pending_title: Option<u32>,
}

impl LayoutState {
    pub fn new(config: &ReportConfig) -> Self {
        LayoutState {
            grid: GridState::with_column_widths(config.column_widths()),
            ..Self::default()
        }
    }

    fn advance(&mut self, rows: u32) {
        self.cursor += rows;
    }
}

/// What an export laid out
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportSummary {
    pub placements: Vec<Placement>,
    pub max_column: u32,
    /// Row cursor after all sections
    pub cursor: u32,
    pub title_merge: Option<CellRange>,
    pub comment_row: Option<u32>,
}

/// Lay out the report on `sink` and write the finished sheet to `out`
pub fn export<R: Record>(
    config: &ReportConfig,
    records: &[R],
    sink: &mut dyn SpreadsheetSink,
    out: &mut dyn Write,
) -> Result<ExportSummary, ExportError> {
    let summary = compose(config, records, sink)?;
    sink.write_to(out)?;
    Ok(summary)
}

/// Lay out every present section on `sink` without writing it out
pub fn compose<R: Record>(
    config: &ReportConfig,
    records: &[R],
    sink: &mut dyn SpreadsheetSink,
) -> Result<ExportSummary, ExportError> {
    let mut state = LayoutState::new(config);

    draw_file_mark(config, &mut state, sink)?;
    let mut title_merge = draw_title(config, &mut state, sink)?;
    draw_subtitle(config, &mut state, sink)?;
    draw_header(config, &mut state, sink)?;
    draw_column_header(config, &mut state, sink)?;
    draw_content(config, records, &mut state, sink)?;
    let comment_row = draw_comments(config, &mut state, sink)?;

    if let Some(row) = state.pending_title.take() {
        if state.max_column > 0 {
            title_merge = merge_region(sink, CellCoord::new(row, 0), 0, state.max_column + 1, false)?;
        }
    }

    for (&col, &width) in &state.grid.column_widths {
        sink.set_column_width(col, width)?;
    }
    sink.set_page_setup(config.page_setup())?;

    tracing::debug!(
        "Laid out {} cells over {} rows, max column {}",
        state.grid.placements.len(),
        state.cursor,
        state.max_column
    );

    Ok(ExportSummary {
        placements: state.grid.placements,
        max_column: state.max_column,
        cursor: state.cursor,
        title_merge,
        comment_row,
    })
}

/// No header of either kind precedes the body
fn headerless(config: &ReportConfig) -> bool {
    config.header().is_none()
}

fn draw_banner(
    text: &str,
    state: &mut LayoutState,
    sink: &mut dyn SpreadsheetSink,
) -> Result<(), SinkError> {
    let handle = sink.ensure_row(state.cursor)?;
    let anchor = handle.cell(0);
    place_scalar(anchor, &CellValue::Text(text.to_string()), None, &mut state.grid, sink)?;
    merge_region(sink, anchor, 0, BANNER_COLUMNS, false)?;
    state.advance(1);
    Ok(())
}

fn draw_file_mark(
    config: &ReportConfig,
    state: &mut LayoutState,
    sink: &mut dyn SpreadsheetSink,
) -> Result<(), SinkError> {
    if let Some(mark) = config.file_mark() {
        draw_banner(mark, state, sink)?;
        tracing::debug!("file mark drawn, cursor at {}", state.cursor);
    }
    Ok(())
}

fn draw_subtitle(
    config: &ReportConfig,
    state: &mut LayoutState,
    sink: &mut dyn SpreadsheetSink,
) -> Result<(), SinkError> {
    if let Some(subtitle) = config.subtitle() {
        draw_banner(subtitle, state, sink)?;
        tracing::debug!("subtitle drawn, cursor at {}", state.cursor);
    }
    Ok(())
}

/// Draw the title. With a flat header the width is known and the title is
/// merged at once; otherwise the merge waits until the sheet width is known.
fn draw_title(
    config: &ReportConfig,
    state: &mut LayoutState,
    sink: &mut dyn SpreadsheetSink,
) -> Result<Option<CellRange>, SinkError> {
    let Some(title) = config.title() else {
        return Ok(None);
    };

    let row = state.cursor;
    let handle = sink.ensure_row(row)?;
    sink.set_row_height(handle, TITLE_ROW_HEIGHT)?;
    let anchor = handle.cell(0);
    place_scalar(
        anchor,
        &CellValue::Text(title.to_string()),
        Some(CellStyle::Title),
        &mut state.grid,
        sink,
    )?;
    state.advance(1);

    match config.flat_header() {
        Some(labels) => merge_region(sink, anchor, 0, labels.len() as u32, false),
        None => {
            state.pending_title = Some(row);
            Ok(None)
        }
    }
}

fn draw_header(
    config: &ReportConfig,
    state: &mut LayoutState,
    sink: &mut dyn SpreadsheetSink,
) -> Result<(), SinkError> {
    let start = state.cursor;
    match config.header() {
        None => return Ok(()),
        Some(Section::Flat(labels)) => {
            let rows = render_flat_row(labels, start, &mut state.grid, sink)?;
            state.advance(rows);
        }
        Some(Section::Complex(rows)) => {
            let consumed = render_complex(rows, start, &mut state.grid, sink)?;
            state.advance(consumed);
            if let Some(max) = bounding_column(&state.grid.positions, start) {
                state.max_column = max;
            }
        }
    }
    tracing::debug!("header drawn, cursor at {}", state.cursor);
    Ok(())
}

/// Column headers sit left of the content rows, so the cursor stays where
/// content begins.
fn draw_column_header(
    config: &ReportConfig,
    state: &mut LayoutState,
    sink: &mut dyn SpreadsheetSink,
) -> Result<(), SinkError> {
    let start = state.cursor;
    match config.column_header() {
        None => return Ok(()),
        Some(Section::Flat(labels)) => {
            render_flat_column(labels, start, &mut state.grid, sink)?;
            if headerless(config) {
                state.max_column += 1;
            }
        }
        Some(Section::Complex(rows)) => {
            render_complex(rows, start, &mut state.grid, sink)?;
            if headerless(config) {
                if let Some(max) = bounding_column(&state.grid.positions, start) {
                    state.max_column = max;
                }
            }
        }
    }
    tracing::debug!("column header drawn, cursor held at {}", state.cursor);
    Ok(())
}

fn draw_content<R: Record>(
    config: &ReportConfig,
    records: &[R],
    state: &mut LayoutState,
    sink: &mut dyn SpreadsheetSink,
) -> Result<(), SinkError> {
    let start = state.cursor;
    match config.content() {
        None => return Ok(()),
        Some(Content::Complex(rows)) => {
            let consumed = render_complex(rows, start, &mut state.grid, sink)?;
            state.advance(consumed);
        }
        Some(Content::Columns(properties)) => {
            let options = ContentOptions {
                row_height: config.content_row_height(),
                no_format: config.no_cell_format(),
                formatters: config.formatters(),
            };
            let consumed =
                render_records(properties, records, start, options, &mut state.grid, sink)?;
            state.advance(consumed);
        }
    }

    if headerless(config) {
        if let Some(max) = bounding_column(&state.grid.positions, start) {
            state.max_column = state.max_column.max(max);
        }
    }
    tracing::debug!("content drawn, cursor at {}", state.cursor);
    Ok(())
}

/// Place the closing comment under the last content row, below any cell
/// still spanning down from above. Does not move the cursor.
fn draw_comments(
    config: &ReportConfig,
    state: &mut LayoutState,
    sink: &mut dyn SpreadsheetSink,
) -> Result<Option<u32>, SinkError> {
    let Some(comments) = config.comments() else {
        return Ok(None);
    };

    let mut row = state.cursor;
    if config.content().is_none() {
        // The cursor still points at the first column-header row
        if let Some(section) = config.column_header() {
            row += section.row_count() as u32;
        }
    }
    row = row.max(state.grid.positions.next_free_row());

    let handle = sink.ensure_row(row)?;
    sink.set_row_height(handle, COMMENT_ROW_HEIGHT)?;
    let anchor = handle.cell(0);
    place_scalar(
        anchor,
        &CellValue::Text(comments.to_string()),
        Some(CellStyle::LeftPlain),
        &mut state.grid,
        sink,
    )?;

    let width = full_width(config.flat_header().map(|h| h.len()), state.max_column);
    if let Some(cols) = width {
        merge_region(sink, anchor, 0, cols, false)?;
    }
    Ok(Some(row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reportgrid_core::{LogicalCell, LogicalRow, MemorySheet};
    use serde_json::{json, Value};
    use std::collections::HashMap;

    const NO_RECORDS: &[Value] = &[];

    fn range(row: u32, col: u32, rows: u32, cols: u32) -> CellRange {
        CellRange::from_extent(CellCoord::new(row, col), rows, cols)
    }

    fn text(sheet: &MemorySheet, row: u32, col: u32) -> Option<String> {
        sheet.text(CellCoord::new(row, col))
    }

    fn assert_no_collisions(summary: &ExportSummary) {
        let mut writers: HashMap<CellCoord, &str> = HashMap::new();
        for placement in &summary.placements {
            for coord in placement.range {
                if let Some(other) = writers.insert(coord, &placement.text) {
                    panic!("{} claimed by {:?} and {:?}", coord, other, placement.text);
                }
            }
        }
    }

    fn sample_records() -> Vec<Value> {
        vec![
            json!({"one": "x", "two": "y", "three": "z"}),
            json!({"one": "x2", "two": "y2", "three": "z2"}),
            json!({"one": "x3", "two": "y3", "three": "z3"}),
        ]
    }

    fn two_row_header() -> Vec<LogicalRow> {
        vec![
            LogicalRow::with_cells([LogicalCell::spanned("A", 2, 3), LogicalCell::spanned("B", 2, 0)]),
            LogicalRow::with_cells((1..=5).map(|i| LogicalCell::new(format!("h{i}")))),
        ]
    }

    #[test]
    fn test_flat_header_with_bound_content() {
        let config = ReportConfig::builder()
            .headers(["one", "two", "three"])
            .content_columns(["one", "two", "three"])
            .build();
        let mut sheet = MemorySheet::new();

        let summary = compose(&config, &sample_records(), &mut sheet).unwrap();

        assert_eq!(sheet.row_indices().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        for col in 0..3 {
            assert_eq!(
                sheet.cell(CellCoord::new(0, col)).unwrap().style,
                Some(CellStyle::CenterBordered)
            );
        }
        assert_eq!(text(&sheet, 0, 2).as_deref(), Some("three"));
        assert_eq!(text(&sheet, 1, 0).as_deref(), Some("x"));
        assert_eq!(text(&sheet, 3, 2).as_deref(), Some("z3"));
        for row in 1..4 {
            assert_eq!(sheet.row(row).unwrap().cells.len(), 3);
        }
        assert!(sheet.merges().is_empty());
        assert_eq!(summary.cursor, 4);
        assert_no_collisions(&summary);
    }

    #[test]
    fn test_complex_header_second_row_follows_spans() {
        let config = ReportConfig::builder().complex_header(two_row_header()).build();
        let mut sheet = MemorySheet::new();

        let summary = compose(&config, NO_RECORDS, &mut sheet).unwrap();

        assert_eq!(text(&sheet, 0, 0).as_deref(), Some("A"));
        assert_eq!(text(&sheet, 0, 3).as_deref(), Some("B"));
        for (i, col) in (4..=8).enumerate() {
            assert_eq!(text(&sheet, 1, col), Some(format!("h{}", i + 1)));
        }
        assert!(sheet.cell(CellCoord::new(1, 3)).is_none());
        assert_eq!(sheet.merges(), &[range(0, 0, 2, 3), range(0, 3, 2, 1)]);
        assert_eq!(summary.max_column, 3);
        assert_eq!(summary.cursor, 2);
        assert_no_collisions(&summary);
    }

    #[test]
    fn test_title_merge_deferred_until_width_known() {
        let header = vec![LogicalRow::with_cells([
            LogicalCell::spanned("Item", 0, 3),
            LogicalCell::new("Total"),
            LogicalCell::spanned("Kind", 0, 2),
        ])];
        let config = ReportConfig::builder()
            .title("Statistics")
            .complex_header(header)
            .content_columns(["a"])
            .build();
        let mut sheet = MemorySheet::new();

        let summary = compose(&config, &[json!({"a": 1})], &mut sheet).unwrap();

        assert_eq!(summary.max_column, 5);
        assert_eq!(summary.title_merge, Some(range(0, 0, 1, 6)));
        // The title merge is the last one requested
        assert_eq!(sheet.merges().last(), Some(&range(0, 0, 1, 6)));
        assert_eq!(sheet.row(0).unwrap().height, Some(TITLE_ROW_HEIGHT));
        assert_eq!(sheet.cell(CellCoord::new(0, 0)).unwrap().style, Some(CellStyle::Title));

        // Independent check against the final occupancy of the header row
        let widest = summary
            .placements
            .iter()
            .filter(|p| p.range.start.row == 1)
            .map(|p| p.range.end.col)
            .max()
            .unwrap();
        assert_eq!(summary.title_merge.unwrap().end.col, widest);
    }

    #[test]
    fn test_title_merged_across_flat_header() {
        let config = ReportConfig::builder()
            .title("T")
            .headers(["a", "b", "c", "d", "e"])
            .build();
        let mut sheet = MemorySheet::new();

        let summary = compose(&config, NO_RECORDS, &mut sheet).unwrap();

        assert_eq!(summary.title_merge, Some(range(0, 0, 1, 5)));
        assert_eq!(sheet.merges(), &[range(0, 0, 1, 5)]);
        assert_eq!(summary.cursor, 2);
    }

    #[test]
    fn test_banners_and_section_order() {
        let config = ReportConfig::builder()
            .file_mark("Annex 1")
            .title("Report")
            .subtitle("Unit (seal):")
            .headers(["a", "b"])
            .build();
        let mut sheet = MemorySheet::new();

        let summary = compose(&config, NO_RECORDS, &mut sheet).unwrap();

        assert_eq!(text(&sheet, 0, 0).as_deref(), Some("Annex 1"));
        assert_eq!(text(&sheet, 1, 0).as_deref(), Some("Report"));
        assert_eq!(text(&sheet, 2, 0).as_deref(), Some("Unit (seal):"));
        assert_eq!(text(&sheet, 3, 1).as_deref(), Some("b"));
        assert_eq!(sheet.cell(CellCoord::new(0, 0)).unwrap().style, None);
        assert_eq!(
            sheet.merges(),
            &[range(0, 0, 1, 4), range(1, 0, 1, 2), range(2, 0, 1, 4)]
        );
        assert_eq!(summary.cursor, 4);
    }

    #[test]
    fn test_absent_sections_leave_cursor() {
        let config = ReportConfig::builder().build();
        let mut sheet = MemorySheet::new();

        let summary = compose(&config, NO_RECORDS, &mut sheet).unwrap();

        assert_eq!(summary.cursor, 0);
        assert_eq!(sheet.cell_count(), 0);
        assert!(summary.title_merge.is_none());
        assert!(sheet.page_setup().is_some());
    }

    #[test]
    fn test_column_headers_with_bound_content() {
        let config = ReportConfig::builder()
            .title("T")
            .column_headers(["r1", "r2", "r3"])
            .content_columns(["one", "two", "three"])
            .comments("note")
            .build();
        let mut sheet = MemorySheet::new();

        let summary = compose(&config, &sample_records(), &mut sheet).unwrap();

        // Content shares rows with the column headers
        assert_eq!(text(&sheet, 1, 0).as_deref(), Some("r1"));
        assert_eq!(text(&sheet, 1, 1).as_deref(), Some("x"));
        assert_eq!(text(&sheet, 3, 3).as_deref(), Some("z3"));
        assert_eq!(summary.max_column, 3);
        assert_eq!(summary.cursor, 4);
        assert_eq!(summary.comment_row, Some(4));
        assert!(sheet.merges().contains(&range(4, 0, 1, 4)));
        assert_eq!(summary.title_merge, Some(range(0, 0, 1, 4)));
        assert_no_collisions(&summary);
    }

    #[test]
    fn test_complex_column_headers_hold_cursor() {
        let column_headers = vec![
            LogicalRow::with_cells([LogicalCell::spanned("Basics", 3, 0), LogicalCell::new("Pupils")]),
            LogicalRow::with_cells([LogicalCell::new("Faculty")]),
            LogicalRow::with_cells([LogicalCell::new("Area")]),
        ];
        let content = vec![
            LogicalRow::with_cells([LogicalCell::new(1), LogicalCell::new(2)]),
            LogicalRow::with_cells([LogicalCell::new(3), LogicalCell::new(4)]),
            LogicalRow::with_cells([LogicalCell::new(5), LogicalCell::new(6)]),
        ];
        let config = ReportConfig::builder()
            .title("T")
            .complex_column_headers(column_headers)
            .complex_content(content)
            .build();
        let mut sheet = MemorySheet::new();

        let summary = compose(&config, NO_RECORDS, &mut sheet).unwrap();

        assert_eq!(text(&sheet, 1, 2).as_deref(), Some("1"));
        assert_eq!(text(&sheet, 3, 3).as_deref(), Some("6"));
        assert_eq!(summary.max_column, 3);
        assert_eq!(summary.cursor, 4);
        assert_eq!(summary.title_merge, Some(range(0, 0, 1, 4)));
        assert_no_collisions(&summary);
    }

    #[test]
    fn test_comments_after_column_headers_without_content() {
        let column_headers = vec![
            LogicalRow::with_cells([LogicalCell::spanned("Group", 2, 0), LogicalCell::spanned("Row", 0, 2)]),
            LogicalRow::with_cells([LogicalCell::spanned("Row", 0, 2)]),
        ];
        let config = ReportConfig::builder()
            .complex_column_headers(column_headers)
            .comments("done")
            .build();
        let mut sheet = MemorySheet::new();

        let summary = compose(&config, NO_RECORDS, &mut sheet).unwrap();

        assert_eq!(summary.cursor, 0);
        assert_eq!(summary.comment_row, Some(2));
        assert_eq!(text(&sheet, 2, 0).as_deref(), Some("done"));
        assert_eq!(sheet.row(2).unwrap().height, Some(COMMENT_ROW_HEIGHT));
        assert_eq!(sheet.cell(CellCoord::new(2, 0)).unwrap().style, Some(CellStyle::LeftPlain));
        assert!(sheet.merges().contains(&range(2, 0, 1, 3)));
    }

    #[test]
    fn test_comments_below_trailing_rowspan() {
        let content = vec![LogicalRow::with_cells([
            LogicalCell::spanned("tall", 2, 0),
            LogicalCell::new("a"),
            LogicalCell::new("b"),
        ])];
        let config = ReportConfig::builder()
            .complex_content(content)
            .comments("note")
            .build();
        let mut sheet = MemorySheet::new();

        let summary = compose(&config, NO_RECORDS, &mut sheet).unwrap();

        assert_eq!(summary.cursor, 1);
        assert_eq!(summary.comment_row, Some(2));
        assert_eq!(text(&sheet, 0, 0).as_deref(), Some("tall"));
        assert_eq!(text(&sheet, 2, 0).as_deref(), Some("note"));
        assert_eq!(sheet.merges(), &[range(0, 0, 2, 1), range(2, 0, 1, 3)]);
        assert_no_collisions(&summary);
    }

    #[test]
    fn test_comments_below_column_headers_longer_than_content() {
        let config = ReportConfig::builder()
            .column_headers(["r1", "r2", "r3"])
            .content_columns(["one"])
            .comments("end")
            .build();
        let mut sheet = MemorySheet::new();

        let summary = compose(&config, &[json!({"one": "x"})], &mut sheet).unwrap();

        assert_eq!(summary.cursor, 1);
        assert_eq!(summary.comment_row, Some(3));
        assert_eq!(text(&sheet, 2, 0).as_deref(), Some("r3"));
        assert_eq!(text(&sheet, 3, 0).as_deref(), Some("end"));
        assert_no_collisions(&summary);
    }

    #[test]
    fn test_bound_content_right_of_complex_column_headers() {
        let column_headers = vec![
            LogicalRow::with_cells([LogicalCell::spanned("Group", 2, 0), LogicalCell::new("Sub1")]),
            LogicalRow::with_cells([LogicalCell::new("Sub2")]),
        ];
        let config = ReportConfig::builder()
            .title("T")
            .complex_column_headers(column_headers)
            .content_columns(["one", "two"])
            .build();
        let records = vec![json!({"one": 1, "two": 2}), json!({"one": 3, "two": 4})];
        let mut sheet = MemorySheet::new();

        let summary = compose(&config, &records, &mut sheet).unwrap();

        assert_eq!(text(&sheet, 1, 2).as_deref(), Some("1"));
        assert_eq!(text(&sheet, 2, 3).as_deref(), Some("4"));
        // The last occupied column, two label columns plus two content columns
        assert_eq!(summary.max_column, 3);
        assert_eq!(summary.title_merge, Some(range(0, 0, 1, 4)));
        assert_no_collisions(&summary);
    }

    #[test]
    fn test_comments_use_flat_header_width() {
        let config = ReportConfig::builder()
            .headers(["a", "b"])
            .content_columns(["a", "b"])
            .comments("end")
            .build();
        let records = vec![json!({"a": 1, "b": 2})];
        let mut sheet = MemorySheet::new();

        let summary = compose(&config, &records, &mut sheet).unwrap();

        assert_eq!(summary.comment_row, Some(2));
        assert_eq!(summary.cursor, 2);
        assert_eq!(sheet.merges(), &[range(2, 0, 1, 2)]);
    }

    #[test]
    fn test_single_column_sheet_skips_full_width_merges() {
        let config = ReportConfig::builder()
            .title("T")
            .content_columns(["a"])
            .comments("c")
            .build();
        let mut sheet = MemorySheet::new();

        let summary = compose(&config, &[json!({"a": 1})], &mut sheet).unwrap();

        assert_eq!(summary.max_column, 0);
        assert!(summary.title_merge.is_none());
        assert!(sheet.merges().is_empty());
    }

    #[test]
    fn test_headerless_content_sets_width() {
        let config = ReportConfig::builder()
            .title("T")
            .content_columns(["one", "two", "three"])
            .build();
        let mut sheet = MemorySheet::new();

        let summary = compose(&config, &sample_records(), &mut sheet).unwrap();

        assert_eq!(summary.max_column, 2);
        assert_eq!(summary.title_merge, Some(range(0, 0, 1, 3)));
    }

    #[test]
    fn test_header_width_not_overridden_by_content() {
        let header = vec![LogicalRow::with_cells([LogicalCell::spanned("H", 0, 2)])];
        let config = ReportConfig::builder()
            .title("T")
            .complex_header(header)
            .content_columns(["one", "two", "three"])
            .build();
        let mut sheet = MemorySheet::new();

        let summary = compose(&config, &sample_records(), &mut sheet).unwrap();

        assert_eq!(summary.max_column, 1);
        assert_eq!(summary.title_merge, Some(range(0, 0, 1, 2)));
    }

    #[test]
    fn test_column_widths_applied() {
        let header = vec![LogicalRow::with_cells([
            LogicalCell::spanned("wide", 0, 2).width(20),
            LogicalCell::new("x"),
        ])];
        let config = ReportConfig::builder()
            .complex_header(header)
            .force_column_width(0, 30)
            .force_column_width(2, 7)
            .build();
        let mut sheet = MemorySheet::new();

        compose(&config, NO_RECORDS, &mut sheet).unwrap();

        let widths: Vec<_> = sheet.column_widths().iter().map(|(&c, &w)| (c, w)).collect();
        assert_eq!(widths, vec![(0, 10), (1, 10), (2, 7)]);
    }

    #[test]
    fn test_unknown_property_renders_empty() {
        struct Item {
            one: Option<String>,
        }
        impl Record for Item {
            fn field(&self, name: &str) -> crate::binder::FieldValue {
                match name {
                    "one" => self.one.clone().into(),
                    _ => crate::binder::FieldValue::Unknown,
                }
            }
        }

        let config = ReportConfig::builder()
            .content_columns(["one", "missing"])
            .build();
        let records = vec![Item { one: None }, Item { one: Some("v".into()) }];
        let mut sheet = MemorySheet::new();

        compose(&config, &records, &mut sheet).unwrap();

        assert_eq!(text(&sheet, 0, 0).as_deref(), Some(""));
        assert_eq!(text(&sheet, 0, 1).as_deref(), Some(""));
        assert_eq!(text(&sheet, 1, 0).as_deref(), Some("v"));
        assert_ne!(text(&sheet, 0, 0).as_deref(), Some("null"));
    }

    #[test]
    fn test_export_writes_output() {
        let config = ReportConfig::builder().headers(["a"]).build();
        let mut sheet = MemorySheet::new();
        let mut out = Vec::new();

        export(&config, NO_RECORDS, &mut sheet, &mut out).unwrap();

        let json: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["rows"]["0"]["cells"]["0"]["content"]["value"], "a");
        assert_eq!(json["page_setup"]["paper"], "a4");
    }

    #[test]
    fn test_export_surfaces_write_failure() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let config = ReportConfig::builder().headers(["a"]).build();
        let mut sheet = MemorySheet::new();

        let err = export(&config, NO_RECORDS, &mut sheet, &mut Broken).unwrap_err();
        assert!(matches!(err, ExportError::Sink(_)));
    }

    #[test]
    fn test_state_does_not_leak_between_exports() {
        let config = ReportConfig::builder().complex_header(two_row_header()).build();

        let mut first = MemorySheet::new();
        let a = compose(&config, NO_RECORDS, &mut first).unwrap();
        let mut second = MemorySheet::new();
        let b = compose(&config, NO_RECORDS, &mut second).unwrap();

        assert_eq!(a, b);
        assert_eq!(first.merges(), second.merges());
    }
}
