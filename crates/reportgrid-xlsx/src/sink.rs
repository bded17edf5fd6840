use std::io::Write;

use reportgrid_core::{
    Border, CellCoord, CellRange, CellStyle, CellValue, MemorySheet, PageSetup, RichText,
    RowHandle, SheetCellContent, SinkError, SpreadsheetSink,
};
use rust_xlsxwriter::{Format, FormatUnderline, Workbook, Worksheet, XlsxError};

use crate::style::{with_border, StyleFormats};

/// Default worksheet name
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Header and footer margins in inches
const HEADER_FOOTER_MARGIN: f64 = 0.3;

/// Sink that produces a single-sheet `.xlsx` workbook.
///
/// Operations are buffered in a [`MemorySheet`]; the workbook is only built
/// when [`SpreadsheetSink::write_to`] is called.
#[derive(Debug, Clone)]
pub struct XlsxSink {
    sheet: MemorySheet,
    name: String,
}

impl XlsxSink {
    pub fn new() -> Self {
        Self::with_sheet_name(DEFAULT_SHEET_NAME)
    }

    pub fn with_sheet_name(name: impl Into<String>) -> Self {
        XlsxSink {
            sheet: MemorySheet::new(),
            name: name.into(),
        }
    }

    pub fn sheet_name(&self) -> &str {
        &self.name
    }

    /// Operations received so far
    pub fn sheet(&self) -> &MemorySheet {
        &self.sheet
    }

    /// Build the workbook from the buffered sheet
    pub fn to_workbook(&self) -> Result<Workbook, SinkError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        self.fill_worksheet(worksheet).map_err(backend)?;
        Ok(workbook)
    }

    fn fill_worksheet(&self, worksheet: &mut Worksheet) -> Result<(), XlsxError> {
        worksheet.set_name(&self.name)?;
        if let Some(page) = self.sheet.page_setup() {
            apply_page_setup(worksheet, page);
        }

        let formats = StyleFormats::new();

        // Merged anchors keep the region's format so a later write does not
        // drop the border.
        let mut anchor_formats: Vec<(CellCoord, Format)> = Vec::new();
        for range in self.sheet.merges() {
            let style = self.sheet.cell(range.start).and_then(|c| c.style);
            let mut format = formats.get(style).clone();
            if let Some(border) = self.region_border(range) {
                format = with_border(format, border);
            }
            worksheet.merge_range(
                range.start.row,
                col_num(range.start.col)?,
                range.end.row,
                col_num(range.end.col)?,
                "",
                &format,
            )?;
            anchor_formats.push((range.start, format));
        }

        for (index, row) in self.sheet.rows() {
            if let Some(height) = row.height {
                worksheet.set_row_height(index, height)?;
            }
            for (&col, cell) in &row.cells {
                let coord = CellCoord::new(index, col);
                let format = anchor_formats
                    .iter()
                    .find(|(anchor, _)| *anchor == coord)
                    .map(|(_, format)| format)
                    .unwrap_or_else(|| formats.get(cell.style));
                write_cell(worksheet, coord, &cell.content, format)?;
            }
        }

        for (&col, &width) in self.sheet.column_widths() {
            worksheet.set_column_width(col_num(col)?, width)?;
        }

        Ok(())
    }

    fn region_border(&self, range: &CellRange) -> Option<Border> {
        self.sheet
            .borders()
            .iter()
            .rev()
            .find(|(bordered, _)| bordered == range)
            .map(|(_, border)| *border)
    }
}

impl Default for XlsxSink {
    fn default() -> Self {
        Self::new()
    }
}

fn backend(err: XlsxError) -> SinkError {
    SinkError::Backend(err.to_string())
}

fn col_num(col: u32) -> Result<u16, XlsxError> {
    u16::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)
}

fn apply_page_setup(worksheet: &mut Worksheet, page: &PageSetup) {
    let margins = &page.margins;
    worksheet.set_paper_size(page.paper.ooxml_code());
    worksheet.set_margins(
        margins.left,
        margins.right,
        margins.top,
        margins.bottom,
        HEADER_FOOTER_MARGIN,
        HEADER_FOOTER_MARGIN,
    );
    if page.fit_to_page {
        // One page wide, as many pages tall as needed
        worksheet.set_print_fit_to_pages(1, 0);
    }
    worksheet.set_print_center_horizontally(page.center_horizontally);
}

fn write_cell(
    worksheet: &mut Worksheet,
    coord: CellCoord,
    content: &SheetCellContent,
    format: &Format,
) -> Result<(), XlsxError> {
    let row = coord.row;
    let col = col_num(coord.col)?;

    match content {
        SheetCellContent::Value(CellValue::Empty) => {
            worksheet.write_blank(row, col, format)?;
        }
        SheetCellContent::Value(CellValue::Text(text)) => {
            worksheet.write_string_with_format(row, col, text, format)?;
        }
        SheetCellContent::Value(CellValue::Number(n)) => {
            worksheet.write_number_with_format(row, col, *n, format)?;
        }
        SheetCellContent::Value(CellValue::Boolean(b)) => {
            worksheet.write_boolean_with_format(row, col, *b, format)?;
        }
        SheetCellContent::Rich(rich) => write_rich_text(worksheet, row, col, rich, format)?,
    }

    Ok(())
}

fn write_rich_text(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    rich: &RichText,
    format: &Format,
) -> Result<(), XlsxError> {
    let plain = Format::new();
    let underlined = Format::new().set_underline(FormatUnderline::Single);

    // Empty runs are rejected by the writer
    let segments: Vec<(&Format, &str)> = rich
        .runs
        .iter()
        .filter(|run| !run.text.is_empty())
        .map(|run| {
            let font = if run.underline { &underlined } else { &plain };
            (font, run.text.as_str())
        })
        .collect();

    if segments.is_empty() {
        worksheet.write_blank(row, col, format)?;
    } else {
        worksheet.write_rich_string_with_format(row, col, &segments, format)?;
    }
    Ok(())
}

impl SpreadsheetSink for XlsxSink {
    fn ensure_row(&mut self, row: u32) -> Result<RowHandle, SinkError> {
        self.sheet.ensure_row(row)
    }

    fn row_height(&self, row: RowHandle) -> Option<f64> {
        self.sheet.row_height(row)
    }

    fn set_row_height(&mut self, row: RowHandle, height: f64) -> Result<(), SinkError> {
        self.sheet.set_row_height(row, height)
    }

    fn write_value(&mut self, coord: CellCoord, value: &CellValue) -> Result<(), SinkError> {
        self.sheet.write_value(coord, value)
    }

    fn write_rich_text(&mut self, coord: CellCoord, text: &RichText) -> Result<(), SinkError> {
        self.sheet.write_rich_text(coord, text)
    }

    fn apply_style(&mut self, coord: CellCoord, style: CellStyle) -> Result<(), SinkError> {
        self.sheet.apply_style(coord, style)
    }

    fn merge(&mut self, range: CellRange) -> Result<(), SinkError> {
        self.sheet.merge(range)
    }

    fn set_region_border(&mut self, range: CellRange, border: Border) -> Result<(), SinkError> {
        self.sheet.set_region_border(range, border)
    }

    fn set_column_width(&mut self, col: u32, width: u32) -> Result<(), SinkError> {
        self.sheet.set_column_width(col, width)
    }

    fn set_page_setup(&mut self, page: &PageSetup) -> Result<(), SinkError> {
        self.sheet.set_page_setup(page)
    }

    fn write_to(&mut self, out: &mut dyn Write) -> Result<(), SinkError> {
        let mut workbook = self.to_workbook()?;
        let buffer = workbook.save_to_buffer().map_err(backend)?;
        out.write_all(&buffer)?;
        out.flush()?;
        tracing::debug!("Wrote {} bytes of xlsx for sheet {:?}", buffer.len(), self.name);
        Ok(())
    }
}
