pub mod cell;
pub mod error;
pub mod format;
pub mod page;
pub mod range;
pub mod rich_text;
pub mod sheet;
pub mod sink;

pub use cell::{normalize_span, CellValue, LogicalCell, LogicalRow};
pub use error::SinkError;
pub use format::{Border, CellFormat, CellStyle, Color, HorizontalAlign, VerticalAlign};
pub use page::{Margins, PageSetup, PaperSize};
pub use range::{col_to_label, CellCoord, CellRange, MAX_COLUMNS, MAX_ROWS};
pub use rich_text::{RichText, TextRun, Underlined};
pub use sheet::{MemorySheet, SheetCell, SheetCellContent, SheetRow};
pub use sink::{RowHandle, SpreadsheetSink};
