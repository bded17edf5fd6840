pub mod sink;
pub mod style;

pub use sink::{XlsxSink, DEFAULT_SHEET_NAME};
pub use style::{to_xlsx_format, StyleFormats};
