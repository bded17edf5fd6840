pub mod binder;
pub mod bounds;
pub mod composer;
pub mod config;
pub mod engine;
pub mod error;
pub mod merge;
pub mod position;
pub mod render;

pub use binder::{FieldBinder, FieldValue, Formatters, Record, ValueFormatter};
pub use bounds::{bounding_column, full_width};
pub use composer::{compose, export, ExportSummary, LayoutState};
pub use config::{Content, ReportConfig, ReportConfigBuilder, Section};
pub use engine::{lay_out_rows, place_scalar, GridState, Placement};
pub use error::{BindError, ExportError};
pub use merge::{merge_region, span_range};
pub use position::PositionMap;
pub use render::{render_complex, render_flat_column, render_flat_row, render_records, ContentOptions};
