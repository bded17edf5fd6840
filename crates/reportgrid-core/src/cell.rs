use serde::{Deserialize, Deserializer, Serialize};

use crate::format::{CellStyle, HorizontalAlign};
use crate::range::{MAX_COLUMNS, MAX_ROWS};

/// Largest integer magnitude an `f64` holds exactly (2^53)
const MAX_EXACT_INTEGER: u64 = 1 << 53;

/// Represents the raw value stored in a cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Boolean(bool),
    Number(f64),
    Text(String),
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Empty
    }
}

impl CellValue {
    /// Render the value as display text
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Text(s) => s.clone(),
            CellValue::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

/// Integers a `f64` cannot hold exactly are kept as text
impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        if value.unsigned_abs() <= MAX_EXACT_INTEGER {
            CellValue::Number(value as f64)
        } else {
            CellValue::Text(value.to_string())
        }
    }
}

impl From<u64> for CellValue {
    fn from(value: u64) -> Self {
        if value <= MAX_EXACT_INTEGER {
            CellValue::Number(value as f64)
        } else {
            CellValue::Text(value.to_string())
        }
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

/// Collapse a span of 0 or 1 to 0 ("no merge") and cap it at `limit`
pub fn normalize_span(span: u32, limit: u32) -> u32 {
    if span <= 1 {
        0
    } else {
        span.min(limit)
    }
}

fn deserialize_rowspan<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    u32::deserialize(deserializer).map(|span| normalize_span(span, MAX_ROWS))
}

fn deserialize_colspan<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    u32::deserialize(deserializer).map(|span| normalize_span(span, MAX_COLUMNS))
}

fn default_true() -> bool {
    true
}

fn default_center() -> HorizontalAlign {
    HorizontalAlign::Center
}

/// A caller-declared cell of a complex section.
///
/// Cells are bordered and centered unless told otherwise. Spans of 0 or 1
/// mean "no merge" in that direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalCell {
    pub value: CellValue,
    #[serde(default, deserialize_with = "deserialize_rowspan")]
    rowspan: u32,
    #[serde(default, deserialize_with = "deserialize_colspan")]
    colspan: u32,
    #[serde(default = "default_true")]
    pub border: bool,
    #[serde(default = "default_center")]
    pub align: HorizontalAlign,
    /// Width in character units, split evenly across spanned columns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Substrings of the text to underline, searched in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub underline: Vec<String>,
}

impl LogicalCell {
    /// A single bordered, centered cell
    pub fn new(value: impl Into<CellValue>) -> Self {
        Self::spanned(value, 0, 0)
    }

    /// A bordered, centered cell covering `rowspan` x `colspan`
    pub fn spanned(value: impl Into<CellValue>, rowspan: u32, colspan: u32) -> Self {
        LogicalCell {
            value: value.into(),
            rowspan: normalize_span(rowspan, MAX_ROWS),
            colspan: normalize_span(colspan, MAX_COLUMNS),
            border: true,
            align: HorizontalAlign::Center,
            width: None,
            underline: Vec::new(),
        }
    }

    /// Builder pattern: left-align the text
    pub fn align_left(mut self) -> Self {
        self.align = HorizontalAlign::Left;
        self
    }

    /// Builder pattern: drop the border
    pub fn no_border(mut self) -> Self {
        self.border = false;
        self
    }

    /// Builder pattern: set the width in character units
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Builder pattern: underline these substrings of the text
    pub fn underline<I, S>(mut self, substrings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.underline = substrings.into_iter().map(Into::into).collect();
        self
    }

    pub fn rowspan(&self) -> u32 {
        self.rowspan
    }

    pub fn colspan(&self) -> u32 {
        self.colspan
    }

    /// Whether the cell merges in either direction
    pub fn is_spanned(&self) -> bool {
        self.rowspan > 0 || self.colspan > 0
    }

    /// Rows covered, counting the anchor
    pub fn row_extent(&self) -> u32 {
        self.rowspan.max(1)
    }

    /// Columns covered, counting the anchor
    pub fn col_extent(&self) -> u32 {
        self.colspan.max(1)
    }

    /// Named style matching the cell's alignment and border flags
    pub fn style(&self) -> CellStyle {
        CellStyle::for_cell(self.align, self.border)
    }
}

/// An ordered list of cells forming one row of a complex section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogicalRow {
    /// Row height in points; a render hint with no effect on placement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default)]
    pub cells: Vec<LogicalCell>,
}

impl LogicalRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a row from a list of cells
    pub fn with_cells(cells: impl IntoIterator<Item = LogicalCell>) -> Self {
        LogicalRow {
            height: None,
            cells: cells.into_iter().collect(),
        }
    }

    /// Builder pattern: set the row height; non-positive heights are ignored
    pub fn height(mut self, height: f64) -> Self {
        self.height = if height > 0.0 { Some(height) } else { None };
        self
    }

    /// Builder pattern: append a cell
    pub fn cell(mut self, cell: LogicalCell) -> Self {
        self.cells.push(cell);
        self
    }
}
