use std::collections::BTreeMap;
use std::sync::Arc;

use reportgrid_core::{LogicalRow, PageSetup};
use serde::{Deserialize, Serialize};

use crate::binder::{Formatters, Record};
use crate::error::ExportError;

/// A header or column-header section as resolved for layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Section<'a> {
    /// One scalar label per column (header) or per row (column header)
    Flat(&'a [String]),
    Complex(&'a [LogicalRow]),
}

impl Section<'_> {
    /// Rows the section spans on the sheet when laid out vertically
    pub fn row_count(&self) -> usize {
        match self {
            Section::Flat(labels) => labels.len(),
            Section::Complex(rows) => rows.len(),
        }
    }
}

/// The content section as resolved for layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Content<'a> {
    /// Property names read from each bound record
    Columns(&'a [String]),
    Complex(&'a [LogicalRow]),
}

/// Declarative description of one report sheet.
///
/// Built once through [`ReportConfig::builder`] or read from JSON, then
/// handed by reference to an export. Empty strings and empty lists count as
/// absent. When both the flat and the complex form of a section are given,
/// the complex form is used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    file_mark: Option<String>,
    title: Option<String>,
    subtitle: Option<String>,
    comments: Option<String>,
    headers: Vec<String>,
    complex_header: Vec<LogicalRow>,
    column_headers: Vec<String>,
    complex_column_headers: Vec<LogicalRow>,
    content_columns: Vec<String>,
    complex_content: Vec<LogicalRow>,
    /// Forced column widths in character units
    column_widths: BTreeMap<u32, u32>,
    content_row_height: Option<f64>,
    no_cell_format: bool,
    page: PageSetup,
    #[serde(skip)]
    formatters: Formatters,
}

fn non_empty(text: &Option<String>) -> Option<&str> {
    text.as_deref().filter(|t| !t.is_empty())
}

impl ReportConfig {
    pub fn builder() -> ReportConfigBuilder {
        ReportConfigBuilder::default()
    }

    /// Parse a configuration from JSON. Formatters cannot be expressed in
    /// JSON; attach them with [`ReportConfigBuilder::from_config`].
    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn file_mark(&self) -> Option<&str> {
        non_empty(&self.file_mark)
    }

    pub fn title(&self) -> Option<&str> {
        non_empty(&self.title)
    }

    pub fn subtitle(&self) -> Option<&str> {
        non_empty(&self.subtitle)
    }

    pub fn comments(&self) -> Option<&str> {
        non_empty(&self.comments)
    }

    pub fn header(&self) -> Option<Section<'_>> {
        resolve_section(&self.headers, &self.complex_header)
    }

    pub fn column_header(&self) -> Option<Section<'_>> {
        resolve_section(&self.column_headers, &self.complex_column_headers)
    }

    pub fn content(&self) -> Option<Content<'_>> {
        if !self.complex_content.is_empty() {
            Some(Content::Complex(&self.complex_content))
        } else if !self.content_columns.is_empty() {
            Some(Content::Columns(&self.content_columns))
        } else {
            None
        }
    }

    /// Labels of the header when it is flat, which fixes the sheet width
    pub fn flat_header(&self) -> Option<&[String]> {
        match self.header() {
            Some(Section::Flat(labels)) => Some(labels),
            _ => None,
        }
    }

    pub fn column_widths(&self) -> &BTreeMap<u32, u32> {
        &self.column_widths
    }

    pub fn content_row_height(&self) -> Option<f64> {
        self.content_row_height.filter(|h| *h > 0.0)
    }

    pub fn no_cell_format(&self) -> bool {
        self.no_cell_format
    }

    pub fn page_setup(&self) -> &PageSetup {
        &self.page
    }

    pub fn formatters(&self) -> &Formatters {
        &self.formatters
    }
}

fn resolve_section<'a>(flat: &'a [String], complex: &'a [LogicalRow]) -> Option<Section<'a>> {
    if !complex.is_empty() {
        Some(Section::Complex(complex))
    } else if !flat.is_empty() {
        Some(Section::Flat(flat))
    } else {
        None
    }
}

/// Builder for [`ReportConfig`]; setters may be called in any order
#[derive(Debug, Clone, Default)]
pub struct ReportConfigBuilder {
    config: ReportConfig,
}

fn strings<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

impl ReportConfigBuilder {
    /// Continue building from an existing configuration
    pub fn from_config(config: ReportConfig) -> Self {
        ReportConfigBuilder { config }
    }

    /// Unstyled mark in the first row, e.g. an attachment number
    pub fn file_mark(mut self, text: impl Into<String>) -> Self {
        self.config.file_mark = Some(text.into());
        self
    }

    pub fn title(mut self, text: impl Into<String>) -> Self {
        self.config.title = Some(text.into());
        self
    }

    pub fn subtitle(mut self, text: impl Into<String>) -> Self {
        self.config.subtitle = Some(text.into());
        self
    }

    /// Closing note placed under the content
    pub fn comments(mut self, text: impl Into<String>) -> Self {
        self.config.comments = Some(text.into());
        self
    }

    pub fn headers<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.headers = strings(labels);
        self
    }

    pub fn complex_header(mut self, rows: Vec<LogicalRow>) -> Self {
        self.config.complex_header = rows;
        self
    }

    /// Labels stacked down the first column, one per content row
    pub fn column_headers<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.column_headers = strings(labels);
        self
    }

    pub fn complex_column_headers(mut self, rows: Vec<LogicalRow>) -> Self {
        self.config.complex_column_headers = rows;
        self
    }

    /// Record properties rendered as content columns, in order
    pub fn content_columns<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.content_columns = strings(properties);
        self
    }

    pub fn complex_content(mut self, rows: Vec<LogicalRow>) -> Self {
        self.config.complex_content = rows;
        self
    }

    /// Force a column's width in character units. Widths declared by cells
    /// still override it.
    pub fn force_column_width(mut self, column: u32, width: u32) -> Self {
        self.config.column_widths.insert(column, width);
        self
    }

    /// Format the values of the given properties before they are written
    pub fn formatter<I, S, F>(mut self, properties: I, formatter: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&str, &dyn Record, usize) -> String + Send + Sync + 'static,
    {
        let formatter: Arc<dyn Fn(&str, &dyn Record, usize) -> String + Send + Sync> =
            Arc::new(formatter);
        for property in properties {
            self.config.formatters.insert(property, Arc::clone(&formatter));
        }
        self
    }

    /// Height of simple content rows in points
    pub fn content_row_height(mut self, height: f64) -> Self {
        self.config.content_row_height = Some(height);
        self
    }

    /// Write simple content without any cell style
    pub fn no_cell_format(mut self) -> Self {
        self.config.no_cell_format = true;
        self
    }

    pub fn page_setup(mut self, page: PageSetup) -> Self {
        self.config.page = page;
        self
    }

    pub fn build(self) -> ReportConfig {
        self.config
    }
}
