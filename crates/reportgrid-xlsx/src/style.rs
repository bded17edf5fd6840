use std::collections::HashMap;

use reportgrid_core::{Border, CellFormat, CellStyle, HorizontalAlign, VerticalAlign};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder};

/// Convert a cell format to a rust_xlsxwriter format
pub fn to_xlsx_format(format: &CellFormat) -> Format {
    let mut xlsx = Format::new()
        .set_align(horizontal(format.horizontal_align))
        .set_align(vertical(format.vertical_align));

    if let Some(size) = format.font_size {
        xlsx = xlsx.set_font_size(size);
    }
    if format.wrap_text {
        xlsx = xlsx.set_text_wrap();
    }
    if let Some(border) = format.border {
        xlsx = with_border(xlsx, border);
    }

    xlsx
}

/// Add a border on all four sides
pub fn with_border(format: Format, border: Border) -> Format {
    let style = match border.weight {
        0 => FormatBorder::None,
        1 => FormatBorder::Thin,
        2 => FormatBorder::Medium,
        _ => FormatBorder::Thick,
    };
    format
        .set_border(style)
        .set_border_color(Color::RGB(border.color.to_rgb_u32()))
}

fn horizontal(align: HorizontalAlign) -> FormatAlign {
    match align {
        HorizontalAlign::Left => FormatAlign::Left,
        HorizontalAlign::Center => FormatAlign::Center,
        HorizontalAlign::Right => FormatAlign::Right,
    }
}

fn vertical(align: VerticalAlign) -> FormatAlign {
    match align {
        VerticalAlign::Top => FormatAlign::Top,
        VerticalAlign::Middle => FormatAlign::VerticalCenter,
        VerticalAlign::Bottom => FormatAlign::Bottom,
    }
}

/// One shared format per named style, built once per workbook
pub struct StyleFormats {
    styles: HashMap<CellStyle, Format>,
    plain: Format,
}

impl StyleFormats {
    pub fn new() -> Self {
        let styles = CellStyle::ALL
            .iter()
            .map(|style| (*style, to_xlsx_format(&style.format())))
            .collect();
        StyleFormats {
            styles,
            plain: Format::new(),
        }
    }

    /// Format for a cell's style; unstyled cells get the default format
    pub fn get(&self, style: Option<CellStyle>) -> &Format {
        style
            .and_then(|s| self.styles.get(&s))
            .unwrap_or(&self.plain)
    }
}

impl Default for StyleFormats {
    fn default() -> Self {
        Self::new()
    }
}
