use serde::{Deserialize, Serialize};

/// RGBA color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "default_alpha")]
    pub a: u8,
}

fn default_alpha() -> u8 {
    255
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    /// Pack as 0xRRGGBB, dropping alpha
    pub fn to_rgb_u32(&self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical text alignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    #[default]
    Middle,
    Bottom,
}

/// Border line drawn around a cell or merged region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Border {
    /// Line weight; 1 is a thin line
    pub weight: u8,
    pub color: Color,
}

impl Border {
    pub const THIN: Border = Border {
        weight: 1,
        color: Color::BLACK,
    };
}

/// Cell formatting properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellFormat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u8>,
    #[serde(default, skip_serializing_if = "is_default_h_align")]
    pub horizontal_align: HorizontalAlign,
    #[serde(default, skip_serializing_if = "is_default_v_align")]
    pub vertical_align: VerticalAlign,
    #[serde(default, skip_serializing_if = "is_false")]
    pub wrap_text: bool,
    /// Same border on all four sides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

fn is_default_h_align(a: &HorizontalAlign) -> bool {
    *a == HorizontalAlign::default()
}

fn is_default_v_align(a: &VerticalAlign) -> bool {
    *a == VerticalAlign::default()
}

impl CellFormat {
    /// Create a new format with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: set horizontal alignment
    pub fn with_horizontal_align(mut self, align: HorizontalAlign) -> Self {
        self.horizontal_align = align;
        self
    }

    /// Builder pattern: set vertical alignment
    pub fn with_vertical_align(mut self, align: VerticalAlign) -> Self {
        self.vertical_align = align;
        self
    }

    /// Builder pattern: set font size
    pub fn with_font_size(mut self, size: u8) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Builder pattern: wrap long text
    pub fn with_wrap_text(mut self, wrap: bool) -> Self {
        self.wrap_text = wrap;
        self
    }

    /// Builder pattern: border on all sides
    pub fn with_border(mut self, border: Border) -> Self {
        self.border = Some(border);
        self
    }
}

/// The fixed set of named styles a report sheet uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellStyle {
    /// Large centered title text
    Title,
    CenterBordered,
    CenterPlain,
    LeftBordered,
    LeftPlain,
}

impl CellStyle {
    pub const ALL: [CellStyle; 5] = [
        CellStyle::Title,
        CellStyle::CenterBordered,
        CellStyle::CenterPlain,
        CellStyle::LeftBordered,
        CellStyle::LeftPlain,
    ];

    /// Pick the body style for a cell's alignment and border flag.
    /// Right alignment is not part of the palette and falls back to left.
    pub fn for_cell(align: HorizontalAlign, border: bool) -> Self {
        match (align, border) {
            (HorizontalAlign::Center, true) => CellStyle::CenterBordered,
            (HorizontalAlign::Center, false) => CellStyle::CenterPlain,
            (_, true) => CellStyle::LeftBordered,
            (_, false) => CellStyle::LeftPlain,
        }
    }

    /// Concrete formatting for this style
    pub fn format(&self) -> CellFormat {
        match self {
            CellStyle::Title => CellFormat::new()
                .with_horizontal_align(HorizontalAlign::Center)
                .with_vertical_align(VerticalAlign::Middle)
                .with_font_size(18),
            CellStyle::CenterBordered => body_format(HorizontalAlign::Center).with_border(Border::THIN),
            CellStyle::CenterPlain => body_format(HorizontalAlign::Center),
            CellStyle::LeftBordered => body_format(HorizontalAlign::Left).with_border(Border::THIN),
            CellStyle::LeftPlain => body_format(HorizontalAlign::Left),
        }
    }
}

fn body_format(align: HorizontalAlign) -> CellFormat {
    CellFormat::new()
        .with_horizontal_align(align)
        .with_vertical_align(VerticalAlign::Middle)
        .with_wrap_text(true)
}
