use serde::{Deserialize, Serialize};

/// Paper sizes a report can be printed on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    #[default]
    A4,
    Letter,
}

impl PaperSize {
    /// Paper size code used by the OOXML print settings
    pub fn ooxml_code(&self) -> u8 {
        match self {
            PaperSize::Letter => 1,
            PaperSize::A4 => 9,
        }
    }
}

/// Page margins in inches
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Margins {
            top: 0.5,
            bottom: 0.5,
            left: 0.1,
            right: 0.1,
        }
    }
}

/// Print settings applied to the exported sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSetup {
    #[serde(default)]
    pub paper: PaperSize,
    #[serde(default)]
    pub margins: Margins,
    /// Scale the sheet to one page wide
    #[serde(default = "default_true")]
    pub fit_to_page: bool,
    #[serde(default = "default_true")]
    pub center_horizontally: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PageSetup {
    fn default() -> Self {
        PageSetup {
            paper: PaperSize::A4,
            margins: Margins::default(),
            fit_to_page: true,
            center_horizontally: true,
        }
    }
}
