use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::labels::layout::SheetLayout;

/// PDF points per inch.
pub const INCH: f32 = 72.0;

/// How labels are arranged on paper.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// A letter sheet tiled with a grid of labels
    Sheet,
    /// One label per page for roll-fed printers
    Roll,
}

impl LayoutMode {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "sheet" => Some(LayoutMode::Sheet),
            "roll" => Some(LayoutMode::Roll),
            _ => None,
        }
    }
}

/// Geometry of the label grid on a sheet. All lengths are in points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetOptions {
    pub page_width: f32,
    pub page_height: f32,
    pub cols: u32,
    pub rows: u32,
    pub margin_left: f32,
    pub margin_top: f32,
    pub gap_x: f32,
    pub gap_y: f32,
}

impl Default for SheetOptions {
    /// US Letter, 5 x 10 labels.
    fn default() -> Self {
        Self {
            page_width: 8.5 * INCH,
            page_height: 11.0 * INCH,
            cols: 5,
            rows: 10,
            margin_left: 0.25 * INCH,
            margin_top: 0.50 * INCH,
            gap_x: 0.125 * INCH,
            gap_y: 0.05 * INCH,
        }
    }
}

/// Configuration options for label generation
///
/// Lengths are in PDF points (1/72 inch). Every field has a default, so a
/// JSON file only needs to name what it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Directory the PDF is written to
    pub out_dir: PathBuf,

    /// Directory holding one PNG per barcode
    pub png_dir: PathBuf,

    pub mode: LayoutMode,

    pub label_width: f32,
    pub label_height: f32,

    /// Size the barcode image is drawn at inside a label
    pub code_width: f32,
    pub code_height: f32,

    /// Space between the barcode and the caption
    pub text_offset: f32,

    pub font_size: f32,

    /// Captions longer than this many characters are cut
    pub caption_max_chars: usize,

    /// Height in pixels of each rendered barcode PNG
    pub png_height: u32,

    /// Width in pixels of one Code-128 module
    pub png_module_width: u32,

    pub sheet: SheetOptions,
}

impl Default for LabelConfig {
    /// 1.5in x 1in labels on a letter sheet.
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("out"),
            png_dir: PathBuf::from("out").join("png"),
            mode: LayoutMode::Sheet,
            label_width: 1.5 * INCH,
            label_height: 1.0 * INCH,
            code_width: 1.3 * INCH,
            code_height: 0.45 * INCH,
            text_offset: 0.08 * INCH,
            font_size: 5.5,
            caption_max_chars: 30,
            png_height: 100,
            png_module_width: 2,
            sheet: SheetOptions::default(),
        }
    }
}

impl LabelConfig {
    /// Read a configuration file, falling back to defaults for missing keys.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Put the PNG cache and the PDF under `dir`.
    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.out_dir = dir.as_ref().to_path_buf();
        self.png_dir = self.out_dir.join("png");
        self
    }

    pub fn with_mode(mut self, mode: LayoutMode) -> Self {
        self.mode = mode;
        self
    }

    /// Where the finished document lands for the configured mode.
    pub fn output_path(&self) -> PathBuf {
        match self.mode {
            LayoutMode::Sheet => self.out_dir.join("labels_sheet.pdf"),
            LayoutMode::Roll => self.out_dir.join("labels_roll.pdf"),
        }
    }

    pub fn sheet_layout(&self) -> SheetLayout {
        SheetLayout {
            label_width: self.label_width,
            label_height: self.label_height,
            page_width: self.sheet.page_width,
            page_height: self.sheet.page_height,
            margin_left: self.sheet.margin_left,
            margin_top: self.sheet.margin_top,
            gap_x: self.sheet.gap_x,
            gap_y: self.sheet.gap_y,
            cols: self.sheet.cols,
            rows: self.sheet.rows,
        }
    }
}
