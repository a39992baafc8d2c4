use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use barcoders::sym::code128::Code128;
use image::{GrayImage, ImageOutputFormat, Luma};
use lazy_static::lazy_static;
use log::{debug, info};
use regex::{Captures, Regex};
use tempfile::NamedTempFile;

use crate::error::{InventoryError, Result};
use crate::inventory::Inventory;

lazy_static! {
    // Upper case is escaped too, so names stay distinct on case-insensitive filesystems
    static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r"[^a-z0-9._-]").unwrap();
}

/// Code set B prefix understood by barcoders; covers printable ASCII.
const CODE_SET_B: char = 'Ɓ';

/// Blank modules on each side of the symbol.
const QUIET_ZONE: usize = 10;

/// Counts from one Stage A run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EncodeSummary {
    pub encoded: usize,
    pub reused: usize,
}

/// Directory of rendered barcode PNGs, one per barcode string.
#[derive(Clone, Debug)]
pub struct BarcodeCache {
    dir: PathBuf,
    height: u32,
    module_width: u32,
}

impl BarcodeCache {
    pub fn new(dir: impl AsRef<Path>, height: u32, module_width: u32) -> Self {
        BarcodeCache {
            dir: dir.as_ref().to_path_buf(),
            height: height.max(1),
            module_width: module_width.max(1),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name for a barcode. Bytes outside `[a-z0-9._-]` become `%XX`.
    pub fn png_path(&self, barcode: &str) -> PathBuf {
        let escaped = UNSAFE_FILENAME_CHARS.replace_all(barcode, |caps: &Captures| {
            caps[0]
                .bytes()
                .map(|b| format!("%{:02X}", b))
                .collect::<String>()
        });
        self.dir.join(format!("{}.png", escaped))
    }

    /// Render a PNG for every product, skipping barcodes already on disk.
    ///
    /// Stops at the first barcode that cannot be encoded.
    pub fn render_all(&self, inventory: &Inventory) -> Result<EncodeSummary> {
        fs::create_dir_all(&self.dir)?;
        let mut summary = EncodeSummary::default();

        for product in inventory.products() {
            if self.ensure(&product.barcode)? {
                summary.encoded += 1;
            } else {
                summary.reused += 1;
            }
        }

        info!(
            "barcode images: {} encoded, {} reused in {}",
            summary.encoded,
            summary.reused,
            self.dir.display()
        );
        Ok(summary)
    }

    /// Make sure the PNG for `barcode` exists. Returns true if it was drawn now.
    ///
    /// The image is written to a temporary file in the cache directory and
    /// renamed into place, so a PNG under its final name is always complete.
    pub fn ensure(&self, barcode: &str) -> Result<bool> {
        let path = self.png_path(barcode);
        if path.is_file() {
            return Ok(false);
        }

        let img = encode_image(barcode, self.height, self.module_width)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            img.write_to(&mut writer, ImageOutputFormat::Png)?;
            writer.flush()?;
        }
        tmp.persist(&path).map_err(|e| e.error)?;
        debug!("encoded {} -> {}", barcode, path.display());
        Ok(true)
    }
}

/// Code-128 module pattern for `barcode`: 1 is a bar, 0 a space.
pub fn encode_modules(barcode: &str) -> Result<Vec<u8>> {
    let rejected = |reason: String| InventoryError::Encoding {
        barcode: barcode.to_string(),
        reason,
    };

    if barcode.is_empty() {
        return Err(rejected("empty barcode".to_string()));
    }
    if let Some(c) = barcode.chars().find(|c| !(' '..='~').contains(c)) {
        return Err(rejected(format!("character {:?} is outside code set B", c)));
    }

    let symbol = Code128::new(format!("{}{}", CODE_SET_B, barcode))
        .map_err(|e| rejected(format!("{:?}", e)))?;
    Ok(symbol.encode())
}

/// Rasterize the barcode as a black-on-white grayscale image.
pub fn encode_image(barcode: &str, height: u32, module_width: u32) -> Result<GrayImage> {
    let modules = encode_modules(barcode)?;
    let module_width = module_width.max(1);
    let total = (modules.len() + 2 * QUIET_ZONE) as u32;

    let img = GrayImage::from_fn(total * module_width, height.max(1), |x, _| {
        let module = (x / module_width) as usize;
        let bar = module
            .checked_sub(QUIET_ZONE)
            .and_then(|i| modules.get(i))
            .is_some_and(|&m| m == 1);
        if bar { Luma([0u8]) } else { Luma([255u8]) }
    });

    Ok(img)
}
