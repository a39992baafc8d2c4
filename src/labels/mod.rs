//! Printable barcode labels.
//!
//! Generation runs in two stages. [`barcode`] turns every barcode string into
//! a Code-128 PNG, reusing files from earlier runs. [`document`] then places
//! those images with a caption on a label sheet or a label roll and writes a
//! PDF.

pub mod barcode;
pub mod caption;
pub mod config;
pub mod document;
pub mod layout;

use std::path::PathBuf;

use crate::error::Result;
use crate::inventory::Inventory;

pub use barcode::{BarcodeCache, EncodeSummary};
pub use config::{LabelConfig, LayoutMode, SheetOptions};
pub use layout::{Placement, SheetLayout};

/// Encode any missing barcode images, then build the label PDF.
///
/// # Returns
/// * `Result<PathBuf>` - Path of the generated document
///
/// # Examples
/// ```no_run
/// use inventory::labels::{LabelConfig, generate_labels_pdf};
/// use inventory::loader::load_inventory;
///
/// let table = load_inventory("inventory.csv").unwrap();
/// let pdf = generate_labels_pdf(&table, &LabelConfig::default()).unwrap();
/// println!("labels written to {}", pdf.display());
/// ```
pub fn generate_labels_pdf(inventory: &Inventory, config: &LabelConfig) -> Result<PathBuf> {
    let cache = BarcodeCache::new(&config.png_dir, config.png_height, config.png_module_width);
    cache.render_all(inventory)?;
    document::render_document(inventory, &cache, config)
}
