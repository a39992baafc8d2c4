use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while loading, scanning, saving or printing.
///
/// `EmptyInput` and `NotFound` are the two everyday outcomes of a scan and are
/// shown to the operator as a warning and an error message respectively; the
/// other variants abort the action that raised them.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// The CSV file does not have the shape of an inventory table
    #[error("schema error: {0}")]
    Schema(String),

    /// A scan referenced a barcode that is not in the table
    #[error("Unknown barcode: {0}")]
    NotFound(String),

    /// A scan submitted nothing but whitespace
    #[error("No barcode received.")]
    EmptyInput,

    /// Code-128 cannot represent the barcode string
    #[error("cannot encode barcode {barcode:?} as Code-128: {reason}")]
    Encoding { barcode: String, reason: String },

    /// The layout stage needs a barcode image that was never rendered
    #[error("missing barcode image for {barcode:?} at {}", .path.display())]
    MissingAsset { barcode: String, path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("PDF error: {0}")]
    Pdf(#[from] printpdf::Error),

    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl InventoryError {
    /// True for the outcomes an operator can recover from by scanning again.
    pub fn is_scan_rejection(&self) -> bool {
        matches!(self, InventoryError::EmptyInput | InventoryError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, InventoryError>;
