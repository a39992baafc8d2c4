/*!
# Inventory Scanner

A small stock-keeping tool for a shop floor: scanning a product's barcode
takes one unit out of stock in a CSV-backed inventory table, and the same
table can be printed as sheets or rolls of Code-128 barcode labels.

## Architecture

### Inventory Store
- **loader**: reads the CSV file, checks the required columns
  (`barcode`, `name`, `variant`, `category`, `stock`) and builds the table
- **inventory**: the in-memory table, indexed by barcode, with the scan,
  low-stock and per-category views
- **saving**: writes the table back in place through a temporary file
- **session**: ties a loaded table to its file; every scan is saved at once

### Label Renderer
- **labels::barcode**: Code-128 PNG per barcode, cached on disk
- **labels::layout**: grid arithmetic for sheets and rolls
- **labels::document**: places images and captions into a PDF

### Dashboard (`web` feature)
- **app**: axum routes for scanning, table views, chart, labels and export
- **graph**: bar chart of stock per category
- **downloader**: CSV and XLSX export

## Binaries

- `inventory [inventory.csv] [labels.json]` - terminal scanner session
- `website [inventory.csv] [labels.json]` - browser dashboard on port 3000
*/

pub mod downloader;
pub mod error;
pub mod inventory;
pub mod labels;
pub mod loader;
pub mod product;
pub mod saving;
pub mod session;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod graph;

pub use error::{InventoryError, Result};
pub use inventory::{CategoryTotal, Inventory, LineEnding, ScanReceipt};
pub use product::Product;
pub use session::Session;
