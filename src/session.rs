use std::path::{Path, PathBuf};

use log::{error, warn};

use crate::error::{InventoryError, Result};
use crate::inventory::{Inventory, ScanReceipt};
use crate::loader::load_inventory;
use crate::saving::save_inventory;

/// An interactive scanning session bound to one inventory file.
///
/// The table is read once when the session opens and every later view is
/// served from memory. A successful scan is written back to the file before
/// `scan` returns.
pub struct Session {
    path: PathBuf,
    inventory: Inventory,
}

impl Session {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let inventory = load_inventory(&path)?;
        Ok(Session { path, inventory })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Decrement the product behind `token` and persist the table.
    ///
    /// When the save fails the decrement is undone, so memory never holds a
    /// count the file does not.
    pub fn scan(&mut self, token: &str) -> Result<ScanReceipt> {
        let before = self.inventory.get(token.trim()).map(|p| p.stock);
        match self.inventory.scan(token) {
            Ok(receipt) => {
                if let Err(e) = save_inventory(&self.inventory, &self.path) {
                    if let Some(stock) = before {
                        self.inventory.restore_stock(&receipt.barcode, stock);
                    }
                    error!("could not save scan of {}: {}", receipt.barcode, e);
                    return Err(e);
                }
                Ok(receipt)
            }
            Err(InventoryError::EmptyInput) => {
                warn!("scan submitted without a barcode");
                Err(InventoryError::EmptyInput)
            }
            Err(e) => Err(e),
        }
    }

    /// Drop the in-memory copy and read the file again.
    pub fn reload(&mut self) -> Result<()> {
        self.inventory = load_inventory(&self.path)?;
        Ok(())
    }
}
