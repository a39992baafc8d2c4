use std::fs;
use std::io::Write;
use std::path::Path;

use log::info;
use tempfile::NamedTempFile;

use crate::error::Result;
use crate::inventory::Inventory;

/// Serialize the table as CSV into any writer, ending records the way the
/// loaded file did.
pub fn write_inventory<W: Write>(inventory: &Inventory, writer: W) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .terminator(inventory.line_ending().terminator())
        .from_writer(writer);
    csv.write_record(inventory.headers())?;
    for row in inventory.rows() {
        csv.write_record(&row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Overwrite `filename` with the current table.
///
/// The rows go to a temporary file next to the target which is then renamed
/// over it, so a reader never sees a half-written inventory. An existing
/// file's permissions are carried over to the replacement.
pub fn save_inventory(inventory: &Inventory, filename: impl AsRef<Path>) -> Result<()> {
    let path = filename.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    write_inventory(inventory, std::io::BufWriter::new(tmp.as_file_mut()))?;
    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file().set_permissions(meta.permissions())?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    info!("saved {} products to {}", inventory.len(), path.display());
    Ok(())
}
