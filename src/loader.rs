use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{info, warn};

use crate::error::{InventoryError, Result};
use crate::inventory::{Columns, Inventory, LineEnding};
use crate::product::{Product, parse_stock};

/// Load the inventory table from a CSV file
///
/// The header row must name the `barcode`, `name`, `variant`, `category` and
/// `stock` columns (case and surrounding whitespace are ignored). Any other
/// columns are kept as they are and written back on save.
///
/// # Arguments
/// * `path` - Path to the CSV file to load
///
/// # Returns
/// * `Result<Inventory>` - The loaded table, or a schema/CSV/I/O error
///
/// # Examples
/// ```no_run
/// use inventory::loader::load_inventory;
///
/// match load_inventory("inventory.csv") {
///     Ok(table) => println!("Loaded {} products", table.len()),
///     Err(e) => eprintln!("Error loading inventory: {}", e),
/// }
/// ```
pub fn load_inventory(path: impl AsRef<Path>) -> Result<Inventory> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let inventory = load_from_reader(file)?;
    info!("loaded {} products from {}", inventory.len(), path.display());
    Ok(inventory)
}

/// Same as [`load_inventory`], reading from any byte source.
///
/// The whole source is buffered so the line ending can be detected and kept
/// for the next save.
pub fn load_from_reader<R: Read>(mut reader: R) -> Result<Inventory> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let line_ending = LineEnding::detect(&bytes);

    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes.as_slice());

    let headers: Vec<String> = csv.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(InventoryError::Schema("CSV file has no header row".to_string()));
    }
    let columns = Columns::locate(&headers)?;

    let mut products = Vec::new();
    for (row, record) in csv.records().enumerate() {
        let record = record?;
        let cells: Vec<String> = record.iter().map(str::to_string).collect();
        products.push(parse_product(cells, &columns, row + 1)?);
    }

    Ok(Inventory::new(headers, products)?.with_line_ending(line_ending))
}

fn parse_product(cells: Vec<String>, columns: &Columns, row: usize) -> Result<Product> {
    let cell = |c: usize| cells.get(c).cloned().unwrap_or_default();

    let raw_stock = cell(columns.stock);
    let (stock, clamped) = parse_stock(&raw_stock).ok_or_else(|| {
        InventoryError::Schema(format!(
            "stock value '{}' in data row {} is not an integer",
            raw_stock, row
        ))
    })?;
    if clamped {
        warn!("negative stock '{}' in data row {} clamped to 0", raw_stock.trim(), row);
    }

    Ok(Product {
        barcode: cell(columns.barcode),
        name: cell(columns.name),
        variant: cell(columns.variant),
        category: cell(columns.category),
        stock,
        record: cells,
    })
}
