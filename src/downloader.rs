use crate::error::Result;
use crate::inventory::Inventory;
use crate::saving::write_inventory;

/// Convert the inventory to CSV text
///
/// Produces exactly what `save_inventory` would write to disk: the original
/// header row followed by every product with its current stock.
///
/// # Examples
/// ```
/// use inventory::downloader::to_csv;
/// use inventory::loader::load_from_reader;
///
/// let table = load_from_reader("barcode,name,variant,category,stock\n111,Widget,Blue,Tools,5\n".as_bytes()).unwrap();
/// assert_eq!(to_csv(&table).unwrap(), "barcode,name,variant,category,stock\n111,Widget,Blue,Tools,5\n");
/// ```
pub fn to_csv(inventory: &Inventory) -> Result<String> {
    let mut buffer = Vec::new();
    write_inventory(inventory, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Convert the inventory to XLSX format
///
/// The stock column is written as numbers so it can be summed in a
/// spreadsheet application; every other cell is written as text.
///
/// # Returns
/// * `Result<Vec<u8>, Box<dyn Error>>` - XLSX file content as bytes or an error
#[cfg(feature = "web")]
pub fn to_xlsx(inventory: &Inventory) -> std::result::Result<Vec<u8>, Box<dyn std::error::Error>> {
    use rust_xlsxwriter::{Workbook, Worksheet};

    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();
    let stock_column = inventory.columns().stock;

    for (c, header) in inventory.headers().iter().enumerate() {
        worksheet.write_string(0, c as u16, header.trim())?;
    }

    for (r, product) in inventory.products().iter().enumerate() {
        let row = (r + 1) as u32;
        for (c, cell) in product.to_record(stock_column).iter().enumerate() {
            if c == stock_column {
                worksheet.write_number(row, c as u16, f64::from(product.stock))?;
            } else {
                worksheet.write_string(row, c as u16, cell)?;
            }
        }
    }

    workbook.push_worksheet(worksheet);
    let buffer = workbook.save_to_buffer()?;

    Ok(buffer)
}
