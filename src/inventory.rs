use std::collections::{BTreeMap, HashMap};

use log::{debug, info};
use serde::Serialize;

use crate::error::{InventoryError, Result};
use crate::product::Product;

/// Columns every inventory file must carry.
pub const REQUIRED_COLUMNS: [&str; 5] = ["barcode", "name", "variant", "category", "stock"];

/// Where the interpreted columns sit in the header row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Columns {
    pub barcode: usize,
    pub name: usize,
    pub variant: usize,
    pub category: usize,
    pub stock: usize,
}

impl Columns {
    /// Locate the required columns, comparing trimmed lower-case names.
    pub fn locate(headers: &[String]) -> Result<Self> {
        let find = |wanted: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(wanted))
                .ok_or_else(|| InventoryError::Schema(format!("missing required column '{}'", wanted)))
        };

        Ok(Columns {
            barcode: find("barcode")?,
            name: find("name")?,
            variant: find("variant")?,
            category: find("category")?,
            stock: find("stock")?,
        })
    }
}

/// Record terminator of the file the table came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    /// Look at the end of the first line; a file without any newline is `Lf`.
    pub fn detect(bytes: &[u8]) -> Self {
        match bytes.iter().position(|&b| b == b'\n') {
            Some(i) if i > 0 && bytes[i - 1] == b'\r' => LineEnding::CrLf,
            _ => LineEnding::Lf,
        }
    }

    pub fn terminator(self) -> csv::Terminator {
        match self {
            LineEnding::Lf => csv::Terminator::Any(b'\n'),
            LineEnding::CrLf => csv::Terminator::CRLF,
        }
    }
}

/// The in-memory inventory table.
///
/// Rows keep the order they had in the file; `index` maps each barcode to its
/// row so scans do not walk the table.
#[derive(Clone, Debug)]
pub struct Inventory {
    headers: Vec<String>,
    columns: Columns,
    products: Vec<Product>,
    index: HashMap<String, usize>,
    line_ending: LineEnding,
}

/// Result of a successful scan.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ScanReceipt {
    pub barcode: String,
    pub name: String,
    pub stock: u32,
}

/// Total stock held in one category.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub stock: u64,
}

impl Inventory {
    /// Build a table from a header row and already parsed products.
    ///
    /// Fails when a required column is missing or a barcode appears twice.
    pub fn new(headers: Vec<String>, products: Vec<Product>) -> Result<Self> {
        let columns = Columns::locate(&headers)?;
        let mut index = HashMap::with_capacity(products.len());

        for (row, product) in products.iter().enumerate() {
            if index.insert(product.barcode.clone(), row).is_some() {
                return Err(InventoryError::Schema(format!(
                    "duplicate barcode '{}' (data row {})",
                    product.barcode,
                    row + 1
                )));
            }
        }

        Ok(Inventory {
            headers,
            columns,
            products,
            index,
            line_ending: LineEnding::Lf,
        })
    }

    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn columns(&self) -> Columns {
        self.columns
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, barcode: &str) -> Option<&Product> {
        self.index.get(barcode).map(|&row| &self.products[row])
    }

    /// Remove one unit of the product with this barcode.
    ///
    /// Returns the new stock and the product name. An unknown barcode leaves
    /// the table untouched.
    pub fn decrement_stock(&mut self, barcode: &str) -> Result<(u32, String)> {
        let row = *self
            .index
            .get(barcode)
            .ok_or_else(|| InventoryError::NotFound(barcode.to_string()))?;

        let product = &mut self.products[row];
        let stock = product.take_one();
        debug!("{} ({}) now at {}", product.barcode, product.name, stock);

        Ok((stock, product.name.clone()))
    }

    /// Put back a stock count taken before a scan whose save failed.
    pub fn restore_stock(&mut self, barcode: &str, stock: u32) {
        if let Some(&row) = self.index.get(barcode) {
            self.products[row].stock = stock;
        }
    }

    /// Trim a raw scanner token and decrement the matching product.
    pub fn scan(&mut self, token: &str) -> Result<ScanReceipt> {
        let code = token.trim();
        if code.is_empty() {
            return Err(InventoryError::EmptyInput);
        }

        let (stock, name) = self.decrement_stock(code)?;
        info!("scanned {}: {} -> new stock {}", code, name, stock);

        Ok(ScanReceipt {
            barcode: code.to_string(),
            name,
            stock,
        })
    }

    /// Products at or below `threshold`, in table order.
    pub fn low_stock(&self, threshold: u32) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.stock <= threshold)
            .collect()
    }

    /// Sum of stock per category, ordered by category name.
    pub fn stock_by_category(&self) -> Vec<CategoryTotal> {
        let mut totals: BTreeMap<&str, u64> = BTreeMap::new();
        for product in &self.products {
            *totals.entry(product.category.as_str()).or_insert(0) += u64::from(product.stock);
        }

        totals
            .into_iter()
            .map(|(category, stock)| CategoryTotal {
                category: category.to_string(),
                stock,
            })
            .collect()
    }

    /// Every row as strings in file column order, with current stock.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.products
            .iter()
            .map(|p| p.to_record(self.columns.stock))
            .collect()
    }

    /// The same projection as `rows`, restricted to the given products.
    pub fn rows_of(&self, products: &[&Product]) -> Vec<Vec<String>> {
        products
            .iter()
            .map(|p| p.to_record(self.columns.stock))
            .collect()
    }

    /// Print the table to stdout, one aligned line per row.
    pub fn display(&self, products: &[&Product]) {
        let rows = self.rows_of(products);
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.trim().chars().count()).collect();
        for row in &rows {
            for (c, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(c) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }

        let line = |cells: Vec<&str>| {
            cells
                .iter()
                .enumerate()
                .map(|(c, cell)| format!("{:<width$}", cell, width = widths.get(c).copied().unwrap_or(0)))
                .collect::<Vec<_>>()
                .join("  ")
        };

        println!("{}", line(self.headers.iter().map(|h| h.trim()).collect()));
        for row in &rows {
            println!("{}", line(row.iter().map(String::as_str).collect()));
        }
    }
}
