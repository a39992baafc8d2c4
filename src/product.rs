use serde::Serialize;

/// One row of the inventory table.
///
/// The interpreted columns are copied out into named fields; `record` keeps
/// the whole row exactly as it was read so that columns the application does
/// not understand survive a save untouched. The stock cell inside `record` is
/// stale after a scan, `stock` is authoritative. A cell that still parses to
/// the current count keeps its original spelling (`05`, ` 3`).
#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct Product {
    pub barcode: String,
    pub name: String,
    pub variant: String,
    pub category: String,
    pub stock: u32,
    #[serde(skip)]
    pub record: Vec<String>,
}

impl Product {
    /// Take one unit out of stock, never going below zero.
    pub fn take_one(&mut self) -> u32 {
        self.stock = self.stock.saturating_sub(1);
        self.stock
    }

    /// Human readable line printed under the barcode on a label.
    pub fn caption(&self) -> String {
        format!("{} - {}", self.name, self.variant)
    }

    /// The row as it should be written back: the original cells, with the
    /// stock column replaced only when the count no longer matches it.
    pub fn to_record(&self, stock_column: usize) -> Vec<String> {
        let mut out = self.record.clone();
        if let Some(cell) = out.get_mut(stock_column) {
            if parse_stock(cell).map(|(count, _)| count) != Some(self.stock) {
                *cell = self.stock.to_string();
            }
        }
        out
    }
}

/// Parse a stock cell into a count, clamping negative numbers to zero.
///
/// Returns `None` when the cell is not an integer at all.
pub fn parse_stock(raw: &str) -> Option<(u32, bool)> {
    let value: i64 = raw.trim().parse().ok()?;
    if value < 0 {
        return Some((0, true));
    }
    Some((u32::try_from(value).unwrap_or(u32::MAX), false))
}
