#![cfg(not(tarpaulin_include))]

use inventory::labels::{LabelConfig, LayoutMode, generate_labels_pdf};
use inventory::{InventoryError, Session};

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

fn print_help() {
    println!("Commands:");
    println!("  <barcode>: Scan a product (takes one unit out of stock)");
    println!("  scan <barcode>: Same, for barcodes that look like a command");
    println!("  list: Show the whole inventory");
    println!("  low <n>: Show products with stock at or below n");
    println!("  categories: Show total stock per category");
    println!("  labels [sheet|roll]: Generate the label PDF");
    println!("  export <file.xlsx>: Export the inventory as a spreadsheet");
    println!("  reload: Read the inventory file again");
    println!("  q: Quit");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let csv_path = PathBuf::from(args.get(1).map(String::as_str).unwrap_or("inventory.csv"));
    let labels = match args.get(2) {
        Some(path) => LabelConfig::from_json_file(path)?,
        None => LabelConfig::default(),
    };

    let mut session = Session::open(&csv_path)?;
    let mut status = String::from("ok");

    loop {
        print!("({}) > ", status);
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let command = line.trim();
        let (word, arg) = command.split_once(' ').unwrap_or((command, ""));
        let arg = arg.trim();

        status = match word {
            "q" => break,
            "help" => {
                print_help();
                String::from("ok")
            }
            "list" => {
                let inventory = session.inventory();
                inventory.display(&inventory.products().iter().collect::<Vec<_>>());
                String::from("ok")
            }
            "low" => match if arg.is_empty() { Ok(0) } else { arg.parse::<u32>() } {
                Ok(threshold) => {
                    let inventory = session.inventory();
                    inventory.display(&inventory.low_stock(threshold));
                    String::from("ok")
                }
                Err(_) => String::from("invalid threshold"),
            },
            "categories" => {
                for total in session.inventory().stock_by_category() {
                    println!("{:<20} {}", total.category, total.stock);
                }
                String::from("ok")
            }
            "labels" => {
                let mode = if arg.is_empty() { Some(labels.mode) } else { LayoutMode::parse(arg) };
                match mode {
                    Some(mode) => {
                        let config = labels.clone().with_mode(mode);
                        match generate_labels_pdf(session.inventory(), &config) {
                            Ok(path) => format!("labels saved to {}", path.display()),
                            Err(e) => e.to_string(),
                        }
                    }
                    None => String::from("unknown label mode"),
                }
            }
            "export" if !arg.is_empty() => export(&session, arg),
            "reload" => match session.reload() {
                Ok(()) => String::from("ok"),
                Err(e) => e.to_string(),
            },
            "scan" => scan(&mut session, arg),
            _ => scan(&mut session, command),
        };
    }

    Ok(())
}

fn scan(session: &mut Session, token: &str) -> String {
    match session.scan(token) {
        Ok(receipt) => format!("✓ {} → new stock: {}", receipt.name, receipt.stock),
        Err(InventoryError::EmptyInput) => String::from("No barcode received."),
        Err(e) => e.to_string(),
    }
}

#[cfg(feature = "web")]
fn export(session: &Session, path: &str) -> String {
    match inventory::downloader::to_xlsx(session.inventory()) {
        Ok(bytes) => match std::fs::write(path, bytes) {
            Ok(()) => format!("exported to {}", path),
            Err(e) => e.to_string(),
        },
        Err(e) => e.to_string(),
    }
}

#[cfg(not(feature = "web"))]
fn export(_session: &Session, _path: &str) -> String {
    String::from("Excel export requires the 'web' feature")
}
