#![cfg(not(tarpaulin_include))]

use inventory::app;
use inventory::labels::LabelConfig;
use std::env;
use std::path::PathBuf;

/// Main entry point for the inventory dashboard
///
/// # Arguments
/// * `[inventory.csv]` - inventory file to open (default `inventory.csv`)
/// * `[labels.json]` - optional label configuration
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let csv_path = PathBuf::from(args.get(1).map(String::as_str).unwrap_or("inventory.csv"));
    let labels = match args.get(2) {
        Some(path) => LabelConfig::from_json_file(path)?,
        None => LabelConfig::default(),
    };

    app::run(csv_path, labels).await
}
