use inventory::InventoryError;
use inventory::labels::document::render_document;
use inventory::labels::{BarcodeCache, LabelConfig, LayoutMode, generate_labels_pdf};
use inventory::loader::load_from_reader;
use inventory::Inventory;
use std::fs;
use tempfile::TempDir;

const SAMPLE: &str = "\
barcode,name,variant,category,stock
111,Widget,Blue,Tools,5
222,Gadget,Red,Tools,0
ABC-42,A product with a really long name indeed,Extra large,Toys,3
";

fn table(csv: &str) -> Inventory {
    load_from_reader(csv.as_bytes()).unwrap()
}

fn config(dir: &TempDir) -> LabelConfig {
    LabelConfig::default().with_output_dir(dir.path())
}

fn cache(cfg: &LabelConfig) -> BarcodeCache {
    BarcodeCache::new(&cfg.png_dir, cfg.png_height, cfg.png_module_width)
}

#[test]
fn test_stage_a_encodes_each_barcode_once() {
    let dir = TempDir::new().unwrap();
    let cfg = config(&dir);
    let inv = table(SAMPLE);
    let cache = cache(&cfg);

    let first = cache.render_all(&inv).unwrap();
    assert_eq!((first.encoded, first.reused), (3, 0));
    for product in inv.products() {
        assert!(cache.png_path(&product.barcode).is_file());
    }
    println!("✓ One PNG per barcode");

    let modified: Vec<_> = inv
        .products()
        .iter()
        .map(|p| fs::metadata(cache.png_path(&p.barcode)).unwrap().modified().unwrap())
        .collect();

    let second = cache.render_all(&inv).unwrap();
    assert_eq!((second.encoded, second.reused), (0, 3));

    let again: Vec<_> = inv
        .products()
        .iter()
        .map(|p| fs::metadata(cache.png_path(&p.barcode)).unwrap().modified().unwrap())
        .collect();
    assert_eq!(modified, again);
    println!("✓ Second run reuses every image without touching it");
}

#[test]
fn test_stage_a_leaves_only_finished_pngs() {
    let dir = TempDir::new().unwrap();
    let cfg = config(&dir);
    let inv = table(SAMPLE);
    let cache = cache(&cfg);

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| cache.render_all(&inv).unwrap());
        }
    });

    let names: Vec<String> = fs::read_dir(cache.dir())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 3);
    assert!(names.iter().all(|n| n.ends_with(".png")));

    for product in inv.products() {
        image::open(cache.png_path(&product.barcode)).unwrap();
    }
    render_document(&inv, &cache, &cfg).unwrap();
    println!("✓ Parallel Stage A runs leave complete images only");
}

#[test]
fn test_stage_a_only_encodes_new_barcodes() {
    let dir = TempDir::new().unwrap();
    let cfg = config(&dir);
    let cache = cache(&cfg);

    cache.render_all(&table(SAMPLE)).unwrap();

    let grown = format!("{}999,Doohickey,Small,Toys,1\n", SAMPLE);
    let summary = cache.render_all(&table(&grown)).unwrap();
    assert_eq!((summary.encoded, summary.reused), (1, 3));
}

#[test]
fn test_stage_a_rejects_unencodable_barcode() {
    let dir = TempDir::new().unwrap();
    let cfg = config(&dir);
    let inv = table("barcode,name,variant,category,stock\n111,Widget,Blue,Tools,5\nπ-1,Pie,Round,Food,2\n");

    let err = cache(&cfg).render_all(&inv).unwrap_err();
    match err {
        InventoryError::Encoding { barcode, .. } => assert_eq!(barcode, "π-1"),
        other => panic!("expected encoding error, got {:?}", other),
    }

    let err = generate_labels_pdf(&inv, &cfg).unwrap_err();
    assert!(matches!(err, InventoryError::Encoding { .. }));
    assert!(!cfg.output_path().exists());
    println!("✓ Unencodable barcode aborts the batch");
}

#[test]
fn test_stage_b_requires_every_image() {
    let dir = TempDir::new().unwrap();
    let cfg = config(&dir);
    let inv = table(SAMPLE);
    let cache = cache(&cfg);

    cache.render_all(&inv).unwrap();
    fs::remove_file(cache.png_path("222")).unwrap();

    let err = render_document(&inv, &cache, &cfg).unwrap_err();
    match err {
        InventoryError::MissingAsset { barcode, path } => {
            assert_eq!(barcode, "222");
            assert_eq!(path, cache.png_path("222"));
        }
        other => panic!("expected missing asset error, got {:?}", other),
    }
    println!("✓ Missing PNG is fatal for the layout stage");
}

#[test]
fn test_sheet_pdf_is_written_to_fixed_path() {
    let dir = TempDir::new().unwrap();
    let cfg = config(&dir);
    let inv = table(SAMPLE);

    let path = generate_labels_pdf(&inv, &cfg).unwrap();
    assert_eq!(path, dir.path().join("labels_sheet.pdf"));

    let bytes = fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    println!("✓ Sheet PDF generated at {}", path.display());

    let again = generate_labels_pdf(&inv, &cfg).unwrap();
    assert_eq!(again, path);
    assert!(fs::read(&again).unwrap().starts_with(b"%PDF"));
}

#[test]
fn test_roll_pdf_is_written_to_fixed_path() {
    let dir = TempDir::new().unwrap();
    let cfg = config(&dir).with_mode(LayoutMode::Roll);
    let inv = table(SAMPLE);

    let path = generate_labels_pdf(&inv, &cfg).unwrap();
    assert_eq!(path, dir.path().join("labels_roll.pdf"));
    assert!(fs::read(&path).unwrap().starts_with(b"%PDF"));
    println!("✓ Roll PDF generated");
}

fn bulk_table(count: usize) -> Inventory {
    let mut csv = String::from("barcode,name,variant,category,stock\n");
    for i in 0..count {
        csv.push_str(&format!("SKU{:04},Item {},Std,Bulk,{}\n", i, i, i % 7));
    }
    table(&csv)
}

fn pdf_page_count(path: &std::path::Path) -> usize {
    lopdf::Document::load(path).unwrap().get_pages().len()
}

#[test]
fn test_sheet_spanning_several_pages() {
    let dir = TempDir::new().unwrap();
    let cfg = config(&dir);
    let inv = bulk_table(120);

    let path = generate_labels_pdf(&inv, &cfg).unwrap();
    assert_eq!(cfg.sheet_layout().page_count(inv.len()), 3);
    assert_eq!(pdf_page_count(&path), 3);
    println!("✓ 120 labels fill 3 sheet pages");

    let full = bulk_table(50);
    let path = generate_labels_pdf(&full, &cfg).unwrap();
    assert_eq!(pdf_page_count(&path), 1);
}

#[test]
fn test_roll_has_one_page_per_label() {
    let dir = TempDir::new().unwrap();
    let cfg = config(&dir).with_mode(LayoutMode::Roll);

    let path = generate_labels_pdf(&table(SAMPLE), &cfg).unwrap();
    assert_eq!(pdf_page_count(&path), 3);

    let path = generate_labels_pdf(&bulk_table(7), &cfg).unwrap();
    assert_eq!(pdf_page_count(&path), 7);
    println!("✓ Roll mode emits one page per label");
}

#[test]
fn test_empty_inventory_still_produces_a_document() {
    let dir = TempDir::new().unwrap();
    let cfg = config(&dir);
    let inv = table("barcode,name,variant,category,stock\n");

    let path = generate_labels_pdf(&inv, &cfg).unwrap();
    assert!(path.is_file());
}

#[test]
fn test_caption_is_name_and_variant_truncated() {
    use inventory::labels::caption::truncate;

    let inv = table(SAMPLE);
    let widget = inv.get("111").unwrap();
    assert_eq!(widget.caption(), "Widget - Blue");

    let long = inv.get("ABC-42").unwrap();
    let caption = long.caption();
    let cut = truncate(&caption, LabelConfig::default().caption_max_chars);
    assert_eq!(cut.chars().count(), 30);
    assert_eq!(cut, "A product with a really long n");
}
