use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

use image::DynamicImage;
use log::info;
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference,
};

use crate::error::{InventoryError, Result};
use crate::inventory::Inventory;
use crate::labels::barcode::BarcodeCache;
use crate::labels::caption::{centered_x, truncate};
use crate::labels::config::{LabelConfig, LayoutMode};
use crate::labels::layout::cell_content;
use crate::product::Product;

const LAYER: &str = "Labels";

/// Images are placed at 72 dpi so one pixel is one point before scaling.
const IMAGE_DPI: f32 = 72.0;

fn mm(points: f32) -> Mm {
    Mm(points * 25.4 / 72.0)
}

/// Lay out one label per product and write the PDF.
///
/// Every barcode image must already be in `cache`; the document is always
/// rebuilt from scratch and overwrites the previous one.
pub fn render_document(
    inventory: &Inventory,
    cache: &BarcodeCache,
    config: &LabelConfig,
) -> Result<PathBuf> {
    let images = load_images(inventory, cache)?;

    let (page_width, page_height) = match config.mode {
        LayoutMode::Sheet => (config.sheet.page_width, config.sheet.page_height),
        LayoutMode::Roll => (config.label_width, config.label_height),
    };

    let (doc, page, layer) = PdfDocument::new("Labels", mm(page_width), mm(page_height), LAYER);
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let mut current = doc.get_page(page).get_layer(layer);
    let layout = config.sheet_layout();

    for (i, (product, img)) in inventory.products().iter().zip(images).enumerate() {
        let (x, y) = match config.mode {
            LayoutMode::Sheet => {
                if layout.starts_new_page(i) {
                    current = new_page(&doc, page_width, page_height);
                }
                let placement = layout.place(i);
                (placement.x, placement.y)
            }
            LayoutMode::Roll => {
                if i > 0 {
                    current = new_page(&doc, page_width, page_height);
                }
                (0.0, 0.0)
            }
        };

        draw_label(&current, &font, config, product, &img, x, y);
    }

    let path = config.output_path();
    fs::create_dir_all(&config.out_dir)?;
    doc.save(&mut BufWriter::new(File::create(&path)?))?;

    info!(
        "wrote {} labels ({:?} mode) to {}",
        inventory.len(),
        config.mode,
        path.display()
    );
    Ok(path)
}

fn load_images(inventory: &Inventory, cache: &BarcodeCache) -> Result<Vec<DynamicImage>> {
    inventory
        .products()
        .iter()
        .map(|product| {
            let path = cache.png_path(&product.barcode);
            if !path.is_file() {
                return Err(InventoryError::MissingAsset {
                    barcode: product.barcode.clone(),
                    path,
                });
            }
            Ok(image::open(&path)?)
        })
        .collect()
}

fn new_page(doc: &PdfDocumentReference, width: f32, height: f32) -> PdfLayerReference {
    let (page, layer) = doc.add_page(mm(width), mm(height), LAYER);
    doc.get_page(page).get_layer(layer)
}

fn draw_label(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    config: &LabelConfig,
    product: &Product,
    img: &DynamicImage,
    x: f32,
    y: f32,
) {
    let cell = cell_content(
        x,
        y,
        config.label_width,
        config.label_height,
        config.code_width,
        config.code_height,
        config.text_offset,
    );

    let transform = ImageTransform {
        translate_x: Some(mm(cell.image_x)),
        translate_y: Some(mm(cell.image_y)),
        scale_x: Some(config.code_width / img.width().max(1) as f32),
        scale_y: Some(config.code_height / img.height().max(1) as f32),
        dpi: Some(IMAGE_DPI),
        ..Default::default()
    };
    Image::from_dynamic_image(img).add_to_layer(layer.clone(), transform);

    let caption = product.caption();
    let caption = truncate(&caption, config.caption_max_chars);
    layer.use_text(
        caption,
        config.font_size,
        mm(centered_x(caption, config.font_size, cell.caption_center_x)),
        mm(cell.caption_baseline_y),
        font,
    );
}
