use inventory::labels::config::INCH;
use inventory::labels::layout::cell_content;
use inventory::labels::{LabelConfig, SheetLayout};

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

fn default_layout() -> SheetLayout {
    LabelConfig::default().sheet_layout()
}

#[test]
fn test_default_sheet_is_five_by_ten_on_letter() {
    let layout = default_layout();
    assert_eq!((layout.cols, layout.rows), (5, 10));
    assert_eq!(layout.per_page(), 50);
    assert!(approx(layout.page_width, 612.0));
    assert!(approx(layout.page_height, 792.0));
    println!("✓ Default sheet: 5 x 10 labels on 8.5in x 11in");
}

#[test]
fn test_index_maps_to_page_col_row() {
    let layout = default_layout();

    let cases = [
        (0, (0, 0, 0)),
        (4, (0, 4, 0)),
        (5, (0, 0, 1)),
        (49, (0, 4, 9)),
        (50, (1, 0, 0)),
        (57, (1, 2, 1)),
        (123, (2, 3, 4)),
    ];
    for (index, (page, col, row)) in cases {
        let p = layout.place(index);
        assert_eq!((p.page, p.col, p.row), (page, col, row), "index {}", index);
    }
    println!("✓ Linear index mapped to (page, col, row)");
}

#[test]
fn test_page_breaks_at_multiples_of_per_page() {
    let layout = default_layout();

    assert!(!layout.starts_new_page(0));
    assert!(!layout.starts_new_page(49));
    assert!(layout.starts_new_page(50));
    assert!(!layout.starts_new_page(51));
    assert!(layout.starts_new_page(100));

    assert_eq!(layout.place(49).page, 0);
    assert_eq!(layout.place(50).page, 1);

    assert_eq!(layout.page_count(0), 0);
    assert_eq!(layout.page_count(50), 1);
    assert_eq!(layout.page_count(51), 2);
    println!("✓ Item 50 starts page 2, item 49 is the last on page 1");
}

#[test]
fn test_placement_is_deterministic() {
    let layout = default_layout();
    for index in 0..200 {
        assert_eq!(layout.place(index), layout.place(index));
    }
}

#[test]
fn test_cell_coordinates_follow_margins_and_gaps() {
    let layout = default_layout();

    let first = layout.place(0);
    assert!(approx(first.x, 0.25 * INCH));
    assert!(approx(first.y, 11.0 * INCH - 0.5 * INCH - 1.0 * INCH));

    let second_col = layout.place(1);
    assert!(approx(second_col.x, 0.25 * INCH + 1.5 * INCH + 0.125 * INCH));
    assert!(approx(second_col.y, first.y));

    let second_row = layout.place(5);
    assert!(approx(second_row.x, first.x));
    assert!(approx(second_row.y, first.y - (1.0 * INCH + 0.05 * INCH)));

    let next_page = layout.place(50);
    assert!(approx(next_page.x, first.x));
    assert!(approx(next_page.y, first.y));
    println!("✓ Cell origins computed from the bottom-left page origin");
}

#[test]
fn test_last_row_stays_on_the_page() {
    let layout = default_layout();
    let last = layout.place(49);
    assert!(last.y >= 0.0);
    assert!(last.x + layout.label_width <= layout.page_width);
}

#[test]
fn test_cell_content_centers_image_and_caption() {
    let cfg = LabelConfig::default();
    let cell = cell_content(
        100.0,
        200.0,
        cfg.label_width,
        cfg.label_height,
        cfg.code_width,
        cfg.code_height,
        cfg.text_offset,
    );

    assert!(approx(cell.image_x, 100.0 + (1.5 - 1.3) * INCH / 2.0));
    assert!(approx(
        cell.image_y,
        200.0 + (1.0 - 0.45 - 0.08) * INCH / 2.0 + 0.08 * INCH
    ));
    assert!(approx(cell.caption_center_x, 100.0 + 0.75 * INCH));
    assert!(approx(cell.caption_baseline_y, 200.0 + (1.0 - 0.45) * INCH / 2.0 - 0.08 * INCH));
    assert!(cell.caption_baseline_y < cell.image_y);
}

#[test]
fn test_custom_grid() {
    let layout = SheetLayout {
        label_width: 100.0,
        label_height: 50.0,
        page_width: 400.0,
        page_height: 300.0,
        margin_left: 10.0,
        margin_top: 20.0,
        gap_x: 5.0,
        gap_y: 2.0,
        cols: 3,
        rows: 2,
    };

    let p = layout.place(5);
    assert_eq!((p.page, p.col, p.row), (0, 2, 1));
    assert!(approx(p.x, 10.0 + 2.0 * 105.0));
    assert!(approx(p.y, 300.0 - 20.0 - 50.0 - 52.0));
    assert!(layout.starts_new_page(6));
    assert_eq!(layout.place(6).page, 1);
}
