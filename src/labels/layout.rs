/// Grid geometry for tiling labels over sheets. Lengths are in points and the
/// page origin is the bottom-left corner, as in PDF.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SheetLayout {
    pub label_width: f32,
    pub label_height: f32,
    pub page_width: f32,
    pub page_height: f32,
    pub margin_left: f32,
    pub margin_top: f32,
    pub gap_x: f32,
    pub gap_y: f32,
    pub cols: u32,
    pub rows: u32,
}

/// Where one label goes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// 0-based page number
    pub page: usize,
    pub col: u32,
    pub row: u32,
    /// Bottom-left corner of the label cell
    pub x: f32,
    pub y: f32,
}

impl SheetLayout {
    /// Labels that fit on one page. Never zero.
    pub fn per_page(&self) -> usize {
        (self.cols.max(1) as usize) * (self.rows.max(1) as usize)
    }

    /// True when item `index` is the first label of a page other than the first.
    pub fn starts_new_page(&self, index: usize) -> bool {
        index > 0 && index % self.per_page() == 0
    }

    pub fn place(&self, index: usize) -> Placement {
        let cols = self.cols.max(1) as usize;
        let rows = self.rows.max(1) as usize;

        let col = index % cols;
        let row = (index / cols) % rows;
        let page = index / self.per_page();

        let x = self.margin_left + col as f32 * (self.label_width + self.gap_x);
        let y = self.page_height
            - self.margin_top
            - self.label_height
            - row as f32 * (self.label_height + self.gap_y);

        Placement {
            page,
            col: col as u32,
            row: row as u32,
            x,
            y,
        }
    }

    /// Pages needed for `count` labels.
    pub fn page_count(&self, count: usize) -> usize {
        count.div_ceil(self.per_page())
    }
}

/// Position of the barcode image and caption inside a label whose
/// bottom-left corner is at (`x`, `y`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellContent {
    pub image_x: f32,
    pub image_y: f32,
    pub caption_center_x: f32,
    pub caption_baseline_y: f32,
}

/// Center a `code_width` x `code_height` image horizontally in the cell and
/// lift it by `text_offset` to leave room for the caption underneath.
pub fn cell_content(
    x: f32,
    y: f32,
    label_width: f32,
    label_height: f32,
    code_width: f32,
    code_height: f32,
    text_offset: f32,
) -> CellContent {
    CellContent {
        image_x: x + (label_width - code_width) / 2.0,
        image_y: y + (label_height - code_height - text_offset) / 2.0 + text_offset,
        caption_center_x: x + label_width / 2.0,
        caption_baseline_y: y + (label_height - code_height) / 2.0 - text_offset,
    }
}
