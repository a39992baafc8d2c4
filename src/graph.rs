#![cfg(feature = "web")]
use std::io::Cursor;

use image::{ImageOutputFormat, RgbImage};
use plotters::prelude::*;

use crate::inventory::CategoryTotal;

/// Configuration options for the category chart
#[derive(Clone, Debug)]
pub struct ChartOptions {
    /// Title displayed at the top of the chart
    pub title: String,

    /// Label for the Y-axis
    pub y_label: String,

    /// Width of the chart in pixels
    pub width: u32,

    /// Height of the chart in pixels
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: "Stock distribution by category".to_string(),
            y_label: "Units in stock".to_string(),
            width: 800,
            height: 600,
        }
    }
}

/// Draws a bar chart of stock per category
///
/// One bar per category, labelled with the category name on the x-axis. The
/// chart is drawn into an in-memory RGB buffer which is then encoded as PNG.
///
/// # Returns
/// * A Result containing the PNG image data as bytes or an error
pub fn render_category_chart(
    totals: &[CategoryTotal],
    options: &ChartOptions,
) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let (width, height) = (options.width.max(1), options.height.max(1));
    let mut pixels = vec![255u8; (width * height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;

        let count = totals.len().max(1) as u32;
        let max_y = totals.iter().map(|t| t.stock).max().unwrap_or(0) + 1;

        let mut chart = ChartBuilder::on(&root)
            .caption(&options.title, ("sans-serif", 30).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d((0u32..count).into_segmented(), 0u64..max_y)?;

        let label = |v: &SegmentValue<u32>| match v {
            SegmentValue::CenterOf(i) => totals
                .get(*i as usize)
                .map(|t| t.category.clone())
                .unwrap_or_default(),
            _ => String::new(),
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(totals.len().max(1))
            .x_label_formatter(&label)
            .y_desc(&options.y_label)
            .draw()?;

        chart.draw_series(
            Histogram::vertical(&chart)
                .style(BLUE.filled())
                .margin(10)
                .data(totals.iter().enumerate().map(|(i, t)| (i as u32, t.stock))),
        )?;

        root.present()?;
    }

    let img = RgbImage::from_raw(width, height, pixels).ok_or("chart buffer has the wrong size")?;
    let mut png = Cursor::new(Vec::new());
    img.write_to(&mut png, ImageOutputFormat::Png)?;

    Ok(png.into_inner())
}
