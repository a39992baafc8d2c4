/// Helvetica advance widths for ASCII 32..=126, in 1/1000 em (standard AFM).
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

const FALLBACK_WIDTH: u16 = 556;

/// Cut `text` to at most `max_chars` characters.
pub fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Width of `text` set in Helvetica at `font_size` points.
pub fn text_width(text: &str, font_size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| {
            let code = c as u32;
            if (32..=126).contains(&code) {
                u32::from(HELVETICA_WIDTHS[(code - 32) as usize])
            } else {
                u32::from(FALLBACK_WIDTH)
            }
        })
        .sum();
    units as f32 * font_size / 1000.0
}

/// Left edge that centers `text` on `center_x`.
pub fn centered_x(text: &str, font_size: f32, center_x: f32) -> f32 {
    center_x - text_width(text, font_size) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate("Widget - Blue", 30), "Widget - Blue");
        assert_eq!(truncate("abcdef", 3), "abc");
        assert_eq!(truncate("ééééé", 2), "éé");
    }

    #[test]
    fn widths_follow_the_metrics() {
        assert!((text_width("W", 1000.0) - 944.0).abs() < 1e-3);
        assert!((text_width("il", 10.0) - 4.44).abs() < 1e-3);
        assert!((centered_x("0", 10.0, 50.0) - 47.22).abs() < 1e-3);
    }
}
