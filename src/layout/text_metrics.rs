//! Heuristic text measurement.
//!
//! Real glyph shaping belongs to the drawing surface. Layout only needs a
//! stable estimate: average glyph width is a fixed fraction of the font
//! size, and a line is `font_size * line_height` tall.

pub const DEFAULT_CHAR_WIDTH_RATIO: f64 = 0.6;
pub const DEFAULT_LINE_HEIGHT: f64 = 1.2;

pub(crate) fn non_negative(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

#[must_use]
pub fn estimate_width_for_chars(char_count: usize, font_size: f64, char_width_ratio: f64) -> f64 {
    char_count as f64 * non_negative(font_size) * non_negative(char_width_ratio)
}

#[must_use]
pub fn estimate_text_width(text: &str, font_size: f64, char_width_ratio: f64) -> f64 {
    estimate_width_for_chars(text.chars().count(), font_size, char_width_ratio)
}

#[must_use]
pub fn line_height_px(font_size: f64, line_height: f64) -> f64 {
    let line_height = if line_height.is_finite() && line_height > 0.0 {
        line_height
    } else {
        DEFAULT_LINE_HEIGHT
    };
    non_negative(font_size) * line_height
}

/// Size of the box covering a `width x height` label rotated by `degrees`,
/// returned as `(horizontal, vertical)` extents.
#[must_use]
pub fn rotated_extent(width: f64, height: f64, degrees: f64) -> (f64, f64) {
    let radians = if degrees.is_finite() {
        degrees.to_radians()
    } else {
        0.0
    };
    let (sin, cos) = (radians.sin().abs(), radians.cos().abs());
    (width * cos + height * sin, width * sin + height * cos)
}
