//! Legend entry geometry, flowed inside the band the layout reserved.
//!
//! Entries that would spill outside the band are dropped, so the legend
//! never overlaps the plotting rectangle.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::{LegendAlignment, LegendConfig};
use crate::core::scale::format_tick_number;
use crate::core::{Point, Rect};
use crate::layout::LayoutBox;
use crate::layout::text_metrics::{DEFAULT_CHAR_WIDTH_RATIO, estimate_text_width, line_height_px};
use crate::render::{Color, ColorAssignment, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive};

const SWATCH_TEXT_GAP_PX: f64 = 4.0;
const TEXT_COLOR: Color = Color::rgb(0.216, 0.255, 0.318);
const CONTAINMENT_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    /// Label plus the series total when values are shown.
    pub text: String,
    pub color: Color,
    pub swatch: Rect,
    pub text_anchor: Point,
    pub total: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendGeometry {
    pub band: Rect,
    pub font_size: f64,
    pub entries: Vec<LegendEntry>,
}

impl LegendGeometry {
    pub fn append_to_frame(&self, frame: &mut RenderFrame) {
        for entry in &self.entries {
            frame.rects.push(RectPrimitive::filled(entry.swatch, entry.color));
            if self.font_size > 0.0 && !entry.text.is_empty() {
                frame.texts.push(TextPrimitive::new(
                    entry.text.clone(),
                    entry.text_anchor.x,
                    entry.text_anchor.y,
                    self.font_size,
                    TEXT_COLOR,
                    TextHAlign::Left,
                ));
            }
        }
    }
}

struct Measured {
    label: String,
    text: String,
    color: Color,
    total: Option<f64>,
    width: f64,
}

/// Lays out one entry per assigned label.
///
/// Horizontal bands (top/bottom) flow entries in rows that wrap at the
/// band width; vertical bands stack one entry per line. `alignment`
/// distributes rows along the band. Returns `None` when the layout
/// reserved no legend band.
#[must_use]
pub fn build_legend(
    config: &LegendConfig,
    layout: &LayoutBox,
    assignment: &ColorAssignment,
    totals: Option<&IndexMap<String, f64>>,
) -> Option<LegendGeometry> {
    let band = layout.legend_band?;
    let content = band.inset(config.padding.max(0.0));
    let font_size = config.font_size_for(layout.breakpoint);
    let swatch_size = config.swatch_size.max(0.0);
    let row_height = line_height_px(font_size, 0.0).max(swatch_size);
    let spacing = config.item_spacing.max(0.0);

    let measured: Vec<Measured> = assignment
        .iter()
        .map(|(label, color)| {
            let total = totals
                .filter(|_| config.show_values)
                .and_then(|totals| totals.get(label).copied());
            let text = match total {
                Some(total) => format!("{label} ({})", format_total(total)),
                None => label.to_owned(),
            };
            let text = fit_text(&text, content.width - swatch_size - SWATCH_TEXT_GAP_PX, font_size);
            let width = swatch_size
                + SWATCH_TEXT_GAP_PX
                + estimate_text_width(&text, font_size, DEFAULT_CHAR_WIDTH_RATIO);
            Measured {
                label: label.to_owned(),
                text,
                color,
                total,
                width,
            }
        })
        .collect();

    let rows: Vec<Vec<Measured>> = if config.edge().is_horizontal() {
        wrap_rows(measured, content.width, spacing)
    } else {
        measured.into_iter().map(|entry| vec![entry]).collect()
    };

    let row_gap = if config.edge().is_horizontal() {
        spacing * 0.25
    } else {
        spacing * 0.5
    };
    let block_height = rows.len() as f64 * row_height + rows.len().saturating_sub(1) as f64 * row_gap;
    let mut y = content.y + align_offset(config.alignment, content.height, block_height).max(0.0);

    let mut entries = Vec::new();
    let mut dropped = 0_usize;
    for row in rows {
        let row_width = row_width(&row, spacing);
        let mut x = if config.edge().is_horizontal() {
            content.x + align_offset(config.alignment, content.width, row_width).max(0.0)
        } else {
            content.x
        };
        for entry in row {
            let swatch = Rect::new(x, y + (row_height - swatch_size) * 0.5, swatch_size, swatch_size);
            let footprint = Rect::new(x, y, entry.width, row_height);
            if band.contains_rect(footprint, CONTAINMENT_EPSILON) {
                entries.push(LegendEntry {
                    label: entry.label,
                    text: entry.text,
                    color: entry.color,
                    swatch,
                    text_anchor: Point::new(x + swatch_size + SWATCH_TEXT_GAP_PX, y + row_height * 0.5),
                    total: entry.total,
                });
            } else {
                dropped += 1;
            }
            x += entry.width + spacing;
        }
        y += row_height + row_gap;
    }

    trace!(entries = entries.len(), dropped, "laid out legend");
    Some(LegendGeometry {
        band,
        font_size,
        entries,
    })
}

fn wrap_rows(entries: Vec<Measured>, max_width: f64, spacing: f64) -> Vec<Vec<Measured>> {
    let mut rows: Vec<Vec<Measured>> = Vec::new();
    let mut current: Vec<Measured> = Vec::new();
    let mut current_width = 0.0;
    for entry in entries {
        let needed = if current.is_empty() {
            entry.width
        } else {
            current_width + spacing + entry.width
        };
        if !current.is_empty() && needed > max_width {
            rows.push(std::mem::take(&mut current));
            current_width = entry.width;
        } else {
            current_width = needed;
        }
        current.push(entry);
    }
    if !current.is_empty() {
        rows.push(current);
    }
    rows
}

fn row_width(row: &[Measured], spacing: f64) -> f64 {
    let widths: f64 = row.iter().map(|entry| entry.width).sum();
    widths + row.len().saturating_sub(1) as f64 * spacing
}

fn align_offset(alignment: LegendAlignment, available: f64, used: f64) -> f64 {
    match alignment {
        LegendAlignment::Start => 0.0,
        LegendAlignment::Center => (available - used) * 0.5,
        LegendAlignment::End => available - used,
    }
}

/// Truncates `text` with an ellipsis so its estimated width fits
/// `max_width`.
fn fit_text(text: &str, max_width: f64, font_size: f64) -> String {
    if estimate_text_width(text, font_size, DEFAULT_CHAR_WIDTH_RATIO) <= max_width {
        return text.to_owned();
    }
    let glyph = font_size * DEFAULT_CHAR_WIDTH_RATIO;
    if glyph <= 0.0 || max_width < glyph * 2.0 {
        return String::new();
    }
    let keep = (max_width / glyph).floor() as usize - 1;
    let mut fitted: String = text.chars().take(keep).collect();
    fitted.push('\u{2026}');
    fitted
}

fn format_total(total: f64) -> String {
    if total.fract() == 0.0 {
        format_tick_number(total, 0)
    } else {
        let text = format_tick_number(total, 2);
        text.trim_end_matches('0').trim_end_matches('.').to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_print_without_trailing_zeros() {
        assert_eq!(format_total(12.0), "12");
        assert_eq!(format_total(2.5), "2.5");
        assert_eq!(format_total(-0.126), "-0.13");
    }

    #[test]
    fn long_text_is_truncated_with_ellipsis() {
        assert_eq!(fit_text("short", 100.0, 10.0), "short");
        // 6px glyphs, 30px allows 5 glyphs: 4 chars plus the ellipsis.
        assert_eq!(fit_text("abcdefghij", 30.0, 10.0), "abcd\u{2026}");
        assert_eq!(fit_text("abcdefghij", 5.0, 10.0), "");
    }

    #[test]
    fn alignment_distributes_leftover_space() {
        assert_eq!(align_offset(LegendAlignment::Start, 100.0, 40.0), 0.0);
        assert_eq!(align_offset(LegendAlignment::Center, 100.0, 40.0), 30.0);
        assert_eq!(align_offset(LegendAlignment::End, 100.0, 40.0), 60.0);
    }
}
