//! Axis geometry: domain line, tick marks, labels, gridlines and title.
//!
//! Tick positions come straight from the scale used for the marks, so a
//! gridline always passes through the marks it annotates.

use serde::{Deserialize, Serialize};

use crate::config::{AxisConfig, Edge};
use crate::core::{Point, Rect, Scale, Tick};
use crate::layout::LayoutBox;
use crate::layout::text_metrics::{
    DEFAULT_CHAR_WIDTH_RATIO, estimate_text_width, line_height_px, rotated_extent,
};
use crate::render::{
    Color, LinePrimitive, RenderFrame, TextHAlign, TextPrimitive, TextVAlign,
};

const LABEL_SPACING_PAD_PX: f64 = 4.0;
const POSITION_EPSILON: f64 = 1e-6;
const GRID_COLOR: Color = Color::rgba(0.82, 0.84, 0.86, 1.0);
const AXIS_STROKE_PX: f64 = 1.0;

/// Straight segment in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    #[must_use]
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    fn to_line(self, stroke_width: f64, color: Color) -> LinePrimitive {
        LinePrimitive::new(
            self.start.x,
            self.start.y,
            self.end.x,
            self.end.y,
            stroke_width,
            color,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTickGeometry {
    pub tick: Tick,
    pub mark: Segment,
    pub label_anchor: Point,
    /// `false` when the label was dropped to keep labels from colliding.
    pub label_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTitleGeometry {
    pub text: String,
    pub anchor: Point,
    pub font_size: f64,
    pub rotation_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisGeometry {
    pub edge: Edge,
    pub domain_line: Segment,
    pub ticks: Vec<AxisTickGeometry>,
    pub gridlines: Vec<Segment>,
    pub title: Option<AxisTitleGeometry>,
    pub font_size: f64,
    pub font_weight: u16,
    pub label_rotation_deg: f64,
    pub color: Color,
}

impl AxisGeometry {
    #[must_use]
    pub fn visible_labels(&self) -> impl Iterator<Item = &AxisTickGeometry> {
        self.ticks.iter().filter(|tick| tick.label_visible)
    }

    /// Appends gridlines, domain line, tick marks, labels and title.
    pub fn append_to_frame(&self, frame: &mut RenderFrame) {
        frame
            .lines
            .extend(self.gridlines.iter().map(|grid| grid.to_line(AXIS_STROKE_PX, GRID_COLOR)));
        frame
            .lines
            .push(self.domain_line.to_line(AXIS_STROKE_PX, self.color));

        let (h_align, v_align) = label_alignment(self.edge, self.label_rotation_deg);
        for tick in &self.ticks {
            frame.lines.push(tick.mark.to_line(AXIS_STROKE_PX, self.color));
            if tick.label_visible && !tick.tick.label.is_empty() && self.font_size > 0.0 {
                frame.texts.push(
                    TextPrimitive::new(
                        tick.tick.label.clone(),
                        tick.label_anchor.x,
                        tick.label_anchor.y,
                        self.font_size,
                        self.color,
                        h_align,
                    )
                    .with_v_align(v_align)
                    .with_rotation(self.label_rotation_deg)
                    .with_weight(self.font_weight),
                );
            }
        }

        if let Some(title) = self.title.as_ref().filter(|title| title.font_size > 0.0) {
            frame.texts.push(
                TextPrimitive::new(
                    title.text.clone(),
                    title.anchor.x,
                    title.anchor.y,
                    title.font_size,
                    self.color,
                    TextHAlign::Center,
                )
                .with_rotation(title.rotation_deg)
                .with_weight(600),
            );
        }
    }
}

/// Builds the geometry of `axis` drawn with `scale`, or `None` for hidden
/// axes.
#[must_use]
pub fn build_axis(axis: &AxisConfig, scale: &Scale, layout: &LayoutBox) -> Option<AxisGeometry> {
    let edge = axis.edge()?;
    let inner = layout.inner_rect();
    let horizontal = edge.is_horizontal();
    let range = scale.range();
    let font_size = axis.font_size(layout.breakpoint);
    let line_height = line_height_px(font_size, axis.typography.line_height);
    let color = Color::from_hex(&axis.typography.color).unwrap_or(Color::rgb(0.3, 0.3, 0.3));

    let count = axis.tick_policy.target_count(range.extent(), horizontal);
    let ticks: Vec<Tick> = scale
        .ticks(count)
        .into_iter()
        .filter(|tick| {
            tick.position >= range.min() - POSITION_EPSILON
                && tick.position <= range.max() + POSITION_EPSILON
        })
        .collect();

    let widest_label = ticks
        .iter()
        .map(|tick| estimate_text_width(&tick.label, font_size, DEFAULT_CHAR_WIDTH_RATIO))
        .fold(0.0_f64, f64::max);
    let (rotated_width, rotated_height) = if axis.label_rotation_deg == 0.0 {
        (widest_label, line_height)
    } else {
        rotated_extent(widest_label, line_height, axis.label_rotation_deg)
    };

    let baseline = edge_coordinate(edge, inner);
    let tick_length = axis.tick_length.max(0.0);
    let label_offset = tick_length + axis.tick_label_gap.max(0.0);
    let outward = outward_sign(edge);

    let domain_line = if horizontal {
        Segment::new(Point::new(inner.x, baseline), Point::new(inner.right(), baseline))
    } else {
        Segment::new(Point::new(baseline, inner.y), Point::new(baseline, inner.bottom()))
    };

    let min_spacing = if horizontal {
        rotated_width + LABEL_SPACING_PAD_PX
    } else {
        rotated_height
    };
    let positions: Vec<f64> = ticks.iter().map(|tick| tick.position).collect();
    let visible = select_with_min_spacing(&positions, min_spacing);

    let tick_geometry = ticks
        .into_iter()
        .zip(visible)
        .map(|(tick, label_visible)| {
            let position = tick.position;
            let (mark, label_anchor) = if horizontal {
                (
                    Segment::new(
                        Point::new(position, baseline),
                        Point::new(position, baseline + outward * tick_length),
                    ),
                    Point::new(position, baseline + outward * label_offset),
                )
            } else {
                (
                    Segment::new(
                        Point::new(baseline, position),
                        Point::new(baseline + outward * tick_length, position),
                    ),
                    Point::new(baseline + outward * label_offset, position),
                )
            };
            AxisTickGeometry {
                tick,
                mark,
                label_anchor,
                label_visible,
            }
        })
        .collect();

    let gridlines = if axis.show_grid {
        positions
            .iter()
            .map(|&position| {
                if horizontal {
                    Segment::new(Point::new(position, inner.y), Point::new(position, inner.bottom()))
                } else {
                    Segment::new(Point::new(inner.x, position), Point::new(inner.right(), position))
                }
            })
            .collect()
    } else {
        Vec::new()
    };

    let title = axis
        .title
        .as_deref()
        .filter(|_| axis.has_title())
        .map(|text| {
            let label_extent = if horizontal { rotated_height } else { rotated_width };
            let distance = label_offset
                + label_extent
                + axis.label_title_gap.max(0.0)
                + axis.title_font_size.max(0.0) * 0.5;
            let anchor = if horizontal {
                Point::new(inner.x + inner.width * 0.5, baseline + outward * distance)
            } else {
                Point::new(baseline + outward * distance, inner.y + inner.height * 0.5)
            };
            AxisTitleGeometry {
                text: text.trim().to_owned(),
                anchor,
                font_size: axis.title_font_size.max(0.0),
                rotation_deg: match edge {
                    Edge::Left => -90.0,
                    Edge::Right => 90.0,
                    Edge::Top | Edge::Bottom => 0.0,
                },
            }
        });

    Some(AxisGeometry {
        edge,
        domain_line,
        ticks: tick_geometry,
        gridlines,
        title,
        font_size,
        font_weight: axis.typography.font_weight,
        label_rotation_deg: axis.label_rotation_deg,
        color,
    })
}

fn edge_coordinate(edge: Edge, inner: Rect) -> f64 {
    match edge {
        Edge::Top => inner.y,
        Edge::Bottom => inner.bottom(),
        Edge::Left => inner.x,
        Edge::Right => inner.right(),
    }
}

/// Direction pointing away from the plot along the edge normal.
fn outward_sign(edge: Edge) -> f64 {
    match edge {
        Edge::Top | Edge::Left => -1.0,
        Edge::Bottom | Edge::Right => 1.0,
    }
}

fn label_alignment(edge: Edge, rotation_deg: f64) -> (TextHAlign, TextVAlign) {
    match edge {
        Edge::Bottom if rotation_deg != 0.0 => (TextHAlign::Right, TextVAlign::Middle),
        Edge::Top if rotation_deg != 0.0 => (TextHAlign::Left, TextVAlign::Middle),
        Edge::Bottom => (TextHAlign::Center, TextVAlign::Top),
        Edge::Top => (TextHAlign::Center, TextVAlign::Bottom),
        Edge::Left => (TextHAlign::Right, TextVAlign::Middle),
        Edge::Right => (TextHAlign::Left, TextVAlign::Middle),
    }
}

/// Flags which labels to keep so consecutive kept labels are at least
/// `min_spacing_px` apart in screen order.
///
/// The first label is always kept. The last label replaces the previously
/// kept one when it would otherwise be dropped and still fits, so axis
/// ends stay labelled.
pub(crate) fn select_with_min_spacing(positions: &[f64], min_spacing_px: f64) -> Vec<bool> {
    let mut keep = vec![true; positions.len()];
    if positions.len() < 2 || !min_spacing_px.is_finite() || min_spacing_px <= 0.0 {
        return keep;
    }

    let mut order: Vec<usize> = (0..positions.len()).collect();
    order.sort_by(|left, right| positions[*left].total_cmp(&positions[*right]));
    keep.fill(false);

    let mut selected: Vec<usize> = Vec::with_capacity(order.len());
    selected.push(order[0]);
    for &index in order.iter().skip(1) {
        let last = selected[selected.len() - 1];
        if positions[index] - positions[last] >= min_spacing_px {
            selected.push(index);
        }
    }

    let last_index = order[order.len() - 1];
    if selected.last() != Some(&last_index) {
        if selected.len() == 1 {
            selected[0] = last_index;
        } else {
            let penultimate = selected[selected.len() - 2];
            if positions[last_index] - positions[penultimate] >= min_spacing_px {
                let tail = selected.len() - 1;
                selected[tail] = last_index;
            }
        }
    }

    for index in selected {
        keep[index] = true;
    }
    keep
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spacing_keeps_ends_and_drops_crowded_labels() {
        let keep = select_with_min_spacing(&[0.0, 10.0, 20.0, 30.0, 40.0], 15.0);
        assert_eq!(keep, vec![true, false, true, false, true]);
    }

    #[test]
    fn spacing_works_on_descending_positions() {
        let keep = select_with_min_spacing(&[40.0, 30.0, 20.0, 10.0, 0.0], 15.0);
        assert_eq!(keep, vec![true, false, true, false, true]);
    }

    #[test]
    fn single_crowded_pair_keeps_the_last_label() {
        let keep = select_with_min_spacing(&[0.0, 5.0], 15.0);
        assert_eq!(keep, vec![false, true]);
    }
}
