use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::core::{FieldValue, PixelRange, Point, Rect, Row, ScaleKind, ScaleOptions, create_scale};

/// Share of a full turn used by the longest radial bar.
const RADIAL_BAR_MAX_SWEEP: f64 = 1.5 * PI;

/// Angular sector. Angles are radians, clockwise from twelve o'clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcGeometry {
    pub label: String,
    pub row_index: usize,
    pub value: f64,
    pub center: Point,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl ArcGeometry {
    #[must_use]
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// `true` for segments that draw nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sweep() <= 0.0 || self.outer_radius <= self.inner_radius
    }

    /// Mid-angle, mid-radius point, used to anchor slice labels.
    #[must_use]
    pub fn centroid(&self) -> Point {
        let angle = (self.start_angle + self.end_angle) * 0.5;
        let radius = (self.inner_radius + self.outer_radius) * 0.5;
        polar_to_cartesian(self.center, radius, angle)
    }
}

/// Converts a clockwise-from-top angle to pixel space.
#[must_use]
pub fn polar_to_cartesian(center: Point, radius: f64, angle: f64) -> Point {
    Point::new(center.x + radius * angle.sin(), center.y - radius * angle.cos())
}

/// Circle inscribed in the plotting rectangle plus angular settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarLayout {
    pub center: Point,
    pub outer_radius: f64,
    pub inner_radius: f64,
    pub pad_angle: f64,
    pub start_angle: f64,
}

impl PolarLayout {
    #[must_use]
    pub fn new(inner: Rect, inner_radius_ratio: f64, pad_angle_deg: f64, start_angle_deg: f64) -> Self {
        let outer_radius = (inner.width.min(inner.height) * 0.5).max(0.0);
        let ratio = if inner_radius_ratio.is_finite() {
            inner_radius_ratio.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let finite_or_zero = |degrees: f64| if degrees.is_finite() { degrees.to_radians() } else { 0.0 };
        Self {
            center: inner.center(),
            outer_radius,
            inner_radius: outer_radius * ratio,
            pad_angle: finite_or_zero(pad_angle_deg).max(0.0),
            start_angle: finite_or_zero(start_angle_deg),
        }
    }

    /// Applies the pad angle to `[start, end]`, half on each side. The
    /// padded span never goes negative.
    #[must_use]
    pub fn pad(&self, start: f64, end: f64) -> (f64, f64) {
        let span = (end - start).max(0.0);
        let half = self.pad_angle.min(span) * 0.5;
        (start + half, end - half)
    }

    fn arc(&self, label: String, row_index: usize, value: f64, radii: (f64, f64), angles: (f64, f64)) -> ArcGeometry {
        let (start_angle, end_angle) = self.pad(angles.0, angles.1);
        ArcGeometry {
            label,
            row_index,
            value,
            center: self.center,
            inner_radius: radii.0,
            outer_radius: radii.1.max(radii.0),
            start_angle,
            end_angle,
        }
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|value| value.is_finite() && *value > 0.0)
}

/// Pie and donut slices: angle proportional to each value's share.
///
/// Non-positive and non-numeric values yield empty slices at the running
/// angle, so every row keeps an arc.
#[must_use]
pub fn position_pie(rows: &[Row], label_field: &str, value_field: &str, layout: &PolarLayout) -> Vec<ArcGeometry> {
    let total: f64 = rows.iter().filter_map(|row| positive(row.number(value_field))).sum();
    let mut angle = layout.start_angle;
    rows.iter()
        .enumerate()
        .map(|(row_index, row)| {
            let value = positive(row.number(value_field));
            let sweep = match value {
                Some(value) if total > 0.0 => value / total * TAU,
                _ => 0.0,
            };
            let start = angle;
            angle += sweep;
            layout.arc(
                row.get(label_field).to_string(),
                row_index,
                value.unwrap_or(0.0),
                (layout.inner_radius, layout.outer_radius),
                (start, angle),
            )
        })
        .collect()
}

/// Polar area (coxcomb): equal angles, radius from a square-root scale so
/// sector area tracks value.
#[must_use]
pub fn position_polar_area(
    rows: &[Row],
    label_field: &str,
    value_field: &str,
    layout: &PolarLayout,
) -> Vec<ArcGeometry> {
    if rows.is_empty() {
        return Vec::new();
    }
    let values: Vec<FieldValue> = rows
        .iter()
        .filter_map(|row| positive(row.number(value_field)).map(FieldValue::Number))
        .collect();
    let radius_scale = create_scale(
        ScaleKind::SquareRoot,
        &values,
        PixelRange::new(layout.inner_radius, layout.outer_radius),
        &ScaleOptions::default().with_force_zero(true),
    );
    let sweep = TAU / rows.len() as f64;

    rows.iter()
        .enumerate()
        .map(|(row_index, row)| {
            let value = positive(row.number(value_field));
            let outer = value
                .and_then(|value| radius_scale.map_number(value))
                .unwrap_or(layout.inner_radius);
            let start = layout.start_angle + sweep * row_index as f64;
            layout.arc(
                row.get(label_field).to_string(),
                row_index,
                value.unwrap_or(0.0),
                (layout.inner_radius, outer),
                (start, start + sweep),
            )
        })
        .collect()
}

/// Radial bars: one ring per category, sweep linear in value.
#[must_use]
pub fn position_radial_bars(
    rows: &[Row],
    label_field: &str,
    value_field: &str,
    layout: &PolarLayout,
) -> Vec<ArcGeometry> {
    let labels: Vec<FieldValue> = rows.iter().map(|row| row.get(label_field).clone()).collect();
    let ring_scale = create_scale(
        ScaleKind::OrdinalBand,
        &labels,
        PixelRange::new(layout.inner_radius, layout.outer_radius),
        &ScaleOptions::default(),
    );
    let values: Vec<FieldValue> = rows
        .iter()
        .filter_map(|row| positive(row.number(value_field)).map(FieldValue::Number))
        .collect();
    let sweep_scale = create_scale(
        ScaleKind::Linear,
        &values,
        PixelRange::new(0.0, RADIAL_BAR_MAX_SWEEP),
        &ScaleOptions::default().with_force_zero(true),
    );
    let band = ring_scale.bandwidth();

    rows.iter()
        .enumerate()
        .filter_map(|(row_index, row)| {
            let label = row.get(label_field);
            let ring_start = ring_scale.map(label)?;
            let value = positive(row.number(value_field));
            let sweep = value
                .and_then(|value| sweep_scale.map_number(value))
                .unwrap_or(0.0)
                .max(0.0);
            Some(layout.arc(
                label.to_string(),
                row_index,
                value.unwrap_or(0.0),
                (ring_start, ring_start + band),
                (layout.start_angle, layout.start_angle + sweep),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(pad_deg: f64) -> PolarLayout {
        PolarLayout::new(Rect::new(0.0, 0.0, 200.0, 100.0), 0.0, pad_deg, 0.0)
    }

    #[test]
    fn layout_fits_circle_in_rect() {
        let layout = layout(0.0);
        assert!((layout.outer_radius - 50.0).abs() <= 1e-9);
        assert_eq!(layout.center, Point::new(100.0, 50.0));
    }

    #[test]
    fn pad_never_inverts_a_segment() {
        let layout = layout(90.0);
        let (start, end) = layout.pad(0.0, 0.5);
        assert!((start - end).abs() <= 1e-12);
        let (start, end) = layout.pad(0.0, PI);
        assert!((start - PI / 4.0).abs() <= 1e-12);
        assert!((end - 3.0 * PI / 4.0).abs() <= 1e-12);
    }

    #[test]
    fn polar_to_cartesian_starts_at_top() {
        let point = polar_to_cartesian(Point::new(0.0, 0.0), 10.0, 0.0);
        assert!(point.x.abs() <= 1e-12);
        assert!((point.y + 10.0).abs() <= 1e-12);
    }
}
