use serde::{Deserialize, Serialize};

use crate::core::{FieldSelection, FieldValue, Point, Rect, Row, Scale};

use super::BarOrientation;

/// Share of the step a bar fills when the category scale has no bands.
const FALLBACK_BAND_FILL: f64 = 0.8;

/// One scatter/line vertex in pixel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointGeometry {
    pub series: String,
    pub label: String,
    pub row_index: usize,
    pub value: f64,
    pub x: f64,
    pub y: f64,
}

/// One bar rectangle spanning from the value baseline to the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarGeometry {
    pub series: String,
    pub label: String,
    pub row_index: usize,
    pub value: f64,
    pub rect: Rect,
}

/// Polyline for one value field, in row order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPath {
    pub series: String,
    pub points: Vec<Point>,
    pub row_indices: Vec<usize>,
}

impl SeriesPath {
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Positions `(x(label), y(value))` for every row and value field.
///
/// Band scales place points at the band centre. Rows whose label or value
/// does not map are skipped.
#[must_use]
pub fn position_points(
    rows: &[Row],
    fields: &FieldSelection,
    x_scale: &Scale,
    y_scale: &Scale,
) -> Vec<PointGeometry> {
    let mut points = Vec::with_capacity(rows.len() * fields.value_fields().len());
    for series in fields.value_fields() {
        for (row_index, row) in rows.iter().enumerate() {
            let label_value = row.get(fields.label_field());
            let Some(value) = row.number(series) else {
                continue;
            };
            let (Some(x), Some(y)) = (
                x_scale.map_center(label_value),
                y_scale.map_center(&FieldValue::Number(value)),
            ) else {
                continue;
            };
            points.push(PointGeometry {
                series: series.clone(),
                label: label_value.to_string(),
                row_index,
                value,
                x,
                y,
            });
        }
    }
    points
}

/// Builds one polyline per value field.
#[must_use]
pub fn position_lines(
    rows: &[Row],
    fields: &FieldSelection,
    x_scale: &Scale,
    y_scale: &Scale,
) -> Vec<SeriesPath> {
    fields
        .value_fields()
        .iter()
        .map(|series| {
            let mut points = Vec::with_capacity(rows.len());
            let mut row_indices = Vec::with_capacity(rows.len());
            for (row_index, row) in rows.iter().enumerate() {
                let x = x_scale.map_center(row.get(fields.label_field()));
                let y = row
                    .number(series)
                    .and_then(|value| y_scale.map_center(&FieldValue::Number(value)));
                if let (Some(x), Some(y)) = (x, y) {
                    points.push(Point::new(x, y));
                    row_indices.push(row_index);
                }
            }
            SeriesPath {
                series: series.clone(),
                points,
                row_indices,
            }
        })
        .collect()
}

/// Positions grouped bars.
///
/// Each category band is split evenly between the value fields; with more
/// than one field, `group_padding` of every slot is left empty. The value
/// side spans from the value scale's baseline to the mapped value.
#[must_use]
pub fn position_bars(
    rows: &[Row],
    fields: &FieldSelection,
    category_scale: &Scale,
    value_scale: &Scale,
    orientation: BarOrientation,
    group_padding: f64,
) -> Vec<BarGeometry> {
    let series_count = fields.value_fields().len().max(1);
    let group_padding = if series_count > 1 && group_padding.is_finite() {
        group_padding.clamp(0.0, 0.9)
    } else {
        0.0
    };
    let baseline = value_scale.baseline();
    let fallback_width = category_scale.range().extent() / rows.len().max(1) as f64 * FALLBACK_BAND_FILL;

    let mut bars = Vec::with_capacity(rows.len() * series_count);
    for (row_index, row) in rows.iter().enumerate() {
        let label_value = row.get(fields.label_field());
        let Some((band_start, band_width)) = band_slot(category_scale, label_value, fallback_width) else {
            continue;
        };
        let slot = band_width / series_count as f64;
        let thickness = slot * (1.0 - group_padding);

        for (series_index, series) in fields.value_fields().iter().enumerate() {
            let Some(value) = row.number(series) else {
                continue;
            };
            let Some(value_px) = value_scale.map_center(&FieldValue::Number(value)) else {
                continue;
            };
            let offset = band_start + slot * series_index as f64 + (slot - thickness) * 0.5;
            let rect = match orientation {
                BarOrientation::Vertical => {
                    Rect::from_corners(offset, baseline, offset + thickness, value_px)
                }
                BarOrientation::Horizontal => {
                    Rect::from_corners(baseline, offset, value_px, offset + thickness)
                }
            };
            bars.push(BarGeometry {
                series: series.clone(),
                label: label_value.to_string(),
                row_index,
                value,
                rect,
            });
        }
    }
    bars
}

/// Leading edge and width of the slot a category occupies.
pub(crate) fn band_slot(scale: &Scale, value: &FieldValue, fallback_width: f64) -> Option<(f64, f64)> {
    let bandwidth = scale.bandwidth();
    if bandwidth > 0.0 {
        return Some((scale.map(value)?, bandwidth));
    }
    let width = if scale.step() > 0.0 {
        scale.step() * FALLBACK_BAND_FILL
    } else {
        fallback_width.max(0.0)
    };
    let center = scale.map_center(value)?;
    Some((center - width * 0.5, width))
}
