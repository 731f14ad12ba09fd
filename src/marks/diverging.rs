use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{FieldSelection, FieldValue, Row, Scale};
use crate::error::{ChartError, ChartResult};

use super::cartesian::{BarGeometry, position_bars};
use super::BarOrientation;

/// Row ordering applied before diverging bars are positioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Keep the input order.
    #[default]
    None,
    Ascending,
    Descending,
    /// Largest magnitude first.
    Value,
}

impl SortMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Ascending => "ascending",
            Self::Descending => "descending",
            Self::Value => "value",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = ChartError;

    fn from_str(value: &str) -> ChartResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "ascending" | "asc" => Ok(Self::Ascending),
            "descending" | "desc" => Ok(Self::Descending),
            "value" | "magnitude" => Ok(Self::Value),
            other => Err(ChartError::InvalidData(format!("unknown sort mode `{other}`"))),
        }
    }
}

/// Returns the row order for `mode` as indices into `rows`.
///
/// The sort is stable: equal keys keep their original relative order.
/// When sorting, rows without a numeric `value_field` follow all numeric
/// rows in input order. `SortMode::None` is the identity permutation.
/// `rows` itself is left untouched.
#[must_use]
pub fn sort_permutation(rows: &[Row], value_field: &str, mode: SortMode) -> Vec<usize> {
    if mode == SortMode::None {
        return (0..rows.len()).collect();
    }

    let (mut numeric, missing): (Vec<(usize, f64)>, Vec<(usize, f64)>) = rows
        .iter()
        .enumerate()
        .map(|(index, row)| (index, row.number(value_field).unwrap_or(f64::NAN)))
        .partition(|(_, value)| !value.is_nan());

    match mode {
        SortMode::None => {}
        SortMode::Ascending => numeric.sort_by_key(|(_, value)| OrderedFloat(*value)),
        SortMode::Descending => numeric.sort_by_key(|(_, value)| Reverse(OrderedFloat(*value))),
        SortMode::Value => numeric.sort_by_key(|(_, value)| Reverse(OrderedFloat(value.abs()))),
    }

    trace!(
        mode = mode.as_str(),
        numeric = numeric.len(),
        missing = missing.len(),
        "sorted diverging rows"
    );

    numeric
        .into_iter()
        .chain(missing)
        .map(|(index, _)| index)
        .collect()
}

/// Label values in permutation order, for building the category scale.
#[must_use]
pub fn ordered_labels(rows: &[Row], label_field: &str, order: &[usize]) -> Vec<FieldValue> {
    order
        .iter()
        .filter_map(|&index| rows.get(index))
        .map(|row| row.get(label_field).clone())
        .collect()
}

/// `[-m, m]` where `m` is the largest magnitude in `value_field`.
///
/// An all-zero or empty column yields `[-1, 1]` so the scale stays usable.
#[must_use]
pub fn symmetric_domain(rows: &[Row], value_field: &str) -> (f64, f64) {
    let magnitude = rows
        .iter()
        .filter_map(|row| row.number(value_field))
        .map(f64::abs)
        .fold(0.0_f64, f64::max);
    if magnitude > 0.0 {
        (-magnitude, magnitude)
    } else {
        (-1.0, 1.0)
    }
}

/// Positions horizontal bars growing left or right of the zero baseline.
///
/// `order` is the permutation from [`sort_permutation`]; `row_index` on
/// the returned bars refers to the caller's original row positions.
#[must_use]
pub fn position_diverging_bars(
    rows: &[Row],
    fields: &FieldSelection,
    order: &[usize],
    category_scale: &Scale,
    value_scale: &Scale,
) -> Vec<BarGeometry> {
    let ordered: Vec<Row> = order
        .iter()
        .filter_map(|&index| rows.get(index).cloned())
        .collect();
    let mut bars = position_bars(
        &ordered,
        fields,
        category_scale,
        value_scale,
        BarOrientation::Horizontal,
        0.0,
    );
    for bar in &mut bars {
        if let Some(&original) = order.get(bar.row_index) {
            bar.row_index = original;
        }
    }
    bars
}
