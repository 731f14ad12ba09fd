//! Scale factory: typed mappings from data values to pixel coordinates.
//!
//! `create_scale` never fails on data. Malformed values are dropped before
//! the domain is computed, and degenerate domains fall back to a kind that
//! can still be drawn:
//! - `logarithmic` with fewer than two distinct positive values becomes
//!   `linear` over the full numeric domain;
//! - `temporal` with no parseable dates becomes `ordinal-point` over the
//!   stringified raw values.

mod band;
mod linear;
mod log;
mod sqrt;
mod ticks;
mod time;

use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::primitives::datetime_to_epoch_millis;
use crate::core::{FieldValue, PixelRange};
use crate::error::ChartError;

pub use band::BandScale;
pub use linear::LinearScale;
pub use log::LogScale;
pub use sqrt::SqrtScale;
pub use ticks::{format_tick_number, nice_extent, step_precision, tick_step, ticks};
pub use time::{TimeInterval, TimeScale};

pub const DEFAULT_NICE_COUNT: usize = 10;
pub const DEFAULT_BAND_PADDING: f64 = 0.1;

/// Scale family requested by an axis or chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaleKind {
    #[default]
    Linear,
    Logarithmic,
    SquareRoot,
    Temporal,
    OrdinalBand,
    OrdinalPoint,
}

impl ScaleKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Logarithmic => "logarithmic",
            Self::SquareRoot => "square-root",
            Self::Temporal => "temporal",
            Self::OrdinalBand => "ordinal-band",
            Self::OrdinalPoint => "ordinal-point",
        }
    }

    #[must_use]
    pub fn is_continuous(self) -> bool {
        !matches!(self, Self::OrdinalBand | Self::OrdinalPoint)
    }
}

impl fmt::Display for ScaleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScaleKind {
    type Err = ChartError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "log" | "logarithmic" => Ok(Self::Logarithmic),
            "sqrt" | "square-root" => Ok(Self::SquareRoot),
            "time" | "temporal" => Ok(Self::Temporal),
            "band" | "ordinal-band" => Ok(Self::OrdinalBand),
            "point" | "ordinal-point" => Ok(Self::OrdinalPoint),
            _ => Err(ChartError::UnknownScaleKind(input.to_owned())),
        }
    }
}

/// Construction options shared by all scale kinds; each kind ignores the
/// fields that do not apply to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleOptions {
    pub nice: bool,
    pub nice_count: usize,
    pub force_zero: bool,
    pub domain_min: Option<f64>,
    pub domain_max: Option<f64>,
    pub padding: f64,
    pub reverse: bool,
}

impl Default for ScaleOptions {
    fn default() -> Self {
        Self {
            nice: false,
            nice_count: DEFAULT_NICE_COUNT,
            force_zero: false,
            domain_min: None,
            domain_max: None,
            padding: DEFAULT_BAND_PADDING,
            reverse: false,
        }
    }
}

impl ScaleOptions {
    #[must_use]
    pub fn with_nice(mut self, nice: bool) -> Self {
        self.nice = nice;
        self
    }

    #[must_use]
    pub fn with_force_zero(mut self, force_zero: bool) -> Self {
        self.force_zero = force_zero;
        self
    }

    #[must_use]
    pub fn with_domain_override(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.domain_min = min;
        self.domain_max = max;
        self
    }

    #[must_use]
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }
}

/// One axis tick: the data value, its pixel position and display label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub value: FieldValue,
    pub position: f64,
    pub label: String,
}

/// A constructed scale. Cloning or rebuilding from the same inputs yields an
/// equal value, so outputs can be compared directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Scale {
    Linear(LinearScale),
    Logarithmic(LogScale),
    SquareRoot(SqrtScale),
    Temporal(TimeScale),
    OrdinalBand(BandScale),
    OrdinalPoint(BandScale),
}

/// Builds a scale of `kind` over `values`, mapping into `range`.
#[must_use]
pub fn create_scale(
    kind: ScaleKind,
    values: &[FieldValue],
    range: PixelRange,
    options: &ScaleOptions,
) -> Scale {
    let range = if options.reverse {
        range.reversed()
    } else {
        range
    };

    match kind {
        ScaleKind::Linear => Scale::Linear(build_linear(values, range, options)),
        ScaleKind::SquareRoot => {
            let (start, end) = resolve_numeric_domain(numeric_extent(values), options);
            let scale = SqrtScale::new((start, end), range);
            let scale = if options.nice {
                reapply_overrides_sqrt(scale.nice(options.nice_count), options)
            } else {
                scale
            };
            Scale::SquareRoot(scale)
        }
        ScaleKind::Logarithmic => build_log(values, range, options),
        ScaleKind::Temporal => build_temporal(values, range, options),
        ScaleKind::OrdinalBand => {
            Scale::OrdinalBand(BandScale::new(ordinal_domain(values), range, options.padding))
        }
        ScaleKind::OrdinalPoint => {
            Scale::OrdinalPoint(BandScale::point(ordinal_domain(values), range, options.padding))
        }
    }
}

fn build_linear(values: &[FieldValue], range: PixelRange, options: &ScaleOptions) -> LinearScale {
    let domain = resolve_numeric_domain(numeric_extent(values), options);
    let scale = LinearScale::new(domain, range);
    if !options.nice {
        return scale;
    }
    let niced = scale.nice(options.nice_count).domain();
    LinearScale::new(apply_overrides(niced, options), range)
}

fn reapply_overrides_sqrt(scale: SqrtScale, options: &ScaleOptions) -> SqrtScale {
    SqrtScale::new(apply_overrides(scale.domain(), options), scale.range())
}

fn build_log(values: &[FieldValue], range: PixelRange, options: &ScaleOptions) -> Scale {
    let positive: Vec<f64> = values
        .iter()
        .filter_map(FieldValue::as_number)
        .filter(|value| *value > 0.0)
        .collect();
    let extent = extent_of(positive.iter().copied());

    let domain = match extent {
        Some((lo, hi)) if lo < hi => {
            let lo = options.domain_min.filter(|v| v.is_finite() && *v > 0.0).unwrap_or(lo);
            let hi = options.domain_max.filter(|v| v.is_finite() && *v > 0.0).unwrap_or(hi);
            Some(if lo <= hi { (lo, hi) } else { (hi, lo) })
        }
        _ => None,
    };

    match domain.and_then(|domain| LogScale::new(domain, range)) {
        Some(scale) => {
            let scale = if options.nice { scale.nice() } else { scale };
            Scale::Logarithmic(scale)
        }
        None => {
            debug!(
                positive_count = positive.len(),
                value_count = values.len(),
                "logarithmic domain is degenerate, falling back to linear"
            );
            Scale::Linear(build_linear(values, range, options))
        }
    }
}

fn build_temporal(values: &[FieldValue], range: PixelRange, options: &ScaleOptions) -> Scale {
    let mut dates = values.iter().filter_map(FieldValue::as_date);
    let Some(first) = dates.next() else {
        debug!(
            value_count = values.len(),
            "no parseable dates in temporal domain, falling back to ordinal points"
        );
        return Scale::OrdinalPoint(BandScale::point(ordinal_domain(values), range, options.padding));
    };

    let (lo, hi) = dates.fold((first, first), |(lo, hi), date| (lo.min(date), hi.max(date)));
    let scale = TimeScale::new((lo, hi), range);
    Scale::Temporal(if options.nice {
        scale.nice(options.nice_count)
    } else {
        scale
    })
}

/// De-duplicated, order-preserving keys of the non-null values.
#[must_use]
pub fn ordinal_domain(values: &[FieldValue]) -> IndexSet<String> {
    values.iter().filter_map(FieldValue::as_key).collect()
}

/// Min/max of the numerically coercible values.
#[must_use]
pub fn numeric_extent(values: &[FieldValue]) -> Option<(f64, f64)> {
    extent_of(values.iter().filter_map(FieldValue::as_number))
}

fn extent_of(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |extent, value| match extent {
        None => Some((value, value)),
        Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
    })
}

fn resolve_numeric_domain(extent: Option<(f64, f64)>, options: &ScaleOptions) -> (f64, f64) {
    let (mut lo, mut hi) = extent.unwrap_or((0.0, 1.0));
    if options.force_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    apply_overrides((lo, hi), options)
}

fn apply_overrides(domain: (f64, f64), options: &ScaleOptions) -> (f64, f64) {
    let lo = options.domain_min.filter(|v| v.is_finite()).unwrap_or(domain.0);
    let hi = options.domain_max.filter(|v| v.is_finite()).unwrap_or(domain.1);
    if lo <= hi { (lo, hi) } else { (hi, lo) }
}

impl Scale {
    /// Effective kind; may differ from the requested kind after a fallback.
    #[must_use]
    pub fn kind(&self) -> ScaleKind {
        match self {
            Self::Linear(_) => ScaleKind::Linear,
            Self::Logarithmic(_) => ScaleKind::Logarithmic,
            Self::SquareRoot(_) => ScaleKind::SquareRoot,
            Self::Temporal(_) => ScaleKind::Temporal,
            Self::OrdinalBand(_) => ScaleKind::OrdinalBand,
            Self::OrdinalPoint(_) => ScaleKind::OrdinalPoint,
        }
    }

    #[must_use]
    pub fn range(&self) -> PixelRange {
        match self {
            Self::Linear(scale) => scale.range(),
            Self::Logarithmic(scale) => scale.range(),
            Self::SquareRoot(scale) => scale.range(),
            Self::Temporal(scale) => scale.range(),
            Self::OrdinalBand(scale) | Self::OrdinalPoint(scale) => scale.range(),
        }
    }

    /// Maps a data value to a pixel coordinate.
    ///
    /// Returns `None` for values the scale cannot place (non-numeric input
    /// on numeric scales, non-positive input on log scales, unknown
    /// categories). For band scales the result is the band's leading edge.
    #[must_use]
    pub fn map(&self, value: &FieldValue) -> Option<f64> {
        match self {
            Self::Linear(scale) => scale.domain_to_pixel(value.as_number()?),
            Self::Logarithmic(scale) => scale.domain_to_pixel(value.as_number()?),
            Self::SquareRoot(scale) => scale.domain_to_pixel(value.as_number()?),
            Self::Temporal(scale) => scale.time_to_pixel(value.as_date()?),
            Self::OrdinalBand(scale) | Self::OrdinalPoint(scale) => {
                scale.position_of(&value.as_key()?)
            }
        }
    }

    /// Like [`Scale::map`], but returns the band centre for band scales.
    #[must_use]
    pub fn map_center(&self, value: &FieldValue) -> Option<f64> {
        self.map(value).map(|position| position + self.bandwidth() * 0.5)
    }

    #[must_use]
    pub fn map_number(&self, value: f64) -> Option<f64> {
        self.map(&FieldValue::Number(value))
    }

    /// Maps a pixel back to a domain value (category for ordinal scales).
    #[must_use]
    pub fn invert(&self, pixel: f64) -> Option<FieldValue> {
        match self {
            Self::Linear(scale) => scale.pixel_to_domain(pixel).map(FieldValue::Number),
            Self::Logarithmic(scale) => scale.pixel_to_domain(pixel).map(FieldValue::Number),
            Self::SquareRoot(scale) => scale.pixel_to_domain(pixel).map(FieldValue::Number),
            Self::Temporal(scale) => scale.pixel_to_time(pixel).map(FieldValue::Date),
            Self::OrdinalBand(scale) | Self::OrdinalPoint(scale) => {
                scale.category_at(pixel).map(FieldValue::from)
            }
        }
    }

    /// Pixel coordinate of the value baseline used by bars and areas.
    #[must_use]
    pub fn baseline(&self) -> f64 {
        match self {
            Self::Linear(scale) => scale.baseline(),
            Self::SquareRoot(scale) => scale.baseline(),
            other => other.range().start,
        }
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        match self {
            Self::OrdinalBand(scale) => scale.bandwidth(),
            _ => 0.0,
        }
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        match self {
            Self::OrdinalBand(scale) | Self::OrdinalPoint(scale) => scale.step(),
            _ => 0.0,
        }
    }

    /// Numeric domain of numeric scales; temporal domains in epoch ms.
    #[must_use]
    pub fn numeric_domain(&self) -> Option<(f64, f64)> {
        match self {
            Self::Linear(scale) => Some(scale.domain()),
            Self::Logarithmic(scale) => Some(scale.domain()),
            Self::SquareRoot(scale) => Some(scale.domain()),
            Self::Temporal(scale) => {
                let (start, end) = scale.domain();
                Some((datetime_to_epoch_millis(start), datetime_to_epoch_millis(end)))
            }
            Self::OrdinalBand(_) | Self::OrdinalPoint(_) => None,
        }
    }

    #[must_use]
    pub fn categories(&self) -> Option<&IndexSet<String>> {
        match self {
            Self::OrdinalBand(scale) | Self::OrdinalPoint(scale) => Some(scale.domain()),
            _ => None,
        }
    }

    /// Ticks for roughly `count` intervals. Ordinal scales emit one tick per
    /// category at the band centre regardless of `count`.
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<Tick> {
        let numeric = |pairs: Vec<(f64, String)>| -> Vec<Tick> {
            pairs
                .into_iter()
                .filter_map(|(value, label)| {
                    let position = self.map_number(value)?;
                    Some(Tick {
                        value: FieldValue::Number(value),
                        position,
                        label,
                    })
                })
                .collect()
        };

        match self {
            Self::Linear(scale) => numeric(scale.ticks(count)),
            Self::Logarithmic(scale) => numeric(scale.ticks(count)),
            Self::SquareRoot(scale) => numeric(scale.ticks(count)),
            Self::Temporal(scale) => scale
                .ticks(count)
                .into_iter()
                .filter_map(|(date, label)| {
                    Some(Tick {
                        value: FieldValue::Date(date),
                        position: scale.time_to_pixel(date)?,
                        label,
                    })
                })
                .collect(),
            Self::OrdinalBand(scale) | Self::OrdinalPoint(scale) => {
                let half = scale.bandwidth() * 0.5;
                scale
                    .domain()
                    .iter()
                    .filter_map(|key| {
                        Some(Tick {
                            value: FieldValue::Text(key.clone()),
                            position: scale.position_of(key)? + half,
                            label: key.clone(),
                        })
                    })
                    .collect()
            }
        }
    }
}
