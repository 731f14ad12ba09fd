use serde::{Deserialize, Serialize};

use crate::core::PixelRange;

use super::ticks::format_tick_number;

/// Base-10 logarithmic scale. Only strictly positive values are mappable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogScale {
    domain_start: f64,
    domain_end: f64,
    range: PixelRange,
}

impl LogScale {
    /// Returns `None` unless both bounds are finite and positive.
    #[must_use]
    pub fn new(domain: (f64, f64), range: PixelRange) -> Option<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(domain.0) || !valid(domain.1) {
            return None;
        }
        Some(Self {
            domain_start: domain.0,
            domain_end: domain.1,
            range,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> PixelRange {
        self.range
    }

    /// Rounds the domain outward to enclosing powers of ten.
    #[must_use]
    pub fn nice(self) -> Self {
        let lo = self.domain_start.min(self.domain_end);
        let hi = self.domain_start.max(self.domain_end);
        let lo = 10_f64.powi(lo.log10().floor() as i32);
        let hi = 10_f64.powi(hi.log10().ceil() as i32);
        let (start, end) = if self.domain_start <= self.domain_end {
            (lo, hi)
        } else {
            (hi, lo)
        };
        Self {
            domain_start: start,
            domain_end: end,
            range: self.range,
        }
    }

    #[must_use]
    pub fn domain_to_pixel(self, value: f64) -> Option<f64> {
        if !value.is_finite() || value <= 0.0 {
            return None;
        }
        let log_start = self.domain_start.log10();
        let span = self.domain_end.log10() - log_start;
        if span == 0.0 {
            return Some(self.range.midpoint());
        }
        Some(self.range.lerp((value.log10() - log_start) / span))
    }

    #[must_use]
    pub fn pixel_to_domain(self, pixel: f64) -> Option<f64> {
        let range_span = self.range.span();
        if !pixel.is_finite() || range_span == 0.0 {
            return None;
        }
        let log_start = self.domain_start.log10();
        let span = self.domain_end.log10() - log_start;
        let normalized = (pixel - self.range.start) / range_span;
        Some(10_f64.powf(log_start + normalized * span))
    }

    /// Powers of ten inside the domain, with 2x/5x sub-ticks when only a few
    /// decades are covered and a stride when there are too many.
    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<(f64, String)> {
        let lo = self.domain_start.min(self.domain_end);
        let hi = self.domain_start.max(self.domain_end);
        let first = lo.log10().floor() as i32;
        let last = hi.log10().ceil() as i32;
        let decades = (last - first).max(1) as usize;
        let count = count.max(1);

        let multipliers: &[f64] = if decades * 3 <= count {
            &[1.0, 2.0, 5.0]
        } else {
            &[1.0]
        };
        let stride = if multipliers.len() == 1 {
            decades.div_ceil(count).max(1)
        } else {
            1
        };

        let mut values = Vec::new();
        for exponent in (first..=last).step_by(stride) {
            let power = 10_f64.powi(exponent);
            for multiplier in multipliers {
                let value = power * multiplier;
                if value >= lo * (1.0 - 1e-12) && value <= hi * (1.0 + 1e-12) {
                    values.push(value);
                }
            }
        }

        values
            .into_iter()
            .map(|value| {
                let precision = if value < 1.0 {
                    (-value.log10().floor()) as usize
                } else {
                    0
                };
                (value, format_tick_number(value, precision))
            })
            .collect()
    }
}
