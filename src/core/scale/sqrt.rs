use serde::{Deserialize, Serialize};

use crate::core::PixelRange;

use super::ticks::{format_tick_number, nice_extent, step_precision, tick_step, ticks};

fn signed_sqrt(value: f64) -> f64 {
    value.signum() * value.abs().sqrt()
}

fn signed_square(value: f64) -> f64 {
    value.signum() * value * value
}

/// Square-root scale: pixel distance grows with `sqrt(value)`, so a radius
/// drawn from it keeps circle/sector areas proportional to the value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SqrtScale {
    domain_start: f64,
    domain_end: f64,
    range: PixelRange,
}

impl SqrtScale {
    #[must_use]
    pub fn new(domain: (f64, f64), range: PixelRange) -> Self {
        Self {
            domain_start: domain.0,
            domain_end: domain.1,
            range,
        }
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> PixelRange {
        self.range
    }

    #[must_use]
    pub fn nice(self, count: usize) -> Self {
        let (start, end) = nice_extent(self.domain_start, self.domain_end, count);
        Self {
            domain_start: start,
            domain_end: end,
            range: self.range,
        }
    }

    #[must_use]
    pub fn domain_to_pixel(self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        let start = signed_sqrt(self.domain_start);
        let span = signed_sqrt(self.domain_end) - start;
        if span == 0.0 {
            return Some(self.range.midpoint());
        }
        Some(self.range.lerp((signed_sqrt(value) - start) / span))
    }

    #[must_use]
    pub fn pixel_to_domain(self, pixel: f64) -> Option<f64> {
        let range_span = self.range.span();
        if !pixel.is_finite() || range_span == 0.0 {
            return None;
        }
        let start = signed_sqrt(self.domain_start);
        let span = signed_sqrt(self.domain_end) - start;
        let normalized = (pixel - self.range.start) / range_span;
        Some(signed_square(start + normalized * span))
    }

    #[must_use]
    pub fn baseline(self) -> f64 {
        let lo = self.domain_start.min(self.domain_end);
        let hi = self.domain_start.max(self.domain_end);
        self.domain_to_pixel(0.0_f64.clamp(lo, hi))
            .unwrap_or(self.range.start)
    }

    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<(f64, String)> {
        let precision = tick_step(self.domain_start, self.domain_end, count)
            .map_or(0, step_precision);
        ticks(self.domain_start, self.domain_end, count)
            .into_iter()
            .map(|value| (value, format_tick_number(value, precision)))
            .collect()
    }
}
