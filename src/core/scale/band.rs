use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::core::PixelRange;

/// Positions of a discrete domain spread uniformly over a pixel range.
///
/// Band scales reserve `padding_inner` (fraction of the step) between
/// categories and `padding_outer` (in steps) before the first and after the
/// last one. Point scales are the `padding_inner == 1` special case: each
/// category collapses to a single position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandScale {
    domain: IndexSet<String>,
    range: PixelRange,
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
    step: f64,
    bandwidth: f64,
    offset: f64,
}

impl BandScale {
    /// Band scale with the same fraction used for inner and outer padding.
    #[must_use]
    pub fn new(domain: IndexSet<String>, range: PixelRange, padding: f64) -> Self {
        let padding = sanitize_fraction(padding);
        Self::with_paddings(domain, range, padding, padding)
    }

    /// Point scale: inner padding of one step, `padding` applied to the ends.
    #[must_use]
    pub fn point(domain: IndexSet<String>, range: PixelRange, padding: f64) -> Self {
        let padding = if padding.is_finite() { padding.max(0.0) } else { 0.0 };
        Self::with_paddings(domain, range, 1.0, padding)
    }

    fn with_paddings(
        domain: IndexSet<String>,
        range: PixelRange,
        padding_inner: f64,
        padding_outer: f64,
    ) -> Self {
        let mut scale = Self {
            domain,
            range,
            padding_inner,
            padding_outer,
            align: 0.5,
            step: 0.0,
            bandwidth: 0.0,
            offset: range.min(),
        };
        scale.rescale();
        scale
    }

    fn rescale(&mut self) {
        let n = self.domain.len();
        let start = self.range.min();
        let stop = self.range.max();
        if n == 0 {
            self.step = 0.0;
            self.bandwidth = 0.0;
            self.offset = start;
            return;
        }

        let space = n as f64 - self.padding_inner + 2.0 * self.padding_outer;
        self.step = (stop - start) / space.max(1.0);
        self.offset =
            start + (stop - start - self.step * (n as f64 - self.padding_inner)) * self.align;
        self.bandwidth = self.step * (1.0 - self.padding_inner);
    }

    #[must_use]
    pub fn domain(&self) -> &IndexSet<String> {
        &self.domain
    }

    #[must_use]
    pub fn range(&self) -> PixelRange {
        self.range
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    #[must_use]
    pub fn padding_inner(&self) -> f64 {
        self.padding_inner
    }

    #[must_use]
    pub fn padding_outer(&self) -> f64 {
        self.padding_outer
    }

    fn is_reversed(&self) -> bool {
        self.range.end < self.range.start
    }

    /// Leading edge of the category's band (its position for point scales).
    #[must_use]
    pub fn position_of(&self, key: &str) -> Option<f64> {
        let index = self.domain.get_index_of(key)?;
        let slot = if self.is_reversed() {
            self.domain.len() - 1 - index
        } else {
            index
        };
        Some(self.offset + self.step * slot as f64)
    }

    /// Category whose band (or step cell for points) contains `pixel`.
    #[must_use]
    pub fn category_at(&self, pixel: f64) -> Option<&str> {
        if !pixel.is_finite() || self.step <= 0.0 || self.domain.is_empty() {
            return None;
        }
        let half_gap = (self.step - self.bandwidth) * 0.5;
        let slot = ((pixel - self.offset + half_gap) / self.step).floor();
        if slot < 0.0 || slot >= self.domain.len() as f64 {
            return None;
        }
        let slot = slot as usize;
        let index = if self.is_reversed() {
            self.domain.len() - 1 - slot
        } else {
            slot
        };
        self.domain.get_index(index).map(String::as_str)
    }
}

fn sanitize_fraction(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
