//! Human-friendly tick steps (1, 2 or 5 times a power of ten).

const E10: f64 = 7.071_067_811_865_476; // sqrt(50)
const E5: f64 = 3.162_277_660_168_379; // sqrt(10)
const E2: f64 = 1.414_213_562_373_095_1; // sqrt(2)

const MAX_NICE_ITERATIONS: usize = 10;

/// Tick step for roughly `count` intervals over `[start, stop]`.
///
/// Returns a positive step, or `None` when no finite step exists.
#[must_use]
pub fn tick_step(start: f64, stop: f64, count: usize) -> Option<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() || start == stop {
        return None;
    }

    let raw = (stop - start).abs() / count as f64;
    let power = raw.log10().floor();
    let error = raw / 10_f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    let step = 10_f64.powf(power) * factor;
    (step.is_finite() && step > 0.0).then_some(step)
}

/// Evenly spaced round values inside `[start, stop]` (inclusive).
#[must_use]
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let (lo, hi) = if start < stop { (start, stop) } else { (stop, start) };
    let Some(step) = tick_step(lo, hi, count) else {
        return Vec::new();
    };

    // Work in integer multiples of the step so values like 0.3 do not drift.
    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    if last < first {
        return Vec::new();
    }

    let inverse = if step < 1.0 { Some((1.0 / step).round()) } else { None };
    let mut values: Vec<f64> = (first..=last)
        .map(|i| match inverse {
            Some(inverse) => i as f64 / inverse,
            None => i as f64 * step,
        })
        .collect();
    if start > stop {
        values.reverse();
    }
    values
}

/// Extends `[start, stop]` outward to multiples of the tick step.
///
/// The step is recomputed until it stops changing, so the result is stable
/// under repeated application.
#[must_use]
pub fn nice_extent(start: f64, stop: f64, count: usize) -> (f64, f64) {
    if !start.is_finite() || !stop.is_finite() || start == stop || count == 0 {
        return (start, stop);
    }

    let (mut lo, mut hi) = if start < stop { (start, stop) } else { (stop, start) };
    let mut previous_step = None;
    for _ in 0..MAX_NICE_ITERATIONS {
        let Some(step) = tick_step(lo, hi, count) else {
            break;
        };
        if previous_step == Some(step) {
            break;
        }
        lo = (lo / step).floor() * step;
        hi = (hi / step).ceil() * step;
        previous_step = Some(step);
    }

    if start < stop { (lo, hi) } else { (hi, lo) }
}

/// Number of fraction digits needed to print values on a `step` grid.
#[must_use]
pub fn step_precision(step: f64) -> usize {
    if !step.is_finite() || step <= 0.0 || step >= 1.0 {
        return 0;
    }
    (-step.log10().floor()).clamp(0.0, 12.0) as usize
}

/// Formats a tick value with the given precision, avoiding `-0`.
#[must_use]
pub fn format_tick_number(value: f64, precision: usize) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value:.precision$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_on_unit_interval() {
        assert_eq!(
            ticks(0.0, 1.0, 10),
            vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0]
        );
        assert_eq!(ticks(0.0, 10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn ticks_handle_reversed_and_flat_input() {
        assert_eq!(ticks(10.0, 0.0, 5), vec![10.0, 8.0, 6.0, 4.0, 2.0, 0.0]);
        assert_eq!(ticks(3.0, 3.0, 5), vec![3.0]);
        assert!(ticks(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn nice_extent_rounds_outward() {
        assert_eq!(nice_extent(0.13, 9.7, 10), (0.0, 10.0));
        assert_eq!(nice_extent(3.0, 47.0, 5), (0.0, 50.0));
        assert_eq!(nice_extent(-7.5, 102.0, 10), (-10.0, 110.0));
    }

    #[test]
    fn nice_extent_is_idempotent() {
        let once = nice_extent(1.234, 98.76, 10);
        assert_eq!(nice_extent(once.0, once.1, 10), once);
    }

    #[test]
    fn precision_follows_step() {
        assert_eq!(step_precision(0.25), 1);
        assert_eq!(step_precision(0.05), 2);
        assert_eq!(step_precision(5.0), 0);
        assert_eq!(format_tick_number(-0.0, 1), "0.0");
    }
}
