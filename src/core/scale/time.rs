use chrono::{DateTime, Datelike, Months, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::core::PixelRange;
use crate::core::primitives::{datetime_to_epoch_millis, epoch_millis_to_datetime};

use super::ticks::tick_step;

const SECOND_MS: i64 = 1_000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;
const WEEK_MS: i64 = 7 * DAY_MS;
const MONTH_MS: i64 = 30 * DAY_MS;
const YEAR_MS: i64 = 365 * DAY_MS;

const MAX_TICKS: usize = 10_000;

/// Calendar interval used for temporal ticks and niceing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeInterval {
    Millisecond(i64),
    Second(i64),
    Minute(i64),
    Hour(i64),
    Day(i64),
    Week,
    Month(u32),
    Year(i64),
}

const TICK_INTERVALS: [TimeInterval; 18] = [
    TimeInterval::Second(1),
    TimeInterval::Second(5),
    TimeInterval::Second(15),
    TimeInterval::Second(30),
    TimeInterval::Minute(1),
    TimeInterval::Minute(5),
    TimeInterval::Minute(15),
    TimeInterval::Minute(30),
    TimeInterval::Hour(1),
    TimeInterval::Hour(3),
    TimeInterval::Hour(6),
    TimeInterval::Hour(12),
    TimeInterval::Day(1),
    TimeInterval::Day(2),
    TimeInterval::Week,
    TimeInterval::Month(1),
    TimeInterval::Month(3),
    TimeInterval::Year(1),
];

impl TimeInterval {
    /// Nominal length; months and years are approximations used only for
    /// interval selection.
    #[must_use]
    pub fn approx_millis(self) -> i64 {
        match self {
            Self::Millisecond(step) => step,
            Self::Second(step) => step * SECOND_MS,
            Self::Minute(step) => step * MINUTE_MS,
            Self::Hour(step) => step * HOUR_MS,
            Self::Day(step) => step * DAY_MS,
            Self::Week => WEEK_MS,
            Self::Month(step) => i64::from(step) * MONTH_MS,
            Self::Year(step) => step * YEAR_MS,
        }
    }

    /// Picks the interval that yields close to `count` ticks over `span_ms`.
    #[must_use]
    pub fn for_span(span_ms: f64, count: usize) -> Self {
        let count = count.max(1);
        let span_ms = span_ms.abs();
        let target = span_ms / count as f64;

        if target > YEAR_MS as f64 {
            let years = span_ms / YEAR_MS as f64;
            let step = tick_step(0.0, years, count).unwrap_or(1.0).max(1.0);
            return Self::Year(step.round() as i64);
        }
        if target < SECOND_MS as f64 {
            let step = tick_step(0.0, span_ms, count).unwrap_or(1.0).max(1.0);
            return Self::Millisecond(step.round() as i64);
        }

        let index = TICK_INTERVALS
            .iter()
            .position(|interval| interval.approx_millis() as f64 >= target)
            .unwrap_or(TICK_INTERVALS.len() - 1);
        if index == 0 {
            return TICK_INTERVALS[0];
        }
        let below = TICK_INTERVALS[index - 1];
        let above = TICK_INTERVALS[index];
        if target / below.approx_millis() as f64 <= above.approx_millis() as f64 / target {
            below
        } else {
            above
        }
    }

    /// Largest interval boundary at or before `time`.
    #[must_use]
    pub fn floor(self, time: DateTime<Utc>) -> DateTime<Utc> {
        let millis = time.timestamp_millis();
        let floor_fixed = |unit: i64| {
            let unit = unit.max(1);
            Utc.timestamp_millis_opt(millis.div_euclid(unit) * unit)
                .single()
                .unwrap_or(time)
        };

        match self {
            Self::Millisecond(_)
            | Self::Second(_)
            | Self::Minute(_)
            | Self::Hour(_)
            | Self::Day(_) => floor_fixed(self.approx_millis()),
            Self::Week => {
                let midnight = floor_fixed(DAY_MS);
                let back = i64::from(midnight.weekday().num_days_from_sunday());
                midnight - chrono::Duration::days(back)
            }
            Self::Month(step) => {
                let step = step.max(1);
                let month0 = (time.month0() / step) * step;
                utc_midnight(time.year(), month0 + 1, 1).unwrap_or(time)
            }
            Self::Year(step) => {
                let step = step.max(1);
                let year = i64::from(time.year()).div_euclid(step) * step;
                i32::try_from(year)
                    .ok()
                    .and_then(|year| utc_midnight(year, 1, 1))
                    .unwrap_or(time)
            }
        }
    }

    /// Smallest interval boundary at or after `time`.
    #[must_use]
    pub fn ceil(self, time: DateTime<Utc>) -> DateTime<Utc> {
        let floored = self.floor(time);
        if floored == time {
            return time;
        }
        self.offset(floored).unwrap_or(time)
    }

    /// Advances `time` by one interval step.
    #[must_use]
    pub fn offset(self, time: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Month(step) => time.checked_add_months(Months::new(step.max(1))),
            Self::Year(step) => {
                let months = u32::try_from(step.max(1).checked_mul(12)?).ok()?;
                time.checked_add_months(Months::new(months))
            }
            fixed => time.checked_add_signed(chrono::Duration::milliseconds(
                fixed.approx_millis().max(1),
            )),
        }
    }

    #[must_use]
    pub fn label_format(self) -> &'static str {
        match self {
            Self::Millisecond(_) => "%H:%M:%S%.3f",
            Self::Second(_) => "%H:%M:%S",
            Self::Minute(_) | Self::Hour(_) => "%H:%M",
            Self::Day(_) | Self::Week => "%b %d",
            Self::Month(_) => "%b %Y",
            Self::Year(_) => "%Y",
        }
    }
}

fn utc_midnight(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Continuous scale over instants, mapped linearly in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    domain_start: DateTime<Utc>,
    domain_end: DateTime<Utc>,
    range: PixelRange,
}

impl TimeScale {
    #[must_use]
    pub fn new(domain: (DateTime<Utc>, DateTime<Utc>), range: PixelRange) -> Self {
        Self {
            domain_start: domain.0,
            domain_end: domain.1,
            range,
        }
    }

    #[must_use]
    pub fn domain(self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> PixelRange {
        self.range
    }

    fn span_millis(self) -> f64 {
        datetime_to_epoch_millis(self.domain_end) - datetime_to_epoch_millis(self.domain_start)
    }

    /// Snaps the domain outward to the tick interval chosen for `count`.
    #[must_use]
    pub fn nice(self, count: usize) -> Self {
        if self.domain_start == self.domain_end {
            return self;
        }
        let interval = TimeInterval::for_span(self.span_millis(), count);
        let (lo, hi) = if self.domain_start <= self.domain_end {
            (self.domain_start, self.domain_end)
        } else {
            (self.domain_end, self.domain_start)
        };
        let (lo, hi) = (interval.floor(lo), interval.ceil(hi));
        let domain = if self.domain_start <= self.domain_end {
            (lo, hi)
        } else {
            (hi, lo)
        };
        Self::new(domain, self.range)
    }

    #[must_use]
    pub fn time_to_pixel(self, time: DateTime<Utc>) -> Option<f64> {
        let span = self.span_millis();
        if span == 0.0 {
            return Some(self.range.midpoint());
        }
        let offset = datetime_to_epoch_millis(time) - datetime_to_epoch_millis(self.domain_start);
        Some(self.range.lerp(offset / span))
    }

    #[must_use]
    pub fn pixel_to_time(self, pixel: f64) -> Option<DateTime<Utc>> {
        let range_span = self.range.span();
        if !pixel.is_finite() || range_span == 0.0 {
            return None;
        }
        let normalized = (pixel - self.range.start) / range_span;
        epoch_millis_to_datetime(
            datetime_to_epoch_millis(self.domain_start) + normalized * self.span_millis(),
        )
    }

    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<(DateTime<Utc>, String)> {
        let (lo, hi) = if self.domain_start <= self.domain_end {
            (self.domain_start, self.domain_end)
        } else {
            (self.domain_end, self.domain_start)
        };
        if lo == hi {
            return vec![(lo, lo.format(TimeInterval::Day(1).label_format()).to_string())];
        }

        let interval = TimeInterval::for_span(self.span_millis(), count);
        let format = interval.label_format();
        let mut cursor = interval.ceil(lo);
        let mut ticks = Vec::new();
        while cursor <= hi && ticks.len() < MAX_TICKS {
            ticks.push((cursor, cursor.format(format).to_string()));
            match interval.offset(cursor) {
                Some(next) if next > cursor => cursor = next,
                _ => break,
            }
        }
        if self.domain_start > self.domain_end {
            ticks.reverse();
        }
        ticks
    }
}
