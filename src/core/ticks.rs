use chrono::{Datelike, NaiveDate, Timelike};
use serde::{Deserialize, Serialize};

use crate::core::{Calendar, Granularity, Instant, TimeDomain, UtcCalendar};

/// Source of axis tick instants.
///
/// Bucket boundaries only line up with drawn ticks when this is the same
/// function the axis renderer uses.
pub trait TickOracle: Send + Sync {
    fn ticks(&self, domain: TimeDomain, count: usize) -> Vec<Instant>;
}

impl<F> TickOracle for F
where
    F: Fn(TimeDomain, usize) -> Vec<Instant> + Send + Sync,
{
    fn ticks(&self, domain: TimeDomain, count: usize) -> Vec<Instant> {
        self(domain, count)
    }
}

const SECOND_MS: f64 = 1_000.0;
const MINUTE_MS: f64 = 60.0 * SECOND_MS;
const HOUR_MS: f64 = 60.0 * MINUTE_MS;
const DAY_MS: f64 = 24.0 * HOUR_MS;
const WEEK_MS: f64 = 7.0 * DAY_MS;
const MONTH_MS: f64 = 30.0 * DAY_MS;
const YEAR_MS: f64 = 365.0 * DAY_MS;

/// Upper bound on candidate instants scanned for a single tick request.
const MAX_TICK_SCAN: usize = 100_000;

const TICK_CADENCES: [(Granularity, i64, f64); 18] = [
    (Granularity::Seconds, 1, SECOND_MS),
    (Granularity::Seconds, 5, 5.0 * SECOND_MS),
    (Granularity::Seconds, 15, 15.0 * SECOND_MS),
    (Granularity::Seconds, 30, 30.0 * SECOND_MS),
    (Granularity::Minutes, 1, MINUTE_MS),
    (Granularity::Minutes, 5, 5.0 * MINUTE_MS),
    (Granularity::Minutes, 15, 15.0 * MINUTE_MS),
    (Granularity::Minutes, 30, 30.0 * MINUTE_MS),
    (Granularity::Hours, 1, HOUR_MS),
    (Granularity::Hours, 3, 3.0 * HOUR_MS),
    (Granularity::Hours, 6, 6.0 * HOUR_MS),
    (Granularity::Hours, 12, 12.0 * HOUR_MS),
    (Granularity::Days, 1, DAY_MS),
    (Granularity::Days, 2, 2.0 * DAY_MS),
    (Granularity::Weeks, 1, WEEK_MS),
    (Granularity::Months, 1, MONTH_MS),
    (Granularity::Months, 3, 3.0 * MONTH_MS),
    (Granularity::Years, 1, YEAR_MS),
];

/// Spacing chosen for a tick request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TickCadence {
    /// Multiples of `step` milliseconds since the epoch.
    Milliseconds { step: i64 },
    /// Instants on `unit` boundaries whose unit field is a multiple of `step`.
    Calendar { unit: Granularity, step: i64 },
    /// January 1st of years that are multiples of `step`.
    Years { step: i64 },
}

/// Picks the tick spacing closest to `span / count`.
///
/// Returns `None` when `count` is zero.
#[must_use]
pub fn select_tick_cadence(domain: TimeDomain, count: usize) -> Option<TickCadence> {
    if count == 0 {
        return None;
    }

    let span_ms = domain.span().num_milliseconds() as f64;
    let count = count as f64;
    let target = span_ms / count;

    let index = TICK_CADENCES.partition_point(|(_, _, duration)| *duration <= target);
    if index == TICK_CADENCES.len() {
        let step = nice_step(span_ms / YEAR_MS, count).floor().max(1.0) as i64;
        return Some(TickCadence::Years { step });
    }
    if index == 0 {
        let step = nice_step(span_ms, count).floor().max(1.0) as i64;
        return Some(TickCadence::Milliseconds { step });
    }

    let (below_unit, below_step, below_ms) = TICK_CADENCES[index - 1];
    let (above_unit, above_step, above_ms) = TICK_CADENCES[index];
    let (unit, step) = if target / below_ms < above_ms / target {
        (below_unit, below_step)
    } else {
        (above_unit, above_step)
    };
    Some(TickCadence::Calendar { unit, step })
}

/// Rounds `span / count` to 1, 2, 5 or 10 times a power of ten.
#[must_use]
pub fn nice_step(span: f64, count: f64) -> f64 {
    let raw = span / count;
    if !raw.is_finite() || raw <= 0.0 {
        return 0.0;
    }

    let power = raw.log10().floor();
    let magnitude = 10f64.powf(power);
    let error = raw / magnitude;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * magnitude
}

/// Standard time-axis tick generator driven by a [`Calendar`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarTickOracle<C = UtcCalendar> {
    calendar: C,
}

impl<C: Calendar> CalendarTickOracle<C> {
    #[must_use]
    pub fn new(calendar: C) -> Self {
        Self { calendar }
    }

    fn calendar_ticks(
        &self,
        domain: TimeDomain,
        unit: Granularity,
        step: i64,
    ) -> Vec<Instant> {
        let mut ticks = Vec::new();
        let Some(mut cursor) = self.calendar.ceil(unit, domain.start()) else {
            return ticks;
        };

        for _ in 0..MAX_TICK_SCAN {
            if cursor > domain.end() {
                break;
            }
            if unit_field(unit, cursor).rem_euclid(step) == 0 {
                ticks.push(cursor);
            }
            match self.calendar.offset(unit, cursor, 1) {
                Some(next) => cursor = next,
                None => break,
            }
        }
        ticks
    }
}

impl<C: Calendar> TickOracle for CalendarTickOracle<C> {
    fn ticks(&self, domain: TimeDomain, count: usize) -> Vec<Instant> {
        match select_tick_cadence(domain, count) {
            None => Vec::new(),
            Some(TickCadence::Milliseconds { step }) => millisecond_ticks(domain, step),
            Some(TickCadence::Years { step }) => year_ticks(domain, step),
            Some(TickCadence::Calendar { unit, step }) => self.calendar_ticks(domain, unit, step),
        }
    }
}

fn unit_field(unit: Granularity, instant: Instant) -> i64 {
    let field = match unit {
        Granularity::Seconds => instant.second(),
        Granularity::Minutes => instant.minute(),
        Granularity::Hours => instant.hour(),
        Granularity::Days => instant.day0(),
        Granularity::Months => instant.month0(),
        _ => 0,
    };
    i64::from(field)
}

fn millisecond_ticks(domain: TimeDomain, step: i64) -> Vec<Instant> {
    let start = domain.start().timestamp_millis();
    let end = domain.end().timestamp_millis();
    let first = start.div_euclid(step) * step;
    let first = if first < start { first + step } else { first };

    (0..MAX_TICK_SCAN as i64)
        .map_while(|index| {
            let millis = first.checked_add(index.checked_mul(step)?)?;
            (millis <= end).then_some(millis)
        })
        .filter_map(Instant::from_timestamp_millis)
        .collect()
}

fn year_ticks(domain: TimeDomain, step: i64) -> Vec<Instant> {
    let start_year = i64::from(domain.start().year());
    let mut year = start_year.div_euclid(step) * step;
    let mut ticks = Vec::new();

    for _ in 0..MAX_TICK_SCAN {
        let Some(tick) = i32::try_from(year)
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
        else {
            break;
        };
        if tick > domain.end() {
            break;
        }
        if tick >= domain.start() {
            ticks.push(tick);
        }
        year += step;
    }
    ticks
}
