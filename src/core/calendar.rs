use std::fmt::Debug;

use chrono::{Datelike, Months, NaiveDate, TimeDelta, Weekday};
use serde::{Deserialize, Serialize};

use crate::core::{Granularity, Instant};

/// Calendar arithmetic for a single unit.
///
/// All operations work in UTC and return `None` when the result falls
/// outside the representable range.
pub trait CalendarUnit: Send + Sync + Debug {
    /// Latest unit boundary at or before `instant`.
    fn floor(&self, instant: Instant) -> Option<Instant>;

    /// Moves `instant` by `step` units, keeping sub-unit fields where possible.
    fn offset(&self, instant: Instant, step: i64) -> Option<Instant>;

    /// Number of unit boundaries crossed going from `start` to `end`.
    fn count(&self, start: Instant, end: Instant) -> i64;

    /// Earliest unit boundary at or after `instant`.
    fn ceil(&self, instant: Instant) -> Option<Instant> {
        let floored = self.floor(instant)?;
        if floored == instant {
            Some(instant)
        } else {
            self.offset(floored, 1)
        }
    }
}

/// Maps each granularity onto its calendar unit.
pub trait Calendar: Send + Sync {
    fn unit(&self, granularity: Granularity) -> &dyn CalendarUnit;

    fn floor(&self, granularity: Granularity, instant: Instant) -> Option<Instant> {
        self.unit(granularity).floor(instant)
    }

    fn ceil(&self, granularity: Granularity, instant: Instant) -> Option<Instant> {
        self.unit(granularity).ceil(instant)
    }

    fn offset(&self, granularity: Granularity, instant: Instant, step: i64) -> Option<Instant> {
        self.unit(granularity).offset(instant, step)
    }

    fn count(&self, granularity: Granularity, start: Instant, end: Instant) -> i64 {
        self.unit(granularity).count(start, end)
    }
}

/// First day of the week used by week flooring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl WeekStart {
    #[must_use]
    pub fn weekday(self) -> Weekday {
        match self {
            Self::Sunday => Weekday::Sun,
            Self::Monday => Weekday::Mon,
            Self::Tuesday => Weekday::Tue,
            Self::Wednesday => Weekday::Wed,
            Self::Thursday => Weekday::Thu,
            Self::Friday => Weekday::Fri,
            Self::Saturday => Weekday::Sat,
        }
    }
}

/// Fixed-length unit measured in milliseconds since the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedUnit {
    millis: i64,
}

impl FixedUnit {
    pub const MILLISECOND: Self = Self { millis: 1 };
    pub const SECOND: Self = Self { millis: 1_000 };
    pub const MINUTE: Self = Self { millis: 60_000 };
    pub const HOUR: Self = Self { millis: 3_600_000 };
}

impl CalendarUnit for FixedUnit {
    fn floor(&self, instant: Instant) -> Option<Instant> {
        let millis = instant.timestamp_millis();
        Instant::from_timestamp_millis(millis - millis.rem_euclid(self.millis))
    }

    fn offset(&self, instant: Instant, step: i64) -> Option<Instant> {
        let delta = TimeDelta::try_milliseconds(step.checked_mul(self.millis)?)?;
        instant.checked_add_signed(delta)
    }

    fn count(&self, start: Instant, end: Instant) -> i64 {
        let start = start.timestamp_millis().div_euclid(self.millis);
        let end = end.timestamp_millis().div_euclid(self.millis);
        end - start
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayUnit;

impl CalendarUnit for DayUnit {
    fn floor(&self, instant: Instant) -> Option<Instant> {
        start_of_day(instant.date_naive())
    }

    fn offset(&self, instant: Instant, step: i64) -> Option<Instant> {
        instant.checked_add_signed(TimeDelta::try_days(step)?)
    }

    fn count(&self, start: Instant, end: Instant) -> i64 {
        end.date_naive()
            .signed_duration_since(start.date_naive())
            .num_days()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekUnit {
    start: Weekday,
}

impl WeekUnit {
    #[must_use]
    pub fn new(start: Weekday) -> Self {
        Self { start }
    }

    fn floor_date(self, date: NaiveDate) -> Option<NaiveDate> {
        let from_sunday = date.weekday().num_days_from_sunday();
        let target_from_sunday = self.start.num_days_from_sunday();
        let back = (from_sunday + 7 - target_from_sunday) % 7;
        date.checked_sub_signed(TimeDelta::days(i64::from(back)))
    }
}

impl CalendarUnit for WeekUnit {
    fn floor(&self, instant: Instant) -> Option<Instant> {
        start_of_day(self.floor_date(instant.date_naive())?)
    }

    fn offset(&self, instant: Instant, step: i64) -> Option<Instant> {
        instant.checked_add_signed(TimeDelta::try_weeks(step)?)
    }

    fn count(&self, start: Instant, end: Instant) -> i64 {
        match (
            self.floor_date(start.date_naive()),
            self.floor_date(end.date_naive()),
        ) {
            (Some(start), Some(end)) => end.signed_duration_since(start).num_days() / 7,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthUnit;

impl CalendarUnit for MonthUnit {
    fn floor(&self, instant: Instant) -> Option<Instant> {
        start_of_day(NaiveDate::from_ymd_opt(instant.year(), instant.month(), 1)?)
    }

    fn offset(&self, instant: Instant, step: i64) -> Option<Instant> {
        add_months(instant, step)
    }

    fn count(&self, start: Instant, end: Instant) -> i64 {
        month_index(end) - month_index(start)
    }
}

/// Year-aligned unit spanning `years` calendar years (1, 10 or 1000).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearSpanUnit {
    years: i32,
}

impl YearSpanUnit {
    pub const YEAR: Self = Self { years: 1 };
    pub const DECADE: Self = Self { years: 10 };
    pub const MILLENNIUM: Self = Self { years: 1_000 };

    fn period(self, year: i32) -> i64 {
        i64::from(year.div_euclid(self.years))
    }
}

impl CalendarUnit for YearSpanUnit {
    fn floor(&self, instant: Instant) -> Option<Instant> {
        let year = instant.year().div_euclid(self.years) * self.years;
        start_of_day(NaiveDate::from_ymd_opt(year, 1, 1)?)
    }

    fn offset(&self, instant: Instant, step: i64) -> Option<Instant> {
        let months = step.checked_mul(12)?.checked_mul(i64::from(self.years))?;
        add_months(instant, months)
    }

    fn count(&self, start: Instant, end: Instant) -> i64 {
        self.period(end.year()) - self.period(start.year())
    }
}

static MILLISECOND: FixedUnit = FixedUnit::MILLISECOND;
static SECOND: FixedUnit = FixedUnit::SECOND;
static MINUTE: FixedUnit = FixedUnit::MINUTE;
static HOUR: FixedUnit = FixedUnit::HOUR;
static DAY: DayUnit = DayUnit;
static MONTH: MonthUnit = MonthUnit;
static YEAR: YearSpanUnit = YearSpanUnit::YEAR;
static DECADE: YearSpanUnit = YearSpanUnit::DECADE;
static MILLENNIUM: YearSpanUnit = YearSpanUnit::MILLENNIUM;

/// Gregorian UTC calendar backed by `chrono`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtcCalendar {
    week: WeekUnit,
}

impl UtcCalendar {
    #[must_use]
    pub fn new(week_start: WeekStart) -> Self {
        Self {
            week: WeekUnit::new(week_start.weekday()),
        }
    }
}

impl Default for UtcCalendar {
    fn default() -> Self {
        Self::new(WeekStart::default())
    }
}

impl Calendar for UtcCalendar {
    fn unit(&self, granularity: Granularity) -> &dyn CalendarUnit {
        match granularity {
            Granularity::Milliseconds => &MILLISECOND,
            Granularity::Seconds => &SECOND,
            Granularity::Minutes => &MINUTE,
            Granularity::Hours => &HOUR,
            Granularity::Days => &DAY,
            Granularity::Weeks => &self.week,
            Granularity::Months => &MONTH,
            Granularity::Years => &YEAR,
            Granularity::Decades => &DECADE,
            Granularity::Millennium => &MILLENNIUM,
        }
    }
}

fn start_of_day(date: NaiveDate) -> Option<Instant> {
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

fn month_index(instant: Instant) -> i64 {
    i64::from(instant.year()) * 12 + i64::from(instant.month0())
}

fn add_months(instant: Instant, months: i64) -> Option<Instant> {
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        instant.checked_add_months(magnitude)
    } else {
        instant.checked_sub_months(magnitude)
    }
}
