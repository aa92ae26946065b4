use chrono::TimeDelta;
use smallvec::SmallVec;
use tracing::debug;

use crate::core::{Calendar, Granularity, Instant, TickOracle, TimeDomain};
use crate::error::BucketResult;

/// Tick count requested from the oracle when the caller gives no hint.
pub const DEFAULT_TICK_COUNT: usize = 10;

/// Granularity substituted when the domain cannot be resolved.
pub const DEFAULT_GRANULARITY: Granularity = Granularity::Days;

/// Infers the bucket granularity matching what an axis currently displays.
pub struct TimeScaleResolver<'a, C: ?Sized, O: ?Sized> {
    calendar: &'a C,
    oracle: &'a O,
}

impl<'a, C, O> TimeScaleResolver<'a, C, O>
where
    C: Calendar + ?Sized,
    O: TickOracle + ?Sized,
{
    #[must_use]
    pub fn new(calendar: &'a C, oracle: &'a O) -> Self {
        Self { calendar, oracle }
    }

    /// Bucket granularity for a well-formed domain: one level finer than the
    /// detected tick granularity.
    #[must_use]
    pub fn resolve(&self, domain: TimeDomain, tick_count_hint: Option<usize>) -> Granularity {
        let tick = self.detect_tick_granularity(domain, tick_count_hint);
        let bucket = tick.bucket_for_tick();
        debug!(%tick, %bucket, "resolved bucket granularity");
        bucket
    }

    /// Same as [`Self::resolve`] for raw axis bounds.
    ///
    /// Fails with [`crate::error::BucketError::InvalidDomain`]; callers fall
    /// back to [`DEFAULT_GRANULARITY`].
    pub fn resolve_bounds(
        &self,
        bounds: &[Option<Instant>],
        tick_count_hint: Option<usize>,
    ) -> BucketResult<Granularity> {
        let domain = TimeDomain::from_bounds(bounds)?;
        Ok(self.resolve(domain, tick_count_hint))
    }

    #[must_use]
    pub fn resolve_or_default(
        &self,
        bounds: &[Option<Instant>],
        tick_count_hint: Option<usize>,
    ) -> Granularity {
        self.resolve_bounds(bounds, tick_count_hint)
            .unwrap_or(DEFAULT_GRANULARITY)
    }

    /// Granularity the axis ticks are currently drawn at.
    #[must_use]
    pub fn detect_tick_granularity(
        &self,
        domain: TimeDomain,
        tick_count_hint: Option<usize>,
    ) -> Granularity {
        let count = tick_count_hint.unwrap_or(DEFAULT_TICK_COUNT);
        let ticks = self.oracle.ticks(domain, count);
        match ticks.as_slice() {
            [first, second, ..] => closest_tick_unit(self.calendar, *first, *second),
            _ => {
                debug!(
                    tick_count = ticks.len(),
                    "too few ticks, classifying by domain duration"
                );
                duration_granularity(domain.span())
            }
        }
    }
}

/// Whether the given bucket granularity should be drawn as a heatmap rather
/// than as individual events.
#[must_use]
pub fn should_use_heatmap(granularity: Granularity) -> bool {
    granularity.uses_heatmap()
}

/// Classifies a duration by fixed thresholds, coarsest first.
///
/// A year counts as 365 days here.
#[must_use]
pub fn duration_granularity(span: TimeDelta) -> Granularity {
    let year = TimeDelta::days(365);
    let thresholds = [
        (year * 1_000, Granularity::Millennium),
        (year * 10, Granularity::Decades),
        (year, Granularity::Years),
        (TimeDelta::days(30), Granularity::Months),
        (TimeDelta::days(7), Granularity::Weeks),
        (TimeDelta::days(1), Granularity::Days),
        (TimeDelta::hours(1), Granularity::Hours),
        (TimeDelta::minutes(1), Granularity::Minutes),
        (TimeDelta::milliseconds(1_000), Granularity::Seconds),
    ];

    thresholds
        .into_iter()
        .find(|(threshold, _)| span >= *threshold)
        .map_or(Granularity::Milliseconds, |(_, granularity)| granularity)
}

/// Unit whose whole-count calendar step from `first` best reproduces the
/// spacing between two consecutive ticks.
///
/// On equal error the coarser unit wins. `Milliseconds` always competes with
/// the exact observed spacing, so a coarser unit is only picked when it
/// matches the spacing exactly.
#[must_use]
pub fn closest_tick_unit<C: Calendar + ?Sized>(
    calendar: &C,
    first: Instant,
    second: Instant,
) -> Granularity {
    let observed = (second - first).num_milliseconds();
    let years = calendar.count(Granularity::Years, first, second);

    let mut candidates: SmallVec<[(Granularity, i64); 10]> = SmallVec::new();
    for unit in Granularity::TICK_INFERENCE_ORDER {
        let count = calendar.count(unit, first, second);
        let qualifies = count >= 1
            && match unit {
                Granularity::Millennium => years >= 1_000,
                Granularity::Decades => years >= 10,
                _ => true,
            };
        if !qualifies {
            continue;
        }
        if let Some(advanced) = calendar.offset(unit, first, count) {
            candidates.push((unit, (advanced - first).num_milliseconds()));
        }
    }
    candidates.push((Granularity::Milliseconds, observed));

    let mut best: Option<(Granularity, u64)> = None;
    for (unit, expected) in candidates {
        let error = expected.abs_diff(observed);
        if best.is_none_or(|(_, best_error)| error < best_error) {
            best = Some((unit, error));
        }
    }
    best.map_or(Granularity::Milliseconds, |(unit, _)| unit)
}
