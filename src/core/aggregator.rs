use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{Calendar, Granularity, Instant, TimeDomain};

/// Events sharing one floored start instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket<T> {
    pub start: Instant,
    pub count: usize,
    /// Members in the order they were supplied.
    pub members: Vec<T>,
    /// Count relative to the busiest bucket of the same row; `0.0` until
    /// normalized.
    pub intensity: f64,
}

impl<T> Bucket<T> {
    fn open(start: Instant) -> Self {
        Self {
            start,
            count: 0,
            members: Vec::new(),
            intensity: 0.0,
        }
    }

    fn push(&mut self, member: T) {
        self.count += 1;
        self.members.push(member);
    }
}

/// Tally of what happened to the supplied events during one aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AggregationStats {
    pub supplied: usize,
    pub bucketed: usize,
    /// Accessor returned no instant.
    pub invalid_instant: usize,
    /// Instant outside `[domain.start, domain.end)`.
    pub out_of_domain: usize,
    /// Floored start outside the domain envelope, or not representable.
    pub outside_envelope: usize,
}

/// Groups events into sparse buckets ordered by start.
///
/// See [`aggregate_with_stats`].
pub fn aggregate<C, I, F>(
    domain: TimeDomain,
    granularity: Granularity,
    calendar: &C,
    events: I,
    instant_of: F,
) -> Vec<Bucket<I::Item>>
where
    C: Calendar + ?Sized,
    I: IntoIterator,
    F: FnMut(&I::Item) -> Option<Instant>,
{
    aggregate_with_stats(domain, granularity, calendar, events, instant_of).0
}

/// Groups events into sparse buckets ordered by start and reports drops.
///
/// An event is kept when its instant is valid, lies in the half-open domain,
/// and its floored start lies in `[floor(domain.start), ceil(domain.end)]`.
pub fn aggregate_with_stats<C, I, F>(
    domain: TimeDomain,
    granularity: Granularity,
    calendar: &C,
    events: I,
    mut instant_of: F,
) -> (Vec<Bucket<I::Item>>, AggregationStats)
where
    C: Calendar + ?Sized,
    I: IntoIterator,
    F: FnMut(&I::Item) -> Option<Instant>,
{
    let lower = calendar.floor(granularity, domain.start());
    let upper = calendar.ceil(granularity, domain.end());

    let mut stats = AggregationStats::default();
    let mut buckets: BTreeMap<Instant, Bucket<I::Item>> = BTreeMap::new();

    for event in events {
        stats.supplied += 1;

        let Some(instant) = instant_of(&event) else {
            stats.invalid_instant += 1;
            continue;
        };
        if !domain.contains(instant) {
            stats.out_of_domain += 1;
            continue;
        }

        let start = calendar.floor(granularity, instant);
        let Some(start) = start.filter(|start| {
            lower.is_none_or(|lower| *start >= lower) && upper.is_none_or(|upper| *start <= upper)
        }) else {
            stats.outside_envelope += 1;
            continue;
        };

        buckets
            .entry(start)
            .or_insert_with(|| Bucket::open(start))
            .push(event);
        stats.bucketed += 1;
    }

    trace!(
        %granularity,
        supplied = stats.supplied,
        bucketed = stats.bucketed,
        invalid_instant = stats.invalid_instant,
        out_of_domain = stats.out_of_domain,
        outside_envelope = stats.outside_envelope,
        buckets = buckets.len(),
        "aggregated events"
    );

    (buckets.into_values().collect(), stats)
}
