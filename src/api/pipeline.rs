#[cfg(feature = "parallel-rows")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{
    AggregationStats, Bucket, BucketScaleRefiner, Calendar, CalendarTickOracle,
    DEFAULT_GRANULARITY, Granularity, Instant, PixelScale, TickOracle, TimeDomain,
    TimeScaleResolver, UtcCalendar, aggregate_with_stats, normalize_in_place, should_use_heatmap,
};
use crate::error::{BucketError, BucketResult};

use super::{Diagnostic, HeatmapConfig};

/// One logical row (series) of events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapRow<K, T> {
    pub key: K,
    pub events: Vec<T>,
}

impl<K, T> HeatmapRow<K, T> {
    #[must_use]
    pub fn new(key: K, events: Vec<T>) -> Self {
        Self { key, events }
    }
}

/// Bucketing decisions shared by every row of a render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketPlan {
    /// `None` when the supplied bounds were rejected.
    pub domain: Option<TimeDomain>,
    pub tick_count: usize,
    /// Granularity derived from the axis ticks, before width refinement.
    pub resolved_granularity: Granularity,
    pub granularity: Granularity,
    pub bucket_width_px: f64,
    pub use_heatmap: bool,
    pub diagnostics: Vec<Diagnostic>,
}

/// Normalized buckets of a single row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowBuckets<K, T> {
    pub key: K,
    pub buckets: Vec<Bucket<T>>,
    pub stats: AggregationStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput<K, T> {
    pub plan: BucketPlan,
    pub rows: Vec<RowBuckets<K, T>>,
}

impl<K, T> PipelineOutput<K, T> {
    /// All diagnostics raised while planning this pass.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.plan.diagnostics
    }
}

/// Resolver, refiner, aggregator and normalizer wired together.
///
/// Every failure degrades to the default granularity or to empty buckets and
/// is reported as a [`Diagnostic`]; nothing is returned as an error once the
/// pipeline is built.
#[derive(Debug, Clone)]
pub struct HeatmapPipeline<C = UtcCalendar, O = CalendarTickOracle<UtcCalendar>> {
    config: HeatmapConfig,
    calendar: C,
    oracle: O,
}

impl HeatmapPipeline {
    /// Builds a pipeline on the UTC calendar and the standard tick cadence.
    pub fn new(config: HeatmapConfig) -> BucketResult<Self> {
        let config = config.validate()?;
        let calendar = UtcCalendar::new(config.week_start);
        Ok(Self {
            config,
            calendar,
            oracle: CalendarTickOracle::new(calendar),
        })
    }
}

impl<C: Calendar, O: TickOracle> HeatmapPipeline<C, O> {
    /// Builds a pipeline on host-provided collaborators.
    ///
    /// `oracle` must be the tick function the host axis draws with.
    /// `config.week_start` is ignored; week flooring is up to `calendar`.
    pub fn with_collaborators(config: HeatmapConfig, calendar: C, oracle: O) -> BucketResult<Self> {
        Ok(Self {
            config: config.validate()?,
            calendar,
            oracle,
        })
    }

    #[must_use]
    pub fn config(&self) -> &HeatmapConfig {
        &self.config
    }

    #[must_use]
    pub fn calendar(&self) -> &C {
        &self.calendar
    }

    /// Decides the granularity for a pass over `bounds`.
    pub fn plan<P>(
        &self,
        bounds: &[Option<Instant>],
        breakpoint: Option<&str>,
        scale: &P,
    ) -> BucketPlan
    where
        P: PixelScale + ?Sized,
    {
        let mut diagnostics = Vec::new();
        let tick_count = self.tick_count(breakpoint, &mut diagnostics);

        let domain = match TimeDomain::from_bounds(bounds) {
            Ok(domain) => domain,
            Err(err) => {
                warn!(
                    error = %err,
                    fallback = %DEFAULT_GRANULARITY,
                    "invalid domain, rendering empty buckets"
                );
                let reason = match err {
                    BucketError::InvalidDomain { reason } => reason,
                    other => other.to_string(),
                };
                diagnostics.push(Diagnostic::InvalidDomain {
                    reason,
                    fallback: DEFAULT_GRANULARITY,
                });
                return BucketPlan {
                    domain: None,
                    tick_count,
                    resolved_granularity: DEFAULT_GRANULARITY,
                    granularity: DEFAULT_GRANULARITY,
                    bucket_width_px: 0.0,
                    use_heatmap: should_use_heatmap(DEFAULT_GRANULARITY),
                    diagnostics,
                };
            }
        };

        let resolved = TimeScaleResolver::new(&self.calendar, &self.oracle)
            .resolve(domain, Some(tick_count));
        let refiner = BucketScaleRefiner::new(&self.calendar, scale);
        let granularity = refiner.refine(domain, resolved, self.config.size_constraint);
        let bucket_width_px = refiner.width_px(domain, granularity);

        debug!(
            tick_count,
            %resolved,
            %granularity,
            bucket_width_px,
            "planned bucket pass"
        );

        BucketPlan {
            domain: Some(domain),
            tick_count,
            resolved_granularity: resolved,
            granularity,
            bucket_width_px,
            use_heatmap: should_use_heatmap(resolved),
            diagnostics,
        }
    }

    /// Buckets and normalizes one row under `plan`.
    pub fn bucket_row<K, T, F>(
        &self,
        plan: &BucketPlan,
        row: HeatmapRow<K, T>,
        instant_of: F,
    ) -> RowBuckets<K, T>
    where
        F: Fn(&T) -> Option<Instant>,
    {
        let HeatmapRow { key, events } = row;
        let Some(domain) = plan.domain else {
            return RowBuckets {
                key,
                buckets: Vec::new(),
                stats: AggregationStats {
                    supplied: events.len(),
                    ..AggregationStats::default()
                },
            };
        };

        let (mut buckets, stats) =
            aggregate_with_stats(domain, plan.granularity, &self.calendar, events, instant_of);
        normalize_in_place(&mut buckets);
        RowBuckets {
            key,
            buckets,
            stats,
        }
    }

    /// Plans a pass and buckets every row; rows never influence each other.
    pub fn run<K, T, P, F>(
        &self,
        bounds: &[Option<Instant>],
        breakpoint: Option<&str>,
        scale: &P,
        rows: Vec<HeatmapRow<K, T>>,
        instant_of: F,
    ) -> PipelineOutput<K, T>
    where
        K: Send,
        T: Send,
        P: PixelScale + ?Sized,
        F: Fn(&T) -> Option<Instant> + Sync,
    {
        let plan = self.plan(bounds, breakpoint, scale);

        #[cfg(feature = "parallel-rows")]
        let rows = rows
            .into_par_iter()
            .map(|row| self.bucket_row(&plan, row, &instant_of))
            .collect();

        #[cfg(not(feature = "parallel-rows"))]
        let rows = rows
            .into_iter()
            .map(|row| self.bucket_row(&plan, row, &instant_of))
            .collect();

        PipelineOutput { plan, rows }
    }

    fn tick_count(&self, breakpoint: Option<&str>, diagnostics: &mut Vec<Diagnostic>) -> usize {
        let tick_count = self.config.tick_count_for(breakpoint);
        if let Some(label) = breakpoint {
            if self.config.tick_count_breakpoints.get(label).is_none() {
                debug!(label, tick_count, "unknown breakpoint, using default tick count");
                diagnostics.push(Diagnostic::UnknownBreakpoint {
                    label: label.to_owned(),
                    tick_count,
                });
            }
        }
        tick_count
    }
}
