pub mod aggregator;
pub mod calendar;
pub mod granularity;
pub mod intensity;
pub mod refiner;
pub mod resolver;
pub mod scale;
pub mod ticks;
pub mod types;

pub use aggregator::{AggregationStats, Bucket, aggregate, aggregate_with_stats};
pub use calendar::{
    Calendar, CalendarUnit, DayUnit, FixedUnit, MonthUnit, UtcCalendar, WeekStart, WeekUnit,
    YearSpanUnit,
};
pub use granularity::Granularity;
pub use intensity::{max_count, normalize, normalize_in_place};
pub use refiner::{BucketScaleRefiner, bucket_width_px};
pub use resolver::{
    DEFAULT_GRANULARITY, DEFAULT_TICK_COUNT, TimeScaleResolver, closest_tick_unit,
    duration_granularity, should_use_heatmap,
};
pub use scale::{LinearTimeScale, PixelScale};
pub use ticks::{CalendarTickOracle, TickCadence, TickOracle, nice_step, select_tick_cadence};
pub use types::{
    Instant, SizeConstraint, TimeDomain, instant_from_unix_millis, instant_to_unix_millis,
    parse_instant,
};
