use chrono::{TimeDelta, TimeZone, Utc};
use criterion::{Criterion, criterion_group, criterion_main};
use heatline::api::HeatmapRow;
use heatline::core::{
    BucketScaleRefiner, CalendarTickOracle, Granularity, Instant, LinearTimeScale, SizeConstraint,
    TimeDomain, TimeScaleResolver, UtcCalendar, aggregate, normalize,
};
use heatline::{HeatmapConfig, HeatmapPipeline};
use std::hint::black_box;

fn year_2023() -> TimeDomain {
    let start = Utc
        .with_ymd_and_hms(2023, 1, 1, 0, 0, 0)
        .single()
        .expect("valid start");
    let end = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("valid end");
    TimeDomain::new(start, end).expect("valid domain")
}

fn spread_events(domain: TimeDomain, count: i64) -> Vec<Instant> {
    let step = domain.span().num_milliseconds() / count;
    (0..count)
        .map(|i| domain.start() + TimeDelta::milliseconds((i * step * 7919) % (count * step)))
        .collect()
}

fn bench_aggregate_10k(c: &mut Criterion) {
    let domain = year_2023();
    let calendar = UtcCalendar::default();
    let events = spread_events(domain, 10_000);

    c.bench_function("aggregate_days_10k", |b| {
        b.iter(|| {
            let buckets = aggregate(
                black_box(domain),
                Granularity::Days,
                &calendar,
                black_box(&events),
                |at| Some(**at),
            );
            normalize(buckets)
        })
    });
}

fn bench_resolve_default_oracle(c: &mut Criterion) {
    let domain = year_2023();
    let calendar = UtcCalendar::default();
    let oracle = CalendarTickOracle::new(calendar);
    let resolver = TimeScaleResolver::new(&calendar, &oracle);

    c.bench_function("resolve_year_default_oracle", |b| {
        b.iter(|| resolver.resolve(black_box(domain), Some(10)))
    });
}

fn bench_refine_to_min_width(c: &mut Criterion) {
    let domain = year_2023();
    let calendar = UtcCalendar::default();
    let scale = LinearTimeScale::with_width(domain, 1_200.0).expect("valid scale");
    let refiner = BucketScaleRefiner::new(&calendar, &scale);
    let constraint = SizeConstraint::unconstrained().with_min_width_px(40.0);

    c.bench_function("refine_milliseconds_to_min_width", |b| {
        b.iter(|| refiner.refine(black_box(domain), Granularity::Milliseconds, constraint))
    });
}

fn bench_pipeline_run_8_rows(c: &mut Criterion) {
    let domain = year_2023();
    let pipeline = HeatmapPipeline::new(HeatmapConfig::default()).expect("valid config");
    let scale = LinearTimeScale::with_width(domain, 1_200.0).expect("valid scale");
    let bounds = [Some(domain.start()), Some(domain.end())];
    let events = spread_events(domain, 2_000);

    c.bench_function("pipeline_run_8_rows_2k", |b| {
        b.iter(|| {
            let rows = (0..8)
                .map(|row| HeatmapRow::new(row, events.clone()))
                .collect();
            pipeline.run(black_box(&bounds), Some("lg"), &scale, rows, |at| Some(*at))
        })
    });
}

criterion_group!(
    benches,
    bench_aggregate_10k,
    bench_resolve_default_oracle,
    bench_refine_to_min_width,
    bench_pipeline_run_8_rows
);
criterion_main!(benches);
