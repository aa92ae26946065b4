use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{TimeDelta, TimeZone, Utc};
use heatline::BucketError;
use heatline::core::{
    CalendarTickOracle, DEFAULT_TICK_COUNT, Granularity, Instant, TimeDomain, TimeScaleResolver,
    UtcCalendar, closest_tick_unit, should_use_heatmap,
};

fn utc(year: i32, month: u32, day: u32) -> Instant {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .expect("valid instant")
}

fn domain(start: Instant, end: Instant) -> TimeDomain {
    TimeDomain::new(start, end).expect("valid domain")
}

fn fixed_ticks(ticks: Vec<Instant>) -> impl Fn(TimeDomain, usize) -> Vec<Instant> + Send + Sync {
    move |_, _| ticks.clone()
}

#[test]
fn ticks_one_calendar_year_apart_bucket_by_month() {
    let calendar = UtcCalendar::default();
    let oracle = fixed_ticks(vec![utc(2020, 1, 1), utc(2021, 1, 1), utc(2022, 1, 1)]);
    let resolver = TimeScaleResolver::new(&calendar, &oracle);
    let window = domain(utc(2019, 6, 1), utc(2022, 6, 1));

    assert_eq!(
        resolver.detect_tick_granularity(window, None),
        Granularity::Years
    );
    assert_eq!(resolver.resolve(window, None), Granularity::Months);
}

#[test]
fn leap_february_is_still_one_month() {
    let calendar = UtcCalendar::default();
    assert_eq!(
        closest_tick_unit(&calendar, utc(2020, 2, 1), utc(2020, 3, 1)),
        Granularity::Months
    );
}

#[test]
fn closest_unit_covers_each_tick_spacing() {
    let calendar = UtcCalendar::default();
    let start = utc(2024, 1, 1);
    let cases = [
        (start + TimeDelta::days(1), Granularity::Days),
        (start + TimeDelta::days(7), Granularity::Weeks),
        (start + TimeDelta::hours(6), Granularity::Hours),
        (start + TimeDelta::minutes(15), Granularity::Minutes),
        (start + TimeDelta::seconds(30), Granularity::Seconds),
        (start + TimeDelta::milliseconds(1_500), Granularity::Milliseconds),
        (start + TimeDelta::milliseconds(20), Granularity::Milliseconds),
    ];

    for (second, expected) in cases {
        assert_eq!(
            closest_tick_unit(&calendar, start, second),
            expected,
            "spacing {}",
            second - start
        );
    }
}

#[test]
fn decade_and_millennium_need_enough_years() {
    let calendar = UtcCalendar::default();
    assert_eq!(
        closest_tick_unit(&calendar, utc(2000, 1, 1), utc(2010, 1, 1)),
        Granularity::Decades
    );
    assert_eq!(
        closest_tick_unit(&calendar, utc(1000, 1, 1), utc(2000, 1, 1)),
        Granularity::Millennium
    );
    // Crosses a decade boundary but spans only one year.
    assert_eq!(
        closest_tick_unit(&calendar, utc(2019, 1, 1), utc(2020, 1, 1)),
        Granularity::Years
    );
}

#[test]
fn reversed_ticks_fall_back_to_milliseconds() {
    let calendar = UtcCalendar::default();
    assert_eq!(
        closest_tick_unit(&calendar, utc(2021, 1, 1), utc(2020, 1, 1)),
        Granularity::Milliseconds
    );
}

#[test]
fn too_few_ticks_classify_by_duration() {
    let calendar = UtcCalendar::default();
    let single = fixed_ticks(vec![utc(2024, 1, 1)]);
    let resolver = TimeScaleResolver::new(&calendar, &single);

    let ten_days = domain(utc(2024, 1, 1), utc(2024, 1, 11));
    assert_eq!(
        resolver.detect_tick_granularity(ten_days, None),
        Granularity::Weeks
    );
    assert_eq!(resolver.resolve(ten_days, None), Granularity::Days);

    let two_years = domain(utc(2022, 1, 1), utc(2024, 1, 1));
    assert_eq!(resolver.resolve(two_years, None), Granularity::Months);
}

#[test]
fn tick_count_hint_defaults_to_ten() {
    let calendar = UtcCalendar::default();
    let requested = AtomicUsize::new(0);
    let oracle = |_: TimeDomain, count: usize| -> Vec<Instant> {
        requested.store(count, Ordering::SeqCst);
        Vec::new()
    };
    let resolver = TimeScaleResolver::new(&calendar, &oracle);
    let window = domain(utc(2024, 1, 1), utc(2024, 2, 1));

    let _ = resolver.resolve(window, None);
    assert_eq!(requested.load(Ordering::SeqCst), DEFAULT_TICK_COUNT);

    let _ = resolver.resolve(window, Some(4));
    assert_eq!(requested.load(Ordering::SeqCst), 4);
}

#[test]
fn malformed_bounds_default_to_days() {
    let calendar = UtcCalendar::default();
    let oracle = CalendarTickOracle::new(UtcCalendar::default());
    let resolver = TimeScaleResolver::new(&calendar, &oracle);

    assert_eq!(resolver.resolve_or_default(&[], None), Granularity::Days);
    assert_eq!(
        resolver.resolve_or_default(&[Some(utc(2024, 1, 1))], None),
        Granularity::Days
    );
    assert_eq!(
        resolver.resolve_or_default(&[Some(utc(2024, 1, 1)), None], None),
        Granularity::Days
    );
    assert_eq!(
        resolver.resolve_or_default(&[Some(utc(2024, 2, 1)), Some(utc(2024, 1, 1))], None),
        Granularity::Days
    );

    let err = resolver
        .resolve_bounds(&[Some(utc(2024, 1, 1))], None)
        .expect_err("one bound must fail");
    assert!(matches!(err, BucketError::InvalidDomain { .. }));
}

#[test]
fn default_oracle_resolves_month_window_to_hours() {
    let calendar = UtcCalendar::default();
    let oracle = CalendarTickOracle::new(UtcCalendar::default());
    let resolver = TimeScaleResolver::new(&calendar, &oracle);

    let month = domain(utc(2024, 1, 1), utc(2024, 1, 31));
    let granularity = resolver.resolve(month, None);
    assert_eq!(granularity, Granularity::Hours);
    assert!(!should_use_heatmap(granularity));

    let year = domain(utc(2023, 1, 1), utc(2024, 1, 1));
    let granularity = resolver.resolve(year, None);
    assert_eq!(granularity, Granularity::Weeks);
    assert!(should_use_heatmap(granularity));
}

#[test]
fn heatmap_is_limited_to_day_and_coarser() {
    let heatmap: Vec<Granularity> = Granularity::ALL
        .into_iter()
        .filter(|granularity| should_use_heatmap(*granularity))
        .collect();
    assert_eq!(
        heatmap,
        vec![
            Granularity::Days,
            Granularity::Weeks,
            Granularity::Months,
            Granularity::Years,
            Granularity::Decades,
        ]
    );
}
