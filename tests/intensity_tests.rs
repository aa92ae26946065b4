use approx::assert_relative_eq;
use chrono::{TimeZone, Utc};
use heatline::core::{
    Granularity, Instant, TimeDomain, UtcCalendar, aggregate, max_count, normalize,
    normalize_in_place,
};

fn utc(day: u32, hour: u32) -> Instant {
    Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0)
        .single()
        .expect("valid instant")
}

fn may() -> TimeDomain {
    TimeDomain::new(utc(1, 0), utc(31, 0)).expect("valid domain")
}

#[test]
fn busiest_bucket_has_full_intensity() {
    let calendar = UtcCalendar::default();
    let events = [utc(2, 1), utc(2, 5), utc(2, 9), utc(2, 20), utc(4, 3), utc(9, 9)];

    let buckets = normalize(aggregate(
        may(),
        Granularity::Days,
        &calendar,
        events,
        |at| Some(*at),
    ));

    assert_eq!(max_count(&buckets), 4);
    let intensities: Vec<f64> = buckets.iter().map(|bucket| bucket.intensity).collect();
    assert_eq!(intensities, vec![1.0, 0.25, 0.25]);
    assert!(
        buckets
            .iter()
            .all(|bucket| bucket.intensity > 0.0 && bucket.intensity <= 1.0)
    );
}

#[test]
fn rows_are_normalized_independently() {
    let calendar = UtcCalendar::default();
    let quiet = [utc(3, 0)];
    let busy = [utc(3, 0), utc(3, 1), utc(3, 2), utc(5, 0)];

    let quiet = normalize(aggregate(may(), Granularity::Days, &calendar, quiet, |at| {
        Some(*at)
    }));
    let busy = normalize(aggregate(may(), Granularity::Days, &calendar, busy, |at| {
        Some(*at)
    }));

    // One event alone is the row maximum.
    assert_eq!(quiet[0].intensity, 1.0);
    assert_eq!(busy[0].intensity, 1.0);
    assert_relative_eq!(busy[1].intensity, 1.0 / 3.0, epsilon = 1e-12);
}

#[test]
fn normalize_in_place_overwrites_previous_intensity() {
    let calendar = UtcCalendar::default();
    let mut buckets = aggregate(
        may(),
        Granularity::Weeks,
        &calendar,
        [utc(6, 0), utc(7, 0), utc(20, 0)],
        |at| Some(*at),
    );
    for bucket in &mut buckets {
        bucket.intensity = 42.0;
    }

    normalize_in_place(&mut buckets);
    let intensities: Vec<f64> = buckets.iter().map(|bucket| bucket.intensity).collect();
    assert_eq!(intensities, vec![1.0, 0.5]);
}
