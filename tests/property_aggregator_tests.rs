use heatline::core::{
    Calendar, Granularity, TimeDomain, UtcCalendar, aggregate_with_stats, instant_from_unix_millis,
    normalize,
};
use proptest::prelude::*;

const YEAR_MS: f64 = 365.0 * 86_400_000.0;

fn granularity() -> impl Strategy<Value = Granularity> {
    prop::sample::select(Granularity::ALL.to_vec())
}

proptest! {
    #[test]
    fn counts_match_events_inside_domain(
        start in 0.0f64..2.0e12,
        span in 1_000.0f64..(3.0 * YEAR_MS),
        fractions in prop::collection::vec(-0.2f64..1.2, 0..200),
        granularity in granularity()
    ) {
        let domain = TimeDomain::from_unix_millis(start, start + span).expect("valid domain");
        let calendar = UtcCalendar::default();
        let events: Vec<f64> = fractions.iter().map(|f| start + span * f).collect();
        let expected = events
            .iter()
            .filter_map(|millis| instant_from_unix_millis(*millis))
            .filter(|instant| domain.contains(*instant))
            .count();

        let (buckets, stats) = aggregate_with_stats(
            domain,
            granularity,
            &calendar,
            events,
            |millis| instant_from_unix_millis(*millis),
        );

        let total: usize = buckets.iter().map(|bucket| bucket.count).sum();
        prop_assert_eq!(total, expected);
        prop_assert_eq!(stats.bucketed, expected);
        prop_assert_eq!(stats.outside_envelope, 0);
        prop_assert_eq!(
            stats.supplied,
            stats.bucketed + stats.invalid_instant + stats.out_of_domain
        );
    }

    #[test]
    fn buckets_are_sorted_aligned_and_enveloped(
        start in 0.0f64..2.0e12,
        span in 1_000.0f64..(3.0 * YEAR_MS),
        fractions in prop::collection::vec(0.0f64..1.0, 1..120),
        granularity in granularity()
    ) {
        let domain = TimeDomain::from_unix_millis(start, start + span).expect("valid domain");
        let calendar = UtcCalendar::default();
        let events: Vec<f64> = fractions.iter().map(|f| start + span * f).collect();

        let (buckets, _) = aggregate_with_stats(
            domain,
            granularity,
            &calendar,
            &events,
            |millis| instant_from_unix_millis(**millis),
        );

        let lower = calendar.floor(granularity, domain.start()).expect("floor start");
        let upper = calendar.ceil(granularity, domain.end()).expect("ceil end");
        prop_assert!(buckets.windows(2).all(|pair| pair[0].start < pair[1].start));
        for bucket in &buckets {
            prop_assert!(bucket.start >= lower && bucket.start <= upper);
            prop_assert_eq!(calendar.floor(granularity, bucket.start), Some(bucket.start));
            prop_assert_eq!(bucket.count, bucket.members.len());
        }
    }

    #[test]
    fn normalized_rows_peak_at_one(
        start in 0.0f64..2.0e12,
        span in 60_000.0f64..YEAR_MS,
        fractions in prop::collection::vec(0.0f64..1.0, 1..120),
        granularity in granularity()
    ) {
        let domain = TimeDomain::from_unix_millis(start, start + span).expect("valid domain");
        let calendar = UtcCalendar::default();
        let events: Vec<f64> = fractions.iter().map(|f| start + span * f).collect();

        let (buckets, _) = aggregate_with_stats(
            domain,
            granularity,
            &calendar,
            events,
            |millis| instant_from_unix_millis(*millis),
        );
        let buckets = normalize(buckets);

        if !buckets.is_empty() {
            let peak = buckets
                .iter()
                .map(|bucket| bucket.intensity)
                .fold(0.0f64, f64::max);
            prop_assert_eq!(peak, 1.0);
        }
        prop_assert!(
            buckets
                .iter()
                .all(|bucket| bucket.intensity > 0.0 && bucket.intensity <= 1.0)
        );
    }
}
