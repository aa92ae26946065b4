use crate::core::Bucket;

/// Sets each bucket's intensity to `count / max_count` within this row.
///
/// Rows are normalized independently; call once per row.
#[must_use]
pub fn normalize<T>(mut buckets: Vec<Bucket<T>>) -> Vec<Bucket<T>> {
    normalize_in_place(&mut buckets);
    buckets
}

pub fn normalize_in_place<T>(buckets: &mut [Bucket<T>]) {
    let max_count = max_count(buckets);
    for bucket in buckets.iter_mut() {
        bucket.intensity = bucket.count as f64 / max_count as f64;
    }
}

/// Largest count in the row, or `1` for empty or all-zero rows.
#[must_use]
pub fn max_count<T>(buckets: &[Bucket<T>]) -> usize {
    buckets
        .iter()
        .map(|bucket| bucket.count)
        .max()
        .filter(|max| *max > 0)
        .unwrap_or(1)
}
