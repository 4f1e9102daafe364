//! Helper functions for report calculations

/// Nearest-rank percentile of ascending `sorted_values`: `sorted[floor(p * n)]`,
/// clamped to the last element. Returns 0 for an empty slice.
pub(crate) fn nearest_rank_percentile(sorted_values: &[u64], percentile: f64) -> u64 {
    if sorted_values.is_empty() {
        return 0;
    }

    let index = (percentile * sorted_values.len() as f64).floor() as usize;
    sorted_values
        .get(index.min(sorted_values.len() - 1))
        .copied()
        .unwrap_or(0)
}

/// Average of durations, 0 when empty
pub(crate) fn calculate_average<'a>(values: impl IntoIterator<Item = &'a u64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0u64, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

/// `part / total * 100`, 0 when `total` is 0
pub(crate) fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}
