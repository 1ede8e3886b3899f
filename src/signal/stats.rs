//! Nearest-rank order statistics

/// Nearest-rank percentile of an ascending slice
///
/// Index is `round(p / 100 × (n − 1))`, with `p` clamped to `0..=100`.
/// `None` for an empty slice.
pub fn percentile<T: Ord + Copy>(sorted: &[T], p: f64) -> Option<T> {
    if sorted.is_empty() {
        return None;
    }
    let p = if p.is_finite() { p.clamp(0.0, 100.0) } else { 50.0 };
    let last = sorted.len() - 1;
    let index = ((p / 100.0) * last as f64).round() as usize;
    sorted.get(index.min(last)).copied()
}

/// Median of an ascending slice; the upper middle for even lengths
///
/// Identical to `percentile(sorted, 50.0)` for every length.
pub fn median<T: Ord + Copy>(sorted: &[T]) -> Option<T> {
    sorted.get(sorted.len() / 2).copied()
}
