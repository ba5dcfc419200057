//! Sizing heuristic deciding whether a projection should run inline.

/// Potential row count above which a projection is deferred.
pub const DEFAULT_DEFER_THRESHOLD: u64 = 4096;

/// Exponent cap keeping the estimate bounded for any mask gap.
const MAX_ESTIMATE_BITS: i32 = 20;

/// Upper bound on the rows a view from `root_mask` down to `max_mask` could show.
pub fn estimate_potential_row_count(root_mask: u8, max_mask: u8) -> u64 {
    let bits = (max_mask as i32 - root_mask as i32).clamp(0, MAX_ESTIMATE_BITS);
    1u64 << bits
}

/// [`should_defer_subnet_compute_with_threshold`] with the default threshold.
pub fn should_defer_subnet_compute(root_mask: u8, max_mask: u8) -> bool {
    should_defer_subnet_compute_with_threshold(root_mask, max_mask, DEFAULT_DEFER_THRESHOLD)
}

/// True when the estimate exceeds `threshold`. Advisory only.
pub fn should_defer_subnet_compute_with_threshold(
    root_mask: u8,
    max_mask: u8,
    threshold: u64,
) -> bool {
    estimate_potential_row_count(root_mask, max_mask) > threshold
}
