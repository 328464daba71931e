//! Linear range remapping used by every renderer.

/// Remaps `value` from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// The result is not clamped, so values outside the input range extrapolate.
/// Callers must keep `in_min != in_max`; a degenerate input range divides by
/// zero and yields an infinite or NaN result. Every call site in this crate
/// passes fixed, non-degenerate ranges.
#[inline]
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    out_min + (value - in_min) * (out_max - out_min) / (in_max - in_min)
}
