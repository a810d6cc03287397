//! Numeric conversion helpers centralizing the float/integer casts used by
//! timing, geometry and volume math.

use num_traits::cast::cast;

/// Convert a millisecond count to `f64`, saturating at `f64::MAX`.
#[must_use]
pub fn ms_to_f64(ms: u64) -> f64 {
    cast::<u64, f64>(ms).unwrap_or(f64::MAX)
}

/// Convert a non-negative `f64` of milliseconds back to `u64`, returning 0 for
/// negative or non-finite values.
#[must_use]
pub fn f64_to_ms(value: f64) -> u64 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    cast::<f64, u64>(value.round()).unwrap_or(u64::MAX)
}

/// Fraction of `total` covered by `elapsed`, clamped to `0.0..=1.0`.
#[must_use]
pub fn progress_ratio(elapsed: u64, total: u64) -> f64 {
    if total == 0 {
        return 1.0;
    }
    (ms_to_f64(elapsed) / ms_to_f64(total)).clamp(0.0, 1.0)
}

/// Linear interpolation of `step` out of `steps` between `from` and `to`.
#[must_use]
pub fn lerp_step(from: f64, to: f64, step: u32, steps: u32) -> f64 {
    if steps == 0 {
        return to;
    }
    let t = f64::from(step.min(steps)) / f64::from(steps);
    (to - from).mul_add(t, from)
}
