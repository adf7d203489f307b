//! Numeric domain guards
//!
//! The model's closed-form approximations have two places where rounding can
//! push an intermediate out of its mathematical domain: the inverse cosine in
//! the zenith angle and the ratio over `MUF - OWF`. Both are handled here so
//! the piecewise formulas read exactly as written.

/// Clamp a cosine to `[-1, 1]` before `acos`.
pub fn clamp_cosine(value: f64) -> f64 {
    value.clamp(-1.0, 1.0)
}

/// `numerator / denominator`, or 0 when the denominator is numerically zero.
///
/// Callers use the result as a penalty fraction, so a collapsed interval
/// contributes no penalty.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator.abs() < f64::EPSILON {
        0.0
    } else {
        numerator / denominator
    }
}

/// `value^exponent` with `value` floored at 0 first.
pub fn non_negative_root(value: f64, exponent: f64) -> f64 {
    value.max(0.0).powf(exponent)
}
