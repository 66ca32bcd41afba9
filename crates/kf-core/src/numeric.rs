use crate::{CoreError, CoreResult};

/// Floating point type used throughout system
pub type Real = f64;

/// Pass `v` through unchanged when finite.
pub fn ensure_finite(v: Real, what: &'static str) -> CoreResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// True when `v` equals its own truncation exactly. No tolerance is applied.
pub fn is_integral(v: Real) -> bool {
    v.is_finite() && v == v.trunc()
}

/// `n` evenly spaced samples over `[start, end]`, both ends included.
///
/// The last sample is pinned to `end` so accumulated rounding never moves the
/// final output time.
pub fn linspace(start: Real, end: Real, n: usize) -> Vec<Real> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as Real;
            let mut out: Vec<Real> = (0..n).map(|i| start + step * i as Real).collect();
            out[n - 1] = end;
            out
        }
    }
}
