//! Log-space primitives.
//!
//! Provides the numerically delicate leaves of the HMM recursions:
//! log-sum-exp marginalization, first-occurrence argmax for max-product
//! recursions, and column-wise log-softmax for mixture weights.
//!
//! # Provided items
//! - [`log_sum_exp`] / [`log_sum_exp_view`]: stable `ln(Σ exp(xᵢ))` using a
//!   max shift, so large or very negative inputs neither overflow nor
//!   underflow to `ln(0)`.
//! - [`argmax_first`]: index and value of the maximum, ties resolved to the
//!   lowest index.
//! - [`log_softmax_columns`]: max-shifted log-softmax down each column.
//! - [`log_softmax_columns_reference`]: `ln(exp(x) / Σ exp(x))` evaluated
//!   literally, without the max shift.
//!
//! # Conventions
//! `−∞` is an ordinary value here (probability zero). A slice whose maximum
//! is `−∞` sums to `−∞` without producing NaN.
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

fn log_sum_exp_iter<I>(values: I) -> f64
where
    I: Iterator<Item = f64> + Clone,
{
    let max = values.clone().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        // All −∞ (or a +∞ present): the shifted sum is undefined.
        return max;
    }
    let sum: f64 = values.map(|v| (v - max).exp()).sum();
    max + sum.ln()
}

/// Numerically stable `ln(Σᵢ exp(xᵢ))`.
///
/// Computes `m + ln(Σᵢ exp(xᵢ − m))` with `m = maxᵢ xᵢ`.
///
/// # Parameters
/// - `values`: log-values; must be non-empty.
///
/// # Returns
/// - The log of the summed exponentials. If every entry is `−∞` the result
///   is `−∞`.
///
/// # Panics
/// - In debug builds, if `values` is empty. An empty input is a caller bug;
///   release builds return `−∞` (the log of an empty sum).
pub fn log_sum_exp(values: &[f64]) -> f64 {
    debug_assert!(!values.is_empty(), "log_sum_exp requires at least one value");
    log_sum_exp_iter(values.iter().copied())
}

/// [`log_sum_exp`] over an `ndarray` view (any stride).
pub fn log_sum_exp_view(values: ArrayView1<f64>) -> f64 {
    debug_assert!(!values.is_empty(), "log_sum_exp requires at least one value");
    log_sum_exp_iter(values.iter().copied())
}

/// Index and value of the maximum element.
///
/// Ties are broken toward the **lowest** index: a later element replaces the
/// running best only when it is strictly greater. When every element is
/// `−∞`, the result is `(0, −∞)`.
///
/// # Panics
/// - Never panics. An empty iterator yields `(0, −∞)`.
#[inline]
pub fn argmax_first<I>(values: I) -> (usize, f64)
where
    I: IntoIterator<Item = f64>,
{
    let mut best_index = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (index, value) in values.into_iter().enumerate() {
        if index == 0 || value > best_value {
            best_index = index;
            best_value = value;
        }
    }
    (best_index, best_value)
}

/// Column-wise log-softmax with max shift.
///
/// For each column `x`, returns `x − (m + ln Σ exp(x − m))`. Exponentiating
/// any output column gives a probability vector summing to one.
pub fn log_softmax_columns(logits: ArrayView2<f64>) -> Array2<f64> {
    let mut out = logits.to_owned();
    for mut column in out.axis_iter_mut(Axis(1)) {
        let norm = log_sum_exp_view(column.view());
        column.mapv_inplace(|x| x - norm);
    }
    out
}

/// Column-wise log-softmax evaluated literally as `ln(exp(x) / Σ exp(x))`.
///
/// Kept for callers that need bit-compatibility with the unshifted
/// computation. A column entry above roughly `709` overflows `exp` and the
/// whole column becomes NaN.
pub fn log_softmax_columns_reference(logits: ArrayView2<f64>) -> Array2<f64> {
    let mut weights = logits.mapv(f64::exp);
    for mut column in weights.axis_iter_mut(Axis(1)) {
        let total = column.sum();
        column.mapv_inplace(|w| (w / total).ln());
    }
    weights
}
