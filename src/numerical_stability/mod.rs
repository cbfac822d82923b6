//! numerical_stability — log-space arithmetic shared by the HMM engines.
//!
//! Purpose
//! -------
//! Collect the numerically delicate building blocks that the Forward and
//! Viterbi recursions compose: stable log-sum-exp, lowest-index argmax, and
//! column-wise log-softmax. Centralizing them here lets the engines stay
//! pure index arithmetic over log-probabilities.
//!
//! Key behaviors
//! -------------
//! - `log_sum_exp` / `log_sum_exp_view` marginalize in log space with a max
//!   shift and map an all-`−∞` input to `−∞`.
//! - `argmax_first` defines the tie-break contract for max-product
//!   recursions: the lowest-indexed maximizer wins.
//! - `log_softmax_columns` and `log_softmax_columns_reference` turn linear
//!   predictors into per-column log-weights, with and without the max shift.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs never contain NaN; upstream validation rejects NaN and `+∞`
//!   log-probabilities before they reach these helpers.
//! - `log_sum_exp` is never called with an empty input.
//!
//! Conventions
//! -----------
//! - All routines are pure functions over `f64` slices or `ndarray` views.
//! - This module never logs, performs I/O, or touches global state.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`log_space`] cover agreement with naive formulas,
//!   permutation invariance, extreme magnitudes, `−∞` propagation, tie
//!   breaking, and softmax mass conservation.

pub mod log_space;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::log_space::{
    argmax_first, log_softmax_columns, log_softmax_columns_reference, log_sum_exp,
    log_sum_exp_view,
};
