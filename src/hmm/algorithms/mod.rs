//! hmm::algorithms — the Forward and mixture-Viterbi dynamic programs.
//!
//! Purpose
//! -------
//! Host the two batch engines of the crate. Both validate their inputs up
//! front, then run an infallible per-sequence recursion in log space.
//!
//! Key behaviors
//! -------------
//! - [`forward`] fills the `(S, T, K)` table of forward log-probabilities;
//!   [`log_likelihood`] reduces it to per-sequence totals.
//! - [`viterbi_mixture`] computes covariate-driven mixture log-weights once
//!   for the batch, then decodes each sequence's most probable path with
//!   lowest-index tie breaking; [`viterbi`] is the plain-HMM special case.
//!
//! Invariants & assumptions
//! ------------------------
//! - Sequences never share mutable state; scratch tables are per sequence,
//!   so both engines can fan out over rayon without locking.
//! - No I/O; diagnostics go through `tracing` at `debug` level only.

pub mod forward;
pub mod viterbi;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::forward::{forward, forward_with_options, log_likelihood};
pub use self::viterbi::{
    ViterbiOutcome, viterbi, viterbi_mixture, viterbi_mixture_with_options, viterbi_with_options,
};
