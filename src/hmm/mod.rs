//! hmm — exact inference for multichannel (mixture) hidden Markov models.
//!
//! Purpose
//! -------
//! Provide the log-space Forward algorithm and the covariate-weighted
//! mixture Viterbi algorithm over integer-coded, multichannel observation
//! batches, together with the model/observation types and error surface
//! they share.
//!
//! Key behaviors
//! -------------
//! - [`core`] holds validated parameter bundles, layout-aware observations,
//!   mixture layouts and log-weights, options, and validation helpers.
//! - [`algorithms`] holds the Forward and Viterbi engines.
//! - [`errors`] defines [`HMMError`] / [`HMMResult`] for every fallible
//!   entry point.
//!
//! Invariants & assumptions
//! ------------------------
//! - All probabilities are natural logarithms; `−∞` encodes probability
//!   zero and propagates without NaN.
//! - Callers supply already log-transformed, row-normalized parameters; the
//!   crate checks shapes, ranges, and NaN / `+∞`, not normalization.
//!
//! Downstream usage
//! ----------------
//! - Model-fitting code (EM, gradient methods) calls [`forward`] repeatedly
//!   and reduces with [`log_likelihood`].
//! - Decoding / reporting code calls [`viterbi_mixture`] or [`viterbi`] and
//!   reads [`ViterbiOutcome`].

pub mod algorithms;
pub mod core;
pub mod errors;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::algorithms::{
    ViterbiOutcome, forward, forward_with_options, log_likelihood, viterbi, viterbi_mixture,
    viterbi_mixture_with_options, viterbi_with_options,
};
pub use self::core::{
    ClusterLayout, Execution, ForwardOptions, HmmParams, MixtureCovariates, MixtureWeighting,
    ObservationLayout, Observations, ViterbiOptions, mixture_log_weights,
};
pub use self::errors::{HMMError, HMMResult};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_hmm::hmm::prelude::*;
//
// to import the main HMM surface in a single line.

pub mod prelude {
    pub use super::algorithms::{
        ViterbiOutcome, forward, forward_with_options, log_likelihood, viterbi, viterbi_mixture,
        viterbi_mixture_with_options,
    };
    pub use super::core::{Execution, ForwardOptions, MixtureWeighting, ViterbiOptions};
    pub use super::errors::{HMMError, HMMResult};
}
