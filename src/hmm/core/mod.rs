//! hmm::core — model tables, observations, mixtures, options, and validation.
//!
//! Purpose
//! -------
//! Provide the structural building blocks shared by the Forward and Viterbi
//! engines: borrowed model parameters with consistent shapes, layout-aware
//! observation batches, mixture cluster layouts with covariate log-weights,
//! engine options, and the fail-fast validation helpers behind them.
//!
//! Key behaviors
//! -------------
//! - [`HmmParams`] bundles transition, emission, and initial log-tables after
//!   validating their shapes and values.
//! - [`Observations`] reads one symbol per channel at any `(sequence, time)`
//!   regardless of whether the array is sequence-major or channel-major.
//! - [`ClusterLayout`], [`MixtureCovariates`], and [`mixture_log_weights`]
//!   implement the covariate-driven initial-state re-weighting of mixture
//!   HMMs.
//! - [`ForwardOptions`] / [`ViterbiOptions`] select sequential or parallel
//!   execution and the mixture-weight arithmetic.
//!
//! Invariants & assumptions
//! ------------------------
//! - Everything is carried in natural-log space; `−∞` means probability zero
//!   and is valid everywhere.
//! - Constructors validate their own invariants; cross-object consistency
//!   (e.g. observation channels vs emission channels) is checked by the
//!   engine entry points via [`validation`].
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests for its constructors and helpers.
//! - End-to-end behavior is exercised by the engine tests and by the
//!   integration tests under `tests/`.

pub mod mixture;
pub mod observations;
pub mod options;
pub mod params;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::mixture::{ClusterLayout, MixtureCovariates, mixture_log_weights};
pub use self::observations::{ObservationLayout, Observations};
pub use self::options::{Execution, ForwardOptions, MixtureWeighting, ViterbiOptions};
pub use self::params::HmmParams;
pub use self::validation::{
    validate_cluster_sizes, validate_emission_shape, validate_finite_matrix, validate_init_length,
    validate_log_probabilities, validate_mixture, validate_observations, validate_transition,
};
