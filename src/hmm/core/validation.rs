//! HMM validation helpers — fail-fast checks for shapes, codes, and mixtures.
//!
//! Purpose
//! -------
//! Centralize the precondition checks that guard the Forward and Viterbi
//! recursions. The recursions index arrays directly and assume consistent
//! dimensions; these helpers reject malformed inputs up front with a
//! structured [`HMMError`] naming the violated invariant, instead of letting
//! an out-of-bounds index panic or a silent `ln(0)` propagate.
//!
//! Key behaviors
//! -------------
//! - Validate the model triple (transition, emission, initial distribution)
//!   for non-emptiness, squareness, agreeing state counts, and the absence of
//!   NaN / `+∞` log-probabilities.
//! - Validate observation arrays against the emission alphabet and channel
//!   count.
//! - Validate mixture cluster sizes and covariate matrices against the model
//!   and the observation batch.
//!
//! Invariants & assumptions
//! ------------------------
//! - `−∞` is a legal log-probability and is never rejected.
//! - Row-stochasticity of the transition and emission tables is *not*
//!   checked; callers own probability normalization.
//!
//! Conventions
//! -----------
//! - Validation functions return [`HMMResult`] and never panic on invalid
//!   inputs.
//! - The first violation encountered (in logical index order) is reported.
//! - This module contains no I/O and no logging.
use crate::hmm::{
    core::{mixture::MixtureCovariates, observations::Observations},
    errors::{HMMError, HMMResult},
};
use ndarray::{ArrayView, ArrayView1, ArrayView2, ArrayView3, Dimension, IntoDimension};

/// Validate the transition matrix and return the number of states `S`.
///
/// Errors
/// ------
/// - `HMMError::TransitionNotSquare` if `rows != cols`.
/// - `HMMError::EmptyStateSpace` if the matrix is `0×0`.
pub fn validate_transition(transition: ArrayView2<f64>) -> HMMResult<usize> {
    let (rows, cols) = transition.dim();
    if rows != cols {
        return Err(HMMError::TransitionNotSquare { rows, cols });
    }
    if rows == 0 {
        return Err(HMMError::EmptyStateSpace);
    }
    Ok(rows)
}

/// Validate the `(S, V, C)` emission array against `n_states`.
///
/// Errors
/// ------
/// - `HMMError::EmissionStateMismatch` if the state axis differs from
///   `n_states`.
/// - `HMMError::EmptyAlphabet` if `V == 0`.
/// - `HMMError::NoChannels` if `C == 0`.
pub fn validate_emission_shape(emission: ArrayView3<f64>, n_states: usize) -> HMMResult<()> {
    let (states, symbols, channels) = emission.dim();
    if states != n_states {
        return Err(HMMError::EmissionStateMismatch { expected: n_states, actual: states });
    }
    if symbols == 0 {
        return Err(HMMError::EmptyAlphabet);
    }
    if channels == 0 {
        return Err(HMMError::NoChannels);
    }
    Ok(())
}

/// Validate the initial distribution length against `n_states`.
pub fn validate_init_length(init: ArrayView1<f64>, n_states: usize) -> HMMResult<()> {
    if init.len() != n_states {
        return Err(HMMError::InitLengthMismatch { expected: n_states, actual: init.len() });
    }
    Ok(())
}

/// Reject NaN and `+∞` entries in a log-probability array of any rank.
///
/// Parameters
/// ----------
/// - `values`: log-probabilities; `−∞` and any finite value are accepted.
/// - `source`: name of the array, used in the error message.
///
/// Errors
/// ------
/// - `HMMError::InvalidLogProbability` carrying the multi-index and value of
///   the first offending entry.
pub fn validate_log_probabilities<D: Dimension>(
    values: ArrayView<f64, D>, source: &'static str,
) -> HMMResult<()> {
    for (pattern, &value) in values.indexed_iter() {
        if value.is_nan() || value == f64::INFINITY {
            let index = pattern.into_dimension().slice().to_vec();
            return Err(HMMError::InvalidLogProbability { source, index, value });
        }
    }
    Ok(())
}

/// Validate observation dimensions and symbol codes against the emission
/// array.
///
/// Errors
/// ------
/// - `HMMError::ChannelCountMismatch` if the observation channel count
///   differs from the emission channel axis.
/// - `HMMError::SymbolOutOfRange` for the first code `≥ V`, reported with its
///   `(sequence, time, channel)` coordinates regardless of storage layout.
pub fn validate_observations(
    observations: &Observations, n_symbols: usize, n_channels: usize,
) -> HMMResult<()> {
    if observations.n_channels() != n_channels {
        return Err(HMMError::ChannelCountMismatch {
            expected: n_channels,
            actual: observations.n_channels(),
        });
    }
    for sequence in 0..observations.n_sequences() {
        for time in 0..observations.n_steps() {
            let symbols = observations.symbols(sequence, time);
            for (channel, &symbol) in symbols.iter().enumerate() {
                if symbol >= n_symbols {
                    return Err(HMMError::SymbolOutOfRange {
                        sequence,
                        time,
                        channel,
                        symbol,
                        n_symbols,
                    });
                }
            }
        }
    }
    Ok(())
}

/// Validate mixture cluster sizes and return their total.
///
/// Errors
/// ------
/// - `HMMError::NoClusters` if `sizes` is empty.
/// - `HMMError::EmptyCluster` for the first zero-sized cluster.
/// - `HMMError::ClusterSizeOverflow` if the total does not fit in `usize`.
pub fn validate_cluster_sizes(sizes: &[usize]) -> HMMResult<usize> {
    if sizes.is_empty() {
        return Err(HMMError::NoClusters);
    }
    if let Some(cluster) = sizes.iter().position(|&n| n == 0) {
        return Err(HMMError::EmptyCluster { cluster });
    }
    sizes.iter().enumerate().try_fold(0_usize, |total, (cluster, &n)| {
        total.checked_add(n).ok_or(HMMError::ClusterSizeOverflow { cluster })
    })
}

/// Reject non-finite entries in a covariate or coefficient matrix.
pub fn validate_finite_matrix(values: ArrayView2<f64>, source: &'static str) -> HMMResult<()> {
    for ((row, col), &value) in values.indexed_iter() {
        if !value.is_finite() {
            return Err(HMMError::NonFiniteCovariate { source, row, col, value });
        }
    }
    Ok(())
}

/// Cross-check a mixture specification against the model and the batch.
///
/// Parameters
/// ----------
/// - `cluster_states`: total states owned by the clusters (sum of sizes).
/// - `n_clusters`: number of clusters.
/// - `covariates`: validated design / coefficient pair.
/// - `n_states`: states in the model.
/// - `n_sequences`: sequences in the observation batch.
///
/// Errors
/// ------
/// - `HMMError::ClusterSizeSumMismatch` if `cluster_states != n_states`.
/// - `HMMError::ClusterCountMismatch` if the coefficient matrix has a
///   different number of columns than there are clusters.
/// - `HMMError::DesignRowMismatch` if the design matrix does not have one row
///   per sequence.
pub fn validate_mixture(
    cluster_states: usize, n_clusters: usize, covariates: &MixtureCovariates, n_states: usize,
    n_sequences: usize,
) -> HMMResult<()> {
    if cluster_states != n_states {
        return Err(HMMError::ClusterSizeSumMismatch { expected: n_states, actual: cluster_states });
    }
    if covariates.n_clusters() != n_clusters {
        return Err(HMMError::ClusterCountMismatch {
            expected: covariates.n_clusters(),
            actual: n_clusters,
        });
    }
    if covariates.n_sequences() != n_sequences {
        return Err(HMMError::DesignRowMismatch {
            expected: n_sequences,
            actual: covariates.n_sequences(),
        });
    }
    Ok(())
}
