//! hmm::errors — precondition failures for the Forward and Viterbi engines.
//!
//! Purpose
//! -------
//! Define [`HMMError`] and the [`HMMResult`] alias used by every fallible
//! entry point of the HMM stack. The dynamic programs themselves never fail;
//! all variants describe malformed inputs that are rejected before any
//! recursion starts.
//!
//! Conventions
//! -----------
//! - **Indices are 0-based** (match Rust/NumPy).
//! - `S` = number of states, `V` = symbol alphabet size, `C` = channels,
//!   `K` = sequences, `T` = time steps, `G` = mixture clusters.
//! - A log-probability of `−∞` is a valid value (probability zero). Only NaN
//!   and `+∞` are rejected.
//! - When the `python-bindings` feature is enabled, every variant converts to
//!   a Python `ValueError` carrying the `Display` message.
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Crate-wide result alias for HMM operations that may produce [`HMMError`].
pub type HMMResult<T> = Result<T, HMMError>;

/// Unified error type for HMM inference.
///
/// Covers model-shape validation, observation validation, and mixture
/// (covariate / cluster) validation. Implements `Display`/`Error` so it can
/// be propagated with `?` and rendered without extra context.
#[derive(Debug, Clone, PartialEq)]
pub enum HMMError {
    // ---- Model shape ----
    /// The model has no latent states.
    EmptyStateSpace,

    /// The emission array has no symbols on its symbol axis.
    EmptyAlphabet,

    /// The transition matrix is not square.
    TransitionNotSquare { rows: usize, cols: usize },

    /// Emission state axis disagrees with the transition matrix.
    EmissionStateMismatch { expected: usize, actual: usize },

    /// Initial distribution length disagrees with the transition matrix.
    InitLengthMismatch { expected: usize, actual: usize },

    /// A log-probability is NaN or `+∞`.
    InvalidLogProbability { source: &'static str, index: Vec<usize>, value: f64 },

    // ---- Observations ----
    /// Sequences have zero time steps.
    EmptySequence,

    /// Observations carry zero channels.
    NoChannels,

    /// Observation channel count disagrees with the emission channel axis.
    ChannelCountMismatch { expected: usize, actual: usize },

    /// A symbol code falls outside `[0, V)`.
    SymbolOutOfRange {
        sequence: usize,
        time: usize,
        channel: usize,
        symbol: usize,
        n_symbols: usize,
    },

    // ---- Mixture ----
    /// No cluster sizes were supplied.
    NoClusters,

    /// A cluster owns zero states.
    EmptyCluster { cluster: usize },

    /// Running total of cluster sizes overflows `usize` at `cluster`.
    ClusterSizeOverflow { cluster: usize },

    /// Cluster sizes do not add up to the number of states.
    ClusterSizeSumMismatch { expected: usize, actual: usize },

    /// Number of clusters disagrees with the number of coefficient columns.
    ClusterCountMismatch { expected: usize, actual: usize },

    /// Design matrix columns disagree with coefficient rows.
    CovariateCountMismatch { expected: usize, actual: usize },

    /// Design matrix rows disagree with the number of sequences.
    DesignRowMismatch { expected: usize, actual: usize },

    /// A covariate or coefficient is NaN or infinite.
    NonFiniteCovariate { source: &'static str, row: usize, col: usize, value: f64 },

    /// The linear predictor `X · coef` overflowed for one (cluster, sequence) pair.
    NonFiniteLinearPredictor { cluster: usize, sequence: usize, value: f64 },
}

impl std::error::Error for HMMError {}

impl std::fmt::Display for HMMError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Model shape ----
            HMMError::EmptyStateSpace => {
                write!(f, "Model must have at least one latent state.")
            }
            HMMError::EmptyAlphabet => {
                write!(f, "Emission array must have at least one symbol.")
            }
            HMMError::TransitionNotSquare { rows, cols } => {
                write!(f, "Transition matrix must be square; got {rows}x{cols}.")
            }
            HMMError::EmissionStateMismatch { expected, actual } => {
                write!(
                    f,
                    "Emission state axis does not match transition matrix: expected {expected}, got {actual}"
                )
            }
            HMMError::InitLengthMismatch { expected, actual } => {
                write!(
                    f,
                    "Initial distribution length does not match number of states: expected {expected}, got {actual}"
                )
            }
            HMMError::InvalidLogProbability { source, index, value } => {
                write!(
                    f,
                    "{source} log-probability at index {index:?} must not be NaN or +inf; got {value}"
                )
            }
            // ---- Observations ----
            HMMError::EmptySequence => {
                write!(f, "Observation sequences must have at least one time step.")
            }
            HMMError::NoChannels => {
                write!(f, "Observations must have at least one channel.")
            }
            HMMError::ChannelCountMismatch { expected, actual } => {
                write!(
                    f,
                    "Observation channel count does not match emission channels: expected {expected}, got {actual}"
                )
            }
            HMMError::SymbolOutOfRange { sequence, time, channel, symbol, n_symbols } => {
                write!(
                    f,
                    "Symbol {symbol} at (sequence {sequence}, time {time}, channel {channel}) is outside [0, {n_symbols})"
                )
            }
            // ---- Mixture ----
            HMMError::NoClusters => {
                write!(f, "At least one mixture cluster is required.")
            }
            HMMError::EmptyCluster { cluster } => {
                write!(f, "Mixture cluster {cluster} has zero states.")
            }
            HMMError::ClusterSizeOverflow { cluster } => {
                write!(f, "Cluster sizes overflow usize at cluster {cluster}.")
            }
            HMMError::ClusterSizeSumMismatch { expected, actual } => {
                write!(
                    f,
                    "Cluster sizes must sum to the number of states: expected {expected}, got {actual}"
                )
            }
            HMMError::ClusterCountMismatch { expected, actual } => {
                write!(
                    f,
                    "Number of clusters does not match coefficient columns: expected {expected}, got {actual}"
                )
            }
            HMMError::CovariateCountMismatch { expected, actual } => {
                write!(
                    f,
                    "Design matrix columns do not match coefficient rows: expected {expected}, got {actual}"
                )
            }
            HMMError::DesignRowMismatch { expected, actual } => {
                write!(
                    f,
                    "Design matrix rows do not match number of sequences: expected {expected}, got {actual}"
                )
            }
            HMMError::NonFiniteCovariate { source, row, col, value } => {
                write!(f, "{source} entry at ({row}, {col}) must be finite; got {value}")
            }
            HMMError::NonFiniteLinearPredictor { cluster, sequence, value } => {
                write!(
                    f,
                    "Linear predictor for cluster {cluster}, sequence {sequence} must be finite; got {value}"
                )
            }
        }
    }
}

/// Convert an [`HMMError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl std::convert::From<HMMError> for PyErr {
    fn from(err: HMMError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `Display` messages embedding the offending payload.
    //
    // They intentionally DO NOT cover:
    // - When each variant is raised; see `hmm::core::validation`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // `SymbolOutOfRange` reports the full (sequence, time, channel) location.
    //
    // Given
    // -----
    // - Symbol 5 at sequence 1, time 2, channel 0 with an alphabet of 3.
    //
    // Expect
    // ------
    // - The message contains every coordinate and the alphabet bound.
    fn symbol_out_of_range_display_includes_location() {
        // Arrange
        let err = HMMError::SymbolOutOfRange {
            sequence: 1,
            time: 2,
            channel: 0,
            symbol: 5,
            n_symbols: 3,
        };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("Symbol 5"));
        assert!(msg.contains("sequence 1"));
        assert!(msg.contains("time 2"));
        assert!(msg.contains("channel 0"));
        assert!(msg.contains("[0, 3)"));
    }

    #[test]
    // Purpose
    // -------
    // Size-mismatch variants report expected and actual values.
    //
    // Given
    // -----
    // - `ClusterSizeSumMismatch { expected: 4, actual: 3 }`.
    //
    // Expect
    // ------
    // - The message contains both numbers.
    fn mismatch_display_includes_expected_and_actual() {
        let msg = HMMError::ClusterSizeSumMismatch { expected: 4, actual: 3 }.to_string();
        assert!(msg.contains("expected 4"));
        assert!(msg.contains("got 3"));
    }

    #[test]
    // Purpose
    // -------
    // Overflow variants name where the overflow happened.
    //
    // Given
    // -----
    // - `ClusterSizeOverflow { cluster: 1 }` and
    //   `NonFiniteLinearPredictor { cluster: 2, sequence: 5, value: +∞ }`.
    //
    // Expect
    // ------
    // - Both messages carry the offending indices.
    fn overflow_display_includes_location() {
        let msg = HMMError::ClusterSizeOverflow { cluster: 1 }.to_string();
        assert!(msg.contains("cluster 1"));

        let err =
            HMMError::NonFiniteLinearPredictor { cluster: 2, sequence: 5, value: f64::INFINITY };
        let msg = err.to_string();
        assert!(msg.contains("cluster 2"));
        assert!(msg.contains("sequence 5"));
        assert!(msg.contains("inf"));
    }
}
