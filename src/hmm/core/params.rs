//! HMM parameters — validated, borrowed log-space model tables.
//!
//! Purpose
//! -------
//! Bundle the three model tables consumed by both engines into one borrowed
//! value whose dimensions are known to agree, so the recursions can index
//! without re-checking shapes.
//!
//! Key behaviors
//! -------------
//! - [`HmmParams::new`] validates the transition matrix (square, non-empty),
//!   the emission array (matching state axis, non-empty alphabet and channel
//!   axes), the initial distribution (length `S`), and every entry for NaN /
//!   `+∞`.
//! - [`HmmParams::accumulate_emission`] adds the per-channel emission
//!   log-probabilities for one time step onto a running value.
//!
//! Invariants & assumptions
//! ------------------------
//! - `transition` is `S×S` with entry `(i, j) = ln P(next = j | current = i)`.
//! - `emission` is `S×V×C` with entry `(s, v, c) = ln P(symbol v on channel
//!   c | state s)`; channels are conditionally independent given the state,
//!   so their contributions add.
//! - `init` has one log-probability per state. For mixture models it is the
//!   concatenation of the per-cluster initial distributions, in cluster
//!   order.
//! - Probabilities are not checked for normalization.
//!
//! Conventions
//! -----------
//! - `HmmParams` borrows; it never copies the caller's tables.
use crate::hmm::{
    core::validation::{
        validate_emission_shape, validate_init_length, validate_log_probabilities,
        validate_transition,
    },
    errors::HMMResult,
};
use ndarray::{ArrayView1, ArrayView2, ArrayView3, Axis};

/// HmmParams — log-space transition, emission, and initial tables.
///
/// Fields
/// ------
/// - `transition`: `ArrayView2<'a, f64>`, shape `(S, S)`.
/// - `emission`: `ArrayView3<'a, f64>`, shape `(S, V, C)`.
/// - `init`: `ArrayView1<'a, f64>`, length `S`.
///
/// Invariants
/// ----------
/// - Established by [`HmmParams::new`]: shapes agree, `S, V, C ≥ 1`, and no
///   entry is NaN or `+∞`.
#[derive(Debug, Clone, Copy)]
pub struct HmmParams<'a> {
    pub transition: ArrayView2<'a, f64>,
    pub emission: ArrayView3<'a, f64>,
    pub init: ArrayView1<'a, f64>,
}

impl<'a> HmmParams<'a> {
    /// Validate and bundle the model tables.
    ///
    /// Errors
    /// ------
    /// - `HMMError::TransitionNotSquare`, `HMMError::EmptyStateSpace`
    /// - `HMMError::EmissionStateMismatch`, `HMMError::EmptyAlphabet`,
    ///   `HMMError::NoChannels`
    /// - `HMMError::InitLengthMismatch`
    /// - `HMMError::InvalidLogProbability` for NaN or `+∞` entries.
    pub fn new(
        transition: ArrayView2<'a, f64>, emission: ArrayView3<'a, f64>, init: ArrayView1<'a, f64>,
    ) -> HMMResult<Self> {
        let n_states = validate_transition(transition)?;
        validate_emission_shape(emission, n_states)?;
        validate_init_length(init, n_states)?;
        validate_log_probabilities(transition, "transition")?;
        validate_log_probabilities(emission, "emission")?;
        validate_log_probabilities(init, "init")?;
        Ok(HmmParams { transition, emission, init })
    }

    pub fn n_states(&self) -> usize {
        self.transition.nrows()
    }

    pub fn n_symbols(&self) -> usize {
        self.emission.len_of(Axis(1))
    }

    pub fn n_channels(&self) -> usize {
        self.emission.len_of(Axis(2))
    }

    /// Add the emission log-probabilities of `symbols` (one per channel, in
    /// channel order) for `state` onto `base`.
    ///
    /// Channels are added one at a time, left to right, onto `base`.
    #[inline]
    pub fn accumulate_emission(&self, base: f64, state: usize, symbols: ArrayView1<usize>) -> f64 {
        symbols
            .iter()
            .enumerate()
            .fold(base, |acc, (channel, &symbol)| acc + self.emission[[state, symbol, channel]])
    }
}
