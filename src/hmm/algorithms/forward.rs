//! Forward algorithm — log-space forward probabilities for a batch.
//!
//! Purpose
//! -------
//! Fill the forward table `alpha(i, t, k) = ln P(o₁..o_t, state_t = i)` for
//! every state `i`, time step `t`, and sequence `k` of a batch under a single
//! (non-mixture) HMM with one or more conditionally independent channels.
//!
//! Key behaviors
//! -------------
//! - Initialization: `alpha(i, 0, k) = init(i) + Σ_c emission(i, o(k, 0, c), c)`.
//! - Recursion: `alpha(i, t, k) = LSE_j(alpha(j, t−1, k) + transition(j, i))
//!   + Σ_c emission(i, o(k, t, c), c)`.
//! - [`log_likelihood`] reduces a filled table to the per-sequence total
//!   log-likelihood `LSE_i alpha(i, T−1, k)`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Observations are laid out `(K, T, C)`; the output is `(S, T, K)`.
//! - Every entry of a successful result is written exactly once; there is
//!   no partial output on error because all validation happens first.
//! - Zero-probability paths yield `−∞` entries, never NaN.
//!
//! Conventions
//! -----------
//! - Each sequence owns its `(S, T)` slice of the output and a length-`S`
//!   scratch buffer; sequences share nothing else, so [`Execution::Parallel`]
//!   hands each slice to a separate rayon task.
use crate::{
    hmm::{
        core::{
            observations::{ObservationLayout, Observations},
            options::{Execution, ForwardOptions},
            params::HmmParams,
            validation::validate_observations,
        },
        errors::{HMMError, HMMResult},
    },
    numerical_stability::{log_sum_exp, log_sum_exp_view},
};
use ndarray::{Array1, Array3, ArrayView1, ArrayView2, ArrayView3, ArrayViewMut2, Axis};
use rayon::prelude::*;
use tracing::debug_span;

/// Forward log-probabilities with default [`ForwardOptions`].
///
/// Parameters
/// ----------
/// - `transition`: `(S, S)` log-transition matrix, `(i, j) = ln P(j | i)`.
/// - `emission`: `(S, V, C)` log-emission array.
/// - `init`: length-`S` initial log-distribution.
/// - `observations`: `(K, T, C)` symbol codes in `[0, V)`.
///
/// Returns
/// -------
/// `HMMResult<Array3<f64>>`
///   The `(S, T, K)` forward table.
///
/// Errors
/// ------
/// - Any shape or value violation reported by [`HmmParams::new`],
///   [`Observations::new`], or [`validate_observations`].
///
/// Examples
/// --------
/// ```rust
/// use ndarray::{Array3, array};
/// use rust_hmm::hmm::algorithms::forward::{forward, log_likelihood};
///
/// let transition = array![[0.9_f64, 0.1], [0.2, 0.8]].mapv(f64::ln);
/// let mut emission = Array3::<f64>::zeros((2, 2, 1));
/// emission.slice_mut(ndarray::s![.., .., 0])
///     .assign(&array![[0.7, 0.3], [0.4, 0.6]].mapv(f64::ln));
/// let init = array![0.6_f64, 0.4].mapv(f64::ln);
/// let obs = Array3::from_shape_vec((1, 2, 1), vec![0_usize, 1]).unwrap();
///
/// let alpha = forward(transition.view(), emission.view(), init.view(), obs.view()).unwrap();
/// let ll = log_likelihood(alpha.view()).unwrap();
/// assert!((ll[0] - 0.225_f64.ln()).abs() < 1e-12);
/// ```
pub fn forward(
    transition: ArrayView2<f64>, emission: ArrayView3<f64>, init: ArrayView1<f64>,
    observations: ArrayView3<usize>,
) -> HMMResult<Array3<f64>> {
    forward_with_options(transition, emission, init, observations, &ForwardOptions::default())
}

/// Forward log-probabilities with explicit [`ForwardOptions`].
///
/// Identical to [`forward`] except for the execution strategy; sequential
/// and parallel runs produce bit-identical tables.
pub fn forward_with_options(
    transition: ArrayView2<f64>, emission: ArrayView3<f64>, init: ArrayView1<f64>,
    observations: ArrayView3<usize>, options: &ForwardOptions,
) -> HMMResult<Array3<f64>> {
    // Reborrow so callers may pass views with unrelated lifetimes.
    let params = HmmParams::new(transition.view(), emission.view(), init.view())?;
    let observations = Observations::new(observations, ObservationLayout::SequenceTimeChannel)?;
    validate_observations(&observations, params.n_symbols(), params.n_channels())?;

    let n_states = params.n_states();
    let n_steps = observations.n_steps();
    let n_sequences = observations.n_sequences();
    let n_channels = observations.n_channels();
    let span = debug_span!("forward", n_states, n_steps, n_sequences, n_channels);
    let _guard = span.enter();

    let mut alpha = Array3::<f64>::zeros((n_states, n_steps, n_sequences));
    match options.execution {
        Execution::Sequential => {
            alpha.axis_iter_mut(Axis(2)).enumerate().for_each(|(k, table)| {
                forward_sequence(&params, &observations, k, table);
            });
        }
        Execution::Parallel => {
            alpha.axis_iter_mut(Axis(2)).into_par_iter().enumerate().for_each(|(k, table)| {
                forward_sequence(&params, &observations, k, table);
            });
        }
    }
    Ok(alpha)
}

/// Fill the `(S, T)` forward table of sequence `k`.
fn forward_sequence(
    params: &HmmParams, observations: &Observations, k: usize, mut alpha: ArrayViewMut2<f64>,
) {
    let n_states = params.n_states();
    let mut predecessors = vec![0.0; n_states];

    let symbols = observations.symbols(k, 0);
    for i in 0..n_states {
        alpha[[i, 0]] = params.accumulate_emission(params.init[i], i, symbols);
    }

    for t in 1..observations.n_steps() {
        let symbols = observations.symbols(k, t);
        for i in 0..n_states {
            for (j, slot) in predecessors.iter_mut().enumerate() {
                *slot = alpha[[j, t - 1]] + params.transition[[j, i]];
            }
            alpha[[i, t]] = params.accumulate_emission(log_sum_exp(&predecessors), i, symbols);
        }
    }
}

/// Total log-likelihood of each sequence from a filled forward table.
///
/// Returns `LSE_i alpha(i, T−1, k)` for every `k`, i.e. `ln P(o₁..o_T)`.
/// An impossible sequence yields `−∞`.
///
/// Errors
/// ------
/// - `HMMError::EmptySequence` if the table has no time steps.
/// - `HMMError::EmptyStateSpace` if the table has no states.
pub fn log_likelihood(alpha: ArrayView3<f64>) -> HMMResult<Array1<f64>> {
    let (n_states, n_steps, _) = alpha.dim();
    if n_steps == 0 {
        return Err(HMMError::EmptySequence);
    }
    if n_states == 0 {
        return Err(HMMError::EmptyStateSpace);
    }
    let last = alpha.index_axis(Axis(1), n_steps - 1);
    Ok(last.axis_iter(Axis(1)).map(log_sum_exp_view).collect())
}
