//! Viterbi decoding for mixture HMMs with covariate-weighted initial states.
//!
//! Purpose
//! -------
//! Recover, for every sequence in a batch, the single most probable latent
//! state path and its joint log-probability under a mixture HMM whose
//! initial distribution is re-weighted per sequence by a softmax over
//! clusters of the linear predictor `X · coef`.
//!
//! Key behaviors
//! -------------
//! - Mixture log-weights for the whole batch are computed once, before any
//!   sequence is decoded (the only cross-sequence step).
//! - Per sequence `k`:
//!   - `delta(j, 0) = init(j) + lw(cluster(j), k) + Σ_c emission(j, o(c, 0, k), c)`;
//!   - `phi(j, t) = argmax_i (delta(i, t−1) + transition(i, j))`;
//!   - `delta(j, t) = delta(phi(j, t), t−1) + transition(phi(j, t), j)
//!     + Σ_c emission(j, o(c, t, k), c)`;
//!   - `q(T−1) = argmax_j delta(j, T−1)`, `logp(k) = max_j delta(j, T−1)`;
//!   - `q(t) = phi(q(t+1), t+1)` for `t = T−2 … 0`.
//! - [`viterbi`] decodes a plain HMM (one cluster, log-weight zero).
//!
//! Invariants & assumptions
//! ------------------------
//! - Observations are laid out `(C, T, K)`.
//! - Every argmax resolves ties to the **lowest** state index. This is part
//!   of the contract: identical inputs always decode to identical paths.
//! - `delta` and `phi` are allocated per sequence and dropped after
//!   backtracking.
//! - A sequence with probability zero under the model has `logp = −∞`; its
//!   path is still well defined by the tie-break rule (all states tie).
//!
//! Conventions
//! -----------
//! - Output paths are `(K, T)` state indices; log-probabilities are length
//!   `K`.
use crate::{
    hmm::{
        core::{
            mixture::{ClusterLayout, MixtureCovariates, mixture_log_weights},
            observations::{ObservationLayout, Observations},
            options::{Execution, ViterbiOptions},
            params::HmmParams,
            validation::{validate_mixture, validate_observations},
        },
        errors::HMMResult,
    },
    numerical_stability::argmax_first,
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, ArrayView3};
use rayon::prelude::*;
use tracing::{debug, debug_span};

/// ViterbiOutcome — decoded paths and their log-probabilities.
///
/// Fields
/// ------
/// - `paths`: `Array2<usize>`, shape `(K, T)`; row `k` is the most probable
///   state path of sequence `k`.
/// - `logp`: `Array1<f64>`, length `K`; joint log-probability of each path
///   together with its observations.
#[derive(Debug, Clone, PartialEq)]
pub struct ViterbiOutcome {
    pub paths: Array2<usize>,
    pub logp: Array1<f64>,
}

/// Mixture Viterbi with default [`ViterbiOptions`].
///
/// Parameters
/// ----------
/// - `transition`: `(S, S)` log-transition matrix.
/// - `emission`: `(S, V, C)` log-emission array.
/// - `init`: length-`S` initial log-probabilities, the per-cluster initial
///   distributions concatenated in cluster order.
/// - `observations`: `(C, T, K)` symbol codes in `[0, V)`.
/// - `coef`: `(P, G)` coefficient matrix, one column per cluster.
/// - `design`: `(K, P)` covariate matrix, one row per sequence.
/// - `cluster_sizes`: `G` positive state counts summing to `S`.
///
/// Returns
/// -------
/// `HMMResult<ViterbiOutcome>`
///
/// Errors
/// ------
/// - Model, observation, or mixture violations reported by the `hmm::core`
///   constructors and validators.
pub fn viterbi_mixture(
    transition: ArrayView2<f64>, emission: ArrayView3<f64>, init: ArrayView1<f64>,
    observations: ArrayView3<usize>, coef: ArrayView2<f64>, design: ArrayView2<f64>,
    cluster_sizes: &[usize],
) -> HMMResult<ViterbiOutcome> {
    viterbi_mixture_with_options(
        transition,
        emission,
        init,
        observations,
        coef,
        design,
        cluster_sizes,
        &ViterbiOptions::default(),
    )
}

/// Mixture Viterbi with explicit [`ViterbiOptions`].
///
/// `options.weighting` selects how the mixture weights are normalized;
/// `options.execution` only affects scheduling.
#[allow(clippy::too_many_arguments)]
pub fn viterbi_mixture_with_options(
    transition: ArrayView2<f64>, emission: ArrayView3<f64>, init: ArrayView1<f64>,
    observations: ArrayView3<usize>, coef: ArrayView2<f64>, design: ArrayView2<f64>,
    cluster_sizes: &[usize], options: &ViterbiOptions,
) -> HMMResult<ViterbiOutcome> {
    let params = HmmParams::new(transition.view(), emission.view(), init.view())?;
    let observations = Observations::new(observations, ObservationLayout::ChannelTimeSequence)?;
    validate_observations(&observations, params.n_symbols(), params.n_channels())?;
    let layout = ClusterLayout::new(cluster_sizes)?;
    let covariates = MixtureCovariates::new(design.view(), coef.view())?;
    validate_mixture(
        layout.n_states(),
        layout.n_clusters(),
        &covariates,
        params.n_states(),
        observations.n_sequences(),
    )?;

    let log_weights = mixture_log_weights(&covariates, options.weighting)?;
    Ok(decode_batch(&params, &observations, &layout, log_weights.view(), options.execution))
}

/// Plain-HMM Viterbi: every state belongs to one cluster with log-weight 0.
///
/// Observations are `(C, T, K)`, as for [`viterbi_mixture`].
pub fn viterbi(
    transition: ArrayView2<f64>, emission: ArrayView3<f64>, init: ArrayView1<f64>,
    observations: ArrayView3<usize>,
) -> HMMResult<ViterbiOutcome> {
    viterbi_with_options(transition, emission, init, observations, Execution::default())
}

/// [`viterbi`] with an explicit execution strategy.
pub fn viterbi_with_options(
    transition: ArrayView2<f64>, emission: ArrayView3<f64>, init: ArrayView1<f64>,
    observations: ArrayView3<usize>, execution: Execution,
) -> HMMResult<ViterbiOutcome> {
    let params = HmmParams::new(transition.view(), emission.view(), init.view())?;
    let observations = Observations::new(observations, ObservationLayout::ChannelTimeSequence)?;
    validate_observations(&observations, params.n_symbols(), params.n_channels())?;
    let layout = ClusterLayout::single(params.n_states())?;

    let log_weights = Array2::<f64>::zeros((1, observations.n_sequences()));
    Ok(decode_batch(&params, &observations, &layout, log_weights.view(), execution))
}

/// Decode every sequence of a validated batch.
fn decode_batch(
    params: &HmmParams, observations: &Observations, layout: &ClusterLayout,
    log_weights: ArrayView2<f64>, execution: Execution,
) -> ViterbiOutcome {
    let n_states = params.n_states();
    let n_steps = observations.n_steps();
    let n_sequences = observations.n_sequences();
    let n_clusters = layout.n_clusters();
    let span = debug_span!("viterbi", n_states, n_steps, n_sequences, n_clusters);
    let _guard = span.enter();

    let decode = |k: usize| decode_sequence(params, observations, layout, log_weights.column(k), k);
    let decoded: Vec<(Vec<usize>, f64)> = match execution {
        Execution::Sequential => (0..n_sequences).map(decode).collect(),
        Execution::Parallel => (0..n_sequences).into_par_iter().map(decode).collect(),
    };

    let mut paths = Array2::<usize>::zeros((n_sequences, n_steps));
    let mut logp = Array1::<f64>::zeros(n_sequences);
    for (k, (path, value)) in decoded.into_iter().enumerate() {
        if value == f64::NEG_INFINITY {
            debug!(sequence = k, "sequence has zero probability under the model");
        }
        paths.row_mut(k).assign(&ArrayView1::from(path.as_slice()));
        logp[k] = value;
    }
    ViterbiOutcome { paths, logp }
}

/// Max-product recursion and backtracking for sequence `k`.
fn decode_sequence(
    params: &HmmParams, observations: &Observations, layout: &ClusterLayout,
    log_weights: ArrayView1<f64>, k: usize,
) -> (Vec<usize>, f64) {
    let n_states = params.n_states();
    let n_steps = observations.n_steps();
    let mut delta = Array2::<f64>::zeros((n_states, n_steps));
    // Column 0 stays zero; it is never read.
    let mut phi = Array2::<usize>::zeros((n_states, n_steps));

    let symbols = observations.symbols(k, 0);
    for j in 0..n_states {
        let base = params.init[j] + log_weights[layout.cluster_of(j)];
        delta[[j, 0]] = params.accumulate_emission(base, j, symbols);
    }

    for t in 1..n_steps {
        let symbols = observations.symbols(k, t);
        for j in 0..n_states {
            let (best, _) =
                argmax_first((0..n_states).map(|i| delta[[i, t - 1]] + params.transition[[i, j]]));
            phi[[j, t]] = best;
            let base = delta[[best, t - 1]] + params.transition[[best, j]];
            delta[[j, t]] = params.accumulate_emission(base, j, symbols);
        }
    }

    let (last, logp) = argmax_first(delta.column(n_steps - 1).iter().copied());
    let mut path = vec![0; n_steps];
    path[n_steps - 1] = last;
    for t in (0..n_steps - 1).rev() {
        path[t] = phi[[path[t + 1], t + 1]];
    }
    (path, logp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hmm::{core::options::MixtureWeighting, errors::HMMError};
    use approx::assert_relative_eq;
    use ndarray::{Array3, array, s};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Hand-computed decoding of a 2-state, 1-channel model.
    // - Lowest-index tie breaking in both the recursion and the termination.
    // - Cluster re-weighting of the initial step.
    // - Zero-probability sequences (`logp = −∞`) without NaN.
    // - Mixture validation failures.
    //
    // They intentionally DO NOT cover:
    // - Global optimality against brute force; see the integration tests.
    // -------------------------------------------------------------------------

    const TOL: f64 = 1e-12;

    fn two_state_model() -> (Array2<f64>, Array3<f64>, Array1<f64>) {
        let transition = array![[0.9, 0.1], [0.2, 0.8]].mapv(f64::ln);
        let mut emission = Array3::<f64>::zeros((2, 2, 1));
        emission.slice_mut(s![.., .., 0]).assign(&array![[0.7, 0.3], [0.4, 0.6]].mapv(f64::ln));
        let init = array![0.6, 0.4].mapv(f64::ln);
        (transition, emission, init)
    }

    #[test]
    // Purpose
    // -------
    // Single-cluster mixture decoding matches hand computation.
    //
    // Given
    // -----
    // - The two-state model with observations [0, 1], one cluster of size 2,
    //   an intercept-only design, and a zero coefficient.
    //
    // Expect
    // ------
    // - delta(:, 1) = [.1134, .0768] → path [0, 0], logp = ln .1134.
    fn viterbi_mixture_matches_hand_computation() {
        // Arrange
        let (transition, emission, init) = two_state_model();
        let obs = Array3::from_shape_vec((1, 2, 1), vec![0_usize, 1]).expect("shape");
        let coef = array![[0.0]];
        let design = array![[1.0]];

        // Act
        let out = viterbi_mixture(
            transition.view(),
            emission.view(),
            init.view(),
            obs.view(),
            coef.view(),
            design.view(),
            &[2],
        )
        .expect("valid inputs");

        // Assert
        assert_eq!(out.paths, array![[0_usize, 0]]);
        assert_relative_eq!(out.logp[0], 0.1134_f64.ln(), epsilon = TOL);
    }

    #[test]
    // Purpose
    // -------
    // `viterbi` agrees with a one-cluster `viterbi_mixture`.
    //
    // Given
    // -----
    // - Three sequences under the two-state model.
    //
    // Expect
    // ------
    // - Identical outcomes.
    fn plain_viterbi_equals_single_cluster_mixture() {
        let (transition, emission, init) = two_state_model();
        let obs = Array3::from_shape_fn((1, 4, 3), |(_, t, k)| (t * (k + 1)) % 2);
        let coef = array![[1.7]];
        let design = array![[1.0], [-2.0], [0.3]];

        let plain = viterbi(transition.view(), emission.view(), init.view(), obs.view())
            .expect("valid inputs");
        let mixed = viterbi_mixture(
            transition.view(),
            emission.view(),
            init.view(),
            obs.view(),
            coef.view(),
            design.view(),
            &[2],
        )
        .expect("valid inputs");

        assert_eq!(plain, mixed);
    }

    #[test]
    // Purpose
    // -------
    // Ties in the recursion and in the termination resolve to the lowest
    // state index, reproducibly.
    //
    // Given
    // -----
    // - Three states with uniform transitions, uniform emissions, and a
    //   uniform initial distribution, so every candidate ties.
    //
    // Expect
    // ------
    // - The all-zero path, on every repetition and for both execution modes.
    fn viterbi_breaks_ties_toward_lowest_index() {
        let third = (1.0_f64 / 3.0).ln();
        let transition = Array2::from_elem((3, 3), third);
        let emission = Array3::from_elem((3, 2, 1), 0.5_f64.ln());
        let init = Array1::from_elem(3, third);
        let obs = Array3::from_shape_vec((1, 3, 1), vec![0_usize, 1, 1]).expect("shape");

        for execution in [Execution::Sequential, Execution::Parallel, Execution::Sequential] {
            let out = viterbi_with_options(
                transition.view(),
                emission.view(),
                init.view(),
                obs.view(),
                execution,
            )
            .expect("valid inputs");
            assert_eq!(out.paths, array![[0_usize, 0, 0]]);
        }
    }

    #[test]
    // Purpose
    // -------
    // Cluster log-weights shift the initial step toward the favored cluster.
    //
    // Given
    // -----
    // - Two clusters of one state each with identity transitions and
    //   uninformative emissions; init = [0, 0] (each cluster's own initial
    //   distribution is degenerate).
    // - Sequence 0 has covariate −3 (favoring cluster 0), sequence 1 has +3.
    //
    // Expect
    // ------
    // - Paths [0, 0] and [1, 1].
    // - logp(k) equals the log-weight of the chosen cluster plus emissions.
    fn viterbi_mixture_uses_cluster_weights_at_initial_step() {
        let transition = array![[0.0, f64::NEG_INFINITY], [f64::NEG_INFINITY, 0.0]];
        let emission = Array3::from_elem((2, 2, 1), 0.5_f64.ln());
        let init = array![0.0, 0.0];
        let obs = Array3::<usize>::zeros((1, 2, 2));
        let coef = array![[0.0, 1.0]];
        let design = array![[-3.0], [3.0]];

        let out = viterbi_mixture(
            transition.view(),
            emission.view(),
            init.view(),
            obs.view(),
            coef.view(),
            design.view(),
            &[1, 1],
        )
        .expect("valid inputs");

        assert_eq!(out.paths, array![[0_usize, 0], [1, 1]]);
        let favored = (1.0 / (1.0 + (-3.0_f64).exp())).ln();
        let emissions = 2.0 * 0.5_f64.ln();
        assert_relative_eq!(out.logp[0], favored + emissions, epsilon = TOL);
        assert_relative_eq!(out.logp[1], favored + emissions, epsilon = TOL);
    }

    #[test]
    // Purpose
    // -------
    // An impossible sequence yields `logp = −∞` and no NaN.
    //
    // Given
    // -----
    // - Both states emit only symbol 0; the sequence contains symbol 1.
    //
    // Expect
    // ------
    // - `logp = −∞`, path resolved by tie-break to the lowest indices.
    fn viterbi_reports_impossible_sequence_as_negative_infinity() {
        let (transition, _, init) = two_state_model();
        let mut emission = Array3::<f64>::zeros((2, 2, 1));
        emission[[0, 1, 0]] = f64::NEG_INFINITY;
        emission[[1, 1, 0]] = f64::NEG_INFINITY;
        let obs = Array3::from_shape_vec((1, 3, 1), vec![0_usize, 1, 0]).expect("shape");

        let out = viterbi(transition.view(), emission.view(), init.view(), obs.view())
            .expect("valid inputs");

        assert_eq!(out.logp[0], f64::NEG_INFINITY);
        assert!(!out.logp[0].is_nan());
        assert_eq!(out.paths.dim(), (1, 3));
    }

    #[test]
    // Purpose
    // -------
    // Stabilized and reference weighting decode identically on moderate
    // covariates.
    //
    // Given
    // -----
    // - Two clusters of two states each and three sequences.
    //
    // Expect
    // ------
    // - Same paths; log-probabilities equal to rounding.
    fn weighting_modes_agree_on_moderate_covariates() {
        let transition = array![
            [0.8, 0.2, 0.0, 0.0],
            [0.3, 0.7, 0.0, 0.0],
            [0.0, 0.0, 0.6, 0.4],
            [0.0, 0.0, 0.1, 0.9]
        ]
        .mapv(f64::ln);
        let mut emission = Array3::<f64>::zeros((4, 2, 1));
        emission
            .slice_mut(s![.., .., 0])
            .assign(&array![[0.9, 0.1], [0.2, 0.8], [0.5, 0.5], [0.3, 0.7]].mapv(f64::ln));
        let init = array![0.5, 0.5, 0.7, 0.3].mapv(f64::ln);
        let obs = Array3::from_shape_fn((1, 5, 3), |(_, t, k)| (t + k) % 2);
        let coef = array![[0.0, 0.2], [0.0, -1.1]];
        let design = array![[1.0, 0.0], [1.0, 1.5], [1.0, -0.7]];

        let run = |weighting| {
            viterbi_mixture_with_options(
                transition.view(),
                emission.view(),
                init.view(),
                obs.view(),
                coef.view(),
                design.view(),
                &[2, 2],
                &ViterbiOptions::new(Execution::Sequential, weighting),
            )
            .expect("valid inputs")
        };
        let stable = run(MixtureWeighting::Stabilized);
        let reference = run(MixtureWeighting::Reference);

        assert_eq!(stable.paths, reference.paths);
        for (a, b) in stable.logp.iter().zip(reference.logp.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-10);
        }
    }

    #[test]
    // Purpose
    // -------
    // Mixture specifications inconsistent with the model are rejected.
    //
    // Given
    // -----
    // - Cluster sizes summing to 3 for a 2-state model.
    // - A design matrix with two rows for a batch of one sequence.
    //
    // Expect
    // ------
    // - `ClusterSizeSumMismatch` and `DesignRowMismatch`.
    fn viterbi_mixture_rejects_inconsistent_mixture() {
        let (transition, emission, init) = two_state_model();
        let obs = Array3::<usize>::zeros((1, 2, 1));
        let coef = array![[0.0, 0.0]];
        let design = array![[1.0]];

        assert!(matches!(
            viterbi_mixture(
                transition.view(),
                emission.view(),
                init.view(),
                obs.view(),
                coef.view(),
                design.view(),
                &[1, 2],
            ),
            Err(HMMError::ClusterSizeSumMismatch { expected: 2, actual: 3 })
        ));

        let tall_design = array![[1.0], [1.0]];
        assert!(matches!(
            viterbi_mixture(
                transition.view(),
                emission.view(),
                init.view(),
                obs.view(),
                coef.view(),
                tall_design.view(),
                &[1, 1],
            ),
            Err(HMMError::DesignRowMismatch { expected: 1, actual: 2 })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Degenerate mixture inputs fail fast instead of decoding garbage.
    //
    // Given
    // -----
    // - Cluster sizes `[usize::MAX, 2]`, whose total overflows.
    // - Finite covariates whose product `1e200 · 1e200` overflows to `+∞`.
    //
    // Expect
    // ------
    // - `ClusterSizeOverflow` and `NonFiniteLinearPredictor`, no panic and no
    //   `−∞` outcome.
    fn viterbi_mixture_rejects_overflowing_mixture_inputs() {
        let (transition, emission, init) = two_state_model();
        let obs = Array3::<usize>::zeros((1, 2, 1));
        let coef = array![[0.0, 0.0]];
        let design = array![[1.0]];

        assert!(matches!(
            viterbi_mixture(
                transition.view(),
                emission.view(),
                init.view(),
                obs.view(),
                coef.view(),
                design.view(),
                &[usize::MAX, 2],
            ),
            Err(HMMError::ClusterSizeOverflow { cluster: 1 })
        ));

        let huge_coef = array![[0.0, 1e200]];
        let huge_design = array![[1e200]];
        assert!(matches!(
            viterbi_mixture(
                transition.view(),
                emission.view(),
                init.view(),
                obs.view(),
                huge_coef.view(),
                huge_design.view(),
                &[1, 1],
            ),
            Err(HMMError::NonFiniteLinearPredictor { cluster: 1, sequence: 0, .. })
        ));
    }
}
