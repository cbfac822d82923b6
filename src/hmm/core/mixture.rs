//! Mixture structure — cluster-to-state grouping and covariate log-weights.
//!
//! Purpose
//! -------
//! Describe how a mixture HMM partitions its combined state space into
//! clusters, and turn per-sequence covariates into per-cluster log-weights
//! that re-weight the initial distribution.
//!
//! Key behaviors
//! -------------
//! - [`ClusterLayout`] validates the ordered cluster sizes once and derives a
//!   state → cluster lookup, so the recursions never recompute prefix sums.
//! - [`MixtureCovariates`] holds the design matrix `X` (K×P, one row per
//!   sequence) and the coefficient matrix `coef` (P×G, one column per
//!   cluster).
//! - [`mixture_log_weights`] computes the G×K matrix
//!   `log_softmax((X · coef)ᵀ)` column by column.
//!
//! Invariants & assumptions
//! ------------------------
//! - Clusters own contiguous, non-empty state ranges in cluster order; the
//!   sizes sum to `S`.
//! - Every column of `exp(mixture_log_weights(..))` sums to one (up to
//!   rounding) whenever the result is finite.
use crate::{
    hmm::{
        core::{
            options::MixtureWeighting,
            validation::{validate_cluster_sizes, validate_finite_matrix},
        },
        errors::{HMMError, HMMResult},
    },
    numerical_stability::{log_softmax_columns, log_softmax_columns_reference},
};
use ndarray::{Array2, ArrayView2};

/// ClusterLayout — contiguous partition of the state space into clusters.
///
/// Fields
/// ------
/// - `sizes`: number of states owned by each cluster, in cluster order.
/// - `state_cluster`: cluster index for every state, derived from `sizes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterLayout {
    sizes: Vec<usize>,
    state_cluster: Vec<usize>,
}

impl ClusterLayout {
    /// Build a layout from ordered cluster sizes.
    ///
    /// Errors
    /// ------
    /// - `HMMError::NoClusters` if `sizes` is empty.
    /// - `HMMError::EmptyCluster` if any size is zero.
    pub fn new(sizes: &[usize]) -> HMMResult<Self> {
        let n_states = validate_cluster_sizes(sizes)?;
        let mut state_cluster = Vec::with_capacity(n_states);
        for (cluster, &size) in sizes.iter().enumerate() {
            state_cluster.extend(std::iter::repeat_n(cluster, size));
        }
        Ok(ClusterLayout { sizes: sizes.to_vec(), state_cluster })
    }

    /// A single cluster owning all `n_states` states (a plain HMM).
    pub fn single(n_states: usize) -> HMMResult<Self> {
        if n_states == 0 {
            return Err(HMMError::EmptyStateSpace);
        }
        ClusterLayout::new(&[n_states])
    }

    pub fn n_clusters(&self) -> usize {
        self.sizes.len()
    }

    pub fn n_states(&self) -> usize {
        self.state_cluster.len()
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Cluster owning `state`.
    #[inline]
    pub fn cluster_of(&self, state: usize) -> usize {
        self.state_cluster[state]
    }
}

/// MixtureCovariates — design and coefficient matrices for mixture weights.
///
/// Invariants
/// ----------
/// - `design.ncols() == coef.nrows()`.
/// - All entries are finite.
#[derive(Debug, Clone, Copy)]
pub struct MixtureCovariates<'a> {
    design: ArrayView2<'a, f64>,
    coef: ArrayView2<'a, f64>,
}

impl<'a> MixtureCovariates<'a> {
    /// Validate and bundle covariates.
    ///
    /// Errors
    /// ------
    /// - `HMMError::CovariateCountMismatch` if `design.ncols() != coef.nrows()`.
    /// - `HMMError::NonFiniteCovariate` for NaN or `±∞` entries.
    pub fn new(design: ArrayView2<'a, f64>, coef: ArrayView2<'a, f64>) -> HMMResult<Self> {
        if design.ncols() != coef.nrows() {
            return Err(HMMError::CovariateCountMismatch {
                expected: coef.nrows(),
                actual: design.ncols(),
            });
        }
        validate_finite_matrix(design, "design")?;
        validate_finite_matrix(coef, "coef")?;
        Ok(MixtureCovariates { design, coef })
    }

    pub fn n_sequences(&self) -> usize {
        self.design.nrows()
    }

    pub fn n_clusters(&self) -> usize {
        self.coef.ncols()
    }

    /// Linear predictor `(X · coef)ᵀ`, shape `(G, K)`.
    ///
    /// Errors
    /// ------
    /// - `HMMError::NonFiniteLinearPredictor` if a finite design row and
    ///   coefficient column overflow to `±∞` (or NaN) in the product.
    pub fn linear_predictor(&self) -> HMMResult<Array2<f64>> {
        let eta = self.design.dot(&self.coef).reversed_axes();
        if let Some(((cluster, sequence), &value)) =
            eta.indexed_iter().find(|(_, v)| !v.is_finite())
        {
            return Err(HMMError::NonFiniteLinearPredictor { cluster, sequence, value });
        }
        Ok(eta)
    }
}

/// Per-sequence mixture log-weights, shape `(G, K)`.
///
/// Each column `k` is the log-softmax over clusters of the linear predictor
/// for sequence `k`. `weighting` selects the max-shifted or the literal
/// `ln(exp(η) / Σ exp(η))` evaluation.
///
/// Errors
/// ------
/// - `HMMError::NonFiniteLinearPredictor` from
///   [`MixtureCovariates::linear_predictor`].
pub fn mixture_log_weights(
    covariates: &MixtureCovariates, weighting: MixtureWeighting,
) -> HMMResult<Array2<f64>> {
    let eta = covariates.linear_predictor()?;
    Ok(match weighting {
        MixtureWeighting::Stabilized => log_softmax_columns(eta.view()),
        MixtureWeighting::Reference => log_softmax_columns_reference(eta.view()),
    })
}
