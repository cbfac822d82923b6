//! Engine configuration — execution strategy and mixture-weight arithmetic.
//!
//! Purpose
//! -------
//! Hold the small set of knobs that change *how* the Forward and Viterbi
//! engines run without changing what they compute (execution strategy), plus
//! the one knob that does change numerics at the margin (how mixture weights
//! are normalized).
//!
//! Conventions
//! -----------
//! - Every options type implements `Default`; callers that do not care use
//!   `ForwardOptions::default()` / `ViterbiOptions::default()`.
//! - Options are plain `Copy` values; they are never mutated by the engines.

/// Execution — how per-sequence work is scheduled.
///
/// Sequences in a batch are independent, so both strategies produce
/// identical output; `Parallel` fans sequences out over the global rayon
/// pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Execution {
    /// Process sequences one after another on the calling thread.
    Sequential,
    /// Process sequences concurrently on the rayon thread pool.
    #[default]
    Parallel,
}

/// MixtureWeighting — normalization of covariate-driven mixture weights.
///
/// Variants
/// --------
/// - `Stabilized`
///   Log-softmax with a per-sequence max shift. Never overflows once the
///   linear predictor is finite; an overflowing `X · coef` is rejected
///   upstream with `HMMError::NonFiniteLinearPredictor`.
/// - `Reference`
///   `ln(exp(η) / Σ exp(η))` evaluated literally. Matches the unshifted
///   computation bit-for-bit, including NaN weights once any predictor
///   exceeds the `exp` overflow threshold (≈ 709).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MixtureWeighting {
    #[default]
    Stabilized,
    Reference,
}

/// ForwardOptions — configuration for the Forward engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ForwardOptions {
    pub execution: Execution,
}

impl ForwardOptions {
    /// Construct Forward options with an explicit execution strategy.
    pub fn new(execution: Execution) -> ForwardOptions {
        ForwardOptions { execution }
    }
}

/// ViterbiOptions — configuration for the mixture Viterbi engine.
///
/// Fields
/// ------
/// - `execution`: [`Execution`]
///   Scheduling of the per-sequence dynamic programs. The mixture-weight
///   matrix is always computed once, before any sequence is decoded.
/// - `weighting`: [`MixtureWeighting`]
///   Arithmetic used to normalize the covariate linear predictor.
///
/// Notes
/// -----
/// - `ViterbiOptions::default()` is `{ Parallel, Stabilized }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViterbiOptions {
    pub execution: Execution,
    pub weighting: MixtureWeighting,
}

impl ViterbiOptions {
    /// Construct Viterbi options from an execution strategy and a weighting
    /// mode.
    pub fn new(execution: Execution, weighting: MixtureWeighting) -> ViterbiOptions {
        ViterbiOptions { execution, weighting }
    }
}
