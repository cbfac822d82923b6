//! rust_hmm — exact log-space inference for multichannel mixture HMMs.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and, behind the
//! `python-bindings` feature, as the PyO3 bridge exposing the inference
//! engines to Python via the `_rust_hmm` extension module.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`hmm` and `numerical_stability`) as
//!   the public crate surface.
//! - Define `#[pyfunction]` wrappers and the `#[pymodule]` initializer for
//!   the `_rust_hmm` Python extension when `python-bindings` is enabled.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner Rust modules; this file performs
//!   only FFI glue and error mapping.
//! - Inputs are natural-log probabilities and non-negative integer symbol
//!   codes; validation happens in `hmm::core` and surfaces as `HMMError`
//!   (a Python `ValueError` at the boundary).
//!
//! Conventions
//! -----------
//! - Array layouts match the Rust API: transition `(S, S)`, emission
//!   `(S, V, C)`, init `(S,)`; Forward observations `(K, T, C)` and output
//!   `(S, T, K)`; Viterbi observations `(C, T, K)` and paths `(K, T)`.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend on [`hmm`] directly and can ignore the
//!   PyO3 items guarded by the `python-bindings` feature.
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in the inner modules
//!   and by the integration tests under `tests/`.

pub mod hmm;
pub mod numerical_stability;

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray, PyArray1, PyArray2, PyArray3, PyReadonlyArray1, PyReadonlyArray2,
    PyReadonlyArray3,
};

#[cfg(feature = "python-bindings")]
use pyo3::prelude::*;

#[cfg(feature = "python-bindings")]
use crate::hmm::{
    algorithms::{forward_with_options, log_likelihood, viterbi_mixture_with_options},
    core::options::{Execution, ForwardOptions, MixtureWeighting, ViterbiOptions},
};

#[cfg(feature = "python-bindings")]
fn execution_from_flag(parallel: bool) -> Execution {
    if parallel { Execution::Parallel } else { Execution::Sequential }
}

/// forward — Python-facing Forward algorithm.
///
/// Returns the `(S, T, K)` table of forward log-probabilities as a NumPy
/// array. Raises `ValueError` on malformed inputs.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    name = "forward",
    signature = (transition, emission, init, observations, parallel = true),
    text_signature = "(transition, emission, init, observations, /, parallel=True)"
)]
pub fn py_forward<'py>(
    py: Python<'py>, transition: PyReadonlyArray2<'py, f64>, emission: PyReadonlyArray3<'py, f64>,
    init: PyReadonlyArray1<'py, f64>, observations: PyReadonlyArray3<'py, usize>, parallel: bool,
) -> PyResult<Bound<'py, PyArray3<f64>>> {
    let options = ForwardOptions::new(execution_from_flag(parallel));
    let alpha = forward_with_options(
        transition.as_array(),
        emission.as_array(),
        init.as_array(),
        observations.as_array(),
        &options,
    )?;
    Ok(alpha.into_pyarray(py))
}

/// log_likelihood — per-sequence totals from a forward table.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "log_likelihood", text_signature = "(alpha, /)")]
pub fn py_log_likelihood<'py>(
    py: Python<'py>, alpha: PyReadonlyArray3<'py, f64>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let ll = log_likelihood(alpha.as_array())?;
    Ok(ll.into_pyarray(py))
}

/// viterbi_mixture — Python-facing mixture Viterbi.
///
/// Returns `(paths, logp)` with `paths` of shape `(K, T)` and `logp` of
/// length `K`. `stabilized=False` selects the unshifted softmax for the
/// mixture weights.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    name = "viterbi_mixture",
    signature = (
        transition,
        emission,
        init,
        observations,
        coef,
        design,
        cluster_sizes,
        parallel = true,
        stabilized = true,
    ),
    text_signature = "(transition, emission, init, observations, coef, design, cluster_sizes, /, \
                      parallel=True, stabilized=True)"
)]
#[allow(clippy::too_many_arguments)]
pub fn py_viterbi_mixture<'py>(
    py: Python<'py>, transition: PyReadonlyArray2<'py, f64>, emission: PyReadonlyArray3<'py, f64>,
    init: PyReadonlyArray1<'py, f64>, observations: PyReadonlyArray3<'py, usize>,
    coef: PyReadonlyArray2<'py, f64>, design: PyReadonlyArray2<'py, f64>,
    cluster_sizes: Vec<usize>, parallel: bool, stabilized: bool,
) -> PyResult<(Bound<'py, PyArray2<usize>>, Bound<'py, PyArray1<f64>>)> {
    let weighting =
        if stabilized { MixtureWeighting::Stabilized } else { MixtureWeighting::Reference };
    let options = ViterbiOptions::new(execution_from_flag(parallel), weighting);
    let outcome = viterbi_mixture_with_options(
        transition.as_array(),
        emission.as_array(),
        init.as_array(),
        observations.as_array(),
        coef.as_array(),
        design.as_array(),
        &cluster_sizes,
        &options,
    )?;
    Ok((outcome.paths.into_pyarray(py), outcome.logp.into_pyarray(py)))
}

/// _rust_hmm — PyO3 module initializer for the Python extension.
///
/// Creates the `inference` submodule, attaches it to `_rust_hmm`, and
/// registers it in `sys.modules` so dotted imports work.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_hmm<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let inference_mod = PyModule::new(_py, "inference")?;
    inference_mod.add_function(wrap_pyfunction!(py_forward, &inference_mod)?)?;
    inference_mod.add_function(wrap_pyfunction!(py_log_likelihood, &inference_mod)?)?;
    inference_mod.add_function(wrap_pyfunction!(py_viterbi_mixture, &inference_mod)?)?;
    m.add_submodule(&inference_mod)?;

    // Manually add the submodule into sys.modules to allow for dot notation.
    _py.import("sys")?.getattr("modules")?.set_item("rust_hmm.inference", inference_mod)?;
    Ok(())
}
