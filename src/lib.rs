// Suppress warning from PyO3 macro expansion (fixed in newer PyO3 versions)
#![cfg_attr(feature = "python", allow(non_local_definitions))]

//! foliocore - portfolio analytics engines.
//!
//! This crate provides:
//! - Fund category and ticker classification
//! - Multi-factor fund scoring and selection
//! - Portfolio return, volatility and Sharpe metrics from capital market assumptions
//! - Monte Carlo projection and historical bootstrap with withdrawal policies
//! - Scenario stress testing
//! - A market fragility index over macro and market indicators
//!
//! Python bindings are available behind the `python` feature.

#[cfg(feature = "python")]
use pyo3::prelude::*;

pub mod classification;
pub mod core;
pub mod fragility;
pub mod metrics;
pub mod portfolio;
#[cfg(feature = "python")]
pub mod python;
pub mod scoring;
pub mod stress;

pub use crate::core::{AnalyticsConfig, FolioError, Result};

/// Python module entry point
#[cfg(feature = "python")]
#[pymodule]
fn _foliocore(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    // Register result classes
    m.add_class::<python::bindings::PyClassification>()?;
    m.add_class::<python::bindings::PyPortfolioMetrics>()?;
    m.add_class::<python::bindings::PyProjectionResult>()?;
    m.add_class::<python::bindings::PyBootstrapResult>()?;
    m.add_class::<python::bindings::PyFragilityResult>()?;

    // Classification and scoring
    m.add_function(wrap_pyfunction!(python::bindings::classify, m)?)?;
    m.add_function(wrap_pyfunction!(python::bindings::score_candidates, m)?)?;

    // Metrics
    m.add_function(wrap_pyfunction!(python::bindings::portfolio_metrics, m)?)?;
    m.add_function(wrap_pyfunction!(python::bindings::max_drawdown, m)?)?;

    // Simulation
    m.add_function(wrap_pyfunction!(python::bindings::simulate_projection, m)?)?;
    m.add_function(wrap_pyfunction!(python::bindings::run_bootstrap, m)?)?;

    // Stress and fragility
    m.add_function(wrap_pyfunction!(python::bindings::stress_impact, m)?)?;
    m.add_function(wrap_pyfunction!(python::bindings::run_stress_catalog, m)?)?;
    m.add_function(wrap_pyfunction!(python::bindings::fragility_index, m)?)?;

    Ok(())
}
