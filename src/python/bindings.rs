//! PyO3 function bindings for foliocore.
//!
//! Weight vectors cross the boundary as `{asset class label: weight}` dicts.
//! Nested inputs (candidate instruments, withdrawal policies, the bundled
//! configuration) travel as JSON strings in their serde form.

use std::collections::HashMap;
use std::str::FromStr;

use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use serde::Serialize;

use crate::classification::ClassificationInput;
use crate::core::config::AnalyticsConfig;
use crate::core::types::{AssetClass, Instrument, WeightVector};
use crate::fragility::{FragilityResult, IndicatorReadings};
use crate::metrics::{drawdown, PortfolioMetrics};
use crate::portfolio::{
    run_bootstrap as run_bootstrap_engine, project, BootstrapResult, SimulationResult,
    WithdrawalPolicy, YearBand,
};

use super::numpy_bridge::*;

// ============================================================================
// Helpers
// ============================================================================

fn load_config(config_json: Option<&str>) -> PyResult<AnalyticsConfig> {
    match config_json {
        Some(json) => Ok(AnalyticsConfig::from_json_str(json)?),
        None => Ok(AnalyticsConfig::default()),
    }
}

fn weights_from_map(weights: HashMap<String, f64>) -> PyResult<WeightVector> {
    let pairs = weights
        .into_iter()
        .map(|(label, w)| AssetClass::from_str(&label).map(|ac| (ac, w)))
        .collect::<crate::core::error::Result<Vec<_>>>()?;
    Ok(WeightVector::from_pairs(pairs)?)
}

/// Serialized tag of a unit enum variant, e.g. `"exact_category"`.
fn tag<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        Ok(other) => other.to_string(),
        Err(_) => String::new(),
    }
}

fn to_json<T: Serialize>(value: &T) -> PyResult<String> {
    serde_json::to_string(value).map_err(|e| PyValueError::new_err(e.to_string()))
}

fn band_column(bands: &[YearBand], f: impl Fn(&YearBand) -> f64) -> Vec<f64> {
    bands.iter().map(f).collect()
}

// ============================================================================
// Result Classes
// ============================================================================

/// Python-exposed classification.
#[pyclass]
#[derive(Debug, Clone)]
pub struct PyClassification {
    #[pyo3(get)]
    pub primary: String,
    #[pyo3(get)]
    pub secondary: Option<String>,
    #[pyo3(get)]
    pub description: String,
    #[pyo3(get)]
    pub asset_class: Option<String>,
    #[pyo3(get)]
    pub matched_by: String,
}

#[pymethods]
impl PyClassification {
    fn __repr__(&self) -> String {
        format!(
            "Classification(primary={:?}, description={:?}, matched_by={:?})",
            self.primary, self.description, self.matched_by
        )
    }
}

/// Python-exposed portfolio metrics.
#[pyclass]
#[derive(Debug, Clone)]
pub struct PyPortfolioMetrics {
    #[pyo3(get)]
    pub expected_return: f64,
    #[pyo3(get)]
    pub volatility: f64,
    #[pyo3(get)]
    pub sharpe: f64,
    #[pyo3(get)]
    pub diversification: f64,
    #[pyo3(get)]
    pub weighted_expense: f64,
    #[pyo3(get)]
    pub years_to_double: Option<f64>,
    #[pyo3(get)]
    pub estimated_max_drawdown: f64,
}

impl From<PortfolioMetrics> for PyPortfolioMetrics {
    fn from(m: PortfolioMetrics) -> Self {
        Self {
            expected_return: m.expected_return,
            volatility: m.volatility,
            sharpe: m.sharpe,
            diversification: m.diversification,
            weighted_expense: m.weighted_expense,
            years_to_double: m.years_to_double(),
            estimated_max_drawdown: m.estimated_max_drawdown(),
        }
    }
}

/// Python-exposed projection result. Band columns are numpy arrays indexed
/// by year − 1.
#[pyclass]
pub struct PyProjectionResult {
    inner: SimulationResult,
    #[pyo3(get)]
    pub mean_final: f64,
    #[pyo3(get)]
    pub probability_of_loss: f64,
    #[pyo3(get)]
    pub var_95: f64,
    #[pyo3(get)]
    pub cvar_95: f64,
    #[pyo3(get)]
    pub median_path_max_drawdown: f64,
}

#[pymethods]
impl PyProjectionResult {
    #[getter]
    fn years<'py>(&self, py: Python<'py>) -> &'py PyArray1<u32> {
        vec_to_numpy_u32(py, self.inner.bands.iter().map(|b| b.year as u32).collect())
    }

    #[getter]
    fn p5<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        vec_to_numpy_f64(py, band_column(&self.inner.bands, |b| b.p5))
    }

    #[getter]
    fn p25<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        vec_to_numpy_f64(py, band_column(&self.inner.bands, |b| b.p25))
    }

    #[getter]
    fn p50<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        vec_to_numpy_f64(py, band_column(&self.inner.bands, |b| b.p50))
    }

    #[getter]
    fn p75<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        vec_to_numpy_f64(py, band_column(&self.inner.bands, |b| b.p75))
    }

    #[getter]
    fn p95<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        vec_to_numpy_f64(py, band_column(&self.inner.bands, |b| b.p95))
    }

    /// Sorted final values, one per path.
    #[getter]
    fn final_values<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        vec_to_numpy_f64(py, self.inner.final_values.clone())
    }

    #[getter]
    fn median_final(&self) -> f64 {
        self.inner.median_final()
    }
}

impl From<SimulationResult> for PyProjectionResult {
    fn from(result: SimulationResult) -> Self {
        Self {
            mean_final: result.mean_final,
            probability_of_loss: result.probability_of_loss,
            var_95: result.var_95,
            cvar_95: result.cvar_95,
            median_path_max_drawdown: result.median_path_max_drawdown,
            inner: result,
        }
    }
}

/// Python-exposed historical bootstrap result.
#[pyclass]
pub struct PyBootstrapResult {
    inner: BootstrapResult,
    #[pyo3(get)]
    pub success_rate: f64,
    #[pyo3(get)]
    pub probability_of_ruin: f64,
    #[pyo3(get)]
    pub median_ruin_year: Option<usize>,
    #[pyo3(get)]
    pub median_final: f64,
    #[pyo3(get)]
    pub mean_final: f64,
}

#[pymethods]
impl PyBootstrapResult {
    #[getter]
    fn p5<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        vec_to_numpy_f64(py, band_column(&self.inner.bands, |b| b.p5))
    }

    #[getter]
    fn p50<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        vec_to_numpy_f64(py, band_column(&self.inner.bands, |b| b.p50))
    }

    #[getter]
    fn p95<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        vec_to_numpy_f64(py, band_column(&self.inner.bands, |b| b.p95))
    }

    #[getter]
    fn final_values<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        vec_to_numpy_f64(py, self.inner.final_values.clone())
    }
}

impl From<BootstrapResult> for PyBootstrapResult {
    fn from(result: BootstrapResult) -> Self {
        Self {
            success_rate: result.success_rate,
            probability_of_ruin: result.probability_of_ruin,
            median_ruin_year: result.median_ruin_year,
            median_final: result.median_final,
            mean_final: result.mean_final,
            inner: result,
        }
    }
}

/// Python-exposed fragility index.
#[pyclass]
#[derive(Debug, Clone)]
pub struct PyFragilityResult {
    #[pyo3(get)]
    pub composite: f64,
    #[pyo3(get)]
    pub zone: String,
    #[pyo3(get)]
    pub interpretation: String,
    /// Pillar name to score; `None` for pillars with no readings.
    #[pyo3(get)]
    pub pillars: HashMap<String, Option<f64>>,
    /// Indicator key to 0-100 score.
    #[pyo3(get)]
    pub indicators: HashMap<String, f64>,
    #[pyo3(get)]
    pub key_risks: Vec<String>,
    #[pyo3(get)]
    pub key_strengths: Vec<String>,
    #[pyo3(get)]
    pub action_items: Vec<String>,
}

impl From<FragilityResult> for PyFragilityResult {
    fn from(result: FragilityResult) -> Self {
        Self {
            composite: result.composite,
            zone: tag(&result.zone),
            interpretation: result.interpretation.clone(),
            pillars: result
                .pillars
                .iter()
                .map(|p| (p.name.clone(), p.score))
                .collect(),
            indicators: result
                .indicators()
                .map(|i| (i.key.clone(), i.score))
                .collect(),
            key_risks: result.key_risks,
            key_strengths: result.key_strengths,
            action_items: result.action_items,
        }
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Classify a fund category string and/or ticker.
#[pyfunction]
#[pyo3(signature = (category=None, ticker=None, config_json=None))]
pub fn classify(
    category: Option<&str>,
    ticker: Option<&str>,
    config_json: Option<&str>,
) -> PyResult<PyClassification> {
    let resolver = load_config(config_json)?.resolver();
    let mut input = ClassificationInput::new();
    if let Some(c) = category {
        input = input.with_category(c);
    }
    if let Some(t) = ticker {
        input = input.with_ticker(t);
    }
    let c = resolver.classify(&input);

    Ok(PyClassification {
        primary: c.primary.to_string(),
        secondary: c.secondary.as_ref().map(tag),
        asset_class: c.asset_class().map(|ac| ac.label().to_string()),
        matched_by: tag(&c.matched_by),
        description: c.description,
    })
}

// ============================================================================
// Scoring
// ============================================================================

/// Rank candidate instruments for one asset class.
///
/// `candidates_json` is a JSON array of instruments; the return value is the
/// JSON-serialized selection with ranked candidates and rationale.
#[pyfunction]
#[pyo3(signature = (asset_class, weight, candidates_json, config_json=None))]
pub fn score_candidates(
    asset_class: &str,
    weight: f64,
    candidates_json: &str,
    config_json: Option<&str>,
) -> PyResult<String> {
    let scorer = load_config(config_json)?.fund_scorer();
    let asset_class = AssetClass::from_str(asset_class)?;
    let candidates: Vec<Instrument> = serde_json::from_str(candidates_json)
        .map_err(|e| PyValueError::new_err(format!("invalid candidates: {}", e)))?;
    to_json(&scorer.select(asset_class, weight, &candidates))
}

// ============================================================================
// Metrics
// ============================================================================

/// Expected return, volatility and Sharpe ratio for a weight vector.
#[pyfunction]
#[pyo3(signature = (weights, config_json=None))]
pub fn portfolio_metrics(
    weights: HashMap<String, f64>,
    config_json: Option<&str>,
) -> PyResult<PyPortfolioMetrics> {
    let calculator = load_config(config_json)?.calculator();
    let weights = weights_from_map(weights)?;
    Ok(calculator.metrics(&weights, &[]).into())
}

/// Maximum peak-to-trough drawdown of a value path, in percent.
#[pyfunction]
pub fn max_drawdown(values: PyReadonlyArray1<f64>) -> f64 {
    drawdown::max_drawdown(&numpy_to_vec_f64(values))
}

// ============================================================================
// Simulation
// ============================================================================

/// Monte Carlo projection of a portfolio value under monthly normal returns.
#[pyfunction]
#[pyo3(signature = (
    expected_return,
    volatility,
    horizon_years=10,
    num_paths=1000,
    starting_value=100000.0,
    seed=None
))]
pub fn simulate_projection(
    py: Python<'_>,
    expected_return: f64,
    volatility: f64,
    horizon_years: usize,
    num_paths: usize,
    starting_value: f64,
    seed: Option<u64>,
) -> PyResult<PyProjectionResult> {
    let mut config = crate::portfolio::ProjectionConfig::default()
        .with_horizon(horizon_years)
        .with_paths(num_paths)
        .with_starting_value(starting_value);
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    let result = py.allow_threads(|| project(expected_return, volatility, &config, None))?;
    Ok(result.into())
}

/// Historical bootstrap over the configured return table.
///
/// `withdrawal_json` is a serialized withdrawal policy, e.g.
/// `{"kind": "fixed", "annual_amount": 40000, "inflation": 0.025}`.
#[pyfunction]
#[pyo3(signature = (
    weights,
    horizon_years=30,
    num_paths=1000,
    starting_value=100000.0,
    annual_contribution=0.0,
    contribution_growth=0.0,
    withdrawal_start_year=0,
    withdrawal_json=None,
    seed=None,
    config_json=None
))]
#[allow(clippy::too_many_arguments)]
pub fn run_bootstrap(
    py: Python<'_>,
    weights: HashMap<String, f64>,
    horizon_years: usize,
    num_paths: usize,
    starting_value: f64,
    annual_contribution: f64,
    contribution_growth: f64,
    withdrawal_start_year: usize,
    withdrawal_json: Option<&str>,
    seed: Option<u64>,
    config_json: Option<&str>,
) -> PyResult<PyBootstrapResult> {
    let config = load_config(config_json)?;
    let weights = weights_from_map(weights)?;
    let policy: WithdrawalPolicy = match withdrawal_json {
        Some(json) => serde_json::from_str(json)
            .map_err(|e| PyValueError::new_err(format!("invalid withdrawal policy: {}", e)))?,
        None => WithdrawalPolicy::None,
    };

    let mut run = config
        .bootstrap
        .clone()
        .with_horizon(horizon_years)
        .with_paths(num_paths)
        .with_starting_value(starting_value)
        .with_contributions(annual_contribution, contribution_growth)
        .with_withdrawals(withdrawal_start_year, policy);
    if let Some(seed) = seed {
        run = run.with_seed(seed);
    }

    let table = &config.history;
    let result = py.allow_threads(|| run_bootstrap_engine(&weights, table, &run, None))?;
    Ok(result.into())
}

// ============================================================================
// Stress
// ============================================================================

/// Impact of one scenario on a weight vector, in percent.
#[pyfunction]
#[pyo3(signature = (weights, scenario_id, config_json=None))]
pub fn stress_impact(
    weights: HashMap<String, f64>,
    scenario_id: &str,
    config_json: Option<&str>,
) -> PyResult<f64> {
    let tester = load_config(config_json)?.stress_tester();
    let weights = weights_from_map(weights)?;
    let scenario = tester
        .catalog()
        .get(scenario_id)
        .ok_or_else(|| PyValueError::new_err(format!("unknown scenario: {}", scenario_id)))?;
    Ok(tester.impact_percent(scenario, &weights))
}

/// Every catalog scenario as `(id, name, impact_percent)`, worst first.
#[pyfunction]
#[pyo3(signature = (weights, config_json=None))]
pub fn run_stress_catalog(
    weights: HashMap<String, f64>,
    config_json: Option<&str>,
) -> PyResult<Vec<(String, String, f64)>> {
    let tester = load_config(config_json)?.stress_tester();
    let weights = weights_from_map(weights)?;
    Ok(tester
        .run_catalog(&weights)
        .into_iter()
        .map(|r| (r.scenario_id, r.name, r.impact_percent))
        .collect())
}

// ============================================================================
// Fragility
// ============================================================================

/// Market fragility index from named indicator readings. Unknown names are
/// ignored.
#[pyfunction]
#[pyo3(signature = (readings, config_json=None))]
pub fn fragility_index(
    readings: HashMap<String, f64>,
    config_json: Option<&str>,
) -> PyResult<PyFragilityResult> {
    let scorer = load_config(config_json)?.fragility_scorer();
    let readings =
        IndicatorReadings::from_named(readings.iter().map(|(k, v)| (k.as_str(), *v)));
    Ok(scorer.score(&readings).into())
}
