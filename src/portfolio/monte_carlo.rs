//! Monte Carlo forward projection of a portfolio value.
//!
//! Monthly steps drawn from a normal distribution around the portfolio's
//! expected return and volatility. Paths are simulated in fixed-size batches
//! in parallel via Rayon; batch `k` always draws from `source.batch_rng(k)`.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::random::{
    is_cancelled, standard_normal, CancellationToken, EntropySource, RandomSource, SeededSource,
};
use crate::core::error::{ensure_finite, FolioError, Result};
use crate::metrics::drawdown::max_drawdown;

/// Percentiles reported for each projected year.
pub const BAND_PERCENTILES: [f64; 5] = [0.05, 0.25, 0.50, 0.75, 0.95];

const MONTHS_PER_YEAR: usize = 12;

/// Configuration for a projection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub horizon_years: usize,
    pub num_paths: usize,
    pub starting_value: f64,
    /// Paths per parallel batch.
    pub batch_size: usize,
    /// Seed for reproducible runs. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            horizon_years: 10,
            num_paths: 1000,
            starting_value: 100_000.0,
            batch_size: 256,
            seed: None,
        }
    }
}

impl ProjectionConfig {
    pub fn with_horizon(mut self, years: usize) -> Self {
        self.horizon_years = years;
        self
    }

    pub fn with_paths(mut self, num_paths: usize) -> Self {
        self.num_paths = num_paths;
        self
    }

    pub fn with_starting_value(mut self, value: f64) -> Self {
        self.starting_value = value;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.horizon_years == 0 {
            return Err(FolioError::invalid_parameter("horizon_years must be at least 1"));
        }
        if self.num_paths == 0 {
            return Err(FolioError::invalid_parameter("num_paths must be at least 1"));
        }
        if self.batch_size == 0 {
            return Err(FolioError::invalid_parameter("batch_size must be at least 1"));
        }
        ensure_finite(self.starting_value, "starting_value")?;
        if self.starting_value < 0.0 {
            return Err(FolioError::invalid_parameter(format!(
                "starting_value must be non-negative, got {}",
                self.starting_value
            )));
        }
        Ok(())
    }
}

/// Value percentiles at the end of one projected year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearBand {
    /// 1-based year.
    pub year: usize,
    pub p5: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
}

impl YearBand {
    pub(crate) fn from_sorted(year: usize, sorted: &[f64]) -> Self {
        let [p5, p25, p50, p75, p95] = BAND_PERCENTILES.map(|p| percentile_of_sorted(sorted, p));
        Self {
            year,
            p5,
            p25,
            p50,
            p75,
            p95,
        }
    }
}

/// Result of a projection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    /// One band per year, years 1 through the horizon.
    pub bands: Vec<YearBand>,
    /// Final value of every path, ascending.
    pub final_values: Vec<f64>,
    pub mean_final: f64,
    /// Fraction of paths ending below the starting value.
    pub probability_of_loss: f64,
    /// 5th-percentile loss as a percent of the starting value.
    pub var_95: f64,
    /// Mean loss of the worst 5% tail as a percent of the starting value.
    pub cvar_95: f64,
    /// Max drawdown of the path with the median final value, in percent.
    pub median_path_max_drawdown: f64,
}

impl SimulationResult {
    pub fn num_paths(&self) -> usize {
        self.final_values.len()
    }

    pub fn median_final(&self) -> f64 {
        percentile_of_sorted(&self.final_values, 0.5)
    }
}

/// `sorted[⌊n·p⌋]`, index clamped to the last element. Zero for empty input.
pub fn percentile_of_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((sorted.len() as f64 * p).floor() as usize).min(sorted.len() - 1);
    sorted[idx]
}

pub(crate) fn sort_values(values: &mut [f64]) {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
}

/// Simulate `config.num_paths` yearly value paths.
///
/// `expected_return` and `volatility` are annual percentages. Each month the
/// value is multiplied by `1 + μ + σ·z` with μ = r/12 and σ = v/√12, then
/// floored at zero.
pub fn simulate_projection<S: RandomSource>(
    expected_return: f64,
    volatility: f64,
    config: &ProjectionConfig,
    source: &S,
    cancel: Option<&CancellationToken>,
) -> Result<SimulationResult> {
    ensure_finite(expected_return, "expected_return")?;
    ensure_finite(volatility, "volatility")?;
    if volatility < 0.0 {
        return Err(FolioError::invalid_parameter(format!(
            "volatility must be non-negative, got {}",
            volatility
        )));
    }
    config.validate()?;

    let monthly_mu = expected_return / 100.0 / MONTHS_PER_YEAR as f64;
    let monthly_sigma = volatility / 100.0 / (MONTHS_PER_YEAR as f64).sqrt();
    let horizon = config.horizon_years;
    let start = config.starting_value;
    let n_batches = (config.num_paths + config.batch_size - 1) / config.batch_size;

    debug!(
        expected_return,
        volatility,
        paths = config.num_paths,
        batches = n_batches,
        "starting projection"
    );

    let batches: Vec<Option<Vec<Vec<f64>>>> = (0..n_batches)
        .into_par_iter()
        .map(|batch| {
            if is_cancelled(cancel) {
                return None;
            }
            let first = batch * config.batch_size;
            let last = (first + config.batch_size).min(config.num_paths);
            let mut rng = source.batch_rng(batch as u64);
            let mut paths = Vec::with_capacity(last - first);

            for _ in first..last {
                let mut value = start;
                let mut path = Vec::with_capacity(horizon + 1);
                path.push(value);
                for _ in 0..horizon {
                    for _ in 0..MONTHS_PER_YEAR {
                        let z = standard_normal(&mut rng);
                        value = (value * (1.0 + monthly_mu + monthly_sigma * z)).max(0.0);
                    }
                    path.push(value);
                }
                paths.push(path);
            }
            Some(paths)
        })
        .collect();

    let completed: usize = batches.iter().flatten().map(Vec::len).sum();
    if batches.iter().any(Option::is_none) {
        warn!(completed_paths = completed, "projection cancelled");
        return Err(FolioError::cancelled(completed));
    }
    let paths: Vec<Vec<f64>> = batches.into_iter().flatten().flatten().collect();

    let result = summarize(&paths, start, horizon);
    info!(
        paths = result.num_paths(),
        median_final = result.median_final(),
        probability_of_loss = result.probability_of_loss,
        "projection complete"
    );
    Ok(result)
}

/// [`simulate_projection`] with a seeded source when `config.seed` is set,
/// OS entropy otherwise.
pub fn project(
    expected_return: f64,
    volatility: f64,
    config: &ProjectionConfig,
    cancel: Option<&CancellationToken>,
) -> Result<SimulationResult> {
    match config.seed {
        Some(seed) => {
            simulate_projection(expected_return, volatility, config, &SeededSource::new(seed), cancel)
        }
        None => simulate_projection(expected_return, volatility, config, &EntropySource, cancel),
    }
}

fn summarize(paths: &[Vec<f64>], start: f64, horizon: usize) -> SimulationResult {
    let n = paths.len();

    let bands = (1..=horizon)
        .map(|year| {
            let mut values: Vec<f64> = paths.iter().map(|p| p[year]).collect();
            sort_values(&mut values);
            YearBand::from_sorted(year, &values)
        })
        .collect();

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        paths[a][horizon]
            .partial_cmp(&paths[b][horizon])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let final_values: Vec<f64> = order.iter().map(|&i| paths[i][horizon]).collect();
    let median_path_max_drawdown = order
        .get(n / 2)
        .map_or(0.0, |&i| max_drawdown(&paths[i]));

    let mean_final = final_values.iter().sum::<f64>() / n as f64;
    let n_loss = final_values.iter().filter(|&&v| v < start).count();
    let probability_of_loss = n_loss as f64 / n as f64;

    let (var_95, cvar_95) = if start > 0.0 {
        let p5_idx = ((n as f64 * 0.05).floor() as usize).min(n - 1);
        let var = ((start - final_values[p5_idx]) / start * 100.0).max(0.0);
        let tail = &final_values[..=p5_idx];
        let avg_tail = tail.iter().sum::<f64>() / tail.len() as f64;
        (var, ((start - avg_tail) / start * 100.0).max(0.0))
    } else {
        (0.0, 0.0)
    };

    SimulationResult {
        bands,
        final_values,
        mean_final,
        probability_of_loss,
        var_95,
        cvar_95,
        median_path_max_drawdown,
    }
}
