//! Historical-bootstrap retirement projection.
//!
//! Each simulated year draws one whole historical year and applies it to
//! every asset class at once, so cross-asset co-movement comes from history
//! rather than from a correlation model. Contributions accumulate until the
//! withdrawal start year; after that a [`WithdrawalPolicy`] draws down the
//! balance.

use std::collections::BTreeMap;

use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::monte_carlo::{percentile_of_sorted, sort_values, YearBand};
use super::random::{is_cancelled, CancellationToken, EntropySource, RandomSource, SeededSource};
use crate::core::error::{ensure_finite, FolioError, Result};
use crate::core::types::{AssetClass, WeightVector};

/// One calendar year of asset-class returns, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalYear {
    pub year: u16,
    pub returns: BTreeMap<AssetClass, f64>,
}

/// Joint annual returns by calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalReturnTable {
    years: Vec<HistoricalYear>,
    /// Return used for classes a row does not cover.
    #[serde(default = "default_fallbacks")]
    fallback_returns: BTreeMap<AssetClass, f64>,
}

fn default_fallbacks() -> BTreeMap<AssetClass, f64> {
    BTreeMap::from([(AssetClass::Cash, 2.0)])
}

impl HistoricalReturnTable {
    pub fn new(years: Vec<HistoricalYear>) -> Self {
        Self {
            years,
            fallback_returns: default_fallbacks(),
        }
    }

    pub fn with_fallback(mut self, asset_class: AssetClass, annual_return: f64) -> Self {
        self.fallback_returns.insert(asset_class, annual_return);
        self
    }

    pub fn years(&self) -> &[HistoricalYear] {
        &self.years
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Return of a class in the row at `index`, in percent.
    pub fn class_return(&self, index: usize, asset_class: AssetClass) -> f64 {
        self.years
            .get(index)
            .and_then(|row| row.returns.get(&asset_class))
            .or_else(|| self.fallback_returns.get(&asset_class))
            .copied()
            .unwrap_or(0.0)
    }

    /// Weighted portfolio return of the row at `index`, as a fraction.
    pub fn portfolio_return(&self, index: usize, weights: &WeightVector) -> f64 {
        weights
            .iter()
            .map(|(ac, w)| w * self.class_return(index, ac) / 100.0)
            .sum()
    }
}

impl Default for HistoricalReturnTable {
    /// Total returns for 2000 through 2024: S&P 500, EAFE, 10-year
    /// Treasuries, REITs, and gold standing in for alternatives.
    fn default() -> Self {
        const ROWS: [(u16, [f64; 5]); 25] = [
            (2000, [-9.10, -14.20, 16.66, 26.70, -5.70]),
            (2001, [-11.89, -21.40, 5.57, 13.30, 2.00]),
            (2002, [-22.10, -15.90, 15.12, 3.60, 24.80]),
            (2003, [28.69, 38.80, 2.01, 37.20, 19.80]),
            (2004, [10.88, 20.30, 4.51, 31.10, 5.30]),
            (2005, [4.91, 13.80, 2.87, 12.20, 18.20]),
            (2006, [15.79, 26.50, 1.96, 35.40, 23.10]),
            (2007, [5.49, 11.60, 10.00, -15.60, 31.10]),
            (2008, [-37.00, -43.20, 20.22, -37.90, 5.10]),
            (2009, [26.46, 31.90, -11.12, 28.00, 23.80]),
            (2010, [15.06, 7.80, 7.84, 27.90, 29.70]),
            (2011, [2.11, -12.00, 16.46, 8.30, 10.10]),
            (2012, [16.00, 17.20, 2.97, 19.50, 7.00]),
            (2013, [32.39, 22.90, -9.17, 2.50, -28.30]),
            (2014, [13.69, -4.80, 10.75, 28.20, -1.70]),
            (2015, [1.38, -0.80, 0.89, 2.50, -10.50]),
            (2016, [11.96, 1.00, 0.69, 8.50, 8.60]),
            (2017, [21.83, 25.00, 2.27, 5.10, 13.10]),
            (2018, [-4.38, -13.50, -0.02, -4.20, -1.50]),
            (2019, [31.49, 22.20, 8.92, 28.90, 18.30]),
            (2020, [18.40, 7.80, 11.21, -5.20, 24.90]),
            (2021, [28.61, 11.50, -4.39, 40.90, -3.60]),
            (2022, [-18.11, -14.30, -17.46, -25.50, -0.70]),
            (2023, [26.29, 18.30, 3.96, 11.60, 13.20]),
            (2024, [25.06, 4.00, -2.00, 8.00, 27.00]),
        ];
        let years = ROWS
            .iter()
            .map(|(year, [us, intl, bonds, reits, gold])| HistoricalYear {
                year: *year,
                returns: BTreeMap::from([
                    (AssetClass::UsEquity, *us),
                    (AssetClass::IntlDeveloped, *intl),
                    (AssetClass::UsBonds, *bonds),
                    (AssetClass::RealAssets, *reits),
                    (AssetClass::Alternatives, *gold),
                ]),
            })
            .collect();
        Self::new(years)
    }
}

/// How money leaves the portfolio once withdrawals start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WithdrawalPolicy {
    None,
    /// Fixed amount, grown by `inflation` (fraction) after each withdrawal.
    Fixed { annual_amount: f64, inflation: f64 },
    /// `rate` (fraction) of the balance each year.
    Percentage { rate: f64 },
    /// Inflation-grown base amount, cut by `adjustment` when it exceeds
    /// `ceiling_rate` of the balance and raised by `adjustment` below
    /// `floor_rate`.
    Guardrails {
        initial_amount: f64,
        inflation: f64,
        floor_rate: f64,
        ceiling_rate: f64,
        adjustment: f64,
    },
}

impl Default for WithdrawalPolicy {
    fn default() -> Self {
        WithdrawalPolicy::None
    }
}

impl WithdrawalPolicy {
    /// Guardrails around a 4% rule: 3% floor, 5% ceiling, 10% adjustment.
    pub fn guardrails(initial_amount: f64, inflation: f64) -> Self {
        WithdrawalPolicy::Guardrails {
            initial_amount,
            inflation,
            floor_rate: 0.03,
            ceiling_rate: 0.05,
            adjustment: 0.10,
        }
    }

    fn validate(&self) -> Result<()> {
        let (amounts, inflation): (Vec<(&str, f64)>, f64) = match *self {
            WithdrawalPolicy::None => (Vec::new(), 0.0),
            WithdrawalPolicy::Fixed {
                annual_amount,
                inflation,
            } => (vec![("annual_amount", annual_amount)], inflation),
            WithdrawalPolicy::Percentage { rate } => (vec![("rate", rate)], 0.0),
            WithdrawalPolicy::Guardrails {
                initial_amount,
                inflation,
                floor_rate,
                ceiling_rate,
                adjustment,
            } => {
                if floor_rate > ceiling_rate {
                    return Err(FolioError::invalid_parameter(
                        "guardrails floor_rate exceeds ceiling_rate",
                    ));
                }
                (
                    vec![
                        ("initial_amount", initial_amount),
                        ("floor_rate", floor_rate),
                        ("ceiling_rate", ceiling_rate),
                        ("adjustment", adjustment),
                    ],
                    inflation,
                )
            }
        };
        ensure_finite(inflation, "inflation")?;
        for (name, value) in amounts {
            ensure_finite(value, name)?;
            if value < 0.0 {
                return Err(FolioError::invalid_parameter(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Starting amount carried between years.
    fn base_amount(&self) -> f64 {
        match self {
            WithdrawalPolicy::Fixed { annual_amount, .. } => *annual_amount,
            WithdrawalPolicy::Guardrails { initial_amount, .. } => *initial_amount,
            _ => 0.0,
        }
    }

    /// Amount to withdraw given the current balance and base amount.
    fn withdrawal(&self, balance: f64, base: f64) -> f64 {
        match *self {
            WithdrawalPolicy::None => 0.0,
            WithdrawalPolicy::Fixed { .. } => base,
            WithdrawalPolicy::Percentage { rate } => balance.max(0.0) * rate,
            WithdrawalPolicy::Guardrails {
                floor_rate,
                ceiling_rate,
                adjustment,
                ..
            } => {
                if balance <= 0.0 {
                    return base;
                }
                let rate = base / balance;
                if rate > ceiling_rate {
                    base * (1.0 - adjustment)
                } else if rate < floor_rate {
                    base * (1.0 + adjustment)
                } else {
                    base
                }
            }
        }
    }

    fn inflation(&self) -> f64 {
        match self {
            WithdrawalPolicy::Fixed { inflation, .. }
            | WithdrawalPolicy::Guardrails { inflation, .. } => *inflation,
            _ => 0.0,
        }
    }
}

/// Configuration for a bootstrap run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    pub horizon_years: usize,
    pub num_paths: usize,
    pub starting_value: f64,
    pub annual_contribution: f64,
    /// Yearly growth of the contribution, as a fraction.
    pub contribution_growth: f64,
    /// First year (0-based) in which withdrawals replace contributions.
    pub withdrawal_start_year: usize,
    pub withdrawal: WithdrawalPolicy,
    pub batch_size: usize,
    pub seed: Option<u64>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            horizon_years: 30,
            num_paths: 1000,
            starting_value: 100_000.0,
            annual_contribution: 0.0,
            contribution_growth: 0.0,
            withdrawal_start_year: 0,
            withdrawal: WithdrawalPolicy::None,
            batch_size: 256,
            seed: None,
        }
    }
}

impl BootstrapConfig {
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

    pub fn with_contributions(mut self, annual: f64, growth: f64) -> Self {
        self.annual_contribution = annual;
        self.contribution_growth = growth;
        self
    }

    pub fn with_withdrawals(mut self, start_year: usize, policy: WithdrawalPolicy) -> Self {
        self.withdrawal_start_year = start_year;
        self.withdrawal = policy;
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
        if self.horizon_years == 0 || self.num_paths == 0 || self.batch_size == 0 {
            return Err(FolioError::invalid_parameter(
                "horizon_years, num_paths and batch_size must be at least 1",
            ));
        }
        ensure_finite(self.starting_value, "starting_value")?;
        ensure_finite(self.annual_contribution, "annual_contribution")?;
        ensure_finite(self.contribution_growth, "contribution_growth")?;
        if self.starting_value < 0.0 || self.annual_contribution < 0.0 {
            return Err(FolioError::invalid_parameter(
                "starting_value and annual_contribution must be non-negative",
            ));
        }
        self.withdrawal.validate()
    }
}

/// Result of a bootstrap run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapResult {
    pub bands: Vec<YearBand>,
    /// Percent of paths ending with a positive balance.
    pub success_rate: f64,
    /// `100 − success_rate`.
    pub probability_of_ruin: f64,
    /// Median 1-based year of ruin among ruined paths.
    pub median_ruin_year: Option<usize>,
    pub median_final: f64,
    pub mean_final: f64,
    pub final_values: Vec<f64>,
}

struct PathOutcome {
    balances: Vec<f64>,
    ruin_year: Option<usize>,
}

fn simulate_path<R: Rng>(
    rng: &mut R,
    weights: &WeightVector,
    table: &HistoricalReturnTable,
    config: &BootstrapConfig,
) -> PathOutcome {
    let mut balance = config.starting_value;
    let mut contribution = config.annual_contribution;
    let mut base = config.withdrawal.base_amount();
    let mut balances = Vec::with_capacity(config.horizon_years);
    let mut ruin_year = None;

    for year in 0..config.horizon_years {
        let row = rng.gen_range(0..table.len());
        balance *= 1.0 + table.portfolio_return(row, weights);

        if year < config.withdrawal_start_year {
            balance += contribution;
            contribution *= 1.0 + config.contribution_growth;
        } else {
            balance -= config.withdrawal.withdrawal(balance, base);
            base *= 1.0 + config.withdrawal.inflation();
        }

        if balance <= 0.0 {
            balance = 0.0;
            if ruin_year.is_none() {
                ruin_year = Some(year + 1);
            }
        }
        balances.push(balance);
    }

    PathOutcome { balances, ruin_year }
}

/// Bootstrap `config.num_paths` paths from `table` for a weight vector.
pub fn simulate_bootstrap<S: RandomSource>(
    weights: &WeightVector,
    table: &HistoricalReturnTable,
    config: &BootstrapConfig,
    source: &S,
    cancel: Option<&CancellationToken>,
) -> Result<BootstrapResult> {
    config.validate()?;
    if table.is_empty() {
        return Err(FolioError::empty_data("historical return table"));
    }
    let n_batches = (config.num_paths + config.batch_size - 1) / config.batch_size;
    debug!(
        paths = config.num_paths,
        years = config.horizon_years,
        history = table.len(),
        "starting bootstrap"
    );

    let batches: Vec<Option<Vec<PathOutcome>>> = (0..n_batches)
        .into_par_iter()
        .map(|batch| {
            if is_cancelled(cancel) {
                return None;
            }
            let first = batch * config.batch_size;
            let last = (first + config.batch_size).min(config.num_paths);
            let mut rng = source.batch_rng(batch as u64);
            Some(
                (first..last)
                    .map(|_| simulate_path(&mut rng, weights, table, config))
                    .collect(),
            )
        })
        .collect();

    let completed: usize = batches.iter().flatten().map(Vec::len).sum();
    if batches.iter().any(Option::is_none) {
        warn!(completed_paths = completed, "bootstrap cancelled");
        return Err(FolioError::cancelled(completed));
    }
    let outcomes: Vec<PathOutcome> = batches.into_iter().flatten().flatten().collect();
    let n = outcomes.len();

    let bands = (0..config.horizon_years)
        .map(|year| {
            let mut values: Vec<f64> = outcomes.iter().map(|o| o.balances[year]).collect();
            sort_values(&mut values);
            YearBand::from_sorted(year + 1, &values)
        })
        .collect();

    let mut final_values: Vec<f64> = outcomes
        .iter()
        .map(|o| o.balances.last().copied().unwrap_or(0.0))
        .collect();
    sort_values(&mut final_values);

    let success = final_values.iter().filter(|v| **v > 0.0).count();
    let success_rate = success as f64 / n as f64 * 100.0;

    let mut ruin_years: Vec<usize> = outcomes.iter().filter_map(|o| o.ruin_year).collect();
    ruin_years.sort_unstable();
    let median_ruin_year = ruin_years.get(ruin_years.len() / 2).copied();

    info!(
        paths = n,
        success_rate,
        median_ruin_year = ?median_ruin_year,
        "bootstrap complete"
    );

    Ok(BootstrapResult {
        bands,
        success_rate,
        probability_of_ruin: 100.0 - success_rate,
        median_ruin_year,
        median_final: percentile_of_sorted(&final_values, 0.5),
        mean_final: final_values.iter().sum::<f64>() / n as f64,
        final_values,
    })
}

/// [`simulate_bootstrap`] with a seeded source when `config.seed` is set,
/// OS entropy otherwise.
pub fn run_bootstrap(
    weights: &WeightVector,
    table: &HistoricalReturnTable,
    config: &BootstrapConfig,
    cancel: Option<&CancellationToken>,
) -> Result<BootstrapResult> {
    match config.seed {
        Some(seed) => simulate_bootstrap(weights, table, config, &SeededSource::new(seed), cancel),
        None => simulate_bootstrap(weights, table, config, &EntropySource, cancel),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_table(pct: f64) -> HistoricalReturnTable {
        HistoricalReturnTable::new(vec![HistoricalYear {
            year: 2000,
            returns: BTreeMap::from([(AssetClass::UsEquity, pct), (AssetClass::UsBonds, pct)]),
        }])
    }

    fn all_equity() -> WeightVector {
        WeightVector::from_pairs([(AssetClass::UsEquity, 1.0)]).unwrap()
    }

    #[test]
    fn test_default_table_covers_2000_to_2024() {
        let table = HistoricalReturnTable::default();
        assert_eq!(table.len(), 25);
        assert_eq!(table.years()[0].year, 2000);
        assert!((table.class_return(8, AssetClass::UsEquity) + 37.0).abs() < 1e-10);
        // Cash is not in any row and falls back to 2%.
        assert!((table.class_return(0, AssetClass::Cash) - 2.0).abs() < 1e-10);
        assert_eq!(table.class_return(0, AssetClass::Crypto), 0.0);
    }

    #[test]
    fn test_contributions_then_fixed_withdrawals() {
        let config = BootstrapConfig::default()
            .with_horizon(3)
            .with_paths(4)
            .with_starting_value(1000.0)
            .with_contributions(100.0, 0.0)
            .with_withdrawals(
                2,
                WithdrawalPolicy::Fixed {
                    annual_amount: 50.0,
                    inflation: 0.0,
                },
            );
        let result =
            simulate_bootstrap(&all_equity(), &flat_table(10.0), &config, &SeededSource::new(1), None)
                .unwrap();
        // 1000 → 1200 → 1420 → 1512
        assert!((result.bands[0].p50 - 1200.0).abs() < 1e-9);
        assert!((result.bands[1].p50 - 1420.0).abs() < 1e-9);
        assert!((result.median_final - 1512.0).abs() < 1e-9);
        assert_eq!(result.success_rate, 100.0);
        assert_eq!(result.median_ruin_year, None);
    }

    #[test]
    fn test_ruin_is_detected() {
        let config = BootstrapConfig::default()
            .with_horizon(5)
            .with_paths(10)
            .with_starting_value(100.0)
            .with_withdrawals(
                0,
                WithdrawalPolicy::Fixed {
                    annual_amount: 40.0,
                    inflation: 0.0,
                },
            );
        let result =
            simulate_bootstrap(&all_equity(), &flat_table(0.0), &config, &SeededSource::new(3), None)
                .unwrap();
        // 100 → 60 → 20 → 0 in year 3.
        assert_eq!(result.success_rate, 0.0);
        assert_eq!(result.probability_of_ruin, 100.0);
        assert_eq!(result.median_ruin_year, Some(3));
        assert!(result.final_values.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_guardrails_adjust_withdrawal() {
        let policy = WithdrawalPolicy::guardrails(60.0, 0.0);
        // 6% of 1000 breaches the 5% ceiling.
        assert!((policy.withdrawal(1000.0, 60.0) - 54.0).abs() < 1e-10);
        // 2% of 3000 is under the 3% floor.
        assert!((policy.withdrawal(3000.0, 60.0) - 66.0).abs() < 1e-10);
        assert!((policy.withdrawal(1500.0, 60.0) - 60.0).abs() < 1e-10);
    }

    #[test]
    fn test_percentage_policy_never_ruins() {
        let config = BootstrapConfig::default()
            .with_horizon(10)
            .with_paths(50)
            .with_withdrawals(0, WithdrawalPolicy::Percentage { rate: 0.04 })
            .with_seed(11);
        let result =
            run_bootstrap(&all_equity(), &HistoricalReturnTable::default(), &config, None).unwrap();
        assert_eq!(result.success_rate, 100.0);
        for band in &result.bands {
            assert!(band.p5 <= band.p50 && band.p50 <= band.p95);
        }
    }

    #[test]
    fn test_empty_table_rejected() {
        let table = HistoricalReturnTable::new(Vec::new());
        let config = BootstrapConfig::default().with_paths(5).with_horizon(2);
        let err = simulate_bootstrap(&all_equity(), &table, &config, &SeededSource::new(1), None)
            .unwrap_err();
        assert!(matches!(err, FolioError::EmptyData { .. }));
    }
}
