//! Per-class benchmark figures and composite-score weights.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::error::{FolioError, Result};
use crate::core::types::AssetClass;

/// Benchmark trailing returns and volatility for one asset class, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Benchmark {
    pub return_1yr: Option<f64>,
    pub return_3yr: Option<f64>,
    pub return_5yr: Option<f64>,
    pub volatility: f64,
}

impl Benchmark {
    pub const fn new(return_1yr: f64, return_3yr: f64, return_5yr: f64, volatility: f64) -> Self {
        Self {
            return_1yr: Some(return_1yr),
            return_3yr: Some(return_3yr),
            return_5yr: Some(return_5yr),
            volatility,
        }
    }
}

/// Benchmarks keyed by asset class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BenchmarkTable {
    entries: BTreeMap<AssetClass, Benchmark>,
}

impl BenchmarkTable {
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn with(mut self, asset_class: AssetClass, benchmark: Benchmark) -> Self {
        self.entries.insert(asset_class, benchmark);
        self
    }

    pub fn get(&self, asset_class: AssetClass) -> Option<&Benchmark> {
        self.entries.get(&asset_class)
    }
}

impl Default for BenchmarkTable {
    fn default() -> Self {
        use AssetClass::*;
        Self {
            entries: BTreeMap::from([
                (UsEquity, Benchmark::new(25.0, 10.0, 14.0, 16.5)),
                (IntlDeveloped, Benchmark::new(12.0, 5.0, 7.5, 18.0)),
                (EmergingMarkets, Benchmark::new(10.0, -1.0, 4.0, 24.0)),
                (UsBonds, Benchmark::new(3.0, -2.5, 0.8, 5.5)),
                (IntlBonds, Benchmark::new(2.0, -3.0, -0.5, 7.0)),
                (Alternatives, Benchmark::new(8.0, 4.0, 6.0, 14.0)),
            ]),
        }
    }
}

/// Weights of the five sub-scores in the composite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub risk_adjusted: f64,
    pub expense: f64,
    pub consistency: f64,
    pub tracking: f64,
    pub liquidity: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            risk_adjusted: 0.30,
            expense: 0.25,
            consistency: 0.15,
            tracking: 0.15,
            liquidity: 0.15,
        }
    }
}

impl ScoringWeights {
    pub fn validate(&self) -> Result<()> {
        let all = [
            self.risk_adjusted,
            self.expense,
            self.consistency,
            self.tracking,
            self.liquidity,
        ];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(FolioError::invalid_config(
                "scoring weights must be finite and non-negative",
            ));
        }
        if all.iter().sum::<f64>() <= 0.0 {
            return Err(FolioError::invalid_config("scoring weights sum to zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        let w = ScoringWeights::default();
        let total = w.risk_adjusted + w.expense + w.consistency + w.tracking + w.liquidity;
        assert!((total - 1.0).abs() < 1e-12);
        assert!(w.validate().is_ok());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let w = ScoringWeights {
            expense: -0.1,
            ..Default::default()
        };
        assert!(w.validate().is_err());
    }

    #[test]
    fn test_default_benchmarks() {
        let table = BenchmarkTable::default();
        assert_eq!(table.get(AssetClass::UsEquity).unwrap().return_1yr, Some(25.0));
        assert!(table.get(AssetClass::Crypto).is_none());
    }
}
