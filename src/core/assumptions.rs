//! Capital market assumptions shared by the metrics calculator and the
//! Monte Carlo engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::{FolioError, Result};
use super::types::AssetClass;

/// Long-run expected return and volatility of one asset class, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassAssumption {
    pub expected_return: f64,
    pub volatility: f64,
}

impl ClassAssumption {
    pub const fn new(expected_return: f64, volatility: f64) -> Self {
        Self {
            expected_return,
            volatility,
        }
    }
}

/// Symmetric pairwise correlation table with an implicit unit diagonal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationMatrix {
    entries: BTreeMap<AssetClass, BTreeMap<AssetClass, f64>>,
}

impl CorrelationMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the correlation for both orderings of the pair.
    pub fn set(&mut self, a: AssetClass, b: AssetClass, rho: f64) {
        self.entries.entry(a).or_default().insert(b, rho);
        self.entries.entry(b).or_default().insert(a, rho);
    }

    pub fn with(mut self, a: AssetClass, b: AssetClass, rho: f64) -> Self {
        self.set(a, b, rho);
        self
    }

    /// Correlation of a pair; `Some(1.0)` on the diagonal, `None` when unknown.
    pub fn get(&self, a: AssetClass, b: AssetClass) -> Option<f64> {
        if a == b {
            return Some(1.0);
        }
        self.entries
            .get(&a)
            .and_then(|row| row.get(&b))
            .or_else(|| self.entries.get(&b).and_then(|row| row.get(&a)))
            .copied()
    }

    fn values(&self) -> impl Iterator<Item = (AssetClass, AssetClass, f64)> + '_ {
        self.entries
            .iter()
            .flat_map(|(a, row)| row.iter().map(move |(b, rho)| (*a, *b, *rho)))
    }
}

/// Expected return, volatility and correlation assumptions per asset class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapitalMarketAssumptions {
    pub classes: BTreeMap<AssetClass, ClassAssumption>,
    pub correlations: CorrelationMatrix,
    /// Annual risk-free rate in percent.
    pub risk_free_rate: f64,
    /// Return used for a class with no assumption.
    pub fallback_return: f64,
    /// Volatility used for a class with no assumption.
    pub fallback_volatility: f64,
    /// Correlation used for a pair with no entry.
    pub fallback_correlation: f64,
}

impl Default for CapitalMarketAssumptions {
    fn default() -> Self {
        use AssetClass::*;

        let classes = BTreeMap::from([
            (UsEquity, ClassAssumption::new(7.0, 16.5)),
            (IntlDeveloped, ClassAssumption::new(7.5, 18.0)),
            (EmergingMarkets, ClassAssumption::new(8.5, 24.0)),
            (UsBonds, ClassAssumption::new(4.5, 5.5)),
            (IntlBonds, ClassAssumption::new(4.0, 7.0)),
            (Alternatives, ClassAssumption::new(6.0, 14.0)),
            (RealAssets, ClassAssumption::new(7.0, 15.0)),
            (Cash, ClassAssumption::new(2.0, 0.5)),
            (Crypto, ClassAssumption::new(50.0, 80.0)),
        ]);

        let correlations = CorrelationMatrix::new()
            .with(UsEquity, IntlDeveloped, 0.82)
            .with(UsEquity, EmergingMarkets, 0.72)
            .with(UsEquity, UsBonds, 0.03)
            .with(UsEquity, IntlBonds, 0.15)
            .with(UsEquity, Alternatives, 0.55)
            .with(IntlDeveloped, EmergingMarkets, 0.80)
            .with(IntlDeveloped, UsBonds, 0.08)
            .with(IntlDeveloped, IntlBonds, 0.35)
            .with(IntlDeveloped, Alternatives, 0.50)
            .with(EmergingMarkets, UsBonds, 0.10)
            .with(EmergingMarkets, IntlBonds, 0.30)
            .with(EmergingMarkets, Alternatives, 0.45)
            .with(UsBonds, IntlBonds, 0.65)
            .with(UsBonds, Alternatives, 0.15)
            .with(IntlBonds, Alternatives, 0.20);

        Self {
            classes,
            correlations,
            risk_free_rate: 5.0,
            fallback_return: 6.0,
            fallback_volatility: 15.0,
            fallback_correlation: 0.5,
        }
    }
}

impl CapitalMarketAssumptions {
    /// Assumptions with no classes or correlations; every lookup falls back.
    pub fn empty() -> Self {
        Self {
            classes: BTreeMap::new(),
            correlations: CorrelationMatrix::new(),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, asset_class: AssetClass, expected_return: f64, volatility: f64) -> Self {
        self.classes
            .insert(asset_class, ClassAssumption::new(expected_return, volatility));
        self
    }

    pub fn with_correlation(mut self, a: AssetClass, b: AssetClass, rho: f64) -> Self {
        self.correlations.set(a, b, rho);
        self
    }

    pub fn with_risk_free_rate(mut self, rate: f64) -> Self {
        self.risk_free_rate = rate;
        self
    }

    #[inline]
    pub fn expected_return(&self, asset_class: AssetClass) -> f64 {
        self.classes
            .get(&asset_class)
            .map(|a| a.expected_return)
            .unwrap_or(self.fallback_return)
    }

    #[inline]
    pub fn volatility(&self, asset_class: AssetClass) -> f64 {
        self.classes
            .get(&asset_class)
            .map(|a| a.volatility)
            .unwrap_or(self.fallback_volatility)
    }

    #[inline]
    pub fn correlation(&self, a: AssetClass, b: AssetClass) -> f64 {
        self.correlations
            .get(a, b)
            .unwrap_or(self.fallback_correlation)
    }

    /// Check that every number is finite, volatilities are non-negative and
    /// correlations lie in [-1, 1].
    pub fn validate(&self) -> Result<()> {
        for (ac, a) in &self.classes {
            if !a.expected_return.is_finite() || !a.volatility.is_finite() {
                return Err(FolioError::invalid_config(format!(
                    "non-finite assumption for {}",
                    ac
                )));
            }
            if a.volatility < 0.0 {
                return Err(FolioError::invalid_config(format!(
                    "negative volatility for {}",
                    ac
                )));
            }
        }
        for (a, b, rho) in self.correlations.values() {
            if !(-1.0..=1.0).contains(&rho) {
                return Err(FolioError::invalid_config(format!(
                    "correlation {} between {} and {} is outside [-1, 1]",
                    rho, a, b
                )));
            }
        }
        let scalars = [
            ("risk_free_rate", self.risk_free_rate),
            ("fallback_return", self.fallback_return),
            ("fallback_volatility", self.fallback_volatility),
            ("fallback_correlation", self.fallback_correlation),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(FolioError::invalid_config(format!("{} must be finite", name)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlation_is_symmetric() {
        let cma = CapitalMarketAssumptions::default();
        assert_eq!(
            cma.correlation(AssetClass::UsEquity, AssetClass::UsBonds),
            cma.correlation(AssetClass::UsBonds, AssetClass::UsEquity)
        );
        assert!((cma.correlation(AssetClass::UsBonds, AssetClass::IntlBonds) - 0.65).abs() < 1e-12);
        assert_eq!(cma.correlation(AssetClass::Cash, AssetClass::Cash), 1.0);
    }

    #[test]
    fn test_missing_entries_fall_back() {
        let cma = CapitalMarketAssumptions::empty();
        assert_eq!(cma.expected_return(AssetClass::UsEquity), 6.0);
        assert_eq!(cma.volatility(AssetClass::UsEquity), 15.0);
        assert_eq!(cma.correlation(AssetClass::UsEquity, AssetClass::Crypto), 0.5);
    }

    #[test]
    fn test_validate_rejects_bad_correlation() {
        let cma = CapitalMarketAssumptions::default().with_correlation(
            AssetClass::UsEquity,
            AssetClass::Crypto,
            1.4,
        );
        assert!(cma.validate().is_err());
        assert!(CapitalMarketAssumptions::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let cma: CapitalMarketAssumptions =
            serde_json::from_str(r#"{"risk_free_rate": 4.0}"#).unwrap();
        assert_eq!(cma.risk_free_rate, 4.0);
        assert_eq!(cma.expected_return(AssetClass::UsEquity), 7.0);
    }
}
