//! Portfolio-level return and risk statistics from capital market assumptions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::assumptions::CapitalMarketAssumptions;
use crate::core::error::Result;
use crate::core::types::{Holding, WeightVector};

/// Inflation assumed by [`PortfolioMetrics::real_return`] callers that have no view.
pub const DEFAULT_INFLATION: f64 = 2.5;

/// Portfolio statistics. Returns and volatility are annual percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub expected_return: f64,
    pub volatility: f64,
    pub sharpe: f64,
    /// Heuristic in [0, 100] from holding and category counts.
    pub diversification: f64,
    /// Weighted expense ratio as a fraction.
    pub weighted_expense: f64,
    pub total_weight: f64,
    pub risk_free_rate: f64,
}

impl PortfolioMetrics {
    /// Rule-of-72 doubling time. `None` when the expected return is not positive.
    pub fn years_to_double(&self) -> Option<f64> {
        (self.expected_return > 0.0).then(|| 72.0 / self.expected_return)
    }

    /// Expected return net of inflation, both in percent.
    pub fn real_return(&self, inflation: f64) -> f64 {
        self.expected_return - inflation
    }

    /// Rough severe-stress drawdown estimate: three times volatility.
    pub fn estimated_max_drawdown(&self) -> f64 {
        self.volatility * 3.0
    }
}

/// Computes [`PortfolioMetrics`] for a weight vector.
#[derive(Debug, Clone, Default)]
pub struct PortfolioCalculator {
    assumptions: CapitalMarketAssumptions,
}

impl PortfolioCalculator {
    pub fn new(assumptions: CapitalMarketAssumptions) -> Self {
        Self { assumptions }
    }

    pub fn assumptions(&self) -> &CapitalMarketAssumptions {
        &self.assumptions
    }

    /// Σ wᵢ·μᵢ.
    pub fn expected_return(&self, weights: &WeightVector) -> f64 {
        weights
            .iter()
            .map(|(ac, w)| w * self.assumptions.expected_return(ac))
            .sum()
    }

    /// √(ΣᵢΣⱼ wᵢ·wⱼ·σᵢ·σⱼ·ρᵢⱼ) over every ordered pair, diagonal included.
    pub fn volatility(&self, weights: &WeightVector) -> f64 {
        let mut variance = 0.0;
        for (a, wa) in weights.iter() {
            let va = self.assumptions.volatility(a);
            for (b, wb) in weights.iter() {
                let vb = self.assumptions.volatility(b);
                variance += wa * wb * va * vb * self.assumptions.correlation(a, b);
            }
        }
        variance.max(0.0).sqrt()
    }

    /// Excess return over volatility; zero when volatility is zero.
    pub fn sharpe(&self, expected_return: f64, volatility: f64) -> f64 {
        if volatility > 0.0 {
            (expected_return - self.assumptions.risk_free_rate) / volatility
        } else {
            0.0
        }
    }

    /// Full metrics for a weight vector and the holdings selected for it.
    ///
    /// With no holdings, each class carrying weight counts as one holding in
    /// its own category and the weighted expense is zero.
    pub fn metrics(&self, weights: &WeightVector, holdings: &[Holding]) -> PortfolioMetrics {
        let expected_return = self.expected_return(weights);
        let volatility = self.volatility(weights);
        let sharpe = self.sharpe(expected_return, volatility);

        let diversification = if holdings.is_empty() {
            let held = weights.iter().filter(|(_, w)| *w > 0.0).count();
            diversification_score(held, held)
        } else {
            let categories: BTreeSet<String> = holdings
                .iter()
                .map(|h| {
                    h.category
                        .as_deref()
                        .map(|c| c.trim().to_lowercase())
                        .unwrap_or_else(|| h.asset_class.label().to_lowercase())
                })
                .collect();
            diversification_score(holdings.len(), categories.len())
        };

        let metrics = PortfolioMetrics {
            expected_return,
            volatility,
            sharpe,
            diversification,
            weighted_expense: weighted_expense(holdings),
            total_weight: weights.total(),
            risk_free_rate: self.assumptions.risk_free_rate,
        };
        debug!(
            expected_return = metrics.expected_return,
            volatility = metrics.volatility,
            sharpe = metrics.sharpe,
            "portfolio metrics"
        );
        metrics
    }

    /// Metrics with the weight vector aggregated from the holdings themselves.
    pub fn metrics_for_holdings(&self, holdings: &[Holding]) -> Result<PortfolioMetrics> {
        let weights = WeightVector::from_holdings(holdings)?;
        Ok(self.metrics(&weights, holdings))
    }
}

/// `min(100, 10·holdings + 15·categories)`. A bounded heuristic, not a
/// statistical diversification measure.
pub fn diversification_score(holdings: usize, categories: usize) -> f64 {
    (holdings as f64 * 10.0 + categories as f64 * 15.0).min(100.0)
}

/// Σ weight × expense ratio; holdings without an expense ratio contribute zero.
pub fn weighted_expense(holdings: &[Holding]) -> f64 {
    holdings
        .iter()
        .map(|h| h.weight * h.expense_ratio.filter(|e| e.is_finite()).unwrap_or(0.0))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::AssetClass;

    fn sixty_forty() -> WeightVector {
        WeightVector::from_pairs([(AssetClass::UsEquity, 0.6), (AssetClass::UsBonds, 0.4)])
            .unwrap()
    }

    #[test]
    fn test_expected_return_sixty_forty() {
        let calc = PortfolioCalculator::default();
        assert!((calc.expected_return(&sixty_forty()) - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_volatility_with_default_correlation() {
        let calc = PortfolioCalculator::default();
        let expected = (0.36 * 16.5f64.powi(2)
            + 0.16 * 5.5f64.powi(2)
            + 2.0 * 0.6 * 0.4 * 16.5 * 5.5 * 0.03)
            .sqrt();
        assert!((calc.volatility(&sixty_forty()) - expected).abs() < 1e-10);
    }

    #[test]
    fn test_zero_volatility_gives_zero_sharpe() {
        let cma = CapitalMarketAssumptions::empty().with_class(AssetClass::Cash, 4.0, 0.0);
        let calc = PortfolioCalculator::new(cma);
        let w = WeightVector::from_pairs([(AssetClass::Cash, 1.0)]).unwrap();
        let m = calc.metrics(&w, &[]);
        assert_eq!(m.volatility, 0.0);
        assert_eq!(m.sharpe, 0.0);
    }

    #[test]
    fn test_diversification_caps_at_100() {
        assert_eq!(diversification_score(2, 2), 50.0);
        assert_eq!(diversification_score(8, 5), 100.0);
        assert_eq!(diversification_score(0, 0), 0.0);
    }

    #[test]
    fn test_weighted_expense() {
        let holdings = vec![
            Holding::new("VTI", AssetClass::UsEquity, 0.6).with_expense_ratio(0.0003),
            Holding::new("BND", AssetClass::UsBonds, 0.4).with_expense_ratio(0.0005),
        ];
        assert!((weighted_expense(&holdings) - 0.00038).abs() < 1e-12);

        let calc = PortfolioCalculator::default();
        let m = calc.metrics_for_holdings(&holdings).unwrap();
        assert!((m.expected_return - 6.0).abs() < 1e-10);
        assert_eq!(m.diversification, 50.0);
    }

    #[test]
    fn test_derived_figures() {
        let calc = PortfolioCalculator::default();
        let m = calc.metrics(&sixty_forty(), &[]);
        assert!((m.years_to_double().unwrap() - 72.0 / 6.0).abs() < 1e-10);
        assert!((m.real_return(DEFAULT_INFLATION) - 3.5).abs() < 1e-10);
        assert!((m.estimated_max_drawdown() - 3.0 * m.volatility).abs() < 1e-12);
    }
}
