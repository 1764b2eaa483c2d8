//! Bundled configuration for every engine.
//!
//! All sections default to the built-in tables, so a JSON file only needs to
//! name what it overrides.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::assumptions::CapitalMarketAssumptions;
use super::error::{FolioError, Result};
use crate::classification::{CategoryTable, Resolver, TickerOverrides};
use crate::fragility::FragilityScorer;
use crate::metrics::PortfolioCalculator;
use crate::portfolio::{BootstrapConfig, HistoricalReturnTable, ProjectionConfig};
use crate::scoring::{BenchmarkTable, FundScorer, ScoringWeights};
use crate::stress::{ScenarioCatalog, StressTester, DEFAULT_FALLBACK_SHOCK};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub assumptions: CapitalMarketAssumptions,
    pub categories: CategoryTable,
    pub ticker_overrides: TickerOverrides,
    pub scoring_weights: ScoringWeights,
    pub benchmarks: BenchmarkTable,
    pub scenarios: ScenarioCatalog,
    /// Shock for classes a scenario does not cover, in percent.
    pub fallback_shock: f64,
    pub history: HistoricalReturnTable,
    pub projection: ProjectionConfig,
    pub bootstrap: BootstrapConfig,
    pub fragility: FragilityScorer,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            assumptions: CapitalMarketAssumptions::default(),
            categories: CategoryTable::default(),
            ticker_overrides: TickerOverrides::default(),
            scoring_weights: ScoringWeights::default(),
            benchmarks: BenchmarkTable::default(),
            scenarios: ScenarioCatalog::default(),
            fallback_shock: DEFAULT_FALLBACK_SHOCK,
            history: HistoricalReturnTable::default(),
            projection: ProjectionConfig::default(),
            bootstrap: BootstrapConfig::default(),
            fragility: FragilityScorer::default(),
        }
    }
}

impl AnalyticsConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            FolioError::invalid_config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_json_str(&text)?;
        info!(path = %path.display(), "loaded analytics config");
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.assumptions.validate()?;
        self.scoring_weights.validate()?;
        if !self.fallback_shock.is_finite() {
            return Err(FolioError::invalid_config("fallback_shock must be finite"));
        }
        self.projection.validate()?;
        self.bootstrap.validate()?;
        Ok(())
    }

    pub fn resolver(&self) -> Resolver {
        Resolver::new(self.categories.clone(), self.ticker_overrides.clone())
    }

    pub fn fund_scorer(&self) -> FundScorer {
        FundScorer::new(
            self.scoring_weights,
            self.benchmarks.clone(),
            self.assumptions.risk_free_rate,
        )
    }

    pub fn calculator(&self) -> PortfolioCalculator {
        PortfolioCalculator::new(self.assumptions.clone())
    }

    pub fn stress_tester(&self) -> StressTester {
        StressTester::new(self.scenarios.clone()).with_fallback_shock(self.fallback_shock)
    }

    pub fn fragility_scorer(&self) -> FragilityScorer {
        self.fragility.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::AssetClass;

    #[test]
    fn test_partial_json_overrides_only_named_sections() {
        let config = AnalyticsConfig::from_json_str(
            r#"{"fallback_shock": -30.0, "projection": {"num_paths": 500}}"#,
        )
        .unwrap();
        assert_eq!(config.fallback_shock, -30.0);
        assert_eq!(config.projection.num_paths, 500);
        assert_eq!(config.projection.horizon_years, 10);
        assert_eq!(config.scenarios.len(), 11);
        assert_eq!(config.stress_tester().fallback_shock(), -30.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(AnalyticsConfig::from_json_str(r#"{"projection": {"num_paths": 0}}"#).is_err());
        assert!(AnalyticsConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn test_json_round_trip_preserves_defaults() {
        let json = AnalyticsConfig::default().to_json_string().unwrap();
        let config = AnalyticsConfig::from_json_str(&json).unwrap();
        assert!(
            (config.assumptions.expected_return(AssetClass::UsEquity) - 7.0).abs() < 1e-12
        );
        assert_eq!(config.categories.len(), CategoryTable::default().len());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = AnalyticsConfig::from_json_file("/nonexistent/foliocore.json").unwrap_err();
        assert!(matches!(err, FolioError::InvalidConfig { .. }));
    }
}
