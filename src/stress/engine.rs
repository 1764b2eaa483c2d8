//! Scenario impact on weight vectors and holdings.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::scenario::{ScenarioCatalog, ScenarioKind, StressScenario};
use crate::core::error::Result;
use crate::core::types::{AssetClass, Holding, WeightVector};

/// Shock applied to classes a scenario does not cover.
pub const DEFAULT_FALLBACK_SHOCK: f64 = -20.0;

/// One class's share of a scenario impact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassImpact {
    pub asset_class: AssetClass,
    pub weight: f64,
    pub shock: f64,
    /// `weight × shock`, in percent of the portfolio.
    pub contribution: f64,
    /// The shock came from the fallback, not the scenario table.
    pub fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioImpact {
    pub scenario_id: String,
    pub name: String,
    pub kind: ScenarioKind,
    pub period: Option<String>,
    pub impact_percent: f64,
    pub contributions: Vec<ClassImpact>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingImpact {
    pub ticker: String,
    pub asset_class: AssetClass,
    pub weight: f64,
    pub shock: f64,
    pub impact: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingsImpact {
    pub scenario_id: String,
    pub name: String,
    pub impact_percent: f64,
    pub by_class: Vec<ClassImpact>,
    pub holdings: Vec<HoldingImpact>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledImpact {
    pub label: String,
    pub impact_percent: f64,
}

/// One scenario evaluated against several weight vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub scenario_id: String,
    pub name: String,
    pub impacts: Vec<LabeledImpact>,
}

/// Baseline against candidate for one catalog scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogComparisonRow {
    pub scenario_id: String,
    pub name: String,
    pub kind: ScenarioKind,
    pub baseline: f64,
    pub candidate: f64,
    /// `candidate − baseline`; positive means the candidate loses less.
    pub difference: f64,
}

/// Applies scenarios from a catalog to portfolios.
#[derive(Debug, Clone)]
pub struct StressTester {
    catalog: ScenarioCatalog,
    fallback_shock: f64,
}

impl Default for StressTester {
    fn default() -> Self {
        Self::new(ScenarioCatalog::default())
    }
}

impl StressTester {
    pub fn new(catalog: ScenarioCatalog) -> Self {
        Self {
            catalog,
            fallback_shock: DEFAULT_FALLBACK_SHOCK,
        }
    }

    pub fn with_fallback_shock(mut self, shock: f64) -> Self {
        self.fallback_shock = shock;
        self
    }

    pub fn catalog(&self) -> &ScenarioCatalog {
        &self.catalog
    }

    pub fn fallback_shock(&self) -> f64 {
        self.fallback_shock
    }

    /// Scenario shock for a class, or the fallback.
    pub fn shock_for(&self, scenario: &StressScenario, asset_class: AssetClass) -> f64 {
        scenario.shock(asset_class).unwrap_or(self.fallback_shock)
    }

    /// Σ wᵢ·shockᵢ in percent.
    pub fn impact_percent(&self, scenario: &StressScenario, weights: &WeightVector) -> f64 {
        weights
            .iter()
            .map(|(ac, w)| w * self.shock_for(scenario, ac))
            .sum()
    }

    fn class_impacts(&self, scenario: &StressScenario, weights: &WeightVector) -> Vec<ClassImpact> {
        weights
            .iter()
            .map(|(asset_class, weight)| {
                let table_shock = scenario.shock(asset_class);
                let shock = table_shock.unwrap_or(self.fallback_shock);
                ClassImpact {
                    asset_class,
                    weight,
                    shock,
                    contribution: weight * shock,
                    fallback: table_shock.is_none(),
                }
            })
            .collect()
    }

    /// Impact with per-class contributions.
    pub fn apply(&self, scenario: &StressScenario, weights: &WeightVector) -> ScenarioImpact {
        let contributions = self.class_impacts(scenario, weights);
        ScenarioImpact {
            scenario_id: scenario.id.clone(),
            name: scenario.name.clone(),
            kind: scenario.kind,
            period: scenario.period.clone(),
            impact_percent: contributions.iter().map(|c| c.contribution).sum(),
            contributions,
        }
    }

    /// Impact of a scenario on individual holdings, aggregated by class.
    pub fn apply_to_holdings(
        &self,
        scenario: &StressScenario,
        holdings: &[Holding],
    ) -> Result<HoldingsImpact> {
        let weights = WeightVector::from_holdings(holdings)?;
        let by_class = self.class_impacts(scenario, &weights);
        let holdings = holdings
            .iter()
            .map(|h| {
                let shock = self.shock_for(scenario, h.asset_class);
                HoldingImpact {
                    ticker: h.ticker.clone(),
                    asset_class: h.asset_class,
                    weight: h.weight,
                    shock,
                    impact: h.weight * shock,
                }
            })
            .collect();
        Ok(HoldingsImpact {
            scenario_id: scenario.id.clone(),
            name: scenario.name.clone(),
            impact_percent: by_class.iter().map(|c| c.contribution).sum(),
            by_class,
            holdings,
        })
    }

    /// Side-by-side impact of one scenario on labelled weight vectors.
    pub fn compare(
        &self,
        scenario: &StressScenario,
        portfolios: &[(&str, &WeightVector)],
    ) -> ScenarioComparison {
        ScenarioComparison {
            scenario_id: scenario.id.clone(),
            name: scenario.name.clone(),
            impacts: portfolios
                .iter()
                .map(|(label, weights)| LabeledImpact {
                    label: (*label).to_string(),
                    impact_percent: self.impact_percent(scenario, weights),
                })
                .collect(),
        }
    }

    /// Every catalog scenario, worst impact first. Ties keep catalog order.
    pub fn run_catalog(&self, weights: &WeightVector) -> Vec<ScenarioImpact> {
        let mut results: Vec<ScenarioImpact> =
            self.catalog.iter().map(|s| self.apply(s, weights)).collect();
        results.sort_by(|a, b| {
            a.impact_percent
                .partial_cmp(&b.impact_percent)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        if let Some(worst) = results.first() {
            debug!(
                scenarios = results.len(),
                worst = %worst.scenario_id,
                impact = worst.impact_percent,
                "stress catalog evaluated"
            );
        }
        results
    }

    /// Baseline and candidate across the whole catalog, in catalog order.
    pub fn compare_catalog(
        &self,
        baseline: &WeightVector,
        candidate: &WeightVector,
    ) -> Vec<CatalogComparisonRow> {
        self.catalog
            .iter()
            .map(|s| {
                let base = self.impact_percent(s, baseline);
                let cand = self.impact_percent(s, candidate);
                CatalogComparisonRow {
                    scenario_id: s.id.clone(),
                    name: s.name.clone(),
                    kind: s.kind,
                    baseline: base,
                    candidate: cand,
                    difference: cand - base,
                }
            })
            .collect()
    }
}
