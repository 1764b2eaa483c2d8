//! Stress scenarios and the built-in scenario catalog.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::AssetClass;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    Historical,
    Hypothetical,
}

/// A named shock table with narrative metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressScenario {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub kind: ScenarioKind,
    pub period: Option<String>,
    /// Percent shock per asset class.
    pub shocks: BTreeMap<AssetClass, f64>,
    /// Time to recover the pre-event peak.
    pub recovery: Option<String>,
    pub lesson: Option<String>,
}

impl StressScenario {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ScenarioKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            kind,
            period: None,
            shocks: BTreeMap::new(),
            recovery: None,
            lesson: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_period(mut self, period: impl Into<String>) -> Self {
        self.period = Some(period.into());
        self
    }

    pub fn with_shock(mut self, asset_class: AssetClass, shock: f64) -> Self {
        self.shocks.insert(asset_class, shock);
        self
    }

    pub fn with_recovery(mut self, recovery: impl Into<String>) -> Self {
        self.recovery = Some(recovery.into());
        self
    }

    pub fn with_lesson(mut self, lesson: impl Into<String>) -> Self {
        self.lesson = Some(lesson.into());
        self
    }

    /// Shock for a class if the table defines one.
    pub fn shock(&self, asset_class: AssetClass) -> Option<f64> {
        self.shocks.get(&asset_class).copied()
    }
}

/// Ordered collection of scenarios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioCatalog {
    scenarios: Vec<StressScenario>,
}

impl ScenarioCatalog {
    pub fn new(scenarios: Vec<StressScenario>) -> Self {
        Self { scenarios }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Add a scenario, replacing any existing one with the same id.
    pub fn with(mut self, scenario: StressScenario) -> Self {
        match self.scenarios.iter_mut().find(|s| s.id == scenario.id) {
            Some(existing) => *existing = scenario,
            None => self.scenarios.push(scenario),
        }
        self
    }

    pub fn get(&self, id: &str) -> Option<&StressScenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StressScenario> {
        self.scenarios.iter()
    }

    pub fn of_kind(&self, kind: ScenarioKind) -> impl Iterator<Item = &StressScenario> {
        self.scenarios.iter().filter(move |s| s.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

fn equity_bond_shocks(
    scenario: StressScenario,
    [us, intl, em, bonds]: [f64; 4],
) -> StressScenario {
    scenario
        .with_shock(AssetClass::UsEquity, us)
        .with_shock(AssetClass::IntlDeveloped, intl)
        .with_shock(AssetClass::EmergingMarkets, em)
        .with_shock(AssetClass::UsBonds, bonds)
}

impl Default for ScenarioCatalog {
    /// Seven historical episodes and four hypothetical shocks.
    fn default() -> Self {
        use ScenarioKind::{Historical, Hypothetical};

        let scenarios = vec![
            equity_bond_shocks(
                StressScenario::new("dotcom_crash", "2000-2002 Dot-Com Crash", Historical)
                    .with_description("Tech bubble burst, 3-year bear market")
                    .with_period("2000-2002")
                    .with_recovery("7 years")
                    .with_lesson("Bonds soared while stocks crashed, diversification matters"),
                [-45.0, -48.0, -35.0, 32.0],
            ),
            equity_bond_shocks(
                StressScenario::new("gfc_2008", "2008 Global Financial Crisis", Historical)
                    .with_description("Lehman collapse, global credit freeze")
                    .with_period("2008-2009")
                    .with_recovery("4 years")
                    .with_lesson("Bonds provided crucial cushion; staying invested was rewarded"),
                [-52.0, -56.0, -61.0, 5.0],
            ),
            equity_bond_shocks(
                StressScenario::new("covid_crash", "2020 COVID Crash", Historical)
                    .with_description("Fastest bear market in history (34 days)")
                    .with_period("Feb-Mar 2020")
                    .with_recovery("5 months")
                    .with_lesson("Fastest recovery ever, panic selling locked in losses"),
                [-34.0, -33.0, -32.0, 3.5],
            ),
            equity_bond_shocks(
                StressScenario::new("rate_shock_2022", "2022 Rate Shock", Historical)
                    .with_description("Fed aggressive rate hikes, stocks and bonds down together")
                    .with_period("2022")
                    .with_recovery("2 years")
                    .with_lesson("Rare year when both stocks AND bonds fell together"),
                [-19.0, -16.0, -22.0, -13.0],
            ),
            equity_bond_shocks(
                StressScenario::new("stagflation_70s", "1973-1974 Stagflation", Historical)
                    .with_description("Oil crisis, high inflation, recession")
                    .with_period("1973-1974")
                    .with_recovery("8 years")
                    .with_lesson("Real assets (gold, commodities) outperformed paper assets"),
                [-48.0, -42.0, -30.0, -5.0],
            ),
            equity_bond_shocks(
                StressScenario::new("black_monday", "1987 Black Monday", Historical)
                    .with_description("Single-day 22% crash")
                    .with_period("Oct 1987"),
                [-33.0, -28.0, -25.0, 2.0],
            ),
            equity_bond_shocks(
                StressScenario::new("em_crisis_1997", "1997-1998 EM Crisis", Historical)
                    .with_description("Asian financial crisis, Russian default, LTCM")
                    .with_period("1997-1998"),
                [-15.0, -12.0, -55.0, 12.0],
            ),
            equity_bond_shocks(
                StressScenario::new("severe_recession", "Severe Recession", Hypothetical)
                    .with_description("Deep recession, risk-off environment"),
                [-40.0, -45.0, -50.0, 8.0],
            ),
            equity_bond_shocks(
                StressScenario::new("inflation_spike", "Inflation Spike", Hypothetical)
                    .with_description("Unexpected inflation surge, rates rise sharply"),
                [-25.0, -20.0, -30.0, -15.0],
            ),
            equity_bond_shocks(
                StressScenario::new("dollar_collapse", "Dollar Collapse", Hypothetical)
                    .with_description("Loss of USD reserve status, currency crisis"),
                [-35.0, 10.0, 5.0, -25.0],
            ),
            equity_bond_shocks(
                StressScenario::new("tech_bubble_2", "AI Bubble Burst", Hypothetical)
                    .with_description("Tech/AI valuations collapse"),
                [-35.0, -20.0, -25.0, 5.0],
            ),
        ];
        Self::new(scenarios)
    }
}
