//! Scenario stress testing.

pub mod engine;
pub mod scenario;

pub use engine::{
    CatalogComparisonRow, ClassImpact, HoldingImpact, HoldingsImpact, LabeledImpact,
    ScenarioComparison, ScenarioImpact, StressTester, DEFAULT_FALLBACK_SHOCK,
};
pub use scenario::{ScenarioCatalog, ScenarioKind, StressScenario};
