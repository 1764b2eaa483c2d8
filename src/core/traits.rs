//! Collaborator contracts the engines consume but never implement.

use serde::{Deserialize, Serialize};

use super::types::{AllocationHint, AssetClass, Instrument, InstrumentType};
use crate::fragility::IndicatorReadings;

/// Filters forwarded to an instrument catalog. The catalog applies them;
/// the scoring engine treats what comes back as already filtered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateFilters {
    pub max_expense_ratio: Option<f64>,
    pub min_aum: Option<f64>,
    #[serde(default)]
    pub instrument_types: Vec<InstrumentType>,
    pub limit: Option<usize>,
}

/// Source of candidate instruments for an asset class.
pub trait InstrumentCatalog: Sync {
    fn candidates(&self, asset_class: AssetClass, filters: &CandidateFilters) -> Vec<Instrument>;
}

/// Source of the latest market indicator readings.
pub trait IndicatorFeed {
    fn indicator_values(&self) -> IndicatorReadings;
}

/// Raw classification metadata for a ticker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstrumentMetadata {
    pub category: Option<String>,
    pub allocation: Option<AllocationHint>,
}

/// Provider of raw category strings and allocation breakdowns per ticker.
pub trait ClassificationMetadata {
    fn metadata(&self, ticker: &str) -> Option<InstrumentMetadata>;
}
