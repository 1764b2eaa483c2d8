//! Core types and utilities for foliocore.

pub mod assumptions;
pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use assumptions::{CapitalMarketAssumptions, ClassAssumption, CorrelationMatrix};
pub use config::AnalyticsConfig;
pub use error::{FolioError, Result};
pub use traits::{
    CandidateFilters, ClassificationMetadata, IndicatorFeed, InstrumentCatalog, InstrumentMetadata,
};
pub use types::*;
