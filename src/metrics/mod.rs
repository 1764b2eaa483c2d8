//! Portfolio metrics for foliocore.

pub mod calculator;
pub mod drawdown;
pub mod models;

pub use calculator::{PortfolioCalculator, PortfolioMetrics};
pub use drawdown::DrawdownTracker;
pub use models::{closest_models, default_models, ModelComparison, ModelPortfolio};
