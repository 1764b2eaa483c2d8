//! Fund scoring and selection for foliocore.

pub mod benchmark;
pub mod rationale;
pub mod scorer;

pub use benchmark::{Benchmark, BenchmarkTable, ScoringWeights};
pub use rationale::build_rationale;
pub use scorer::{
    ClassSelection, FundScorer, PortfolioSelection, RankedCandidate, SelectionRequest, SubScores,
};
