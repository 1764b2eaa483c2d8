//! Forward projection of portfolio value.

pub mod bootstrap;
pub mod monte_carlo;
pub mod random;

pub use bootstrap::{
    run_bootstrap, simulate_bootstrap, BootstrapConfig, BootstrapResult, HistoricalReturnTable,
    HistoricalYear, WithdrawalPolicy,
};
pub use monte_carlo::{project, simulate_projection, ProjectionConfig, SimulationResult, YearBand};
pub use random::{CancellationToken, EntropySource, RandomSource, SeededSource};
