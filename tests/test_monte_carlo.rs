//! Integration tests for the Monte Carlo projection and historical bootstrap.

use std::collections::BTreeMap;

use foliocore::core::error::FolioError;
use foliocore::core::types::{AssetClass, WeightVector};
use foliocore::portfolio::{
    run_bootstrap, simulate_bootstrap, simulate_projection, BootstrapConfig, CancellationToken,
    HistoricalReturnTable, HistoricalYear, ProjectionConfig, SeededSource, WithdrawalPolicy,
};
use proptest::prelude::*;

fn all_equity() -> WeightVector {
    WeightVector::from_pairs([(AssetClass::UsEquity, 1.0)]).unwrap()
}

fn single_year_table(equity_return: f64) -> HistoricalReturnTable {
    HistoricalReturnTable::new(vec![HistoricalYear {
        year: 2000,
        returns: BTreeMap::from([(AssetClass::UsEquity, equity_return)]),
    }])
}

#[test]
fn test_projection_summary_statistics() {
    let config = ProjectionConfig::default()
        .with_horizon(10)
        .with_paths(2000)
        .with_starting_value(100_000.0);
    let result =
        simulate_projection(7.0, 15.0, &config, &SeededSource::new(7), None).unwrap();

    assert_eq!(result.bands.len(), 10);
    assert_eq!(result.num_paths(), 2000);
    assert_eq!(result.bands[0].year, 1);
    assert_eq!(result.bands[9].year, 10);

    // Positive drift: the median path ends above the start.
    assert!(result.median_final() > 100_000.0);
    assert!(result.probability_of_loss > 0.0 && result.probability_of_loss < 0.5);
    assert!(result.cvar_95 >= result.var_95);
    assert!(result.median_path_max_drawdown >= 0.0 && result.median_path_max_drawdown <= 100.0);

    // Band spread widens with time.
    let first = &result.bands[0];
    let last = &result.bands[9];
    assert!(last.p95 - last.p5 > first.p95 - first.p5);
}

#[test]
fn test_projection_reproducible_per_seed() {
    let config = ProjectionConfig::default().with_paths(300).with_horizon(5);
    let a = simulate_projection(6.0, 12.0, &config, &SeededSource::new(11), None).unwrap();
    let b = simulate_projection(6.0, 12.0, &config, &SeededSource::new(11), None).unwrap();
    let c = simulate_projection(6.0, 12.0, &config, &SeededSource::new(12), None).unwrap();
    assert_eq!(a.final_values, b.final_values);
    assert_ne!(a.final_values, c.final_values);
}

#[test]
fn test_cancelled_projection_reports_no_result() {
    let token = CancellationToken::new();
    token.cancel();
    let config = ProjectionConfig::default().with_paths(500);
    let err = simulate_projection(7.0, 15.0, &config, &SeededSource::new(1), Some(&token))
        .unwrap_err();
    assert!(matches!(err, FolioError::Cancelled { completed_paths: 0 }));
}

#[test]
fn test_bootstrap_single_year_is_deterministic() {
    let config = BootstrapConfig::default()
        .with_horizon(3)
        .with_paths(50)
        .with_starting_value(1000.0)
        .with_seed(5);
    let result = run_bootstrap(&all_equity(), &single_year_table(10.0), &config, None).unwrap();

    assert_eq!(result.bands.len(), 3);
    assert!((result.bands[0].p50 - 1100.0).abs() < 1e-9);
    assert!((result.median_final - 1331.0).abs() < 1e-9);
    assert!((result.mean_final - 1331.0).abs() < 1e-9);
    assert_eq!(result.success_rate, 100.0);
    assert_eq!(result.probability_of_ruin, 0.0);
    assert_eq!(result.median_ruin_year, None);
}

#[test]
fn test_bootstrap_fixed_withdrawals_deplete_balance() {
    // Flat returns, 1000 start, 400 a year out from year 1: ruin in year 3.
    let config = BootstrapConfig::default()
        .with_horizon(5)
        .with_paths(20)
        .with_starting_value(1000.0)
        .with_withdrawals(
            0,
            WithdrawalPolicy::Fixed {
                annual_amount: 400.0,
                inflation: 0.0,
            },
        );
    let result = simulate_bootstrap(
        &all_equity(),
        &single_year_table(0.0),
        &config,
        &SeededSource::new(3),
        None,
    )
    .unwrap();

    assert_eq!(result.success_rate, 0.0);
    assert_eq!(result.probability_of_ruin, 100.0);
    assert_eq!(result.median_ruin_year, Some(3));
    assert!((result.bands[1].p50 - 200.0).abs() < 1e-9);
    assert_eq!(result.bands[2].p95, 0.0);
}

#[test]
fn test_bootstrap_default_history_is_reproducible() {
    let weights = WeightVector::from_pairs([
        (AssetClass::UsEquity, 0.6),
        (AssetClass::UsBonds, 0.4),
    ])
    .unwrap();
    let config = BootstrapConfig::default()
        .with_paths(400)
        .with_withdrawals(0, WithdrawalPolicy::guardrails(4000.0, 0.025))
        .with_seed(99);
    let table = HistoricalReturnTable::default();
    let a = run_bootstrap(&weights, &table, &config, None).unwrap();
    let b = run_bootstrap(&weights, &table, &config, None).unwrap();
    assert_eq!(a.final_values, b.final_values);
    assert!((a.success_rate + a.probability_of_ruin - 100.0).abs() < 1e-9);
    assert!(a.success_rate > 50.0);
}

#[test]
fn test_bootstrap_rejects_empty_history() {
    let config = BootstrapConfig::default().with_paths(10);
    let err = run_bootstrap(
        &all_equity(),
        &HistoricalReturnTable::new(Vec::new()),
        &config,
        None,
    )
    .unwrap_err();
    assert!(matches!(err, FolioError::EmptyData { .. }));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_bands_are_ordered(
        er in -10.0f64..30.0,
        vol in 0.0f64..60.0,
        seed in any::<u64>(),
    ) {
        let config = ProjectionConfig::default()
            .with_horizon(4)
            .with_paths(64)
            .with_batch_size(16);
        let result = simulate_projection(er, vol, &config, &SeededSource::new(seed), None).unwrap();
        for band in &result.bands {
            prop_assert!(band.p5 <= band.p25);
            prop_assert!(band.p25 <= band.p50);
            prop_assert!(band.p50 <= band.p75);
            prop_assert!(band.p75 <= band.p95);
            prop_assert!(band.p5 >= 0.0);
        }
        prop_assert!(result.final_values.windows(2).all(|w| w[0] <= w[1]));
    }
}
