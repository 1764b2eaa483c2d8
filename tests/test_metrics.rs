//! Integration tests for portfolio metrics.

use foliocore::core::assumptions::CapitalMarketAssumptions;
use foliocore::core::types::{AssetClass, Holding, WeightVector};
use foliocore::metrics::{closest_models, default_models, drawdown, PortfolioCalculator};
use proptest::prelude::*;

fn two_class(sigma_a: f64, sigma_b: f64, rho: f64) -> PortfolioCalculator {
    PortfolioCalculator::new(
        CapitalMarketAssumptions::empty()
            .with_class(AssetClass::UsEquity, 8.0, sigma_a)
            .with_class(AssetClass::UsBonds, 4.0, sigma_b)
            .with_correlation(AssetClass::UsEquity, AssetClass::UsBonds, rho),
    )
}

#[test]
fn test_sixty_forty_with_default_assumptions() {
    let calc = PortfolioCalculator::default();
    let weights =
        WeightVector::from_pairs([(AssetClass::UsEquity, 0.6), (AssetClass::UsBonds, 0.4)])
            .unwrap();
    let m = calc.metrics(&weights, &[]);

    assert!((m.expected_return - 6.0).abs() < 1e-10);
    let variance: f64 = 0.36 * 16.5 * 16.5 + 0.16 * 5.5 * 5.5 + 2.0 * 0.24 * 16.5 * 5.5 * 0.03;
    assert!((m.volatility - variance.sqrt()).abs() < 1e-10);
    assert!((m.sharpe - (6.0 - 5.0) / variance.sqrt()).abs() < 1e-10);
    assert!((m.years_to_double().unwrap() - 12.0).abs() < 1e-10);
    // Two classes, each its own category: 2·10 + 2·15.
    assert_eq!(m.diversification, 50.0);
    assert_eq!(m.weighted_expense, 0.0);
}

#[test]
fn test_metrics_for_holdings() {
    let holdings = vec![
        Holding::new("VTI", AssetClass::UsEquity, 0.5)
            .with_expense_ratio(0.0003)
            .with_category("Large Blend"),
        Holding::new("VOO", AssetClass::UsEquity, 0.2)
            .with_expense_ratio(0.0003)
            .with_category("large blend"),
        Holding::new("BND", AssetClass::UsBonds, 0.3)
            .with_expense_ratio(0.0003)
            .with_category("Intermediate Core Bond"),
    ];
    let m = PortfolioCalculator::default()
        .metrics_for_holdings(&holdings)
        .unwrap();

    assert!((m.expected_return - (0.7 * 7.0 + 0.3 * 4.5)).abs() < 1e-10);
    assert!((m.weighted_expense - 0.0003).abs() < 1e-12);
    // Three holdings over two distinct categories.
    assert_eq!(m.diversification, 60.0);
    assert!((m.total_weight - 1.0).abs() < 1e-12);
}

#[test]
fn test_negative_holding_weight_rejected() {
    let holdings = vec![Holding::new("SH", AssetClass::UsEquity, -0.1)];
    assert!(PortfolioCalculator::default()
        .metrics_for_holdings(&holdings)
        .is_err());
}

#[test]
fn test_zero_volatility_sharpe_is_zero() {
    let calc = PortfolioCalculator::new(
        CapitalMarketAssumptions::empty().with_class(AssetClass::Cash, 5.0, 0.0),
    );
    let weights = WeightVector::from_pairs([(AssetClass::Cash, 1.0)]).unwrap();
    let m = calc.metrics(&weights, &[]);
    assert_eq!(m.volatility, 0.0);
    assert_eq!(m.sharpe, 0.0);
}

#[test]
fn test_closest_model_to_sixty_forty() {
    let alloc = WeightVector::from_pairs([
        (AssetClass::UsEquity, 0.55),
        (AssetClass::IntlDeveloped, 0.20),
        (AssetClass::EmergingMarkets, 0.05),
        (AssetClass::UsBonds, 0.20),
    ])
    .unwrap();
    let models = default_models();
    let top = closest_models(&alloc, &models, 3);
    assert_eq!(top.len(), 3);
    assert_eq!(top[0].id, "vanguard_growth");
    assert!((top[0].similarity - 100.0).abs() < 1e-9);
    assert!(top[0].similarity >= top[1].similarity);
    assert!(top[1].similarity >= top[2].similarity);
}

#[test]
fn test_max_drawdown_of_path() {
    let path = [100.0, 120.0, 90.0, 110.0, 85.0, 130.0];
    // Worst fall is 120 → 85.
    assert!((drawdown::max_drawdown(&path) - (35.0 / 120.0 * 100.0)).abs() < 1e-10);
    assert_eq!(drawdown::max_drawdown(&[100.0, 101.0, 102.0]), 0.0);
}

proptest! {
    #[test]
    fn prop_perfect_correlation_is_linear(
        w in 0.0f64..=1.0,
        sa in 0.0f64..40.0,
        sb in 0.0f64..40.0,
    ) {
        let calc = two_class(sa, sb, 1.0);
        let weights = WeightVector::from_pairs([
            (AssetClass::UsEquity, w),
            (AssetClass::UsBonds, 1.0 - w),
        ]).unwrap();
        let expected = w * sa + (1.0 - w) * sb;
        prop_assert!((calc.volatility(&weights) - expected).abs() < 1e-9);
    }

    #[test]
    fn prop_zero_correlation_is_root_sum_of_squares(
        w in 0.0f64..=1.0,
        sa in 0.0f64..40.0,
        sb in 0.0f64..40.0,
    ) {
        let calc = two_class(sa, sb, 0.0);
        let weights = WeightVector::from_pairs([
            (AssetClass::UsEquity, w),
            (AssetClass::UsBonds, 1.0 - w),
        ]).unwrap();
        let expected = ((w * sa).powi(2) + ((1.0 - w) * sb).powi(2)).sqrt();
        prop_assert!((calc.volatility(&weights) - expected).abs() < 1e-9);
    }

    #[test]
    fn prop_volatility_never_exceeds_weighted_sum(
        weights in proptest::collection::vec(0.0f64..1.0, 9),
    ) {
        let calc = PortfolioCalculator::default();
        let assumptions = calc.assumptions();
        let wv = WeightVector::from_pairs(
            AssetClass::ALL.iter().copied().zip(weights.iter().copied()),
        ).unwrap();
        let bound: f64 = wv.iter().map(|(ac, w)| w * assumptions.volatility(ac)).sum();
        prop_assert!(calc.volatility(&wv) <= bound + 1e-9);
    }

    #[test]
    fn prop_expected_return_is_convex_combination(w in 0.0f64..=1.0) {
        let calc = PortfolioCalculator::default();
        let weights = WeightVector::from_pairs([
            (AssetClass::UsEquity, w),
            (AssetClass::Cash, 1.0 - w),
        ]).unwrap();
        let r = calc.expected_return(&weights);
        prop_assert!(r >= 2.0 - 1e-12 && r <= 7.0 + 1e-12);
    }
}
