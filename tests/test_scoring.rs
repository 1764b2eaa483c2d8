//! Integration tests for fund scoring and selection.

use foliocore::core::traits::{CandidateFilters, InstrumentCatalog};
use foliocore::core::types::{AssetClass, Instrument, TrailingReturns, WeightVector};
use foliocore::scoring::{FundScorer, ScoringWeights};
use proptest::prelude::*;

fn fund(ticker: &str, expense_ratio: f64) -> Instrument {
    Instrument::new(ticker, format!("{} Total Market", ticker))
        .with_category("Large Blend")
        .with_returns(TrailingReturns {
            one_year: Some(24.0),
            three_year: Some(9.5),
            five_year: Some(14.0),
            ten_year: None,
        })
        .with_volatility(16.0)
        .with_expense_ratio(expense_ratio)
        .with_aum(300e9)
}

struct FixedCatalog;

impl InstrumentCatalog for FixedCatalog {
    fn candidates(&self, asset_class: AssetClass, _filters: &CandidateFilters) -> Vec<Instrument> {
        match asset_class {
            AssetClass::UsEquity => vec![fund("VTI", 0.0003), fund("XYZ", 0.009)],
            AssetClass::UsBonds => vec![fund("BND", 0.0003)],
            _ => Vec::new(),
        }
    }
}

#[test]
fn test_cheaper_fund_wins_when_otherwise_identical() {
    let scorer = FundScorer::default();
    let cheap = fund("CHEAP", 0.0003);
    let pricey = fund("PRICEY", 0.005);

    let selection = scorer.select(AssetClass::UsEquity, 0.6, &[pricey, cheap]);
    let top = selection.selected.as_ref().unwrap();
    assert_eq!(top.instrument.ticker, "CHEAP");
    assert_eq!(selection.ranked.len(), 2);

    // Expense scores 95.5 vs 25.0 at a 0.25 weight.
    let margin = selection.ranked[0].composite - selection.ranked[1].composite;
    assert!((margin - 17.625).abs() < 1e-9);

    assert_eq!(
        selection.rationale[0],
        "Ultra-low expense ratio (0.030%), among the cheapest in class"
    );
    assert!(selection
        .rationale
        .iter()
        .any(|r| r == "Clear winner, 17.6 pts ahead of runner-up"));
}

#[test]
fn test_select_from_catalog_skips_empty_classes() {
    let allocation = WeightVector::from_pairs([
        (AssetClass::UsEquity, 0.6),
        (AssetClass::UsBonds, 0.3),
        (AssetClass::Crypto, 0.1),
    ])
    .unwrap();
    let selection = FundScorer::default().select_from_catalog(
        &FixedCatalog,
        &allocation,
        &CandidateFilters::default(),
    );

    assert_eq!(selection.selections.len(), 3);
    assert_eq!(selection.holdings.len(), 2);
    let crypto = selection
        .selections
        .iter()
        .find(|s| s.asset_class == AssetClass::Crypto)
        .unwrap();
    assert!(crypto.is_empty());
    assert!(crypto.message.is_some());

    // 0.6 × 0.0003 + 0.3 × 0.0003
    assert!((selection.weighted_expense() - 0.00027).abs() < 1e-12);
}

#[test]
fn test_weights_shift_the_ranking() {
    // A costly fund with far better liquidity and returns.
    let liquid = fund("BIG", 0.004).with_returns(TrailingReturns {
        one_year: Some(30.0),
        three_year: Some(12.0),
        five_year: Some(15.0),
        ten_year: None,
    });
    let cheap = fund("CHEAP", 0.0003).with_aum(50e6);

    let expense_only = ScoringWeights {
        risk_adjusted: 0.0,
        expense: 1.0,
        consistency: 0.0,
        tracking: 0.0,
        liquidity: 0.0,
    };
    let scorer = FundScorer::default().with_weights(expense_only);
    let ranked = scorer.score_for_class(AssetClass::UsEquity, &[liquid.clone(), cheap.clone()]);
    assert_eq!(ranked[0].instrument.ticker, "CHEAP");

    let liquidity_only = ScoringWeights {
        expense: 0.0,
        liquidity: 1.0,
        ..expense_only
    };
    let scorer = FundScorer::default().with_weights(liquidity_only);
    let ranked = scorer.score_for_class(AssetClass::UsEquity, &[cheap, liquid]);
    assert_eq!(ranked[0].instrument.ticker, "BIG");
}

proptest! {
    #[test]
    fn prop_composite_within_bounds(
        r1 in -60.0f64..120.0,
        r3 in -30.0f64..40.0,
        vol in 0.0f64..80.0,
        er in 0.0f64..0.03,
        aum in 0.0f64..1e12,
    ) {
        let instrument = Instrument::new("P", "Prop")
            .with_returns(TrailingReturns {
                one_year: Some(r1),
                three_year: Some(r3),
                five_year: None,
                ten_year: None,
            })
            .with_volatility(vol)
            .with_expense_ratio(er)
            .with_aum(aum);
        let ranked = FundScorer::default().score_for_class(AssetClass::UsEquity, &[instrument]);
        let c = ranked[0].composite;
        prop_assert!(c >= 0.0 && c <= 100.0 + 1e-9, "composite {}", c);
        prop_assert_eq!(ranked[0].rank, 1);
    }
}
