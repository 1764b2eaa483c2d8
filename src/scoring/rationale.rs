//! Templated selection rationale.

use super::benchmark::Benchmark;
use super::scorer::RankedCandidate;

const FALLBACK_REASON: &str = "Best overall score in this asset class";

/// Build the ordered list of reasons for a selection.
///
/// Rules fire in a fixed order: expense tier, return versus benchmark,
/// consistency, AUM tier, reported Sharpe ratio, margin over runner-up.
pub fn build_rationale(
    selected: &RankedCandidate,
    runner_up: Option<&RankedCandidate>,
    benchmark: Option<&Benchmark>,
) -> Vec<String> {
    let instrument = &selected.instrument;
    let mut reasons = Vec::new();

    if let Some(er) = instrument.expense_ratio.filter(|v| v.is_finite()) {
        if er <= 0.0005 {
            reasons.push(format!(
                "Ultra-low expense ratio ({:.3}%), among the cheapest in class",
                er * 100.0
            ));
        } else if er <= 0.002 {
            reasons.push(format!(
                "Very low expense ratio ({:.2}%), keeps more returns for you",
                er * 100.0
            ));
        } else if er <= 0.005 {
            reasons.push(format!("Competitive expense ratio ({:.2}%)", er * 100.0));
        }
    }

    let bench_1yr = benchmark.and_then(|b| b.return_1yr).filter(|v| v.is_finite());
    if let (Some(r1), Some(b1)) = (instrument.returns.one_year, bench_1yr) {
        if r1 > b1 * 1.05 {
            reasons.push(format!(
                "Outperformed benchmark by {:.1}% over past year",
                r1 - b1
            ));
        } else if r1 >= b1 * 0.98 {
            reasons.push(format!("Closely tracked benchmark ({:.1}% vs {}%)", r1, b1));
        }
    }

    if selected.scores.consistency >= 80.0 {
        reasons.push("Highly consistent returns across 1Y, 3Y, 5Y periods".to_string());
    }

    match instrument.aum {
        Some(aum) if aum >= 50e9 => reasons.push(format!(
            "Massive AUM (${:.0}B), excellent liquidity",
            aum / 1e9
        )),
        Some(aum) if aum >= 10e9 => {
            reasons.push(format!("Large AUM (${:.1}B), very liquid", aum / 1e9))
        }
        _ => {}
    }

    if let Some(sharpe) = instrument.sharpe_ratio.filter(|s| *s > 0.5) {
        reasons.push(format!("Strong risk-adjusted returns (Sharpe: {:.2})", sharpe));
    }

    if let Some(second) = runner_up {
        let margin = selected.composite - second.composite;
        if margin > 8.0 {
            reasons.push(format!("Clear winner, {:.1} pts ahead of runner-up", margin));
        } else if margin > 3.0 {
            reasons.push(format!(
                "Top choice, narrowly beating {}",
                second.instrument.ticker
            ));
        }
    }

    if reasons.is_empty() {
        reasons.push(FALLBACK_REASON.to_string());
    }
    reasons
}
