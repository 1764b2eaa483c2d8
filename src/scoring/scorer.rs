//! Multi-factor fund scoring and per-class selection.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::benchmark::{Benchmark, BenchmarkTable, ScoringWeights};
use super::rationale::build_rationale;
use crate::core::traits::{CandidateFilters, InstrumentCatalog};
use crate::core::types::{AssetClass, Holding, Instrument, WeightVector};

/// Neutral sub-score used when a factor lacks data.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Expense ratio assumed for instruments that do not report one.
pub const DEFAULT_EXPENSE_RATIO: f64 = 0.01;

/// Volatility used when neither the instrument nor a benchmark supplies one.
const FALLBACK_VOLATILITY: f64 = 15.0;

const NO_CANDIDATES: &str = "No candidates found for this asset class";

/// The five factor scores, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub risk_adjusted: f64,
    pub expense: f64,
    pub consistency: f64,
    pub tracking: f64,
    pub liquidity: f64,
}

impl SubScores {
    pub fn composite(&self, weights: &ScoringWeights) -> f64 {
        self.risk_adjusted * weights.risk_adjusted
            + self.expense * weights.expense
            + self.consistency * weights.consistency
            + self.tracking * weights.tracking
            + self.liquidity * weights.liquidity
    }
}

/// A scored candidate and its position in the ranking (1-based).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub rank: usize,
    pub instrument: Instrument,
    pub scores: SubScores,
    pub composite: f64,
    /// Sharpe proxy computed from the 1-year return.
    pub sharpe: f64,
}

/// Selection outcome for one asset class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSelection {
    pub asset_class: AssetClass,
    pub weight: f64,
    pub selected: Option<RankedCandidate>,
    pub rationale: Vec<String>,
    pub ranked: Vec<RankedCandidate>,
    /// Set when there was nothing to select.
    pub message: Option<String>,
}

impl ClassSelection {
    pub fn is_empty(&self) -> bool {
        self.selected.is_none()
    }

    /// Holding for the selected instrument, if any.
    pub fn holding(&self) -> Option<Holding> {
        self.selected.as_ref().map(|c| Holding {
            ticker: c.instrument.ticker.clone(),
            asset_class: self.asset_class,
            weight: self.weight,
            expense_ratio: c.instrument.expense_ratio,
            category: c.instrument.category.clone(),
        })
    }
}

/// Candidates to rank for one asset class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionRequest {
    pub asset_class: AssetClass,
    pub weight: f64,
    pub candidates: Vec<Instrument>,
}

/// Selections across every requested asset class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSelection {
    pub selections: Vec<ClassSelection>,
    pub holdings: Vec<Holding>,
}

impl PortfolioSelection {
    /// Σ weight × expense ratio over the selected instruments.
    pub fn weighted_expense(&self) -> f64 {
        self.holdings
            .iter()
            .map(|h| h.weight * h.expense_ratio.unwrap_or(0.0))
            .sum()
    }
}

/// Ranks candidate instruments on a weighted multi-factor score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FundScorer {
    pub weights: ScoringWeights,
    pub benchmarks: BenchmarkTable,
    /// Annual risk-free rate in percent.
    pub risk_free_rate: f64,
}

impl Default for FundScorer {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            benchmarks: BenchmarkTable::default(),
            risk_free_rate: 5.0,
        }
    }
}

impl FundScorer {
    pub fn new(weights: ScoringWeights, benchmarks: BenchmarkTable, risk_free_rate: f64) -> Self {
        Self {
            weights,
            benchmarks,
            risk_free_rate,
        }
    }

    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_risk_free_rate(mut self, risk_free_rate: f64) -> Self {
        self.risk_free_rate = risk_free_rate;
        self
    }

    /// Score and rank candidates against an explicit benchmark.
    ///
    /// Ranking is by composite score, descending. Ties keep input order.
    pub fn score(
        &self,
        candidates: &[Instrument],
        benchmark: Option<&Benchmark>,
        risk_free_rate: f64,
    ) -> Vec<RankedCandidate> {
        let mut ranked: Vec<RankedCandidate> = candidates
            .iter()
            .map(|instrument| {
                let (scores, sharpe) = sub_scores(instrument, benchmark, risk_free_rate);
                RankedCandidate {
                    rank: 0,
                    instrument: instrument.clone(),
                    composite: scores.composite(&self.weights),
                    scores,
                    sharpe,
                }
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.composite
                .partial_cmp(&a.composite)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for (i, candidate) in ranked.iter_mut().enumerate() {
            candidate.rank = i + 1;
        }
        ranked
    }

    /// Score candidates against the configured benchmark for a class.
    pub fn score_for_class(
        &self,
        asset_class: AssetClass,
        candidates: &[Instrument],
    ) -> Vec<RankedCandidate> {
        self.score(
            candidates,
            self.benchmarks.get(asset_class),
            self.risk_free_rate,
        )
    }

    /// Rank the candidates for a class and pick the top one with rationale.
    pub fn select(
        &self,
        asset_class: AssetClass,
        weight: f64,
        candidates: &[Instrument],
    ) -> ClassSelection {
        let benchmark = self.benchmarks.get(asset_class);
        let ranked = self.score(candidates, benchmark, self.risk_free_rate);

        let Some(top) = ranked.first() else {
            debug!(asset_class = %asset_class, "no candidates");
            return ClassSelection {
                asset_class,
                weight,
                selected: None,
                rationale: Vec::new(),
                ranked,
                message: Some(NO_CANDIDATES.to_string()),
            };
        };

        let rationale = build_rationale(top, ranked.get(1), benchmark);
        debug!(
            asset_class = %asset_class,
            ticker = %top.instrument.ticker,
            composite = top.composite,
            candidates = ranked.len(),
            "selected fund"
        );

        ClassSelection {
            asset_class,
            weight,
            selected: Some(top.clone()),
            rationale,
            ranked,
            message: None,
        }
    }

    /// Select a fund for every request. Classes are scored in parallel and
    /// the output preserves request order.
    pub fn select_portfolio(&self, requests: &[SelectionRequest]) -> PortfolioSelection {
        let selections: Vec<ClassSelection> = requests
            .par_iter()
            .map(|r| self.select(r.asset_class, r.weight, &r.candidates))
            .collect();
        let holdings = selections.iter().filter_map(ClassSelection::holding).collect();
        PortfolioSelection {
            selections,
            holdings,
        }
    }

    /// Pull candidates from a catalog for every class with positive weight,
    /// then select as in [`FundScorer::select_portfolio`].
    pub fn select_from_catalog<C>(
        &self,
        catalog: &C,
        allocation: &WeightVector,
        filters: &CandidateFilters,
    ) -> PortfolioSelection
    where
        C: InstrumentCatalog + ?Sized,
    {
        let classes: Vec<(AssetClass, f64)> =
            allocation.iter().filter(|(_, w)| *w > 0.0).collect();
        let requests: Vec<SelectionRequest> = classes
            .par_iter()
            .map(|&(asset_class, weight)| SelectionRequest {
                asset_class,
                weight,
                candidates: catalog.candidates(asset_class, filters),
            })
            .collect();
        self.select_portfolio(&requests)
    }
}

#[inline]
fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

#[inline]
fn clamp_score(x: f64) -> f64 {
    x.clamp(0.0, 100.0)
}

/// Compute the factor scores and the Sharpe proxy for one instrument.
pub fn sub_scores(
    instrument: &Instrument,
    benchmark: Option<&Benchmark>,
    risk_free_rate: f64,
) -> (SubScores, f64) {
    let one_year = finite(instrument.returns.one_year);

    let volatility = finite(instrument.volatility_3yr)
        .filter(|v| *v > 0.0)
        .or_else(|| benchmark.map(|b| b.volatility))
        .unwrap_or(FALLBACK_VOLATILITY);
    let sharpe = if volatility > 0.0 {
        (one_year.unwrap_or(0.0) - risk_free_rate) / volatility
    } else {
        0.0
    };
    let risk_adjusted = clamp_score((sharpe + 0.5) * 40.0);

    let expense_ratio = finite(instrument.expense_ratio).unwrap_or(DEFAULT_EXPENSE_RATIO);
    let expense = clamp_score(100.0 - expense_ratio * 15_000.0);

    let consistency = consistency_score(&instrument.returns.available());

    let tracking = match (one_year, benchmark.and_then(|b| finite(b.return_1yr))) {
        (Some(r), Some(b)) => clamp_score(100.0 - (r - b).abs() * 3.0),
        _ => NEUTRAL_SCORE,
    };

    let liquidity = liquidity_score(finite(instrument.aum).unwrap_or(0.0));

    (
        SubScores {
            risk_adjusted,
            expense,
            consistency,
            tracking,
            liquidity,
        },
        sharpe,
    )
}

/// `100 − 3σ` of the trailing returns; neutral with fewer than two horizons.
pub fn consistency_score(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return NEUTRAL_SCORE;
    }
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    clamp_score(100.0 - variance.sqrt() * 3.0)
}

/// AUM step function.
pub fn liquidity_score(aum: f64) -> f64 {
    if aum >= 50e9 {
        100.0
    } else if aum >= 10e9 {
        90.0
    } else if aum >= 1e9 {
        75.0
    } else if aum >= 100e6 {
        60.0
    } else {
        40.0
    }
}
