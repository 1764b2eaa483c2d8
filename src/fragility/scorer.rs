//! Composite fragility index over eight weighted pillars.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::indicators::{Descriptor, IndicatorReadings, Pillar, Status, DESCRIPTORS};
use crate::core::error::{FolioError, Result};
use crate::core::traits::IndicatorFeed;

/// Composite reported when no indicator is populated.
pub const NEUTRAL_COMPOSITE: f64 = 50.0;

const MAX_KEY_RISKS: usize = 6;
const MAX_KEY_STRENGTHS: usize = 4;
const RISK_THRESHOLD: f64 = 70.0;
const STRENGTH_THRESHOLD: f64 = 25.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorScore {
    pub key: String,
    pub pillar: Pillar,
    /// Input value after spreads or scaling.
    pub value: f64,
    /// Stress score in [0, 100], rounded.
    pub score: f64,
    pub status: Status,
    pub description: String,
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PillarScore {
    pub pillar: Pillar,
    pub name: String,
    pub weight: f64,
    /// Mean of populated indicator scores; `None` when nothing is populated.
    pub score: Option<f64>,
    pub indicators: Vec<IndicatorScore>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Resilient,
    Normal,
    Elevated,
    Fragile,
    Critical,
}

impl Zone {
    pub fn from_score(score: f64) -> Self {
        if score < 25.0 {
            Zone::Resilient
        } else if score < 45.0 {
            Zone::Normal
        } else if score < 65.0 {
            Zone::Elevated
        } else if score < 80.0 {
            Zone::Fragile
        } else {
            Zone::Critical
        }
    }

    pub fn interpretation(self) -> &'static str {
        match self {
            Zone::Resilient => {
                "Market conditions are resilient. Low systemic stress. Favorable for risk-taking."
            }
            Zone::Normal => "Normal market conditions. Standard risk management appropriate.",
            Zone::Elevated => {
                "Elevated fragility. Multiple stress signals present. Consider reducing risk."
            }
            Zone::Fragile => {
                "System approaching critical state. High volatility expected. Defensive positioning warranted."
            }
            Zone::Critical => {
                "Critical fragility. Conditions similar to pre-crisis periods. Capital preservation mode."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragilityResult {
    pub composite: f64,
    pub zone: Zone,
    pub interpretation: String,
    /// All eight pillars in fixed order, populated or not.
    pub pillars: Vec<PillarScore>,
    pub key_risks: Vec<String>,
    pub key_strengths: Vec<String>,
    pub action_items: Vec<String>,
    pub indicator_count: usize,
}

impl FragilityResult {
    pub fn pillar(&self, pillar: Pillar) -> Option<&PillarScore> {
        self.pillars.iter().find(|p| p.pillar == pillar)
    }

    /// Every populated indicator score, in pillar order.
    pub fn indicators(&self) -> impl Iterator<Item = &IndicatorScore> {
        self.pillars.iter().flat_map(|p| p.indicators.iter())
    }
}

/// Score one descriptor against the readings, if its input is present.
pub fn score_indicator(descriptor: &Descriptor, readings: &IndicatorReadings) -> Option<IndicatorScore> {
    let value = descriptor.input.resolve(readings)?;
    let score = descriptor.rule.score(value);
    Some(IndicatorScore {
        key: descriptor.key.to_string(),
        pillar: descriptor.pillar,
        value,
        score,
        status: Status::from_score(score),
        description: (descriptor.describe)(value),
        source: descriptor.source.map(str::to_string),
    })
}

/// Guidance keyed by composite band.
pub fn action_items(composite: f64) -> Vec<String> {
    let items: &[&str] = if composite >= 65.0 {
        &[
            "Consider reducing equity exposure",
            "Review stop-losses on concentrated positions",
            "Ensure 6+ months cash reserves",
            "Avoid leveraged positions",
        ]
    } else if composite >= 50.0 {
        &[
            "Avoid adding significant new risk",
            "Review portfolio concentration",
        ]
    } else if composite < 35.0 {
        &[
            "Conditions favor selective risk-taking",
            "Consider rebalancing to target allocation",
        ]
    } else {
        &[]
    };
    items.iter().map(|s| s.to_string()).collect()
}

/// Scores indicator readings into the composite index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FragilityScorer {
    pillar_weights: BTreeMap<Pillar, f64>,
}

impl Default for FragilityScorer {
    fn default() -> Self {
        Self {
            pillar_weights: Pillar::ALL.iter().map(|p| (*p, p.default_weight())).collect(),
        }
    }
}

impl FragilityScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override one pillar's relative weight.
    pub fn with_pillar_weight(mut self, pillar: Pillar, weight: f64) -> Result<Self> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(FolioError::invalid_parameter(format!(
                "pillar weight for {} must be finite and non-negative, got {}",
                pillar.name(),
                weight
            )));
        }
        self.pillar_weights.insert(pillar, weight);
        Ok(self)
    }

    pub fn pillar_weight(&self, pillar: Pillar) -> f64 {
        self.pillar_weights
            .get(&pillar)
            .copied()
            .unwrap_or_else(|| pillar.default_weight())
    }

    pub fn score(&self, readings: &IndicatorReadings) -> FragilityResult {
        let pillars: Vec<PillarScore> = Pillar::ALL
            .iter()
            .map(|&pillar| {
                let indicators: Vec<IndicatorScore> = DESCRIPTORS
                    .iter()
                    .filter(|d| d.pillar == pillar)
                    .filter_map(|d| score_indicator(d, readings))
                    .collect();
                let score = (!indicators.is_empty()).then(|| {
                    indicators.iter().map(|i| i.score).sum::<f64>() / indicators.len() as f64
                });
                PillarScore {
                    pillar,
                    name: pillar.name().to_string(),
                    weight: self.pillar_weight(pillar),
                    score,
                    indicators,
                }
            })
            .collect();

        // Empty pillars drop out of both numerator and denominator.
        let (weighted, total_weight) = pillars
            .iter()
            .filter_map(|p| p.score.map(|s| (s * p.weight, p.weight)))
            .fold((0.0, 0.0), |(sum, w), (sw, pw)| (sum + sw, w + pw));
        let composite = if total_weight > 0.0 {
            weighted / total_weight
        } else {
            NEUTRAL_COMPOSITE
        };

        let mut key_risks = Vec::new();
        let mut key_strengths = Vec::new();
        for indicator in pillars.iter().flat_map(|p| p.indicators.iter()) {
            if indicator.score >= RISK_THRESHOLD {
                key_risks.push(indicator.description.clone());
            } else if indicator.score <= STRENGTH_THRESHOLD {
                key_strengths.push(indicator.description.clone());
            }
        }
        key_risks.truncate(MAX_KEY_RISKS);
        key_strengths.truncate(MAX_KEY_STRENGTHS);

        let indicator_count = pillars.iter().map(|p| p.indicators.len()).sum();
        let zone = Zone::from_score(composite);
        debug!(composite, ?zone, indicator_count, "fragility index scored");

        FragilityResult {
            composite,
            zone,
            interpretation: zone.interpretation().to_string(),
            pillars,
            key_risks,
            key_strengths,
            action_items: action_items(composite),
            indicator_count,
        }
    }

    /// Score the latest readings from a feed.
    pub fn score_feed<F: IndicatorFeed + ?Sized>(&self, feed: &F) -> FragilityResult {
        self.score(&feed.indicator_values())
    }
}
