//! Market fragility index.
//!
//! Characterizes the market, not a portfolio: indicator readings are scored
//! individually, averaged into eight pillars, and combined into one
//! weighted composite with a qualitative zone.

pub mod indicators;
pub mod scorer;

pub use indicators::{
    descriptor, Descriptor, IndicatorReadings, Input, Pillar, RawIndicator, Rule, Status,
    DESCRIPTORS,
};
pub use scorer::{
    action_items, score_indicator, FragilityResult, FragilityScorer, IndicatorScore, PillarScore,
    Zone, NEUTRAL_COMPOSITE,
};
