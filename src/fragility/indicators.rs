//! Raw market indicators and the descriptor table that scores them.
//!
//! Each [`Descriptor`] names the reading(s) it consumes, the pillar it
//! belongs to, and the rule mapping the reading to a 0-100 stress score.
//! Most indicators use the generic [`Rule::Linear`] rescaling against a
//! historical range; the rest carry their own asymmetric rules.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::error::{FolioError, Result};

/// Every raw reading name an indicator feed may supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RawIndicator {
    // Valuation
    BuffettIndicator,
    ShillerCape,
    PriceToSales,
    EarningsYield,
    // Credit
    HySpread,
    IgSpread,
    BbSpread,
    CccSpread,
    EmSpread,
    // Banking
    TedSpread,
    CpSpread,
    RepoRate,
    // Volatility
    Vix,
    Vix3m,
    Vvix,
    MoveIndex,
    SkewIndex,
    RealizedVol,
    // Financial conditions
    Nfci,
    NfciCredit,
    NfciLeverage,
    NfciRisk,
    Stlfsi,
    // Sentiment
    FearGreedIndex,
    AaiiNetBull,
    PutCallRatio,
    MarginDebtGrowth,
    InsiderBuySellRatio,
    // Structure
    Top10Concentration,
    PercentAbove200dma,
    PercentAbove50dma,
    AdvanceDeclineRatio,
    NewHighsNewLows,
    // Macro
    YieldCurve10y2y,
    YieldCurve10y3m,
    Lei,
    ConsumerSentiment,
    InitialClaims,
    ContinuedClaims,
    IsmPmi,
    // Liquidity
    M2Growth,
    FedBalanceSheetGrowth,
    BankReserves,
    RepoVolume,
    // Global
    DollarIndex,
    DollarChange30d,
    EmCurrencyIndex,
    BtcDrawdown,
    GoldVsEquity,
}

impl RawIndicator {
    pub const ALL: [RawIndicator; 49] = [
        RawIndicator::BuffettIndicator,
        RawIndicator::ShillerCape,
        RawIndicator::PriceToSales,
        RawIndicator::EarningsYield,
        RawIndicator::HySpread,
        RawIndicator::IgSpread,
        RawIndicator::BbSpread,
        RawIndicator::CccSpread,
        RawIndicator::EmSpread,
        RawIndicator::TedSpread,
        RawIndicator::CpSpread,
        RawIndicator::RepoRate,
        RawIndicator::Vix,
        RawIndicator::Vix3m,
        RawIndicator::Vvix,
        RawIndicator::MoveIndex,
        RawIndicator::SkewIndex,
        RawIndicator::RealizedVol,
        RawIndicator::Nfci,
        RawIndicator::NfciCredit,
        RawIndicator::NfciLeverage,
        RawIndicator::NfciRisk,
        RawIndicator::Stlfsi,
        RawIndicator::FearGreedIndex,
        RawIndicator::AaiiNetBull,
        RawIndicator::PutCallRatio,
        RawIndicator::MarginDebtGrowth,
        RawIndicator::InsiderBuySellRatio,
        RawIndicator::Top10Concentration,
        RawIndicator::PercentAbove200dma,
        RawIndicator::PercentAbove50dma,
        RawIndicator::AdvanceDeclineRatio,
        RawIndicator::NewHighsNewLows,
        RawIndicator::YieldCurve10y2y,
        RawIndicator::YieldCurve10y3m,
        RawIndicator::Lei,
        RawIndicator::ConsumerSentiment,
        RawIndicator::InitialClaims,
        RawIndicator::ContinuedClaims,
        RawIndicator::IsmPmi,
        RawIndicator::M2Growth,
        RawIndicator::FedBalanceSheetGrowth,
        RawIndicator::BankReserves,
        RawIndicator::RepoVolume,
        RawIndicator::DollarIndex,
        RawIndicator::DollarChange30d,
        RawIndicator::EmCurrencyIndex,
        RawIndicator::BtcDrawdown,
        RawIndicator::GoldVsEquity,
    ];

    /// camelCase feed name.
    pub fn name(self) -> &'static str {
        use RawIndicator::*;
        match self {
            BuffettIndicator => "buffettIndicator",
            ShillerCape => "shillerCape",
            PriceToSales => "priceToSales",
            EarningsYield => "earningsYield",
            HySpread => "hySpread",
            IgSpread => "igSpread",
            BbSpread => "bbSpread",
            CccSpread => "cccSpread",
            EmSpread => "emSpread",
            TedSpread => "tedSpread",
            CpSpread => "cpSpread",
            RepoRate => "repoRate",
            Vix => "vix",
            Vix3m => "vix3m",
            Vvix => "vvix",
            MoveIndex => "moveIndex",
            SkewIndex => "skewIndex",
            RealizedVol => "realizedVol",
            Nfci => "nfci",
            NfciCredit => "nfciCredit",
            NfciLeverage => "nfciLeverage",
            NfciRisk => "nfciRisk",
            Stlfsi => "stlfsi",
            FearGreedIndex => "fearGreedIndex",
            AaiiNetBull => "aaiiNetBull",
            PutCallRatio => "putCallRatio",
            MarginDebtGrowth => "marginDebtGrowth",
            InsiderBuySellRatio => "insiderBuySellRatio",
            Top10Concentration => "top10Concentration",
            PercentAbove200dma => "percentAbove200dma",
            PercentAbove50dma => "percentAbove50dma",
            AdvanceDeclineRatio => "advanceDeclineRatio",
            NewHighsNewLows => "newHighsNewLows",
            YieldCurve10y2y => "yieldCurve10y2y",
            YieldCurve10y3m => "yieldCurve10y3m",
            Lei => "lei",
            ConsumerSentiment => "consumerSentiment",
            InitialClaims => "initialClaims",
            ContinuedClaims => "continuedClaims",
            IsmPmi => "ismPmi",
            M2Growth => "m2Growth",
            FedBalanceSheetGrowth => "fedBalanceSheetGrowth",
            BankReserves => "bankReserves",
            RepoVolume => "repoVolume",
            DollarIndex => "dollarIndex",
            DollarChange30d => "dollarChange30d",
            EmCurrencyIndex => "emCurrencyIndex",
            BtcDrawdown => "btcDrawdown",
            GoldVsEquity => "goldVsEquity",
        }
    }
}

impl fmt::Display for RawIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RawIndicator {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self> {
        RawIndicator::ALL
            .iter()
            .copied()
            .find(|ind| ind.name() == s)
            .ok_or_else(|| FolioError::invalid_parameter(format!("Unknown indicator: {}", s)))
    }
}

/// A partial set of indicator readings. Absent readings are not errors.
///
/// Serializes as a map of feed names; unknown names are dropped on load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct IndicatorReadings {
    values: BTreeMap<RawIndicator, f64>,
}

impl IndicatorReadings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from feed names. Unknown names and non-finite values are skipped.
    pub fn from_named<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut readings = Self::new();
        for (name, value) in pairs {
            match name.parse::<RawIndicator>() {
                Ok(indicator) => readings.set(indicator, value),
                Err(_) => debug!(name, "ignoring unknown indicator"),
            }
        }
        readings
    }

    pub fn with(mut self, indicator: RawIndicator, value: f64) -> Self {
        self.set(indicator, value);
        self
    }

    pub fn set(&mut self, indicator: RawIndicator, value: f64) {
        if value.is_finite() {
            self.values.insert(indicator, value);
        } else {
            debug!(indicator = indicator.name(), "ignoring non-finite reading");
        }
    }

    pub fn remove(&mut self, indicator: RawIndicator) -> Option<f64> {
        self.values.remove(&indicator)
    }

    pub fn get(&self, indicator: RawIndicator) -> Option<f64> {
        self.values.get(&indicator).copied().filter(|v| v.is_finite())
    }

    pub fn iter(&self) -> impl Iterator<Item = (RawIndicator, f64)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<BTreeMap<String, f64>> for IndicatorReadings {
    fn from(named: BTreeMap<String, f64>) -> Self {
        IndicatorReadings::from_named(named.iter().map(|(k, v)| (k.as_str(), *v)))
    }
}

impl From<IndicatorReadings> for BTreeMap<String, f64> {
    fn from(readings: IndicatorReadings) -> Self {
        readings
            .values
            .into_iter()
            .map(|(k, v)| (k.name().to_string(), v))
            .collect()
    }
}

/// The eight weighted groups of the composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pillar {
    Valuation,
    Credit,
    Volatility,
    Sentiment,
    Structure,
    Macro,
    Liquidity,
    Contagion,
}

impl Pillar {
    pub const ALL: [Pillar; 8] = [
        Pillar::Valuation,
        Pillar::Credit,
        Pillar::Volatility,
        Pillar::Sentiment,
        Pillar::Structure,
        Pillar::Macro,
        Pillar::Liquidity,
        Pillar::Contagion,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Pillar::Valuation => "Valuation Stress",
            Pillar::Credit => "Credit & Banking",
            Pillar::Volatility => "Volatility",
            Pillar::Sentiment => "Sentiment",
            Pillar::Structure => "Market Structure",
            Pillar::Macro => "Macro",
            Pillar::Liquidity => "Liquidity",
            Pillar::Contagion => "Global Contagion",
        }
    }

    /// Default relative weight; the eight sum to 100.
    pub fn default_weight(self) -> f64 {
        match self {
            Pillar::Valuation => 12.5,
            Pillar::Credit => 15.0,
            Pillar::Volatility => 15.0,
            Pillar::Sentiment => 12.5,
            Pillar::Structure => 12.5,
            Pillar::Macro => 15.0,
            Pillar::Liquidity => 10.0,
            Pillar::Contagion => 7.5,
        }
    }
}

/// Severity band of a 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Low,
    Normal,
    Elevated,
    High,
    Extreme,
}

impl Status {
    pub fn from_score(score: f64) -> Self {
        if score < 25.0 {
            Status::Low
        } else if score < 45.0 {
            Status::Normal
        } else if score < 65.0 {
            Status::Elevated
        } else if score < 80.0 {
            Status::High
        } else {
            Status::Extreme
        }
    }
}

/// Which reading(s) feed a descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    Raw(RawIndicator),
    /// First reading minus second.
    Spread(RawIndicator, RawIndicator),
    /// Reading divided by a constant.
    Scaled(RawIndicator, f64),
}

impl Input {
    pub fn resolve(&self, readings: &IndicatorReadings) -> Option<f64> {
        match *self {
            Input::Raw(ind) => readings.get(ind),
            Input::Spread(a, b) => Some(readings.get(a)? - readings.get(b)?),
            Input::Scaled(ind, divisor) => readings.get(ind).map(|v| v / divisor),
        }
    }
}

/// Mapping from an input value to an unclamped stress score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    /// Position within `[min, max]`, clamped, optionally inverted, rounded.
    Linear { min: f64, max: f64, invert: bool },
    Nfci,
    Stlfsi,
    VixTermStructure,
    Skew,
    FearGreed,
    PutCall,
    /// Percent of stocks above a moving average.
    Breadth,
    NewHighsLows,
    /// Also used for the 10y-3m curve.
    YieldCurve,
    Lei,
    IsmPmi,
    M2Growth,
    FedBalance,
    BtcDrawdown,
}

impl Rule {
    const fn linear(min: f64, max: f64) -> Self {
        Rule::Linear {
            min,
            max,
            invert: false,
        }
    }

    pub fn raw_score(&self, v: f64) -> f64 {
        match *self {
            Rule::Linear { min, max, invert } => {
                let mut normalized = ((v - min) / (max - min)).clamp(0.0, 1.0);
                if invert {
                    normalized = 1.0 - normalized;
                }
                (normalized * 100.0).round()
            }
            Rule::Nfci => (v + 1.0) * 50.0,
            Rule::Stlfsi => (v + 2.0) * 20.0,
            Rule::VixTermStructure => {
                if v > 0.0 {
                    (50.0 + v * 10.0).min(100.0)
                } else {
                    (50.0 + v * 5.0).max(0.0)
                }
            }
            Rule::Skew => {
                if v > 130.0 {
                    70.0 + (v - 130.0)
                } else if v > 120.0 {
                    50.0
                } else {
                    30.0
                }
            }
            // Greed is fragile; fear is scored low as a contrarian signal.
            Rule::FearGreed => {
                if v > 50.0 {
                    (v - 50.0) / 50.0 * 100.0
                } else {
                    (50.0 - v) / 50.0 * 30.0
                }
            }
            Rule::PutCall => {
                if v < 0.7 {
                    70.0 + (0.7 - v) * 100.0
                } else if v > 1.0 {
                    30.0 - (v - 1.0) * 30.0
                } else {
                    50.0
                }
            }
            Rule::Breadth => 100.0 - v,
            Rule::NewHighsLows => {
                if v < 0.0 {
                    60.0 + v.abs() * 2.0
                } else {
                    40.0 - v
                }
            }
            Rule::YieldCurve => {
                if v < 0.0 {
                    70.0 + v.abs() * 30.0
                } else if v > 1.0 {
                    20.0
                } else {
                    50.0 - v * 30.0
                }
            }
            Rule::Lei => {
                if v < 0.0 {
                    60.0 + v.abs() * 10.0
                } else {
                    40.0 - v * 5.0
                }
            }
            Rule::IsmPmi => {
                if v < 50.0 {
                    60.0 + (50.0 - v) * 2.0
                } else {
                    30.0 - (v - 50.0) * 0.5
                }
            }
            Rule::M2Growth => {
                if v < 0.0 {
                    70.0 + v.abs() * 3.0
                } else {
                    40.0 - v * 2.0
                }
            }
            Rule::FedBalance => {
                if v < -5.0 {
                    70.0 + v.abs()
                } else {
                    40.0
                }
            }
            Rule::BtcDrawdown => {
                if v > 30.0 {
                    50.0 + v
                } else {
                    30.0
                }
            }
        }
    }

    /// Final indicator score: clamped to [0, 100] and rounded.
    pub fn score(&self, v: f64) -> f64 {
        self.raw_score(v).clamp(0.0, 100.0).round()
    }
}

/// One scored indicator: where its input comes from and how it is judged.
#[derive(Debug, Clone, Copy)]
pub struct Descriptor {
    pub key: &'static str,
    pub pillar: Pillar,
    pub source: Option<&'static str>,
    pub input: Input,
    pub rule: Rule,
    pub describe: fn(f64) -> String,
}

fn signed(v: f64) -> &'static str {
    if v > 0.0 {
        "+"
    } else {
        ""
    }
}

const fn raw(
    key: &'static str,
    pillar: Pillar,
    source: &'static str,
    input: RawIndicator,
    rule: Rule,
    describe: fn(f64) -> String,
) -> Descriptor {
    Descriptor {
        key,
        pillar,
        source: Some(source),
        input: Input::Raw(input),
        rule,
        describe,
    }
}

/// Scored indicators in pillar order, then display order within a pillar.
#[rustfmt::skip]
pub static DESCRIPTORS: &[Descriptor] = &[
    // Valuation
    raw("buffettIndicator", Pillar::Valuation, "fred", RawIndicator::BuffettIndicator,
        Rule::linear(50.0, 200.0), |v| format!("Buffett Indicator at {}% (avg: 100%)", v)),
    raw("shillerCape", Pillar::Valuation, "multpl", RawIndicator::ShillerCape,
        Rule::linear(10.0, 45.0), |v| format!("CAPE ratio at {:.1} (avg: 17)", v)),
    raw("priceToSales", Pillar::Valuation, "yahoo", RawIndicator::PriceToSales,
        Rule::linear(0.8, 3.0), |v| format!("S&P Price/Sales at {:.2}", v)),
    // Credit & banking
    raw("hySpread", Pillar::Credit, "fred", RawIndicator::HySpread,
        Rule::linear(200.0, 2000.0), |v| format!("High Yield spread: {:.0}bp", v)),
    raw("igSpread", Pillar::Credit, "fred", RawIndicator::IgSpread,
        Rule::linear(50.0, 400.0), |v| format!("Investment Grade spread: {:.0}bp", v)),
    raw("bbSpread", Pillar::Credit, "fred", RawIndicator::BbSpread,
        Rule::linear(150.0, 1200.0), |v| format!("BB spread: {:.0}bp", v)),
    raw("cccSpread", Pillar::Credit, "fred", RawIndicator::CccSpread,
        Rule::linear(500.0, 3500.0), |v| format!("CCC/Junk spread: {:.0}bp (distress indicator)", v)),
    raw("emSpread", Pillar::Credit, "fred", RawIndicator::EmSpread,
        Rule::linear(200.0, 1200.0), |v| format!("Emerging Market spread: {:.0}bp", v)),
    raw("tedSpread", Pillar::Credit, "fred", RawIndicator::TedSpread,
        Rule::linear(10.0, 400.0), |v| format!("TED Spread: {:.0}bp (interbank stress)", v)),
    raw("cpSpread", Pillar::Credit, "fred", RawIndicator::CpSpread,
        Rule::linear(0.0, 200.0), |v| format!("Commercial paper spread: {:.0}bp", v)),
    raw("nfci", Pillar::Credit, "fred", RawIndicator::Nfci, Rule::Nfci, |v| {
        if v > 0.0 {
            format!("Financial conditions TIGHTENING ({:.2})", v)
        } else {
            format!("Financial conditions loose ({:.2})", v)
        }
    }),
    raw("stlfsi", Pillar::Credit, "fred", RawIndicator::Stlfsi, Rule::Stlfsi,
        |v| format!("St. Louis Financial Stress: {:.2}", v)),
    // Volatility
    raw("vix", Pillar::Volatility, "yahoo", RawIndicator::Vix,
        Rule::linear(10.0, 80.0), |v| format!("VIX at {:.1} (avg: 18)", v)),
    Descriptor {
        key: "vixTermStructure",
        pillar: Pillar::Volatility,
        source: Some("yahoo"),
        input: Input::Spread(RawIndicator::Vix, RawIndicator::Vix3m),
        rule: Rule::VixTermStructure,
        describe: |v| {
            if v > 0.0 {
                "VIX in BACKWARDATION (fear spike)".to_string()
            } else {
                "VIX in contango (normal)".to_string()
            }
        },
    },
    raw("vvix", Pillar::Volatility, "yahoo", RawIndicator::Vvix,
        Rule::linear(70.0, 180.0), |v| format!("VVIX (vol of vol) at {:.0}", v)),
    raw("moveIndex", Pillar::Volatility, "yahoo", RawIndicator::MoveIndex,
        Rule::linear(50.0, 200.0), |v| format!("MOVE (bond vol) at {:.0}", v)),
    raw("skew", Pillar::Volatility, "yahoo", RawIndicator::SkewIndex, Rule::Skew,
        |v| format!("SKEW at {:.0} (tail risk premium)", v)),
    // Sentiment
    raw("fearGreed", Pillar::Sentiment, "cnn", RawIndicator::FearGreedIndex, Rule::FearGreed, |v| {
        if v > 75.0 {
            "EXTREME GREED (complacency)".to_string()
        } else if v < 25.0 {
            "Extreme Fear (contrarian bullish)".to_string()
        } else {
            "Neutral sentiment".to_string()
        }
    }),
    raw("putCallRatio", Pillar::Sentiment, "cboe", RawIndicator::PutCallRatio, Rule::PutCall, |v| {
        if v < 0.65 {
            "LOW put/call (extreme complacency)".to_string()
        } else if v > 1.0 {
            "High put/call (fear/hedging)".to_string()
        } else {
            "Normal hedging activity".to_string()
        }
    }),
    raw("aaiiBullBear", Pillar::Sentiment, "aaii", RawIndicator::AaiiNetBull,
        Rule::linear(-30.0, 30.0), |v| format!("AAII Bull-Bear spread: {}{:.0}%", signed(v), v)),
    // Structure
    raw("concentration", Pillar::Structure, "calculated", RawIndicator::Top10Concentration,
        Rule::linear(15.0, 40.0), |v| format!("Top 10 = {}% of S&P (avg: 22%)", v)),
    raw("breadth200", Pillar::Structure, "yahoo", RawIndicator::PercentAbove200dma, Rule::Breadth,
        |v| format!("{}% above 200-day MA", v)),
    raw("breadth50", Pillar::Structure, "yahoo", RawIndicator::PercentAbove50dma, Rule::Breadth,
        |v| format!("{}% above 50-day MA", v)),
    raw("newHighsLows", Pillar::Structure, "nyse", RawIndicator::NewHighsNewLows, Rule::NewHighsLows, |v| {
        if v < 0.0 {
            format!("More new lows than highs ({})", v)
        } else {
            format!("Net new highs: {}", v)
        }
    }),
    // Macro
    raw("yieldCurve", Pillar::Macro, "fred", RawIndicator::YieldCurve10y2y, Rule::YieldCurve, |v| {
        if v < 0.0 {
            format!("Yield curve INVERTED ({:.2}%) - recession warning", v)
        } else {
            format!("Yield curve: {:.2}%", v)
        }
    }),
    raw("yieldCurve10y3m", Pillar::Macro, "fred", RawIndicator::YieldCurve10y3m, Rule::YieldCurve, |v| {
        if v < 0.0 {
            format!("10y-3m curve INVERTED ({:.2}%) - recession warning", v)
        } else {
            format!("10y-3m curve: {:.2}%", v)
        }
    }),
    raw("lei", Pillar::Macro, "fred", RawIndicator::Lei, Rule::Lei, |v| {
        if v < 0.0 {
            format!("Leading indicators NEGATIVE ({:.1}%)", v)
        } else {
            format!("Leading indicators: +{:.1}%", v)
        }
    }),
    raw("consumerSentiment", Pillar::Macro, "fred", RawIndicator::ConsumerSentiment,
        Rule::Linear { min: 50.0, max: 110.0, invert: true },
        |v| format!("Consumer Sentiment: {:.0}", v)),
    Descriptor {
        key: "joblessClaims",
        pillar: Pillar::Macro,
        source: Some("fred"),
        input: Input::Scaled(RawIndicator::InitialClaims, 1000.0),
        rule: Rule::linear(200.0, 600.0),
        describe: |v| format!("Initial Claims: {:.0}K", v),
    },
    raw("ismPmi", Pillar::Macro, "ism", RawIndicator::IsmPmi, Rule::IsmPmi, |v| {
        if v < 50.0 {
            format!("ISM PMI CONTRACTING ({:.0})", v)
        } else {
            format!("ISM PMI: {:.0}", v)
        }
    }),
    // Liquidity
    raw("m2Growth", Pillar::Liquidity, "fred", RawIndicator::M2Growth, Rule::M2Growth, |v| {
        if v < 0.0 {
            format!("M2 CONTRACTING ({:.1}%)", v)
        } else {
            format!("M2 growth: {:.1}%", v)
        }
    }),
    raw("fedBalance", Pillar::Liquidity, "fred", RawIndicator::FedBalanceSheetGrowth, Rule::FedBalance, |v| {
        if v < 0.0 {
            "Fed balance sheet shrinking (QT)".to_string()
        } else {
            format!("Fed balance sheet: +{:.1}%", v)
        }
    }),
    // Global contagion
    raw("dollarStrength", Pillar::Contagion, "fred", RawIndicator::DollarIndex,
        Rule::linear(80.0, 120.0), |v| {
            if v > 105.0 {
                format!("Dollar Index: {:.1} (strong - EM stress)", v)
            } else {
                format!("Dollar Index: {:.1}", v)
            }
        }),
    raw("cryptoStress", Pillar::Contagion, "calculated", RawIndicator::BtcDrawdown, Rule::BtcDrawdown, |v| {
        if v > 40.0 {
            format!("Bitcoin -{}% (crypto contagion risk)", v)
        } else {
            format!("BTC drawdown: {}%", v)
        }
    }),
];

/// Descriptor by output key.
pub fn descriptor(key: &str) -> Option<&'static Descriptor> {
    DESCRIPTORS.iter().find(|d| d.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_match_serde() {
        for ind in RawIndicator::ALL {
            let json = serde_json::to_string(&ind).unwrap();
            assert_eq!(json, format!("\"{}\"", ind.name()));
            assert_eq!(ind.name().parse::<RawIndicator>().unwrap(), ind);
        }
    }

    #[test]
    fn test_from_named_skips_unknown_and_non_finite() {
        let readings = IndicatorReadings::from_named([
            ("vix", 20.0),
            ("notAnIndicator", 1.0),
            ("hySpread", f64::NAN),
        ]);
        assert_eq!(readings.len(), 1);
        assert_eq!(readings.get(RawIndicator::Vix), Some(20.0));

        let json: IndicatorReadings =
            serde_json::from_str(r#"{"vix":18.5,"shillerCape":36.2,"unknownThing":3}"#).unwrap();
        assert_eq!(json.len(), 2);
        assert_eq!(json.get(RawIndicator::ShillerCape), Some(36.2));
    }

    #[test]
    fn test_linear_rule() {
        let rule = Rule::linear(10.0, 80.0);
        assert_eq!(rule.score(45.0), 50.0);
        assert_eq!(rule.score(5.0), 0.0);
        assert_eq!(rule.score(120.0), 100.0);

        let inverted = Rule::Linear { min: 50.0, max: 110.0, invert: true };
        assert_eq!(inverted.score(110.0), 0.0);
        assert_eq!(inverted.score(50.0), 100.0);
    }

    #[test]
    fn test_custom_rules() {
        assert_eq!(Rule::YieldCurve.score(-0.5), 85.0);
        assert_eq!(Rule::YieldCurve.score(1.5), 20.0);
        assert_eq!(Rule::YieldCurve.score(0.5), 35.0);
        assert_eq!(Rule::FearGreed.score(90.0), 80.0);
        assert_eq!(Rule::FearGreed.score(10.0), 24.0);
        assert_eq!(Rule::VixTermStructure.score(3.0), 80.0);
        assert_eq!(Rule::VixTermStructure.score(-4.0), 30.0);
        assert_eq!(Rule::Skew.score(145.0), 85.0);
        assert_eq!(Rule::Skew.score(200.0), 100.0);
        assert_eq!(Rule::PutCall.score(0.5), 90.0);
        assert_eq!(Rule::PutCall.score(1.2), 24.0);
        assert_eq!(Rule::BtcDrawdown.score(60.0), 100.0);
        assert_eq!(Rule::FedBalance.score(-10.0), 80.0);
        assert_eq!(Rule::Nfci.score(-2.0), 0.0);
    }

    #[test]
    fn test_spread_and_scaled_inputs() {
        let readings = IndicatorReadings::new()
            .with(RawIndicator::Vix, 30.0)
            .with(RawIndicator::Vix3m, 25.0)
            .with(RawIndicator::InitialClaims, 400_000.0);
        let term = descriptor("vixTermStructure").unwrap();
        assert_eq!(term.input.resolve(&readings), Some(5.0));
        let claims = descriptor("joblessClaims").unwrap();
        assert_eq!(claims.input.resolve(&readings), Some(400.0));
        assert_eq!(claims.rule.score(400.0), 50.0);

        let without_3m = IndicatorReadings::new().with(RawIndicator::Vix, 30.0);
        assert_eq!(term.input.resolve(&without_3m), None);
    }

    #[test]
    fn test_descriptions() {
        let aaii = descriptor("aaiiBullBear").unwrap();
        assert_eq!((aaii.describe)(12.0), "AAII Bull-Bear spread: +12%");
        assert_eq!((aaii.describe)(-8.0), "AAII Bull-Bear spread: -8%");
        let dollar = descriptor("dollarStrength").unwrap();
        assert_eq!((dollar.describe)(108.0), "Dollar Index: 108.0 (strong - EM stress)");
        let buffett = descriptor("buffettIndicator").unwrap();
        assert_eq!((buffett.describe)(185.0), "Buffett Indicator at 185% (avg: 100%)");
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(Status::from_score(24.0), Status::Low);
        assert_eq!(Status::from_score(25.0), Status::Normal);
        assert_eq!(Status::from_score(64.0), Status::Elevated);
        assert_eq!(Status::from_score(79.0), Status::High);
        assert_eq!(Status::from_score(80.0), Status::Extreme);
    }

    #[test]
    fn test_pillar_weights_sum_to_100() {
        let total: f64 = Pillar::ALL.iter().map(|p| p.default_weight()).sum();
        assert!((total - 100.0).abs() < 1e-10);
    }
}
