//! Core data types for foliocore.
//!
//! Units used throughout the crate:
//! - returns, volatilities and shocks are percentages (`7.0` is 7%)
//! - expense ratios are fractions (`0.0003` is 0.03%)
//! - AUM is in currency units

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{FolioError, Result};

/// Canonical asset class used by the metrics, scoring and stress engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AssetClass {
    #[serde(rename = "US Equity")]
    UsEquity,
    #[serde(rename = "Intl Developed")]
    IntlDeveloped,
    #[serde(rename = "Emerging Markets")]
    EmergingMarkets,
    #[serde(rename = "US Bonds")]
    UsBonds,
    #[serde(rename = "International Bonds")]
    IntlBonds,
    #[serde(rename = "Cash")]
    Cash,
    #[serde(rename = "Crypto")]
    Crypto,
    #[serde(rename = "Real Assets")]
    RealAssets,
    #[serde(rename = "Alternatives")]
    Alternatives,
}

impl AssetClass {
    /// Every asset class, in canonical order.
    pub const ALL: [AssetClass; 9] = [
        AssetClass::UsEquity,
        AssetClass::IntlDeveloped,
        AssetClass::EmergingMarkets,
        AssetClass::UsBonds,
        AssetClass::IntlBonds,
        AssetClass::Cash,
        AssetClass::Crypto,
        AssetClass::RealAssets,
        AssetClass::Alternatives,
    ];

    /// Display label, identical to the serialized form.
    pub fn label(self) -> &'static str {
        match self {
            AssetClass::UsEquity => "US Equity",
            AssetClass::IntlDeveloped => "Intl Developed",
            AssetClass::EmergingMarkets => "Emerging Markets",
            AssetClass::UsBonds => "US Bonds",
            AssetClass::IntlBonds => "International Bonds",
            AssetClass::Cash => "Cash",
            AssetClass::Crypto => "Crypto",
            AssetClass::RealAssets => "Real Assets",
            AssetClass::Alternatives => "Alternatives",
        }
    }

    /// Whether the class is an equity sleeve.
    pub fn is_equity(self) -> bool {
        matches!(
            self,
            AssetClass::UsEquity | AssetClass::IntlDeveloped | AssetClass::EmergingMarkets
        )
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AssetClass {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        AssetClass::ALL
            .iter()
            .copied()
            .find(|ac| ac.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| FolioError::invalid_parameter(format!("Unknown asset class: {}", s)))
    }
}

/// Instrument type as reported by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentType {
    Fund,
    Etf,
    Equity,
    Crypto,
    CashEquivalent,
}

impl Default for InstrumentType {
    fn default() -> Self {
        InstrumentType::Fund
    }
}

/// Trailing annualized returns in percent. Any horizon may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrailingReturns {
    pub one_year: Option<f64>,
    pub three_year: Option<f64>,
    pub five_year: Option<f64>,
    pub ten_year: Option<f64>,
}

impl TrailingReturns {
    /// Returns present at each horizon, shortest first.
    pub fn available(&self) -> Vec<f64> {
        [self.one_year, self.three_year, self.five_year, self.ten_year]
            .into_iter()
            .flatten()
            .filter(|r| r.is_finite())
            .collect()
    }
}

/// Geographic exposure percentages of a fund.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeographyBreakdown {
    pub us: Option<f64>,
    pub developed: Option<f64>,
    pub emerging: Option<f64>,
}

/// Asset-allocation percentages of a fund, used when no category is known.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationHint {
    pub stocks: Option<f64>,
    pub bonds: Option<f64>,
    pub cash: Option<f64>,
    pub other: Option<f64>,
    pub geography: Option<GeographyBreakdown>,
}

/// Optional classification detail attached to an instrument.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationDetail {
    pub star_rating: Option<u8>,
    pub risk_rating: Option<String>,
    pub style: Option<String>,
    pub allocation: Option<AllocationHint>,
}

/// A candidate instrument supplied by the catalog for a single request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub ticker: String,
    pub name: String,
    #[serde(default)]
    pub instrument_type: InstrumentType,
    pub category: Option<String>,
    #[serde(default)]
    pub returns: TrailingReturns,
    /// 3-year annualized standard deviation in percent.
    pub volatility_3yr: Option<f64>,
    pub sharpe_ratio: Option<f64>,
    /// Expense ratio as a fraction.
    pub expense_ratio: Option<f64>,
    pub aum: Option<f64>,
    pub detail: Option<ClassificationDetail>,
}

impl Instrument {
    /// Create an instrument with only its identity filled in.
    pub fn new(ticker: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_type(mut self, instrument_type: InstrumentType) -> Self {
        self.instrument_type = instrument_type;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_returns(mut self, returns: TrailingReturns) -> Self {
        self.returns = returns;
        self
    }

    pub fn with_volatility(mut self, volatility_3yr: f64) -> Self {
        self.volatility_3yr = Some(volatility_3yr);
        self
    }

    pub fn with_sharpe(mut self, sharpe_ratio: f64) -> Self {
        self.sharpe_ratio = Some(sharpe_ratio);
        self
    }

    pub fn with_expense_ratio(mut self, expense_ratio: f64) -> Self {
        self.expense_ratio = Some(expense_ratio);
        self
    }

    pub fn with_aum(mut self, aum: f64) -> Self {
        self.aum = Some(aum);
        self
    }

    pub fn with_detail(mut self, detail: ClassificationDetail) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// A selected instrument carrying part of a portfolio's weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub ticker: String,
    pub asset_class: AssetClass,
    /// Fraction of the portfolio.
    pub weight: f64,
    pub expense_ratio: Option<f64>,
    pub category: Option<String>,
}

impl Holding {
    pub fn new(ticker: impl Into<String>, asset_class: AssetClass, weight: f64) -> Self {
        Self {
            ticker: ticker.into(),
            asset_class,
            weight,
            expense_ratio: None,
            category: None,
        }
    }

    pub fn with_expense_ratio(mut self, expense_ratio: f64) -> Self {
        self.expense_ratio = Some(expense_ratio);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Portfolio weights per asset class.
///
/// Every fraction is finite and non-negative. The total is not forced to 1;
/// use [`WeightVector::normalized`] when a unit total is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<AssetClass, f64>", into = "BTreeMap<AssetClass, f64>")]
pub struct WeightVector {
    weights: BTreeMap<AssetClass, f64>,
}

impl WeightVector {
    /// Build a weight vector, rejecting negative or non-finite fractions.
    pub fn new(weights: BTreeMap<AssetClass, f64>) -> Result<Self> {
        for (asset_class, &weight) in &weights {
            if !weight.is_finite() {
                return Err(FolioError::non_finite(format!("weight of {}", asset_class)));
            }
            if weight < 0.0 {
                return Err(FolioError::negative_weight(asset_class.label(), weight));
            }
        }
        Ok(Self { weights })
    }

    /// Build from `(class, fraction)` pairs. Repeated classes are summed.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (AssetClass, f64)>,
    {
        let mut weights = BTreeMap::new();
        for (asset_class, weight) in pairs {
            if !weight.is_finite() {
                return Err(FolioError::non_finite(format!("weight of {}", asset_class)));
            }
            if weight < 0.0 {
                return Err(FolioError::negative_weight(asset_class.label(), weight));
            }
            *weights.entry(asset_class).or_insert(0.0) += weight;
        }
        Ok(Self { weights })
    }

    /// Aggregate holding weights per asset class.
    pub fn from_holdings(holdings: &[Holding]) -> Result<Self> {
        Self::from_pairs(holdings.iter().map(|h| (h.asset_class, h.weight)))
    }

    /// Weight of a class, zero when absent.
    #[inline]
    pub fn get(&self, asset_class: AssetClass) -> f64 {
        self.weights.get(&asset_class).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AssetClass, f64)> + '_ {
        self.weights.iter().map(|(ac, w)| (*ac, *w))
    }

    pub fn classes(&self) -> impl Iterator<Item = AssetClass> + '_ {
        self.weights.keys().copied()
    }

    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Rescale so the fractions sum to 1. A zero total is returned unchanged.
    pub fn normalized(&self) -> Self {
        let total = self.total();
        if total <= 0.0 {
            return self.clone();
        }
        Self {
            weights: self.weights.iter().map(|(ac, w)| (*ac, w / total)).collect(),
        }
    }
}

impl TryFrom<BTreeMap<AssetClass, f64>> for WeightVector {
    type Error = FolioError;

    fn try_from(weights: BTreeMap<AssetClass, f64>) -> Result<Self> {
        WeightVector::new(weights)
    }
}

impl From<WeightVector> for BTreeMap<AssetClass, f64> {
    fn from(vector: WeightVector) -> Self {
        vector.weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_class_round_trip_label() {
        for ac in AssetClass::ALL {
            assert_eq!(ac.label().parse::<AssetClass>().unwrap(), ac);
        }
        assert_eq!("us equity".parse::<AssetClass>().unwrap(), AssetClass::UsEquity);
        assert!("Bonds".parse::<AssetClass>().is_err());
    }

    #[test]
    fn test_weight_vector_rejects_negative() {
        let result = WeightVector::from_pairs([(AssetClass::UsEquity, -0.1)]);
        assert!(matches!(result, Err(FolioError::NegativeWeight { .. })));

        let result = WeightVector::from_pairs([(AssetClass::UsBonds, f64::INFINITY)]);
        assert!(matches!(result, Err(FolioError::NonFiniteInput { .. })));
    }

    #[test]
    fn test_weight_vector_does_not_force_unit_total() {
        let w = WeightVector::from_pairs([(AssetClass::UsEquity, 0.3), (AssetClass::UsBonds, 0.3)])
            .unwrap();
        assert!((w.total() - 0.6).abs() < 1e-12);

        let n = w.normalized();
        assert!((n.total() - 1.0).abs() < 1e-12);
        assert!((n.get(AssetClass::UsEquity) - 0.5).abs() < 1e-12);
        assert_eq!(n.get(AssetClass::Cash), 0.0);
    }

    #[test]
    fn test_weight_vector_from_holdings_aggregates() {
        let holdings = vec![
            Holding::new("VTI", AssetClass::UsEquity, 0.4),
            Holding::new("VOO", AssetClass::UsEquity, 0.2),
            Holding::new("BND", AssetClass::UsBonds, 0.4),
        ];
        let w = WeightVector::from_holdings(&holdings).unwrap();
        assert_eq!(w.len(), 2);
        assert!((w.get(AssetClass::UsEquity) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_weight_vector_json_validates() {
        let ok: WeightVector = serde_json::from_str(r#"{"US Equity":0.6,"US Bonds":0.4}"#).unwrap();
        assert!((ok.get(AssetClass::UsBonds) - 0.4).abs() < 1e-12);

        let bad = serde_json::from_str::<WeightVector>(r#"{"US Equity":-0.6}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_trailing_returns_available() {
        let r = TrailingReturns {
            one_year: Some(10.0),
            three_year: None,
            five_year: Some(8.0),
            ten_year: None,
        };
        assert_eq!(r.available(), vec![10.0, 8.0]);
    }
}
