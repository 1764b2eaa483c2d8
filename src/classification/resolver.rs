//! Category and ticker resolution.

use tracing::trace;

use super::taxonomy::{
    CategoryTable, Classification, MatchKind, PrimaryClass, SecondaryClass, TickerOverrides,
};
use crate::core::traits::ClassificationMetadata;
use crate::core::types::{AllocationHint, Instrument};

/// Everything the resolver may look at. All fields are optional.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassificationInput<'a> {
    pub ticker: Option<&'a str>,
    pub category: Option<&'a str>,
    pub allocation: Option<&'a AllocationHint>,
}

impl<'a> ClassificationInput<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ticker(mut self, ticker: &'a str) -> Self {
        self.ticker = Some(ticker);
        self
    }

    pub fn with_category(mut self, category: &'a str) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_allocation(mut self, allocation: &'a AllocationHint) -> Self {
        self.allocation = Some(allocation);
        self
    }
}

/// Maps raw categories, tickers and allocation hints to a classification.
///
/// Resolution order:
/// 1. ticker override table
/// 2. exact category match
/// 3. containment match against the category table
/// 4. keyword cascade
/// 5. allocation heuristics when no category is supplied
///
/// `classify` is total: every input, including an empty one, yields exactly
/// one primary class.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    categories: CategoryTable,
    overrides: TickerOverrides,
}

impl Resolver {
    pub fn new(categories: CategoryTable, overrides: TickerOverrides) -> Self {
        Self {
            categories,
            overrides,
        }
    }

    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    pub fn overrides(&self) -> &TickerOverrides {
        &self.overrides
    }

    pub fn classify(&self, input: &ClassificationInput<'_>) -> Classification {
        if let Some(template) = input.ticker.and_then(|t| self.overrides.get(t)) {
            trace!(ticker = ?input.ticker, "ticker override");
            return Classification::from_template(
                template,
                input.category,
                MatchKind::TickerOverride,
            );
        }

        let normalized = input
            .category
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty());

        match normalized {
            Some(normalized) => self.by_category(input.category, &normalized),
            None => match input.allocation {
                Some(hint) => by_allocation(hint),
                None => Classification::simple(
                    PrimaryClass::Other,
                    None,
                    "Unknown",
                    input.category,
                    MatchKind::Unknown,
                ),
            },
        }
    }

    /// Classify a bare category string.
    pub fn classify_category(&self, category: Option<&str>) -> Classification {
        self.classify(&ClassificationInput {
            category,
            ..Default::default()
        })
    }

    /// Classify an instrument from its ticker, category and allocation detail.
    pub fn classify_instrument(&self, instrument: &Instrument) -> Classification {
        let allocation = instrument
            .detail
            .as_ref()
            .and_then(|d| d.allocation.as_ref());
        self.classify(&ClassificationInput {
            ticker: Some(instrument.ticker.as_str()),
            category: instrument.category.as_deref(),
            allocation,
        })
    }

    /// Classify a ticker, pulling its category and allocation from a
    /// metadata provider. Unknown tickers resolve through the override table
    /// or fall through to `Other`.
    pub fn classify_ticker<M>(&self, ticker: &str, provider: &M) -> Classification
    where
        M: ClassificationMetadata + ?Sized,
    {
        let metadata = provider.metadata(ticker);
        let (category, allocation) = match &metadata {
            Some(m) => (m.category.as_deref(), m.allocation.as_ref()),
            None => (None, None),
        };
        self.classify(&ClassificationInput {
            ticker: Some(ticker),
            category,
            allocation,
        })
    }

    fn by_category(&self, raw: Option<&str>, normalized: &str) -> Classification {
        if let Some(entry) = self.categories.exact(normalized) {
            trace!(category = normalized, "exact category match");
            return Classification::from_template(&entry.class, raw, MatchKind::ExactCategory);
        }
        if let Some(entry) = self.categories.fuzzy(normalized) {
            trace!(category = normalized, key = %entry.key, "containment match");
            return Classification::from_template(&entry.class, raw, MatchKind::FuzzyCategory);
        }
        keyword_cascade(raw, normalized)
    }
}

fn keyword_cascade(raw: Option<&str>, c: &str) -> Classification {
    use PrimaryClass::*;

    let has = |needle: &str| c.contains(needle);
    let (primary, secondary, description) = if has("money market") || has("cash") {
        (Cash, Some(SecondaryClass::MoneyMarket), "Money Market")
    } else if has("bond") || has("fixed") || has("income") {
        (FixedIncome, None, "Fixed Income")
    } else if has("crypto") || has("bitcoin") || has("digital") {
        (Crypto, None, "Cryptocurrency")
    } else if has("real estate") || has("reit") {
        (RealAssets, Some(SecondaryClass::Reit), "Real Estate")
    } else if has("commodit") {
        (RealAssets, Some(SecondaryClass::Commodities), "Commodities")
    } else if has("world") || has("global") {
        (GlobalEquity, None, "Global Equity")
    } else if has("foreign") || has("international") || has("emerging") {
        (IntlEquity, None, "International Equity")
    } else if has("target") && has("date") {
        (Alternatives, None, "Target-Date Fund")
    } else if has("allocation") {
        (Alternatives, None, "Allocation Fund")
    } else if has("stock") || has("equity") {
        (UsEquity, None, "US Equity")
    } else {
        return Classification::simple(Other, None, "Other", raw, MatchKind::Unknown);
    };
    Classification::simple(primary, secondary, description, raw, MatchKind::Keyword)
}

fn by_allocation(hint: &AllocationHint) -> Classification {
    use PrimaryClass::*;

    let pct = |v: Option<f64>| v.filter(|x| x.is_finite()).unwrap_or(0.0);
    let international = hint.geography.map_or(false, |g| {
        pct(g.us) < 50.0 && pct(g.developed) + pct(g.emerging) > 40.0
    });

    let (primary, secondary, description) = if pct(hint.cash) > 80.0 {
        (Cash, Some(SecondaryClass::MoneyMarket), "Cash")
    } else if pct(hint.bonds) > 50.0 {
        (FixedIncome, None, "Fixed Income")
    } else if international {
        (IntlEquity, None, "International Equity")
    } else if pct(hint.stocks) > 50.0 {
        (UsEquity, None, "US Equity")
    } else {
        return Classification::simple(Other, None, "Other", None, MatchKind::Unknown);
    };
    Classification::simple(
        primary,
        secondary,
        description,
        None,
        MatchKind::AllocationHeuristic,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::GeographyBreakdown;

    fn resolver() -> Resolver {
        Resolver::default()
    }

    #[test]
    fn test_exact_match_is_case_and_space_insensitive() {
        let c = resolver().classify_category(Some("  Large Blend "));
        assert_eq!(c.primary, PrimaryClass::UsEquity);
        assert_eq!(c.secondary, Some(SecondaryClass::LargeCap));
        assert_eq!(c.matched_by, MatchKind::ExactCategory);
        assert_eq!(c.source_category.as_deref(), Some("  Large Blend "));
    }

    #[test]
    fn test_keyword_cascade_order() {
        let r = resolver();
        // "income" wins over "equity" because bonds are checked first.
        let c = r.classify_category(Some("Equity Income Plus"));
        assert_eq!(c.primary, PrimaryClass::FixedIncome);
        assert_eq!(c.matched_by, MatchKind::Keyword);

        let c = r.classify_category(Some("Frontier REIT strategies"));
        assert_eq!(c.primary, PrimaryClass::RealAssets);
        assert_eq!(c.secondary, Some(SecondaryClass::Reit));

        let c = r.classify_category(Some("Target Maturity 2045 Date"));
        assert_eq!(c.description, "Target-Date Fund");
    }

    #[test]
    fn test_unmatched_category_is_other() {
        let c = resolver().classify_category(Some("zzqx"));
        assert_eq!(c.primary, PrimaryClass::Other);
        assert_eq!(c.matched_by, MatchKind::Unknown);
    }

    #[test]
    fn test_blank_category_uses_allocation() {
        let hint = AllocationHint {
            stocks: Some(95.0),
            bonds: Some(0.0),
            cash: Some(5.0),
            other: None,
            geography: Some(GeographyBreakdown {
                us: Some(30.0),
                developed: Some(50.0),
                emerging: Some(20.0),
            }),
        };
        let input = ClassificationInput::new()
            .with_category("   ")
            .with_allocation(&hint);
        let c = resolver().classify(&input);
        assert_eq!(c.primary, PrimaryClass::IntlEquity);
        assert_eq!(c.matched_by, MatchKind::AllocationHeuristic);
    }

    #[test]
    fn test_allocation_heuristic_order() {
        let cash = AllocationHint {
            cash: Some(90.0),
            bonds: Some(60.0),
            ..Default::default()
        };
        assert_eq!(by_allocation(&cash).primary, PrimaryClass::Cash);

        let bonds = AllocationHint {
            bonds: Some(70.0),
            stocks: Some(30.0),
            ..Default::default()
        };
        assert_eq!(by_allocation(&bonds).primary, PrimaryClass::FixedIncome);

        let stocks = AllocationHint {
            stocks: Some(99.0),
            ..Default::default()
        };
        assert_eq!(by_allocation(&stocks).primary, PrimaryClass::UsEquity);

        assert_eq!(by_allocation(&AllocationHint::default()).primary, PrimaryClass::Other);
    }

    #[test]
    fn test_ticker_override_bypasses_category() {
        let input = ClassificationInput::new()
            .with_ticker("ibit")
            .with_category("Large Growth");
        let c = resolver().classify(&input);
        assert_eq!(c.primary, PrimaryClass::Crypto);
        assert_eq!(c.matched_by, MatchKind::TickerOverride);
    }

    #[test]
    fn test_empty_input_is_unknown_other() {
        let c = resolver().classify(&ClassificationInput::new());
        assert_eq!(c.primary, PrimaryClass::Other);
        assert_eq!(c.description, "Unknown");
    }
}
