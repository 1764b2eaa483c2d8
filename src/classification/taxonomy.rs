//! Classification taxonomy and the built-in category and ticker tables.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::types::AssetClass;

/// Top-level classification bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrimaryClass {
    UsEquity,
    IntlEquity,
    GlobalEquity,
    FixedIncome,
    Cash,
    Crypto,
    RealAssets,
    Alternatives,
    Other,
}

impl PrimaryClass {
    /// Presentation label.
    pub fn display_name(self) -> &'static str {
        match self {
            PrimaryClass::UsEquity => "US Stocks",
            PrimaryClass::IntlEquity => "International Stocks",
            PrimaryClass::GlobalEquity => "Global Stocks",
            PrimaryClass::FixedIncome => "Bonds",
            PrimaryClass::Cash => "Cash",
            PrimaryClass::Crypto => "Crypto",
            PrimaryClass::RealAssets => "Real Assets",
            PrimaryClass::Alternatives => "Alternatives",
            PrimaryClass::Other => "Other",
        }
    }
}

impl fmt::Display for PrimaryClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Finer-grained detail under a primary class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SecondaryClass {
    LargeCap,
    MidCap,
    SmallCap,
    Value,
    Blend,
    Growth,
    Developed,
    Emerging,
    Frontier,
    Corporate,
    Government,
    Municipal,
    HighYield,
    Tips,
    ShortTerm,
    Intermediate,
    LongTerm,
    MoneyMarket,
    UltraShort,
    Reit,
    Commodities,
    Infrastructure,
    Sector,
    Thematic,
}

/// Classification assigned by a table entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassTemplate {
    pub primary: PrimaryClass,
    pub secondary: Option<SecondaryClass>,
    pub description: String,
}

impl ClassTemplate {
    pub fn new(
        primary: PrimaryClass,
        secondary: Option<SecondaryClass>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            primary,
            secondary,
            description: description.into(),
        }
    }
}

/// How a classification was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    TickerOverride,
    ExactCategory,
    FuzzyCategory,
    Keyword,
    AllocationHeuristic,
    Unknown,
}

/// Resolver output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub primary: PrimaryClass,
    pub secondary: Option<SecondaryClass>,
    pub description: String,
    /// The raw category string, as supplied.
    pub source_category: Option<String>,
    pub matched_by: MatchKind,
}

impl Classification {
    pub(crate) fn from_template(
        template: &ClassTemplate,
        source_category: Option<&str>,
        matched_by: MatchKind,
    ) -> Self {
        Self {
            primary: template.primary,
            secondary: template.secondary,
            description: template.description.clone(),
            source_category: source_category.map(str::to_string),
            matched_by,
        }
    }

    pub(crate) fn simple(
        primary: PrimaryClass,
        secondary: Option<SecondaryClass>,
        description: &str,
        source_category: Option<&str>,
        matched_by: MatchKind,
    ) -> Self {
        Self {
            primary,
            secondary,
            description: description.to_string(),
            source_category: source_category.map(str::to_string),
            matched_by,
        }
    }

    /// Canonical asset class used for assumption and shock lookups.
    ///
    /// Emerging-market equity and bonds split off their own classes, and
    /// world bonds count as international. `Other` has no asset class.
    pub fn asset_class(&self) -> Option<AssetClass> {
        let emerging = self.secondary == Some(SecondaryClass::Emerging);
        match self.primary {
            PrimaryClass::UsEquity => Some(AssetClass::UsEquity),
            PrimaryClass::IntlEquity if emerging => Some(AssetClass::EmergingMarkets),
            PrimaryClass::IntlEquity | PrimaryClass::GlobalEquity => {
                Some(AssetClass::IntlDeveloped)
            }
            PrimaryClass::FixedIncome if emerging || self.description.starts_with("World") => {
                Some(AssetClass::IntlBonds)
            }
            PrimaryClass::FixedIncome => Some(AssetClass::UsBonds),
            PrimaryClass::Cash => Some(AssetClass::Cash),
            PrimaryClass::Crypto => Some(AssetClass::Crypto),
            PrimaryClass::RealAssets => Some(AssetClass::RealAssets),
            PrimaryClass::Alternatives => Some(AssetClass::Alternatives),
            PrimaryClass::Other => None,
        }
    }
}

/// One row of the category table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryEntry {
    /// Lowercase category key.
    pub key: String,
    #[serde(flatten)]
    pub class: ClassTemplate,
}

/// Ordered category table. Row order is the final fuzzy-match tie-break.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CategoryEntry>", into = "Vec<CategoryEntry>")]
pub struct CategoryTable {
    entries: Vec<CategoryEntry>,
}

impl CategoryTable {
    /// Build a table; keys are trimmed and lowercased.
    pub fn new(entries: Vec<CategoryEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|mut e| {
                e.key = e.key.trim().to_lowercase();
                e
            })
            .filter(|e| !e.key.is_empty())
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[CategoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry whose key equals the normalized category.
    pub fn exact(&self, normalized: &str) -> Option<&CategoryEntry> {
        self.entries.iter().find(|e| e.key == normalized)
    }

    /// Two-way containment match with a deterministic winner.
    ///
    /// Keys contained in the input are preferred, longest key first. Failing
    /// that, the shortest key containing the input wins. Equal lengths keep
    /// table order.
    pub fn fuzzy(&self, normalized: &str) -> Option<&CategoryEntry> {
        if normalized.is_empty() {
            return None;
        }
        let mut best: Option<&CategoryEntry> = None;
        for entry in &self.entries {
            if normalized.contains(entry.key.as_str()) {
                match best {
                    Some(b) if b.key.len() >= entry.key.len() => {}
                    _ => best = Some(entry),
                }
            }
        }
        best.or_else(|| {
            self.entries
                .iter()
                .enumerate()
                .filter(|(_, e)| e.key.contains(normalized))
                .min_by_key(|(i, e)| (e.key.len(), *i))
                .map(|(_, e)| e)
        })
    }
}

impl From<Vec<CategoryEntry>> for CategoryTable {
    fn from(entries: Vec<CategoryEntry>) -> Self {
        CategoryTable::new(entries)
    }
}

impl From<CategoryTable> for Vec<CategoryEntry> {
    fn from(table: CategoryTable) -> Self {
        table.entries
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        let entries = DEFAULT_CATEGORIES
            .iter()
            .map(|(key, primary, secondary, description)| CategoryEntry {
                key: (*key).to_string(),
                class: ClassTemplate::new(*primary, *secondary, *description),
            })
            .collect();
        Self { entries }
    }
}

/// Ticker-keyed classifications that bypass the category logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TickerOverrides {
    entries: BTreeMap<String, ClassTemplate>,
}

impl TickerOverrides {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Add or replace an override. Tickers are stored uppercase.
    pub fn insert(&mut self, ticker: &str, class: ClassTemplate) {
        self.entries.insert(ticker.trim().to_uppercase(), class);
    }

    pub fn with(mut self, ticker: &str, class: ClassTemplate) -> Self {
        self.insert(ticker, class);
        self
    }

    /// Case-insensitive lookup.
    pub fn get(&self, ticker: &str) -> Option<&ClassTemplate> {
        self.entries.get(&ticker.trim().to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TickerOverrides {
    fn default() -> Self {
        use PrimaryClass::*;
        use SecondaryClass::*;

        let mut overrides = TickerOverrides::new();
        for (ticker, name) in CASH_TICKERS {
            overrides.insert(ticker, ClassTemplate::new(Cash, Some(MoneyMarket), *name));
        }
        for (ticker, name) in MONEY_MARKET_TICKERS {
            overrides.insert(ticker, ClassTemplate::new(Cash, Some(MoneyMarket), *name));
        }
        for (ticker, name) in CRYPTO_TICKERS.iter().chain(CRYPTO_ETF_TICKERS) {
            overrides.insert(ticker, ClassTemplate::new(Crypto, None, *name));
        }
        for (ticker, name) in CRYPTO_EQUITY_TICKERS {
            overrides.insert(ticker, ClassTemplate::new(UsEquity, Some(Sector), *name));
        }
        overrides
    }
}

const CASH_TICKERS: &[(&str, &str)] = &[
    ("CASH", "Cash"),
    ("CASH-USD", "Cash (USD)"),
    ("USD", "US Dollar"),
];

const MONEY_MARKET_TICKERS: &[(&str, &str)] = &[
    ("SPAXX", "Fidelity Government Money Market"),
    ("FDRXX", "Fidelity Government Cash Reserves"),
    ("VMFXX", "Vanguard Federal Money Market"),
    ("VMMXX", "Vanguard Prime Money Market"),
    ("SWVXX", "Schwab Value Advantage Money"),
    ("SNVXX", "Schwab Government Money Fund"),
    ("SPRXX", "Fidelity Money Market"),
];

const CRYPTO_TICKERS: &[(&str, &str)] = &[
    ("BTC", "Bitcoin"),
    ("ETH", "Ethereum"),
    ("SOL", "Solana"),
    ("TAO", "Bittensor"),
    ("AVAX", "Avalanche"),
    ("LINK", "Chainlink"),
    ("DOT", "Polkadot"),
    ("ADA", "Cardano"),
    ("XRP", "Ripple XRP"),
    ("DOGE", "Dogecoin"),
    ("MATIC", "Polygon"),
    ("ATOM", "Cosmos"),
    ("UNI", "Uniswap"),
    ("LTC", "Litecoin"),
];

const CRYPTO_ETF_TICKERS: &[(&str, &str)] = &[
    ("IBIT", "iShares Bitcoin Trust"),
    ("FBTC", "Fidelity Wise Origin Bitcoin"),
    ("GBTC", "Grayscale Bitcoin Trust"),
    ("ARKB", "ARK 21Shares Bitcoin ETF"),
    ("BITB", "Bitwise Bitcoin ETF"),
    ("ETHE", "Grayscale Ethereum Trust"),
    ("TAOX", "Valour Bittensor ETP"),
];

// Miners and exchanges trade as equities even though they track crypto.
const CRYPTO_EQUITY_TICKERS: &[(&str, &str)] = &[
    ("MARA", "Marathon Digital Holdings"),
    ("RIOT", "Riot Platforms"),
    ("CIFR", "Cipher Mining"),
    ("IREN", "Iris Energy"),
    ("CLSK", "CleanSpark"),
    ("MSTR", "MicroStrategy"),
    ("COIN", "Coinbase Global"),
];

type CategoryRow = (&'static str, PrimaryClass, Option<SecondaryClass>, &'static str);

const DEFAULT_CATEGORIES: &[CategoryRow] = {
    use PrimaryClass::*;
    use SecondaryClass::*;
    &[
        // US equity: size and style
        ("large growth", UsEquity, Some(LargeCap), "US Large Cap Growth"),
        ("large blend", UsEquity, Some(LargeCap), "US Large Cap Blend"),
        ("large value", UsEquity, Some(LargeCap), "US Large Cap Value"),
        ("large-cap growth", UsEquity, Some(LargeCap), "US Large Cap Growth"),
        ("large-cap blend", UsEquity, Some(LargeCap), "US Large Cap Blend"),
        ("large-cap value", UsEquity, Some(LargeCap), "US Large Cap Value"),
        ("mid-cap growth", UsEquity, Some(MidCap), "US Mid Cap Growth"),
        ("mid-cap blend", UsEquity, Some(MidCap), "US Mid Cap Blend"),
        ("mid-cap value", UsEquity, Some(MidCap), "US Mid Cap Value"),
        ("mid growth", UsEquity, Some(MidCap), "US Mid Cap Growth"),
        ("mid blend", UsEquity, Some(MidCap), "US Mid Cap Blend"),
        ("mid value", UsEquity, Some(MidCap), "US Mid Cap Value"),
        ("small growth", UsEquity, Some(SmallCap), "US Small Cap Growth"),
        ("small blend", UsEquity, Some(SmallCap), "US Small Cap Blend"),
        ("small value", UsEquity, Some(SmallCap), "US Small Cap Value"),
        ("small-cap growth", UsEquity, Some(SmallCap), "US Small Cap Growth"),
        ("small-cap blend", UsEquity, Some(SmallCap), "US Small Cap Blend"),
        ("small-cap value", UsEquity, Some(SmallCap), "US Small Cap Value"),
        // US equity: sectors
        ("technology", UsEquity, Some(Sector), "US Technology"),
        ("health", UsEquity, Some(Sector), "US Healthcare"),
        ("healthcare", UsEquity, Some(Sector), "US Healthcare"),
        ("financial", UsEquity, Some(Sector), "US Financials"),
        ("financials", UsEquity, Some(Sector), "US Financials"),
        ("consumer cyclical", UsEquity, Some(Sector), "US Consumer Cyclical"),
        ("consumer defensive", UsEquity, Some(Sector), "US Consumer Defensive"),
        ("industrials", UsEquity, Some(Sector), "US Industrials"),
        ("energy", UsEquity, Some(Sector), "US Energy"),
        ("utilities", UsEquity, Some(Sector), "US Utilities"),
        ("communications", UsEquity, Some(Sector), "US Communications"),
        ("natural resources", RealAssets, Some(Commodities), "Natural Resources"),
        ("equity energy", UsEquity, Some(Sector), "Energy Equity"),
        // Global equity
        ("world large stock", GlobalEquity, Some(LargeCap), "World Large Stock"),
        ("world large-stock", GlobalEquity, Some(LargeCap), "World Large Stock"),
        ("world large-stock growth", GlobalEquity, Some(Growth), "World Large Stock Growth"),
        ("world large-stock blend", GlobalEquity, Some(Blend), "World Large Stock Blend"),
        ("world large-stock value", GlobalEquity, Some(Value), "World Large Stock Value"),
        ("world small/mid stock", GlobalEquity, Some(SmallCap), "World Small/Mid Stock"),
        ("world stock", GlobalEquity, None, "World Stock"),
        ("global large-stock growth", GlobalEquity, Some(Growth), "Global Large Stock Growth"),
        ("global large-stock blend", GlobalEquity, Some(Blend), "Global Large Stock Blend"),
        ("global large-stock value", GlobalEquity, Some(Value), "Global Large Stock Value"),
        // International developed
        ("foreign large growth", IntlEquity, Some(Developed), "Foreign Large Growth"),
        ("foreign large blend", IntlEquity, Some(Developed), "Foreign Large Blend"),
        ("foreign large value", IntlEquity, Some(Developed), "Foreign Large Value"),
        ("foreign large-growth", IntlEquity, Some(Developed), "Foreign Large Growth"),
        ("foreign large-blend", IntlEquity, Some(Developed), "Foreign Large Blend"),
        ("foreign large-value", IntlEquity, Some(Developed), "Foreign Large Value"),
        ("foreign small/mid growth", IntlEquity, Some(Developed), "Foreign Small/Mid Growth"),
        ("foreign small/mid blend", IntlEquity, Some(Developed), "Foreign Small/Mid Blend"),
        ("foreign small/mid value", IntlEquity, Some(Developed), "Foreign Small/Mid Value"),
        ("europe stock", IntlEquity, Some(Developed), "Europe Stock"),
        ("japan stock", IntlEquity, Some(Developed), "Japan Stock"),
        ("pacific/asia ex-japan stk", IntlEquity, Some(Developed), "Pacific/Asia ex-Japan"),
        // Emerging markets
        ("diversified emerging mkts", IntlEquity, Some(Emerging), "Diversified Emerging Markets"),
        ("diversified emerging markets", IntlEquity, Some(Emerging), "Diversified Emerging Markets"),
        ("emerging markets", IntlEquity, Some(Emerging), "Emerging Markets"),
        ("china region", IntlEquity, Some(Emerging), "China Region"),
        ("india equity", IntlEquity, Some(Emerging), "India Equity"),
        ("latin america stock", IntlEquity, Some(Emerging), "Latin America Stock"),
        ("pacific/asia emerging", IntlEquity, Some(Emerging), "Pacific/Asia Emerging"),
        // Taxable bonds
        ("long government", FixedIncome, Some(Government), "Long Government Bonds"),
        ("long-term bond", FixedIncome, Some(LongTerm), "Long-Term Bond"),
        ("intermediate government", FixedIncome, Some(Government), "Intermediate Government"),
        ("intermediate core bond", FixedIncome, Some(Intermediate), "Intermediate Core Bond"),
        ("intermediate core-plus bond", FixedIncome, Some(Intermediate), "Intermediate Core-Plus Bond"),
        ("intermediate-term bond", FixedIncome, Some(Intermediate), "Intermediate-Term Bond"),
        ("short government", FixedIncome, Some(Government), "Short Government"),
        ("short-term bond", FixedIncome, Some(ShortTerm), "Short-Term Bond"),
        ("ultrashort bond", FixedIncome, Some(UltraShort), "Ultrashort Bond"),
        ("corporate bond", FixedIncome, Some(Corporate), "Corporate Bond"),
        ("high yield bond", FixedIncome, Some(HighYield), "High Yield Bond"),
        ("bank loan", FixedIncome, Some(Corporate), "Bank Loan"),
        ("inflation-protected bond", FixedIncome, Some(Tips), "Inflation-Protected Bond"),
        ("tips", FixedIncome, Some(Tips), "TIPS"),
        ("multisector bond", FixedIncome, None, "Multisector Bond"),
        ("nontraditional bond", FixedIncome, None, "Nontraditional Bond"),
        ("world bond", FixedIncome, None, "World Bond"),
        ("world bond-usd hedged", FixedIncome, None, "World Bond USD Hedged"),
        ("emerging markets bond", FixedIncome, Some(Emerging), "Emerging Markets Bond"),
        ("emerging-markets bond", FixedIncome, Some(Emerging), "Emerging Markets Bond"),
        ("emerging-markets local-currency bond", FixedIncome, Some(Emerging), "EM Local Currency Bond"),
        // Municipal bonds
        ("muni national long", FixedIncome, Some(Municipal), "Muni National Long"),
        ("muni national interm", FixedIncome, Some(Municipal), "Muni National Intermediate"),
        ("muni national short", FixedIncome, Some(Municipal), "Muni National Short"),
        ("muni single state long", FixedIncome, Some(Municipal), "Muni Single State Long"),
        ("muni single state interm", FixedIncome, Some(Municipal), "Muni Single State Intermediate"),
        ("muni single state short", FixedIncome, Some(Municipal), "Muni Single State Short"),
        ("high yield muni", FixedIncome, Some(Municipal), "High Yield Muni"),
        ("muni california long", FixedIncome, Some(Municipal), "Muni California Long"),
        ("muni new york long", FixedIncome, Some(Municipal), "Muni New York Long"),
        // Cash
        ("money market", Cash, Some(MoneyMarket), "Money Market"),
        ("money market-taxable", Cash, Some(MoneyMarket), "Money Market Taxable"),
        ("taxable money market", Cash, Some(MoneyMarket), "Taxable Money Market"),
        ("money market-tax-free", Cash, Some(MoneyMarket), "Money Market Tax-Free"),
        ("prime money market", Cash, Some(MoneyMarket), "Prime Money Market"),
        ("government money market", Cash, Some(MoneyMarket), "Government Money Market"),
        ("treasury money market", Cash, Some(MoneyMarket), "Treasury Money Market"),
        // Real assets
        ("real estate", RealAssets, Some(Reit), "Real Estate"),
        ("equity precious metals", RealAssets, Some(Commodities), "Precious Metals Equity"),
        ("commodities broad basket", RealAssets, Some(Commodities), "Commodities Broad Basket"),
        ("commodities focused", RealAssets, Some(Commodities), "Commodities Focused"),
        ("commodities agriculture", RealAssets, Some(Commodities), "Commodities Agriculture"),
        ("commodities energy", RealAssets, Some(Commodities), "Commodities Energy"),
        ("commodities precious metals", RealAssets, Some(Commodities), "Commodities Precious Metals"),
        ("global real estate", RealAssets, Some(Reit), "Global Real Estate"),
        ("infrastructure", RealAssets, Some(Infrastructure), "Infrastructure"),
        // Multi-asset and alternatives
        ("allocation--15% to 30% equity", Alternatives, None, "Conservative Allocation"),
        ("allocation--30% to 50% equity", Alternatives, None, "Moderate Allocation"),
        ("allocation--50% to 70% equity", Alternatives, None, "Balanced Allocation"),
        ("allocation--70% to 85% equity", Alternatives, None, "Growth Allocation"),
        ("allocation--85%+ equity", Alternatives, None, "Aggressive Allocation"),
        ("tactical allocation", Alternatives, None, "Tactical Allocation"),
        ("world allocation", Alternatives, None, "World Allocation"),
        ("target-date", Alternatives, None, "Target-Date"),
        ("target date", Alternatives, None, "Target-Date"),
        ("retirement income", Alternatives, None, "Retirement Income"),
        ("convertibles", Alternatives, None, "Convertibles"),
        ("preferred stock", Alternatives, None, "Preferred Stock"),
        ("long-short equity", Alternatives, None, "Long-Short Equity"),
        ("market neutral", Alternatives, None, "Market Neutral"),
        ("multialternative", Alternatives, None, "Multi-Alternative"),
        ("options-based", Alternatives, None, "Options-Based"),
        ("trading--leveraged equity", Alternatives, None, "Leveraged Equity"),
        ("trading--inverse equity", Alternatives, None, "Inverse Equity"),
        // Crypto
        ("digital assets", Crypto, None, "Digital Assets"),
        ("cryptocurrency", Crypto, None, "Cryptocurrency"),
        ("bitcoin", Crypto, None, "Bitcoin"),
        ("ethereum", Crypto, None, "Ethereum"),
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_keys_are_normalized_and_unique() {
        let table = CategoryTable::default();
        let mut keys: Vec<&str> = table.entries().iter().map(|e| e.key.as_str()).collect();
        assert!(keys.iter().all(|k| *k == k.trim().to_lowercase()));
        let n = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), n);
    }

    #[test]
    fn test_fuzzy_prefers_longest_contained_key() {
        let table = CategoryTable::default();
        // Both "health" and "healthcare" are contained.
        let hit = table.fuzzy("us healthcare select").unwrap();
        assert_eq!(hit.key, "healthcare");

        let hit = table.fuzzy("diversified emerging markets bond fund").unwrap();
        assert_eq!(hit.key, "diversified emerging markets");
    }

    #[test]
    fn test_fuzzy_reverse_containment_prefers_shortest_key() {
        let table = CategoryTable::default();
        let hit = table.fuzzy("muni national").unwrap();
        assert_eq!(hit.key, "muni national long");

        // "large-cap growth" is listed first but is one character longer.
        let hit = table.fuzzy("large-cap").unwrap();
        assert_eq!(hit.key, "large-cap blend");
    }

    #[test]
    fn test_fuzzy_reverse_ties_keep_table_order() {
        let entry = |key: &str| CategoryEntry {
            key: key.to_string(),
            class: ClassTemplate::new(PrimaryClass::UsEquity, None, "US Mid Cap"),
        };
        let table = CategoryTable::new(vec![entry("mid-cap value"), entry("mid-cap blend")]);
        assert_eq!(table.fuzzy("mid-cap").unwrap().key, "mid-cap value");
    }

    #[test]
    fn test_asset_class_mapping() {
        let em = Classification::simple(
            PrimaryClass::IntlEquity,
            Some(SecondaryClass::Emerging),
            "Emerging Markets",
            None,
            MatchKind::ExactCategory,
        );
        assert_eq!(em.asset_class(), Some(AssetClass::EmergingMarkets));

        let world_bond = Classification::simple(
            PrimaryClass::FixedIncome,
            None,
            "World Bond",
            None,
            MatchKind::ExactCategory,
        );
        assert_eq!(world_bond.asset_class(), Some(AssetClass::IntlBonds));

        let other =
            Classification::simple(PrimaryClass::Other, None, "Other", None, MatchKind::Unknown);
        assert_eq!(other.asset_class(), None);
    }

    #[test]
    fn test_ticker_overrides_case_insensitive() {
        let overrides = TickerOverrides::default();
        assert_eq!(overrides.get("spaxx").unwrap().primary, PrimaryClass::Cash);
        assert_eq!(overrides.get(" mstr ").unwrap().primary, PrimaryClass::UsEquity);
        assert!(overrides.get("VTI").is_none());
    }
}
