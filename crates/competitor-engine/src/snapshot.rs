//! Point-in-time stock records

use serde::{Deserialize, Serialize};

use crate::api::{ProviderProfile, QuoteType};

/// Fundamentals and price-derived metrics of one symbol at analysis time
///
/// Every metric is optional. A missing metric is never an error; scoring and
/// averaging simply skip it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSnapshot {
    pub symbol: String,
    pub name: String,
    pub sector: String,
    pub industry: String,
    pub quote_type: QuoteType,

    // Valuation
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub forward_pe: Option<f64>,
    pub price_to_book: Option<f64>,
    pub price_to_sales: Option<f64>,

    // Financial health
    pub debt_to_equity: Option<f64>,
    pub current_ratio: Option<f64>,
    pub quick_ratio: Option<f64>,

    // Profitability
    pub roe: Option<f64>,
    pub roa: Option<f64>,
    pub gross_margin: Option<f64>,
    pub operating_margin: Option<f64>,
    pub profit_margin: Option<f64>,

    // Growth
    pub revenue_growth: Option<f64>,
    pub earnings_growth: Option<f64>,

    // Market behavior
    pub beta: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub payout_ratio: Option<f64>,
    pub week_52_high: Option<f64>,
    pub week_52_low: Option<f64>,
    pub average_volume: Option<f64>,
    pub employees: Option<f64>,
    pub ytd_return: Option<f64>,
    pub one_year_return: Option<f64>,
    pub volatility: Option<f64>,
}

pub(crate) const UNKNOWN: &str = "Unknown";

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn text_or_unknown(value: Option<String>) -> String {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

impl StockSnapshot {
    /// An empty snapshot: name is the symbol, classification unknown
    pub fn new(symbol: impl Into<String>) -> Self {
        let symbol = symbol.into().to_uppercase();
        Self {
            name: symbol.clone(),
            symbol,
            sector: UNKNOWN.to_string(),
            industry: UNKNOWN.to_string(),
            quote_type: QuoteType::Equity,
            current_price: None,
            market_cap: None,
            pe_ratio: None,
            forward_pe: None,
            price_to_book: None,
            price_to_sales: None,
            debt_to_equity: None,
            current_ratio: None,
            quick_ratio: None,
            roe: None,
            roa: None,
            gross_margin: None,
            operating_margin: None,
            profit_margin: None,
            revenue_growth: None,
            earnings_growth: None,
            beta: None,
            dividend_yield: None,
            payout_ratio: None,
            week_52_high: None,
            week_52_low: None,
            average_volume: None,
            employees: None,
            ytd_return: None,
            one_year_return: None,
            volatility: None,
        }
    }

    /// Map a provider profile onto a snapshot, dropping non-finite numbers.
    ///
    /// Price-derived fields (returns, volatility) are left empty and
    /// `current_price` holds the provider's quote until history overrides it.
    pub fn from_profile(symbol: &str, profile: ProviderProfile) -> Self {
        let quote_type = profile.quote_type();
        let symbol = symbol.trim().to_uppercase();
        let name = profile
            .short_name
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| symbol.clone());

        Self {
            name,
            sector: text_or_unknown(profile.sector),
            industry: text_or_unknown(profile.industry),
            quote_type,
            current_price: finite(profile.current_price),
            market_cap: finite(profile.market_cap),
            pe_ratio: finite(profile.trailing_pe),
            forward_pe: finite(profile.forward_pe),
            price_to_book: finite(profile.price_to_book),
            price_to_sales: finite(profile.price_to_sales),
            debt_to_equity: finite(profile.debt_to_equity),
            current_ratio: finite(profile.current_ratio),
            quick_ratio: finite(profile.quick_ratio),
            roe: finite(profile.return_on_equity),
            roa: finite(profile.return_on_assets),
            gross_margin: finite(profile.gross_margins),
            operating_margin: finite(profile.operating_margins),
            profit_margin: finite(profile.profit_margins),
            revenue_growth: finite(profile.revenue_growth),
            earnings_growth: finite(profile.earnings_growth),
            beta: finite(profile.beta),
            dividend_yield: finite(profile.dividend_yield),
            payout_ratio: finite(profile.payout_ratio),
            week_52_high: finite(profile.fifty_two_week_high),
            week_52_low: finite(profile.fifty_two_week_low),
            average_volume: finite(profile.average_volume),
            employees: finite(profile.full_time_employees),
            ytd_return: None,
            one_year_return: None,
            volatility: None,
            symbol,
        }
    }

    /// Value of one metric
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::CurrentPrice => self.current_price,
            Metric::MarketCap => self.market_cap,
            Metric::PeRatio => self.pe_ratio,
            Metric::ForwardPe => self.forward_pe,
            Metric::PriceToBook => self.price_to_book,
            Metric::PriceToSales => self.price_to_sales,
            Metric::DebtToEquity => self.debt_to_equity,
            Metric::CurrentRatio => self.current_ratio,
            Metric::QuickRatio => self.quick_ratio,
            Metric::Roe => self.roe,
            Metric::Roa => self.roa,
            Metric::GrossMargin => self.gross_margin,
            Metric::OperatingMargin => self.operating_margin,
            Metric::ProfitMargin => self.profit_margin,
            Metric::RevenueGrowth => self.revenue_growth,
            Metric::EarningsGrowth => self.earnings_growth,
            Metric::Beta => self.beta,
            Metric::DividendYield => self.dividend_yield,
            Metric::PayoutRatio => self.payout_ratio,
            Metric::Week52High => self.week_52_high,
            Metric::Week52Low => self.week_52_low,
            Metric::AverageVolume => self.average_volume,
            Metric::Employees => self.employees,
            Metric::YtdReturn => self.ytd_return,
            Metric::OneYearReturn => self.one_year_return,
            Metric::Volatility => self.volatility,
        }
    }
}

/// Numeric snapshot fields, in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    CurrentPrice,
    MarketCap,
    PeRatio,
    ForwardPe,
    PriceToBook,
    PriceToSales,
    DebtToEquity,
    CurrentRatio,
    QuickRatio,
    Roe,
    Roa,
    GrossMargin,
    OperatingMargin,
    ProfitMargin,
    RevenueGrowth,
    EarningsGrowth,
    Beta,
    DividendYield,
    PayoutRatio,
    #[serde(rename = "week_52_high")]
    Week52High,
    #[serde(rename = "week_52_low")]
    Week52Low,
    AverageVolume,
    Employees,
    YtdReturn,
    OneYearReturn,
    Volatility,
}

impl Metric {
    pub const ALL: [Metric; 26] = [
        Metric::CurrentPrice,
        Metric::MarketCap,
        Metric::PeRatio,
        Metric::ForwardPe,
        Metric::PriceToBook,
        Metric::PriceToSales,
        Metric::DebtToEquity,
        Metric::CurrentRatio,
        Metric::QuickRatio,
        Metric::Roe,
        Metric::Roa,
        Metric::GrossMargin,
        Metric::OperatingMargin,
        Metric::ProfitMargin,
        Metric::RevenueGrowth,
        Metric::EarningsGrowth,
        Metric::Beta,
        Metric::DividendYield,
        Metric::PayoutRatio,
        Metric::Week52High,
        Metric::Week52Low,
        Metric::AverageVolume,
        Metric::Employees,
        Metric::YtdReturn,
        Metric::OneYearReturn,
        Metric::Volatility,
    ];

    /// Stable snake_case name, identical to the serialized form
    pub fn name(self) -> &'static str {
        match self {
            Metric::CurrentPrice => "current_price",
            Metric::MarketCap => "market_cap",
            Metric::PeRatio => "pe_ratio",
            Metric::ForwardPe => "forward_pe",
            Metric::PriceToBook => "price_to_book",
            Metric::PriceToSales => "price_to_sales",
            Metric::DebtToEquity => "debt_to_equity",
            Metric::CurrentRatio => "current_ratio",
            Metric::QuickRatio => "quick_ratio",
            Metric::Roe => "roe",
            Metric::Roa => "roa",
            Metric::GrossMargin => "gross_margin",
            Metric::OperatingMargin => "operating_margin",
            Metric::ProfitMargin => "profit_margin",
            Metric::RevenueGrowth => "revenue_growth",
            Metric::EarningsGrowth => "earnings_growth",
            Metric::Beta => "beta",
            Metric::DividendYield => "dividend_yield",
            Metric::PayoutRatio => "payout_ratio",
            Metric::Week52High => "week_52_high",
            Metric::Week52Low => "week_52_low",
            Metric::AverageVolume => "average_volume",
            Metric::Employees => "employees",
            Metric::YtdReturn => "ytd_return",
            Metric::OneYearReturn => "one_year_return",
            Metric::Volatility => "volatility",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
