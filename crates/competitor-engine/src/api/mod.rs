//! Quote providers feeding the market data client
//!
//! A provider answers two questions per symbol: the company profile with its
//! fundamentals, and the daily closing-price series over a date range. Every
//! profile field is optional; providers report what they know and nothing more.

pub mod memory;
pub mod yahoo;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use memory::InMemoryProvider;
pub use yahoo::YahooProvider;

/// Instrument classification reported by a provider
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuoteType {
    Equity,
    Etf,
    #[default]
    Unknown,
    Other(String),
}

impl QuoteType {
    /// Parse the provider's quote type string (`EQUITY`, `ETF`, ...)
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "EQUITY" => QuoteType::Equity,
            "ETF" => QuoteType::Etf,
            "" => QuoteType::Unknown,
            other => QuoteType::Other(other.to_string()),
        }
    }

    /// Equities and ETFs are the only instruments the engine can analyze
    pub fn is_analyzable(&self) -> bool {
        matches!(self, QuoteType::Equity | QuoteType::Etf)
    }

    pub fn as_str(&self) -> &str {
        match self {
            QuoteType::Equity => "EQUITY",
            QuoteType::Etf => "ETF",
            QuoteType::Unknown => "",
            QuoteType::Other(raw) => raw,
        }
    }
}

impl From<String> for QuoteType {
    fn from(raw: String) -> Self {
        QuoteType::parse(&raw)
    }
}

impl From<QuoteType> for String {
    fn from(quote_type: QuoteType) -> Self {
        quote_type.as_str().to_string()
    }
}

/// Company profile and fundamentals as reported by a provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderProfile {
    pub symbol: Option<String>,
    pub short_name: Option<String>,
    pub quote_type: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub forward_pe: Option<f64>,
    pub price_to_book: Option<f64>,
    pub price_to_sales: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub current_ratio: Option<f64>,
    pub quick_ratio: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub return_on_assets: Option<f64>,
    pub gross_margins: Option<f64>,
    pub operating_margins: Option<f64>,
    pub profit_margins: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub earnings_growth: Option<f64>,
    pub beta: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub payout_ratio: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub average_volume: Option<f64>,
    pub full_time_employees: Option<f64>,
}

impl ProviderProfile {
    /// Parsed instrument classification
    pub fn quote_type(&self) -> QuoteType {
        self.quote_type
            .as_deref()
            .map_or(QuoteType::Unknown, QuoteType::parse)
    }

    /// Whether the provider returned anything that identifies the instrument
    pub fn is_identified(&self) -> bool {
        self.symbol.as_deref().is_some_and(|s| !s.trim().is_empty())
            || self.short_name.as_deref().is_some_and(|s| !s.trim().is_empty())
    }
}

/// One daily closing price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyClose {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
}

/// Source of per-symbol fundamentals and daily price history
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Provider name used in logs
    fn name(&self) -> &'static str;

    /// Fetch the company profile for a symbol
    async fn profile(&self, symbol: &str) -> Result<ProviderProfile>;

    /// Fetch daily closes between `start` and `end`, oldest first
    async fn price_history(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DailyClose>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_type_parse() {
        assert_eq!(QuoteType::parse("equity"), QuoteType::Equity);
        assert_eq!(QuoteType::parse("ETF"), QuoteType::Etf);
        assert_eq!(QuoteType::parse(""), QuoteType::Unknown);
        assert_eq!(
            QuoteType::parse("MUTUALFUND"),
            QuoteType::Other("MUTUALFUND".to_string())
        );
        assert!(QuoteType::Etf.is_analyzable());
        assert!(!QuoteType::parse("INDEX").is_analyzable());
    }

    #[test]
    fn test_profile_identification() {
        let profile = ProviderProfile::default();
        assert!(!profile.is_identified());
        assert_eq!(profile.quote_type(), QuoteType::Unknown);

        let profile = ProviderProfile {
            short_name: Some("Apple Inc.".to_string()),
            quote_type: Some("EQUITY".to_string()),
            ..Default::default()
        };
        assert!(profile.is_identified());
        assert_eq!(profile.quote_type(), QuoteType::Equity);
    }

    #[test]
    fn test_profile_deserializes_partial_json() {
        let profile: ProviderProfile =
            serde_json::from_str(r#"{"symbol": "AAPL", "trailing_pe": 28.5}"#).unwrap();
        assert_eq!(profile.trailing_pe, Some(28.5));
        assert_eq!(profile.beta, None);
    }
}
