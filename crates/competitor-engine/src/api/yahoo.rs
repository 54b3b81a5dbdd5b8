//! Yahoo Finance quote provider

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use yahoo_finance_api as yahoo;

use super::{DailyClose, ProviderProfile, QuoteProvider};
use crate::error::{Result, StockError};

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Yahoo Finance provider backed by `yahoo_finance_api`
///
/// Profiles come from the quote summary endpoint, which needs the connector's
/// crumb session; the connector therefore sits behind a mutex and every request
/// waits on a shared rate limiter first.
pub struct YahooProvider {
    connector: Mutex<yahoo::YahooConnector>,
    rate_limiter: SharedRateLimiter,
}

impl YahooProvider {
    /// Create a new provider allowing `requests_per_minute` calls
    pub fn new(requests_per_minute: u32) -> Result<Self> {
        let connector = yahoo::YahooConnector::new()
            .map_err(|e| StockError::Provider(format!("Yahoo connector: {e}")))?;
        let per_minute = NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_minute(per_minute)));

        Ok(Self {
            connector: Mutex::new(connector),
            rate_limiter,
        })
    }
}

#[async_trait]
impl QuoteProvider for YahooProvider {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    async fn profile(&self, symbol: &str) -> Result<ProviderProfile> {
        self.rate_limiter.until_ready().await;

        let mut guard = self.connector.lock().await;
        let connector: &mut yahoo::YahooConnector = &mut guard;
        let summary = connector
            .get_ticker_info(symbol)
            .await
            .map_err(|e| StockError::Provider(format!("Yahoo ticker info for {symbol}: {e}")))?;
        drop(guard);

        let data = summary
            .quote_summary
            .and_then(|qs| qs.result)
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| StockError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "empty quote summary".to_string(),
            })?;

        let quote_type = data.quote_type.as_ref();
        let asset_profile = data.asset_profile.as_ref();
        let detail = data.summary_detail.as_ref();
        let key_stats = data.default_key_statistics.as_ref();
        let financial = data.financial_data.as_ref();

        Ok(ProviderProfile {
            symbol: quote_type.and_then(|qt| qt.symbol.clone()),
            short_name: quote_type.and_then(|qt| qt.short_name.clone().or(qt.long_name.clone())),
            quote_type: quote_type.and_then(|qt| qt.quote_type.clone()),
            sector: asset_profile.and_then(|ap| ap.sector.clone()),
            industry: asset_profile.and_then(|ap| ap.industry.clone()),
            current_price: financial.and_then(|fd| fd.current_price).map(|v| v as f64),
            market_cap: detail.and_then(|sd| sd.market_cap).map(|v| v as f64),
            trailing_pe: detail.and_then(|sd| sd.trailing_pe).map(|v| v as f64),
            forward_pe: key_stats
                .and_then(|ks| ks.forward_pe)
                .or(detail.and_then(|sd| sd.forward_pe))
                .map(|v| v as f64),
            price_to_book: key_stats.and_then(|ks| ks.price_to_book).map(|v| v as f64),
            price_to_sales: detail
                .and_then(|sd| sd.price_to_sales_trailing12months)
                .map(|v| v as f64),
            debt_to_equity: financial.and_then(|fd| fd.debt_to_equity).map(|v| v as f64),
            current_ratio: financial.and_then(|fd| fd.current_ratio).map(|v| v as f64),
            quick_ratio: financial.and_then(|fd| fd.quick_ratio).map(|v| v as f64),
            return_on_equity: financial.and_then(|fd| fd.return_on_equity).map(|v| v as f64),
            return_on_assets: financial.and_then(|fd| fd.return_on_assets).map(|v| v as f64),
            gross_margins: financial.and_then(|fd| fd.gross_margins).map(|v| v as f64),
            operating_margins: financial.and_then(|fd| fd.operating_margins).map(|v| v as f64),
            profit_margins: financial.and_then(|fd| fd.profit_margins).map(|v| v as f64),
            revenue_growth: financial.and_then(|fd| fd.revenue_growth).map(|v| v as f64),
            earnings_growth: financial.and_then(|fd| fd.earnings_growth).map(|v| v as f64),
            beta: detail.and_then(|sd| sd.beta).map(|v| v as f64),
            dividend_yield: detail.and_then(|sd| sd.dividend_yield).map(|v| v as f64),
            payout_ratio: detail.and_then(|sd| sd.payout_ratio).map(|v| v as f64),
            fifty_two_week_high: detail.and_then(|sd| sd.fifty_two_week_high).map(|v| v as f64),
            fifty_two_week_low: detail.and_then(|sd| sd.fifty_two_week_low).map(|v| v as f64),
            average_volume: detail.and_then(|sd| sd.average_volume).map(|v| v as f64),
            full_time_employees: asset_profile
                .and_then(|ap| ap.full_time_employees)
                .map(|v| v as f64),
        })
    }

    async fn price_history(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DailyClose>> {
        self.rate_limiter.until_ready().await;

        // Convert chrono DateTime to time OffsetDateTime
        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| StockError::Provider(format!("Invalid start timestamp: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| StockError::Provider(format!("Invalid end timestamp: {e}")))?;

        let guard = self.connector.lock().await;
        let response = guard
            .get_quote_history(symbol, start_odt, end_odt)
            .await
            .map_err(|e| StockError::Provider(format!("Yahoo history for {symbol}: {e}")))?;
        drop(guard);

        let quotes = response
            .quotes()
            .map_err(|e| StockError::Provider(format!("Yahoo history for {symbol}: {e}")))?;

        let mut closes: Vec<DailyClose> = quotes
            .iter()
            .filter(|q| q.close.is_finite())
            .filter_map(|q| {
                DateTime::from_timestamp(q.timestamp as i64, 0).map(|timestamp| DailyClose {
                    timestamp,
                    close: q.close,
                })
            })
            .collect();
        closes.sort_by_key(|c| c.timestamp);

        Ok(closes)
    }
}
