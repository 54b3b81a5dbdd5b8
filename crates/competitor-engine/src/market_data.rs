//! Market data client: validated, cached stock snapshots

use chrono::{DateTime, Datelike, TimeDelta, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::api::{DailyClose, QuoteProvider, QuoteType};
use crate::cache::SnapshotCache;
use crate::config::EngineConfig;
use crate::engine::progress::{ProgressEvent, ProgressSink};
use crate::error::{Result, StockError};
use crate::snapshot::StockSnapshot;

/// Fetches per-symbol snapshots from a quote provider and caches them
pub struct MarketDataClient {
    provider: Arc<dyn QuoteProvider>,
    cache: SnapshotCache,
    config: Arc<EngineConfig>,
}

impl MarketDataClient {
    /// Create a client with a fresh cache sized from the configuration
    pub fn new(provider: Arc<dyn QuoteProvider>, config: Arc<EngineConfig>) -> Self {
        let cache = SnapshotCache::new(config.cache_capacity);
        Self::with_cache(provider, cache, config)
    }

    /// Create a client over an existing (possibly shared) cache
    pub fn with_cache(
        provider: Arc<dyn QuoteProvider>,
        cache: SnapshotCache,
        config: Arc<EngineConfig>,
    ) -> Self {
        Self {
            provider,
            cache,
            config,
        }
    }

    /// Whether the provider classifies `symbol` as an actively traded equity.
    ///
    /// Fails closed: provider errors and unidentified instruments are `false`.
    pub async fn is_tradable_equity(&self, symbol: &str) -> bool {
        match self.provider.profile(symbol).await {
            Ok(profile) => profile.is_identified() && profile.quote_type() == QuoteType::Equity,
            Err(e) => {
                debug!(symbol, provider = self.provider.name(), error = %e, "Validation failed");
                false
            }
        }
    }

    /// Fetch a snapshot, reporting failures to `progress` instead of returning them
    pub async fn fetch(
        &self,
        symbol: &str,
        progress: &dyn ProgressSink,
    ) -> Option<StockSnapshot> {
        match self.try_fetch(symbol).await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(
                    symbol,
                    provider = self.provider.name(),
                    error = %e,
                    "Error getting stock data"
                );
                progress.report(&ProgressEvent::FetchFailed {
                    symbol: symbol.to_uppercase(),
                    reason: e.to_string(),
                });
                None
            }
        }
    }

    /// Fetch a snapshot, serving the cached copy when one exists
    pub async fn try_fetch(&self, symbol: &str) -> Result<StockSnapshot> {
        let symbol = symbol.trim().to_uppercase();

        if let Some(snapshot) = self.cache.get(&symbol).await {
            debug!(symbol = %symbol, "Cache hit");
            return Ok(snapshot);
        }
        debug!(symbol = %symbol, "Cache miss");

        let profile = self.provider.profile(&symbol).await?;
        let quote_type = profile.quote_type();
        if !quote_type.is_analyzable() {
            return Err(StockError::DataUnavailable {
                symbol,
                reason: format!("quote type '{}' is neither equity nor ETF", quote_type.as_str()),
            });
        }

        let end = Utc::now();
        let start = history_start(end, self.config.history_days)?;
        let history = self.provider.price_history(&symbol, start, end).await?;

        let mut snapshot = StockSnapshot::from_profile(&symbol, profile);
        self.apply_history(&mut snapshot, &history, end);

        self.cache.insert(snapshot.clone()).await;
        Ok(snapshot)
    }

    fn apply_history(
        &self,
        snapshot: &mut StockSnapshot,
        history: &[DailyClose],
        now: DateTime<Utc>,
    ) {
        let closes: Vec<f64> = history
            .iter()
            .map(|c| c.close)
            .filter(|c| c.is_finite())
            .collect();

        if let Some(last) = closes.last() {
            snapshot.current_price = Some(*last);
        }
        snapshot.ytd_return = ytd_return(history, now.year());
        snapshot.one_year_return = trailing_return(&closes, self.config.one_year_window);
        snapshot.volatility = annualized_volatility(&closes, self.config.trading_days_per_year);
    }

    /// Cached snapshot for a symbol, without touching the provider
    pub async fn cached(&self, symbol: &str) -> Option<StockSnapshot> {
        self.cache.get(&symbol.trim().to_uppercase()).await
    }

    pub async fn cache_len(&self) -> usize {
        self.cache.len().await
    }

    /// Drop every cached snapshot so the next fetches hit the provider
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }
}

/// Return from the first close of `year` to the last close of `year`.
///
/// Needs more than one observation in the year.
pub fn ytd_return(history: &[DailyClose], year: i32) -> Option<f64> {
    let in_year: Vec<f64> = history
        .iter()
        .filter(|c| c.timestamp.year() == year && c.close.is_finite())
        .map(|c| c.close)
        .collect();

    match (in_year.first(), in_year.last()) {
        (Some(first), Some(last)) if in_year.len() > 1 && *first != 0.0 => Some(last / first - 1.0),
        _ => None,
    }
}

/// `close[-1] / close[-n] - 1` when at least `n` observations exist
pub fn trailing_return(closes: &[f64], n: usize) -> Option<f64> {
    if n == 0 || closes.len() < n {
        return None;
    }
    let base = closes[closes.len() - n];
    let last = closes[closes.len() - 1];
    if base == 0.0 {
        return None;
    }
    Some(last / base - 1.0)
}

/// Sample standard deviation of daily percentage changes, annualized
pub fn annualized_volatility(closes: &[f64], trading_days: f64) -> Option<f64> {
    let changes: Vec<f64> = closes
        .windows(2)
        .map(|w| w[1] / w[0] - 1.0)
        .filter(|c| c.is_finite())
        .collect();

    if changes.len() < 2 {
        return None;
    }

    let n = changes.len() as f64;
    let mean = changes.iter().sum::<f64>() / n;
    let variance = changes.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt() * trading_days.sqrt())
}

/// Start of the history window, `days` calendar days before `end`
fn history_start(end: DateTime<Utc>, days: i64) -> Result<DateTime<Utc>> {
    TimeDelta::try_days(days)
        .and_then(|span| end.checked_sub_signed(span))
        .ok_or_else(|| StockError::ConfigError(format!("history_days {days} is out of range")))
}
