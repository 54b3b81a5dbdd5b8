//! Stock competitor analysis engine
//!
//! Given one ticker symbol, the engine finds comparable companies, gathers
//! fundamental and price data for all of them, scores every stock against the
//! peer group and ranks the result. It includes:
//!
//! - Quote providers behind the [`QuoteProvider`] trait (Yahoo Finance, in-memory fixtures)
//! - A market data client with a bounded snapshot cache
//! - Peer discovery through a curated industry/sector taxonomy
//! - Industry-relative scoring with recommendation tiers and target prices
//! - Structured progress events for presentation layers
//!
//! # Example
//!
//! ```rust,ignore
//! use competitor_engine::{
//!     AnalysisOrchestrator, EngineConfig, NoopProgress, Taxonomy, YahooProvider,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = EngineConfig::default();
//!     let provider = Arc::new(YahooProvider::new(config.requests_per_minute)?);
//!     let orchestrator = AnalysisOrchestrator::new(provider, Taxonomy::builtin(), config)?;
//!
//!     let result = orchestrator.analyze("MSFT", &NoopProgress).await?;
//!     println!("{} ranks #{}", result.main_stock.symbol(), result.main_rank());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod insights;
pub mod market_data;
pub mod peers;
pub mod scoring;
pub mod snapshot;

pub use api::{
    DailyClose, InMemoryProvider, ProviderProfile, QuoteProvider, QuoteType, YahooProvider,
};
pub use config::{EngineConfig, EngineConfigBuilder};
pub use engine::{
    AnalysisOrchestrator, AnalysisResult, NoopProgress, ProgressEvent, ProgressSink, ScoredStock,
    Severity, Stage,
};
pub use error::{Result, StockError};
pub use insights::{Insights, format_market_cap};
pub use market_data::MarketDataClient;
pub use peers::{PeerDiscovery, Taxonomy, TaxonomyEntry};
pub use scoring::{IndustryAverages, Recommendation, RecommendationTier, RiskLevel, ScoreBreakdown};
pub use snapshot::{Metric, StockSnapshot};
