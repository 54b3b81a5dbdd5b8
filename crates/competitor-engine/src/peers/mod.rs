//! Competitor discovery through the industry/sector taxonomy

pub mod taxonomy;

use std::sync::Arc;
use tracing::debug;

use crate::market_data::MarketDataClient;
use crate::snapshot::StockSnapshot;

pub use taxonomy::{Taxonomy, TaxonomyEntry};

/// Size of the global fallback list before de-duplication
const GLOBAL_FALLBACK_LIMIT: usize = 10;

/// Where a candidate list came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerSource {
    Industry(String),
    Sector(String),
    Global,
}

/// Finds competitors for a stock and validates them through the market data client
pub struct PeerDiscovery {
    taxonomy: Arc<Taxonomy>,
    market: Arc<MarketDataClient>,
}

impl PeerDiscovery {
    pub fn new(taxonomy: Arc<Taxonomy>, market: Arc<MarketDataClient>) -> Self {
        Self { taxonomy, market }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Unvalidated candidate symbols, in discovery order, at most `max_count`
    pub fn candidates(&self, stock: &StockSnapshot, max_count: usize) -> Vec<String> {
        self.candidates_with_source(stock, max_count).0
    }

    /// Candidate symbols together with the table they were taken from
    pub fn candidates_with_source(
        &self,
        stock: &StockSnapshot,
        max_count: usize,
    ) -> (Vec<String>, PeerSource) {
        let main = stock.symbol.as_str();
        let others = |entry: &TaxonomyEntry| -> Vec<String> {
            entry
                .symbols
                .iter()
                .filter(|s| s.as_str() != main)
                .cloned()
                .collect()
        };

        let mut source = PeerSource::Global;
        let mut candidates = Vec::new();

        if let Some(entry) = self.taxonomy.match_industry(&stock.industry) {
            candidates = others(entry);
            source = PeerSource::Industry(entry.key.clone());
        }

        if candidates.is_empty() {
            if let Some(entry) = self.taxonomy.sector(&stock.sector) {
                candidates = others(entry);
                source = PeerSource::Sector(entry.key.clone());
            }
        }

        if candidates.is_empty() {
            candidates = self
                .taxonomy
                .all_sector_symbols()
                .filter(|s| *s != main)
                .take(GLOBAL_FALLBACK_LIMIT)
                .map(str::to_string)
                .collect();
            source = PeerSource::Global;
        }

        (dedup_truncate(candidates, max_count), source)
    }

    /// Validated competitor symbols, at most `max_count`.
    ///
    /// Candidates that fail validation are skipped, so the list can come back
    /// shorter than requested.
    pub async fn find_peers(&self, stock: &StockSnapshot, max_count: usize) -> Vec<String> {
        let (candidates, source) = self.candidates_with_source(stock, max_count);
        debug!(symbol = %stock.symbol, ?source, ?candidates, "Peer candidates");

        let mut validated = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if validated.len() >= max_count {
                break;
            }
            if self.market.is_tradable_equity(&candidate).await {
                validated.push(candidate);
            } else {
                debug!(symbol = %candidate, "Skipping peer that failed validation");
            }
        }
        validated
    }
}

/// Remove duplicates by first occurrence, then keep the first `max_count`
fn dedup_truncate(symbols: Vec<String>, max_count: usize) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        if !unique.contains(&symbol) {
            unique.push(symbol);
        }
    }
    unique.truncate(max_count);
    unique
}
