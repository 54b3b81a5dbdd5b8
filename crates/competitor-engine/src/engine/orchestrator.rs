//! Competitor analysis orchestrator

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::api::QuoteProvider;
use crate::config::EngineConfig;
use crate::error::{Result, StockError};
use crate::market_data::MarketDataClient;
use crate::peers::{PeerDiscovery, Taxonomy};
use crate::scoring::IndustryAverages;
use crate::snapshot::StockSnapshot;

use super::progress::{ProgressEvent, ProgressSink, Severity};
use super::result::{AnalysisResult, ScoredStock};

/// Runs validation, retrieval, discovery, scoring and ranking for one symbol
pub struct AnalysisOrchestrator {
    market: Arc<MarketDataClient>,
    discovery: PeerDiscovery,
    config: Arc<EngineConfig>,
}

impl AnalysisOrchestrator {
    pub fn new(
        provider: Arc<dyn QuoteProvider>,
        taxonomy: Taxonomy,
        config: EngineConfig,
    ) -> Result<Self> {
        config.validate()?;
        let config = Arc::new(config);
        let market = Arc::new(MarketDataClient::new(provider, Arc::clone(&config)));
        Ok(Self::from_parts(market, Arc::new(taxonomy), config))
    }

    /// Assemble an orchestrator over an existing market data client
    pub fn from_parts(
        market: Arc<MarketDataClient>,
        taxonomy: Arc<Taxonomy>,
        config: Arc<EngineConfig>,
    ) -> Self {
        let discovery = PeerDiscovery::new(taxonomy, Arc::clone(&market));
        Self {
            market,
            discovery,
            config,
        }
    }

    pub fn market(&self) -> &MarketDataClient {
        &self.market
    }

    pub fn discovery(&self) -> &PeerDiscovery {
        &self.discovery
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze `symbol` against its competitors.
    ///
    /// Every stage is reported to `progress` before the run moves on. A run
    /// that fails reports exactly one failure event and returns the matching
    /// error.
    pub async fn analyze(
        &self,
        symbol: &str,
        progress: &dyn ProgressSink,
    ) -> Result<AnalysisResult> {
        let symbol = normalize_symbol(symbol)?;
        info!(
            symbol = %symbol,
            provider = self.market.provider_name(),
            "Starting competitor analysis"
        );

        emit(progress, ProgressEvent::Validating {
            symbol: symbol.clone(),
        });
        if !self.market.is_tradable_equity(&symbol).await {
            emit(progress, ProgressEvent::InvalidSymbol {
                symbol: symbol.clone(),
            });
            return Err(StockError::InvalidSymbol(symbol));
        }

        emit(progress, ProgressEvent::FetchingMain {
            symbol: symbol.clone(),
        });
        let Some(main) = self.market.fetch(&symbol, progress).await else {
            emit(progress, ProgressEvent::DataUnavailable {
                symbol: symbol.clone(),
            });
            return Err(StockError::DataUnavailable {
                symbol,
                reason: "no usable market data".to_string(),
            });
        };
        emit(progress, ProgressEvent::CompanyProfile {
            symbol: main.symbol.clone(),
            name: main.name.clone(),
            sector: main.sector.clone(),
            industry: main.industry.clone(),
            current_price: main.current_price,
        });

        emit(progress, ProgressEvent::DiscoveringPeers {
            symbol: symbol.clone(),
        });
        let peers = self.discovery.find_peers(&main, self.config.max_peers).await;
        emit(progress, ProgressEvent::PeersIdentified {
            peers: peers.clone(),
        });

        let peer_snapshots = self.fetch_peers(&peers, progress).await;
        if peer_snapshots.is_empty() {
            return Err(insufficient_peers(symbol, progress));
        }

        emit(progress, ProgressEvent::Scoring {
            stocks: peer_snapshots.len() + 1,
        });
        let industry_avg =
            IndustryAverages::from_snapshots(std::iter::once(&main).chain(peer_snapshots.iter()));

        let main_stock = score_main(main, &industry_avg, progress)?;

        let mut competitors = Vec::with_capacity(peer_snapshots.len());
        for snapshot in peer_snapshots {
            let peer_symbol = snapshot.symbol.clone();
            match ScoredStock::new(snapshot, &industry_avg) {
                Ok(scored) => competitors.push(scored),
                Err(e) => emit(progress, ProgressEvent::ScoringFailed {
                    symbol: peer_symbol,
                    reason: e.to_string(),
                }),
            }
        }
        if competitors.is_empty() {
            return Err(insufficient_peers(symbol, progress));
        }

        emit(progress, ProgressEvent::Ranking);
        let all_stocks = rank(&main_stock, &competitors);

        let result = AnalysisResult {
            main_stock,
            competitors,
            all_stocks,
            industry_avg,
        };
        info!(
            symbol = %symbol,
            rank = result.main_rank(),
            total = result.total_stocks(),
            score = result.main_stock.score,
            "Competitor analysis complete"
        );
        emit(progress, ProgressEvent::Complete {
            symbol,
            rank: result.main_rank(),
            total: result.total_stocks(),
        });

        Ok(result)
    }

    async fn fetch_peers(
        &self,
        peers: &[String],
        progress: &dyn ProgressSink,
    ) -> Vec<StockSnapshot> {
        let total = peers.len();
        let mut snapshots = Vec::with_capacity(total);
        for (i, peer) in peers.iter().enumerate() {
            emit(progress, ProgressEvent::FetchingPeer {
                symbol: peer.clone(),
                index: i + 1,
                total,
            });
            if let Some(snapshot) = self.market.fetch(peer, progress).await {
                snapshots.push(snapshot);
            }
        }
        snapshots
    }
}

/// Trim and uppercase a user-supplied symbol; empty input is rejected
pub fn normalize_symbol(symbol: &str) -> Result<String> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(StockError::InvalidSymbol("symbol must not be empty".to_string()));
    }
    Ok(symbol.to_uppercase())
}

/// Main stock followed by competitors, sorted best first.
///
/// `sort_by` is stable, so equal scores keep discovery order.
fn rank(main: &ScoredStock, competitors: &[ScoredStock]) -> Vec<ScoredStock> {
    let mut all: Vec<ScoredStock> = std::iter::once(main)
        .chain(competitors.iter())
        .cloned()
        .collect();
    all.sort_by(|a, b| b.score.total_cmp(&a.score));
    all
}

/// Score the analyzed stock; unlike a peer, a failure here ends the run
fn score_main(
    main: StockSnapshot,
    averages: &IndustryAverages,
    progress: &dyn ProgressSink,
) -> Result<ScoredStock> {
    let symbol = main.symbol.clone();
    ScoredStock::new(main, averages).inspect_err(|e| {
        emit(progress, ProgressEvent::AnalysisFailed {
            symbol,
            reason: e.to_string(),
        });
    })
}

fn insufficient_peers(symbol: String, progress: &dyn ProgressSink) -> StockError {
    emit(progress, ProgressEvent::InsufficientPeers {
        symbol: symbol.clone(),
    });
    StockError::InsufficientPeers { symbol }
}

fn emit(progress: &dyn ProgressSink, event: ProgressEvent) {
    match event.severity() {
        Severity::Info => debug!(stage = ?event.stage(), "{event}"),
        Severity::Warning | Severity::Failure => warn!(stage = ?event.stage(), "{event}"),
    }
    progress.report(&event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{RecommendationTier, RiskLevel, ScoreBreakdown};
    use crate::snapshot::Metric;
    use std::sync::Mutex;

    fn scored(symbol: &str, score: f64) -> ScoredStock {
        ScoredStock {
            snapshot: StockSnapshot::new(symbol),
            score,
            breakdown: ScoreBreakdown::default(),
            recommendation: RecommendationTier::from_score(score),
            target_price: None,
            risk_level: RiskLevel::Medium,
        }
    }

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol("  msft ").unwrap(), "MSFT");
        assert!(matches!(
            normalize_symbol("   "),
            Err(StockError::InvalidSymbol(_))
        ));
    }

    #[test]
    fn test_rank_is_stable_on_ties() {
        let main = scored("MAIN", 60.0);
        let competitors = vec![scored("P1", 70.0), scored("P2", 60.0), scored("P3", 60.0)];
        let symbols: Vec<String> = rank(&main, &competitors)
            .iter()
            .map(|s| s.symbol().to_string())
            .collect();
        assert_eq!(symbols, vec!["P1", "MAIN", "P2", "P3"]);
    }

    #[test]
    fn test_main_scoring_failure_reports_one_failure() {
        let main = StockSnapshot {
            pe_ratio: Some(f64::INFINITY),
            ..StockSnapshot::new("MAIN")
        };
        let averages = IndustryAverages::default().with(Metric::PeRatio, f64::INFINITY);

        let events = Mutex::new(Vec::new());
        let sink = |event: &ProgressEvent| events.lock().unwrap().push(event.clone());
        let err = score_main(main, &averages, &sink).unwrap_err();
        assert!(matches!(err, StockError::Computation { ref symbol, .. } if symbol == "MAIN"));

        let events = events.into_inner().unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_failure());
        assert!(matches!(
            &events[0],
            ProgressEvent::AnalysisFailed { symbol, .. } if symbol == "MAIN"
        ));
    }

    #[test]
    fn test_main_scoring_success_is_silent() {
        let events = Mutex::new(Vec::new());
        let sink = |event: &ProgressEvent| events.lock().unwrap().push(event.clone());
        let scored = score_main(StockSnapshot::new("MAIN"), &IndustryAverages::default(), &sink)
            .unwrap();
        assert_eq!(scored.score, 50.0);
        assert!(events.into_inner().unwrap().is_empty());
    }
}
