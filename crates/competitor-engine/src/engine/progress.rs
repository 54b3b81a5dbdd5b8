//! Progress reporting for analysis runs
//!
//! The orchestrator reports every stage transition as a [`ProgressEvent`].
//! Presentation layers render events however they like; `Display` gives the
//! plain-text message.

use serde::Serialize;
use std::fmt;

/// Orchestrator stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Validating,
    FetchingMain,
    DiscoveringPeers,
    FetchingPeers,
    Scoring,
    Ranking,
    Done,
    Failed,
}

/// How a presentation layer should treat an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Failure,
}

/// One progress notification
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    Validating {
        symbol: String,
    },
    InvalidSymbol {
        symbol: String,
    },
    FetchingMain {
        symbol: String,
    },
    DataUnavailable {
        symbol: String,
    },
    CompanyProfile {
        symbol: String,
        name: String,
        sector: String,
        industry: String,
        current_price: Option<f64>,
    },
    DiscoveringPeers {
        symbol: String,
    },
    PeersIdentified {
        peers: Vec<String>,
    },
    FetchingPeer {
        symbol: String,
        index: usize,
        total: usize,
    },
    /// A single symbol could not be retrieved; the run continues
    FetchFailed {
        symbol: String,
        reason: String,
    },
    InsufficientPeers {
        symbol: String,
    },
    Scoring {
        stocks: usize,
    },
    /// A single stock could not be scored and was dropped
    ScoringFailed {
        symbol: String,
        reason: String,
    },
    /// The main stock could not be scored; the run ends
    AnalysisFailed {
        symbol: String,
        reason: String,
    },
    Ranking,
    Complete {
        symbol: String,
        rank: usize,
        total: usize,
    },
}

impl ProgressEvent {
    /// Stage this event belongs to, `None` for per-symbol warnings
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ProgressEvent::Validating { .. } => Some(Stage::Validating),
            ProgressEvent::FetchingMain { .. } | ProgressEvent::CompanyProfile { .. } => {
                Some(Stage::FetchingMain)
            }
            ProgressEvent::DiscoveringPeers { .. } | ProgressEvent::PeersIdentified { .. } => {
                Some(Stage::DiscoveringPeers)
            }
            ProgressEvent::FetchingPeer { .. } => Some(Stage::FetchingPeers),
            ProgressEvent::Scoring { .. } | ProgressEvent::ScoringFailed { .. } => {
                Some(Stage::Scoring)
            }
            ProgressEvent::Ranking => Some(Stage::Ranking),
            ProgressEvent::Complete { .. } => Some(Stage::Done),
            ProgressEvent::InvalidSymbol { .. }
            | ProgressEvent::DataUnavailable { .. }
            | ProgressEvent::InsufficientPeers { .. }
            | ProgressEvent::AnalysisFailed { .. } => Some(Stage::Failed),
            ProgressEvent::FetchFailed { .. } => None,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            ProgressEvent::InvalidSymbol { .. }
            | ProgressEvent::DataUnavailable { .. }
            | ProgressEvent::InsufficientPeers { .. }
            | ProgressEvent::AnalysisFailed { .. } => Severity::Failure,
            ProgressEvent::FetchFailed { .. } | ProgressEvent::ScoringFailed { .. } => {
                Severity::Warning
            }
            _ => Severity::Info,
        }
    }

    /// Whether this event ends the run
    pub fn is_failure(&self) -> bool {
        self.severity() == Severity::Failure
    }
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::Validating { symbol } => write!(f, "Validating symbol {symbol}..."),
            ProgressEvent::InvalidSymbol { symbol } => {
                write!(f, "Error: invalid or non-existent stock symbol '{symbol}'")
            }
            ProgressEvent::FetchingMain { symbol } => {
                write!(f, "Retrieving data for {symbol}...")
            }
            ProgressEvent::DataUnavailable { symbol } => {
                write!(f, "Error: could not retrieve data for {symbol}")
            }
            ProgressEvent::CompanyProfile {
                name,
                sector,
                industry,
                current_price,
                ..
            } => {
                write!(f, "Company: {name} | Sector: {sector} | Industry: {industry}")?;
                match current_price {
                    Some(price) => write!(f, " | Current Price: ${price:.2}"),
                    None => write!(f, " | Current Price: N/A"),
                }
            }
            ProgressEvent::DiscoveringPeers { symbol } => {
                write!(f, "Finding competitors for {symbol}...")
            }
            ProgressEvent::PeersIdentified { peers } => {
                if peers.is_empty() {
                    write!(f, "Competitors identified: none")
                } else {
                    write!(f, "Competitors identified: {}", peers.join(", "))
                }
            }
            ProgressEvent::FetchingPeer {
                symbol,
                index,
                total,
            } => write!(f, "Loading data for {symbol} ({index}/{total})..."),
            ProgressEvent::FetchFailed { symbol, reason } => {
                write!(f, "Error getting data for {symbol}: {reason}")
            }
            ProgressEvent::InsufficientPeers { .. } => {
                write!(f, "Error: could not retrieve competitor data")
            }
            ProgressEvent::Scoring { stocks } => {
                write!(f, "Calculating metrics and scores for {stocks} stocks...")
            }
            ProgressEvent::ScoringFailed { symbol, reason } => {
                write!(f, "Error calculating score for {symbol}: {reason}")
            }
            ProgressEvent::AnalysisFailed { symbol, reason } => {
                write!(f, "Error: could not score {symbol}: {reason}")
            }
            ProgressEvent::Ranking => write!(f, "Ranking stocks by score..."),
            ProgressEvent::Complete {
                symbol,
                rank,
                total,
            } => write!(f, "Analysis complete! {symbol} ranks #{rank} of {total}"),
        }
    }
}

/// Receiver of progress events
pub trait ProgressSink: Send + Sync {
    fn report(&self, event: &ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: Fn(&ProgressEvent) + Send + Sync,
{
    fn report(&self, event: &ProgressEvent) {
        self(event);
    }
}

/// Sink that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn report(&self, _event: &ProgressEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_failure_classification() {
        let event = ProgressEvent::InvalidSymbol {
            symbol: "ZZZZ".to_string(),
        };
        assert!(event.is_failure());
        assert_eq!(event.stage(), Some(Stage::Failed));

        let event = ProgressEvent::FetchFailed {
            symbol: "ORCL".to_string(),
            reason: "timeout".to_string(),
        };
        assert_eq!(event.severity(), Severity::Warning);
        assert_eq!(event.stage(), None);

        let event = ProgressEvent::AnalysisFailed {
            symbol: "AAPL".to_string(),
            reason: "score is not a finite number".to_string(),
        };
        assert!(event.is_failure());
        assert_eq!(event.stage(), Some(Stage::Failed));
    }

    #[test]
    fn test_display_messages() {
        let event = ProgressEvent::FetchingPeer {
            symbol: "ORCL".to_string(),
            index: 2,
            total: 5,
        };
        assert_eq!(event.to_string(), "Loading data for ORCL (2/5)...");

        let event = ProgressEvent::CompanyProfile {
            symbol: "AAPL".to_string(),
            name: "Apple Inc.".to_string(),
            sector: "Technology".to_string(),
            industry: "Consumer Electronics".to_string(),
            current_price: Some(189.5),
        };
        assert!(event.to_string().ends_with("Current Price: $189.50"));
    }

    #[test]
    fn test_closure_sink() {
        let seen = Mutex::new(Vec::new());
        let sink = |event: &ProgressEvent| seen.lock().unwrap().push(event.clone());
        sink.report(&ProgressEvent::Ranking);
        NoopProgress.report(&ProgressEvent::Ranking);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_event_serialization_is_tagged() {
        let json = serde_json::to_value(ProgressEvent::Scoring { stocks: 6 }).unwrap();
        assert_eq!(json["event"], "scoring");
        assert_eq!(json["stocks"], 6);
    }
}
