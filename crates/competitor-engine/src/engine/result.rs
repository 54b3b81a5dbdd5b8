//! Analysis result types

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::scoring::{self, IndustryAverages, RecommendationTier, RiskLevel, ScoreBreakdown};
use crate::snapshot::StockSnapshot;

/// A snapshot scored against its peer group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredStock {
    #[serde(flatten)]
    pub snapshot: StockSnapshot,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    pub recommendation: RecommendationTier,
    pub target_price: Option<f64>,
    pub risk_level: RiskLevel,
}

impl ScoredStock {
    /// Score `snapshot` against `averages` and attach its recommendation
    pub fn new(snapshot: StockSnapshot, averages: &IndustryAverages) -> Result<Self> {
        let score = scoring::score(&snapshot, averages)?;
        let breakdown = scoring::breakdown(&snapshot, averages);
        let recommendation = scoring::recommend(score, snapshot.current_price, snapshot.beta);

        Ok(Self {
            snapshot,
            score,
            breakdown,
            recommendation: recommendation.tier,
            target_price: recommendation.target_price,
            risk_level: recommendation.risk_level,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.snapshot.symbol
    }
}

/// Outcome of one competitor analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// The analyzed stock
    pub main_stock: ScoredStock,
    /// Peers in discovery order
    pub competitors: Vec<ScoredStock>,
    /// Main stock and peers, best score first; ties keep discovery order
    pub all_stocks: Vec<ScoredStock>,
    /// Per-metric means over the main stock and its peers
    pub industry_avg: IndustryAverages,
}

impl AnalysisResult {
    /// 1-based rank of `symbol` in `all_stocks`
    pub fn rank_of(&self, symbol: &str) -> Option<usize> {
        self.all_stocks
            .iter()
            .position(|s| s.symbol().eq_ignore_ascii_case(symbol))
            .map(|i| i + 1)
    }

    /// 1-based rank of the main stock
    pub fn main_rank(&self) -> usize {
        self.rank_of(self.main_stock.symbol()).unwrap_or(1)
    }

    pub fn total_stocks(&self) -> usize {
        self.all_stocks.len()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
