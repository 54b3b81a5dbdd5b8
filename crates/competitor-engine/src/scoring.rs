//! Industry-relative composite scoring and recommendations
//!
//! The composite score starts at a neutral 50 and adds one bounded delta per
//! factor. A factor whose inputs are missing or non-positive contributes
//! nothing, so a sparse profile drifts toward neutral instead of being punished.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Result, StockError};
use crate::snapshot::{Metric, StockSnapshot};

pub const BASE_SCORE: f64 = 50.0;
pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// Beta assumed when the provider reports none
pub const DEFAULT_BETA: f64 = 1.0;

/// Per-metric arithmetic means over a peer group
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndustryAverages(BTreeMap<Metric, f64>);

impl IndustryAverages {
    /// Mean of every metric over the snapshots that report it.
    ///
    /// Metrics no snapshot reports are left out of the map.
    pub fn from_snapshots<'a>(snapshots: impl IntoIterator<Item = &'a StockSnapshot>) -> Self {
        let mut sums: BTreeMap<Metric, (f64, usize)> = BTreeMap::new();
        for snapshot in snapshots {
            for metric in Metric::ALL {
                if let Some(value) = snapshot.metric(metric) {
                    let entry = sums.entry(metric).or_insert((0.0, 0));
                    entry.0 += value;
                    entry.1 += 1;
                }
            }
        }

        Self(
            sums.into_iter()
                .map(|(metric, (sum, count))| (metric, sum / count as f64))
                .collect(),
        )
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.0.get(&metric).copied()
    }

    /// Override one average
    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        self.0.insert(metric, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        self.0.iter().map(|(m, v)| (*m, *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Contribution of each factor to a composite score; `None` when skipped
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub valuation: Option<f64>,
    pub profitability: Option<f64>,
    pub margin: Option<f64>,
    pub leverage: Option<f64>,
    pub liquidity: Option<f64>,
    pub growth: Option<f64>,
}

impl ScoreBreakdown {
    /// Unclamped sum of base score and every applied delta
    pub fn raw_total(&self) -> f64 {
        BASE_SCORE + self.deltas().iter().filter_map(|d| *d).sum::<f64>()
    }

    /// Final score clamped to [0, 100]
    pub fn total(&self) -> f64 {
        self.raw_total().clamp(MIN_SCORE, MAX_SCORE)
    }

    fn deltas(&self) -> [Option<f64>; 6] {
        [
            self.valuation,
            self.profitability,
            self.margin,
            self.leverage,
            self.liquidity,
            self.growth,
        ]
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

/// Factor-by-factor score of `stock` against `averages`
pub fn breakdown(stock: &StockSnapshot, averages: &IndustryAverages) -> ScoreBreakdown {
    let valuation = positive(stock.pe_ratio)
        .zip(positive(averages.get(Metric::PeRatio)))
        .map(|(pe, avg_pe)| (20.0 * (avg_pe / pe)).clamp(0.0, 20.0) - 10.0);

    let profitability = positive(stock.roe).map(|roe| (roe * 100.0).min(15.0) - 7.5);

    let margin = positive(stock.profit_margin).map(|m| (m * 100.0).min(10.0) - 5.0);

    let leverage = positive(stock.debt_to_equity).map(|de| (5.0 - de / 100.0).clamp(-10.0, 5.0));

    let liquidity = positive(stock.current_ratio).map(|cr| (cr * 2.5).min(5.0) - 2.5);

    let growth = positive(stock.revenue_growth).map(|g| (g * 100.0).min(10.0) - 5.0);

    ScoreBreakdown {
        valuation,
        profitability,
        margin,
        leverage,
        liquidity,
        growth,
    }
}

/// Composite 0-100 score of `stock` relative to `averages`
pub fn score(stock: &StockSnapshot, averages: &IndustryAverages) -> Result<f64> {
    let total = breakdown(stock, averages).total();
    if total.is_finite() {
        Ok(total)
    } else {
        Err(StockError::Computation {
            symbol: stock.symbol.clone(),
            reason: "score is not a finite number".to_string(),
        })
    }
}

/// Recommendation tiers, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecommendationTier {
    #[serde(rename = "STRONG BUY")]
    StrongBuy,
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "HOLD")]
    Hold,
    #[serde(rename = "SELL")]
    Sell,
    #[serde(rename = "STRONG SELL")]
    StrongSell,
}

impl RecommendationTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            RecommendationTier::StrongBuy
        } else if score >= 60.0 {
            RecommendationTier::Buy
        } else if score >= 40.0 {
            RecommendationTier::Hold
        } else if score >= 30.0 {
            RecommendationTier::Sell
        } else {
            RecommendationTier::StrongSell
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecommendationTier::StrongBuy => "STRONG BUY",
            RecommendationTier::Buy => "BUY",
            RecommendationTier::Hold => "HOLD",
            RecommendationTier::Sell => "SELL",
            RecommendationTier::StrongSell => "STRONG SELL",
        }
    }
}

impl fmt::Display for RecommendationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Volatility bucket derived from beta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_beta(beta: Option<f64>) -> Self {
        let beta = beta.unwrap_or(DEFAULT_BETA);
        if beta > 1.5 {
            RiskLevel::High
        } else if beta > 0.8 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        };
        f.write_str(label)
    }
}

/// Recommendation derived from a composite score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub tier: RecommendationTier,
    pub target_price: Option<f64>,
    pub risk_level: RiskLevel,
}

/// Tier, linear target price and risk level for a score.
///
/// Each point away from 50 moves the target by 1%, in either direction.
pub fn recommend(score: f64, current_price: Option<f64>, beta: Option<f64>) -> Recommendation {
    let target_price = current_price.map(|price| price * (1.0 + (score - BASE_SCORE) / 100.0));

    Recommendation {
        tier: RecommendationTier::from_score(score),
        target_price,
        risk_level: RiskLevel::from_beta(beta),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn averages_with_pe(pe: f64) -> IndustryAverages {
        IndustryAverages::default().with(Metric::PeRatio, pe)
    }

    #[test]
    fn test_all_missing_is_neutral() {
        let stock = StockSnapshot::new("AAA");
        assert_eq!(score(&stock, &IndustryAverages::default()).unwrap(), 50.0);
        assert_eq!(breakdown(&stock, &IndustryAverages::default()), ScoreBreakdown::default());
    }

    #[test]
    fn test_valuation_factor() {
        let stock = StockSnapshot {
            pe_ratio: Some(20.0),
            ..StockSnapshot::new("AAA")
        };
        // Cheaper than peers: capped at +10
        let cheap = StockSnapshot {
            pe_ratio: Some(5.0),
            ..stock.clone()
        };
        assert_eq!(breakdown(&cheap, &averages_with_pe(20.0)).valuation, Some(10.0));
        // At the peer average: 20 * 1 - 10
        assert_eq!(breakdown(&stock, &averages_with_pe(20.0)).valuation, Some(10.0));
        // Twice as expensive: 20 * 0.5 - 10
        assert_eq!(breakdown(&stock, &averages_with_pe(10.0)).valuation, Some(0.0));
        // Missing peer average skips the factor
        assert_eq!(breakdown(&stock, &IndustryAverages::default()).valuation, None);
    }

    #[test]
    fn test_zero_pe_matches_absent_pe() {
        let averages = averages_with_pe(15.0);
        let base = StockSnapshot {
            roe: Some(0.12),
            current_ratio: Some(1.4),
            ..StockSnapshot::new("AAA")
        };
        let zero = StockSnapshot {
            pe_ratio: Some(0.0),
            ..base.clone()
        };
        let absent = StockSnapshot {
            pe_ratio: None,
            ..base
        };

        assert_eq!(breakdown(&zero, &averages).valuation, None);
        assert_eq!(score(&zero, &averages).unwrap(), score(&absent, &averages).unwrap());
    }

    #[test]
    fn test_leverage_bounds() {
        let low_debt = StockSnapshot {
            debt_to_equity: Some(10.0),
            ..StockSnapshot::new("A")
        };
        let heavy_debt = StockSnapshot {
            debt_to_equity: Some(5000.0),
            ..StockSnapshot::new("B")
        };
        let averages = IndustryAverages::default();
        assert!((breakdown(&low_debt, &averages).leverage.unwrap() - 4.9).abs() < 1e-12);
        assert_eq!(breakdown(&heavy_debt, &averages).leverage, Some(-10.0));
    }

    #[test]
    fn test_negative_inputs_are_skipped() {
        let stock = StockSnapshot {
            roe: Some(-0.3),
            profit_margin: Some(-0.1),
            revenue_growth: Some(-0.2),
            ..StockSnapshot::new("AAA")
        };
        assert_eq!(score(&stock, &IndustryAverages::default()).unwrap(), 50.0);
    }

    #[test]
    fn test_score_stays_in_range() {
        let strong = StockSnapshot {
            pe_ratio: Some(1.0),
            roe: Some(5.0),
            profit_margin: Some(1.0),
            debt_to_equity: Some(0.5),
            current_ratio: Some(10.0),
            revenue_growth: Some(3.0),
            ..StockSnapshot::new("AAA")
        };
        let averages = averages_with_pe(30.0);
        // Every factor saturates; leverage tops out just under +5
        let s = score(&strong, &averages).unwrap();
        assert!((s - 84.995).abs() < 1e-9);
        assert!(s <= MAX_SCORE);

        let weak = StockSnapshot {
            pe_ratio: Some(1000.0),
            roe: Some(0.001),
            profit_margin: Some(0.001),
            debt_to_equity: Some(9000.0),
            current_ratio: Some(0.01),
            revenue_growth: Some(0.001),
            ..StockSnapshot::new("BBB")
        };
        let s = score(&weak, &averages).unwrap();
        assert!((MIN_SCORE..=MAX_SCORE).contains(&s));
        assert!(s < 15.0);
    }

    #[test]
    fn test_clamp_bounds_raw_total() {
        let breakdown = ScoreBreakdown {
            valuation: Some(60.0),
            ..ScoreBreakdown::default()
        };
        assert_eq!(breakdown.raw_total(), 110.0);
        assert_eq!(breakdown.total(), MAX_SCORE);

        let breakdown = ScoreBreakdown {
            leverage: Some(-80.0),
            ..ScoreBreakdown::default()
        };
        assert_eq!(breakdown.total(), MIN_SCORE);
    }

    #[test]
    fn test_growth_is_monotonic() {
        let averages = averages_with_pe(20.0);
        let slow = StockSnapshot {
            pe_ratio: Some(25.0),
            revenue_growth: Some(0.05),
            ..StockSnapshot::new("AAA")
        };
        let fast = StockSnapshot {
            revenue_growth: Some(0.20),
            ..slow.clone()
        };
        assert!(score(&fast, &averages).unwrap() >= score(&slow, &averages).unwrap());
    }

    #[test]
    fn test_non_finite_input_is_computation_error() {
        // NaN compares false against 0 and is skipped
        let stock = StockSnapshot {
            roe: Some(f64::NAN),
            pe_ratio: Some(f64::NAN),
            ..StockSnapshot::new("NAN")
        };
        assert_eq!(score(&stock, &averages_with_pe(10.0)).unwrap(), 50.0);

        // inf / inf poisons the valuation factor
        let stock = StockSnapshot {
            pe_ratio: Some(f64::INFINITY),
            ..StockSnapshot::new("INF")
        };
        let averages = averages_with_pe(f64::INFINITY);
        assert!(matches!(
            score(&stock, &averages),
            Err(StockError::Computation { symbol, .. }) if symbol == "INF"
        ));
    }

    #[test]
    fn test_recommendation_tiers() {
        assert_eq!(RecommendationTier::from_score(70.0), RecommendationTier::StrongBuy);
        assert_eq!(RecommendationTier::from_score(69.9), RecommendationTier::Buy);
        assert_eq!(RecommendationTier::from_score(60.0), RecommendationTier::Buy);
        assert_eq!(RecommendationTier::from_score(40.0), RecommendationTier::Hold);
        assert_eq!(RecommendationTier::from_score(30.0), RecommendationTier::Sell);
        assert_eq!(RecommendationTier::from_score(29.99), RecommendationTier::StrongSell);
        assert_eq!(RecommendationTier::StrongBuy.to_string(), "STRONG BUY");
    }

    #[test]
    fn test_target_price_projection() {
        let up = recommend(75.0, Some(100.0), Some(1.0));
        assert!((up.target_price.unwrap() - 125.0).abs() < 1e-9);

        let down = recommend(35.0, Some(100.0), Some(1.0));
        assert!((down.target_price.unwrap() - 85.0).abs() < 1e-9);

        let mid = recommend(55.0, Some(100.0), None);
        assert!((mid.target_price.unwrap() - 105.0).abs() < 1e-9);

        // No jump between the HOLD and BUY bands
        let below = recommend(59.999, Some(100.0), None).target_price.unwrap();
        let at = recommend(60.0, Some(100.0), None).target_price.unwrap();
        assert!((at - below).abs() < 1e-2);
        assert!((at - 110.0).abs() < 1e-9);

        assert_eq!(recommend(80.0, None, None).target_price, None);
    }

    #[test]
    fn test_risk_levels() {
        assert_eq!(RiskLevel::from_beta(Some(1.6)), RiskLevel::High);
        assert_eq!(RiskLevel::from_beta(Some(1.5)), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_beta(Some(0.8)), RiskLevel::Low);
        assert_eq!(RiskLevel::from_beta(None), RiskLevel::Medium);
    }

    #[test]
    fn test_industry_averages_skip_missing_values() {
        let a = StockSnapshot {
            pe_ratio: Some(10.0),
            roe: Some(0.2),
            ..StockSnapshot::new("A")
        };
        let b = StockSnapshot {
            pe_ratio: Some(30.0),
            ..StockSnapshot::new("B")
        };
        let averages = IndustryAverages::from_snapshots([&a, &b]);

        assert_eq!(averages.get(Metric::PeRatio), Some(20.0));
        assert_eq!(averages.get(Metric::Roe), Some(0.2));
        assert_eq!(averages.get(Metric::Beta), None);
        assert_eq!(averages.len(), 2);

        let json = serde_json::to_value(&averages).unwrap();
        assert_eq!(json["pe_ratio"], 20.0);
    }
}
