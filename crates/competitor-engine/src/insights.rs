//! Narrative insights over a finished analysis
//!
//! Strengths and weaknesses compare the main stock with the mean of its
//! competitors' positive values. Returns and growth are fractions.

use serde::{Deserialize, Serialize};

use crate::engine::{AnalysisResult, ScoredStock};
use crate::scoring::DEFAULT_BETA;
use crate::snapshot::StockSnapshot;

/// Everything the insight helpers derive from one result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub thesis: String,
    pub risks: Vec<String>,
}

impl AnalysisResult {
    pub fn insights(&self) -> Insights {
        let (strengths, weaknesses) = self.strengths_and_weaknesses();
        Insights {
            strengths,
            weaknesses,
            thesis: self.investment_thesis(),
            risks: self.risks(),
        }
    }

    /// Main-stock strengths and weaknesses relative to its competitors
    pub fn strengths_and_weaknesses(&self) -> (Vec<String>, Vec<String>) {
        let mut strengths = Vec::new();
        let mut weaknesses = Vec::new();
        if self.competitors.is_empty() {
            return (strengths, weaknesses);
        }

        let main = &self.main_stock.snapshot;
        let peers = &self.competitors;

        if let (Some(pe), Some(avg)) = (positive(main.pe_ratio), peer_mean(peers, |s| s.pe_ratio)) {
            if pe < avg * 0.85 {
                strengths.push(format!(
                    "Attractive valuation with P/E of {pe:.1} vs peer average of {avg:.1}"
                ));
            } else if pe > avg * 1.25 {
                weaknesses.push(format!(
                    "Premium valuation at P/E of {pe:.1} vs peer average of {avg:.1}"
                ));
            }
        }

        if let (Some(roe), Some(avg)) = (positive(main.roe), peer_mean(peers, |s| s.roe)) {
            if roe > avg * 1.15 {
                strengths.push(format!(
                    "Superior profitability with ROE of {} vs peer average of {}",
                    percent(roe),
                    percent(avg)
                ));
            } else if roe < avg * 0.75 {
                weaknesses.push(format!(
                    "Below-average profitability with ROE of {} vs peer average of {}",
                    percent(roe),
                    percent(avg)
                ));
            }
        }

        if let (Some(margin), Some(avg)) = (
            positive(main.profit_margin),
            peer_mean(peers, |s| s.profit_margin),
        ) {
            if margin > avg * 1.2 {
                strengths.push(format!(
                    "Excellent profit margins at {} vs peer average of {}",
                    percent(margin),
                    percent(avg)
                ));
            } else if margin < avg * 0.8 {
                weaknesses.push(format!(
                    "Compressed margins at {} vs peer average of {}",
                    percent(margin),
                    percent(avg)
                ));
            }
        }

        if let Some(de) = main.debt_to_equity {
            if de < 25.0 {
                strengths.push(format!(
                    "Strong balance sheet with low debt-to-equity ratio of {de:.1}"
                ));
            } else if de > 100.0 {
                weaknesses.push(format!(
                    "High financial leverage with debt-to-equity ratio of {de:.1}"
                ));
            }
        }

        if let Some(growth) = main.revenue_growth {
            if growth > 0.15 {
                strengths.push(format!(
                    "Strong revenue growth momentum at {}",
                    percent(growth)
                ));
            } else if growth < -0.05 {
                weaknesses.push(format!("Declining revenue trend at {}", percent(growth)));
            }
        }

        if let Some(ytd) = main.ytd_return {
            if ytd > 0.15 {
                strengths.push(format!(
                    "Strong market performance with YTD return of +{}",
                    percent(ytd)
                ));
            } else if ytd < -0.15 {
                weaknesses.push(format!(
                    "Poor market performance with YTD return of {}",
                    percent(ytd)
                ));
            }
        }

        (strengths, weaknesses)
    }

    /// One-line verdict on where the main stock landed
    pub fn rank_summary(&self) -> String {
        let symbol = self.main_stock.symbol();
        let rank = self.main_rank();
        if rank == 1 {
            format!("{symbol} is the top-ranked stock in this analysis")
        } else if rank <= 3 {
            format!("{symbol} ranks in the top 3")
        } else if rank <= self.total_stocks() / 2 {
            format!("{symbol} shows above-average performance")
        } else {
            format!("{symbol} ranks in the bottom half; consider the alternatives")
        }
    }

    /// One-paragraph summary keyed on the main stock's score band
    pub fn investment_thesis(&self) -> String {
        let symbol = self.main_stock.symbol();
        let score = self.main_stock.score;
        let rank = self.main_rank();
        let total = self.total_stocks();

        if score >= 75.0 {
            format!(
                "{symbol} stands out as a compelling opportunity, ranking #{rank} of {total} \
                 compared stocks with a composite score of {score:.1}/100. Its fundamentals \
                 lead the peer group and point to a durable competitive position."
            )
        } else if score >= 60.0 {
            format!(
                "{symbol} presents a solid case with a composite score of {score:.1}/100 \
                 (rank #{rank} of {total}). Fundamentals are balanced with positive \
                 indicators, and the overall profile favors risk-adjusted returns over the \
                 medium term."
            )
        } else if score >= 40.0 {
            format!(
                "The outlook for {symbol} is neutral with a composite score of {score:.1}/100. \
                 It ranks #{rank} among {total} compared stocks, with mixed signals that \
                 suggest waiting for clearer catalysts."
            )
        } else {
            format!(
                "{symbol} faces significant headwinds with a composite score of \
                 {score:.1}/100 (rank #{rank} of {total}). Several fundamental weaknesses \
                 argue for defensive positioning until they improve."
            )
        }
    }

    /// Risk factors for the main stock, sector note last
    pub fn risks(&self) -> Vec<String> {
        let main = &self.main_stock.snapshot;
        let mut risks = Vec::new();

        let beta = main.beta.unwrap_or(DEFAULT_BETA);
        if beta > 1.5 {
            risks.push(format!("High volatility risk with beta of {beta:.2}"));
        }
        if let Some(pe) = main.pe_ratio.filter(|pe| *pe > 30.0) {
            risks.push(format!("Valuation risk with elevated P/E ratio of {pe:.1}"));
        }
        if let Some(de) = main.debt_to_equity.filter(|de| *de > 80.0) {
            risks.push(format!("Financial leverage risk with debt-to-equity of {de:.1}"));
        }
        if let Some(roe) = main.roe.filter(|roe| *roe < 0.05) {
            risks.push(format!("Low profitability with ROE of {}", percent(roe)));
        }
        if let Some(growth) = main.revenue_growth.filter(|g| *g < -0.1) {
            risks.push(format!("Revenue decline risk with growth of {}", percent(growth)));
        }
        if let Some(ytd) = main.ytd_return.filter(|r| *r < -0.2) {
            risks.push(format!(
                "Poor market momentum with YTD return of {}",
                percent(ytd)
            ));
        }

        let sector = main.sector.as_str();
        if sector.contains("Technology") {
            risks.push("Technology sector volatility and regulatory scrutiny".to_string());
        } else if sector.contains("Energy") {
            risks.push("Commodity price volatility and environmental regulations".to_string());
        } else if sector.contains("Financial") {
            risks.push("Interest rate sensitivity and regulatory changes".to_string());
        }

        risks
    }
}

/// `$1.50T`, `$50.00B`, `$250.00M` or whole dollars; `N/A` when absent or zero
pub fn format_market_cap(market_cap: Option<f64>) -> String {
    match market_cap {
        None => "N/A".to_string(),
        Some(cap) if cap == 0.0 || !cap.is_finite() => "N/A".to_string(),
        Some(cap) if cap >= 1e12 => format!("${:.2}T", cap / 1e12),
        Some(cap) if cap >= 1e9 => format!("${:.2}B", cap / 1e9),
        Some(cap) if cap >= 1e6 => format!("${:.2}M", cap / 1e6),
        Some(cap) => format!("${cap:.0}"),
    }
}

/// Fraction rendered as a percentage with one decimal
pub fn percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

fn peer_mean(peers: &[ScoredStock], metric: impl Fn(&StockSnapshot) -> Option<f64>) -> Option<f64> {
    let values: Vec<f64> = peers
        .iter()
        .filter_map(|p| positive(metric(&p.snapshot)))
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{IndustryAverages, RecommendationTier, RiskLevel, ScoreBreakdown};

    fn scored(snapshot: StockSnapshot, score: f64) -> ScoredStock {
        ScoredStock {
            snapshot,
            score,
            breakdown: ScoreBreakdown::default(),
            recommendation: RecommendationTier::from_score(score),
            target_price: None,
            risk_level: RiskLevel::Medium,
        }
    }

    fn result(main: ScoredStock, competitors: Vec<ScoredStock>) -> AnalysisResult {
        let mut all_stocks = vec![main.clone()];
        all_stocks.extend(competitors.iter().cloned());
        all_stocks.sort_by(|a, b| b.score.total_cmp(&a.score));
        AnalysisResult {
            main_stock: main,
            competitors,
            all_stocks,
            industry_avg: IndustryAverages::default(),
        }
    }

    #[test]
    fn test_format_market_cap() {
        assert_eq!(format_market_cap(Some(1.5e12)), "$1.50T");
        assert_eq!(format_market_cap(Some(5e10)), "$50.00B");
        assert_eq!(format_market_cap(Some(2.5e8)), "$250.00M");
        assert_eq!(format_market_cap(Some(950.0)), "$950");
        assert_eq!(format_market_cap(Some(0.0)), "N/A");
        assert_eq!(format_market_cap(None), "N/A");
    }

    #[test]
    fn test_strengths_and_weaknesses() {
        let main = StockSnapshot {
            pe_ratio: Some(10.0),
            roe: Some(0.05),
            debt_to_equity: Some(150.0),
            revenue_growth: Some(0.30),
            ytd_return: Some(-0.25),
            ..StockSnapshot::new("MAIN")
        };
        let peer = |symbol: &str, pe: f64| StockSnapshot {
            pe_ratio: Some(pe),
            roe: Some(0.20),
            ..StockSnapshot::new(symbol)
        };
        let analysis = result(
            scored(main, 55.0),
            vec![scored(peer("P1", 20.0), 50.0), scored(peer("P2", 30.0), 45.0)],
        );

        let (strengths, weaknesses) = analysis.strengths_and_weaknesses();
        assert_eq!(strengths.len(), 2);
        assert!(strengths[0].contains("P/E of 10.0 vs peer average of 25.0"));
        assert!(strengths[1].contains("30.0%"));

        assert_eq!(weaknesses.len(), 3);
        assert!(weaknesses[0].contains("ROE of 5.0% vs peer average of 20.0%"));
        assert!(weaknesses[1].contains("debt-to-equity ratio of 150.0"));
        assert!(weaknesses[2].contains("-25.0%"));
    }

    #[test]
    fn test_no_competitors_no_comparison() {
        let analysis = result(scored(StockSnapshot::new("MAIN"), 50.0), Vec::new());
        let (strengths, weaknesses) = analysis.strengths_and_weaknesses();
        assert!(strengths.is_empty());
        assert!(weaknesses.is_empty());
    }

    #[test]
    fn test_thesis_bands() {
        let peer = scored(StockSnapshot::new("PEER"), 50.0);
        let thesis = |score| {
            result(scored(StockSnapshot::new("MAIN"), score), vec![peer.clone()])
                .investment_thesis()
        };

        assert!(thesis(80.0).contains("compelling"));
        assert!(thesis(80.0).contains("#1 of 2"));
        assert!(thesis(65.0).contains("solid case"));
        assert!(thesis(45.0).contains("neutral"));
        assert!(thesis(20.0).contains("headwinds"));
        assert!(thesis(20.0).contains("#2 of 2"));
    }

    #[test]
    fn test_rank_summary() {
        let peers: Vec<ScoredStock> = (1..=5)
            .map(|i| scored(StockSnapshot::new(format!("P{i}")), 50.0 + f64::from(i)))
            .collect();

        let top = result(scored(StockSnapshot::new("MAIN"), 90.0), peers.clone());
        assert!(top.rank_summary().contains("top-ranked"));

        let bottom = result(scored(StockSnapshot::new("MAIN"), 10.0), peers);
        assert_eq!(bottom.main_rank(), 6);
        assert!(bottom.rank_summary().contains("bottom half"));
    }

    #[test]
    fn test_risks() {
        let main = StockSnapshot {
            sector: "Technology".to_string(),
            beta: Some(1.8),
            pe_ratio: Some(45.0),
            roe: Some(0.02),
            ..StockSnapshot::new("MAIN")
        };
        let risks = result(scored(main, 40.0), Vec::new()).risks();
        assert_eq!(risks.len(), 4);
        assert!(risks[0].contains("beta of 1.80"));
        assert!(risks[1].contains("P/E ratio of 45.0"));
        assert!(risks[2].contains("ROE of 2.0%"));
        assert_eq!(risks[3], "Technology sector volatility and regulatory scrutiny");
    }

    #[test]
    fn test_missing_beta_is_not_a_risk() {
        let risks = result(scored(StockSnapshot::new("MAIN"), 50.0), Vec::new()).risks();
        assert!(risks.is_empty());
    }
}
