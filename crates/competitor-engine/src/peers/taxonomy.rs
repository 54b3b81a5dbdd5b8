//! Industry and sector peer tables
//!
//! Both tables are ordered lists; lookups depend on declaration order.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StockError};

/// One taxonomy row: a classification key and its curated peer symbols
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    pub key: String,
    pub symbols: Vec<String>,
}

impl TaxonomyEntry {
    pub fn new(key: impl Into<String>, symbols: &[&str]) -> Self {
        Self {
            key: key.into(),
            symbols: symbols.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

/// Curated industry → peers and sector → peers tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    pub industries: Vec<TaxonomyEntry>,
    pub sectors: Vec<TaxonomyEntry>,
}

impl Taxonomy {
    pub fn new(industries: Vec<TaxonomyEntry>, sectors: Vec<TaxonomyEntry>) -> Self {
        Self {
            industries,
            sectors,
        }
    }

    /// Load a taxonomy from JSON: `{"industries": [...], "sectors": [...]}`
    pub fn from_json_str(json: &str) -> Result<Self> {
        let taxonomy: Taxonomy = serde_json::from_str(json)?;
        if taxonomy.sectors.is_empty() && taxonomy.industries.is_empty() {
            return Err(StockError::ConfigError("taxonomy has no entries".to_string()));
        }
        Ok(taxonomy)
    }

    /// First industry entry whose key contains, or is contained in, `industry`
    /// (case-insensitive). An empty industry matches nothing.
    pub fn match_industry(&self, industry: &str) -> Option<&TaxonomyEntry> {
        let industry = industry.trim().to_lowercase();
        if industry.is_empty() {
            return None;
        }
        self.industries.iter().find(|entry| {
            let key = entry.key.to_lowercase();
            industry.contains(&key) || key.contains(&industry)
        })
    }

    /// Sector entry with exactly this key
    pub fn sector(&self, sector: &str) -> Option<&TaxonomyEntry> {
        self.sectors.iter().find(|entry| entry.key == sector)
    }

    /// Every sector symbol in table order, duplicates included
    pub fn all_sector_symbols(&self) -> impl Iterator<Item = &str> {
        self.sectors
            .iter()
            .flat_map(|entry| entry.symbols.iter().map(String::as_str))
    }

    /// Built-in curated tables
    pub fn builtin() -> Self {
        let industries = vec![
            // Technology
            TaxonomyEntry::new(
                "Software",
                &[
                    "MSFT", "ORCL", "CRM", "ADBE", "NOW", "INTU", "VMW", "CTXS", "TEAM", "ZM",
                    "DDOG", "SNOW", "PLTR", "WDAY",
                ],
            ),
            TaxonomyEntry::new(
                "Semiconductors",
                &[
                    "NVDA", "AMD", "INTC", "QCOM", "AVGO", "TXN", "ADI", "MRVL", "XLNX", "LRCX",
                    "KLAC", "AMAT",
                ],
            ),
            TaxonomyEntry::new(
                "Consumer Electronics",
                &["AAPL", "SONY", "HPQ", "DELL", "LOGI", "GRMN", "HEAR"],
            ),
            TaxonomyEntry::new(
                "Internet Content",
                &[
                    "GOOGL", "META", "AMZN", "NFLX", "UBER", "LYFT", "SNAP", "PINS", "TWTR", "ROKU",
                ],
            ),
            TaxonomyEntry::new(
                "E-commerce",
                &["AMZN", "SHOP", "EBAY", "ETSY", "BABA", "JD", "MELI", "SE"],
            ),
            // Healthcare
            TaxonomyEntry::new(
                "Biotechnology",
                &[
                    "GILD", "AMGN", "BIIB", "REGN", "VRTX", "CELG", "ILMN", "MRNA", "BNTX", "NVAX",
                ],
            ),
            TaxonomyEntry::new(
                "Drug Manufacturers",
                &["JNJ", "PFE", "MRK", "ABT", "BMY", "LLY", "AZN", "NVO", "RHHBY", "GSK"],
            ),
            TaxonomyEntry::new(
                "Medical Devices",
                &["MDT", "ABT", "TMO", "DHR", "SYK", "BSX", "EW", "ZBH", "ISRG", "DXCM"],
            ),
            TaxonomyEntry::new(
                "Healthcare Plans",
                &["UNH", "ANTM", "AET", "CI", "HUM", "CNC", "MOH"],
            ),
            // Financial services
            TaxonomyEntry::new(
                "Banks",
                &["JPM", "BAC", "WFC", "C", "USB", "PNC", "TFC", "COF", "MS", "GS"],
            ),
            TaxonomyEntry::new(
                "Insurance",
                &["BRK-B", "PG", "AIG", "MET", "PRU", "ALL", "TRV", "CB", "AXP"],
            ),
            TaxonomyEntry::new(
                "Credit Services",
                &["V", "MA", "AXP", "COF", "DFS", "SYF", "PYPL", "SQ"],
            ),
            TaxonomyEntry::new(
                "Investment Banking",
                &["GS", "MS", "JPM", "BAC", "C", "BCS", "DB", "CS"],
            ),
            // Energy and utilities
            TaxonomyEntry::new(
                "Oil & Gas",
                &["XOM", "CVX", "COP", "EOG", "SLB", "HAL", "OXY", "KMI", "WMB", "EPD"],
            ),
            TaxonomyEntry::new(
                "Utilities",
                &["NEE", "DUK", "SO", "D", "EXC", "AEP", "XEL", "PEG", "ED", "FE"],
            ),
            TaxonomyEntry::new(
                "Renewable Energy",
                &["TSLA", "ENPH", "SEDG", "NEE", "BEP", "ICLN"],
            ),
            // Consumer and retail
            TaxonomyEntry::new(
                "Retail",
                &["WMT", "TGT", "COST", "HD", "LOW", "TJX", "ROST", "BBY", "GPS", "M"],
            ),
            TaxonomyEntry::new(
                "Restaurants",
                &["MCD", "SBUX", "YUM", "QSR", "CMG", "DPZ", "DRI", "EAT"],
            ),
            TaxonomyEntry::new(
                "Consumer Goods",
                &["PG", "UL", "KO", "PEP", "CL", "KMB", "GIS", "K", "CAG", "CPB"],
            ),
            TaxonomyEntry::new(
                "Apparel",
                &["NKE", "ADSK", "LULU", "UAA", "VFC", "RL", "PVH", "URBN", "GPS"],
            ),
            // Industrials
            TaxonomyEntry::new(
                "Aerospace",
                &["BA", "LMT", "RTX", "NOC", "GD", "TDG", "LHX", "HWM", "TXT"],
            ),
            TaxonomyEntry::new(
                "Industrial Equipment",
                &["GE", "CAT", "DE", "HON", "MMM", "EMR", "ITW", "PH", "ROK"],
            ),
            TaxonomyEntry::new(
                "Automotive",
                &["TSLA", "GM", "F", "TM", "HMC", "STLA", "RIVN", "LCID", "NIO", "XPEV"],
            ),
            TaxonomyEntry::new(
                "Transportation",
                &["UPS", "FDX", "UAL", "DAL", "AAL", "LUV", "JBLU", "UBER", "LYFT"],
            ),
            // Real estate
            TaxonomyEntry::new(
                "REITs",
                &["AMT", "PLD", "CCI", "EQIX", "SPG", "O", "WELL", "PSA", "AVB", "EQR"],
            ),
            // Media and entertainment
            TaxonomyEntry::new(
                "Media",
                &["DIS", "NFLX", "PARA", "WBD", "ROKU", "SPOT", "T", "VZ", "TMUS"],
            ),
            TaxonomyEntry::new("Gaming", &["ATVI", "EA", "TTWO", "RBLX", "UNITY", "ZNGA"]),
        ];

        let sectors = vec![
            TaxonomyEntry::new(
                "Technology",
                &[
                    "AAPL", "MSFT", "GOOGL", "AMZN", "META", "NVDA", "TSLA", "CRM", "ORCL", "ADBE",
                    "INTC", "AMD",
                ],
            ),
            TaxonomyEntry::new(
                "Healthcare",
                &[
                    "JNJ", "PFE", "UNH", "MRK", "ABT", "TMO", "DHR", "BMY", "LLY", "AMGN", "GILD",
                    "MDT",
                ],
            ),
            TaxonomyEntry::new(
                "Financial Services",
                &[
                    "JPM", "BAC", "BRK-B", "V", "MA", "WFC", "GS", "MS", "C", "USB", "AXP", "COF",
                ],
            ),
            TaxonomyEntry::new(
                "Consumer Cyclical",
                &["AMZN", "TSLA", "HD", "MCD", "NKE", "SBUX", "TJX", "LOW", "TGT", "GM", "F"],
            ),
            TaxonomyEntry::new(
                "Consumer Defensive",
                &["PG", "KO", "PEP", "WMT", "COST", "UL", "CL", "KMB", "GIS", "K"],
            ),
            TaxonomyEntry::new(
                "Energy",
                &["XOM", "CVX", "COP", "EOG", "SLB", "HAL", "OXY", "KMI", "WMB", "MPC"],
            ),
            TaxonomyEntry::new(
                "Industrials",
                &["BA", "CAT", "GE", "MMM", "HON", "UPS", "LMT", "RTX", "DE", "NOC"],
            ),
            TaxonomyEntry::new(
                "Communication Services",
                &["GOOGL", "META", "NFLX", "DIS", "VZ", "T", "TMUS", "ROKU", "SNAP"],
            ),
            TaxonomyEntry::new(
                "Utilities",
                &["NEE", "DUK", "SO", "D", "EXC", "AEP", "XEL", "PEG", "ED", "FE"],
            ),
            TaxonomyEntry::new(
                "Real Estate",
                &["AMT", "PLD", "CCI", "EQIX", "SPG", "O", "WELL", "PSA", "AVB", "EQR"],
            ),
            TaxonomyEntry::new(
                "Materials",
                &["LIN", "APD", "SHW", "FCX", "NEM", "DD", "DOW", "PPG", "ECL", "NUE"],
            ),
        ];

        Self::new(industries, sectors)
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}
