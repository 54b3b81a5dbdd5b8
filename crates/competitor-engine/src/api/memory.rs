//! In-memory quote provider for fixtures and offline runs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

use super::{DailyClose, ProviderProfile, QuoteProvider};
use crate::error::{Result, StockError};

/// Stored data for one symbol
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureEntry {
    pub profile: ProviderProfile,
    #[serde(default)]
    pub history: Vec<DailyClose>,
}

/// Provider serving profiles and histories from memory
///
/// Symbols are matched case-insensitively. A symbol can be marked as failing,
/// in which case every request for it returns a provider error.
#[derive(Debug, Default)]
pub struct InMemoryProvider {
    entries: RwLock<HashMap<String, FixtureEntry>>,
    failing: RwLock<Vec<String>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load fixtures from a JSON object keyed by symbol
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: HashMap<String, FixtureEntry> = serde_json::from_str(json)?;
        let provider = Self::new();
        for (symbol, entry) in entries {
            provider.insert(&symbol, entry.profile, entry.history);
        }
        Ok(provider)
    }

    /// Insert or replace the data for a symbol
    pub fn insert(&self, symbol: &str, profile: ProviderProfile, history: Vec<DailyClose>) {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.insert(symbol.to_uppercase(), FixtureEntry { profile, history });
    }

    /// Make every request for `symbol` fail
    pub fn fail_symbol(&self, symbol: &str) {
        let mut failing = self
            .failing
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        failing.push(symbol.to_uppercase());
    }

    /// Number of symbols with stored data
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, symbol: &str) -> Result<FixtureEntry> {
        let key = symbol.to_uppercase();
        let failing = self
            .failing
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if failing.contains(&key) {
            return Err(StockError::Provider(format!("simulated failure for {key}")));
        }
        drop(failing);

        self.entries
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&key)
            .cloned()
            .ok_or_else(|| StockError::Provider(format!("no data for {key}")))
    }
}

#[async_trait]
impl QuoteProvider for InMemoryProvider {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn profile(&self, symbol: &str) -> Result<ProviderProfile> {
        self.lookup(symbol).map(|entry| entry.profile)
    }

    async fn price_history(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DailyClose>> {
        let mut history: Vec<DailyClose> = self
            .lookup(symbol)?
            .history
            .into_iter()
            .filter(|c| c.timestamp >= start && c.timestamp <= end)
            .collect();
        history.sort_by_key(|c| c.timestamp);
        Ok(history)
    }
}
