//! Error types for competitor analysis operations

use thiserror::Error;

/// Competitor analysis errors
#[derive(Debug, Error)]
pub enum StockError {
    /// Invalid stock symbol, or the instrument is not a tradable equity
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Data not available for the requested symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable {
        symbol: String,
        reason: String,
    },

    /// No peer survived discovery and retrieval
    #[error("No competitor data could be retrieved for {symbol}")]
    InsufficientPeers {
        symbol: String,
    },

    /// Scoring produced an unusable value for one stock
    #[error("Computation failed for {symbol}: {reason}")]
    Computation {
        symbol: String,
        reason: String,
    },

    /// Quote provider failure
    #[error("Provider error: {0}")]
    Provider(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, StockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StockError::InvalidSymbol("INVALID".to_string());
        assert_eq!(err.to_string(), "Invalid symbol: INVALID");

        let err = StockError::DataUnavailable {
            symbol: "AAPL".to_string(),
            reason: "No data found".to_string(),
        };
        assert_eq!(err.to_string(), "Data not available for AAPL: No data found");

        let err = StockError::InsufficientPeers {
            symbol: "MSFT".to_string(),
        };
        assert_eq!(err.to_string(), "No competitor data could be retrieved for MSFT");
    }

    #[test]
    fn test_json_conversion() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: StockError = parse.unwrap_err().into();
        assert!(err.to_string().starts_with("JSON error"));
    }
}
