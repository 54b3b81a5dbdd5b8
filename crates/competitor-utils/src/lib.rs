//! Shared utilities for the competitor analysis workspace
//!
//! Logging setup and JSON configuration loading used by the binaries.

pub mod config;
pub mod logging;

pub use config::load_json;
pub use logging::{LogFormat, init_tracing};
