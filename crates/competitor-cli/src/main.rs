//! Command-line interface for stock competitor analysis
//!
//! # Usage
//!
//! ```bash
//! # Analyze one symbol against live Yahoo Finance data
//! cargo run -p competitor-cli -- MSFT
//!
//! # Offline run over a fixture file, JSON output
//! cargo run -p competitor-cli -- MSFT --fixtures quotes.json --json
//!
//! # Interactive prompt
//! cargo run -p competitor-cli
//! ```

mod report;

use anyhow::{Context, Result};
use clap::Parser;
use competitor_engine::{
    AnalysisOrchestrator, EngineConfig, InMemoryProvider, ProgressEvent, ProgressSink,
    QuoteProvider, Severity, Taxonomy, YahooProvider,
};
use competitor_utils::{LogFormat, init_tracing, load_json};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "competitor-cli")]
#[command(about = "Rank a stock against its industry competitors", long_about = None)]
struct Args {
    /// Ticker symbol to analyze; starts an interactive prompt when omitted
    symbol: Option<String>,

    /// Maximum number of competitors to compare against
    #[arg(long)]
    max_peers: Option<usize>,

    /// Print the analysis result as JSON
    #[arg(long)]
    json: bool,

    /// Serve quotes from a JSON fixture file instead of Yahoo Finance
    #[arg(long, value_name = "FILE")]
    fixtures: Option<PathBuf>,

    /// Replace the built-in industry and sector tables
    #[arg(long, value_name = "FILE")]
    taxonomy: Option<PathBuf>,

    /// Engine configuration file (JSON)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log output format: pretty or json
    #[arg(long, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

/// Prints progress messages to stderr
struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn report(&self, event: &ProgressEvent) {
        match event.severity() {
            Severity::Info => eprintln!("  {event}"),
            Severity::Warning => eprintln!("  ! {event}"),
            Severity::Failure => eprintln!("  x {event}"),
        }
    }
}

fn build_config(args: &Args) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => load_json::<EngineConfig>(path)?,
        None => EngineConfig::default(),
    };
    if let Some(max_peers) = args.max_peers {
        config.max_peers = max_peers;
    }
    config.validate().context("Invalid engine configuration")?;
    Ok(config)
}

fn build_provider(args: &Args, config: &EngineConfig) -> Result<Arc<dyn QuoteProvider>> {
    match &args.fixtures {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let provider = InMemoryProvider::from_json_str(&raw)
                .with_context(|| format!("Invalid fixture file {}", path.display()))?;
            info!(symbols = provider.len(), path = %path.display(), "Loaded fixtures");
            Ok(Arc::new(provider))
        }
        None => Ok(Arc::new(YahooProvider::new(config.requests_per_minute)?)),
    }
}

fn build_taxonomy(args: &Args) -> Result<Taxonomy> {
    match &args.taxonomy {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Taxonomy::from_json_str(&raw)
                .with_context(|| format!("Invalid taxonomy file {}", path.display()))
        }
        None => Ok(Taxonomy::builtin()),
    }
}

async fn run_once(orchestrator: &AnalysisOrchestrator, symbol: &str, json: bool) -> Result<()> {
    let result = orchestrator.analyze(symbol, &ConsoleProgress).await?;
    if json {
        println!("{}", result.to_json()?);
    } else {
        println!("{}", report::render(&result));
    }
    Ok(())
}

async fn repl(orchestrator: &AnalysisOrchestrator, json: bool) -> Result<()> {
    println!("{}", "=".repeat(60));
    println!("STOCK COMPETITOR ANALYZER");
    println!("{}", "=".repeat(60));

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("\nEnter stock symbol (or 'quit' to exit): ");
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                println!();
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        let input = input.trim();
        if matches!(input.to_lowercase().as_str(), "quit" | "exit" | "q") {
            break;
        }
        if input.is_empty() {
            println!("Please enter a valid stock symbol.");
            continue;
        }

        println!("\nAnalyzing {}...", input.to_uppercase());
        if let Err(e) = run_once(orchestrator, input, json).await {
            eprintln!("Error: {e}");
        }
    }

    println!("Thank you for using the stock competitor analyzer!");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    init_tracing(args.log_format);

    info!("Starting competitor-cli");

    let config = build_config(&args)?;
    let provider = build_provider(&args, &config)?;
    let taxonomy = build_taxonomy(&args)?;
    let orchestrator = AnalysisOrchestrator::new(provider, taxonomy, config)?;

    match args.symbol.as_deref() {
        Some(symbol) => run_once(&orchestrator, symbol, args.json).await,
        None => repl(&orchestrator, args.json).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "competitor-cli",
            "msft",
            "--max-peers",
            "3",
            "--json",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(args.symbol.as_deref(), Some("msft"));
        assert_eq!(args.max_peers, Some(3));
        assert!(args.json);
        assert_eq!(args.log_format, LogFormat::Json);

        let config = build_config(&args).unwrap();
        assert_eq!(config.max_peers, 3);
    }

    #[test]
    fn test_interactive_without_symbol() {
        let args = Args::try_parse_from(["competitor-cli"]).unwrap();
        assert!(args.symbol.is_none());
        assert_eq!(args.log_format, LogFormat::Pretty);
        assert_eq!(build_taxonomy(&args).unwrap(), Taxonomy::builtin());
    }

    #[test]
    fn test_zero_peers_rejected() {
        let args = Args::try_parse_from(["competitor-cli", "MSFT", "--max-peers", "0"]).unwrap();
        assert!(build_config(&args).is_err());
    }
}
