//! Stock insight CLI
//!
//! Analyzes one or more stock symbols over a timeframe, prints technical
//! indicators and AI-generated insights, and compares symbols when more than
//! one is given.
//!
//! # Usage
//!
//! ```bash
//! export ANTHROPIC_API_KEY=...
//! stock-insight AAPL --timeframe 3mo
//! stock-insight AAPL MSFT GOOG --timeframe 1y --provider openai
//! ```

use clap::Parser;
use insight_stock::{AppConfig, ProviderKind, StockInsight, Timeframe, console};
use std::env;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "stock-insight", about = "Analyze stock data and generate insights")]
struct Args {
    /// Stock symbols to analyze
    #[arg(required = true)]
    symbols: Vec<String>,

    /// Timeframe for the analysis (1d, 5d, 1mo, 3mo, 6mo, 1y)
    #[arg(short, long, default_value = "3mo")]
    timeframe: String,

    /// AI provider to use (anthropic, openai)
    #[arg(long, default_value = "anthropic")]
    provider: String,

    /// API key; falls back to the provider's environment variable
    #[arg(long)]
    api_key: Option<String>,

    /// Directory for cached insight records
    #[arg(long, default_value = "cache")]
    cache_dir: PathBuf,

    /// Maximum news headlines per symbol
    #[arg(long, default_value_t = 5)]
    news_limit: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG").unwrap_or_else(|_| "warn,insight_stock=info".to_string()),
        )
        .init();

    let args = Args::parse();

    let timeframe: Timeframe = args.timeframe.parse()?;
    let provider: ProviderKind = args.provider.parse()?;

    let mut builder = AppConfig::builder()
        .provider(provider)
        .cache_dir(args.cache_dir)
        .news_limit(args.news_limit);
    if let Some(key) = args.api_key {
        builder = builder.api_key(key);
    }
    let config = builder.build()?;

    let app = StockInsight::new(config)?;

    if let [symbol] = args.symbols.as_slice() {
        let report = app.analyze(symbol, timeframe).await?;
        print_report(&report);
        return Ok(());
    }

    let outcome = app.analyze_many(&args.symbols, timeframe).await;

    for report in &outcome.reports {
        print_report(report);
    }
    for (symbol, error) in &outcome.failures {
        eprintln!("Error analyzing {symbol}: {error}");
    }
    if let Some(comparison) = &outcome.comparison {
        print!("{}", console::render_comparison(comparison));
    }

    if outcome.reports.is_empty() {
        anyhow::bail!("all symbols failed");
    }
    Ok(())
}

fn print_report(report: &insight_stock::SymbolReport) {
    print!("{}", console::render_header(&report.symbol, report.timeframe));
    print!("{}", console::render_technical(&report.bundle));
    print!("{}", console::render_market_summary(&report.bundle));
    print!("{}", console::render_news(&report.news));
    print!("{}", console::render_insights(&report.insights));
}
