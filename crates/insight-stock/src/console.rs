//! Console rendering of analysis reports and comparisons

use crate::analysis::IndicatorBundle;
use crate::api::NewsItem;
use crate::comparison::ComparisonResult;
use crate::timeframe::Timeframe;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use std::fmt::Write as _;

/// Render the report header
pub fn render_header(symbol: &str, timeframe: Timeframe) -> String {
    format!("\n=== Analysis for {symbol} ({timeframe}) ===\n")
}

/// Render the key technical indicators
pub fn render_technical(bundle: &IndicatorBundle) -> String {
    let mut out = String::from("\nTechnical Analysis:\n");
    let _ = writeln!(
        out,
        "Price Change: ${:.2} ({:.2}%)",
        bundle.price_change, bundle.price_change_pct
    );
    let _ = writeln!(out, "Average Volume: {:.0}", bundle.avg_volume);
    let _ = writeln!(out, "RSI: {:.2}", bundle.rsi);
    let _ = writeln!(out, "Trend: {}", bundle.trend);
    out
}

/// Render the market summary (extremes and volatility)
pub fn render_market_summary(bundle: &IndicatorBundle) -> String {
    let mut out = String::from("\nMarket Summary:\n");
    let _ = writeln!(out, "Max Daily Gain: {:.2}%", bundle.max_daily_gain);
    let _ = writeln!(out, "Max Daily Loss: {:.2}%", bundle.max_daily_loss);
    let _ = writeln!(out, "Annualized Volatility: {:.2}", bundle.volatility);
    out
}

/// Render recent news headlines
pub fn render_news(news: &[NewsItem]) -> String {
    let mut out = String::from("\nRecent News:\n");
    if news.is_empty() {
        out.push_str("(none)\n");
    }
    for item in news {
        let _ = writeln!(out, "* {}", item.title);
    }
    out
}

/// Render the AI insights block
pub fn render_insights(insights: &str) -> String {
    format!("\nAI Analysis:\n{insights}\n")
}

/// Render a multi-symbol comparison: performance table, correlation matrix,
/// and rankings
pub fn render_comparison(result: &ComparisonResult) -> String {
    let mut out = String::from("\nStock Comparison:\n\nPerformance:\n");

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Symbol",
        "Change %",
        "Avg Volume",
        "Volatility",
        "RSI",
        "Trend",
    ]);
    for row in &result.performance {
        table.add_row(vec![
            Cell::new(&row.symbol),
            Cell::new(format!("{:.2}", row.price_change_pct)),
            Cell::new(format!("{:.0}", row.avg_volume)),
            Cell::new(format!("{:.2}", row.volatility)),
            Cell::new(format!("{:.2}", row.rsi)),
            Cell::new(row.trend.to_string()),
        ]);
    }
    out.push_str(&table.to_string());
    out.push('\n');

    out.push_str("\nPrice Correlations:\n");
    let mut corr_table = Table::new();
    let mut header = vec![String::new()];
    header.extend(result.correlations.symbols.iter().cloned());
    corr_table.load_preset(UTF8_FULL).set_header(header);
    for (i, symbol) in result.correlations.symbols.iter().enumerate() {
        let mut cells = vec![Cell::new(symbol)];
        for j in 0..result.correlations.symbols.len() {
            cells.push(Cell::new(format!("{:.2}", result.correlations.get(i, j))));
        }
        corr_table.add_row(cells);
    }
    out.push_str(&corr_table.to_string());
    out.push('\n');

    out.push_str("\nRankings:\n");
    let _ = writeln!(out, "Return: {}", result.rankings.by_return.join(" > "));
    let _ = writeln!(out, "Volume: {}", result.rankings.by_volume.join(" > "));
    let _ = writeln!(out, "Momentum: {}", result.rankings.by_momentum.join(" > "));

    out
}
