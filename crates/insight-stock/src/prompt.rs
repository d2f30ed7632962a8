//! Insight prompt assembly

use crate::analysis::IndicatorBundle;
use crate::api::NewsItem;
use crate::timeframe::Timeframe;

/// Build the analyst prompt for a symbol's indicator bundle and news
///
/// Numeric fields are rendered to two decimal places; undefined values appear
/// as NaN and are left for the model to interpret.
pub fn build_insight_prompt(
    symbol: &str,
    timeframe: Timeframe,
    bundle: &IndicatorBundle,
    news: &[NewsItem],
) -> String {
    let mut prompt = format!(
        "Take a deep breath and think step by step. You are a CFA certified expert \
         financial analyst who helps portfolio managers with research. Your task is to \
         extract the most accurate and relevant financial information. Read the documents \
         carefully, because I'm going to ask you to extract relevant financial information \
         about the stock. Analyze the following stock data for {symbol} over a {timeframe} \
         period and provide insights and recommendations:\n\
         Guidelines:\n\
         - Identify key bullet points from the documents that are most relevant to answering the question.\n\
         - If there are no relevant points, respond with 'No relevant information.'\n\
         - Answer the question succinctly and avoid verbatim quotes or references.\n\
         - Give a final detailed overview with recent happenings with the stock.\n\n"
    );

    prompt.push_str(&format!("- Average Price: ${:.2}\n", bundle.avg_price));
    prompt.push_str(&format!(
        "- Price Change: ${:.2} ({:.2}%)\n",
        bundle.price_change, bundle.price_change_pct
    ));
    prompt.push_str(&format!("- Average Volume: {:.2}\n", bundle.avg_volume));
    prompt.push_str(&format!("- Trend: {}\n", bundle.trend));
    prompt.push_str(&format!("- Max Daily Gain: {:.2}%\n", bundle.max_daily_gain));
    prompt.push_str(&format!("- Max Daily Loss: {:.2}%\n", bundle.max_daily_loss));
    prompt.push_str(&format!("- MACD: {:.2}\n", bundle.macd));
    prompt.push_str(&format!("- MACD Signal: {:.2}\n", bundle.macd_signal));
    prompt.push_str(&format!("- RSI: {:.2}\n", bundle.rsi));
    prompt.push_str("- Bollinger Bands:\n");
    prompt.push_str(&format!("    - Upper: {:.2}\n", bundle.bb_upper));
    prompt.push_str(&format!("    - Middle: {:.2}\n", bundle.bb_middle));
    prompt.push_str(&format!("    - Lower: {:.2}\n", bundle.bb_lower));
    prompt.push_str("- Stochastic Oscillator:\n");
    prompt.push_str(&format!("    - %K: {:.2}\n", bundle.stoch_k));
    prompt.push_str(&format!("    - %D: {:.2}\n", bundle.stoch_d));

    if let Some(sector) = &bundle.sector {
        prompt.push_str(&format!("- Sector: {sector}\n"));
    }
    if let Some(industry) = &bundle.industry {
        prompt.push_str(&format!("- Industry: {industry}\n"));
    }
    if let Some(market_cap) = bundle.market_cap {
        prompt.push_str(&format!("- Market Cap: {market_cap:.2}\n"));
    }

    prompt.push_str("News Headlines:\n");
    for item in news {
        prompt.push_str(&format!("- {} ({})\n", item.title, item.link));
    }

    prompt
}
