//! Tool for fetching stock price data

use super::markdown_table;
use crate::api::{Quote, YahooFinanceClient, normalize_symbol};
use async_trait::async_trait;
use crew_tools::{Result, Tool};
use std::sync::Arc;

/// One month of daily prices
pub struct StockPriceTool {
    client: Arc<YahooFinanceClient>,
}

impl StockPriceTool {
    pub fn new(client: Arc<YahooFinanceClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for StockPriceTool {
    fn name(&self) -> &str {
        "Stock Price"
    }

    fn usage_doc(&self) -> &str {
        "Useful to get stock price data. The input should be a ticker, for example AAPL, NET."
    }

    async fn invoke(&self, input: &str) -> Result<String> {
        let symbol = normalize_symbol(input)?;
        let quotes = self.client.price_history(&symbol, "1mo").await?;
        Ok(render_prices(&symbol, &quotes))
    }
}

fn render_prices(symbol: &str, quotes: &[Quote]) -> String {
    if quotes.is_empty() {
        return format!("No price data available for {symbol}.");
    }

    let header = ["Date", "Open", "High", "Low", "Close", "Volume"]
        .map(String::from)
        .to_vec();
    let rows = quotes
        .iter()
        .map(|q| {
            vec![
                q.timestamp.format("%Y-%m-%d").to_string(),
                format!("{:.2}", q.open),
                format!("{:.2}", q.high),
                format!("{:.2}", q.low),
                format!("{:.2}", q.close),
                q.volume.to_string(),
            ]
        })
        .collect();

    format!(
        "Daily prices for {symbol} over the last month:\n\n{}",
        markdown_table(header, rows)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn test_render_prices() {
        let quotes = vec![Quote {
            timestamp: DateTime::from_timestamp(1_714_564_800, 0).unwrap(),
            open: 169.58,
            high: 172.71,
            low: 169.11,
            close: 169.3,
            volume: 50_383_100,
            adjclose: 169.3,
        }];
        let text = render_prices("AAPL", &quotes);
        assert!(text.starts_with("Daily prices for AAPL"));
        assert!(text.contains("2024-05-01"));
        assert!(text.contains("169.30"));
        assert!(text.contains("50383100"));
    }

    #[test]
    fn test_render_no_prices() {
        assert_eq!(render_prices("NET", &[]), "No price data available for NET.");
    }
}
