//! Tool for fetching stock news

use crate::api::{NewsItem, YahooFinanceClient, normalize_symbol};
use async_trait::async_trait;
use crew_tools::{Result, Tool};
use std::sync::Arc;

/// Recent headlines about a stock
pub struct StockNewsTool {
    client: Arc<YahooFinanceClient>,
}

impl StockNewsTool {
    pub fn new(client: Arc<YahooFinanceClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for StockNewsTool {
    fn name(&self) -> &str {
        "Stock News"
    }

    fn usage_doc(&self) -> &str {
        "Useful to get news about a stock. The input should be a ticker, for example AAPL, NET."
    }

    async fn invoke(&self, input: &str) -> Result<String> {
        let symbol = normalize_symbol(input)?;
        let news = self.client.news(&symbol).await?;
        Ok(render_news(&symbol, &news))
    }
}

fn render_news(symbol: &str, news: &[NewsItem]) -> String {
    if news.is_empty() {
        return format!("No news found for {symbol}.");
    }

    let mut out = format!("Latest news for {symbol}:\n");
    for item in news {
        let published = item
            .published_at()
            .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "unknown date".to_string());
        out.push_str(&format!(
            "\n- {} ({}, {})\n  {}\n",
            item.title, item.publisher, published, item.link
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_news() {
        let news = vec![NewsItem {
            title: "Apple unveils new chips".to_string(),
            publisher: "Reuters".to_string(),
            link: "https://example.com/a".to_string(),
            published: Some(1_714_564_800),
        }];
        let text = render_news("AAPL", &news);
        assert!(text.starts_with("Latest news for AAPL:"));
        assert!(text.contains("- Apple unveils new chips (Reuters, 2024-05-01 12:00 UTC)"));
        assert!(text.contains("https://example.com/a"));
    }

    #[test]
    fn test_render_no_news() {
        assert_eq!(render_news("NET", &[]), "No news found for NET.");
    }
}
