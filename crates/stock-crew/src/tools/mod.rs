//! Stock analysis tools for the crew's agents
//!
//! Every tool takes one string (a ticker, or a URL for the scraper) and
//! returns readable text. "No data" is a normal answer, not an error.

pub mod financials;
pub mod insider;
pub mod news;
pub mod price;
pub mod scrape;

pub use financials::{BalanceSheetTool, IncomeStatementTool};
pub use insider::InsiderTransactionsTool;
pub use news::StockNewsTool;
pub use price::StockPriceTool;
pub use scrape::ScrapeWebsiteTool;

use crate::api::YahooFinanceClient;
use comfy_table::Table;
use comfy_table::presets::ASCII_MARKDOWN;
use crew_tools::{Timed, Tool, ToolRegistry};
use std::sync::Arc;
use std::time::Duration;

/// Register the six stock tools, each bounded by `timeout`
pub fn stock_tools(client: Arc<YahooFinanceClient>, timeout: Duration) -> ToolRegistry {
    let tools: Vec<Arc<dyn Tool>> = vec![
        Arc::new(StockNewsTool::new(Arc::clone(&client))),
        Arc::new(StockPriceTool::new(Arc::clone(&client))),
        Arc::new(IncomeStatementTool::new(Arc::clone(&client))),
        Arc::new(BalanceSheetTool::new(Arc::clone(&client))),
        Arc::new(InsiderTransactionsTool::new(Arc::clone(&client))),
        Arc::new(ScrapeWebsiteTool::new(client.http().clone())),
    ];

    tools
        .into_iter()
        .fold(ToolRegistry::new(), |registry, tool| {
            registry.with(Arc::new(Timed::new(tool, timeout)))
        })
}

/// Markdown table used by every tabular tool output
pub(crate) fn markdown_table(header: Vec<String>, rows: Vec<Vec<String>>) -> String {
    let mut table = Table::new();
    table.load_preset(ASCII_MARKDOWN).set_header(header);
    for row in rows {
        table.add_row(row);
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_names() {
        let client = Arc::new(YahooFinanceClient::new(Duration::from_secs(5)).unwrap());
        let registry = stock_tools(client, Duration::from_secs(30));
        assert_eq!(
            registry.names(),
            vec![
                "Balance Sheet",
                "Income statement",
                "Insider Transactions",
                "Read website content",
                "Stock News",
                "Stock Price",
            ]
        );
    }

    #[test]
    fn test_markdown_table() {
        let table = markdown_table(
            vec!["Date".to_string(), "Close".to_string()],
            vec![vec!["2024-05-01".to_string(), "169.30".to_string()]],
        );
        assert!(table.contains("| Date"));
        assert!(table.contains("2024-05-01"));
    }
}
