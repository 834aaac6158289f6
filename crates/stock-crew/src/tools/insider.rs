//! Tool for insider transactions

use super::markdown_table;
use crate::api::{InsiderTransaction, YahooFinanceClient, normalize_symbol};
use async_trait::async_trait;
use crew_tools::{Result, Tool};
use std::sync::Arc;

const MAX_ROWS: usize = 20;

/// Recent trades by officers and directors
pub struct InsiderTransactionsTool {
    client: Arc<YahooFinanceClient>,
}

impl InsiderTransactionsTool {
    pub fn new(client: Arc<YahooFinanceClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for InsiderTransactionsTool {
    fn name(&self) -> &str {
        "Insider Transactions"
    }

    fn usage_doc(&self) -> &str {
        "Useful to get insider transactions of a stock. The input to this tool should be a ticker, for example AAPL, NET."
    }

    async fn invoke(&self, input: &str) -> Result<String> {
        let symbol = normalize_symbol(input)?;
        let transactions = self.client.insider_transactions(&symbol).await?;
        Ok(render_transactions(&symbol, &transactions))
    }
}

fn render_transactions(symbol: &str, transactions: &[InsiderTransaction]) -> String {
    if transactions.is_empty() {
        return format!("No insider transactions found for {symbol}.");
    }

    let header = ["Date", "Insider", "Relation", "Transaction", "Shares", "Value"]
        .map(String::from)
        .to_vec();
    let rows = transactions
        .iter()
        .take(MAX_ROWS)
        .map(|t| {
            let transaction = if t.transaction_text.is_empty() {
                "-".to_string()
            } else {
                t.transaction_text.clone()
            };
            vec![
                t.start_date.fmt.clone().unwrap_or_else(|| "-".to_string()),
                t.filer_name.clone(),
                t.filer_relation.clone(),
                transaction,
                t.shares.display().unwrap_or_else(|| "-".to_string()),
                t.value.display().unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();

    format!(
        "Most recent insider transactions for {symbol}:\n\n{}",
        markdown_table(header, rows)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Figure;

    fn figure(fmt: &str) -> Figure {
        Figure {
            raw: None,
            fmt: Some(fmt.to_string()),
            long_fmt: None,
        }
    }

    #[test]
    fn test_render_transactions() {
        let transactions = vec![InsiderTransaction {
            filer_name: "COOK TIMOTHY D".to_string(),
            filer_relation: "Chief Executive Officer".to_string(),
            transaction_text: "Sale at price 224.46 per share.".to_string(),
            shares: figure("223.99k"),
            value: figure("50.28M"),
            start_date: figure("2024-10-02"),
            ownership: "D".to_string(),
        }];
        let text = render_transactions("AAPL", &transactions);
        assert!(text.starts_with("Most recent insider transactions for AAPL"));
        assert!(text.contains("COOK TIMOTHY D"));
        assert!(text.contains("2024-10-02"));
        assert!(text.contains("50.28M"));
    }

    #[test]
    fn test_render_caps_rows() {
        let transactions = vec![
            InsiderTransaction {
                filer_name: "INSIDER".to_string(),
                ..Default::default()
            };
            MAX_ROWS + 5
        ];
        let text = render_transactions("NET", &transactions);
        assert_eq!(text.matches("INSIDER").count(), MAX_ROWS);
    }

    #[test]
    fn test_render_no_transactions() {
        assert_eq!(
            render_transactions("NET", &[]),
            "No insider transactions found for NET."
        );
    }
}
