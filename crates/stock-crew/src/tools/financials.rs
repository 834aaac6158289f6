//! Tools for annual financial statements

use super::markdown_table;
use crate::api::{Statement, YahooFinanceClient, normalize_symbol};
use async_trait::async_trait;
use crew_tools::{Result, Tool};
use std::sync::Arc;

const INCOME_ROWS: &[(&str, &str)] = &[
    ("totalRevenue", "Total Revenue"),
    ("costOfRevenue", "Cost of Revenue"),
    ("grossProfit", "Gross Profit"),
    ("researchDevelopment", "Research & Development"),
    ("sellingGeneralAdministrative", "Selling, General & Administrative"),
    ("operatingIncome", "Operating Income"),
    ("ebit", "EBIT"),
    ("interestExpense", "Interest Expense"),
    ("incomeBeforeTax", "Income Before Tax"),
    ("incomeTaxExpense", "Income Tax Expense"),
    ("netIncome", "Net Income"),
];

const BALANCE_ROWS: &[(&str, &str)] = &[
    ("cash", "Cash"),
    ("shortTermInvestments", "Short Term Investments"),
    ("netReceivables", "Net Receivables"),
    ("inventory", "Inventory"),
    ("totalCurrentAssets", "Total Current Assets"),
    ("propertyPlantEquipment", "Property, Plant & Equipment"),
    ("totalAssets", "Total Assets"),
    ("accountsPayable", "Accounts Payable"),
    ("shortLongTermDebt", "Short Term Debt"),
    ("totalCurrentLiabilities", "Total Current Liabilities"),
    ("longTermDebt", "Long Term Debt"),
    ("totalLiab", "Total Liabilities"),
    ("retainedEarnings", "Retained Earnings"),
    ("totalStockholderEquity", "Total Stockholder Equity"),
];

/// Annual income statements
pub struct IncomeStatementTool {
    client: Arc<YahooFinanceClient>,
}

impl IncomeStatementTool {
    pub fn new(client: Arc<YahooFinanceClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for IncomeStatementTool {
    fn name(&self) -> &str {
        "Income statement"
    }

    fn usage_doc(&self) -> &str {
        "Useful to get the income statement of a company. The input to this tool should be a ticker, for example AAPL, NET."
    }

    async fn invoke(&self, input: &str) -> Result<String> {
        let symbol = normalize_symbol(input)?;
        let statements = self.client.income_statements(&symbol).await?;
        Ok(render_statements(&statements, INCOME_ROWS)
            .map(|table| format!("Annual income statements for {symbol}:\n\n{table}"))
            .unwrap_or_else(|| "No income statement data available.".to_string()))
    }
}

/// Annual balance sheets
pub struct BalanceSheetTool {
    client: Arc<YahooFinanceClient>,
}

impl BalanceSheetTool {
    pub fn new(client: Arc<YahooFinanceClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for BalanceSheetTool {
    fn name(&self) -> &str {
        "Balance Sheet"
    }

    fn usage_doc(&self) -> &str {
        "Useful to get the balance sheet of a company. The input to this tool should be a ticker, for example AAPL, NET."
    }

    async fn invoke(&self, input: &str) -> Result<String> {
        let symbol = normalize_symbol(input)?;
        let statements = self.client.balance_sheets(&symbol).await?;
        Ok(render_statements(&statements, BALANCE_ROWS)
            .map(|table| format!("Annual balance sheets for {symbol}:\n\n{table}"))
            .unwrap_or_else(|| "No balance sheet data available.".to_string()))
    }
}

/// One row per known line item, one column per fiscal period.
/// Returns `None` when no statement carries any of the rows.
fn render_statements(statements: &[Statement], rows: &[(&str, &str)]) -> Option<String> {
    if statements.is_empty() {
        return None;
    }

    let mut header = vec!["Item".to_string()];
    header.extend(statements.iter().map(|s| s.end_date.clone()));

    let body: Vec<Vec<String>> = rows
        .iter()
        .filter_map(|(field, label)| {
            let values: Vec<Option<String>> = statements
                .iter()
                .map(|s| s.items.get(*field).and_then(|f| f.display()))
                .collect();
            if values.iter().all(Option::is_none) {
                return None;
            }

            let mut row = vec![label.to_string()];
            row.extend(values.into_iter().map(|v| v.unwrap_or_else(|| "-".to_string())));
            Some(row)
        })
        .collect();

    (!body.is_empty()).then(|| markdown_table(header, body))
}
