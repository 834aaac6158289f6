//! Yahoo Finance API client
//!
//! Prices come from the chart endpoint through `yahoo_finance_api`. News uses
//! the public search endpoint. Financial statements and insider trades come
//! from `quoteSummary`, which needs a session cookie plus a crumb token; both
//! are fetched lazily and reused until Yahoo rejects them.

use crate::error::{Result, StockError};
use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use yahoo_finance_api as yahoo;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";
const SEARCH_URL: &str = "https://query1.finance.yahoo.com/v1/finance/search";
const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";

static SYMBOL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z0-9^][A-Z0-9.\-=^]{0,19}$")
        .unwrap_or_else(|e| panic!("invalid symbol pattern: {e}"))
});

/// Normalise a ticker typed by a model: trims quotes and whitespace, uppercases
pub fn normalize_symbol(input: &str) -> Result<String> {
    let symbol = input
        .trim()
        .trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .trim()
        .to_uppercase();
    if SYMBOL.is_match(&symbol) {
        Ok(symbol)
    } else {
        Err(StockError::InvalidSymbol(input.trim().to_string()))
    }
}

/// Daily price bar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub adjclose: f64,
}

/// A news headline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub link: String,
    #[serde(rename = "providerPublishTime", default)]
    pub published: Option<i64>,
}

impl NewsItem {
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published.and_then(|t| DateTime::from_timestamp(t, 0))
    }
}

/// A Yahoo numeric field with its display forms
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    #[serde(default)]
    pub raw: Option<f64>,
    #[serde(default)]
    pub fmt: Option<String>,
    #[serde(rename = "longFmt", default)]
    pub long_fmt: Option<String>,
}

impl Figure {
    /// Display text, preferring the long form
    pub fn display(&self) -> Option<String> {
        self.long_fmt
            .clone()
            .or_else(|| self.fmt.clone())
            .or_else(|| self.raw.map(|r| format!("{r}")))
    }
}

/// One annual income statement or balance sheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statement {
    /// Fiscal period end, e.g. `2024-09-28`
    pub end_date: String,
    /// Line items keyed by Yahoo field name
    pub items: BTreeMap<String, Figure>,
}

impl Statement {
    fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let end_date = object
            .get("endDate")
            .and_then(|d| d.get("fmt"))
            .and_then(Value::as_str)?
            .to_string();

        let items = object
            .iter()
            .filter(|(key, _)| key.as_str() != "endDate" && key.as_str() != "maxAge")
            .filter_map(|(key, v)| {
                let figure: Figure = serde_json::from_value(v.clone()).ok()?;
                (figure.raw.is_some() || figure.fmt.is_some()).then(|| (key.clone(), figure))
            })
            .collect();

        Some(Self { end_date, items })
    }
}

/// An insider trade as reported to the SEC
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsiderTransaction {
    #[serde(default)]
    pub filer_name: String,
    #[serde(default)]
    pub filer_relation: String,
    #[serde(default)]
    pub transaction_text: String,
    #[serde(default)]
    pub shares: Figure,
    #[serde(default)]
    pub value: Figure,
    #[serde(default)]
    pub start_date: Figure,
    #[serde(default)]
    pub ownership: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news: Vec<NewsItem>,
}

/// Yahoo Finance API client
pub struct YahooFinanceClient {
    http: Client,
    crumb: Mutex<Option<String>>,
}

impl YahooFinanceClient {
    /// Create a client whose HTTP requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()?;
        Ok(Self {
            http,
            crumb: Mutex::new(None),
        })
    }

    /// Shared HTTP client
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Daily bars for the last `range` (e.g. `1mo`)
    pub async fn price_history(&self, symbol: &str, range: &str) -> Result<Vec<Quote>> {
        let provider = yahoo::YahooConnector::new()?;
        let response = provider.get_quote_range(symbol, "1d", range).await?;
        let quotes = response.quotes()?;

        Ok(quotes
            .iter()
            .map(|q| Quote {
                timestamp: DateTime::from_timestamp(q.timestamp as i64, 0)
                    .unwrap_or_else(Utc::now),
                open: q.open,
                high: q.high,
                low: q.low,
                close: q.close,
                volume: q.volume,
                adjclose: q.adjclose,
            })
            .collect())
    }

    /// Recent headlines mentioning `symbol`
    pub async fn news(&self, symbol: &str) -> Result<Vec<NewsItem>> {
        let response = self
            .http
            .get(SEARCH_URL)
            .query(&[("q", symbol), ("quotesCount", "0"), ("newsCount", "10")])
            .send()
            .await?
            .error_for_status()?;
        let body: SearchResponse = response.json().await?;
        Ok(body.news)
    }

    /// Annual income statements, most recent first
    pub async fn income_statements(&self, symbol: &str) -> Result<Vec<Statement>> {
        let module = self
            .quote_summary(symbol, "incomeStatementHistory")
            .await?;
        Ok(statements(&module, "incomeStatementHistory"))
    }

    /// Annual balance sheets, most recent first
    pub async fn balance_sheets(&self, symbol: &str) -> Result<Vec<Statement>> {
        let module = self.quote_summary(symbol, "balanceSheetHistory").await?;
        Ok(statements(&module, "balanceSheetStatements"))
    }

    /// Insider transactions, most recent first
    pub async fn insider_transactions(&self, symbol: &str) -> Result<Vec<InsiderTransaction>> {
        let module = self.quote_summary(symbol, "insiderTransactions").await?;
        let transactions = module
            .get("transactions")
            .cloned()
            .unwrap_or(Value::Array(Vec::new()));
        Ok(serde_json::from_value(transactions)?)
    }

    /// Fetch one `quoteSummary` module, refreshing the crumb once if it is rejected
    async fn quote_summary(&self, symbol: &str, module: &str) -> Result<Value> {
        for attempt in 1..=2 {
            let crumb = self.crumb().await?;
            let response = self
                .http
                .get(format!("{QUOTE_SUMMARY_URL}/{symbol}"))
                .query(&[("modules", module), ("crumb", crumb.as_str())])
                .send()
                .await?;

            match response.status() {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN if attempt == 1 => {
                    warn!(symbol = %symbol, module = %module, "Yahoo crumb rejected, refreshing");
                    *self.crumb.lock().await = None;
                }
                StatusCode::NOT_FOUND => {
                    return Err(StockError::DataUnavailable {
                        symbol: symbol.to_string(),
                        reason: "symbol not found".to_string(),
                    });
                }
                status if !status.is_success() => {
                    return Err(StockError::YahooFinanceError(format!(
                        "quoteSummary {module} returned HTTP {status}"
                    )));
                }
                _ => {
                    let body: Value = response.json().await?;
                    return extract_module(&body, module).ok_or_else(|| {
                        StockError::DataUnavailable {
                            symbol: symbol.to_string(),
                            reason: format!("no {module} data"),
                        }
                    });
                }
            }
        }

        Err(StockError::YahooFinanceError(
            "could not authenticate with Yahoo Finance".to_string(),
        ))
    }

    async fn crumb(&self) -> Result<String> {
        let mut guard = self.crumb.lock().await;
        if let Some(crumb) = guard.as_ref() {
            return Ok(crumb.clone());
        }

        // Sets the session cookie; the status is irrelevant.
        if let Err(e) = self.http.get(COOKIE_URL).send().await {
            debug!(error = %e, "Cookie request failed");
        }

        let crumb = self
            .http
            .get(CRUMB_URL)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let crumb = crumb.trim().to_string();
        if crumb.is_empty() || crumb.contains('<') || crumb.contains(' ') {
            return Err(StockError::YahooFinanceError(
                "Yahoo did not issue a crumb".to_string(),
            ));
        }

        debug!("Obtained Yahoo crumb");
        *guard = Some(crumb.clone());
        Ok(crumb)
    }
}

fn extract_module(body: &Value, module: &str) -> Option<Value> {
    body.get("quoteSummary")?
        .get("result")?
        .get(0)?
        .get(module)
        .cloned()
}

fn statements(module: &Value, list: &str) -> Vec<Statement> {
    module
        .get(list)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Statement::from_value).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol(" \"aapl\" ").unwrap(), "AAPL");
        assert_eq!(normalize_symbol("brk-b").unwrap(), "BRK-B");
        assert_eq!(normalize_symbol("^GSPC").unwrap(), "^GSPC");
        assert!(matches!(
            normalize_symbol("Apple Inc stock"),
            Err(StockError::InvalidSymbol(_))
        ));
        assert!(normalize_symbol("").is_err());
    }

    #[test]
    fn test_statement_parsing() {
        let body = json!({
            "quoteSummary": {
                "result": [{
                    "incomeStatementHistory": {
                        "incomeStatementHistory": [
                            {
                                "maxAge": 1,
                                "endDate": {"raw": 1727481600, "fmt": "2024-09-28"},
                                "totalRevenue": {"raw": 391035000000.0, "fmt": "391.04B", "longFmt": "391,035,000,000"},
                                "netIncome": {"raw": 93736000000.0, "fmt": "93.74B"},
                                "researchDevelopment": {}
                            },
                            {"maxAge": 1}
                        ]
                    }
                }],
                "error": null
            }
        });

        let module = extract_module(&body, "incomeStatementHistory").unwrap();
        let parsed = statements(&module, "incomeStatementHistory");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].end_date, "2024-09-28");
        assert_eq!(parsed[0].items.len(), 2);
        assert_eq!(
            parsed[0].items["totalRevenue"].display().as_deref(),
            Some("391,035,000,000")
        );
        assert_eq!(parsed[0].items["netIncome"].display().as_deref(), Some("93.74B"));
    }

    #[test]
    fn test_missing_module() {
        let body = json!({"quoteSummary": {"result": null, "error": {"code": "Not Found"}}});
        assert!(extract_module(&body, "balanceSheetHistory").is_none());
    }

    #[test]
    fn test_insider_transaction_parsing() {
        let raw = json!([{
            "filerName": "COOK TIMOTHY D",
            "filerRelation": "Chief Executive Officer",
            "transactionText": "Sale at price 223.00 per share.",
            "shares": {"raw": 100000, "fmt": "100k", "longFmt": "100,000"},
            "value": {"raw": 22300000, "fmt": "22.3M"},
            "startDate": {"raw": 1712016000, "fmt": "2024-04-02"},
            "ownership": "D"
        }]);
        let parsed: Vec<InsiderTransaction> = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed[0].filer_name, "COOK TIMOTHY D");
        assert_eq!(parsed[0].shares.display().as_deref(), Some("100,000"));
        assert_eq!(parsed[0].start_date.fmt.as_deref(), Some("2024-04-02"));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_price_history() {
        let client = YahooFinanceClient::new(Duration::from_secs(30)).unwrap();
        let quotes = client.price_history("AAPL", "1mo").await.unwrap();
        assert!(!quotes.is_empty());
        assert!(quotes[0].close > 0.0);
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_income_statements() {
        let client = YahooFinanceClient::new(Duration::from_secs(30)).unwrap();
        let statements = client.income_statements("AAPL").await.unwrap();
        assert!(!statements.is_empty());
    }
}
