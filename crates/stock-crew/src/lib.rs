//! Stock analysis crew
//!
//! Four agents collaborate on a single company:
//!
//! - `Researcher` reads news and web pages
//! - `Technical Analyst` studies a month of daily prices
//! - `Financial Analyst` reviews statements and insider trades
//! - `Hedge Fund Manager` turns the three reports into a BUY, SELL or HOLD call
//!
//! Market data comes from Yahoo Finance. The recommendation is returned to
//! the caller and written to [`StockConfig::output_file`].
//!
//! # Example
//!
//! ```rust,ignore
//! use crew_llm::providers::OpenAIProvider;
//! use stock_crew::{StockConfig, StockCrew};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = StockConfig::from_env()?;
//!     let provider = Arc::new(OpenAIProvider::with_config(config.openai_config())?);
//!     let crew = StockCrew::new(&config, provider)?;
//!
//!     println!("{}", crew.handle("AAPL").await);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod crew;
pub mod error;
pub mod platforms;
pub mod tools;

pub use config::StockConfig;
pub use crew::{APOLOGY, StockCrew};
pub use error::{Result, StockError};
pub use tools::stock_tools;
